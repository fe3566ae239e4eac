// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bounding-box tests against the clip volume.

use trellis_core::node::Aabb;
use trellis_core::transform::Matrix4;

/// Returns whether `aabb`, mapped by `clip_from_local`, lies entirely outside
/// the clip volume `-w <= x, y, z <= w`.
///
/// Conservative: a box is only rejected when all eight corners fail the same
/// plane, so boxes straddling a frustum corner may pass.
pub(crate) fn is_outside(clip_from_local: &Matrix4, aabb: &Aabb) -> bool {
    let corners = aabb.corners().map(|c| clip_from_local.transform_point(c));
    (0..3).any(|axis| {
        corners.iter().all(|p| p[axis] < -p[3]) || corners.iter().all(|p| p[axis] > p[3])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Matrix4 {
        // Looks down -z from the origin.
        Matrix4::perspective_gl(core::f32::consts::FRAC_PI_2, 1.0, 0.1, 100.0)
    }

    fn unit_box_at(x: f32, y: f32, z: f32) -> (Matrix4, Aabb) {
        (
            Matrix4::from_translation(x, y, z),
            Aabb::new([-0.5; 3], [1.0; 3]),
        )
    }

    #[test]
    fn box_in_front_is_inside() {
        let (world, aabb) = unit_box_at(0.0, 0.0, -5.0);
        assert!(!is_outside(&(camera() * world), &aabb));
    }

    #[test]
    fn box_behind_is_outside() {
        let (world, aabb) = unit_box_at(0.0, 0.0, 5.0);
        assert!(is_outside(&(camera() * world), &aabb));
    }

    #[test]
    fn box_far_to_the_side_is_outside() {
        let (world, aabb) = unit_box_at(50.0, 0.0, -5.0);
        assert!(is_outside(&(camera() * world), &aabb));
    }

    #[test]
    fn box_beyond_far_plane_is_outside() {
        let (world, aabb) = unit_box_at(0.0, 0.0, -500.0);
        assert!(is_outside(&(camera() * world), &aabb));
    }

    #[test]
    fn straddling_box_is_inside() {
        let world = Matrix4::from_translation(0.0, 0.0, -5.0);
        let aabb = Aabb::from_min_max([-20.0, -0.5, -0.5], [0.0, 0.5, 0.5]);
        assert!(!is_outside(&(camera() * world), &aabb));
    }

    #[test]
    fn identity_camera_is_the_unit_cube() {
        let (world, aabb) = unit_box_at(0.0, 0.0, 0.0);
        assert!(!is_outside(&world, &aabb));
        let (world, aabb) = unit_box_at(3.0, 0.0, 0.0);
        assert!(is_outside(&world, &aabb));
    }
}
