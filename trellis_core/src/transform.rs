// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Column-major 4×4 matrix for node transforms and camera parameters.
//!
//! Elements are stored in the order device buffers expect:
//!
//! ```text
//! | 0  4  8 12 |
//! | 1  5  9 13 |
//! | 2  6 10 14 |
//! | 3  7 11 15 |
//! ```

use core::ops::Mul;

use bytemuck::{Pod, Zeroable};
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// A column-major 4×4 matrix stored as `[[f32; 4]; 4]`.
///
/// Each inner array is one *column*. The type is [`Pod`], so slices of
/// matrices can be handed to device buffers without conversion.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Matrix4 {
    /// Four columns, each a 4-element array `[x, y, z, w]`.
    pub cols: [[f32; 4]; 4],
}

impl Matrix4 {
    /// The 4×4 identity matrix.
    pub const IDENTITY: Self = Self {
        cols: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Creates a matrix from four column arrays.
    #[inline]
    #[must_use]
    pub const fn from_cols(col0: [f32; 4], col1: [f32; 4], col2: [f32; 4], col3: [f32; 4]) -> Self {
        Self {
            cols: [col0, col1, col2, col3],
        }
    }

    /// Creates a matrix from 16 elements in column-major order.
    #[inline]
    #[must_use]
    pub fn from_cols_array(elements: [f32; 16]) -> Self {
        Self {
            cols: bytemuck::cast(elements),
        }
    }

    /// Returns the 16 elements in column-major order.
    #[inline]
    #[must_use]
    pub fn to_cols_array(self) -> [f32; 16] {
        bytemuck::cast(self.cols)
    }

    /// Returns column `i` (0-based).
    ///
    /// # Panics
    ///
    /// Panics if `i >= 4`.
    #[inline]
    #[must_use]
    pub const fn col(self, i: usize) -> [f32; 4] {
        self.cols[i]
    }

    /// Creates a pure translation.
    #[inline]
    #[must_use]
    pub const fn from_translation(x: f32, y: f32, z: f32) -> Self {
        Self {
            cols: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [x, y, z, 1.0],
            ],
        }
    }

    /// Creates a non-uniform scale.
    #[inline]
    #[must_use]
    pub const fn from_scale(sx: f32, sy: f32, sz: f32) -> Self {
        Self {
            cols: [
                [sx, 0.0, 0.0, 0.0],
                [0.0, sy, 0.0, 0.0],
                [0.0, 0.0, sz, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Creates a rotation around the X axis (radians).
    #[must_use]
    pub fn from_rotation_x(radians: f32) -> Self {
        let (s, c) = sin_cos(radians);
        Self {
            cols: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, c, s, 0.0],
                [0.0, -s, c, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Creates a rotation around the Y axis (radians).
    #[must_use]
    pub fn from_rotation_y(radians: f32) -> Self {
        let (s, c) = sin_cos(radians);
        Self {
            cols: [
                [c, 0.0, -s, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [s, 0.0, c, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Creates a rotation around the Z axis (radians).
    #[must_use]
    pub fn from_rotation_z(radians: f32) -> Self {
        let (s, c) = sin_cos(radians);
        Self {
            cols: [
                [c, s, 0.0, 0.0],
                [-s, c, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Creates a right-handed perspective projection with OpenGL clip depth
    /// (`-w..=w`).
    ///
    /// `fovy` is the vertical field of view in radians.
    #[must_use]
    pub fn perspective_gl(fovy: f32, aspect: f32, near: f32, far: f32) -> Self {
        let (s, c) = sin_cos(0.5 * fovy);
        let f = c / s;
        let depth = near - far;
        Self {
            cols: [
                [f / aspect, 0.0, 0.0, 0.0],
                [0.0, f, 0.0, 0.0],
                [0.0, 0.0, (far + near) / depth, -1.0],
                [0.0, 0.0, 2.0 * far * near / depth, 0.0],
            ],
        }
    }

    /// Transforms the point `(x, y, z, 1)` and returns the homogeneous result.
    #[inline]
    #[must_use]
    pub fn transform_point(&self, p: [f32; 3]) -> [f32; 4] {
        let c = &self.cols;
        let mut out = [0.0_f32; 4];
        for (i, o) in out.iter_mut().enumerate() {
            *o = c[0][i] * p[0] + c[1][i] * p[1] + c[2][i] * p[2] + c[3][i];
        }
        out
    }

    /// Is every element [finite]?
    ///
    /// [finite]: f32::is_finite
    #[inline]
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.cols.iter().flatten().all(|v| v.is_finite())
    }

    /// Is any element [NaN]?
    ///
    /// [NaN]: f32::is_nan
    #[inline]
    #[must_use]
    pub fn is_nan(&self) -> bool {
        self.cols.iter().flatten().any(|v| v.is_nan())
    }

    /// Returns whether every element is within `eps` of the corresponding
    /// element of `other`.
    #[must_use]
    pub fn abs_diff_eq(&self, other: &Self, eps: f32) -> bool {
        self.cols
            .iter()
            .flatten()
            .zip(other.cols.iter().flatten())
            .all(|(a, b)| (a - b).abs() <= eps)
    }
}

impl Default for Matrix4 {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Matrix4 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        let a = &self.cols;
        let b = &rhs.cols;
        let mut out = [[0.0_f32; 4]; 4];
        for (j, col) in out.iter_mut().enumerate() {
            for (i, v) in col.iter_mut().enumerate() {
                *v = a[0][i] * b[j][0] + a[1][i] * b[j][1] + a[2][i] * b[j][2] + a[3][i] * b[j][3];
            }
        }
        Self { cols: out }
    }
}

/// Sine and cosine evaluated in `f64`, narrowed to `f32`.
#[expect(
    clippy::cast_possible_truncation,
    reason = "trigonometry is evaluated in f64 and narrowed for storage"
)]
fn sin_cos(radians: f32) -> (f32, f32) {
    let r = f64::from(radians);
    #[cfg(feature = "std")]
    let (s, c) = r.sin_cos();
    #[cfg(not(feature = "std"))]
    let (s, c) = (r.sin(), r.cos());
    (s as f32, c as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_identity() {
        assert_eq!(Matrix4::default(), Matrix4::IDENTITY);
    }

    #[test]
    fn identity_multiply() {
        let t = Matrix4::from_translation(1.0, 2.0, 3.0);
        assert_eq!(Matrix4::IDENTITY * t, t);
        assert_eq!(t * Matrix4::IDENTITY, t);
    }

    #[test]
    fn translation_composition() {
        let a = Matrix4::from_translation(1.0, 0.0, 0.0);
        let b = Matrix4::from_translation(0.0, 2.0, 0.0);
        assert_eq!((a * b).col(3), [1.0, 2.0, 0.0, 1.0]);
    }

    #[test]
    fn scale_then_translate() {
        let s = Matrix4::from_scale(2.0, 2.0, 2.0);
        let t = Matrix4::from_translation(3.0, 4.0, 0.0);
        // Parent translation, child scale: the child's local space is scaled
        // and then moved.
        let combined = t * s;
        assert_eq!(combined.col(0), [2.0, 0.0, 0.0, 0.0]);
        assert_eq!(combined.col(3), [3.0, 4.0, 0.0, 1.0]);
        assert_eq!(combined.transform_point([1.0, 0.0, 0.0]), [5.0, 4.0, 0.0, 1.0]);
    }

    #[test]
    fn cols_array_matches_documented_order() {
        let m = Matrix4::from_translation(5.0, 6.0, 7.0);
        let arr = m.to_cols_array();
        assert_eq!(&arr[12..15], &[5.0, 6.0, 7.0]);
        assert_eq!(Matrix4::from_cols_array(arr), m);
    }

    #[test]
    fn rotation_z_ninety_degrees() {
        let r = Matrix4::from_rotation_z(core::f32::consts::FRAC_PI_2);
        let p = r.transform_point([1.0, 0.0, 0.0]);
        let eps = 1e-6;
        assert!(p[0].abs() < eps, "x = {}", p[0]);
        assert!((p[1] - 1.0).abs() < eps, "y = {}", p[1]);
    }

    #[test]
    fn rotations_preserve_their_axis() {
        let angle = 0.7;
        let eps = 1e-6;
        let x = Matrix4::from_rotation_x(angle).transform_point([1.0, 0.0, 0.0]);
        let y = Matrix4::from_rotation_y(angle).transform_point([0.0, 1.0, 0.0]);
        assert!((x[0] - 1.0).abs() < eps && x[1].abs() < eps, "{x:?}");
        assert!((y[1] - 1.0).abs() < eps && y[0].abs() < eps, "{y:?}");
    }

    #[test]
    fn perspective_maps_near_plane_to_minus_w() {
        let p = Matrix4::perspective_gl(core::f32::consts::FRAC_PI_2, 1.0, 1.0, 10.0);
        let near = p.transform_point([0.0, 0.0, -1.0]);
        let far = p.transform_point([0.0, 0.0, -10.0]);
        let eps = 1e-4;
        assert!((near[2] + near[3]).abs() < eps, "near = {near:?}");
        assert!((far[2] - far[3]).abs() < eps, "far = {far:?}");
    }

    #[test]
    fn nan_detected() {
        let mut t = Matrix4::IDENTITY;
        t.cols[2][1] = f32::NAN;
        assert!(!t.is_finite());
        assert!(t.is_nan());
    }

    #[test]
    fn infinity_detected() {
        let mut t = Matrix4::IDENTITY;
        t.cols[0][3] = f32::INFINITY;
        assert!(!t.is_finite());
        assert!(!t.is_nan());
    }

    #[test]
    #[should_panic(expected = "index out of bounds")]
    fn col_past_the_last_column_panics() {
        let _ = Matrix4::IDENTITY.col(core::hint::black_box(4));
    }
}
