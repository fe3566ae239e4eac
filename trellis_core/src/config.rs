// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Construction-time engine configuration.
//!
//! Optional capabilities are switched on per engine with a [`FeatureSet`].
//! A feature that is off costs nothing: nodes cannot carry its attributes,
//! its compute parameters are refused, and the device never produces its
//! outputs.

use core::fmt;

/// An optional capability fixed when the engine is constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Feature {
    /// Per-instance frustum culling against a camera parameter.
    ///
    /// Enables [`Aabb`](crate::node::Aabb) node attributes and both camera
    /// [`ComputeParameter`](crate::parameter::ComputeParameter)s.
    FrustumCulling,
    /// Grouping of output instances by user tag.
    ///
    /// Enables the user-id node attribute and the
    /// [`UserIds`](crate::output::OutputAttributeKind::UserIds) output.
    UserIds,
}

impl Feature {
    /// Every known feature, in declaration order.
    pub const ALL: [Self; 2] = [Self::FrustumCulling, Self::UserIds];

    const fn bit(self) -> u32 {
        match self {
            Self::FrustumCulling => 1 << 0,
            Self::UserIds => 1 << 1,
        }
    }
}

/// A set of [`Feature`]s.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FeatureSet(u32);

impl FeatureSet {
    /// The empty set: no culling, no tagging.
    pub const EMPTY: Self = Self(0);

    /// Returns the set with `feature` added.
    #[must_use]
    pub const fn with(self, feature: Feature) -> Self {
        Self(self.0 | feature.bit())
    }

    /// Returns the set with `feature` removed.
    #[must_use]
    pub const fn without(self, feature: Feature) -> Self {
        Self(self.0 & !feature.bit())
    }

    /// Returns whether `feature` is in the set.
    #[must_use]
    pub const fn contains(self, feature: Feature) -> bool {
        self.0 & feature.bit() != 0
    }

    /// Returns whether every feature of `other` is in the set.
    #[must_use]
    pub const fn contains_all(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns the union of both sets.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Returns whether the set is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterates the contained features in declaration order.
    pub fn iter(self) -> impl Iterator<Item = Feature> {
        Feature::ALL.into_iter().filter(move |f| self.contains(*f))
    }
}

impl FromIterator<Feature> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, Self::with)
    }
}

impl fmt::Debug for FeatureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// What [`Engine::compute`](crate::engine::Engine::compute) does when the
/// previous transaction has not completed yet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OverlapPolicy {
    /// Fail with [`Error::ComputeInProgress`](crate::Error::ComputeInProgress)
    /// and keep the queued commands for a later call.
    #[default]
    Reject,
    /// Block until the outstanding transaction completes, then submit.
    Serialize,
}

/// Configuration for an [`Engine`](crate::engine::Engine).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EngineConfig {
    /// Optional capabilities.
    pub features: FeatureSet,
    /// Behavior of overlapping compute requests.
    pub overlap: OverlapPolicy,
}

impl EngineConfig {
    /// No features, overlapping computes rejected.
    #[must_use]
    pub const fn minimal() -> Self {
        Self {
            features: FeatureSet::EMPTY,
            overlap: OverlapPolicy::Reject,
        }
    }

    /// Every feature enabled, overlapping computes rejected.
    #[must_use]
    pub const fn full() -> Self {
        Self {
            features: FeatureSet::EMPTY
                .with(Feature::FrustumCulling)
                .with(Feature::UserIds),
            overlap: OverlapPolicy::Reject,
        }
    }

    /// Returns the configuration with `feature` enabled.
    #[must_use]
    pub const fn with_feature(mut self, feature: Feature) -> Self {
        self.features = self.features.with(feature);
        self
    }

    /// Returns the configuration with the given overlap policy.
    #[must_use]
    pub const fn with_overlap(mut self, overlap: OverlapPolicy) -> Self {
        self.overlap = overlap;
        self
    }
}
