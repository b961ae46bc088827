//! Segment - one arm of an experiment a visitor can be assigned to

use serde::{Deserialize, Serialize};

/// Segment represents a single variant of an experiment.
///
/// Segments are immutable, build-time configuration. The `id` is the
/// durable analytics key and must stay stable across deployments; the
/// `weight` is the fraction of participating visitors the segment should
/// receive. Weights across one experiment should sum to 1.0 but this is
/// not enforced — a cumulative shortfall resolves deterministically to
/// the last declared segment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Segment {
    id: u64,
    name: String,
    weight: f64,
    preview_token: Option<String>,
}

impl Segment {
    /// Create a new segment with the given ID, name, and selection weight.
    ///
    /// # Arguments
    ///
    /// * `id` - Stable analytics identifier for the segment
    /// * `name` - Human-readable label (e.g. "control", "variant-blue")
    /// * `weight` - Selection fraction in (0, 1]
    #[must_use]
    pub fn new(id: u64, name: impl Into<String>, weight: f64) -> Self {
        Self {
            id,
            name: name.into(),
            weight,
            preview_token: None,
        }
    }

    /// Create a builder for constructing a segment with optional fields.
    #[must_use]
    pub fn builder(id: u64, name: impl Into<String>, weight: f64) -> SegmentBuilder {
        SegmentBuilder::new(id, name, weight)
    }

    /// Get the segment ID.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Get the segment name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the selection weight.
    #[must_use]
    pub const fn weight(&self) -> f64 {
        self.weight
    }

    /// Get the preview token, if one is configured.
    #[must_use]
    pub fn preview_token(&self) -> Option<&str> {
        self.preview_token.as_deref()
    }

    /// Check whether `token` forces this segment.
    #[must_use]
    pub fn matches_preview(&self, token: &str) -> bool {
        self.preview_token.as_deref() == Some(token)
    }

    /// Get the persisted projection of this segment.
    #[must_use]
    pub fn snapshot(&self) -> SegmentSnapshot {
        SegmentSnapshot {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

/// Builder for `Segment`.
#[derive(Debug)]
pub struct SegmentBuilder {
    id: u64,
    name: String,
    weight: f64,
    preview_token: Option<String>,
}

impl SegmentBuilder {
    /// Create a new builder with required fields.
    #[must_use]
    pub fn new(id: u64, name: impl Into<String>, weight: f64) -> Self {
        Self {
            id,
            name: name.into(),
            weight,
            preview_token: None,
        }
    }

    /// Set the opaque preview token that force-selects this segment.
    #[must_use]
    pub fn preview_token(mut self, token: impl Into<String>) -> Self {
        self.preview_token = Some(token.into());
        self
    }

    /// Build the `Segment`.
    #[must_use]
    pub fn build(self) -> Segment {
        Segment {
            id: self.id,
            name: self.name,
            weight: self.weight,
            preview_token: self.preview_token,
        }
    }
}

/// The JSON projection of a segment persisted by the assignment store.
///
/// Only `id` and `name` survive persistence: weight and preview token are
/// configuration that may change between deployments, and a stored
/// snapshot is revalidated against the live segment table on every read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SegmentSnapshot {
    /// Stable analytics identifier of the assigned segment.
    pub id: u64,
    /// Segment name at assignment time.
    pub name: String,
}

impl From<&Segment> for SegmentSnapshot {
    fn from(segment: &Segment) -> Self {
        segment.snapshot()
    }
}
