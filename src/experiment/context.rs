//! Experiment Context - per-experiment configuration record

use serde::{Deserialize, Serialize};

use super::Segment;

/// Storage scope for sticky assignments.
///
/// The scope is part of each experiment's configuration, not a property
/// of the assigner: two experiments on the same page may legitimately use
/// different scopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PersistenceScope {
    /// No persistence: every resolve re-rolls. Intentional for
    /// per-page-load experiments, not a bug.
    None,
    /// Cleared when the session ends (in-process store).
    #[default]
    Session,
    /// Survives restarts until explicitly cleared (on-disk store).
    Durable,
}

/// Experiment Context represents one experiment's static configuration.
///
/// Segments are ordered: the cumulative-weight walk visits them in
/// declared order, so declaration order is the tie-breaking rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExperimentContext {
    experiment_id: u64,
    project_id: u64,
    segments: Vec<Segment>,
    persistence: PersistenceScope,
    participation: f64,
    storage_key: String,
}

impl ExperimentContext {
    /// Create a context with default configuration (session persistence,
    /// full participation, conventional storage key).
    ///
    /// # Arguments
    ///
    /// * `experiment_id` - Identifier of the experiment in the analytics backend
    /// * `project_id` - Identifier of the owning project
    /// * `segments` - Ordered variant table; must not be empty
    #[must_use]
    pub fn new(experiment_id: u64, project_id: u64, segments: Vec<Segment>) -> Self {
        Self {
            experiment_id,
            project_id,
            segments,
            persistence: PersistenceScope::default(),
            participation: 1.0,
            storage_key: default_storage_key(experiment_id),
        }
    }

    /// Create a builder for constructing a context with optional fields.
    #[must_use]
    pub fn builder(experiment_id: u64, project_id: u64) -> ExperimentContextBuilder {
        ExperimentContextBuilder::new(experiment_id, project_id)
    }

    /// Get the experiment ID.
    #[must_use]
    pub const fn experiment_id(&self) -> u64 {
        self.experiment_id
    }

    /// Get the owning project ID.
    #[must_use]
    pub const fn project_id(&self) -> u64 {
        self.project_id
    }

    /// Get the ordered segment table.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Get the persistence scope for sticky assignments.
    #[must_use]
    pub const fn persistence(&self) -> PersistenceScope {
        self.persistence
    }

    /// Get the opt-in participation rate in (0, 1].
    #[must_use]
    pub const fn participation(&self) -> f64 {
        self.participation
    }

    /// Get the storage key under which assignments are persisted.
    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Find a segment by its stable ID.
    #[must_use]
    pub fn segment_by_id(&self, id: u64) -> Option<&Segment> {
        self.segments.iter().find(|s| s.id() == id)
    }

    /// Find the segment forced by a preview token, if any.
    #[must_use]
    pub fn segment_by_preview(&self, token: &str) -> Option<&Segment> {
        self.segments.iter().find(|s| s.matches_preview(token))
    }
}

fn default_storage_key(experiment_id: u64) -> String {
    format!("exp_{experiment_id}_segment")
}

/// Builder for `ExperimentContext`.
#[derive(Debug)]
pub struct ExperimentContextBuilder {
    experiment_id: u64,
    project_id: u64,
    segments: Vec<Segment>,
    persistence: PersistenceScope,
    participation: f64,
    storage_key: Option<String>,
}

impl ExperimentContextBuilder {
    /// Create a new builder with required fields.
    #[must_use]
    pub fn new(experiment_id: u64, project_id: u64) -> Self {
        Self {
            experiment_id,
            project_id,
            segments: Vec::new(),
            persistence: PersistenceScope::default(),
            participation: 1.0,
            storage_key: None,
        }
    }

    /// Append a segment to the ordered variant table.
    #[must_use]
    pub fn segment(mut self, segment: Segment) -> Self {
        self.segments.push(segment);
        self
    }

    /// Replace the variant table wholesale.
    #[must_use]
    pub fn segments(mut self, segments: Vec<Segment>) -> Self {
        self.segments = segments;
        self
    }

    /// Set the persistence scope.
    #[must_use]
    pub const fn persistence(mut self, scope: PersistenceScope) -> Self {
        self.persistence = scope;
        self
    }

    /// Set the opt-in participation rate in (0, 1].
    ///
    /// Visitors falling outside the rate are held back to the first
    /// (control) segment. At 1.0 every visitor gets a weighted draw and
    /// no participation roll is consumed.
    #[must_use]
    pub const fn participation(mut self, rate: f64) -> Self {
        self.participation = rate;
        self
    }

    /// Override the storage key (default `exp_<experiment_id>_segment`).
    #[must_use]
    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = Some(key.into());
        self
    }

    /// Build the `ExperimentContext`.
    #[must_use]
    pub fn build(self) -> ExperimentContext {
        let storage_key = self
            .storage_key
            .unwrap_or_else(|| default_storage_key(self.experiment_id));
        ExperimentContext {
            experiment_id: self.experiment_id,
            project_id: self.project_id,
            segments: self.segments,
            persistence: self.persistence,
            participation: self.participation,
            storage_key,
        }
    }
}
