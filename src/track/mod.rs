//! Event telemetry
//!
//! Structured analytics events attributed to a resolved assignment, and a
//! fire-and-forget emitter that delivers them to a webhook endpoint.
//! Delivery is at-most-once and best-effort by design: no retry, no
//! queue, no batching, and failures are unobservable by the caller.

mod emitter;

pub use emitter::{EventEmitter, DEFAULT_ENDPOINT};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::experiment::{ExperimentContext, Segment};

/// A single analytics event, always attributable to exactly one resolved
/// assignment at the moment it fires.
///
/// Wire schema (snake_case JSON): `event_id`, `segment_id`,
/// `segment_name`, `experiment_id`, `project_id`, `timestamp` (ISO-8601),
/// optional `user_id`, and an open `metadata` map.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackingEvent {
    event_id: String,
    segment_id: u64,
    segment_name: String,
    experiment_id: u64,
    project_id: u64,
    timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<String>,
    #[serde(default)]
    metadata: serde_json::Map<String, serde_json::Value>,
}

impl TrackingEvent {
    /// Create an event for `segment` under `context`, stamped now.
    ///
    /// # Arguments
    ///
    /// * `event_id` - Action tag (e.g. `signin_view`, `signin_attempt`)
    /// * `segment` - The resolved segment the visitor saw
    /// * `context` - The owning experiment configuration
    #[must_use]
    pub fn new(event_id: impl Into<String>, segment: &Segment, context: &ExperimentContext) -> Self {
        Self {
            event_id: event_id.into(),
            segment_id: segment.id(),
            segment_name: segment.name().to_string(),
            experiment_id: context.experiment_id(),
            project_id: context.project_id(),
            timestamp: Utc::now(),
            user_id: None,
            metadata: serde_json::Map::new(),
        }
    }

    /// Create a builder for constructing an event with optional fields.
    #[must_use]
    pub fn builder(
        event_id: impl Into<String>,
        segment: &Segment,
        context: &ExperimentContext,
    ) -> TrackingEventBuilder {
        TrackingEventBuilder::new(event_id, segment, context)
    }

    /// Get the action tag.
    #[must_use]
    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    /// Get the assigned segment's ID.
    #[must_use]
    pub const fn segment_id(&self) -> u64 {
        self.segment_id
    }

    /// Get the assigned segment's name.
    #[must_use]
    pub fn segment_name(&self) -> &str {
        &self.segment_name
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

    /// Get the event timestamp.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Get the visitor's user ID, if known.
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Get the open metadata map.
    #[must_use]
    pub const fn metadata(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.metadata
    }
}

/// Builder for `TrackingEvent`.
#[derive(Debug)]
pub struct TrackingEventBuilder {
    event: TrackingEvent,
}

impl TrackingEventBuilder {
    /// Create a new builder with required fields.
    #[must_use]
    pub fn new(
        event_id: impl Into<String>,
        segment: &Segment,
        context: &ExperimentContext,
    ) -> Self {
        Self {
            event: TrackingEvent::new(event_id, segment, context),
        }
    }

    /// Attach the authenticated visitor's user ID.
    #[must_use]
    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.event.user_id = Some(user_id.into());
        self
    }

    /// Add one metadata entry.
    #[must_use]
    pub fn metadata_entry(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.event.metadata.insert(key.into(), value);
        self
    }

    /// Replace the metadata map wholesale.
    #[must_use]
    pub fn metadata(mut self, metadata: serde_json::Map<String, serde_json::Value>) -> Self {
        self.event.metadata = metadata;
        self
    }

    /// Set a custom timestamp (useful for deserialization/testing).
    #[must_use]
    pub const fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.event.timestamp = timestamp;
        self
    }

    /// Build the `TrackingEvent`.
    #[must_use]
    pub fn build(self) -> TrackingEvent {
        self.event
    }
}
