//! Fire-and-forget delivery to the analytics webhook.
//!
//! One event is exactly one POST attempt. Delivery failures are logged
//! and dropped — tracking never blocks, errors, or panics on the path
//! that called it, including when no async runtime is running.

use std::time::Duration;

use tracing::{debug, warn};

use super::TrackingEvent;
use crate::Result;

/// Default webhook endpoint for tracking events.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:9000/webhook/event";

const DELIVERY_TIMEOUT_SECS: u64 = 10;

/// Best-effort emitter for tracking events.
///
/// `emit` dispatches the POST on the ambient Tokio runtime and returns
/// immediately; the caller never observes the outcome. A slow or dead
/// endpoint therefore cannot stall the flow being instrumented.
#[derive(Debug, Clone)]
pub struct EventEmitter {
    client: reqwest::Client,
    endpoint: String,
}

impl EventEmitter {
    /// Create an emitter posting to `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DELIVERY_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Get the webhook endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Dispatch `event` without awaiting delivery.
    ///
    /// Exactly one attempt is made; network failures, timeouts, and
    /// non-success statuses are swallowed with a diagnostic log entry.
    /// Outside a Tokio runtime the event is dropped (logged), not
    /// panicked on.
    pub fn emit(&self, event: TrackingEvent) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            debug!(
                event_id = %event.event_id(),
                "tracking: no async runtime available, dropping event"
            );
            return;
        };

        debug!(
            event_id = %event.event_id(),
            segment_id = event.segment_id(),
            experiment_id = event.experiment_id(),
            "tracking: dispatching event"
        );

        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        handle.spawn(async move {
            match client.post(&endpoint).json(&event).send().await {
                Ok(response) if response.status().is_success() => {
                    debug!(event_id = %event.event_id(), "tracking: event delivered");
                }
                Ok(response) => {
                    warn!(
                        event_id = %event.event_id(),
                        status = %response.status(),
                        "tracking: endpoint rejected event"
                    );
                }
                Err(e) => {
                    warn!(event_id = %event.event_id(), "tracking: delivery failed: {e}");
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experiment::{ExperimentContext, Segment};

    fn event() -> TrackingEvent {
        let segment = Segment::new(9, "A", 0.4);
        let context = ExperimentContext::new(5, 1, vec![segment.clone()]);
        TrackingEvent::new("signin_view", &segment, &context)
    }

    #[test]
    fn test_emit_without_runtime_does_not_panic() {
        let emitter = EventEmitter::new(DEFAULT_ENDPOINT).unwrap();
        // No Tokio runtime here: the event is dropped, the caller continues.
        emitter.emit(event());
    }

    #[tokio::test]
    async fn test_emit_to_unreachable_endpoint_is_swallowed() {
        // Reserved port 9 is not listening; the spawned delivery fails
        // but the calling code proceeds normally.
        let emitter = EventEmitter::new("http://127.0.0.1:9/webhook/event").unwrap();
        emitter.emit(event());
        emitter.emit(event());
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    #[test]
    fn test_endpoint_accessor() {
        let emitter = EventEmitter::new("http://localhost:9000/webhook/event").unwrap();
        assert_eq!(emitter.endpoint(), "http://localhost:9000/webhook/event");
    }
}
