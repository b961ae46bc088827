//! # Cohort: Embedded A/B Experiment Bucketing & Telemetry
//!
//! Cohort resolves which variant of an experiment a visitor sees and
//! reports what they did about it, without ever letting instrumentation
//! break the flow it instruments.
//!
//! ## Design Principles
//!
//! - **Override, then sticky, then random**: preview tokens win outright,
//!   persisted assignments are reused, and only then is a weighted draw
//!   rolled.
//! - **Degrade, don't break**: corrupt storage reads as absent, storage
//!   write failures are logged and swallowed, and event delivery is
//!   fire-and-forget with no retry.
//! - **Configuration over copies**: one parameterized assigner driven by
//!   per-experiment [`experiment::ExperimentContext`] records replaces
//!   per-experiment logic.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use cohort::experiment::{ExperimentContext, Segment};
//! use cohort::Experiments;
//!
//! # async fn example() -> cohort::Result<()> {
//! let experiments = Experiments::builder()
//!     .experiment(
//!         ExperimentContext::builder(5, 1)
//!             .segment(Segment::new(9, "A", 0.5))
//!             .segment(Segment::new(10, "B", 0.5))
//!             .build(),
//!     )
//!     .build()?;
//!
//! // Resolve once per render; the assignment is sticky per scope.
//! let assignment = experiments.resolve(5, Some("?tab=2")).await?;
//!
//! // Report milestones fire-and-forget.
//! experiments.track(5, &assignment, "signin_view", None);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod assign;
pub mod error;
pub mod experiment;
pub mod preview;
pub mod store;
pub mod track;

pub use error::{Error, Result};

use std::path::PathBuf;

use tracing::{debug, warn};

use assign::{Assignment, RandomSource, ThreadRngSource};
use experiment::{ExperimentContext, ExperimentRegistry, PersistenceScope};
use store::{AssignmentStore, FileStore, MemoryStore};
use track::{EventEmitter, TrackingEvent, DEFAULT_ENDPOINT};

/// Default path of the durable assignment document.
pub const DEFAULT_DURABLE_PATH: &str = "cohort_assignments.json";

/// The application-owned experimentation context.
///
/// Owns the experiment registry, both persistence scopes, the random
/// source, and the event emitter. Construction and teardown belong to
/// the embedding application; there is no process-wide singleton.
pub struct Experiments {
    registry: ExperimentRegistry,
    session_store: MemoryStore,
    durable_store: FileStore,
    emitter: EventEmitter,
    random: Box<dyn RandomSource>,
    preview_param: String,
}

impl Experiments {
    /// Create a new experiments builder.
    #[must_use]
    pub fn builder() -> ExperimentsBuilder {
        ExperimentsBuilder::new()
    }

    /// Get a registered experiment's configuration.
    #[must_use]
    pub fn context(&self, experiment_id: u64) -> Option<&ExperimentContext> {
        self.registry.get(experiment_id)
    }

    /// Get the session-scoped assignment store.
    #[must_use]
    pub const fn session_store(&self) -> &MemoryStore {
        &self.session_store
    }

    /// Get the durable assignment store.
    #[must_use]
    pub const fn durable_store(&self) -> &FileStore {
        &self.durable_store
    }

    /// Get the event emitter.
    #[must_use]
    pub const fn emitter(&self) -> &EventEmitter {
        &self.emitter
    }

    /// Resolve the visitor's segment for an experiment.
    ///
    /// `query` is the page's raw URL query string, consulted for the
    /// preview parameter. The store matching the experiment's
    /// [`PersistenceScope`] is read for a sticky assignment and written
    /// back on a fresh draw; storage read failures degrade to a re-roll
    /// and write failures are logged and swallowed, so a broken store
    /// never breaks assignment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownExperiment`] for an unregistered ID and
    /// [`Error::EmptySegments`] for an experiment with no segments.
    pub async fn resolve(&self, experiment_id: u64, query: Option<&str>) -> Result<Assignment> {
        let context = self
            .registry
            .get(experiment_id)
            .ok_or(Error::UnknownExperiment { experiment_id })?;
        let token = query.and_then(|q| preview::extract_token(q, &self.preview_param));

        match context.persistence() {
            PersistenceScope::None => {
                assign::resolve(context, token, None, self.random.as_ref())
            }
            PersistenceScope::Session => {
                self.resolve_with_store(context, token, &self.session_store)
                    .await
            }
            PersistenceScope::Durable => {
                self.resolve_with_store(context, token, &self.durable_store)
                    .await
            }
        }
    }

    /// Build and emit a tracking event for a resolved assignment.
    ///
    /// Never fails: an unknown experiment ID drops the event with a
    /// diagnostic, and delivery itself is fire-and-forget.
    pub fn track(
        &self,
        experiment_id: u64,
        assignment: &Assignment,
        event_id: &str,
        user_id: Option<&str>,
    ) {
        let Some(context) = self.registry.get(experiment_id) else {
            debug!(experiment_id, "tracking: unknown experiment, dropping event");
            return;
        };

        let mut builder = TrackingEvent::builder(event_id, assignment.segment(), context);
        if let Some(user_id) = user_id {
            builder = builder.user_id(user_id);
        }
        self.emitter.emit(builder.build());
    }

    /// Emit a pre-built tracking event (for callers attaching metadata).
    pub fn track_event(&self, event: TrackingEvent) {
        self.emitter.emit(event);
    }

    async fn resolve_with_store<S: AssignmentStore>(
        &self,
        context: &ExperimentContext,
        token: Option<&str>,
        store: &S,
    ) -> Result<Assignment> {
        // A matching preview token bypasses persistence entirely: no
        // read, and the override is never written back.
        let overridden = token.is_some_and(|t| context.segment_by_preview(t).is_some());
        let persisted = if overridden {
            None
        } else {
            match store.get(context.storage_key()).await {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    debug!(
                        experiment_id = context.experiment_id(),
                        "treating unreadable persisted assignment as absent: {e}"
                    );
                    None
                }
            }
        };

        let assignment = assign::resolve(context, token, persisted.as_ref(), self.random.as_ref())?;

        if assignment.source().is_fresh() {
            if let Err(e) = store
                .set(context.storage_key(), assignment.segment().snapshot())
                .await
            {
                warn!(
                    experiment_id = context.experiment_id(),
                    "assignment store write failed, assignment still served: {e}"
                );
            }
        }

        Ok(assignment)
    }
}

/// Builder for [`Experiments`].
pub struct ExperimentsBuilder {
    contexts: Vec<ExperimentContext>,
    endpoint: String,
    preview_param: String,
    durable_path: PathBuf,
    random: Option<Box<dyn RandomSource>>,
}

impl Default for ExperimentsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ExperimentsBuilder {
    /// Create a builder with default endpoint, preview parameter, and
    /// durable-store path.
    #[must_use]
    pub fn new() -> Self {
        Self {
            contexts: Vec::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            preview_param: preview::DEFAULT_PREVIEW_PARAM.to_string(),
            durable_path: PathBuf::from(DEFAULT_DURABLE_PATH),
            random: None,
        }
    }

    /// Register an experiment.
    #[must_use]
    pub fn experiment(mut self, context: ExperimentContext) -> Self {
        self.contexts.push(context);
        self
    }

    /// Set the analytics webhook endpoint.
    #[must_use]
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the query parameter carrying preview tokens.
    #[must_use]
    pub fn preview_param(mut self, param: impl Into<String>) -> Self {
        self.preview_param = param.into();
        self
    }

    /// Set the path of the durable assignment document.
    #[must_use]
    pub fn durable_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.durable_path = path.into();
        self
    }

    /// Replace the random source (scripted draws for tests/QA tooling).
    #[must_use]
    pub fn random_source(mut self, random: impl RandomSource + 'static) -> Self {
        self.random = Some(Box::new(random));
        self
    }

    /// Build the [`Experiments`] context.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptySegments`] if a registered experiment has
    /// no segments, or a transport error if the HTTP client cannot be
    /// constructed.
    pub fn build(self) -> Result<Experiments> {
        let mut registry = ExperimentRegistry::new();
        for context in self.contexts {
            if context.segments().is_empty() {
                return Err(Error::EmptySegments {
                    experiment_id: context.experiment_id(),
                });
            }
            registry.register(context);
        }

        let emitter = EventEmitter::new(self.endpoint)?;
        let random: Box<dyn RandomSource> = self
            .random
            .unwrap_or_else(|| Box::new(ThreadRngSource::new()));

        Ok(Experiments {
            registry,
            session_store: MemoryStore::new(),
            durable_store: FileStore::open(self.durable_path),
            emitter,
            random,
            preview_param: self.preview_param,
        })
    }
}
