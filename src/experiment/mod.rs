//! Experiment configuration schema
//!
//! This module provides the static, build-time configuration records that
//! drive bucketing: the variant table and the per-experiment settings the
//! assigner consults.
//!
//! ## Schema Overview
//!
//! ```text
//! ExperimentRegistry (1) ──< ExperimentContext (N)
//!                                  │
//!                                  └──< Segment (N, ordered)
//!                                           │
//!                                           └── SegmentSnapshot [persisted]
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use cohort::experiment::{ExperimentContext, PersistenceScope, Segment};
//!
//! let context = ExperimentContext::builder(5, 1)
//!     .segment(Segment::builder(9, "A", 0.5).preview_token("oOwLEFn97lM").build())
//!     .segment(Segment::builder(10, "B", 0.5).preview_token("4QU_6QcF_QY").build())
//!     .persistence(PersistenceScope::Durable)
//!     .build();
//!
//! assert_eq!(context.storage_key(), "exp_5_segment");
//! ```

mod context;
mod registry;
mod segment;

pub use context::{ExperimentContext, ExperimentContextBuilder, PersistenceScope};
pub use registry::ExperimentRegistry;
pub use segment::{Segment, SegmentBuilder, SegmentSnapshot};
