//! Bucket assignment
//!
//! Resolves which segment a visitor sees, with a fixed precedence:
//! preview override, then persisted (sticky) assignment, then a weighted
//! random draw. Overrides bypass persistence entirely and are never
//! written back; a persisted value referencing a segment that no longer
//! exists re-rolls.
//!
//! ## Draw semantics
//!
//! The weighted draw walks segments in declared order accumulating
//! weights and selects the first segment whose cumulative weight exceeds
//! the rolled value. Each segment therefore owns a half-open interval:
//! with boundaries `[0, 0.4, 1.0]` a roll of exactly 0.4 lands in the
//! second segment. If rounding leaves the roll above the final cumulative
//! weight, the last segment is selected — misconfigured weight tables
//! degrade deterministically instead of erroring.

mod random;

pub use random::{RandomSource, SequenceSource, ThreadRngSource};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::experiment::{ExperimentContext, Segment, SegmentSnapshot};
use crate::{Error, Result};

/// Which path produced an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignmentSource {
    /// A preview token forced the segment (never persisted).
    Override,
    /// A persisted assignment was reused.
    Sticky,
    /// A fresh weighted draw selected the segment.
    Drawn,
    /// The visitor fell outside the participation rate and was held
    /// back to the control segment.
    Holdback,
}

impl AssignmentSource {
    /// Whether this assignment was newly decided (and should be
    /// persisted for experiments that use persistence).
    #[must_use]
    pub const fn is_fresh(self) -> bool {
        matches!(self, Self::Drawn | Self::Holdback)
    }
}

/// A resolved per-visitor assignment for one experiment.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    segment: Segment,
    source: AssignmentSource,
}

impl Assignment {
    /// Get the resolved segment.
    #[must_use]
    pub const fn segment(&self) -> &Segment {
        &self.segment
    }

    /// Get which path produced the assignment.
    #[must_use]
    pub const fn source(&self) -> AssignmentSource {
        self.source
    }

    /// Consume the assignment, returning the segment.
    #[must_use]
    pub fn into_segment(self) -> Segment {
        self.segment
    }
}

/// Select a segment by cumulative weight for a roll in `[0, 1)`.
///
/// Walks `segments` in declared order and returns the first whose
/// cumulative weight strictly exceeds `roll`; a roll beyond the total
/// (weights summing below 1.0) falls to the last segment. Returns `None`
/// only for an empty table.
#[must_use]
pub fn select_weighted(segments: &[Segment], roll: f64) -> Option<&Segment> {
    let mut cumulative = 0.0;
    for segment in segments {
        cumulative += segment.weight();
        if roll < cumulative {
            return Some(segment);
        }
    }
    segments.last()
}

/// Resolve the segment a visitor sees for `context`.
///
/// Precedence: `override_token` matching a segment's preview token wins
/// outright; otherwise a `persisted` snapshot naming a live segment is
/// reused; otherwise the participation gate and weighted draw decide.
/// The caller persists fresh assignments (see
/// [`AssignmentSource::is_fresh`]) — resolution itself never touches
/// storage.
///
/// # Errors
///
/// Returns [`Error::EmptySegments`] if the context has no segments.
pub fn resolve(
    context: &ExperimentContext,
    override_token: Option<&str>,
    persisted: Option<&SegmentSnapshot>,
    random: &dyn RandomSource,
) -> Result<Assignment> {
    let segments = context.segments();
    if segments.is_empty() {
        return Err(Error::EmptySegments {
            experiment_id: context.experiment_id(),
        });
    }

    if let Some(token) = override_token {
        if let Some(segment) = context.segment_by_preview(token) {
            debug!(
                experiment_id = context.experiment_id(),
                segment_id = segment.id(),
                "preview token forced segment"
            );
            return Ok(Assignment {
                segment: segment.clone(),
                source: AssignmentSource::Override,
            });
        }
        // Unrecognized token: normal assignment path, not an error.
        debug!(
            experiment_id = context.experiment_id(),
            "preview token not recognized, falling through"
        );
    }

    if let Some(snapshot) = persisted {
        if let Some(segment) = context.segment_by_id(snapshot.id) {
            return Ok(Assignment {
                segment: segment.clone(),
                source: AssignmentSource::Sticky,
            });
        }
        debug!(
            experiment_id = context.experiment_id(),
            stored_id = snapshot.id,
            "persisted segment no longer exists, re-rolling"
        );
    }

    // Participation gate. At a rate of 1.0 no roll is consumed, so
    // scripted sources see exactly one draw per resolution.
    if context.participation() < 1.0 && random.next_f64() >= context.participation() {
        let control = &segments[0];
        return Ok(Assignment {
            segment: control.clone(),
            source: AssignmentSource::Holdback,
        });
    }

    let roll = random.next_f64();
    let segment = select_weighted(segments, roll).ok_or(Error::EmptySegments {
        experiment_id: context.experiment_id(),
    })?;

    Ok(Assignment {
        segment: segment.clone(),
        source: AssignmentSource::Drawn,
    })
}
