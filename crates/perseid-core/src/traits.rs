//! The [`Module`] and [`ObserverFeature`] traits.
//!
//! Both traits are object-safe by design: the pipeline stores stages as
//! `Arc<dyn Module>` and observers store features as
//! `Arc<dyn ObserverFeature>`, so implementations registered from a
//! host binding layer are indistinguishable from native ones — same
//! dispatch, same state-mutation visibility, same error semantics.

use indexmap::IndexSet;

use crate::candidate::Candidate;
use crate::error::ModuleError;

/// A set of particle identity codes with deterministic insertion-order
/// iteration. Used for exact-match membership tests (no wildcards).
pub type ParticleIdSet = IndexSet<i32>;

/// A unit of work applied once per candidate per pipeline pass.
///
/// # Contract
///
/// - `process()` mutates the candidate in place and must be safely
///   callable repeatedly.
/// - A module owns no per-candidate state; configuration is fixed at
///   construction and collaborators (fields, tables) are shared
///   immutable resources. Candidates may therefore be processed
///   concurrently with no ordering between them.
/// - An inactive candidate (or one with non-positive energy) must be
///   left untouched.
/// - `Err` is reserved for unrecoverable execution failures; expected
///   physical branches early-return `Ok(())`.
pub trait Module: Send + Sync {
    /// Human-readable name for error reporting.
    fn name(&self) -> &str;

    /// Apply this module to a candidate.
    fn process(&self, candidate: &mut Candidate) -> Result<(), ModuleError>;
}

/// Outcome of one detection-condition evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DetectionState {
    /// The condition is not met; evaluation continues.
    NotDetected,
    /// The condition is met; the observer records a detection.
    Detected,
    /// The candidate is excluded from detection; evaluation aborts.
    Veto,
}

/// A single detection condition evaluated by an observer.
///
/// Takes `&self`: a feature is stateless from the observer's
/// perspective, but may carry interior-mutable state (e.g. a counter)
/// since features are shared across observers through `Arc`. Evaluation
/// must never fail for ordinary candidate states — configuration
/// problems are rejected at construction, not here.
pub trait ObserverFeature: Send + Sync {
    /// Human-readable name of the feature.
    fn name(&self) -> &str;

    /// Evaluate the detection condition for a candidate.
    fn check_detection(&self, candidate: &Candidate) -> DetectionState;
}
