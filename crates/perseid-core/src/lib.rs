//! Core types and traits for the Perseid particle propagation framework.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the Perseid workspace:
//! the 3-vector and unit tables, particle identity helpers, the
//! [`Candidate`] transport state, error types, and the [`Module`] and
//! [`ObserverFeature`] traits every pipeline stage implements.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod candidate;
pub mod error;
pub mod nucleus;
pub mod traits;
pub mod units;
pub mod vector;

pub use candidate::{Candidate, ParticleState};
pub use error::{ConfigError, ModuleError, RunError};
pub use traits::{DetectionState, Module, ObserverFeature, ParticleIdSet};
pub use vector::Vector3;
