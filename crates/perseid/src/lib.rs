//! Perseid: simulation of high-energy particle propagation through
//! astrophysical environments.
//!
//! This is the top-level facade crate that re-exports the public API
//! from all Perseid sub-crates. For most users, adding `perseid` as a
//! single dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use perseid::prelude::*;
//! use perseid::core::nucleus::nucleus_id;
//! use perseid::core::units::{EEV, KPC, NANOGAUSS};
//! use std::sync::Arc;
//!
//! // a 1 nG field along z, and a proton starting at the origin
//! let field: Arc<dyn MagneticField> =
//!     Arc::new(UniformMagneticField::new(Vector3::Z * NANOGAUSS));
//! let mut candidate = Candidate::new(
//!     ParticleState::new(nucleus_id(1, 1), 1.0 * EEV, Vector3::ZERO, Vector3::X),
//!     0.0,
//! );
//!
//! // diffuse along the field until 100 kpc of path have accumulated
//! let sde = DiffusionSde::builder().field(field).seed(1).build().unwrap();
//! let mut pipeline = ModuleList::new();
//! pipeline.add(Arc::new(sde));
//! pipeline.add(Arc::new(MaximumTrajectoryLength::new(100.0 * KPC)));
//! pipeline.set_max_steps(100_000);
//!
//! pipeline.run(&mut candidate).unwrap();
//! assert!(!candidate.is_active());
//! assert!(candidate.trajectory_length() >= 100.0 * KPC);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`core`] | `perseid-core` | `Candidate`, units, nucleus ids, traits, errors |
//! | [`fields`] | `perseid-fields` | Magnetic field evaluators |
//! | [`modules`] | `perseid-modules` | Reference modules (loss, filter, observer, SDE) |
//! | [`engine`] | `perseid-engine` | The `ModuleList` pipeline engine |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits, units, and errors (`perseid-core`).
pub use perseid_core as core;

/// Magnetic field evaluators (`perseid-fields`).
pub use perseid_fields as fields;

/// Reference pipeline modules (`perseid-modules`).
pub use perseid_modules as modules;

/// The pipeline engine (`perseid-engine`).
pub use perseid_engine as engine;

/// The most commonly used items, re-exported for glob import.
pub mod prelude {
    pub use perseid_core::{
        Candidate, ConfigError, DetectionState, Module, ModuleError, ObserverFeature,
        ParticleState, RunError, Vector3,
    };
    pub use perseid_engine::ModuleList;
    pub use perseid_fields::{MagneticField, MagneticFieldList, UniformMagneticField};
    pub use perseid_modules::{
        DetectionAction, DiffusionSde, ElectronPairProduction, LossRateTable,
        MaximumTrajectoryLength, MinimumEnergy, Observer, ObserverParticleIdVeto,
        ObserverSurface, ObserverTrackLength, ParticleFilter,
    };
}
