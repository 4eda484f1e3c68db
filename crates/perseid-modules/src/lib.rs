//! Reference modules for the Perseid propagation pipeline.
//!
//! Every type here implements the object-safe
//! [`Module`](perseid_core::Module) contract, so user-defined modules —
//! including ones registered from a host binding layer — compose with
//! these in the same pipeline without distinction.
//!
//! | Module | Concern |
//! |--------|---------|
//! | [`ElectronPairProduction`] | Continuous energy loss from a tabulated rate |
//! | [`ParticleFilter`] | Identity-based accept/reject branching |
//! | [`Observer`] | Detection against a set of observer features |
//! | [`MinimumEnergy`], [`MaximumTrajectoryLength`] | Break conditions |
//! | [`DiffusionSde`] | Adaptive Euler–Maruyama diffusive transport |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod break_condition;
pub mod diffusion_sde;
pub mod interpolate;
pub mod observer;
pub mod pair_production;
pub mod particle_filter;

pub use break_condition::{MaximumTrajectoryLength, MinimumEnergy};
pub use diffusion_sde::DiffusionSde;
pub use interpolate::{interpolate, LossRateTable};
pub use observer::{
    DetectionAction, Observer, ObserverParticleIdVeto, ObserverSurface, ObserverTrackLength,
};
pub use pair_production::ElectronPairProduction;
pub use particle_filter::ParticleFilter;
