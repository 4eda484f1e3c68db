//! Shared fixtures for Perseid benchmarks.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

use std::sync::Arc;

use perseid_core::nucleus::nucleus_id;
use perseid_core::units::{EEV, EV, KPC, MPC, NANOGAUSS, PEV};
use perseid_core::{Candidate, ParticleState, Vector3};
use perseid_engine::ModuleList;
use perseid_fields::{MagneticField, UniformMagneticField};
use perseid_modules::{DiffusionSde, LossRateTable, MaximumTrajectoryLength};

/// A 1 EeV proton at the origin, heading along x.
pub fn reference_proton() -> Candidate {
    Candidate::new(
        ParticleState::new(nucleus_id(1, 1), 1.0 * EEV, Vector3::ZERO, Vector3::X),
        0.0,
    )
}

/// A uniform 1 nG field along z.
pub fn reference_field() -> Arc<dyn MagneticField> {
    Arc::new(UniformMagneticField::new(Vector3::Z * NANOGAUSS))
}

/// A diffusion integrator over [`reference_field`] with default knobs.
pub fn reference_sde() -> DiffusionSde {
    DiffusionSde::builder()
        .field(reference_field())
        .seed(42)
        .build()
        .expect("reference configuration is valid")
}

/// A transport pipeline that runs [`reference_proton`] to completion:
/// diffusion over [`reference_field`] with a 5 kpc trajectory guard.
pub fn reference_pipeline() -> ModuleList {
    let mut pipeline = ModuleList::new();
    pipeline.add(Arc::new(reference_sde()));
    pipeline.add(Arc::new(MaximumTrajectoryLength::new(5.0 * KPC)));
    pipeline.set_max_steps(10_000);
    pipeline
}

/// A geometric 64-row loss-rate table spanning 1 PeV to 1 EeV.
pub fn reference_table() -> LossRateTable {
    let n = 64;
    let (lo, hi) = ((1.0 * PEV).ln(), (1.0 * EEV).ln());
    let energies: Vec<f64> = (0..n)
        .map(|i| (lo + (hi - lo) * i as f64 / (n - 1) as f64).exp())
        .collect();
    let rates: Vec<f64> = (0..n).map(|i| (1 + i) as f64 * 1e3 * EV / MPC).collect();
    LossRateTable::from_columns(energies, rates, "bench").expect("bench table is valid")
}
