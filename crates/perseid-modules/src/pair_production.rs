//! Continuous energy loss of nuclei through electron pair production
//! on a background photon field, driven by a tabulated loss rate.

use std::path::Path;
use std::sync::Arc;

use perseid_core::{Candidate, ConfigError, Module, ModuleError};

use crate::interpolate::{interpolate, LossRateTable};

/// Power-law index used to extrapolate the loss rate above the table.
const EXTRAPOLATION_INDEX: f64 = 0.4;

/// Energy loss from e+/e- pair production on background photons.
///
/// Applies only to charged nuclei. The loss rate is looked up per
/// nucleon at the redshift-boosted energy `E/A * (1+z)`; below the
/// table threshold the module is a no-op, above the table it
/// extrapolates with a power law. The per-step loss is clamped to the
/// candidate's energy, so energy never becomes negative and never
/// grows.
pub struct ElectronPairProduction {
    table: Arc<LossRateTable>,
}

impl ElectronPairProduction {
    /// Create the module from a loaded loss-rate table.
    pub fn new(table: Arc<LossRateTable>) -> Self {
        Self { table }
    }

    /// Create the module by loading the table from a data file.
    ///
    /// # Errors
    ///
    /// Fails before any candidate is processed if the file is missing,
    /// unreadable, or yields no usable rows.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Ok(Self::new(Arc::new(LossRateTable::from_file(path)?)))
    }

    /// The shared loss-rate table this module reads.
    pub fn table(&self) -> &Arc<LossRateTable> {
        &self.table
    }

    /// Loss rate per nucleon at energy `epa`, extrapolating above the
    /// tabulated range with a power law.
    fn rate_per_nucleon(&self, epa: f64) -> f64 {
        if epa < self.table.max_energy() {
            interpolate(epa, self.table.energies(), self.table.loss_rates())
        } else {
            let rates = self.table.loss_rates();
            rates[rates.len() - 1] * (epa / self.table.max_energy()).powf(EXTRAPOLATION_INDEX)
        }
    }

    /// Characteristic energy-loss length `E / (dE/dx)` for a particle
    /// of identity `id` at energy `e` (J), in meters.
    ///
    /// Returns `f64::INFINITY` for uncharged particles and energies
    /// below the tabulated threshold.
    pub fn energy_loss_length(&self, id: i32, e: f64) -> f64 {
        let z = f64::from(perseid_core::nucleus::charge_number(id).abs());
        if z < 1.0 {
            return f64::INFINITY;
        }
        let a = f64::from(perseid_core::nucleus::mass_number(id));
        let epa = e / a;
        if epa < self.table.min_energy() {
            return f64::INFINITY;
        }
        let rate = self.rate_per_nucleon(epa);
        e / (z * z * rate)
    }
}

impl Module for ElectronPairProduction {
    fn name(&self) -> &str {
        "ElectronPairProduction"
    }

    fn process(&self, candidate: &mut Candidate) -> Result<(), ModuleError> {
        if !candidate.is_active() {
            return Ok(());
        }
        if !candidate.current.is_nucleus() {
            return Ok(()); // this module only handles nucleons / nuclei
        }

        let z_num = f64::from(candidate.current.charge_number().abs());
        if z_num < 1.0 {
            return Ok(()); // no pair production on uncharged particles
        }

        let e = candidate.current.energy();
        if e <= 0.0 {
            return Ok(());
        }
        let a = f64::from(candidate.current.mass_number());
        let z = candidate.redshift();
        let epa = e / a * (1.0 + z);

        if epa < self.table.min_energy() {
            return Ok(()); // below the tabulated threshold
        }

        let rate = self.rate_per_nucleon(epa);

        // step size in the local frame: dx = dx_com / (1 + z)
        let step = candidate.current_step() / (1.0 + z);

        let mut de = z_num * z_num * rate * (1.0 + z).powi(2) * step;

        // the loss must not exceed the remaining energy
        de = de.min(e);
        candidate.current.set_energy(e - de);
        Ok(())
    }
}
