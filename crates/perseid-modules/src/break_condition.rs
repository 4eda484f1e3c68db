//! Break conditions: modules that end a trajectory as a normal
//! terminal state, never as an error.

use perseid_core::{Candidate, Module, ModuleError};

/// Deactivates candidates whose energy drops below a threshold.
#[derive(Clone, Copy, Debug)]
pub struct MinimumEnergy {
    threshold: f64,
}

impl MinimumEnergy {
    /// Deactivate below `threshold` joule.
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl Module for MinimumEnergy {
    fn name(&self) -> &str {
        "MinimumEnergy"
    }

    fn process(&self, candidate: &mut Candidate) -> Result<(), ModuleError> {
        if !candidate.is_active() {
            return Ok(());
        }
        if candidate.current.energy() < self.threshold {
            candidate.deactivate();
        }
        Ok(())
    }
}

/// Deactivates candidates once their trajectory length exceeds a
/// maximum, and shrinks the proposed next step so the trajectory stops
/// at the boundary instead of overshooting it.
#[derive(Clone, Copy, Debug)]
pub struct MaximumTrajectoryLength {
    max_length: f64,
}

impl MaximumTrajectoryLength {
    /// Deactivate beyond `max_length` meters of accumulated path.
    pub fn new(max_length: f64) -> Self {
        Self { max_length }
    }
}

impl Module for MaximumTrajectoryLength {
    fn name(&self) -> &str {
        "MaximumTrajectoryLength"
    }

    fn process(&self, candidate: &mut Candidate) -> Result<(), ModuleError> {
        if !candidate.is_active() {
            return Ok(());
        }
        let traveled = candidate.trajectory_length();
        if traveled >= self.max_length {
            candidate.deactivate();
        } else {
            candidate.limit_next_step(self.max_length - traveled);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use perseid_core::units::{EEV, KPC};
    use perseid_core::{ParticleState, Vector3};

    fn candidate(energy: f64) -> Candidate {
        Candidate::new(
            ParticleState::new(1, energy, Vector3::ZERO, Vector3::X),
            0.0,
        )
    }

    #[test]
    fn minimum_energy_deactivates_below_threshold() {
        let brk = MinimumEnergy::new(1.0 * EEV);
        let mut low = candidate(0.5 * EEV);
        let mut high = candidate(2.0 * EEV);
        brk.process(&mut low).unwrap();
        brk.process(&mut high).unwrap();
        assert!(!low.is_active());
        assert!(high.is_active());
    }

    #[test]
    fn maximum_length_limits_next_step_then_deactivates() {
        let brk = MaximumTrajectoryLength::new(10.0 * KPC);
        let mut c = candidate(1.0 * EEV);
        c.set_next_step(100.0 * KPC);
        c.add_trajectory_length(7.0 * KPC);

        brk.process(&mut c).unwrap();
        assert!(c.is_active());
        assert!((c.next_step() - 3.0 * KPC).abs() < 1e-3);

        c.add_trajectory_length(3.0 * KPC);
        brk.process(&mut c).unwrap();
        assert!(!c.is_active());
    }

    #[test]
    fn inactive_candidates_are_untouched() {
        let brk = MinimumEnergy::new(1.0 * EEV);
        let mut c = candidate(0.1 * EEV);
        c.deactivate();
        let next_step_before = c.next_step();
        brk.process(&mut c).unwrap();
        assert_eq!(c.next_step(), next_step_before);
    }
}
