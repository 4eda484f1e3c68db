//! The [`Candidate`] transport state and its [`ParticleState`] snapshots.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::nucleus::{charge_number, is_nucleus, mass_number};
use crate::units::ELEMENTARY_CHARGE;
use crate::vector::Vector3;

/// Counter for unique candidate serial allocation.
static CANDIDATE_SERIAL_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Kinematic snapshot of one particle: identity, energy, position, and
/// direction.
///
/// The direction is stored normalized; [`ParticleState::set_direction`]
/// normalizes its argument and ignores a zero vector, so transport code
/// can always consume the stored direction as a unit vector.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleState {
    id: i32,
    energy: f64,
    position: Vector3,
    direction: Vector3,
}

impl ParticleState {
    /// Create a state from identity code, energy (J), position (m), and
    /// direction (normalized on construction).
    pub fn new(id: i32, energy: f64, position: Vector3, direction: Vector3) -> Self {
        let mut s = Self {
            id,
            energy,
            position,
            direction: Vector3::X,
        };
        s.set_direction(direction);
        s
    }

    /// Signed particle identity code.
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Set the particle identity code.
    pub fn set_id(&mut self, id: i32) {
        self.id = id;
    }

    /// Current energy in joule.
    pub fn energy(&self) -> f64 {
        self.energy
    }

    /// Set the energy in joule.
    pub fn set_energy(&mut self, energy: f64) {
        self.energy = energy;
    }

    /// Current position in meters.
    pub fn position(&self) -> Vector3 {
        self.position
    }

    /// Set the position in meters.
    pub fn set_position(&mut self, position: Vector3) {
        self.position = position;
    }

    /// Current unit direction of travel.
    pub fn direction(&self) -> Vector3 {
        self.direction
    }

    /// Set the direction of travel. The argument is normalized; a zero
    /// vector leaves the stored direction unchanged.
    pub fn set_direction(&mut self, direction: Vector3) {
        if direction.norm() > 0.0 {
            self.direction = direction.unit();
        }
    }

    /// Whether this particle is a nucleus (or anti-nucleus).
    pub fn is_nucleus(&self) -> bool {
        is_nucleus(self.id)
    }

    /// Mass number `A`. Zero for non-nucleus species.
    pub fn mass_number(&self) -> u32 {
        mass_number(self.id)
    }

    /// Signed charge number `Z`. Zero for non-nucleus species.
    pub fn charge_number(&self) -> i32 {
        charge_number(self.id)
    }

    /// Electric charge in coulomb. Zero for non-nucleus species, which
    /// transport modules treat as neutral.
    pub fn charge(&self) -> f64 {
        f64::from(self.charge_number()) * ELEMENTARY_CHARGE
    }
}

/// One simulated particle trajectory: kinematics plus propagation
/// bookkeeping.
///
/// `current` is the live state mutated in place by each module of a
/// pipeline pass; `previous` is an explicit value snapshot taken by
/// transport modules before they mutate the candidate, used for
/// step rollback and crossing detection. It is a copy, not a pointer
/// into history.
#[derive(Clone, Debug)]
pub struct Candidate {
    /// Live kinematic state, mutated in place by modules.
    pub current: ParticleState,
    /// Snapshot of the state before the most recent transport step.
    pub previous: ParticleState,
    redshift: f64,
    trajectory_length: f64,
    current_step: f64,
    next_step: f64,
    active: bool,
    detected: bool,
    serial: u64,
}

impl Candidate {
    /// Create an active candidate from an initial state.
    ///
    /// `previous` starts equal to `current`; trajectory length and the
    /// working step sizes start at zero — the first transport module
    /// clamps the step into its configured bounds.
    pub fn new(state: ParticleState, redshift: f64) -> Self {
        Self {
            current: state,
            previous: state,
            redshift,
            trajectory_length: 0.0,
            current_step: 0.0,
            next_step: 0.0,
            active: true,
            detected: false,
            serial: CANDIDATE_SERIAL_COUNTER.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Process-unique serial number, allocated from a monotonic atomic
    /// counter at construction.
    ///
    /// Cloning a candidate preserves its serial, so a cloned candidate
    /// replays the exact same stochastic trajectory under a seeded
    /// transport module.
    pub fn serial(&self) -> u64 {
        self.serial
    }

    /// Whether the candidate is still being propagated.
    ///
    /// A candidate is only processable while it is active and its
    /// energy is positive; modules must leave inactive candidates
    /// untouched.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Remove the candidate from further propagation. A normal terminal
    /// state, not an error.
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Whether an observer has flagged this candidate as detected.
    pub fn is_detected(&self) -> bool {
        self.detected
    }

    /// Flag the candidate as detected.
    pub fn mark_detected(&mut self) {
        self.detected = true;
    }

    /// Cosmological redshift at the current position.
    pub fn redshift(&self) -> f64 {
        self.redshift
    }

    /// Set the redshift.
    pub fn set_redshift(&mut self, z: f64) {
        self.redshift = z;
    }

    /// Total path length traveled so far, in meters.
    pub fn trajectory_length(&self) -> f64 {
        self.trajectory_length
    }

    /// Accumulate traveled path length.
    pub fn add_trajectory_length(&mut self, step: f64) {
        self.trajectory_length += step;
    }

    /// The step length the current pipeline pass was propagated with.
    pub fn current_step(&self) -> f64 {
        self.current_step
    }

    /// Record the step length used by the current pipeline pass.
    pub fn set_current_step(&mut self, step: f64) {
        self.current_step = step;
    }

    /// The step length proposed for the next pipeline pass.
    pub fn next_step(&self) -> f64 {
        self.next_step
    }

    /// Propose a step length for the next pipeline pass.
    pub fn set_next_step(&mut self, step: f64) {
        self.next_step = step;
    }

    /// Shrink the proposed next step to at most `step`. Modules such as
    /// break conditions use this to stop the trajectory exactly at a
    /// boundary instead of overshooting it.
    pub fn limit_next_step(&mut self, step: f64) {
        self.next_step = self.next_step.min(step);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nucleus::nucleus_id;
    use crate::units::{EEV, ELEMENTARY_CHARGE};

    fn proton(energy: f64) -> Candidate {
        Candidate::new(
            ParticleState::new(nucleus_id(1, 1), energy, Vector3::ZERO, Vector3::X),
            0.0,
        )
    }

    #[test]
    fn serials_are_unique() {
        let a = proton(1.0 * EEV);
        let b = proton(1.0 * EEV);
        assert_ne!(a.serial(), b.serial());
    }

    #[test]
    fn clone_preserves_serial() {
        let a = proton(1.0 * EEV);
        let b = a.clone();
        assert_eq!(a.serial(), b.serial());
    }

    #[test]
    fn direction_setter_normalizes() {
        let mut s = ParticleState::new(1, 1.0, Vector3::ZERO, Vector3::new(0.0, 3.0, 4.0));
        assert!((s.direction().norm() - 1.0).abs() < 1e-15);
        let kept = s.direction();
        s.set_direction(Vector3::ZERO);
        assert_eq!(s.direction(), kept);
    }

    #[test]
    fn proton_charge() {
        let c = proton(1.0 * EEV);
        assert_eq!(c.current.charge_number(), 1);
        assert!((c.current.charge() - ELEMENTARY_CHARGE).abs() < 1e-30);
    }

    #[test]
    fn non_nucleus_is_neutral() {
        let s = ParticleState::new(23, 1.0, Vector3::ZERO, Vector3::X);
        assert_eq!(s.charge(), 0.0);
    }

    #[test]
    fn limit_next_step_only_shrinks() {
        let mut c = proton(1.0 * EEV);
        c.set_next_step(10.0);
        c.limit_next_step(25.0);
        assert_eq!(c.next_step(), 10.0);
        c.limit_next_step(4.0);
        assert_eq!(c.next_step(), 4.0);
    }

    #[test]
    fn deactivation_and_detection_flags() {
        let mut c = proton(1.0 * EEV);
        assert!(c.is_active());
        assert!(!c.is_detected());
        c.mark_detected();
        c.deactivate();
        assert!(!c.is_active());
        assert!(c.is_detected());
    }
}
