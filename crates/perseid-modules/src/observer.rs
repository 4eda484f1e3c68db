//! Observers: detection-condition evaluation against a set of features.

use std::sync::Arc;

use perseid_core::{
    Candidate, DetectionState, Module, ModuleError, ObserverFeature, ParticleIdSet, Vector3,
};

/// What an observer does to a candidate once it is detected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DetectionAction {
    /// Flag the candidate as detected and deactivate it. Removal of
    /// deactivated candidates is the caller's concern.
    Deactivate,
    /// Flag the candidate as detected and keep propagating it.
    FlagOnly,
}

/// Evaluates an ordered set of [`ObserverFeature`]s against a candidate.
///
/// # Aggregation policy
///
/// Every feature is evaluated in insertion order and detection is an OR
/// over their results; a feature's internal side effects therefore
/// occur exactly once per `process` call. The single short-circuit is
/// [`DetectionState::Veto`]: the first vetoing feature aborts the scan
/// and the overall result is `Veto`, detection or not.
pub struct Observer {
    features: Vec<Arc<dyn ObserverFeature>>,
    action: DetectionAction,
}

impl Observer {
    /// Create an observer with no features and the given on-detection
    /// action. An observer without features never detects.
    pub fn new(action: DetectionAction) -> Self {
        Self {
            features: Vec::new(),
            action,
        }
    }

    /// Append a feature. Features are shared and may belong to several
    /// observers at once.
    pub fn add(&mut self, feature: Arc<dyn ObserverFeature>) {
        self.features.push(feature);
    }

    /// The configured on-detection action.
    pub fn action(&self) -> DetectionAction {
        self.action
    }

    /// Evaluate all features and aggregate their decisions.
    ///
    /// Pure with respect to the candidate; the side effects of
    /// [`Module::process`] (flagging, deactivation) do not happen here.
    pub fn observe(&self, candidate: &Candidate) -> DetectionState {
        let mut overall = DetectionState::NotDetected;
        for feature in &self.features {
            match feature.check_detection(candidate) {
                DetectionState::Veto => return DetectionState::Veto,
                DetectionState::Detected => overall = DetectionState::Detected,
                DetectionState::NotDetected => {}
            }
        }
        overall
    }
}

impl Module for Observer {
    fn name(&self) -> &str {
        "Observer"
    }

    fn process(&self, candidate: &mut Candidate) -> Result<(), ModuleError> {
        if !candidate.is_active() {
            return Ok(());
        }
        if self.observe(candidate) == DetectionState::Detected {
            candidate.mark_detected();
            if self.action == DetectionAction::Deactivate {
                candidate.deactivate();
            }
        }
        Ok(())
    }
}

/// Detects a candidate crossing into a sphere from outside.
///
/// Fires when the current position lies within `radius` of `center`
/// while the previous-step position did not — entering trajectories
/// only, so a candidate created inside the sphere is not immediately
/// detected.
#[derive(Clone, Copy, Debug)]
pub struct ObserverSurface {
    center: Vector3,
    radius: f64,
}

impl ObserverSurface {
    /// Detection sphere at `center` (m) with `radius` (m).
    pub fn new(center: Vector3, radius: f64) -> Self {
        Self { center, radius }
    }
}

impl ObserverFeature for ObserverSurface {
    fn name(&self) -> &str {
        "ObserverSurface"
    }

    fn check_detection(&self, candidate: &Candidate) -> DetectionState {
        let now_inside = (candidate.current.position() - self.center).norm() <= self.radius;
        let was_inside = (candidate.previous.position() - self.center).norm() <= self.radius;
        if now_inside && !was_inside {
            DetectionState::Detected
        } else {
            DetectionState::NotDetected
        }
    }
}

/// Detects once the accumulated trajectory length exceeds a threshold.
#[derive(Clone, Copy, Debug)]
pub struct ObserverTrackLength {
    max_length: f64,
}

impl ObserverTrackLength {
    /// Detect at trajectory lengths above `max_length` (m).
    pub fn new(max_length: f64) -> Self {
        Self { max_length }
    }
}

impl ObserverFeature for ObserverTrackLength {
    fn name(&self) -> &str {
        "ObserverTrackLength"
    }

    fn check_detection(&self, candidate: &Candidate) -> DetectionState {
        if candidate.trajectory_length() > self.max_length {
            DetectionState::Detected
        } else {
            DetectionState::NotDetected
        }
    }
}

/// Vetoes candidates whose identity code is in a configured set,
/// excluding them from detection regardless of later features.
#[derive(Clone, Debug, Default)]
pub struct ObserverParticleIdVeto {
    ids: ParticleIdSet,
}

impl ObserverParticleIdVeto {
    /// Veto the given identity codes.
    pub fn new<I: IntoIterator<Item = i32>>(ids: I) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }
}

impl ObserverFeature for ObserverParticleIdVeto {
    fn name(&self) -> &str {
        "ObserverParticleIdVeto"
    }

    fn check_detection(&self, candidate: &Candidate) -> DetectionState {
        if self.ids.contains(&candidate.current.id()) {
            DetectionState::Veto
        } else {
            DetectionState::NotDetected
        }
    }
}
