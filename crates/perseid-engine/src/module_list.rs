//! The [`ModuleList`] orchestrator.
//!
//! Holds an ordered module sequence and applies it to each active
//! candidate, one full pass per simulation step, until the candidate
//! reaches a terminal state: deactivated by a module (detection, break
//! condition) or stopped by one of the engine's guards.

use std::sync::Arc;
use std::thread;

use perseid_core::{Candidate, Module, RunError};

/// An ordered sequence of modules plus propagation guards.
///
/// # Execution model
///
/// Within one candidate, execution is strictly sequential: module N's
/// mutation is visible to module N+1, and the pass order is the
/// insertion order, so a run is deterministic given identical candidate
/// state and identical shared collaborators. Across candidates there is
/// no shared mutable state and no required ordering — [`Self::run_batch`]
/// exploits this by propagating candidates on a worker pool.
///
/// Guards are normal terminal states, not errors: a candidate exceeding
/// `max_steps` or `max_trajectory_length` is simply deactivated. A
/// pipeline with neither guard nor any deactivating module would loop
/// forever; configure at least one terminal condition.
pub struct ModuleList {
    modules: Vec<Arc<dyn Module>>,
    max_steps: Option<u64>,
    max_trajectory_length: Option<f64>,
}

impl Default for ModuleList {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleList {
    /// Create an empty module list with no guards.
    pub fn new() -> Self {
        Self {
            modules: Vec::new(),
            max_steps: None,
            max_trajectory_length: None,
        }
    }

    /// Append a module. Pass order is insertion order.
    pub fn add(&mut self, module: Arc<dyn Module>) {
        self.modules.push(module);
    }

    /// Number of modules in the list.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether the list has no modules.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Deactivate candidates after this many full pipeline passes.
    pub fn set_max_steps(&mut self, max_steps: u64) {
        self.max_steps = Some(max_steps);
    }

    /// Deactivate candidates beyond this trajectory length (meters).
    pub fn set_max_trajectory_length(&mut self, max_length: f64) {
        self.max_trajectory_length = Some(max_length);
    }

    /// Propagate one candidate until it reaches a terminal state.
    ///
    /// # Errors
    ///
    /// [`RunError::EmptyModuleList`] if no modules are registered, and
    /// [`RunError::ModuleFailed`] naming the module whose `process`
    /// returned an unrecoverable error; the candidate is left in its
    /// mid-pass state in that case.
    pub fn run(&self, candidate: &mut Candidate) -> Result<(), RunError> {
        if self.modules.is_empty() {
            return Err(RunError::EmptyModuleList);
        }

        let mut steps: u64 = 0;
        while candidate.is_active() {
            if let Some(max) = self.max_steps {
                if steps >= max {
                    candidate.deactivate();
                    break;
                }
            }
            if let Some(max) = self.max_trajectory_length {
                if candidate.trajectory_length() >= max {
                    candidate.deactivate();
                    break;
                }
            }

            for module in &self.modules {
                if !candidate.is_active() {
                    break;
                }
                module.process(candidate).map_err(|reason| {
                    RunError::ModuleFailed {
                        name: module.name().to_string(),
                        reason,
                    }
                })?;
            }
            steps += 1;
        }
        Ok(())
    }

    /// Propagate a batch of candidates on `threads` workers.
    ///
    /// Candidates are independent units of work distributed over a
    /// queue; each is propagated exactly as by [`Self::run`]. Because
    /// stochastic modules derive their noise from candidate state
    /// rather than scheduling, the result is identical to running the
    /// batch serially. All workers drain the queue even when a
    /// candidate fails; the first reported failure is returned.
    pub fn run_batch(
        &self,
        candidates: &mut [Candidate],
        threads: usize,
    ) -> Result<(), RunError> {
        if self.modules.is_empty() {
            return Err(RunError::EmptyModuleList);
        }

        let threads = threads.max(1);
        let (work_tx, work_rx) = crossbeam_channel::unbounded::<&mut Candidate>();
        for candidate in candidates.iter_mut() {
            // unbounded channel with live receiver: send cannot fail
            let _ = work_tx.send(candidate);
        }
        drop(work_tx);

        let (err_tx, err_rx) = crossbeam_channel::unbounded::<RunError>();
        thread::scope(|scope| {
            for _ in 0..threads {
                let work_rx = work_rx.clone();
                let err_tx = err_tx.clone();
                scope.spawn(move || {
                    while let Ok(candidate) = work_rx.recv() {
                        if let Err(e) = self.run(candidate) {
                            let _ = err_tx.send(e);
                        }
                    }
                });
            }
        });
        drop(err_tx);

        match err_rx.try_recv() {
            Ok(e) => Err(e),
            Err(_) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use perseid_core::nucleus::nucleus_id;
    use perseid_core::units::{EEV, KPC, NANOGAUSS};
    use perseid_core::{ModuleError, ParticleState, Vector3};
    use perseid_fields::{MagneticField, UniformMagneticField};
    use perseid_modules::{DiffusionSde, MaximumTrajectoryLength};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct PassCounter {
        calls: AtomicUsize,
    }
    impl PassCounter {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
            })
        }
        fn count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }
    impl Module for PassCounter {
        fn name(&self) -> &str {
            "PassCounter"
        }
        fn process(&self, _candidate: &mut Candidate) -> Result<(), ModuleError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct FailingModule;
    impl Module for FailingModule {
        fn name(&self) -> &str {
            "FailingModule"
        }
        fn process(&self, _candidate: &mut Candidate) -> Result<(), ModuleError> {
            Err(ModuleError::ExecutionFailed {
                reason: "broken".into(),
            })
        }
    }

    fn proton() -> Candidate {
        Candidate::new(
            ParticleState::new(nucleus_id(1, 1), 1.0 * EEV, Vector3::ZERO, Vector3::Y),
            0.0,
        )
    }

    #[test]
    fn empty_list_is_rejected() {
        let list = ModuleList::new();
        let mut c = proton();
        assert!(matches!(list.run(&mut c), Err(RunError::EmptyModuleList)));
        assert!(matches!(
            list.run_batch(&mut [], 2),
            Err(RunError::EmptyModuleList)
        ));
    }

    #[test]
    fn max_steps_guard_deactivates() {
        let counter = PassCounter::new();
        let mut list = ModuleList::new();
        list.add(Arc::clone(&counter) as Arc<dyn Module>);
        list.set_max_steps(7);

        let mut c = proton();
        list.run(&mut c).unwrap();
        assert!(!c.is_active());
        assert_eq!(counter.count(), 7);
    }

    #[test]
    fn module_error_is_wrapped_with_the_name() {
        let mut list = ModuleList::new();
        list.add(Arc::new(FailingModule));
        let mut c = proton();
        match list.run(&mut c) {
            Err(RunError::ModuleFailed { name, .. }) => assert_eq!(name, "FailingModule"),
            other => panic!("expected ModuleFailed, got {other:?}"),
        }
    }

    #[test]
    fn pass_stops_once_a_module_deactivates() {
        struct Deactivate;
        impl Module for Deactivate {
            fn name(&self) -> &str {
                "Deactivate"
            }
            fn process(&self, candidate: &mut Candidate) -> Result<(), ModuleError> {
                candidate.deactivate();
                Ok(())
            }
        }

        let after = PassCounter::new();
        let mut list = ModuleList::new();
        list.add(Arc::new(Deactivate));
        list.add(Arc::clone(&after) as Arc<dyn Module>);

        let mut c = proton();
        list.run(&mut c).unwrap();
        assert!(!c.is_active());
        assert_eq!(after.count(), 0);
    }

    fn transport_list(max_length: f64) -> ModuleList {
        let field: Arc<dyn MagneticField> =
            Arc::new(UniformMagneticField::new(Vector3::Z * NANOGAUSS));
        let sde = DiffusionSde::builder().field(field).seed(7).build().unwrap();
        let mut list = ModuleList::new();
        list.add(Arc::new(sde));
        list.add(Arc::new(MaximumTrajectoryLength::new(max_length)));
        list.set_max_steps(10_000);
        list
    }

    #[test]
    fn trajectory_length_guard_terminates_transport() {
        let list = transport_list(50.0 * KPC);
        let mut c = proton();
        list.run(&mut c).unwrap();
        assert!(!c.is_active());
        assert!(c.trajectory_length() >= 50.0 * KPC);
    }

    #[test]
    fn batch_run_matches_serial_run() {
        let list = transport_list(20.0 * KPC);

        let mut serial: Vec<Candidate> = (0..16).map(|_| proton()).collect();
        let mut parallel = serial.clone();

        for c in serial.iter_mut() {
            list.run(c).unwrap();
        }
        list.run_batch(&mut parallel, 4).unwrap();

        for (s, p) in serial.iter().zip(parallel.iter()) {
            assert_eq!(s.current.position(), p.current.position());
            assert_eq!(s.trajectory_length(), p.trajectory_length());
            assert_eq!(s.is_active(), p.is_active());
        }
    }

    #[test]
    fn batch_reports_first_failure_but_drains_the_queue() {
        let counter = PassCounter::new();
        let mut list = ModuleList::new();
        list.add(Arc::clone(&counter) as Arc<dyn Module>);
        list.add(Arc::new(FailingModule));
        list.set_max_steps(1);

        let mut batch: Vec<Candidate> = (0..8).map(|_| proton()).collect();
        let result = list.run_batch(&mut batch, 3);
        assert!(matches!(result, Err(RunError::ModuleFailed { .. })));
        // every candidate was attempted before the error surfaced
        assert_eq!(counter.count(), 8);
    }
}
