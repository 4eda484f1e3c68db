//! Identity-based accept/reject branching of the module pipeline.

use std::sync::Arc;

use perseid_core::{Candidate, Module, ModuleError, ParticleIdSet};

/// Routes a candidate into one of two child module chains based on an
/// exact match of its particle identity code.
///
/// If the candidate's id is a member of the accepted set, every module
/// in the accept chain runs in insertion order; otherwise the reject
/// chain runs. There is no wildcard or partial matching. The filter
/// itself performs no kinematic mutation — whichever child chain runs
/// does — and an empty branch is a no-op, not an error.
#[derive(Default)]
pub struct ParticleFilter {
    accept_ids: ParticleIdSet,
    on_accept: Vec<Arc<dyn Module>>,
    on_reject: Vec<Arc<dyn Module>>,
}

impl ParticleFilter {
    /// Create a filter with an empty accepted-id set and empty branches.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a filter accepting the given identity codes.
    pub fn with_ids<I: IntoIterator<Item = i32>>(ids: I) -> Self {
        Self {
            accept_ids: ids.into_iter().collect(),
            on_accept: Vec::new(),
            on_reject: Vec::new(),
        }
    }

    /// Add an identity code to the accepted set.
    pub fn add_accept_id(&mut self, id: i32) {
        self.accept_ids.insert(id);
    }

    /// Whether an identity code is accepted.
    pub fn accepts(&self, id: i32) -> bool {
        self.accept_ids.contains(&id)
    }

    /// Append a module to the accept chain.
    pub fn on_accept(&mut self, module: Arc<dyn Module>) {
        self.on_accept.push(module);
    }

    /// Append a module to the reject chain.
    pub fn on_reject(&mut self, module: Arc<dyn Module>) {
        self.on_reject.push(module);
    }
}

impl Module for ParticleFilter {
    fn name(&self) -> &str {
        "ParticleFilter"
    }

    fn process(&self, candidate: &mut Candidate) -> Result<(), ModuleError> {
        if !candidate.is_active() {
            return Ok(());
        }
        let chain = if self.accepts(candidate.current.id()) {
            &self.on_accept
        } else {
            &self.on_reject
        };
        for module in chain {
            if !candidate.is_active() {
                break;
            }
            module.process(candidate)?;
        }
        Ok(())
    }
}
