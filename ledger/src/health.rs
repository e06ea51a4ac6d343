use std::sync::atomic::{AtomicBool, Ordering};

/// Per-process liveness flag consulted by the orchestrator's probe.
///
/// Starts healthy. `sabotage` is a one-way transition: nothing in the
/// process sets it back, only a restart does. Each replica owns its own
/// register; it is never persisted or shared.
#[derive(Debug)]
pub struct LivenessRegister {
    healthy: AtomicBool,
}

impl LivenessRegister {
    pub fn new() -> Self {
        Self {
            healthy: AtomicBool::new(true),
        }
    }

    pub fn probe(&self) -> bool {
        self.healthy.load(Ordering::Acquire)
    }

    /// Marks the process unhealthy. Returns whether this call flipped it.
    pub fn sabotage(&self) -> bool {
        let flipped = self.healthy.swap(false, Ordering::AcqRel);
        if flipped {
            tracing::warn!("liveness register sabotaged, probe will fail until restart");
        }
        flipped
    }
}

impl Default for LivenessRegister {
    fn default() -> Self {
        Self::new()
    }
}
