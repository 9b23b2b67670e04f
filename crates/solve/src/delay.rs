use std::time::{Duration, Instant};

use tracing::debug;

/// Enforces the server-mandated minimum wait before the answer may be
/// submitted. Time already spent extracting and evaluating is credited
/// against the wait, never added on top of it.
#[derive(Debug, Clone, Copy)]
pub struct DelayGate {
    started: Instant,
}

impl DelayGate {
    /// Anchor the gate at the moment the challenge response was read.
    pub fn start() -> Self {
        Self::at(Instant::now())
    }

    pub fn at(started: Instant) -> Self {
        Self { started }
    }

    /// `max(0, wait - elapsed)`
    pub fn remaining(&self, wait_millis: u64) -> Duration {
        Duration::from_millis(wait_millis).saturating_sub(self.started.elapsed())
    }

    /// Sleep out whatever is left of the mandated wait.
    pub async fn hold(&self, wait_millis: u64) {
        let remaining = self.remaining(wait_millis);
        if !remaining.is_zero() {
            debug!(
                millis = remaining.as_millis() as u64,
                "holding submission for the mandated delay"
            );
            tokio::time::sleep(remaining).await;
        }
    }
}
