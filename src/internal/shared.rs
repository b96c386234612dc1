use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio_util::sync::CancellationToken;

use crate::{Listener, RunId, RunState, internal::CancelledRun};

/// Status and listener of the current run, guarded by a single lock.
///
/// Whoever holds the lock is the only party allowed to change state or invoke
/// the listener. `generation` increases on every `start()` and `stop()`, so a
/// driver that wakes up after being superseded can tell.
#[derive(Default)]
pub(crate) struct Shared {
    pub state: RunState,
    pub step_index: usize,
    pub pass_index: usize,
    pub generation: u64,
    pub run_id: Option<RunId>,
    pub listener: Option<Box<dyn Listener>>,
}

impl Shared {
    /// Confirms that the run identified by `generation` still owns the
    /// sequencer. A run cancelled through its token is moved to `Stopped` and
    /// releases its listener.
    pub fn claim(
        &mut self,
        generation: u64,
        token: &CancellationToken,
    ) -> Result<(), CancelledRun> {
        if self.generation != generation {
            return Err(CancelledRun);
        }
        if token.is_cancelled() {
            if self.state.is_active() {
                self.state = RunState::Stopped;
                self.listener = None;
                tracing::debug!("Run stopped through its control");
            }
            return Err(CancelledRun);
        }
        Ok(())
    }
}

/// Locks the shared status, recovering from a listener that panicked while
/// the lock was held.
pub(crate) fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_rejects_stale_generation() {
        let token = CancellationToken::new();
        let mut shared = Shared {
            generation: 2,
            state: RunState::Running,
            ..Default::default()
        };
        assert_eq!(shared.claim(1, &token), Err(CancelledRun));
        assert_eq!(shared.state, RunState::Running);
        assert_eq!(shared.claim(2, &token), Ok(()));
    }

    #[test]
    fn test_claim_stops_cancelled_run() {
        let token = CancellationToken::new();
        let mut shared = Shared {
            state: RunState::Running,
            ..Default::default()
        };
        shared.listener = Some(Box::new(crate::NoopListener));
        token.cancel();
        assert_eq!(shared.claim(0, &token), Err(CancelledRun));
        assert_eq!(shared.state, RunState::Stopped);
        assert!(shared.listener.is_none());
    }
}
