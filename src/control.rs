use tokio_util::sync::CancellationToken;

use crate::RunId;

/// Handle given to listener callbacks for stopping the run they belong to.
///
/// `stop()` only flips the run's cancellation token, so it is safe to call
/// from inside [`Listener::on_step`](crate::Listener::on_step) while the
/// sequencer is delivering that very callback. The next scheduled step will
/// not fire and `on_done` will not be called.
#[derive(Debug, Clone)]
pub struct Control {
    run_id: RunId,
    token: CancellationToken,
}

impl Control {
    pub(crate) fn new(run_id: RunId, token: CancellationToken) -> Self {
        Self { run_id, token }
    }

    /// Stop the run. Idempotent.
    #[inline]
    pub fn stop(&self) {
        self.token.cancel();
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.token.is_cancelled()
    }

    #[inline]
    pub fn run_id(&self) -> RunId {
        self.run_id
    }
}
