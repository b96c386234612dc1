use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use tokio::{select, time::Instant};
use tokio_util::sync::CancellationToken;

use crate::{
    ContinuePredicate, Control, DoneReason, RunState, Step,
    internal::{CancelledRun, Shared, lock},
    step,
};

/// Timer loop of a single run.
///
/// Step 0 of the first pass is fired synchronously by `Sequencer::start`;
/// the driver takes over from step 1. Every step is scheduled against the
/// start of its pass, so dwell times do not accumulate drift.
///
/// A driver dropped before its run settles leaves the run `Stopped` rather
/// than `Running`, including one unwound by a panicking listener.
pub(crate) struct Driver {
    pub(crate) shared: Arc<Mutex<Shared>>,
    pub(crate) steps: Arc<[Step]>,
    pub(crate) predicate: Box<dyn ContinuePredicate>,
    pub(crate) control: Control,
    pub(crate) token: CancellationToken,
    pub(crate) generation: u64,
    pub(crate) started_at: Instant,
    pub(crate) pass_gap: Duration,
    pub(crate) max_passes: Option<usize>,
    pub(crate) settled: bool,
}

impl Driver {
    pub async fn run(mut self) {
        match self.drive().await {
            Ok(()) => self.settled = true,
            // Dropping the driver records the stop if nobody else has.
            Err(CancelledRun) => tracing::trace!("Run cancelled"),
        }
    }

    async fn drive(&self) -> Result<(), CancelledRun> {
        let offsets = step::offsets(&self.steps);
        let pass_length = offsets[self.steps.len()];
        let mut pass_start = self.started_at;
        let mut pass = 0;

        loop {
            for index in 1..self.steps.len() {
                self.sleep_until(pass_start, offsets[index]).await?;
                self.fire_step(index, pass)?;
            }

            let pass_end = self.sleep_until(pass_start, pass_length).await?;
            if !self.check_continue(pass)? {
                return Ok(());
            }

            pass_start = if self.pass_gap.is_zero() {
                pass_end
            } else {
                self.sleep_until(pass_end, self.pass_gap).await?
            };
            pass += 1;
            self.fire_step(0, pass)?;
        }
    }

    /// Sleeps until `base + offset` and returns that instant. A deadline
    /// beyond the clock's range is never reached; only cancellation ends it.
    async fn sleep_until(
        &self,
        base: Instant,
        offset: Duration,
    ) -> Result<Instant, CancelledRun> {
        let Some(deadline) = base.checked_add(offset) else {
            tracing::trace!(?offset, "Deadline out of range, waiting for cancellation");
            self.token.cancelled().await;
            return Err(CancelledRun);
        };
        select! {
            biased;
            _ = self.token.cancelled() => Err(CancelledRun),
            _ = tokio::time::sleep_until(deadline) => Ok(deadline),
        }
    }

    fn fire_step(&self, index: usize, pass: usize) -> Result<(), CancelledRun> {
        let mut guard = lock(&self.shared);
        let shared = &mut *guard;
        shared.claim(self.generation, &self.token)?;

        let step = &self.steps[index];
        shared.state = RunState::Running;
        shared.step_index = index;
        shared.pass_index = pass;
        tracing::trace!(pass, step = %step, "Step");

        if let Some(listener) = shared.listener.as_mut() {
            listener.on_step(step, pass, &self.control);
        }

        // The listener may have stopped the run through its `Control`.
        shared.claim(self.generation, &self.token)
    }

    /// Returns `true` when another pass should start.
    fn check_continue(&self, pass: usize) -> Result<bool, CancelledRun> {
        let mut guard = lock(&self.shared);
        let shared = &mut *guard;
        shared.claim(self.generation, &self.token)?;
        shared.state = RunState::Checking;

        let passes_done = pass + 1;
        let reason = if self.max_passes.is_some_and(|max| passes_done >= max) {
            Some(DoneReason::PassLimitReached)
        } else if !self.predicate.check() {
            Some(DoneReason::PredicateFalse)
        } else {
            None
        };
        tracing::trace!(pass, ?reason, "Pass check");

        let Some(reason) = reason else {
            shared.state = RunState::Running;
            return Ok(true);
        };

        shared.state = match reason {
            DoneReason::PassLimitReached => RunState::Completed,
            DoneReason::PredicateFalse => RunState::Stopped,
        };
        tracing::debug!(passes = passes_done, %reason, "Run finished");
        if let Some(mut listener) = shared.listener.take() {
            listener.on_done(reason);
        }
        Ok(false)
    }
}

impl Drop for Driver {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut shared = lock(&self.shared);
        if shared.generation != self.generation || !shared.state.is_active() {
            return;
        }
        shared.state = RunState::Stopped;
        shared.listener = None;
        if !self.token.is_cancelled() {
            tracing::warn!("Run ended unexpectedly, marked stopped");
        }
    }
}
