use std::sync::{Arc, Mutex};

use tokio::{runtime::Handle, task::JoinHandle, time::Instant};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::{
    Config, ContinuePredicate, Control, DoneReason, Error, Listener, Result, RunId, RunState, Step,
    internal::{Driver, Shared, lock},
    step,
};

/// Drives a listener through a sequence of timed steps, repeating the
/// sequence while a predicate holds.
///
/// - `start(steps, predicate, listener)` checks the predicate, fires step 0
///   and spawns a timer task for the rest of the run.
/// - `stop()` cancels the run; no callback fires after it returns.
/// - `reset()` stops and returns to `Idle` with zeroed counters.
///
/// One sequencer owns at most one run (and one pending timer) at a time.
/// Dropping the sequencer cancels its run.
///
/// ```rust
/// use pacer::{Flag, Sequencer, Step, listener};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> pacer::Result<()> {
/// let fuel = Flag::new(true);
/// let mut train = Sequencer::default();
/// train.start(
///     vec![Step::new(0, "check", 500), Step::new(1, "move", 2000)],
///     fuel.clone(),
///     listener(
///         |step: &Step, pass, _: &pacer::Control| println!("{pass}: {}", step.label()),
///         |_| {},
///     ),
/// )?;
/// assert!(train.is_active());
/// train.stop();
/// # Ok(())
/// # }
/// ```
pub struct Sequencer {
    config: Config,
    shared: Arc<Mutex<Shared>>,
    cancel_token: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

/// Consistent view of a sequencer's progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub state: RunState,
    pub step_index: usize,
    pub pass_index: usize,
    pub run_id: Option<RunId>,
}

impl Sequencer {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            shared: Arc::new(Mutex::new(Shared::default())),
            cancel_token: CancellationToken::new(),
            handle: None,
        }
    }

    /// Start a new run.
    ///
    /// The predicate is evaluated immediately. When it is `false` the run
    /// ends in `Stopped` with `on_done(PredicateFalse)` and no timer is
    /// scheduled. Otherwise step 0 fires before this method returns and the
    /// remaining steps fire at their cumulative offsets.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidStep`] for an empty list or a zero-length step.
    /// - [`Error::AlreadyRunning`] while a run is `Checking` or `Running`.
    /// - [`Error::NoRuntime`] when called outside a Tokio runtime.
    pub fn start<S, P, L>(&mut self, steps: S, predicate: P, listener: L) -> Result<()>
    where
        S: Into<Arc<[Step]>>,
        P: ContinuePredicate,
        L: Listener,
    {
        let steps = step::validate(steps.into())?;
        let runtime = Handle::try_current().map_err(|_| Error::NoRuntime)?;

        let mut guard = lock(&self.shared);
        let shared = &mut *guard;
        if shared.state.is_active() && !self.cancel_token.is_cancelled() {
            return Err(Error::AlreadyRunning);
        }

        // A run cancelled through its `Control` may still have a driver that
        // has not noticed yet.
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }

        shared.generation += 1;
        let generation = shared.generation;
        let run_id = RunId::new();
        let token = CancellationToken::new();
        let control = Control::new(run_id, token.clone());
        self.cancel_token = token.clone();

        shared.run_id = Some(run_id);
        shared.step_index = 0;
        shared.pass_index = 0;
        shared.state = RunState::Checking;
        let listener = shared.listener.insert(Box::new(listener));
        listener.on_start(run_id);

        if !predicate.check() {
            shared.state = RunState::Stopped;
            tracing::debug!(%run_id, "Predicate false at start, body never runs");
            listener.on_done(DoneReason::PredicateFalse);
            shared.listener = None;
            return Ok(());
        }

        shared.state = RunState::Running;
        tracing::debug!(%run_id, steps = steps.len(), "Run started");
        let started_at = Instant::now();
        listener.on_step(&steps[0], 0, &control);
        if token.is_cancelled() {
            shared.state = RunState::Stopped;
            shared.listener = None;
            tracing::debug!(%run_id, "Run stopped during first step");
            return Ok(());
        }
        drop(guard);

        let driver = Driver {
            shared: self.shared.clone(),
            steps,
            predicate: Box::new(predicate),
            control,
            token,
            generation,
            started_at,
            pass_gap: self.config.pass_gap,
            max_passes: self.config.max_passes,
            settled: false,
        };
        let span = tracing::debug_span!("run", %run_id);
        self.handle = Some(runtime.spawn(driver.run().instrument(span)));
        Ok(())
    }

    /// Cancel the current run, if any. Safe to call in any state, any number
    /// of times. The run's listener is dropped, which closes an
    /// [`EventSender`](crate::events::EventSender) channel.
    ///
    /// Use [`Control::stop`] instead when stopping from inside a callback.
    pub fn stop(&mut self) {
        self.cancel_token.cancel();
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }

        // Waits for a callback running on another worker thread.
        let mut shared = lock(&self.shared);
        shared.generation += 1;
        shared.listener = None;
        if shared.state.is_active() {
            shared.state = RunState::Stopped;
            tracing::debug!(run_id = ?shared.run_id, "Run stopped");
        }
    }

    /// Stop, then clear the step and pass counters and return to `Idle`.
    pub fn reset(&mut self) {
        self.stop();
        let mut shared = lock(&self.shared);
        shared.state = RunState::Idle;
        shared.step_index = 0;
        shared.pass_index = 0;
        shared.run_id = None;
        tracing::trace!("Sequencer reset");
    }

    pub fn state(&self) -> RunState {
        self.snapshot().state
    }

    /// Index of the most recently fired step within the current pass.
    pub fn step_index(&self) -> usize {
        lock(&self.shared).step_index
    }

    /// Zero-based index of the current pass ("days passed", "loops done").
    pub fn pass_index(&self) -> usize {
        lock(&self.shared).pass_index
    }

    pub fn run_id(&self) -> Option<RunId> {
        lock(&self.shared).run_id
    }

    pub fn snapshot(&self) -> Snapshot {
        let shared = lock(&self.shared);
        // Stopped through a `Control` outside of any callback; the driver has
        // not woken up to record it yet.
        let state = if shared.state.is_active() && self.cancel_token.is_cancelled() {
            RunState::Stopped
        } else {
            shared.state
        };
        Snapshot {
            state,
            step_index: shared.step_index,
            pass_index: shared.pass_index,
            run_id: shared.run_id,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.state().is_active()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Drop for Sequencer {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for Sequencer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sequencer")
            .field("config", &self.config)
            .field("snapshot", &self.snapshot())
            .finish()
    }
}
