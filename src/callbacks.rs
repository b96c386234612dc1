use crate::{Control, DoneReason, RunId, Step};

/// Receives the observable effects of a run.
///
/// Callbacks are invoked in scheduled order, one at a time, and never after
/// the run has been stopped. Both methods have no-op defaults, so a listener
/// interested only in steps implements just `on_step`.
///
/// Use [`Control::stop`] to end the run from inside a callback.
pub trait Listener: Send + 'static {
    /// Called once by `start()` before the initial predicate check.
    fn on_start(&mut self, run_id: RunId) {
        let _r = run_id;
    }

    /// A step became active. `pass` is the zero-based pass index.
    fn on_step(&mut self, step: &Step, pass: usize, control: &Control) {
        let _s = step;
        let _p = pass;
        let _c = control;
    }

    /// The run ended on its own. Called at most once per run.
    fn on_done(&mut self, reason: DoneReason) {
        let _r = reason;
    }
}

/// A [`Listener`] built from a pair of closures. See [`listener`].
pub struct FnListener<S, D> {
    on_step: S,
    on_done: D,
}

/// Build a listener from an `on_step` and an `on_done` closure.
///
/// ```rust
/// use pacer::{Step, listener};
///
/// let l = listener(
///     |step: &Step, pass, _ctl: &pacer::Control| println!("pass {pass}: {}", step.label()),
///     |reason| println!("done: {reason}"),
/// );
/// # let _ = l;
/// ```
pub fn listener<S, D>(on_step: S, on_done: D) -> FnListener<S, D>
where
    S: FnMut(&Step, usize, &Control) + Send + 'static,
    D: FnMut(DoneReason) + Send + 'static,
{
    FnListener { on_step, on_done }
}

impl<S, D> Listener for FnListener<S, D>
where
    S: FnMut(&Step, usize, &Control) + Send + 'static,
    D: FnMut(DoneReason) + Send + 'static,
{
    #[inline]
    fn on_step(&mut self, step: &Step, pass: usize, control: &Control) {
        (self.on_step)(step, pass, control)
    }

    #[inline]
    fn on_done(&mut self, reason: DoneReason) {
        (self.on_done)(reason)
    }
}

impl Listener for Box<dyn Listener> {
    fn on_start(&mut self, run_id: RunId) {
        (**self).on_start(run_id)
    }

    fn on_step(&mut self, step: &Step, pass: usize, control: &Control) {
        (**self).on_step(step, pass, control)
    }

    fn on_done(&mut self, reason: DoneReason) {
        (**self).on_done(reason)
    }
}

/// Listener that ignores every callback.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopListener;

impl Listener for NoopListener {}
