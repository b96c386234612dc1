/// Gate consulted before every pass.
///
/// Implementations must be side-effect free: the sequencer may call `check`
/// at any check point and never caches its result. The state a predicate
/// reads is owned by the caller (typically a UI control); the sequencer only
/// reads it.
///
/// Any `Fn() -> bool + Send + Sync + 'static` closure is a predicate:
///
/// ```rust
/// use pacer::{ContinuePredicate, Flag};
///
/// let fuel = Flag::new(true);
/// let gate = {
///     let fuel = fuel.clone();
///     move || fuel.get()
/// };
/// assert!(gate.check());
/// fuel.set(false);
/// assert!(!gate.check());
/// ```
pub trait ContinuePredicate: Send + Sync + 'static {
    fn check(&self) -> bool;
}

impl<F> ContinuePredicate for F
where
    F: Fn() -> bool + Send + Sync + 'static,
{
    #[inline]
    fn check(&self) -> bool {
        self()
    }
}

/// A predicate that always holds. Useful with [`Config::max_passes`](crate::Config::max_passes).
#[derive(Debug, Clone, Copy, Default)]
pub struct Always;

impl ContinuePredicate for Always {
    #[inline]
    fn check(&self) -> bool {
        true
    }
}
