use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use crate::ContinuePredicate;

/// A shared boolean toggled by an input control and read by a sequencer.
///
/// Clones share the same value. The control side is the only writer; as a
/// [`ContinuePredicate`] the flag reads its current value at every check.
#[derive(Debug, Clone, Default)]
pub struct Flag(Arc<AtomicBool>);

impl Flag {
    pub fn new(value: bool) -> Self {
        Self(Arc::new(AtomicBool::new(value)))
    }

    #[inline]
    pub fn get(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    #[inline]
    pub fn set(&self, value: bool) {
        self.0.store(value, Ordering::Release);
    }

    /// Flip the value and return the new one.
    pub fn toggle(&self) -> bool {
        !self.0.fetch_xor(true, Ordering::AcqRel)
    }
}

impl ContinuePredicate for Flag {
    #[inline]
    fn check(&self) -> bool {
        self.get()
    }
}

impl From<bool> for Flag {
    fn from(value: bool) -> Self {
        Flag::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_value() {
        let fuel = Flag::new(true);
        let toggle = fuel.clone();
        toggle.set(false);
        assert!(!fuel.get());
        assert!(!fuel.check());
    }

    #[test]
    fn test_toggle_returns_new_value() {
        let sunlight = Flag::default();
        assert!(sunlight.toggle());
        assert!(sunlight.get());
        assert!(!sunlight.toggle());
        assert!(!sunlight.get());
    }
}
