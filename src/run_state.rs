use std::fmt;

/// Lifecycle state of a [`Sequencer`](crate::Sequencer).
///
/// `Checking` and `Running` are the only states with a pending timer or an
/// in-flight predicate evaluation. The others are terminal for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RunState {
    #[default]
    Idle,
    Checking,
    Running,
    Stopped,
    Completed,
}

impl RunState {
    pub fn is_idle(&self) -> bool {
        matches!(self, RunState::Idle)
    }

    /// `true` while a run owns the sequencer.
    pub fn is_active(&self) -> bool {
        matches!(self, RunState::Checking | RunState::Running)
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, RunState::Stopped | RunState::Completed)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunState::Idle => write!(f, "idle"),
            RunState::Checking => write!(f, "checking"),
            RunState::Running => write!(f, "running"),
            RunState::Stopped => write!(f, "stopped"),
            RunState::Completed => write!(f, "completed"),
        }
    }
}

/// Why a run ended on its own. Passed to [`Listener::on_done`](crate::Listener::on_done).
///
/// A run cancelled with `stop()` has no reason: it simply produces no further
/// callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum DoneReason {
    /// The continue predicate returned `false` at a check point.
    PredicateFalse,
    /// The configured `max_passes` was reached.
    #[cfg_attr(feature = "serde", serde(rename = "pass-limit"))]
    PassLimitReached,
}

impl DoneReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DoneReason::PredicateFalse => "predicate-false",
            DoneReason::PassLimitReached => "pass-limit",
        }
    }
}

impl fmt::Display for DoneReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_states() {
        assert!(RunState::Checking.is_active());
        assert!(RunState::Running.is_active());
        assert!(!RunState::Idle.is_active());
        assert!(!RunState::Stopped.is_active());
        assert!(RunState::Completed.is_finished());
    }

    #[test]
    fn test_reason_names() {
        assert_eq!(DoneReason::PredicateFalse.to_string(), "predicate-false");
        assert_eq!(DoneReason::PassLimitReached.as_str(), "pass-limit");
    }
}
