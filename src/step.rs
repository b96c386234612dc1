use std::{sync::Arc, time::Duration};

use crate::{Error, Result};

/// A single labeled, timed unit of visual change within a pass.
///
/// The `duration` is the dwell time: how long the step stays active before
/// the next one fires. Steps are immutable once handed to
/// [`Sequencer::start`](crate::Sequencer::start).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Step {
    id: usize,
    label: Arc<str>,
    duration: Duration,
}

impl Step {
    /// Create a step with a dwell duration given in milliseconds.
    pub fn new<L>(id: usize, label: L, duration_ms: u64) -> Self
    where
        L: Into<Arc<str>>,
    {
        Self::with_duration(id, label, Duration::from_millis(duration_ms))
    }

    pub fn with_duration<L>(id: usize, label: L, duration: Duration) -> Self
    where
        L: Into<Arc<str>>,
    {
        Self {
            id,
            label: label.into(),
            duration,
        }
    }

    #[inline]
    pub fn id(&self) -> usize {
        self.id
    }

    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Dwell duration of this step.
    #[inline]
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{} {} ({:?})", self.id, self.label, self.duration)
    }
}

/// Checks a step list before a run takes ownership of it.
pub(crate) fn validate(steps: Arc<[Step]>) -> Result<Arc<[Step]>> {
    if steps.is_empty() {
        return Err(Error::InvalidStep("step list is empty".into()));
    }
    if let Some(step) = steps.iter().find(|s| s.duration.is_zero()) {
        return Err(Error::InvalidStep(format!(
            "step #{} '{}' has zero duration",
            step.id, step.label
        )));
    }
    let total = steps
        .iter()
        .try_fold(Duration::ZERO, |acc, s| acc.checked_add(s.duration));
    if total.is_none() {
        return Err(Error::InvalidStep("total duration of the pass overflows".into()));
    }
    Ok(steps)
}

/// Offset of each step from the start of its pass, plus the total pass length
/// as the final element. Expects a list accepted by [`validate`].
pub(crate) fn offsets(steps: &[Step]) -> Vec<Duration> {
    let mut acc = Duration::ZERO;
    let mut out = Vec::with_capacity(steps.len() + 1);
    out.push(acc);
    for step in steps {
        acc += step.duration;
        out.push(acc);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_list() {
        let steps: Arc<[Step]> = Vec::new().into();
        assert!(matches!(validate(steps), Err(Error::InvalidStep(_))));
    }

    #[test]
    fn test_rejects_zero_duration() {
        let steps: Arc<[Step]> = vec![Step::new(0, "check", 100), Step::new(1, "move", 0)].into();
        match validate(steps) {
            Err(Error::InvalidStep(msg)) => assert!(msg.contains("move")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_rejects_overflowing_pass() {
        let steps: Arc<[Step]> = vec![
            Step::with_duration(0, "long", Duration::MAX),
            Step::new(1, "one more", 1),
        ]
        .into();
        assert!(matches!(validate(steps), Err(Error::InvalidStep(_))));

        let steps: Arc<[Step]> = vec![Step::with_duration(0, "forever", Duration::MAX)].into();
        assert!(validate(steps).is_ok());
    }

    #[test]
    fn test_offsets_are_cumulative() {
        let steps = [
            Step::new(0, "check", 500),
            Step::new(1, "move", 2000),
            Step::new(2, "refuel", 500),
        ];
        let offsets = offsets(&steps);
        assert_eq!(
            offsets,
            vec![
                Duration::ZERO,
                Duration::from_millis(500),
                Duration::from_millis(2500),
                Duration::from_millis(3000),
            ]
        );
    }

    #[test]
    fn test_display() {
        let step = Step::new(2, "move", 100);
        assert_eq!(step.to_string(), "#2 move (100ms)");
    }
}
