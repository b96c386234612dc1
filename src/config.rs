use std::time::Duration;

/// Timing and buffering configuration for a [`Sequencer`](crate::Sequencer).
///
/// Use the builder methods to customize, or [`Default`] for a sequencer that
/// repeats passes back to back until its predicate turns false.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use pacer::Config;
///
/// let config = Config::default()
///     .with_pass_gap(Duration::from_millis(300))  // Pause between iterations
///     .with_max_passes(5);                         // range(5)
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Pause between the end of a pass (after the predicate check) and the
    /// first step of the next pass.
    /// Default: 0 ms
    pub pass_gap: Duration,

    /// Maximum number of passes in a single run. When reached, the run ends
    /// in [`RunState::Completed`](crate::RunState::Completed) without
    /// consulting the predicate.
    /// Default: `None` (unbounded)
    pub max_passes: Option<usize>,

    /// Buffer size of channels created by [`crate::events::channel_for`].
    /// Default: 128
    pub channel_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            pass_gap: Duration::ZERO,
            max_passes: None,
            channel_size: 128,
        }
    }
}

impl Config {
    /// Set the pause inserted between consecutive passes.
    pub fn with_pass_gap(mut self, gap: Duration) -> Self {
        self.pass_gap = gap;
        self
    }

    /// Limit the run to `passes` passes.
    ///
    /// A limit of zero behaves like a limit of one: the first pass is
    /// always executed once the initial predicate check succeeds.
    pub fn with_max_passes(mut self, passes: usize) -> Self {
        self.max_passes = Some(passes);
        self
    }

    /// Set the buffer size for event channels.
    pub fn with_channel_size(mut self, size: usize) -> Self {
        self.channel_size = size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.pass_gap, Duration::ZERO);
        assert_eq!(config.max_passes, None);
        assert_eq!(config.channel_size, 128);
    }

    #[test]
    fn test_builder() {
        let config = Config::default()
            .with_pass_gap(Duration::from_millis(500))
            .with_max_passes(3)
            .with_channel_size(8);
        assert_eq!(config.pass_gap, Duration::from_millis(500));
        assert_eq!(config.max_passes, Some(3));
        assert_eq!(config.channel_size, 8);
    }
}
