#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid step definition: {0}")]
    InvalidStep(String),

    #[error("Sequencer is already running. Call stop() or reset() first.")]
    AlreadyRunning,

    #[error("Sequencer must be started from within a Tokio runtime")]
    NoRuntime,

    #[error("IO Error: {0}")]
    IOError(#[from] std::io::Error),
}
