/// Marker returned by driver helpers once the run they serve has been
/// cancelled or superseded. Never leaves the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CancelledRun;
