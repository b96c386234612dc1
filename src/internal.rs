mod cancelled_run;
mod driver;
mod shared;

pub(crate) use cancelled_run::CancelledRun;
pub(crate) use driver::Driver;
pub(crate) use shared::{Shared, lock};
