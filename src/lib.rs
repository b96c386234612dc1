//! Pacer - timed step sequencer for Tokio
//!
//! Advances a listener through a finite sequence of labeled, timed steps,
//! optionally repeating the sequence while a caller-owned predicate holds,
//! and stays safely cancellable at every point. It is the shared engine
//! behind step-by-step teaching animations: a while-loop that re-checks its
//! condition before every iteration, a for-loop over a range, a day counter.
//!
//! See `demos/while_loop.rs` and `demos/for_loop.rs`.

mod callbacks;
mod config;
mod control;
mod error;
mod flag;
mod predicate;
mod run_id;
mod run_state;
mod sequencer;
mod step;

mod internal;

pub mod events;

#[cfg(feature = "recorder")]
pub mod recorder;

pub use callbacks::{FnListener, Listener, NoopListener, listener};
pub use config::Config;
pub use control::Control;
pub use error::Error;
pub use flag::Flag;
pub use predicate::{Always, ContinuePredicate};
pub use run_id::RunId;
pub use run_state::{DoneReason, RunState};
pub use sequencer::{Sequencer, Snapshot};
pub use step::Step;

pub type Result<T = ()> = std::result::Result<T, Error>;

pub mod prelude {
    pub use crate::error::Error as PacerError;
    pub use crate::{
        Always, Config, ContinuePredicate, Control, DoneReason, Flag, Listener, RunState,
        Sequencer, Step, listener,
    };
}
