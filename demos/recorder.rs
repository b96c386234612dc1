//! Records a short while-loop run to `while-loop.jsonl`.
//!
//! Each line of the output is one `SequencerEvent` serialized as JSON, which
//! makes runs easy to diff or replay in a browser front-end.

use std::time::Duration;

use pacer::{Flag, Sequencer, Step, recorder::Recorder};

#[tokio::main]
async fn main() -> pacer::Result {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let fuel = Flag::new(true);
    let mut train = Sequencer::default();
    train.start(
        vec![
            Step::new(0, "while fuel == True:", 100),
            Step::new(1, "    move_train()", 400),
        ],
        fuel.clone(),
        Recorder::new("while-loop.jsonl")?,
    )?;

    tokio::time::sleep(Duration::from_millis(1200)).await;
    fuel.set(false);
    while train.is_active() {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    println!("Recorded run {:?} ended {}", train.run_id(), train.state());
    Ok(())
}
