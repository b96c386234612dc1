//! For-Loop Boxes
//!
//! `for i in range(n)` fills one box per iteration. Each iteration shows the
//! loop header, then the body, then pauses briefly before the next value of
//! `i`. The range length is the pass limit, so the run ends in `Completed`
//! instead of waiting for a predicate to turn false.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use pacer::{Always, Config, Control, DoneReason, RunState, Sequencer, Step, listener};

const ITERATION: u64 = 1500;

#[tokio::main]
async fn main() -> pacer::Result {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let range = 5;
    let config = Config::default()
        .with_max_passes(range)
        .with_pass_gap(Duration::from_millis(300));
    let mut seq = Sequencer::new(config);

    let boxes = Arc::new(Mutex::new(vec![None; range]));
    let filled = boxes.clone();
    let (done_tx, done_rx) = tokio::sync::oneshot::channel::<DoneReason>();
    let mut done_tx = Some(done_tx);

    let steps = vec![
        Step::new(0, format!("for i in range({range}):"), ITERATION / 2),
        Step::new(1, "    print(i)", ITERATION / 2),
    ];
    seq.start(
        steps,
        Always,
        listener(
            move |step: &Step, i, _: &Control| {
                if step.id() == 1 {
                    let mut boxes = filled.lock().unwrap_or_else(|e| e.into_inner());
                    boxes[i] = Some(i);
                    println!("i = {i}  {}", render(&boxes));
                } else {
                    println!("{}  (i = {i})", step.label());
                }
            },
            move |reason| {
                if let Some(tx) = done_tx.take() {
                    let _ = tx.send(reason);
                }
            },
        ),
    )?;

    if let Ok(reason) = done_rx.await {
        println!("Loop complete: {reason}");
    }
    assert_eq!(seq.state(), RunState::Completed);
    Ok(())
}

fn render(boxes: &[Option<usize>]) -> String {
    boxes
        .iter()
        .map(|b| match b {
            Some(i) => format!("[{i}]"),
            None => "[ ]".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
