//! While-Loop Train
//!
//! A train keeps driving laps while `fuel == True`. The condition is checked
//! before every lap, so switching the fuel off mid-lap lets the current lap
//! finish and stops the train at the next check.
//!
//! ```python
//! while fuel == True:
//!     move_train()
//!     check_fuel()
//! print("Train stopped!")
//! ```
//!
//! The fuel toggle is a [`Flag`]: the "UI" task below flips it after a few
//! laps, and the sequencer reads it fresh at every check.

use std::time::Duration;

use pacer::{Flag, Sequencer, Step, events::SequencerEvent};

const CODE: [&str; 4] = [
    "while fuel == True:",
    "    move_train()",
    "    check_fuel()",
    "print(\"Train stopped!\")",
];

#[tokio::main]
async fn main() -> pacer::Result {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let fuel = Flag::new(true);
    let mut train = Sequencer::default();
    let (events, mut rx) = pacer::events::channel_for(train.config());

    let steps = vec![
        Step::new(0, CODE[0], 500),
        Step::new(1, CODE[1], 2000),
        Step::new(2, CODE[2], 500),
    ];
    train.start(steps, fuel.clone(), events)?;
    println!("Train starting! Entering while loop...");

    let toggle = fuel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(7000)).await;
        toggle.set(false);
        println!("Fuel depleted! Train will stop after current loop.");
    });

    let mut loops = 0;
    while let Some(event) = rx.recv().await {
        match event {
            SequencerEvent::StepEntered { step, pass, .. } => {
                print_code(step.id());
                if step.id() == 2 {
                    loops = pass + 1;
                    println!("Loops completed: {loops}");
                }
            }
            SequencerEvent::Done { reason, .. } => {
                print_code(3);
                println!("Train stopped! ({reason}, {loops} loops)");
                break;
            }
        }
    }

    train.reset();
    Ok(())
}

fn print_code(active: usize) {
    for (line, code) in CODE.iter().enumerate() {
        let marker = if line == active { "->" } else { "  " };
        println!("{marker} {} | {code}", line + 1);
    }
    println!();
}
