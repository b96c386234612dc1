//! Plant Growth Lab
//!
//! Every pass is one simulated day. Days only advance while the pot has
//! water and the sunlight is on; the growth stage is derived from the number
//! of days passed. Switching the lamp off pauses growth at the next day
//! boundary, and the run completes once the plant flowers.

use std::time::Duration;

use pacer::{Config, Flag, Sequencer, Step, events::SequencerEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Seed,
    Sprout,
    Small,
    Medium,
    Large,
    Flowering,
}

impl Stage {
    /// Stage and height (cm) after `days` days of growth.
    fn after(days: usize) -> (Stage, u32) {
        match days {
            0 => (Stage::Seed, 0),
            1..=2 => (Stage::Sprout, 2),
            3..=6 => (Stage::Small, 5),
            7..=13 => (Stage::Medium, 12),
            14..=20 => (Stage::Large, 25),
            _ => (Stage::Flowering, 35),
        }
    }
}

const DAYS_TO_FLOWER: usize = 21;

#[tokio::main]
async fn main() -> pacer::Result {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let water = Flag::new(true);
    let sunlight = Flag::new(true);
    let gate = {
        let water = water.clone();
        let sunlight = sunlight.clone();
        move || water.get() && sunlight.get()
    };

    let mut days = 0;
    let mut stage = Stage::Seed;
    loop {
        // The pass limit covers the days still missing until flowering.
        let config = Config::default().with_max_passes(DAYS_TO_FLOWER - days);
        let mut lab = Sequencer::new(config);
        let (events, mut rx) = pacer::events::channel_for(lab.config());
        lab.start(vec![Step::new(0, "day", 200)], gate.clone(), events)?;

        if days == 0 {
            let lamp = sunlight.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(1500)).await;
                lamp.set(false);
                println!("Lamp switched off, growth pauses.");
            });
        }

        let mut finished = false;
        while let Some(event) = rx.recv().await {
            match event {
                SequencerEvent::StepEntered { pass, .. } => {
                    let day = days + pass + 1;
                    let (next, height) = Stage::after(day);
                    if next != stage {
                        println!("Day {day}: {next:?} ({height} cm)");
                        stage = next;
                    }
                }
                SequencerEvent::Done { reason, .. } => {
                    days += lab.pass_index() + 1;
                    finished = stage == Stage::Flowering;
                    println!("Stopped after day {days}: {reason}");
                    break;
                }
            }
        }

        if finished || days >= DAYS_TO_FLOWER {
            break;
        }
        sunlight.set(true);
        println!("Lamp back on.");
    }

    println!("The plant is flowering after {days} days.");
    Ok(())
}
