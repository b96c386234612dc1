//! Function Robot
//!
//! The learner records a path as a list of actions, then wraps it in a
//! function and calls it. Playback shows the `def` line first, then each
//! recorded action as one line of the function body, one second apiece,
//! while the robot moves along the path.

use std::sync::{Arc, Mutex};

use pacer::{Always, Config, Control, Sequencer, Step, listener};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Forward,
    TurnLeft,
}

impl Action {
    fn code(&self) -> &'static str {
        match self {
            Action::Forward => "    move_forward()",
            Action::TurnLeft => "    turn_left()",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Heading {
    Right,
    Up,
    Left,
    Down,
}

#[derive(Debug, Clone, Copy)]
struct Robot {
    x: i32,
    y: i32,
    heading: Heading,
}

impl Robot {
    fn apply(&mut self, action: Action) {
        match action {
            Action::Forward => match self.heading {
                Heading::Right => self.x += 1,
                Heading::Up => self.y -= 1,
                Heading::Left => self.x -= 1,
                Heading::Down => self.y += 1,
            },
            Action::TurnLeft => {
                self.heading = match self.heading {
                    Heading::Right => Heading::Up,
                    Heading::Up => Heading::Left,
                    Heading::Left => Heading::Down,
                    Heading::Down => Heading::Right,
                }
            }
        }
    }
}

#[tokio::main]
async fn main() -> pacer::Result {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let function_name = "move_robot_to_end";
    let actions = [
        Action::Forward,
        Action::Forward,
        Action::TurnLeft,
        Action::Forward,
        Action::Forward,
    ];

    let mut steps = vec![Step::new(0, format!("def {function_name}():"), 800)];
    steps.extend(
        actions
            .iter()
            .enumerate()
            .map(|(i, a)| Step::new(i + 1, a.code(), 1000)),
    );

    let robot = Arc::new(Mutex::new(Robot {
        x: 0,
        y: 4,
        heading: Heading::Right,
    }));
    let moving = robot.clone();
    let (done_tx, done_rx) = tokio::sync::oneshot::channel();
    let mut done_tx = Some(done_tx);

    let mut playback = Sequencer::new(Config::default().with_max_passes(1));
    playback.start(
        steps,
        Always,
        listener(
            move |step: &Step, _, _: &Control| {
                println!("line {} | {}", step.id() + 1, step.label());
                if let Some(action) = step.id().checked_sub(1).map(|i| actions[i]) {
                    let mut robot = moving.lock().unwrap_or_else(|e| e.into_inner());
                    robot.apply(action);
                    println!(
                        "        robot at ({}, {}) facing {:?}",
                        robot.x, robot.y, robot.heading
                    );
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
        let robot = robot.lock().unwrap_or_else(|e| e.into_inner());
        println!("{function_name}() returned ({reason}) at ({}, {})", robot.x, robot.y);
    }
    Ok(())
}
