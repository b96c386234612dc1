//! JSON-lines trace of a run, for replaying or inspecting a demo offline.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use crate::{Control, DoneReason, Listener, Result, RunId, Step, events::SequencerEvent};

/// A listener that appends every event of a run to a file, one JSON object
/// per line.
///
/// Failures are logged and otherwise ignored; a broken trace file never
/// interrupts the run it observes.
pub struct Recorder {
    writer: BufWriter<File>,
    run_id: Option<RunId>,
}

impl Recorder {
    /// Create a recorder writing to `path`, truncating any existing file.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
            run_id: None,
        })
    }

    fn write(&mut self, event: &SequencerEvent) {
        if let Err(e) = serde_json::to_writer(&mut self.writer, event) {
            tracing::error!("Recorder failed to serialize event: {}", e);
            return;
        }
        let written = self
            .writer
            .write_all(b"\n")
            .and_then(|_| self.writer.flush());
        if let Err(e) = written {
            tracing::error!("Recorder failed to write event: {}", e);
        }
    }
}

impl Listener for Recorder {
    fn on_start(&mut self, run_id: RunId) {
        self.run_id = Some(run_id);
    }

    fn on_step(&mut self, step: &Step, pass: usize, control: &Control) {
        self.write(&SequencerEvent::StepEntered {
            run_id: control.run_id(),
            step: step.clone(),
            pass,
        });
    }

    fn on_done(&mut self, reason: DoneReason) {
        if let Some(run_id) = self.run_id {
            self.write(&SequencerEvent::Done { run_id, reason });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Always, Config, Sequencer};

    #[tokio::test(start_paused = true)]
    async fn test_recorder_writes_json_lines() {
        let path =
            std::env::temp_dir().join(format!("pacer-recorder-{}.jsonl", std::process::id()));
        let recorder = Recorder::new(&path).expect("Failed to create recorder");

        let mut seq = Sequencer::new(Config::default().with_max_passes(1));
        seq.start(
            vec![Step::new(0, "check", 100), Step::new(1, "move", 100)],
            Always,
            recorder,
        )
        .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(250)).await;
        assert_eq!(seq.state(), crate::RunState::Completed);

        let content = std::fs::read_to_string(&path).expect("Failed to read trace file");
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("\"StepEntered\""));
        assert!(lines[0].contains("check"));
        assert!(lines[1].contains("move"));
        assert!(lines[2].contains("pass-limit"));

        let event: SequencerEvent = serde_json::from_str(lines[2]).unwrap();
        assert!(event.is_done());

        let _ = std::fs::remove_file(path);
    }
}
