//! Channel-backed listener for render layers that prefer to poll.
//!
//! A render loop owns the [`Receiver`] and drains it between frames; the
//! sequencer pushes into the [`EventSender`] from its callbacks.

use tokio::sync::mpsc::{Receiver, Sender, channel as mpsc_channel, error::TrySendError};

use crate::{Config, Control, DoneReason, Listener, RunId, Step};

/// Observable effect of a run, tagged with the run it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type"))]
pub enum SequencerEvent {
    StepEntered { run_id: RunId, step: Step, pass: usize },
    Done { run_id: RunId, reason: DoneReason },
}

impl SequencerEvent {
    pub fn run_id(&self) -> RunId {
        match self {
            SequencerEvent::StepEntered { run_id, .. } => *run_id,
            SequencerEvent::Done { run_id, .. } => *run_id,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, SequencerEvent::Done { .. })
    }
}

/// [`Listener`] forwarding every callback into a bounded channel.
///
/// Sending never blocks the run: when the channel is full the event is dropped
/// and a warning is logged. A closed channel means the consumer is gone and
/// events are discarded silently.
#[derive(Debug, Clone)]
pub struct EventSender {
    sender: Sender<SequencerEvent>,
    run_id: Option<RunId>,
}

impl EventSender {
    pub fn new(sender: Sender<SequencerEvent>) -> Self {
        Self {
            sender,
            run_id: None,
        }
    }

    fn push(&self, event: SequencerEvent) {
        match self.sender.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                tracing::warn!(
                    run_id = %event.run_id(),
                    "Event channel is full, dropping {:?}",
                    event
                );
            }
            Err(TrySendError::Closed(_)) => {}
        }
    }
}

impl Listener for EventSender {
    fn on_start(&mut self, run_id: RunId) {
        self.run_id = Some(run_id);
    }

    fn on_step(&mut self, step: &Step, pass: usize, control: &Control) {
        self.push(SequencerEvent::StepEntered {
            run_id: control.run_id(),
            step: step.clone(),
            pass,
        });
    }

    fn on_done(&mut self, reason: DoneReason) {
        if let Some(run_id) = self.run_id {
            self.push(SequencerEvent::Done { run_id, reason });
        }
    }
}

/// Create a bounded event channel.
pub fn channel(capacity: usize) -> (EventSender, Receiver<SequencerEvent>) {
    let (tx, rx) = mpsc_channel(capacity);
    (EventSender::new(tx), rx)
}

/// Create an event channel sized by [`Config::channel_size`].
pub fn channel_for(config: &Config) -> (EventSender, Receiver<SequencerEvent>) {
    channel(config.channel_size)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{Always, Flag, Sequencer};

    fn steps() -> Vec<Step> {
        vec![Step::new(0, "check", 100), Step::new(1, "move", 100)]
    }

    #[tokio::test(start_paused = true)]
    async fn test_events_are_tagged_with_run_id() {
        let mut seq = Sequencer::new(Config::default().with_max_passes(1));
        let (tx, mut rx) = channel_for(seq.config());
        seq.start(steps(), Always, tx).unwrap();
        tokio::time::sleep(Duration::from_millis(250)).await;

        let run_id = seq.run_id().unwrap();
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            assert_eq!(event.run_id(), run_id);
            events.push(event);
        }
        assert_eq!(events.len(), 3);
        assert!(matches!(
            &events[0],
            SequencerEvent::StepEntered { step, pass: 0, .. } if step.label() == "check"
        ));
        assert!(matches!(
            &events[1],
            SequencerEvent::StepEntered { step, pass: 0, .. } if step.label() == "move"
        ));
        assert!(matches!(
            events[2],
            SequencerEvent::Done { reason: DoneReason::PassLimitReached, .. }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_done_without_steps_still_carries_run_id() {
        let mut seq = Sequencer::default();
        let (tx, mut rx) = channel(4);
        seq.start(steps(), Flag::new(false), tx).unwrap();

        let event = rx.try_recv().unwrap();
        assert_eq!(
            event,
            SequencerEvent::Done {
                run_id: seq.run_id().unwrap(),
                reason: DoneReason::PredicateFalse,
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_channel_drops_without_stalling_the_run() {
        let mut seq = Sequencer::default();
        let (tx, mut rx) = channel(1);
        seq.start(steps(), Always, tx).unwrap();
        tokio::time::sleep(Duration::from_millis(450)).await;

        // Only the first event fit; the run kept going regardless.
        assert_eq!(seq.pass_index(), 2);
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    async fn drain(rx: &mut Receiver<SequencerEvent>) -> Vec<SequencerEvent> {
        let mut events = Vec::new();
        tokio::time::timeout(Duration::from_secs(60), async {
            while let Some(event) = rx.recv().await {
                events.push(event);
            }
        })
        .await
        .expect("Channel should close once the run ends");
        events
    }

    #[tokio::test(start_paused = true)]
    async fn test_channel_closes_when_run_stops() {
        let mut seq = Sequencer::default();
        let (tx, mut rx) = channel(16);
        seq.start(steps(), Always, tx).unwrap();
        tokio::time::sleep(Duration::from_millis(150)).await;
        seq.stop();

        let events = drain(&mut rx).await;
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| !e.is_done()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_channel_closes_when_run_finishes() {
        let mut seq = Sequencer::new(Config::default().with_max_passes(1));
        let (tx, mut rx) = channel(16);
        seq.start(steps(), Always, tx).unwrap();

        let events = drain(&mut rx).await;
        assert_eq!(events.len(), 3);
        assert!(events[2].is_done());
        assert_eq!(seq.state(), crate::RunState::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_channel_is_ignored() {
        let mut seq = Sequencer::default();
        let (tx, rx) = channel(4);
        drop(rx);
        seq.start(steps(), Always, tx).unwrap();
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(seq.step_index(), 1);
    }
}
