//! Debounce driver
//!
//! A background task that watches the current document. Every observed
//! value restarts the quiet-period timer; when the timer fires, only the
//! latest value is evaluated. Evaluations run as their own tasks, so a
//! firing while a save is in flight is rejected by the coordinator instead
//! of waiting behind it.

use super::{AutosaveCoordinator, SaveEvent, SaveOutcome};
use std::sync::Arc;
use std::time::Duration;
use studio_core::{StudioError, StudioResult};
use studio_ir::Snapshot;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{Instant, sleep_until};
use tracing::{debug, trace};

enum Command {
    Observe(Snapshot),
    Flush(oneshot::Sender<SaveOutcome>),
    Close(oneshot::Sender<SaveOutcome>),
}

/// Owner of a running debounce driver
#[derive(Debug)]
pub struct AutosaveHandle {
    coordinator: Arc<AutosaveCoordinator>,
    commands: mpsc::UnboundedSender<Command>,
    task: JoinHandle<()>,
}

impl AutosaveHandle {
    /// Start the driver on the current tokio runtime
    pub fn spawn(coordinator: Arc<AutosaveCoordinator>, delay: Duration) -> Self {
        let (commands, receiver) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(coordinator.clone(), delay, receiver));
        Self {
            coordinator,
            commands,
            task,
        }
    }

    pub fn coordinator(&self) -> &Arc<AutosaveCoordinator> {
        &self.coordinator
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SaveEvent> {
        self.coordinator.subscribe()
    }

    /// Hand the driver the latest document
    ///
    /// The first value ever observed becomes the baseline and is not saved.
    pub fn observe(&self, doc: Snapshot) {
        if self.commands.send(Command::Observe(doc)).is_err() {
            debug!("autosave driver stopped, observation dropped");
        }
    }

    /// Wait for running saves, then evaluate the latest document now
    pub async fn flush(&self) -> StudioResult<SaveOutcome> {
        let (reply, outcome) = oneshot::channel();
        self.commands
            .send(Command::Flush(reply))
            .map_err(|_| stopped())?;
        outcome.await.map_err(|_| stopped())
    }

    /// Flush once more and stop the driver
    pub async fn close(self) -> StudioResult<SaveOutcome> {
        let (reply, outcome) = oneshot::channel();
        self.commands
            .send(Command::Close(reply))
            .map_err(|_| stopped())?;
        let outcome = outcome.await.map_err(|_| stopped())?;
        self.task
            .await
            .map_err(|e| StudioError::internal(format!("autosave driver panicked: {}", e)))?;
        Ok(outcome)
    }
}

fn stopped() -> StudioError {
    StudioError::internal("autosave driver is not running")
}

async fn run(
    coordinator: Arc<AutosaveCoordinator>,
    delay: Duration,
    mut commands: mpsc::UnboundedReceiver<Command>,
) {
    let mut latest: Option<Snapshot> = None;
    let mut deadline: Option<Instant> = None;
    let mut in_flight = JoinSet::new();

    loop {
        tokio::select! {
            command = commands.recv() => match command {
                Some(Command::Observe(doc)) => {
                    if coordinator.seed_baseline(&doc) {
                        deadline = None;
                    } else {
                        deadline = Some(Instant::now() + delay);
                        trace!(delay_ms = delay.as_millis() as u64, "autosave timer reset");
                    }
                    latest = Some(doc);
                }
                Some(Command::Flush(reply)) => {
                    let _ = reply.send(settle_and_evaluate(&coordinator, &mut in_flight, &latest, &mut deadline).await);
                }
                Some(Command::Close(reply)) => {
                    let _ = reply.send(settle_and_evaluate(&coordinator, &mut in_flight, &latest, &mut deadline).await);
                    break;
                }
                None => {
                    while in_flight.join_next().await.is_some() {}
                    break;
                }
            },
            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                deadline = None;
                let coordinator = coordinator.clone();
                let doc = latest.clone();
                trace!("autosave timer fired");
                in_flight.spawn(async move { coordinator.evaluate(doc).await });
            }
            Some(_) = in_flight.join_next(), if !in_flight.is_empty() => {}
        }
    }
    debug!("autosave driver stopped");
}

async fn settle_and_evaluate(
    coordinator: &AutosaveCoordinator,
    in_flight: &mut JoinSet<SaveOutcome>,
    latest: &Option<Snapshot>,
    deadline: &mut Option<Instant>,
) -> SaveOutcome {
    while in_flight.join_next().await.is_some() {}
    *deadline = None;
    coordinator.evaluate(latest.clone()).await
}

// ============================================================================
// Tests
// ============================================================================
