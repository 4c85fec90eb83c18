//! Progress reporting for coverage simulations.
//!
//! Progress is advisory: observers receive [`ProgressEvent`]s while a run
//! executes, and nothing they do can change the computed result. Events are
//! emitted at a bounded cadence (every `progress_interval` completed points,
//! measured at chunk boundaries) rather than on exact iteration counts, so
//! callers must not assume they are evenly spaced. The `processed` count of
//! successive events never decreases.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::broadcast;
use uuid::Uuid;

/// Lifecycle stage of a simulation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressPhase {
    Started,
    Calculating,
    Completed,
    Cancelled,
    Failed,
}

/// A progress notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEvent {
    /// Identifies the run that emitted the event.
    pub simulation_id: Uuid,

    pub phase: ProgressPhase,

    /// Grid points completed so far.
    pub processed: usize,

    /// Grid points in the run.
    pub total: usize,

    /// `processed / total × 100`.
    pub progress: f64,

    /// Human-readable status line.
    pub message: String,
}

/// Receives progress events; must be `Send + Sync` since events may be
/// emitted from rayon worker threads.
pub trait ProgressObserver: Send + Sync {
    fn on_progress(&self, event: &ProgressEvent);
}

impl<F> ProgressObserver for F
where
    F: Fn(&ProgressEvent) + Send + Sync,
{
    fn on_progress(&self, event: &ProgressEvent) {
        self(event)
    }
}

/// Fans progress events out over a tokio broadcast channel.
///
/// Sending never blocks; events are dropped when nobody is subscribed and
/// slow subscribers observe `RecvError::Lagged`.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    sender: broadcast::Sender<ProgressEvent>,
}

impl ChannelObserver {
    pub fn new(capacity: usize) -> (Self, broadcast::Receiver<ProgressEvent>) {
        let (sender, receiver) = broadcast::channel(capacity.max(1));
        (Self { sender }, receiver)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ProgressEvent> {
        self.sender.subscribe()
    }
}

impl ProgressObserver for ChannelObserver {
    fn on_progress(&self, event: &ProgressEvent) {
        let _ = self.sender.send(event.clone());
    }
}

/// Rate-limited emitter shared by the workers of one run
pub(crate) struct ProgressReporter<'a> {
    observer: Option<&'a dyn ProgressObserver>,
    simulation_id: Uuid,
    total: usize,
    interval: usize,
    processed: AtomicUsize,
    last_reported: Mutex<usize>,
}

impl<'a> ProgressReporter<'a> {
    pub(crate) fn new(
        observer: Option<&'a dyn ProgressObserver>,
        simulation_id: Uuid,
        total: usize,
        interval: usize,
    ) -> Self {
        Self {
            observer,
            simulation_id,
            total,
            interval: interval.max(1),
            processed: AtomicUsize::new(0),
            last_reported: Mutex::new(0),
        }
    }

    pub(crate) fn processed(&self) -> usize {
        self.processed.load(Ordering::Acquire)
    }

    pub(crate) fn started(&self) {
        self.emit(ProgressPhase::Started, 0, "Starting simulation...".to_string());
    }

    /// Record `points` more completed points and emit if the interval elapsed
    pub(crate) fn advance(&self, points: usize) {
        let done = self.processed.fetch_add(points, Ordering::AcqRel) + points;
        let Some(observer) = self.observer else {
            return;
        };

        // Emitting under the lock keeps observed counts monotonic
        let mut last = self
            .last_reported
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if done <= *last {
            return;
        }
        if done - *last < self.interval && done < self.total {
            return;
        }
        *last = done;

        let percent = self.percent(done);
        observer.on_progress(&self.event(
            ProgressPhase::Calculating,
            done,
            format!("Calculating coverage: {:.0}%", percent),
        ));
    }

    pub(crate) fn completed(&self) {
        self.emit(
            ProgressPhase::Completed,
            self.total,
            "Simulation completed successfully".to_string(),
        );
    }

    pub(crate) fn cancelled(&self) {
        self.emit(
            ProgressPhase::Cancelled,
            self.processed(),
            "Simulation cancelled".to_string(),
        );
    }

    pub(crate) fn failed(&self, reason: &str) {
        self.emit(
            ProgressPhase::Failed,
            self.processed(),
            format!("Simulation failed: {}", reason),
        );
    }

    fn emit(&self, phase: ProgressPhase, processed: usize, message: String) {
        if let Some(observer) = self.observer {
            observer.on_progress(&self.event(phase, processed, message));
        }
    }

    fn event(&self, phase: ProgressPhase, processed: usize, message: String) -> ProgressEvent {
        ProgressEvent {
            simulation_id: self.simulation_id,
            phase,
            processed,
            total: self.total,
            progress: self.percent(processed),
            message,
        }
    }

    fn percent(&self, processed: usize) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        processed as f64 / self.total as f64 * 100.0
    }
}
