//! Progress observer that reports through tracing

use coverage_engine::{ProgressEvent, ProgressObserver, ProgressPhase};
use tracing::{info, warn};

#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl ProgressObserver for LogObserver {
    fn on_progress(&self, event: &ProgressEvent) {
        let id = event.simulation_id;
        match event.phase {
            ProgressPhase::Started
            | ProgressPhase::Calculating
            | ProgressPhase::Completed => info!(
                simulation_id = %id,
                processed = event.processed,
                total = event.total,
                "{}",
                event.message
            ),
            ProgressPhase::Cancelled | ProgressPhase::Failed => warn!(
                simulation_id = %id,
                processed = event.processed,
                total = event.total,
                "{}",
                event.message
            ),
        }
    }
}
