//! Chunked, optionally parallel grid evaluation

use crate::grid::Grid;
use crate::progress::{ProgressObserver, ProgressReporter};
use crate::server::{coverage_at, ExponentPolicy};
use crate::{
    CoverageError, CoveragePoint, CoverageResult, CoverageTally, Result, SimulationParameters,
};
use geodesy::GeoArea;
use propagation::Tower;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Engine tuning; none of these settings change computed results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Grid points per work unit
    pub chunk_size: usize,
    /// Minimum completed points between progress events
    pub progress_interval: usize,
    /// Evaluate chunks on rayon workers
    pub parallel: bool,
    /// Dedicated pool size; `None` uses the global rayon pool
    pub worker_threads: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1024,
            progress_interval: 100,
            parallel: true,
            worker_threads: None,
        }
    }
}

impl EngineConfig {
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Default::default()
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval.max(1);
        self
    }

    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = Some(threads.max(1));
        self
    }
}

/// Output of one chunk
struct ChunkOutput {
    points: Vec<CoveragePoint>,
    tally: CoverageTally,
}

#[derive(Debug, Clone, Default)]
pub struct CoverageEngine {
    config: EngineConfig,
    cancel: CancellationToken,
}

impl CoverageEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            cancel: CancellationToken::new(),
        }
    }

    /// Observe an externally owned cancellation token
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Simulate coverage of `area` by `towers`.
    ///
    /// Inputs are validated before any point is evaluated. Points come back in
    /// row-major grid order whatever the chunking or worker count.
    pub fn run(
        &self,
        area: &GeoArea,
        towers: &[Tower],
        params: &SimulationParameters,
        grid_resolution: u32,
        observer: Option<&dyn ProgressObserver>,
    ) -> Result<CoverageResult> {
        area.validate()?;
        params.validate()?;
        validate_towers(towers)?;
        let grid = Grid::new(area, grid_resolution)?;
        debug!(towers = towers.len(), "Inputs validated");

        let simulation_id = Uuid::new_v4();
        let started = Instant::now();
        info!(
            %simulation_id,
            points = grid.len(),
            towers = towers.len(),
            resolution = grid_resolution,
            parallel = self.config.parallel,
            "Starting coverage simulation"
        );
        if towers.is_empty() {
            warn!(%simulation_id, "No towers supplied; every point will be uncovered");
        }

        let reporter = ProgressReporter::new(
            observer,
            simulation_id,
            grid.len(),
            self.config.progress_interval,
        );
        reporter.started();

        let chunks = chunk_ranges(grid.len(), self.config.chunk_size);
        debug!(%simulation_id, chunks = chunks.len(), "Partitioned grid");

        let policy = ExponentPolicy::SimulationWide(params.path_loss_exponent);
        let evaluate = |range: &Range<usize>| -> Result<Option<ChunkOutput>> {
            if self.cancel.is_cancelled() {
                return Ok(None);
            }
            let output = evaluate_chunk(
                &grid,
                towers,
                policy,
                params.receiver_sensitivity,
                range.clone(),
            )?;
            reporter.advance(range.len());
            debug!(start = range.start, end = range.end, "Chunk evaluated");
            Ok(Some(output))
        };

        let outputs = match self.evaluate_chunks(&chunks, evaluate) {
            Ok(outputs) => outputs,
            Err(e) => {
                warn!(%simulation_id, error = %e, "Coverage simulation aborted");
                reporter.failed(&e.to_string());
                return Err(e);
            }
        };

        if outputs.iter().any(Option::is_none) {
            let processed = reporter.processed();
            warn!(%simulation_id, processed, total = grid.len(), "Coverage simulation cancelled");
            reporter.cancelled();
            return Err(CoverageError::Cancelled {
                processed,
                total: grid.len(),
            });
        }

        let mut points = Vec::with_capacity(grid.len());
        let mut tally = CoverageTally::default();
        for output in outputs.into_iter().flatten() {
            points.extend(output.points);
            tally = match tally.merge(output.tally) {
                Some(merged) => merged,
                None => {
                    let e = CoverageError::SignalSumOverflow;
                    warn!(%simulation_id, error = %e, "Coverage simulation aborted");
                    reporter.failed(&e.to_string());
                    return Err(e);
                }
            };
        }

        let statistics = tally.into_statistics(area.rectangle_area_km2());
        reporter.completed();

        info!(
            %simulation_id,
            elapsed_ms = started.elapsed().as_millis() as u64,
            overall_pct = statistics.overall_coverage,
            strong_pct = statistics.strong_coverage,
            area_km2 = statistics.coverage_area,
            "Coverage simulation complete"
        );

        Ok(CoverageResult { points, statistics })
    }

    fn evaluate_chunks<F>(&self, chunks: &[Range<usize>], evaluate: F) -> Result<Vec<Option<ChunkOutput>>>
    where
        F: Fn(&Range<usize>) -> Result<Option<ChunkOutput>> + Send + Sync,
    {
        if !self.config.parallel {
            return chunks.iter().map(evaluate).collect();
        }

        match self.config.worker_threads {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|i| format!("coverage-worker-{}", i))
                    .build()
                    .map_err(|e| CoverageError::ThreadPool(e.to_string()))?;
                pool.install(|| chunks.par_iter().map(&evaluate).collect())
            }
            None => chunks.par_iter().map(&evaluate).collect(),
        }
    }
}

/// Reject towers whose location or RF parameters cannot be evaluated
pub(crate) fn validate_towers(towers: &[Tower]) -> Result<()> {
    for tower in towers {
        tower
            .validate()
            .map_err(|source| CoverageError::InvalidTower {
                id: tower.id.clone(),
                source,
            })?;
    }
    Ok(())
}

/// Contiguous index ranges covering `0..len`
fn chunk_ranges(len: usize, chunk_size: usize) -> Vec<Range<usize>> {
    let chunk_size = chunk_size.max(1);
    (0..len)
        .step_by(chunk_size)
        .map(|start| start..(start + chunk_size).min(len))
        .collect()
}

fn evaluate_chunk(
    grid: &Grid,
    towers: &[Tower],
    policy: ExponentPolicy,
    receiver_sensitivity: f64,
    range: Range<usize>,
) -> Result<ChunkOutput> {
    let mut points = Vec::with_capacity(range.len());
    let mut tally = CoverageTally::default();

    for index in range {
        let point = coverage_at(grid.point(index), towers, policy, receiver_sensitivity)?;
        tally
            .record(point.signal_strength, point.signal_bars)
            .ok_or(CoverageError::ArithmeticFault {
                latitude: point.latitude,
                longitude: point.longitude,
            })?;
        points.push(point);
    }

    Ok(ChunkOutput { points, tally })
}

#[cfg(test)]
mod tests {
    use super::*;
    use geodesy::GeoPoint;

    fn unit_area() -> GeoArea {
        GeoArea::new(GeoPoint::new(1.0, 1.0), GeoPoint::new(0.0, 0.0))
    }

    #[test]
    fn test_chunk_ranges() {
        assert_eq!(chunk_ranges(10, 4), vec![0..4, 4..8, 8..10]);
        assert_eq!(chunk_ranges(4, 4), vec![0..4]);
        assert_eq!(chunk_ranges(3, 0), vec![0..1, 1..2, 2..3]);
        assert!(chunk_ranges(0, 4).is_empty());
    }

    #[test]
    fn test_config_builders() {
        let config = EngineConfig::sequential()
            .with_chunk_size(0)
            .with_progress_interval(0)
            .with_worker_threads(0);
        assert!(!config.parallel);
        assert_eq!(config.chunk_size, 1);
        assert_eq!(config.progress_interval, 1);
        assert_eq!(config.worker_threads, Some(1));
    }

    #[test]
    fn test_validation_precedes_work() {
        let engine = CoverageEngine::default();
        let inverted = GeoArea::new(GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 1.0));
        let params = SimulationParameters::default();

        assert!(matches!(
            engine.run(&inverted, &[], &params, 10, None),
            Err(CoverageError::InvalidArea(_))
        ));
        assert!(matches!(
            engine.run(&unit_area(), &[], &params, 0, None),
            Err(CoverageError::InvalidGridResolution(0))
        ));
    }

    #[test]
    fn test_pre_cancelled_run() {
        let engine = CoverageEngine::new(EngineConfig::sequential());
        engine.cancellation_token().cancel();

        let result = engine.run(&unit_area(), &[], &SimulationParameters::default(), 4, None);
        assert!(matches!(
            result,
            Err(CoverageError::Cancelled { processed: 0, total: 25 })
        ));
    }

    #[test]
    fn test_dedicated_pool() {
        let engine = CoverageEngine::new(EngineConfig::default().with_worker_threads(2).with_chunk_size(3));
        let towers = vec![Tower::new("T", "telco1", GeoPoint::new(0.5, 0.5))];
        let result = engine
            .run(&unit_area(), &towers, &SimulationParameters::default(), 4, None)
            .unwrap();
        assert_eq!(result.points.len(), 25);
    }
}
