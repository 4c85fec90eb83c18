//! Mergeable coverage counters
//!
//! Signal sums are held in fixed-point nano-dBm so that merging partial
//! tallies is exact: any chunking of the grid, reduced in any order, yields
//! bit-identical statistics.

use crate::Statistics;

/// Fixed-point scale (9 decimal places)
const NANO_PER_DBM: f64 = 1_000_000_000.0;

/// Half-open range of scaled values representable as i128
const I128_MIN_F64: f64 = -1.7014118346046923e38;
const I128_MAX_F64: f64 = 1.7014118346046923e38;

const STRONG_BARS: u8 = 4;
const WEAK_BARS: std::ops::RangeInclusive<u8> = 1..=2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoverageTally {
    pub total: u64,
    /// bars > 0
    pub covered: u64,
    /// bars >= 4
    pub strong: u64,
    /// bars in 1..=2
    pub weak: u64,
    /// Points with a finite signal estimate
    pub sampled: u64,
    signal_sum_nano: i128,
}

impl CoverageTally {
    /// Add one point; `None` if the signal sum would leave the i128 range,
    /// in which case the tally is left unchanged.
    #[must_use]
    pub fn record(&mut self, signal_dbm: f64, bars: u8) -> Option<()> {
        let signal_sum_nano = if signal_dbm.is_finite() {
            let scaled = (signal_dbm * NANO_PER_DBM).round();
            if !(I128_MIN_F64..I128_MAX_F64).contains(&scaled) {
                return None;
            }
            Some(self.signal_sum_nano.checked_add(scaled as i128)?)
        } else {
            None
        };

        self.total += 1;
        if bars > 0 {
            self.covered += 1;
        }
        if bars >= STRONG_BARS {
            self.strong += 1;
        }
        if WEAK_BARS.contains(&bars) {
            self.weak += 1;
        }
        if let Some(sum) = signal_sum_nano {
            self.sampled += 1;
            self.signal_sum_nano = sum;
        }
        Some(())
    }

    /// Combine two partial tallies (associative and commutative); `None` on
    /// signal sum overflow
    pub fn merge(self, other: Self) -> Option<Self> {
        Some(Self {
            total: self.total + other.total,
            covered: self.covered + other.covered,
            strong: self.strong + other.strong,
            weak: self.weak + other.weak,
            sampled: self.sampled + other.sampled,
            signal_sum_nano: self.signal_sum_nano.checked_add(other.signal_sum_nano)?,
        })
    }

    pub fn signal_sum_dbm(&self) -> f64 {
        self.signal_sum_nano as f64 / NANO_PER_DBM
    }

    /// Mean over finite samples; `None` when there is no sample
    pub fn average_signal_dbm(&self) -> Option<f64> {
        (self.sampled > 0).then(|| self.signal_sum_dbm() / self.sampled as f64)
    }

    pub fn covered_fraction(&self) -> f64 {
        ratio(self.covered, self.total)
    }

    pub fn into_statistics(self, bounding_area_km2: f64) -> Statistics {
        Statistics {
            overall_coverage: ratio(self.covered, self.total) * 100.0,
            strong_coverage: ratio(self.strong, self.total) * 100.0,
            weak_coverage: ratio(self.weak, self.total) * 100.0,
            no_coverage: ratio(self.total - self.covered, self.total) * 100.0,
            average_signal_strength: self.average_signal_dbm(),
            coverage_area: bounding_area_km2 * self.covered_fraction(),
        }
    }
}

fn ratio(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}
