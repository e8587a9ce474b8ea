use crate::config::RangeConfig;
use cleaner_core::communication::SignalValue;
use cleaner_core::error::{CleanerError, CleanerResult};

/// Forward clearance as seen by the controller
///
/// `Unavailable` marks the cell as faulted after a sweep with no valid
/// forward return. It stays that way until the next valid sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ForwardClearance {
    Measured(f32),
    Unavailable,
}

impl ForwardClearance {
    pub fn meters(&self) -> Option<f32> {
        match self {
            ForwardClearance::Measured(distance) => Some(*distance),
            ForwardClearance::Unavailable => None,
        }
    }

    pub fn is_faulted(&self) -> bool {
        matches!(self, ForwardClearance::Unavailable)
    }
}

// A measured f32 only ever occupies the low 32 bits, so all-ones is free
// to mark the fault state.
const UNAVAILABLE_BITS: u64 = u64::MAX;

impl SignalValue for ForwardClearance {
    fn pack(self) -> u64 {
        match self {
            ForwardClearance::Measured(distance) => distance.to_bits() as u64,
            ForwardClearance::Unavailable => UNAVAILABLE_BITS,
        }
    }

    fn unpack(bits: u64) -> Self {
        if bits == UNAVAILABLE_BITS {
            ForwardClearance::Unavailable
        } else {
            ForwardClearance::Measured(f32::from_bits(bits as u32))
        }
    }
}

/// Reduces a 360° sweep to the distance of the nearest forward obstacle
///
/// The forward sector is the first and last `sector_half_width` beams,
/// wrapping around index 0. Sweeps shorter than two half-widths use every
/// beam once.
#[derive(Debug, Clone)]
pub struct RangeFrontFilter {
    sector_half_width: usize,
    min_valid_range: f32,
}

impl Default for RangeFrontFilter {
    fn default() -> Self {
        Self::new(&RangeConfig::default())
    }
}

impl RangeFrontFilter {
    pub fn new(config: &RangeConfig) -> Self {
        Self {
            sector_half_width: config.sector_half_width,
            min_valid_range: config.min_valid_range,
        }
    }

    pub fn sector_half_width(&self) -> usize {
        self.sector_half_width
    }

    pub fn min_valid_range(&self) -> f32 {
        self.min_valid_range
    }

    /// Forward-sector readings in index order (leading beams, then trailing)
    pub fn forward_sector<'a>(&self, ranges: &'a [f32]) -> impl Iterator<Item = f32> + 'a {
        let n = ranges.len();
        let k = self.sector_half_width;
        let (leading, trailing) = if n <= 2 * k {
            (ranges, &ranges[n..])
        } else {
            (&ranges[..k], &ranges[n - k..])
        };
        leading.iter().chain(trailing.iter()).copied()
    }

    /// A reading counts when it is above the no-return threshold
    ///
    /// `+inf` (beam left the sensor's range) is valid open space. NaN and
    /// `-inf` fail the comparison and are dropped with the no-returns.
    pub fn is_valid(&self, reading: f32) -> bool {
        reading > self.min_valid_range
    }

    /// Minimum valid forward reading
    ///
    /// Fails with `EmptyForwardSector` when the sector holds no reading above
    /// the no-return threshold.
    pub fn forward_clearance(&self, ranges: &[f32]) -> CleanerResult<f32> {
        self.forward_sector(ranges)
            .filter(|reading| self.is_valid(*reading))
            .fold(None, |nearest: Option<f32>, reading| {
                Some(nearest.map_or(reading, |n| n.min(reading)))
            })
            .ok_or_else(|| CleanerError::EmptyForwardSector {
                sector_len: self.forward_sector(ranges).count(),
                min_valid_range: self.min_valid_range,
            })
    }
}
