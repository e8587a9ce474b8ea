use cleaner_core::LogSummary;
use serde::{Deserialize, Serialize};

/// Full-sweep range reading from the ranging sensor
///
/// `ranges[0]` is aligned with the robot heading and indices increase
/// counter-clockwise by `angle_increment`. A reading of `0.0` (or NaN) means
/// "no return"; `+inf` means the beam hit nothing within range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaserScan {
    pub ranges: Vec<f32>,
    pub angle_min: f32,
    pub angle_max: f32,
    pub angle_increment: f32,
    pub range_min: f32,
    pub range_max: f32,
    pub scan_time: f32,
    pub timestamp: u64,
}

impl LaserScan {
    /// Build a 360° scan with evenly spaced beams
    pub fn from_ranges(ranges: Vec<f32>) -> Self {
        let count = ranges.len().max(1);
        let angle_increment = std::f32::consts::TAU / count as f32;
        Self {
            angle_min: 0.0,
            angle_max: std::f32::consts::TAU - angle_increment,
            angle_increment,
            range_min: 0.12,
            range_max: 3.5,
            scan_time: 0.2,
            timestamp: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos() as u64,
            ranges,
        }
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Beam angle in radians for a given index
    pub fn angle_at(&self, index: usize) -> f32 {
        self.angle_min + index as f32 * self.angle_increment
    }
}

impl LogSummary for LaserScan {
    fn log_summary(&self) -> String {
        format!(
            "LaserScan({} beams, inc: {:.4} rad)",
            self.ranges.len(),
            self.angle_increment
        )
    }
}
