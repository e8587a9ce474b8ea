//! Controller configuration
//!
//! Every value defaults to the tuned constants the cleaner ships with. A
//! TOML or YAML file may override any subset; values are copied into the
//! nodes at construction and do not change while the scheduler runs.
//!
//! ```toml
//! [range]
//! sector_half_width = 20
//! min_valid_range = 0.1
//!
//! [motion]
//! avoid_distance = 0.6
//!
//! [scheduler.timing]
//! global_rate_hz = 10.0
//! ```

use cleaner_core::error::{CleanerError, CleanerResult};
use cleaner_core::SchedulerConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Forward-sector range filtering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeConfig {
    /// Beams taken from each end of the sweep (K)
    pub sector_half_width: usize,
    /// Readings at or below this are no-returns
    pub min_valid_range: f32,
}

impl Default for RangeConfig {
    fn default() -> Self {
        Self {
            sector_half_width: 20,
            min_valid_range: 0.1,
        }
    }
}

/// Color-threshold target detection (8-bit HSV, hue on 0..180)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionConfig {
    pub hsv_lower: [u8; 3],
    pub hsv_upper: [u8; 3],
    /// Score contributed by each in-band pixel
    pub pixel_unit: u64,
    /// Target is present when the score is strictly above this
    pub score_threshold: u64,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            hsv_lower: [40, 40, 40],
            hsv_upper: [80, 255, 255],
            pixel_unit: 255,
            score_threshold: 50_000,
        }
    }
}

/// Velocity commands per drive mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Turn away when clearance is strictly below this
    pub avoid_distance: f32,
    pub cruise_linear: f32,
    pub avoid_angular: f32,
    pub clean_angular: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            avoid_distance: 0.6,
            cruise_linear: 0.2,
            avoid_angular: 0.5,
            clean_angular: 1.0,
        }
    }
}

/// Topic names at the sensor and actuation boundaries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopicConfig {
    pub scan: String,
    pub image: String,
    pub cmd_vel: String,
    pub queue_depth: usize,
}

impl Default for TopicConfig {
    fn default() -> Self {
        Self {
            scan: "scan".to_string(),
            image: "camera/image_raw".to_string(),
            cmd_vel: "cmd_vel".to_string(),
            queue_depth: 10,
        }
    }
}

/// Complete controller configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanerConfig {
    pub range: RangeConfig,
    pub vision: VisionConfig,
    pub motion: MotionConfig,
    pub topics: TopicConfig,
    pub scheduler: SchedulerConfig,
}

impl CleanerConfig {
    /// Load from a `.toml`, `.yaml` or `.yml` file and validate
    pub fn from_file(path: impl AsRef<Path>) -> CleanerResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        let config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&contents)?,
            Some("yaml") | Some("yml") => Self::from_yaml_str(&contents)?,
            other => {
                return Err(CleanerError::config(format!(
                    "unsupported config extension {:?} for {}",
                    other,
                    path.display()
                )))
            }
        };

        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> CleanerResult<Self> {
        let config: Self = toml::from_str(contents)
            .map_err(|e| CleanerError::config(format!("invalid TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(contents: &str) -> CleanerResult<Self> {
        let config: Self = serde_yaml::from_str(contents)
            .map_err(|e| CleanerError::config(format!("invalid YAML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> CleanerResult<String> {
        toml::to_string_pretty(self).map_err(|e| CleanerError::Serialization(e.to_string()))
    }

    pub fn validate(&self) -> CleanerResult<()> {
        if self.range.sector_half_width == 0 {
            return Err(CleanerError::config("range.sector_half_width must be at least 1"));
        }
        if !self.range.min_valid_range.is_finite() || self.range.min_valid_range < 0.0 {
            return Err(CleanerError::config(
                "range.min_valid_range must be a non-negative number",
            ));
        }

        let (lower, upper) = (self.vision.hsv_lower, self.vision.hsv_upper);
        if lower.iter().zip(upper.iter()).any(|(lo, hi)| lo > hi) {
            return Err(CleanerError::config(format!(
                "vision.hsv_lower {:?} exceeds vision.hsv_upper {:?}",
                lower, upper
            )));
        }
        if lower[0] >= 180 {
            return Err(CleanerError::config("vision hue bounds must be below 180"));
        }
        if self.vision.pixel_unit == 0 {
            return Err(CleanerError::config("vision.pixel_unit must be positive"));
        }

        let motion = &self.motion;
        let speeds = [
            motion.avoid_distance,
            motion.cruise_linear,
            motion.avoid_angular,
            motion.clean_angular,
        ];
        if speeds.iter().any(|v| !v.is_finite()) || motion.avoid_distance <= 0.0 {
            return Err(CleanerError::config(
                "motion values must be finite and avoid_distance positive",
            ));
        }

        if self.topics.queue_depth == 0 {
            return Err(CleanerError::config("topics.queue_depth must be at least 1"));
        }
        for (key, name) in [
            ("scan", &self.topics.scan),
            ("image", &self.topics.image),
            ("cmd_vel", &self.topics.cmd_vel),
        ] {
            if name.is_empty() {
                return Err(CleanerError::config(format!("topics.{} must not be empty", key)));
            }
        }

        self.scheduler.validate()
    }
}
