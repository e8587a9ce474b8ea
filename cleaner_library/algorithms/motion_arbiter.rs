use super::range_front_filter::ForwardClearance;
use crate::config::MotionConfig;
use crate::messages::CmdVel;
use std::fmt;

/// Behavior selected for one control tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriveMode {
    /// Target in view: spin in place over it
    Cleaning,
    /// Obstacle ahead: turn away
    Avoiding,
    /// Path clear: drive forward
    Cruising,
    /// Clearance unknown: hold still
    SafeStop,
}

impl fmt::Display for DriveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DriveMode::Cleaning => "Cleaning",
            DriveMode::Avoiding => "Avoiding",
            DriveMode::Cruising => "Cruising",
            DriveMode::SafeStop => "SafeStop",
        };
        f.write_str(name)
    }
}

/// Outcome of one arbitration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionDecision {
    pub mode: DriveMode,
    pub linear: f32,
    pub angular: f32,
}

impl MotionDecision {
    pub fn to_cmd_vel(&self) -> CmdVel {
        CmdVel::new(self.linear, self.angular)
    }
}

/// Fixed-priority fusion of clearance and target presence
///
/// First match wins: target present, then clearance strictly below the
/// avoidance distance, then cruise. A faulted clearance stops the robot
/// unless a target is present.
#[derive(Debug, Clone)]
pub struct MotionArbiter {
    config: MotionConfig,
}

impl Default for MotionArbiter {
    fn default() -> Self {
        Self::new(MotionConfig::default())
    }
}

impl MotionArbiter {
    pub fn new(config: MotionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    pub fn decide(&self, clearance: ForwardClearance, target_present: bool) -> MotionDecision {
        let (mode, linear, angular) = if target_present {
            (DriveMode::Cleaning, 0.0, self.config.clean_angular)
        } else {
            match clearance {
                ForwardClearance::Unavailable => (DriveMode::SafeStop, 0.0, 0.0),
                ForwardClearance::Measured(distance) if distance < self.config.avoid_distance => {
                    (DriveMode::Avoiding, 0.0, self.config.avoid_angular)
                }
                ForwardClearance::Measured(_) => {
                    (DriveMode::Cruising, self.config.cruise_linear, 0.0)
                }
            }
        };

        MotionDecision {
            mode,
            linear,
            angular,
        }
    }
}
