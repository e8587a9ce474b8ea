use cleaner_core::LogSummary;
use serde::{Deserialize, Serialize};

/// Command velocity message for the drive base
///
/// One of these is emitted per control tick. `linear` is forward speed,
/// `angular` is yaw rate (positive = counter-clockwise).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CmdVel {
    pub stamp_nanos: u64,
    pub linear: f32,  // m/s forward velocity
    pub angular: f32, // rad/s turning velocity
}

impl CmdVel {
    /// Create a new CmdVel message with current timestamp
    pub fn new(linear: f32, angular: f32) -> Self {
        Self {
            stamp_nanos: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos() as u64,
            linear,
            angular,
        }
    }

    /// Create a zero velocity command (stop)
    pub fn zero() -> Self {
        Self::new(0.0, 0.0)
    }

    pub fn with_timestamp(linear: f32, angular: f32, stamp_nanos: u64) -> Self {
        Self {
            stamp_nanos,
            linear,
            angular,
        }
    }

    pub fn is_stop(&self) -> bool {
        self.linear == 0.0 && self.angular == 0.0
    }
}

impl Default for CmdVel {
    fn default() -> Self {
        Self::zero()
    }
}

impl LogSummary for CmdVel {
    fn log_summary(&self) -> String {
        format!("CmdVel(linear: {:.2}, angular: {:.2})", self.linear, self.angular)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cmd_vel_creation() {
        let cmd = CmdVel::new(0.2, 0.0);
        assert_relative_eq!(cmd.linear, 0.2);
        assert_relative_eq!(cmd.angular, 0.0);
        assert!(cmd.stamp_nanos > 0);
        assert!(!cmd.is_stop());
    }

    #[test]
    fn test_cmd_vel_zero() {
        let cmd = CmdVel::default();
        assert!(cmd.is_stop());
    }

    #[test]
    fn test_log_summary() {
        let cmd = CmdVel::with_timestamp(0.0, 0.5, 0);
        assert_eq!(cmd.log_summary(), "CmdVel(linear: 0.00, angular: 0.50)");
    }
}
