use crate::error::{CleanerError, CleanerResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timing parameters for the tick loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Scheduler tick rate in Hz (10 Hz = 100 ms control period)
    pub global_rate_hz: f64,
    /// Warn when one pass over all nodes takes longer than the period
    pub warn_on_overrun: bool,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            global_rate_hz: 10.0,
            warn_on_overrun: true,
        }
    }
}

/// Scheduler configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Install a Ctrl+C handler that stops the tick loop
    pub handle_signals: bool,
    pub timing: TimingConfig,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl SchedulerConfig {
    /// 10 Hz control loop with signal handling
    pub fn standard() -> Self {
        Self {
            timing: TimingConfig::default(),
            handle_signals: true,
        }
    }

    /// Same rates as `standard()` but never touches process signal state
    pub fn testing() -> Self {
        Self {
            handle_signals: false,
            ..Self::standard()
        }
    }

    pub fn with_rate(mut self, rate_hz: f64) -> Self {
        self.timing.global_rate_hz = rate_hz;
        self
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.timing.global_rate_hz)
    }

    pub fn validate(&self) -> CleanerResult<()> {
        let rate = self.timing.global_rate_hz;
        if !rate.is_finite() || rate <= 0.0 || rate > 1000.0 {
            return Err(CleanerError::config(format!(
                "global_rate_hz must be in (0, 1000], got {}",
                rate
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_period_is_100ms() {
        let config = SchedulerConfig::standard();
        assert_eq!(config.tick_period(), Duration::from_millis(100));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_rates() {
        assert!(SchedulerConfig::standard().with_rate(0.0).validate().is_err());
        assert!(SchedulerConfig::standard().with_rate(-5.0).validate().is_err());
        assert!(SchedulerConfig::standard().with_rate(f64::NAN).validate().is_err());
        assert!(SchedulerConfig::standard().with_rate(50.0).validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SchedulerConfig =
            serde_json::from_str(r#"{"timing": {"global_rate_hz": 20.0}}"#).unwrap();
        assert_eq!(config.tick_period(), Duration::from_millis(50));
        assert!(config.timing.warn_on_overrun);
        assert!(config.handle_signals);
    }
}
