use super::{CleanerControllerNode, RangeFilterNode, SimCameraNode, SimLidarNode, TrashDetectorNode};
use crate::algorithms::ForwardClearance;
use crate::config::CleanerConfig;
use cleaner_core::error::CleanerResult;
use cleaner_core::{signal, Scheduler};

/// Clearance assumed before the first scan arrives (nothing ahead)
pub const INITIAL_CLEARANCE: f32 = 10.0;

// Producers tick before consumers within one cycle
pub const SIM_LIDAR_PRIORITY: u32 = 0;
pub const SIM_CAMERA_PRIORITY: u32 = 1;
pub const RANGE_FILTER_PRIORITY: u32 = 5;
pub const TRASH_DETECTOR_PRIORITY: u32 = 6;
pub const CONTROLLER_PRIORITY: u32 = 10;

/// The three controller nodes wired together through their signals
///
/// ```rust,ignore
/// let config = CleanerConfig::default();
/// let mut scheduler = Scheduler::new().with_config(config.scheduler.clone());
/// CleanerPipeline::new(&config)?.register(&mut scheduler);
/// scheduler.run()?;
/// ```
pub struct CleanerPipeline {
    pub range_filter: RangeFilterNode,
    pub trash_detector: TrashDetectorNode,
    pub controller: CleanerControllerNode,
}

impl CleanerPipeline {
    pub fn new(config: &CleanerConfig) -> CleanerResult<Self> {
        config.validate()?;

        let (clearance_tx, clearance_rx) = signal(ForwardClearance::Measured(INITIAL_CLEARANCE));
        let (presence_tx, presence_rx) = signal(false);

        Ok(Self {
            range_filter: RangeFilterNode::from_config(config, clearance_tx)?,
            trash_detector: TrashDetectorNode::from_config(config, presence_tx)?,
            controller: CleanerControllerNode::from_config(config, clearance_rx, presence_rx)?,
        })
    }

    /// Hand every node to the scheduler; the controller logs its mode changes
    pub fn register(self, scheduler: &mut Scheduler) {
        scheduler
            .add(Box::new(self.range_filter), RANGE_FILTER_PRIORITY, Some(true))
            .add(
                Box::new(self.trash_detector),
                TRASH_DETECTOR_PRIORITY,
                Some(false),
            )
            .add(Box::new(self.controller), CONTROLLER_PRIORITY, Some(true));
    }

    /// Attach synthetic sensors publishing on the configured topics
    pub fn register_simulated_sensors(
        config: &CleanerConfig,
        scheduler: &mut Scheduler,
    ) -> CleanerResult<()> {
        scheduler
            .add(
                Box::new(SimLidarNode::from_config(config)?),
                SIM_LIDAR_PRIORITY,
                Some(false),
            )
            .add(
                Box::new(SimCameraNode::from_config(config)?),
                SIM_CAMERA_PRIORITY,
                Some(false),
            );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cleaner_core::SchedulerConfig;

    #[test]
    fn test_registration_order() {
        let mut config = CleanerConfig::default();
        config.topics.scan = "pipeline_test/scan".to_string();
        config.topics.image = "pipeline_test/image".to_string();
        config.topics.cmd_vel = "pipeline_test/cmd_vel".to_string();

        let mut scheduler = Scheduler::new().with_config(SchedulerConfig::testing());
        CleanerPipeline::new(&config).unwrap().register(&mut scheduler);
        CleanerPipeline::register_simulated_sensors(&config, &mut scheduler).unwrap();

        assert_eq!(
            scheduler.get_node_list(),
            vec![
                "sim_lidar_node",
                "sim_camera_node",
                "range_filter_node",
                "trash_detector_node",
                "smart_cleaner_node",
            ]
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = CleanerConfig::default();
        config.topics.queue_depth = 0;
        assert!(CleanerPipeline::new(&config).is_err());
    }
}
