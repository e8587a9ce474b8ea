//! Synthetic sensor nodes for running without hardware
//!
//! `SimLidarNode` sweeps an obstacle toward and away from the robot's nose;
//! `SimCameraNode` periodically shows a green patch in an otherwise dark
//! frame. Both are deterministic in their tick count.

use crate::config::CleanerConfig;
use crate::messages::{Image, LaserScan};
use cleaner_core::core::TopicMetadata;
use cleaner_core::error::CleanerResult;
use cleaner_core::{Hub, Node, NodeInfo};

/// Synthetic 360° range sensor
pub struct SimLidarNode {
    publisher: Hub<LaserScan>,
    beam_count: usize,
    max_range: f32,
    nearest: f32,
    farthest: f32,
    /// Ticks for the obstacle to approach and retreat once
    period_ticks: u64,
    tick_count: u64,
}

impl SimLidarNode {
    /// Create a new simulated lidar on the default "scan" topic
    pub fn new() -> CleanerResult<Self> {
        Self::from_config(&CleanerConfig::default())
    }

    pub fn from_config(config: &CleanerConfig) -> CleanerResult<Self> {
        Ok(Self {
            publisher: Hub::new_with_capacity(&config.topics.scan, config.topics.queue_depth)?,
            beam_count: 360,
            max_range: 3.5,
            nearest: 0.3,
            farthest: 2.5,
            period_ticks: 80,
            tick_count: 0,
        })
    }

    pub fn set_beam_count(&mut self, beam_count: usize) {
        self.beam_count = beam_count.max(1);
    }

    pub fn set_period_ticks(&mut self, period_ticks: u64) {
        self.period_ticks = period_ticks.max(2);
    }

    /// Obstacle distance at a tick: triangle wave between nearest and farthest
    pub fn obstacle_distance(&self, tick: u64) -> f32 {
        let half = self.period_ticks / 2;
        let phase = tick % self.period_ticks;
        let approach = if phase < half { phase } else { self.period_ticks - phase };
        let fraction = approach as f32 / half as f32;
        self.farthest - fraction * (self.farthest - self.nearest)
    }

    fn generate_scan_data(&self, tick: u64) -> Vec<f32> {
        let obstacle = self.obstacle_distance(tick);
        let increment = std::f32::consts::TAU / self.beam_count as f32;

        (0..self.beam_count)
            .map(|i| {
                let angle = i as f32 * increment;
                if i % 17 == 3 {
                    0.0 // dropped return
                } else if angle.cos() > 0.95 {
                    obstacle / angle.cos()
                } else if (angle - std::f32::consts::FRAC_PI_2).abs() < 0.4 {
                    1.0 // wall on the left
                } else {
                    self.max_range
                }
            })
            .map(|range| if range > 0.0 { range.min(self.max_range) } else { range })
            .collect()
    }
}

impl Node for SimLidarNode {
    fn name(&self) -> &'static str {
        "sim_lidar_node"
    }

    fn tick(&mut self, ctx: Option<&mut NodeInfo>) {
        let ranges = self.generate_scan_data(self.tick_count);
        self.tick_count += 1;

        let mut scan = LaserScan::from_ranges(ranges);
        scan.range_max = self.max_range;
        self.publisher.send(scan, ctx);
    }

    fn get_publishers(&self) -> Vec<TopicMetadata> {
        vec![TopicMetadata::of::<LaserScan>(self.publisher.get_topic_name())]
    }
}

/// Synthetic BGR camera
pub struct SimCameraNode {
    publisher: Hub<Image>,
    width: u32,
    height: u32,
    /// Ticks per cycle, and how many of those show the patch
    period_ticks: u64,
    visible_ticks: u64,
    tick_count: u64,
}

impl SimCameraNode {
    /// Create a new simulated camera on the default "camera/image_raw" topic
    pub fn new() -> CleanerResult<Self> {
        Self::from_config(&CleanerConfig::default())
    }

    pub fn from_config(config: &CleanerConfig) -> CleanerResult<Self> {
        Ok(Self {
            publisher: Hub::new_with_capacity(&config.topics.image, config.topics.queue_depth)?,
            width: 160,
            height: 120,
            period_ticks: 100,
            visible_ticks: 20,
            tick_count: 0,
        })
    }

    pub fn set_schedule(&mut self, period_ticks: u64, visible_ticks: u64) {
        self.period_ticks = period_ticks.max(1);
        self.visible_ticks = visible_ticks.min(self.period_ticks);
    }

    pub fn target_visible(&self, tick: u64) -> bool {
        tick % self.period_ticks >= self.period_ticks - self.visible_ticks
    }

    fn render_frame(&self, tick: u64) -> Image {
        let mut frame = Image::filled_bgr(self.width, self.height, [30, 30, 30]);
        if self.target_visible(tick) {
            // 30x30 patch, well above the detection score
            let x = self.width / 2 - 15;
            let y = self.height - 40;
            frame.fill_rect_bgr(x, y, 30, 30, [20, 200, 30]);
        }
        frame
    }
}

impl Node for SimCameraNode {
    fn name(&self) -> &'static str {
        "sim_camera_node"
    }

    fn tick(&mut self, ctx: Option<&mut NodeInfo>) {
        let frame = self.render_frame(self.tick_count);
        self.tick_count += 1;
        self.publisher.send(frame, ctx);
    }

    fn get_publishers(&self) -> Vec<TopicMetadata> {
        vec![TopicMetadata::of::<Image>(self.publisher.get_topic_name())]
    }
}
