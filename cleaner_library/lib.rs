//! # Smart Cleaner Library
//!
//! Messages, perception algorithms and nodes for the Smart Cleaner robot.
//!
//! ## Structure
//!
//! ```text
//! cleaner_library/
//! ── messages/       # LaserScan, Image, CmdVel
//! ── algorithms/     # Forward clearance, target classification, arbitration
//! ── nodes/          # Scheduler nodes wrapping the algorithms
//! ── config.rs       # CleanerConfig (TOML / YAML)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cleaner_library::{CleanerConfig, CleanerPipeline};
//! use cleaner_core::Scheduler;
//!
//! let config = CleanerConfig::from_file("cleaner.toml")?;
//! let mut scheduler = Scheduler::new().with_config(config.scheduler.clone());
//! CleanerPipeline::new(&config)?.register(&mut scheduler);
//! scheduler.run()?;
//! ```

pub mod algorithms;
pub mod config;
pub mod messages;
pub mod nodes;

// Re-export core traits needed for message types
pub use cleaner_core::core::LogSummary;

pub use algorithms::{
    bgr_to_hsv, DriveMode, ForwardClearance, HsvBand, MotionArbiter, MotionDecision,
    RangeFrontFilter, TargetClassifier,
};
pub use config::{CleanerConfig, MotionConfig, RangeConfig, TopicConfig, VisionConfig};
pub use messages::*;
pub use nodes::{
    CleanerControllerNode, CleanerPipeline, RangeFilterNode, SimCameraNode, SimLidarNode,
    TrashDetectorNode,
};
