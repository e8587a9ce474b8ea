//! Smart Cleaner Nodes
//!
//! Every node follows the same constructor pattern: `NodeName::new(..)` for
//! the default topics or `NodeName::from_config(&config, ..)` for configured
//! ones.
//!
//! ## Perception
//! - `RangeFilterNode` - forward clearance from `LaserScan`
//! - `TrashDetectorNode` - target presence from camera frames
//!
//! ## Control
//! - `CleanerControllerNode` - fuses both signals into one `CmdVel` per tick
//!
//! ## Simulation
//! - `SimLidarNode`, `SimCameraNode` - synthetic sensor streams

pub mod cleaner_controller_node;
pub mod cleaner_pipeline;
pub mod range_filter_node;
pub mod sim_sensors;
pub mod trash_detector_node;

pub use cleaner_controller_node::CleanerControllerNode;
pub use cleaner_pipeline::CleanerPipeline;
pub use range_filter_node::RangeFilterNode;
pub use sim_sensors::{SimCameraNode, SimLidarNode};
pub use trash_detector_node::TrashDetectorNode;
