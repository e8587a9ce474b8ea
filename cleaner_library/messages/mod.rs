//! Message types exchanged with the robot's sensor and actuation boundaries
//!
//! - Sensor: range sweeps (`LaserScan`)
//! - Vision: camera frames (`Image`, `ImageEncoding`)
//! - Control: velocity commands (`CmdVel`)
//!
//! All message types are re-exported at the crate root for convenience.

pub mod cmd_vel;
pub mod sensor;
pub mod vision;

pub use cmd_vel::CmdVel;
pub use sensor::LaserScan;
pub use vision::{Image, ImageEncoding};
