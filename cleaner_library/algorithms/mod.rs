//! Perception and decision algorithms
//!
//! Pure computations with no scheduler or topic dependencies. Nodes in
//! [`crate::nodes`] wrap these and move their results through signals.

pub mod motion_arbiter;
pub mod range_front_filter;
pub mod target_classifier;

pub use motion_arbiter::{DriveMode, MotionArbiter, MotionDecision};
pub use range_front_filter::{ForwardClearance, RangeFrontFilter};
pub use target_classifier::{bgr_to_hsv, HsvBand, TargetClassifier};
