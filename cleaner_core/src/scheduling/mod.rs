//! # Scheduling
//!
//! Fixed-period scheduler that orchestrates node execution:
//!
//! - **Scheduler**: ticks every registered node once per period, in priority order
//! - **Simple Priorities**: numeric priorities (0 = highest, ticked first)
//! - **Optional Logging**: per-node logging configuration
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cleaner_core::Scheduler;
//!
//! let mut scheduler = Scheduler::new();
//! scheduler.add(Box::new(range_node), 0, Some(true));
//! scheduler.add(Box::new(camera_node), 1, Some(false));
//! scheduler.add(Box::new(controller), 10, Some(true));
//! scheduler.run()?; // Runs until Ctrl+C
//! ```

pub mod config;
pub mod scheduler;

pub use config::{SchedulerConfig, TimingConfig};
pub use scheduler::Scheduler;
