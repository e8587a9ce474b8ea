//! # Smart Cleaner Core
//!
//! The runtime the Smart Cleaner controller is built on.
//!
//! - **Nodes**: Independent computational units ticked by the scheduler
//! - **Communication**: In-process topics ([`Hub`]) for sensor input and
//!   actuation output, plus single-writer atomic [`signal`] cells for the
//!   state shared between sensor callbacks and the control tick
//! - **Scheduling**: Fixed-period tick loop with lifecycle management
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cleaner_core::{Hub, Node, NodeInfo, Scheduler};
//!
//! struct ExampleNode {
//!     output: Hub<String>,
//! }
//!
//! impl Node for ExampleNode {
//!     fn name(&self) -> &'static str { "example" }
//!
//!     fn tick(&mut self, ctx: Option<&mut NodeInfo>) {
//!         self.output.send("hello".to_string(), ctx);
//!     }
//! }
//!
//! let mut scheduler = Scheduler::new();
//! scheduler.add(Box::new(ExampleNode { output: Hub::new("chatter").unwrap() }), 0, Some(true));
//! scheduler.run().unwrap();
//! ```

pub mod communication;
pub mod core;
pub mod error;
pub mod scheduling;

pub use communication::{signal, Hub, SignalReader, SignalWriter};
pub use core::{LogSummary, Node, NodeInfo, NodeInfoExt, NodeState};
pub use error::{CleanerError, CleanerResult};
pub use scheduling::{Scheduler, SchedulerConfig};
