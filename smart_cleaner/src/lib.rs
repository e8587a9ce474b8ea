//! # Smart Cleaner
//!
//! A reactive controller for a patrolling ground robot: it cruises, turns
//! away from obstacles seen by the ranging sensor, and spins in place to
//! clean when the camera sees trash.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use smart_cleaner::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let config = CleanerConfig::default();
//!     let mut scheduler = Scheduler::new().with_config(config.scheduler.clone());
//!     CleanerPipeline::new(&config)?.register(&mut scheduler);
//!     scheduler.run_for(Duration::from_secs(5))
//! }
//! ```

// Re-export core components
pub use cleaner_core::{self, *};

// Re-export the library with an alias
pub use cleaner_library as library;

/// Everything needed to assemble and run the controller
pub mod prelude {
    // Core node types
    pub use cleaner_core::core::NodeConfig;
    pub use cleaner_core::core::{Node, NodeInfo, NodeInfoExt, NodeState};

    // Communication types
    pub use cleaner_core::communication::{signal, Hub, SignalReader, SignalWriter};

    // Scheduling
    pub use cleaner_core::scheduling::{Scheduler, SchedulerConfig};

    // Error types
    pub use cleaner_core::error::{CleanerError, CleanerResult};
    pub type Result<T> = CleanerResult<T>;

    pub use std::time::{Duration, Instant};

    pub use serde::{Deserialize, Serialize};

    pub use anyhow::{anyhow, bail, ensure, Context, Result as AnyResult};

    // Controller building blocks
    pub use cleaner_library::algorithms::*;
    pub use cleaner_library::config::*;
    pub use cleaner_library::messages::*;
    pub use cleaner_library::nodes::*;
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn version() -> &'static str {
    VERSION
}
