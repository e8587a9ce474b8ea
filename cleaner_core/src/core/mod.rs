//! # Core types and traits
//!
//! - **Node**: The base trait for every computational unit
//! - **NodeInfo**: Runtime context handed to nodes during execution
//!
//! ## Node Lifecycle
//!
//! 1. **Construction** - Node is created with its configuration and topic handles
//! 2. **Initialization** - `init()` is called once by the scheduler
//! 3. **Execution** - `tick()` is called at the scheduler (or per-node) rate
//! 4. **Shutdown** - `shutdown()` is called once when the scheduler stops

pub mod node;
pub mod node_info_ext;

pub use node::{LogSummary, Node, NodeConfig, NodeInfo, NodeMetrics, NodeState, TopicMetadata};
pub use node_info_ext::NodeInfoExt;
