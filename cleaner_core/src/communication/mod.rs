//! # Communication layer
//!
//! - **Hub**: named in-process topics with a bounded keep-last queue. Used at
//!   the process boundary: range sweeps and camera frames come in, velocity
//!   commands go out.
//! - **Signal**: single-writer / single-reader atomic cells holding the latest
//!   value of a small scalar. Used for state that sensor callbacks write and
//!   the control tick reads.
//!
//! ```rust,no_run
//! use cleaner_core::communication::{signal, Hub};
//!
//! let hub: Hub<String> = Hub::new("topic_name").unwrap();
//! let (writer, reader) = signal(false);
//! writer.set(true);
//! assert!(reader.get());
//! ```

pub mod hub;
pub mod signal;

pub use hub::{Hub, HubMetrics};
pub use signal::{signal, SignalReader, SignalValue, SignalWriter};
