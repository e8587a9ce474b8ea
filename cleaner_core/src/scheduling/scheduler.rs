use super::config::SchedulerConfig;
use crate::core::{Node, NodeInfo, NodeMetrics, NodeState};
use crate::error::{CleanerError, CleanerResult};
use colored::Colorize;
use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Once};
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;

/// Set by the Ctrl+C handler; checked by every running scheduler and
/// cleared once a loop has stopped because of it.
static INTERRUPTED: Lazy<Arc<AtomicBool>> = Lazy::new(|| Arc::new(AtomicBool::new(false)));
static SIGNAL_HANDLER: Once = Once::new();

/// Node registration info with lifecycle tracking and per-node rate control
struct RegisteredNode {
    node: Box<dyn Node>,
    priority: u32,
    initialized: bool,
    context: NodeInfo,
    rate_hz: Option<f64>,       // None = tick at the global scheduler rate
    last_tick: Option<Instant>, // Last tick time for rate limiting
}

impl RegisteredNode {
    fn due(&self, now: Instant) -> bool {
        match (self.rate_hz, self.last_tick) {
            (Some(rate_hz), Some(last_tick)) => {
                (now - last_tick).as_secs_f64() >= 1.0 / rate_hz
            }
            _ => true,
        }
    }
}

/// Central orchestrator: holds nodes, drives the tick loop.
pub struct Scheduler {
    nodes: Vec<RegisteredNode>,
    running: Arc<AtomicBool>,
    scheduler_name: String,
    config: SchedulerConfig,
    cycles: u64,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    /// Create an empty scheduler with the standard 10 Hz configuration.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            running: Arc::new(AtomicBool::new(true)),
            scheduler_name: "DefaultScheduler".to_string(),
            config: SchedulerConfig::standard(),
            cycles: 0,
        }
    }

    /// Apply a configuration (builder pattern)
    pub fn with_config(mut self, config: SchedulerConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the scheduler name (chainable)
    pub fn name(mut self, name: &str) -> Self {
        self.scheduler_name = name.to_string();
        self
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Register a node
    ///
    /// Lower priority values tick first within a cycle, so producers should
    /// be registered with a lower value than the nodes that consume their output.
    pub fn add(
        &mut self,
        node: Box<dyn Node>,
        priority: u32,
        logging_enabled: Option<bool>,
    ) -> &mut Self {
        let node_name = node.name().to_string();
        let logging_enabled = logging_enabled.unwrap_or(false);

        if self.nodes.iter().any(|r| r.node.name() == node_name) {
            tracing::warn!(
                scheduler = %self.scheduler_name,
                "Node '{}' registered twice; names should be unique",
                node_name
            );
        }

        let context = NodeInfo::new(node_name.clone(), logging_enabled);
        self.nodes.push(RegisteredNode {
            node,
            priority,
            initialized: false,
            context,
            rate_hz: None,
            last_tick: None,
        });
        // Stable sort keeps registration order among equal priorities
        self.nodes.sort_by_key(|r| r.priority);

        tracing::info!(
            scheduler = %self.scheduler_name,
            "Added node '{}' with priority {} (logging: {})",
            node_name,
            priority,
            logging_enabled
        );

        self
    }

    /// Set per-node rate control (chainable)
    ///
    /// A node with its own rate is skipped on cycles where its period has not
    /// elapsed; other nodes tick at the global scheduler rate.
    pub fn set_node_rate(&mut self, name: &str, rate_hz: f64) -> &mut Self {
        match self.nodes.iter_mut().find(|r| r.node.name() == name) {
            Some(registered) => {
                registered.rate_hz = Some(rate_hz);
                tracing::info!("Set node '{}' rate to {:.1} Hz", name, rate_hz);
            }
            None => tracing::warn!("Node '{}' not found for rate configuration", name),
        }
        self
    }

    /// Check if the scheduler is running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst) && !INTERRUPTED.load(Ordering::SeqCst)
    }

    /// Stop the scheduler
    ///
    /// Also honored when called before `run`: the next loop initializes and
    /// shuts down the nodes without ticking them.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Shared stop flag, for stopping the loop from another thread
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        self.running.clone()
    }

    /// Main loop with signal handling; returns after Ctrl+C or `stop()`
    pub fn run(&mut self) -> CleanerResult<()> {
        self.run_with_limit(None)
    }

    /// Run all nodes for a specified duration, then shutdown gracefully
    pub fn run_for(&mut self, duration: Duration) -> CleanerResult<()> {
        self.run_with_limit(Some(duration))
    }

    /// Initialize pending nodes and execute exactly one cycle, without sleeping
    ///
    /// Lets tests drive the control loop deterministically.
    pub fn tick_once(&mut self) -> CleanerResult<()> {
        self.initialize_nodes();
        self.execute_cycle();
        Ok(())
    }

    /// Shut down every initialized node
    pub fn shutdown(&mut self) {
        for registered in self.nodes.iter_mut() {
            if !registered.initialized {
                continue;
            }
            let node_name = registered.node.name();
            match registered.node.shutdown(&mut registered.context) {
                Ok(()) => tracing::info!("Shutdown node '{}' successfully", node_name),
                Err(e) => tracing::error!("Error shutting down node '{}': {}", node_name, e),
            }
            if let Err(e) = registered.context.shutdown() {
                tracing::warn!("Node '{}' context: {}", node_name, e);
            }
            registered.initialized = false;
        }
    }

    fn run_with_limit(&mut self, duration: Option<Duration>) -> CleanerResult<()> {
        self.config.validate()?;

        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .map_err(|e| CleanerError::Internal(format!("Failed to create tokio runtime: {}", e)))?;

        if self.config.handle_signals {
            Self::install_signal_handler();
        }

        self.initialize_nodes();

        let period = self.config.tick_period();
        tracing::info!(
            scheduler = %self.scheduler_name,
            "Starting tick loop at {:.1} Hz ({} nodes)",
            self.config.timing.global_rate_hz,
            self.nodes.len()
        );

        rt.block_on(async {
            let start_time = Instant::now();
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            while self.is_running() {
                interval.tick().await;

                if let Some(max_duration) = duration {
                    if start_time.elapsed() >= max_duration {
                        tracing::info!("Scheduler reached time limit of {:?}", max_duration);
                        break;
                    }
                }

                let cycle_start = Instant::now();
                self.execute_cycle();

                let cycle_time = cycle_start.elapsed();
                if self.config.timing.warn_on_overrun && cycle_time > period {
                    tracing::warn!(
                        scheduler = %self.scheduler_name,
                        "Tick cycle took {:?}, longer than the {:?} period",
                        cycle_time,
                        period
                    );
                }
            }
        });

        self.shutdown();
        if INTERRUPTED.swap(false, Ordering::SeqCst) {
            tracing::info!(scheduler = %self.scheduler_name, "Stopped by Ctrl+C");
        }
        // Re-arm so the same scheduler can run again
        self.running.store(true, Ordering::SeqCst);
        tracing::info!(
            scheduler = %self.scheduler_name,
            "Scheduler shutdown complete after {} cycles",
            self.cycles
        );
        Ok(())
    }

    fn install_signal_handler() {
        SIGNAL_HANDLER.call_once(|| {
            let interrupted = INTERRUPTED.clone();
            if let Err(e) = ctrlc::set_handler(move || {
                eprintln!("{}", "\nCtrl+C received! Shutting down scheduler...".red());
                interrupted.store(true, Ordering::SeqCst);
            }) {
                tracing::warn!("Failed to set signal handler: {}", e);
            }
        });
    }

    fn initialize_nodes(&mut self) {
        for registered in self.nodes.iter_mut() {
            // Nodes whose init failed stay parked in the Error state
            if registered.initialized || matches!(registered.context.state(), NodeState::Error(_)) {
                continue;
            }
            let node_name = registered.node.name();
            let ctx = &mut registered.context;
            ctx.initialize();
            match registered.node.init(ctx) {
                Ok(()) => {
                    registered.initialized = true;
                    tracing::info!("Initialized node '{}'", node_name);
                }
                Err(e) => {
                    ctx.transition_to_error(format!("Initialization failed: {}", e));
                }
            }
        }
    }

    /// One pass over all due nodes, in priority order
    fn execute_cycle(&mut self) {
        let now = Instant::now();
        self.cycles += 1;

        for registered in self.nodes.iter_mut() {
            if !registered.initialized || !registered.due(now) {
                continue;
            }
            if registered.rate_hz.is_some() {
                registered.last_tick = Some(now);
            }

            let RegisteredNode { node, context, .. } = registered;
            context.start_tick();

            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                node.tick(Some(&mut *context));
            }));

            match result {
                Ok(()) => context.record_tick(),
                Err(panic) => {
                    let msg = panic
                        .downcast_ref::<&str>()
                        .map(|s| s.to_string())
                        .or_else(|| panic.downcast_ref::<String>().cloned())
                        .unwrap_or_else(|| "unknown panic".to_string());
                    context.record_tick_failure(format!("Tick panicked: {}", msg));
                    node.on_error(&msg, context);
                }
            }
        }
    }

    /// Names of registered nodes in tick order
    pub fn get_node_list(&self) -> Vec<String> {
        self.nodes
            .iter()
            .map(|registered| registered.node.name().to_string())
            .collect()
    }

    pub fn get_node_metrics(&self, name: &str) -> Option<&NodeMetrics> {
        self.nodes
            .iter()
            .find(|r| r.node.name() == name)
            .map(|r| r.context.metrics())
    }

    pub fn get_node_state(&self, name: &str) -> Option<&NodeState> {
        self.nodes
            .iter()
            .find(|r| r.node.name() == name)
            .map(|r| r.context.state())
    }

    /// Number of completed cycles
    pub fn cycles(&self) -> u64 {
        self.cycles
    }
}
