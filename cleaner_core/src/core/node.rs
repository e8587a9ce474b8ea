use crate::error::{CleanerError, CleanerResult};
use std::collections::HashMap;
use std::fmt;
use std::time::Instant;

/// Trait for providing lightweight logging summaries of message types
///
/// Large messages (camera frames, full range sweeps) should only report
/// metadata here so that logging a publish never copies pixel data.
pub trait LogSummary {
    /// Return a compact string representation suitable for logging
    fn log_summary(&self) -> String;
}

/// Node states for monitoring and lifecycle management
#[derive(Debug, Clone, PartialEq)]
pub enum NodeState {
    Uninitialized,
    Initializing,
    Running,
    Stopping,
    Stopped,
    Error(String),
}

impl fmt::Display for NodeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeState::Uninitialized => write!(f, "Uninitialized"),
            NodeState::Initializing => write!(f, "Initializing"),
            NodeState::Running => write!(f, "Running"),
            NodeState::Stopping => write!(f, "Stopping"),
            NodeState::Stopped => write!(f, "Stopped"),
            NodeState::Error(msg) => write!(f, "Error: {}", msg),
        }
    }
}

/// Performance metrics for node execution
#[derive(Debug, Clone, Default)]
pub struct NodeMetrics {
    pub total_ticks: u64,
    pub successful_ticks: u64,
    pub failed_ticks: u64,
    pub avg_tick_duration_ms: f64,
    pub max_tick_duration_ms: f64,
    pub last_tick_duration_ms: f64,
    pub messages_sent: u64,
    pub messages_received: u64,
    pub errors_count: u64,
    pub warnings_count: u64,
}

/// Configuration parameters for node behavior
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Emit info/debug lines and per-message pub/sub traffic
    pub enable_logging: bool,
    /// Ticks slower than this are reported as warnings
    pub max_tick_duration_ms: Option<u64>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        NodeConfig {
            enable_logging: true,
            max_tick_duration_ms: Some(100),
        }
    }
}

/// Runtime context and bookkeeping for one registered node
pub struct NodeInfo {
    name: String,

    state: NodeState,
    previous_state: NodeState,

    config: NodeConfig,
    metrics: NodeMetrics,

    tick_start_time: Option<Instant>,

    error_history: Vec<(Instant, String)>,

    published_topics: HashMap<String, u64>,
    subscribed_topics: HashMap<String, u64>,
}

impl NodeInfo {
    pub fn new(node_name: String, logging_enabled: bool) -> Self {
        let config = NodeConfig {
            enable_logging: logging_enabled,
            ..Default::default()
        };

        Self {
            name: node_name,
            state: NodeState::Uninitialized,
            previous_state: NodeState::Uninitialized,
            config,
            metrics: NodeMetrics::default(),
            tick_start_time: None,
            error_history: Vec::new(),
            published_topics: HashMap::new(),
            subscribed_topics: HashMap::new(),
        }
    }

    // State Management Methods
    pub fn state(&self) -> &NodeState {
        &self.state
    }

    pub fn previous_state(&self) -> &NodeState {
        &self.previous_state
    }

    pub fn set_state(&mut self, new_state: NodeState) {
        if self.state != new_state {
            self.previous_state = self.state.clone();
            self.state = new_state;
        }
    }

    pub fn transition_to_error(&mut self, error_msg: String) {
        self.log_error(&error_msg);
        self.set_state(NodeState::Error(error_msg));
    }

    // Lifecycle Methods
    pub fn initialize(&mut self) {
        self.set_state(NodeState::Initializing);
        self.set_state(NodeState::Running);
    }

    pub fn shutdown(&mut self) -> CleanerResult<()> {
        if self.state == NodeState::Stopped {
            return Err(CleanerError::InvalidInput(format!(
                "node '{}' is already stopped",
                self.name
            )));
        }
        self.set_state(NodeState::Stopping);
        self.set_state(NodeState::Stopped);
        Ok(())
    }

    // Tick Management
    pub fn start_tick(&mut self) {
        self.tick_start_time = Some(Instant::now());
        if self.state == NodeState::Uninitialized {
            self.initialize();
        }
    }

    pub fn record_tick(&mut self) {
        if let Some(start_time) = self.tick_start_time.take() {
            let duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;

            self.metrics.total_ticks += 1;
            self.metrics.successful_ticks += 1;
            self.metrics.last_tick_duration_ms = duration_ms;
            if duration_ms > self.metrics.max_tick_duration_ms {
                self.metrics.max_tick_duration_ms = duration_ms;
            }

            let total_duration =
                self.metrics.avg_tick_duration_ms * (self.metrics.successful_ticks - 1) as f64;
            self.metrics.avg_tick_duration_ms =
                (total_duration + duration_ms) / self.metrics.successful_ticks as f64;

            if let Some(budget_ms) = self.config.max_tick_duration_ms {
                if duration_ms > budget_ms as f64 {
                    self.log_warning(&format!(
                        "Tick took {:.2}ms (budget {}ms)",
                        duration_ms, budget_ms
                    ));
                }
            }
        }
    }

    pub fn record_tick_failure(&mut self, error_msg: String) {
        self.metrics.total_ticks += 1;
        self.metrics.failed_ticks += 1;

        if let Some(start_time) = self.tick_start_time.take() {
            self.metrics.last_tick_duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;
        }

        self.log_error(&error_msg);
    }

    // Logging Methods
    pub fn log_pub<T: LogSummary>(&mut self, topic: &str, data: &T) {
        let summary = data.log_summary();
        self.log_pub_summary(topic, &summary);
    }

    pub fn log_sub<T: LogSummary>(&mut self, topic: &str, data: &T) {
        let summary = data.log_summary();
        self.log_sub_summary(topic, &summary);
    }

    /// Used by `Hub::send()`, which takes the summary before moving the message
    pub fn log_pub_summary(&mut self, topic: &str, summary: &str) {
        if self.config.enable_logging {
            tracing::debug!(node = %self.name, topic, "--PUB--> {}", summary);
        }

        *self.published_topics.entry(topic.to_string()).or_insert(0) += 1;
        self.metrics.messages_sent += 1;
    }

    pub fn log_sub_summary(&mut self, topic: &str, summary: &str) {
        if self.config.enable_logging {
            tracing::debug!(node = %self.name, topic, "<--SUB-- {}", summary);
        }

        *self.subscribed_topics.entry(topic.to_string()).or_insert(0) += 1;
        self.metrics.messages_received += 1;
    }

    pub fn log_info(&self, message: &str) {
        if self.config.enable_logging {
            tracing::info!(node = %self.name, "{}", message);
        }
    }

    pub fn log_debug(&self, message: &str) {
        if self.config.enable_logging {
            tracing::debug!(node = %self.name, "{}", message);
        }
    }

    /// Warnings are always emitted; `enable_logging` only silences chatter
    pub fn log_warning(&mut self, message: &str) {
        tracing::warn!(node = %self.name, "{}", message);
        self.metrics.warnings_count += 1;
    }

    pub fn log_error(&mut self, message: &str) {
        tracing::error!(node = %self.name, "{}", message);

        self.error_history.push((Instant::now(), message.to_string()));
        if self.error_history.len() > 100 {
            self.error_history.remove(0);
        }
        self.metrics.errors_count += 1;
    }

    // Getters
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn config(&self) -> &NodeConfig {
        &self.config
    }
    pub fn metrics(&self) -> &NodeMetrics {
        &self.metrics
    }
    pub fn last_error(&self) -> Option<&str> {
        self.error_history.last().map(|(_, msg)| msg.as_str())
    }
    pub fn published_topics(&self) -> &HashMap<String, u64> {
        &self.published_topics
    }
    pub fn subscribed_topics(&self) -> &HashMap<String, u64> {
        &self.subscribed_topics
    }
}

/// Topic metadata for introspection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicMetadata {
    pub topic_name: String,
    pub type_name: String,
}

impl TopicMetadata {
    pub fn of<T>(topic_name: &str) -> Self {
        Self {
            topic_name: topic_name.to_string(),
            type_name: std::any::type_name::<T>().to_string(),
        }
    }
}

/// Trait for nodes driven by the scheduler
pub trait Node: Send {
    /// Get the node's name (must be unique within a scheduler)
    fn name(&self) -> &'static str;

    /// Initialize the node (called once at startup)
    fn init(&mut self, ctx: &mut NodeInfo) -> CleanerResult<()> {
        ctx.log_info("Node initialized successfully");
        Ok(())
    }

    /// Main execution step (called once per scheduler tick)
    fn tick(&mut self, ctx: Option<&mut NodeInfo>);

    /// Shutdown the node (called once at cleanup)
    fn shutdown(&mut self, ctx: &mut NodeInfo) -> CleanerResult<()> {
        ctx.log_info("Node shutdown successfully");
        Ok(())
    }

    fn get_publishers(&self) -> Vec<TopicMetadata> {
        Vec::new()
    }

    fn get_subscribers(&self) -> Vec<TopicMetadata> {
        Vec::new()
    }

    /// Handle errors (optional override)
    fn on_error(&mut self, error: &str, ctx: &mut NodeInfo) {
        ctx.log_error(&format!("Node error: {}", error));
    }

    fn is_healthy(&self) -> bool {
        true
    }
}

// LogSummary implementations for primitive types
impl LogSummary for f32 {
    fn log_summary(&self) -> String {
        format!("{:.3}", self)
    }
}

impl LogSummary for f64 {
    fn log_summary(&self) -> String {
        format!("{:.3}", self)
    }
}

impl LogSummary for u64 {
    fn log_summary(&self) -> String {
        self.to_string()
    }
}

impl LogSummary for bool {
    fn log_summary(&self) -> String {
        self.to_string()
    }
}

impl LogSummary for String {
    fn log_summary(&self) -> String {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_transitions() {
        let mut info = NodeInfo::new("lifecycle".to_string(), false);
        assert_eq!(info.state(), &NodeState::Uninitialized);

        info.start_tick();
        assert_eq!(info.state(), &NodeState::Running);
        assert_eq!(info.previous_state(), &NodeState::Initializing);

        info.record_tick();
        assert_eq!(info.metrics().total_ticks, 1);
        assert_eq!(info.metrics().successful_ticks, 1);

        assert!(info.shutdown().is_ok());
        assert_eq!(info.state(), &NodeState::Stopped);
        assert!(info.shutdown().is_err());
    }

    #[test]
    fn test_tick_failure_is_recorded() {
        let mut info = NodeInfo::new("failing".to_string(), false);
        info.start_tick();
        info.record_tick_failure("panic in tick".to_string());

        assert_eq!(info.metrics().failed_ticks, 1);
        assert_eq!(info.metrics().errors_count, 1);
        assert_eq!(info.last_error(), Some("panic in tick"));
    }

    #[test]
    fn test_pub_sub_accounting() {
        let mut info = NodeInfo::new("traffic".to_string(), true);
        info.log_pub("cmd_vel", &1.0f32);
        info.log_pub("cmd_vel", &2.0f32);
        info.log_sub("scan", &true);

        assert_eq!(info.published_topics().get("cmd_vel"), Some(&2));
        assert_eq!(info.subscribed_topics().get("scan"), Some(&1));
        assert_eq!(info.metrics().messages_sent, 2);
        assert_eq!(info.metrics().messages_received, 1);
    }

    #[test]
    fn test_topic_metadata_type_name() {
        let meta = TopicMetadata::of::<f32>("clearance");
        assert_eq!(meta.topic_name, "clearance");
        assert_eq!(meta.type_name, "f32");
    }
}
