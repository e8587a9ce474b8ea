use crate::core::node::{LogSummary, NodeInfo};
use crate::error::{CleanerError, CleanerResult};
use crossbeam::queue::ArrayQueue;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::any::Any;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Default queue depth for a topic (keep-last semantics)
pub const DEFAULT_TOPIC_CAPACITY: usize = 10;

type TopicRegistry = HashMap<String, Arc<dyn Any + Send + Sync>>;

/// Process-wide topic table. Every `Hub` opened on the same name shares one queue.
static TOPICS: Lazy<Mutex<TopicRegistry>> = Lazy::new(|| Mutex::new(HashMap::new()));

struct Topic<T> {
    queue: ArrayQueue<T>,
    metrics: AtomicHubMetrics,
}

/// Lock-free counters for Hub monitoring
#[derive(Debug, Default)]
struct AtomicHubMetrics {
    messages_sent: AtomicU64,
    messages_received: AtomicU64,
    messages_dropped: AtomicU64,
}

impl AtomicHubMetrics {
    fn snapshot(&self) -> HubMetrics {
        HubMetrics {
            messages_sent: self.messages_sent.load(Ordering::Relaxed),
            messages_received: self.messages_received.load(Ordering::Relaxed),
            messages_dropped: self.messages_dropped.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of per-topic traffic
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HubMetrics {
    pub messages_sent: u64,
    pub messages_received: u64,
    /// Oldest messages displaced because the queue was full
    pub messages_dropped: u64,
}

/// Handle to a named topic
///
/// When the queue is full the oldest message is displaced, so a slow consumer
/// always sees the most recent sensor data.
pub struct Hub<T> {
    topic: Arc<Topic<T>>,
    topic_name: String,
}

impl<T> Clone for Hub<T> {
    fn clone(&self) -> Self {
        Self {
            topic: self.topic.clone(),
            topic_name: self.topic_name.clone(),
        }
    }
}

impl<T> std::fmt::Debug for Hub<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hub")
            .field("topic_name", &self.topic_name)
            .field("pending", &self.topic.queue.len())
            .finish_non_exhaustive()
    }
}

impl<T: Send + 'static> Hub<T> {
    /// Open (or create) a topic with the default capacity
    pub fn new(topic_name: &str) -> CleanerResult<Self> {
        Self::new_with_capacity(topic_name, DEFAULT_TOPIC_CAPACITY)
    }

    /// Open (or create) a topic. Capacity only applies when the topic is created.
    pub fn new_with_capacity(topic_name: &str, capacity: usize) -> CleanerResult<Self> {
        if topic_name.is_empty() {
            return Err(CleanerError::communication("topic name must not be empty"));
        }
        if capacity == 0 {
            return Err(CleanerError::communication(format!(
                "topic '{}' needs a capacity of at least 1",
                topic_name
            )));
        }

        let mut topics = TOPICS.lock();
        let entry = topics
            .entry(topic_name.to_string())
            .or_insert_with(|| {
                Arc::new(Topic::<T> {
                    queue: ArrayQueue::new(capacity),
                    metrics: AtomicHubMetrics::default(),
                }) as Arc<dyn Any + Send + Sync>
            })
            .clone();

        let topic = entry.downcast::<Topic<T>>().map_err(|_| {
            CleanerError::communication(format!(
                "topic '{}' already carries a different message type than {}",
                topic_name,
                std::any::type_name::<T>()
            ))
        })?;

        Ok(Hub {
            topic,
            topic_name: topic_name.to_string(),
        })
    }

    /// Publish a message, displacing the oldest one if the queue is full
    pub fn send(&self, msg: T, ctx: Option<&mut NodeInfo>)
    where
        T: LogSummary,
    {
        if let Some(ctx) = ctx {
            let summary = msg.log_summary();
            ctx.log_pub_summary(&self.topic_name, &summary);
        }

        if self.topic.queue.force_push(msg).is_some() {
            self.topic
                .metrics
                .messages_dropped
                .fetch_add(1, Ordering::Relaxed);
        }
        self.topic
            .metrics
            .messages_sent
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Take the oldest pending message, if any
    pub fn recv(&self, ctx: Option<&mut NodeInfo>) -> Option<T>
    where
        T: LogSummary,
    {
        let msg = self.topic.queue.pop()?;

        if let Some(ctx) = ctx {
            ctx.log_sub_summary(&self.topic_name, &msg.log_summary());
        }
        self.topic
            .metrics
            .messages_received
            .fetch_add(1, Ordering::Relaxed);

        Some(msg)
    }

    pub fn pending(&self) -> usize {
        self.topic.queue.len()
    }

    pub fn get_metrics(&self) -> HubMetrics {
        self.topic.metrics.snapshot()
    }

    pub fn get_topic_name(&self) -> &str {
        &self.topic_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hubs_share_topic_by_name() {
        let publisher: Hub<String> = Hub::new("test_hub/shared").unwrap();
        let subscriber: Hub<String> = Hub::new("test_hub/shared").unwrap();

        publisher.send("hello".to_string(), None);
        assert_eq!(subscriber.recv(None), Some("hello".to_string()));
        assert_eq!(subscriber.recv(None), None);

        let metrics = publisher.get_metrics();
        assert_eq!(metrics.messages_sent, 1);
        assert_eq!(metrics.messages_received, 1);
    }

    #[test]
    fn test_full_queue_keeps_latest() {
        let hub: Hub<u64> = Hub::new_with_capacity("test_hub/keep_last", 3).unwrap();
        for i in 0..5u64 {
            hub.send(i, None);
        }

        assert_eq!(hub.get_metrics().messages_dropped, 2);
        let drained: Vec<u64> = std::iter::from_fn(|| hub.recv(None)).collect();
        assert_eq!(drained, vec![2, 3, 4]);
    }

    #[test]
    fn test_type_mismatch_is_rejected() {
        let _first: Hub<u64> = Hub::new("test_hub/typed").unwrap();
        let second = Hub::<String>::new("test_hub/typed");
        assert!(matches!(second, Err(CleanerError::Communication(_))));
    }

    #[test]
    fn test_invalid_topic_arguments() {
        assert!(Hub::<u64>::new("").is_err());
        assert!(Hub::<u64>::new_with_capacity("test_hub/zero", 0).is_err());
    }

    #[test]
    fn test_send_logs_into_context() {
        let hub: Hub<f32> = Hub::new("test_hub/logged").unwrap();
        let mut info = NodeInfo::new("publisher".to_string(), true);

        hub.send(0.5, Some(&mut info));
        let _ = hub.recv(Some(&mut info));

        assert_eq!(info.metrics().messages_sent, 1);
        assert_eq!(info.metrics().messages_received, 1);
    }
}
