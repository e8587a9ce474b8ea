use crate::algorithms::{ForwardClearance, RangeFrontFilter};
use crate::config::CleanerConfig;
use crate::messages::LaserScan;
use cleaner_core::core::TopicMetadata;
use cleaner_core::error::CleanerResult;
use cleaner_core::{Hub, Node, NodeInfo, NodeInfoExt, SignalWriter};

/// Range Filter Node - forward clearance from the ranging sensor
///
/// Consumes every pending `LaserScan` and writes the nearest valid forward
/// distance into the clearance signal. A sweep with no valid forward return
/// marks the signal `Unavailable` until a usable sweep arrives.
pub struct RangeFilterNode {
    subscriber: Hub<LaserScan>,
    filter: RangeFrontFilter,
    clearance: SignalWriter<ForwardClearance>,
    faulted: bool,
    /// Empty sweeps seen since the current fault started
    empty_sweeps: u64,
    scans_processed: u64,
}

impl RangeFilterNode {
    /// Create a new range filter node on the default "scan" topic
    pub fn new(clearance: SignalWriter<ForwardClearance>) -> CleanerResult<Self> {
        Self::from_config(&CleanerConfig::default(), clearance)
    }

    pub fn from_config(
        config: &CleanerConfig,
        clearance: SignalWriter<ForwardClearance>,
    ) -> CleanerResult<Self> {
        Ok(Self {
            subscriber: Hub::new_with_capacity(&config.topics.scan, config.topics.queue_depth)?,
            filter: RangeFrontFilter::new(&config.range),
            clearance,
            faulted: false,
            empty_sweeps: 0,
            scans_processed: 0,
        })
    }

    pub fn is_faulted(&self) -> bool {
        self.faulted
    }

    pub fn scans_processed(&self) -> u64 {
        self.scans_processed
    }

    /// Consecutive sweeps with an empty forward sector (0 when not faulted)
    pub fn empty_sweeps(&self) -> u64 {
        self.empty_sweeps
    }

    fn process_scan(&mut self, scan: &LaserScan, mut ctx: Option<&mut NodeInfo>) {
        self.scans_processed += 1;

        match self.filter.forward_clearance(&scan.ranges) {
            Ok(distance) => {
                self.clearance.set(ForwardClearance::Measured(distance));
                if self.faulted {
                    ctx.log_info(&format!(
                        "Forward sector valid again after {} empty sweeps, clearance {:.2} m",
                        self.empty_sweeps, distance
                    ));
                    self.faulted = false;
                    self.empty_sweeps = 0;
                }
            }
            Err(e) if e.is_fatal_to_motion() => {
                self.clearance.set(ForwardClearance::Unavailable);
                self.empty_sweeps += 1;
                if self.faulted {
                    ctx.log_debug(&format!(
                        "Still no forward return ({} sweeps)",
                        self.empty_sweeps
                    ));
                } else {
                    self.faulted = true;
                    ctx.log_error(&e.to_string());
                }
            }
            Err(e) => ctx.log_warning(&format!("Scan skipped: {}", e)),
        }
    }
}

impl Node for RangeFilterNode {
    fn name(&self) -> &'static str {
        "range_filter_node"
    }

    fn init(&mut self, ctx: &mut NodeInfo) -> CleanerResult<()> {
        ctx.log_info(&format!(
            "Filtering '{}' with forward half-width {} (valid > {} m)",
            self.subscriber.get_topic_name(),
            self.filter.sector_half_width(),
            self.filter.min_valid_range()
        ));
        Ok(())
    }

    fn tick(&mut self, mut ctx: Option<&mut NodeInfo>) {
        while let Some(scan) = self.subscriber.recv(ctx.as_deref_mut()) {
            self.process_scan(&scan, ctx.as_deref_mut());
        }
    }

    fn get_subscribers(&self) -> Vec<TopicMetadata> {
        vec![TopicMetadata::of::<LaserScan>(self.subscriber.get_topic_name())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cleaner_core::signal;

    fn node_on(topic: &str) -> (RangeFilterNode, Hub<LaserScan>, cleaner_core::SignalReader<ForwardClearance>) {
        let mut config = CleanerConfig::default();
        config.topics.scan = topic.to_string();
        let (writer, reader) = signal(ForwardClearance::Measured(10.0));
        let node = RangeFilterNode::from_config(&config, writer).unwrap();
        let publisher = Hub::new(topic).unwrap();
        (node, publisher, reader)
    }

    #[test]
    fn test_writes_latest_clearance() {
        let (mut node, publisher, reader) = node_on("range_node_test/latest");
        let mut ranges = vec![3.0; 360];
        ranges[2] = 0.8;
        publisher.send(LaserScan::from_ranges(ranges.clone()), None);
        ranges[2] = 0.4;
        publisher.send(LaserScan::from_ranges(ranges), None);

        node.tick(None);
        assert_eq!(node.scans_processed(), 2);
        assert_relative_eq!(reader.get().meters().unwrap(), 0.4);
    }

    #[test]
    fn test_fault_and_recovery() {
        let (mut node, publisher, reader) = node_on("range_node_test/fault");
        let mut info = NodeInfo::new("range_filter_node".to_string(), false);

        publisher.send(LaserScan::from_ranges(vec![0.0; 360]), None);
        node.tick(Some(&mut info));
        assert!(node.is_faulted());
        assert_eq!(reader.get(), ForwardClearance::Unavailable);
        assert_eq!(info.metrics().errors_count, 1);

        publisher.send(LaserScan::from_ranges(vec![1.5; 360]), None);
        node.tick(Some(&mut info));
        assert!(!node.is_faulted());
        assert_eq!(reader.get(), ForwardClearance::Measured(1.5));
    }

    #[test]
    fn test_persistent_fault_logs_once() {
        let (mut node, publisher, reader) = node_on("range_node_test/persistent");
        let mut info = NodeInfo::new("range_filter_node".to_string(), false);

        for _ in 0..3 {
            publisher.send(LaserScan::from_ranges(vec![0.0; 360]), None);
            node.tick(Some(&mut info));
        }
        assert_eq!(reader.get(), ForwardClearance::Unavailable);
        assert_eq!(node.empty_sweeps(), 3);
        assert_eq!(info.metrics().errors_count, 1);

        publisher.send(LaserScan::from_ranges(vec![2.0; 360]), None);
        node.tick(Some(&mut info));
        assert_eq!(node.empty_sweeps(), 0);

        // A new fault is reported again
        publisher.send(LaserScan::from_ranges(vec![0.0; 360]), None);
        node.tick(Some(&mut info));
        assert_eq!(info.metrics().errors_count, 2);
    }

    #[test]
    fn test_no_scan_keeps_previous_value() {
        let (mut node, _publisher, reader) = node_on("range_node_test/idle");
        node.tick(None);
        assert_eq!(reader.get(), ForwardClearance::Measured(10.0));
        assert_eq!(reader.write_count(), 0);
    }
}
