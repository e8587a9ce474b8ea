// Scheduler lifecycle, ordering and fault handling
use cleaner_core::core::{Node, NodeInfo, NodeState};
use cleaner_core::error::CleanerResult as Result;
use cleaner_core::{signal, CleanerError, Hub, Scheduler, SchedulerConfig, SignalReader, SignalWriter};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Counts ticks and shutdowns
struct CountingNode {
    name: &'static str,
    ticks: Arc<AtomicUsize>,
    shutdowns: Arc<AtomicUsize>,
}

impl CountingNode {
    fn new(name: &'static str) -> (Self, Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let ticks = Arc::new(AtomicUsize::new(0));
        let shutdowns = Arc::new(AtomicUsize::new(0));
        (
            Self {
                name,
                ticks: ticks.clone(),
                shutdowns: shutdowns.clone(),
            },
            ticks,
            shutdowns,
        )
    }
}

impl Node for CountingNode {
    fn name(&self) -> &'static str {
        self.name
    }

    fn tick(&mut self, _ctx: Option<&mut NodeInfo>) {
        self.ticks.fetch_add(1, Ordering::SeqCst);
    }

    fn shutdown(&mut self, ctx: &mut NodeInfo) -> Result<()> {
        self.shutdowns.fetch_add(1, Ordering::SeqCst);
        ctx.log_info("counting node stopped");
        Ok(())
    }
}

/// Writes its tick number into a signal
struct ProducerNode {
    out: SignalWriter<f64>,
    count: f64,
}

impl Node for ProducerNode {
    fn name(&self) -> &'static str {
        "producer"
    }

    fn tick(&mut self, _ctx: Option<&mut NodeInfo>) {
        self.count += 1.0;
        self.out.set(self.count);
    }
}

/// Publishes whatever the producer wrote in the same cycle
struct ConsumerNode {
    input: SignalReader<f64>,
    output: Hub<f64>,
}

impl Node for ConsumerNode {
    fn name(&self) -> &'static str {
        "consumer"
    }

    fn tick(&mut self, ctx: Option<&mut NodeInfo>) {
        self.output.send(self.input.get(), ctx);
    }
}

struct PanickingNode;

impl Node for PanickingNode {
    fn name(&self) -> &'static str {
        "panicking"
    }

    fn tick(&mut self, _ctx: Option<&mut NodeInfo>) {
        panic!("sensor driver fell over");
    }
}

struct FailingInitNode;

impl Node for FailingInitNode {
    fn name(&self) -> &'static str {
        "failing_init"
    }

    fn init(&mut self, _ctx: &mut NodeInfo) -> Result<()> {
        Err(CleanerError::config("missing calibration"))
    }

    fn tick(&mut self, _ctx: Option<&mut NodeInfo>) {
        unreachable!("never initialized");
    }
}

#[test]
fn test_run_for_ticks_and_shuts_down() {
    let (node, ticks, shutdowns) = CountingNode::new("counter");
    let mut scheduler = Scheduler::new()
        .with_config(SchedulerConfig::testing().with_rate(100.0))
        .name("RunForScheduler");
    scheduler.add(Box::new(node), 0, Some(true));

    let result = scheduler.run_for(Duration::from_millis(100));
    assert!(result.is_ok());
    assert!(ticks.load(Ordering::SeqCst) >= 2);
    assert_eq!(shutdowns.load(Ordering::SeqCst), 1);
    assert_eq!(scheduler.get_node_state("counter"), Some(&NodeState::Stopped));
}

#[test]
fn test_priority_order_within_cycle() {
    let (writer, reader) = signal(0.0f64);
    let output: Hub<f64> = Hub::new("scheduler_test/ordered").unwrap();

    let mut scheduler = Scheduler::new().with_config(SchedulerConfig::testing());
    // Registered out of order on purpose; priority decides
    scheduler.add(
        Box::new(ConsumerNode {
            input: reader,
            output: Hub::new("scheduler_test/ordered").unwrap(),
        }),
        10,
        None,
    );
    scheduler.add(Box::new(ProducerNode { out: writer, count: 0.0 }), 0, None);

    assert_eq!(scheduler.get_node_list(), vec!["producer", "consumer"]);

    scheduler.tick_once().unwrap();
    scheduler.tick_once().unwrap();
    assert_eq!(output.recv(None), Some(1.0));
    assert_eq!(output.recv(None), Some(2.0));
}

#[test]
fn test_panicking_node_is_isolated() {
    let (node, ticks, _) = CountingNode::new("survivor");
    let mut scheduler = Scheduler::new().with_config(SchedulerConfig::testing());
    scheduler.add(Box::new(PanickingNode), 0, None);
    scheduler.add(Box::new(node), 1, None);

    scheduler.tick_once().unwrap();
    scheduler.tick_once().unwrap();

    assert_eq!(ticks.load(Ordering::SeqCst), 2);
    let metrics = scheduler.get_node_metrics("panicking").unwrap();
    assert_eq!(metrics.failed_ticks, 2);
    assert!(metrics.errors_count >= 2);
}

#[test]
fn test_failed_init_node_never_ticks() {
    let mut scheduler = Scheduler::new().with_config(SchedulerConfig::testing());
    scheduler.add(Box::new(FailingInitNode), 0, None);

    scheduler.tick_once().unwrap();
    assert!(matches!(
        scheduler.get_node_state("failing_init"),
        Some(NodeState::Error(_))
    ));
    assert_eq!(scheduler.get_node_metrics("failing_init").unwrap().total_ticks, 0);
}

#[test]
fn test_per_node_rate_limits_ticks() {
    let (fast, fast_ticks, _) = CountingNode::new("fast");
    let (slow, slow_ticks, _) = CountingNode::new("slow");
    let mut scheduler = Scheduler::new().with_config(SchedulerConfig::testing());
    scheduler.add(Box::new(fast), 0, None);
    scheduler.add(Box::new(slow), 1, None);
    scheduler.set_node_rate("slow", 0.5);

    for _ in 0..5 {
        scheduler.tick_once().unwrap();
    }

    assert_eq!(fast_ticks.load(Ordering::SeqCst), 5);
    assert_eq!(slow_ticks.load(Ordering::SeqCst), 1);
}

#[test]
fn test_stop_handle_ends_run() {
    let (node, _, shutdowns) = CountingNode::new("stoppable");
    let mut scheduler = Scheduler::new().with_config(SchedulerConfig::testing().with_rate(50.0));
    scheduler.add(Box::new(node), 0, None);

    let stop = scheduler.stop_handle();
    let stopper = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(100));
        stop.store(false, Ordering::SeqCst);
    });

    assert!(scheduler.run().is_ok());
    stopper.join().unwrap();
    assert_eq!(shutdowns.load(Ordering::SeqCst), 1);
}

#[test]
fn test_stop_before_run_is_honored() {
    let (node, ticks, shutdowns) = CountingNode::new("stopped_early");
    let mut scheduler = Scheduler::new().with_config(SchedulerConfig::testing().with_rate(100.0));
    scheduler.add(Box::new(node), 0, None);

    scheduler.stop();
    scheduler.run_for(Duration::from_secs(5)).unwrap();
    assert_eq!(ticks.load(Ordering::SeqCst), 0);
    assert_eq!(shutdowns.load(Ordering::SeqCst), 1);

    // The loop re-arms once it has exited
    assert!(scheduler.is_running());
    scheduler.run_for(Duration::from_millis(100)).unwrap();
    assert!(ticks.load(Ordering::SeqCst) >= 2);
    assert_eq!(shutdowns.load(Ordering::SeqCst), 2);
}

#[test]
fn test_invalid_rate_is_rejected() {
    let mut scheduler = Scheduler::new().with_config(SchedulerConfig::testing().with_rate(0.0));
    assert!(matches!(
        scheduler.run_for(Duration::from_millis(10)),
        Err(CleanerError::Config(_))
    ));
}
