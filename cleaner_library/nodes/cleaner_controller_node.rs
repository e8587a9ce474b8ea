use crate::algorithms::{DriveMode, ForwardClearance, MotionArbiter, MotionDecision};
use crate::config::CleanerConfig;
use crate::messages::CmdVel;
use cleaner_core::core::TopicMetadata;
use cleaner_core::error::CleanerResult;
use cleaner_core::{Hub, Node, NodeInfo, NodeInfoExt, SignalReader};

/// Cleaner Controller Node - one velocity command per tick
///
/// Reads the latest clearance and target presence, arbitrates a drive mode
/// and publishes the resulting `CmdVel`. Never blocks on sensor data: the
/// signals always hold a value, initially "clear ahead, no target".
pub struct CleanerControllerNode {
    publisher: Hub<CmdVel>,
    clearance: SignalReader<ForwardClearance>,
    presence: SignalReader<bool>,
    arbiter: MotionArbiter,
    last_decision: Option<MotionDecision>,
    commands_sent: u64,
}

impl CleanerControllerNode {
    /// Create a new controller publishing on the default "cmd_vel" topic
    pub fn new(
        clearance: SignalReader<ForwardClearance>,
        presence: SignalReader<bool>,
    ) -> CleanerResult<Self> {
        Self::from_config(&CleanerConfig::default(), clearance, presence)
    }

    pub fn from_config(
        config: &CleanerConfig,
        clearance: SignalReader<ForwardClearance>,
        presence: SignalReader<bool>,
    ) -> CleanerResult<Self> {
        Ok(Self {
            publisher: Hub::new_with_capacity(&config.topics.cmd_vel, config.topics.queue_depth)?,
            clearance,
            presence,
            arbiter: MotionArbiter::new(config.motion.clone()),
            last_decision: None,
            commands_sent: 0,
        })
    }

    /// Decision made on the most recent tick
    pub fn last_decision(&self) -> Option<MotionDecision> {
        self.last_decision
    }

    pub fn commands_sent(&self) -> u64 {
        self.commands_sent
    }

    /// Arbitrate from the current signal values without publishing
    pub fn decide(&self) -> MotionDecision {
        self.arbiter.decide(self.clearance.get(), self.presence.get())
    }
}

impl Node for CleanerControllerNode {
    fn name(&self) -> &'static str {
        "smart_cleaner_node"
    }

    fn init(&mut self, ctx: &mut NodeInfo) -> CleanerResult<()> {
        ctx.log_info("--- Smart Cleaner logic is Online ---");
        Ok(())
    }

    fn tick(&mut self, mut ctx: Option<&mut NodeInfo>) {
        let decision = self.decide();

        let previous_mode = self.last_decision.map(|d| d.mode);
        if previous_mode != Some(decision.mode) {
            match self.clearance.get().meters() {
                Some(distance) => ctx.log_info(&format!(
                    "Mode -> {} (clearance {:.2} m)",
                    decision.mode, distance
                )),
                None => ctx.log_info(&format!("Mode -> {} (clearance unavailable)", decision.mode)),
            }
        }
        if decision.mode == DriveMode::Cleaning {
            ctx.log_info("!!! TRASH DETECTED - Cleaning in progress !!!");
        }

        self.publisher.send(decision.to_cmd_vel(), ctx.as_deref_mut());
        self.commands_sent += 1;
        self.last_decision = Some(decision);
    }

    fn shutdown(&mut self, ctx: &mut NodeInfo) -> CleanerResult<()> {
        // Leave the base stopped
        self.publisher.send(CmdVel::zero(), Some(&mut *ctx));
        ctx.log_info(&format!(
            "Controller stopped after {} commands",
            self.commands_sent
        ));
        Ok(())
    }

    fn get_publishers(&self) -> Vec<TopicMetadata> {
        vec![TopicMetadata::of::<CmdVel>(self.publisher.get_topic_name())]
    }

    fn is_healthy(&self) -> bool {
        !self.clearance.is_orphaned() && !self.presence.is_orphaned()
    }
}
