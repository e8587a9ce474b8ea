use crate::algorithms::TargetClassifier;
use crate::config::CleanerConfig;
use crate::messages::Image;
use cleaner_core::core::TopicMetadata;
use cleaner_core::error::CleanerResult;
use cleaner_core::{Hub, Node, NodeInfo, NodeInfoExt, SignalWriter};

/// Trash Detector Node - color-threshold target detection on camera frames
///
/// Every decodable frame overwrites the presence signal. Frames that cannot
/// be interpreted are skipped and the previous presence value stands.
pub struct TrashDetectorNode {
    subscriber: Hub<Image>,
    classifier: TargetClassifier,
    presence: SignalWriter<bool>,
    frames_classified: u64,
    frames_skipped: u64,
}

impl TrashDetectorNode {
    /// Create a new trash detector on the default "camera/image_raw" topic
    pub fn new(presence: SignalWriter<bool>) -> CleanerResult<Self> {
        Self::from_config(&CleanerConfig::default(), presence)
    }

    pub fn from_config(config: &CleanerConfig, presence: SignalWriter<bool>) -> CleanerResult<Self> {
        Ok(Self {
            subscriber: Hub::new_with_capacity(&config.topics.image, config.topics.queue_depth)?,
            classifier: TargetClassifier::new(&config.vision),
            presence,
            frames_classified: 0,
            frames_skipped: 0,
        })
    }

    pub fn frames_classified(&self) -> u64 {
        self.frames_classified
    }

    pub fn frames_skipped(&self) -> u64 {
        self.frames_skipped
    }
}

impl Node for TrashDetectorNode {
    fn name(&self) -> &'static str {
        "trash_detector_node"
    }

    fn tick(&mut self, mut ctx: Option<&mut NodeInfo>) {
        while let Some(frame) = self.subscriber.recv(ctx.as_deref_mut()) {
            match self.classifier.mask_score(&frame) {
                Ok(score) => {
                    let present = score > self.classifier.score_threshold();
                    if present != self.presence.current() {
                        ctx.log_debug(&format!(
                            "Target {} (score {})",
                            if present { "acquired" } else { "lost" },
                            score
                        ));
                    }
                    self.presence.set(present);
                    self.frames_classified += 1;
                }
                Err(e) => {
                    self.frames_skipped += 1;
                    ctx.log_warning(&format!("Could not convert image: {}", e));
                }
            }
        }
    }

    fn get_subscribers(&self) -> Vec<TopicMetadata> {
        vec![TopicMetadata::of::<Image>(self.subscriber.get_topic_name())]
    }
}
