//! Quality rules for chat transcripts

pub mod noise;
pub mod speakers;
pub mod structure;

pub use noise::{AdContentRule, GibberishRule, SystemNoiseRule};
pub use speakers::SpeakerPresenceRule;
pub use structure::{ManyUnknownRule, SingleSpeakerRule, TurnCountRule};

use super::stats::ConversationStats;
use crate::config::Thresholds;
use crate::detector::NoiseFlags;
use crate::Issue;

/// Everything a rule may look at
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub stats: &'a ConversationStats,
    pub noise: NoiseFlags,
    pub thresholds: &'a Thresholds,
}

impl RuleContext<'_> {
    /// The system-share condition shared by the report flag and its rule
    pub fn has_system_noise(&self) -> bool {
        self.stats.system_count as f64
            > self.thresholds.max_system_ratio * self.stats.total_lines as f64
    }
}

/// Trait for quality rules
pub trait QualityRule: Send + Sync {
    /// Name of the rule
    fn name(&self) -> &'static str;

    /// Evaluate the rule; at most one issue per rule
    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Issue>;
}

/// The built-in rules in evaluation order. Issue order in a report follows
/// this order.
pub fn default_rules() -> Vec<Box<dyn QualityRule>> {
    vec![
        Box::new(SpeakerPresenceRule::new()),
        Box::new(TurnCountRule::new()),
        Box::new(GibberishRule::new()),
        Box::new(SystemNoiseRule::new()),
        Box::new(AdContentRule::new()),
        Box::new(SingleSpeakerRule::new()),
        Box::new(ManyUnknownRule::new()),
    ]
}
