//! Conversational structure: turn count, one-sidedness, unattributed lines

use super::{QualityRule, RuleContext};
use crate::{Issue, Rule};

/// Rule for transcripts with too few speaker alternations
pub struct TurnCountRule;

impl TurnCountRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TurnCountRule {
    fn default() -> Self {
        Self::new()
    }
}

impl QualityRule for TurnCountRule {
    fn name(&self) -> &'static str {
        "turn-count"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Issue> {
        let stats = ctx.stats;
        let min = ctx.thresholds.min_turns;
        let anyone_speaks = stats.me_count > 0 || stats.other_count > 0;
        (stats.turn_count < min && anyone_speaks).then(|| {
            Issue::warning(
                Rule::InsufficientTurns,
                format!(
                    "Only {} speaker turn(s); at least {} are needed for a meaningful analysis",
                    stats.turn_count, min
                ),
            )
            .with_suggestion("Include more of the back-and-forth exchange")
        })
    }
}

/// Rule for transcripts where only one side ever speaks
pub struct SingleSpeakerRule;

impl SingleSpeakerRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SingleSpeakerRule {
    fn default() -> Self {
        Self::new()
    }
}

impl QualityRule for SingleSpeakerRule {
    fn name(&self) -> &'static str {
        "single-speaker"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Issue> {
        let stats = ctx.stats;
        let limit = ctx.thresholds.single_speaker_lines;
        let only_me = stats.me_count > limit && stats.other_count == 0;
        let only_other = stats.other_count > limit && stats.me_count == 0;
        (only_me || only_other).then(|| {
            Issue::warning(
                Rule::SingleSpeaker,
                "Only one side of the conversation is present",
            )
            .with_suggestion("Include the other side's replies so both perspectives are visible")
        })
    }
}

/// Rule for transcripts dominated by lines without a speaker
pub struct ManyUnknownRule;

impl ManyUnknownRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ManyUnknownRule {
    fn default() -> Self {
        Self::new()
    }
}

impl QualityRule for ManyUnknownRule {
    fn name(&self) -> &'static str {
        "many-unknown"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Issue> {
        let stats = ctx.stats;
        let attributed = stats.me_count + stats.other_count;
        let fires =
            stats.unknown_count > attributed && stats.unknown_count > ctx.thresholds.unknown_lines;
        fires.then(|| {
            Issue::warning(
                Rule::ManyUnknown,
                format!(
                    "{} line(s) could not be attributed to a speaker",
                    stats.unknown_count
                ),
            )
            .with_suggestion("Prefix unattributed lines with \"我:\" or \"对方:\"")
        })
    }
}
