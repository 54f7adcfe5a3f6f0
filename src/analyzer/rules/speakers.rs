//! Speaker attribution coverage.
//!
//! The three checks form one if/else-if chain so they are mutually exclusive:
//! a transcript without any attributed line reports `no_speakers` only.

use super::{QualityRule, RuleContext};
use crate::{Issue, Rule};

/// Rule for transcripts missing one or both parties
pub struct SpeakerPresenceRule;

impl SpeakerPresenceRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SpeakerPresenceRule {
    fn default() -> Self {
        Self::new()
    }
}

impl QualityRule for SpeakerPresenceRule {
    fn name(&self) -> &'static str {
        "speaker-presence"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Issue> {
        let stats = ctx.stats;
        if stats.me_count == 0 && stats.other_count == 0 {
            Some(
                Issue::warning(
                    Rule::NoSpeakers,
                    "No speakers identified: no line is attributed to you or the other party",
                )
                .with_suggestion(
                    "Prefix each message with its speaker, e.g. \"我: ...\" and \"对方: ...\"",
                ),
            )
        } else if stats.me_count == 0 {
            Some(
                Issue::warning(Rule::NoMyMessages, "None of your own messages were found")
                    .with_suggestion("Mark your own messages with \"我:\""),
            )
        } else if stats.other_count == 0 {
            Some(
                Issue::warning(
                    Rule::NoOtherMessages,
                    "None of the other party's messages were found",
                )
                .with_suggestion("Mark the other party's messages with \"对方:\" or their name"),
            )
        } else {
            None
        }
    }
}
