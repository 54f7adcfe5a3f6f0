//! Noise rules: gibberish, platform notifications, advertising

use super::{QualityRule, RuleContext};
use crate::{Issue, Rule};

/// Rule for garbled or corrupted text
pub struct GibberishRule;

impl GibberishRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GibberishRule {
    fn default() -> Self {
        Self::new()
    }
}

impl QualityRule for GibberishRule {
    fn name(&self) -> &'static str {
        "gibberish"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Issue> {
        ctx.noise.gibberish.then(|| {
            Issue::warning(
                Rule::Gibberish,
                "The transcript contains garbled or corrupted text",
            )
            .with_suggestion("Remove garbled characters or copy the conversation again")
        })
    }
}

/// Rule for transcripts dominated by platform notifications
pub struct SystemNoiseRule;

impl SystemNoiseRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemNoiseRule {
    fn default() -> Self {
        Self::new()
    }
}

impl QualityRule for SystemNoiseRule {
    fn name(&self) -> &'static str {
        "system-noise"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Issue> {
        ctx.has_system_noise().then(|| {
            let pct = (ctx.stats.system_ratio() * 100.0).round() as u32;
            Issue::warning(
                Rule::TooManySystemMessages,
                format!("System notifications make up {}% of the lines", pct),
            )
            .with_suggestion("Remove timestamps, recalled-message notices and call records")
        })
    }
}

/// Rule for promotional content, links and redeem codes
pub struct AdContentRule;

impl AdContentRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AdContentRule {
    fn default() -> Self {
        Self::new()
    }
}

impl QualityRule for AdContentRule {
    fn name(&self) -> &'static str {
        "ad-content"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Issue> {
        ctx.noise.ad_content.then(|| {
            Issue::warning(
                Rule::AdContent,
                "The transcript contains advertising, links or promo codes",
            )
            .with_suggestion("Remove promotional content that is not part of the conversation")
        })
    }
}
