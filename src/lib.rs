//! Chatlint: Conversation Quality Classifier
//!
//! This library inspects a raw, user-submitted chat transcript before it is sent
//! to any downstream analysis service and produces a structured quality report:
//! speaker attribution, conversational structure, noise/spam flags and
//! actionable warnings. Everything here is a fast, local heuristic pre-filter.

pub mod analyzer;
pub mod config;
pub mod detector;
pub mod input;
pub mod parser;
pub mod reporter;
pub mod submission;

use serde::{Deserialize, Serialize};

/// Who authored a transcript line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    /// The user submitting the transcript
    Me,
    /// The other party in the conversation
    Other,
    /// Platform notification (timestamps, recalls, transfers, ...)
    System,
    /// Could not be attributed
    Unknown,
}

impl Speaker {
    /// Whether this speaker takes part in turn counting
    pub fn is_attributed(self) -> bool {
        matches!(self, Speaker::Me | Speaker::Other)
    }
}

impl std::fmt::Display for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Speaker::Me => write!(f, "me"),
            Speaker::Other => write!(f, "other"),
            Speaker::System => write!(f, "system"),
            Speaker::Unknown => write!(f, "unknown"),
        }
    }
}

/// A single non-blank transcript line after speaker classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedLine {
    pub speaker: Speaker,
    /// Line content; the speaker prefix is stripped for Me/Other
    pub content: String,
}

/// Severity levels for issues and reports
///
/// Ordered so that `Error > Warning > Good`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Good,
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Good => write!(f, "good"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Quality rules, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    /// Neither party could be identified
    NoSpeakers,
    /// No line attributed to the user
    NoMyMessages,
    /// No line attributed to the other party
    NoOtherMessages,
    /// Too few speaker alternations
    InsufficientTurns,
    /// Corrupted or non-linguistic content
    Gibberish,
    /// Platform notifications dominate the transcript
    TooManySystemMessages,
    /// Promotional content, links or redeem codes
    AdContent,
    /// Only one side ever speaks
    SingleSpeaker,
    /// Most lines could not be attributed
    ManyUnknown,
}

impl Rule {
    /// All rules in evaluation order
    pub const ALL: [Rule; 9] = [
        Rule::NoSpeakers,
        Rule::NoMyMessages,
        Rule::NoOtherMessages,
        Rule::InsufficientTurns,
        Rule::Gibberish,
        Rule::TooManySystemMessages,
        Rule::AdContent,
        Rule::SingleSpeaker,
        Rule::ManyUnknown,
    ];

    /// Stable identifier used in config files and JSON output
    pub fn id(self) -> &'static str {
        match self {
            Rule::NoSpeakers => "no_speakers",
            Rule::NoMyMessages => "no_my_messages",
            Rule::NoOtherMessages => "no_other_messages",
            Rule::InsufficientTurns => "insufficient_turns",
            Rule::Gibberish => "gibberish",
            Rule::TooManySystemMessages => "too_many_system_messages",
            Rule::AdContent => "ad_content",
            Rule::SingleSpeaker => "single_speaker",
            Rule::ManyUnknown => "many_unknown",
        }
    }

    /// Look up a rule by its identifier
    pub fn from_id(id: &str) -> Option<Rule> {
        Rule::ALL.into_iter().find(|r| r.id() == id)
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// An issue found in a transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// Rule that found this issue
    pub kind: Rule,
    pub severity: Severity,
    /// Human-readable message
    pub message: String,
    /// Suggested fix (if available)
    pub suggestion: Option<String>,
}

impl Issue {
    pub fn warning(kind: Rule, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::Warning,
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Statistics about a transcript
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    /// Number of non-blank lines
    pub total_lines: usize,
    pub me_count: usize,
    pub other_count: usize,
    pub system_count: usize,
    pub unknown_count: usize,
    /// Speaker alternations between attributed lines
    pub turn_count: usize,
    pub has_gibberish: bool,
    /// System notifications exceed the allowed share of lines
    pub has_system_noise: bool,
}

/// The result of assessing a transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub is_valid: bool,
    pub overall_severity: Severity,
    /// Issues in rule evaluation order
    pub issues: Vec<Issue>,
    pub stats: Stats,
}

impl Report {
    /// Report for input with no non-blank lines.
    ///
    /// Error severity with an empty issue list; this is the only path that
    /// sets the severity independently of the issues.
    pub fn empty() -> Self {
        Self {
            is_valid: false,
            overall_severity: Severity::Error,
            issues: Vec::new(),
            stats: Stats::default(),
        }
    }

    /// Build a report whose severity and validity derive from the issues
    pub fn from_issues(issues: Vec<Issue>, stats: Stats) -> Self {
        let overall_severity = issues
            .iter()
            .map(|i| i.severity)
            .max()
            .unwrap_or(Severity::Good);
        let is_valid = !issues.iter().any(|i| i.severity == Severity::Error);
        Self {
            is_valid,
            overall_severity,
            issues,
            stats,
        }
    }

    /// Whether an issue for the given rule is present
    pub fn has_issue(&self, rule: Rule) -> bool {
        self.issues.iter().any(|i| i.kind == rule)
    }
}

/// Public API: assess a transcript with the default rule configuration.
///
/// Pure and infallible; every input, including empty or binary-looking text,
/// maps to a well-formed [`Report`].
pub fn assess(text: &str) -> Report {
    analyzer::QualityEngine::new().assess(text)
}

/// Assess a transcript using thresholds and rule overrides from `config`
pub fn assess_with_config(text: &str, config: &config::Config) -> Report {
    analyzer::QualityEngine::with_config(config).assess(text)
}
