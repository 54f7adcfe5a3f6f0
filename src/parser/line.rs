//! Line splitting and speaker classification.
//!
//! Each non-blank line runs through an ordered cascade and the first step that
//! matches decides the speaker. Later steps never override an earlier match:
//! the permissive "Name:" fallback in the other-party step must run after the
//! self-authored step, or self-authored lines would be misattributed.

use super::patterns::{global_patterns, PatternSet, SELF_TOKEN};
use crate::{ParsedLine, Speaker};

/// Byte order mark left at the start of files saved by some editors
pub const BYTE_ORDER_MARK: char = '\u{FEFF}';

/// A step in the classification cascade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    System,
    Me,
    Other,
}

/// Evaluation order of the cascade (first match wins)
const CASCADE: [Step; 3] = [Step::System, Step::Me, Step::Other];

/// Parser that splits a transcript into attributed lines
pub struct LineParser {
    patterns: &'static PatternSet,
}

impl LineParser {
    /// Create a parser backed by the process-wide pattern tables
    pub fn new() -> Self {
        Self {
            patterns: global_patterns(),
        }
    }

    /// Split on line breaks, trim (including byte order marks), drop blank
    /// lines and classify the rest
    pub fn parse(&self, text: &str) -> Vec<ParsedLine> {
        text.split(['\n', '\r'])
            .map(|line| line.trim_matches(|c: char| c.is_whitespace() || c == BYTE_ORDER_MARK))
            .filter(|line| !line.is_empty())
            .map(|line| self.classify(line))
            .collect()
    }

    /// Classify a single trimmed line
    pub fn classify(&self, line: &str) -> ParsedLine {
        CASCADE
            .iter()
            .find_map(|step| self.apply(*step, line))
            .unwrap_or_else(|| ParsedLine {
                speaker: Speaker::Unknown,
                content: line.to_string(),
            })
    }

    fn apply(&self, step: Step, line: &str) -> Option<ParsedLine> {
        match step {
            Step::System => self
                .patterns
                .system
                .iter()
                .any(|re| re.is_match(line))
                .then(|| ParsedLine {
                    speaker: Speaker::System,
                    content: line.to_string(),
                }),
            Step::Me => strip_prefix(&self.patterns.me, line).map(|content| ParsedLine {
                speaker: Speaker::Me,
                content,
            }),
            Step::Other => strip_prefix(&self.patterns.other, line)
                .or_else(|| {
                    if line.starts_with(SELF_TOKEN) {
                        return None;
                    }
                    self.patterns
                        .name_prefix
                        .as_ref()
                        .and_then(|re| strip_prefix(std::slice::from_ref(re), line))
                })
                .map(|content| ParsedLine {
                    speaker: Speaker::Other,
                    content,
                }),
        }
    }
}

impl Default for LineParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip the first matching prefix and re-trim what is left
fn strip_prefix(patterns: &[regex::Regex], line: &str) -> Option<String> {
    patterns
        .iter()
        .find_map(|re| re.find(line))
        .map(|m| line[m.end()..].trim().to_string())
}
