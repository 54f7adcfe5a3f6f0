//! Submission length gate.
//!
//! Decides whether a transcript may be sent to the analysis service at all.
//! Kept apart from [`crate::Report`]: a transcript can be advisory-clean and
//! still too long to submit, and vice versa.

use serde::{Deserialize, Serialize};

pub const DEFAULT_MIN_CHARS: usize = 10;
pub const DEFAULT_MAX_CHARS: usize = 5000;

/// Accepted length range, in Unicode scalar values of the raw text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionLimits {
    pub min_chars: usize,
    pub max_chars: usize,
}

impl Default for SubmissionLimits {
    fn default() -> Self {
        Self {
            min_chars: DEFAULT_MIN_CHARS,
            max_chars: DEFAULT_MAX_CHARS,
        }
    }
}

/// Outcome of the length gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum SubmissionCheck {
    Ok { len: usize },
    TooShort { len: usize, min: usize },
    TooLong { len: usize, max: usize },
}

impl SubmissionCheck {
    pub fn is_ok(&self) -> bool {
        matches!(self, SubmissionCheck::Ok { .. })
    }
}

impl std::fmt::Display for SubmissionCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionCheck::Ok { len } => write!(f, "{} chars, ready to submit", len),
            SubmissionCheck::TooShort { len, min } => {
                write!(f, "{} chars, needs at least {}", len, min)
            }
            SubmissionCheck::TooLong { len, max } => {
                write!(f, "{} chars, exceeds the limit of {}", len, max)
            }
        }
    }
}

impl SubmissionLimits {
    pub fn check(&self, text: &str) -> SubmissionCheck {
        let len = text.chars().count();
        if len < self.min_chars {
            SubmissionCheck::TooShort {
                len,
                min: self.min_chars,
            }
        } else if len > self.max_chars {
            SubmissionCheck::TooLong {
                len,
                max: self.max_chars,
            }
        } else {
            SubmissionCheck::Ok { len }
        }
    }
}
