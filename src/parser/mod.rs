//! Parser module for chat transcripts

pub mod line;
pub mod patterns;

pub use line::{LineParser, BYTE_ORDER_MARK};
pub use patterns::{global_patterns, PatternSet, SELF_TOKEN};
