//! Analyzer module - transcript quality assessment engine

pub mod engine;
pub mod rules;
pub mod stats;

pub use engine::{aggregate_stats, assess_parallel, AggregateStats, QualityEngine, TranscriptResult};
pub use stats::{count_turns, ConversationStats};
