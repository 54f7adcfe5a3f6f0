//! Detector module - whole-text noise classification

pub mod noise;

pub use noise::{NoiseDetector, NoiseFlags, MAX_CHAR_REPEAT};
