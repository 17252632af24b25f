pub mod scoring;
pub mod types;

pub use scoring::{summarize, ScoringWeights, SAFE_SUMMARY};
pub use types::*;
