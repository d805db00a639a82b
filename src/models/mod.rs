//! Data models.

mod analysis;

pub use analysis::{AnalysisRecord, AnalysisResult, AnalysisStats, TopicCount};
