pub mod analyzer;
pub mod ast;
pub mod config;
pub mod error;
pub mod finding;
pub mod orchestrator;
pub mod report;
pub mod rule;

pub use analyzer::{scan_or_default, ScanAnalyzer};
pub use orchestrator::AnalysisOrchestrator;
pub use report::{ScanRequest, ScanResult, SeverityBreakdown};
