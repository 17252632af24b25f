use thiserror::Error;

/// Failure to obtain a syntax tree for a source unit.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to load Solidity grammar: {0}")]
    Language(String),
    #[error("parser produced no syntax tree")]
    NoTree,
}

/// Failure inside a single rule. Contained by the orchestrator.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("rule `{rule}` failed: {message}")]
    Failed { rule: String, message: String },
    #[error("rule `{0}` panicked")]
    Panicked(String),
}

impl RuleError {
    pub fn failed(rule: impl Into<String>, message: impl Into<String>) -> Self {
        RuleError::Failed {
            rule: rule.into(),
            message: message.into(),
        }
    }
}

/// Failure of a whole scan, surfaced only through the `ScanAnalyzer` seam.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("analysis failed: {0}")]
    Internal(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("unknown severity `{value}` for rule `{rule}`")]
    Severity { rule: String, value: String },
    #[error("invalid scoring weights: {0}")]
    Scoring(String),
}
