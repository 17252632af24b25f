use super::context::AnalysisContext;
use crate::error::RuleError;
use crate::finding::{Confidence, Finding, Severity};

/// Core trait for all vulnerability rules.
/// Implementors inspect a parsed Solidity source unit and return findings.
/// Rules must be pure: no I/O and no shared mutable state, so the
/// orchestrator can evaluate them in parallel.
pub trait Rule: Send + Sync {
    /// Unique identifier for this rule (e.g., "tx-origin-auth")
    fn id(&self) -> &str;

    /// Short human-readable name
    fn title(&self) -> &str;

    /// What this rule checks
    fn description(&self) -> &str;

    /// Default severity of findings from this rule
    fn severity(&self) -> Severity;

    /// Default confidence level of findings from this rule
    fn confidence(&self) -> Confidence;

    /// Run the rule against the given context.
    /// Unparseable regions yield no findings rather than an error.
    fn evaluate(&self, context: &AnalysisContext) -> Result<Vec<Finding>, RuleError>;

    /// Finding pre-filled with this rule's id, severity and confidence
    fn finding(&self, title: String, description: String) -> Finding {
        Finding::new(
            self.id(),
            self.severity(),
            self.confidence(),
            title,
            description,
        )
    }
}
