use blockscope::error::RuleError;
use blockscope::finding::*;
use blockscope::rule::{AnalysisContext, Rule};

use crate::common::has_access_control;

/// Name prefixes of functions that are privileged by convention
const PRIVILEGED_PREFIXES: &[&str] = &[
    "withdraw",
    "mint",
    "burn",
    "setowner",
    "transferownership",
    "changeowner",
    "setadmin",
    "upgrade",
    "pause",
    "unpause",
    "kill",
    "destroy",
    "sweep",
    "emergency",
];

/// Detects privileged-looking state-changing functions with no caller
/// restriction.
pub struct MissingAccessControl;

impl Rule for MissingAccessControl {
    fn id(&self) -> &str {
        "missing-access-control"
    }

    fn title(&self) -> &str {
        "Missing access control"
    }

    fn description(&self) -> &str {
        "Detects sensitive public functions (withdraw, mint, ownership changes) callable by anyone"
    }

    fn severity(&self) -> Severity {
        Severity::High
    }

    fn confidence(&self) -> Confidence {
        Confidence::Medium
    }

    fn evaluate(&self, ctx: &AnalysisContext) -> Result<Vec<Finding>, RuleError> {
        let mut findings = Vec::new();

        for (contract, function) in ctx.unit.functions() {
            if !function.is_externally_callable() || function.is_read_only() {
                continue;
            }
            let name = function.name.to_lowercase();
            if !PRIVILEGED_PREFIXES.iter().any(|p| name.starts_with(p)) {
                continue;
            }
            let Some(body) = &function.body else {
                continue;
            };
            // per-caller balances are self-service; selfdestruct has its own rule
            if body.text.contains("[msg.sender]")
                || body
                    .calls
                    .iter()
                    .any(|c| c.callee == "selfdestruct" || c.callee == "suicide")
            {
                continue;
            }
            if has_access_control(contract, function) {
                continue;
            }

            let line = function.span.start_line;
            let mut finding = self
                .finding(
                    format!("Missing access control on {}.{}", contract.name, function.name),
                    format!(
                        "`{}` changes privileged state but has no modifier or `msg.sender` check, \
                         so any account can call it.",
                        function.name
                    ),
                )
                .at_line(line)
                .with_recommendation(
                    "Add an access control modifier such as `onlyOwner` or `onlyRole`.",
                );
            if let Some(code) = ctx.line_excerpt(line) {
                finding = finding.with_code(code);
            }
            findings.push(finding);
        }

        Ok(findings)
    }
}
