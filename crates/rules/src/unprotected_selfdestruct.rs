use blockscope::error::RuleError;
use blockscope::finding::*;
use blockscope::rule::{AnalysisContext, Rule};

use crate::common::has_access_control;

/// Detects `selfdestruct` reachable by any caller. Anyone can destroy the
/// contract and sweep its ether.
pub struct UnprotectedSelfdestruct;

impl Rule for UnprotectedSelfdestruct {
    fn id(&self) -> &str {
        "unprotected-selfdestruct"
    }

    fn title(&self) -> &str {
        "Unprotected selfdestruct"
    }

    fn description(&self) -> &str {
        "Detects selfdestruct in public or external functions without access control"
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn confidence(&self) -> Confidence {
        Confidence::High
    }

    fn evaluate(&self, ctx: &AnalysisContext) -> Result<Vec<Finding>, RuleError> {
        let mut findings = Vec::new();

        for (contract, function) in ctx.unit.functions() {
            if !function.is_externally_callable() || has_access_control(contract, function) {
                continue;
            }
            let Some(body) = &function.body else {
                continue;
            };

            for call in body
                .calls
                .iter()
                .filter(|c| c.callee == "selfdestruct" || c.callee == "suicide")
            {
                let line = call.span.start_line;
                findings.push(
                    self.finding(
                        format!(
                            "Unprotected {} in {}.{}",
                            call.callee,
                            contract.name,
                            function.name,
                        ),
                        format!(
                            "`{}` can be called by anyone and reaches `{}` at line {}, \
                             permanently destroying the contract and transferring its balance.",
                            function.name, call.callee, line
                        ),
                    )
                    .at_line(line)
                    .with_code(call.text.clone())
                    .with_recommendation(
                        "Restrict the function with an owner check (e.g. `onlyOwner`) or remove selfdestruct.",
                    ),
                );
            }
        }

        Ok(findings)
    }
}
