use blockscope::ast::utils::compact;
use blockscope::error::RuleError;
use blockscope::finding::*;
use blockscope::rule::{AnalysisContext, Rule};

use crate::common::body_lines;

/// Detects authorization decisions based on `tx.origin`. A contract the
/// owner interacts with can act on the owner's behalf.
pub struct TxOriginAuth;

fn compares_tx_origin(code: &str) -> bool {
    let code = compact(code);
    // `tx.origin == msg.sender` only rejects contract callers
    if code.contains("tx.origin==msg.sender") || code.contains("msg.sender==tx.origin") {
        return false;
    }
    ["tx.origin==", "==tx.origin", "tx.origin!=", "!=tx.origin"]
        .iter()
        .any(|p| code.contains(p))
}

impl Rule for TxOriginAuth {
    fn id(&self) -> &str {
        "tx-origin-auth"
    }

    fn title(&self) -> &str {
        "tx.origin authorization"
    }

    fn description(&self) -> &str {
        "Detects tx.origin used in authorization checks"
    }

    fn severity(&self) -> Severity {
        Severity::High
    }

    fn confidence(&self) -> Confidence {
        Confidence::High
    }

    fn evaluate(&self, ctx: &AnalysisContext) -> Result<Vec<Finding>, RuleError> {
        let mut findings = Vec::new();

        for (contract, function) in ctx.unit.functions() {
            let Some(body) = &function.body else {
                continue;
            };
            for (line, code) in body_lines(ctx, body) {
                if !compares_tx_origin(code) {
                    continue;
                }
                findings.push(
                    self.finding(
                        format!(
                            "tx.origin used for authorization in {}.{}",
                            contract.name,
                            function.name,
                        ),
                        format!(
                            "Line {line} compares `tx.origin` to decide who may proceed. \
                             Any contract the authorized account calls can pass this check."
                        ),
                    )
                    .at_line(line)
                    .with_code(code.trim())
                    .with_recommendation("Use `msg.sender` for authorization."),
                );
            }
        }

        Ok(findings)
    }
}
