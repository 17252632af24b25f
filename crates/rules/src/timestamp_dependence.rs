use blockscope::ast::utils::{compact, contains_word};
use blockscope::error::RuleError;
use blockscope::finding::*;
use blockscope::rule::{AnalysisContext, Rule};

use crate::common::body_lines;

/// Detects control flow that depends on `block.timestamp` (or `now`), which
/// block producers can skew.
pub struct TimestampDependence;

fn reads_timestamp(code: &str) -> bool {
    code.contains("block.timestamp") || contains_word(code, "now")
}

/// Condition keywords, comparisons or modulo on the line
fn is_decision(code: &str) -> bool {
    let code = compact(code).replace("=>", "");
    ["require(", "if(", "while(", "assert("]
        .iter()
        .any(|k| code.contains(k))
        || code.contains(['<', '>', '%'])
        || code.contains("==")
        || code.contains("!=")
}

impl Rule for TimestampDependence {
    fn id(&self) -> &str {
        "timestamp-dependence"
    }

    fn title(&self) -> &str {
        "Timestamp dependence"
    }

    fn description(&self) -> &str {
        "Detects block.timestamp used in conditions or randomness"
    }

    fn severity(&self) -> Severity {
        Severity::Low
    }

    fn confidence(&self) -> Confidence {
        Confidence::Medium
    }

    fn evaluate(&self, ctx: &AnalysisContext) -> Result<Vec<Finding>, RuleError> {
        let mut findings = Vec::new();

        for (contract, function) in ctx.unit.functions() {
            let Some(body) = &function.body else {
                continue;
            };
            for (line, code) in body_lines(ctx, body) {
                if !reads_timestamp(code) || !is_decision(code) {
                    continue;
                }
                findings.push(
                    self.finding(
                        format!("Timestamp dependence in {}.{}", contract.name, function.name),
                        format!(
                            "Line {line} makes a decision based on the block timestamp, \
                             which the block producer can shift by several seconds."
                        ),
                    )
                    .at_line(line)
                    .with_code(code.trim())
                    .with_recommendation(
                        "Avoid timestamps for randomness or tight deadlines; use block numbers or an oracle.",
                    ),
                );
            }
        }

        Ok(findings)
    }
}
