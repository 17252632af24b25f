use blockscope::ast::utils::compact;
use blockscope::error::RuleError;
use blockscope::finding::*;
use blockscope::rule::{AnalysisContext, Rule};

/// Detects loops bounded by the length of a growable storage array. Once
/// the array is large enough the function exceeds the block gas limit.
pub struct UnboundedLoop;

impl Rule for UnboundedLoop {
    fn id(&self) -> &str {
        "unbounded-loop"
    }

    fn title(&self) -> &str {
        "Unbounded loop"
    }

    fn description(&self) -> &str {
        "Detects loops over dynamic storage arrays that can exhaust gas"
    }

    fn severity(&self) -> Severity {
        Severity::Medium
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
            let dynamic_arrays: Vec<&str> = contract
                .state_variables
                .iter()
                .filter(|v| v.type_name.ends_with("[]"))
                .map(|v| v.name.as_str())
                .collect();
            if dynamic_arrays.is_empty() {
                continue;
            }

            for site in &body.loops {
                let header = compact(&site.header);
                let Some(array) = dynamic_arrays
                    .iter()
                    .find(|name| header.contains(&format!("{name}.length")))
                else {
                    continue;
                };
                let line = site.span.start_line;
                let mut finding = self
                    .finding(
                        format!(
                            "Unbounded loop over {array} in {}.{}",
                            contract.name,
                            function.name,
                        ),
                        format!(
                            "The loop at line {line} iterates over every element of storage array `{array}`, \
                             which can grow until the call runs out of gas."
                        ),
                    )
                    .at_line(line)
                    .with_recommendation("Bound the iteration or process the array in batches.");
                if let Some(code) = ctx.line_excerpt(line) {
                    finding = finding.with_code(code);
                }
                findings.push(finding);
            }
        }

        Ok(findings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::run;

    #[test]
    fn test_detects_loop_over_storage_array() {
        let source = r#"
contract Airdrop {
    address[] public recipients;
    function distribute() external {
        for (uint256 i = 0; i < recipients.length; i++) {
            payable(recipients[i]).transfer(1);
        }
    }
}
"#;
        let findings = run(&UnboundedLoop, source);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].line_number, Some(5));
        assert_eq!(findings[0].title, "Unbounded loop over recipients in Airdrop.distribute");
    }

    #[test]
    fn test_fixed_bound_ignored() {
        let source = r#"
contract Airdrop {
    address[] public recipients;
    function distribute(uint256 count) external {
        for (uint256 i = 0; i < count; i++) {
            payable(recipients[i]).transfer(1);
        }
    }
}
"#;
        assert!(run(&UnboundedLoop, source).is_empty());
    }

    #[test]
    fn test_memory_array_ignored() {
        let source = r#"
contract Batch {
    function sum(uint256[] memory values) external pure returns (uint256 total) {
        for (uint256 i = 0; i < values.length; i++) {
            total += values[i];
        }
    }
}
"#;
        assert!(run(&UnboundedLoop, source).is_empty());
    }
}
