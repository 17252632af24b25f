use blockscope::error::RuleError;
use blockscope::finding::*;
use blockscope::rule::{AnalysisContext, Rule};

/// Detects state variables written after a low-level `.call` in the same
/// function (checks-effects-interactions violation). The callee can re-enter
/// before the state update lands.
pub struct Reentrancy;

impl Rule for Reentrancy {
    fn id(&self) -> &str {
        "reentrancy"
    }

    fn title(&self) -> &str {
        "Reentrancy"
    }

    fn description(&self) -> &str {
        "Detects state writes that follow an external call without a reentrancy guard"
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn confidence(&self) -> Confidence {
        Confidence::Medium
    }

    fn evaluate(&self, ctx: &AnalysisContext) -> Result<Vec<Finding>, RuleError> {
        let mut findings = Vec::new();

        for (contract, function) in ctx.unit.functions() {
            if !function.is_externally_callable() {
                continue;
            }
            if function
                .modifiers
                .iter()
                .any(|m| m.to_lowercase().contains("nonreentrant"))
            {
                continue;
            }
            let Some(body) = &function.body else {
                continue;
            };

            for call in body.calls.iter().filter(|c| c.is_low_level() && c.method() == "call") {
                let Some(write) = body
                    .assignments
                    .iter()
                    .find(|a| a.offset > call.offset && contract.is_state_variable(&a.target))
                else {
                    continue;
                };

                let line = call.span.start_line;
                let mut finding = self
                    .finding(
                        format!("Reentrancy in {}.{}", contract.name, function.name),
                        format!(
                            "External call at line {} is followed by a write to state variable `{}` at line {}. \
                             A malicious callee can re-enter `{}` before the state is updated.",
                            line, write.target, write.span.start_line, function.name
                        ),
                    )
                    .at_line(line)
                    .with_recommendation(
                        "Update state before making external calls (checks-effects-interactions) \
                         or add a `nonReentrant` guard.",
                    );
                if let Some(code) = ctx.snippet(line, write.span.start_line) {
                    finding = finding.with_code(code);
                }
                findings.push(finding);
                // one report per function
                break;
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
    fn test_detects_write_after_call() {
        let source = r#"
pragma solidity ^0.8.0;
contract Bank {
    mapping(address => uint256) public balances;

    function withdraw(uint256 amount) public {
        require(balances[msg.sender] >= amount);
        (bool ok, ) = msg.sender.call{value: amount}("");
        require(ok);
        balances[msg.sender] -= amount;
    }
}
"#;
        let findings = run(&Reentrancy, source);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].rule_id, "reentrancy");
        assert_eq!(findings[0].severity, Severity::Critical);
        assert_eq!(findings[0].line_number, Some(8));
    }

    #[test]
    fn test_no_finding_when_state_updated_first() {
        let source = r#"
contract Bank {
    mapping(address => uint256) public balances;

    function withdraw(uint256 amount) public {
        balances[msg.sender] -= amount;
        (bool ok, ) = msg.sender.call{value: amount}("");
        require(ok);
    }
}
"#;
        assert!(run(&Reentrancy, source).is_empty());
    }

    #[test]
    fn test_no_finding_with_guard() {
        let source = r#"
contract Bank {
    mapping(address => uint256) public balances;

    function withdraw(uint256 amount) external nonReentrant {
        (bool ok, ) = msg.sender.call{value: amount}("");
        require(ok);
        balances[msg.sender] -= amount;
    }
}
"#;
        assert!(run(&Reentrancy, source).is_empty());
    }

    #[test]
    fn test_local_write_after_call_is_ignored() {
        let source = r#"
contract Bank {
    function ping(address target) external {
        uint256 count;
        (bool ok, ) = target.call("");
        count = 1;
    }
}
"#;
        assert!(run(&Reentrancy, source).is_empty());
    }
}
