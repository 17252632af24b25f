use blockscope::ast::FunctionKind;
use blockscope::error::RuleError;
use blockscope::finding::*;
use blockscope::rule::{AnalysisContext, Rule};

use crate::common::has_access_control;

/// Detects `delegatecall` from unguarded entry points. The callee runs with
/// this contract's storage and balance.
pub struct UnsafeDelegatecall;

impl Rule for UnsafeDelegatecall {
    fn id(&self) -> &str {
        "unsafe-delegatecall"
    }

    fn title(&self) -> &str {
        "Unsafe delegatecall"
    }

    fn description(&self) -> &str {
        "Detects delegatecall in functions any caller can reach"
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
            // proxy fallbacks forward to a fixed implementation
            if matches!(function.kind, FunctionKind::Fallback | FunctionKind::Receive) {
                continue;
            }
            if !function.is_externally_callable() || has_access_control(contract, function) {
                continue;
            }
            let Some(body) = &function.body else {
                continue;
            };

            for call in body
                .calls
                .iter()
                .filter(|c| c.is_low_level() && c.method() == "delegatecall")
            {
                let line = call.span.start_line;
                findings.push(
                    self.finding(
                        format!("Unprotected delegatecall in {}.{}", contract.name, function.name),
                        format!(
                            "`{}` performs a delegatecall at line {line} without access control. \
                             Code at the target address executes against this contract's storage.",
                            function.name
                        ),
                    )
                    .at_line(line)
                    .with_code(call.text.clone())
                    .with_recommendation(
                        "Restrict who can trigger the delegatecall and only delegate to trusted, fixed addresses.",
                    ),
                );
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
    fn test_detects_user_controlled_delegatecall() {
        let source = r#"
contract Proxy {
    function forward(address target, bytes memory data) public {
        target.delegatecall(data);
    }
}
"#;
        let findings = run(&UnsafeDelegatecall, source);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].line_number, Some(4));
        assert_eq!(findings[0].severity, Severity::High);
    }

    #[test]
    fn test_guarded_delegatecall_ignored() {
        let source = r#"
contract Proxy {
    address admin;
    function upgradeAndCall(address target, bytes memory data) external {
        require(msg.sender == admin);
        (bool ok, ) = target.delegatecall(data);
        require(ok);
    }
}
"#;
        assert!(run(&UnsafeDelegatecall, source).is_empty());
    }

    #[test]
    fn test_fallback_proxy_ignored() {
        let source = r#"
contract Proxy {
    address implementation;
    fallback() external payable {
        (bool ok, ) = implementation.delegatecall(msg.data);
        require(ok);
    }
}
"#;
        assert!(run(&UnsafeDelegatecall, source).is_empty());
    }
}
