use blockscope::error::RuleError;
use blockscope::finding::*;
use blockscope::rule::{AnalysisContext, Rule};

/// Detects low-level calls whose boolean result is dropped. A failed call
/// does not revert, so execution continues as if it succeeded.
pub struct UncheckedLowLevelCall;

impl Rule for UncheckedLowLevelCall {
    fn id(&self) -> &str {
        "unchecked-low-level-call"
    }

    fn title(&self) -> &str {
        "Unchecked low-level call"
    }

    fn description(&self) -> &str {
        "Detects call, delegatecall, staticcall and send whose return value is ignored"
    }

    fn severity(&self) -> Severity {
        Severity::Medium
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
            for call in body
                .calls
                .iter()
                .filter(|c| c.is_low_level() && c.result_discarded)
            {
                let line = call.span.start_line;
                findings.push(
                    self.finding(
                        format!(
                            "Unchecked {} in {}.{}",
                            call.method(),
                            contract.name,
                            function.name,
                        ),
                        format!(
                            "The return value of `{}` at line {line} is ignored. \
                             If the call fails, execution continues silently.",
                            call.callee
                        ),
                    )
                    .at_line(line)
                    .with_code(call.text.clone())
                    .with_recommendation("Check the returned success flag, e.g. `require(ok)`."),
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
    fn test_detects_ignored_send() {
        let source = r#"
contract Payout {
    function pay(address payable to) external {
        to.send(1 ether);
    }
}
"#;
        let findings = run(&UncheckedLowLevelCall, source);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].line_number, Some(4));
        assert_eq!(findings[0].title, "Unchecked send in Payout.pay");
    }

    #[test]
    fn test_checked_call_ignored() {
        let source = r#"
contract Payout {
    function pay(address to) external {
        (bool ok, ) = to.call{value: 1}("");
        require(ok);
        require(payable(to).send(1));
    }
}
"#;
        assert!(run(&UncheckedLowLevelCall, source).is_empty());
    }

    #[test]
    fn test_transfer_not_low_level() {
        let source = r#"
contract Payout {
    function pay(address payable to) external {
        to.transfer(1);
    }
}
"#;
        assert!(run(&UncheckedLowLevelCall, source).is_empty());
    }
}
