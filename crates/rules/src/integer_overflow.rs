use blockscope::ast::{parse_constraint, Assignment};
use blockscope::error::RuleError;
use blockscope::finding::*;
use blockscope::rule::{AnalysisContext, Rule};

/// Detects unchecked arithmetic on state variables under compilers older
/// than 0.8, which wrap silently on overflow.
pub struct IntegerOverflow;

/// `+=`, `-=`, `*=`, `++`, `--`, or a plain assignment with `+ - *` on the right
fn can_wrap(assignment: &Assignment) -> bool {
    let text = assignment.text.trim();
    if text.starts_with("++")
        || text.starts_with("--")
        || text.ends_with("++")
        || text.ends_with("--")
    {
        return true;
    }
    let Some(idx) = text.find('=') else {
        return false;
    };
    let lhs = text[..idx].trim_end();
    match lhs.chars().last() {
        Some('+' | '-' | '*') => true,
        Some('/' | '%' | '|' | '&' | '^' | '<' | '>') => false,
        _ => text[idx + 1..].contains(['+', '-', '*']),
    }
}

impl Rule for IntegerOverflow {
    fn id(&self) -> &str {
        "integer-overflow"
    }

    fn title(&self) -> &str {
        "Integer overflow/underflow"
    }

    fn description(&self) -> &str {
        "Detects unchecked state arithmetic in contracts compiled before Solidity 0.8"
    }

    fn severity(&self) -> Severity {
        Severity::Medium
    }

    fn confidence(&self) -> Confidence {
        Confidence::Medium
    }

    fn evaluate(&self, ctx: &AnalysisContext) -> Result<Vec<Finding>, RuleError> {
        let legacy_compiler = ctx.unit.pragmas.iter().any(|p| {
            parse_constraint(&p.constraint)
                .minimum
                .is_some_and(|v| !v.has_checked_arithmetic())
        });
        if !legacy_compiler || ctx.source_code().contains("using SafeMath") {
            return Ok(Vec::new());
        }

        let mut findings = Vec::new();
        for (contract, function) in ctx.unit.functions() {
            let Some(body) = &function.body else {
                continue;
            };
            for assignment in body
                .assignments
                .iter()
                .filter(|a| contract.is_state_variable(&a.target) && can_wrap(a))
            {
                let line = assignment.span.start_line;
                findings.push(
                    self.finding(
                        format!(
                            "Unchecked arithmetic on {} in {}.{}",
                            assignment.target,
                            contract.name,
                            function.name,
                        ),
                        format!(
                            "`{}` at line {line} can overflow or underflow without reverting \
                             under a pre-0.8 compiler.",
                            assignment.text.trim()
                        ),
                    )
                    .at_line(line)
                    .with_code(assignment.text.trim())
                    .with_recommendation("Use SafeMath or compile with Solidity 0.8 or later."),
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
    fn test_detects_legacy_arithmetic() {
        let source = r#"
pragma solidity ^0.6.12;
contract Token {
    mapping(address => uint256) balances;
    uint256 total;
    function credit(address to, uint256 amount) public {
        balances[to] += amount;
        total = total + amount;
    }
}
"#;
        let findings = run(&IntegerOverflow, source);
        let lines: Vec<_> = findings.iter().map(|f| f.line_number).collect();
        assert_eq!(lines, vec![Some(7), Some(8)]);
    }

    #[test]
    fn test_checked_compiler_ignored() {
        let source = r#"
pragma solidity ^0.8.0;
contract Token {
    uint256 total;
    function credit(uint256 amount) public {
        total += amount;
    }
}
"#;
        assert!(run(&IntegerOverflow, source).is_empty());
    }

    #[test]
    fn test_safemath_ignored() {
        let source = r#"
pragma solidity 0.5.17;
contract Token {
    using SafeMath for uint256;
    uint256 total;
    function credit(uint256 amount) public {
        total = total.add(amount);
        total += 1;
    }
}
"#;
        assert!(run(&IntegerOverflow, source).is_empty());
    }

    #[test]
    fn test_local_and_division_ignored() {
        let source = r#"
pragma solidity ^0.7.0;
contract Math {
    uint256 ratio;
    function f(uint256 a) public {
        uint256 local;
        local += a;
        ratio /= 2;
        ratio = a;
    }
}
"#;
        assert!(run(&IntegerOverflow, source).is_empty());
    }
}
