use blockscope::ast::parse_constraint;
use blockscope::error::RuleError;
use blockscope::finding::*;
use blockscope::rule::{AnalysisContext, Rule};

/// Detects `pragma solidity` constraints that admit more than one compiler.
pub struct FloatingPragma;

impl Rule for FloatingPragma {
    fn id(&self) -> &str {
        "floating-pragma"
    }

    fn title(&self) -> &str {
        "Floating pragma"
    }

    fn description(&self) -> &str {
        "Detects unlocked compiler versions such as ^0.8.0"
    }

    fn severity(&self) -> Severity {
        Severity::Info
    }

    fn confidence(&self) -> Confidence {
        Confidence::High
    }

    fn evaluate(&self, ctx: &AnalysisContext) -> Result<Vec<Finding>, RuleError> {
        let mut findings = Vec::new();

        for pragma in &ctx.unit.pragmas {
            if !parse_constraint(&pragma.constraint).floating {
                continue;
            }
            let line = pragma.span.start_line;
            let mut finding = self
                .finding(
                    "Floating pragma".to_string(),
                    format!(
                        "The compiler version `{}` is not locked. The contract may be deployed \
                         with a different compiler than it was tested with.",
                        pragma.constraint
                    ),
                )
                .at_line(line)
                .with_recommendation(
                    "Pin an exact compiler version, e.g. `pragma solidity 0.8.20;`.",
                );
            if let Some(code) = ctx.line_excerpt(line) {
                finding = finding.with_code(code);
            }
            findings.push(finding);
        }

        Ok(findings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::run;

    #[test]
    fn test_detects_caret_pragma() {
        let source = "pragma solidity ^0.8.0;\ncontract A {}\n";
        let findings = run(&FloatingPragma, source);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].line_number, Some(1));
        assert_eq!(findings[0].code.as_deref(), Some("pragma solidity ^0.8.0;"));
        assert_eq!(findings[0].severity, Severity::Info);
    }

    #[test]
    fn test_range_pragma_detected() {
        let source = "pragma solidity >=0.6.0 <0.9.0;\ncontract A {}\n";
        assert_eq!(run(&FloatingPragma, source).len(), 1);
    }

    #[test]
    fn test_pinned_pragma_ignored() {
        let source = "pragma solidity 0.8.20;\npragma abicoder v2;\ncontract A {}\n";
        assert!(run(&FloatingPragma, source).is_empty());
    }
}
