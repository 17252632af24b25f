use std::fmt;

use super::types::Finding;

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} ({})", self.severity, self.title, self.rule_id)?;
        if let Some(line) = self.line_number {
            write!(f, " at line {line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::finding::{Confidence, Finding, Severity};

    #[test]
    fn test_display_with_line() {
        let finding = Finding::new(
            "tx-origin-auth",
            Severity::High,
            Confidence::High,
            "tx.origin used for authorization",
            "",
        )
        .at_line(12);
        assert_eq!(
            finding.to_string(),
            "[High] tx.origin used for authorization (tx-origin-auth) at line 12"
        );
    }
}
