use serde::{Deserialize, Serialize};

use super::types::SeverityBreakdown;

use crate::error::ConfigError;

pub const SAFE_SUMMARY: &str = "No vulnerabilities found - SAFE ✅";

/// Penalty subtracted from 100 per finding of each severity.
/// `score = clamp(100 - Σ weight × count, 0, 100)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub critical: u32,
    pub high: u32,
    pub medium: u32,
    pub low: u32,
    pub info: u32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            critical: 25,
            high: 15,
            medium: 7,
            low: 3,
            info: 1,
        }
    }
}

impl ScoringWeights {
    /// Every finding must cost at least one point, and a more severe level
    /// may never cost less than a milder one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ordered = [
            ("critical", self.critical),
            ("high", self.high),
            ("medium", self.medium),
            ("low", self.low),
            ("info", self.info),
        ];
        for pair in ordered.windows(2) {
            let ((heavier, hw), (lighter, lw)) = (pair[0], pair[1]);
            if hw < lw {
                return Err(ConfigError::Scoring(format!(
                    "{heavier} weight ({hw}) is below {lighter} weight ({lw})"
                )));
            }
        }
        if self.info == 0 {
            return Err(ConfigError::Scoring("info weight must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn score(&self, counts: &SeverityBreakdown) -> u8 {
        let penalty = [
            (self.critical, counts.critical),
            (self.high, counts.high),
            (self.medium, counts.medium),
            (self.low, counts.low),
            (self.info, counts.info),
        ]
        .iter()
        .fold(0u64, |acc, (weight, count)| {
            acc.saturating_add(u64::from(*weight).saturating_mul(*count as u64))
        });
        100u64.saturating_sub(penalty) as u8
    }
}

/// Human-readable summary chosen by the most severe non-empty level.
pub fn summarize(counts: &SeverityBreakdown, failed_rules: usize) -> String {
    let total = counts.total();
    if total == 0 {
        return if failed_rules == 0 {
            SAFE_SUMMARY.to_string()
        } else {
            format!(
                "No vulnerabilities found - analysis incomplete ({failed_rules} rule(s) failed)"
            )
        };
    }

    if counts.critical > 0 {
        format!(
            "CRITICAL RISK - {total} vulnerabilities found ({} critical, {} high)",
            counts.critical, counts.high
        )
    } else if counts.high > 0 {
        format!(
            "HIGH RISK - {total} vulnerabilities found ({} high)",
            counts.high
        )
    } else if counts.medium > 0 {
        format!("MEDIUM RISK - {total} vulnerabilities found")
    } else {
        format!("LOW RISK - {total} minor issue(s) found")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(
        critical: usize,
        high: usize,
        medium: usize,
        low: usize,
        info: usize,
    ) -> SeverityBreakdown {
        SeverityBreakdown {
            critical,
            high,
            medium,
            low,
            info,
        }
    }

    #[test]
    fn test_no_findings_scores_100() {
        let weights = ScoringWeights::default();
        assert_eq!(weights.score(&SeverityBreakdown::default()), 100);
    }

    #[test]
    fn test_weighted_penalty() {
        let weights = ScoringWeights::default();
        assert_eq!(weights.score(&counts(1, 1, 1, 1, 1)), 100 - 25 - 15 - 7 - 3 - 1);
        assert_eq!(weights.score(&counts(0, 0, 0, 0, 3)), 97);
    }

    #[test]
    fn test_score_clamped_at_zero() {
        let weights = ScoringWeights::default();
        assert_eq!(weights.score(&counts(10, 0, 0, 0, 0)), 0);
        assert_eq!(weights.score(&counts(usize::MAX, usize::MAX, 0, 0, 0)), 0);
    }

    #[test]
    fn test_critical_weighs_more_than_info() {
        let weights = ScoringWeights::default();
        assert!(weights.score(&counts(1, 0, 0, 0, 0)) < weights.score(&counts(0, 0, 0, 0, 1)));
    }

    #[test]
    fn test_default_weights_are_valid() {
        assert!(ScoringWeights::default().validate().is_ok());
        let flat = ScoringWeights {
            critical: 1,
            high: 1,
            medium: 1,
            low: 1,
            info: 1,
        };
        assert!(flat.validate().is_ok());
    }

    #[test]
    fn test_inverted_weights_rejected() {
        let inverted = ScoringWeights {
            critical: 0,
            info: 50,
            ..ScoringWeights::default()
        };
        let err = inverted.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Scoring(_)));
        assert!(err.to_string().contains("below"));

        let free_info = ScoringWeights {
            info: 0,
            ..ScoringWeights::default()
        };
        assert!(matches!(free_info.validate(), Err(ConfigError::Scoring(_))));
    }

    #[test]
    fn test_summary_templates() {
        assert_eq!(summarize(&SeverityBreakdown::default(), 0), SAFE_SUMMARY);
        assert!(summarize(&SeverityBreakdown::default(), 2).contains("analysis incomplete"));
        assert!(summarize(&counts(1, 2, 0, 0, 0), 0).starts_with("CRITICAL RISK - 3"));
        assert!(summarize(&counts(0, 1, 0, 0, 0), 0).starts_with("HIGH RISK"));
        assert!(summarize(&counts(0, 0, 2, 1, 0), 0).starts_with("MEDIUM RISK - 3"));
        assert!(summarize(&counts(0, 0, 0, 0, 1), 0).starts_with("LOW RISK"));
    }
}
