use blockscope::finding::{Confidence, Finding, Severity};
use blockscope::report::{summarize, ScanRequest, ScanResult, ScoringWeights, SeverityBreakdown};
use proptest::prelude::*;

fn severity() -> impl Strategy<Value = Severity> {
    prop::sample::select(Severity::ALL.to_vec())
}

fn findings(max: usize) -> impl Strategy<Value = Vec<Finding>> {
    prop::collection::vec(severity(), 0..max).prop_map(|severities| {
        severities
            .into_iter()
            .enumerate()
            .map(|(i, s)| Finding::new("r", s, Confidence::High, format!("f{i}"), "").at_line(i + 1))
            .collect()
    })
}

proptest! {
    #[test]
    fn score_stays_in_range(findings in findings(40)) {
        let request = ScanRequest::new("contract A {}", "A");
        let result = ScanResult::from_findings(&request, findings, Vec::new(), &ScoringWeights::default());
        prop_assert!(result.overall_score() <= 100);
    }

    #[test]
    fn count_matches_breakdown(findings in findings(40)) {
        let request = ScanRequest::new("contract A {}", "A");
        let total = findings.len();
        let result = ScanResult::from_findings(&request, findings, Vec::new(), &ScoringWeights::default());
        prop_assert_eq!(result.vulnerabilities_count(), total);
        prop_assert_eq!(result.severity_breakdown().total(), total);
    }

    #[test]
    fn adding_a_finding_never_raises_score(findings in findings(20), extra in severity()) {
        let weights = ScoringWeights::default();
        let before = SeverityBreakdown::from_findings(&findings);
        let mut more = findings.clone();
        more.push(Finding::new("r", extra, Confidence::Low, "extra", ""));
        let after = SeverityBreakdown::from_findings(&more);
        prop_assert!(weights.score(&after) <= weights.score(&before));
    }

    #[test]
    fn summary_is_safe_only_without_findings(findings in findings(10)) {
        let counts = SeverityBreakdown::from_findings(&findings);
        let summary = summarize(&counts, 0);
        prop_assert_eq!(summary.starts_with("No vulnerabilities found"), findings.is_empty());
    }
}
