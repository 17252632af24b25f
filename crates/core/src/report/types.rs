use std::path::Path;

use serde::{Deserialize, Serialize};

use super::scoring::{summarize, ScoringWeights, SAFE_SUMMARY};
use crate::ast::{parse_source, ContractKind, SourceVisitor};
use crate::finding::{Finding, Severity};

/// Input to a single scan. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRequest {
    pub source_code: String,
    pub contract_name: String,
}

impl ScanRequest {
    pub fn new(source_code: impl Into<String>, contract_name: impl Into<String>) -> Self {
        Self {
            source_code: source_code.into(),
            contract_name: contract_name.into(),
        }
    }

    /// Build a request whose contract name is the file stem (`Token.sol` -> `Token`)
    pub fn from_file(path: &Path, source_code: impl Into<String>) -> Self {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_CONTRACT_NAME.to_string());
        Self::new(source_code, name)
    }

    /// Name resolution for uploads: explicit name, then the file stem, then
    /// the first contract declared in the source, then [`DEFAULT_CONTRACT_NAME`].
    pub fn resolve(
        source_code: impl Into<String>,
        contract_name: Option<String>,
        file_name: Option<&str>,
    ) -> Self {
        let source_code = source_code.into();
        let name = contract_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .or_else(|| {
                file_name
                    .and_then(|f| Path::new(f).file_stem())
                    .map(|s| s.to_string_lossy().into_owned())
                    .filter(|s| !s.is_empty())
            })
            .or_else(|| declared_contract_name(&source_code))
            .unwrap_or_else(|| DEFAULT_CONTRACT_NAME.to_string());
        Self::new(source_code, name)
    }
}

/// First `contract` declared in the source, else the first interface or library
fn declared_contract_name(source: &str) -> Option<String> {
    let tree = parse_source(source).ok()?;
    let unit = SourceVisitor::extract(source, &tree);
    unit.contracts
        .iter()
        .find(|c| c.kind == ContractKind::Contract)
        .or_else(|| unit.contracts.first())
        .map(|c| c.name.clone())
}

/// Name used when neither a name nor a file name is available
pub const DEFAULT_CONTRACT_NAME: &str = "Contract";

/// Count of findings per severity level. All five levels are always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityBreakdown {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub info: usize,
}

impl SeverityBreakdown {
    pub fn from_findings(findings: &[Finding]) -> Self {
        let mut counts = Self::default();
        for finding in findings {
            *counts.slot(finding.severity) += 1;
        }
        counts
    }

    pub fn count(&self, severity: Severity) -> usize {
        match severity {
            Severity::Critical => self.critical,
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
            Severity::Info => self.info,
        }
    }

    pub fn total(&self) -> usize {
        self.critical + self.high + self.medium + self.low + self.info
    }

    /// Most severe level with a non-zero count
    pub fn worst(&self) -> Option<Severity> {
        Severity::ALL.into_iter().find(|s| self.count(*s) > 0)
    }

    fn slot(&mut self, severity: Severity) -> &mut usize {
        match severity {
            Severity::Critical => &mut self.critical,
            Severity::High => &mut self.high,
            Severity::Medium => &mut self.medium,
            Severity::Low => &mut self.low,
            Severity::Info => &mut self.info,
        }
    }
}

/// A rule (or the parser) that could not complete during a scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleFailure {
    pub rule_id: String,
    pub message: String,
}

/// Output of a scan. Fields are private so the count/breakdown/score
/// invariants hold for every constructed value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    contract_name: String,
    source_code: String,
    findings: Vec<Finding>,
    vulnerabilities_count: usize,
    severity_breakdown: SeverityBreakdown,
    overall_score: u8,
    summary: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    analysis_errors: Vec<RuleFailure>,
}

impl ScanResult {
    pub fn from_findings(
        request: &ScanRequest,
        findings: Vec<Finding>,
        failures: Vec<RuleFailure>,
        weights: &ScoringWeights,
    ) -> Self {
        let severity_breakdown = SeverityBreakdown::from_findings(&findings);
        let overall_score = weights.score(&severity_breakdown);
        let summary = summarize(&severity_breakdown, failures.len());
        Self {
            contract_name: request.contract_name.clone(),
            source_code: request.source_code.clone(),
            vulnerabilities_count: findings.len(),
            findings,
            severity_breakdown,
            overall_score,
            summary,
            analysis_errors: failures,
        }
    }

    /// Fail-open result: maximal score, no findings
    pub fn safe_default(request: &ScanRequest) -> Self {
        Self {
            contract_name: request.contract_name.clone(),
            source_code: request.source_code.clone(),
            findings: Vec::new(),
            vulnerabilities_count: 0,
            severity_breakdown: SeverityBreakdown::default(),
            overall_score: 100,
            summary: SAFE_SUMMARY.to_string(),
            analysis_errors: Vec::new(),
        }
    }

    pub fn contract_name(&self) -> &str {
        &self.contract_name
    }

    pub fn source_code(&self) -> &str {
        &self.source_code
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn vulnerabilities_count(&self) -> usize {
        self.vulnerabilities_count
    }

    pub fn severity_breakdown(&self) -> &SeverityBreakdown {
        &self.severity_breakdown
    }

    pub fn overall_score(&self) -> u8 {
        self.overall_score
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn analysis_errors(&self) -> &[RuleFailure] {
        &self.analysis_errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finding::Confidence;

    fn finding(severity: Severity) -> Finding {
        Finding::new("r", severity, Confidence::High, "t", "d")
    }

    #[test]
    fn test_request_from_file() {
        let req = ScanRequest::from_file(Path::new("contracts/Token.sol"), "contract Token {}");
        assert_eq!(req.contract_name, "Token");
        let req = ScanRequest::from_file(Path::new(""), "");
        assert_eq!(req.contract_name, DEFAULT_CONTRACT_NAME);
    }

    #[test]
    fn test_resolve_contract_name() {
        let source = "interface IVault {}\ncontract Vault {}\n";
        let named = ScanRequest::resolve(source, Some("Custom".to_string()), Some("Up.sol"));
        assert_eq!(named.contract_name, "Custom");
        let from_file = ScanRequest::resolve(source, Some("  ".to_string()), Some("Up.sol"));
        assert_eq!(from_file.contract_name, "Up");
        let declared = ScanRequest::resolve(source, None, None);
        assert_eq!(declared.contract_name, "Vault");
        let fallback = ScanRequest::resolve("", None, None);
        assert_eq!(fallback.contract_name, DEFAULT_CONTRACT_NAME);
    }

    #[test]
    fn test_breakdown_counts_every_level() {
        let findings = vec![
            finding(Severity::High),
            finding(Severity::High),
            finding(Severity::Info),
        ];
        let counts = SeverityBreakdown::from_findings(&findings);
        assert_eq!(counts.high, 2);
        assert_eq!(counts.info, 1);
        assert_eq!(counts.critical, 0);
        assert_eq!(counts.total(), 3);
        assert_eq!(counts.worst(), Some(Severity::High));
    }

    #[test]
    fn test_breakdown_serializes_all_levels() {
        let json = serde_json::to_value(SeverityBreakdown::default()).unwrap();
        for key in ["critical", "high", "medium", "low", "info"] {
            assert_eq!(json[key], 0, "missing {key}");
        }
    }

    #[test]
    fn test_result_invariants() {
        let req = ScanRequest::new("contract A {}", "A");
        let findings = vec![finding(Severity::Critical), finding(Severity::Low)];
        let result = ScanResult::from_findings(&req, findings, vec![], &ScoringWeights::default());
        assert_eq!(result.vulnerabilities_count(), result.findings().len());
        assert_eq!(result.severity_breakdown().total(), 2);
        assert!(result.overall_score() < 100);
    }

    #[test]
    fn test_safe_default() {
        let req = ScanRequest::new("contract A {}", "A");
        let result = ScanResult::safe_default(&req);
        assert_eq!(result.overall_score(), 100);
        assert!(result.findings().is_empty());
        assert!(result.summary().starts_with("No vulnerabilities found"));
    }

    #[test]
    fn test_json_shape() {
        let req = ScanRequest::new("contract A {}", "A");
        let json = serde_json::to_value(ScanResult::safe_default(&req)).unwrap();
        assert_eq!(json["contract_name"], "A");
        assert_eq!(json["overall_score"], 100);
        assert_eq!(json["vulnerabilities_count"], 0);
        assert!(json.get("analysis_errors").is_none());
    }
}
