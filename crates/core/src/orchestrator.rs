use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};

use rayon::prelude::*;
use tracing::{debug, trace, warn};

use crate::ast::{parse_source, SourceUnit, SourceVisitor};
use crate::config::{Config, InlineSuppressions};
use crate::error::{ConfigError, RuleError};
use crate::finding::{Finding, Severity};
use crate::report::{RuleFailure, ScanRequest, ScanResult, ScoringWeights};
use crate::rule::{AnalysisContext, Rule, RuleRegistry};

/// Runs every registered rule over a request's source and aggregates the
/// findings into a scored [`ScanResult`]. `analyze` never fails: parser and
/// rule faults are contained and reported in `analysis_errors`.
pub struct AnalysisOrchestrator {
    registry: RuleRegistry,
    weights: ScoringWeights,
    severity_overrides: HashMap<String, Severity>,
    parallel: bool,
}

impl AnalysisOrchestrator {
    pub fn new(registry: RuleRegistry) -> Self {
        Self {
            registry,
            weights: ScoringWeights::default(),
            severity_overrides: HashMap::new(),
            parallel: true,
        }
    }

    /// Build from project config: drops disabled rules and applies
    /// scoring weights and severity overrides.
    pub fn from_config(
        mut registry: RuleRegistry,
        config: &Config,
    ) -> Result<Self, ConfigError> {
        config.scoring.validate()?;
        registry.retain(|rule| config.is_rule_enabled(rule.id()));
        Ok(Self::new(registry)
            .with_scoring(config.scoring)
            .with_severity_overrides(config.severity_overrides()?)
            .with_parallel(config.global.parallel))
    }

    pub fn with_scoring(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_severity_overrides(mut self, overrides: HashMap<String, Severity>) -> Self {
        self.severity_overrides = overrides;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn analyze(&self, request: &ScanRequest) -> ScanResult {
        let mut failures = Vec::new();

        let unit = match parse_source(&request.source_code) {
            Ok(tree) => SourceVisitor::extract(&request.source_code, &tree),
            Err(e) => {
                warn!(
                    contract = %request.contract_name,
                    error = %e,
                    "parse failed, running rules on empty model"
                );
                failures.push(RuleFailure {
                    rule_id: "parser".to_string(),
                    message: e.to_string(),
                });
                SourceUnit::new()
            }
        };
        if unit.has_syntax_errors {
            debug!(contract = %request.contract_name, "source contains syntax errors");
        }

        let ctx = AnalysisContext::new(&request.contract_name, &request.source_code, &unit);
        let outcomes = self.run_rules(&ctx);

        let mut findings = Vec::new();
        for (rule, outcome) in self.registry.all().iter().zip(outcomes) {
            match outcome {
                Ok(rule_findings) => findings.extend(rule_findings),
                Err(e) => {
                    warn!(rule = rule.id(), error = %e, "rule failed, skipping");
                    failures.push(RuleFailure {
                        rule_id: rule.id().to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }

        for finding in &mut findings {
            if let Some(severity) = self.severity_overrides.get(&finding.rule_id) {
                finding.severity = *severity;
            }
        }
        let findings = InlineSuppressions::parse(&request.source_code).filter(findings);
        for finding in &findings {
            trace!(%finding, "finding");
        }

        debug!(
            contract = %request.contract_name,
            rules = self.registry.len(),
            findings = findings.len(),
            "scan complete"
        );
        ScanResult::from_findings(request, findings, failures, &self.weights)
    }

    /// One outcome per rule, in registration order regardless of parallelism
    fn run_rules(&self, ctx: &AnalysisContext) -> Vec<Result<Vec<Finding>, RuleError>> {
        let rules = self.registry.all();
        if self.parallel {
            rules
                .par_iter()
                .map(|rule| evaluate_rule(rule.as_ref(), ctx))
                .collect()
        } else {
            rules
                .iter()
                .map(|rule| evaluate_rule(rule.as_ref(), ctx))
                .collect()
        }
    }
}

/// Evaluate one rule, converting a panic into a `RuleError`
fn evaluate_rule(rule: &dyn Rule, ctx: &AnalysisContext) -> Result<Vec<Finding>, RuleError> {
    match catch_unwind(AssertUnwindSafe(|| rule.evaluate(ctx))) {
        Ok(outcome) => outcome,
        Err(_) => Err(RuleError::Panicked(rule.id().to_string())),
    }
}
