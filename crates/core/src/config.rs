use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::finding::{Finding, Severity};
use crate::report::ScoringWeights;

/// Project-level configuration loaded from `.blockscope.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub global: GlobalConfig,
    pub rules: HashMap<String, RuleConfig>,
    pub scoring: ScoringWeights,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    pub output_format: String,
    pub parallel: bool,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            output_format: "text".to_string(),
            parallel: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    pub enabled: Option<bool>,
    pub severity: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub scan_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8000".to_string(),
            scan_timeout_secs: 30,
        }
    }
}

impl Config {
    /// Load config from a TOML file path. Returns default config if file doesn't exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: Config = toml::from_str(&content)?;
        config.scoring.validate()?;
        Ok(config)
    }

    /// Check if a rule is enabled according to config.
    pub fn is_rule_enabled(&self, id: &str) -> bool {
        self.rules.get(id).and_then(|r| r.enabled).unwrap_or(true)
    }

    /// Per-rule severity overrides, validated.
    pub fn severity_overrides(&self) -> Result<HashMap<String, Severity>, ConfigError> {
        self.rules
            .iter()
            .filter_map(|(id, rule)| rule.severity.as_ref().map(|s| (id, s)))
            .map(|(id, value)| {
                value
                    .parse::<Severity>()
                    .map(|severity| (id.clone(), severity))
                    .map_err(|_| ConfigError::Severity {
                        rule: id.clone(),
                        value: value.clone(),
                    })
            })
            .collect()
    }

    /// Generate default config file content.
    pub fn default_toml() -> &'static str {
        r#"# blockscope configuration

[global]
# Output format: "text", "json", "sarif"
output_format = "text"
# Evaluate rules in parallel
parallel = true

# Per-rule overrides
# [rules.floating-pragma]
# enabled = false

# [rules.timestamp-dependence]
# severity = "info"

# Penalty per finding, subtracted from a score of 100
[scoring]
critical = 25
high = 15
medium = 7
low = 3
info = 1

[server]
bind = "0.0.0.0:8000"
scan_timeout_secs = 30
"#
    }
}

const IGNORE_MARKER: &str = "blockscope-ignore";

/// `// blockscope-ignore[: id, id]` comments keyed by the 1-based line they
/// silence, which is the line after the comment. An empty id list silences
/// every rule on that line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineSuppressions {
    by_line: HashMap<usize, Vec<String>>,
}

impl InlineSuppressions {
    pub fn parse(source: &str) -> Self {
        let by_line = source
            .lines()
            .zip(2..)
            .filter_map(|(text, target)| ignored_rules(text).map(|ids| (target, ids)))
            .collect();
        Self { by_line }
    }

    pub fn is_empty(&self) -> bool {
        self.by_line.is_empty()
    }

    pub fn silences(&self, finding: &Finding) -> bool {
        let Some(ids) = finding.line_number.and_then(|l| self.by_line.get(&l)) else {
            return false;
        };
        ids.is_empty() || ids.iter().any(|id| *id == finding.rule_id)
    }

    pub fn filter(&self, findings: Vec<Finding>) -> Vec<Finding> {
        if self.is_empty() {
            return findings;
        }
        findings.into_iter().filter(|f| !self.silences(f)).collect()
    }
}

fn ignored_rules(line: &str) -> Option<Vec<String>> {
    let rest = line
        .trim()
        .strip_prefix("//")?
        .trim_start()
        .strip_prefix(IGNORE_MARKER)?
        .trim();
    if rest.is_empty() {
        return Some(Vec::new());
    }
    let ids = rest.strip_prefix(':')?;
    Some(
        ids.split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_owned)
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finding::Confidence;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.global.output_format, "text");
        assert!(config.is_rule_enabled("any-rule"));
        assert_eq!(config.scoring, ScoringWeights::default());
        assert_eq!(config.server.scan_timeout_secs, 30);
    }

    #[test]
    fn test_default_toml_parses() {
        let config: Config = toml::from_str(Config::default_toml()).unwrap();
        assert_eq!(config.scoring, ScoringWeights::default());
        assert!(config.global.parallel);
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[rules.floating-pragma]
enabled = false

[rules.timestamp-dependence]
severity = "info"

[scoring]
critical = 40
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert!(!config.is_rule_enabled("floating-pragma"));
        assert!(config.is_rule_enabled("reentrancy"));
        assert_eq!(config.scoring.critical, 40);
        assert_eq!(config.scoring.high, 15);
        let overrides = config.severity_overrides().unwrap();
        assert_eq!(overrides["timestamp-dependence"], Severity::Info);
    }

    #[test]
    fn test_invalid_severity_override() {
        let config: Config = toml::from_str("[rules.x]\nseverity = \"extreme\"\n").unwrap();
        assert!(matches!(
            config.severity_overrides(),
            Err(ConfigError::Severity { .. })
        ));
    }

    #[test]
    fn test_load_rejects_inverted_scoring() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(".blockscope.toml");
        std::fs::write(&path, "[scoring]\ncritical = 0\ninfo = 50\n").unwrap();
        assert!(matches!(Config::load(&path), Err(ConfigError::Scoring(_))));
    }

    #[test]
    fn test_missing_file_is_default() {
        let config = Config::load(Path::new("/nonexistent/.blockscope.toml")).unwrap();
        assert!(config.rules.is_empty());
    }

    #[test]
    fn test_inline_suppression_targets_next_line() {
        let source = "// blockscope-ignore: tx-origin-auth\nrequire(tx.origin == owner);\n// blockscope-ignore\nnow;\n// blockscope-ignored\n";
        let inline = InlineSuppressions::parse(source);
        let at = |id: &str, line| {
            Finding::new(id, Severity::High, Confidence::High, "t", "d").at_line(line)
        };
        assert!(inline.silences(&at("tx-origin-auth", 2)));
        assert!(!inline.silences(&at("reentrancy", 2)));
        assert!(inline.silences(&at("reentrancy", 4)));
        assert!(!inline.silences(&at("tx-origin-auth", 1)));
        assert!(!inline.silences(&at("reentrancy", 6)));
    }

    #[test]
    fn test_filter_keeps_unlocated_findings() {
        let inline = InlineSuppressions::parse("a\n    // blockscope-ignore: tx-origin-auth\nb\n");
        let findings = vec![
            Finding::new("tx-origin-auth", Severity::High, Confidence::High, "a", "a").at_line(3),
            Finding::new("reentrancy", Severity::Critical, Confidence::Medium, "b", "b").at_line(3),
            Finding::new("floating-pragma", Severity::Info, Confidence::High, "c", "c"),
        ];

        let kept = inline.filter(findings);
        let ids: Vec<&str> = kept.iter().map(|f| f.rule_id.as_str()).collect();
        assert_eq!(ids, vec!["reentrancy", "floating-pragma"]);
    }
}
