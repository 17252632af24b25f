use std::collections::HashSet;
use std::path::Path;

use anyhow::Result;
use blockscope::finding::Severity;
use blockscope::ScanResult;
use serde_json::json;

/// Print SARIF 2.1.0 output for GitHub Code Scanning integration
pub fn print(result: &ScanResult, file: &Path) -> Result<()> {
    let all_rules = blockscope_rules::all_rules();
    let uri = file.display().to_string();

    // one descriptor per rule that produced findings, in first-seen order
    let mut seen = HashSet::new();
    let rules: Vec<serde_json::Value> = result
        .findings()
        .iter()
        .filter(|f| seen.insert(f.rule_id.as_str()))
        .map(|f| {
            let rule = all_rules.iter().find(|r| r.id() == f.rule_id);
            json!({
                "id": f.rule_id,
                "name": rule.map_or(f.rule_id.as_str(), |r| r.title()),
                "shortDescription": {
                    "text": rule.map_or(f.title.as_str(), |r| r.description())
                },
                "defaultConfiguration": {
                    "level": severity_to_sarif_level(rule.map_or(f.severity, |r| r.severity()))
                }
            })
        })
        .collect();

    let results: Vec<serde_json::Value> = result
        .findings()
        .iter()
        .map(|f| {
            let mut entry = json!({
                "ruleId": f.rule_id,
                "level": severity_to_sarif_level(f.severity),
                "message": {
                    "text": format!("{}: {}", f.title, f.description)
                },
                "locations": [{
                    "physicalLocation": {
                        "artifactLocation": {
                            "uri": uri
                        },
                        "region": {
                            "startLine": f.line_number.unwrap_or(1)
                        }
                    }
                }]
            });
            if let Some(code) = &f.code {
                entry["locations"][0]["physicalLocation"]["region"]["snippet"] =
                    json!({ "text": code });
            }
            entry
        })
        .collect();

    let sarif = json!({
        "$schema": "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/main/sarif-2.1/schema/sarif-schema-2.1.0.json",
        "version": "2.1.0",
        "runs": [{
            "tool": {
                "driver": {
                    "name": "blockscope",
                    "version": env!("CARGO_PKG_VERSION"),
                    "informationUri": "https://github.com/blockscope/blockscope",
                    "rules": rules
                }
            },
            "results": results,
            "properties": {
                "contractName": result.contract_name(),
                "overallScore": result.overall_score()
            }
        }]
    });

    let json = serde_json::to_string_pretty(&sarif)?;
    println!("{json}");
    Ok(())
}

fn severity_to_sarif_level(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical | Severity::High => "error",
        Severity::Medium => "warning",
        Severity::Low | Severity::Info => "note",
    }
}
