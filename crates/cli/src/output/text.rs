use anyhow::Result;
use blockscope::finding::Severity;
use blockscope::ScanResult;
use colored::Colorize;

pub fn print(result: &ScanResult, no_color: bool) -> Result<()> {
    if no_color {
        colored::control::set_override(false);
    }

    println!();
    println!("{}", "  blockscope - Solidity Static Analysis".bold());
    println!("  CONTRACT: {}", result.contract_name());
    println!("  Score: {}/100", score_label(result.overall_score()));
    let summary = match result.severity_breakdown().worst() {
        Some(Severity::Critical | Severity::High) => result.summary().red().bold(),
        Some(Severity::Medium) => result.summary().yellow(),
        Some(_) => result.summary().normal(),
        None => result.summary().green(),
    };
    println!("  {summary}");
    println!();

    for finding in result.findings() {
        let severity_label = match finding.severity {
            Severity::Critical => "CRITICAL".magenta().bold(),
            Severity::High => "HIGH".red().bold(),
            Severity::Medium => "MEDIUM".yellow().bold(),
            Severity::Low => "LOW".blue(),
            Severity::Info => "INFO".dimmed(),
        };

        println!("  [{}] {} ({})", severity_label, finding.title, finding.rule_id);
        println!("    {}", finding.description);

        if let Some(line) = finding.line_number {
            println!("    {} line {}", "-->".dimmed(), line);
        }
        if let Some(code) = &finding.code {
            for line in code.lines() {
                println!("    {} {}", "|".dimmed(), line);
            }
        }
        if let Some(rec) = &finding.recommendation {
            println!("    {} {}", "Fix:".green(), rec);
        }
        println!();
    }

    for failure in result.analysis_errors() {
        println!(
            "  {} rule {} did not complete: {}",
            "warning:".yellow(),
            failure.rule_id,
            failure.message
        );
    }

    let breakdown = result.severity_breakdown();
    println!("{}", "  Summary".bold().underline());
    println!("    Critical: {}", breakdown.critical);
    println!("    High:     {}", breakdown.high);
    println!("    Medium:   {}", breakdown.medium);
    println!("    Low:      {}", breakdown.low);
    println!("    Info:     {}", breakdown.info);
    println!("    Total:    {}", result.vulnerabilities_count());
    println!();

    Ok(())
}

fn score_label(score: u8) -> colored::ColoredString {
    let text = score.to_string();
    match score {
        80..=100 => text.green().bold(),
        50..=79 => text.yellow().bold(),
        _ => text.red().bold(),
    }
}
