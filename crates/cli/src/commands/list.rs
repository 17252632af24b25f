use anyhow::Result;

pub fn run() -> Result<()> {
    let rules = blockscope_rules::all_rules();

    println!(
        "{:<28} {:<10} {:<12} Description",
        "Id", "Severity", "Confidence"
    );
    println!("{}", "-".repeat(100));

    for rule in &rules {
        println!(
            "{:<28} {:<10} {:<12} {}",
            rule.id(),
            rule.severity().to_string(),
            rule.confidence().to_string(),
            rule.description()
        );
    }

    println!("\nTotal: {} rules", rules.len());
    Ok(())
}
