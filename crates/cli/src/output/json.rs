use anyhow::Result;
use blockscope::ScanResult;

pub fn print(result: &ScanResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}
