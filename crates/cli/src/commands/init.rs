use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::Path;

use anyhow::{Context, Result};
use blockscope::config::Config;

const CONFIG_FILE: &str = ".blockscope.toml";

/// Write the default config, leaving an existing file untouched
pub fn run() -> Result<()> {
    let path = Path::new(CONFIG_FILE);
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            eprintln!("{CONFIG_FILE} already exists, not overwriting");
            return Ok(());
        }
        Err(e) => return Err(e).with_context(|| format!("failed to create {CONFIG_FILE}")),
    };
    file.write_all(Config::default_toml().as_bytes())?;
    println!("Created {CONFIG_FILE}");
    Ok(())
}
