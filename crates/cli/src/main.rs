mod commands;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "blockscope")]
#[command(about = "Static analysis for Solidity smart contracts")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a Solidity file for vulnerabilities
    Scan {
        /// Path to a .sol file
        file: PathBuf,

        /// Output format (default: `global.output_format` from config, else text)
        #[arg(short, long)]
        output: Option<OutputFormat>,

        /// Path to config file (default: .blockscope.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Evaluate rules one at a time
        #[arg(long)]
        sequential: bool,
    },
    /// List all built-in rules
    List,
    /// Generate a default .blockscope.toml config file
    Init,
}

#[derive(ValueEnum, Clone, Copy)]
enum OutputFormat {
    Text,
    Json,
    Sarif,
}

fn main() -> anyhow::Result<()> {
    // stdout carries reports, logs go to stderr
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            file,
            output,
            config,
            no_color,
            sequential,
        } => commands::scan::run(&file, output, config, no_color, sequential),
        Commands::List => commands::list::run(),
        Commands::Init => commands::init::run(),
    }
}
