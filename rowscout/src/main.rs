//! `rowscout`: compile query builder requests into SQL from the command line.

mod cli;
mod config;

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use rowscout_sql::{ColumnInfo, QueryRequest, field_descriptors, fields_to_json};
use tracing::debug;

use cli::{Cli, Commands};
use config::Config;

const ENV_LOG: &str = "ROWSCOUT_LOG";

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Compile { file, prune } => {
            let compiler = config.compiler()?;
            let input = read_input(file.as_deref())?;
            let mut request = QueryRequest::parse(&input).context("Invalid query request")?;
            if prune {
                request.query.prune();
            }
            let sql = compiler
                .compile(&request)
                .context("Query could not be compiled")?;
            println!("{sql}");
        },
        Commands::Fields { table, file } => {
            let input = read_input(file.as_deref())?;
            let columns = ColumnInfo::parse_catalog(&input).context("Invalid catalog rows")?;
            debug!(table = %table, columns = columns.len(), "building field descriptors");
            println!("{}", fields_to_json(&field_descriptors(&table, &columns)));
        },
    }
    Ok(())
}

fn init_logging() {
    let filter = std::env::var(ENV_LOG)
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "warn".to_string());

    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .with_env_filter(filter)
        .init();
}

/// Read a whole file, or stdin when no path is given.
fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        },
    }
}
