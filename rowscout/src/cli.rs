use clap::{Parser, Subcommand};

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "rowscout")]
#[command(version, about = "Compile query builder filters into SQL", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Compile a JSON query request into a SELECT statement
    Compile {
        /// Request file (reads stdin when omitted)
        file: Option<PathBuf>,

        /// Drop rules the query builder would not submit before compiling
        #[arg(long)]
        prune: bool,
    },
    /// Turn catalog rows for a table into filterable field descriptors
    Fields {
        /// Table the columns belong to
        #[arg(long, short)]
        table: String,

        /// Catalog rows file (reads stdin when omitted)
        file: Option<PathBuf>,
    },
}
