use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "br-formatter")]
#[command(about = "Convert record fields between storage form and pt-BR display form", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Settings file (database path and per-table classification lists)
    #[arg(short, long, global = true, default_value = br_formatter::config::DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print stored rows in pt-BR display form
    #[command(alias = "p")]
    Present {
        /// Table whose classification applies
        #[arg(short, long)]
        table: String,

        /// JSON array of objects, or CSV with a header line
        input: PathBuf,
    },

    /// Print pt-BR rows in storage form (every field counts as changed)
    #[command(alias = "s")]
    Store {
        /// Table whose classification applies
        #[arg(short, long)]
        table: String,

        /// JSON array of objects, or CSV with a header line
        input: PathBuf,
    },

    /// Convert pt-BR rows to storage form and persist them
    Save {
        /// Table to save into
        #[arg(short, long)]
        table: String,

        /// JSON array of objects, or CSV with a header line
        input: PathBuf,
    },

    /// List persisted rows of a table in pt-BR display form
    #[command(alias = "ls")]
    Show {
        /// Table to list
        #[arg(short, long)]
        table: String,
    },
}
