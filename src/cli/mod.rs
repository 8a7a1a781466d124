use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;
pub mod ui;

#[derive(Parser)]
#[command(
    name = "ltlgen",
    about = "Extract protocol requirements from RFC text and formalize them as LTL properties",
    version,
    author,
    long_about = None
)]
pub struct LtlGenCli {
    /// Sets the log level (error, warn, info, debug, trace)
    #[arg(short, long, global = true, default_value = "info")]
    pub log_level: String,

    /// Path to a YAML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the persisted tables
    #[arg(short, long, global = true, default_value = "data")]
    pub data_dir: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full pipeline on an RFC document with interactive review
    Run {
        /// Path to the RFC text file
        #[arg(short, long)]
        input: PathBuf,

        /// Reviewer name recorded on approvals
        #[arg(long, default_value = "User")]
        approver: String,

        /// Interactive mode (review, edit and approve at each stage)
        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        interactive: bool,
    },

    /// Parse a document and show its property-rich sections
    Extract {
        /// Path to the RFC text file
        #[arg(short, long)]
        input: PathBuf,

        /// Print full section content instead of summary lines
        #[arg(long)]
        content: bool,
    },

    /// Recompute and display the complete formalization table
    View,

    /// Export a table as delimited text
    Export {
        /// Table to export (properties, propositions, formulas, complete)
        #[arg(short, long)]
        table: String,

        /// Output file; prints to stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show row counts for the persisted tables
    Stats,
}
