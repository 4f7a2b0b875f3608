//! Command-line interface definitions for pdfxml

use clap::{Parser, Subcommand};
use pdfxml::config::{OutputFormat, CONFIG_FILE_NAME};
use std::path::PathBuf;

/// CLI structure for the pdfxml application
#[derive(Parser)]
#[command(name = "pdfxml")]
#[command(version)]
#[command(about = "Convert extracted PDF text into structured XML", long_about = None)]
pub struct Cli {
    /// Configuration file
    #[arg(short, long, global = true, default_value = CONFIG_FILE_NAME)]
    pub config: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Metadata and page count for plain text inputs
#[derive(clap::Args, Debug, Clone)]
pub struct TextInputArgs {
    /// Page count of plain text inputs
    #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
    pub pages: i64,

    /// Title of plain text inputs
    #[arg(long)]
    pub title: Option<String>,

    /// Author of plain text inputs
    #[arg(long)]
    pub author: Option<String>,

    /// Creation date of plain text inputs
    #[arg(long)]
    pub creation_date: Option<String>,
}

/// Available subcommands for pdfxml
#[derive(Subcommand)]
pub enum Commands {
    /// Convert extraction payloads (.json) or text files (.txt) to structured documents
    Convert {
        /// Input files or directories
        #[arg(value_name = "PATH", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory (defaults to next to each input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Indent XML output for reading
        #[arg(long)]
        indent: bool,

        #[command(flatten)]
        text: TextInputArgs,
    },

    /// Show the page and section structure detected in one input
    Inspect {
        /// Input file
        #[arg(value_name = "PATH")]
        input: PathBuf,

        #[command(flatten)]
        text: TextInputArgs,
    },
}
