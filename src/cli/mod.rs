//! CLI module for the PDF-to-vector pipeline.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

use crate::models::OutputFormat;

/// Extract text from PDFs and load it into a vector index.
#[derive(Debug, Parser)]
#[command(name = "pdf2vec")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[arg(
        long,
        short = 'f',
        global = true,
        help = "Output format: text, json, or markdown"
    )]
    pub format: Option<OutputFormat>,

    #[arg(long, short = 'v', global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Extract cleaned text from every PDF under the input directory
    Extract(commands::ExtractArgs),

    /// Chunk, embed and upload every text file in the output directory
    Embed(commands::EmbedArgs),

    /// Run extract, then embed its output
    Run(commands::RunArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(commands::ConfigCommand),
}
