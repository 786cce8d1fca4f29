//! CLI module for Folio.

pub mod commands;
mod output;
pub mod preflight;
mod startup;

pub use output::Output;
pub use startup::{connect, credentials_for, resolve_pdf_dir, start};

use clap::{Args, Parser, Subcommand};

/// Folio - ask questions about a folder of PDFs
///
/// PDFs are split into overlapping chunks, embedded locally and stored in a
/// Pinecone index; answers are generated by a Gemini model from the most
/// relevant chunks.
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Flags shared by every command that indexes before answering.
#[derive(Args, Debug, Clone, Default)]
pub struct StartupArgs {
    /// Directory of PDF files (overrides general.pdf_dir)
    #[arg(long)]
    pub pdf_dir: Option<String>,

    /// Remove every vector in the namespace before indexing
    #[arg(long)]
    pub reset: bool,

    /// Use the vectors already in the namespace instead of indexing
    #[arg(long, conflicts_with = "reset")]
    pub skip_index: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Index the PDFs, then serve the question page over HTTP
    Serve {
        #[command(flatten)]
        startup: StartupArgs,

        /// Host to bind to (overrides server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Index the PDFs, then answer questions from stdin
    Chat {
        #[command(flatten)]
        startup: StartupArgs,
    },

    /// Index the PDFs, then answer a single question
    Ask {
        /// The question to ask
        question: String,

        #[command(flatten)]
        startup: StartupArgs,
    },

    /// Show the chunks most similar to a query, without generating an answer
    Search {
        /// Search query
        query: String,

        /// Number of chunks to return (overrides rag.top_k)
        #[arg(short = 'k', long, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
        top_k: Option<usize>,
    },

    /// Ingest and index the PDFs, then exit
    Index {
        /// Directory of PDF files (overrides general.pdf_dir)
        #[arg(long)]
        pdf_dir: Option<String>,

        /// Remove every vector in the namespace before indexing
        #[arg(long)]
        reset: bool,
    },

    /// Check credentials, configuration and the remote index
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}
