//! Root CLI structure for souls-rs

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "souls-rs")]
#[command(about = "Command-line tools for FromSoftware archive, model and texture files", long_about = None)]
#[command(version)]
#[command(author)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Identify files by their contents
    Sniff {
        /// Files to identify
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Unwrap compression and archives and list every asset inside
        #[arg(short, long)]
        deep: bool,
    },

    /// DCX and DCP compression operations
    Dcx {
        #[command(subcommand)]
        command: crate::commands::dcx::DcxCommands,
    },

    /// BND4 archive operations
    Bnd {
        #[command(subcommand)]
        command: crate::commands::bnd::BndCommands,
    },

    /// FLVER model operations
    Flver {
        #[command(subcommand)]
        command: crate::commands::flver::FlverCommands,
    },

    /// TPF texture operations
    Tpf {
        #[command(subcommand)]
        command: crate::commands::tpf::TpfCommands,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
