use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "plotexport",
    version,
    about = "Batch export of plot collections to Vega-Lite documents and data files"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write one Vega-Lite document holding every plot of a manifest
    Vega {
        #[arg(long)]
        manifest: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// Export options file (.json or .toml)
        #[arg(long)]
        options: Option<PathBuf>,
        /// none, inline, in-file or separate-file
        #[arg(long)]
        data_mode: Option<String>,
        #[arg(long)]
        indent: Option<usize>,
        /// Write compact JSON
        #[arg(long, conflicts_with = "indent")]
        compact: bool,
        #[arg(long)]
        include_hidden: bool,
        #[arg(long)]
        overwrite: bool,
    },
    /// Export the manifest's source table, or every plot table with --per-plot
    Data {
        #[arg(long)]
        manifest: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value = "csv")]
        format: String,
        /// File name without extension
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        per_plot: bool,
        #[arg(long)]
        no_index: bool,
        #[arg(long)]
        overwrite: bool,
    },
    /// List the data-export modes a target accepts
    Modes { target: String },
    /// Rebuild plot configurations from a Vega-Lite document
    Inspect {
        document: PathBuf,
        #[arg(long)]
        manifest: PathBuf,
    },
}
