//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

use crate::layout::LayoutDomain;

/// Weighted radial partition layout: sunburst arcs from labeled, weighted trees
#[derive(Parser, Debug)]
#[command(name = "sunburst")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Turn debugging information on (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file layered over the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Lay out a tree document and print its segments
    Layout {
        /// Tree document (TOML)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,

        /// Set a weight after the first layout, e.g. --set A/B=2.5
        #[arg(long = "set", value_name = "PATH=WEIGHT")]
        set: Vec<String>,

        /// Add to a weight after the first layout, e.g. --add A/B=-1
        #[arg(long = "add", value_name = "PATH=DELTA", allow_hyphen_values = true)]
        add: Vec<String>,

        /// Allocation axis (overrides config)
        #[arg(long)]
        domain: Option<LayoutDomain>,

        /// Gap between non-zero siblings (overrides config)
        #[arg(long)]
        skip_length: Option<f64>,

        /// Also print ring anchors and icon slots
        #[arg(long)]
        geometry: bool,

        /// Square viewport side for the geometry (implies --geometry);
        /// defaults to the side the rings prefer at view.layer_height
        #[arg(long, value_name = "PIXELS")]
        viewport: Option<f64>,
    },

    /// Show a tree document as a tree
    Tree {
        /// Tree document (TOML)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Print config template
    Template,

    /// Show config paths
    Path,
}
