//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Decision tree coverage explorer: default inputs, input variations, and active-path render models
#[derive(Parser, Debug)]
#[command(name = "treejack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Config file (default: ./.treejack.toml if present)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract (variable, operator, literal) triples from a condition
    Parse {
        /// Condition expression, e.g. "input.age >= 18 and input.country == 'US'"
        condition: String,
    },

    /// Derive one default input value per variable
    Defaults {
        /// Tree file or example:<name>
        tree: String,
    },

    /// Generate single-variable variations of an assignment
    Variations {
        /// Tree file or example:<name>
        tree: String,
        /// Base assignment (default: derived from the tree)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        inputs: Option<PathBuf>,
    },

    /// Base assignment followed by its variations
    Samples {
        /// Tree file or example:<name>
        tree: String,
        /// Base assignment (default: derived from the tree)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        inputs: Option<PathBuf>,
    },

    /// Show the tree with the active path highlighted
    Render {
        /// Tree file or example:<name>
        tree: String,
        /// Simulation response whose path to highlight
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        result: Option<PathBuf>,
        /// Unreachable-node report to mark
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        unreachable: Option<PathBuf>,
        /// Print the render model as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check root presence, unique ids and depth
    Validate {
        /// Tree file or example:<name>
        tree: String,
    },

    /// Build request bodies for the evaluation service
    Payload {
        #[command(subcommand)]
        command: PayloadCommands,
    },

    /// Write a simulation response pretty-printed to a file
    Export {
        /// Simulation response JSON
        #[arg(value_hint = ValueHint::FilePath)]
        result: PathBuf,
        /// Target file (default: export_file setting)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Browse example trees
    Examples {
        #[command(subcommand)]
        command: ExamplesCommands,
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
pub enum PayloadCommands {
    /// `{tree, input_values}` for path simulation
    Simulate {
        /// Tree file or example:<name>
        tree: String,
        /// Input assignment (default: derived from the tree)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        inputs: Option<PathBuf>,
    },

    /// `{tree, sample_inputs}` for unreachable-node detection
    Unreachable {
        /// Tree file or example:<name>
        tree: String,
        /// Base assignment (default: derived from the tree)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        inputs: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ExamplesCommands {
    /// List example names
    List,

    /// Print an example tree as JSON
    Show {
        /// Example name
        name: String,
    },

    /// Print the sample inputs shipped with an example
    Samples {
        /// Example name
        name: String,
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
