//! Command-line argument structures for fieldhist

use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct AddArgs {
    /// Field tag the value belongs to
    #[arg(short = 't', long)]
    pub tag: String,

    /// Value to remember
    #[arg(value_name = "TEXT")]
    pub text: String,

    /// Timestamp in Unix seconds (optional)
    #[arg(short = 'T', long)]
    pub timestamp: Option<i64>,
}

#[derive(Args)]
pub struct ListArgs {
    /// Field tag to list
    #[arg(short = 't', long)]
    pub tag: String,

    /// Maximum number of values to show
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Show timestamps
    #[arg(short = 'T', long)]
    pub timestamps: bool,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ClearArgs {
    /// Field tag to clear (every tag if omitted)
    #[arg(short = 't', long)]
    pub tag: Option<String>,

    /// Confirm deletion without prompting
    #[arg(short = 'F', long)]
    pub force: bool,
}

#[derive(Args)]
pub struct RemoveArgs {
    /// Field tag the value belongs to
    #[arg(short = 't', long)]
    pub tag: String,

    /// Value to forget
    #[arg(value_name = "TEXT")]
    pub text: String,
}

#[derive(Args)]
pub struct SuggestArgs {
    /// Field tag whose history is merged in
    #[arg(short = 't', long)]
    pub tag: String,

    /// Text typed so far
    #[arg(value_name = "TEXT", default_value = "")]
    pub text: String,

    /// Primary suggestions, one per flag
    #[arg(short = 'i', long = "item")]
    pub items: Vec<String>,

    /// File with one primary suggestion per line
    #[arg(short = 'f', long)]
    pub items_file: Option<PathBuf>,

    /// Override the configured number of history values
    #[arg(short = 'm', long)]
    pub max_history: Option<usize>,
}

#[derive(Args)]
pub struct DemoArgs {
    /// Field tag used by the demo field
    #[arg(short = 't', long, default_value = "country")]
    pub tag: String,

    /// File with one primary suggestion per line (built-in country list if omitted)
    #[arg(short = 'f', long)]
    pub items_file: Option<PathBuf>,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Show current configuration
    #[arg(long)]
    pub show: bool,

    /// Initialize configuration file with defaults
    #[arg(long)]
    pub init: bool,

    /// Validate configuration file
    #[arg(long)]
    pub validate: bool,
}
