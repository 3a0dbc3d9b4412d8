use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use converter_core::SortOrder;
use url::Url;

pub const DEFAULT_SERVER: &str = "http://127.0.0.1:8000";

#[derive(Debug, Parser)]
#[command(
    name = "convert-client",
    version,
    about = "Convert Excel data dictionaries to JSON through the conversion service"
)]
pub struct Cli {
    /// Base URL of the conversion service.
    #[arg(long, env = "CONVERTER_SERVER_URL", default_value = DEFAULT_SERVER, global = true)]
    pub server: Url,

    /// Directory holding local history, preferences and the log file.
    #[arg(long, env = "CONVERTER_STATE_DIR", global = true)]
    pub state_dir: Option<PathBuf>,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 30, global = true)]
    pub timeout_secs: u64,

    /// Where log records go.
    #[arg(long, value_enum, default_value_t = LogTarget::File, global = true)]
    pub log: LogTarget,

    /// Raise log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Upload a .xlsx file and wait for the converted JSON.
    Convert {
        file: PathBuf,
        /// Retry a failed conversion up to this many times.
        #[arg(long, default_value_t = 0)]
        retries: u32,
        /// Show a preview of the file once the conversion has finished.
        #[arg(long)]
        preview: bool,
    },
    /// Show the sheets of a local workbook or of a past run.
    Preview {
        #[arg(required_unless_present = "history", conflicts_with = "history")]
        file: Option<PathBuf>,
        /// Id of a run from the service history.
        #[arg(long)]
        history: Option<String>,
        /// Zero-based sheet to display.
        #[arg(long, default_value_t = 0)]
        sheet: usize,
    },
    /// List the service's conversion history.
    History {
        /// Case-insensitive filter on the file name.
        #[arg(long, default_value = "")]
        search: String,
        /// `newest` or `oldest` first.
        #[arg(long, default_value = "newest")]
        order: SortOrder,
    },
    /// List the most recent local conversions.
    Recent,
    /// Show or change the colour theme.
    Theme {
        #[arg(value_enum)]
        choice: Option<ThemeChoice>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    File,
    Terminal,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeChoice {
    Dark,
    Light,
    Toggle,
}
