//! Logger set-up for the command-line client.
//!
//! Logs go to `convert-client.log` inside the state directory unless the
//! terminal is requested. Progress bars share the terminal, so file logging
//! is the default.

use std::path::Path;

use converter_engine::ensure_state_dir;
use engine_logging::LogDestination;
use log::LevelFilter;

use crate::cli::LogTarget;

pub const LOG_FILENAME: &str = "convert-client.log";

pub fn initialize(target: LogTarget, verbosity: u8, state_dir: &Path) {
    let destination = destination_for(target, state_dir);
    engine_logging::initialize(destination, level_for(verbosity));
}

fn destination_for(target: LogTarget, state_dir: &Path) -> LogDestination {
    let log_path = state_dir.join(LOG_FILENAME);
    let file_usable = ensure_state_dir(state_dir).is_ok();

    match target {
        LogTarget::Terminal => LogDestination::Terminal,
        LogTarget::File if file_usable => LogDestination::File(log_path),
        LogTarget::Both if file_usable => LogDestination::Both(log_path),
        LogTarget::File | LogTarget::Both => {
            eprintln!(
                "Warning: state directory {:?} is not writable; logging to terminal",
                state_dir
            );
            LogDestination::Terminal
        }
    }
}

fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}
