use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use url::Url;

use crate::cli::Cli;

/// Used when no platform data directory can be determined.
const FALLBACK_STATE_DIR: &str = ".convert-client";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub service_base: Url,
    pub state_dir: PathBuf,
    pub request_timeout: Duration,
}

impl AppConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            service_base: cli.server.clone(),
            state_dir: cli.state_dir.clone().unwrap_or_else(default_state_dir),
            request_timeout: Duration::from_secs(cli.timeout_secs),
        }
    }
}

fn default_state_dir() -> PathBuf {
    ProjectDirs::from("", "", "convert-client")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(FALLBACK_STATE_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn explicit_flags_win() {
        let cli = Cli::try_parse_from([
            "convert-client",
            "--server",
            "http://10.0.0.5:9000/api",
            "--state-dir",
            "/tmp/convert-state",
            "--timeout-secs",
            "5",
            "recent",
        ])
        .unwrap();
        let config = AppConfig::from_cli(&cli);
        assert_eq!(config.service_base.as_str(), "http://10.0.0.5:9000/api");
        assert_eq!(config.state_dir, PathBuf::from("/tmp/convert-state"));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn state_dir_defaults_somewhere() {
        assert!(!default_state_dir().as_os_str().is_empty());
    }
}
