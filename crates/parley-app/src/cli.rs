//! CLI argument definitions for the Parley terminal client.
//!
//! Uses `clap` with derive macros. Priority resolution:
//! CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

/// Parley — terminal client for the conversational widget core.
#[derive(Parser, Debug)]
#[command(name = "parley", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Base URL of the answering service.
    #[arg(short = 'u', long = "base-url")]
    pub base_url: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > PARLEY_CONFIG env var > ~/.parley/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("PARLEY_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the log level.
    ///
    /// Priority: --log-level flag > config file value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_level.to_string())
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".parley").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".parley").join("config.toml");
    }
    PathBuf::from("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_config_flag_wins() {
        let args = CliArgs::parse_from(["parley", "--config", "/tmp/custom.toml"]);
        assert_eq!(args.resolve_config_path(), PathBuf::from("/tmp/custom.toml"));
    }

    #[test]
    fn test_log_level_falls_back_to_config() {
        let args = CliArgs::parse_from(["parley"]);
        assert_eq!(args.resolve_log_level("debug"), "debug");

        let args = CliArgs::parse_from(["parley", "--log-level", "trace"]);
        assert_eq!(args.resolve_log_level("debug"), "trace");
    }

    #[test]
    fn test_base_url_flag_parses() {
        let args = CliArgs::parse_from(["parley", "--base-url", "http://10.0.0.2:9000"]);
        assert_eq!(args.base_url.as_deref(), Some("http://10.0.0.2:9000"));
    }
}
