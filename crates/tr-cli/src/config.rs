//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use tr_core::{PausePolicy, SummaryStyle};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// How pause annotations are read.
    pub pause_policy: PausePolicy,
    /// Which summary line to print.
    pub summary: SummaryStyle,
    /// Whether each input line is echoed before the summary.
    pub echo: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pause_policy: PausePolicy::default(),
            summary: SummaryStyle::default(),
            echo: true,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    ///
    /// A file passed explicitly must exist; the default location is optional.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            if !path.is_file() {
                return Err(format!("config file not found: {}", path.display()).into());
            }
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (TIMEREPORT_*)
        figment = figment.merge(Env::prefixed("TIMEREPORT_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for timereport.
///
/// On Linux: `~/.config/timereport`
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("timereport"))
}
