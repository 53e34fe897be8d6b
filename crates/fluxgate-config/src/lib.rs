//! Shared configuration for fluxgate tools.
//!
//! Profiles live in a single TOML file, merged with `FLUXGATE_*`
//! environment variables via figment. A profile names the panel URL and
//! (optionally) the API token; the token can instead come from the
//! `FLUXGATE_TOKEN` environment variable so it never has to touch disk.
//!
//! ```toml
//! default_profile = "main"
//!
//! [defaults]
//! range = "24h"
//! locale = "latin"
//! utc_offset_minutes = 0
//!
//! [profiles.main]
//! panel = "https://panel.example.com"
//! token = "..."
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Toml};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use fluxgate_core::{LabelLocale, Shortcut};

/// Environment variable consulted when a profile has no stored token.
pub const TOKEN_ENV: &str = "FLUXGATE_TOKEN";

// ── Errors ──────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("profile '{name}' not found (available: {available})")]
    ProfileNotFound { name: String, available: String },

    #[error("profile '{profile}' has no token; set one in the config or via {TOKEN_ENV}")]
    MissingToken { profile: String },

    #[error("profile '{profile}' has an invalid panel URL: {url}")]
    InvalidPanelUrl { profile: String, url: String },
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Load(Box::new(err))
    }
}

// ── Types ───────────────────────────────────────────────────────────

/// Root configuration document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub default_profile: Option<String>,
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

/// Presentation defaults applied when flags don't override them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Defaults {
    /// Default time-range shortcut for usage views.
    #[serde(default)]
    pub range: Option<Shortcut>,
    /// Label locale for bucket labels.
    #[serde(default)]
    pub locale: Option<LabelLocale>,
    /// Display timezone as minutes east of UTC.
    #[serde(default)]
    pub utc_offset_minutes: Option<i32>,
}

/// One named panel connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Panel root URL, e.g. `https://panel.example.com`.
    pub panel: String,
    /// API token; falls back to [`TOKEN_ENV`] when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// A fully-resolved panel connection ready to hand to `fluxgate-api`.
#[derive(Debug, Clone)]
pub struct PanelSettings {
    pub url: Url,
    pub token: SecretString,
}

// ── Loading ─────────────────────────────────────────────────────────

/// Default config file location (`~/.config/fluxgate/config.toml` on
/// Linux and the platform equivalents elsewhere).
pub fn config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("dev", "fluxgate", "fluxgate")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Load configuration from `path` (or the default location), merged
/// with `FLUXGATE_*` environment variables. A missing file yields the
/// default configuration rather than an error.
pub fn load_config_or_default(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.map_or_else(|| config_path().unwrap_or_default(), Path::to_path_buf);

    let config = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed("FLUXGATE_").split("__"))
        .extract()?;
    Ok(config)
}

impl Config {
    /// Look up a profile, listing the available names on failure.
    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::ProfileNotFound {
                name: name.to_owned(),
                available: self
                    .profiles
                    .keys()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

impl Profile {
    /// Resolve this profile into connection settings.
    ///
    /// The token comes from the profile when stored, otherwise from the
    /// [`TOKEN_ENV`] environment variable.
    pub fn resolve(&self, profile_name: &str) -> Result<PanelSettings, ConfigError> {
        let url: Url = self
            .panel
            .parse()
            .map_err(|_| ConfigError::InvalidPanelUrl {
                profile: profile_name.to_owned(),
                url: self.panel.clone(),
            })?;

        let token = self
            .token
            .clone()
            .or_else(|| std::env::var(TOKEN_ENV).ok())
            .ok_or_else(|| ConfigError::MissingToken {
                profile: profile_name.to_owned(),
            })?;

        Ok(PanelSettings {
            url,
            token: SecretString::from(token),
        })
    }
}
