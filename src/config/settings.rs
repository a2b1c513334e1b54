//! TOML-based configuration for Bard.
//!
//! Supports a config file (bard.toml) with environment variable expansion in
//! paths.
//!
//! Example configuration:
//! ```toml
//! [grammar]
//! filter_delimiter = ","
//! having_delimiter = ","
//! sort_delimiter = ","
//! interval_delimiter = ","
//!
//! [defaults]
//! time_zone = "UTC"
//! format = "json"
//! async_after = "never"
//! per_page = 100
//!
//! [schema]
//! path = "${BARD_HOME}/schema.toml"
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

use crate::model::TimeZone;
use crate::request::{AsyncAfter, ResponseFormat};

/// Characters that already mean something inside a clause.
const RESERVED: &[char] = &['[', ']', '-', '.', '|', '%', '/'];

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Delimiters of the request grammar.
    pub grammar: GrammarSettings,

    /// Values used when a request leaves a parameter out.
    pub defaults: RequestDefaults,

    /// Where the schema catalog lives.
    pub schema: SchemaSettings,
}

/// Delimiters between clauses of each list-valued parameter.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GrammarSettings {
    pub filter_delimiter: char,
    pub having_delimiter: char,
    pub sort_delimiter: char,
    pub interval_delimiter: char,
}

impl Default for GrammarSettings {
    fn default() -> Self {
        Self {
            filter_delimiter: ',',
            having_delimiter: ',',
            sort_delimiter: ',',
            interval_delimiter: ',',
        }
    }
}

impl GrammarSettings {
    fn delimiters(&self) -> [(&'static str, char); 4] {
        [
            ("filter_delimiter", self.filter_delimiter),
            ("having_delimiter", self.having_delimiter),
            ("sort_delimiter", self.sort_delimiter),
            ("interval_delimiter", self.interval_delimiter),
        ]
    }
}

/// Request defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RequestDefaults {
    pub time_zone: TimeZone,
    pub format: ResponseFormat,
    pub async_after: AsyncAfter,
    /// Page size used when a request gives `page` without `perPage`.
    pub per_page: Option<NonZeroU32>,
}

/// Schema catalog location.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SchemaSettings {
    /// Path to the catalog TOML (supports ${ENV_VAR} expansion).
    pub path: Option<String>,
}

impl SchemaSettings {
    /// The catalog path with environment variables expanded.
    pub fn resolved_path(&self) -> Result<Option<PathBuf>, SettingsError> {
        self.path
            .as_deref()
            .map(|path| expand_env_vars(path).map(PathBuf::from))
            .transpose()
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and check settings from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(content)?;
        settings.check()?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `BARD_CONFIG`
    /// 2. `./bard.toml`
    /// 3. `~/.config/bard/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("BARD_CONFIG") {
            tracing::debug!(path = %path, "loading settings from BARD_CONFIG");
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("bard.toml");
        if local_config.exists() {
            tracing::debug!(path = %local_config.display(), "loading settings");
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("bard").join("config.toml");
            if user_config.exists() {
                tracing::debug!(path = %user_config.display(), "loading settings");
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }

    /// Reject delimiters that collide with clause syntax.
    fn check(&self) -> Result<(), SettingsError> {
        for (name, delimiter) in self.grammar.delimiters() {
            if RESERVED.contains(&delimiter) || delimiter.is_alphanumeric() {
                return Err(SettingsError::InvalidConfig(format!(
                    "grammar.{} cannot be '{}'",
                    name, delimiter
                )));
            }
        }
        Ok(())
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let var_name: String = if chars.next_if_eq(&'{').is_some() {
            let name = std::iter::from_fn(|| chars.next_if(|&ch| ch != '}')).collect();
            chars.next(); // closing brace
            name
        } else {
            std::iter::from_fn(|| chars.next_if(|&ch| ch.is_alphanumeric() || ch == '_')).collect()
        };

        if var_name.is_empty() {
            // Just a lone $, keep it
            result.push('$');
            continue;
        }
        let value = env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name))?;
        result.push_str(&value);
    }

    Ok(result)
}
