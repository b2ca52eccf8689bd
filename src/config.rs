//! Editor configuration, stored as `JSON`.
//!
//! ```json
//! {
//!   "style": { "size": "large", "backgroundColor": "#00000080" },
//!   "languages": ["English", "French"],
//!   "defaultLanguage": "English",
//!   "overlapPolicy": "strict"
//! }
//! ```
//!
//! Every field is optional.
use std::{fs, io, path::PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    style::Style,
    timeline::{Language, OverlapPolicy},
};

/// Error for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file can't be read.
    #[error("Could not read '{path}'")]
    Io {
        /// Source error
        source: io::Error,
        /// Path of the file we tried to read
        path: PathBuf,
    },

    /// The content is not a valid configuration.
    #[error("Invalid configuration")]
    Json(#[from] serde_json::Error),

    /// The default language is not in the offered languages.
    #[error("Default language '{0}' is not in the configured languages")]
    UnknownDefaultLanguage(Language),
}

/// Settings of an editing session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct EditorConfig {
    /// Style of new sessions.
    pub style: Style,
    /// Languages offered for caption tracks.
    pub languages: Vec<Language>,
    /// Language of the transcribed track.
    pub default_language: Language,
    /// Overlap handling of the timelines.
    pub overlap_policy: OverlapPolicy,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            style: Style::default(),
            languages: ["English", "Spanish", "French", "German", "Chinese", "Japanese"]
                .into_iter()
                .map(Language::from)
                .collect(),
            default_language: Language::from("English"),
            overlap_policy: OverlapPolicy::Permissive,
        }
    }
}

impl EditorConfig {
    /// Parse a `JSON` configuration.
    ///
    /// # Errors
    ///
    /// Will return `ConfigError::Json` if the content is not valid, and
    /// `ConfigError::UnknownDefaultLanguage` if the default language is not
    /// one of the offered languages.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a `JSON` configuration file.
    ///
    /// # Errors
    ///
    /// Will return `ConfigError::Io` if the file can't be read, or the errors
    /// of [`Self::from_json`].
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let json = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            source,
            path: path.clone(),
        })?;
        debug!("Load configuration from '{}'", path.display());
        Self::from_json(&json)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.languages.contains(&self.default_language) {
            Ok(())
        } else {
            Err(ConfigError::UnknownDefaultLanguage(
                self.default_language.clone(),
            ))
        }
    }
}
