//! Client settings
//!
//! Keys mirror the extension's synced storage so one JSON document can be
//! shared between the extension and the command line.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};
use ww_core::HostCase;

use crate::error::SettingsError;
use crate::provider::FetchFailurePolicy;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:1978";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Tracking server base URL
    pub server_url: String,
    /// Master switch for blocking and tracking
    pub monitoring_enabled: bool,
    /// Report visits from incognito tabs
    pub track_incognito: bool,
    /// Report visits to localhost / 127.0.0.1
    pub track_local: bool,
    /// Host comparison mode for domain rules
    pub host_case: HostCase,
    /// What the provider installs when a refresh fails
    pub on_fetch_failure: FetchFailurePolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            monitoring_enabled: true,
            track_incognito: false,
            track_local: false,
            host_case: HostCase::Exact,
            on_fetch_failure: FetchFailurePolicy::Empty,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("no settings at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(SettingsError::Io {
                    path: path.display().to_string(),
                    source,
                })
            }
        };

        Self::from_json(&text).map_err(|source| SettingsError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Parse settings; absent keys take their defaults.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
