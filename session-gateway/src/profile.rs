//! Persisted login profile
//!
//! Three string values survive process restarts: the last-used identity, the
//! mobile number, and the consent handle. No other durable state is owned by
//! this layer.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Profile persistence errors.
#[derive(Error, Debug)]
pub enum ProfileError {
    /// Filesystem failure
    #[error("Profile IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored profile could not be parsed
    #[error("Profile parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Profile could not be serialized
    #[error("Profile serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// The persisted login profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginProfile {
    /// Last-used username
    pub username: String,
    /// Last-used mobile number
    pub mobile_number: String,
    /// Last-used consent handle
    pub consent_handle: String,
}

impl LoginProfile {
    /// Load the profile, if one was ever saved.
    pub fn load(path: impl AsRef<Path>) -> Result<Option<Self>, ProfileError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(path)?;
        Ok(Some(toml::from_str(&raw)?))
    }

    /// Persist the profile, replacing any previous one.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ProfileError> {
        let rendered = toml::to_string_pretty(self)?;
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, rendered)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = LoginProfile::load(dir.path().join("profile.toml")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn profile_survives_a_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state/profile.toml");

        let profile = LoginProfile {
            username: "demo@aa".to_string(),
            mobile_number: "9999999999".to_string(),
            consent_handle: "52d7c312-1bf6-4747-acb5-50f2dd6d5a2g".to_string(),
        };
        profile.save(&path).unwrap();

        let loaded = LoginProfile::load(&path).unwrap();
        assert_eq!(loaded, Some(profile));
    }
}
