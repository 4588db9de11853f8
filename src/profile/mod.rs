//! Terminal profiles read from an instance's settings document.
//!
//! ## Sub-modules
//!
//! - [`decode`]: settings bytes → text, with encoding detection
//! - [`parser`]: text → ordered list of visible profile entries

pub mod decode;
pub mod parser;

pub use parser::{load_profiles, parse_profiles, parse_profiles_str};

use crate::error::ProfileError;
use serde::{Deserialize, Deserializer};

/// One entry of the `profiles` list, as written in the settings document.
///
/// Fields with an unexpected JSON type are treated as absent, so a single
/// odd entry cannot fail the whole document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProfileEntry {
    #[serde(default, deserialize_with = "lenient_string")]
    pub guid: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,

    /// Icon descriptor: empty, `ms-appx:///ProfileIcons/<id>.png`, a
    /// `file:///` URI or a path with optional environment variables.
    #[serde(default, deserialize_with = "lenient_string")]
    pub icon: Option<String>,

    /// Only an explicit `true` hides a profile.
    #[serde(default, deserialize_with = "lenient_true")]
    pub hidden: bool,
}

impl ProfileEntry {
    /// Check that the entry has a non-empty `guid` and `name`.
    pub fn validate(self) -> Result<Profile, ProfileError> {
        match (self.guid, self.name) {
            (Some(guid), Some(name)) if !guid.is_empty() && !name.is_empty() => Ok(Profile {
                guid,
                name,
                icon: self.icon.filter(|i| !i.is_empty()),
            }),
            (guid, name) => Err(ProfileError::InvalidProfile {
                name: name.unwrap_or_default(),
                guid: guid.unwrap_or_default(),
            }),
        }
    }
}

/// A visible profile with the fields a catalog item needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    /// Stable identifier, passed to the terminal as `--profile`.
    pub guid: String,
    pub name: String,
    pub icon: Option<String>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(matches!(
        serde_json::Value::deserialize(deserializer)?,
        serde_json::Value::Bool(true)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(guid: Option<&str>, name: Option<&str>) -> ProfileEntry {
        ProfileEntry {
            guid: guid.map(String::from),
            name: name.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_ok() {
        let profile = ProfileEntry {
            icon: Some(String::new()),
            ..entry(Some("{G1}"), Some("Main"))
        }
        .validate()
        .unwrap();
        assert_eq!(profile.guid, "{G1}");
        assert_eq!(profile.name, "Main");
        assert_eq!(profile.icon, None);
    }

    #[test]
    fn test_validate_missing_fields() {
        assert!(matches!(
            entry(None, Some("Main")).validate(),
            Err(ProfileError::InvalidProfile { .. })
        ));
        assert!(matches!(
            entry(Some("{G1}"), Some("")).validate(),
            Err(ProfileError::InvalidProfile { .. })
        ));
        let err = entry(Some("{G1}"), None).validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Skipping invalid profile with name:'' guid:'{G1}'"
        );
    }

    #[test]
    fn test_lenient_fields() {
        let entry: ProfileEntry =
            serde_json::from_str(r#"{"guid": 42, "name": "X", "hidden": "yes"}"#).unwrap();
        assert_eq!(entry.guid, None);
        assert_eq!(entry.name.as_deref(), Some("X"));
        assert!(!entry.hidden);
    }
}
