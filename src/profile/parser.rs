//! Settings document → visible profile entries.
//!
//! Older Windows Terminal releases stored profiles as a bare list; newer ones
//! nest the list under `profiles.list` next to `profiles.defaults`. Both shapes
//! are accepted and produce the same result.

use super::ProfileEntry;
use super::decode::decode_document;
use crate::error::ProfileError;
use crate::relaxed_json;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

/// The two known shapes of the `profiles` key.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ProfilesSection {
    /// `"profiles": [ ... ]`
    List(Vec<Value>),
    /// `"profiles": { "defaults": { ... }, "list": [ ... ] }`
    Mapping {
        #[serde(default)]
        list: Option<Vec<Value>>,
    },
}

impl ProfilesSection {
    fn into_entries(self) -> Vec<Value> {
        match self {
            ProfilesSection::List(list) => list,
            ProfilesSection::Mapping { list } => list.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SettingsDocument {
    #[serde(default)]
    profiles: Value,
}

/// Read and parse the settings document at `path`.
pub fn load_profiles(path: &Path) -> Result<Vec<ProfileEntry>, ProfileError> {
    let bytes = std::fs::read(path).map_err(|source| ProfileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("Read {} bytes from {}", bytes.len(), path.display());
    parse_profiles(&bytes)
}

/// Parse settings document bytes into the visible profile entries.
pub fn parse_profiles(bytes: &[u8]) -> Result<Vec<ProfileEntry>, ProfileError> {
    let text = decode_document(bytes)?;
    parse_profiles_str(&text)
}

/// Parse settings document text into the visible profile entries.
///
/// Entries come back in document order. Hidden entries are dropped; entries
/// missing `guid` or `name` are kept and left for the caller to reject.
pub fn parse_profiles_str(text: &str) -> Result<Vec<ProfileEntry>, ProfileError> {
    let document: SettingsDocument = serde_json::from_str(&relaxed_json::strip(text))?;

    if is_falsy(&document.profiles) {
        return Ok(Vec::new());
    }

    let section: ProfilesSection = serde_json::from_value(document.profiles)?;
    let entries = section
        .into_entries()
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value::<ProfileEntry>(value) {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("Skipping profile #{index}: not a profile object ({e})");
                None
            }
        })
        .filter(|entry| !entry.hidden)
        .collect();

    Ok(entries)
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guids(entries: &[ProfileEntry]) -> Vec<&str> {
        entries.iter().filter_map(|e| e.guid.as_deref()).collect()
    }

    #[test]
    fn test_mapping_and_list_shapes_are_equivalent() {
        let mapping = r#"{
            "profiles": {
                "defaults": { "fontFace": "Cascadia Mono" },
                "list": [
                    { "guid": "{G1}", "name": "PowerShell", "icon": "ms-appx:///ProfileIcons/{G1}.png" },
                    { "guid": "{G2}", "name": "cmd" }
                ]
            }
        }"#;
        let list = r#"{
            "profiles": [
                { "guid": "{G1}", "name": "PowerShell", "icon": "ms-appx:///ProfileIcons/{G1}.png" },
                { "guid": "{G2}", "name": "cmd" }
            ]
        }"#;
        let a = parse_profiles_str(mapping).unwrap();
        let b = parse_profiles_str(list).unwrap();
        assert_eq!(a, b);
        assert_eq!(guids(&a), vec!["{G1}", "{G2}"]);
    }

    #[test]
    fn test_hidden_profiles_removed() {
        let text = r#"{"profiles": {"list": [
            {"guid":"{G1}","name":"Main","hidden":false},
            {"guid":"{G2}","name":"Debug","hidden":true},
            {"guid":"{G3}","name":"Other"}
        ]}}"#;
        let entries = parse_profiles_str(text).unwrap();
        assert_eq!(guids(&entries), vec!["{G1}", "{G3}"]);
    }

    #[test]
    fn test_missing_or_falsy_profiles_is_empty() {
        for text in [
            "{}",
            r#"{"profiles": null}"#,
            r#"{"profiles": false}"#,
            r#"{"profiles": []}"#,
            r#"{"profiles": {}}"#,
            r#"{"profiles": {"defaults": {}}}"#,
            r#"{"profiles": {"list": null}}"#,
        ] {
            assert!(parse_profiles_str(text).unwrap().is_empty(), "{text}");
        }
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let err = parse_profiles_str(r#"{"profiles": [ {"guid": "x" "#).unwrap_err();
        assert!(matches!(err, ProfileError::MalformedConfig(_)));
    }

    #[test]
    fn test_unexpected_profiles_type_is_malformed() {
        let err = parse_profiles_str(r#"{"profiles": "all of them"}"#).unwrap_err();
        assert!(matches!(err, ProfileError::MalformedConfig(_)));
    }

    #[test]
    fn test_non_object_entries_skipped() {
        let entries = parse_profiles_str(r#"{"profiles": [1, {"guid":"{G}","name":"N"}, "x"]}"#)
            .unwrap();
        assert_eq!(guids(&entries), vec!["{G}"]);
    }

    #[test]
    fn test_invalid_entries_are_returned_for_caller() {
        let entries = parse_profiles_str(r#"{"profiles": [{"name":"No guid"}]}"#).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].guid, None);
    }

    #[test]
    fn test_comments_and_trailing_commas() {
        let text = r#"// Windows Terminal settings
{
    "$schema": "https://aka.ms/terminal-profiles-schema",
    // not a real key: "profiles"
    "profiles": {
        /* "list": [] */
        "list": [
            { "guid": "{G1}", "name": "Main", }, // trailing comma
        ],
    },
}"#;
        let entries = parse_profiles_str(text).unwrap();
        assert_eq!(guids(&entries), vec!["{G1}"]);
    }

    #[test]
    fn test_parse_bytes_with_bom() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(br#"{"profiles": [{"guid":"{G}","name":"N"}]}"#);
        assert_eq!(parse_profiles(&bytes).unwrap().len(), 1);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let temp = tempfile::TempDir::new().unwrap();
        let err = load_profiles(&temp.path().join("settings.json")).unwrap_err();
        assert!(matches!(err, ProfileError::Io { .. }));
    }
}
