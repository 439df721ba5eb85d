//! Call UUID validation and recording filename conventions

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::error::CoreError;

/// Canonical 8-4-4-4-12 layout, version nibble 1..5, variant nibble 8/9/a/b
const UUID_PATTERN: &str =
    "[0-9a-f]{8}-[0-9a-f]{4}-[1-5][0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}";

static CALL_UUID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("(?i)^{UUID_PATTERN}$")).expect("call uuid pattern is valid")
});

static RECORDING_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)^.*_({UUID_PATTERN})\.wav$"))
        .expect("recording filename pattern is valid")
});

/// A validated, lowercase call UUID.
///
/// Constructing one is the only way to reach the recording index, so
/// malformed input is rejected at the caller boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CallUuid(String);

impl CallUuid {
    /// Validate and normalize a call UUID
    pub fn parse(input: &str) -> Result<Self, CoreError> {
        let trimmed = input.trim();
        if CALL_UUID_RE.is_match(trimmed) {
            Ok(Self(trimmed.to_ascii_lowercase()))
        } else {
            Err(CoreError::InvalidUuid(input.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CallUuid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for CallUuid {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CallUuid {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CallUuid> for String {
    fn from(uuid: CallUuid) -> Self {
        uuid.0
    }
}

/// Extract the call UUID from a recording filename.
///
/// Recordings are named `<anything>_<uuid>.wav`; the extension is matched
/// case-insensitively. Returns `None` for anything else.
pub fn extract_recording_uuid(file_name: &str) -> Option<CallUuid> {
    RECORDING_NAME_RE
        .captures(file_name)
        .and_then(|caps| caps.get(1))
        .map(|m| CallUuid(m.as_str().to_ascii_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes_case() {
        let uuid = CallUuid::parse("ABCD1234-1234-4ABC-89AB-1234567890AB").unwrap();
        assert_eq!(uuid.as_str(), "abcd1234-1234-4abc-89ab-1234567890ab");
    }

    #[test]
    fn test_parse_rejects_bad_version_and_variant() {
        // version nibble 0
        assert!(CallUuid::parse("abcd1234-1234-0abc-89ab-1234567890ab").is_err());
        // version nibble 6
        assert!(CallUuid::parse("abcd1234-1234-6abc-89ab-1234567890ab").is_err());
        // variant nibble c
        assert!(CallUuid::parse("abcd1234-1234-4abc-c9ab-1234567890ab").is_err());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(CallUuid::parse("").is_err());
        assert!(CallUuid::parse("../../etc/passwd").is_err());
        assert!(CallUuid::parse("abcd1234123441bc89ab1234567890ab").is_err());
        assert!(CallUuid::parse("abcd1234-1234-4abc-89ab-1234567890ab.wav").is_err());
    }

    #[test]
    fn test_extract_recording_uuid() {
        let uuid =
            extract_recording_uuid("2024_recording_ABCD1234-1234-4abc-89ab-1234567890ab.wav")
                .unwrap();
        assert_eq!(uuid.as_str(), "abcd1234-1234-4abc-89ab-1234567890ab");
    }

    #[test]
    fn test_extract_recording_uuid_extension_case() {
        assert!(extract_recording_uuid("call_abcd1234-1234-4abc-89ab-1234567890ab.WAV").is_some());
    }

    #[test]
    fn test_extract_recording_uuid_no_match() {
        assert!(extract_recording_uuid("no_uuid_here.wav").is_none());
        assert!(extract_recording_uuid("x.mp3").is_none());
        assert!(extract_recording_uuid("call_abcd1234-1234-4abc-89ab-1234567890ab.mp3").is_none());
        // separator is required
        assert!(extract_recording_uuid("abcd1234-1234-4abc-89ab-1234567890ab.wav").is_none());
    }

    #[test]
    fn test_serde_roundtrip_validates() {
        let ok: Result<CallUuid, _> =
            serde_json::from_str("\"ABCD1234-1234-4abc-89ab-1234567890ab\"");
        assert_eq!(ok.unwrap().as_str(), "abcd1234-1234-4abc-89ab-1234567890ab");

        let bad: Result<CallUuid, _> = serde_json::from_str("\"not-a-uuid\"");
        assert!(bad.is_err());
    }
}
