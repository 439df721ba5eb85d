//! Directory scan for recording files

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use cdr_core::extract_recording_uuid;

/// Default recordings directory
pub fn default_recordings_dir() -> PathBuf {
    PathBuf::from("/var/lib/freeswitch/recordings")
}

/// List the recordings directory (one level) and map each recording's
/// lowercase call UUID to its absolute path.
///
/// Fails only when the directory itself cannot be read; unreadable entries
/// are skipped.
pub fn scan_recordings(dir: &Path) -> io::Result<HashMap<String, PathBuf>> {
    let dir = std::path::absolute(dir)?;
    let mut found: HashMap<String, PathBuf> = HashMap::new();

    for entry in WalkDir::new(&dir).min_depth(1).max_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => return Err(err.into()),
            Err(err) => {
                debug!(error = %err, "skipping unreadable recording entry");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let Some(name) = entry.file_name().to_str() else {
            continue;
        };

        if let Some(uuid) = extract_recording_uuid(name) {
            found.insert(uuid.into(), entry.into_path());
        }
    }

    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const UUID_A: &str = "abcd1234-1234-4abc-89ab-1234567890ab";
    const UUID_B: &str = "0f0e0d0c-0b0a-1999-a888-777766665555";

    #[test]
    fn test_scan_empty_dir() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(scan_recordings(tmp.path()).unwrap().is_empty());
    }

    #[test]
    fn test_scan_filters_non_recordings() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join(format!("call_20240101_{UUID_A}.wav")), b"RIFF").unwrap();
        fs::write(tmp.path().join(format!("ext_{}.WAV", UUID_B.to_uppercase())), b"RIFF").unwrap();
        fs::write(tmp.path().join("no_uuid_here.wav"), b"RIFF").unwrap();
        fs::write(tmp.path().join(format!("call_{UUID_A}.mp3")), b"ID3").unwrap();
        // directories and nested files are ignored
        fs::create_dir(tmp.path().join(format!("dir_{UUID_B}.wav"))).unwrap();
        let nested = tmp.path().join("archive");
        fs::create_dir(&nested).unwrap();
        fs::write(
            nested.join("old_11111111-2222-3333-8444-555555555555.wav"),
            b"RIFF",
        )
        .unwrap();

        let found = scan_recordings(tmp.path()).unwrap();
        assert_eq!(found.len(), 2);

        let path_a = &found[UUID_A];
        assert!(path_a.is_absolute());
        assert!(path_a.ends_with(format!("call_20240101_{UUID_A}.wav")));
        assert!(found.contains_key(UUID_B));
    }

    #[test]
    fn test_scan_missing_dir_fails() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(scan_recordings(&tmp.path().join("gone")).is_err());
    }
}
