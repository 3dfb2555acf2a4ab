//! Integration tests for parsing storage resource data.
//!
//! These tests validate that the vergeos-storage models correctly deserialize
//! VergeOS v4 API response payloads.

use std::fs;
use std::path::PathBuf;
use vergeos_storage::NasVolume;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

fn load_fixture(name: &str) -> String {
    let path = fixtures_dir().join(name);
    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture at {}: {}", path.display(), e))
}

#[test]
fn deserialize_volume_list() {
    let json = load_fixture("volume_list.json");
    let volumes: Vec<NasVolume> = serde_json::from_str(&json)
        .unwrap_or_else(|e| panic!("Failed to deserialize volume list: {e}"));
    assert_eq!(volumes.len(), 2);
}

#[test]
fn volume_hex_keys_and_sizes() {
    let json = load_fixture("volume_list.json");
    let volumes: Vec<NasVolume> = serde_json::from_str(&json).unwrap();

    let share = volumes
        .iter()
        .find(|v| v.name.as_deref() == Some("FileShare"))
        .expect("fixture should contain FileShare");

    assert_eq!(share.key.len(), 40);
    assert_eq!(share.key, share.id.clone().unwrap());
    assert_eq!(share.max_size_gb(), 500.0);
    assert_eq!(share.used_gb(), 200.0);
    assert!(share.is_mounted());
    assert_eq!(share.service, Some(1));
    assert!(share.created_at().is_some());
}

#[test]
fn remote_volume_parses_sparse_record() {
    let json = load_fixture("volume_list.json");
    let volumes: Vec<NasVolume> = serde_json::from_str(&json).unwrap();

    let remote = volumes
        .iter()
        .find(|v| v.fs_type.as_deref() == Some("nfs"))
        .expect("fixture should contain an NFS-backed volume");

    assert_eq!(remote.enabled, Some(false));
    assert!(!remote.is_mounted());
    // Remote volumes report no maxsize.
    assert_eq!(remote.max_size_gb(), 0.0);
    assert!(remote.preferred_tier.is_none());
    assert!(remote.used_bytes.is_none());
}
