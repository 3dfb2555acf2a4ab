//! Integration tests for parsing system resource data.
//!
//! These tests validate that the vergeos-system models correctly deserialize
//! VergeOS v4 API response payloads.

use std::fs;
use std::path::PathBuf;
use vergeos_system::{LogEntry, Task};

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
fn deserialize_log_list() {
    let json = load_fixture("log_list.json");
    let logs: Vec<LogEntry> = serde_json::from_str(&json)
        .unwrap_or_else(|e| panic!("Failed to deserialize log list: {e}"));
    assert_eq!(logs.len(), 3);
}

#[test]
fn log_microsecond_timestamps_convert() {
    let json = load_fixture("log_list.json");
    let logs: Vec<LogEntry> = serde_json::from_str(&json).unwrap();

    let audit = logs.iter().find(|l| l.key == 90311).expect("audit entry");
    assert_eq!(audit.level_display(), "Audit");
    assert_eq!(audit.object_type_display(), "User");
    let at = audit.created_at().expect("timestamp converts");
    assert_eq!(at.timestamp(), 1_724_716_800);
    assert_eq!(at.timestamp_subsec_micros(), 123_456);

    let snapshot = logs.iter().find(|l| l.key == 90312).expect("error entry");
    assert_eq!(snapshot.object_type_display(), "SystemSnapshot");
}

#[test]
fn deserialize_task_list() {
    let json = load_fixture("task_list.json");
    let tasks: Vec<Task> = serde_json::from_str(&json)
        .unwrap_or_else(|e| panic!("Failed to deserialize task list: {e}"));
    assert_eq!(tasks.len(), 2);

    let backup = &tasks[0];
    assert!(backup.is_complete());
    assert!(backup.enabled);
    assert_eq!(backup.owner_display.as_deref(), Some("web-frontend"));
    assert_eq!(backup.id.as_deref().map(str::len), Some(40));

    let expire = &tasks[1];
    assert!(expire.has_error());
    assert!(!expire.is_running());
    // Sparse record; absent joined fields default.
    assert!(expire.owner_display.is_none());
    assert!(expire.delete_after_run.is_none());
}
