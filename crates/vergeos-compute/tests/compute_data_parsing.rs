//! Integration tests for parsing compute resource data.
//!
//! These tests validate that the vergeos-compute models correctly deserialize
//! VergeOS v4 API response payloads.

use std::fs;
use std::path::PathBuf;
use vergeos_compute::{Drive, Vm};

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
fn deserialize_vm_list() {
    let json = load_fixture("vm_list.json");
    let vms: Vec<Vm> = serde_json::from_str(&json)
        .unwrap_or_else(|e| panic!("Failed to deserialize VM list: {e}"));
    assert_eq!(vms.len(), 2);
}

#[test]
fn vm_joined_status_fields() {
    let json = load_fixture("vm_list.json");
    let vms: Vec<Vm> = serde_json::from_str(&json).unwrap();

    let vm = vms
        .iter()
        .find(|vm| vm.name == "web-frontend")
        .expect("fixture should contain web-frontend");

    assert_eq!(vm.key, 12);
    assert!(vm.is_running());
    assert_eq!(vm.status.as_deref(), Some("running"));
    assert_eq!(vm.node_name.as_deref(), Some("node2"));
    assert_eq!(vm.cluster_name.as_deref(), Some("Compute"));
    assert_eq!(vm.ram, Some(8192));
    assert_eq!(vm.cloudinit_datasource.as_deref(), Some("config_drive_v2"));
    assert!(vm.ha_group.is_none());
    assert!(vm.created_at().is_some());
}

#[test]
fn vm_snapshot_record_is_flagged() {
    let json = load_fixture("vm_list.json");
    let vms: Vec<Vm> = serde_json::from_str(&json).unwrap();

    let snapshot = vms.iter().find(|vm| vm.is_snapshot).expect("snapshot VM");
    assert_eq!(snapshot.key, 31);
    assert!(!snapshot.is_running());
    // Sparse records still parse; absent fields default.
    assert!(snapshot.guest_agent.is_none());
    assert!(snapshot.cloudinit_datasource.is_none());
}

#[test]
fn deserialize_drive_list() {
    let json = load_fixture("drive_list.json");
    let drives: Vec<Drive> = serde_json::from_str(&json)
        .unwrap_or_else(|e| panic!("Failed to deserialize drive list: {e}"));
    assert_eq!(drives.len(), 2);

    let root = &drives[0];
    assert_eq!(root.interface_display(), "Virtio-SCSI");
    assert_eq!(root.media_display(), "Disk");
    assert_eq!(root.size_gb(), 40.0);

    let cdrom = &drives[1];
    assert_eq!(cdrom.interface_display(), "SATA (AHCI)");
    assert_eq!(cdrom.media_display(), "CD-ROM");
    assert_eq!(
        cdrom.media_file.as_deref(),
        Some("debian-12.5.0-amd64-netinst.iso")
    );
    // No disksize on a CD-ROM; size falls back to the media allocation.
    assert!(cdrom.size_gb() > 0.0);
}
