//! Data models for NAS services, volumes, volume snapshots and file shares.
//!
//! Volume and share keys are 40-character hex strings, unlike the integer
//! `$key`s used by most other VergeOS resources.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

const BYTES_PER_GIB: u64 = 1_073_741_824;

/// Default field set requested for NAS service records.
pub const NAS_SERVICE_DEFAULT_FIELDS: &[&str] = &[
    "$key",
    "name",
    "vm",
    "vm#name as vm_name",
    "vm#$display as vm_display",
    "vm#description as vm_description",
    "vm#machine#status#status as vm_status",
    "vm#machine#status#running as vm_running",
    "vm#machine#cores as vm_cores",
    "vm#machine#ram as vm_ram",
    "vm#created as created",
    "vm#modified as modified",
    "max_imports",
    "max_syncs",
    "disable_swap",
    "read_ahead_kb_default",
    "cifs",
    "nfs",
    "count(volumes) as volume_count",
];

/// Default field set requested for volume records.
pub const VOLUME_DEFAULT_FIELDS: &[&str] = &[
    "$key",
    "id",
    "name",
    "description",
    "enabled",
    "created",
    "modified",
    "maxsize",
    "preferred_tier",
    "fs_type",
    "read_only",
    "discard",
    "owner_user",
    "owner_group",
    "encrypt",
    "automount_snapshots",
    "is_snapshot",
    "note",
    "creator",
    "service",
    "service#$display as service_display",
    "service#vm#$display as nas_vm_display",
    "service#vm#machine#status#status as nas_status",
    "snapshot_profile",
    "snapshot_profile#$display as snapshot_profile_display",
    "status#status as mount_status",
    "status#mounted as mounted",
    "drive",
    "drive#media_source#used_bytes as used_bytes",
    "drive#media_source#filesize as allocated_bytes",
];

/// Default field set requested for volume snapshot records.
pub const VOLUME_SNAPSHOT_DEFAULT_FIELDS: &[&str] = &[
    "$key",
    "name",
    "description",
    "created",
    "expires",
    "expires_type",
    "enabled",
    "created_manually",
    "quiesce",
    "volume",
    "volume#$display as volume_display",
    "volume#name as volume_name",
    "snap_volume",
];

/// Default field set requested for CIFS share records.
pub const CIFS_SHARE_DEFAULT_FIELDS: &[&str] = &[
    "$key",
    "id",
    "name",
    "description",
    "enabled",
    "created",
    "modified",
    "share_path",
    "comment",
    "browseable",
    "read_only",
    "guest_ok",
    "guest_only",
    "force_user",
    "force_group",
    "valid_users",
    "valid_groups",
    "admin_users",
    "admin_groups",
    "host_allow",
    "host_deny",
    "vfs_shadow_copy2",
    "volume",
    "volume#$display as volume_display",
    "volume#name as volume_name",
    "status#status as status",
    "status#state as state",
];

/// Default field set requested for NFS share records.
pub const NFS_SHARE_DEFAULT_FIELDS: &[&str] = &[
    "$key",
    "id",
    "name",
    "description",
    "enabled",
    "created",
    "modified",
    "share_path",
    "allowed_hosts",
    "fsid",
    "anonuid",
    "anongid",
    "no_acl",
    "insecure",
    "async",
    "squash",
    "data_access",
    "allow_all",
    "volume",
    "volume#$display as volume_display",
    "volume#name as volume_name",
    "status#status as status",
    "status#state as state",
];

/// A NAS service record: a specialized VM that manages volumes and shares.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NasService {
    /// Record key.
    #[serde(rename = "$key")]
    pub key: u64,
    /// Service name.
    pub name: String,
    /// Underlying VM key.
    #[serde(default)]
    pub vm: Option<u64>,
    /// Underlying VM name.
    #[serde(default)]
    pub vm_name: Option<String>,
    /// Underlying VM status.
    #[serde(default)]
    pub vm_status: Option<String>,
    /// Whether the VM is running.
    #[serde(default)]
    pub vm_running: bool,
    /// VM core count.
    #[serde(default)]
    pub vm_cores: Option<u32>,
    /// VM RAM in MiB.
    #[serde(default)]
    pub vm_ram: Option<u64>,
    /// Creation timestamp (seconds since epoch).
    #[serde(default)]
    pub created: Option<i64>,
    /// Last modification timestamp.
    #[serde(default)]
    pub modified: Option<i64>,
    /// Maximum simultaneous import jobs.
    #[serde(default)]
    pub max_imports: Option<u32>,
    /// Maximum simultaneous sync jobs.
    #[serde(default)]
    pub max_syncs: Option<u32>,
    /// Whether swap is disabled on the service VM.
    #[serde(default)]
    pub disable_swap: Option<bool>,
    /// Default read-ahead buffer size in KiB.
    #[serde(default)]
    pub read_ahead_kb_default: Option<u32>,
    /// CIFS settings record key.
    #[serde(default)]
    pub cifs: Option<u64>,
    /// NFS settings record key.
    #[serde(default)]
    pub nfs: Option<u64>,
    /// Number of volumes managed by this service.
    #[serde(default)]
    pub volume_count: u64,
}

impl NasService {
    /// Returns true when the service VM is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.vm_running || self.vm_status.as_deref() == Some("running")
    }
}

/// A NAS volume record (virtual filesystem).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NasVolume {
    /// Record key; a 40-character hex string.
    #[serde(rename = "$key")]
    pub key: String,
    /// Volume ID, identical to the key.
    #[serde(default)]
    pub id: Option<String>,
    /// Volume name.
    #[serde(default)]
    pub name: Option<String>,
    /// Volume description.
    #[serde(default)]
    pub description: Option<String>,
    /// Whether the volume is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,
    /// Creation timestamp (seconds since epoch).
    #[serde(default)]
    pub created: Option<i64>,
    /// Last modification timestamp.
    #[serde(default)]
    pub modified: Option<i64>,
    /// Maximum size in bytes.
    #[serde(default)]
    pub maxsize: Option<u64>,
    /// Preferred storage tier.
    #[serde(default)]
    pub preferred_tier: Option<String>,
    /// Filesystem type (ext4, cifs, nfs, ybfs, verge_vm_export).
    #[serde(default)]
    pub fs_type: Option<String>,
    /// Whether the volume is read-only.
    #[serde(default)]
    pub read_only: Option<bool>,
    /// Whether discard of deleted files is enabled.
    #[serde(default)]
    pub discard: Option<bool>,
    /// Volume directory owner user.
    #[serde(default)]
    pub owner_user: Option<String>,
    /// Volume directory owner group.
    #[serde(default)]
    pub owner_group: Option<String>,
    /// Whether the volume is encrypted.
    #[serde(default)]
    pub encrypt: Option<bool>,
    /// Whether snapshots are auto-mounted.
    #[serde(default)]
    pub automount_snapshots: Option<bool>,
    /// Whether this record is a snapshot volume.
    #[serde(default)]
    pub is_snapshot: bool,
    /// Parent NAS service key.
    #[serde(default)]
    pub service: Option<u64>,
    /// Parent NAS service display name.
    #[serde(default)]
    pub service_display: Option<String>,
    /// Status of the NAS service VM.
    #[serde(default)]
    pub nas_status: Option<String>,
    /// Associated snapshot profile key.
    #[serde(default)]
    pub snapshot_profile: Option<u64>,
    /// Mount status text.
    #[serde(default)]
    pub mount_status: Option<String>,
    /// Whether the volume is mounted.
    #[serde(default)]
    pub mounted: bool,
    /// Used space in bytes.
    #[serde(default)]
    pub used_bytes: Option<u64>,
    /// Allocated space in bytes.
    #[serde(default)]
    pub allocated_bytes: Option<u64>,
}

impl NasVolume {
    /// Maximum size in GiB, rounded to two decimal places.
    #[must_use]
    pub fn max_size_gb(&self) -> f64 {
        round_gb(self.maxsize.unwrap_or(0))
    }

    /// Used space in GiB.
    #[must_use]
    pub fn used_gb(&self) -> f64 {
        round_gb(self.used_bytes.unwrap_or(0))
    }

    /// Returns true when the volume is mounted.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted || self.mount_status.as_deref() == Some("mounted")
    }

    /// Creation time as a UTC timestamp.
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created.and_then(|ts| Utc.timestamp_opt(ts, 0).single())
    }
}

fn round_gb(bytes: u64) -> f64 {
    (bytes as f64 / BYTES_PER_GIB as f64 * 100.0).round() / 100.0
}

/// Request body for creating a volume.
#[derive(Debug, Clone, Serialize)]
pub struct CreateVolumeRequest {
    /// Volume name (alphanumeric with underscores/hyphens).
    pub name: String,
    /// Parent NAS service key.
    pub service: u64,
    /// Maximum size in bytes.
    pub maxsize: u64,
    /// Whether the volume starts enabled.
    pub enabled: bool,
    /// Enable automatic discard of deleted files.
    pub discard: bool,
    /// Preferred storage tier (1-5), sent as a string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_tier: Option<String>,
    /// Volume description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Create as read-only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
    /// Volume directory owner user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_user: Option<String>,
    /// Volume directory owner group.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_group: Option<String>,
    /// Snapshot profile key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_profile: Option<u64>,
}

impl CreateVolumeRequest {
    /// Create a volume request with the API's defaults.
    #[must_use]
    pub fn new(name: impl Into<String>, service: u64, size_gb: u64) -> Self {
        Self {
            name: name.into(),
            service,
            maxsize: size_gb * BYTES_PER_GIB,
            enabled: true,
            discard: true,
            preferred_tier: None,
            description: None,
            read_only: None,
            owner_user: None,
            owner_group: None,
            snapshot_profile: None,
        }
    }

    /// Set the preferred storage tier (1-5).
    #[must_use]
    pub fn with_tier(mut self, tier: u8) -> Self {
        self.preferred_tier = Some(tier.to_string());
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Request body for updating a volume. All fields optional.
#[derive(Debug, Default, Clone, Serialize)]
pub struct UpdateVolumeRequest {
    /// New description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New maximum size in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maxsize: Option<u64>,
    /// New preferred storage tier, sent as a string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_tier: Option<String>,
    /// Enable or disable the volume.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Set read-only or read-write.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
    /// Enable or disable automatic discard.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discard: Option<bool>,
    /// New owner user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_user: Option<String>,
    /// New owner group.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_group: Option<String>,
    /// New snapshot profile key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_profile: Option<u64>,
    /// Enable or disable auto-mount of snapshots.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub automount_snapshots: Option<bool>,
}

impl UpdateVolumeRequest {
    /// Set a new maximum size in GiB.
    #[must_use]
    pub const fn with_size_gb(mut self, size_gb: u64) -> Self {
        self.maxsize = Some(size_gb * BYTES_PER_GIB);
        self
    }

    /// Returns true when no fields are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        serde_json::to_value(self)
            .map(|v| v.as_object().is_some_and(serde_json::Map::is_empty))
            .unwrap_or(false)
    }
}

/// A volume snapshot record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NasVolumeSnapshot {
    /// Record key.
    #[serde(rename = "$key")]
    pub key: u64,
    /// Snapshot name.
    #[serde(default)]
    pub name: Option<String>,
    /// Snapshot description.
    #[serde(default)]
    pub description: Option<String>,
    /// Creation timestamp (seconds since epoch).
    #[serde(default)]
    pub created: Option<i64>,
    /// Expiration timestamp (0 for never).
    #[serde(default)]
    pub expires: Option<i64>,
    /// Expiration type (never, date).
    #[serde(default)]
    pub expires_type: Option<String>,
    /// Whether the snapshot is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,
    /// Whether the snapshot was created manually.
    #[serde(default)]
    pub created_manually: Option<bool>,
    /// Whether I/O was quiesced during creation.
    #[serde(default)]
    pub quiesce: Option<bool>,
    /// Parent volume key (40-character hex string).
    #[serde(default)]
    pub volume: Option<String>,
    /// Parent volume name.
    #[serde(default)]
    pub volume_name: Option<String>,
    /// Mounted snapshot volume key, when mounted.
    #[serde(default)]
    pub snap_volume: Option<String>,
}

impl NasVolumeSnapshot {
    /// Returns true when the snapshot never expires.
    #[must_use]
    pub fn never_expires(&self) -> bool {
        self.expires_type.as_deref() == Some("never") || self.expires == Some(0)
    }
}

/// Request body for creating a volume snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct CreateVolumeSnapshotRequest {
    /// Parent volume key (40-character hex string).
    pub volume: String,
    /// Snapshot name.
    pub name: String,
    /// Marks the snapshot as manually created.
    pub created_manually: bool,
    /// Expiration type (never, date).
    pub expires_type: String,
    /// Expiration timestamp (0 for never).
    pub expires: i64,
    /// Snapshot description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Freeze I/O during the snapshot for consistency.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiesce: Option<bool>,
}

impl CreateVolumeSnapshotRequest {
    /// Create a snapshot request expiring at the given timestamp.
    #[must_use]
    pub fn new(volume: impl Into<String>, name: impl Into<String>, expires: i64) -> Self {
        Self {
            volume: volume.into(),
            name: name.into(),
            created_manually: true,
            expires_type: "date".to_string(),
            expires,
            description: None,
            quiesce: None,
        }
    }

    /// Create a never-expiring snapshot request.
    #[must_use]
    pub fn never_expiring(volume: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            volume: volume.into(),
            name: name.into(),
            created_manually: true,
            expires_type: "never".to_string(),
            expires: 0,
            description: None,
            quiesce: None,
        }
    }
}

/// A CIFS/SMB share record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CifsShare {
    /// Record key; a 40-character hex string.
    #[serde(rename = "$key")]
    pub key: String,
    /// Share name.
    #[serde(default)]
    pub name: Option<String>,
    /// Share description.
    #[serde(default)]
    pub description: Option<String>,
    /// Whether the share is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,
    /// Path within the volume; empty shares the entire volume.
    #[serde(default)]
    pub share_path: Option<String>,
    /// Comment visible to clients.
    #[serde(default)]
    pub comment: Option<String>,
    /// Whether the share is visible in network browsing.
    #[serde(default)]
    pub browseable: Option<bool>,
    /// Whether the share is read-only.
    #[serde(default)]
    pub read_only: Option<bool>,
    /// Allow guest access.
    #[serde(default)]
    pub guest_ok: Option<bool>,
    /// Only allow guest connections.
    #[serde(default)]
    pub guest_only: Option<bool>,
    /// All operations performed as this user.
    #[serde(default)]
    pub force_user: Option<String>,
    /// Default primary group for connecting users.
    #[serde(default)]
    pub force_group: Option<String>,
    /// Newline-separated usernames allowed to connect.
    #[serde(default)]
    pub valid_users: Option<String>,
    /// Newline-separated group names allowed to connect.
    #[serde(default)]
    pub valid_groups: Option<String>,
    /// Newline-separated users with admin privileges.
    #[serde(default)]
    pub admin_users: Option<String>,
    /// Newline-separated allowed hosts.
    #[serde(default)]
    pub host_allow: Option<String>,
    /// Newline-separated denied hosts.
    #[serde(default)]
    pub host_deny: Option<String>,
    /// Previous Versions (shadow copy) support.
    #[serde(default)]
    pub vfs_shadow_copy2: Option<bool>,
    /// Parent volume key.
    #[serde(default)]
    pub volume: Option<String>,
    /// Parent volume name.
    #[serde(default)]
    pub volume_name: Option<String>,
    /// Share status.
    #[serde(default)]
    pub status: Option<String>,
}

/// Request body for creating a CIFS share.
#[derive(Debug, Clone, Serialize)]
pub struct CreateCifsShareRequest {
    /// Parent volume key.
    pub volume: String,
    /// Share name.
    pub name: String,
    /// Whether the share starts enabled.
    pub enabled: bool,
    /// Whether the share is visible in network browsing.
    pub browseable: bool,
    /// Path within the volume to share.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_path: Option<String>,
    /// Share description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Comment visible to clients.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Create as read-only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
    /// Allow guest access.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_ok: Option<bool>,
    /// Only allow guest connections.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_only: Option<bool>,
    /// All operations performed as this user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force_user: Option<String>,
    /// Newline-separated usernames allowed to connect.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_users: Option<String>,
    /// Newline-separated allowed hosts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_allow: Option<String>,
    /// Enable Previous Versions support.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vfs_shadow_copy2: Option<bool>,
}

impl CreateCifsShareRequest {
    /// Create a share request with the API's defaults.
    #[must_use]
    pub fn new(volume: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            volume: volume.into(),
            name: name.into(),
            enabled: true,
            browseable: true,
            share_path: None,
            description: None,
            comment: None,
            read_only: None,
            guest_ok: None,
            guest_only: None,
            force_user: None,
            valid_users: None,
            host_allow: None,
            vfs_shadow_copy2: None,
        }
    }

    /// Restrict the share to these users; joined with newlines on the wire.
    #[must_use]
    pub fn with_valid_users<I, S>(mut self, users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.valid_users = Some(
            users
                .into_iter()
                .map(|u| u.as_ref().to_string())
                .collect::<Vec<_>>()
                .join("\n"),
        );
        self
    }

    /// Share a path within the volume instead of the whole volume.
    #[must_use]
    pub fn with_share_path(mut self, path: impl Into<String>) -> Self {
        self.share_path = Some(path.into());
        self
    }
}

/// An NFS share record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NfsShare {
    /// Record key; a 40-character hex string.
    #[serde(rename = "$key")]
    pub key: String,
    /// Share name.
    #[serde(default)]
    pub name: Option<String>,
    /// Share description.
    #[serde(default)]
    pub description: Option<String>,
    /// Whether the share is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,
    /// Path within the volume; empty shares the entire volume.
    #[serde(default)]
    pub share_path: Option<String>,
    /// Allowed hosts/networks, comma separated.
    #[serde(default)]
    pub allowed_hosts: Option<String>,
    /// Export filesystem ID.
    #[serde(default)]
    pub fsid: Option<String>,
    /// Anonymous user ID for squashed users.
    #[serde(default)]
    pub anonuid: Option<i64>,
    /// Anonymous group ID for squashed users.
    #[serde(default)]
    pub anongid: Option<i64>,
    /// Disable ACL support.
    #[serde(default)]
    pub no_acl: Option<bool>,
    /// Allow connections from non-privileged ports.
    #[serde(default)]
    pub insecure: Option<bool>,
    /// Async mode for better performance.
    #[serde(default, rename = "async")]
    pub async_mode: Option<bool>,
    /// User/group squashing mode.
    #[serde(default)]
    pub squash: Option<String>,
    /// Read-only or read-write access (ro, rw).
    #[serde(default)]
    pub data_access: Option<String>,
    /// Allow all hosts to access the export.
    #[serde(default)]
    pub allow_all: Option<bool>,
    /// Parent volume key.
    #[serde(default)]
    pub volume: Option<String>,
    /// Parent volume name.
    #[serde(default)]
    pub volume_name: Option<String>,
    /// Share status.
    #[serde(default)]
    pub status: Option<String>,
}

/// Request body for creating an NFS share.
#[derive(Debug, Clone, Serialize)]
pub struct CreateNfsShareRequest {
    /// Parent volume key.
    pub volume: String,
    /// Share name.
    pub name: String,
    /// Whether the share starts enabled.
    pub enabled: bool,
    /// Path within the volume to share.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_path: Option<String>,
    /// Allowed hosts/networks, comma separated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_hosts: Option<String>,
    /// Allow all hosts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_all: Option<bool>,
    /// User/group squashing mode (root_squash, all_squash, no_root_squash).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub squash: Option<String>,
    /// Read-only or read-write access (ro, rw).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_access: Option<String>,
    /// Anonymous user ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anonuid: Option<i64>,
    /// Anonymous group ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anongid: Option<i64>,
    /// Allow connections from non-privileged ports.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insecure: Option<bool>,
    /// Async mode.
    #[serde(skip_serializing_if = "Option::is_none", rename = "async")]
    pub async_mode: Option<bool>,
}

impl CreateNfsShareRequest {
    /// Create a share request with the API's defaults.
    #[must_use]
    pub fn new(volume: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            volume: volume.into(),
            name: name.into(),
            enabled: true,
            share_path: None,
            allowed_hosts: None,
            allow_all: None,
            squash: None,
            data_access: None,
            anonuid: None,
            anongid: None,
            insecure: None,
            async_mode: None,
        }
    }

    /// Restrict the export to these hosts/networks.
    #[must_use]
    pub fn with_allowed_hosts(mut self, hosts: impl Into<String>) -> Self {
        self.allowed_hosts = Some(hosts.into());
        self
    }
}

/// Parameters for listing volumes.
#[derive(Debug, Default, Clone)]
pub struct VolumeListParams {
    /// Extra filter expression.
    pub filter: Option<String>,
    /// Filter by enabled state.
    pub enabled: Option<bool>,
    /// Filter by filesystem type.
    pub fs_type: Option<String>,
    /// Filter by NAS service key.
    pub service: Option<u64>,
    /// Maximum number of results.
    pub limit: Option<u32>,
    /// Skip this many results.
    pub offset: Option<u32>,
}

impl VolumeListParams {
    /// Create empty list parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by enabled state.
    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    /// Filter by filesystem type.
    #[must_use]
    pub fn with_fs_type(mut self, fs_type: impl Into<String>) -> Self {
        self.fs_type = Some(fs_type.into());
        self
    }

    /// Filter by NAS service key.
    #[must_use]
    pub const fn with_service(mut self, service: u64) -> Self {
        self.service = Some(service);
        self
    }

    /// Combined filter expression, joined with `and`.
    ///
    /// The API stores enabled as an integer, so boolean filters use `1`/`0`.
    #[must_use]
    pub fn filter_expression(&self) -> Option<String> {
        let mut parts: Vec<String> = Vec::new();
        if let Some(filter) = &self.filter {
            parts.push(filter.clone());
        }
        if let Some(enabled) = self.enabled {
            parts.push(format!("enabled eq {}", u8::from(enabled)));
        }
        if let Some(fs_type) = &self.fs_type {
            parts.push(format!("fs_type eq '{fs_type}'"));
        }
        if let Some(service) = self.service {
            parts.push(format!("service eq {service}"));
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" and "))
        }
    }
}
