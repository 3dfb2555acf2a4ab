//! Data models for VMs, drives, NICs and snapshots.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use vergeos_core::{Filter, ListQuery};

/// Rich default field set requested for VM records.
///
/// Uses the API's `#` join syntax to pull status, node and cluster details
/// from the underlying machine record in a single request.
pub const VM_DEFAULT_FIELDS: &[&str] = &[
    "$key",
    "name",
    "description",
    "enabled",
    "cpu_cores",
    "ram",
    "os_family",
    "guest_agent",
    "uefi",
    "secure_boot",
    "machine_type",
    "created",
    "modified",
    "is_snapshot",
    "machine",
    "machine#status#status as status",
    "machine#status#running as running",
    "machine#status#node as node_key",
    "machine#status#node#name as node_name",
    "machine#cluster as cluster_key",
    "machine#cluster#name as cluster_name",
    "machine#ha_group as ha_group",
    "cloudinit_datasource",
];

/// Default field set requested for drive records.
pub const DRIVE_DEFAULT_FIELDS: &[&str] = &[
    "$key",
    "name",
    "orderid",
    "interface",
    "media",
    "description",
    "enabled",
    "serial",
    "preferred_tier",
    "readonly",
    "disksize",
    "used_bytes",
    "media_source",
    "machine",
    "status#status as status",
    "status#display(status) as status_display",
    "media_source#name as media_file",
    "media_source#allocated_bytes as allocated_bytes",
];

/// Default field set requested for NIC records.
pub const NIC_DEFAULT_FIELDS: &[&str] = &[
    "$key",
    "name",
    "orderid",
    "interface",
    "description",
    "enabled",
    "macaddress",
    "ipaddress",
    "vnet",
    "machine",
    "status#status as status",
    "status#display(status) as status_display",
    "status#speed as speed",
    "vnet#$key as vnet_key",
    "vnet#name as vnet_name",
    "vnet#machine#status#status as vnet_status",
    "stats#rx_bytes as rx_bytes",
    "stats#tx_bytes as tx_bytes",
    "stats#rxbps as rxbps",
    "stats#txbps as txbps",
];

/// Default field set requested for VM snapshot records.
pub const SNAPSHOT_DEFAULT_FIELDS: &[&str] = &[
    "$key",
    "name",
    "description",
    "created",
    "expires",
    "expires_type",
    "quiesced",
    "created_manually",
    "machine",
    "snap_machine",
    "snapshot_period",
];

/// RAM allocations are made in 256 MiB increments.
pub const RAM_INCREMENT_MB: u64 = 256;

/// Round a RAM size in MiB up to the next allocation increment.
#[must_use]
pub const fn normalize_ram(ram_mb: u64) -> u64 {
    ram_mb.div_ceil(RAM_INCREMENT_MB) * RAM_INCREMENT_MB
}

/// Friendly display name for a drive interface wire value.
///
/// Unknown values are passed through unchanged.
#[must_use]
pub fn drive_interface_display(interface: &str) -> &str {
    match interface {
        "virtio" => "Virtio (Legacy)",
        "ide" => "IDE",
        "ahci" => "SATA (AHCI)",
        "nvme" => "NVMe",
        "virtio-scsi" => "Virtio-SCSI",
        "virtio-scsi-dedicated" => "Virtio-SCSI (Dedicated)",
        "lsi53c895a" => "LSI SCSI",
        "megasas" => "LSI MegaRAID SAS",
        "megasas-gen2" => "LSI MegaRAID SAS 2",
        "usb" => "USB",
        other => other,
    }
}

/// Friendly display name for a drive media wire value.
#[must_use]
pub fn drive_media_display(media: &str) -> &str {
    match media {
        "cdrom" => "CD-ROM",
        "disk" => "Disk",
        "efidisk" => "EFI Disk",
        "import" => "Import Disk",
        "9p" => "Pass-Through (9P)",
        "dir" => "Pass-Through (Directory)",
        "clone" => "Clone Disk",
        "nonpersistent" => "Non-Persistent",
        other => other,
    }
}

/// Friendly display name for a NIC interface wire value.
#[must_use]
pub fn nic_interface_display(interface: &str) -> &str {
    match interface {
        "virtio" => "Virtio",
        "e1000" => "Intel e1000",
        "e1000e" => "Intel e1000e",
        "rtl8139" => "Realtek 8139",
        "pcnet" => "AMD PCnet",
        "igb" => "Intel 82576",
        "vmxnet3" => "VMware Paravirt v3",
        "direct" => "Direct",
        other => other,
    }
}

/// Map a friendly cloud-init datasource name to its API value.
///
/// Accepts `ConfigDrive`, `NoCloud`, `None` and their wire spellings in any
/// case; returns `None` for unrecognized input.
#[must_use]
pub fn cloudinit_datasource_api_value(friendly: &str) -> Option<&'static str> {
    match friendly.to_ascii_lowercase().as_str() {
        "configdrive" | "config_drive_v2" => Some("config_drive_v2"),
        "nocloud" => Some("nocloud"),
        "none" | "" => Some("none"),
        _ => None,
    }
}

/// A virtual machine record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vm {
    /// Record key.
    #[serde(rename = "$key")]
    pub key: u64,
    /// VM name.
    pub name: String,
    /// VM description.
    #[serde(default)]
    pub description: Option<String>,
    /// Whether the VM is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,
    /// Number of CPU cores.
    #[serde(default)]
    pub cpu_cores: Option<u32>,
    /// RAM in MiB.
    #[serde(default)]
    pub ram: Option<u64>,
    /// OS family (linux, windows, freebsd, other).
    #[serde(default)]
    pub os_family: Option<String>,
    /// Whether the guest agent is enabled.
    #[serde(default)]
    pub guest_agent: Option<bool>,
    /// Whether UEFI boot is enabled.
    #[serde(default)]
    pub uefi: Option<bool>,
    /// Whether secure boot is enabled.
    #[serde(default)]
    pub secure_boot: Option<bool>,
    /// QEMU machine type.
    #[serde(default)]
    pub machine_type: Option<String>,
    /// Creation timestamp (seconds since epoch).
    #[serde(default)]
    pub created: Option<i64>,
    /// Last modification timestamp (seconds since epoch).
    #[serde(default)]
    pub modified: Option<i64>,
    /// Whether this record is a snapshot rather than a live VM.
    #[serde(default)]
    pub is_snapshot: bool,
    /// Underlying machine record key.
    #[serde(default)]
    pub machine: Option<u64>,
    /// Machine status (running, stopped, ...), joined from the machine record.
    #[serde(default)]
    pub status: Option<String>,
    /// Whether the VM is currently running.
    #[serde(default)]
    pub running: bool,
    /// Key of the node hosting the VM.
    #[serde(default)]
    pub node_key: Option<u64>,
    /// Name of the node hosting the VM.
    #[serde(default)]
    pub node_name: Option<String>,
    /// Key of the cluster the VM belongs to.
    #[serde(default)]
    pub cluster_key: Option<u64>,
    /// Name of the cluster the VM belongs to.
    #[serde(default)]
    pub cluster_name: Option<String>,
    /// HA group key, if assigned.
    #[serde(default)]
    pub ha_group: Option<i64>,
    /// Cloud-init datasource wire value.
    #[serde(default)]
    pub cloudinit_datasource: Option<String>,
}

impl Vm {
    /// Creation time as a UTC timestamp.
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created.and_then(|ts| Utc.timestamp_opt(ts, 0).single())
    }

    /// Returns true when the VM is powered on.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }
}

/// Parameters for listing VMs.
#[derive(Debug, Default, Clone)]
pub struct VmListParams {
    /// Extra filter expression to apply.
    pub filter: Option<String>,
    /// Fields to request; defaults to [`VM_DEFAULT_FIELDS`].
    pub fields: Option<Vec<String>>,
    /// Maximum number of results.
    pub limit: Option<u32>,
    /// Skip this many results.
    pub offset: Option<u32>,
    /// Include snapshot records in the listing.
    pub include_snapshots: bool,
}

impl VmListParams {
    /// Create empty list parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the filter from a [`Filter`] builder.
    #[must_use]
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = filter.into_query();
        self
    }

    /// Set the filter from a raw expression string.
    #[must_use]
    pub fn with_filter_str(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Override the requested field set.
    #[must_use]
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Set the result limit.
    #[must_use]
    pub const fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the result offset.
    #[must_use]
    pub const fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Include snapshot records in the listing.
    #[must_use]
    pub const fn include_snapshots(mut self) -> Self {
        self.include_snapshots = true;
        self
    }

    /// Convert to a [`ListQuery`], injecting the snapshot exclusion filter
    /// unless snapshots were requested.
    #[must_use]
    pub fn to_query(&self) -> ListQuery {
        let filter = if self.include_snapshots {
            self.filter.clone()
        } else {
            match &self.filter {
                Some(filter) => Some(format!("({filter}) and is_snapshot eq false")),
                None => Some("is_snapshot eq false".to_string()),
            }
        };

        let mut query = ListQuery::new();
        if let Some(filter) = filter {
            query = query.with_filter_str(filter);
        }
        query = match &self.fields {
            Some(fields) => query.with_fields(fields.iter().cloned()),
            None => query.with_fields(VM_DEFAULT_FIELDS.iter().copied()),
        };
        if let Some(limit) = self.limit {
            query = query.with_limit(limit);
        }
        if let Some(offset) = self.offset {
            query = query.with_offset(offset);
        }
        query
    }
}

/// Request body for creating a VM.
#[derive(Debug, Clone, Serialize)]
pub struct CreateVmRequest {
    /// VM name.
    pub name: String,
    /// RAM in MiB; rounded up to a 256 MiB multiple on create.
    pub ram: u64,
    /// Number of CPU cores.
    pub cpu_cores: u32,
    /// VM description.
    pub description: String,
    /// OS family (linux, windows, freebsd, other).
    pub os_family: String,
    /// QEMU machine type.
    pub machine_type: String,
    /// Cloud-init datasource wire value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloudinit_datasource: Option<String>,
    /// Whether the VM starts enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Whether to boot with UEFI firmware.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uefi: Option<bool>,
}

impl CreateVmRequest {
    /// Create a request with the API's defaults.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ram: 1024,
            cpu_cores: 1,
            description: String::new(),
            os_family: "linux".to_string(),
            machine_type: "pc-q35-10.0".to_string(),
            cloudinit_datasource: None,
            enabled: None,
            uefi: None,
        }
    }

    /// Set RAM in MiB.
    #[must_use]
    pub const fn with_ram(mut self, ram_mb: u64) -> Self {
        self.ram = ram_mb;
        self
    }

    /// Set the number of CPU cores.
    #[must_use]
    pub const fn with_cpu_cores(mut self, cores: u32) -> Self {
        self.cpu_cores = cores;
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the OS family.
    #[must_use]
    pub fn with_os_family(mut self, os_family: impl Into<String>) -> Self {
        self.os_family = os_family.into();
        self
    }

    /// Set the cloud-init datasource by friendly or wire name.
    #[must_use]
    pub fn with_cloudinit_datasource(mut self, datasource: impl Into<String>) -> Self {
        self.cloudinit_datasource = Some(datasource.into());
        self
    }
}

/// Request body for updating a VM. All fields optional.
#[derive(Debug, Default, Clone, Serialize)]
pub struct UpdateVmRequest {
    /// New name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New RAM in MiB.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ram: Option<u64>,
    /// New CPU core count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_cores: Option<u32>,
    /// Enable or disable the VM.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// New cloud-init datasource wire value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloudinit_datasource: Option<String>,
}

/// Power and lifecycle actions accepted by the `vm_actions` endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerAction {
    /// Power the VM on.
    PowerOn,
    /// Graceful ACPI shutdown.
    PowerOff,
    /// Immediate power off, like pulling the plug.
    Kill,
    /// Hard reboot.
    Reset,
    /// Reboot signal to the guest OS (requires guest agent).
    GuestReset,
    /// Shutdown signal to the guest OS (requires guest agent).
    GuestShutdown,
    /// Clone the VM.
    Clone,
}

impl PowerAction {
    /// Wire value for this action.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PowerOn => "poweron",
            Self::PowerOff => "poweroff",
            Self::Kill => "kill",
            Self::Reset => "reset",
            Self::GuestReset => "guestreset",
            Self::GuestShutdown => "guestshutdown",
            Self::Clone => "clone",
        }
    }
}

/// Request body for the `vm_actions` endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct VmActionRequest {
    /// Target VM key.
    pub vm: u64,
    /// Action to perform.
    pub action: PowerAction,
    /// Action-specific parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl VmActionRequest {
    /// Create an action request without parameters.
    #[must_use]
    pub const fn new(vm: u64, action: PowerAction) -> Self {
        Self {
            vm,
            action,
            params: None,
        }
    }

    /// Attach action parameters.
    #[must_use]
    pub fn with_params(mut self, params: Value) -> Self {
        self.params = Some(params);
        self
    }
}

/// A VM drive record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Drive {
    /// Record key.
    #[serde(rename = "$key")]
    pub key: u64,
    /// Drive name.
    #[serde(default)]
    pub name: Option<String>,
    /// Boot/attach ordering.
    #[serde(default)]
    pub orderid: Option<u32>,
    /// Interface wire value (virtio-scsi, nvme, ...).
    #[serde(default)]
    pub interface: Option<String>,
    /// Media wire value (disk, cdrom, efidisk, ...).
    #[serde(default)]
    pub media: Option<String>,
    /// Drive description.
    #[serde(default)]
    pub description: Option<String>,
    /// Whether the drive is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,
    /// Drive serial number.
    #[serde(default)]
    pub serial: Option<String>,
    /// Preferred storage tier.
    #[serde(default)]
    pub preferred_tier: Option<String>,
    /// Whether the drive is read-only.
    #[serde(default)]
    pub readonly: Option<bool>,
    /// Provisioned size in bytes.
    #[serde(default)]
    pub disksize: Option<u64>,
    /// Used space in bytes.
    #[serde(default)]
    pub used_bytes: Option<u64>,
    /// Media source file key, for CD-ROM and import media.
    #[serde(default)]
    pub media_source: Option<u64>,
    /// Owning machine key.
    #[serde(default)]
    pub machine: Option<u64>,
    /// Drive status.
    #[serde(default)]
    pub status: Option<String>,
    /// Friendly status text.
    #[serde(default)]
    pub status_display: Option<String>,
    /// Media source file name.
    #[serde(default)]
    pub media_file: Option<String>,
    /// Allocated bytes of the media source.
    #[serde(default)]
    pub allocated_bytes: Option<u64>,
}

impl Drive {
    /// Provisioned size in GiB.
    #[must_use]
    pub fn size_gb(&self) -> f64 {
        let bytes = self.disksize.or(self.allocated_bytes).unwrap_or(0);
        (bytes as f64 / f64::from(1u32 << 30) * 100.0).round() / 100.0
    }

    /// Friendly interface name.
    #[must_use]
    pub fn interface_display(&self) -> &str {
        drive_interface_display(self.interface.as_deref().unwrap_or(""))
    }

    /// Friendly media type name.
    #[must_use]
    pub fn media_display(&self) -> &str {
        drive_media_display(self.media.as_deref().unwrap_or(""))
    }
}

/// Request body for creating a drive.
#[derive(Debug, Clone, Serialize)]
pub struct CreateDriveRequest {
    /// Owning machine key.
    pub machine: u64,
    /// Interface wire value.
    pub interface: String,
    /// Media wire value.
    pub media: String,
    /// Whether the drive starts enabled.
    pub enabled: bool,
    /// Drive name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Provisioned size in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disksize: Option<u64>,
    /// Preferred storage tier (1-5), sent as a string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_tier: Option<String>,
    /// Drive description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Make the drive read-only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readonly: Option<bool>,
    /// Media source file key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_source: Option<u64>,
}

impl CreateDriveRequest {
    /// Create a disk drive request with the API's defaults.
    #[must_use]
    pub fn disk(machine: u64, size_gb: u64) -> Self {
        Self {
            machine,
            interface: "virtio-scsi".to_string(),
            media: "disk".to_string(),
            enabled: true,
            name: None,
            disksize: Some(size_gb * (1 << 30)),
            preferred_tier: None,
            description: None,
            readonly: None,
            media_source: None,
        }
    }

    /// Create a CD-ROM drive request backed by a media file.
    #[must_use]
    pub fn cdrom(machine: u64, media_source: u64) -> Self {
        Self {
            machine,
            interface: "ahci".to_string(),
            media: "cdrom".to_string(),
            enabled: true,
            name: None,
            disksize: None,
            preferred_tier: None,
            description: None,
            readonly: None,
            media_source: Some(media_source),
        }
    }

    /// Set the drive name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the interface wire value.
    #[must_use]
    pub fn with_interface(mut self, interface: impl Into<String>) -> Self {
        self.interface = interface.into();
        self
    }

    /// Set the preferred storage tier (1-5).
    #[must_use]
    pub fn with_tier(mut self, tier: u8) -> Self {
        self.preferred_tier = Some(tier.to_string());
        self
    }
}

/// A VM NIC record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Nic {
    /// Record key.
    #[serde(rename = "$key")]
    pub key: u64,
    /// NIC name.
    #[serde(default)]
    pub name: Option<String>,
    /// Attach ordering.
    #[serde(default)]
    pub orderid: Option<u32>,
    /// Interface wire value (virtio, e1000, ...).
    #[serde(default)]
    pub interface: Option<String>,
    /// NIC description.
    #[serde(default)]
    pub description: Option<String>,
    /// Whether the NIC is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,
    /// MAC address.
    #[serde(default)]
    pub macaddress: Option<String>,
    /// Static IP address.
    #[serde(default)]
    pub ipaddress: Option<String>,
    /// Connected network key.
    #[serde(default)]
    pub vnet: Option<u64>,
    /// Owning machine key.
    #[serde(default)]
    pub machine: Option<u64>,
    /// NIC status.
    #[serde(default)]
    pub status: Option<String>,
    /// Friendly status text.
    #[serde(default)]
    pub status_display: Option<String>,
    /// Link speed in Mbps.
    #[serde(default)]
    pub speed: Option<u64>,
    /// Connected network key (joined).
    #[serde(default)]
    pub vnet_key: Option<u64>,
    /// Connected network name.
    #[serde(default)]
    pub vnet_name: Option<String>,
    /// Status of the connected network.
    #[serde(default)]
    pub vnet_status: Option<String>,
    /// Received bytes.
    #[serde(default)]
    pub rx_bytes: Option<u64>,
    /// Transmitted bytes.
    #[serde(default)]
    pub tx_bytes: Option<u64>,
}

impl Nic {
    /// Friendly interface name.
    #[must_use]
    pub fn interface_display(&self) -> &str {
        nic_interface_display(self.interface.as_deref().unwrap_or(""))
    }

    /// Link speed formatted as Mbps or Gbps.
    #[must_use]
    pub fn speed_display(&self) -> Option<String> {
        let speed = self.speed?;
        if speed == 0 {
            return None;
        }
        if speed >= 1000 {
            Some(format!("{} Gbps", (speed as f64 / 100.0).round() / 10.0))
        } else {
            Some(format!("{speed} Mbps"))
        }
    }
}

/// Request body for creating a NIC.
#[derive(Debug, Clone, Serialize)]
pub struct CreateNicRequest {
    /// Owning machine key.
    pub machine: u64,
    /// Interface wire value.
    pub interface: String,
    /// Whether the NIC starts enabled.
    pub enabled: bool,
    /// NIC name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Network key to connect to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vnet: Option<u64>,
    /// MAC address (lowercase `xx:xx:xx:xx:xx:xx`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macaddress: Option<String>,
    /// Static IP address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipaddress: Option<String>,
    /// NIC description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CreateNicRequest {
    /// Create a NIC request with the API's defaults.
    #[must_use]
    pub fn new(machine: u64) -> Self {
        Self {
            machine,
            interface: "virtio".to_string(),
            enabled: true,
            name: None,
            vnet: None,
            macaddress: None,
            ipaddress: None,
            description: None,
        }
    }

    /// Connect to a network by key.
    #[must_use]
    pub const fn with_network(mut self, vnet: u64) -> Self {
        self.vnet = Some(vnet);
        self
    }

    /// Set the NIC name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the MAC address; normalized to lowercase.
    #[must_use]
    pub fn with_mac_address(mut self, mac: impl Into<String>) -> Self {
        self.macaddress = Some(mac.into().to_ascii_lowercase());
        self
    }
}

/// A VM snapshot record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VmSnapshot {
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
    /// Expiration timestamp (seconds since epoch, 0 for never).
    #[serde(default)]
    pub expires: Option<i64>,
    /// Expiration type.
    #[serde(default)]
    pub expires_type: Option<String>,
    /// Whether disk activity was quiesced.
    #[serde(default)]
    pub quiesced: Option<bool>,
    /// Whether the snapshot was created manually.
    #[serde(default)]
    pub created_manually: Option<bool>,
    /// Machine key the snapshot was taken from.
    #[serde(default)]
    pub machine: Option<u64>,
    /// Snapshot machine key, used for restore.
    #[serde(default)]
    pub snap_machine: Option<u64>,
    /// Cloud snapshot period key, if periodic.
    #[serde(default)]
    pub snapshot_period: Option<u64>,
}

impl VmSnapshot {
    /// Creation time as a UTC timestamp.
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created.and_then(|ts| Utc.timestamp_opt(ts, 0).single())
    }

    /// Expiration time as a UTC timestamp; `None` when the snapshot never
    /// expires.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires
            .filter(|&ts| ts > 0)
            .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
    }

    /// Returns true when the snapshot never expires.
    #[must_use]
    pub fn never_expires(&self) -> bool {
        self.expires_type.as_deref() == Some("never") || self.expires == Some(0)
    }
}

/// Request body for creating a snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct CreateSnapshotRequest {
    /// Machine key to snapshot.
    pub machine: u64,
    /// Snapshot name.
    pub name: String,
    /// Marks the snapshot as manually created.
    pub created_manually: bool,
    /// Quiesce disk activity (requires guest agent).
    pub quiesce: bool,
    /// Expiration timestamp; omitted for never-expiring snapshots.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<i64>,
    /// Snapshot description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CreateSnapshotRequest {
    /// Create a manual snapshot request.
    #[must_use]
    pub fn new(machine: u64, name: impl Into<String>) -> Self {
        Self {
            machine,
            name: name.into(),
            created_manually: true,
            quiesce: false,
            expires: None,
            description: None,
        }
    }

    /// Set the expiration timestamp.
    #[must_use]
    pub const fn with_expires(mut self, expires: i64) -> Self {
        self.expires = Some(expires);
        self
    }

    /// Quiesce disk activity before snapshotting.
    #[must_use]
    pub const fn with_quiesce(mut self, quiesce: bool) -> Self {
        self.quiesce = quiesce;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ram_rounds_up_to_increment() {
        assert_eq!(normalize_ram(1024), 1024);
        assert_eq!(normalize_ram(1000), 1024);
        assert_eq!(normalize_ram(1), 256);
        assert_eq!(normalize_ram(257), 512);
        assert_eq!(normalize_ram(0), 0);
    }

    #[test]
    fn drive_display_maps() {
        assert_eq!(drive_interface_display("virtio-scsi"), "Virtio-SCSI");
        assert_eq!(drive_interface_display("ahci"), "SATA (AHCI)");
        assert_eq!(drive_interface_display("megasas-gen2"), "LSI MegaRAID SAS 2");
        assert_eq!(drive_interface_display("mystery"), "mystery");
        assert_eq!(drive_media_display("cdrom"), "CD-ROM");
        assert_eq!(drive_media_display("9p"), "Pass-Through (9P)");
        assert_eq!(drive_media_display("unknown"), "unknown");
    }

    #[test]
    fn nic_display_map() {
        assert_eq!(nic_interface_display("virtio"), "Virtio");
        assert_eq!(nic_interface_display("vmxnet3"), "VMware Paravirt v3");
        assert_eq!(nic_interface_display("custom"), "custom");
    }

    #[test]
    fn cloudinit_datasource_mapping() {
        assert_eq!(
            cloudinit_datasource_api_value("ConfigDrive"),
            Some("config_drive_v2")
        );
        assert_eq!(
            cloudinit_datasource_api_value("config_drive_v2"),
            Some("config_drive_v2")
        );
        assert_eq!(cloudinit_datasource_api_value("NoCloud"), Some("nocloud"));
        assert_eq!(cloudinit_datasource_api_value("none"), Some("none"));
        assert_eq!(cloudinit_datasource_api_value(""), Some("none"));
        assert_eq!(cloudinit_datasource_api_value("bogus"), None);
    }

    #[test]
    fn vm_list_params_inject_snapshot_filter() {
        let query = VmListParams::new().to_query();
        let pairs = query.to_pairs();
        assert!(pairs.contains(&("filter", "is_snapshot eq false".to_string())));

        let query = VmListParams::new()
            .with_filter_str("enabled eq true")
            .to_query();
        let pairs = query.to_pairs();
        assert!(pairs.contains(&(
            "filter",
            "(enabled eq true) and is_snapshot eq false".to_string()
        )));

        let query = VmListParams::new().include_snapshots().to_query();
        assert!(!query.to_pairs().iter().any(|(key, _)| *key == "filter"));
    }

    #[test]
    fn power_action_wire_values() {
        assert_eq!(PowerAction::PowerOn.as_str(), "poweron");
        assert_eq!(PowerAction::GuestShutdown.as_str(), "guestshutdown");
        assert_eq!(
            serde_json::to_string(&PowerAction::GuestReset).unwrap(),
            "\"guestreset\""
        );
    }

    #[test]
    fn vm_action_request_serializes_params_only_when_set() {
        let body =
            serde_json::to_value(VmActionRequest::new(7, PowerAction::PowerOff)).unwrap();
        assert_eq!(body["vm"], 7);
        assert_eq!(body["action"], "poweroff");
        assert!(body.get("params").is_none());

        let body = serde_json::to_value(
            VmActionRequest::new(7, PowerAction::PowerOn)
                .with_params(serde_json::json!({"preferred_node": 2})),
        )
        .unwrap();
        assert_eq!(body["params"]["preferred_node"], 2);
    }

    #[test]
    fn create_drive_request_converts_gb_to_bytes() {
        let request = CreateDriveRequest::disk(12, 40);
        assert_eq!(request.disksize, Some(40 * 1024 * 1024 * 1024));
        assert_eq!(request.media, "disk");
        assert_eq!(request.interface, "virtio-scsi");
    }

    #[test]
    fn snapshot_expiry_helpers() {
        let snapshot = VmSnapshot {
            key: 1,
            name: Some("nightly".into()),
            description: None,
            created: Some(1_700_000_000),
            expires: Some(0),
            expires_type: None,
            quiesced: Some(false),
            created_manually: Some(true),
            machine: Some(4),
            snap_machine: Some(9),
            snapshot_period: None,
        };
        assert!(snapshot.never_expires());
        assert!(snapshot.expires_at().is_none());
        assert!(snapshot.created_at().is_some());
    }
}
