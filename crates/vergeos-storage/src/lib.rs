//! NAS service, volume, snapshot and file share operations for the VergeOS
//! v4 API.
//!
//! Storage in VergeOS is organized under NAS services (specialized VMs that
//! serve files), which own volumes (virtual filesystems), which in turn carry
//! snapshots and CIFS/NFS shares. Volumes and shares are keyed by
//! 40-character hex strings rather than the integer keys used elsewhere.
//!
//! # Example
//!
//! ```no_run
//! use vergeos_core::VergeConfig;
//! use vergeos_storage::{CreateVolumeRequest, StorageClient, VolumeListParams};
//!
//! # async fn example() -> vergeos_storage::Result<()> {
//! let api = VergeConfig::new("verge.example.com")?
//!     .with_credentials("admin", "secret")
//!     .build_client()?;
//! let storage = StorageClient::new(api);
//!
//! let services = storage.list_nas_services().await?;
//! let volume = storage
//!     .create_volume(&CreateVolumeRequest::new("FileShare", services[0].key, 500))
//!     .await?;
//!
//! let enabled = storage
//!     .list_volumes(&VolumeListParams::new().with_enabled(true))
//!     .await?;
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod models;

pub use client::StorageClient;
pub use models::{
    CifsShare, CreateCifsShareRequest, CreateNfsShareRequest, CreateVolumeRequest,
    CreateVolumeSnapshotRequest, NasService, NasVolume, NasVolumeSnapshot, NfsShare,
    UpdateVolumeRequest, VolumeListParams, CIFS_SHARE_DEFAULT_FIELDS, NAS_SERVICE_DEFAULT_FIELDS,
    NFS_SHARE_DEFAULT_FIELDS, VOLUME_DEFAULT_FIELDS, VOLUME_SNAPSHOT_DEFAULT_FIELDS,
};

/// Convenience alias re-exporting the core result type.
pub type Result<T> = vergeos_core::Result<T>;
