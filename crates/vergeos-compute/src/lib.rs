//! Compute client and data models for VergeOS.
//!
//! Provides typed structures and an asynchronous client for virtual machines,
//! power actions, drives, NICs and VM snapshots.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod models;

pub use client::ComputeClient;
pub use models::{
    cloudinit_datasource_api_value, drive_interface_display, drive_media_display,
    nic_interface_display, normalize_ram, CreateDriveRequest, CreateNicRequest,
    CreateSnapshotRequest, CreateVmRequest, Drive, Nic, PowerAction, UpdateVmRequest, Vm,
    VmActionRequest, VmListParams, VmSnapshot, DRIVE_DEFAULT_FIELDS, NIC_DEFAULT_FIELDS,
    SNAPSHOT_DEFAULT_FIELDS, VM_DEFAULT_FIELDS,
};

/// Convenient result alias that reuses the shared VergeOS error type.
pub type Result<T> = vergeos_core::Result<T>;
