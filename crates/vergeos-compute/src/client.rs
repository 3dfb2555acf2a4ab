//! Asynchronous client for VM, drive, NIC and snapshot operations.

use crate::models::{
    cloudinit_datasource_api_value, normalize_ram, CreateDriveRequest, CreateNicRequest,
    CreateSnapshotRequest, CreateVmRequest, Drive, Nic, PowerAction, UpdateVmRequest, Vm,
    VmActionRequest, VmListParams, VmSnapshot, DRIVE_DEFAULT_FIELDS, NIC_DEFAULT_FIELDS,
    SNAPSHOT_DEFAULT_FIELDS, VM_DEFAULT_FIELDS,
};
use crate::Result;
use serde_json::{json, Value};
use vergeos_core::{ApiClient, Error, ListQuery};

const VMS_ENDPOINT: &str = "vms";
const VM_ACTIONS_ENDPOINT: &str = "vm_actions";
const DRIVES_ENDPOINT: &str = "machine_drives";
const NICS_ENDPOINT: &str = "machine_nics";
const SNAPSHOTS_ENDPOINT: &str = "machine_snapshots";

/// Client for compute resources, sharing a [`vergeos_core::ApiClient`].
#[derive(Clone)]
pub struct ComputeClient {
    api: ApiClient,
}

impl ComputeClient {
    /// Wrap an existing API client.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// List VMs. Snapshot records are excluded unless the parameters request
    /// them.
    pub async fn list_vms(&self, params: &VmListParams) -> Result<Vec<Vm>> {
        self.api.list(VMS_ENDPOINT, &params.to_query()).await
    }

    /// Fetch a VM by key with the rich default field set.
    pub async fn get_vm(&self, key: u64) -> Result<Vm> {
        self.api.get(VMS_ENDPOINT, key, VM_DEFAULT_FIELDS).await
    }

    /// Fetch a VM by name.
    pub async fn get_vm_by_name(&self, name: &str) -> Result<Vm> {
        self.api
            .get_by_name(VMS_ENDPOINT, name, VM_DEFAULT_FIELDS)
            .await
    }

    /// List VMs that are currently powered on.
    ///
    /// Filtered client-side; the API does not filter on joined status fields.
    pub async fn list_running_vms(&self) -> Result<Vec<Vm>> {
        let vms = self.list_vms(&VmListParams::new()).await?;
        Ok(vms.into_iter().filter(Vm::is_running).collect())
    }

    /// Create a VM.
    ///
    /// RAM is rounded up to the next 256 MiB multiple and a friendly
    /// cloud-init datasource name is mapped to its wire value. The create
    /// reply carries only a few fields, so the full record is re-fetched.
    pub async fn create_vm(&self, request: &CreateVmRequest) -> Result<Vm> {
        let mut request = request.clone();

        let normalized = normalize_ram(request.ram);
        if normalized != request.ram {
            tracing::info!(
                requested = request.ram,
                normalized,
                "RAM normalized to 256 MiB increment"
            );
            request.ram = normalized;
        }

        if let Some(datasource) = &request.cloudinit_datasource {
            let api_value = cloudinit_datasource_api_value(datasource).ok_or_else(|| {
                Error::Validation(format!(
                    "invalid cloudinit_datasource '{datasource}'; \
                     valid values: 'ConfigDrive', 'NoCloud', 'None'"
                ))
            })?;
            request.cloudinit_datasource = if api_value == "none" {
                None
            } else {
                Some(api_value.to_string())
            };
        }

        let created: Vm = self.api.create(VMS_ENDPOINT, &request).await?;
        self.get_vm(created.key).await
    }

    /// Update a VM and return the refreshed record.
    pub async fn update_vm(&self, key: u64, request: &UpdateVmRequest) -> Result<Vm> {
        self.api.update(VMS_ENDPOINT, key, request).await
    }

    /// Delete a VM.
    pub async fn delete_vm(&self, key: u64) -> Result<()> {
        self.api.delete(VMS_ENDPOINT, key).await
    }

    /// Submit an action to the `vm_actions` endpoint.
    pub async fn vm_action(&self, request: &VmActionRequest) -> Result<Option<Value>> {
        self.api.post(VM_ACTIONS_ENDPOINT, request).await
    }

    /// Power on a VM, optionally on a preferred node.
    pub async fn power_on(&self, vm: u64, preferred_node: Option<u64>) -> Result<()> {
        let mut request = VmActionRequest::new(vm, PowerAction::PowerOn);
        if let Some(node) = preferred_node {
            request = request.with_params(json!({ "preferred_node": node }));
        }
        self.vm_action(&request).await?;
        Ok(())
    }

    /// Power off a VM. Graceful ACPI shutdown by default; `force` kills the
    /// VM immediately.
    pub async fn power_off(&self, vm: u64, force: bool) -> Result<()> {
        let action = if force {
            PowerAction::Kill
        } else {
            PowerAction::PowerOff
        };
        self.vm_action(&VmActionRequest::new(vm, action)).await?;
        Ok(())
    }

    /// Hard reboot a VM.
    pub async fn reset(&self, vm: u64) -> Result<()> {
        self.vm_action(&VmActionRequest::new(vm, PowerAction::Reset))
            .await?;
        Ok(())
    }

    /// Send a reboot signal to the guest OS (requires guest agent).
    pub async fn guest_reboot(&self, vm: u64) -> Result<()> {
        self.vm_action(&VmActionRequest::new(vm, PowerAction::GuestReset))
            .await?;
        Ok(())
    }

    /// Send a shutdown signal to the guest OS (requires guest agent).
    pub async fn guest_shutdown(&self, vm: u64) -> Result<()> {
        self.vm_action(&VmActionRequest::new(vm, PowerAction::GuestShutdown))
            .await?;
        Ok(())
    }

    /// Clone a VM, returning the clone task reply.
    pub async fn clone_vm(
        &self,
        vm: u64,
        name: Option<&str>,
        preserve_macs: bool,
    ) -> Result<Option<Value>> {
        let mut params = json!({ "preserve_macs": preserve_macs });
        if let Some(name) = name {
            params["name"] = Value::String(name.to_string());
        }
        self.vm_action(&VmActionRequest::new(vm, PowerAction::Clone).with_params(params))
            .await
    }

    /// List drives attached to a machine, ordered by attach order.
    pub async fn list_drives(&self, machine: u64, media: Option<&str>) -> Result<Vec<Drive>> {
        let mut filter = format!("machine eq {machine}");
        if let Some(media) = media {
            filter.push_str(&format!(" and media eq '{media}'"));
        }
        let query = ListQuery::new()
            .with_filter_str(filter)
            .with_fields(DRIVE_DEFAULT_FIELDS.iter().copied())
            .with_sort("+orderid");
        self.api.list(DRIVES_ENDPOINT, &query).await
    }

    /// Fetch a drive by key.
    pub async fn get_drive(&self, key: u64) -> Result<Drive> {
        self.api.get(DRIVES_ENDPOINT, key, DRIVE_DEFAULT_FIELDS).await
    }

    /// Create a drive and re-fetch the full record.
    pub async fn create_drive(&self, request: &CreateDriveRequest) -> Result<Drive> {
        if request.media == "disk" && request.disksize.is_none() {
            return Err(Error::Validation(
                "disksize is required for disk media".into(),
            ));
        }
        let created: Drive = self.api.create(DRIVES_ENDPOINT, request).await?;
        self.get_drive(created.key).await
    }

    /// Update drive fields.
    pub async fn update_drive(&self, key: u64, body: &Value) -> Result<Drive> {
        self.api.update(DRIVES_ENDPOINT, key, body).await
    }

    /// Delete a drive. The VM should typically be powered off first.
    pub async fn delete_drive(&self, key: u64) -> Result<()> {
        self.api.delete(DRIVES_ENDPOINT, key).await
    }

    /// List NICs attached to a machine, ordered by attach order.
    pub async fn list_nics(&self, machine: u64) -> Result<Vec<Nic>> {
        let query = ListQuery::new()
            .with_filter_str(format!("machine eq {machine}"))
            .with_fields(NIC_DEFAULT_FIELDS.iter().copied())
            .with_sort("+orderid");
        self.api.list(NICS_ENDPOINT, &query).await
    }

    /// Fetch a NIC by key.
    pub async fn get_nic(&self, key: u64) -> Result<Nic> {
        self.api.get(NICS_ENDPOINT, key, NIC_DEFAULT_FIELDS).await
    }

    /// Create a NIC and re-fetch the full record.
    pub async fn create_nic(&self, request: &CreateNicRequest) -> Result<Nic> {
        let created: Nic = self.api.create(NICS_ENDPOINT, request).await?;
        self.get_nic(created.key).await
    }

    /// Update NIC fields.
    pub async fn update_nic(&self, key: u64, body: &Value) -> Result<Nic> {
        self.api.update(NICS_ENDPOINT, key, body).await
    }

    /// Delete a NIC. The VM should typically be powered off first.
    pub async fn delete_nic(&self, key: u64) -> Result<()> {
        self.api.delete(NICS_ENDPOINT, key).await
    }

    /// List snapshots of a machine, most recent first.
    pub async fn list_snapshots(&self, machine: u64) -> Result<Vec<VmSnapshot>> {
        let query = ListQuery::new()
            .with_filter_str(format!("machine eq {machine}"))
            .with_fields(SNAPSHOT_DEFAULT_FIELDS.iter().copied())
            .with_sort("-created");
        self.api.list(SNAPSHOTS_ENDPOINT, &query).await
    }

    /// Fetch a snapshot by key.
    pub async fn get_snapshot(&self, key: u64) -> Result<VmSnapshot> {
        self.api
            .get(SNAPSHOTS_ENDPOINT, key, SNAPSHOT_DEFAULT_FIELDS)
            .await
    }

    /// Create a snapshot, returning the raw task reply.
    pub async fn create_snapshot(
        &self,
        request: &CreateSnapshotRequest,
    ) -> Result<Option<Value>> {
        self.api.post(SNAPSHOTS_ENDPOINT, request).await
    }

    /// Delete a snapshot.
    pub async fn delete_snapshot(&self, key: u64) -> Result<()> {
        self.api.delete(SNAPSHOTS_ENDPOINT, key).await
    }

    /// Restore a snapshot as a clone of the original VM.
    ///
    /// The snapshot's `snap_machine` points at a hidden snapshot VM; that VM
    /// is located and cloned under `name` (default `"{snapshot} restored"`).
    pub async fn restore_snapshot(
        &self,
        snapshot_key: u64,
        name: Option<&str>,
    ) -> Result<Option<Value>> {
        let snapshot = self.get_snapshot(snapshot_key).await?;
        let snap_machine = snapshot.snap_machine.ok_or_else(|| {
            Error::Validation(format!(
                "snapshot {snapshot_key} has no snap_machine reference"
            ))
        })?;

        let params = VmListParams::new()
            .with_filter_str(format!("machine eq {snap_machine}"))
            .with_fields(["$key", "name", "machine", "is_snapshot"])
            .include_snapshots();
        let candidates = self.list_vms(&params).await?;
        let snap_vm = candidates
            .into_iter()
            .find(|vm| vm.is_snapshot)
            .ok_or_else(|| {
                Error::NotFound(format!(
                    "snapshot VM with machine key {snap_machine} not found"
                ))
            })?;

        let restored_name = name.map_or_else(
            || format!("{} restored", snapshot.name.as_deref().unwrap_or("snapshot")),
            ToString::to_string,
        );

        self.vm_action(
            &VmActionRequest::new(snap_vm.key, PowerAction::Clone)
                .with_params(json!({ "name": restored_name })),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn test_client(server: &MockServer) -> ComputeClient {
        let api = vergeos_core::ApiClientBuilder::new(server.uri())
            .with_basic_auth("admin", "secret")
            .build()
            .unwrap();
        ComputeClient::new(api)
    }

    #[tokio::test]
    async fn list_vms_excludes_snapshots_by_default() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/vms"))
            .and(query_param("filter", "is_snapshot eq false"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "$key": 1, "name": "web-1", "running": true }
            ])))
            .mount(&server)
            .await;

        let vms = test_client(&server)
            .await
            .list_vms(&VmListParams::new())
            .await
            .unwrap();
        assert_eq!(vms.len(), 1);
        assert_eq!(vms[0].name, "web-1");
        assert!(vms[0].is_running());
    }

    #[tokio::test]
    async fn create_vm_rounds_ram_and_refetches() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v4/vms"))
            .and(body_partial_json(serde_json::json!({
                "name": "db-1",
                "ram": 1024,
                "cpu_cores": 2
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "$key": 42, "name": "db-1" })),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v4/vms/42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "$key": 42,
                "name": "db-1",
                "ram": 1024,
                "cpu_cores": 2,
                "status": "stopped"
            })))
            .mount(&server)
            .await;

        let vm = test_client(&server)
            .await
            .create_vm(
                &CreateVmRequest::new("db-1")
                    .with_ram(1000)
                    .with_cpu_cores(2),
            )
            .await
            .unwrap();
        assert_eq!(vm.key, 42);
        assert_eq!(vm.ram, Some(1024));
        assert_eq!(vm.status.as_deref(), Some("stopped"));
    }

    #[tokio::test]
    async fn create_vm_rejects_unknown_datasource() {
        let server = MockServer::start().await;
        let err = test_client(&server)
            .await
            .create_vm(&CreateVmRequest::new("x").with_cloudinit_datasource("floppy"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn power_off_force_sends_kill() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v4/vm_actions"))
            .and(body_partial_json(serde_json::json!({
                "vm": 7,
                "action": "kill"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        test_client(&server).await.power_off(7, true).await.unwrap();
    }

    #[tokio::test]
    async fn power_on_carries_preferred_node() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v4/vm_actions"))
            .and(body_partial_json(serde_json::json!({
                "vm": 7,
                "action": "poweron",
                "params": { "preferred_node": 3 }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        test_client(&server)
            .await
            .power_on(7, Some(3))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn list_drives_scopes_to_machine_and_media() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/machine_drives"))
            .and(query_param("filter", "machine eq 9 and media eq 'disk'"))
            .and(query_param("sort", "+orderid"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "$key": 5, "name": "root", "interface": "virtio-scsi", "media": "disk" }
            ])))
            .mount(&server)
            .await;

        let drives = test_client(&server)
            .await
            .list_drives(9, Some("disk"))
            .await
            .unwrap();
        assert_eq!(drives.len(), 1);
        assert_eq!(drives[0].interface_display(), "Virtio-SCSI");
    }

    #[tokio::test]
    async fn create_drive_requires_size_for_disk_media() {
        let server = MockServer::start().await;
        let mut request = CreateDriveRequest::disk(9, 10);
        request.disksize = None;
        let err = test_client(&server)
            .await
            .create_drive(&request)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn restore_snapshot_clones_hidden_snapshot_vm() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/machine_snapshots/8"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "$key": 8,
                "name": "before-upgrade",
                "machine": 4,
                "snap_machine": 77
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v4/vms"))
            .and(query_param("filter", "machine eq 77"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "$key": 90, "name": "hidden", "machine": 77, "is_snapshot": true }
            ])))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v4/vm_actions"))
            .and(body_partial_json(serde_json::json!({
                "vm": 90,
                "action": "clone",
                "params": { "name": "before-upgrade restored" }
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "task": 5 })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let reply = test_client(&server)
            .await
            .restore_snapshot(8, None)
            .await
            .unwrap();
        assert_eq!(reply.unwrap()["task"], 5);
    }
}
