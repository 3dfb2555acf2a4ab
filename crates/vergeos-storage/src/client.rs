//! Client for NAS service, volume, snapshot and file share operations.

use serde_json::Value;
use vergeos_core::{ApiClient, Error, Filter, ListQuery, Result};

use crate::models::{
    CifsShare, CreateCifsShareRequest, CreateNfsShareRequest, CreateVolumeRequest,
    CreateVolumeSnapshotRequest, NasService, NasVolume, NasVolumeSnapshot, NfsShare,
    UpdateVolumeRequest, VolumeListParams, CIFS_SHARE_DEFAULT_FIELDS, NAS_SERVICE_DEFAULT_FIELDS,
    NFS_SHARE_DEFAULT_FIELDS, VOLUME_DEFAULT_FIELDS, VOLUME_SNAPSHOT_DEFAULT_FIELDS,
};

const NAS_SERVICES_ENDPOINT: &str = "vm_services";
const VOLUMES_ENDPOINT: &str = "volumes";
const VOLUME_SNAPSHOTS_ENDPOINT: &str = "volume_snapshots";
const CIFS_SHARES_ENDPOINT: &str = "volume_cifs_shares";
const NFS_SHARES_ENDPOINT: &str = "volume_nfs_shares";

/// Client for the storage endpoints of one VergeOS system.
///
/// Wraps a shared [`ApiClient`]; cloning is cheap.
#[derive(Clone)]
pub struct StorageClient {
    api: ApiClient,
}

impl StorageClient {
    /// Create a storage client over an established API client.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    // NAS services

    /// List NAS services.
    pub async fn list_nas_services(&self) -> Result<Vec<NasService>> {
        let query = ListQuery::new().with_fields(NAS_SERVICE_DEFAULT_FIELDS.iter().copied());
        self.api.list(NAS_SERVICES_ENDPOINT, &query).await
    }

    /// Fetch a NAS service by key.
    pub async fn get_nas_service(&self, key: u64) -> Result<NasService> {
        self.api
            .get(NAS_SERVICES_ENDPOINT, key, NAS_SERVICE_DEFAULT_FIELDS)
            .await
    }

    /// Fetch a NAS service by name.
    pub async fn get_nas_service_by_name(&self, name: &str) -> Result<NasService> {
        self.api
            .get_by_name(NAS_SERVICES_ENDPOINT, name, NAS_SERVICE_DEFAULT_FIELDS)
            .await
    }

    // Volumes

    /// List volumes, optionally filtered.
    pub async fn list_volumes(&self, params: &VolumeListParams) -> Result<Vec<NasVolume>> {
        let mut query = ListQuery::new().with_fields(VOLUME_DEFAULT_FIELDS.iter().copied());
        if let Some(filter) = params.filter_expression() {
            query = query.with_filter_str(filter);
        }
        if let Some(limit) = params.limit {
            query = query.with_limit(limit);
        }
        if let Some(offset) = params.offset {
            query = query.with_offset(offset);
        }
        self.api.list(VOLUMES_ENDPOINT, &query).await
    }

    /// Fetch a volume by its hex-string key.
    ///
    /// Volume keys cannot be used as a path segment, so the lookup goes
    /// through an `id` filter.
    pub async fn get_volume(&self, key: &str) -> Result<NasVolume> {
        let query = ListQuery::new()
            .with_filter(Filter::new().eq("id", key))
            .with_fields(VOLUME_DEFAULT_FIELDS.iter().copied())
            .with_limit(1);

        let mut volumes: Vec<NasVolume> = self.api.list(VOLUMES_ENDPOINT, &query).await?;
        if volumes.is_empty() {
            return Err(Error::NotFound(format!("volume '{key}' not found")));
        }
        Ok(volumes.remove(0))
    }

    /// Fetch a volume by name.
    pub async fn get_volume_by_name(&self, name: &str) -> Result<NasVolume> {
        self.api
            .get_by_name(VOLUMES_ENDPOINT, name, VOLUME_DEFAULT_FIELDS)
            .await
    }

    /// Create a volume and return the full record.
    ///
    /// The create reply is sparse, so the record is re-fetched. Replies that
    /// carry neither `$key` nor `id` fall back to a lookup by name.
    pub async fn create_volume(&self, request: &CreateVolumeRequest) -> Result<NasVolume> {
        tracing::info!(name = %request.name, service = request.service, "creating volume");
        let reply = self.api.post(VOLUMES_ENDPOINT, request).await?;

        let key = reply.as_ref().and_then(|value| {
            value
                .get("$key")
                .or_else(|| value.get("id"))
                .and_then(Value::as_str)
                .map(ToString::to_string)
        });

        match key {
            Some(key) => self.get_volume(&key).await,
            None => self.get_volume_by_name(&request.name).await,
        }
    }

    /// Update a volume and return the refreshed record.
    pub async fn update_volume(
        &self,
        key: &str,
        request: &UpdateVolumeRequest,
    ) -> Result<NasVolume> {
        if request.is_empty() {
            return self.get_volume(key).await;
        }
        let path_key = self.resolve_volume_row_key(key).await?;
        self.api
            .update::<_, Value>(VOLUMES_ENDPOINT, &path_key, request)
            .await?;
        self.get_volume(key).await
    }

    /// Delete a volume.
    pub async fn delete_volume(&self, key: &str) -> Result<()> {
        let path_key = self.resolve_volume_row_key(key).await?;
        self.api.delete(VOLUMES_ENDPOINT, &path_key).await
    }

    /// Enable a volume.
    pub async fn enable_volume(&self, key: &str) -> Result<NasVolume> {
        self.set_volume_enabled(key, true).await
    }

    /// Disable a volume.
    pub async fn disable_volume(&self, key: &str) -> Result<NasVolume> {
        self.set_volume_enabled(key, false).await
    }

    async fn set_volume_enabled(&self, key: &str, enabled: bool) -> Result<NasVolume> {
        let request = UpdateVolumeRequest {
            enabled: Some(enabled),
            ..UpdateVolumeRequest::default()
        };
        self.update_volume(key, &request).await
    }

    /// Remount a volume by issuing the `reset` action.
    pub async fn reset_volume(&self, key: &str) -> Result<()> {
        let path_key = self.resolve_volume_row_key(key).await?;
        self.api
            .action::<Value>(VOLUMES_ENDPOINT, &path_key, "reset", None)
            .await?;
        Ok(())
    }

    /// Resolve the row key used in URL paths for a volume.
    ///
    /// The key and id are normally identical, but the lookup confirms the
    /// volume exists and yields a NotFound with context when it does not.
    async fn resolve_volume_row_key(&self, key: &str) -> Result<String> {
        let volume = self.get_volume(key).await?;
        Ok(volume.key)
    }

    // Volume snapshots

    /// List snapshots of a volume, newest first.
    pub async fn list_volume_snapshots(&self, volume: &str) -> Result<Vec<NasVolumeSnapshot>> {
        let query = ListQuery::new()
            .with_filter(Filter::new().eq("volume", volume))
            .with_fields(VOLUME_SNAPSHOT_DEFAULT_FIELDS.iter().copied())
            .with_sort("-created");
        self.api.list(VOLUME_SNAPSHOTS_ENDPOINT, &query).await
    }

    /// Fetch a volume snapshot by key.
    pub async fn get_volume_snapshot(&self, key: u64) -> Result<NasVolumeSnapshot> {
        self.api
            .get(VOLUME_SNAPSHOTS_ENDPOINT, key, VOLUME_SNAPSHOT_DEFAULT_FIELDS)
            .await
    }

    /// Create a volume snapshot.
    pub async fn create_volume_snapshot(
        &self,
        request: &CreateVolumeSnapshotRequest,
    ) -> Result<Option<Value>> {
        tracing::info!(
            volume = %request.volume,
            name = %request.name,
            "creating volume snapshot"
        );
        self.api.post(VOLUME_SNAPSHOTS_ENDPOINT, request).await
    }

    /// Delete a volume snapshot.
    pub async fn delete_volume_snapshot(&self, key: u64) -> Result<()> {
        self.api.delete(VOLUME_SNAPSHOTS_ENDPOINT, key).await
    }

    // CIFS shares

    /// List CIFS shares, optionally scoped to a volume.
    pub async fn list_cifs_shares(&self, volume: Option<&str>) -> Result<Vec<CifsShare>> {
        let mut query = ListQuery::new().with_fields(CIFS_SHARE_DEFAULT_FIELDS.iter().copied());
        if let Some(volume) = volume {
            query = query.with_filter(Filter::new().eq("volume", volume));
        }
        self.api.list(CIFS_SHARES_ENDPOINT, &query).await
    }

    /// Fetch a CIFS share by its hex-string key.
    pub async fn get_cifs_share(&self, key: &str) -> Result<CifsShare> {
        self.api
            .get(CIFS_SHARES_ENDPOINT, key, CIFS_SHARE_DEFAULT_FIELDS)
            .await
    }

    /// Create a CIFS share and return the full record.
    pub async fn create_cifs_share(&self, request: &CreateCifsShareRequest) -> Result<CifsShare> {
        tracing::info!(volume = %request.volume, name = %request.name, "creating CIFS share");
        let reply = self.api.post(CIFS_SHARES_ENDPOINT, request).await?;

        match share_key_from_reply(reply.as_ref()) {
            Some(key) => self.get_cifs_share(&key).await,
            None => {
                self.api
                    .get_by_name(CIFS_SHARES_ENDPOINT, &request.name, CIFS_SHARE_DEFAULT_FIELDS)
                    .await
            }
        }
    }

    /// Update a CIFS share and return the refreshed record.
    pub async fn update_cifs_share(&self, key: &str, body: &Value) -> Result<CifsShare> {
        self.api
            .update::<_, Value>(CIFS_SHARES_ENDPOINT, key, body)
            .await?;
        self.get_cifs_share(key).await
    }

    /// Delete a CIFS share.
    pub async fn delete_cifs_share(&self, key: &str) -> Result<()> {
        self.api.delete(CIFS_SHARES_ENDPOINT, key).await
    }

    // NFS shares

    /// List NFS shares, optionally scoped to a volume.
    pub async fn list_nfs_shares(&self, volume: Option<&str>) -> Result<Vec<NfsShare>> {
        let mut query = ListQuery::new().with_fields(NFS_SHARE_DEFAULT_FIELDS.iter().copied());
        if let Some(volume) = volume {
            query = query.with_filter(Filter::new().eq("volume", volume));
        }
        self.api.list(NFS_SHARES_ENDPOINT, &query).await
    }

    /// Fetch an NFS share by its hex-string key.
    pub async fn get_nfs_share(&self, key: &str) -> Result<NfsShare> {
        self.api
            .get(NFS_SHARES_ENDPOINT, key, NFS_SHARE_DEFAULT_FIELDS)
            .await
    }

    /// Create an NFS share and return the full record.
    pub async fn create_nfs_share(&self, request: &CreateNfsShareRequest) -> Result<NfsShare> {
        tracing::info!(volume = %request.volume, name = %request.name, "creating NFS share");
        let reply = self.api.post(NFS_SHARES_ENDPOINT, request).await?;

        match share_key_from_reply(reply.as_ref()) {
            Some(key) => self.get_nfs_share(&key).await,
            None => {
                self.api
                    .get_by_name(NFS_SHARES_ENDPOINT, &request.name, NFS_SHARE_DEFAULT_FIELDS)
                    .await
            }
        }
    }

    /// Update an NFS share and return the refreshed record.
    pub async fn update_nfs_share(&self, key: &str, body: &Value) -> Result<NfsShare> {
        self.api
            .update::<_, Value>(NFS_SHARES_ENDPOINT, key, body)
            .await?;
        self.get_nfs_share(key).await
    }

    /// Delete an NFS share.
    pub async fn delete_nfs_share(&self, key: &str) -> Result<()> {
        self.api.delete(NFS_SHARES_ENDPOINT, key).await
    }
}

fn share_key_from_reply(reply: Option<&Value>) -> Option<String> {
    reply.and_then(|value| {
        value
            .get("$key")
            .or_else(|| value.get("id"))
            .and_then(Value::as_str)
            .map(ToString::to_string)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use vergeos_core::ApiClientBuilder;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const VOL_KEY: &str = "8f73f8bcc9c9f1aaba32f733bfc295acaf548554";

    async fn storage_client(server: &MockServer) -> StorageClient {
        let api = ApiClientBuilder::new(server.uri())
            .with_basic_auth("admin", "secret")
            .build()
            .unwrap();
        StorageClient::new(api)
    }

    fn volume_record() -> Value {
        json!({
            "$key": VOL_KEY,
            "id": VOL_KEY,
            "name": "FileShare",
            "enabled": true,
            "maxsize": 536_870_912_000u64,
            "fs_type": "ext4",
            "service": 1,
            "mounted": true
        })
    }

    #[tokio::test]
    async fn get_volume_uses_id_filter() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/volumes"))
            .and(query_param("filter", format!("id eq '{VOL_KEY}'")))
            .and(query_param("limit", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([volume_record()])))
            .expect(1)
            .mount(&server)
            .await;

        let client = storage_client(&server).await;
        let volume = client.get_volume(VOL_KEY).await.unwrap();
        assert_eq!(volume.key, VOL_KEY);
        assert_eq!(volume.max_size_gb(), 500.0);
    }

    #[tokio::test]
    async fn get_volume_maps_empty_list_to_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/volumes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let client = storage_client(&server).await;
        let err = client.get_volume("deadbeef").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn list_volumes_renders_enabled_as_integer() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/volumes"))
            .and(query_param("filter", "enabled eq 1 and service eq 3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([volume_record()])))
            .expect(1)
            .mount(&server)
            .await;

        let client = storage_client(&server).await;
        let params = VolumeListParams::new().with_enabled(true).with_service(3);
        let volumes = client.list_volumes(&params).await.unwrap();
        assert_eq!(volumes.len(), 1);
    }

    #[tokio::test]
    async fn create_volume_refetches_by_returned_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v4/volumes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "$key": VOL_KEY })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v4/volumes"))
            .and(query_param("filter", format!("id eq '{VOL_KEY}'")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([volume_record()])))
            .expect(1)
            .mount(&server)
            .await;

        let client = storage_client(&server).await;
        let request = CreateVolumeRequest::new("FileShare", 1, 500).with_tier(2);
        assert_eq!(request.maxsize, 536_870_912_000);
        assert_eq!(request.preferred_tier.as_deref(), Some("2"));

        let volume = client.create_volume(&request).await.unwrap();
        assert_eq!(volume.name.as_deref(), Some("FileShare"));
    }

    #[tokio::test]
    async fn volume_snapshots_filter_quotes_hex_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/volume_snapshots"))
            .and(query_param("filter", format!("volume eq '{VOL_KEY}'")))
            .and(query_param("sort", "-created"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "$key": 71,
                    "name": "nightly",
                    "created": 1_724_716_800,
                    "expires": 0,
                    "expires_type": "never",
                    "volume": VOL_KEY
                }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = storage_client(&server).await;
        let snapshots = client.list_volume_snapshots(VOL_KEY).await.unwrap();
        assert_eq!(snapshots.len(), 1);
        assert!(snapshots[0].never_expires());
    }

    #[tokio::test]
    async fn create_cifs_share_sends_newline_joined_users() {
        let server = MockServer::start().await;
        let share_key = "11aa22bb33cc44dd55ee66ff77aa88bb99cc00dd";
        Mock::given(method("POST"))
            .and(path("/api/v4/volume_cifs_shares"))
            .and(wiremock::matchers::body_partial_json(json!({
                "volume": VOL_KEY,
                "name": "secure",
                "valid_users": "admin\nmanager"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "$key": share_key })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/api/v4/volume_cifs_shares/{share_key}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "$key": share_key,
                "name": "secure",
                "enabled": true,
                "browseable": true,
                "valid_users": "admin\nmanager",
                "volume": VOL_KEY
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = storage_client(&server).await;
        let request =
            CreateCifsShareRequest::new(VOL_KEY, "secure").with_valid_users(["admin", "manager"]);
        let share = client.create_cifs_share(&request).await.unwrap();
        assert_eq!(share.valid_users.as_deref(), Some("admin\nmanager"));
    }
}
