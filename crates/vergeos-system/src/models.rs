//! Data models for system-level resources: logs, tags, tasks, users, sites
//! and webhooks.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

fn is_false(value: &bool) -> bool {
    !*value
}

// Logs

/// Log severity levels, most to least severe.
pub const LOG_LEVELS: &[&str] = &[
    "critical", "error", "warning", "message", "audit", "summary", "debug",
];

/// Default field set requested for log entries.
pub const LOG_DEFAULT_FIELDS: &[&str] = &[
    "$key",
    "level",
    "text",
    "timestamp",
    "user",
    "object_type",
    "object_name",
];

/// Map a friendly object type name to its API value.
///
/// Unknown names pass through unchanged so raw API values keep working.
#[must_use]
pub fn log_object_type_api_value(name: &str) -> &str {
    match name {
        "VM" => "vm",
        "Network" => "vnet",
        "Tenant" => "tenant",
        "User" => "user",
        "System" => "system",
        "Node" => "node",
        "Cluster" => "cluster",
        "File" => "file",
        "Group" => "group",
        "Permission" => "permission",
        "SMTP" => "smtp",
        "Task" => "task",
        "Site" => "site",
        "SystemSnapshot" => "cloud_snapshots",
        "CatalogRepository" => "catalog_repository",
        "OIDCApplication" => "oidc_application",
        "ServiceContainer" => "service_container",
        "NASService" => "vm_service",
        "VMImport" => "vm_import",
        "VMwareBackup" => "vmware_container",
        "SnapshotProfile" => "snapshot_profile",
        "ImportExport" => "import_export",
        "Update" => "updates",
        "Other" => "other",
        other => other,
    }
}

/// Map an API object type value to its friendly display name.
#[must_use]
pub fn log_object_type_display(value: &str) -> &str {
    match value {
        "vm" => "VM",
        "vnet" => "Network",
        "tenant" => "Tenant",
        "user" => "User",
        "system" => "System",
        "node" => "Node",
        "cluster" => "Cluster",
        "file" => "File",
        "group" => "Group",
        "permission" => "Permission",
        "smtp" => "SMTP",
        "task" => "Task",
        "site" => "Site",
        "cloud_snapshots" => "SystemSnapshot",
        "catalog_repository" => "CatalogRepository",
        "oidc_application" => "OIDCApplication",
        "service_container" => "ServiceContainer",
        "vm_service" => "NASService",
        "vm_import" => "VMImport",
        "vmware_container" => "VMwareBackup",
        "snapshot_profile" => "SnapshotProfile",
        "import_export" => "ImportExport",
        "updates" => "Update",
        "other" => "Other",
        other => other,
    }
}

/// A system log entry.
///
/// Timestamps on this endpoint are microseconds since the epoch, not seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogEntry {
    /// Record key.
    #[serde(rename = "$key")]
    pub key: u64,
    /// Severity level.
    #[serde(default)]
    pub level: Option<String>,
    /// Message text.
    #[serde(default)]
    pub text: Option<String>,
    /// Timestamp in microseconds since the epoch.
    #[serde(default)]
    pub timestamp: Option<i64>,
    /// User who performed the action.
    #[serde(default)]
    pub user: Option<String>,
    /// API object type value (vm, vnet, ...).
    #[serde(default)]
    pub object_type: Option<String>,
    /// Name of the related object.
    #[serde(default)]
    pub object_name: Option<String>,
}

impl LogEntry {
    /// Capitalized level name for display.
    #[must_use]
    pub fn level_display(&self) -> String {
        let level = self.level.as_deref().unwrap_or("");
        let mut chars = level.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Friendly name for the related object's type.
    #[must_use]
    pub fn object_type_display(&self) -> &str {
        log_object_type_display(self.object_type.as_deref().unwrap_or(""))
    }

    /// Creation time converted from the microsecond timestamp.
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        match self.timestamp {
            None | Some(0) => None,
            Some(us) => Utc.timestamp_micros(us).single(),
        }
    }
}

/// Query parameters for listing logs.
#[derive(Debug, Default, Clone)]
pub struct LogQuery {
    /// Extra filter expression, wrapped in parentheses when combined.
    pub filter: Option<String>,
    /// Severity levels; multiple values become an OR group.
    pub levels: Vec<String>,
    /// Object type, friendly name or raw API value.
    pub object_type: Option<String>,
    /// Contains-search on the user field.
    pub user: Option<String>,
    /// Contains-search on the message text.
    pub text: Option<String>,
    /// Only logs at or after this time.
    pub since: Option<DateTime<Utc>>,
    /// Only logs before this time.
    pub before: Option<DateTime<Utc>>,
    /// Maximum number of results; the server caps at 10000.
    pub limit: Option<u32>,
    /// Skip this many results.
    pub offset: Option<u32>,
}

impl LogQuery {
    /// Create an empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to one severity level.
    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.levels.push(level.into().to_lowercase());
        self
    }

    /// Restrict to several severity levels (OR group).
    #[must_use]
    pub fn with_levels<I, S>(mut self, levels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.levels
            .extend(levels.into_iter().map(|lv| lv.into().to_lowercase()));
        self
    }

    /// Restrict to error and critical entries.
    #[must_use]
    pub fn errors_only(mut self) -> Self {
        self.levels = vec!["error".to_string(), "critical".to_string()];
        self
    }

    /// Restrict to one object type (friendly name or API value).
    #[must_use]
    pub fn with_object_type(mut self, object_type: impl Into<String>) -> Self {
        self.object_type = Some(object_type.into());
        self
    }

    /// Contains-search on the user field.
    #[must_use]
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Contains-search on the message text.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Only logs at or after this time.
    #[must_use]
    pub const fn since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    /// Only logs before this time.
    #[must_use]
    pub const fn before(mut self, before: DateTime<Utc>) -> Self {
        self.before = Some(before);
        self
    }

    /// Limit the number of results.
    #[must_use]
    pub const fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Combined filter expression, joined with `and`.
    ///
    /// Embedded quotes in contains-searches are doubled before entering the
    /// expression. Time bounds are rendered in microseconds.
    #[must_use]
    pub fn filter_expression(&self) -> Option<String> {
        let mut conditions: Vec<String> = Vec::new();

        if let Some(filter) = &self.filter {
            conditions.push(format!("({filter})"));
        }

        match self.levels.as_slice() {
            [] => {}
            [level] => conditions.push(format!("level eq '{level}'")),
            levels => {
                let group = levels
                    .iter()
                    .map(|lv| format!("level eq '{lv}'"))
                    .collect::<Vec<_>>()
                    .join(" or ");
                conditions.push(format!("({group})"));
            }
        }

        if let Some(object_type) = &self.object_type {
            let api_value = log_object_type_api_value(object_type);
            conditions.push(format!("object_type eq '{api_value}'"));
        }

        if let Some(user) = &self.user {
            conditions.push(format!("user ct '{}'", user.replace('\'', "''")));
        }

        if let Some(text) = &self.text {
            conditions.push(format!("text ct '{}'", text.replace('\'', "''")));
        }

        if let Some(since) = self.since {
            conditions.push(format!("timestamp ge {}", since.timestamp_micros()));
        }

        if let Some(before) = self.before {
            conditions.push(format!("timestamp lt {}", before.timestamp_micros()));
        }

        if conditions.is_empty() {
            None
        } else {
            Some(conditions.join(" and "))
        }
    }
}

// Tags

/// Default field set requested for tag records.
pub const TAG_DEFAULT_FIELDS: &[&str] = &[
    "$key",
    "name",
    "description",
    "category",
    "category#name as category_name",
    "created",
    "modified",
];

/// Default field set requested for tag category records.
pub const TAG_CATEGORY_DEFAULT_FIELDS: &[&str] = &[
    "$key",
    "name",
    "description",
    "single_tag_selection",
    "taggable_vms",
    "taggable_vnets",
    "taggable_volumes",
    "taggable_vnet_rules",
    "taggable_vmware_containers",
    "taggable_users",
    "taggable_tenant_nodes",
    "taggable_sites",
    "taggable_nodes",
    "taggable_groups",
    "taggable_clusters",
    "taggable_tenants",
    "created",
    "modified",
];

/// Default field set requested for tag membership records.
pub const TAG_MEMBER_DEFAULT_FIELDS: &[&str] = &["$key", "tag", "member"];

/// Resource types that can be tagged.
pub const TAGGABLE_RESOURCE_TYPES: &[&str] = &[
    "vms",
    "vnets",
    "volumes",
    "vnet_rules",
    "vmware_containers",
    "users",
    "tenant_nodes",
    "sites",
    "nodes",
    "groups",
    "clusters",
    "tenants",
];

/// Display name for a taggable resource type.
#[must_use]
pub fn resource_type_display(resource_type: &str) -> &str {
    match resource_type {
        "vms" => "Virtual Machine",
        "vnets" => "Network",
        "volumes" => "Volume",
        "vnet_rules" => "Network Rule",
        "vmware_containers" => "VMware Container",
        "users" => "User",
        "tenant_nodes" => "Tenant Node",
        "sites" => "Site",
        "nodes" => "Node",
        "groups" => "Group",
        "clusters" => "Cluster",
        "tenants" => "Tenant",
        other => other,
    }
}

/// A tag record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tag {
    /// Record key.
    #[serde(rename = "$key")]
    pub key: u64,
    /// Tag name, unique within its category.
    pub name: String,
    /// Tag description.
    #[serde(default)]
    pub description: Option<String>,
    /// Parent category key.
    #[serde(default)]
    pub category: Option<u64>,
    /// Parent category name.
    #[serde(default)]
    pub category_name: Option<String>,
    /// Creation timestamp (seconds since epoch).
    #[serde(default)]
    pub created: Option<i64>,
    /// Last modification timestamp.
    #[serde(default)]
    pub modified: Option<i64>,
}

/// Request body for creating a tag.
#[derive(Debug, Clone, Serialize)]
pub struct CreateTagRequest {
    /// Tag name.
    pub name: String,
    /// Parent category key.
    pub category: u64,
    /// Tag description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CreateTagRequest {
    /// Create a tag request.
    #[must_use]
    pub fn new(name: impl Into<String>, category: u64) -> Self {
        Self {
            name: name.into(),
            category,
            description: None,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Request body for updating a tag.
#[derive(Debug, Default, Clone, Serialize)]
pub struct UpdateTagRequest {
    /// New tag name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A tag category record.
///
/// Categories organize tags and declare which resource types can carry them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TagCategory {
    /// Record key.
    #[serde(rename = "$key")]
    pub key: u64,
    /// Category name.
    pub name: String,
    /// Category description.
    #[serde(default)]
    pub description: Option<String>,
    /// Only one tag from this category may be applied per resource.
    #[serde(default)]
    pub single_tag_selection: bool,
    /// VMs can be tagged.
    #[serde(default)]
    pub taggable_vms: bool,
    /// Networks can be tagged.
    #[serde(default)]
    pub taggable_vnets: bool,
    /// Volumes can be tagged.
    #[serde(default)]
    pub taggable_volumes: bool,
    /// Network rules can be tagged.
    #[serde(default)]
    pub taggable_vnet_rules: bool,
    /// VMware containers can be tagged.
    #[serde(default)]
    pub taggable_vmware_containers: bool,
    /// Users can be tagged.
    #[serde(default)]
    pub taggable_users: bool,
    /// Tenant nodes can be tagged.
    #[serde(default)]
    pub taggable_tenant_nodes: bool,
    /// Sites can be tagged.
    #[serde(default)]
    pub taggable_sites: bool,
    /// Nodes can be tagged.
    #[serde(default)]
    pub taggable_nodes: bool,
    /// Groups can be tagged.
    #[serde(default)]
    pub taggable_groups: bool,
    /// Clusters can be tagged.
    #[serde(default)]
    pub taggable_clusters: bool,
    /// Tenants can be tagged.
    #[serde(default)]
    pub taggable_tenants: bool,
    /// Creation timestamp.
    #[serde(default)]
    pub created: Option<i64>,
    /// Last modification timestamp.
    #[serde(default)]
    pub modified: Option<i64>,
}

impl TagCategory {
    /// Resource types this category allows tagging.
    #[must_use]
    pub fn taggable_types(&self) -> Vec<&'static str> {
        let flags = [
            ("vms", self.taggable_vms),
            ("vnets", self.taggable_vnets),
            ("volumes", self.taggable_volumes),
            ("vnet_rules", self.taggable_vnet_rules),
            ("vmware_containers", self.taggable_vmware_containers),
            ("users", self.taggable_users),
            ("tenant_nodes", self.taggable_tenant_nodes),
            ("sites", self.taggable_sites),
            ("nodes", self.taggable_nodes),
            ("groups", self.taggable_groups),
            ("clusters", self.taggable_clusters),
            ("tenants", self.taggable_tenants),
        ];
        flags
            .into_iter()
            .filter_map(|(name, set)| set.then_some(name))
            .collect()
    }
}

/// Request body for creating a tag category.
///
/// Only enabled flags are serialized, matching the API's sparse create bodies.
#[derive(Debug, Clone, Serialize)]
pub struct CreateTagCategoryRequest {
    /// Category name.
    pub name: String,
    /// Category description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Only one tag from this category may be applied per resource.
    #[serde(skip_serializing_if = "is_false")]
    pub single_tag_selection: bool,
    /// Allow tagging VMs.
    #[serde(skip_serializing_if = "is_false")]
    pub taggable_vms: bool,
    /// Allow tagging networks.
    #[serde(skip_serializing_if = "is_false")]
    pub taggable_vnets: bool,
    /// Allow tagging volumes.
    #[serde(skip_serializing_if = "is_false")]
    pub taggable_volumes: bool,
    /// Allow tagging network rules.
    #[serde(skip_serializing_if = "is_false")]
    pub taggable_vnet_rules: bool,
    /// Allow tagging VMware containers.
    #[serde(skip_serializing_if = "is_false")]
    pub taggable_vmware_containers: bool,
    /// Allow tagging users.
    #[serde(skip_serializing_if = "is_false")]
    pub taggable_users: bool,
    /// Allow tagging tenant nodes.
    #[serde(skip_serializing_if = "is_false")]
    pub taggable_tenant_nodes: bool,
    /// Allow tagging sites.
    #[serde(skip_serializing_if = "is_false")]
    pub taggable_sites: bool,
    /// Allow tagging nodes.
    #[serde(skip_serializing_if = "is_false")]
    pub taggable_nodes: bool,
    /// Allow tagging groups.
    #[serde(skip_serializing_if = "is_false")]
    pub taggable_groups: bool,
    /// Allow tagging clusters.
    #[serde(skip_serializing_if = "is_false")]
    pub taggable_clusters: bool,
    /// Allow tagging tenants.
    #[serde(skip_serializing_if = "is_false")]
    pub taggable_tenants: bool,
}

impl CreateTagCategoryRequest {
    /// Create a category request with all flags off.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            single_tag_selection: false,
            taggable_vms: false,
            taggable_vnets: false,
            taggable_volumes: false,
            taggable_vnet_rules: false,
            taggable_vmware_containers: false,
            taggable_users: false,
            taggable_tenant_nodes: false,
            taggable_sites: false,
            taggable_nodes: false,
            taggable_groups: false,
            taggable_clusters: false,
            taggable_tenants: false,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Allow tagging VMs.
    #[must_use]
    pub const fn taggable_vms(mut self) -> Self {
        self.taggable_vms = true;
        self
    }

    /// Allow tagging networks.
    #[must_use]
    pub const fn taggable_networks(mut self) -> Self {
        self.taggable_vnets = true;
        self
    }

    /// Allow tagging tenants.
    #[must_use]
    pub const fn taggable_tenants(mut self) -> Self {
        self.taggable_tenants = true;
        self
    }

    /// Restrict resources to a single tag from this category.
    #[must_use]
    pub const fn single_tag_selection(mut self) -> Self {
        self.single_tag_selection = true;
        self
    }
}

/// A tag membership record linking a resource to a tag.
///
/// The `member` field is an API reference in `{type}/{key}` form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TagMember {
    /// Membership record key.
    #[serde(rename = "$key")]
    pub key: u64,
    /// Parent tag key.
    #[serde(default)]
    pub tag: Option<u64>,
    /// Resource reference, e.g. `vms/123`.
    #[serde(default)]
    pub member: Option<String>,
}

impl TagMember {
    /// Resource type part of the member reference.
    #[must_use]
    pub fn resource_type(&self) -> Option<&str> {
        self.member.as_deref()?.split_once('/').map(|(t, _)| t)
    }

    /// Resource key part of the member reference.
    #[must_use]
    pub fn resource_key(&self) -> Option<u64> {
        self.member
            .as_deref()?
            .split_once('/')
            .and_then(|(_, k)| k.parse().ok())
    }

    /// Display name for the resource type.
    #[must_use]
    pub fn resource_type_display(&self) -> &str {
        self.resource_type().map_or("Unknown", resource_type_display)
    }
}

// Tasks

/// Default field set requested for task records.
pub const TASK_DEFAULT_FIELDS: &[&str] = &[
    "$key",
    "name",
    "description",
    "enabled",
    "status",
    "action",
    "action_display",
    "table",
    "owner",
    "owner#$display as owner_display",
    "creator",
    "creator#$display as creator_display",
    "last_run",
    "delete_after_run",
    "id",
];

/// A scheduled or running automation task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    /// Record key.
    #[serde(rename = "$key")]
    pub key: u64,
    /// Task name.
    #[serde(default)]
    pub name: Option<String>,
    /// Task description.
    #[serde(default)]
    pub description: Option<String>,
    /// Whether the task is enabled.
    #[serde(default)]
    pub enabled: bool,
    /// Task status (idle, running, error).
    #[serde(default)]
    pub status: Option<String>,
    /// Action type the task performs.
    #[serde(default)]
    pub action: Option<String>,
    /// Human-readable action description.
    #[serde(default)]
    pub action_display: Option<String>,
    /// Table the task operates on.
    #[serde(default)]
    pub table: Option<String>,
    /// Owner object key.
    #[serde(default)]
    pub owner: Option<u64>,
    /// Owner display name.
    #[serde(default)]
    pub owner_display: Option<String>,
    /// Creator user key.
    #[serde(default)]
    pub creator: Option<u64>,
    /// Creator display name.
    #[serde(default)]
    pub creator_display: Option<String>,
    /// Timestamp of the last run.
    #[serde(default)]
    pub last_run: Option<i64>,
    /// Whether the task deletes itself after running.
    #[serde(default)]
    pub delete_after_run: Option<bool>,
    /// Unique task identifier (40-character hex string).
    #[serde(default)]
    pub id: Option<String>,
}

impl Task {
    /// Returns true when the task is idle.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.status.as_deref() == Some("idle")
    }

    /// Returns true when the task is currently running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.status.as_deref() == Some("running")
    }

    /// Returns true when the task ended in error.
    #[must_use]
    pub fn has_error(&self) -> bool {
        self.status.as_deref() == Some("error")
    }
}

/// Parameters for listing tasks.
#[derive(Debug, Default, Clone)]
pub struct TaskListParams {
    /// Filter by status (idle, running).
    pub status: Option<String>,
    /// Shortcut for running/idle filtering.
    pub running: Option<bool>,
    /// Filter by enabled state.
    pub enabled: Option<bool>,
    /// Filter by name; wildcards switch to a contains search.
    pub name: Option<String>,
    /// Maximum number of results.
    pub limit: Option<u32>,
    /// Skip this many results.
    pub offset: Option<u32>,
}

impl TaskListParams {
    /// Create empty list parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to running tasks.
    #[must_use]
    pub const fn running(mut self) -> Self {
        self.running = Some(true);
        self
    }

    /// Restrict to idle tasks.
    #[must_use]
    pub const fn idle(mut self) -> Self {
        self.running = Some(false);
        self
    }

    /// Filter by enabled state.
    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    /// Filter by name. `*` and `?` wildcards turn the match into a contains
    /// search on the stripped term.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Combined filter expression, joined with `and`.
    #[must_use]
    pub fn filter_expression(&self) -> Option<String> {
        let mut conditions: Vec<String> = Vec::new();

        match self.running {
            Some(true) => conditions.push("status eq 'running'".to_string()),
            Some(false) => conditions.push("status eq 'idle'".to_string()),
            None => {
                if let Some(status) = &self.status {
                    conditions.push(format!("status eq '{}'", status.to_lowercase()));
                }
            }
        }

        if let Some(enabled) = self.enabled {
            conditions.push(format!("enabled eq {enabled}"));
        }

        if let Some(name) = &self.name {
            if name.contains('*') || name.contains('?') {
                let term: String = name.chars().filter(|c| *c != '*' && *c != '?').collect();
                if !term.is_empty() {
                    conditions.push(format!("name ct '{term}'"));
                }
            } else {
                conditions.push(format!("name eq '{name}'"));
            }
        }

        if conditions.is_empty() {
            None
        } else {
            Some(conditions.join(" and "))
        }
    }
}

// Users

/// Default field set requested for user records.
pub const USER_DEFAULT_FIELDS: &[&str] = &[
    "$key",
    "name",
    "displayname",
    "email",
    "type",
    "enabled",
    "created",
    "last_login",
    "change_password",
    "physical_access",
    "two_factor_authentication",
    "two_factor_type",
    "account_locked",
    "failed_attempts",
    "auth_source",
    "auth_source#name as auth_source_name",
    "remote_name",
    "identity",
    "creator",
];

/// A user account record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    /// Record key.
    #[serde(rename = "$key")]
    pub key: u64,
    /// Username, always lowercase.
    pub name: String,
    /// Display name.
    #[serde(default)]
    pub displayname: Option<String>,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Account type (normal, api, vdi).
    #[serde(default, rename = "type")]
    pub user_type: Option<String>,
    /// Whether the account is enabled.
    #[serde(default)]
    pub enabled: bool,
    /// Creation timestamp.
    #[serde(default)]
    pub created: Option<i64>,
    /// Last login timestamp.
    #[serde(default)]
    pub last_login: Option<i64>,
    /// Password change required at next login.
    #[serde(default)]
    pub change_password: Option<bool>,
    /// Console/SSH access enabled.
    #[serde(default)]
    pub physical_access: Option<bool>,
    /// Two-factor authentication enabled.
    #[serde(default)]
    pub two_factor_authentication: Option<bool>,
    /// Two-factor method (email, authenticator).
    #[serde(default)]
    pub two_factor_type: Option<String>,
    /// Whether the account is locked out.
    #[serde(default)]
    pub account_locked: Option<bool>,
    /// Failed login attempt count.
    #[serde(default)]
    pub failed_attempts: Option<u32>,
    /// Authentication source key.
    #[serde(default)]
    pub auth_source: Option<u64>,
    /// Authentication source name.
    #[serde(default)]
    pub auth_source_name: Option<String>,
    /// Name at the remote auth source.
    #[serde(default)]
    pub remote_name: Option<String>,
    /// Identity string.
    #[serde(default)]
    pub identity: Option<String>,
    /// Creator user key.
    #[serde(default)]
    pub creator: Option<u64>,
}

/// Request body for creating a user.
#[derive(Debug, Clone, Serialize)]
pub struct CreateUserRequest {
    /// Username; the API requires lowercase.
    pub name: String,
    /// Initial password.
    pub password: String,
    /// Account type (normal, api, vdi).
    #[serde(rename = "type")]
    pub user_type: String,
    /// Whether the account starts enabled.
    pub enabled: bool,
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub displayname: Option<String>,
    /// Email address, lowercased.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Require password change at next login.
    #[serde(skip_serializing_if = "is_false")]
    pub change_password: bool,
    /// Grant console/SSH access.
    #[serde(skip_serializing_if = "is_false")]
    pub physical_access: bool,
    /// SSH public keys, newline-joined.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh_keys: Option<String>,
}

impl CreateUserRequest {
    /// Create a normal, enabled user. The name is lowercased.
    #[must_use]
    pub fn new(name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into().to_lowercase(),
            password: password.into(),
            user_type: "normal".to_string(),
            enabled: true,
            displayname: None,
            email: None,
            change_password: false,
            physical_access: false,
            ssh_keys: None,
        }
    }

    /// Create an API service account instead of a normal user.
    #[must_use]
    pub fn with_type(mut self, user_type: impl Into<String>) -> Self {
        self.user_type = user_type.into();
        self
    }

    /// Set the display name.
    #[must_use]
    pub fn with_displayname(mut self, displayname: impl Into<String>) -> Self {
        self.displayname = Some(displayname.into());
        self
    }

    /// Set the email address; lowercased for the API.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into().to_lowercase());
        self
    }

    /// Set SSH public keys; joined with newlines on the wire.
    #[must_use]
    pub fn with_ssh_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ssh_keys = Some(
            keys.into_iter()
                .map(|k| k.as_ref().to_string())
                .collect::<Vec<_>>()
                .join("\n"),
        );
        self
    }
}

/// Request body for updating a user.
#[derive(Debug, Default, Clone, Serialize)]
pub struct UpdateUserRequest {
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub displayname: Option<String>,
    /// New email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Enable or disable the account.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// New password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Require password change at next login.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_password: Option<bool>,
    /// Grant or revoke console/SSH access.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub physical_access: Option<bool>,
}

// Sites

/// Default field set requested for site records.
pub const SITE_DEFAULT_FIELDS: &[&str] = &[
    "$key",
    "name",
    "description",
    "enabled",
    "url",
    "domain",
    "city",
    "country",
    "timezone",
    "latitude",
    "longitude",
    "status",
    "status_info",
    "authentication_status",
    "config_cloud_snapshots",
    "config_statistics",
    "config_management",
    "config_repair_server",
    "vsan_host",
    "vsan_port",
    "is_tenant",
    "incoming_syncs_enabled",
    "outgoing_syncs_enabled",
    "statistics_interval",
    "statistics_retention",
    "created",
    "modified",
    "creator",
];

/// A remote site record used for multi-site sync and management.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Site {
    /// Record key.
    #[serde(rename = "$key")]
    pub key: u64,
    /// Site name.
    pub name: String,
    /// Site description.
    #[serde(default)]
    pub description: Option<String>,
    /// Whether the site link is enabled.
    #[serde(default)]
    pub enabled: bool,
    /// Site URL.
    #[serde(default)]
    pub url: Option<String>,
    /// Site domain.
    #[serde(default)]
    pub domain: Option<String>,
    /// City for display on the site map.
    #[serde(default)]
    pub city: Option<String>,
    /// Country for display on the site map.
    #[serde(default)]
    pub country: Option<String>,
    /// Site timezone.
    #[serde(default)]
    pub timezone: Option<String>,
    /// Sync/link status (idle, authenticating, syncing, error, warning).
    #[serde(default)]
    pub status: Option<String>,
    /// Extra status detail.
    #[serde(default)]
    pub status_info: Option<String>,
    /// Authentication status against the remote site.
    #[serde(default)]
    pub authentication_status: Option<String>,
    /// Whether the remote site is a tenant.
    #[serde(default)]
    pub is_tenant: Option<bool>,
    /// Incoming syncs enabled.
    #[serde(default)]
    pub incoming_syncs_enabled: Option<bool>,
    /// Outgoing syncs enabled.
    #[serde(default)]
    pub outgoing_syncs_enabled: Option<bool>,
    /// Creation timestamp.
    #[serde(default)]
    pub created: Option<i64>,
    /// Last modification timestamp.
    #[serde(default)]
    pub modified: Option<i64>,
}

// Webhooks

/// Default field set requested for webhook records.
pub const WEBHOOK_DEFAULT_FIELDS: &[&str] = &[
    "$key",
    "name",
    "type",
    "url",
    "headers",
    "authorization_type",
    "allow_insecure",
    "timeout",
    "retries",
];

/// Display name for a webhook authorization type.
#[must_use]
pub fn webhook_auth_type_display(auth_type: &str) -> &str {
    match auth_type {
        "none" => "None",
        "basic" => "Basic",
        "bearer" => "Bearer",
        "apikey" => "API Key",
        other => other,
    }
}

/// A webhook URL configuration record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Webhook {
    /// Record key.
    #[serde(rename = "$key")]
    pub key: u64,
    /// Webhook name.
    pub name: String,
    /// Webhook type; currently only `custom`.
    #[serde(default, rename = "type")]
    pub webhook_type: Option<String>,
    /// Destination URL.
    #[serde(default)]
    pub url: Option<String>,
    /// Custom headers, one `Name:Value` pair per line.
    #[serde(default)]
    pub headers: Option<String>,
    /// Authorization method (none, basic, bearer, apikey).
    #[serde(default)]
    pub authorization_type: Option<String>,
    /// Skip TLS certificate verification when delivering.
    #[serde(default)]
    pub allow_insecure: Option<bool>,
    /// Delivery timeout in seconds.
    #[serde(default)]
    pub timeout: Option<u32>,
    /// Delivery retry count.
    #[serde(default)]
    pub retries: Option<u32>,
}

impl Webhook {
    /// Display name for the authorization type.
    #[must_use]
    pub fn authorization_type_display(&self) -> &str {
        webhook_auth_type_display(self.authorization_type.as_deref().unwrap_or(""))
    }
}

/// Request body for creating a webhook.
#[derive(Debug, Clone, Serialize)]
pub struct CreateWebhookRequest {
    /// Webhook name, unique.
    pub name: String,
    /// Destination URL.
    pub url: String,
    /// Authorization method (none, basic, bearer, apikey).
    pub authorization_type: String,
    /// Custom headers; `Name:Value` lines with a trailing newline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<String>,
    /// Authorization credential value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization_value: Option<String>,
    /// Skip TLS certificate verification when delivering.
    #[serde(skip_serializing_if = "is_false")]
    pub allow_insecure: bool,
    /// Delivery timeout in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
    /// Delivery retry count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retries: Option<u32>,
}

impl CreateWebhookRequest {
    /// Create a webhook request with no authorization.
    #[must_use]
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            authorization_type: "none".to_string(),
            headers: None,
            authorization_value: None,
            allow_insecure: false,
            timeout: None,
            retries: None,
        }
    }

    /// Use bearer token authorization.
    #[must_use]
    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.authorization_type = "bearer".to_string();
        self.authorization_value = Some(token.into());
        self
    }

    /// Set custom headers from `(name, value)` pairs.
    ///
    /// The API expects `Name:Value` lines terminated by a newline.
    #[must_use]
    pub fn with_headers<I, N, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (N, V)>,
        N: AsRef<str>,
        V: AsRef<str>,
    {
        let mut joined = headers
            .into_iter()
            .map(|(n, v)| format!("{}:{}", n.as_ref(), v.as_ref()))
            .collect::<Vec<_>>()
            .join("\n");
        joined.push('\n');
        self.headers = Some(joined);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn log_query_builds_or_group_for_levels() {
        let query = LogQuery::new().with_levels(["Error", "CRITICAL"]);
        assert_eq!(
            query.filter_expression().unwrap(),
            "(level eq 'error' or level eq 'critical')"
        );

        let single = LogQuery::new().with_level("warning");
        assert_eq!(single.filter_expression().unwrap(), "level eq 'warning'");
    }

    #[test]
    fn log_query_escapes_contains_searches() {
        let query = LogQuery::new().with_user("o'brien").with_text("d'oh");
        assert_eq!(
            query.filter_expression().unwrap(),
            "user ct 'o''brien' and text ct 'd''oh'"
        );
    }

    #[test]
    fn log_query_renders_microsecond_bounds() {
        let since = Utc.timestamp_opt(1_700_000_000, 0).single().unwrap();
        let query = LogQuery::new().errors_only().since(since);
        assert_eq!(
            query.filter_expression().unwrap(),
            "(level eq 'error' or level eq 'critical') and timestamp ge 1700000000000000"
        );
    }

    #[test]
    fn log_query_maps_friendly_object_type() {
        let query = LogQuery::new().with_object_type("Network");
        assert_eq!(
            query.filter_expression().unwrap(),
            "object_type eq 'vnet'"
        );
        // Raw API values pass through untouched.
        let raw = LogQuery::new().with_object_type("vm_import");
        assert_eq!(
            raw.filter_expression().unwrap(),
            "object_type eq 'vm_import'"
        );
    }

    #[test]
    fn log_entry_timestamp_conversion() {
        let entry = LogEntry {
            key: 1,
            level: Some("audit".into()),
            text: Some("user logged in".into()),
            timestamp: Some(1_700_000_000_500_000),
            user: Some("admin".into()),
            object_type: Some("user".into()),
            object_name: Some("admin".into()),
        };
        assert_eq!(entry.level_display(), "Audit");
        assert_eq!(entry.object_type_display(), "User");
        let at = entry.created_at().unwrap();
        assert_eq!(at.timestamp(), 1_700_000_000);

        let zero = LogEntry { timestamp: Some(0), ..entry };
        assert!(zero.created_at().is_none());
    }

    #[test]
    fn tag_member_reference_parsing() {
        let member = TagMember {
            key: 9,
            tag: Some(3),
            member: Some("vms/123".into()),
        };
        assert_eq!(member.resource_type(), Some("vms"));
        assert_eq!(member.resource_key(), Some(123));
        assert_eq!(member.resource_type_display(), "Virtual Machine");

        let bare = TagMember { key: 10, tag: Some(3), member: Some("broken".into()) };
        assert!(bare.resource_type().is_none());
        assert_eq!(bare.resource_type_display(), "Unknown");
    }

    #[test]
    fn tag_category_request_omits_unset_flags() {
        let body = serde_json::to_value(
            CreateTagCategoryRequest::new("Environment")
                .taggable_vms()
                .single_tag_selection(),
        )
        .unwrap();
        assert_eq!(body["taggable_vms"], true);
        assert_eq!(body["single_tag_selection"], true);
        assert!(body.get("taggable_vnets").is_none());
        assert!(body.get("taggable_tenants").is_none());
    }

    #[test]
    fn task_params_wildcard_name_becomes_contains() {
        let params = TaskListParams::new().with_name("Backup*");
        assert_eq!(params.filter_expression().unwrap(), "name ct 'Backup'");

        let exact = TaskListParams::new().with_name("Nightly Backup");
        assert_eq!(
            exact.filter_expression().unwrap(),
            "name eq 'Nightly Backup'"
        );

        let running = TaskListParams::new().running().with_enabled(true);
        assert_eq!(
            running.filter_expression().unwrap(),
            "status eq 'running' and enabled eq true"
        );
    }

    #[test]
    fn create_user_request_normalizes_case() {
        let request = CreateUserRequest::new("JSmith", "Secret123!")
            .with_email("JSmith@Company.com")
            .with_ssh_keys(["ssh-ed25519 AAAA key1", "ssh-rsa BBBB key2"]);
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["name"], "jsmith");
        assert_eq!(body["email"], "jsmith@company.com");
        assert_eq!(body["type"], "normal");
        assert_eq!(
            body["ssh_keys"],
            "ssh-ed25519 AAAA key1\nssh-rsa BBBB key2"
        );
        assert!(body.get("change_password").is_none());
    }

    #[test]
    fn webhook_request_header_lines_end_with_newline() {
        let body = serde_json::to_value(
            CreateWebhookRequest::new("alerts", "https://hooks.example.com/v1")
                .with_bearer("tok-123")
                .with_headers([("X-Env", "prod"), ("X-Team", "infra")]),
        )
        .unwrap();
        assert_eq!(body["headers"], "X-Env:prod\nX-Team:infra\n");
        assert_eq!(body["authorization_type"], "bearer");
        assert_eq!(body["authorization_value"], "tok-123");
    }
}
