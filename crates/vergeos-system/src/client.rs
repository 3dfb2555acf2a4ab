//! Client for system-level endpoints: logs, tags, tasks, users, sites and
//! webhooks.

use serde_json::{json, Value};
use vergeos_core::{ApiClient, Error, Filter, ListQuery, Result};

use crate::models::{
    CreateTagCategoryRequest, CreateTagRequest, CreateUserRequest, CreateWebhookRequest, LogEntry,
    LogQuery, Site, Tag, TagCategory, TagMember, Task, TaskListParams, UpdateTagRequest,
    UpdateUserRequest, User, Webhook, LOG_DEFAULT_FIELDS, SITE_DEFAULT_FIELDS,
    TAG_CATEGORY_DEFAULT_FIELDS, TAG_DEFAULT_FIELDS, TAG_MEMBER_DEFAULT_FIELDS,
    TASK_DEFAULT_FIELDS, USER_DEFAULT_FIELDS, WEBHOOK_DEFAULT_FIELDS,
};

const LOGS_ENDPOINT: &str = "logs";
const TAGS_ENDPOINT: &str = "tags";
const TAG_CATEGORIES_ENDPOINT: &str = "tag_categories";
const TAG_MEMBERS_ENDPOINT: &str = "tag_members";
const TASKS_ENDPOINT: &str = "tasks";
const USERS_ENDPOINT: &str = "users";
const SITES_ENDPOINT: &str = "sites";
const WEBHOOKS_ENDPOINT: &str = "webhook_urls";

const DEFAULT_LOG_LIMIT: u32 = 100;

/// Client for the system endpoints of one VergeOS installation.
///
/// Wraps a shared [`ApiClient`]; cloning is cheap.
#[derive(Clone)]
pub struct SystemClient {
    api: ApiClient,
}

impl SystemClient {
    /// Create a system client over an established API client.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    // Logs

    /// Query the system log, newest entries first.
    ///
    /// When the query sets no limit, the list is capped at 100 entries.
    pub async fn list_logs(&self, query: &LogQuery) -> Result<Vec<LogEntry>> {
        let mut list = ListQuery::new()
            .with_fields(LOG_DEFAULT_FIELDS.iter().copied())
            .with_limit(query.limit.unwrap_or(DEFAULT_LOG_LIMIT))
            .with_sort("-timestamp");
        if let Some(filter) = query.filter_expression() {
            list = list.with_filter_str(filter);
        }
        if let Some(offset) = query.offset {
            list = list.with_offset(offset);
        }
        self.api.list(LOGS_ENDPOINT, &list).await
    }

    /// Fetch one log entry by key.
    pub async fn get_log(&self, key: u64) -> Result<LogEntry> {
        self.api.get(LOGS_ENDPOINT, key, LOG_DEFAULT_FIELDS).await
    }

    /// List error and critical log entries.
    pub async fn list_error_logs(&self, limit: Option<u32>) -> Result<Vec<LogEntry>> {
        let mut query = LogQuery::new().errors_only();
        query.limit = limit;
        self.list_logs(&query).await
    }

    /// Search log text with an optional severity restriction.
    pub async fn search_logs(
        &self,
        text: &str,
        levels: &[&str],
    ) -> Result<Vec<LogEntry>> {
        let query = LogQuery::new()
            .with_text(text)
            .with_levels(levels.iter().copied());
        self.list_logs(&query).await
    }

    // Tags

    /// List tags, optionally restricted to one category.
    pub async fn list_tags(&self, category: Option<u64>) -> Result<Vec<Tag>> {
        let mut query = ListQuery::new().with_fields(TAG_DEFAULT_FIELDS.iter().copied());
        if let Some(category) = category {
            query = query.with_filter_str(format!("category eq {category}"));
        }
        self.api.list(TAGS_ENDPOINT, &query).await
    }

    /// Fetch a tag by key.
    pub async fn get_tag(&self, key: u64) -> Result<Tag> {
        self.api.get(TAGS_ENDPOINT, key, TAG_DEFAULT_FIELDS).await
    }

    /// Fetch a tag by name, optionally scoped to a category for uniqueness.
    pub async fn get_tag_by_name(&self, name: &str, category: Option<u64>) -> Result<Tag> {
        let mut filter = Filter::new().eq("name", name);
        if let Some(category) = category {
            filter = filter.eq("category", category);
        }
        let query = ListQuery::new()
            .with_filter(filter)
            .with_fields(TAG_DEFAULT_FIELDS.iter().copied())
            .with_limit(1);

        let mut tags: Vec<Tag> = self.api.list(TAGS_ENDPOINT, &query).await?;
        if tags.is_empty() {
            return Err(Error::NotFound(format!("tag '{name}' not found")));
        }
        Ok(tags.remove(0))
    }

    /// Create a tag and return the full record.
    pub async fn create_tag(&self, request: &CreateTagRequest) -> Result<Tag> {
        tracing::info!(name = %request.name, category = request.category, "creating tag");
        let reply = self.api.post(TAGS_ENDPOINT, request).await?;

        match key_from_reply(reply.as_ref()) {
            Some(key) => self.get_tag(key).await,
            None => {
                self.get_tag_by_name(&request.name, Some(request.category))
                    .await
            }
        }
    }

    /// Update a tag and return the refreshed record.
    pub async fn update_tag(&self, key: u64, request: &UpdateTagRequest) -> Result<Tag> {
        self.api
            .update::<_, Value>(TAGS_ENDPOINT, key, request)
            .await?;
        self.get_tag(key).await
    }

    /// Delete a tag. Membership records are removed with it.
    pub async fn delete_tag(&self, key: u64) -> Result<()> {
        self.api.delete(TAGS_ENDPOINT, key).await
    }

    // Tag categories

    /// List tag categories.
    pub async fn list_tag_categories(&self) -> Result<Vec<TagCategory>> {
        let query = ListQuery::new().with_fields(TAG_CATEGORY_DEFAULT_FIELDS.iter().copied());
        self.api.list(TAG_CATEGORIES_ENDPOINT, &query).await
    }

    /// Fetch a tag category by key.
    pub async fn get_tag_category(&self, key: u64) -> Result<TagCategory> {
        self.api
            .get(TAG_CATEGORIES_ENDPOINT, key, TAG_CATEGORY_DEFAULT_FIELDS)
            .await
    }

    /// Fetch a tag category by name.
    pub async fn get_tag_category_by_name(&self, name: &str) -> Result<TagCategory> {
        self.api
            .get_by_name(TAG_CATEGORIES_ENDPOINT, name, TAG_CATEGORY_DEFAULT_FIELDS)
            .await
    }

    /// Create a tag category and return the full record.
    pub async fn create_tag_category(
        &self,
        request: &CreateTagCategoryRequest,
    ) -> Result<TagCategory> {
        tracing::info!(name = %request.name, "creating tag category");
        let reply = self.api.post(TAG_CATEGORIES_ENDPOINT, request).await?;

        match key_from_reply(reply.as_ref()) {
            Some(key) => self.get_tag_category(key).await,
            None => self.get_tag_category_by_name(&request.name).await,
        }
    }

    /// Update a tag category and return the refreshed record.
    pub async fn update_tag_category(&self, key: u64, body: &Value) -> Result<TagCategory> {
        self.api
            .update::<_, Value>(TAG_CATEGORIES_ENDPOINT, key, body)
            .await?;
        self.get_tag_category(key).await
    }

    /// Delete a tag category. The category must hold no tags.
    pub async fn delete_tag_category(&self, key: u64) -> Result<()> {
        self.api.delete(TAG_CATEGORIES_ENDPOINT, key).await
    }

    // Tag members

    /// List membership records of a tag, optionally restricted to one
    /// resource type.
    pub async fn list_tag_members(
        &self,
        tag: u64,
        resource_type: Option<&str>,
    ) -> Result<Vec<TagMember>> {
        let query = ListQuery::new()
            .with_filter_str(format!("tag eq {tag}"))
            .with_fields(TAG_MEMBER_DEFAULT_FIELDS.iter().copied());

        let members: Vec<TagMember> = self.api.list(TAG_MEMBERS_ENDPOINT, &query).await?;
        // The member reference is an opaque string, so type scoping happens
        // client-side.
        Ok(match resource_type {
            Some(rtype) => members
                .into_iter()
                .filter(|m| m.resource_type() == Some(rtype))
                .collect(),
            None => members,
        })
    }

    /// Tag a resource. The membership is addressed as `{type}/{key}`.
    pub async fn add_tag_member(
        &self,
        tag: u64,
        resource_type: &str,
        resource_key: u64,
    ) -> Result<TagMember> {
        let member = format!("{resource_type}/{resource_key}");
        tracing::info!(tag, member = %member, "tagging resource");
        let body = json!({ "tag": tag, "member": member });
        let reply = self.api.post(TAG_MEMBERS_ENDPOINT, &body).await?;

        if let Some(key) = key_from_reply(reply.as_ref()) {
            return Ok(TagMember {
                key,
                tag: Some(tag),
                member: Some(member),
            });
        }

        // Sparse reply; find the membership we just created.
        let members = self.list_tag_members(tag, Some(resource_type)).await?;
        members
            .into_iter()
            .find(|m| m.resource_key() == Some(resource_key))
            .ok_or_else(|| Error::Api {
                status: 500,
                message: format!("failed to tag {member} with tag {tag}"),
            })
    }

    /// Remove a membership record by its key.
    pub async fn remove_tag_member(&self, member_key: u64) -> Result<()> {
        self.api.delete(TAG_MEMBERS_ENDPOINT, member_key).await
    }

    /// Untag a resource by type and key.
    pub async fn remove_tagged_resource(
        &self,
        tag: u64,
        resource_type: &str,
        resource_key: u64,
    ) -> Result<()> {
        let members = self.list_tag_members(tag, Some(resource_type)).await?;
        match members
            .into_iter()
            .find(|m| m.resource_key() == Some(resource_key))
        {
            Some(member) => self.remove_tag_member(member.key).await,
            None => Err(Error::NotFound(format!(
                "resource {resource_type}/{resource_key} is not tagged with tag {tag}"
            ))),
        }
    }

    // Tasks

    /// List automation tasks.
    pub async fn list_tasks(&self, params: &TaskListParams) -> Result<Vec<Task>> {
        let mut query = ListQuery::new().with_fields(TASK_DEFAULT_FIELDS.iter().copied());
        if let Some(filter) = params.filter_expression() {
            query = query.with_filter_str(filter);
        }
        if let Some(limit) = params.limit {
            query = query.with_limit(limit);
        }
        if let Some(offset) = params.offset {
            query = query.with_offset(offset);
        }
        self.api.list(TASKS_ENDPOINT, &query).await
    }

    /// Fetch a task by key.
    pub async fn get_task(&self, key: u64) -> Result<Task> {
        self.api.get(TASKS_ENDPOINT, key, TASK_DEFAULT_FIELDS).await
    }

    /// Fetch a task by name.
    pub async fn get_task_by_name(&self, name: &str) -> Result<Task> {
        self.api
            .get_by_name(TASKS_ENDPOINT, name, TASK_DEFAULT_FIELDS)
            .await
    }

    /// Enable a task and return the refreshed record.
    pub async fn enable_task(&self, key: u64) -> Result<Task> {
        self.set_task_enabled(key, true).await
    }

    /// Disable a task. A running task finishes its current run first.
    pub async fn disable_task(&self, key: u64) -> Result<Task> {
        self.set_task_enabled(key, false).await
    }

    async fn set_task_enabled(&self, key: u64, enabled: bool) -> Result<Task> {
        let body = json!({ "enabled": enabled });
        self.api
            .update::<_, Value>(TASKS_ENDPOINT, key, &body)
            .await?;
        self.get_task(key).await
    }

    /// Run a task immediately, regardless of its schedule.
    pub async fn execute_task(&self, key: u64, params: Option<Value>) -> Result<Task> {
        tracing::info!(task = key, "executing task");
        let body = params.unwrap_or_else(|| json!({}));
        self.api
            .action(TASKS_ENDPOINT, key, "execute", Some(&body))
            .await?;
        self.get_task(key).await
    }

    /// Cancel a running task. Not every task type honors cancellation.
    pub async fn cancel_task(&self, key: u64) -> Result<Task> {
        self.api
            .action::<Value>(TASKS_ENDPOINT, key, "cancel", None)
            .await?;
        self.get_task(key).await
    }

    // Users

    /// List user accounts, optionally filtered by enabled state.
    pub async fn list_users(&self, enabled: Option<bool>) -> Result<Vec<User>> {
        let mut query = ListQuery::new().with_fields(USER_DEFAULT_FIELDS.iter().copied());
        if let Some(enabled) = enabled {
            query = query.with_filter(Filter::new().eq("enabled", enabled));
        }
        self.api.list(USERS_ENDPOINT, &query).await
    }

    /// Fetch a user by key.
    pub async fn get_user(&self, key: u64) -> Result<User> {
        self.api.get(USERS_ENDPOINT, key, USER_DEFAULT_FIELDS).await
    }

    /// Fetch a user by name. Usernames are stored lowercase.
    pub async fn get_user_by_name(&self, name: &str) -> Result<User> {
        self.api
            .get_by_name(USERS_ENDPOINT, &name.to_lowercase(), USER_DEFAULT_FIELDS)
            .await
    }

    /// Create a user and return the full record.
    pub async fn create_user(&self, request: &CreateUserRequest) -> Result<User> {
        tracing::info!(name = %request.name, user_type = %request.user_type, "creating user");
        let reply = self.api.post(USERS_ENDPOINT, request).await?;

        match key_from_reply(reply.as_ref()) {
            Some(key) => self.get_user(key).await,
            None => self.get_user_by_name(&request.name).await,
        }
    }

    /// Update a user and return the refreshed record.
    pub async fn update_user(&self, key: u64, request: &UpdateUserRequest) -> Result<User> {
        self.api
            .update::<_, Value>(USERS_ENDPOINT, key, request)
            .await?;
        self.get_user(key).await
    }

    /// Delete a user account.
    pub async fn delete_user(&self, key: u64) -> Result<()> {
        self.api.delete(USERS_ENDPOINT, key).await
    }

    // Sites

    /// List sites, sorted by name.
    pub async fn list_sites(&self, enabled: Option<bool>) -> Result<Vec<Site>> {
        let mut query = ListQuery::new()
            .with_fields(SITE_DEFAULT_FIELDS.iter().copied())
            .with_sort("+name");
        if let Some(enabled) = enabled {
            query = query.with_filter(Filter::new().eq("enabled", enabled));
        }
        self.api.list(SITES_ENDPOINT, &query).await
    }

    /// Fetch a site by key.
    pub async fn get_site(&self, key: u64) -> Result<Site> {
        self.api.get(SITES_ENDPOINT, key, SITE_DEFAULT_FIELDS).await
    }

    /// Fetch a site by name.
    pub async fn get_site_by_name(&self, name: &str) -> Result<Site> {
        self.api
            .get_by_name(SITES_ENDPOINT, name, SITE_DEFAULT_FIELDS)
            .await
    }

    // Webhooks

    /// List webhook configurations.
    pub async fn list_webhooks(&self) -> Result<Vec<Webhook>> {
        let query = ListQuery::new().with_fields(WEBHOOK_DEFAULT_FIELDS.iter().copied());
        self.api.list(WEBHOOKS_ENDPOINT, &query).await
    }

    /// Fetch a webhook by key.
    pub async fn get_webhook(&self, key: u64) -> Result<Webhook> {
        self.api
            .get(WEBHOOKS_ENDPOINT, key, WEBHOOK_DEFAULT_FIELDS)
            .await
    }

    /// Fetch a webhook by name.
    pub async fn get_webhook_by_name(&self, name: &str) -> Result<Webhook> {
        self.api
            .get_by_name(WEBHOOKS_ENDPOINT, name, WEBHOOK_DEFAULT_FIELDS)
            .await
    }

    /// Create a webhook and return the full record.
    pub async fn create_webhook(&self, request: &CreateWebhookRequest) -> Result<Webhook> {
        tracing::info!(name = %request.name, url = %request.url, "creating webhook");
        let reply = self.api.post(WEBHOOKS_ENDPOINT, request).await?;

        match key_from_reply(reply.as_ref()) {
            Some(key) => self.get_webhook(key).await,
            None => self.get_webhook_by_name(&request.name).await,
        }
    }

    /// Update a webhook and return the refreshed record.
    pub async fn update_webhook(&self, key: u64, body: &Value) -> Result<Webhook> {
        self.api
            .update::<_, Value>(WEBHOOKS_ENDPOINT, key, body)
            .await?;
        self.get_webhook(key).await
    }

    /// Delete a webhook configuration.
    pub async fn delete_webhook(&self, key: u64) -> Result<()> {
        self.api.delete(WEBHOOKS_ENDPOINT, key).await
    }
}

fn key_from_reply(reply: Option<&Value>) -> Option<u64> {
    reply?.get("$key").and_then(Value::as_u64)
}
