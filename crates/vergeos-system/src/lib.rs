//! Logs, tags, tasks, users, sites and webhooks for the VergeOS v4 API.
//!
//! These are the cross-cutting system resources of a VergeOS installation.
//! The log endpoint is notable for using microsecond timestamps and
//! contains-search (`ct`) filters; everything else follows the standard
//! list/get/create/update/delete shape.
//!
//! # Example
//!
//! ```no_run
//! use vergeos_core::VergeConfig;
//! use vergeos_system::{LogQuery, SystemClient};
//!
//! # async fn example() -> vergeos_system::Result<()> {
//! let api = VergeConfig::new("verge.example.com")?
//!     .with_credentials("admin", "secret")
//!     .build_client()?;
//! let system = SystemClient::new(api);
//!
//! let recent_errors = system
//!     .list_logs(&LogQuery::new().errors_only().with_limit(50))
//!     .await?;
//! for entry in recent_errors {
//!     println!("[{}] {}", entry.level_display(), entry.text.unwrap_or_default());
//! }
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod models;

pub use client::SystemClient;
pub use models::{
    log_object_type_api_value, log_object_type_display, resource_type_display,
    webhook_auth_type_display, CreateTagCategoryRequest, CreateTagRequest, CreateUserRequest,
    CreateWebhookRequest, LogEntry, LogQuery, Site, Tag, TagCategory, TagMember, Task,
    TaskListParams, UpdateTagRequest, UpdateUserRequest, User, Webhook, LOG_DEFAULT_FIELDS,
    LOG_LEVELS, SITE_DEFAULT_FIELDS, TAGGABLE_RESOURCE_TYPES, TAG_CATEGORY_DEFAULT_FIELDS,
    TAG_DEFAULT_FIELDS, TAG_MEMBER_DEFAULT_FIELDS, TASK_DEFAULT_FIELDS, USER_DEFAULT_FIELDS,
    WEBHOOK_DEFAULT_FIELDS,
};

/// Convenience alias re-exporting the core result type.
pub type Result<T> = vergeos_core::Result<T>;
