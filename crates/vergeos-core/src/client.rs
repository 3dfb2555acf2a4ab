//! HTTP transport for the VergeOS v4 API.
//!
//! [`ApiClient`] wraps a single VergeOS system: one base URL
//! (`https://{host}/api/v4`), one set of credentials, and a retry policy for
//! transient failures. Service crates layer typed resource operations on top
//! of the generic `list`/`get`/`create`/`update`/`delete`/`action` calls,
//! which mirror how every VergeOS collection endpoint behaves.

use crate::error::{Error, Result};
use crate::filter::Filter;
use crate::query::ListQuery;
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Display;
use std::time::Duration;
use url::Url;

/// VergeOS API version the SDK speaks.
pub const API_VERSION: &str = "v4";

/// Default timeout for API requests, in seconds.
pub const DEFAULT_TIMEOUT: u64 = 30;

/// Default idle timeout for connection pools, in seconds.
pub const DEFAULT_POOL_IDLE_TIMEOUT: u64 = 90;

/// Default maximum idle connections per host.
pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 10;

/// Default maximum number of retry attempts.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default initial retry delay in milliseconds.
pub const DEFAULT_RETRY_DELAY_MS: u64 = 500;

/// Default maximum retry delay in milliseconds (cap for exponential backoff).
pub const DEFAULT_RETRY_MAX_DELAY_MS: u64 = 5000;

/// HTTP status codes that trigger an automatic retry.
pub const RETRY_STATUS_CODES: [u16; 5] = [429, 500, 502, 503, 504];

const USER_AGENT: &str = concat!("vergeos-rust/", env!("CARGO_PKG_VERSION"));

/// Retry policy with exponential backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts.
    pub max_retries: u32,

    /// Initial delay before first retry.
    pub initial_delay: Duration,

    /// Maximum delay between retries.
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Create a new retry policy with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
            max_delay: Duration::from_millis(DEFAULT_RETRY_MAX_DELAY_MS),
        }
    }

    /// Create a retry policy with no retries.
    #[must_use]
    pub const fn no_retry() -> Self {
        Self {
            max_retries: 0,
            initial_delay: Duration::from_millis(0),
            max_delay: Duration::from_millis(0),
        }
    }

    /// Set the maximum number of retries.
    #[must_use]
    pub const fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the initial delay.
    #[must_use]
    pub const fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set the maximum delay.
    #[must_use]
    pub const fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Calculate delay for a given attempt number.
    ///
    /// Uses exponential backoff: delay = min(initial_delay * 2^(attempt-1), max_delay).
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::from_secs(0);
        }

        let multiplier = 2u64.saturating_pow(attempt - 1);
        let delay_ms = (self.initial_delay.as_millis() as u64).saturating_mul(multiplier);
        std::cmp::min(Duration::from_millis(delay_ms), self.max_delay)
    }

    /// Check if retries are enabled.
    #[must_use]
    pub const fn has_retries(&self) -> bool {
        self.max_retries > 0
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// HTTP client configuration: timeouts and connection pooling.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout.
    pub timeout: Duration,

    /// Retry policy.
    pub retry_policy: RetryPolicy,

    /// Connection pool idle timeout.
    pub pool_idle_timeout: Duration,

    /// Maximum idle connections per host.
    pub pool_max_idle_per_host: usize,
}

impl ClientConfig {
    /// Create a new client configuration with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT),
            retry_policy: RetryPolicy::new(),
            pool_idle_timeout: Duration::from_secs(DEFAULT_POOL_IDLE_TIMEOUT),
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
        }
    }

    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set retry policy.
    #[must_use]
    pub const fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Disable retries.
    #[must_use]
    pub const fn without_retries(mut self) -> Self {
        self.retry_policy = RetryPolicy::no_retry();
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Credentials attached to every request.
#[derive(Clone, Debug)]
enum Auth {
    Basic {
        username: String,
        password: SecretString,
    },
    Token(SecretString),
}

/// System identity returned by the `system` endpoint on connect.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SystemInfo {
    /// System record key.
    #[serde(default, rename = "$key")]
    pub key: Option<u64>,
    /// VergeOS release version.
    #[serde(default)]
    pub yb_version: Option<String>,
    /// Underlying OS version.
    #[serde(default)]
    pub os_version: Option<String>,
    /// Configured cloud name.
    #[serde(default)]
    pub cloud_name: Option<String>,
}

/// Builder for [`ApiClient`].
#[derive(Clone)]
pub struct ApiClientBuilder {
    base_url: String,
    auth: Option<Auth>,
    tls_verify: bool,
    config: ClientConfig,
    user_agent: String,
}

impl ApiClientBuilder {
    /// Create a builder for the given host.
    ///
    /// `host` may be a bare hostname/IP (scheme defaults to `https`) or a
    /// full URL; the `/api/v4` base path is appended either way.
    #[must_use]
    pub fn new(host: impl AsRef<str>) -> Self {
        let host = host.as_ref();
        let base_url = if host.contains("://") {
            format!("{}/api/{API_VERSION}/", host.trim_end_matches('/'))
        } else {
            format!("https://{host}/api/{API_VERSION}/")
        };

        Self {
            base_url,
            auth: None,
            tls_verify: true,
            config: ClientConfig::new(),
            user_agent: USER_AGENT.to_string(),
        }
    }

    /// Configure HTTP basic authentication credentials.
    #[must_use]
    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.auth = Some(Auth::Basic {
            username: username.into(),
            password: SecretString::from(password.into()),
        });
        self
    }

    /// Configure bearer-token authentication.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.auth = Some(Auth::Token(SecretString::from(token.into())));
        self
    }

    /// Enable or disable TLS certificate verification.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Override the retry policy.
    #[must_use]
    pub const fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.config.retry_policy = retry;
        self
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Override the User-Agent header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when no credentials were supplied,
    /// [`Error::InvalidEndpoint`] for an unparseable host, or
    /// [`Error::Http`] if the underlying HTTP client cannot be constructed.
    pub fn build(self) -> Result<ApiClient> {
        let base_url = Url::parse(&self.base_url)?;
        let auth = self
            .auth
            .ok_or_else(|| Error::Config("either token or username/password required".into()))?;

        let http = reqwest::Client::builder()
            .timeout(self.config.timeout)
            .pool_idle_timeout(self.config.pool_idle_timeout)
            .pool_max_idle_per_host(self.config.pool_max_idle_per_host)
            .danger_accept_invalid_certs(!self.tls_verify)
            .user_agent(self.user_agent)
            .build()
            .map_err(|err| Error::Http(err.to_string()))?;

        Ok(ApiClient {
            http,
            base_url,
            auth,
            retry: self.config.retry_policy,
        })
    }
}

/// Asynchronous client for one VergeOS system.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    auth: Auth,
    retry: RetryPolicy,
}

impl ApiClient {
    /// Return the base URL (including the `/api/v4` path).
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Validate connectivity and credentials against the `system` endpoint.
    pub async fn connect(&self) -> Result<SystemInfo> {
        let params = [(
            "fields",
            "$key,yb_version,os_version,cloud_name".to_string(),
        )];
        let value = self.request(Method::GET, "system", &params, None).await?;

        // The endpoint answers with either an object or a one-element list.
        let value = match value {
            Some(Value::Array(mut items)) if !items.is_empty() => items.remove(0),
            Some(other) => other,
            None => {
                return Err(Error::ConnectionFailed(
                    "empty response from system endpoint".into(),
                ))
            }
        };

        serde_json::from_value(value)
            .map_err(|err| Error::Parse(format!("invalid system response: {err}")))
    }

    /// List a collection endpoint.
    ///
    /// A single-object reply (non-array) is treated as a one-element list.
    pub async fn list<T>(&self, endpoint: &str, query: &ListQuery) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let value = self
            .request(Method::GET, endpoint, &query.to_pairs(), None)
            .await?;

        let items = match value {
            None => return Ok(Vec::new()),
            Some(Value::Array(items)) => items,
            Some(single) => vec![single],
        };

        items
            .into_iter()
            .map(|item| {
                serde_json::from_value(item).map_err(|err| {
                    Error::Parse(format!("invalid `{endpoint}` list item: {err}"))
                })
            })
            .collect()
    }

    /// Fetch a single record by key.
    pub async fn get<T>(&self, endpoint: &str, key: impl Display, fields: &[&str]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let path = format!("{endpoint}/{key}");
        let mut params = Vec::new();
        if !fields.is_empty() {
            params.push(("fields", fields.join(",")));
        }

        let value = self
            .request(Method::GET, &path, &params, None)
            .await?
            .ok_or_else(|| Error::NotFound(format!("{path} not found")))?;

        serde_json::from_value(value)
            .map_err(|err| Error::Parse(format!("invalid `{path}` response: {err}")))
    }

    /// Fetch a single record by its `name` field.
    ///
    /// Quotes embedded in the name are escaped before entering the filter.
    pub async fn get_by_name<T>(&self, endpoint: &str, name: &str, fields: &[&str]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let query = ListQuery::new()
            .with_filter(Filter::new().eq("name", name))
            .with_fields(fields.iter().copied())
            .with_limit(1);

        let mut results: Vec<T> = self.list(endpoint, &query).await?;
        if results.is_empty() {
            return Err(Error::NotFound(format!(
                "{endpoint} with name '{name}' not found"
            )));
        }
        Ok(results.remove(0))
    }

    /// Create a record.
    pub async fn create<B, T>(&self, endpoint: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        let value = self
            .request(Method::POST, endpoint, &[], Some(&body))
            .await?
            .ok_or_else(|| Error::Parse(format!("empty response creating `{endpoint}`")))?;

        serde_json::from_value(value)
            .map_err(|err| Error::Parse(format!("invalid `{endpoint}` create response: {err}")))
    }

    /// Update a record; an empty reply triggers a re-fetch of the record.
    pub async fn update<B, T>(&self, endpoint: &str, key: impl Display, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let key = key.to_string();
        let path = format!("{endpoint}/{key}");
        let body = serde_json::to_value(body)?;
        let value = self
            .request(Method::PUT, &path, &[], Some(&body))
            .await?;

        match value {
            Some(obj @ Value::Object(_)) => serde_json::from_value(obj)
                .map_err(|err| Error::Parse(format!("invalid `{path}` response: {err}"))),
            _ => self.get(endpoint, &key, &[]).await,
        }
    }

    /// Delete a record by key.
    pub async fn delete(&self, endpoint: &str, key: impl Display) -> Result<()> {
        let path = format!("{endpoint}/{key}");
        self.request(Method::DELETE, &path, &[], None).await?;
        Ok(())
    }

    /// Execute a named action on a record (`PUT {endpoint}/{key}?action={name}`).
    pub async fn action<B>(
        &self,
        endpoint: &str,
        key: impl Display,
        action: &str,
        body: Option<&B>,
    ) -> Result<Option<Value>>
    where
        B: Serialize + ?Sized,
    {
        let path = format!("{endpoint}/{key}");
        let params = [("action", action.to_string())];
        let body = match body {
            Some(body) => Some(serde_json::to_value(body)?),
            None => None,
        };
        self.request(Method::PUT, &path, &params, body.as_ref())
            .await
    }

    /// POST a payload to an endpoint, returning the raw reply if any.
    pub async fn post<B>(&self, endpoint: &str, body: &B) -> Result<Option<Value>>
    where
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(body)?;
        self.request(Method::POST, endpoint, &[], Some(&body)).await
    }

    /// Issue a request with retry, returning the parsed JSON body if any.
    async fn request(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Option<Value>> {
        let url = self.base_url.join(path)?;
        let mut attempt: u32 = 0;

        loop {
            tracing::debug!(%method, %url, attempt, "vergeos api request");

            let mut request = self.http.request(method.clone(), url.clone());
            if !params.is_empty() {
                request = request.query(params);
            }
            request = request.header("Accept", "application/json");
            request = match &self.auth {
                Auth::Basic { username, password } => {
                    request.basic_auth(username, Some(password.expose_secret()))
                }
                Auth::Token(token) => request.bearer_auth(token.expose_secret()),
            };
            if let Some(payload) = body {
                request = request.json(payload);
            }

            let response = match request.send().await {
                Ok(response) => response,
                Err(err) => {
                    let err = Error::from(err);
                    if err.is_retryable() && attempt < self.retry.max_retries {
                        attempt += 1;
                        let delay = self.retry.delay_for_attempt(attempt);
                        tracing::warn!(%url, attempt, error = %err, "retrying after transport error");
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(err);
                }
            };

            let status = response.status();
            if status.is_success() {
                if status == StatusCode::NO_CONTENT {
                    return Ok(None);
                }
                let text = response.text().await.map_err(Error::from)?;
                if text.is_empty() {
                    return Ok(None);
                }
                let value = serde_json::from_str(&text)
                    .map_err(|err| Error::Parse(format!("invalid JSON from `{path}`: {err}")))?;
                return Ok(Some(value));
            }

            let retryable = RETRY_STATUS_CODES.contains(&status.as_u16());
            if retryable && attempt < self.retry.max_retries {
                attempt += 1;
                let delay = self.retry.delay_for_attempt(attempt);
                tracing::warn!(%url, %status, attempt, "retrying after status");
                tokio::time::sleep(delay).await;
                continue;
            }

            let text = response.text().await.unwrap_or_default();
            let message = extract_error_message(status, &text);
            return Err(Error::from_status(status, message));
        }
    }
}

/// Pull a human-readable message out of an error response body.
///
/// VergeOS uses `err`, `error`, or `message` fields, sometimes nested as
/// `{"error": {"message": "..."}}`.
fn extract_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        for field in ["err", "error", "message"] {
            match map.get(field) {
                Some(Value::String(message)) => return message.clone(),
                Some(Value::Object(inner)) => {
                    if let Some(Value::String(message)) = inner.get("message") {
                        return message.clone();
                    }
                }
                _ => {}
            }
        }
        return Value::Object(map).to_string();
    }

    if body.is_empty() {
        format!("HTTP {status}")
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> ApiClient {
        ApiClientBuilder::new(server.uri())
            .with_basic_auth("admin", "secret")
            .with_retry_policy(
                RetryPolicy::new()
                    .with_initial_delay(Duration::from_millis(1))
                    .with_max_delay(Duration::from_millis(2)),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn builder_requires_credentials() {
        let err = ApiClientBuilder::new("verge.example.com").build().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn builder_derives_base_url_from_bare_host() {
        let client = ApiClientBuilder::new("192.168.1.100")
            .with_token("tok")
            .build()
            .unwrap();
        assert_eq!(
            client.base_url().as_str(),
            "https://192.168.1.100/api/v4/"
        );
    }

    #[test]
    fn retry_policy_backoff_doubles_and_caps() {
        let policy = RetryPolicy::new();
        assert_eq!(policy.delay_for_attempt(0), Duration::from_secs(0));
        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(500));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(1000));
        assert_eq!(policy.delay_for_attempt(3), Duration::from_millis(2000));
        assert_eq!(policy.delay_for_attempt(4), Duration::from_millis(4000));
        assert_eq!(policy.delay_for_attempt(5), Duration::from_millis(5000));
        assert_eq!(policy.delay_for_attempt(10), Duration::from_millis(5000));
    }

    #[test]
    fn retry_policy_no_retry() {
        let policy = RetryPolicy::no_retry();
        assert!(!policy.has_retries());
        assert_eq!(policy.max_retries, 0);
    }

    #[tokio::test]
    async fn connect_parses_system_info() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/system"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "$key": 1,
                    "yb_version": "4.13.2",
                    "os_version": "2.8",
                    "cloud_name": "lab"
                }
            ])))
            .mount(&server)
            .await;

        let info = test_client(&server).connect().await.unwrap();
        assert_eq!(info.yb_version.as_deref(), Some("4.13.2"));
        assert_eq!(info.cloud_name.as_deref(), Some("lab"));
    }

    #[tokio::test]
    async fn connect_maps_auth_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/system"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"err": "invalid credentials"})),
            )
            .mount(&server)
            .await;

        let err = test_client(&server).connect().await.unwrap_err();
        assert_eq!(
            err,
            Error::AuthenticationFailed("invalid credentials".into())
        );
    }

    #[tokio::test]
    async fn list_tolerates_single_object_reply() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/vms"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"$key": 7, "name": "vm-a"})),
            )
            .mount(&server)
            .await;

        let items: Vec<Value> = test_client(&server)
            .list("vms", &ListQuery::new())
            .await
            .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["name"], "vm-a");
    }

    #[tokio::test]
    async fn get_maps_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/vms/99"))
            .respond_with(ResponseTemplate::new(404).set_body_string("missing"))
            .mount(&server)
            .await;

        let err = test_client(&server)
            .get::<Value>("vms", 99, &[])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn get_by_name_escapes_quotes_in_filter() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/vms"))
            .and(query_param("filter", "name eq 'O''Brien'"))
            .and(query_param("limit", "1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([{"$key": 3, "name": "O'Brien"}])),
            )
            .mount(&server)
            .await;

        let vm: Value = test_client(&server)
            .get_by_name("vms", "O'Brien", &[])
            .await
            .unwrap();
        assert_eq!(vm["$key"], 3);
    }

    #[tokio::test]
    async fn retries_on_service_unavailable_then_succeeds() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/vms"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v4/vms"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let items: Vec<Value> = test_client(&server)
            .list("vms", &ListQuery::new())
            .await
            .unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn no_retry_on_client_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/vms/1"))
            .respond_with(
                ResponseTemplate::new(409).set_body_json(json!({"error": {"message": "busy"}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let err = test_client(&server)
            .get::<Value>("vms", 1, &[])
            .await
            .unwrap_err();
        assert_eq!(err, Error::Conflict("busy".into()));
    }

    #[tokio::test]
    async fn delete_accepts_no_content() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/v4/vms/5"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        test_client(&server).delete("vms", 5).await.unwrap();
    }

    #[tokio::test]
    async fn update_refetches_on_empty_reply() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/v4/vms/5"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v4/vms/5"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"$key": 5, "name": "after"})),
            )
            .mount(&server)
            .await;

        let updated: Value = test_client(&server)
            .update("vms", 5, &json!({"name": "after"}))
            .await
            .unwrap();
        assert_eq!(updated["name"], "after");
    }

    #[tokio::test]
    async fn action_sends_action_query_param() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/v4/machine_snapshots/8"))
            .and(query_param("action", "restore"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"task": 12})))
            .mount(&server)
            .await;

        let reply = test_client(&server)
            .action("machine_snapshots", 8, "restore", Some(&json!({})))
            .await
            .unwrap();
        assert_eq!(reply.unwrap()["task"], 12);
    }

    #[test]
    fn error_message_extraction_prefers_known_fields() {
        let status = StatusCode::BAD_REQUEST;
        assert_eq!(
            extract_error_message(status, r#"{"err": "first"}"#),
            "first"
        );
        assert_eq!(
            extract_error_message(status, r#"{"error": "second"}"#),
            "second"
        );
        assert_eq!(
            extract_error_message(status, r#"{"message": "third"}"#),
            "third"
        );
        assert_eq!(
            extract_error_message(status, r#"{"error": {"message": "nested"}}"#),
            "nested"
        );
        assert_eq!(extract_error_message(status, "plain text"), "plain text");
        assert_eq!(
            extract_error_message(status, ""),
            "HTTP 400 Bad Request"
        );
    }
}
