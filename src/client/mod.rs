//! Authenticated HTTP client for the task API.
//!
//! [`TaskClient`] translates task and auth operations into HTTP calls and
//! typed results. Every task operation passes three gates before dispatch:
//!
//! 1. **Origin check** -- the target URL's host must match the configured
//!    API host (or a subdomain of it); a mismatch is a
//!    [`ClientError::Config`], raised before any network traffic.
//! 2. **Rate limit** -- each operation is keyed (per resource id where
//!    applicable) through the injected [`RateLimiter`], which delays
//!    over-quota calls rather than rejecting them.
//! 3. **Session attachment** -- if the [`SessionProvider`] holds a token
//!    it is attached as a bearer header; if not, the request goes out
//!    unauthenticated and the server makes the call.
//!
//! Non-2xx responses map to [`ClientError`] variants; see the error module
//! for the exact status taxonomy.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use taskdeck::{ClientConfig, TaskClient};
//! use taskdeck::session::MemorySessionStore;
//! use taskdeck::types::TaskFilter;
//!
//! # async fn example() -> Result<(), taskdeck::ClientError> {
//! let config = ClientConfig::new("https://api.example.com")?;
//! let client = TaskClient::new(config, Arc::new(MemorySessionStore::new()))?;
//!
//! let tasks = client.list_tasks(&TaskFilter::default()).await?;
//! println!("{} tasks", tasks.len());
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ClientError, GENERIC_FAILURE_MESSAGE};
use crate::rate_limit::RateLimiter;
use crate::session::SessionProvider;
use crate::types::{
    AuthToken, Credentials, Registration, Task, TaskCreate, TaskFilter, TaskUpdate, UserProfile,
};

/// Client for the task-tracking REST API.
///
/// Cheap to share: wrap it in an [`Arc`] and clone the handle. All state
/// (HTTP connection pool, rate-limit windows, session) lives behind
/// shared ownership already.
pub struct TaskClient {
    http: reqwest::Client,
    config: ClientConfig,
    limiter: Arc<RateLimiter>,
    sessions: Arc<dyn SessionProvider>,
}

impl std::fmt::Debug for TaskClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskClient")
            .field("base_url", &self.config.base_url().as_str())
            .field("dev_mode", &self.config.dev_mode())
            .finish_non_exhaustive()
    }
}

impl TaskClient {
    /// Creates a client with a rate limiter built from the config's knobs.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Network`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(
        config: ClientConfig,
        sessions: Arc<dyn SessionProvider>,
    ) -> Result<Self, ClientError> {
        let limiter = Arc::new(
            RateLimiter::new(config.rate_window(), config.rate_max_requests())
                .with_delay(config.rate_delay()),
        );
        Self::with_limiter(config, sessions, limiter)
    }

    /// Creates a client sharing an externally owned rate limiter.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Network`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn with_limiter(
        config: ClientConfig,
        sessions: Arc<dyn SessionProvider>,
        limiter: Arc<RateLimiter>,
    ) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self {
            http,
            config,
            limiter,
            sessions,
        })
    }

    /// The client's configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The session provider consulted before each request.
    pub fn sessions(&self) -> &Arc<dyn SessionProvider> {
        &self.sessions
    }

    /// Resolves `path` against the base URL and verifies the result still
    /// points at the API host.
    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        let base = self.config.base_url().as_str().trim_end_matches('/');
        let url = Url::parse(&format!("{base}{path}"))
            .map_err(|e| ClientError::Config(format!("invalid request URL: {e}")))?;

        if !self.config.verify_origin(&url) {
            return Err(ClientError::Config(format!(
                "request target {} does not match the configured API host",
                url
            )));
        }
        Ok(url)
    }

    /// Builds a request with the session token attached when one exists.
    async fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match self.sessions.current().await {
            Some(session) => builder.bearer_auth(session.token),
            None => builder,
        }
    }

    /// Dispatches a rate-limited task-API request and decodes the JSON body.
    async fn send_json<T: DeserializeOwned>(
        &self,
        key: &str,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<T, ClientError> {
        let response = self.send_raw(key, method, path, body).await?;
        let checked = self.check_status(response).await?;
        Ok(checked.json().await?)
    }

    /// Like [`send_json`](Self::send_json) but expects an empty (204) body.
    async fn send_empty(
        &self,
        key: &str,
        method: Method,
        path: &str,
    ) -> Result<(), ClientError> {
        let response = self.send_raw(key, method, path, None).await?;
        self.check_status(response).await?;
        Ok(())
    }

    async fn send_raw(
        &self,
        key: &str,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<Response, ClientError> {
        let url = self.endpoint(path)?;
        self.limiter.delay_if_limited(key).await;

        debug!(%method, %url, "dispatching API request");
        let mut builder = self.request(method, url).await;
        if let Some(body) = body {
            builder = builder.json(body);
        }
        Ok(builder.send().await?)
    }

    /// Maps a non-2xx response to the matching [`ClientError`].
    ///
    /// `expose_detail` forces the body's `detail`/`message` through even
    /// outside development mode; auth endpoints use it so login failures
    /// stay actionable.
    async fn fail_with_status(
        &self,
        response: Response,
        expose_detail: bool,
    ) -> ClientError {
        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED => ClientError::SessionExpired,
            StatusCode::FORBIDDEN => ClientError::AccessDenied,
            StatusCode::NOT_FOUND => ClientError::NotFound,
            s if s.is_server_error() => {
                warn!(status = s.as_u16(), "server error");
                ClientError::Server { status: s.as_u16() }
            }
            s => {
                let message = if expose_detail || self.config.dev_mode() {
                    body_detail(response).await.unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string())
                } else {
                    GENERIC_FAILURE_MESSAGE.to_string()
                };
                ClientError::Api {
                    status: s.as_u16(),
                    message,
                }
            }
        }
    }

    async fn check_status(&self, response: Response) -> Result<Response, ClientError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(self.fail_with_status(response, false).await)
        }
    }

    async fn check_auth_status(&self, response: Response) -> Result<Response, ClientError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(self.fail_with_status(response, true).await)
        }
    }

    // ---- task operations ----

    /// Lists tasks matching `filter`. Unset criteria are omitted from the
    /// query string.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] on origin mismatch, transport failure,
    /// or a non-2xx response.
    #[instrument(skip(self, filter))]
    pub async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, ClientError> {
        let mut url = self.endpoint("/tasks")?;
        {
            let mut qp = url.query_pairs_mut();
            for (key, value) in filter.query_pairs() {
                qp.append_pair(&key, &value);
            }
        }
        // query_pairs_mut leaves a bare '?' behind when nothing was added.
        if url.query() == Some("") {
            url.set_query(None);
        }

        self.limiter.delay_if_limited("api_tasks_get").await;
        debug!(%url, "listing tasks");
        let response = self.request(Method::GET, url).await.send().await?;
        let checked = self.check_status(response).await?;
        Ok(checked.json().await?)
    }

    /// Fetches a single task by id.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] when the id does not exist, or
    /// any other [`ClientError`] per the status taxonomy.
    pub async fn get_task(&self, id: i64) -> Result<Task, ClientError> {
        self.send_json(
            &format!("api_task_get_{id}"),
            Method::GET,
            &format!("/tasks/{id}"),
            None,
        )
        .await
    }

    /// Creates a task.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] on origin mismatch, transport failure,
    /// or a non-2xx response.
    pub async fn create_task(&self, task: &TaskCreate) -> Result<Task, ClientError> {
        let body = serde_json::to_value(task)
            .map_err(|e| ClientError::Config(format!("unserializable request body: {e}")))?;
        self.send_json("api_task_create", Method::POST, "/tasks", Some(&body))
            .await
    }

    /// Replaces a task (PUT).
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] on origin mismatch, transport failure,
    /// or a non-2xx response.
    pub async fn update_task(&self, id: i64, update: &TaskUpdate) -> Result<Task, ClientError> {
        let body = serde_json::to_value(update)
            .map_err(|e| ClientError::Config(format!("unserializable request body: {e}")))?;
        self.send_json(
            &format!("api_task_update_{id}"),
            Method::PUT,
            &format!("/tasks/{id}"),
            Some(&body),
        )
        .await
    }

    /// Partially updates a task (PATCH); only the set fields are sent.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] on origin mismatch, transport failure,
    /// or a non-2xx response.
    pub async fn patch_task(&self, id: i64, update: &TaskUpdate) -> Result<Task, ClientError> {
        let body = serde_json::to_value(update)
            .map_err(|e| ClientError::Config(format!("unserializable request body: {e}")))?;
        self.send_json(
            &format!("api_task_patch_{id}"),
            Method::PATCH,
            &format!("/tasks/{id}"),
            Some(&body),
        )
        .await
    }

    /// Deletes a task. A 204 response yields `Ok(())`.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] on origin mismatch, transport failure,
    /// or a non-2xx response.
    pub async fn delete_task(&self, id: i64) -> Result<(), ClientError> {
        self.send_empty(
            &format!("api_task_delete_{id}"),
            Method::DELETE,
            &format!("/tasks/{id}"),
        )
        .await
    }

    /// Toggles a task's completion via the dedicated endpoint (no body).
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] on origin mismatch, transport failure,
    /// or a non-2xx response.
    pub async fn toggle_completion(&self, id: i64) -> Result<Task, ClientError> {
        self.send_json(
            &format!("api_task_toggle_{id}"),
            Method::PATCH,
            &format!("/tasks/{id}/complete"),
            None,
        )
        .await
    }

    // ---- auth operations ----
    //
    // Auth calls bypass the rate limiter and always expose the server's
    // detail message; a masked "something went wrong" on a login form is
    // useless.

    /// Logs in with form-encoded credentials and stores nothing -- the
    /// caller decides what to do with the token (typically
    /// [`SessionProvider::store`]).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Api`] with the server's detail message on
    /// rejected credentials.
    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthToken, ClientError> {
        let url = self.endpoint("/auth/login")?;
        let response = self.http.post(url).form(credentials).send().await?;
        let checked = self.check_auth_status(response).await?;
        Ok(checked.json().await?)
    }

    /// Registers a new account with a JSON body. The server logs the new
    /// account in immediately and returns a token, same as
    /// [`login`](Self::login).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Api`] with the server's detail message on
    /// rejected registration (duplicate email, weak password).
    pub async fn register(&self, registration: &Registration) -> Result<AuthToken, ClientError> {
        let url = self.endpoint("/auth/register")?;
        let response = self.http.post(url).json(registration).send().await?;
        let checked = self.check_auth_status(response).await?;
        Ok(checked.json().await?)
    }

    /// Fetches the authenticated user's profile with the stored token.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::SessionExpired`] when the token is no
    /// longer accepted.
    pub async fn profile(&self) -> Result<UserProfile, ClientError> {
        let url = self.endpoint("/auth/profile")?;
        let response = self.request(Method::GET, url).await.send().await?;
        let checked = self.check_auth_status(response).await?;
        Ok(checked.json().await?)
    }
}

/// Best-effort extraction of a `detail` or `message` field from an error
/// body.
async fn body_detail(response: Response) -> Option<String> {
    let body: serde_json::Value = response.json().await.ok()?;
    body.get("detail")
        .or_else(|| body.get("message"))
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySessionStore;

    fn client(base: &str) -> TaskClient {
        let config = ClientConfig::new(base).unwrap();
        TaskClient::new(config, Arc::new(MemorySessionStore::new())).unwrap()
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        let client = client("https://api.example.com/");
        let url = client.endpoint("/tasks/3").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/tasks/3");
    }

    #[test]
    fn endpoint_preserves_base_path() {
        let client = client("https://api.example.com/v1");
        let url = client.endpoint("/tasks").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v1/tasks");
    }

    #[test]
    fn endpoint_rejects_origin_escape() {
        let client = client("https://api.example.com");
        // A crafted path that would resolve to a different authority.
        let err = client.endpoint("@evil.com/tasks").unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }
}
