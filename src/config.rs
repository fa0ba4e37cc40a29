//! Client configuration: API base URL, development mode, and the knobs
//! for rate limiting, notifications, and session refresh.
//!
//! A [`ClientConfig`] is constructed once per process -- either explicitly
//! via [`ClientConfig::new`] or from the environment via
//! [`ClientConfig::from_env`] -- and handed to the components that need it.
//! There is no ambient/global configuration.
//!
//! # Environment
//!
//! | Variable           | Meaning                                          |
//! |--------------------|--------------------------------------------------|
//! | `TASKDECK_API_URL` | API base URL. Absence is a hard config error.    |
//! | `TASKDECK_ENV`     | `development` enables detailed API error bodies. |

use std::time::Duration;

use url::Url;

use crate::error::ClientError;

/// Environment variable supplying the API base URL.
pub const ENV_API_URL: &str = "TASKDECK_API_URL";

/// Environment variable selecting the runtime mode. The value
/// `development` exposes server error details in [`ClientError::Api`]
/// messages; any other value (or absence) genericizes them.
pub const ENV_MODE: &str = "TASKDECK_ENV";

/// Default rate-limit window (10 requests per 60 000 ms).
pub const DEFAULT_RATE_WINDOW: Duration = Duration::from_millis(60_000);

/// Default maximum requests per key per window.
pub const DEFAULT_RATE_MAX_REQUESTS: u32 = 10;

/// Default delay applied to a throttled call before it is let through.
pub const DEFAULT_RATE_DELAY: Duration = Duration::from_millis(1_000);

/// Default lifetime of a transient notification before auto-dismissal.
pub const DEFAULT_NOTIFICATION_TTL: Duration = Duration::from_millis(5_000);

/// Default interval between background session re-validations.
pub const DEFAULT_SESSION_REFRESH_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Configuration for [`TaskClient`](crate::client::TaskClient) and the
/// components built on top of it.
///
/// # Examples
///
/// ```
/// use taskdeck::ClientConfig;
///
/// let config = ClientConfig::new("https://api.example.com").unwrap();
/// assert_eq!(config.base_url().host_str(), Some("api.example.com"));
/// assert!(!config.dev_mode());
///
/// // Builder methods adjust individual knobs.
/// let config = config.with_dev_mode(true);
/// assert!(config.dev_mode());
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_url: Url,
    dev_mode: bool,
    rate_window: Duration,
    rate_max_requests: u32,
    rate_delay: Duration,
    notification_ttl: Duration,
    session_refresh_interval: Duration,
}

impl ClientConfig {
    /// Creates a configuration from an absolute API base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if the URL does not parse or has
    /// no host (the origin check in the client needs one).
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let url = Url::parse(base_url)
            .map_err(|e| ClientError::Config(format!("invalid API base URL: {e}")))?;
        if url.host_str().is_none() {
            return Err(ClientError::Config(
                "API base URL has no host".to_string(),
            ));
        }

        Ok(Self {
            base_url: url,
            dev_mode: false,
            rate_window: DEFAULT_RATE_WINDOW,
            rate_max_requests: DEFAULT_RATE_MAX_REQUESTS,
            rate_delay: DEFAULT_RATE_DELAY,
            notification_ttl: DEFAULT_NOTIFICATION_TTL,
            session_refresh_interval: DEFAULT_SESSION_REFRESH_INTERVAL,
        })
    }

    /// Creates a configuration from the process environment.
    ///
    /// Reads [`ENV_API_URL`] for the base URL and [`ENV_MODE`] for the
    /// runtime mode.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if [`ENV_API_URL`] is unset or
    /// invalid. A missing base URL is a hard error for any API call, so
    /// it is rejected at construction time rather than at dispatch time.
    pub fn from_env() -> Result<Self, ClientError> {
        let base = std::env::var(ENV_API_URL)
            .map_err(|_| ClientError::Config(format!("{ENV_API_URL} is not set")))?;
        let dev_mode = std::env::var(ENV_MODE).is_ok_and(|v| v == "development");
        Ok(Self::new(&base)?.with_dev_mode(dev_mode))
    }

    /// Sets development mode, which exposes server error details in
    /// [`ClientError::Api`](crate::error::ClientError::Api) messages.
    pub fn with_dev_mode(mut self, dev_mode: bool) -> Self {
        self.dev_mode = dev_mode;
        self
    }

    /// Sets the rate-limit window and per-window request cap.
    pub fn with_rate_limit(mut self, window: Duration, max_requests: u32) -> Self {
        self.rate_window = window;
        self.rate_max_requests = max_requests;
        self
    }

    /// Sets the delay applied to a throttled call.
    pub fn with_rate_delay(mut self, delay: Duration) -> Self {
        self.rate_delay = delay;
        self
    }

    /// Sets how long a transient notification stays before auto-dismissal.
    pub fn with_notification_ttl(mut self, ttl: Duration) -> Self {
        self.notification_ttl = ttl;
        self
    }

    /// Sets the background session re-validation interval.
    pub fn with_session_refresh_interval(mut self, interval: Duration) -> Self {
        self.session_refresh_interval = interval;
        self
    }

    /// The configured API base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Whether development mode is enabled.
    pub fn dev_mode(&self) -> bool {
        self.dev_mode
    }

    /// The rate-limit window.
    pub fn rate_window(&self) -> Duration {
        self.rate_window
    }

    /// The per-window request cap.
    pub fn rate_max_requests(&self) -> u32 {
        self.rate_max_requests
    }

    /// The delay applied to a throttled call.
    pub fn rate_delay(&self) -> Duration {
        self.rate_delay
    }

    /// The notification auto-dismiss lifetime.
    pub fn notification_ttl(&self) -> Duration {
        self.notification_ttl
    }

    /// The background session re-validation interval.
    pub fn session_refresh_interval(&self) -> Duration {
        self.session_refresh_interval
    }

    /// Verifies that `target` points at the configured API host or a
    /// subdomain of it. Every outgoing request passes this check before
    /// dispatch; a mismatch is a configuration error, not a network error.
    pub fn verify_origin(&self, target: &Url) -> bool {
        let Some(api_host) = self.base_url.host_str() else {
            return false;
        };
        let Some(target_host) = target.host_str() else {
            return false;
        };

        target_host == api_host || target_host.ends_with(&format!(".{api_host}"))
    }
}
