//! Session state: token storage and background re-validation.
//!
//! The client reads the current session through the [`SessionProvider`]
//! trait before each request; if no session is present the request goes
//! out without an `Authorization` header and the server makes the auth
//! decision. [`MemorySessionStore`] is the standard in-process
//! implementation.
//!
//! [`SessionMonitor`] re-validates the stored token against the profile
//! endpoint on a fixed interval, as an explicit background task whose
//! lifetime is tied to the monitor value: dropping it (or calling
//! [`stop`](SessionMonitor::stop)) cancels the task. There is no hidden
//! polling loop owned by a global.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::client::TaskClient;
use crate::error::ClientError;

/// An authenticated session: the bearer token plus the user id learned
/// from the profile endpoint (absent until the first profile fetch).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Bearer token attached to outgoing requests.
    pub token: String,
    /// Authenticated user's id, once known.
    pub user_id: Option<String>,
}

/// Source of the current session for outgoing requests.
///
/// Implementations must be cheap to call; the client consults the
/// provider on every request.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// The current session, or `None` when logged out.
    async fn current(&self) -> Option<Session>;

    /// Replaces the stored session (login, or profile enrichment).
    async fn store(&self, session: Session);

    /// Drops the stored session (logout, or token invalidation).
    async fn clear(&self);
}

/// In-memory [`SessionProvider`].
///
/// # Examples
///
/// ```
/// use taskdeck::session::{MemorySessionStore, Session, SessionProvider};
///
/// # tokio_test::block_on(async {
/// let store = MemorySessionStore::new();
/// assert!(store.current().await.is_none());
///
/// store
///     .store(Session { token: "abc".to_string(), user_id: None })
///     .await;
/// assert_eq!(store.current().await.unwrap().token, "abc");
///
/// store.clear().await;
/// assert!(store.current().await.is_none());
/// # });
/// ```
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    inner: RwLock<Option<Session>>,
}

impl MemorySessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionProvider for MemorySessionStore {
    async fn current(&self) -> Option<Session> {
        self.inner.read().clone()
    }

    async fn store(&self, session: Session) {
        *self.inner.write() = Some(session);
    }

    async fn clear(&self) {
        *self.inner.write() = None;
    }
}

/// Background task that re-validates the session on a fixed interval.
///
/// Each tick fetches the profile with the stored token. A successful
/// fetch refreshes the stored `user_id`; a definitive API rejection
/// (401/403/404 or any other status-mapped error) clears the session.
/// Transport errors are logged and left alone so a flaky network does
/// not log the user out.
#[derive(Debug)]
pub struct SessionMonitor {
    cancel: CancellationToken,
}

impl SessionMonitor {
    /// Spawns the monitor on the current runtime, ticking at the
    /// client's configured session refresh interval. The first check
    /// runs one full interval after the spawn, not immediately.
    pub fn spawn(client: Arc<TaskClient>) -> Self {
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(client.config().session_refresh_interval());
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // interval() fires immediately; consume that first tick.
            ticker.tick().await;

            loop {
                tokio::select! {
                    () = task_cancel.cancelled() => {
                        debug!("session monitor stopped");
                        return;
                    }
                    _ = ticker.tick() => {}
                }

                let Some(session) = client.sessions().current().await else {
                    continue;
                };

                match client.profile().await {
                    Ok(profile) => {
                        client
                            .sessions()
                            .store(Session {
                                token: session.token,
                                user_id: Some(profile.id),
                            })
                            .await;
                    }
                    Err(ClientError::Network(err)) => {
                        warn!(error = %err, "session check failed; keeping session");
                    }
                    Err(err) => {
                        debug!(error = %err, "session no longer valid; clearing");
                        client.sessions().clear().await;
                    }
                }
            }
        });

        Self { cancel }
    }

    /// Stops the background task. Idempotent; also happens on drop.
    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Drop for SessionMonitor {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn store_roundtrip() {
        let store = MemorySessionStore::new();
        assert!(store.current().await.is_none());

        store
            .store(Session {
                token: "t".to_string(),
                user_id: Some("u1".to_string()),
            })
            .await;
        let session = store.current().await.unwrap();
        assert_eq!(session.token, "t");
        assert_eq!(session.user_id.as_deref(), Some("u1"));

        store.clear().await;
        assert!(store.current().await.is_none());
    }

    #[tokio::test]
    async fn store_replaces_existing_session() {
        let store = MemorySessionStore::new();
        store
            .store(Session {
                token: "old".to_string(),
                user_id: None,
            })
            .await;
        store
            .store(Session {
                token: "new".to_string(),
                user_id: Some("u".to_string()),
            })
            .await;
        assert_eq!(store.current().await.unwrap().token, "new");
    }
}
