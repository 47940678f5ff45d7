//! `ClientWrapper` — lazy session construction with bounded retry.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;

/// Errors surfaced by the client wrapper to its caller (the scout).
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("retries exhausted after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: String },

    #[error(transparent)]
    Fatal(#[from] anyhow::Error),
}

/// Classification of a single remote call's failure, produced by the
/// operation closure. The wrapper's reaction depends on the class:
/// conflicts retry, auth failures invalidate the session, anything else
/// surfaces immediately.
#[derive(Debug)]
pub enum CallError {
    Conflict(String),
    Unauthorized(String),
    Fatal(anyhow::Error),
}

/// Capability that constructs an authenticated session.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    type Session: Send + Sync + 'static;

    async fn connect(&self, config: &ClientConfig) -> Result<Self::Session, ClientError>;
}

/// Session cache state. `Invalidated` is distinct from `Disconnected`
/// so the reconnect after an auth failure is an explicit, logged
/// transition rather than a first connect.
enum SessionState<S> {
    Disconnected,
    Active(Arc<S>),
    Invalidated,
}

/// Wraps a `SessionFactory` with lazy construction and retry policy.
pub struct ClientWrapper<F: SessionFactory> {
    factory: F,
    config: ClientConfig,
    state: SessionState<F::Session>,
}

impl<F: SessionFactory> ClientWrapper<F> {
    pub fn new(factory: F, config: ClientConfig) -> Self {
        Self {
            factory,
            config,
            state: SessionState::Disconnected,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Discard the cached session. The next call reconstructs one.
    pub fn invalidate(&mut self) {
        self.state = SessionState::Invalidated;
    }

    async fn session(&mut self) -> Result<Arc<F::Session>, ClientError> {
        match &self.state {
            SessionState::Active(session) => return Ok(session.clone()),
            SessionState::Disconnected => {
                debug!(endpoint = %self.config.api_endpoint, "establishing session");
            }
            SessionState::Invalidated => {
                info!(
                    endpoint = %self.config.api_endpoint,
                    "reconstructing session after auth failure"
                );
            }
        }

        let session = Arc::new(self.factory.connect(&self.config).await?);
        self.state = SessionState::Active(session.clone());
        Ok(session)
    }

    /// Run `op` against the cached session, retrying per policy.
    ///
    /// `max_retries` counts retries after the first attempt, so an
    /// operation gets at most `max_retries + 1` attempts. Conflict and
    /// auth failures both count against the same bound; auth failures
    /// additionally take the invalidate transition before sleeping.
    pub async fn call_with_retries<T, Op, Fut>(&mut self, mut op: Op) -> Result<T, ClientError>
    where
        Op: FnMut(Arc<F::Session>) -> Fut,
        Fut: Future<Output = Result<T, CallError>>,
    {
        let mut attempts: u32 = 0;

        loop {
            let session = self.session().await?;
            attempts += 1;

            let last = match op(session).await {
                Ok(value) => return Ok(value),
                Err(CallError::Fatal(e)) => return Err(ClientError::Fatal(e)),
                Err(CallError::Conflict(msg)) => {
                    warn!(
                        attempts,
                        max_retries = self.config.max_retries,
                        error = %msg,
                        "request conflict, will retry"
                    );
                    msg
                }
                Err(CallError::Unauthorized(msg)) => {
                    warn!(
                        attempts,
                        max_retries = self.config.max_retries,
                        error = %msg,
                        "session rejected, invalidating"
                    );
                    self.invalidate();
                    msg
                }
            };

            if attempts > self.config.max_retries {
                return Err(ClientError::RetriesExhausted { attempts, last });
            }
            tokio::time::sleep(self.config.retry_interval()).await;
        }
    }
}
