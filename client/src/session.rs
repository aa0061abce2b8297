//! The authentication token holder.
//!
//! [`SessionContext`] caches the token in memory and writes through to a
//! [`KeyValueStore`] under [`TOKEN_KEY`]. The value is stored JSON-encoded,
//! so a token `abc` persists as `"abc"`.

use std::sync::{Arc, PoisonError, RwLock};

use reqwest::RequestBuilder;
use tracing::warn;

use crate::storage::{KeyValueStore, MemoryStore, StorageError};

pub const TOKEN_KEY: &str = "token";

/// Hook applied to every outgoing request before it is sent.
pub trait RequestDecorator: Send + Sync {
    fn decorate(&self, request: RequestBuilder) -> RequestBuilder;
}

struct SessionInner {
    store: Arc<dyn KeyValueStore>,
    token: RwLock<Option<String>>,
}

/// Cheap to clone; all clones share the same token.
#[derive(Clone)]
pub struct SessionContext {
    inner: Arc<SessionInner>,
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

impl SessionContext {
    /// Load any persisted token from `store`.
    ///
    /// An unreadable store is treated as signed out.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let token = match store.get(TOKEN_KEY) {
            Ok(raw) => raw.and_then(|raw| decode_token(&raw)),
            Err(e) => {
                warn!("Ignoring persisted session: {e}");
                None
            }
        };
        Self {
            inner: Arc::new(SessionInner {
                store,
                token: RwLock::new(token),
            }),
        }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.inner
            .token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner
            .token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Persist `token` and make it visible to subsequent requests.
    ///
    /// The in-memory token is updated even if persistence fails.
    pub fn set_token(&self, token: &str) -> Result<(), StorageError> {
        *self
            .inner
            .token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
        let encoded = serde_json::Value::String(token.to_string()).to_string();
        self.inner.store.set(TOKEN_KEY, &encoded)
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        *self
            .inner
            .token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
        self.inner.store.remove(TOKEN_KEY)
    }
}

impl RequestDecorator for SessionContext {
    fn decorate(&self, request: RequestBuilder) -> RequestBuilder {
        match self.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

/// JSON string first; a bare value written by another tool is accepted as-is.
fn decode_token(raw: &str) -> Option<String> {
    let token = match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::String(token)) => token,
        Ok(serde_json::Value::Null) => return None,
        _ => raw.trim().to_string(),
    };
    (!token.is_empty()).then_some(token)
}
