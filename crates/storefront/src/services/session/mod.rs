//! The session store.
//!
//! Maintains the current authentication identity and mediates login, signup,
//! and logout against the remote API, keeping the persisted store
//! synchronized. Every mutation is write-through: the persisted records are
//! updated before the in-memory state, so a failed persist leaves the
//! session exactly as it was.
//!
//! Concurrent `login` calls are not coordinated: there is no in-flight
//! deduplication or cancellation, so when two logins race, both responses
//! apply in arrival order and the last one to resolve wins.

mod error;

pub use error::AuthError;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, instrument, warn};

use crate::api::ApiClient;
use crate::api::types::AuthGrant;
use crate::models::{Session, TokenPair, UserRecord};
use crate::notify::Listeners;
use crate::storage::{KeyValueStore, StorageError, keys};

/// The session store.
///
/// A cheaply cloneable handle; clones share state, storage, and listeners.
/// The store exclusively owns the in-memory session; the persisted store is
/// the durable backing copy, written only from here.
#[derive(Clone)]
pub struct SessionStore {
    state: Arc<Mutex<Session>>,
    api: ApiClient,
    storage: Arc<dyn KeyValueStore>,
    listeners: Listeners,
}

impl SessionStore {
    /// Create a session store in the logged-out state.
    ///
    /// Call [`hydrate`](Self::hydrate) once at startup to restore a persisted
    /// session.
    #[must_use]
    pub fn new(api: ApiClient, storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            state: Arc::new(Mutex::new(Session::logged_out())),
            api,
            storage,
            listeners: Listeners::new(),
        }
    }

    /// Register a change listener, invoked synchronously after every session
    /// state change.
    pub fn subscribe(&self, listener: impl Fn() + Send + Sync + 'static) {
        self.listeners.subscribe(listener);
    }

    /// Snapshot of the current session.
    #[must_use]
    pub fn current(&self) -> Session {
        self.lock().clone()
    }

    /// Whether a user record and access token are both present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.lock().is_authenticated()
    }

    /// Restore a persisted session into memory.
    ///
    /// Reads the token pair and user record from the persisted store; only
    /// when both are present does the session become authenticated. No
    /// network call is made; the token is trusted until the first API call
    /// that rejects it. Unreadable records are treated as absent.
    pub fn hydrate(&self) -> Session {
        let tokens = self.read_record::<TokenPair>(keys::SESSION_TOKENS);
        let user = self.read_record::<UserRecord>(keys::USER_RECORD);

        if let (Some(tokens), Some(user)) = (tokens, user) {
            debug!(user = %user.id, "hydrated persisted session");
            let session = Session::authenticated(user, tokens);
            *self.lock() = session.clone();
            self.listeners.notify();
            session
        } else {
            self.current()
        }
    }

    /// Login with email and password.
    ///
    /// On success the in-memory state and the persisted records are updated
    /// together and the new session is returned. On failure the pre-call
    /// state (authenticated or not) is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Rejected`] with the server-provided message when
    /// the credentials are refused, or another [`AuthError`] kind for
    /// transport, response, and storage failures.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let grant = self.api.login(email, password).await?;
        self.install(grant)
    }

    /// Register a new account and sign in with it.
    ///
    /// Identical contract and side effects to [`login`](Self::login), using
    /// the signup endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] exactly as [`login`](Self::login) does.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        let grant = self.api.signup(name, email, password).await?;
        self.install(grant)
    }

    /// Log out.
    ///
    /// Two independent steps: a best-effort remote notification (failures
    /// logged, never propagated) followed by an unconditional local clear of
    /// both memory and the persisted records. This operation never fails
    /// from the caller's perspective.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        if let Err(e) = self.api.logout().await {
            warn!(error = %e, "remote logout notification failed; clearing locally anyway");
        }

        // Both records go in one transaction: no state where one exists
        // without the other.
        if let Err(e) = self
            .storage
            .batch_delete(&[keys::SESSION_TOKENS, keys::USER_RECORD])
        {
            warn!(error = %e, "failed to clear persisted session");
        }

        *self.lock() = Session::logged_out();
        self.listeners.notify();
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Persist and apply a successful authentication.
    ///
    /// Write-through order matters: if persisting fails, memory is not
    /// touched and the caller sees the pre-call state.
    fn install(&self, grant: AuthGrant) -> Result<Session, AuthError> {
        let token_bytes = serde_json::to_vec(&grant.tokens).map_err(StorageError::from)?;
        let user_bytes = serde_json::to_vec(&grant.user).map_err(StorageError::from)?;

        self.storage.batch_set(&[
            (keys::SESSION_TOKENS, token_bytes.as_slice()),
            (keys::USER_RECORD, user_bytes.as_slice()),
        ])?;

        let session = Session::authenticated(grant.user, grant.tokens);
        *self.lock() = session.clone();
        self.listeners.notify();

        Ok(session)
    }

    fn read_record<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.storage.get(key) {
            Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!(key, error = %e, "ignoring unreadable persisted record");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(key, error = %e, "failed to read persisted record");
                None
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
