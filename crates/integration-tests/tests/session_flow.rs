//! End-to-end session lifecycle tests against the stub commerce API.
//!
//! Covers the write-through contract: after login the persisted store holds
//! a token pair and user record matching memory; after logout neither key
//! remains, even when the remote logout endpoint fails.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use green_papaya_integration_tests::{
    STUB_ACCESS_TOKEN, STUB_CUSTOMER_ID, STUB_PASSWORD, StubApi, StubOptions,
};
use green_papaya_storefront::api::ApiClient;
use green_papaya_storefront::models::TokenPair;
use green_papaya_storefront::services::session::{AuthError, SessionStore};
use green_papaya_storefront::storage::{KeyValueStore, MemoryStore, RedbStore, keys};

fn session_store(stub: &StubApi, storage: Arc<dyn KeyValueStore>) -> SessionStore {
    let config = stub.config(std::path::Path::new(".unused"));
    let api = ApiClient::new(&config, Arc::clone(&storage)).unwrap();
    SessionStore::new(api, storage)
}

fn stored_tokens(storage: &dyn KeyValueStore) -> Option<TokenPair> {
    storage
        .get(keys::SESSION_TOKENS)
        .unwrap()
        .map(|bytes| serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn login_success_updates_memory_and_storage() {
    let stub = StubApi::spawn().await;
    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let store = session_store(&stub, Arc::clone(&storage));

    let session = store
        .login("owner@example.com", STUB_PASSWORD)
        .await
        .unwrap();

    assert!(session.is_authenticated());
    assert!(store.is_authenticated());

    let user = session.user.unwrap();
    assert_eq!(user.id.as_str(), STUB_CUSTOMER_ID);
    assert_eq!(user.email.as_str(), "owner@example.com");
    assert!(user.has_role("SHOP"));

    // Write-through: the persisted token pair matches the in-memory one.
    let persisted = stored_tokens(storage.as_ref()).unwrap();
    assert_eq!(persisted.access_token, STUB_ACCESS_TOKEN);
    assert_eq!(Some(persisted), store.current().tokens);
    assert!(storage.get(keys::USER_RECORD).unwrap().is_some());
}

#[tokio::test]
async fn login_failure_leaves_state_untouched() {
    let stub = StubApi::spawn().await;
    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let store = session_store(&stub, Arc::clone(&storage));

    let err = store
        .login("owner@example.com", "wrong-password")
        .await
        .unwrap_err();

    // The server-provided message is surfaced as-is.
    assert!(matches!(&err, AuthError::Rejected { message } if message == "invalid credentials"));

    assert!(!store.is_authenticated());
    assert!(stored_tokens(storage.as_ref()).is_none());
    assert!(storage.get(keys::USER_RECORD).unwrap().is_none());
}

#[tokio::test]
async fn failed_login_preserves_existing_session() {
    let stub = StubApi::spawn().await;
    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let store = session_store(&stub, Arc::clone(&storage));

    store
        .login("owner@example.com", STUB_PASSWORD)
        .await
        .unwrap();
    let before = store.current();

    let result = store.login("owner@example.com", "wrong-password").await;
    assert!(result.is_err());

    // Still signed in as before, tokens intact.
    assert_eq!(store.current(), before);
    assert!(stored_tokens(storage.as_ref()).is_some());
}

#[tokio::test]
async fn signup_signs_in_and_persists() {
    let stub = StubApi::spawn().await;
    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let store = session_store(&stub, Arc::clone(&storage));

    let session = store
        .signup("New Shop", "new@example.com", STUB_PASSWORD)
        .await
        .unwrap();

    assert!(session.is_authenticated());
    assert_eq!(session.user.unwrap().name, "New Shop");
    assert!(stored_tokens(storage.as_ref()).is_some());
}

#[tokio::test]
async fn logout_clears_memory_and_storage() {
    let stub = StubApi::spawn().await;
    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let store = session_store(&stub, Arc::clone(&storage));

    store
        .login("owner@example.com", STUB_PASSWORD)
        .await
        .unwrap();
    store.logout().await;

    assert!(!store.is_authenticated());
    assert!(store.current().user.is_none());
    assert!(storage.get(keys::SESSION_TOKENS).unwrap().is_none());
    assert!(storage.get(keys::USER_RECORD).unwrap().is_none());

    // The remote notification did go out.
    assert_eq!(stub.requests_for("/logout").len(), 1);
}

#[tokio::test]
async fn logout_clears_locally_even_when_remote_fails() {
    let stub = StubApi::spawn_with(StubOptions { logout_fails: true }).await;
    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let store = session_store(&stub, Arc::clone(&storage));

    store
        .login("owner@example.com", STUB_PASSWORD)
        .await
        .unwrap();

    // Defined to never fail observably.
    store.logout().await;

    assert!(!store.is_authenticated());
    assert!(storage.get(keys::SESSION_TOKENS).unwrap().is_none());
    assert!(storage.get(keys::USER_RECORD).unwrap().is_none());
}

#[tokio::test]
async fn session_survives_restart_via_redb() {
    let stub = StubApi::spawn().await;
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("storefront.redb");

    {
        let storage: Arc<dyn KeyValueStore> = Arc::new(RedbStore::open(&db_path).unwrap());
        let store = session_store(&stub, storage);
        store
            .login("owner@example.com", STUB_PASSWORD)
            .await
            .unwrap();
    }

    // "Restart": a fresh process would reopen the database and hydrate.
    let storage: Arc<dyn KeyValueStore> = Arc::new(RedbStore::open(&db_path).unwrap());
    let store = session_store(&stub, storage);
    assert!(!store.is_authenticated());

    let session = store.hydrate();
    assert!(session.is_authenticated());
    assert_eq!(session.access_token(), Some(STUB_ACCESS_TOKEN));
    assert_eq!(session.user.unwrap().email.as_str(), "owner@example.com");
}

#[tokio::test]
async fn listeners_fire_on_login_and_logout() {
    let stub = StubApi::spawn().await;
    let store = session_store(&stub, Arc::new(MemoryStore::new()));

    let calls = Arc::new(AtomicUsize::new(0));
    let observer = store.clone();
    let seen = Arc::clone(&calls);
    store.subscribe(move || {
        // Listener observes the completed state change.
        let _ = observer.is_authenticated();
        seen.fetch_add(1, Ordering::SeqCst);
    });

    store
        .login("owner@example.com", STUB_PASSWORD)
        .await
        .unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    store.logout().await;
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    // A failed login changes nothing and notifies nobody.
    let _ = store.login("owner@example.com", "wrong-password").await;
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}
