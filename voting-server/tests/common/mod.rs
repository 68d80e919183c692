#![allow(dead_code)]

use async_trait::async_trait;
use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};
use tokio::sync::Notify;
use tonic::Status;
use voting_server::{
    errors::store_error::StoreError,
    http::AppState,
    identity::IdentityService,
    models::transient::authenticated_identity::AuthenticatedIdentity,
    session_store::key_value_store::{KeyValueStore, MemoryStore},
};

pub const AUTH_TIMEOUT: Duration = Duration::from_millis(100);
pub const SLOW_TOKEN: &str = "slow-token";
pub const REVOKED_TOKEN: &str = "revoked-token";

/// Identity service answering from a fixed table. `<user>-token` is valid for
/// every known user and the password is always `secret`.
pub struct FakeIdentity {
    tokens: HashMap<String, String>,
}

impl FakeIdentity {
    pub fn with_users(users: &[&str]) -> Self {
        FakeIdentity {
            tokens: users
                .iter()
                .map(|user| (token_for(user), user.to_string()))
                .collect(),
        }
    }
}

pub fn token_for(user: &str) -> String {
    format!("{user}-token")
}

pub fn bearer(user: &str) -> String {
    format!("Bearer {}", token_for(user))
}

#[async_trait]
impl IdentityService for FakeIdentity {
    async fn login(&self, username: &str, password: &str) -> Result<String, Status> {
        if password == "secret" && self.tokens.values().any(|user| user == username) {
            Ok(token_for(username))
        } else {
            Err(Status::unauthenticated("invalid credentials"))
        }
    }

    async fn register(&self, username: &str, _password: &str) -> Result<String, Status> {
        if self.tokens.values().any(|user| user == username) {
            Err(Status::already_exists("user exists"))
        } else {
            Ok(String::from("registered"))
        }
    }

    async fn log_out(&self, _username: &str, auth_code: &str) -> Result<String, Status> {
        if self.tokens.contains_key(auth_code) {
            Ok(String::from("logged out"))
        } else {
            Err(Status::unauthenticated("unknown token"))
        }
    }

    async fn check_authorized(&self, auth_code: &str) -> Result<AuthenticatedIdentity, Status> {
        if auth_code == SLOW_TOKEN {
            tokio::time::sleep(Duration::from_secs(5)).await;
        }

        if auth_code == REVOKED_TOKEN {
            return Ok(AuthenticatedIdentity::new("mallory".to_string(), false));
        }

        self.tokens
            .get(auth_code)
            .map(|user| AuthenticatedIdentity::new(user.clone(), true))
            .ok_or_else(|| Status::unauthenticated("unknown token"))
    }
}

/// Memory store whose writes can be switched to fail or to hang until
/// released.
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    failing: AtomicBool,
    stalling: AtomicBool,
    stalled: AtomicUsize,
    release: Notify,
}

impl FlakyStore {
    pub fn fail_writes(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn stall_writes(&self, stalling: bool) {
        self.stalling.store(stalling, Ordering::SeqCst);
        if !stalling {
            self.release.notify_waiters();
        }
    }

    /// Writes currently parked by `stall_writes`.
    pub fn stalled_writes(&self) -> usize {
        self.stalled.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeyValueStore for FlakyStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Backend(String::from("connection refused")));
        }

        if self.stalling.load(Ordering::SeqCst) {
            let released = self.release.notified();
            self.stalled.fetch_add(1, Ordering::SeqCst);
            released.await;
            self.stalled.fetch_sub(1, Ordering::SeqCst);
        }

        self.inner.set(key, value).await
    }
}

pub fn app_state(users: &[&str], store: Arc<FlakyStore>) -> AppState {
    AppState::new(
        Arc::new(FakeIdentity::with_users(users)),
        store,
        AUTH_TIMEOUT,
        16,
    )
}
