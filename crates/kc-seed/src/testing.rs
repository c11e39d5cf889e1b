//! In-memory [`AdminApi`] for unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU16, AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::client::{AdminApi, CreateUserResponse};
use crate::token::AccessToken;
use crate::user::UserRecord;
use crate::{SeedError, SeedResult};

/// Fake identity server.
///
/// `authenticate` issues `token-1`, `token-2`, ... in call order.
#[derive(Debug, Default)]
pub struct FakeAdminApi {
    auth_calls: AtomicU64,
    reject_auth: AtomicBool,
    realms: Mutex<HashSet<String>>,
    realm_create_calls: AtomicU64,
    realm_probe_status: AtomicU16,
    rejected_tokens: Mutex<HashSet<String>>,
    reject_every_token: AtomicBool,
    failing_users: Mutex<HashMap<String, u16>>,
    created: Mutex<Vec<String>>,
    create_user_calls: AtomicU64,
}

impl FakeAdminApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reject_authentication(&self) {
        self.reject_auth.store(true, Ordering::SeqCst);
    }

    pub fn add_realm(&self, realm: &str) {
        self.realms.lock().insert(realm.to_string());
    }

    pub fn fail_realm_probe(&self, status: u16) {
        self.realm_probe_status.store(status, Ordering::SeqCst);
    }

    /// Answers 401 to requests carrying `token`.
    pub fn reject_token(&self, token: &str) {
        self.rejected_tokens.lock().insert(token.to_string());
    }

    /// Answers 401 to every user creation.
    pub fn reject_every_token(&self) {
        self.reject_every_token.store(true, Ordering::SeqCst);
    }

    pub fn fail_user(&self, username: &str, status: u16) {
        self.failing_users
            .lock()
            .insert(username.to_string(), status);
    }

    pub fn auth_calls(&self) -> u64 {
        self.auth_calls.load(Ordering::SeqCst)
    }

    pub fn realm_create_calls(&self) -> u64 {
        self.realm_create_calls.load(Ordering::SeqCst)
    }

    pub fn create_user_calls(&self) -> u64 {
        self.create_user_calls.load(Ordering::SeqCst)
    }

    /// Usernames created so far, sorted.
    pub fn created(&self) -> Vec<String> {
        let mut created = self.created.lock().clone();
        created.sort();
        created
    }
}

#[async_trait]
impl AdminApi for FakeAdminApi {
    async fn authenticate(&self) -> SeedResult<AccessToken> {
        let n = self.auth_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.reject_auth.load(Ordering::SeqCst) {
            return Err(SeedError::Auth("invalid user credentials".to_string()));
        }
        tokio::task::yield_now().await;
        Ok(AccessToken::new(format!("token-{n}")))
    }

    async fn realm_exists(&self, _token: &AccessToken, realm: &str) -> SeedResult<bool> {
        let status = self.realm_probe_status.load(Ordering::SeqCst);
        if status != 0 {
            return Err(SeedError::Provisioning {
                realm: realm.to_string(),
                status,
                message: "probe failed".to_string(),
            });
        }
        Ok(self.realms.lock().contains(realm))
    }

    async fn create_realm(&self, _token: &AccessToken, realm: &str) -> SeedResult<()> {
        self.realm_create_calls.fetch_add(1, Ordering::SeqCst);
        self.realms.lock().insert(realm.to_string());
        Ok(())
    }

    async fn create_user(
        &self,
        token: &AccessToken,
        _realm: &str,
        user: &UserRecord,
    ) -> SeedResult<CreateUserResponse> {
        self.create_user_calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;

        if self.reject_every_token.load(Ordering::SeqCst)
            || self.rejected_tokens.lock().contains(token.secret())
        {
            return Ok(CreateUserResponse::Unauthorized);
        }

        if let Some(status) = self.failing_users.lock().get(&user.username).copied() {
            return Err(SeedError::Creation {
                username: user.username.clone(),
                status,
                message: "rejected".to_string(),
            });
        }

        self.created.lock().push(user.username.clone());
        Ok(CreateUserResponse::Created)
    }
}
