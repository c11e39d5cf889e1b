//! Seeding configuration.
//!
//! Values arrive as raw strings (from the environment, a `.env` file, or
//! command-line flags) and are validated once into an immutable [`SeedConfig`].

use std::fmt;
use std::time::Duration;

use crate::{SeedError, SeedResult};

/// Default number of concurrent workers.
pub const DEFAULT_WORKERS: usize = 10;

/// Default number of completions between progress lines.
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 100;

/// Default per-request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Realm that hosts the admin account used for authentication.
pub const DEFAULT_ADMIN_REALM: &str = "master";

/// Unvalidated configuration values.
#[derive(Debug, Clone, Default)]
pub struct RawConfig {
    /// Server URL (`KEYCLOAK_URL`).
    pub server_url: Option<String>,
    /// Target realm (`REALM`).
    pub realm: Option<String>,
    /// Client used for the password grant (`CLIENT_ID`).
    pub client_id: Option<String>,
    /// Admin username (`USERNAME`).
    pub username: Option<String>,
    /// Admin password (`PASSWORD`).
    pub password: Option<String>,
    /// Number of users to create (`TOTAL_USERS`).
    pub total_users: Option<String>,
    /// Realm the admin account lives in (`ADMIN_REALM`).
    pub admin_realm: Option<String>,
    /// Worker pool width (`WORKERS`).
    pub workers: Option<usize>,
    /// Completions between progress lines (`PROGRESS_INTERVAL`).
    pub progress_interval: Option<u64>,
    /// Per-request timeout in seconds (`REQUEST_TIMEOUT_SECS`).
    pub request_timeout_secs: Option<u64>,
}

/// Validated seeding configuration.
#[derive(Clone)]
pub struct SeedConfig {
    /// Server base URL, without trailing slash.
    pub server_url: String,
    /// Realm to provision users into.
    pub realm: String,
    /// Client ID for the password grant.
    pub client_id: String,
    /// Admin username.
    pub admin_username: String,
    /// Admin password.
    pub admin_password: String,
    /// Number of users to create.
    pub total_users: u64,
    /// Realm the admin account lives in.
    pub admin_realm: String,
    /// Worker pool width.
    pub workers: usize,
    /// Completions between progress lines.
    pub progress_interval: u64,
    /// Per-request timeout.
    pub request_timeout: Duration,
}

impl SeedConfig {
    /// Validates raw values into a configuration.
    ///
    /// ## Errors
    ///
    /// Returns `SeedError::Config` if a required value is missing or empty,
    /// `TOTAL_USERS` is not a positive integer, or a tunable is zero.
    pub fn from_raw(raw: RawConfig) -> SeedResult<Self> {
        let server_url = required(raw.server_url, "KEYCLOAK_URL")?
            .trim_end_matches('/')
            .to_string();
        let realm = required(raw.realm, "REALM")?;
        let client_id = required(raw.client_id, "CLIENT_ID")?;
        let admin_username = required(raw.username, "USERNAME")?;
        let admin_password = required(raw.password, "PASSWORD")?;

        let total_users = required(raw.total_users, "TOTAL_USERS")?;
        let total_users = match total_users.trim().parse::<u64>() {
            Ok(n) if n > 0 => n,
            _ => {
                return Err(SeedError::Config(format!(
                    "TOTAL_USERS must be a positive integer, got '{total_users}'"
                )))
            }
        };

        let admin_realm = raw
            .admin_realm
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ADMIN_REALM.to_string());

        let workers = positive(raw.workers.unwrap_or(DEFAULT_WORKERS), "WORKERS")?;
        let progress_interval = positive(
            raw.progress_interval.unwrap_or(DEFAULT_PROGRESS_INTERVAL),
            "PROGRESS_INTERVAL",
        )?;
        let timeout_secs = positive(
            raw.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            "REQUEST_TIMEOUT_SECS",
        )?;

        Ok(Self {
            server_url,
            realm,
            client_id,
            admin_username,
            admin_password,
            total_users,
            admin_realm,
            workers,
            progress_interval,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl fmt::Debug for SeedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeedConfig")
            .field("server_url", &self.server_url)
            .field("realm", &self.realm)
            .field("client_id", &self.client_id)
            .field("admin_username", &self.admin_username)
            .field("admin_password", &"[REDACTED]")
            .field("total_users", &self.total_users)
            .field("admin_realm", &self.admin_realm)
            .field("workers", &self.workers)
            .field("progress_interval", &self.progress_interval)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

fn required(value: Option<String>, key: &str) -> SeedResult<String> {
    value
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| SeedError::Config(format!("{key} is required")))
}

fn positive<T: PartialEq + Default>(value: T, key: &str) -> SeedResult<T> {
    if value == T::default() {
        return Err(SeedError::Config(format!("{key} must be greater than zero")));
    }
    Ok(value)
}
