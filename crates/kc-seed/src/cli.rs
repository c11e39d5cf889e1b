//! CLI argument parsing.

use clap::Parser;

use crate::config::RawConfig;

/// Seed a Keycloak realm with synthetic users.
///
/// Every option falls back to the environment variable of the same name,
/// and a `.env` file in the working directory is loaded first.
#[derive(Debug, Parser)]
#[command(name = "kc-seed")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Server URL (e.g., http://localhost:8080).
    #[arg(short, long = "server", env = "KEYCLOAK_URL")]
    pub server_url: Option<String>,

    /// Realm to create users in.
    #[arg(short, long, env = "REALM")]
    pub realm: Option<String>,

    /// Client ID used for the password grant.
    #[arg(short, long, env = "CLIENT_ID")]
    pub client_id: Option<String>,

    /// Admin username.
    #[arg(short, long, env = "USERNAME")]
    pub username: Option<String>,

    /// Admin password.
    #[arg(short, long, env = "PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Number of users to create.
    #[arg(short = 'n', long, env = "TOTAL_USERS")]
    pub total_users: Option<String>,

    /// Realm the admin account authenticates against.
    #[arg(long, env = "ADMIN_REALM")]
    pub admin_realm: Option<String>,

    /// Number of concurrent workers.
    #[arg(short, long, env = "WORKERS")]
    pub workers: Option<usize>,

    /// Print a progress line every N completed users.
    #[arg(long, env = "PROGRESS_INTERVAL")]
    pub progress_interval: Option<u64>,

    /// Per-request timeout in seconds.
    #[arg(long, env = "REQUEST_TIMEOUT_SECS")]
    pub timeout: Option<u64>,

    /// Hide the progress bar.
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Collects the configuration-bearing options.
    pub fn raw_config(&self) -> RawConfig {
        RawConfig {
            server_url: self.server_url.clone(),
            realm: self.realm.clone(),
            client_id: self.client_id.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            total_users: self.total_users.clone(),
            admin_realm: self.admin_realm.clone(),
            workers: self.workers,
            progress_interval: self.progress_interval,
            request_timeout_secs: self.timeout,
        }
    }
}
