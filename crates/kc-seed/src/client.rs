//! Admin API client.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::token::AccessToken;
use crate::user::UserRecord;
use crate::{SeedConfig, SeedError, SeedResult};

/// Result of a user creation attempt that reached the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateUserResponse {
    /// The user was created.
    Created,
    /// The token was rejected; the caller may refresh and retry.
    Unauthorized,
}

/// Operations the seeder needs from the identity server.
///
/// Implementations must be thread-safe; workers share one instance.
#[async_trait]
pub trait AdminApi: Send + Sync {
    /// Exchanges the admin credentials for an access token.
    ///
    /// ## Errors
    ///
    /// Returns `SeedError::Auth` if the credentials are rejected or the
    /// token endpoint is unreachable.
    async fn authenticate(&self) -> SeedResult<AccessToken>;

    /// Checks whether a realm exists.
    ///
    /// ## Errors
    ///
    /// Returns `SeedError::Provisioning` for any status other than 200 or 404.
    async fn realm_exists(&self, token: &AccessToken, realm: &str) -> SeedResult<bool>;

    /// Creates an enabled realm.
    ///
    /// ## Errors
    ///
    /// Returns `SeedError::Provisioning` on a non-success status.
    async fn create_realm(&self, token: &AccessToken, realm: &str) -> SeedResult<()>;

    /// Creates a user in a realm.
    ///
    /// ## Errors
    ///
    /// Returns `SeedError::Creation` on any non-success status except 401,
    /// which is reported as [`CreateUserResponse::Unauthorized`].
    async fn create_user(
        &self,
        token: &AccessToken,
        realm: &str,
        user: &UserRecord,
    ) -> SeedResult<CreateUserResponse>;
}

/// Token endpoint response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Create realm request.
#[derive(Debug, Serialize)]
struct CreateRealmRequest<'a> {
    realm: &'a str,
    enabled: bool,
}

/// HTTP implementation of [`AdminApi`].
#[derive(Clone)]
pub struct AdminClient {
    client: reqwest::Client,
    base_url: String,
    admin_realm: String,
    client_id: String,
    username: String,
    password: String,
}

impl AdminClient {
    /// Creates a client for the configured server.
    ///
    /// ## Errors
    ///
    /// Returns `SeedError::Http` if the HTTP client cannot be built.
    pub fn new(config: &SeedConfig) -> SeedResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .pool_max_idle_per_host(config.workers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.server_url.clone(),
            admin_realm: config.admin_realm.clone(),
            client_id: config.client_id.clone(),
            username: config.admin_username.clone(),
            password: config.admin_password.clone(),
        })
    }

    fn realm_url(&self, realm: &str) -> String {
        format!(
            "{}/admin/realms/{}",
            self.base_url,
            urlencoding::encode(realm)
        )
    }
}

impl std::fmt::Debug for AdminClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminClient")
            .field("base_url", &self.base_url)
            .field("admin_realm", &self.admin_realm)
            .field("client_id", &self.client_id)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl AdminApi for AdminClient {
    async fn authenticate(&self) -> SeedResult<AccessToken> {
        let url = format!(
            "{}/realms/{}/protocol/openid-connect/token",
            self.base_url,
            urlencoding::encode(&self.admin_realm)
        );
        debug!(%url, client_id = %self.client_id, "Requesting admin token");

        let response = self
            .client
            .post(&url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("username", self.username.as_str()),
                ("password", self.password.as_str()),
                ("grant_type", "password"),
            ])
            .send()
            .await
            .map_err(|e| SeedError::Auth(format!("token request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = error_body(response).await;
            return Err(SeedError::Auth(format!(
                "token endpoint returned {status}: {body}"
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| SeedError::Auth(format!("invalid token response: {e}")))?;

        Ok(AccessToken::new(token.access_token))
    }

    async fn realm_exists(&self, token: &AccessToken, realm: &str) -> SeedResult<bool> {
        let response = self
            .client
            .get(self.realm_url(realm))
            .bearer_auth(token.secret())
            .send()
            .await?;

        let status = response.status();
        debug!(realm, status = status.as_u16(), "Probed realm");

        if status == StatusCode::OK {
            Ok(true)
        } else if status == StatusCode::NOT_FOUND {
            Ok(false)
        } else {
            Err(SeedError::Provisioning {
                realm: realm.to_string(),
                status: status.as_u16(),
                message: error_body(response).await,
            })
        }
    }

    async fn create_realm(&self, token: &AccessToken, realm: &str) -> SeedResult<()> {
        let url = format!("{}/admin/realms", self.base_url);
        let request = CreateRealmRequest {
            realm,
            enabled: true,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(token.secret())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(SeedError::Provisioning {
                realm: realm.to_string(),
                status: status.as_u16(),
                message: error_body(response).await,
            })
        }
    }

    async fn create_user(
        &self,
        token: &AccessToken,
        realm: &str,
        user: &UserRecord,
    ) -> SeedResult<CreateUserResponse> {
        let url = format!("{}/users", self.realm_url(realm));

        let response = self
            .client
            .post(&url)
            .bearer_auth(token.secret())
            .json(user)
            .send()
            .await?;

        let status = response.status();
        debug!(username = %user.username, status = status.as_u16(), "Create user");

        if status.is_success() {
            Ok(CreateUserResponse::Created)
        } else if status == StatusCode::UNAUTHORIZED {
            Ok(CreateUserResponse::Unauthorized)
        } else {
            Err(SeedError::Creation {
                username: user.username.clone(),
                status: status.as_u16(),
                message: error_body(response).await,
            })
        }
    }
}

/// Reads an error response body for inclusion in an error message.
async fn error_body(response: reqwest::Response) -> String {
    response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string())
}
