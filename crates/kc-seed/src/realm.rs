//! Realm provisioning.

use tracing::info;

use crate::client::AdminApi;
use crate::token::AccessToken;
use crate::SeedResult;

/// What [`ensure_realm`] found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RealmStatus {
    /// The realm was already present and left untouched.
    Existing,
    /// The realm was created.
    Created,
}

/// Creates `realm` unless it already exists.
///
/// Only presence is checked; an existing realm's settings are not changed.
///
/// ## Errors
///
/// Returns `SeedError::Provisioning` if the probe or the create call fails.
pub async fn ensure_realm<A>(api: &A, token: &AccessToken, realm: &str) -> SeedResult<RealmStatus>
where
    A: AdminApi + ?Sized,
{
    if api.realm_exists(token, realm).await? {
        info!(realm, "Realm exists");
        return Ok(RealmStatus::Existing);
    }

    api.create_realm(token, realm).await?;
    info!(realm, "Realm created");
    Ok(RealmStatus::Created)
}
