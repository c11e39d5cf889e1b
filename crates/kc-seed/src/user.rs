//! Synthetic user records.

use serde::Serialize;

/// Domain used for generated email addresses.
pub const EMAIL_DOMAIN: &str = "example.com";

/// User representation sent to the admin API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Username, unique within a run.
    pub username: String,
    /// Whether the user is enabled.
    pub enabled: bool,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Email address.
    pub email: String,
    /// Whether the email has been verified.
    pub email_verified: bool,
    /// Initial credentials.
    pub credentials: Vec<CredentialRecord>,
}

/// Initial credential attached to a created user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CredentialRecord {
    /// Credential type.
    #[serde(rename = "type")]
    pub type_: String,
    /// Credential value.
    pub value: String,
    /// Whether the user must change it on first login.
    pub temporary: bool,
}

/// Builds the user record for a 1-based index.
///
/// The initial password is the email address; these are disposable
/// accounts for load and fixture data.
#[must_use]
pub fn build_user(index: u64) -> UserRecord {
    let username = format!("user{index}");
    let email = format!("{username}@{EMAIL_DOMAIN}");

    UserRecord {
        username,
        enabled: true,
        first_name: format!("First{index}"),
        last_name: format!("Last{index}"),
        credentials: vec![CredentialRecord {
            type_: "password".to_string(),
            value: email.clone(),
            temporary: false,
        }],
        email,
        email_verified: true,
    }
}
