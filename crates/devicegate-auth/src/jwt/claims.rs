//! Claims carried by identity provider tokens.

use serde::{Deserialize, Serialize};

use devicegate_core::error::AppError;
use devicegate_core::types::UserId;

/// Claims read from a verified identity token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// Subject: the user ID at the identity provider.
    pub sub: String,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Issued-at timestamp (seconds since epoch).
    #[serde(default)]
    pub iat: i64,
    /// Display name, if the provider sends one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Email address, if the provider sends one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl IdentityClaims {
    /// Returns the subject as a user ID. A blank subject is rejected.
    pub fn user_id(&self) -> Result<UserId, AppError> {
        UserId::parse(self.sub.as_str())
            .map_err(|_| AppError::authentication("Token subject is empty"))
    }
}
