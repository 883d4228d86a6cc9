//! HS256 identity token verification.

use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use tracing::debug;

use devicegate_core::config::AuthConfig;
use devicegate_core::error::AppError;

use super::claims::IdentityClaims;

/// Verifies bearer tokens issued by the identity provider.
///
/// This service never issues tokens; it only checks signature, expiry and
/// the optional issuer and audience.
#[derive(Clone)]
pub struct IdentityVerifier {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for IdentityVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl IdentityVerifier {
    /// Creates a verifier from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = config.leeway_seconds;

        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
        }
        match &config.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates a token string.
    pub fn verify(&self, token: &str) -> Result<IdentityClaims, AppError> {
        let data = decode::<IdentityClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                debug!(error = %e, "Identity token rejected");
                match e.kind() {
                    JwtErrorKind::ExpiredSignature => AppError::authentication("Token has expired"),
                    JwtErrorKind::InvalidToken => AppError::authentication("Invalid token format"),
                    JwtErrorKind::InvalidSignature => {
                        AppError::authentication("Invalid token signature")
                    }
                    JwtErrorKind::InvalidIssuer => AppError::authentication("Invalid token issuer"),
                    JwtErrorKind::InvalidAudience => {
                        AppError::authentication("Invalid token audience")
                    }
                    _ => AppError::authentication(format!("Token validation failed: {e}")),
                }
            })?;

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use devicegate_core::error::ErrorKind;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde_json::json;

    const SECRET: &str = "test-secret";

    fn config() -> AuthConfig {
        AuthConfig {
            jwt_secret: SECRET.to_string(),
            ..AuthConfig::default()
        }
    }

    fn token(secret: &str, claims: serde_json::Value) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn claims_for(sub: &str, exp_offset: i64) -> serde_json::Value {
        let now = Utc::now().timestamp();
        json!({ "sub": sub, "iat": now, "exp": now + exp_offset, "name": "Ada" })
    }

    #[test]
    fn test_valid_token() {
        let verifier = IdentityVerifier::new(&config());
        let claims = verifier
            .verify(&token(SECRET, claims_for("auth0|42", 600)))
            .unwrap();
        assert_eq!(claims.sub, "auth0|42");
        assert_eq!(claims.name.as_deref(), Some("Ada"));
        assert_eq!(claims.user_id().unwrap().as_str(), "auth0|42");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let verifier = IdentityVerifier::new(&config());
        let err = verifier
            .verify(&token("other", claims_for("u1", 600)))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[test]
    fn test_expired_token_rejected() {
        let verifier = IdentityVerifier::new(&config());
        let err = verifier
            .verify(&token(SECRET, claims_for("u1", -3600)))
            .unwrap_err();
        assert_eq!(err.message, "Token has expired");
    }

    #[test]
    fn test_garbage_rejected() {
        let verifier = IdentityVerifier::new(&config());
        assert!(verifier.verify("not-a-token").is_err());
    }

    #[test]
    fn test_issuer_enforced_when_configured() {
        let verifier = IdentityVerifier::new(&AuthConfig {
            issuer: Some("https://id.example.com/".into()),
            ..config()
        });
        assert!(verifier.verify(&token(SECRET, claims_for("u1", 600))).is_err());

        let mut claims = claims_for("u1", 600);
        claims["iss"] = json!("https://id.example.com/");
        assert!(verifier.verify(&token(SECRET, claims)).is_ok());
    }

    #[test]
    fn test_audience_ignored_when_not_configured() {
        let verifier = IdentityVerifier::new(&config());
        let mut claims = claims_for("u1", 600);
        claims["aud"] = json!("some-api");
        assert!(verifier.verify(&token(SECRET, claims)).is_ok());
    }

    #[test]
    fn test_blank_subject_rejected() {
        let verifier = IdentityVerifier::new(&config());
        let claims = verifier
            .verify(&token(SECRET, claims_for("  ", 600)))
            .unwrap();
        let err = claims.user_id().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }
}
