//! Signed credential verification.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;
#[cfg(any(feature = "USE_ONLY_IN_TESTS", test))]
use serde::Serialize;

/// Identity asserted by a verified credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedCredential {
    pub uid: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

/// Errors returned by [`CredentialVerifier::verify`].
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("wrong audience")]
    WrongAudience,
    #[error("malformed token")]
    Malformed,
}

/// Credential claims payload.
///
/// | Field | JWT claim | Meaning |
/// |-------|-----------|---------|
/// | `sub` | `sub` | account id |
/// | `email` | custom | account email, if known to the issuer |
/// | `name` | custom | display name, if known to the issuer |
/// | `aud` | `aud` | intended audience (project id) |
/// | `exp` | `exp` | expiration, seconds since UNIX epoch |
///
/// [`Serialize`] requires the **`USE_ONLY_IN_TESTS`** cargo feature: the
/// service never issues credentials, it only verifies them.
#[derive(Debug, Deserialize)]
#[cfg_attr(any(feature = "USE_ONLY_IN_TESTS", test), derive(Serialize))]
pub struct CredentialClaims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    pub exp: u64,
}

/// HS256 credential verifier.
///
/// Validation: exp checked with the library's default 60s leeway, required
/// claims `exp` + `sub`. `aud` is checked only when an audience is configured.
#[derive(Clone)]
pub struct CredentialVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl CredentialVerifier {
    pub fn new(secret: &str, audience: Option<&str>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);
        match audience {
            Some(aud) => validation.set_audience(&[aud]),
            None => validation.validate_aud = false,
        }
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> Result<VerifiedCredential, AuthError> {
        let data = decode::<CredentialClaims>(token, &self.key, &self.validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
                jsonwebtoken::errors::ErrorKind::InvalidAudience => AuthError::WrongAudience,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                _ => AuthError::Malformed,
            }
        })?;
        let claims = data.claims;
        if claims.sub.is_empty() {
            return Err(AuthError::Malformed);
        }
        Ok(VerifiedCredential {
            uid: claims.sub,
            email: claims.email,
            name: claims.name,
        })
    }
}
