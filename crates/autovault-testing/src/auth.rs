//! Credential minting for tests.
//!
//! The service only verifies credentials issued elsewhere. Tests sign their
//! own with the same HS256 secret handed to the verifier under test.

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{EncodingKey, Header, encode};

use autovault_auth_types::token::CredentialClaims;

pub const TEST_SECRET: &str = "autovault-test-secret";

/// Issues signed bearer credentials for a fixed secret.
pub struct TestCredentials {
    secret: String,
}

impl Default for TestCredentials {
    fn default() -> Self {
        Self::new(TEST_SECRET)
    }
}

impl TestCredentials {
    pub fn new(secret: &str) -> Self {
        Self {
            secret: secret.to_owned(),
        }
    }

    /// Valid for one hour.
    pub fn issue(&self, uid: &str, email: &str) -> String {
        self.sign(uid, Some(email), None, now_secs() + 3600)
    }

    /// Valid for one hour and carrying a display name.
    pub fn issue_named(&self, uid: &str, email: &str, name: &str) -> String {
        self.sign(uid, Some(email), Some(name), now_secs() + 3600)
    }

    /// Expired well past the verifier's leeway.
    pub fn issue_expired(&self, uid: &str, email: &str) -> String {
        self.sign(uid, Some(email), None, now_secs() - 3600)
    }

    fn sign(&self, uid: &str, email: Option<&str>, name: Option<&str>, exp: u64) -> String {
        let claims = CredentialClaims {
            sub: uid.to_owned(),
            email: email.map(str::to_owned),
            name: name.map(str::to_owned),
            aud: None,
            exp,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .expect("HS256 signing never fails for a valid secret")
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before UNIX epoch")
        .as_secs()
}
