//! Session token issuance and verification.
//!
//! Tokens are compact HS256 JWTs carrying {sub, iss, iat, exp}. They are not
//! stored server-side and expire by claim, there is no revocation.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::wgsltoy::error::Error;

pub const ISSUER: &str = "wgsltoy.com";

const TOKEN_LIFETIME_HOURS: i64 = 72;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iss: String,
    iat: i64,
    exp: i64,
}

/// Issues and verifies session tokens under one shared secret.
///
/// Constructed once at startup from an explicitly supplied secret and shared
/// read-only across requests; both operations are pure computations.
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    /// # Errors
    /// Returns `Error::Signing` when the secret is empty, an unusable secret
    /// is a configuration fault.
    pub fn new(secret: &SecretString) -> Result<Self, Error> {
        let secret = secret.expose_secret();
        if secret.is_empty() {
            error!("Signing secret is empty");
            return Err(Error::Signing);
        }

        // Pin the accepted algorithm and the required claims up front; a
        // token declaring anything else never reaches signature comparison.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "iat", "iss"]);
        validation.set_issuer(&[ISSUER]);

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    /// Issue a token asserting `subject` for the next 72 hours.
    pub fn issue(&self, subject: &str) -> Result<String, Error> {
        self.issue_with_lifetime(subject, Duration::hours(TOKEN_LIFETIME_HOURS))
    }

    fn issue_with_lifetime(&self, subject: &str, lifetime: Duration) -> Result<String, Error> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: subject.to_string(),
            iss: ISSUER.to_string(),
            iat: now,
            exp: now + lifetime.num_seconds(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(|err| {
            error!("Failed signing token: {err}");
            Error::Signing
        })
    }

    /// Verify a token and return its subject.
    ///
    /// Every failure mode, bad signature, foreign algorithm, wrong issuer,
    /// missing or passed expiry, missing issued-at, collapses into
    /// `Error::Unauthorized` so the response cannot be used as an oracle.
    pub fn verify(&self, token: &str) -> Result<String, Error> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|_| Error::Unauthorized)?;

        Ok(data.claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wgsltoy::guid;

    fn codec(secret: &str) -> TokenCodec {
        TokenCodec::new(&SecretString::from(secret.to_string())).unwrap()
    }

    #[test]
    fn test_issue_then_verify_returns_subject() {
        let codec = codec("a shared secret for tests");
        let subject = guid::new();

        let token = codec.issue(&subject).unwrap();
        assert_eq!(codec.verify(&token).unwrap(), subject);
    }

    #[test]
    fn test_empty_secret_is_rejected() {
        assert!(matches!(
            TokenCodec::new(&SecretString::from(String::new())),
            Err(Error::Signing)
        ));
    }

    #[test]
    fn test_expired_token_is_unauthorized() {
        let codec = codec("a shared secret for tests");
        let token = codec
            .issue_with_lifetime(&guid::new(), Duration::hours(-1))
            .unwrap();

        assert!(matches!(codec.verify(&token), Err(Error::Unauthorized)));
    }

    #[test]
    fn test_foreign_secret_is_unauthorized() {
        let issuer = codec("a shared secret for tests");
        let verifier = codec("a different secret entirely");

        let token = issuer.issue(&guid::new()).unwrap();
        assert!(matches!(verifier.verify(&token), Err(Error::Unauthorized)));
    }

    #[test]
    fn test_tampered_token_is_unauthorized() {
        let codec = codec("a shared secret for tests");
        let token = codec.issue(&guid::new()).unwrap();

        let mut tampered = token.into_bytes();
        let last = tampered.len() - 1;
        tampered[last] = if tampered[last] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(tampered).unwrap();

        assert!(matches!(codec.verify(&tampered), Err(Error::Unauthorized)));
    }

    #[test]
    fn test_wrong_issuer_is_unauthorized() {
        let secret = "a shared secret for tests";
        let codec = codec(secret);

        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: guid::new(),
            iss: "not-wgsltoy.com".to_string(),
            iat: now,
            exp: now + 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap();

        assert!(matches!(codec.verify(&token), Err(Error::Unauthorized)));
    }

    #[test]
    fn test_foreign_algorithm_is_unauthorized() {
        // Same secret, different HMAC flavor; the pinned algorithm wins over
        // whatever the token header declares.
        let secret = "a shared secret for tests";
        let codec = codec(secret);

        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: guid::new(),
            iss: ISSUER.to_string(),
            iat: now,
            exp: now + 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS384),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap();

        assert!(matches!(codec.verify(&token), Err(Error::Unauthorized)));
    }

    #[test]
    fn test_garbage_token_is_unauthorized() {
        let codec = codec("a shared secret for tests");
        assert!(matches!(codec.verify("abc"), Err(Error::Unauthorized)));
        assert!(matches!(codec.verify(""), Err(Error::Unauthorized)));
    }
}
