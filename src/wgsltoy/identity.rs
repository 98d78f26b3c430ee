//! Caller identity extraction from the `Authorization` header.
//!
//! The `authenticate` middleware runs once per request, before any handler,
//! and attaches a [`CallerIdentity`] to the request extensions. Identity is
//! request-scoped, nothing here outlives the request.

use axum::{
    extract::Request,
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
    Extension,
};
use std::sync::Arc;

use crate::wgsltoy::{error::Error, token::TokenCodec};

/// The authenticated user behind a request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserInfo {
    pub id: String,
}

/// Caller identity for one request, either anonymous or an authenticated
/// user.
#[derive(Clone, Debug, Default)]
pub struct CallerIdentity(Option<UserInfo>);

impl CallerIdentity {
    #[must_use]
    pub fn anonymous() -> Self {
        Self(None)
    }

    #[must_use]
    pub fn authenticated(user: UserInfo) -> Self {
        Self(Some(user))
    }

    /// Resolve the identity from the request headers.
    ///
    /// An absent header is the anonymous identity, many operations are legal
    /// without credentials. A present header must match the exact two-token
    /// `Bearer <token>` shape and carry a verifiable token; anything else is
    /// `Error::Unauthorized`. An invalid token never degrades to anonymous,
    /// that would let a caller probe token validity by comparing behavior.
    pub fn from_headers(headers: &HeaderMap, tokens: &TokenCodec) -> Result<Self, Error> {
        let Some(value) = headers.get(AUTHORIZATION) else {
            return Ok(Self::anonymous());
        };

        let value = value.to_str().map_err(|_| Error::Unauthorized)?;

        let mut parts = value.split(' ');
        match (parts.next(), parts.next(), parts.next()) {
            (Some("Bearer"), Some(token), None) if !token.is_empty() => {
                let subject = tokens.verify(token)?;
                Ok(Self::authenticated(UserInfo { id: subject }))
            }
            _ => Err(Error::Unauthorized),
        }
    }

    #[must_use]
    pub fn user(&self) -> Option<&UserInfo> {
        self.0.as_ref()
    }

    /// The authenticated user, or `Error::Unauthorized` for anonymous
    /// callers.
    pub fn require(&self) -> Result<&UserInfo, Error> {
        self.0.as_ref().ok_or(Error::Unauthorized)
    }
}

/// Middleware resolving the caller identity for the request.
///
/// Mounted on every route so identity resolution is complete before any
/// authorization decision or data access downstream.
pub async fn authenticate(
    Extension(tokens): Extension<Arc<TokenCodec>>,
    mut request: Request,
    next: Next,
) -> Result<Response, Error> {
    let caller = CallerIdentity::from_headers(request.headers(), &tokens)?;
    request.extensions_mut().insert(caller);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wgsltoy::guid;
    use axum::http::HeaderValue;
    use secrecy::SecretString;

    fn codec() -> TokenCodec {
        TokenCodec::new(&SecretString::from("a shared secret for tests".to_string())).unwrap()
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_absent_header_is_anonymous() {
        let caller = CallerIdentity::from_headers(&HeaderMap::new(), &codec()).unwrap();
        assert!(caller.user().is_none());
        assert!(matches!(caller.require(), Err(Error::Unauthorized)));
    }

    #[test]
    fn test_valid_bearer_token_is_authenticated() {
        let codec = codec();
        let subject = guid::new();
        let token = codec.issue(&subject).unwrap();

        let caller =
            CallerIdentity::from_headers(&headers_with(&format!("Bearer {token}")), &codec)
                .unwrap();
        assert_eq!(caller.require().unwrap().id, subject);
    }

    #[test]
    fn test_wrong_scheme_is_unauthorized() {
        assert!(matches!(
            CallerIdentity::from_headers(&headers_with("Token abc"), &codec()),
            Err(Error::Unauthorized)
        ));
    }

    #[test]
    fn test_lowercase_scheme_is_unauthorized() {
        let codec = codec();
        let token = codec.issue(&guid::new()).unwrap();
        assert!(matches!(
            CallerIdentity::from_headers(&headers_with(&format!("bearer {token}")), &codec),
            Err(Error::Unauthorized)
        ));
    }

    #[test]
    fn test_malformed_header_shapes_are_unauthorized() {
        let codec = codec();
        for value in ["Bearer", "Bearer ", "Bearer a b", "just-a-token"] {
            assert!(
                matches!(
                    CallerIdentity::from_headers(&headers_with(value), &codec),
                    Err(Error::Unauthorized)
                ),
                "header {value:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_invalid_token_does_not_degrade_to_anonymous() {
        assert!(matches!(
            CallerIdentity::from_headers(&headers_with("Bearer not.a.token"), &codec()),
            Err(Error::Unauthorized)
        ));
    }
}
