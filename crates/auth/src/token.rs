use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use panelkit_rbac::UserId;

use crate::config::AuthConfig;

/// Minimal token payload: the user id plus the time window.
///
/// Roles and permissions are deliberately never embedded; every
/// verification re-fetches the current snapshot from the identity store, so
/// a permission change takes effect on the user's next request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn user_id(&self) -> UserId {
        UserId::new(self.sub)
    }
}

/// Token verification/signing failure.
///
/// Every verification variant carries a machine-readable code and maps to
/// HTTP 401; expiry variants are the only ones the refresh path recovers
/// from.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token expired")]
    AccessExpired,

    #[error("invalid token")]
    AccessInvalid,

    #[error("token verification failed")]
    AccessVerification,

    #[error("refresh token expired")]
    RefreshExpired,

    #[error("invalid refresh token")]
    RefreshInvalid,

    #[error("token signing failed")]
    Signing,
}

impl TokenError {
    pub fn code(&self) -> &'static str {
        match self {
            TokenError::AccessExpired => "TOKEN_EXPIRED",
            TokenError::AccessInvalid => "TOKEN_INVALID",
            TokenError::AccessVerification => "TOKEN_VERIFICATION_FAILED",
            TokenError::RefreshExpired => "REFRESH_TOKEN_EXPIRED",
            TokenError::RefreshInvalid => "REFRESH_TOKEN_INVALID",
            TokenError::Signing => "TOKEN_SIGNING_FAILED",
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            TokenError::Signing => 500,
            _ => 401,
        }
    }
}

#[derive(Clone, Copy)]
enum TokenKind {
    Access,
    Refresh,
}

/// HS256 signer/verifier for the access/refresh pair.
#[derive(Clone)]
pub struct TokenService {
    config: AuthConfig,
}

impl TokenService {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    /// Short-lived token carrying the user id.
    pub fn sign_access_token(&self, user_id: UserId) -> Result<String, TokenError> {
        self.sign(TokenKind::Access, user_id)
    }

    /// Long-lived token, same minimal payload.
    pub fn sign_refresh_token(&self, user_id: UserId) -> Result<String, TokenError> {
        self.sign(TokenKind::Refresh, user_id)
    }

    pub fn verify_access_token(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify(TokenKind::Access, token)
    }

    pub fn verify_refresh_token(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify(TokenKind::Refresh, token)
    }

    fn sign(&self, kind: TokenKind, user_id: UserId) -> Result<String, TokenError> {
        let (secret, ttl) = match kind {
            TokenKind::Access => (&self.config.access_secret, self.config.access_ttl),
            TokenKind::Refresh => (&self.config.refresh_secret, self.config.refresh_ttl),
        };

        let now = Utc::now();
        let claims = Claims {
            sub: user_id.get(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|_| TokenError::Signing)
    }

    fn verify(&self, kind: TokenKind, token: &str) -> Result<Claims, TokenError> {
        let secret = match kind {
            TokenKind::Access => &self.config.access_secret,
            TokenKind::Refresh => &self.config.refresh_secret,
        };

        // Zero leeway: an expired token must fail closed immediately so the
        // refresh path is the only way past expiry.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let decoded = jsonwebtoken::decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        );

        match decoded {
            Ok(data) => Ok(data.claims),
            Err(err) => Err(classify(kind, err)),
        }
    }
}

fn classify(kind: TokenKind, err: jsonwebtoken::errors::Error) -> TokenError {
    match kind {
        TokenKind::Access => match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::AccessExpired,
            ErrorKind::InvalidToken
            | ErrorKind::InvalidSignature
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_) => TokenError::AccessInvalid,
            _ => TokenError::AccessVerification,
        },
        TokenKind::Refresh => match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::RefreshExpired,
            _ => TokenError::RefreshInvalid,
        },
    }
}
