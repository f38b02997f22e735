use std::sync::Arc;

use thiserror::Error;

use panelkit_rbac::UserProfile;

use crate::config::AuthConfig;
use crate::password;
use crate::store::{IdentityStore, StoreError};
use crate::token::{TokenError, TokenService};

/// Freshly minted access/refresh pair.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// A resolved session: the current user snapshot plus rotation state.
///
/// When `needs_refresh` is true the caller MUST set both `rotated` tokens as
/// response cookies so the rotation is transparent to the client.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: UserProfile,
    pub needs_refresh: bool,
    pub rotated: Option<TokenPair>,
}

/// Successful login: the user snapshot plus the initial token pair.
#[derive(Debug, Clone)]
pub struct LoginSession {
    pub user: UserProfile,
    pub tokens: TokenPair,
}

/// Infrastructure failure while resolving a session.
///
/// Authorization outcomes (expired/invalid/missing tokens, deleted user)
/// are expressed as `Ok(None)`, never as errors.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Token(#[from] TokenError),
}

#[derive(Debug, Error)]
pub enum LoginError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Token(#[from] TokenError),
}

/// Issues, verifies and silently refreshes sessions.
///
/// Permissions are re-fetched from the identity store on every resolution
/// rather than trusted from token claims, so a role or grant change takes
/// effect on the user's very next request.
pub struct SessionManager {
    tokens: TokenService,
    store: Arc<dyn IdentityStore>,
}

impl SessionManager {
    pub fn new(config: AuthConfig, store: Arc<dyn IdentityStore>) -> Self {
        Self {
            tokens: TokenService::new(config),
            store,
        }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Resolve a session from the request's token cookies.
    ///
    /// 1. A verifying access token yields the current snapshot,
    ///    `needs_refresh = false`.
    /// 2. An absent or expired access token with a verifying refresh token
    ///    mints a fresh pair for the same user, `needs_refresh = true`.
    /// 3. Anything else (bad signature, no tokens, refresh also bad, user
    ///    deleted) resolves to `None`, i.e. anonymous.
    pub async fn resolve_session(
        &self,
        access_token: Option<&str>,
        refresh_token: Option<&str>,
    ) -> Result<Option<AuthSession>, SessionError> {
        if let Some(token) = access_token {
            match self.tokens.verify_access_token(token) {
                Ok(claims) => {
                    let user = self.store.user_with_permissions(claims.user_id()).await?;
                    return Ok(user.map(|user| AuthSession {
                        user,
                        needs_refresh: false,
                        rotated: None,
                    }));
                }
                // Expiry falls through to the refresh path below.
                Err(TokenError::AccessExpired) => {}
                Err(err) => {
                    tracing::debug!(code = err.code(), "access token rejected");
                    return Ok(None);
                }
            }
        }

        let Some(token) = refresh_token else {
            return Ok(None);
        };
        let claims = match self.tokens.verify_refresh_token(token) {
            Ok(claims) => claims,
            Err(err) => {
                tracing::debug!(code = err.code(), "refresh token rejected");
                return Ok(None);
            }
        };

        let Some(user) = self.store.user_with_permissions(claims.user_id()).await? else {
            return Ok(None);
        };

        let rotated = TokenPair {
            access_token: self.tokens.sign_access_token(claims.user_id())?,
            refresh_token: self.tokens.sign_refresh_token(claims.user_id())?,
        };

        tracing::debug!(user_id = %claims.user_id(), "session refreshed");

        Ok(Some(AuthSession {
            user,
            needs_refresh: true,
            rotated: Some(rotated),
        }))
    }

    /// Verify credentials and mint the initial token pair.
    ///
    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginSession, LoginError> {
        let Some(record) = self.store.find_login(email).await? else {
            return Err(LoginError::InvalidCredentials);
        };
        if !password::verify_password(&record.password_hash, password) {
            return Err(LoginError::InvalidCredentials);
        }

        let Some(user) = self.store.user_with_permissions(record.user_id).await? else {
            return Err(LoginError::InvalidCredentials);
        };

        let tokens = TokenPair {
            access_token: self.tokens.sign_access_token(record.user_id)?,
            refresh_token: self.tokens.sign_refresh_token(record.user_id)?,
        };

        tracing::info!(user_id = %record.user_id, "login succeeded");

        Ok(LoginSession { user, tokens })
    }
}
