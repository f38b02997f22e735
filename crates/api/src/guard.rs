//! Request-boundary authorization guard.
//!
//! All authorization failures are decided here and translated to a fixed
//! status and message; nothing below this boundary surfaces authorization
//! errors.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use panelkit_rbac::{PermissionCheck, UserProfile, has_all_permissions};

use crate::app::errors;

/// The verified identity attached to an allowed request.
#[derive(Clone)]
pub struct CurrentUser(pub Arc<UserProfile>);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GuardError {
    #[error("unauthorized: {0}")]
    Unauthorized(&'static str),

    #[error("forbidden: not enough permissions")]
    Forbidden,
}

impl GuardError {
    pub fn status(&self) -> StatusCode {
        match self {
            GuardError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            GuardError::Forbidden => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for GuardError {
    fn into_response(self) -> Response {
        let code = match &self {
            GuardError::Unauthorized(_) => "unauthorized",
            GuardError::Forbidden => "forbidden",
        };
        errors::json_error(self.status(), code, self.to_string())
    }
}

/// Allow or deny a request for the given required permissions.
///
/// A superadmin session short-circuits to Allow regardless of
/// `required`; everyone else must pass all checks.
pub fn authorize(user: Option<&UserProfile>, required: &[PermissionCheck]) -> Result<(), GuardError> {
    let Some(user) = user else {
        return Err(GuardError::Unauthorized("no session"));
    };

    if user.is_superadmin() {
        return Ok(());
    }

    if has_all_permissions(Some(user), required) {
        Ok(())
    } else {
        Err(GuardError::Forbidden)
    }
}
