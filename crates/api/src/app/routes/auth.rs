//! Login/logout and the current-session view.

use std::sync::Arc;

use axum::{
    Json,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
};

use panelkit_auth::LoginError;
use panelkit_rbac::{allowed_resources, resolve_effective_permissions};

use crate::app::dto::{LoginRequest, UserSummary};
use crate::app::errors;
use crate::app::services::AppServices;
use crate::cookies;
use crate::guard::CurrentUser;

/// POST /auth/login - verify credentials and establish the session cookies.
pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(request): Json<LoginRequest>,
) -> axum::response::Response {
    match services.sessions.login(&request.email, &request.password).await {
        Ok(login) => {
            let body = Json(serde_json::json!({ "user": UserSummary::from(&login.user) }));
            let mut response = (StatusCode::OK, body).into_response();
            cookies::append_session_cookies(
                response.headers_mut(),
                &login.tokens,
                &services.cookies,
            );
            response
        }
        Err(LoginError::InvalidCredentials) => errors::json_error(
            StatusCode::UNAUTHORIZED,
            "invalid_credentials",
            "invalid email or password",
        ),
        Err(err) => {
            tracing::error!(error = %err, "login failed");
            errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "login failed",
            )
        }
    }
}

/// POST /auth/logout - expire both session cookies.
pub async fn logout() -> axum::response::Response {
    let mut response = StatusCode::NO_CONTENT.into_response();
    cookies::append_cleared_session_cookies(response.headers_mut());
    response
}

/// GET /auth/me - current profile plus the derived permission view that
/// drives client-side conditional rendering.
pub async fn me(Extension(user): Extension<CurrentUser>) -> axum::response::Response {
    let user = user.0.as_ref();

    Json(serde_json::json!({
        "user": UserSummary::from(user),
        "permissions": resolve_effective_permissions(Some(user)),
        "resources": allowed_resources(Some(user)),
    }))
    .into_response()
}
