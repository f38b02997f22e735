//! Session middleware: the route guard's enforcement point.
//!
//! Control flow per request: extract token cookies → resolve/refresh the
//! session → map the path to its required permission → allow or deny. On
//! allow the verified identity is attached for handlers and any rotated
//! tokens are written back as cookies.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::app::errors;
use crate::app::services::AppServices;
use crate::cookies;
use crate::guard::{self, CurrentUser};
use crate::route_permissions;

pub async fn session_guard(
    State(services): State<Arc<AppServices>>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();

    if route_permissions::is_public_route(&path) {
        return next.run(req).await;
    }

    let access = cookies::cookie_value(req.headers(), cookies::ACCESS_TOKEN_COOKIE);
    let refresh = cookies::cookie_value(req.headers(), cookies::REFRESH_TOKEN_COOKIE);

    if access.is_none() && refresh.is_none() {
        return errors::json_error(StatusCode::UNAUTHORIZED, "unauthorized", "no token");
    }

    let session = match services
        .sessions
        .resolve_session(access.as_deref(), refresh.as_deref())
        .await
    {
        Ok(Some(session)) => session,
        Ok(None) => {
            // Terminal verification failure or deleted account: clear both
            // cookies so the client re-authenticates cleanly.
            let mut response = errors::json_error(
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "invalid or expired token",
            );
            cookies::append_cleared_session_cookies(response.headers_mut());
            return response;
        }
        Err(err) => {
            tracing::error!(error = %err, "session resolution failed");
            return errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "session resolution failed",
            );
        }
    };

    let required: Vec<_> = route_permissions::required_permission(&path)
        .map(|p| vec![p.check()])
        .unwrap_or_default();
    if let Err(err) = guard::authorize(Some(&session.user), &required) {
        tracing::debug!(%path, user_id = %session.user.id, "request denied");
        return err.into_response();
    }

    req.extensions_mut()
        .insert(CurrentUser(Arc::new(session.user)));

    let mut response = next.run(req).await;

    if session.needs_refresh {
        if let Some(pair) = &session.rotated {
            cookies::append_session_cookies(response.headers_mut(), pair, &services.cookies);
        }
    }

    response
}
