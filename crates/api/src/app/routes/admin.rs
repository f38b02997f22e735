//! Admin listings over the identity store.
//!
//! The session middleware already enforces the path-mapped permission;
//! handlers re-state their own requirement so a route moved to a new path
//! keeps its guarantee.

use std::sync::Arc;

use axum::{
    Json,
    Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use panelkit_rbac::{PermissionCheck, UserId, flatten_permissions};

use crate::app::dto::{PermissionCatalogQuery, UserSummary};
use crate::app::errors;
use crate::app::services::AppServices;
use crate::guard::{self, CurrentUser};

pub fn router() -> Router {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/:id", get(get_user))
        .route("/roles", get(list_roles))
        .route("/permissions", get(list_permissions))
}

/// GET /admin/users - list users with their role names.
pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
) -> axum::response::Response {
    if let Err(err) = guard::authorize(Some(&user.0), &[PermissionCheck::new("users", "read")]) {
        return err.into_response();
    }

    match services.store.list_users().await {
        Ok(users) => {
            let users: Vec<UserSummary> = users.iter().map(UserSummary::from).collect();
            Json(serde_json::json!({ "users": users })).into_response()
        }
        Err(err) => store_error(err),
    }
}

/// GET /admin/users/:id - a single user with the full grant snapshot.
pub async fn get_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> axum::response::Response {
    if let Err(err) = guard::authorize(Some(&user.0), &[PermissionCheck::new("users", "read")]) {
        return err.into_response();
    }

    match services.store.user_with_permissions(UserId::new(id)).await {
        Ok(Some(found)) => Json(serde_json::json!({ "user": found })).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "user not found"),
        Err(err) => store_error(err),
    }
}

/// GET /admin/roles - list roles with their permission bundles.
pub async fn list_roles(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
) -> axum::response::Response {
    if let Err(err) = guard::authorize(Some(&user.0), &[PermissionCheck::new("roles", "read")]) {
        return err.into_response();
    }

    match services.store.list_roles().await {
        Ok(roles) => Json(serde_json::json!({ "roles": roles })).into_response(),
        Err(err) => store_error(err),
    }
}

/// GET /admin/permissions - the assignable permission catalog.
pub async fn list_permissions(
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<PermissionCatalogQuery>,
) -> axum::response::Response {
    if let Err(err) = guard::authorize(Some(&user.0), &[PermissionCheck::new("roles", "read")]) {
        return err.into_response();
    }

    let mut entries = flatten_permissions();
    if let Some(resource) = &query.resource {
        entries.retain(|entry| entry.resource == resource);
    }

    Json(serde_json::json!({ "permissions": entries })).into_response()
}

fn store_error(err: panelkit_auth::StoreError) -> axum::response::Response {
    tracing::error!(error = %err, "identity store query failed");
    errors::json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "store_error",
        "identity store query failed",
    )
}
