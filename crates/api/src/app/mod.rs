//! HTTP application wiring (Axum router + service wiring).
//!
//! Layout:
//! - `services.rs`: dependency wiring (session manager, identity store)
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::Router;
use tower::ServiceBuilder;

use panelkit_auth::{AuthConfig, IdentityStore};

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Runtime configuration for the HTTP surface.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub auth: AuthConfig,
    /// Mark session cookies `Secure` (production deployments).
    pub secure_cookies: bool,
}

/// Build the full HTTP router (public entrypoint used by `main.rs` and the
/// black-box tests).
pub fn build_app(config: ApiConfig, store: Arc<dyn IdentityStore>) -> Router {
    let services = Arc::new(services::build_services(config, store));

    routes::router().layer(
        ServiceBuilder::new()
            .layer(axum::middleware::from_fn_with_state(
                services.clone(),
                middleware::session_guard,
            ))
            .layer(axum::Extension(services)),
    )
}
