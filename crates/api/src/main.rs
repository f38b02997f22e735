use std::sync::Arc;

use panelkit_api::app::{self, ApiConfig};
use panelkit_auth::{AuthConfig, InMemoryIdentityStore, UserSeed, hash_password};
use panelkit_rbac::{
    Action, PERMISSION_MAP, Permission, Resource, Role, RoleId, SUPERADMIN_ROLE_ID, UserId,
};

#[tokio::main]
async fn main() {
    panelkit_api::telemetry::init();

    let config = ApiConfig {
        auth: AuthConfig::from_env(),
        secure_cookies: std::env::var("APP_ENV").is_ok_and(|v| v == "production"),
    };

    let store = Arc::new(dev_store());

    let app = app::build_app(config, store);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:8080")
        .await
        .expect("failed to bind 0.0.0.0:8080");

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}

/// Seed an in-memory identity store until a real persistence layer is wired.
fn dev_store() -> InMemoryIdentityStore {
    tracing::warn!("using in-memory identity store with dev seed data");

    let store = InMemoryIdentityStore::new();

    store.insert_role(Role::new(SUPERADMIN_ROLE_ID, "superadmin"));
    store.insert_role(Role::new(2, "manager").with_permissions(
        PERMISSION_MAP.iter().map(|(resource, actions)| {
            Permission::new(
                Resource::new(*resource),
                actions.iter().map(|a| Action::new(*a)),
            )
        }),
    ));

    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
        tracing::warn!("ADMIN_PASSWORD not set; using insecure dev default");
        "admin".to_string()
    });
    let password_hash = hash_password(&password).expect("failed to hash dev password");

    store.insert_user(UserSeed {
        id: UserId::new(1),
        email: "admin@example.com".to_string(),
        name: "Admin".to_string(),
        password_hash: password_hash.clone(),
        role_ids: vec![SUPERADMIN_ROLE_ID],
        permissions: Vec::new(),
        metadata: serde_json::Map::new(),
    });
    store.insert_user(UserSeed {
        id: UserId::new(2),
        email: "manager@example.com".to_string(),
        name: "Manager".to_string(),
        password_hash,
        role_ids: vec![RoleId::new(2)],
        permissions: Vec::new(),
        metadata: serde_json::Map::new(),
    });

    store
}
