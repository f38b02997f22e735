use serde::{Deserialize, Serialize};

use panelkit_rbac::UserProfile;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct PermissionCatalogQuery {
    pub resource: Option<String>,
}

// -------------------------
// Response DTOs
// -------------------------

/// User shape returned to clients: role names only, no grants.
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub roles: Vec<String>,
}

impl From<&UserProfile> for UserSummary {
    fn from(user: &UserProfile) -> Self {
        Self {
            id: user.id.get(),
            email: user.email.clone(),
            name: user.name.clone(),
            roles: user.role_names().iter().map(|r| r.to_string()).collect(),
        }
    }
}
