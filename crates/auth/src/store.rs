use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

use panelkit_rbac::{PermissionGrant, Role, RoleId, UserId, UserProfile};

/// Identity store failure (infrastructure, not authorization).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("identity store unavailable: {0}")]
    Unavailable(String),
}

/// Credential row consulted by the login path.
#[derive(Debug, Clone)]
pub struct LoginRecord {
    pub user_id: UserId,
    pub password_hash: String,
}

/// Port to the persistence layer's identity data.
///
/// `user_with_permissions` performs the role join and returns the full
/// snapshot used for authorization; it is consulted on every verified
/// request, never cached across requests.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn user_with_permissions(
        &self,
        user_id: UserId,
    ) -> Result<Option<UserProfile>, StoreError>;

    async fn find_login(&self, email: &str) -> Result<Option<LoginRecord>, StoreError>;

    async fn list_users(&self) -> Result<Vec<UserProfile>, StoreError>;

    async fn list_roles(&self) -> Result<Vec<Role>, StoreError>;
}

/// Seed row for the in-memory store.
///
/// Mirrors the persistence layer's wire shape: roles as ids, direct grants
/// in either flat or grouped form.
#[derive(Debug, Clone)]
pub struct UserSeed {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role_ids: Vec<RoleId>,
    pub permissions: Vec<PermissionGrant>,
    pub metadata: Map<String, Value>,
}

/// In-memory identity store for tests and the dev binary.
#[derive(Default)]
pub struct InMemoryIdentityStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    users: BTreeMap<i64, UserSeed>,
    roles: BTreeMap<i64, Role>,
}

impl InMemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_role(&self, role: Role) {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        inner.roles.insert(role.id.get(), role);
    }

    pub fn insert_user(&self, seed: UserSeed) {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        inner.users.insert(seed.id.get(), seed);
    }

    pub fn remove_user(&self, user_id: UserId) {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        inner.users.remove(&user_id.get());
    }
}

impl Inner {
    fn join(&self, seed: &UserSeed) -> UserProfile {
        // Role ids without a catalog entry are skipped, matching a join.
        let roles: Vec<Role> = seed
            .role_ids
            .iter()
            .filter_map(|id| self.roles.get(&id.get()).cloned())
            .collect();

        UserProfile::new(seed.id, seed.email.clone(), seed.name.clone())
            .with_roles(roles)
            .with_permissions(seed.permissions.iter().cloned())
            .with_metadata(seed.metadata.clone())
    }
}

#[async_trait]
impl IdentityStore for InMemoryIdentityStore {
    async fn user_with_permissions(
        &self,
        user_id: UserId,
    ) -> Result<Option<UserProfile>, StoreError> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        Ok(inner.users.get(&user_id.get()).map(|seed| inner.join(seed)))
    }

    async fn find_login(&self, email: &str) -> Result<Option<LoginRecord>, StoreError> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        Ok(inner.users.values().find(|u| u.email == email).map(|u| LoginRecord {
            user_id: u.id,
            password_hash: u.password_hash.clone(),
        }))
    }

    async fn list_users(&self) -> Result<Vec<UserProfile>, StoreError> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        Ok(inner.users.values().map(|seed| inner.join(seed)).collect())
    }

    async fn list_roles(&self) -> Result<Vec<Role>, StoreError> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        Ok(inner.roles.values().cloned().collect())
    }
}
