use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::permission::Permission;

/// Identifier of a role as keyed by the identity store.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(i64);

impl RoleId {
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl core::fmt::Display for RoleId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<i64> for RoleId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl FromStr for RoleId {
    type Err = core::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Role id `1` is the reserved superadmin sentinel.
///
/// A hard-coded convention shared with the identity store's seed data; a
/// user holding this role bypasses all permission checks at the guard.
pub const SUPERADMIN_ROLE_ID: RoleId = RoleId::new(1);

/// A named bundle of permissions.
///
/// Owned by the persistence layer; once embedded in a [`crate::UserProfile`]
/// snapshot it is immutable for the lifetime of that snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

impl Role {
    pub fn new(id: impl Into<RoleId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            permissions: Vec::new(),
        }
    }

    pub fn with_permissions(mut self, permissions: impl IntoIterator<Item = Permission>) -> Self {
        self.permissions = permissions.into_iter().collect();
        self
    }

    pub fn is_superadmin(&self) -> bool {
        self.id == SUPERADMIN_ROLE_ID
    }
}
