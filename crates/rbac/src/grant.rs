use serde::{Deserialize, Serialize};

use crate::permission::{Action, ConditionSet, Permission, Resource};

/// A direct permission grant as delivered by the identity store.
///
/// The store's wire format carries two shapes: a flat
/// `{resource, action}` row (one action per entry) and a grouped
/// `{resource, actions: [...]}` entry. Both are first-class variants here;
/// [`PermissionGrant::normalize`] folds either into a grouped [`Permission`]
/// at the resolver boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PermissionGrant {
    Grouped(Permission),
    Flat(FlatGrant),
}

/// Flat wire shape: exactly one action on a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatGrant {
    pub resource: Resource,
    pub action: Action,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<ConditionSet>,
}

impl PermissionGrant {
    pub fn flat(resource: Resource, action: Action) -> Self {
        Self::Flat(FlatGrant {
            resource,
            action,
            conditions: None,
        })
    }

    pub fn grouped(permission: Permission) -> Self {
        Self::Grouped(permission)
    }

    /// Fold the grant into a grouped [`Permission`].
    ///
    /// Returns `None` for entries that cannot contribute a grant: a flat
    /// entry with an empty resource or action, or a grouped entry with an
    /// empty action set. Such entries are skipped, not errors.
    pub fn normalize(&self) -> Option<Permission> {
        match self {
            PermissionGrant::Grouped(permission) => {
                if permission.resource.is_empty() || permission.actions.is_empty() {
                    return None;
                }
                Some(permission.clone())
            }
            PermissionGrant::Flat(flat) => {
                if flat.resource.is_empty() || flat.action.is_empty() {
                    return None;
                }
                let mut permission =
                    Permission::new(flat.resource.clone(), [flat.action.clone()]);
                permission.conditions = flat.conditions.clone();
                Some(permission)
            }
        }
    }
}
