//! `panelkit-rbac` — pure RBAC authorization core.
//!
//! This crate is intentionally decoupled from HTTP and storage: it models
//! permissions, resolves a user's effective permission set, and answers
//! authorization questions. Nothing here performs IO, and none of the
//! predicates return errors. Absence of a grant is `false`, not a failure,
//! so the same functions are usable outside a request context.

pub mod catalog;
pub mod engine;
pub mod grant;
pub mod permission;
pub mod resolver;
pub mod role;
pub mod user;

pub use catalog::{CatalogEntry, PERMISSION_MAP, flatten_permissions};
pub use engine::{
    PermissionCheck, allowed_actions, allowed_resources, can_perform_action, has_all_permissions,
    has_all_roles, has_any_permission, has_any_role, has_permission, has_role,
};
pub use grant::{FlatGrant, PermissionGrant};
pub use permission::{Action, ConditionSet, Permission, Resource, merge_permissions};
pub use resolver::resolve_effective_permissions;
pub use role::{Role, RoleId, SUPERADMIN_ROLE_ID};
pub use user::{UserId, UserProfile};
