//! Route-to-permission mapping.
//!
//! Declares which permission an inbound path requires. Exact matches win;
//! otherwise the first table entry whose path is a prefix of the request
//! path applies. Guarded paths with no entry require authentication only.

use panelkit_rbac::PermissionCheck;

/// Permission required to access a route subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutePermission {
    pub resource: &'static str,
    pub action: &'static str,
}

impl RoutePermission {
    pub fn check(&self) -> PermissionCheck {
        PermissionCheck::new(self.resource, self.action)
    }
}

const ROUTE_PERMISSIONS: &[(&str, RoutePermission)] = &[
    // User management
    ("/admin/users", RoutePermission { resource: "users", action: "read" }),
    ("/admin/customers", RoutePermission { resource: "customers", action: "read" }),
    ("/admin/contacts", RoutePermission { resource: "contacts", action: "read" }),
    // Settings
    ("/admin/roles", RoutePermission { resource: "roles", action: "read" }),
    ("/admin/permissions", RoutePermission { resource: "roles", action: "read" }),
];

/// Routes reachable without a session.
pub const PUBLIC_ROUTES: &[&str] = &["/health", "/auth/login", "/auth/logout"];

/// Required permission for a path, if any.
pub fn required_permission(path: &str) -> Option<&'static RoutePermission> {
    if let Some((_, permission)) = ROUTE_PERMISSIONS.iter().find(|(route, _)| *route == path) {
        return Some(permission);
    }

    ROUTE_PERMISSIONS
        .iter()
        .find(|(route, _)| path.starts_with(route))
        .map(|(_, permission)| permission)
}

pub fn is_public_route(path: &str) -> bool {
    PUBLIC_ROUTES
        .iter()
        .any(|route| path == *route || path.starts_with(&format!("{route}/")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_wins() {
        let permission = required_permission("/admin/users").unwrap();
        assert_eq!(permission.resource, "users");
        assert_eq!(permission.action, "read");
    }

    #[test]
    fn child_paths_inherit_the_parent_permission() {
        let permission = required_permission("/admin/users/7").unwrap();
        assert_eq!(permission.resource, "users");
    }

    #[test]
    fn unmapped_paths_have_no_required_permission() {
        assert_eq!(required_permission("/auth/me"), None);
    }

    #[test]
    fn public_routes_match_exact_and_subpaths() {
        assert!(is_public_route("/health"));
        assert!(is_public_route("/auth/login"));
        assert!(!is_public_route("/auth/me"));
        assert!(!is_public_route("/admin/users"));
    }
}
