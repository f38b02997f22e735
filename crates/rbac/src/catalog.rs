use serde::Serialize;

/// Canonical resource → actions matrix for the admin panel.
///
/// This is the authoritative list of assignable permissions; the roles
/// screen and seed tooling both derive from it.
pub const PERMISSION_MAP: &[(&str, &[&str])] = &[
    ("users", CRUD_ACTIONS),
    ("roles", CRUD_ACTIONS),
    ("customers", CRUD_ACTIONS),
    ("contacts", CRUD_ACTIONS),
];

const CRUD_ACTIONS: &[&str] = &["create", "read", "update", "delete"];

/// One assignable (resource, action) pair with a display description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub resource: &'static str,
    pub action: &'static str,
    pub description: String,
}

/// Flatten [`PERMISSION_MAP`] into display rows for the permissions screen.
pub fn flatten_permissions() -> Vec<CatalogEntry> {
    PERMISSION_MAP
        .iter()
        .flat_map(|&(resource, actions)| {
            actions.iter().map(move |&action| CatalogEntry {
                resource,
                action,
                description: format!("{action} {resource}"),
            })
        })
        .collect()
}
