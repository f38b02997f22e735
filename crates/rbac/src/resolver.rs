use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use crate::permission::{Permission, merge_permissions};
use crate::user::UserProfile;

/// Compute a user's effective permission set.
///
/// Direct grants are folded first (flat entries normalized into grouped
/// form), then each role's permissions, all merging into a single map keyed
/// by [`Permission::dedup_key`]. Merging is commutative and idempotent, so
/// iteration order does not affect the final set; the map is ordered so the
/// output order is deterministic regardless.
///
/// Absent user yields an empty set. Never fails.
pub fn resolve_effective_permissions(user: Option<&UserProfile>) -> Vec<Permission> {
    let Some(user) = user else {
        return Vec::new();
    };

    let mut resolved: BTreeMap<String, Permission> = BTreeMap::new();

    for grant in &user.permissions {
        if let Some(permission) = grant.normalize() {
            fold(&mut resolved, permission);
        }
    }

    for role in &user.roles {
        for permission in &role.permissions {
            fold(&mut resolved, permission.clone());
        }
    }

    resolved.into_values().collect()
}

fn fold(resolved: &mut BTreeMap<String, Permission>, incoming: Permission) {
    match resolved.entry(incoming.dedup_key()) {
        Entry::Occupied(mut entry) => {
            let merged = merge_permissions(entry.get(), &incoming);
            entry.insert(merged);
        }
        Entry::Vacant(entry) => {
            entry.insert(incoming);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grant::PermissionGrant;
    use crate::permission::{Action, ConditionSet, Resource};
    use crate::role::Role;
    use serde_json::json;

    fn permission(resource: &'static str, actions: &[&'static str]) -> Permission {
        Permission::new(
            Resource::new(resource),
            actions.iter().map(|a| Action::new(*a)),
        )
    }

    #[test]
    fn absent_user_yields_empty_set() {
        assert!(resolve_effective_permissions(None).is_empty());
    }

    #[test]
    fn flat_direct_grant_merges_with_role_grant() {
        // Direct flat users:create plus a role granting users:read.
        let user = UserProfile::new(1, "dana@example.com", "Dana")
            .with_permissions([PermissionGrant::flat(
                Resource::new("users"),
                Action::new("create"),
            )])
            .with_roles([Role::new(2, "staff").with_permissions([permission("users", &["read"])])]);

        let resolved = resolve_effective_permissions(Some(&user));
        assert_eq!(resolved.len(), 1);

        let actions: Vec<&str> = resolved[0].actions.iter().map(Action::as_str).collect();
        assert_eq!(actions, vec!["create", "read"]);
    }

    #[test]
    fn overlapping_roles_deduplicate() {
        let user = UserProfile::new(1, "dana@example.com", "Dana").with_roles([
            Role::new(2, "staff").with_permissions([permission("users", &["read", "update"])]),
            Role::new(3, "support").with_permissions([permission("users", &["read", "delete"])]),
        ]);

        let resolved = resolve_effective_permissions(Some(&user));
        assert_eq!(resolved.len(), 1);

        let actions: Vec<&str> = resolved[0].actions.iter().map(Action::as_str).collect();
        assert_eq!(actions, vec!["delete", "read", "update"]);
    }

    #[test]
    fn conditioned_grants_keep_their_own_entry() {
        let mut owned = ConditionSet::new();
        owned.insert("ownerId", json!(1));

        let user = UserProfile::new(1, "dana@example.com", "Dana").with_roles([Role::new(
            2,
            "editor",
        )
        .with_permissions([
            permission("articles", &["read"]),
            permission("articles", &["update"]).with_conditions(owned),
        ])]);

        let resolved = resolve_effective_permissions(Some(&user));
        assert_eq!(resolved.len(), 2);
    }

    #[test]
    fn blank_flat_entries_are_skipped() {
        let user = UserProfile::new(1, "dana@example.com", "Dana").with_permissions([
            PermissionGrant::flat(Resource::new(""), Action::new("read")),
            PermissionGrant::flat(Resource::new("users"), Action::new("read")),
        ]);

        let resolved = resolve_effective_permissions(Some(&user));
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].resource.as_str(), "users");
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;
        use std::collections::{BTreeMap, BTreeSet};

        const RESOURCES: &[&str] = &["users", "roles", "customers", "contacts"];
        const ACTIONS: &[&str] = &["create", "read", "update", "delete"];

        fn pair_strategy() -> impl Strategy<Value = (usize, usize)> {
            (0..RESOURCES.len(), 0..ACTIONS.len())
        }

        proptest! {
            /// No duplicate dedup keys, and the per-resource action set is
            /// exactly the union of everything the sources contributed.
            #[test]
            fn resolved_set_is_a_deduplicated_union(
                direct in proptest::collection::vec(pair_strategy(), 0..12),
                role_a in proptest::collection::vec(pair_strategy(), 0..12),
                role_b in proptest::collection::vec(pair_strategy(), 0..12),
            ) {
                let flat = |&(r, a): &(usize, usize)| {
                    PermissionGrant::flat(Resource::new(RESOURCES[r]), Action::new(ACTIONS[a]))
                };
                let grouped = |pairs: &[(usize, usize)]| -> Vec<Permission> {
                    pairs
                        .iter()
                        .map(|&(r, a)| {
                            Permission::new(Resource::new(RESOURCES[r]), [Action::new(ACTIONS[a])])
                        })
                        .collect()
                };

                let user = UserProfile::new(1, "p@example.com", "Prop")
                    .with_permissions(direct.iter().map(|p| flat(p)))
                    .with_roles([
                        Role::new(2, "a").with_permissions(grouped(&role_a)),
                        Role::new(3, "b").with_permissions(grouped(&role_b)),
                    ]);

                let resolved = resolve_effective_permissions(Some(&user));

                let keys: BTreeSet<String> =
                    resolved.iter().map(Permission::dedup_key).collect();
                prop_assert_eq!(keys.len(), resolved.len());

                let mut expected: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
                for &(r, a) in direct.iter().chain(&role_a).chain(&role_b) {
                    expected.entry(RESOURCES[r]).or_default().insert(ACTIONS[a]);
                }

                let mut actual: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
                for permission in &resolved {
                    actual
                        .entry(permission.resource.as_str())
                        .or_default()
                        .extend(permission.actions.iter().map(Action::as_str));
                }

                prop_assert_eq!(actual, expected);
            }
        }
    }
}
