//! Authorization decision engine.
//!
//! Pure, stateless predicates over a user snapshot. An unauthenticated user
//! (`None`) fails every check; that is a terminal, non-error outcome, so
//! these functions are safe to call from non-request contexts without any
//! error handling.

use std::borrow::Cow;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::grant::PermissionGrant;
use crate::permission::{Action, ConditionSet, Resource};
use crate::resolver::resolve_effective_permissions;
use crate::user::UserProfile;

/// A single (resource, action) requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionCheck {
    pub resource: Resource,
    pub action: Action,
}

impl PermissionCheck {
    pub fn new(
        resource: impl Into<Cow<'static, str>>,
        action: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            resource: Resource::new(resource),
            action: Action::new(action),
        }
    }
}

/// True iff the user holds `action` on `resource` through a direct grant
/// (either wire shape) or any role.
pub fn has_permission(user: Option<&UserProfile>, resource: &str, action: &str) -> bool {
    let Some(user) = user else {
        return false;
    };

    let direct = user.permissions.iter().any(|grant| match grant {
        PermissionGrant::Flat(flat) => {
            flat.resource.as_str() == resource && flat.action.as_str() == action
        }
        PermissionGrant::Grouped(permission) => {
            permission.resource.as_str() == resource && permission.contains(action)
        }
    });
    if direct {
        return true;
    }

    user.roles.iter().any(|role| {
        role.permissions
            .iter()
            .any(|p| p.resource.as_str() == resource && p.contains(action))
    })
}

/// Conjunction over [`has_permission`].
pub fn has_all_permissions(user: Option<&UserProfile>, checks: &[PermissionCheck]) -> bool {
    checks
        .iter()
        .all(|check| has_permission(user, check.resource.as_str(), check.action.as_str()))
}

/// Disjunction over [`has_permission`].
pub fn has_any_permission(user: Option<&UserProfile>, checks: &[PermissionCheck]) -> bool {
    checks
        .iter()
        .any(|check| has_permission(user, check.resource.as_str(), check.action.as_str()))
}

/// True iff the user holds `action` on `resource` and the matching
/// permission's conditions hold against `data` and the user.
///
/// The matching entry is the first one in the resolved (deterministically
/// ordered) effective set that grants the pair. All recognized conditions
/// present on it must pass; an absent condition set means an unconditional
/// grant.
pub fn can_perform_action(
    user: Option<&UserProfile>,
    resource: &str,
    action: &str,
    data: Option<&Map<String, Value>>,
) -> bool {
    let Some(user) = user else {
        return false;
    };

    let resolved = resolve_effective_permissions(Some(user));
    let Some(permission) = resolved
        .iter()
        .find(|p| p.resource.as_str() == resource && p.contains(action))
    else {
        return false;
    };

    conditions_hold(permission.conditions.as_ref(), data, user)
}

fn conditions_hold(
    conditions: Option<&ConditionSet>,
    data: Option<&Map<String, Value>>,
    user: &UserProfile,
) -> bool {
    let Some(conditions) = conditions else {
        return true;
    };

    for (key, expected) in conditions.iter() {
        let holds = match key.as_str() {
            // Ownership compares the subject's id against the data under
            // check; missing data fails the check, it is not vacuously true.
            "ownerId" => {
                data.and_then(|d| d.get("ownerId")).and_then(Value::as_i64)
                    == Some(user.id.get())
            }
            "department" => user.metadata.get("department") == Some(expected),
            "status" => data.and_then(|d| d.get("status")) == Some(expected),
            // Unrecognized keys are not evaluated.
            _ => true,
        };
        if !holds {
            return false;
        }
    }
    true
}

/// True iff the user holds a role with the given name.
pub fn has_role(user: Option<&UserProfile>, role_name: &str) -> bool {
    let Some(user) = user else {
        return false;
    };
    user.roles.iter().any(|role| role.name == role_name)
}

pub fn has_any_role(user: Option<&UserProfile>, role_names: &[&str]) -> bool {
    role_names.iter().any(|name| has_role(user, name))
}

pub fn has_all_roles(user: Option<&UserProfile>, role_names: &[&str]) -> bool {
    let Some(user) = user else {
        return false;
    };
    role_names.iter().all(|name| has_role(Some(user), name))
}

/// Resources the user holds at least one action on, deduplicated.
pub fn allowed_resources(user: Option<&UserProfile>) -> Vec<Resource> {
    let resources: BTreeSet<Resource> = resolve_effective_permissions(user)
        .into_iter()
        .map(|p| p.resource)
        .collect();
    resources.into_iter().collect()
}

/// All actions the user can perform on `resource`, deduplicated.
pub fn allowed_actions(user: Option<&UserProfile>, resource: &str) -> Vec<Action> {
    let actions: BTreeSet<Action> = resolve_effective_permissions(user)
        .into_iter()
        .filter(|p| p.resource.as_str() == resource)
        .flat_map(|p| p.actions)
        .collect();
    actions.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permission::Permission;
    use crate::role::Role;
    use serde_json::json;

    fn editor() -> UserProfile {
        // Role "editor" with articles read/update, no direct grants.
        UserProfile::new(5, "erin@example.com", "Erin").with_roles([Role::new(2, "editor")
            .with_permissions([Permission::new(
                Resource::new("articles"),
                [Action::new("read"), Action::new("update")],
            )])])
    }

    fn data(entries: &[(&str, Value)]) -> Map<String, Value> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn unauthenticated_user_fails_every_check() {
        assert!(!has_permission(None, "articles", "read"));
        assert!(!has_all_permissions(None, &[PermissionCheck::new("articles", "read")]));
        assert!(!has_any_permission(None, &[PermissionCheck::new("articles", "read")]));
        assert!(!can_perform_action(None, "articles", "read", None));
        assert!(!has_role(None, "editor"));
        assert!(allowed_resources(None).is_empty());
    }

    #[test]
    fn role_grant_allows_listed_actions_only() {
        let user = editor();
        assert!(has_permission(Some(&user), "articles", "read"));
        assert!(!has_permission(Some(&user), "articles", "delete"));
        assert!(!has_permission(Some(&user), "users", "read"));
    }

    #[test]
    fn direct_flat_grant_is_checked_alongside_roles() {
        let user = editor().with_permissions([PermissionGrant::flat(
            Resource::new("users"),
            Action::new("create"),
        )]);

        assert!(has_permission(Some(&user), "users", "create"));
        assert!(has_permission(Some(&user), "articles", "read"));
    }

    #[test]
    fn all_and_any_combinators() {
        let user = editor();
        let both = [
            PermissionCheck::new("articles", "read"),
            PermissionCheck::new("articles", "update"),
        ];
        let mixed = [
            PermissionCheck::new("articles", "read"),
            PermissionCheck::new("articles", "delete"),
        ];

        assert!(has_all_permissions(Some(&user), &both));
        assert!(!has_all_permissions(Some(&user), &mixed));
        assert!(has_any_permission(Some(&user), &mixed));
        assert!(!has_any_permission(
            Some(&user),
            &[PermissionCheck::new("users", "read")]
        ));
    }

    #[test]
    fn owner_condition_requires_matching_data() {
        let mut owned = ConditionSet::new();
        owned.insert("ownerId", json!(7));

        let user = UserProfile::new(7, "opal@example.com", "Opal").with_roles([Role::new(
            3,
            "author",
        )
        .with_permissions([Permission::new(
            Resource::new("articles"),
            [Action::new("update")],
        )
        .with_conditions(owned)])]);

        let matching = data(&[("ownerId", json!(7))]);
        let other = data(&[("ownerId", json!(8))]);

        assert!(can_perform_action(Some(&user), "articles", "update", Some(&matching)));
        assert!(!can_perform_action(Some(&user), "articles", "update", Some(&other)));
        // Missing attribute fails the check, not vacuously true.
        assert!(!can_perform_action(Some(&user), "articles", "update", None));
    }

    #[test]
    fn department_condition_reads_user_metadata() {
        let mut scoped = ConditionSet::new();
        scoped.insert("department", json!("sales"));

        let base = UserProfile::new(9, "sam@example.com", "Sam").with_roles([Role::new(
            4,
            "analyst",
        )
        .with_permissions([Permission::new(
            Resource::new("reports"),
            [Action::new("read")],
        )
        .with_conditions(scoped)])]);

        let in_sales =
            base.clone().with_metadata(data(&[("department", json!("sales"))]));
        let in_support =
            base.clone().with_metadata(data(&[("department", json!("support"))]));

        assert!(can_perform_action(Some(&in_sales), "reports", "read", None));
        assert!(!can_perform_action(Some(&in_support), "reports", "read", None));
        assert!(!can_perform_action(Some(&base), "reports", "read", None));
    }

    #[test]
    fn status_condition_checks_data() {
        let mut gated = ConditionSet::new();
        gated.insert("status", json!("draft"));

        let user = UserProfile::new(2, "dee@example.com", "Dee").with_roles([Role::new(
            5,
            "reviewer",
        )
        .with_permissions([Permission::new(
            Resource::new("proposals"),
            [Action::new("delete")],
        )
        .with_conditions(gated)])]);

        let draft = data(&[("status", json!("draft"))]);
        let active = data(&[("status", json!("active"))]);

        assert!(can_perform_action(Some(&user), "proposals", "delete", Some(&draft)));
        assert!(!can_perform_action(Some(&user), "proposals", "delete", Some(&active)));
    }

    #[test]
    fn unconditional_grant_needs_no_data() {
        let user = editor();
        assert!(can_perform_action(Some(&user), "articles", "read", None));
    }

    #[test]
    fn unrecognized_condition_keys_pass() {
        let mut odd = ConditionSet::new();
        odd.insert("region", json!("emea"));

        let user = UserProfile::new(3, "rio@example.com", "Rio").with_roles([Role::new(
            6,
            "ops",
        )
        .with_permissions([Permission::new(
            Resource::new("servers"),
            [Action::new("read")],
        )
        .with_conditions(odd)])]);

        assert!(can_perform_action(Some(&user), "servers", "read", None));
    }

    #[test]
    fn role_name_checks() {
        let user = editor();
        assert!(has_role(Some(&user), "editor"));
        assert!(!has_role(Some(&user), "admin"));
        assert!(has_any_role(Some(&user), &["admin", "editor"]));
        assert!(!has_all_roles(Some(&user), &["admin", "editor"]));
        assert!(has_all_roles(Some(&user), &["editor"]));
    }

    #[test]
    fn granting_more_never_removes_capabilities() {
        let before = editor();
        let mut after = editor();
        after.roles[0].permissions.push(Permission::new(
            Resource::new("articles"),
            [Action::new("delete")],
        ));

        for action in ["read", "update"] {
            assert!(has_permission(Some(&before), "articles", action));
            assert!(has_permission(Some(&after), "articles", action));
        }
        assert!(has_permission(Some(&after), "articles", "delete"));
    }

    #[test]
    fn allowed_views_deduplicate() {
        let user = editor().with_permissions([PermissionGrant::flat(
            Resource::new("articles"),
            Action::new("read"),
        )]);

        let resources = allowed_resources(Some(&user));
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].as_str(), "articles");

        let actions = allowed_actions(Some(&user), "articles");
        let actions: Vec<&str> = actions.iter().map(Action::as_str).collect();
        assert_eq!(actions, vec!["read", "update"]);
    }
}
