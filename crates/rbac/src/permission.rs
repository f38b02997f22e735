use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier of a protected entity class (e.g. "users", "roles").
///
/// Resources are opaque strings with no formatting constraints beyond being
/// non-empty; policy meaning is assigned by the catalog and the route table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Resource(Cow<'static, str>);

impl Resource {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl core::fmt::Display for Resource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of an operation on a resource (e.g. "read", "delete").
///
/// "manage" is a superset convention only; nothing here expands it, and
/// callers that want superset semantics must check for it explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Action(Cow<'static, str>);

impl Action {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl core::fmt::Display for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Attribute conditions narrowing a permission's applicability.
///
/// Backed by an ordered map so two condition sets with the same entries
/// serialize identically regardless of insertion order; the dedup key in
/// [`Permission::dedup_key`] depends on this.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConditionSet(BTreeMap<String, Value>);

impl ConditionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Canonical, order-independent JSON rendering.
    pub fn canonical(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_else(|_| String::from("{}"))
    }
}

impl FromIterator<(String, Value)> for ConditionSet {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Grant of one or more actions on a resource, optionally scoped by
/// conditions.
///
/// # Invariants
/// - `actions` is non-empty.
/// - Uniqueness within an effective set is keyed by [`Permission::dedup_key`];
///   two permissions sharing a key must be merged, never duplicated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub resource: Resource,
    pub actions: BTreeSet<Action>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<ConditionSet>,
}

impl Permission {
    pub fn new(resource: Resource, actions: impl IntoIterator<Item = Action>) -> Self {
        Self {
            resource,
            actions: actions.into_iter().collect(),
            conditions: None,
        }
    }

    pub fn with_conditions(mut self, conditions: ConditionSet) -> Self {
        self.conditions = Some(conditions);
        self
    }

    pub fn contains(&self, action: &str) -> bool {
        self.actions.iter().any(|a| a.as_str() == action)
    }

    /// Equality key for deduplication: the resource plus the canonical
    /// serialization of the condition set. An absent condition set and an
    /// empty one produce the same key.
    pub fn dedup_key(&self) -> String {
        let conditions = self
            .conditions
            .as_ref()
            .map(ConditionSet::canonical)
            .unwrap_or_else(|| String::from("{}"));
        format!("{}:{}", self.resource.as_str(), conditions)
    }
}

/// Union the action sets of two permissions that share a dedup key.
///
/// Pure data transformation: commutative in the resulting action set,
/// idempotent, no error conditions. The existing permission's conditions are
/// kept (both sides serialize identically by precondition).
pub fn merge_permissions(existing: &Permission, incoming: &Permission) -> Permission {
    let mut merged = existing.clone();
    merged.actions.extend(incoming.actions.iter().cloned());
    merged
}
