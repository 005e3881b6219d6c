//! Differ - Compare desired state with observed state to detect drift
//!
//! Only attributes present in the desired state are compared. Anything the
//! remote service filled in on its own (defaults, computed fields) is not
//! drift.

use crate::resource::{Attributes, Resource, ResourceId, State, Value};
use crate::schema::ResourceSchema;

/// Result of a diff operation
#[derive(Debug, Clone, PartialEq)]
pub enum Diff {
    /// Resource does not exist -> needs creation
    Create(Resource),
    /// Resource exists with differences -> needs update
    Update {
        id: ResourceId,
        changed_attributes: Vec<String>,
    },
    /// Resource exists with no differences -> no action needed
    NoChange(ResourceId),
}

impl Diff {
    /// Returns whether this Diff involves a change
    pub fn is_change(&self) -> bool {
        !matches!(self, Diff::NoChange(_))
    }
}

/// Compare desired state with current state to compute a Diff
pub fn diff(desired: &Resource, current: &State) -> Diff {
    diff_ignoring(desired, current, &[])
}

/// Like [`diff`], but write-only attributes of the schema are never drift
/// because the remote service cannot report them.
pub fn diff_with_schema(desired: &Resource, current: &State, schema: &ResourceSchema) -> Diff {
    let ignored: Vec<&str> = schema.write_only_attributes().collect();
    diff_ignoring(desired, current, &ignored)
}

fn diff_ignoring(desired: &Resource, current: &State, ignored: &[&str]) -> Diff {
    if !current.exists {
        return Diff::Create(desired.clone());
    }

    let changed = find_changed_attributes(&desired.attributes, &current.attributes, ignored);

    if changed.is_empty() {
        Diff::NoChange(desired.id.clone())
    } else {
        Diff::Update {
            id: desired.id.clone(),
            changed_attributes: changed,
        }
    }
}

/// Find changed attributes between desired and current state
fn find_changed_attributes(
    desired: &Attributes,
    current: &Attributes,
    ignored: &[&str],
) -> Vec<String> {
    let mut changed = Vec::new();

    for (key, desired_value) in desired {
        // Skip internal attributes (starting with _)
        if key.starts_with('_') || ignored.contains(&key.as_str()) {
            continue;
        }

        match current.get(key) {
            Some(current_value) if covers(desired_value, current_value) => {}
            _ => changed.push(key.clone()),
        }
    }

    changed
}

/// Whether `current` satisfies `desired`; nested maps only need to agree on
/// the keys the desired map sets.
fn covers(desired: &Value, current: &Value) -> bool {
    match (desired, current) {
        (Value::Map(want), Value::Map(have)) => want
            .iter()
            .all(|(k, v)| have.get(k).is_some_and(|h| covers(v, h))),
        _ => desired == current,
    }
}
