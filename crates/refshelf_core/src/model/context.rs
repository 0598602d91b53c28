//! Context (category) domain model.
//!
//! # Responsibility
//! - Describe one named node of the user-defined category tree.
//! - Map the `-1` root marker of the wire format to `Option`.
//!
//! # Invariants
//! - `parent_id = None` means top-level context.
//! - A child keeps its `parent_id` even after the parent is deleted.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identifier of a context. `0` is the unassigned marker.
pub type ContextId = i64;

/// Wire value used for "no parent".
pub const ROOT_PARENT_ID: ContextId = -1;

/// One node of the category tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    #[serde(default)]
    pub id: ContextId,
    #[serde(default)]
    pub name: String,
    /// Serialized as `parentId`, with `-1` standing for `None`.
    #[serde(
        rename = "parentId",
        default,
        serialize_with = "serialize_parent",
        deserialize_with = "deserialize_parent"
    )]
    pub parent_id: Option<ContextId>,
}

impl Context {
    /// Creates an unassigned context (`id = 0`) for `add`.
    pub fn new(name: impl Into<String>, parent_id: Option<ContextId>) -> Self {
        Self::with_id(0, name, parent_id)
    }

    /// Creates a context with a known id, used when reconstituting.
    pub fn with_id(id: ContextId, name: impl Into<String>, parent_id: Option<ContextId>) -> Self {
        Self {
            id,
            name: name.into(),
            parent_id,
        }
    }

    /// Returns whether this context sits at the top of the tree.
    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }
}

fn serialize_parent<S>(value: &Option<ContextId>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_i64(value.unwrap_or(ROOT_PARENT_ID))
}

fn deserialize_parent<'de, D>(deserializer: D) -> Result<Option<ContextId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<ContextId>::deserialize(deserializer)?;
    Ok(raw.filter(|value| *value != ROOT_PARENT_ID))
}

#[cfg(test)]
mod tests {
    use super::Context;

    #[test]
    fn root_parent_round_trips_as_minus_one() {
        let context = Context::with_id(3, "AI", None);
        let json = serde_json::to_value(&context).unwrap();
        assert_eq!(json["parentId"], -1);

        let decoded: Context = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, context);
    }

    #[test]
    fn missing_parent_decodes_as_top_level() {
        let decoded: Context =
            serde_json::from_value(serde_json::json!({ "id": 4, "name": "Loose" })).unwrap();
        assert!(decoded.is_top_level());
    }
}
