//! Relations between spaces

use serde_json::Value;

use crate::draft::SpaceDraft;
use crate::field::{Field, FieldId};
use crate::schema::Schema;
use crate::space::{Space, SpaceId};

/// A relation as declared in the source, before the target space is known.
///
/// Wire keys: `name`, `count`, `to`, `from_fields`, `to_fields`.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationDecl {
    pub name: Option<String>,
    pub count: Option<Value>,
    pub to: Option<String>,
    pub from_fields: Option<String>,
    pub to_fields: Option<String>,
}

impl RelationDecl {
    pub fn from_value(raw: &Value) -> Self {
        let str_key = |key: &str| raw.get(key).and_then(|v| v.as_str()).map(String::from);
        Self {
            name: str_key("name"),
            count: raw.get("count").cloned(),
            to: str_key("to"),
            from_fields: str_key("from_fields"),
            to_fields: str_key("to_fields"),
        }
    }
}

/// A directed, named link from one space/field pair to another.
///
/// Endpoints are stored as ids into the owning [`Schema`]; use
/// [`Schema::relations`] or [`Schema::space_relations`] to get a
/// [`RelationRef`] that hands out the linked spaces and fields directly.
#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    name: Option<String>,
    count: Option<Value>,
    from_space: SpaceId,
    to_space: Option<SpaceId>,
    from_field: Option<FieldId>,
    to_field: Option<FieldId>,
}

impl Relation {
    /// Resolve a declaration against its owning space and its target.
    ///
    /// Field misses are not errors; they leave the endpoint field `None`.
    /// Without a target space the `to` field is `None` too.
    pub(crate) fn resolve(
        decl: &RelationDecl,
        from: (SpaceId, &SpaceDraft),
        to: Option<(SpaceId, &SpaceDraft)>,
    ) -> Self {
        let (from_space, from_draft) = from;
        let from_field = decl
            .from_fields
            .as_deref()
            .and_then(|name| from_draft.get_field(name));
        let to_field = to.and_then(|(_, to_draft)| {
            decl.to_fields
                .as_deref()
                .and_then(|name| to_draft.get_field(name))
        });

        Self {
            name: decl.name.clone(),
            count: decl.count.clone(),
            from_space,
            to_space: to.map(|(id, _)| id),
            from_field,
            to_field,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Cardinality descriptor, passed through uninterpreted
    pub fn count(&self) -> Option<&Value> {
        self.count.as_ref()
    }

    pub fn from_space_id(&self) -> SpaceId {
        self.from_space
    }

    pub fn to_space_id(&self) -> Option<SpaceId> {
        self.to_space
    }

    pub fn from_field_id(&self) -> Option<FieldId> {
        self.from_field
    }

    pub fn to_field_id(&self) -> Option<FieldId> {
        self.to_field
    }

    /// Whether both spaces and both fields resolved
    pub fn is_resolved(&self) -> bool {
        self.to_space.is_some() && self.from_field.is_some() && self.to_field.is_some()
    }
}

/// Borrowed view of a [`Relation`] that navigates to its endpoints
#[derive(Debug, Clone, Copy)]
pub struct RelationRef<'a> {
    schema: &'a Schema,
    relation: &'a Relation,
}

impl<'a> RelationRef<'a> {
    pub(crate) fn new(schema: &'a Schema, relation: &'a Relation) -> Self {
        Self { schema, relation }
    }

    pub fn relation(&self) -> &'a Relation {
        self.relation
    }

    pub fn name(&self) -> Option<&'a str> {
        self.relation.name()
    }

    pub fn count(&self) -> Option<&'a Value> {
        self.relation.count()
    }

    pub fn from_space(&self) -> &'a Space {
        self.schema.space(self.relation.from_space)
    }

    pub fn to_space(&self) -> Option<&'a Space> {
        self.relation.to_space.map(|id| self.schema.space(id))
    }

    pub fn from_field(&self) -> Option<&'a Field> {
        self.relation
            .from_field
            .and_then(|id| self.from_space().field(id))
    }

    pub fn to_field(&self) -> Option<&'a Field> {
        let space = self.to_space()?;
        self.relation.to_field.and_then(|id| space.field(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn draft(raw: Value) -> SpaceDraft {
        SpaceDraft::from_value(&raw, 0).unwrap()
    }

    #[test]
    fn test_decl_from_value() {
        let decl = RelationDecl::from_value(&json!({
            "name": "owner", "count": "many", "to": "users",
            "from_fields": "user_id", "to_fields": "id"
        }));
        assert_eq!(decl.name.as_deref(), Some("owner"));
        assert_eq!(decl.count, Some(json!("many")));
        assert_eq!(decl.to.as_deref(), Some("users"));
        assert_eq!(decl.from_fields.as_deref(), Some("user_id"));
        assert_eq!(decl.to_fields.as_deref(), Some("id"));
    }

    #[test]
    fn test_decl_from_non_mapping() {
        let decl = RelationDecl::from_value(&json!("owner"));
        assert_eq!(decl.name, None);
        assert_eq!(decl.to, None);
    }

    #[test]
    fn test_decl_non_string_names_are_absent() {
        let decl = RelationDecl::from_value(&json!({
            "name": 1, "count": 2, "to": ["users"], "from_fields": 3, "to_fields": {"name": "id"}
        }));
        assert_eq!(decl.name, None);
        assert_eq!(decl.count, Some(json!(2)));
        assert_eq!(decl.to, None);
        assert_eq!(decl.from_fields, None);
        assert_eq!(decl.to_fields, None);
    }

    #[test]
    fn test_resolve_fields() {
        let orders = draft(json!({"name": "orders", "fields": [{"name": "id"}, {"name": "user_id"}]}));
        let users = draft(json!({"name": "users", "fields": [{"name": "id"}]}));
        let decl = RelationDecl::from_value(&json!({
            "name": "owner", "count": 1, "to": "users",
            "from_fields": "user_id", "to_fields": "id"
        }));

        let relation = Relation::resolve(&decl, (SpaceId(0), &orders), Some((SpaceId(1), &users)));
        assert_eq!(relation.from_space_id(), SpaceId(0));
        assert_eq!(relation.to_space_id(), Some(SpaceId(1)));
        assert_eq!(relation.from_field_id(), Some(FieldId(1)));
        assert_eq!(relation.to_field_id(), Some(FieldId(0)));
        assert_eq!(relation.count(), Some(&json!(1)));
        assert!(relation.is_resolved());
    }

    #[test]
    fn test_resolve_without_target() {
        let orders = draft(json!({"name": "orders", "fields": [{"name": "user_id"}]}));
        let decl = RelationDecl::from_value(&json!({
            "name": "owner", "to": "ghost", "from_fields": "user_id", "to_fields": "id"
        }));

        let relation = Relation::resolve(&decl, (SpaceId(0), &orders), None);
        assert_eq!(relation.to_space_id(), None);
        assert_eq!(relation.to_field_id(), None);
        assert_eq!(relation.from_field_id(), Some(FieldId(0)));
        assert!(!relation.is_resolved());
    }
}
