//! Resolved space definitions

use crate::draft::SpaceDraft;
use crate::field::{self, Field, FieldId};
use crate::index::Index;
use crate::relation::Relation;

/// Position of a space within its schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpaceId(pub(crate) usize);

impl SpaceId {
    pub fn position(self) -> usize {
        self.0
    }
}

/// One record definition with its fields, indexes, affinity and relations
#[derive(Debug, Clone)]
pub struct Space {
    id: SpaceId,
    name: Option<String>,
    ty: Option<String>,
    fields: Vec<Field>,
    indexes: Vec<Index>,
    affinity: Option<FieldId>,
    logical_type: Option<String>,
    doc: Option<String>,
    is_space: bool,
    relations: Option<Vec<Relation>>,
}

impl Space {
    /// Finish a draft with the relations resolved for it in pass two
    pub(crate) fn from_draft(id: SpaceId, draft: SpaceDraft, relations: Option<Vec<Relation>>) -> Self {
        Self {
            id,
            name: draft.name,
            ty: draft.ty,
            fields: draft.fields,
            indexes: draft.indexes,
            affinity: draft.affinity,
            logical_type: draft.logical_type,
            doc: draft.doc,
            is_space: draft.is_space,
            relations,
        }
    }

    pub fn id(&self) -> SpaceId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Record kind tag, e.g. `record`
    pub fn ty(&self) -> Option<&str> {
        self.ty.as_deref()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn indexes(&self) -> &[Index] {
        &self.indexes
    }

    pub fn logical_type(&self) -> Option<&str> {
        self.logical_type.as_deref()
    }

    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// True when the declaration built at least one index
    pub fn is_space(&self) -> bool {
        self.is_space
    }

    /// First field with this name, in declaration order
    pub fn get_field(&self, name: &str) -> Option<&Field> {
        self.field_id(name).and_then(|id| self.field(id))
    }

    pub fn field_id(&self, name: &str) -> Option<FieldId> {
        field::lookup(&self.fields, name)
    }

    pub fn field(&self, id: FieldId) -> Option<&Field> {
        self.fields.get(id.0)
    }

    pub fn affinity(&self) -> Option<&Field> {
        self.affinity.and_then(|id| self.field(id))
    }

    /// Fields of an index in key order; unresolved parts are `None`
    pub fn index_fields<'a>(&'a self, index: &'a Index) -> impl Iterator<Item = Option<&'a Field>> + 'a {
        index
            .parts()
            .iter()
            .map(move |part| part.and_then(|id| self.field(id)))
    }

    pub fn get_index(&self, name: &str) -> Option<&Index> {
        self.indexes.iter().find(|index| index.name() == Some(name))
    }

    /// Resolved relations; `None` when the declaration had no `relations`
    pub fn relations(&self) -> Option<&[Relation]> {
        self.relations.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn space(raw: serde_json::Value) -> Space {
        let draft = SpaceDraft::from_value(&raw, 0).unwrap();
        Space::from_draft(SpaceId(0), draft, None)
    }

    #[test]
    fn test_get_field() {
        let s = space(json!({
            "name": "users",
            "fields": [{"name": "id", "type": "long"}, {"name": "email", "type": "string"}]
        }));
        assert_eq!(s.get_field("email").and_then(Field::type_name), Some("string"));
        assert!(s.get_field("missing").is_none());
    }

    #[test]
    fn test_get_field_first_declared_wins() {
        let s = space(json!({
            "name": "users",
            "fields": [{"name": "id", "type": "long"}, {"name": "id", "type": "uuid"}]
        }));
        assert_eq!(s.get_field("id").and_then(Field::type_name), Some("long"));
    }

    #[test]
    fn test_accessors() {
        let s = space(json!({
            "name": "users",
            "type": "record",
            "logicalType": "Aggregate",
            "doc": "registered users",
            "fields": [{"name": "id", "type": "long"}, {"name": "region", "type": "string"}],
            "indexes": [{"name": "primary", "parts": ["region", "id"]}],
            "affinity": ["region"]
        }));
        assert_eq!(s.name(), Some("users"));
        assert_eq!(s.ty(), Some("record"));
        assert_eq!(s.logical_type(), Some("Aggregate"));
        assert_eq!(s.doc(), Some("registered users"));
        assert!(s.is_space());
        assert_eq!(s.affinity().and_then(Field::name), Some("region"));

        let primary = s.get_index("primary").unwrap();
        let names: Vec<_> = s
            .index_fields(primary)
            .map(|f| f.and_then(Field::name))
            .collect();
        assert_eq!(names, vec![Some("region"), Some("id")]);
        assert!(s.relations().is_none());
    }
}
