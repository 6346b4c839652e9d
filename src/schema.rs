//! Schema loading and cross-space resolution
//!
//! Loading is a two-step pipeline:
//!
//! 1. [`parse_declarations`] turns every raw record into an immutable
//!    [`SpaceDraft`], resolving fields, indexes and affinity locally.
//! 2. [`Schema::resolve`] links each draft's relation declarations to the
//!    target spaces, which may be declared anywhere in the source, and
//!    produces the final [`Space`] list.
//!
//! Consumers only ever see the fully linked result.

use std::fs;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use serde_json::Value;
use tracing::debug;

use crate::diagnostics::{Unresolved, UnresolvedKind};
use crate::draft::{parse_declarations, SpaceDraft};
use crate::error::{ModelError, Result};
use crate::relation::{Relation, RelationRef};
use crate::space::{Space, SpaceId};

/// Root of a loaded model: every space, with relations linked across spaces
#[derive(Debug, Clone)]
pub struct Schema {
    spaces: Vec<Space>,
    unresolved: Vec<Unresolved>,
}

impl Schema {
    /// Load a schema source file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "reading schema source");
        let content = fs::read_to_string(path)?;
        content.parse()
    }

    /// Load a schema from any reader holding the JSON source
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let source: Value = serde_json::from_reader(reader)?;
        Self::from_value(&source)
    }

    /// Build a schema from already parsed source data
    pub fn from_value(source: &Value) -> Result<Self> {
        let drafts = parse_declarations(source)?;
        Ok(Self::resolve(drafts))
    }

    /// Pass two: link relation declarations across spaces.
    ///
    /// Spaces keep their declaration order. A space that declared no
    /// `relations` keeps `None`; otherwise every declaration becomes one
    /// [`Relation`], whether or not its endpoints were found.
    pub fn resolve(drafts: Vec<SpaceDraft>) -> Self {
        let mut unresolved = Vec::new();
        let mut resolved: Vec<Option<Vec<Relation>>> = Vec::with_capacity(drafts.len());

        for (position, draft) in drafts.iter().enumerate() {
            unresolved.extend(draft.unresolved.iter().cloned());

            let Some(decls) = draft.relations() else {
                resolved.push(None);
                continue;
            };

            let mut space_relations = Vec::with_capacity(decls.len());
            for decl in decls {
                let target = decl
                    .to
                    .as_deref()
                    .and_then(|name| find_draft(&drafts, name));
                let relation = Relation::resolve(decl, (SpaceId(position), draft), target);

                let miss = |kind, name: &Option<String>| {
                    Unresolved::new(draft.name.clone(), kind, name.clone())
                };
                if relation.from_field_id().is_none() {
                    unresolved.push(miss(
                        UnresolvedKind::RelationFromField { relation: decl.name.clone() },
                        &decl.from_fields,
                    ));
                }
                if relation.to_space_id().is_none() {
                    unresolved.push(miss(
                        UnresolvedKind::RelationTarget { relation: decl.name.clone() },
                        &decl.to,
                    ));
                } else if relation.to_field_id().is_none() {
                    unresolved.push(miss(
                        UnresolvedKind::RelationToField { relation: decl.name.clone() },
                        &decl.to_fields,
                    ));
                }

                space_relations.push(relation);
            }
            resolved.push(Some(space_relations));
        }

        let spaces: Vec<Space> = drafts
            .into_iter()
            .zip(resolved)
            .enumerate()
            .map(|(position, (draft, relations))| {
                Space::from_draft(SpaceId(position), draft, relations)
            })
            .collect();

        let schema = Self { spaces, unresolved };
        debug!(
            spaces = schema.spaces.len(),
            relations = schema.relation_count(),
            unresolved = schema.unresolved.len(),
            "schema resolved"
        );
        schema
    }

    /// All spaces in declaration order
    pub fn spaces(&self) -> &[Space] {
        &self.spaces
    }

    pub fn space_count(&self) -> usize {
        self.spaces.len()
    }

    /// First space with the given name
    pub fn get_space(&self, name: &str) -> Option<&Space> {
        self.spaces.iter().find(|space| space.name() == Some(name))
    }

    /// Space by id.
    ///
    /// # Panics
    ///
    /// Panics if `id` did not come from this schema.
    pub fn space(&self, id: SpaceId) -> &Space {
        &self.spaces[id.0]
    }

    /// Every relation, in space order then declaration order
    pub fn relations(&self) -> impl Iterator<Item = RelationRef<'_>> {
        self.spaces
            .iter()
            .filter_map(Space::relations)
            .flatten()
            .map(move |relation| RelationRef::new(self, relation))
    }

    pub fn relation_count(&self) -> usize {
        self.spaces
            .iter()
            .filter_map(Space::relations)
            .map(<[Relation]>::len)
            .sum()
    }

    /// Navigable relations of one space; `None` when it declared none
    pub fn space_relations<'a>(&'a self, space: &'a Space) -> Option<Vec<RelationRef<'a>>> {
        space.relations().map(|relations| {
            relations
                .iter()
                .map(|relation| RelationRef::new(self, relation))
                .collect()
        })
    }

    /// References that resolved to nothing, in space order
    pub fn unresolved(&self) -> &[Unresolved] {
        &self.unresolved
    }
}

impl FromStr for Schema {
    type Err = ModelError;

    fn from_str(source: &str) -> Result<Self> {
        let source: Value = serde_json::from_str(source)?;
        Self::from_value(&source)
    }
}

fn find_draft<'a>(drafts: &'a [SpaceDraft], name: &str) -> Option<(SpaceId, &'a SpaceDraft)> {
    drafts
        .iter()
        .enumerate()
        .find(|(_, draft)| draft.name() == Some(name))
        .map(|(position, draft)| (SpaceId(position), draft))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_space_without_indexes() {
        let schema = Schema::from_value(&json!([
            {"name": "A", "type": "record", "fields": [{"name": "id", "type": "long"}]}
        ]))
        .unwrap();

        assert_eq!(schema.space_count(), 1);
        let a = schema.get_space("A").unwrap();
        assert!(!a.is_space());
        assert!(a.relations().is_none());
        assert!(schema.get_space("B").is_none());
        assert_eq!(schema.relations().count(), 0);
    }

    #[test]
    fn test_forward_reference_resolves() {
        let schema = Schema::from_value(&json!([
            {
                "name": "A", "type": "record",
                "fields": [{"name": "id", "type": "long"}],
                "relations": [{"name": "r1", "count": "many", "to": "B", "from_fields": "id", "to_fields": "a_id"}]
            },
            {"name": "B", "type": "record", "fields": [{"name": "a_id", "type": "long"}]}
        ]))
        .unwrap();

        let relations: Vec<_> = schema.relations().collect();
        assert_eq!(relations.len(), 1);
        let r1 = relations[0];
        assert_eq!(r1.name(), Some("r1"));
        assert_eq!(r1.count(), Some(&json!("many")));
        assert_eq!(r1.from_space().name(), Some("A"));
        assert_eq!(r1.to_space().and_then(Space::name), Some("B"));
        assert_eq!(r1.from_field().and_then(|f| f.name()), Some("id"));
        assert_eq!(r1.to_field().and_then(|f| f.name()), Some("a_id"));

        let a = schema.get_space("A").unwrap();
        assert_eq!(a.relations().unwrap(), &[r1.relation().clone()]);
        assert!(schema.get_space("B").unwrap().relations().is_none());
        assert!(schema.unresolved().is_empty());
    }

    #[test]
    fn test_duplicate_space_name_first_declared_wins() {
        let schema = Schema::from_value(&json!([
            {
                "name": "A",
                "fields": [{"name": "id"}],
                "relations": [{"name": "r1", "count": "one", "to": "B", "from_fields": "id", "to_fields": "first"}]
            },
            {"name": "B", "fields": [{"name": "first"}]},
            {"name": "B", "fields": [{"name": "second"}]}
        ]))
        .unwrap();

        assert_eq!(schema.space_count(), 3);
        let b = schema.get_space("B").unwrap();
        assert_eq!(b.id(), SpaceId(1));
        assert!(b.get_field("first").is_some());

        let r1 = schema.relations().next().unwrap();
        assert_eq!(r1.relation().to_space_id(), Some(SpaceId(1)));
        assert!(std::ptr::eq(r1.to_space().unwrap(), b));
        assert_eq!(r1.to_field().and_then(|f| f.name()), Some("first"));
        assert!(schema.unresolved().is_empty());
    }

    #[test]
    fn test_unknown_target_does_not_stop_other_relations() {
        let schema = Schema::from_value(&json!([
            {
                "name": "A",
                "fields": [{"name": "id"}],
                "relations": [
                    {"name": "ghost", "count": "one", "to": "Nope", "from_fields": "id", "to_fields": "id"},
                    {"name": "self", "count": "one", "to": "A", "from_fields": "id", "to_fields": "id"}
                ]
            }
        ]))
        .unwrap();

        let relations: Vec<_> = schema.relations().collect();
        assert_eq!(relations.len(), 2);
        assert!(relations[0].to_space().is_none());
        assert!(relations[0].to_field().is_none());
        assert_eq!(relations[0].from_field().and_then(|f| f.name()), Some("id"));
        assert!(relations[1].relation().is_resolved());

        assert_eq!(schema.unresolved().len(), 1);
        assert!(matches!(
            schema.unresolved()[0].kind,
            UnresolvedKind::RelationTarget { .. }
        ));
    }

    #[test]
    fn test_empty_relation_list_stays_empty() {
        let schema = Schema::from_value(&json!([
            {"name": "A", "fields": [], "relations": []}
        ]))
        .unwrap();
        assert_eq!(schema.get_space("A").unwrap().relations().map(<[Relation]>::len), Some(0));
        assert_eq!(schema.space_relations(&schema.spaces()[0]).map(|r| r.len()), Some(0));
    }

    #[test]
    fn test_missing_fields_aborts_load() {
        let result = Schema::from_value(&json!([
            {"name": "A", "fields": []},
            {"name": "B", "type": "record"}
        ]));
        assert!(matches!(result, Err(ModelError::MissingFields { position: 1, .. })));
    }

    #[test]
    fn test_from_str_rejects_bad_json() {
        assert!(matches!("[{".parse::<Schema>(), Err(ModelError::Json(_))));
    }
}
