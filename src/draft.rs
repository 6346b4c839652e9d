//! Pass one: raw declarations to self-contained space drafts
//!
//! Everything inside one record (fields, indexes, affinity) is resolved here.
//! Relation declarations are kept as [`RelationDecl`] until every space exists,
//! because a relation may target a space declared later in the source.

use serde_json::Value;
use tracing::warn;

use crate::diagnostics::{Unresolved, UnresolvedKind};
use crate::error::{ModelError, Result};
use crate::field::{self, Field, FieldId};
use crate::index::Index;
use crate::relation::RelationDecl;

/// One record declaration after pass one
#[derive(Debug, Clone)]
pub struct SpaceDraft {
    pub(crate) name: Option<String>,
    pub(crate) ty: Option<String>,
    pub(crate) fields: Vec<Field>,
    pub(crate) indexes: Vec<Index>,
    pub(crate) affinity: Option<FieldId>,
    pub(crate) logical_type: Option<String>,
    pub(crate) doc: Option<String>,
    pub(crate) is_space: bool,
    pub(crate) relations: Option<Vec<RelationDecl>>,
    pub(crate) unresolved: Vec<Unresolved>,
}

/// Split a parsed source into one draft per declaration, order preserved
pub fn parse_declarations(source: &Value) -> Result<Vec<SpaceDraft>> {
    let declarations = source.as_array().ok_or_else(|| {
        ModelError::InvalidSource("expected a sequence of record declarations".to_string())
    })?;

    declarations
        .iter()
        .enumerate()
        .map(|(position, raw)| SpaceDraft::from_value(raw, position))
        .collect()
}

impl SpaceDraft {
    /// Build a draft from one raw record declaration.
    ///
    /// Only a missing or malformed `fields` section is fatal. Index parts and
    /// affinity names that match no field become `None`.
    pub fn from_value(raw: &Value, position: usize) -> Result<Self> {
        if !raw.is_object() {
            return Err(ModelError::InvalidSource(format!(
                "declaration #{} is not a mapping",
                position
            )));
        }

        let name = str_key(raw, "name");
        let fields = parse_fields(raw, &name, position)?;

        let mut draft = Self {
            name,
            ty: str_key(raw, "type"),
            fields,
            indexes: Vec::new(),
            affinity: None,
            logical_type: str_key(raw, "logicalType"),
            doc: str_key(raw, "doc"),
            is_space: false,
            relations: None,
            unresolved: Vec::new(),
        };

        draft.indexes = draft.parse_indexes(raw.get("indexes"));
        draft.is_space = !draft.indexes.is_empty();
        draft.affinity = draft.parse_affinity(raw.get("affinity"));
        draft.relations = draft.parse_relations(raw.get("relations"));

        Ok(draft)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Raw relation declarations, `None` when the record declared none
    pub fn relations(&self) -> Option<&[RelationDecl]> {
        self.relations.as_deref()
    }

    pub fn get_field(&self, name: &str) -> Option<FieldId> {
        field::lookup(&self.fields, name)
    }

    fn resolve_part(&mut self, index_name: Option<&str>, part: &str) -> Option<FieldId> {
        let id = self.get_field(part);
        if id.is_none() {
            self.unresolved.push(Unresolved::new(
                self.name.clone(),
                UnresolvedKind::IndexPart {
                    index: index_name.map(String::from),
                },
                Some(part.to_string()),
            ));
        }
        id
    }

    fn parse_indexes(&mut self, raw: Option<&Value>) -> Vec<Index> {
        let Some(entries) = raw.and_then(|v| v.as_array()) else {
            return Vec::new();
        };

        let mut indexes = Vec::with_capacity(entries.len());
        for entry in entries {
            match entry {
                Value::String(field_name) => {
                    let part = self.resolve_part(Some(field_name.as_str()), field_name);
                    indexes.push(Index::new(Some(field_name.clone()), vec![part]));
                }
                Value::Object(_) => {
                    let index_name = str_key(entry, "name");
                    let parts: Vec<Option<FieldId>> = entry
                        .get("parts")
                        .and_then(|v| v.as_array())
                        .map(|parts| {
                            parts
                                .iter()
                                .map(|part| match part.as_str() {
                                    Some(part) => self.resolve_part(index_name.as_deref(), part),
                                    None => {
                                        self.unresolved.push(Unresolved::new(
                                            self.name.clone(),
                                            UnresolvedKind::IndexPart {
                                                index: index_name.clone(),
                                            },
                                            None,
                                        ));
                                        None
                                    }
                                })
                                .collect()
                        })
                        .unwrap_or_default();
                    indexes.push(Index::new(index_name, parts));
                }
                _ => {}
            }
        }
        indexes
    }

    /// Only the first listed name is used.
    fn parse_affinity(&mut self, raw: Option<&Value>) -> Option<FieldId> {
        let first = raw.and_then(|v| v.as_array()).and_then(|names| names.first())?;
        let id = first.as_str().and_then(|name| self.get_field(name));
        if id.is_none() {
            self.unresolved.push(Unresolved::new(
                self.name.clone(),
                UnresolvedKind::Affinity,
                first.as_str().map(String::from),
            ));
        }
        id
    }

    fn parse_relations(&self, raw: Option<&Value>) -> Option<Vec<RelationDecl>> {
        match raw {
            None | Some(Value::Null) => None,
            Some(Value::Array(entries)) => {
                Some(entries.iter().map(RelationDecl::from_value).collect())
            }
            Some(_) => {
                warn!(
                    space = self.name().unwrap_or("<unnamed>"),
                    "ignoring `relations` that is not a sequence"
                );
                None
            }
        }
    }
}

fn str_key(raw: &Value, key: &str) -> Option<String> {
    raw.get(key).and_then(|v| v.as_str()).map(String::from)
}

fn parse_fields(raw: &Value, name: &Option<String>, position: usize) -> Result<Vec<Field>> {
    let entries = match raw.get("fields") {
        None | Some(Value::Null) => {
            return Err(ModelError::MissingFields {
                space: name.clone(),
                position,
            })
        }
        Some(Value::Array(entries)) => entries,
        Some(_) => {
            return Err(ModelError::InvalidSection {
                space: name.clone(),
                section: "fields",
                expected: "a sequence",
            })
        }
    };

    entries
        .iter()
        .map(|entry| {
            if entry.is_object() {
                Ok(Field::from_value(entry))
            } else {
                Err(ModelError::InvalidSection {
                    space: name.clone(),
                    section: "fields",
                    expected: "a sequence of mappings",
                })
            }
        })
        .collect()
}
