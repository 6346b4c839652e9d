//! Unresolved reference reporting
//!
//! Loading is best-effort: a name that matches no field or space becomes an
//! absent reference instead of an error. Each such miss is recorded here so
//! tooling can report it without walking the whole model.

use std::fmt;

/// What kind of reference failed to resolve
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnresolvedKind {
    /// A part of the named index
    IndexPart { index: Option<String> },
    /// The affinity field
    Affinity,
    /// The `to` space of a relation
    RelationTarget { relation: Option<String> },
    /// The `from_fields` field of a relation
    RelationFromField { relation: Option<String> },
    /// The `to_fields` field of a relation
    RelationToField { relation: Option<String> },
}

/// One absent reference in the loaded model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unresolved {
    /// Space that declared the reference
    pub space: Option<String>,
    pub kind: UnresolvedKind,
    /// The name that was looked up; `None` when the declaration gave none
    pub name: Option<String>,
}

impl Unresolved {
    pub fn new(space: Option<String>, kind: UnresolvedKind, name: Option<String>) -> Self {
        Self { space, kind, name }
    }
}

impl fmt::Display for Unresolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let space = self.space.as_deref().unwrap_or("<unnamed>");
        let name = self.name.as_deref().unwrap_or("<none>");
        let label = |item: &Option<String>| item.as_deref().unwrap_or("<unnamed>").to_string();

        match &self.kind {
            UnresolvedKind::IndexPart { index } => {
                write!(f, "{}: index {} part `{}` matches no field", space, label(index), name)
            }
            UnresolvedKind::Affinity => {
                write!(f, "{}: affinity `{}` matches no field", space, name)
            }
            UnresolvedKind::RelationTarget { relation } => {
                write!(f, "{}: relation {} targets unknown space `{}`", space, label(relation), name)
            }
            UnresolvedKind::RelationFromField { relation } => {
                write!(f, "{}: relation {} from field `{}` not found", space, label(relation), name)
            }
            UnresolvedKind::RelationToField { relation } => {
                write!(f, "{}: relation {} to field `{}` not found", space, label(relation), name)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_relation_target() {
        let miss = Unresolved::new(
            Some("orders".to_string()),
            UnresolvedKind::RelationTarget {
                relation: Some("buyer".to_string()),
            },
            Some("customers".to_string()),
        );
        assert_eq!(
            miss.to_string(),
            "orders: relation buyer targets unknown space `customers`"
        );
    }

    #[test]
    fn test_display_unnamed_parts() {
        let miss = Unresolved::new(None, UnresolvedKind::IndexPart { index: None }, None);
        assert_eq!(
            miss.to_string(),
            "<unnamed>: index <unnamed> part `<none>` matches no field"
        );
    }
}
