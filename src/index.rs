//! Index definitions

use crate::field::FieldId;

/// Named, ordered grouping of fields within one space.
///
/// Parts are positions in the owning space's field list. A `None` part is a
/// field name that did not resolve; part order is the key order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    name: Option<String>,
    parts: Vec<Option<FieldId>>,
}

impl Index {
    pub fn new(name: Option<String>, parts: Vec<Option<FieldId>>) -> Self {
        Self { name, parts }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn parts(&self) -> &[Option<FieldId>] {
        &self.parts
    }

    /// Whether every part resolved to a field
    pub fn is_resolved(&self) -> bool {
        self.parts.iter().all(Option::is_some)
    }
}
