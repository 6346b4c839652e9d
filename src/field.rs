//! Field definitions

use std::fmt;

use serde_json::Value;

/// Position of a field within its owning space's field list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(pub(crate) usize);

impl FieldId {
    pub fn position(self) -> usize {
        self.0
    }
}

/// First field with the given name, in declaration order
pub(crate) fn lookup(fields: &[Field], name: &str) -> Option<FieldId> {
    fields
        .iter()
        .position(|field| field.name() == Some(name))
        .map(FieldId)
}

/// One named, typed attribute of a space.
///
/// Nothing is validated: a declaration without `name` or `type` produces a
/// field whose accessor returns `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    name: Option<String>,
    ty: Option<Value>,
    default: Option<Value>,
}

impl Field {
    /// Build a field from its raw `{name, type, default?}` mapping
    pub fn from_value(raw: &Value) -> Self {
        Self {
            name: raw.get("name").and_then(|v| v.as_str()).map(String::from),
            ty: raw.get("type").cloned(),
            default: raw.get("default").cloned(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Type descriptor: a type name string or a nested descriptor
    pub fn ty(&self) -> Option<&Value> {
        self.ty.as_ref()
    }

    /// The type when it is a plain type name
    pub fn type_name(&self) -> Option<&str> {
        self.ty.as_ref().and_then(|v| v.as_str())
    }

    /// Declared default. `Some(Value::Null)` is an explicit null default,
    /// `None` means no default was declared.
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.name().unwrap_or("<unnamed>"))?;
        match &self.ty {
            Some(Value::String(s)) => write!(f, "{}", s)?,
            Some(other) => write!(f, "{}", other)?,
            None => write!(f, "<untyped>")?,
        }
        if let Some(default) = &self.default {
            write!(f, " = {}", default)?;
        }
        Ok(())
    }
}
