//! Space Model
//!
//! Loads a declarative list of record definitions ("spaces") and links them
//! into an in-memory model for sizing calculators, code generators and other
//! downstream tooling.
//!
//! ## Features
//!
//! - **Two-pass resolution**: records are built independently, then relations
//!   are linked across records regardless of declaration order
//! - **Best-effort references**: unknown field or space names become absent
//!   links instead of failing the load, and are listed in diagnostics
//! - **Graph queries**: relation targets, sources and cycles via petgraph
//! - **Rendering**: plain text dump and GraphViz DOT export
//!
//! ## Source format
//!
//! ```text
//! [
//!   {
//!     "name": "orders", "type": "record", "logicalType": "Aggregate",
//!     "fields": [{"name": "id", "type": "long"}, {"name": "user_id", "type": "long"}],
//!     "indexes": ["id", {"name": "by_user", "parts": ["user_id", "id"]}],
//!     "affinity": ["user_id"],
//!     "relations": [
//!       {"name": "owner", "count": "one", "to": "users",
//!        "from_fields": "user_id", "to_fields": "id"}
//!     ]
//!   },
//!   ...
//! ]
//! ```

pub mod config;
pub mod diagnostics;
pub mod draft;
pub mod error;
pub mod field;
pub mod graph;
pub mod index;
pub mod relation;
pub mod render;
pub mod schema;
pub mod space;

pub use config::{ModelConfig, OutputFormat};
pub use diagnostics::{Unresolved, UnresolvedKind};
pub use draft::{parse_declarations, SpaceDraft};
pub use error::{ModelError, Result};
pub use field::{Field, FieldId};
pub use graph::RelationGraph;
pub use index::Index;
pub use relation::{Relation, RelationDecl, RelationRef};
pub use render::{render_text, to_dot};
pub use schema::Schema;
pub use space::{Space, SpaceId};
