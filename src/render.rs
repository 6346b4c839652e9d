//! Text rendering of a loaded model

use serde_json::Value;

use crate::field::Field;
use crate::graph::RelationGraph;
use crate::schema::Schema;
use crate::space::Space;

/// Render every space with its fields, indexes and relations
pub fn render_text(schema: &Schema) -> String {
    let mut out = String::new();
    for (position, space) in schema.spaces().iter().enumerate() {
        if position > 0 {
            out.push('\n');
        }
        render_space(&mut out, schema, space);
    }
    out
}

fn render_space(out: &mut String, schema: &Schema, space: &Space) {
    out.push_str(&format!(
        "{} ({}){}\n",
        space.name().unwrap_or("<unnamed>"),
        space.ty().unwrap_or("?"),
        if space.is_space() { " [space]" } else { "" }
    ));
    if let Some(logical_type) = space.logical_type() {
        out.push_str(&format!("  logical type: {}\n", logical_type));
    }
    if let Some(doc) = space.doc() {
        out.push_str(&format!("  doc: {}\n", doc));
    }

    out.push_str("  fields:\n");
    for field in space.fields() {
        out.push_str(&format!("    {}\n", field));
    }

    if !space.indexes().is_empty() {
        out.push_str("  indexes:\n");
        for index in space.indexes() {
            let parts: Vec<&str> = space.index_fields(index).map(field_label).collect();
            out.push_str(&format!(
                "    {} ({})\n",
                index.name().unwrap_or("<unnamed>"),
                parts.join(", ")
            ));
        }
    }

    if let Some(affinity) = space.affinity() {
        out.push_str(&format!("  affinity: {}\n", field_label(Some(affinity))));
    }

    if let Some(relations) = schema.space_relations(space) {
        out.push_str("  relations:\n");
        for relation in relations {
            let target = relation
                .to_space()
                .and_then(Space::name)
                .unwrap_or("<unresolved>");
            out.push_str(&format!(
                "    {} [{}]: {} -> {}.{}\n",
                relation.name().unwrap_or("<unnamed>"),
                relation.count().map(count_label).unwrap_or_else(|| "?".to_string()),
                field_label(relation.from_field()),
                target,
                field_label(relation.to_field())
            ));
        }
    }
}

/// Export the relation graph to GraphViz DOT
pub fn to_dot(schema: &Schema) -> String {
    RelationGraph::build(schema).to_dot()
}

fn field_label(field: Option<&Field>) -> &str {
    match field {
        Some(field) => field.name().unwrap_or("<unnamed>"),
        None => "<unresolved>",
    }
}

fn count_label(count: &Value) -> String {
    match count {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_text() {
        let schema = Schema::from_value(&json!([
            {
                "name": "users", "type": "record", "doc": "people",
                "fields": [{"name": "id", "type": "long"}, {"name": "bucket", "type": "int", "default": 0}],
                "indexes": [{"name": "primary", "parts": ["id", "nope"]}],
                "affinity": ["bucket"],
                "relations": [{"name": "orders", "count": "many", "to": "orders", "from_fields": "id", "to_fields": "user_id"}]
            },
            {"name": "orders", "type": "record", "fields": [{"name": "user_id", "type": "long"}]}
        ]))
        .unwrap();

        let text = render_text(&schema);
        assert!(text.starts_with("users (record) [space]\n"));
        assert!(text.contains("  doc: people\n"));
        assert!(text.contains("    bucket: int = 0\n"));
        assert!(text.contains("    primary (id, <unresolved>)\n"));
        assert!(text.contains("  affinity: bucket\n"));
        assert!(text.contains("    orders [many]: id -> orders.user_id\n"));
        assert!(text.contains("\norders (record)\n"));
    }

    #[test]
    fn test_to_dot_matches_graph_export() {
        let schema = Schema::from_value(&json!([
            {"name": "a", "fields": [{"name": "id"}], "relations": [{"name": "peer", "count": "one", "to": "b", "from_fields": "id", "to_fields": "id"}]},
            {"name": "b", "fields": [{"name": "id"}]}
        ]))
        .unwrap();

        let dot = to_dot(&schema);
        assert_eq!(dot, schema.relation_graph().to_dot());
        assert!(dot.contains("\"s0\" -> \"s1\" [label=\"peer (one)\"]"));
    }
}
