//! Relation graph
//!
//! Spaces as nodes, resolved relations as edges. Relations whose target space
//! is unknown have no edge. Node indices match [`SpaceId`] positions.

use petgraph::algo::kosaraju_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use crate::schema::Schema;
use crate::space::{Space, SpaceId};

/// Directed graph of space-to-space relations
pub struct RelationGraph<'a> {
    schema: &'a Schema,
    graph: DiGraph<SpaceId, usize>,
}

impl<'a> RelationGraph<'a> {
    pub fn build(schema: &'a Schema) -> Self {
        let mut graph = DiGraph::with_capacity(schema.space_count(), schema.relation_count());
        for space in schema.spaces() {
            graph.add_node(space.id());
        }

        for (position, relation) in schema.relations().enumerate() {
            let relation = relation.relation();
            if let Some(to) = relation.to_space_id() {
                graph.add_edge(
                    NodeIndex::new(relation.from_space_id().position()),
                    NodeIndex::new(to.position()),
                    position,
                );
            }
        }

        Self { schema, graph }
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Spaces this space has relations to, in declaration order, no repeats
    pub fn targets(&self, space: SpaceId) -> Vec<&'a Space> {
        self.neighbors(space, Direction::Outgoing)
    }

    /// Spaces with relations pointing at this space, in declaration order
    pub fn sources(&self, space: SpaceId) -> Vec<&'a Space> {
        self.neighbors(space, Direction::Incoming)
    }

    /// Spaces the named space has relations to; `None` if no space has that name
    pub fn referencing(&self, name: &str) -> Option<Vec<&'a Space>> {
        let space = self.schema.get_space(name)?;
        Some(self.targets(space.id()))
    }

    /// Spaces with relations to the named space; `None` if no space has that name
    pub fn referenced_by(&self, name: &str) -> Option<Vec<&'a Space>> {
        let space = self.schema.get_space(name)?;
        Some(self.sources(space.id()))
    }

    fn neighbors(&self, space: SpaceId, direction: Direction) -> Vec<&'a Space> {
        let mut ids: Vec<SpaceId> = self
            .graph
            .neighbors_directed(NodeIndex::new(space.position()), direction)
            .filter_map(|idx| self.graph.node_weight(idx).copied())
            .collect();
        ids.sort();
        ids.dedup();
        ids.into_iter().map(|id| self.schema.space(id)).collect()
    }

    /// Groups of spaces that reach each other through relations.
    ///
    /// Single spaces are left out, including self-relations.
    pub fn cycles(&self) -> Vec<Vec<&'a Space>> {
        kosaraju_scc(&self.graph)
            .into_iter()
            .filter(|scc| scc.len() > 1)
            .map(|scc| {
                let mut ids: Vec<SpaceId> = scc
                    .into_iter()
                    .filter_map(|idx| self.graph.node_weight(idx).copied())
                    .collect();
                ids.sort();
                ids.into_iter().map(|id| self.schema.space(id)).collect()
            })
            .collect()
    }

    /// Export to GraphViz DOT
    pub fn to_dot(&self) -> String {
        let mut output = String::new();

        output.push_str("digraph SpaceModel {\n");
        output.push_str("  rankdir=LR;\n");
        output.push_str("  node [shape=box, style=\"filled,rounded\", fontname=\"Helvetica\", fontsize=10];\n");
        output.push_str("  edge [fontname=\"Helvetica\", fontsize=8];\n");
        output.push('\n');

        for space in self.schema.spaces() {
            // Plain records are not stored spaces
            let fill = if space.is_space() { "#00BCD4" } else { "#9E9E9E" };
            output.push_str(&format!(
                "  \"{}\" [label=\"{}\", fillcolor=\"{}\"];\n",
                node_id(space),
                escape(space.name().unwrap_or("<unnamed>")),
                fill
            ));
        }

        output.push('\n');

        let relations: Vec<_> = self.schema.relations().collect();
        for edge in self.graph.edge_references() {
            let (Some(source), Some(target)) = (
                self.graph.node_weight(edge.source()),
                self.graph.node_weight(edge.target()),
            ) else {
                continue;
            };
            let relation = relations[*edge.weight()];
            let label = match relation.count() {
                Some(count) => format!(
                    "{} ({})",
                    relation.name().unwrap_or(""),
                    count.as_str().map(String::from).unwrap_or_else(|| count.to_string())
                ),
                None => relation.name().unwrap_or("").to_string(),
            };
            output.push_str(&format!(
                "  \"{}\" -> \"{}\" [label=\"{}\"];\n",
                node_id(self.schema.space(*source)),
                node_id(self.schema.space(*target)),
                escape(&label)
            ));
        }

        output.push_str("}\n");
        output
    }
}

impl Schema {
    /// Graph of the relations whose target space exists
    pub fn relation_graph(&self) -> RelationGraph<'_> {
        RelationGraph::build(self)
    }
}

fn node_id(space: &Space) -> String {
    format!("s{}", space.id().position())
}

fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}
