//! State graph used by the coverage strategies.
//!
//! A directed multigraph: one vertex per state name, one edge per transition.
//! Parallel edges and self-loops are kept as they are.

use std::collections::HashMap;

use serde::Serialize;

use seqforge_ir::types::Transition;

pub type VertexId = u32;

/// Index of the transition the edge was built from.
pub type EdgeId = usize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    pub id: EdgeId,
    pub from: VertexId,
    pub to: VertexId,
    /// Received message triggering the transition.
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct CoverageGraph {
    vertices: Vec<String>,
    index: HashMap<String, VertexId>,
    edges: Vec<GraphEdge>,
    outgoing: Vec<Vec<EdgeId>>,
    incoming: Vec<Vec<EdgeId>>,
}

impl CoverageGraph {
    pub fn from_transitions(transitions: &[Transition]) -> Self {
        let mut graph = CoverageGraph::default();
        for t in transitions {
            let from = graph.add_vertex(&t.from);
            let to = graph.add_vertex(&t.to);
            let id = graph.edges.len();
            graph.edges.push(GraphEdge {
                id,
                from,
                to,
                message: t.received.clone(),
            });
            graph.outgoing[from as usize].push(id);
            graph.incoming[to as usize].push(id);
        }
        graph
    }

    pub fn add_vertex(&mut self, name: &str) -> VertexId {
        if let Some(id) = self.index.get(name) {
            return *id;
        }
        let id = self.vertices.len() as VertexId;
        self.vertices.push(name.to_string());
        self.index.insert(name.to_string(), id);
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());
        id
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn vertex(&self, name: &str) -> Option<VertexId> {
        self.index.get(name).copied()
    }

    pub fn name(&self, vertex: VertexId) -> &str {
        &self.vertices[vertex as usize]
    }

    pub fn vertices(&self) -> impl Iterator<Item = VertexId> {
        0..self.vertices.len() as VertexId
    }

    pub fn edge(&self, id: EdgeId) -> Option<&GraphEdge> {
        self.edges.get(id)
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn outgoing(&self, vertex: VertexId) -> &[EdgeId] {
        &self.outgoing[vertex as usize]
    }

    pub fn incoming(&self, vertex: VertexId) -> &[EdgeId] {
        &self.incoming[vertex as usize]
    }

    /// Out-degree minus in-degree. Zero everywhere iff the graph is
    /// Eulerian-balanced.
    pub fn imbalance(&self, vertex: VertexId) -> i64 {
        self.outgoing(vertex).len() as i64 - self.incoming(vertex).len() as i64
    }

    pub fn is_balanced(&self) -> bool {
        self.vertices().all(|v| self.imbalance(v) == 0)
    }
}
