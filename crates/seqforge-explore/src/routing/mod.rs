//! Graph walks for transition and state coverage.

pub mod connectivity;
pub mod flow;
pub mod paths;
pub mod postman;
pub mod tour;

use serde::Serialize;

use seqforge_compiler::graph::{CoverageGraph, EdgeId, VertexId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("graph has no edges to cover")]
    EmptyGraph,

    #[error("graph is not strongly connected")]
    NotStronglyConnected,

    #[error("start state '{0}' is not a vertex of the graph")]
    UnknownStartState(String),
}

/// A walk through the graph. `vertices` has one more entry than `edges`;
/// edge `i` leads from `vertices[i]` to `vertices[i + 1]`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Walk {
    pub vertices: Vec<VertexId>,
    pub edges: Vec<EdgeId>,
}

impl Walk {
    pub fn at(start: VertexId) -> Self {
        Self {
            vertices: vec![start],
            edges: Vec::new(),
        }
    }

    /// Follow `edges` from `start`. Edges are assumed to chain.
    pub fn from_edges(graph: &CoverageGraph, start: VertexId, edges: Vec<EdgeId>) -> Self {
        let mut vertices = Vec::with_capacity(edges.len() + 1);
        vertices.push(start);
        for &e in &edges {
            if let Some(edge) = graph.edge(e) {
                vertices.push(edge.to);
            }
        }
        Self { vertices, edges }
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn start(&self) -> Option<VertexId> {
        self.vertices.first().copied()
    }

    pub fn end(&self) -> Option<VertexId> {
        self.vertices.last().copied()
    }

    pub fn is_closed(&self) -> bool {
        self.start() == self.end()
    }

    /// Append `edges` leading away from the current end.
    pub fn extend(&mut self, graph: &CoverageGraph, edges: &[EdgeId]) {
        for &e in edges {
            if let Some(edge) = graph.edge(e) {
                self.edges.push(e);
                self.vertices.push(edge.to);
            }
        }
    }

    /// Rotate a closed walk so that it starts at the last occurrence of
    /// `vertex`. A walk already starting there is returned unchanged.
    pub fn rotate_to(&self, vertex: VertexId) -> Option<Walk> {
        if !self.is_closed() {
            return None;
        }
        let n = self.edges.len();
        if self.start() == Some(vertex) {
            return Some(self.clone());
        }
        let i = self.vertices[..n].iter().rposition(|v| *v == vertex)?;

        let mut edges = Vec::with_capacity(n);
        edges.extend_from_slice(&self.edges[i..]);
        edges.extend_from_slice(&self.edges[..i]);

        let mut vertices = Vec::with_capacity(n + 1);
        vertices.extend_from_slice(&self.vertices[i..n]);
        vertices.extend_from_slice(&self.vertices[..=i]);

        Some(Walk { vertices, edges })
    }

    /// Vertices in visiting order, without repeats.
    pub fn distinct_vertices(&self) -> Vec<VertexId> {
        let mut seen = std::collections::HashSet::new();
        self.vertices.iter().copied().filter(|v| seen.insert(*v)).collect()
    }
}
