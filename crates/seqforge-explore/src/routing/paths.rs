//! Unit-weight shortest paths.

use std::collections::VecDeque;

use seqforge_compiler::graph::{CoverageGraph, EdgeId, VertexId};

/// BFS tree from `from`: the edge each vertex was first reached by.
fn bfs_parents(graph: &CoverageGraph, from: VertexId) -> Vec<Option<EdgeId>> {
    let n = graph.vertex_count();
    let mut parent = vec![None; n];
    let mut visited = vec![false; n];
    let mut queue = VecDeque::new();
    visited[from as usize] = true;
    queue.push_back(from);

    while let Some(v) = queue.pop_front() {
        for &e in graph.outgoing(v) {
            let Some(edge) = graph.edge(e) else { continue };
            if !visited[edge.to as usize] {
                visited[edge.to as usize] = true;
                parent[edge.to as usize] = Some(e);
                queue.push_back(edge.to);
            }
        }
    }

    parent
}

/// Edges of a shortest path from `from` to `to`. `Some(vec![])` when the
/// two coincide, `None` when `to` is unreachable.
pub fn shortest_path(graph: &CoverageGraph, from: VertexId, to: VertexId) -> Option<Vec<EdgeId>> {
    if from == to {
        return Some(Vec::new());
    }
    let parent = bfs_parents(graph, from);
    let mut path = Vec::new();
    let mut current = to;
    while current != from {
        let e = parent[current as usize]?;
        path.push(e);
        current = graph.edge(e)?.from;
    }
    path.reverse();
    Some(path)
}

/// `matrix[u][v]` is the edge count of a shortest path from `u` to `v`.
pub fn distance_matrix(graph: &CoverageGraph) -> Vec<Vec<Option<usize>>> {
    let n = graph.vertex_count();
    let mut matrix = vec![vec![None; n]; n];

    for (from, row) in matrix.iter_mut().enumerate() {
        let mut queue = VecDeque::new();
        row[from] = Some(0);
        queue.push_back(from as VertexId);
        while let Some(v) = queue.pop_front() {
            let d = row[v as usize].unwrap_or(0);
            for &e in graph.outgoing(v) {
                let Some(edge) = graph.edge(e) else { continue };
                if row[edge.to as usize].is_none() {
                    row[edge.to as usize] = Some(d + 1);
                    queue.push_back(edge.to);
                }
            }
        }
    }

    matrix
}
