use std::collections::VecDeque;

use seqforge_compiler::graph::{CoverageGraph, VertexId};

/// Vertices reachable from `from`, following edges forwards or backwards.
pub fn reachable(graph: &CoverageGraph, from: VertexId, backwards: bool) -> Vec<bool> {
    let mut visited = vec![false; graph.vertex_count()];
    let mut queue = VecDeque::new();
    visited[from as usize] = true;
    queue.push_back(from);

    while let Some(v) = queue.pop_front() {
        let edges = if backwards {
            graph.incoming(v)
        } else {
            graph.outgoing(v)
        };
        for &e in edges {
            let Some(edge) = graph.edge(e) else { continue };
            let next = if backwards { edge.from } else { edge.to };
            if !visited[next as usize] {
                visited[next as usize] = true;
                queue.push_back(next);
            }
        }
    }

    visited
}

/// Every vertex reaches every other one. Vacuously true for graphs with at
/// most one vertex.
pub fn is_strongly_connected(graph: &CoverageGraph) -> bool {
    if graph.vertex_count() <= 1 {
        return true;
    }
    reachable(graph, 0, false).iter().all(|v| *v) && reachable(graph, 0, true).iter().all(|v| *v)
}
