//! State coverage tours.
//!
//! The exact solver is Held-Karp over the shortest-path closure of the
//! graph: it orders the vertices to minimize the total walk length, then
//! expands every hop into its shortest path. Large graphs and graphs where
//! some vertex cannot reach another fall back to a stitched walk built from
//! shortest paths.

use serde::Serialize;

use seqforge_compiler::graph::{CoverageGraph, VertexId};
use seqforge_ir::config::MAX_EXACT_TOUR_LIMIT;

use super::paths::{distance_matrix, shortest_path};
use super::{RouteError, Walk};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TourMethod {
    Exact,
    Stitched,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TourOutcome {
    pub walk: Walk,
    pub method: TourMethod,
    /// Vertices the walk never reaches.
    pub unvisited: Vec<VertexId>,
}

const UNREACHED: u32 = u32::MAX;

/// Minimum-length closed walk from `start` visiting every vertex, or `None`
/// when the graph has more than `limit` vertices or is not strongly
/// connected. `limit` is capped at [`MAX_EXACT_TOUR_LIMIT`].
pub fn held_karp(graph: &CoverageGraph, start: VertexId, limit: usize) -> Option<Walk> {
    let n = graph.vertex_count();
    if n == 0 || n > limit.min(MAX_EXACT_TOUR_LIMIT) {
        return None;
    }
    if n == 1 {
        return Some(Walk::at(start));
    }

    let distance = distance_matrix(graph);
    let mut d = vec![vec![0u32; n]; n];
    for u in 0..n {
        for v in 0..n {
            d[u][v] = distance[u][v]? as u32;
        }
    }

    // the other vertices, as bit positions
    let others: Vec<usize> = (0..n).filter(|v| *v != start as usize).collect();
    let k = others.len();
    let full = (1usize << k) - 1;
    let mut cost = vec![UNREACHED; (1 << k) * k];
    let mut parent = vec![u8::MAX; (1 << k) * k];

    for (j, &v) in others.iter().enumerate() {
        cost[(1 << j) * k + j] = d[start as usize][v];
    }

    for mask in 1..=full {
        for j in 0..k {
            let here = cost[mask * k + j];
            if mask & (1 << j) == 0 || here == UNREACHED {
                continue;
            }
            for next in 0..k {
                if mask & (1 << next) != 0 {
                    continue;
                }
                let extended = mask | (1 << next);
                let candidate = here + d[others[j]][others[next]];
                if candidate < cost[extended * k + next] {
                    cost[extended * k + next] = candidate;
                    parent[extended * k + next] = j as u8;
                }
            }
        }
    }

    let (mut last, _) = (0..k)
        .map(|j| (j, cost[full * k + j].saturating_add(d[others[j]][start as usize])))
        .min_by_key(|(_, c)| *c)?;

    let mut order = Vec::with_capacity(k);
    let mut mask = full;
    loop {
        order.push(others[last]);
        let prev = parent[mask * k + last];
        mask &= !(1 << last);
        if prev == u8::MAX {
            break;
        }
        last = prev as usize;
    }
    order.reverse();

    let mut walk = Walk::at(start);
    let mut current = start;
    for v in order.into_iter().map(|v| v as VertexId).chain(std::iter::once(start)) {
        walk.extend(graph, &shortest_path(graph, current, v)?);
        current = v;
    }
    Some(walk)
}

/// Greedy fallback: from the current end of the walk, append the shortest
/// path to each vertex not yet visited, in vertex order, skipping vertices
/// the end cannot reach. Returns to `start` when possible.
pub fn stitched_tour(graph: &CoverageGraph, start: VertexId) -> Walk {
    let mut walk = Walk::at(start);
    let mut visited = vec![false; graph.vertex_count()];
    visited[start as usize] = true;
    let mut current = start;

    for v in graph.vertices() {
        if visited[v as usize] {
            continue;
        }
        if let Some(path) = shortest_path(graph, current, v) {
            walk.extend(graph, &path);
            for &u in &walk.vertices {
                visited[u as usize] = true;
            }
            current = v;
        }
    }

    if let Some(path) = shortest_path(graph, current, start) {
        walk.extend(graph, &path);
    }
    walk
}

/// Tour for state coverage starting at the vertex named `start`.
pub fn state_coverage(
    graph: &CoverageGraph,
    start: &str,
    limit: usize,
) -> Result<TourOutcome, RouteError> {
    if graph.vertex_count() == 0 {
        return Err(RouteError::EmptyGraph);
    }
    let start_vertex = graph
        .vertex(start)
        .ok_or_else(|| RouteError::UnknownStartState(start.to_string()))?;

    let (walk, method) = match held_karp(graph, start_vertex, limit) {
        Some(walk) => (walk, TourMethod::Exact),
        None => {
            tracing::debug!(
                vertices = graph.vertex_count(),
                limit,
                "exact tour unavailable, stitching shortest paths"
            );
            (stitched_tour(graph, start_vertex), TourMethod::Stitched)
        }
    };

    let mut seen = vec![false; graph.vertex_count()];
    for v in &walk.vertices {
        seen[*v as usize] = true;
    }
    let unvisited: Vec<VertexId> = graph.vertices().filter(|v| !seen[*v as usize]).collect();
    if !unvisited.is_empty() {
        tracing::warn!(unvisited = unvisited.len(), "tour misses unreachable states");
    }

    Ok(TourOutcome {
        walk,
        method,
        unvisited,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use seqforge_ir::types::Transition;

    fn ring() -> CoverageGraph {
        // a ring S0 -> S1 -> S2 -> S3 -> S0 with a shortcut S0 -> S2
        CoverageGraph::from_transitions(&[
            Transition::new("S0", "S1", "a", "no_response"),
            Transition::new("S1", "S2", "b", "no_response"),
            Transition::new("S2", "S3", "c", "no_response"),
            Transition::new("S3", "S0", "d", "no_response"),
            Transition::new("S0", "S2", "e", "no_response"),
        ])
    }

    #[test]
    fn test_exact_tour_visits_everything() {
        let graph = ring();
        let walk = held_karp(&graph, 0, 12).unwrap();
        assert!(walk.is_closed());
        assert_eq!(walk.len(), 4);
        assert_eq!(walk.distinct_vertices().len(), 4);
    }

    #[test]
    fn test_limit_forces_fallback() {
        let graph = ring();
        assert!(held_karp(&graph, 0, 3).is_none());
        let outcome = state_coverage(&graph, "S0", 3).unwrap();
        assert_eq!(outcome.method, TourMethod::Stitched);
        assert!(outcome.unvisited.is_empty());
        assert!(outcome.walk.is_closed());
    }

    #[test]
    fn test_limit_is_capped() {
        let names: Vec<String> = (0..MAX_EXACT_TOUR_LIMIT + 5).map(|i| format!("S{i}")).collect();
        let transitions: Vec<Transition> = names
            .iter()
            .zip(names.iter().cycle().skip(1))
            .map(|(from, to)| Transition::new(from, to, "step", "no_response"))
            .collect();
        let graph = CoverageGraph::from_transitions(&transitions);
        assert!(held_karp(&graph, 0, usize::MAX).is_none());

        let outcome = state_coverage(&graph, "S0", usize::MAX).unwrap();
        assert_eq!(outcome.method, TourMethod::Stitched);
        assert!(outcome.unvisited.is_empty());
        assert_eq!(outcome.walk.len(), names.len());
    }

    #[test]
    fn test_not_strongly_connected_falls_back() {
        let graph = CoverageGraph::from_transitions(&[
            Transition::new("S0", "S1", "a", "no_response"),
            Transition::new("S1", "S2", "b", "no_response"),
        ]);
        let outcome = state_coverage(&graph, "S0", 12).unwrap();
        assert_eq!(outcome.method, TourMethod::Stitched);
        assert_eq!(outcome.walk.edges, vec![0, 1]);
        assert!(!outcome.walk.is_closed());
    }

    #[test]
    fn test_single_vertex() {
        let mut graph = CoverageGraph::default();
        graph.add_vertex("Only");
        let outcome = state_coverage(&graph, "Only", 12).unwrap();
        assert_eq!(outcome.method, TourMethod::Exact);
        assert!(outcome.walk.is_empty());
    }
}
