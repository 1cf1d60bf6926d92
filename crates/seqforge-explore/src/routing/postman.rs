//! Route inspection (Chinese Postman) for transition coverage.

use seqforge_compiler::graph::{CoverageGraph, EdgeId, VertexId};

use super::connectivity::is_strongly_connected;
use super::flow::min_cost_assignment;
use super::paths::{distance_matrix, shortest_path};
use super::{RouteError, Walk};

/// A closed walk using every edge at least once, with the fewest repeated
/// edges. The graph must be strongly connected and have at least one edge.
pub fn route_inspection(graph: &CoverageGraph) -> Result<Walk, RouteError> {
    if graph.edge_count() == 0 {
        return Err(RouteError::EmptyGraph);
    }
    if !is_strongly_connected(graph) {
        return Err(RouteError::NotStronglyConnected);
    }

    let mut sources = Vec::new();
    let mut sinks = Vec::new();
    for v in graph.vertices() {
        let imbalance = graph.imbalance(v);
        if imbalance < 0 {
            sources.push((v, imbalance.unsigned_abs() as usize));
        } else if imbalance > 0 {
            sinks.push((v, imbalance as usize));
        }
    }

    // every edge once, plus the duplicated shortest paths
    let mut multiset: Vec<EdgeId> = (0..graph.edge_count()).collect();
    if !sources.is_empty() {
        let distance = distance_matrix(graph);
        let pairs = min_cost_assignment(&sources, &sinks, &distance)
            .ok_or(RouteError::NotStronglyConnected)?;
        for (from, to) in pairs {
            let path = shortest_path(graph, from, to).ok_or(RouteError::NotStronglyConnected)?;
            multiset.extend(path);
        }
        tracing::debug!(
            duplicated = multiset.len() - graph.edge_count(),
            "augmented graph to Eulerian"
        );
    }

    let start = graph.edge(0).map(|e| e.from).ok_or(RouteError::EmptyGraph)?;
    Ok(eulerian_circuit(graph, &multiset, start))
}

/// Hierholzer's algorithm over a balanced, connected edge multiset.
fn eulerian_circuit(graph: &CoverageGraph, multiset: &[EdgeId], start: VertexId) -> Walk {
    let mut adjacency: Vec<Vec<EdgeId>> = vec![Vec::new(); graph.vertex_count()];
    for &e in multiset {
        if let Some(edge) = graph.edge(e) {
            adjacency[edge.from as usize].push(e);
        }
    }

    let mut next = vec![0usize; graph.vertex_count()];
    let mut stack: Vec<(VertexId, Option<EdgeId>)> = vec![(start, None)];
    let mut circuit = Vec::with_capacity(multiset.len());

    while let Some(&(v, via)) = stack.last() {
        let out = &adjacency[v as usize];
        if next[v as usize] < out.len() {
            let e = out[next[v as usize]];
            next[v as usize] += 1;
            if let Some(edge) = graph.edge(e) {
                stack.push((edge.to, Some(e)));
            }
        } else {
            stack.pop();
            if let Some(e) = via {
                circuit.push(e);
            }
        }
    }

    circuit.reverse();
    Walk::from_edges(graph, start, circuit)
}

/// The route inspection walk rotated to `start`, as one segment or, with
/// `split`, one segment per return to `start`.
pub fn transition_coverage(
    graph: &CoverageGraph,
    start: &str,
    split: bool,
) -> Result<Vec<Vec<EdgeId>>, RouteError> {
    let start_vertex = graph
        .vertex(start)
        .ok_or_else(|| RouteError::UnknownStartState(start.to_string()))?;
    let walk = route_inspection(graph)?;
    let rotated = walk
        .rotate_to(start_vertex)
        .ok_or(RouteError::NotStronglyConnected)?;

    tracing::debug!(
        start,
        length = rotated.len(),
        edges = graph.edge_count(),
        "route inspection walk"
    );

    if !split {
        return Ok(vec![rotated.edges]);
    }

    let mut segments = Vec::new();
    let mut current = Vec::new();
    for (i, &e) in rotated.edges.iter().enumerate() {
        current.push(e);
        if rotated.vertices[i + 1] == start_vertex {
            segments.push(std::mem::take(&mut current));
        }
    }
    Ok(segments)
}
