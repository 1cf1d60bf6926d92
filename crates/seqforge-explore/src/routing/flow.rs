//! Min-cost flow by successive shortest paths.
//!
//! Used to decide which extra paths make an unbalanced graph Eulerian:
//! every vertex with more incoming than outgoing edges must start as many
//! extra paths as it lacks, every vertex with the opposite surplus must end
//! as many. Bellman-Ford handles the negative residual costs.

use seqforge_compiler::graph::VertexId;

struct FlowEdge {
    to: usize,
    capacity: i64,
    cost: i64,
}

/// Residual network; edge `i ^ 1` is the reverse of edge `i`.
struct Network {
    edges: Vec<FlowEdge>,
    adjacency: Vec<Vec<usize>>,
}

impl Network {
    fn new(nodes: usize) -> Self {
        Self {
            edges: Vec::new(),
            adjacency: vec![Vec::new(); nodes],
        }
    }

    fn add_edge(&mut self, from: usize, to: usize, capacity: i64, cost: i64) -> usize {
        let id = self.edges.len();
        self.edges.push(FlowEdge { to, capacity, cost });
        self.adjacency[from].push(id);
        self.edges.push(FlowEdge {
            to: from,
            capacity: 0,
            cost: -cost,
        });
        self.adjacency[to].push(id + 1);
        id
    }

    /// Push as much flow as possible from `source` to `sink` at minimum cost.
    /// Returns `(flow, cost)`.
    fn min_cost_flow(&mut self, source: usize, sink: usize) -> (i64, i64) {
        let n = self.adjacency.len();
        let mut flow = 0;
        let mut cost = 0;

        loop {
            let mut dist = vec![i64::MAX; n];
            let mut via: Vec<Option<usize>> = vec![None; n];
            dist[source] = 0;

            // Bellman-Ford; the network has no negative cycles
            for _ in 0..n {
                let mut changed = false;
                for u in 0..n {
                    if dist[u] == i64::MAX {
                        continue;
                    }
                    for &e in &self.adjacency[u] {
                        let edge = &self.edges[e];
                        if edge.capacity > 0 && dist[u] + edge.cost < dist[edge.to] {
                            dist[edge.to] = dist[u] + edge.cost;
                            via[edge.to] = Some(e);
                            changed = true;
                        }
                    }
                }
                if !changed {
                    break;
                }
            }

            if dist[sink] == i64::MAX {
                break;
            }

            let mut push = i64::MAX;
            let mut v = sink;
            while let Some(e) = via[v] {
                push = push.min(self.edges[e].capacity);
                v = self.edges[e ^ 1].to;
            }

            let mut v = sink;
            while let Some(e) = via[v] {
                self.edges[e].capacity -= push;
                self.edges[e ^ 1].capacity += push;
                v = self.edges[e ^ 1].to;
            }

            flow += push;
            cost += push * dist[sink];
        }

        (flow, cost)
    }
}

/// Pair `sources` (vertex, paths to start) with `sinks` (vertex, paths to
/// end) minimizing the total distance. Returns one `(from, to)` entry per
/// extra path, or `None` when some demand cannot be met.
pub fn min_cost_assignment(
    sources: &[(VertexId, usize)],
    sinks: &[(VertexId, usize)],
    distance: &[Vec<Option<usize>>],
) -> Option<Vec<(VertexId, VertexId)>> {
    let supply: usize = sources.iter().map(|(_, n)| n).sum();
    let demand: usize = sinks.iter().map(|(_, n)| n).sum();
    if supply != demand {
        return None;
    }
    if supply == 0 {
        return Some(Vec::new());
    }

    let source = 0;
    let sink = sources.len() + sinks.len() + 1;
    let mut network = Network::new(sink + 1);

    for (i, (_, n)) in sources.iter().enumerate() {
        network.add_edge(source, 1 + i, *n as i64, 0);
    }
    for (j, (_, n)) in sinks.iter().enumerate() {
        network.add_edge(1 + sources.len() + j, sink, *n as i64, 0);
    }

    let mut links = Vec::new();
    for (i, (u, _)) in sources.iter().enumerate() {
        for (j, (v, _)) in sinks.iter().enumerate() {
            if let Some(d) = distance[*u as usize][*v as usize] {
                let id = network.add_edge(1 + i, 1 + sources.len() + j, supply as i64, d as i64);
                links.push((id, *u, *v));
            }
        }
    }

    let (flow, cost) = network.min_cost_flow(source, sink);
    if flow != supply as i64 {
        return None;
    }
    tracing::debug!(paths = flow, length = cost, "balanced graph");

    let mut pairs = Vec::new();
    for (id, u, v) in links {
        let used = network.edges[id ^ 1].capacity;
        for _ in 0..used {
            pairs.push((u, v));
        }
    }
    Some(pairs)
}
