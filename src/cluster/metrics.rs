//! Community statistics and modularity

use std::collections::HashSet;

use itertools::Itertools;

use crate::cluster::{CommunitySummary, Partition};
use crate::graph::{FollowGraph, UndirectedView};

/// Modularity of a labelling of a weighted undirected graph.
///
/// `Q = sum_c [ L_c / m - gamma * (D_c / 2m)^2 ]` with `L_c` the internal
/// weight (self-loops included) and `D_c` the total degree of community `c`.
pub(crate) fn weighted_modularity(
    n: usize,
    edges: &[(usize, usize, f64)],
    self_loops: &[f64],
    communities: &[usize],
    resolution: f64,
) -> f64 {
    let m: f64 = edges.iter().map(|(_, _, w)| w).sum::<f64>() + self_loops.iter().sum::<f64>();
    if m == 0.0 {
        return 0.0;
    }

    let k = communities.iter().copied().max().map_or(0, |c| c + 1);
    let mut internal = vec![0.0; k];
    let mut degree = vec![0.0; k];

    for &(i, j, w) in edges {
        degree[communities[i]] += w;
        degree[communities[j]] += w;
        if communities[i] == communities[j] {
            internal[communities[i]] += w;
        }
    }
    for (i, &sl) in self_loops.iter().enumerate().take(n) {
        internal[communities[i]] += sl;
        degree[communities[i]] += 2.0 * sl;
    }

    internal
        .iter()
        .zip(&degree)
        .map(|(l, d)| l / m - resolution * (d / (2.0 * m)).powi(2))
        .sum()
}

/// Modularity of a partition on the undirected projection of `graph`.
///
/// Nodes without an assignment are treated as singletons.
pub fn modularity(graph: &FollowGraph, partition: &Partition, resolution: f64) -> f64 {
    let view = UndirectedView::from_graph(graph);
    let mut next_singleton = partition.len();

    let labels: Vec<usize> = (0..view.len())
        .map(|pos| {
            let handle = graph.handle(view.node_index(pos));
            partition.community_of(handle).unwrap_or_else(|| {
                next_singleton += 1;
                next_singleton - 1
            })
        })
        .collect();

    let mut edges = Vec::new();
    let mut self_loops = vec![0.0; view.len()];
    for (u, v) in view.edges() {
        if u == v {
            self_loops[u] += 1.0;
        } else {
            edges.push((u, v, 1.0));
        }
    }

    weighted_modularity(view.len(), &edges, &self_loops, &labels, resolution)
}

/// Calculate density (actual edges / potential edges) on the directed graph
pub fn calculate_density(graph: &FollowGraph, members: &[String]) -> (usize, f64) {
    let member_set: HashSet<&str> = members.iter().map(String::as_str).collect();

    let internal_edges = graph
        .follows()
        .filter(|&(u, v)| {
            member_set.contains(graph.handle(u)) && member_set.contains(graph.handle(v))
        })
        .count();

    let n = members.len();
    if n <= 1 {
        // By convention, singleton communities have density 1
        return (internal_edges, 1.0);
    }

    (internal_edges, internal_edges as f64 / (n * (n - 1)) as f64)
}

/// Per-community statistics, largest community first
pub fn summarize(graph: &FollowGraph, partition: &Partition) -> Vec<CommunitySummary> {
    partition
        .communities()
        .iter()
        .enumerate()
        .map(|(id, members)| {
            let (internal_edges, density) = calculate_density(graph, members);
            CommunitySummary {
                id,
                size: members.len(),
                internal_edges,
                density,
                members: members.clone(),
            }
        })
        .sorted_by(|a, b| b.size.cmp(&a.size).then(a.id.cmp(&b.id)))
        .collect()
}
