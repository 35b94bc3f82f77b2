use crate::centrality::CentralityScores;
use crate::graph::FollowGraph;

/// (in-degree + out-degree) / (n - 1) for every node.
///
/// A single-node graph uses 1 as the normalizer.
pub fn degree_centrality(graph: &FollowGraph) -> CentralityScores {
    let n = graph.node_count();
    let scale = if n > 1 { 1.0 / (n - 1) as f64 } else { 1.0 };

    graph
        .nodes()
        .map(|(idx, account)| (account.handle.clone(), graph.degree(idx) as f64 * scale))
        .collect()
}
