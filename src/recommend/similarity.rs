//! Local structural similarity between two accounts of an undirected view

use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::graph::UndirectedView;

/// Link-prediction score used to rank candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityMetric {
    Jaccard,
    AdamicAdar,
}

/// A candidate account and its score for a fixed source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub handle: String,
    pub score: f64,
}

/// Neighbors shared by `a` and `b`, excluding the pair itself
pub fn common_neighbors(view: &UndirectedView, a: usize, b: usize) -> BTreeSet<usize> {
    view.neighbors(a)
        .intersection(view.neighbors(b))
        .copied()
        .filter(|&z| z != a && z != b)
        .collect()
}

/// |N(a) ∩ N(b)| / |N(a) ∪ N(b)|, 0 when both neighborhoods are empty
pub fn jaccard_coefficient(view: &UndirectedView, a: usize, b: usize) -> f64 {
    let union = view.neighbors(a).union(view.neighbors(b)).count();
    if union == 0 {
        return 0.0;
    }
    common_neighbors(view, a, b).len() as f64 / union as f64
}

/// Sum of 1 / ln(degree(z)) over common neighbors z.
///
/// Neighbors of degree 1 or less would divide by ln(1) = 0 and add nothing.
pub fn adamic_adar_index(view: &UndirectedView, a: usize, b: usize) -> f64 {
    common_neighbors(view, a, b)
        .into_iter()
        .map(|z| view.degree(z))
        .filter(|&degree| degree > 1)
        .map(|degree| 1.0 / (degree as f64).ln())
        .sum()
}

impl SimilarityMetric {
    pub fn score(&self, view: &UndirectedView, a: usize, b: usize) -> f64 {
        match self {
            SimilarityMetric::Jaccard => jaccard_coefficient(view, a, b),
            SimilarityMetric::AdamicAdar => adamic_adar_index(view, a, b),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SimilarityMetric::Jaccard => "jaccard",
            SimilarityMetric::AdamicAdar => "adamic_adar",
        }
    }
}

/// Highest score first, ties by handle ascending
pub fn rank(mut scored: Vec<ScoredCandidate>, top_n: usize) -> Vec<ScoredCandidate> {
    scored.sort_by(|a, b| match b.score.total_cmp(&a.score) {
        Ordering::Equal => a.handle.cmp(&b.handle),
        other => other,
    });
    scored.truncate(top_n);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::FollowRecord;
    use crate::graph::{build_graph, BuildMode, FollowGraph};
    use std::collections::BTreeMap;

    /// s -> a, s -> b; a -> c; b -> c; c -> d; e isolated from s
    fn sample() -> (FollowGraph, UndirectedView) {
        let source = vec![FollowRecord::new("a"), FollowRecord::new("b")];
        let mut network = BTreeMap::new();
        network.insert("a".to_string(), vec![FollowRecord::new("c")]);
        network.insert("b".to_string(), vec![FollowRecord::new("c")]);
        network.insert("c".to_string(), vec![FollowRecord::new("d")]);
        network.insert("e".to_string(), vec![FollowRecord::new("d")]);
        let graph = build_graph("s", &source, &network, BuildMode::Extended);
        let view = UndirectedView::from_graph(&graph);
        (graph, view)
    }

    fn pos(graph: &FollowGraph, view: &UndirectedView, handle: &str) -> usize {
        view.position(graph.node_index(handle).unwrap()).unwrap()
    }

    #[test]
    fn test_jaccard() {
        let (graph, view) = sample();
        let s = pos(&graph, &view, "s");
        let c = pos(&graph, &view, "c");
        let e = pos(&graph, &view, "e");

        // N(s) = {a, b}, N(c) = {a, b, d}
        assert!((jaccard_coefficient(&view, s, c) - 2.0 / 3.0).abs() < 1e-12);
        // N(e) = {d}: disjoint from N(s)
        assert_eq!(jaccard_coefficient(&view, s, e), 0.0);
    }

    #[test]
    fn test_adamic_adar() {
        let (graph, view) = sample();
        let s = pos(&graph, &view, "s");
        let c = pos(&graph, &view, "c");
        let e = pos(&graph, &view, "e");

        // a and b both have degree 2
        let expected = 2.0 / 2f64.ln();
        assert!((adamic_adar_index(&view, s, c) - expected).abs() < 1e-12);
        assert_eq!(adamic_adar_index(&view, s, e), 0.0);
    }

    #[test]
    fn test_rank_orders_by_score_then_handle() {
        let scored = vec![
            ScoredCandidate { handle: "zed".into(), score: 0.5 },
            ScoredCandidate { handle: "amy".into(), score: 0.5 },
            ScoredCandidate { handle: "bob".into(), score: 0.9 },
            ScoredCandidate { handle: "cat".into(), score: 0.1 },
        ];
        let ranked = rank(scored, 3);
        let handles: Vec<&str> = ranked.iter().map(|c| c.handle.as_str()).collect();
        assert_eq!(handles, vec!["bob", "amy", "zed"]);
    }
}
