//! Account recommendations by link prediction around the source account

pub mod similarity;

use petgraph::graph::NodeIndex;
use rayon::prelude::*;
use serde::Serialize;

pub use similarity::{
    adamic_adar_index, common_neighbors, jaccard_coefficient, rank, ScoredCandidate,
    SimilarityMetric,
};

use crate::config::Config;
use crate::error::{AnalyzerError, Result};
use crate::graph::{FollowGraph, UndirectedView};

/// Filtering and ranking limits
#[derive(Debug, Clone, Copy)]
pub struct RecommendConfig {
    /// Accounts with total directed degree at or below this are dropped
    pub filter_max_degree: usize,
    /// Candidates kept per metric
    pub top_n: usize,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            filter_max_degree: 1,
            top_n: 10,
        }
    }
}

impl From<&Config> for RecommendConfig {
    fn from(config: &Config) -> Self {
        Self {
            filter_max_degree: config.filter_max_degree,
            top_n: config.top_n,
        }
    }
}

/// Ranked recommendations for one source account
#[derive(Debug, Clone, Serialize)]
pub struct Recommendations {
    pub source: String,
    /// Nodes left after degree filtering, source included
    pub retained_nodes: usize,
    /// Non-adjacent accounts that were scored
    pub candidate_count: usize,
    pub jaccard: Vec<ScoredCandidate>,
    pub adamic_adar: Vec<ScoredCandidate>,
}

impl Recommendations {
    /// The authoritative ranking (Adamic-Adar)
    pub fn primary(&self) -> &[ScoredCandidate] {
        &self.adamic_adar
    }
}

/// Undirected projection without low-degree accounts.
///
/// The degree is the total directed degree in the follow graph, not the
/// undirected degree. The source is always kept.
pub fn filter_by_degree(
    graph: &FollowGraph,
    source: NodeIndex,
    max_degree: usize,
) -> UndirectedView {
    UndirectedView::project(graph, |idx| idx == source || graph.degree(idx) > max_degree)
}

/// Positions that are neither the source nor adjacent to it
pub fn candidates(view: &UndirectedView, source: usize) -> Vec<usize> {
    let neighbors = view.neighbors(source);
    (0..view.len())
        .filter(|&pos| pos != source && !neighbors.contains(&pos))
        .collect()
}

/// Score every candidate against the source with one metric
pub fn score_candidates(
    graph: &FollowGraph,
    view: &UndirectedView,
    source: usize,
    candidates: &[usize],
    metric: SimilarityMetric,
) -> Vec<ScoredCandidate> {
    let scored: Vec<ScoredCandidate> = candidates
        .par_iter()
        .map(|&pos| ScoredCandidate {
            handle: graph.handle(view.node_index(pos)).to_string(),
            score: metric.score(view, source, pos),
        })
        .collect();

    log::debug!("Scored {} candidates by {}", scored.len(), metric.name());
    scored
}

/// Recommend accounts the source is not yet connected to.
///
/// Both the Jaccard and the Adamic-Adar rankings are returned; the latter
/// is the one to surface.
pub fn recommend(
    graph: &FollowGraph,
    source_handle: &str,
    config: RecommendConfig,
) -> Result<Recommendations> {
    let source = graph
        .node_index(source_handle)
        .ok_or_else(|| AnalyzerError::UnknownSourceNode(source_handle.to_string()))?;

    let view = filter_by_degree(graph, source, config.filter_max_degree);
    log::info!(
        "Filtered nodes for similarity: {} of {} kept",
        view.len(),
        graph.node_count()
    );

    let source_pos = view
        .position(source)
        .ok_or_else(|| AnalyzerError::UnknownSourceNode(source_handle.to_string()))?;
    let candidate_positions = candidates(&view, source_pos);
    log::info!("Scoring {} candidate accounts", candidate_positions.len());

    let score = |metric| score_candidates(graph, &view, source_pos, &candidate_positions, metric);
    let jaccard = rank(score(SimilarityMetric::Jaccard), config.top_n);
    let adamic_adar = rank(score(SimilarityMetric::AdamicAdar), config.top_n);

    Ok(Recommendations {
        source: source_handle.to_string(),
        retained_nodes: view.len(),
        candidate_count: candidate_positions.len(),
        jaccard,
        adamic_adar,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::FollowRecord;
    use crate::graph::{build_graph, BuildMode};
    use std::collections::BTreeMap;

    fn graph_from(source: &[&str], edges: &[(&str, &[&str])]) -> FollowGraph {
        let source: Vec<FollowRecord> = source.iter().map(|h| FollowRecord::new(*h)).collect();
        let network: BTreeMap<String, Vec<FollowRecord>> = edges
            .iter()
            .map(|(a, fs)| (a.to_string(), fs.iter().map(|h| FollowRecord::new(*h)).collect()))
            .collect();
        build_graph("s", &source, &network, BuildMode::Extended)
    }

    #[test]
    fn test_filter_keeps_low_degree_source() {
        // s has degree 1; x has degree 1; c has degree 3
        let graph = graph_from(&["a"], &[("a", &["c"]), ("b", &["c", "x"]), ("c", &["b"])]);
        let view = filter_by_degree(&graph, graph.source(), 1);

        let kept: Vec<&str> = (0..view.len()).map(|p| graph.handle(view.node_index(p))).collect();
        assert_eq!(kept, vec!["s", "a", "c", "b"]);
    }

    #[test]
    fn test_filter_drops_degree_zero_and_one() {
        let graph = graph_from(&[], &[("lone", &["leaf"]), ("p", &["q"]), ("q", &["p", "r"])]);
        let view = filter_by_degree(&graph, graph.source(), 1);

        let kept: Vec<&str> = (0..view.len()).map(|p| graph.handle(view.node_index(p))).collect();
        // s has degree 0 but is the source; lone, leaf and r have degree 1
        assert_eq!(kept, vec!["s", "p", "q"]);
    }

    #[test]
    fn test_candidates_exclude_source_and_neighbors() {
        let graph = graph_from(
            &["a", "b"],
            &[("a", &["c", "d"]), ("b", &["c", "d"]), ("d", &["s"]), ("c", &["e"]), ("e", &["b"])],
        );
        let recs = recommend(&graph, "s", RecommendConfig::default()).unwrap();

        let view = filter_by_degree(&graph, graph.source(), 1);
        let source_pos = view.position(graph.source()).unwrap();
        let neighbor_handles: Vec<&str> = view
            .neighbors(source_pos)
            .iter()
            .map(|&p| graph.handle(view.node_index(p)))
            .collect();

        for candidate in recs.jaccard.iter().chain(&recs.adamic_adar) {
            assert_ne!(candidate.handle, "s");
            assert!(!neighbor_handles.contains(&candidate.handle.as_str()));
        }
        // d follows s, so it is adjacent even though s does not follow it
        assert!(recs.adamic_adar.iter().all(|c| c.handle != "d"));
        assert_eq!(recs.candidate_count, 2);
    }

    #[test]
    fn test_recommendation_scores() {
        // s follows a, b; both follow c and d; c follows e
        let graph = graph_from(
            &["a", "b"],
            &[("a", &["c", "d"]), ("b", &["c", "d"]), ("c", &["e"]), ("e", &["c"])],
        );
        let recs = recommend(&graph, "s", RecommendConfig::default()).unwrap();

        let handles: Vec<&str> = recs.primary().iter().map(|c| c.handle.as_str()).collect();
        // c and d share a and b with s; ties break by handle; e shares nothing
        assert_eq!(handles, vec!["c", "d", "e"]);
        assert!((recs.adamic_adar[0].score - 2.0 / 3f64.ln()).abs() < 1e-12);
        assert_eq!(recs.adamic_adar[2].score, 0.0);

        // N(s) = {a, b}, N(c) = {a, b, e}, N(d) = {a, b}
        assert_eq!(recs.jaccard[0].handle, "d");
        assert!((recs.jaccard[0].score - 1.0).abs() < 1e-12);
        assert!((recs.jaccard[1].score - 2.0 / 3.0).abs() < 1e-12);
        for c in &recs.jaccard {
            assert!((0.0..=1.0).contains(&c.score));
        }
    }

    #[test]
    fn test_top_n_limit() {
        let graph = graph_from(
            &["a", "b"],
            &[("a", &["c", "d"]), ("b", &["c", "d"]), ("c", &["e"]), ("e", &["c"])],
        );
        let config = RecommendConfig {
            top_n: 1,
            ..RecommendConfig::default()
        };
        let recs = recommend(&graph, "s", config).unwrap();
        assert_eq!(recs.jaccard.len(), 1);
        assert_eq!(recs.adamic_adar.len(), 1);
        assert_eq!(recs.candidate_count, 3);
    }

    #[test]
    fn test_unknown_source() {
        let graph = graph_from(&["a"], &[]);
        let err = recommend(&graph, "nobody", RecommendConfig::default()).unwrap_err();
        assert!(matches!(err, AnalyzerError::UnknownSourceNode(h) if h == "nobody"));
    }
}
