use crate::centrality::CentralityScores;
use crate::config::Config;
use crate::graph::FollowGraph;

/// Power-iteration bounds
#[derive(Debug, Clone, Copy)]
pub struct EigenvectorConfig {
    pub max_iter: usize,
    /// Per-node tolerance; iteration stops once the L1 change is below `n * tolerance`
    pub tolerance: f64,
}

impl Default for EigenvectorConfig {
    fn default() -> Self {
        Self {
            max_iter: 1000,
            tolerance: 1.0e-6,
        }
    }
}

impl From<&Config> for EigenvectorConfig {
    fn from(config: &Config) -> Self {
        Self {
            max_iter: config.eigenvector_max_iter,
            tolerance: config.eigenvector_tolerance,
        }
    }
}

/// Eigenvector scores plus the convergence outcome.
///
/// When `converged` is false the scores are the last iterate.
#[derive(Debug, Clone)]
pub struct EigenvectorScores {
    pub scores: CentralityScores,
    pub converged: bool,
    pub iterations: usize,
}

/// Principal eigenvector of the follow relation, scored by incoming follows.
///
/// Iterates `x <- (A^T + I) x` from a uniform start with L2 normalization.
/// The identity shift keeps the iteration stable on bipartite structure.
pub fn eigenvector_centrality(graph: &FollowGraph, config: EigenvectorConfig) -> EigenvectorScores {
    let n = graph.node_count();
    if n == 0 {
        return EigenvectorScores {
            scores: CentralityScores::new(),
            converged: true,
            iterations: 0,
        };
    }

    let edges: Vec<(usize, usize)> = graph
        .follows()
        .map(|(u, v)| (u.index(), v.index()))
        .collect();

    let mut x = vec![1.0 / n as f64; n];
    let mut converged = false;
    let mut iterations = 0;

    while iterations < config.max_iter {
        iterations += 1;
        let last = x.clone();

        for &(u, v) in &edges {
            x[v] += last[u];
        }

        let norm = x.iter().map(|value| value * value).sum::<f64>().sqrt();
        let norm = if norm > 0.0 { norm } else { 1.0 };
        for value in x.iter_mut() {
            *value /= norm;
        }

        let change: f64 = x.iter().zip(&last).map(|(a, b)| (a - b).abs()).sum();
        if change < n as f64 * config.tolerance {
            converged = true;
            break;
        }
    }

    if converged {
        log::debug!("Eigenvector centrality converged after {} iterations", iterations);
    } else {
        log::warn!(
            "Eigenvector centrality did not converge within {} iterations, keeping last estimate",
            config.max_iter
        );
    }

    let scores = graph
        .nodes()
        .map(|(idx, account)| (account.handle.clone(), x[idx.index()]))
        .collect();

    EigenvectorScores {
        scores,
        converged,
        iterations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::FollowRecord;
    use crate::graph::{build_graph, BuildMode};
    use std::collections::BTreeMap;

    fn cycle_with_hub() -> FollowGraph {
        // s -> a, s -> b, a -> b, b -> a, a -> s
        let source = vec![FollowRecord::new("a"), FollowRecord::new("b")];
        let mut network = BTreeMap::new();
        network.insert("a".to_string(), vec![FollowRecord::new("b"), FollowRecord::new("s")]);
        network.insert("b".to_string(), vec![FollowRecord::new("a")]);
        build_graph("s", &source, &network, BuildMode::Restricted)
    }

    #[test]
    fn test_converges_to_unit_vector() {
        let graph = cycle_with_hub();
        let result = eigenvector_centrality(&graph, EigenvectorConfig::default());

        assert!(result.converged);
        let norm: f64 = result.scores.values().map(|v| v * v).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-9);
        // a and b receive two follows each, s one
        assert!(result.scores["a"] > result.scores["s"]);
        assert!((result.scores["a"] - result.scores["b"]).abs() < 1e-4);
    }

    #[test]
    fn test_iteration_bound_reports_non_convergence() {
        let graph = cycle_with_hub();
        let config = EigenvectorConfig {
            max_iter: 1,
            tolerance: 1e-12,
        };
        let result = eigenvector_centrality(&graph, config);

        assert!(!result.converged);
        assert_eq!(result.iterations, 1);
        assert_eq!(result.scores.len(), 3);
        assert!(result.scores.values().all(|v| v.is_finite() && *v > 0.0));
    }

    #[test]
    fn test_single_node_graph() {
        let graph = build_graph("s", &[], &BTreeMap::new(), BuildMode::Restricted);
        let result = eigenvector_centrality(&graph, EigenvectorConfig::default());

        assert!(result.converged);
        assert!((result.scores["s"] - 1.0).abs() < 1e-12);
    }
}
