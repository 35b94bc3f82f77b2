//! Structural importance measures over the follow graph
//!
//! | Measure | Question answered |
//! |---------|-------------------|
//! | Degree | How many follow relations touch the account? |
//! | Betweenness | How often does it sit on shortest follow paths? |
//! | Eigenvector | Is it followed by accounts that are themselves followed? |
//!
//! Each measure is a pure function of the graph and returns its own table;
//! values are not comparable across measures.

mod betweenness;
mod degree;
mod eigenvector;

use std::collections::HashMap;

use itertools::Itertools;
use serde::Serialize;

pub use betweenness::betweenness_centrality;
pub use degree::degree_centrality;
pub use eigenvector::{eigenvector_centrality, EigenvectorConfig, EigenvectorScores};

use crate::error::{AnalyzerError, Result};
use crate::graph::FollowGraph;

/// Score per account handle
pub type CentralityScores = HashMap<String, f64>;

/// All three measures for one account
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NodeCentrality {
    pub degree: f64,
    pub betweenness: f64,
    pub eigenvector: f64,
}

/// One of the three centrality tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CentralityMeasure {
    Degree,
    Betweenness,
    Eigenvector,
}

impl CentralityMeasure {
    pub fn name(&self) -> &'static str {
        match self {
            CentralityMeasure::Degree => "degree",
            CentralityMeasure::Betweenness => "betweenness",
            CentralityMeasure::Eigenvector => "eigenvector",
        }
    }
}

/// An account and its score under one measure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedAccount {
    pub handle: String,
    pub score: f64,
}

/// Centrality tables for a graph snapshot
#[derive(Debug, Clone)]
pub struct CentralityReport {
    pub degree: CentralityScores,
    pub betweenness: CentralityScores,
    pub eigenvector: EigenvectorScores,
}

impl CentralityReport {
    /// Compute every measure; betweenness runs alongside the other two
    pub fn compute(graph: &FollowGraph, config: EigenvectorConfig) -> Self {
        log::info!("Computing centrality for {} nodes", graph.node_count());

        let (betweenness, (degree, eigenvector)) = rayon::join(
            || betweenness_centrality(graph),
            || {
                (
                    degree_centrality(graph),
                    eigenvector_centrality(graph, config),
                )
            },
        );

        Self {
            degree,
            betweenness,
            eigenvector,
        }
    }

    /// Scores of a single account
    pub fn for_handle(&self, handle: &str) -> Result<NodeCentrality> {
        let degree = self
            .degree
            .get(handle)
            .copied()
            .ok_or_else(|| AnalyzerError::UnknownSourceNode(handle.to_string()))?;

        Ok(NodeCentrality {
            degree,
            betweenness: self.betweenness.get(handle).copied().unwrap_or(0.0),
            eigenvector: self.eigenvector.scores.get(handle).copied().unwrap_or(0.0),
        })
    }

    /// Table for one measure
    pub fn scores(&self, measure: CentralityMeasure) -> &CentralityScores {
        match measure {
            CentralityMeasure::Degree => &self.degree,
            CentralityMeasure::Betweenness => &self.betweenness,
            CentralityMeasure::Eigenvector => &self.eigenvector.scores,
        }
    }

    /// The `k` highest scoring accounts, ties broken by handle
    pub fn top(&self, measure: CentralityMeasure, k: usize) -> Vec<RankedAccount> {
        self.scores(measure)
            .iter()
            .sorted_by(|(ha, a), (hb, b)| b.total_cmp(a).then_with(|| ha.cmp(hb)))
            .take(k)
            .map(|(handle, &score)| RankedAccount {
                handle: handle.clone(),
                score,
            })
            .collect()
    }

    pub fn eigenvector_converged(&self) -> bool {
        self.eigenvector.converged
    }
}
