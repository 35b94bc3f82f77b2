//! One analysis run over a graph snapshot

use crate::centrality::{CentralityReport, EigenvectorConfig};
use crate::cluster::{detect_communities, Partition};
use crate::config::Config;
use crate::data::{LoadIssue, LoadedRecords};
use crate::error::Result;
use crate::graph::{build_from_records, BuildMode, FollowGraph};
use crate::recommend::{recommend, RecommendConfig, Recommendations};

/// Graph plus every derived table
#[derive(Debug, Clone)]
pub struct Analysis {
    pub mode: BuildMode,
    pub graph: FollowGraph,
    pub centrality: CentralityReport,
    pub partition: Partition,
    /// Louvain resolution the partition was found with
    pub resolution: f64,
    pub recommendations: Recommendations,
    /// Records rejected while loading
    pub issues: Vec<LoadIssue>,
}

impl Analysis {
    /// Build the graph from loaded records and run all engines on it
    pub fn run(records: &LoadedRecords, config: &Config) -> Result<Self> {
        let mode = BuildMode::from_extended(config.extended);
        let graph = build_from_records(records, mode);
        let mut analysis = Self::analyze(graph, mode, config)?;
        analysis.issues = records.issues.clone();
        Ok(analysis)
    }

    /// Run all engines on an already built graph
    pub fn analyze(graph: FollowGraph, mode: BuildMode, config: &Config) -> Result<Self> {
        let (centrality, partition) = rayon::join(
            || CentralityReport::compute(&graph, EigenvectorConfig::from(config)),
            || detect_communities(&graph, config),
        );

        let source = graph.source_handle().to_string();
        let recommendations = recommend(&graph, &source, RecommendConfig::from(config))?;

        Ok(Self {
            mode,
            graph,
            centrality,
            partition,
            resolution: config.louvain_resolution,
            recommendations,
            issues: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::records::load_records;
    use serde_json::json;

    #[test]
    fn test_run_wires_engines_together() {
        let source = vec![json!({"handle": "a"}), json!({"handle": "b"}), json!({"oops": 1})];
        let network = vec![
            ("a".to_string(), vec![json!({"handle": "c"})]),
            ("b".to_string(), vec![json!({"handle": "c"})]),
        ];
        let records = load_records("user", &source, network).unwrap();

        let config = Config {
            extended: true,
            ..Config::for_source("user")
        };
        let analysis = Analysis::run(&records, &config).unwrap();

        assert_eq!(analysis.mode, BuildMode::Extended);
        assert_eq!(analysis.graph.node_count(), 4);
        assert_eq!(analysis.issues.len(), 1);
        assert_eq!(analysis.partition.communities().iter().map(Vec::len).sum::<usize>(), 4);
        assert_eq!(analysis.recommendations.primary()[0].handle, "c");
        assert!(analysis.centrality.for_handle("c").is_ok());
        assert_eq!(analysis.resolution, config.louvain_resolution);
    }
}
