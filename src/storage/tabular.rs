//! CSV exports: one row per node and the ranked recommendation list

use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use crate::centrality::CentralityReport;
use crate::cluster::Partition;
use crate::graph::FollowGraph;
use crate::recommend::ScoredCandidate;

/// Community value written for accounts without an assignment
pub const UNASSIGNED_COMMUNITY: i64 = -1;

/// Exported attributes of one account
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeRow {
    #[serde(rename = "Handle")]
    pub handle: String,
    #[serde(rename = "DisplayName")]
    pub display_name: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "NodeType")]
    pub node_type: String,
    #[serde(rename = "Community")]
    pub community: i64,
    #[serde(rename = "DegreeCentrality")]
    pub degree_centrality: f64,
    #[serde(rename = "BetweennessCentrality")]
    pub betweenness_centrality: f64,
    #[serde(rename = "EigenvectorCentrality")]
    pub eigenvector_centrality: f64,
    /// In-degree
    #[serde(rename = "Followers")]
    pub followers: usize,
    /// Out-degree
    #[serde(rename = "Following")]
    pub following: usize,
    #[serde(rename = "Posts")]
    pub posts: u64,
    #[serde(rename = "JoinDate")]
    pub join_date: String,
}

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    (value * factor).round() / factor
}

/// Rows for every node in graph insertion order
pub fn node_rows(
    graph: &FollowGraph,
    partition: &Partition,
    centrality: &CentralityReport,
    precision: u32,
) -> Vec<NodeRow> {
    graph
        .nodes()
        .map(|(idx, account)| {
            let score = |table: &std::collections::HashMap<String, f64>| {
                round_to(table.get(&account.handle).copied().unwrap_or(0.0), precision)
            };

            NodeRow {
                handle: account.handle.clone(),
                display_name: account.display_name.clone(),
                description: account.description.clone(),
                node_type: account.node_type.as_str().to_string(),
                community: partition
                    .community_of(&account.handle)
                    .map_or(UNASSIGNED_COMMUNITY, |c| c as i64),
                degree_centrality: score(&centrality.degree),
                betweenness_centrality: score(&centrality.betweenness),
                eigenvector_centrality: score(&centrality.eigenvector.scores),
                followers: graph.in_degree(idx),
                following: graph.out_degree(idx),
                posts: account.posts_count,
                join_date: account.created_at.clone(),
            }
        })
        .collect()
}

/// Write node rows as CSV with a header line
pub fn write_node_csv<W: Write>(writer: W, rows: &[NodeRow]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct RankedRow<'a> {
    #[serde(rename = "Rank")]
    rank: usize,
    #[serde(rename = "Handle")]
    handle: &'a str,
    #[serde(rename = "Score")]
    score: f64,
}

/// Write a ranked recommendation list as `Rank,Handle,Score`
pub fn write_recommendation_csv<W: Write>(writer: W, ranked: &[ScoredCandidate]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for (i, candidate) in ranked.iter().enumerate() {
        csv_writer.serialize(RankedRow {
            rank: i + 1,
            handle: &candidate.handle,
            score: candidate.score,
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}
