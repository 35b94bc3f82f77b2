//! Results persistence module

pub mod graphml;
pub mod tabular;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{json, to_string_pretty};

use crate::analysis::Analysis;
use crate::centrality::CentralityMeasure;
use crate::cluster::{modularity, summarize};
use crate::graph::{BuildMode, UndirectedView};

pub use tabular::{node_rows, NodeRow, UNASSIGNED_COMMUNITY};

pub const NODES_FILE: &str = "nodes_info.csv";
pub const RECOMMENDATIONS_CSV: &str = "recommendations.csv";
pub const RECOMMENDATIONS_JSON: &str = "recommendations.json";
pub const SUMMARY_FILE: &str = "summary.json";

/// Accounts listed per measure in the summary
pub const TOP_CENTRAL_ACCOUNTS: usize = 5;

/// GraphML file name for a build mode
pub fn graphml_file_name(mode: BuildMode) -> &'static str {
    match mode {
        BuildMode::Restricted => "follow_network.graphml",
        BuildMode::Extended => "follow_network_extended.graphml",
    }
}

/// Save analysis results to the specified directory.
///
/// Files are overwritten; identical analyses produce identical files.
pub fn save_results(analysis: &Analysis, output_dir: &Path, precision: u32) -> Result<()> {
    log::info!("Saving results to {}", output_dir.display());

    // Ensure output directory exists
    fs::create_dir_all(output_dir)
        .with_context(|| format!("creating output directory {}", output_dir.display()))?;

    let rows = node_rows(
        &analysis.graph,
        &analysis.partition,
        &analysis.centrality,
        precision,
    );

    save_graphml(analysis, &rows, output_dir)?;
    save_nodes(&rows, output_dir)?;
    save_recommendations(analysis, output_dir)?;
    save_summary(analysis, output_dir)?;

    log::info!("Results saved successfully");

    Ok(())
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    Ok(BufWriter::new(file))
}

/// Save the attributed graph as GraphML
fn save_graphml(analysis: &Analysis, rows: &[NodeRow], output_dir: &Path) -> Result<()> {
    let path = output_dir.join(graphml_file_name(analysis.mode));
    log::info!("Writing graph to {}", path.display());

    graphml::write_graphml(create(&path)?, &analysis.graph, rows)
}

/// Save one row per node
fn save_nodes(rows: &[NodeRow], output_dir: &Path) -> Result<()> {
    let path = output_dir.join(NODES_FILE);
    log::info!("Writing {} node rows to {}", rows.len(), path.display());

    tabular::write_node_csv(create(&path)?, rows)
}

/// Save the ranked recommendations
fn save_recommendations(analysis: &Analysis, output_dir: &Path) -> Result<()> {
    let recommendations = &analysis.recommendations;

    let csv_path = output_dir.join(RECOMMENDATIONS_CSV);
    log::info!(
        "Writing {} recommendations to {}",
        recommendations.primary().len(),
        csv_path.display()
    );
    tabular::write_recommendation_csv(create(&csv_path)?, recommendations.primary())?;

    let json_path = output_dir.join(RECOMMENDATIONS_JSON);
    let mut file = create(&json_path)?;
    file.write_all(to_string_pretty(recommendations)?.as_bytes())?;
    file.flush()?;

    Ok(())
}

/// Save summary information
fn save_summary(analysis: &Analysis, output_dir: &Path) -> Result<()> {
    log::info!("Saving summary information");

    let graph = &analysis.graph;
    let centrality = &analysis.centrality;
    let view = UndirectedView::from_graph(graph);
    let summaries = summarize(graph, &analysis.partition);
    let node_count = graph.node_count();
    let avg_degree = if node_count > 0 {
        graph.edge_count() as f64 / node_count as f64
    } else {
        0.0
    };

    let summary = json!({
        "graph_stats": {
            "source": graph.source_handle(),
            "mode": format!("{:?}", analysis.mode).to_lowercase(),
            "node_count": node_count,
            "edge_count": graph.edge_count(),
            "undirected_edge_count": view.edge_count(),
            "avg_degree": avg_degree,
        },
        "community_stats": {
            "community_count": analysis.partition.len(),
            "largest_community_size": summaries.first().map_or(0, |c| c.size),
            "resolution": analysis.resolution,
            "modularity": modularity(graph, &analysis.partition, analysis.resolution),
            "communities": summaries.iter().map(|c| {
                json!({
                    "id": c.id,
                    "size": c.size,
                    "internal_edges": c.internal_edges,
                    "density": c.density,
                })
            }).collect::<Vec<_>>(),
        },
        "centrality": {
            "eigenvector_converged": analysis.centrality.eigenvector.converged,
            "eigenvector_iterations": analysis.centrality.eigenvector.iterations,
            "top_degree": centrality.top(CentralityMeasure::Degree, TOP_CENTRAL_ACCOUNTS),
            "top_betweenness": centrality.top(CentralityMeasure::Betweenness, TOP_CENTRAL_ACCOUNTS),
        },
        "recommendations": {
            "retained_nodes": analysis.recommendations.retained_nodes,
            "candidate_count": analysis.recommendations.candidate_count,
        },
        "load_issues": analysis.issues.iter().map(|i| i.to_string()).collect::<Vec<_>>(),
    });

    let path = output_dir.join(SUMMARY_FILE);
    let mut file = create(&path)?;
    file.write_all(to_string_pretty(&summary)?.as_bytes())?;
    file.flush()?;

    Ok(())
}
