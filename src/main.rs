use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use follow_graph_analyzer::centrality::CentralityMeasure;
use follow_graph_analyzer::data::communities::{load_community_csv, sample_members};
use follow_graph_analyzer::data::json::load_network_data;
use follow_graph_analyzer::{storage, Analysis, Config};

#[derive(Parser, Debug)]
#[clap(
    name = "follow-graph-analyzer",
    about = "Centrality, communities and account recommendations for a social follow network"
)]
struct Cli {
    /// JSON array with the analyzed account's follows
    #[clap(long, default_value = "data/following.json")]
    following: PathBuf,

    /// Directory with one <handle>.json follow list per followed account
    #[clap(long, default_value = "data/following_network")]
    network_dir: PathBuf,

    /// Output directory for results
    #[clap(long, default_value = "output_data")]
    output_dir: PathBuf,

    /// Handle used for the analyzed account
    #[clap(long, default_value = "user")]
    source: String,

    /// Admit accounts followed by your follows as new nodes
    #[clap(long)]
    extended: bool,

    /// Number of recommendations to keep
    #[clap(long, default_value = "10")]
    top_n: usize,

    /// Community table (Handle, Community) to sample members from instead of analyzing
    #[clap(long)]
    communities_csv: Option<PathBuf>,

    /// Members drawn per community when sampling
    #[clap(long, default_value = "5")]
    sample_size: usize,

    /// Seed for community sampling
    #[clap(long, default_value = "0")]
    seed: u64,

    /// Number of worker threads (0 = use all available cores)
    #[clap(long, default_value = "0")]
    threads: usize,

    /// Verbose logging
    #[clap(long, short)]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            source_handle: self.source.clone(),
            extended: self.extended,
            top_n: self.top_n,
            threads: self.threads,
            ..Config::default()
        }
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    let config = args.config();

    let num_threads = config.worker_threads();
    log::info!("Using {} worker threads", num_threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()?;

    if let Some(path) = &args.communities_csv {
        let table = load_community_csv(path)?;
        let sample = sample_members(&table.groups, args.sample_size, args.seed);
        for (community, members) in &sample {
            log::info!("Community {}: {}", community, members.join(", "));
        }
        return Ok(());
    }

    log::info!("Starting follow graph analysis for '{}'", config.source_handle);

    let records = load_network_data(&args.following, &args.network_dir, &config.source_handle)
        .with_context(|| format!("loading follow data from {}", args.following.display()))?;
    if !records.issues.is_empty() {
        log::warn!("{} records were skipped while loading", records.issues.len());
    }

    let analysis = Analysis::run(&records, &config)?;

    storage::save_results(&analysis, &args.output_dir, config.precision)?;

    log::info!(
        "Network: {} nodes, {} edges, {} communities",
        analysis.graph.node_count(),
        analysis.graph.edge_count(),
        analysis.partition.len()
    );
    for measure in [CentralityMeasure::Degree, CentralityMeasure::Betweenness] {
        log::info!("Top accounts by {} centrality:", measure.name());
        for ranked in analysis.centrality.top(measure, storage::TOP_CENTRAL_ACCOUNTS) {
            log::info!("  {} ({:.4})", ranked.handle, ranked.score);
        }
    }

    log::info!("Recommended accounts for {}:", analysis.recommendations.source);
    for (rank, candidate) in analysis.recommendations.primary().iter().enumerate() {
        log::info!("{:>3}. {} ({:.4})", rank + 1, candidate.handle, candidate.score);
    }

    log::info!("Analysis complete. Results saved to {}", args.output_dir.display());

    Ok(())
}
