//! Configuration management for the follow graph analyzer

/// Handle given to the analyzed account when none is supplied
pub const DEFAULT_SOURCE_HANDLE: &str = "user";

/// Default configuration for the follow graph analyzer
#[derive(Debug, Clone)]
pub struct Config {
    /// Handle of the analyzed account
    pub source_handle: String,

    /// Admit previously unseen followees as new nodes
    pub extended: bool,

    /// Number of recommendations kept per similarity metric
    pub top_n: usize,

    /// Nodes whose total directed degree is at most this value are
    /// dropped before similarity scoring (the source is always kept)
    pub filter_max_degree: usize,

    /// Iteration bound for eigenvector power iteration
    pub eigenvector_max_iter: usize,

    /// Per-node convergence tolerance for eigenvector power iteration
    pub eigenvector_tolerance: f64,

    /// Louvain resolution (gamma); higher values give smaller communities
    pub louvain_resolution: f64,

    /// Maximum Louvain aggregation levels
    pub louvain_max_levels: usize,

    /// Maximum local-moving passes per Louvain level
    pub louvain_max_passes: usize,

    /// Decimal places kept for exported centrality scores
    pub precision: u32,

    /// Number of worker threads (0 = use all available cores)
    pub threads: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_handle: DEFAULT_SOURCE_HANDLE.to_string(),
            extended: false,
            top_n: 10,
            filter_max_degree: 1,
            eigenvector_max_iter: 1000,
            eigenvector_tolerance: 1.0e-6,
            louvain_resolution: 1.0,
            louvain_max_levels: 10,
            louvain_max_passes: 100,
            precision: 4,
            threads: 0,
        }
    }
}

impl Config {
    /// Create a configuration for the given source account, other values default
    pub fn for_source(source_handle: impl Into<String>) -> Self {
        Self {
            source_handle: source_handle.into(),
            ..Self::default()
        }
    }

    /// Resolved worker-thread count
    pub fn worker_threads(&self) -> usize {
        if self.threads > 0 {
            self.threads
        } else {
            num_cpus::get()
        }
    }
}
