//! Louvain community detection on the undirected follow projection.
//!
//! Multi-level greedy modularity optimization (Blondel et al. 2008):
//!
//! 1. **Local moving**: every node starts alone and is moved to the
//!    neighboring community with the highest modularity gain until a pass
//!    makes no move.
//! 2. **Aggregation**: communities become nodes of a weighted meta-graph,
//!    internal edges become self-loops.
//! 3. Repeat on the meta-graph until nothing moves or the level bound is hit.
//!
//! Nodes are visited in graph insertion order. A node only leaves its
//! community for a strictly better gain, and among equally good neighboring
//! communities the one with the lowest index wins, so identical input
//! always yields the identical partition.

use std::collections::BTreeMap;

use crate::cluster::metrics::weighted_modularity;
use crate::cluster::Partition;
use crate::config::Config;
use crate::graph::{FollowGraph, UndirectedView};

/// Gains within this margin count as ties
const GAIN_EPSILON: f64 = 1e-12;

/// Weighted undirected edge list (i < j) plus per-node self-loop weight
struct WeightedGraph {
    n: usize,
    edges: Vec<(usize, usize, f64)>,
    self_loops: Vec<f64>,
}

impl WeightedGraph {
    fn from_view(view: &UndirectedView) -> Self {
        let n = view.len();
        let mut edges = Vec::new();
        let mut self_loops = vec![0.0; n];

        for (u, v) in view.edges() {
            if u == v {
                self_loops[u] += 1.0;
            } else {
                edges.push((u, v, 1.0));
            }
        }

        Self { n, edges, self_loops }
    }

    fn total_weight(&self) -> f64 {
        self.edges.iter().map(|(_, _, w)| w).sum::<f64>() + self.self_loops.iter().sum::<f64>()
    }

    fn degrees(&self) -> Vec<f64> {
        let mut degrees = vec![0.0; self.n];
        for &(i, j, w) in &self.edges {
            degrees[i] += w;
            degrees[j] += w;
        }
        for (i, &sl) in self.self_loops.iter().enumerate() {
            degrees[i] += 2.0 * sl;
        }
        degrees
    }
}

/// Louvain community detector
#[derive(Debug, Clone)]
pub struct Louvain {
    /// Resolution parameter (gamma)
    resolution: f64,
    /// Maximum local-moving passes per level
    max_passes: usize,
    /// Maximum aggregation levels
    max_levels: usize,
    /// Minimum modularity improvement to keep aggregating
    min_modularity_gain: f64,
}

impl Louvain {
    pub fn new() -> Self {
        Self {
            resolution: 1.0,
            max_passes: 100,
            max_levels: 10,
            min_modularity_gain: 1e-7,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new()
            .with_resolution(config.louvain_resolution)
            .with_max_passes(config.louvain_max_passes)
            .with_max_levels(config.louvain_max_levels)
    }

    /// Higher values produce smaller communities
    pub fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes;
        self
    }

    pub fn with_max_levels(mut self, levels: usize) -> Self {
        self.max_levels = levels;
        self
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Partition every node of the follow graph
    pub fn detect(&self, graph: &FollowGraph) -> Partition {
        let view = UndirectedView::from_graph(graph);
        let labels = self.labels(&view);
        let partition = Partition::from_labels(graph, &view, &labels);

        log::info!(
            "Found {} communities among {} nodes (resolution {})",
            partition.len(),
            view.len(),
            self.resolution()
        );
        partition
    }

    /// Community label per view position
    pub fn labels(&self, view: &UndirectedView) -> Vec<usize> {
        let mut current = WeightedGraph::from_view(view);
        let mut membership: Vec<usize> = (0..current.n).collect();
        if current.n == 0 {
            return membership;
        }

        let identity: Vec<usize> = (0..current.n).collect();
        let mut modularity = weighted_modularity(
            current.n,
            &current.edges,
            &current.self_loops,
            &identity,
            self.resolution,
        );

        for level in 0..self.max_levels {
            let (communities, moved) = self.local_moving(&current);
            if !moved {
                break;
            }

            let (next, mapping) = aggregate(&current, &communities);
            for label in membership.iter_mut() {
                *label = mapping[*label];
            }

            let identity: Vec<usize> = (0..next.n).collect();
            let next_modularity = weighted_modularity(
                next.n,
                &next.edges,
                &next.self_loops,
                &identity,
                self.resolution,
            );
            log::debug!(
                "Louvain level {}: {} -> {} communities, modularity {:.6}",
                level,
                current.n,
                next.n,
                next_modularity
            );

            current = next;
            if next_modularity - modularity < self.min_modularity_gain {
                break;
            }
            modularity = next_modularity;
        }

        membership
    }

    /// Phase 1: move nodes between communities while modularity improves.
    /// Returns (community per node, whether anything moved).
    fn local_moving(&self, graph: &WeightedGraph) -> (Vec<usize>, bool) {
        let n = graph.n;
        let mut communities: Vec<usize> = (0..n).collect();

        let m = graph.total_weight();
        if m == 0.0 {
            return (communities, false);
        }

        let mut adj: Vec<BTreeMap<usize, f64>> = vec![BTreeMap::new(); n];
        for &(i, j, w) in &graph.edges {
            *adj[i].entry(j).or_insert(0.0) += w;
            *adj[j].entry(i).or_insert(0.0) += w;
        }

        let degrees = graph.degrees();
        let mut community_degrees = degrees.clone();
        let mut any_moved = false;

        for _pass in 0..self.max_passes {
            let mut moved = false;

            for node in 0..n {
                let current = communities[node];
                let ki = degrees[node];
                community_degrees[current] -= ki;

                let mut links: BTreeMap<usize, f64> = BTreeMap::new();
                for (&neighbor, &w) in &adj[node] {
                    *links.entry(communities[neighbor]).or_insert(0.0) += w;
                }

                let scale = self.resolution * ki / (2.0 * m * m);
                let current_links = links.get(&current).copied().unwrap_or(0.0);
                let mut best = current;
                let mut best_gain = current_links / m - community_degrees[current] * scale;

                for (&community, &ki_in) in &links {
                    if community == current {
                        continue;
                    }
                    let gain = ki_in / m - community_degrees[community] * scale;
                    if gain > best_gain + GAIN_EPSILON {
                        best = community;
                        best_gain = gain;
                    }
                }

                communities[node] = best;
                community_degrees[best] += ki;
                if best != current {
                    moved = true;
                    any_moved = true;
                }
            }

            if !moved {
                break;
            }
        }

        (communities, any_moved)
    }
}

impl Default for Louvain {
    fn default() -> Self {
        Self::new()
    }
}

/// Phase 2: collapse communities into meta-nodes.
/// Returns the meta-graph and the meta-node of every current node.
fn aggregate(graph: &WeightedGraph, communities: &[usize]) -> (WeightedGraph, Vec<usize>) {
    // Meta-node ids follow the first member's position
    let mut renumber: BTreeMap<usize, usize> = BTreeMap::new();
    let mut mapping = Vec::with_capacity(graph.n);
    for &community in communities {
        let next_id = renumber.len();
        mapping.push(*renumber.entry(community).or_insert(next_id));
    }
    let n_new = renumber.len();

    let mut weights: BTreeMap<(usize, usize), f64> = BTreeMap::new();
    let mut self_loops = vec![0.0; n_new];

    for (i, &sl) in graph.self_loops.iter().enumerate() {
        self_loops[mapping[i]] += sl;
    }
    for &(i, j, w) in &graph.edges {
        let (ci, cj) = (mapping[i], mapping[j]);
        if ci == cj {
            self_loops[ci] += w;
        } else {
            let key = if ci < cj { (ci, cj) } else { (cj, ci) };
            *weights.entry(key).or_insert(0.0) += w;
        }
    }

    let edges = weights.into_iter().map(|((i, j), w)| (i, j, w)).collect();
    (
        WeightedGraph {
            n: n_new,
            edges,
            self_loops,
        },
        mapping,
    )
}

/// Detect communities with the configured Louvain settings
pub fn detect_communities(graph: &FollowGraph, config: &Config) -> Partition {
    Louvain::from_config(config).detect(graph)
}
