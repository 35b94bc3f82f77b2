//! Community analysis module

pub mod detection;
pub mod metrics;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub use detection::{detect_communities, Louvain};
pub use metrics::{modularity, summarize};

use crate::graph::{FollowGraph, UndirectedView};

/// Disjoint, non-empty groups covering every node present at detection time.
///
/// Community ids are dense and numbered by their first member in graph
/// insertion order; they carry no other meaning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    assignment: HashMap<String, usize>,
    communities: Vec<Vec<String>>,
}

impl Partition {
    pub(crate) fn from_labels(
        graph: &FollowGraph,
        view: &UndirectedView,
        labels: &[usize],
    ) -> Self {
        let mut renumber: HashMap<usize, usize> = HashMap::new();
        let mut assignment = HashMap::with_capacity(labels.len());
        let mut communities: Vec<Vec<String>> = Vec::new();

        for (pos, &label) in labels.iter().enumerate() {
            let id = *renumber.entry(label).or_insert_with(|| {
                communities.push(Vec::new());
                communities.len() - 1
            });
            let handle = graph.handle(view.node_index(pos)).to_string();
            communities[id].push(handle.clone());
            assignment.insert(handle, id);
        }

        Self {
            assignment,
            communities,
        }
    }

    /// Community of an account, `None` if it was absent at detection time
    pub fn community_of(&self, handle: &str) -> Option<usize> {
        self.assignment.get(handle).copied()
    }

    /// Members of every community, indexed by community id
    pub fn communities(&self) -> &[Vec<String>] {
        &self.communities
    }

    /// Number of communities
    pub fn len(&self) -> usize {
        self.communities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.communities.is_empty()
    }
}

/// Statistics for a single community
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunitySummary {
    pub id: usize,
    pub size: usize,
    /// Follow edges with both endpoints in the community
    pub internal_edges: usize,
    /// internal_edges / (size * (size - 1))
    pub density: f64,
    pub members: Vec<String>,
}
