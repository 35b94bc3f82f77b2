//! Undirected projection of the follow graph

use std::collections::{BTreeSet, HashMap};

use petgraph::graph::NodeIndex;

use crate::graph::model::FollowGraph;

/// Undirected view over (a subset of) the follow graph.
///
/// `u` and `v` are adjacent when either follows the other; a pair that
/// follows each other still gives a single edge. Positions are dense
/// `0..len()` in the follow graph's insertion order.
#[derive(Debug, Clone)]
pub struct UndirectedView {
    members: Vec<NodeIndex>,
    positions: HashMap<NodeIndex, usize>,
    neighbors: Vec<BTreeSet<usize>>,
}

impl UndirectedView {
    /// Project the whole follow graph
    pub fn from_graph(graph: &FollowGraph) -> Self {
        Self::project(graph, |_| true)
    }

    /// Project the subgraph induced by the nodes for which `keep` holds
    pub fn project<F>(graph: &FollowGraph, keep: F) -> Self
    where
        F: Fn(NodeIndex) -> bool,
    {
        let members: Vec<NodeIndex> = graph
            .nodes()
            .map(|(idx, _)| idx)
            .filter(|&idx| keep(idx))
            .collect();

        let positions: HashMap<NodeIndex, usize> = members
            .iter()
            .enumerate()
            .map(|(pos, &idx)| (idx, pos))
            .collect();

        let mut neighbors = vec![BTreeSet::new(); members.len()];
        for (follower, followee) in graph.follows() {
            if let (Some(&u), Some(&v)) = (positions.get(&follower), positions.get(&followee)) {
                neighbors[u].insert(v);
                neighbors[v].insert(u);
            }
        }

        Self {
            members,
            positions,
            neighbors,
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Position of a follow-graph node in this view
    pub fn position(&self, idx: NodeIndex) -> Option<usize> {
        self.positions.get(&idx).copied()
    }

    /// Follow-graph node at a position
    pub fn node_index(&self, pos: usize) -> NodeIndex {
        self.members[pos]
    }

    pub fn neighbors(&self, pos: usize) -> &BTreeSet<usize> {
        &self.neighbors[pos]
    }

    pub fn has_self_loop(&self, pos: usize) -> bool {
        self.neighbors[pos].contains(&pos)
    }

    /// Undirected degree; a self-loop counts twice
    pub fn degree(&self, pos: usize) -> usize {
        let n = self.neighbors[pos].len();
        if self.has_self_loop(pos) {
            n + 1
        } else {
            n
        }
    }

    /// Edges as (u, v) with u <= v, ordered
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.neighbors
            .iter()
            .enumerate()
            .flat_map(|(u, adj)| adj.range(u..).map(move |&v| (u, v)))
    }

    pub fn edge_count(&self) -> usize {
        self.edges().count()
    }
}
