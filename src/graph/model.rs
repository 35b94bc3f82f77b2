//! Directed follow graph over account nodes

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};

use crate::data::FollowRecord;

/// Role of an account in the analyzed neighborhood
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    /// The single analyzed account
    Source,
    /// Any other account encountered
    Following,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Source => "source",
            NodeType::Following => "following",
        }
    }
}

/// Account attributes, defaulted at load time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountNode {
    pub handle: String,
    pub node_type: NodeType,
    pub display_name: String,
    pub description: String,
    pub posts_count: u64,
    pub created_at: String,
}

impl AccountNode {
    /// The analyzed account
    pub fn source(handle: impl Into<String>) -> Self {
        Self::bare(handle, NodeType::Source)
    }

    /// A followed account known only by its handle
    pub fn placeholder(handle: impl Into<String>) -> Self {
        Self::bare(handle, NodeType::Following)
    }

    fn bare(handle: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            handle: handle.into(),
            node_type,
            display_name: String::new(),
            description: String::new(),
            posts_count: 0,
            created_at: String::new(),
        }
    }
}

impl From<&FollowRecord> for AccountNode {
    fn from(record: &FollowRecord) -> Self {
        Self {
            handle: record.handle.clone(),
            node_type: NodeType::Following,
            display_name: record.display_name.clone().unwrap_or_default(),
            description: record.description.clone().unwrap_or_default(),
            posts_count: record.posts_count.unwrap_or(0),
            created_at: record.created_at.clone().unwrap_or_default(),
        }
    }
}

/// Directed follow graph: an edge `u -> v` means `u` follows `v`.
///
/// Nodes are never removed, so node indices are dense and stable in
/// insertion order. Mutation is restricted to the graph builder.
#[derive(Debug, Clone)]
pub struct FollowGraph {
    graph: DiGraph<AccountNode, ()>,
    index: HashMap<String, NodeIndex>,
    source: NodeIndex,
}

impl FollowGraph {
    /// Graph holding only the source account
    pub(crate) fn new(source_handle: &str) -> Self {
        let mut graph = DiGraph::new();
        let source = graph.add_node(AccountNode::source(source_handle));
        let mut index = HashMap::new();
        index.insert(source_handle.to_string(), source);

        Self { graph, index, source }
    }

    /// Insert an account; an existing node keeps its attributes
    pub(crate) fn add_account(&mut self, account: AccountNode) -> NodeIndex {
        if let Some(&idx) = self.index.get(&account.handle) {
            return idx;
        }

        let handle = account.handle.clone();
        let idx = self.graph.add_node(account);
        self.index.insert(handle, idx);
        idx
    }

    /// Add a follow edge; returns false if it already existed
    pub(crate) fn add_follow(&mut self, follower: NodeIndex, followee: NodeIndex) -> bool {
        if self.graph.find_edge(follower, followee).is_some() {
            return false;
        }
        self.graph.add_edge(follower, followee, ());
        true
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn source(&self) -> NodeIndex {
        self.source
    }

    pub fn source_handle(&self) -> &str {
        &self.graph[self.source].handle
    }

    pub fn node_index(&self, handle: &str) -> Option<NodeIndex> {
        self.index.get(handle).copied()
    }

    pub fn contains(&self, handle: &str) -> bool {
        self.index.contains_key(handle)
    }

    pub fn account(&self, idx: NodeIndex) -> &AccountNode {
        &self.graph[idx]
    }

    pub fn handle(&self, idx: NodeIndex) -> &str {
        &self.graph[idx].handle
    }

    /// Number of followers (incoming edges)
    pub fn in_degree(&self, idx: NodeIndex) -> usize {
        self.graph.edges_directed(idx, Direction::Incoming).count()
    }

    /// Number of followed accounts (outgoing edges)
    pub fn out_degree(&self, idx: NodeIndex) -> usize {
        self.graph.edges_directed(idx, Direction::Outgoing).count()
    }

    /// Total directed degree; a self-follow counts twice
    pub fn degree(&self, idx: NodeIndex) -> usize {
        self.in_degree(idx) + self.out_degree(idx)
    }

    pub fn has_follow(&self, follower: NodeIndex, followee: NodeIndex) -> bool {
        self.graph.find_edge(follower, followee).is_some()
    }

    /// Accounts followed by `idx`
    pub fn followees(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors_directed(idx, Direction::Outgoing)
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = (NodeIndex, &AccountNode)> + '_ {
        self.graph
            .node_indices()
            .map(move |idx| (idx, &self.graph[idx]))
    }

    /// Edges as (follower, followee) in insertion order
    pub fn follows(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex)> + '_ {
        self.graph.edge_references().map(|e| (e.source(), e.target()))
    }
}
