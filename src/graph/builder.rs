//! Graph construction module

use std::collections::BTreeMap;

use crate::data::{FollowRecord, LoadedRecords};
use crate::graph::model::{AccountNode, FollowGraph};

/// How follow lists of followed accounts are admitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildMode {
    /// Only edges between the source and its direct follows
    #[default]
    Restricted,
    /// Unseen followees become new nodes
    Extended,
}

impl BuildMode {
    pub fn from_extended(extended: bool) -> Self {
        if extended {
            BuildMode::Extended
        } else {
            BuildMode::Restricted
        }
    }
}

/// Builder for incrementally constructing a FollowGraph
pub struct GraphBuilder {
    graph: FollowGraph,
    mode: BuildMode,
    /// Edges dropped in restricted mode
    skipped_edges: usize,
}

impl GraphBuilder {
    /// Start a graph that holds only the source account
    pub fn new(source_handle: &str, mode: BuildMode) -> Self {
        Self {
            graph: FollowGraph::new(source_handle),
            mode,
            skipped_edges: 0,
        }
    }

    /// Add the source's direct follows as nodes with an edge from the source
    pub fn add_source_follows(&mut self, follows: &[FollowRecord]) {
        let source = self.graph.source();
        for record in follows {
            let idx = self.graph.add_account(AccountNode::from(record));
            self.graph.add_follow(source, idx);
        }
    }

    /// Add the follow list of one account
    pub fn add_account_follows(&mut self, account: &str, follows: &[FollowRecord]) {
        match self.mode {
            BuildMode::Extended => {
                // The follower only becomes a node once it follows someone
                let mut follower = None;
                for record in follows {
                    let from = *follower.get_or_insert_with(|| {
                        self.graph.add_account(AccountNode::placeholder(account))
                    });
                    let followee = self.graph.add_account(AccountNode::from(record));
                    self.graph.add_follow(from, followee);
                }
            }
            BuildMode::Restricted => {
                let Some(follower) = self.graph.node_index(account) else {
                    self.skipped_edges += follows.len();
                    return;
                };
                for record in follows {
                    match self.graph.node_index(&record.handle) {
                        Some(followee) => {
                            self.graph.add_follow(follower, followee);
                        }
                        None => self.skipped_edges += 1,
                    }
                }
            }
        }
    }

    /// Finish construction
    pub fn build(self) -> FollowGraph {
        log::info!(
            "Built {:?} follow graph with {} nodes and {} edges \
             ({} edges outside the neighborhood skipped)",
            self.mode,
            self.graph.node_count(),
            self.graph.edge_count(),
            self.skipped_edges
        );
        self.graph
    }
}

/// Build the follow graph from the source's follows and each account's follows.
///
/// Accounts are processed in the map's handle order; the first record seen
/// for a handle supplies its attributes.
pub fn build_graph(
    source_handle: &str,
    source_follows: &[FollowRecord],
    network: &BTreeMap<String, Vec<FollowRecord>>,
    mode: BuildMode,
) -> FollowGraph {
    let mut builder = GraphBuilder::new(source_handle, mode);
    builder.add_source_follows(source_follows);
    for (account, follows) in network {
        builder.add_account_follows(account, follows);
    }
    builder.build()
}

/// Build the follow graph from validated records
pub fn build_from_records(records: &LoadedRecords, mode: BuildMode) -> FollowGraph {
    build_graph(
        &records.source_handle,
        &records.source_follows,
        &records.network,
        mode,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::model::NodeType;
    use std::collections::BTreeSet;

    fn records(handles: &[&str]) -> Vec<FollowRecord> {
        handles.iter().map(|h| FollowRecord::new(*h)).collect()
    }

    fn network(entries: &[(&str, &[&str])]) -> BTreeMap<String, Vec<FollowRecord>> {
        entries
            .iter()
            .map(|(account, follows)| (account.to_string(), records(follows)))
            .collect()
    }

    fn edge_set(graph: &FollowGraph) -> BTreeSet<(String, String)> {
        graph
            .follows()
            .map(|(u, v)| (graph.handle(u).to_string(), graph.handle(v).to_string()))
            .collect()
    }

    fn node_set(graph: &FollowGraph) -> BTreeSet<String> {
        graph.nodes().map(|(_, n)| n.handle.clone()).collect()
    }

    #[test]
    fn test_source_exists_with_empty_follows() {
        let graph = build_graph("user", &[], &BTreeMap::new(), BuildMode::Restricted);
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.account(graph.source()).node_type, NodeType::Source);
    }

    #[test]
    fn test_shared_followee_scenario() {
        let net = network(&[("A", &["C"]), ("B", &["C"])]);
        let source = records(&["A", "B", "C"]);

        for mode in [BuildMode::Restricted, BuildMode::Extended] {
            let graph = build_graph("user", &source[..2], &net, mode);
            let edges = edge_set(&graph);
            if mode == BuildMode::Extended {
                let expected: BTreeSet<String> =
                    ["A", "B", "C", "user"].iter().map(|s| s.to_string()).collect();
                assert_eq!(node_set(&graph), expected);
                assert!(edges.contains(&("A".into(), "C".into())));
                assert!(edges.contains(&("B".into(), "C".into())));
                assert_eq!(edges.len(), 4);
            } else {
                // C is not a direct follow, so its edges are dropped
                assert_eq!(node_set(&graph).len(), 3);
                assert_eq!(edges.len(), 2);
            }
        }

        // With C followed directly, both modes agree
        let restricted = build_graph("user", &source, &net, BuildMode::Restricted);
        let extended = build_graph("user", &source, &net, BuildMode::Extended);
        assert_eq!(edge_set(&restricted), edge_set(&extended));
        assert_eq!(node_set(&restricted), node_set(&extended));
    }

    #[test]
    fn test_extended_admits_new_followee_restricted_drops_it() {
        let source = records(&["A", "B"]);
        let net = network(&[("A", &["C"]), ("B", &["C"]), ("C", &["D"])]);

        let restricted = build_graph("user", &source, &net, BuildMode::Restricted);
        let extended = build_graph("user", &source, &net, BuildMode::Extended);

        assert!(!restricted.contains("D"));
        assert!(extended.contains("D"));
        let (c, d) = (extended.node_index("C").unwrap(), extended.node_index("D").unwrap());
        assert!(extended.has_follow(c, d));
        assert!(node_set(&extended).is_superset(&node_set(&restricted)));
    }

    #[test]
    fn test_restricted_edges_stay_in_neighborhood() {
        let source = records(&["A", "B"]);
        let net = network(&[("A", &["B", "X"]), ("X", &["A"]), ("B", &["user", "Y"])]);
        let graph = build_graph("user", &source, &net, BuildMode::Restricted);

        let allowed: BTreeSet<String> = ["user", "A", "B"].iter().map(|s| s.to_string()).collect();
        for (u, v) in edge_set(&graph) {
            assert!(allowed.contains(&u) && allowed.contains(&v), "{u} -> {v}");
        }
        assert!(graph.has_follow(graph.node_index("B").unwrap(), graph.source()));
    }

    #[test]
    fn test_duplicates_collapse_and_first_attributes_win() {
        let source = vec![
            FollowRecord::new("A").with_display_name("Alpha"),
            FollowRecord::new("A").with_display_name("Other"),
        ];
        let net = network(&[("A", &["A"])]);
        let graph = build_graph("user", &source, &net, BuildMode::Extended);

        let a = graph.node_index("A").unwrap();
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.account(a).display_name, "Alpha");
        assert_eq!(graph.out_degree(graph.source()), 1);
        // Self-follow preserved
        assert!(graph.has_follow(a, a));
    }

    #[test]
    fn test_extended_empty_follow_list_adds_no_node() {
        let source = records(&["a"]);
        let net = network(&[("a", &[]), ("stray", &[])]);
        let graph = build_graph("user", &source, &net, BuildMode::Extended);

        assert_eq!(graph.node_count(), 2);
        assert!(!graph.contains("stray"));

        let scores = crate::centrality::degree_centrality(&graph);
        assert_eq!(scores["user"], 1.0);
    }

    #[test]
    fn test_extended_follower_added_on_first_followee() {
        let source = records(&["a"]);
        let net = network(&[("stray", &["a", "b"])]);
        let graph = build_graph("user", &source, &net, BuildMode::Extended);

        let stray = graph.node_index("stray").unwrap();
        assert_eq!(graph.out_degree(stray), 2);
        // Follower is inserted before its followees
        assert!(stray < graph.node_index("b").unwrap());
    }

    #[test]
    fn test_extended_source_keeps_type_when_followed_back() {
        let source = records(&["A"]);
        let net = network(&[("A", &["user"])]);
        let graph = build_graph("user", &source, &net, BuildMode::Extended);

        assert_eq!(graph.account(graph.source()).node_type, NodeType::Source);
        assert_eq!(graph.in_degree(graph.source()), 1);
    }
}
