//! Graph representation and construction module

pub mod algorithms;
pub mod builder;
pub mod model;

pub use algorithms::UndirectedView;
pub use builder::{build_from_records, build_graph, BuildMode, GraphBuilder};
pub use model::{AccountNode, FollowGraph, NodeType};
