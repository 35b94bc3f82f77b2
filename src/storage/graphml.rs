//! GraphML export of the attributed follow graph

use std::io::Write;

use anyhow::Result;

use crate::storage::tabular::NodeRow;
use crate::graph::FollowGraph;

/// (key id, attribute name, GraphML type)
const NODE_KEYS: [(&str, &str, &str); 11] = [
    ("d0", "display_name", "string"),
    ("d1", "description", "string"),
    ("d2", "node_type", "string"),
    ("d3", "community", "long"),
    ("d4", "degree_centrality", "double"),
    ("d5", "betweenness_centrality", "double"),
    ("d6", "eigenvector_centrality", "double"),
    ("d7", "in_degree", "long"),
    ("d8", "out_degree", "long"),
    ("d9", "posts_count", "long"),
    ("d10", "created_at", "string"),
];

/// Escape text for use in XML content and attribute values
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn row_values(row: &NodeRow) -> [String; 11] {
    [
        row.display_name.clone(),
        row.description.clone(),
        row.node_type.clone(),
        row.community.to_string(),
        row.degree_centrality.to_string(),
        row.betweenness_centrality.to_string(),
        row.eigenvector_centrality.to_string(),
        row.followers.to_string(),
        row.following.to_string(),
        row.posts.to_string(),
        row.join_date.clone(),
    ]
}

/// Write the directed graph with per-node attributes; edges carry only endpoints.
///
/// `rows` must be the node rows of `graph` in insertion order.
pub fn write_graphml<W: Write>(mut out: W, graph: &FollowGraph, rows: &[NodeRow]) -> Result<()> {
    writeln!(out, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
    writeln!(out, "<graphml xmlns=\"http://graphml.graphdrawing.org/xmlns\">")?;
    for (id, name, kind) in NODE_KEYS {
        writeln!(
            out,
            "  <key id=\"{}\" for=\"node\" attr.name=\"{}\" attr.type=\"{}\"/>",
            id, name, kind
        )?;
    }
    writeln!(out, "  <graph edgedefault=\"directed\">")?;

    for row in rows {
        writeln!(out, "    <node id=\"{}\">", escape_xml(&row.handle))?;
        for ((id, _, _), value) in NODE_KEYS.iter().zip(row_values(row)) {
            writeln!(out, "      <data key=\"{}\">{}</data>", id, escape_xml(&value))?;
        }
        writeln!(out, "    </node>")?;
    }

    for (follower, followee) in graph.follows() {
        writeln!(
            out,
            "    <edge source=\"{}\" target=\"{}\"/>",
            escape_xml(graph.handle(follower)),
            escape_xml(graph.handle(followee))
        )?;
    }

    writeln!(out, "  </graph>")?;
    writeln!(out, "</graphml>")?;
    out.flush()?;

    Ok(())
}
