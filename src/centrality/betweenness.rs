use std::collections::VecDeque;

use rayon::prelude::*;

use crate::centrality::CentralityScores;
use crate::graph::FollowGraph;

/// Sources per work unit. Partial sums are combined in source order, so
/// the result does not depend on the number of worker threads.
const SOURCE_CHUNK: usize = 64;

/// Successor lists indexed by dense node position, self-follows dropped
fn successor_lists(graph: &FollowGraph) -> Vec<Vec<usize>> {
    graph
        .nodes()
        .map(|(idx, _)| {
            graph
                .followees(idx)
                .filter(|&w| w != idx)
                .map(|w| w.index())
                .collect()
        })
        .collect()
}

/// Brandes dependency accumulation for a batch of sources
fn accumulate(successors: &[Vec<usize>], sources: &[usize]) -> Vec<f64> {
    let n = successors.len();
    let mut centrality = vec![0.0; n];

    let mut stack = Vec::with_capacity(n);
    let mut queue = VecDeque::with_capacity(n);
    let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut sigma = vec![0.0f64; n];
    let mut distance = vec![-1i64; n];
    let mut delta = vec![0.0f64; n];

    for &s in sources {
        for v in 0..n {
            predecessors[v].clear();
            sigma[v] = 0.0;
            distance[v] = -1;
            delta[v] = 0.0;
        }
        sigma[s] = 1.0;
        distance[s] = 0;
        queue.push_back(s);

        while let Some(v) = queue.pop_front() {
            stack.push(v);
            for &w in &successors[v] {
                if distance[w] < 0 {
                    distance[w] = distance[v] + 1;
                    queue.push_back(w);
                }
                if distance[w] == distance[v] + 1 {
                    sigma[w] += sigma[v];
                    predecessors[w].push(v);
                }
            }
        }

        // Shortest-path credit is split in proportion to path counts
        while let Some(w) = stack.pop() {
            for &v in &predecessors[w] {
                delta[v] += sigma[v] / sigma[w] * (1.0 + delta[w]);
            }
            if w != s {
                centrality[w] += delta[w];
            }
        }
    }

    centrality
}

/// Fraction of shortest directed paths between all ordered pairs that pass
/// through each node, normalized by 1 / ((n - 1)(n - 2)).
pub fn betweenness_centrality(graph: &FollowGraph) -> CentralityScores {
    let n = graph.node_count();
    let successors = successor_lists(graph);
    let sources: Vec<usize> = (0..n).collect();

    let partials: Vec<Vec<f64>> = sources
        .par_chunks(SOURCE_CHUNK)
        .map(|chunk| accumulate(&successors, chunk))
        .collect();

    let mut totals = vec![0.0; n];
    for partial in partials {
        for (total, value) in totals.iter_mut().zip(partial) {
            *total += value;
        }
    }

    let scale = if n > 2 {
        1.0 / ((n - 1) * (n - 2)) as f64
    } else {
        1.0
    };

    graph
        .nodes()
        .map(|(idx, account)| (account.handle.clone(), totals[idx.index()] * scale))
        .collect()
}
