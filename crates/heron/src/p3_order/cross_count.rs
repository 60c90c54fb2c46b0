use heron_graph::{LGraph, NodeId};
use rustc_hash::FxHashMap as HashMap;

/// Crossings between consecutive layers of `layering`, counted with an accumulator tree.
pub fn cross_count(graph: &LGraph, layering: &[Vec<NodeId>]) -> usize {
    let mut cc = 0;
    for i in 1..layering.len() {
        cc += two_layer_cross_count(graph, &layering[i - 1], &layering[i]);
    }
    cc
}

fn two_layer_cross_count(graph: &LGraph, north: &[NodeId], south: &[NodeId]) -> usize {
    if south.is_empty() {
        return 0;
    }

    let south_pos: HashMap<NodeId, usize> =
        south.iter().enumerate().map(|(i, v)| (*v, i)).collect();

    let mut south_entries: Vec<usize> = Vec::new();
    for v in north {
        let mut entries: Vec<usize> = graph
            .outgoing_edges(*v)
            .filter_map(|e| south_pos.get(&graph.edge_target_node(e)).copied())
            .collect();
        entries.sort_unstable();
        south_entries.extend(entries);
    }

    let mut first_index: usize = 1;
    while first_index < south.len() {
        first_index <<= 1;
    }
    let tree_size = 2 * first_index - 1;
    first_index -= 1;
    let mut tree: Vec<usize> = vec![0; tree_size];

    let mut cc = 0;
    for pos in south_entries {
        let mut index = pos + first_index;
        tree[index] += 1;
        let mut weight_sum = 0;
        while index > 0 {
            if index % 2 == 1 {
                weight_sum += tree[index + 1];
            }
            index = (index - 1) >> 1;
            tree[index] += 1;
        }
        cc += weight_sum;
    }
    cc
}
