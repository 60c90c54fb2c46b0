//! Phase 1: break cycles by reversing a depth-first feedback arc set.
//!
//! Nodes are visited in graph order; an edge that leads back onto the current DFS stack is
//! reversed and marked [`InternalProperties::REVERSED`]. Self-loops are left alone.

use crate::intermediate::IntermediateProcessorStrategy;
use crate::monitor::ProgressMonitor;
use crate::options::InternalProperties;
use crate::processor::{LayeredConfiguration, LayeredPhase, LayoutPhase, LayoutProcessor};
use heron_graph::{DenseIndex, EdgeId, LGraph};

#[derive(Debug, Default)]
pub struct DepthFirstCycleBreaker;

impl LayoutProcessor for DepthFirstCycleBreaker {
    fn process(&mut self, graph: &mut LGraph, monitor: &mut dyn ProgressMonitor) {
        monitor.begin("Depth-first cycle removal", 1.0);
        let fas = dfs_fas(graph);
        for e in &fas {
            graph.reverse_edge(*e);
            let props = &mut graph.edge_mut(*e).properties;
            let reversed = !props.get(&InternalProperties::REVERSED);
            props.set(&InternalProperties::REVERSED, reversed);
        }
        tracing::trace!(reversed = fas.len(), "cycle breaking");
        monitor.done();
    }
}

impl LayoutPhase for DepthFirstCycleBreaker {
    fn processor_configuration(&self, _graph: &LGraph) -> LayeredConfiguration {
        let mut config = LayeredConfiguration::new();
        config
            .add_after(
                LayeredPhase::P5EdgeRouting,
                IntermediateProcessorStrategy::LongEdgeJoiner,
            )
            .add_same_slot(
                IntermediateProcessorStrategy::LongEdgeJoiner,
                IntermediateProcessorStrategy::ReversedEdgeRestorer,
            );
        config
    }
}

fn dfs_fas(graph: &LGraph) -> Vec<EdgeId> {
    let index = DenseIndex::new(graph.node_ids());
    let mut visited = vec![false; index.len()];
    let mut on_stack = vec![false; index.len()];
    let mut fas = Vec::new();

    fn dfs(
        graph: &LGraph,
        index: &DenseIndex,
        v: usize,
        visited: &mut [bool],
        on_stack: &mut [bool],
        fas: &mut Vec<EdgeId>,
    ) {
        if visited[v] {
            return;
        }
        visited[v] = true;
        on_stack[v] = true;
        let outgoing: Vec<EdgeId> = graph.outgoing_edges(index.node(v)).collect();
        for e in outgoing {
            if graph.is_self_loop(e) {
                continue;
            }
            let Some(w) = index.get(graph.edge_target_node(e)) else {
                continue;
            };
            if on_stack[w] {
                fas.push(e);
            } else {
                dfs(graph, index, w, visited, on_stack, fas);
            }
        }
        on_stack[v] = false;
    }

    for v in 0..index.len() {
        dfs(graph, &index, v, &mut visited, &mut on_stack, &mut fas);
    }
    fas
}
