use crate::monitor::ProgressMonitor;
use crate::options::InternalProperties;
use crate::processor::LayoutProcessor;
use heron_graph::LGraph;

/// Turns edges reversed during cycle breaking back around, including their bend points.
#[derive(Debug, Default)]
pub struct ReversedEdgeRestorer;

impl LayoutProcessor for ReversedEdgeRestorer {
    fn process(&mut self, graph: &mut LGraph, monitor: &mut dyn ProgressMonitor) {
        monitor.begin("Restoring reversed edges", 1.0);
        for e in graph.edge_ids() {
            if !graph.edge(e).properties.get(&InternalProperties::REVERSED) {
                continue;
            }
            graph.reverse_edge(e);
            let edge = graph.edge_mut(e);
            edge.bend_points.reverse();
            edge.properties.remove(&InternalProperties::REVERSED);
        }
        monitor.done();
    }
}
