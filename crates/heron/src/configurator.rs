//! Pipeline assembly and execution.

use crate::error::{Error, Result};
use crate::intermediate::IntermediateProcessorStrategy;
use crate::monitor::ProgressMonitor;
use crate::node_size::{DefaultNodeSizeCalculator, NodeSizeCalculator};
use crate::options::{
    EdgeLabelPlacement, GraphProperties, InternalProperties, LayeredOptions,
    NodePromotionStrategy,
};
use crate::p1_cycles::DepthFirstCycleBreaker;
use crate::p3_order::LayerSweepCrossingMinimizer;
use crate::p4_nodes::SimpleNodePlacer;
use crate::p5_edges::PolylineEdgeRouter;
use crate::processor::{LayeredConfiguration, LayeredPhase, LayoutPhase, Step, resolve};
use heron_graph::{LGraph, NodeType};
use std::sync::Arc;

/// The layered layout algorithm.
///
/// ```
/// use heron::graph::{LGraph, NodeType};
/// use heron::{LayeredLayout, NullMonitor};
///
/// let mut g = LGraph::new();
/// let a = g.add_node(NodeType::Normal);
/// let b = g.add_node(NodeType::Normal);
/// g.connect(a, b);
///
/// LayeredLayout::new().run(&mut g, &mut NullMonitor).unwrap();
/// assert_eq!(g.layer_count(), 2);
/// ```
#[derive(Clone)]
pub struct LayeredLayout {
    node_sizes: Arc<dyn NodeSizeCalculator>,
}

impl Default for LayeredLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl LayeredLayout {
    pub fn new() -> Self {
        Self {
            node_sizes: Arc::new(DefaultNodeSizeCalculator),
        }
    }

    pub fn with_node_size_calculator(mut self, calculator: Arc<dyn NodeSizeCalculator>) -> Self {
        self.node_sizes = calculator;
        self
    }

    /// The execution order this layout would use for `graph`.
    pub fn plan(
        &self,
        graph: &LGraph,
    ) -> Result<Vec<Step<LayeredPhase, IntermediateProcessorStrategy>>> {
        let phases = Phases::for_graph(graph);
        let configuration = self.configuration(graph, &phases, analyze(graph));
        Ok(resolve(&LayeredPhase::ALL, &configuration)?)
    }

    /// Lays out `graph` in place.
    ///
    /// The processor order is resolved before anything touches the graph, so configuration
    /// errors and a cancellation before the first step leave it unchanged. Cancellation is
    /// checked between processors.
    pub fn run(&self, graph: &mut LGraph, monitor: &mut dyn ProgressMonitor) -> Result<()> {
        let graph_properties = analyze(graph);
        let mut phases = Phases::for_graph(graph);
        let configuration = self.configuration(graph, &phases, graph_properties);
        let steps = resolve(&LayeredPhase::ALL, &configuration)?;
        tracing::debug!(?steps, "resolved processor order");

        monitor.begin("Layered layout", steps.len() as f64);
        if monitor.is_canceled() {
            monitor.done();
            return Err(Error::Canceled);
        }
        graph
            .properties
            .set(&InternalProperties::GRAPH_PROPERTIES, graph_properties);

        for step in steps {
            if monitor.is_canceled() {
                monitor.done();
                return Err(Error::Canceled);
            }
            match step {
                Step::Phase(phase) => phases.get_mut(phase).process(graph, monitor),
                Step::Processor(processor) => processor
                    .create(&self.node_sizes)
                    .process(graph, monitor),
            }
            monitor.worked(1.0);
            monitor.log_graph(graph, &format!("{step:?}"));
        }
        monitor.done();
        Ok(())
    }

    fn configuration(
        &self,
        graph: &LGraph,
        phases: &Phases,
        graph_properties: GraphProperties,
    ) -> LayeredConfiguration {
        let mut configuration = LayeredConfiguration::new();
        for phase in LayeredPhase::ALL {
            configuration.add_all(&phases.get(phase).processor_configuration(graph));
        }

        if graph
            .properties
            .get(&LayeredOptions::NODE_PROMOTION_STRATEGY)
            != NodePromotionStrategy::None
        {
            configuration.add_before(
                LayeredPhase::P3NodeOrdering,
                IntermediateProcessorStrategy::NodePromotion,
            );
        }
        if graph_properties.center_labels {
            configuration.add_before(
                LayeredPhase::P2Layering,
                IntermediateProcessorStrategy::LabelDummyInserter,
            );
        }
        configuration
    }
}

struct Phases {
    cycle_breaking: Box<dyn LayoutPhase>,
    layering: Box<dyn LayoutPhase>,
    node_ordering: Box<dyn LayoutPhase>,
    node_placement: Box<dyn LayoutPhase>,
    edge_routing: Box<dyn LayoutPhase>,
}

impl Phases {
    fn for_graph(graph: &LGraph) -> Self {
        Self {
            cycle_breaking: Box::new(DepthFirstCycleBreaker),
            layering: graph
                .properties
                .get(&LayeredOptions::LAYERING_STRATEGY)
                .create(),
            node_ordering: Box::new(LayerSweepCrossingMinimizer),
            node_placement: Box::new(SimpleNodePlacer),
            edge_routing: Box::new(PolylineEdgeRouter),
        }
    }

    fn get(&self, phase: LayeredPhase) -> &dyn LayoutPhase {
        match phase {
            LayeredPhase::P1CycleBreaking => self.cycle_breaking.as_ref(),
            LayeredPhase::P2Layering => self.layering.as_ref(),
            LayeredPhase::P3NodeOrdering => self.node_ordering.as_ref(),
            LayeredPhase::P4NodePlacement => self.node_placement.as_ref(),
            LayeredPhase::P5EdgeRouting => self.edge_routing.as_ref(),
        }
    }

    fn get_mut(&mut self, phase: LayeredPhase) -> &mut dyn LayoutPhase {
        match phase {
            LayeredPhase::P1CycleBreaking => self.cycle_breaking.as_mut(),
            LayeredPhase::P2Layering => self.layering.as_mut(),
            LayeredPhase::P3NodeOrdering => self.node_ordering.as_mut(),
            LayeredPhase::P4NodePlacement => self.node_placement.as_mut(),
            LayeredPhase::P5EdgeRouting => self.edge_routing.as_mut(),
        }
    }
}

/// Structural facts that decide which processors a graph needs.
pub fn analyze(graph: &LGraph) -> GraphProperties {
    let mut out = GraphProperties {
        external_ports: graph.nodes().any(|n| n.kind() == NodeType::ExternalPort),
        ..GraphProperties::default()
    };
    for edge in graph.edges() {
        let self_loop = graph.is_self_loop(edge.id());
        out.self_loops |= self_loop;
        for l in &edge.labels {
            match graph
                .label(*l)
                .properties
                .get(&LayeredOptions::EDGE_LABELS_PLACEMENT)
            {
                EdgeLabelPlacement::Center => out.center_labels |= !self_loop,
                EdgeLabelPlacement::Head | EdgeLabelPlacement::Tail => out.end_labels = true,
            }
        }
    }
    out
}
