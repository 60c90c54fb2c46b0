//! Node promotion: move nodes to later layers after layering.
//!
//! The Nikolov family promotes a node (and, recursively, the predecessors it would otherwise
//! share a layer with) one layer further whenever that strictly lowers the number of dummy
//! nodes long edges will need. The model-order strategies instead move nodes so that the
//! layering agrees with the order in which nodes appear in the input model.
//!
//! Either way the layering is rebuilt from scratch afterwards, keeping each layer's node order
//! and dropping layers that ended up empty.

mod bi_layer_map;
mod model_order;
mod nikolov;

use crate::monitor::ProgressMonitor;
use crate::options::{LayeredOptions, NodePromotionStrategy};
use crate::processor::LayoutProcessor;
use heron_graph::LGraph;

pub use model_order::Direction;

#[derive(Debug, Default)]
pub struct NodePromoter;

impl LayoutProcessor for NodePromoter {
    fn process(&mut self, graph: &mut LGraph, monitor: &mut dyn ProgressMonitor) {
        monitor.begin("Node promotion heuristic", 1.0);

        let strategy = graph
            .properties
            .get(&LayeredOptions::NODE_PROMOTION_STRATEGY);
        let max_iterations = graph
            .properties
            .get(&LayeredOptions::NODE_PROMOTION_MAX_ITERATIONS);
        let before = dummy_count(graph);

        match Plan::resolve(strategy, max_iterations) {
            None => {}
            Some(Plan::Nikolov(plan)) => nikolov::promote(graph, plan),
            Some(Plan::ModelOrder(direction)) => model_order::promote(graph, direction),
        }

        tracing::trace!(
            ?strategy,
            dummies_before = before,
            dummies_after = dummy_count(graph),
            layers = graph.layer_count(),
            "node promotion"
        );
        monitor.done();
    }
}

/// Number of long-edge dummies the current layering needs: one per layer an edge skips.
pub fn dummy_count(graph: &LGraph) -> usize {
    graph
        .edge_ids()
        .into_iter()
        .filter(|e| !graph.is_self_loop(*e))
        .filter_map(|e| {
            let source = graph.node_layer_index(graph.edge_source_node(e))?;
            let target = graph.node_layer_index(graph.edge_target_node(e))?;
            Some(source.abs_diff(target).saturating_sub(1))
        })
        .sum()
}

/// How wide a layer may become during a bounded promotion pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WidthBound {
    Unbounded,
    NodeCount,
    Pixels,
}

/// When a promotion pass stops early, besides running out of promotions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StopCriterion {
    Never,
    /// After this percentage of the node count in sweeps.
    NodeCountPercentage(u32),
    /// Once this percentage of the initial dummies is gone.
    DummyPercentage(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NikolovPlan {
    pub bound: WidthBound,
    pub stop: StopCriterion,
    /// Bounded re-run if the first pass widened the widest layer.
    pub fallback: Option<WidthBound>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Plan {
    Nikolov(NikolovPlan),
    ModelOrder(Direction),
}

impl Plan {
    pub(crate) fn resolve(strategy: NodePromotionStrategy, max_iterations: u32) -> Option<Plan> {
        let nikolov = |bound, stop, fallback| {
            Some(Plan::Nikolov(NikolovPlan {
                bound,
                stop,
                fallback,
            }))
        };
        match strategy {
            NodePromotionStrategy::None => None,
            NodePromotionStrategy::Nikolov => {
                nikolov(WidthBound::NodeCount, StopCriterion::Never, None)
            }
            NodePromotionStrategy::NikolovPixel => {
                nikolov(WidthBound::Pixels, StopCriterion::Never, None)
            }
            NodePromotionStrategy::NikolovImproved => nikolov(
                WidthBound::Unbounded,
                StopCriterion::Never,
                Some(WidthBound::NodeCount),
            ),
            NodePromotionStrategy::NikolovImprovedPixel => nikolov(
                WidthBound::Unbounded,
                StopCriterion::Never,
                Some(WidthBound::Pixels),
            ),
            NodePromotionStrategy::NodeCountPercentage => nikolov(
                WidthBound::Unbounded,
                StopCriterion::NodeCountPercentage(max_iterations),
                None,
            ),
            NodePromotionStrategy::DummyNodePercentage => nikolov(
                WidthBound::Unbounded,
                StopCriterion::DummyPercentage(max_iterations),
                None,
            ),
            NodePromotionStrategy::NoBoundary => {
                nikolov(WidthBound::Unbounded, StopCriterion::Never, None)
            }
            NodePromotionStrategy::ModelOrderLeftToRight => {
                Some(Plan::ModelOrder(Direction::LeftToRight))
            }
            NodePromotionStrategy::ModelOrderRightToLeft => {
                Some(Plan::ModelOrder(Direction::RightToLeft))
            }
        }
    }
}
