//! Intermediate processors: work that runs between phases.
//!
//! Phases and the configurator request processors by [`IntermediateProcessorStrategy`]; the
//! declaration order of the enum breaks ties between processors sharing a slot.

mod label_and_node_size;
mod label_dummy_inserter;
mod long_edge_joiner;
mod long_edge_splitter;
pub mod node_promotion;
mod reversed_edge_restorer;

pub use label_and_node_size::{LabelAndNodeSizeProcessor, port_label_box};
pub use label_dummy_inserter::LabelDummyInserter;
pub use long_edge_joiner::LongEdgeJoiner;
pub use long_edge_splitter::LongEdgeSplitter;
pub use node_promotion::NodePromoter;
pub use reversed_edge_restorer::ReversedEdgeRestorer;

use crate::node_size::NodeSizeCalculator;
use crate::processor::LayoutProcessor;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IntermediateProcessorStrategy {
    LabelDummyInserter,
    NodePromotion,
    LongEdgeSplitter,
    LabelAndNodeSizeProcessor,
    LongEdgeJoiner,
    ReversedEdgeRestorer,
}

impl IntermediateProcessorStrategy {
    pub fn create(self, node_sizes: &Arc<dyn NodeSizeCalculator>) -> Box<dyn LayoutProcessor> {
        match self {
            IntermediateProcessorStrategy::LabelDummyInserter => Box::new(LabelDummyInserter),
            IntermediateProcessorStrategy::NodePromotion => Box::new(NodePromoter),
            IntermediateProcessorStrategy::LongEdgeSplitter => Box::new(LongEdgeSplitter),
            IntermediateProcessorStrategy::LabelAndNodeSizeProcessor => {
                Box::new(LabelAndNodeSizeProcessor::new(node_sizes.clone()))
            }
            IntermediateProcessorStrategy::LongEdgeJoiner => Box::new(LongEdgeJoiner),
            IntermediateProcessorStrategy::ReversedEdgeRestorer => Box::new(ReversedEdgeRestorer),
        }
    }
}
