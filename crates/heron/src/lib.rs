#![forbid(unsafe_code)]

//! Layered graph layout.
//!
//! A layout run is a linear sequence of five phases (cycle breaking, layering, node ordering,
//! node placement, edge routing) interleaved with intermediate processors. Phases and the
//! configurator declare which processors they need and where those run relative to the
//! phases; [`processor::resolve`] turns those declarations into one execution order.
//!
//! All options are read from the graph's property bag, see [`options`].

pub mod configurator;
pub mod error;
pub mod intermediate;
pub mod monitor;
pub mod node_size;
pub mod options;
pub mod p1_cycles;
pub mod p2_layers;
pub mod p3_order;
pub mod p4_nodes;
pub mod p5_edges;
pub mod processor;

pub use heron_graph as graph;

pub use configurator::LayeredLayout;
pub use error::{Error, Result};
pub use monitor::{BasicProgressMonitor, NullMonitor, ProgressMonitor};
pub use processor::LayeredPhase;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Lays out `graph` in place with the default node-size calculator.
///
/// Configuration problems are reported before the graph is touched.
pub fn layout(graph: &mut graph::LGraph, monitor: &mut dyn ProgressMonitor) -> Result<()> {
    LayeredLayout::new().run(graph, monitor)
}
