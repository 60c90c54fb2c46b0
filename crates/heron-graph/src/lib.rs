//! Graph model used by `heron`.
//!
//! An [`LGraph`] owns arenas of nodes, ports, edges and labels plus an ordered list of
//! [`Layer`]s. Entities are addressed by copyable handles ([`NodeId`], [`PortId`], ...). Edges
//! always attach to ports; nodes that are connected "directly" get implicit default ports.
//!
//! Every entity carries a [`Properties`] bag keyed by typed [`Property`] ids.

mod geom;
pub mod graph;
mod index;
mod property;

pub use geom::{Point, Rect, Size};
pub use graph::{
    EdgeId, LEdge, LGraph, LLabel, LNode, LPort, LabelId, Layer, LayerId, NodeId, NodeType,
    PortId, PortSide, PortType,
};
pub use index::DenseIndex;
pub use property::{Properties, Property, PropertyError};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
