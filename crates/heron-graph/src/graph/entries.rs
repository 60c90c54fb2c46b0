//! Entity types stored in an [`LGraph`](super::LGraph).

use super::{EdgeId, LabelId, LayerId, NodeId, PortId};
use crate::{Point, Properties, Size};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum NodeType {
    /// A node of the input graph.
    #[default]
    Normal,
    /// A bend placeholder for an edge crossing a layer it neither starts nor ends in.
    LongEdge,
    /// Occupies a layer slot on behalf of the center labels of an edge.
    Label,
    /// Stands in for a port on the boundary of the enclosing graph.
    ExternalPort,
}

impl NodeType {
    pub fn is_dummy(self) -> bool {
        !matches!(self, NodeType::Normal)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum PortSide {
    #[default]
    Undefined,
    North,
    East,
    South,
    West,
}

impl PortSide {
    pub fn opposed(self) -> PortSide {
        match self {
            PortSide::Undefined => PortSide::Undefined,
            PortSide::North => PortSide::South,
            PortSide::East => PortSide::West,
            PortSide::South => PortSide::North,
            PortSide::West => PortSide::East,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortType {
    Input,
    Output,
}

#[derive(Debug, Clone)]
pub struct LNode {
    pub(crate) id: NodeId,
    pub(crate) kind: NodeType,
    pub(crate) name: Option<String>,
    pub(crate) layer: Option<LayerId>,
    pub(crate) ports: Vec<PortId>,
    pub(crate) default_input: Option<PortId>,
    pub(crate) default_output: Option<PortId>,
    pub size: Size,
    pub position: Point,
    pub labels: Vec<LabelId>,
    pub properties: Properties,
}

impl LNode {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> NodeType {
        self.kind
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The layer this node currently belongs to, if any.
    pub fn layer(&self) -> Option<LayerId> {
        self.layer
    }

    pub fn ports(&self) -> &[PortId] {
        &self.ports
    }

    /// Center point in graph coordinates.
    pub fn center(&self) -> Point {
        Point {
            x: self.position.x + self.size.width / 2.0,
            y: self.position.y + self.size.height / 2.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LPort {
    pub(crate) id: PortId,
    pub(crate) node: NodeId,
    pub(crate) incoming: Vec<EdgeId>,
    pub(crate) outgoing: Vec<EdgeId>,
    pub side: PortSide,
    /// Position relative to the owning node.
    pub position: Point,
    pub size: Size,
    pub labels: Vec<LabelId>,
    pub properties: Properties,
}

impl LPort {
    pub fn id(&self) -> PortId {
        self.id
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn incoming_edges(&self) -> &[EdgeId] {
        &self.incoming
    }

    pub fn outgoing_edges(&self) -> &[EdgeId] {
        &self.outgoing
    }

    pub fn degree(&self) -> usize {
        self.incoming.len() + self.outgoing.len()
    }

    /// Anchor point relative to the owning node (the port's center).
    pub fn anchor(&self) -> Point {
        Point {
            x: self.position.x + self.size.width / 2.0,
            y: self.position.y + self.size.height / 2.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LEdge {
    pub(crate) id: EdgeId,
    pub(crate) source: PortId,
    pub(crate) target: PortId,
    pub labels: Vec<LabelId>,
    pub bend_points: Vec<Point>,
    pub properties: Properties,
}

impl LEdge {
    pub fn id(&self) -> EdgeId {
        self.id
    }

    pub fn source(&self) -> PortId {
        self.source
    }

    pub fn target(&self) -> PortId {
        self.target
    }
}

#[derive(Debug, Clone)]
pub struct LLabel {
    pub(crate) id: LabelId,
    pub text: Option<String>,
    pub size: Size,
    /// Position relative to whatever the label is attached to.
    pub position: Point,
    pub properties: Properties,
}

impl LLabel {
    pub fn id(&self) -> LabelId {
        self.id
    }
}

#[derive(Debug, Clone)]
pub struct Layer {
    pub(crate) id: LayerId,
    pub(crate) nodes: Vec<NodeId>,
    pub size: Size,
    pub properties: Properties,
}

impl Layer {
    pub(crate) fn new(id: LayerId) -> Self {
        Self {
            id,
            nodes: Vec::new(),
            size: Size::default(),
            properties: Properties::default(),
        }
    }

    pub fn id(&self) -> LayerId {
        self.id
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
