//! The layered graph container.
//!
//! Entities live in per-kind arenas. Every relation with two sides (port ↔ edge, node ↔ layer)
//! is only mutated through `LGraph` methods so both sides stay consistent.

mod arena;
mod entries;
mod ids;
mod layers;

use arena::Arena;
use rustc_hash::FxBuildHasher;

pub use entries::{LEdge, LLabel, LNode, LPort, Layer, NodeType, PortSide, PortType};
pub use ids::{EdgeId, LabelId, LayerId, NodeId, PortId};

use crate::{Point, Properties, Size};

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;

#[derive(Debug, Clone, Default)]
pub struct LGraph {
    nodes: Arena<LNode>,
    ports: Arena<LPort>,
    edges: Arena<LEdge>,
    labels: Arena<LLabel>,

    layers: Vec<Layer>,
    next_layer_id: u32,
    layerless: Vec<NodeId>,

    names: HashMap<String, NodeId>,

    pub properties: Properties,
}

impl LGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- nodes -------------------------------------------------------------------------------

    /// Adds a node to the list of layerless nodes.
    pub fn add_node(&mut self, kind: NodeType) -> NodeId {
        let id = NodeId(self.nodes.next_index());
        self.nodes.push(LNode {
            id,
            kind,
            name: None,
            layer: None,
            ports: Vec::new(),
            default_input: None,
            default_output: None,
            size: Size::default(),
            position: Point::default(),
            labels: Vec::new(),
            properties: Properties::default(),
        });
        self.layerless.push(id);
        id
    }

    /// Adds a named node. A later node with the same name shadows the earlier one in
    /// [`node_by_name`](Self::node_by_name).
    pub fn add_named_node(&mut self, name: impl Into<String>, kind: NodeType) -> NodeId {
        let name = name.into();
        let id = self.add_node(kind);
        if let Some(n) = self.nodes.get_mut(id.0) {
            n.name = Some(name.clone());
        }
        self.names.insert(name, id);
        id
    }

    pub fn node_by_name(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    pub fn has_node(&self, id: NodeId) -> bool {
        self.nodes.get(id.0).is_some()
    }

    pub fn get_node(&self, id: NodeId) -> Option<&LNode> {
        self.nodes.get(id.0)
    }

    pub fn get_node_mut(&mut self, id: NodeId) -> Option<&mut LNode> {
        self.nodes.get_mut(id.0)
    }

    /// # Panics
    ///
    /// Panics if `id` refers to a removed node.
    pub fn node(&self, id: NodeId) -> &LNode {
        match self.nodes.get(id.0) {
            Some(n) => n,
            None => panic!("stale node handle {id:?}"),
        }
    }

    /// # Panics
    ///
    /// Panics if `id` refers to a removed node.
    pub fn node_mut(&mut self, id: NodeId) -> &mut LNode {
        match self.nodes.get_mut(id.0) {
            Some(n) => n,
            None => panic!("stale node handle {id:?}"),
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Upper bound (exclusive) of all node indices handed out so far.
    pub fn node_slot_count(&self) -> usize {
        self.nodes.slot_count()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &LNode> {
        self.nodes.iter()
    }

    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.iter().map(|n| n.id).collect()
    }

    /// Removes a node together with its ports, incident edges and labels.
    pub fn remove_node(&mut self, id: NodeId) -> bool {
        let Some(node) = self.nodes.get(id.0) else {
            return false;
        };
        let ports = node.ports.clone();
        let labels = node.labels.clone();
        let layer = node.layer;
        let name = node.name.clone();

        for port in ports {
            self.remove_port(port);
        }
        for label in labels {
            self.labels.remove(label.0);
        }
        if let Some(layer) = layer {
            if let Some(l) = self.layers.iter_mut().find(|l| l.id == layer) {
                l.nodes.retain(|n| *n != id);
            }
        }
        self.layerless.retain(|n| *n != id);
        if let Some(name) = name {
            if self.names.get(&name) == Some(&id) {
                self.names.remove(&name);
            }
        }
        self.nodes.remove(id.0);
        true
    }

    // ---- ports -------------------------------------------------------------------------------

    pub fn add_port(&mut self, node: NodeId, side: PortSide) -> PortId {
        let id = PortId(self.ports.next_index());
        self.ports.push(LPort {
            id,
            node,
            incoming: Vec::new(),
            outgoing: Vec::new(),
            side,
            position: Point::default(),
            size: Size::default(),
            labels: Vec::new(),
            properties: Properties::default(),
        });
        self.node_mut(node).ports.push(id);
        id
    }

    /// Returns the implicit port used when edges are attached to the node itself, creating it
    /// on first use. Inputs sit on the west side, outputs on the east side.
    pub fn default_port(&mut self, node: NodeId, port_type: PortType) -> PortId {
        let existing = match port_type {
            PortType::Input => self.node(node).default_input,
            PortType::Output => self.node(node).default_output,
        };
        if let Some(p) = existing {
            return p;
        }
        let side = match port_type {
            PortType::Input => PortSide::West,
            PortType::Output => PortSide::East,
        };
        let port = self.add_port(node, side);
        let n = self.node_mut(node);
        match port_type {
            PortType::Input => n.default_input = Some(port),
            PortType::Output => n.default_output = Some(port),
        }
        port
    }

    pub fn get_port(&self, id: PortId) -> Option<&LPort> {
        self.ports.get(id.0)
    }

    /// # Panics
    ///
    /// Panics if `id` refers to a removed port.
    pub fn port(&self, id: PortId) -> &LPort {
        match self.ports.get(id.0) {
            Some(p) => p,
            None => panic!("stale port handle {id:?}"),
        }
    }

    /// # Panics
    ///
    /// Panics if `id` refers to a removed port.
    pub fn port_mut(&mut self, id: PortId) -> &mut LPort {
        match self.ports.get_mut(id.0) {
            Some(p) => p,
            None => panic!("stale port handle {id:?}"),
        }
    }

    /// Removes a port and every edge attached to it.
    pub fn remove_port(&mut self, id: PortId) -> bool {
        let Some(port) = self.ports.get(id.0) else {
            return false;
        };
        let node = port.node;
        let edges: Vec<EdgeId> = port
            .incoming
            .iter()
            .chain(port.outgoing.iter())
            .copied()
            .collect();
        let labels = port.labels.clone();
        for e in edges {
            self.remove_edge(e);
        }
        for label in labels {
            self.labels.remove(label.0);
        }
        if let Some(n) = self.nodes.get_mut(node.0) {
            n.ports.retain(|p| *p != id);
            if n.default_input == Some(id) {
                n.default_input = None;
            }
            if n.default_output == Some(id) {
                n.default_output = None;
            }
        }
        self.ports.remove(id.0);
        true
    }

    // ---- edges -------------------------------------------------------------------------------

    pub fn add_edge(&mut self, source: PortId, target: PortId) -> EdgeId {
        let id = EdgeId(self.edges.next_index());
        self.edges.push(LEdge {
            id,
            source,
            target,
            labels: Vec::new(),
            bend_points: Vec::new(),
            properties: Properties::default(),
        });
        self.port_mut(source).outgoing.push(id);
        self.port_mut(target).incoming.push(id);
        id
    }

    /// Connects two nodes through their default ports.
    pub fn connect(&mut self, source: NodeId, target: NodeId) -> EdgeId {
        let s = self.default_port(source, PortType::Output);
        let t = self.default_port(target, PortType::Input);
        self.add_edge(s, t)
    }

    pub fn get_edge(&self, id: EdgeId) -> Option<&LEdge> {
        self.edges.get(id.0)
    }

    /// # Panics
    ///
    /// Panics if `id` refers to a removed edge.
    pub fn edge(&self, id: EdgeId) -> &LEdge {
        match self.edges.get(id.0) {
            Some(e) => e,
            None => panic!("stale edge handle {id:?}"),
        }
    }

    /// # Panics
    ///
    /// Panics if `id` refers to a removed edge.
    pub fn edge_mut(&mut self, id: EdgeId) -> &mut LEdge {
        match self.edges.get_mut(id.0) {
            Some(e) => e,
            None => panic!("stale edge handle {id:?}"),
        }
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self) -> impl Iterator<Item = &LEdge> {
        self.edges.iter()
    }

    pub fn edge_ids(&self) -> Vec<EdgeId> {
        self.edges.iter().map(|e| e.id).collect()
    }

    pub fn edge_source_node(&self, id: EdgeId) -> NodeId {
        self.port(self.edge(id).source).node
    }

    pub fn edge_target_node(&self, id: EdgeId) -> NodeId {
        self.port(self.edge(id).target).node
    }

    pub fn is_self_loop(&self, id: EdgeId) -> bool {
        self.edge_source_node(id) == self.edge_target_node(id)
    }

    pub fn set_edge_source(&mut self, id: EdgeId, port: PortId) {
        let old = self.edge(id).source;
        if old == port {
            return;
        }
        self.port_mut(old).outgoing.retain(|e| *e != id);
        self.port_mut(port).outgoing.push(id);
        self.edge_mut(id).source = port;
    }

    pub fn set_edge_target(&mut self, id: EdgeId, port: PortId) {
        let old = self.edge(id).target;
        if old == port {
            return;
        }
        self.port_mut(old).incoming.retain(|e| *e != id);
        self.port_mut(port).incoming.push(id);
        self.edge_mut(id).target = port;
    }

    /// Swaps source and target port of an edge.
    pub fn reverse_edge(&mut self, id: EdgeId) {
        let (source, target) = {
            let e = self.edge(id);
            (e.source, e.target)
        };
        self.port_mut(source).outgoing.retain(|e| *e != id);
        self.port_mut(target).incoming.retain(|e| *e != id);
        self.port_mut(target).outgoing.push(id);
        self.port_mut(source).incoming.push(id);
        let e = self.edge_mut(id);
        e.source = target;
        e.target = source;
    }

    pub fn remove_edge(&mut self, id: EdgeId) -> bool {
        let Some(edge) = self.edges.remove(id.0) else {
            return false;
        };
        if let Some(p) = self.ports.get_mut(edge.source.0) {
            p.outgoing.retain(|e| *e != id);
        }
        if let Some(p) = self.ports.get_mut(edge.target.0) {
            p.incoming.retain(|e| *e != id);
        }
        for label in edge.labels {
            self.labels.remove(label.0);
        }
        true
    }

    /// Incoming edges of a node, port by port.
    pub fn incoming_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        self.node(node)
            .ports
            .iter()
            .flat_map(move |p| self.port(*p).incoming.iter().copied())
    }

    /// Outgoing edges of a node, port by port.
    pub fn outgoing_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        self.node(node)
            .ports
            .iter()
            .flat_map(move |p| self.port(*p).outgoing.iter().copied())
    }

    pub fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.incoming_edges(node)
            .map(move |e| self.edge_source_node(e))
    }

    pub fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.outgoing_edges(node)
            .map(move |e| self.edge_target_node(e))
    }

    // ---- labels ------------------------------------------------------------------------------

    fn new_label(&mut self, size: Size) -> LabelId {
        let id = LabelId(self.labels.next_index());
        self.labels.push(LLabel {
            id,
            text: None,
            size,
            position: Point::default(),
            properties: Properties::default(),
        });
        id
    }

    pub fn add_node_label(&mut self, node: NodeId, size: Size) -> LabelId {
        let id = self.new_label(size);
        self.node_mut(node).labels.push(id);
        id
    }

    pub fn add_port_label(&mut self, port: PortId, size: Size) -> LabelId {
        let id = self.new_label(size);
        self.port_mut(port).labels.push(id);
        id
    }

    pub fn add_edge_label(&mut self, edge: EdgeId, size: Size) -> LabelId {
        let id = self.new_label(size);
        self.edge_mut(edge).labels.push(id);
        id
    }

    pub fn get_label(&self, id: LabelId) -> Option<&LLabel> {
        self.labels.get(id.0)
    }

    /// # Panics
    ///
    /// Panics if `id` refers to a removed label.
    pub fn label(&self, id: LabelId) -> &LLabel {
        match self.labels.get(id.0) {
            Some(l) => l,
            None => panic!("stale label handle {id:?}"),
        }
    }

    /// # Panics
    ///
    /// Panics if `id` refers to a removed label.
    pub fn label_mut(&mut self, id: LabelId) -> &mut LLabel {
        match self.labels.get_mut(id.0) {
            Some(l) => l,
            None => panic!("stale label handle {id:?}"),
        }
    }
}
