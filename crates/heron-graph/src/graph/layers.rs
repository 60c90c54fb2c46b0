//! Layer bookkeeping for [`LGraph`].

use super::{LGraph, Layer, LayerId, NodeId, NodeType};

impl LGraph {
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn layer(&self, index: usize) -> &Layer {
        &self.layers[index]
    }

    pub fn layer_mut(&mut self, index: usize) -> &mut Layer {
        &mut self.layers[index]
    }

    pub fn layer_index(&self, id: LayerId) -> Option<usize> {
        self.layers.iter().position(|l| l.id == id)
    }

    pub fn node_layer_index(&self, node: NodeId) -> Option<usize> {
        self.node(node).layer.and_then(|l| self.layer_index(l))
    }

    fn new_layer(&mut self) -> Layer {
        let id = LayerId(self.next_layer_id);
        self.next_layer_id += 1;
        Layer::new(id)
    }

    pub fn append_layer(&mut self) -> LayerId {
        let layer = self.new_layer();
        let id = layer.id;
        self.layers.push(layer);
        id
    }

    /// Inserts an empty layer at `index`, shifting later layers right.
    pub fn insert_layer(&mut self, index: usize) -> LayerId {
        let layer = self.new_layer();
        let id = layer.id;
        self.layers.insert(index.min(self.layers.len()), layer);
        id
    }

    /// Nodes that are not assigned to a layer yet.
    ///
    /// Assigning a node to a layer does not remove it from this list; layering phases clear
    /// the list once every node is placed.
    pub fn layerless_nodes(&self) -> &[NodeId] {
        &self.layerless
    }

    pub fn clear_layerless_nodes(&mut self) {
        self.layerless.clear();
    }

    /// Creates a node directly at the end of `layer`, bypassing the layerless list. Used for
    /// dummies introduced after layering.
    pub fn add_node_to_layer(&mut self, kind: NodeType, layer: LayerId) -> NodeId {
        let id = self.add_node(kind);
        // `add_node` just pushed it.
        self.layerless.pop();
        self.set_layer(id, layer);
        id
    }

    /// Moves `node` to the end of `layer`.
    ///
    /// # Panics
    ///
    /// Panics if `layer` is not part of this graph.
    pub fn set_layer(&mut self, node: NodeId, layer: LayerId) {
        self.detach_from_layer(node);
        let Some(l) = self.layers.iter_mut().find(|l| l.id == layer) else {
            panic!("layer {layer:?} is not part of this graph");
        };
        l.nodes.push(node);
        self.node_mut(node).layer = Some(layer);
    }

    /// Inserts `node` into `layer` at `position`.
    pub fn insert_into_layer(&mut self, node: NodeId, layer: LayerId, position: usize) {
        self.detach_from_layer(node);
        let Some(l) = self.layers.iter_mut().find(|l| l.id == layer) else {
            panic!("layer {layer:?} is not part of this graph");
        };
        let position = position.min(l.nodes.len());
        l.nodes.insert(position, node);
        self.node_mut(node).layer = Some(layer);
    }

    /// Removes `node` from its layer, if it has one.
    pub fn detach_from_layer(&mut self, node: NodeId) {
        let Some(old) = self.node(node).layer else {
            return;
        };
        if let Some(l) = self.layers.iter_mut().find(|l| l.id == old) {
            l.nodes.retain(|n| *n != node);
        }
        self.node_mut(node).layer = None;
    }

    /// Replaces the order of the nodes of layer `index`. `order` must be a permutation of the
    /// layer's current nodes.
    pub fn reorder_layer(&mut self, index: usize, order: Vec<NodeId>) {
        let layer = &mut self.layers[index];
        debug_assert_eq!(layer.nodes.len(), order.len());
        debug_assert!(order.iter().all(|n| layer.nodes.contains(n)));
        layer.nodes = order;
    }

    /// Drops every layer and rebuilds the layering from `layering`, one layer per non-empty
    /// entry, keeping the given in-layer order.
    pub fn replace_layering(&mut self, layering: Vec<Vec<NodeId>>) {
        for layer in std::mem::take(&mut self.layers) {
            for n in layer.nodes {
                if let Some(node) = self.nodes.get_mut(n.0) {
                    node.layer = None;
                }
            }
        }
        for nodes in layering {
            if nodes.is_empty() {
                continue;
            }
            let id = self.append_layer();
            for n in nodes {
                self.set_layer(n, id);
            }
        }
    }

    /// Removes layers without nodes. Returns how many were removed.
    pub fn remove_empty_layers(&mut self) -> usize {
        let before = self.layers.len();
        self.layers.retain(|l| !l.nodes.is_empty());
        before - self.layers.len()
    }

    /// Node handles grouped by layer, in layer order.
    pub fn layer_matrix(&self) -> Vec<Vec<NodeId>> {
        self.layers.iter().map(|l| l.nodes.clone()).collect()
    }
}
