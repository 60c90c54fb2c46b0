//! Dense per-phase node numbering.
//!
//! Phases that keep per-node scratch arrays number their nodes `0..n` with a [`DenseIndex`]
//! instead of writing scratch ids into the nodes themselves. The index lives as long as the
//! phase's working state.

use crate::graph::NodeId;

#[derive(Debug, Clone, Default)]
pub struct DenseIndex {
    nodes: Vec<NodeId>,
    slots: Vec<Option<u32>>,
}

impl DenseIndex {
    /// Numbers `nodes` in iteration order. Duplicates keep their first number.
    pub fn new(nodes: impl IntoIterator<Item = NodeId>) -> Self {
        let mut out = Self::default();
        for n in nodes {
            let ix = n.index();
            if ix >= out.slots.len() {
                out.slots.resize(ix + 1, None);
            }
            if out.slots[ix].is_some() {
                continue;
            }
            out.slots[ix] = Some(out.nodes.len() as u32);
            out.nodes.push(n);
        }
        out
    }

    pub fn get(&self, node: NodeId) -> Option<usize> {
        self.slots
            .get(node.index())
            .copied()
            .flatten()
            .map(|ix| ix as usize)
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.get(node).is_some()
    }

    /// # Panics
    ///
    /// Panics if `ix >= self.len()`.
    pub fn node(&self, ix: usize) -> NodeId {
        self.nodes[ix]
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
