use heron_graph::NodeId;
use rustc_hash::FxHashMap as HashMap;
use std::collections::BTreeMap;

/// Layer key -> ordered nodes, and node -> layer key.
///
/// Keys whose node list runs empty are dropped, so the minimal and maximal keys are always
/// occupied layers.
#[derive(Debug, Default)]
pub(super) struct BiLayerMap {
    layers: BTreeMap<i64, Vec<NodeId>>,
    key_of: HashMap<NodeId, i64>,
}

impl BiLayerMap {
    pub(super) fn put_all(&mut self, key: i64, nodes: impl IntoIterator<Item = NodeId>) {
        for n in nodes {
            self.put(key, n);
        }
    }

    /// Moves `node` to the end of layer `key`.
    pub(super) fn put(&mut self, key: i64, node: NodeId) {
        if let Some(old) = self.key_of.insert(node, key) {
            if let Some(list) = self.layers.get_mut(&old) {
                list.retain(|n| *n != node);
                if list.is_empty() {
                    self.layers.remove(&old);
                }
            }
        }
        self.layers.entry(key).or_default().push(node);
    }

    pub(super) fn key(&self, node: NodeId) -> Option<i64> {
        self.key_of.get(&node).copied()
    }

    pub(super) fn values(&self, key: i64) -> &[NodeId] {
        self.layers.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(super) fn keys(&self) -> Vec<i64> {
        self.layers.keys().copied().collect()
    }

    pub(super) fn is_max_key(&self, key: i64) -> bool {
        self.layers.last_key_value().is_some_and(|(k, _)| *k == key)
    }

    pub(super) fn is_min_key(&self, key: i64) -> bool {
        self.layers.first_key_value().is_some_and(|(k, _)| *k == key)
    }

    /// Node lists in key order.
    pub(super) fn into_layering(self) -> Vec<Vec<NodeId>> {
        self.layers.into_values().collect()
    }
}

