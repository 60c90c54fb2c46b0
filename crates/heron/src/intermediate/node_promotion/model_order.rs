//! Promotion that makes layers agree with the input model order.
//!
//! Left to right, a node moves one layer right when it has the highest model order of its
//! layer and the next layer holds a node with a lower one. Right to left mirrors this. Nodes
//! without a model order never move on their own, only when a promoted neighbour would end
//! up in their layer.

use super::bi_layer_map::BiLayerMap;
use crate::options::LayeredOptions;
use heron_graph::{LGraph, NodeId, NodeType};
use indexmap::IndexSet;
use rustc_hash::{FxBuildHasher, FxHashMap as HashMap};

type NodeSet = IndexSet<NodeId, FxBuildHasher>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    LeftToRight,
    RightToLeft,
}

impl Direction {
    fn step(self) -> i64 {
        match self {
            Direction::LeftToRight => 1,
            Direction::RightToLeft => -1,
        }
    }

    /// Whether a node with model order `a` belongs further along this direction than one
    /// with model order `b`.
    fn after(self, a: i64, b: i64) -> bool {
        match self {
            Direction::LeftToRight => a > b,
            Direction::RightToLeft => a < b,
        }
    }
}

pub(super) fn promote(graph: &mut LGraph, direction: Direction) {
    let mut model_order: HashMap<NodeId, i64> = HashMap::default();
    for layer in graph.layers() {
        for &n in layer.nodes() {
            let properties = &graph.node(n).properties;
            if let Some(order) = properties.get_opt(&LayeredOptions::MODEL_ORDER) {
                model_order.insert(n, order);
            }
        }
    }

    let mut map = BiLayerMap::default();
    for (l, layer) in graph.layers().iter().enumerate() {
        map.put_all(l as i64, sorted_by_model_order(layer.nodes(), &model_order, direction));
    }

    let promoter = Promoter {
        graph: &*graph,
        model_order: &model_order,
        direction,
    };
    promoter.run(&mut map);

    graph.replace_layering(map.into_layering());
}

/// Orders the nodes that have a model order so that the ones that belong furthest along
/// `direction` come first. Nodes without a model order keep their positions.
fn sorted_by_model_order(
    nodes: &[NodeId],
    model_order: &HashMap<NodeId, i64>,
    direction: Direction,
) -> Vec<NodeId> {
    let slots: Vec<usize> = (0..nodes.len())
        .filter(|i| model_order.contains_key(&nodes[*i]))
        .collect();
    let mut ordered: Vec<NodeId> = slots.iter().map(|i| nodes[*i]).collect();
    ordered.sort_by(|a, b| {
        let (a, b) = (model_order.get(a), model_order.get(b));
        match direction {
            Direction::LeftToRight => b.cmp(&a),
            Direction::RightToLeft => a.cmp(&b),
        }
    });

    let mut out = nodes.to_vec();
    for (slot, node) in slots.into_iter().zip(ordered) {
        out[slot] = node;
    }
    out
}

struct Promoter<'a> {
    graph: &'a LGraph,
    model_order: &'a HashMap<NodeId, i64>,
    direction: Direction,
}

impl Promoter<'_> {
    fn run(&self, map: &mut BiLayerMap) {
        let n = self.model_order.len().max(1);
        let max_sweeps = n * (map.keys().len() + n) + 1;

        for sweep in 0.. {
            if sweep >= max_sweeps {
                tracing::warn!(sweeps = sweep, "model order promotion did not settle");
                break;
            }
            let keys = map.keys();
            if keys.len() < 2 {
                break;
            }
            let sweep_keys: Vec<i64> = match self.direction {
                Direction::LeftToRight => keys[..keys.len() - 1].iter().rev().copied().collect(),
                Direction::RightToLeft => keys[1..].to_vec(),
            };

            let mut changed = false;
            for key in sweep_keys {
                let mut i = 0;
                while i < map.values(key).len() {
                    let node = map.values(key)[i];
                    if self.try_promote(map, key, node) {
                        // `node` left this layer; the next node moved into slot `i`.
                        changed = true;
                    } else {
                        i += 1;
                    }
                }
            }
            if !changed {
                break;
            }
        }
    }

    fn try_promote(&self, map: &mut BiLayerMap, key: i64, node: NodeId) -> bool {
        let Some(&order) = self.model_order.get(&node) else {
            return false;
        };
        let at_end = match self.direction {
            Direction::LeftToRight => map.is_max_key(key),
            Direction::RightToLeft => map.is_min_key(key),
        };
        if at_end {
            return false;
        }
        let blocked_here = map.values(key).iter().any(|other| {
            self.model_order
                .get(other)
                .is_some_and(|o| self.direction.after(*o, order))
        });
        if blocked_here {
            return false;
        }

        let mut order_allows = false;
        let mut through_labels = true;
        let mut contains_labels = false;
        for &next in map.values(key + self.direction.step()) {
            if let Some(&other) = self.model_order.get(&next) {
                if next != node {
                    order_allows |= self.direction.after(order, other);
                    through_labels = false;
                }
            } else if !order_allows
                && through_labels
                && self.graph.node(next).kind() == NodeType::Label
            {
                contains_labels = true;
                if !self.label_passable(map, next, node) {
                    through_labels = false;
                }
            }
        }
        if contains_labels && through_labels && self.has_short_edge(map, node) {
            through_labels = false;
        }
        if !(order_allows || through_labels) {
            return false;
        }

        let mut worklist: NodeSet = self.promote_one(map, node);
        while let Some(next) = worklist.shift_remove_index(0) {
            let more = self.promote_one(map, next);
            worklist.extend(more);
        }
        true
    }

    /// A label dummy attached to `node` can be jumped over only if its edge keeps spanning
    /// more than two layers. Label dummies always have one edge on each side; one without
    /// edges blocks.
    fn label_passable(&self, map: &BiLayerMap, label: NodeId, node: NodeId) -> bool {
        let (near, far) = match self.direction {
            Direction::LeftToRight => (
                self.graph.predecessors(label).next(),
                self.graph.successors(label).next(),
            ),
            Direction::RightToLeft => (
                self.graph.successors(label).next(),
                self.graph.predecessors(label).next(),
            ),
        };
        let Some(near) = near else {
            return false;
        };
        if near != node {
            return true;
        }
        let Some(far) = far else {
            return false;
        };
        self.distance(map, near, far).is_none_or(|d| d > 2)
    }

    /// Whether `node` has an edge toward the promotion direction to a normal node at most two
    /// layers away. Self-loops are ignored.
    fn has_short_edge(&self, map: &BiLayerMap, node: NodeId) -> bool {
        self.neighbours_ahead(node).into_iter().any(|other| {
            self.graph.node(other).kind() == NodeType::Normal
                && self.distance(map, node, other).is_some_and(|d| d <= 2)
        })
    }

    /// Layers from `from` to `to`, counted along the promotion direction.
    fn distance(&self, map: &BiLayerMap, from: NodeId, to: NodeId) -> Option<i64> {
        Some((map.key(to)? - map.key(from)?) * self.direction.step())
    }

    fn neighbours_ahead(&self, node: NodeId) -> Vec<NodeId> {
        let neighbours: Vec<NodeId> = match self.direction {
            Direction::LeftToRight => self.graph.successors(node).collect(),
            Direction::RightToLeft => self.graph.predecessors(node).collect(),
        };
        neighbours.into_iter().filter(|n| *n != node).collect()
    }

    /// Moves `node` one layer along and returns the neighbours it now shares a layer with.
    fn promote_one(&self, map: &mut BiLayerMap, node: NodeId) -> NodeSet {
        let Some(old) = map.key(node) else {
            return NodeSet::default();
        };
        let new = old + self.direction.step();
        map.put(new, node);
        self.neighbours_ahead(node)
            .into_iter()
            .filter(|n| map.key(*n) == Some(new))
            .collect()
    }
}
