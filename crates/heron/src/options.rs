//! Option keys.
//!
//! [`LayeredOptions`] are user-facing and read from the graph's (or an entity's) property bag,
//! falling back to their declared defaults. [`InternalProperties`] are written by processors
//! and read by later ones. JSON ids can be merged into a bag with
//! [`Properties::merge_json`](crate::graph::Properties::merge_json):
//!
//! ```
//! use heron::graph::LGraph;
//! use heron::options::{LayeredOptions, NodePromotionStrategy};
//!
//! let mut g = LGraph::new();
//! g.properties
//!     .merge_json(&serde_json::json!({
//!         "heron.layering.nodePromotion.strategy": "NIKOLOV_PIXEL",
//!         "heron.spacing.nodeNode": 30.0,
//!     }))
//!     .unwrap();
//! assert_eq!(
//!     g.properties.get(&LayeredOptions::NODE_PROMOTION_STRATEGY),
//!     NodePromotionStrategy::NikolovPixel
//! );
//! ```

use heron_graph::{LabelId, PortId, PortSide, Properties, Property, Size};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayeringStrategy {
    /// Longest path measured from the sinks; sinks share the last layer.
    #[default]
    LongestPath,
    /// Longest path measured from the sources; sources share the first layer.
    LongestPathSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodePromotionStrategy {
    #[default]
    None,
    /// Promote while dummies shrink; never exceed the initial widest layer (node count).
    Nikolov,
    /// As `Nikolov`, with widths estimated in pixels.
    NikolovPixel,
    /// Unbounded first; bounded re-run if the widest layer grew.
    NikolovImproved,
    NikolovImprovedPixel,
    /// Unbounded, at most `maxIterations`% of the node count sweeps.
    NodeCountPercentage,
    /// Unbounded, stops once `maxIterations`% of the dummies are gone.
    DummyNodePercentage,
    /// Unbounded, no stop criterion besides convergence.
    NoBoundary,
    ModelOrderLeftToRight,
    ModelOrderRightToLeft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PortLabelSide {
    #[default]
    Outside,
    Inside,
    /// Node port labels keep the position they were given; external port labels stack from
    /// the dummy's origin.
    Fixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PortLabelPlacement {
    pub side: PortLabelSide,
    /// Center labels on the port when nothing else competes for the space next to it.
    pub next_to_port_if_possible: bool,
}

impl PortLabelPlacement {
    pub const OUTSIDE: PortLabelPlacement = PortLabelPlacement {
        side: PortLabelSide::Outside,
        next_to_port_if_possible: false,
    };

    pub const INSIDE: PortLabelPlacement = PortLabelPlacement {
        side: PortLabelSide::Inside,
        next_to_port_if_possible: false,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EdgeLabelPlacement {
    #[default]
    Center,
    Head,
    Tail,
}

/// Structural facts about the input graph, computed once before configuring the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GraphProperties {
    pub external_ports: bool,
    pub center_labels: bool,
    pub end_labels: bool,
    pub self_loops: bool,
}

pub struct LayeredOptions;

impl LayeredOptions {
    pub const LAYERING_STRATEGY: Property<LayeringStrategy> =
        Property::new("heron.layering.strategy", LayeringStrategy::LongestPath);
    pub const NODE_PROMOTION_STRATEGY: Property<NodePromotionStrategy> = Property::new(
        "heron.layering.nodePromotion.strategy",
        NodePromotionStrategy::None,
    );
    /// Percentage bound used by the percentage promotion strategies.
    pub const NODE_PROMOTION_MAX_ITERATIONS: Property<u32> =
        Property::new("heron.layering.nodePromotion.maxIterations", 0);
    pub const CROSSING_MINIMIZATION_SWEEPS: Property<u32> =
        Property::new("heron.crossingMinimization.sweeps", 4);

    pub const SPACING_NODE_NODE: Property<f64> = Property::new("heron.spacing.nodeNode", 20.0);
    pub const SPACING_EDGE_NODE: Property<f64> = Property::new("heron.spacing.edgeNode", 10.0);
    pub const SPACING_EDGE_NODE_BETWEEN_LAYERS: Property<f64> =
        Property::new("heron.spacing.edgeNodeBetweenLayers", 10.0);
    pub const SPACING_NODE_NODE_BETWEEN_LAYERS: Property<f64> =
        Property::new("heron.spacing.nodeNodeBetweenLayers", 20.0);
    pub const SPACING_LABEL_LABEL: Property<f64> = Property::new("heron.spacing.labelLabel", 0.0);
    pub const SPACING_EDGE_LABEL: Property<f64> = Property::new("heron.spacing.edgeLabel", 2.0);
    pub const SPACING_LABEL_PORT_HORIZONTAL: Property<f64> =
        Property::new("heron.spacing.labelPortHorizontal", 1.0);
    pub const SPACING_LABEL_PORT_VERTICAL: Property<f64> =
        Property::new("heron.spacing.labelPortVertical", 1.0);
    pub const SPACING_LABEL_NODE: Property<f64> = Property::new("heron.spacing.labelNode", 5.0);
    pub const SPACING_PORT_PORT: Property<f64> = Property::new("heron.spacing.portPort", 10.0);

    pub const PORT_LABELS_PLACEMENT: Property<PortLabelPlacement> =
        Property::new("heron.portLabels.placement", PortLabelPlacement::OUTSIDE);
    pub const PORT_LABELS_TREAT_AS_GROUP: Property<bool> =
        Property::new("heron.portLabels.treatAsGroup", true);
    /// Set on edge labels.
    pub const EDGE_LABELS_PLACEMENT: Property<EdgeLabelPlacement> =
        Property::new("heron.edgeLabels.placement", EdgeLabelPlacement::Center);
    /// Lower bound for computed node sizes; set on nodes.
    pub const NODE_SIZE_MINIMUM: Property<Size> =
        Property::new("heron.nodeSize.minimum", Size::new(0.0, 0.0));
    /// Position of a node in the input model. Used by the model-order promotion strategies.
    pub const MODEL_ORDER: Property<i64> = Property::new("heron.modelOrder", 0);
}

pub struct InternalProperties;

impl InternalProperties {
    /// The edge was reversed to break a cycle.
    pub const REVERSED: Property<bool> = Property::new("heron.internal.reversed", false);
    /// Center labels carried by a label dummy.
    pub const REPRESENTED_LABELS: Property<Vec<LabelId>> =
        Property::new("heron.internal.representedLabels", Vec::new());
    pub const LONG_EDGE_SOURCE: Property<Option<PortId>> =
        Property::new("heron.internal.longEdgeSource", None);
    pub const LONG_EDGE_TARGET: Property<Option<PortId>> =
        Property::new("heron.internal.longEdgeTarget", None);
    /// Side of the enclosing graph an external port dummy stands in for.
    pub const EXT_PORT_SIDE: Property<PortSide> =
        Property::new("heron.internal.externalPortSide", PortSide::Undefined);
    /// Set on the port of an external port dummy that connects to nodes outside the graph.
    pub const CONNECTED_TO_EXTERNAL_NODES: Property<bool> =
        Property::new("heron.internal.connectedToExternalNodes", false);
    pub const GRAPH_PROPERTIES: Property<GraphProperties> = Property::new(
        "heron.internal.graphProperties",
        GraphProperties {
            external_ports: false,
            center_labels: false,
            end_labels: false,
            self_loops: false,
        },
    );
    pub const GRAPH_SIZE: Property<Size> =
        Property::new("heron.internal.graphSize", Size::new(0.0, 0.0));
}

/// Reads `property` from `local`, falling back to `global` and then to the default.
pub fn get_with_fallback<T>(local: &Properties, global: &Properties, property: &Property<T>) -> T
where
    T: Clone + DeserializeOwned,
{
    local
        .get_opt(property)
        .unwrap_or_else(|| global.get(property))
}
