use heron::configurator::analyze;
use heron::graph::{LGraph, NodeId, NodeType, PortSide, Size};
use heron::intermediate::IntermediateProcessorStrategy as Proc;
use heron::node_size::NodeSizeCalculator;
use heron::options::{
    EdgeLabelPlacement, GraphProperties, InternalProperties, LayeredOptions,
    NodePromotionStrategy,
};
use heron::processor::Step;
use heron::{BasicProgressMonitor, Error, LayeredLayout, LayeredPhase, NullMonitor, ProgressMonitor};
use std::sync::Arc;

fn graph_with(names: &[&str], edges: &[(&str, &str)]) -> LGraph {
    let mut g = LGraph::new();
    for n in names {
        let id = g.add_named_node(*n, NodeType::Normal);
        g.node_mut(id).size = Size::new(30.0, 20.0);
    }
    for (a, b) in edges {
        let (a, b) = (id(&g, a), id(&g, b));
        g.connect(a, b);
    }
    g
}

fn id(g: &LGraph, name: &str) -> NodeId {
    g.node_by_name(name).unwrap()
}

fn endpoints(g: &LGraph) -> Vec<(NodeId, NodeId)> {
    g.edge_ids()
        .into_iter()
        .map(|e| (g.edge_source_node(e), g.edge_target_node(e)))
        .collect()
}

fn assert_no_dummies(g: &LGraph) {
    assert!(g.nodes().all(|n| !n.kind().is_dummy()));
    for layer in g.layers() {
        for n in layer.nodes() {
            assert!(!g.node(*n).kind().is_dummy());
        }
    }
}

#[test]
fn layout_places_a_chain_left_to_right() {
    let mut g = graph_with(&["a", "b", "c", "d"], &[("a", "b"), ("b", "c")]);
    heron::layout(&mut g, &mut NullMonitor).unwrap();

    let x = |n: &str| g.node(id(&g, n)).position.x;
    let y = |n: &str| g.node(id(&g, n)).position.y;
    assert_eq!(g.layer_count(), 3);
    assert_eq!((x("a"), x("b"), x("c"), x("d")), (0.0, 50.0, 100.0, 100.0));
    assert_eq!(y("a"), 20.0);
    assert_eq!(y("b"), 20.0);
    let mut last: Vec<f64> = vec![y("c"), y("d")];
    last.sort_by(f64::total_cmp);
    assert_eq!(last, vec![0.0, 40.0]);
    assert_eq!(
        g.properties.get(&InternalProperties::GRAPH_SIZE),
        Size::new(130.0, 60.0)
    );
    assert!(g.edges().all(|e| e.bend_points.is_empty()));
}

#[test]
fn layout_of_an_empty_graph_succeeds() {
    let mut g = LGraph::new();
    heron::layout(&mut g, &mut NullMonitor).unwrap();
    assert_eq!(g.layer_count(), 0);
    assert_eq!(
        g.properties.get(&InternalProperties::GRAPH_SIZE),
        Size::new(0.0, 0.0)
    );
}

#[test]
fn layout_restores_edges_reversed_to_break_cycles() {
    let mut g = graph_with(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("c", "a")]);
    let before = endpoints(&g);

    heron::layout(&mut g, &mut NullMonitor).unwrap();

    assert_eq!(endpoints(&g), before);
    assert_no_dummies(&g);
    assert_eq!(g.node_count(), 3);
    assert!(
        g.edges()
            .all(|e| !e.properties.has(&InternalProperties::REVERSED))
    );
    let back = g
        .edge_ids()
        .into_iter()
        .find(|e| g.edge_source_node(*e) == id(&g, "c"))
        .unwrap();
    assert_eq!(g.edge(back).bend_points.len(), 1);
    assert_eq!(g.edge(back).bend_points[0].x, 65.0);
}

#[test]
fn layout_bends_long_edges_through_every_skipped_layer() {
    let mut g = graph_with(
        &["a", "b", "c", "d"],
        &[("a", "b"), ("b", "c"), ("c", "d"), ("a", "d")],
    );
    heron::layout(&mut g, &mut NullMonitor).unwrap();

    assert_no_dummies(&g);
    assert_eq!(g.edge_count(), 4);
    let (a, d) = (id(&g, "a"), id(&g, "d"));
    let long = g
        .edge_ids()
        .into_iter()
        .find(|e| g.edge_source_node(*e) == a && g.edge_target_node(*e) == d)
        .unwrap();
    let xs: Vec<f64> = g.edge(long).bend_points.iter().map(|p| p.x).collect();
    assert_eq!(xs, vec![65.0, 115.0]);
}

#[test]
fn layout_gives_center_labels_their_own_layer() {
    let mut g = graph_with(&["a", "b"], &[("a", "b")]);
    let e = g.edge_ids()[0];
    let label = g.add_edge_label(e, Size::new(10.0, 5.0));

    heron::layout(&mut g, &mut NullMonitor).unwrap();

    assert_eq!(g.layer_count(), 3);
    assert_no_dummies(&g);
    assert_eq!(g.edge(e).labels, vec![label]);
    assert_eq!(g.label(label).position.x, 50.0);
    assert_eq!(g.node(id(&g, "b")).position.x, 80.0);
    assert_eq!(g.edge_target_node(e), id(&g, "b"));
}

#[test]
fn layout_routes_self_loops_around_the_node() {
    let mut g = graph_with(&["a", "b"], &[("a", "a"), ("a", "b")]);
    heron::layout(&mut g, &mut NullMonitor).unwrap();

    let self_loop = g
        .edge_ids()
        .into_iter()
        .find(|e| g.is_self_loop(*e))
        .unwrap();
    let route = &g.edge(self_loop).bend_points;
    assert_eq!(route.len(), 4);
    let a = g.node(id(&g, "a"));
    assert!(route.iter().all(|p| p.y <= a.position.y + a.size.height));
    assert!(route[1].y < a.position.y);
    assert_eq!(g.layer_count(), 2);
}

#[test]
fn layout_applies_node_promotion() {
    let mut g = graph_with(
        &["a", "b", "c", "d", "e", "u"],
        &[
            ("a", "b"),
            ("b", "c"),
            ("c", "d"),
            ("d", "e"),
            ("a", "u"),
            ("b", "u"),
            ("u", "e"),
        ],
    );
    g.properties.set(
        &LayeredOptions::NODE_PROMOTION_STRATEGY,
        NodePromotionStrategy::Nikolov,
    );

    heron::layout(&mut g, &mut NullMonitor).unwrap();

    assert_eq!(g.node_layer_index(id(&g, "u")), Some(2));
    assert_no_dummies(&g);
}

#[test]
fn layout_uses_the_configured_node_size_calculator() {
    struct Square(f64);
    impl NodeSizeCalculator for Square {
        fn calculate(&self, graph: &mut LGraph, nodes: &[NodeId]) {
            for n in nodes {
                graph.node_mut(*n).size = Size::new(self.0, self.0);
            }
        }
    }

    let mut g = graph_with(&["a", "b"], &[("a", "b")]);
    LayeredLayout::new()
        .with_node_size_calculator(Arc::new(Square(7.0)))
        .run(&mut g, &mut NullMonitor)
        .unwrap();

    assert_eq!(g.node(id(&g, "a")).size, Size::new(7.0, 7.0));
    assert_eq!(g.node(id(&g, "b")).position.x, 27.0);
}

#[test]
fn plan_for_a_plain_graph() {
    let g = graph_with(&["a", "b"], &[("a", "b")]);
    assert_eq!(
        LayeredLayout::new().plan(&g).unwrap(),
        vec![
            Step::Phase(LayeredPhase::P1CycleBreaking),
            Step::Phase(LayeredPhase::P2Layering),
            Step::Processor(Proc::LongEdgeSplitter),
            Step::Phase(LayeredPhase::P3NodeOrdering),
            Step::Processor(Proc::LabelAndNodeSizeProcessor),
            Step::Phase(LayeredPhase::P4NodePlacement),
            Step::Phase(LayeredPhase::P5EdgeRouting),
            Step::Processor(Proc::LongEdgeJoiner),
            Step::Processor(Proc::ReversedEdgeRestorer),
        ]
    );
}

#[test]
fn plan_adds_promotion_and_label_dummies_on_demand() {
    let mut g = graph_with(&["a", "b"], &[("a", "b")]);
    let e = g.edge_ids()[0];
    g.add_edge_label(e, Size::new(10.0, 5.0));
    g.properties.set(
        &LayeredOptions::NODE_PROMOTION_STRATEGY,
        NodePromotionStrategy::ModelOrderLeftToRight,
    );

    let plan = LayeredLayout::new().plan(&g).unwrap();
    assert_eq!(
        &plan[..5],
        &[
            Step::Phase(LayeredPhase::P1CycleBreaking),
            Step::Processor(Proc::LabelDummyInserter),
            Step::Phase(LayeredPhase::P2Layering),
            Step::Processor(Proc::NodePromotion),
            Step::Processor(Proc::LongEdgeSplitter),
        ]
    );
    assert_eq!(plan.len(), 11);
    assert_eq!(plan, LayeredLayout::new().plan(&g).unwrap());
}

#[test]
fn analyze_reports_structural_features() {
    let mut g = graph_with(&["a", "b"], &[("a", "b"), ("b", "b")]);
    assert_eq!(
        analyze(&g),
        GraphProperties {
            self_loops: true,
            ..GraphProperties::default()
        }
    );

    let edges = g.edge_ids();
    let head = g.add_edge_label(edges[0], Size::new(1.0, 1.0));
    g.label_mut(head)
        .properties
        .set(&LayeredOptions::EDGE_LABELS_PLACEMENT, EdgeLabelPlacement::Head);
    // Center labels on self-loops do not need a label dummy.
    g.add_edge_label(edges[1], Size::new(1.0, 1.0));
    let port = g.add_node(NodeType::ExternalPort);
    g.add_port(port, PortSide::East);

    assert_eq!(
        analyze(&g),
        GraphProperties {
            external_ports: true,
            center_labels: false,
            end_labels: true,
            self_loops: true,
        }
    );
}

#[test]
fn layout_records_the_analysis_on_the_graph() {
    let mut g = graph_with(&["a"], &[("a", "a")]);
    heron::layout(&mut g, &mut NullMonitor).unwrap();
    assert!(
        g.properties
            .get(&InternalProperties::GRAPH_PROPERTIES)
            .self_loops
    );
}

#[test]
fn layout_canceled_up_front_leaves_the_graph_unlayered() {
    let mut g = graph_with(&["a", "b"], &[("a", "b")]);
    let mut monitor = BasicProgressMonitor::new();
    monitor.cancel_handle().cancel();

    let err = heron::layout(&mut g, &mut monitor).unwrap_err();

    assert!(matches!(err, Error::Canceled));
    assert_eq!(err.to_string(), "layout was canceled");
    assert_eq!(g.layer_count(), 0);
    assert_eq!(g.layerless_nodes().len(), 2);
    assert!(!g.properties.has(&InternalProperties::GRAPH_PROPERTIES));
    assert_eq!(monitor.progress(), None);
}

#[derive(Debug, Default)]
struct CancelAfter {
    remaining: usize,
    tags: Vec<String>,
}

impl ProgressMonitor for CancelAfter {
    fn begin(&mut self, _task: &str, _total_work: f64) {}

    fn done(&mut self) {}

    fn log_graph(&mut self, _graph: &LGraph, tag: &str) {
        self.tags.push(tag.to_string());
        self.remaining = self.remaining.saturating_sub(1);
    }

    fn is_canceled(&self) -> bool {
        self.remaining == 0
    }
}

#[test]
fn layout_cancellation_is_checked_between_processors() {
    let mut g = graph_with(&["a", "b", "c"], &[("a", "b"), ("a", "c"), ("b", "c")]);
    let mut monitor = CancelAfter {
        remaining: 2,
        ..CancelAfter::default()
    };

    let result = LayeredLayout::new().run(&mut g, &mut monitor);

    assert!(matches!(result, Err(Error::Canceled)));
    assert_eq!(
        monitor.tags,
        vec!["Phase(P1CycleBreaking)", "Phase(P2Layering)"]
    );
    assert_eq!(g.layer_count(), 3);
    assert_no_dummies(&g);
}

#[test]
fn layout_snapshots_every_step() {
    let mut g = graph_with(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("a", "c")]);
    let mut monitor = BasicProgressMonitor::new().with_snapshots();

    heron::layout(&mut g, &mut monitor).unwrap();

    let snapshots = monitor.snapshots();
    let tags: Vec<&str> = snapshots.iter().map(|s| s.tag.as_str()).collect();
    assert_eq!(
        tags,
        vec![
            "Phase(P1CycleBreaking)",
            "Phase(P2Layering)",
            "Processor(LongEdgeSplitter)",
            "Phase(P3NodeOrdering)",
            "Processor(LabelAndNodeSizeProcessor)",
            "Phase(P4NodePlacement)",
            "Phase(P5EdgeRouting)",
            "Processor(LongEdgeJoiner)",
            "Processor(ReversedEdgeRestorer)",
        ]
    );
    assert!(snapshots[0].layers.is_empty());
    assert_eq!(snapshots[0].layerless.len(), 3);
    assert_eq!(snapshots[1].layers.len(), 3);
    assert!(snapshots[1].layerless.is_empty());
    // The splitter adds one dummy to the middle layer; the joiner removes it again.
    assert_eq!(snapshots[2].layers[1].len(), 2);
    assert_eq!(snapshots[7].layers[1].len(), 1);
    assert_eq!(monitor.progress(), None);
}
