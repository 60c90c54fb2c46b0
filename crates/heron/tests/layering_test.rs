use heron::NullMonitor;
use heron::graph::{LGraph, NodeId, NodeType};
use heron::p2_layers::{LongestPathLayerer, LongestPathSourceLayerer};
use heron::processor::LayoutProcessor;

fn graph_with(names: &[&str], edges: &[(&str, &str)]) -> LGraph {
    let mut g = LGraph::new();
    for n in names {
        g.add_named_node(*n, NodeType::Normal);
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

fn named_layers(g: &LGraph) -> Vec<Vec<String>> {
    g.layers()
        .iter()
        .map(|l| {
            l.nodes()
                .iter()
                .map(|n| g.node(*n).name().unwrap().to_string())
                .collect()
        })
        .collect()
}

fn assert_valid_layering(g: &LGraph) {
    assert!(g.layerless_nodes().is_empty());
    for node in g.nodes() {
        assert!(g.node_layer_index(node.id()).is_some(), "{:?} unlayered", node.id());
    }
    for layer in g.layers() {
        assert!(!layer.is_empty());
    }
    for e in g.edge_ids() {
        if g.is_self_loop(e) {
            continue;
        }
        let s = g.node_layer_index(g.edge_source_node(e)).unwrap();
        let t = g.node_layer_index(g.edge_target_node(e)).unwrap();
        assert!(s < t, "edge {e:?} goes from layer {s} to {t}");
    }
}

fn sample() -> LGraph {
    graph_with(
        &["a", "b", "c", "d", "e", "f", "g"],
        &[
            ("a", "b"),
            ("a", "c"),
            ("b", "d"),
            ("c", "d"),
            ("d", "e"),
            ("a", "e"),
            ("f", "e"),
            ("g", "g"),
        ],
    )
}

#[test]
fn longest_path_puts_sinks_into_the_last_layer() {
    let mut g = graph_with(&["a", "b", "c", "d"], &[("a", "b"), ("b", "c")]);
    LongestPathLayerer.process(&mut g, &mut NullMonitor);

    assert_eq!(named_layers(&g), vec![vec!["a"], vec!["b"], vec!["c", "d"]]);
    assert_valid_layering(&g);
}

#[test]
fn longest_path_source_puts_sources_into_the_first_layer() {
    let mut g = graph_with(&["a", "b", "c", "d"], &[("a", "b"), ("b", "c")]);
    LongestPathSourceLayerer.process(&mut g, &mut NullMonitor);

    assert_eq!(named_layers(&g), vec![vec!["a", "d"], vec!["b"], vec!["c"]]);
    assert_valid_layering(&g);
}

#[test]
fn longest_path_fills_layers_in_visit_finish_order() {
    let mut g = graph_with(&["p", "q", "r"], &[("p", "r")]);
    LongestPathLayerer.process(&mut g, &mut NullMonitor);
    assert_eq!(named_layers(&g), vec![vec!["p"], vec!["r", "q"]]);
}

#[test]
fn longest_path_source_fills_layers_in_visit_finish_order() {
    let mut g = graph_with(&["p", "q", "r"], &[("r", "p")]);
    LongestPathSourceLayerer.process(&mut g, &mut NullMonitor);
    assert_eq!(named_layers(&g), vec![vec!["r", "q"], vec!["p"]]);
}

#[test]
fn longest_path_layerings_are_valid() {
    let mut g = sample();
    LongestPathLayerer.process(&mut g, &mut NullMonitor);
    assert_valid_layering(&g);
    assert_eq!(g.layer_count(), 4);
    assert_eq!(g.node_layer_index(id(&g, "f")), Some(2));

    let mut g = sample();
    LongestPathSourceLayerer.process(&mut g, &mut NullMonitor);
    assert_valid_layering(&g);
    assert_eq!(g.layer_count(), 4);
    assert_eq!(g.node_layer_index(id(&g, "f")), Some(0));
}

#[test]
fn longest_path_layerings_are_deterministic() {
    let run = |source: bool| {
        let mut g = sample();
        if source {
            LongestPathSourceLayerer.process(&mut g, &mut NullMonitor);
        } else {
            LongestPathLayerer.process(&mut g, &mut NullMonitor);
        }
        named_layers(&g)
    };
    assert_eq!(run(false), run(false));
    assert_eq!(run(true), run(true));
}

#[test]
fn longest_path_ignores_self_loops() {
    let mut g = graph_with(&["a", "b"], &[("a", "a"), ("a", "b"), ("b", "b")]);
    LongestPathLayerer.process(&mut g, &mut NullMonitor);
    assert_eq!(named_layers(&g), vec![vec!["a"], vec!["b"]]);
}

#[test]
fn longest_path_on_an_empty_graph_creates_no_layers() {
    let mut g = LGraph::new();
    LongestPathLayerer.process(&mut g, &mut NullMonitor);
    assert_eq!(g.layer_count(), 0);
    LongestPathSourceLayerer.process(&mut g, &mut NullMonitor);
    assert_eq!(g.layer_count(), 0);
}
