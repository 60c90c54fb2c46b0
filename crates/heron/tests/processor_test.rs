use heron::processor::{ConfigurationError, LayoutProcessorConfiguration, Placement, Step, resolve};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    A,
    B,
    C,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum Proc {
    X,
    Y,
    Z,
    W,
}

const PHASES: [Phase; 3] = [Phase::A, Phase::B, Phase::C];

type Config = LayoutProcessorConfiguration<Phase, Proc>;

fn p(phase: Phase) -> Step<Phase, Proc> {
    Step::Phase(phase)
}

fn k(processor: Proc) -> Step<Phase, Proc> {
    Step::Processor(processor)
}

#[test]
fn resolve_without_processors_yields_the_phases() {
    let config = Config::new();
    assert!(config.is_empty());
    assert_eq!(
        resolve(&PHASES, &config).unwrap(),
        vec![p(Phase::A), p(Phase::B), p(Phase::C)]
    );
}

#[test]
fn resolve_after_a_phase_and_before_the_next_share_a_slot() {
    let mut config = Config::new();
    config.add_after(Phase::A, Proc::Y).add_before(Phase::B, Proc::X);

    assert_eq!(
        resolve(&PHASES, &config).unwrap(),
        vec![p(Phase::A), k(Proc::X), k(Proc::Y), p(Phase::B), p(Phase::C)]
    );
}

#[test]
fn resolve_places_processors_before_the_first_and_after_the_last_phase() {
    let mut config = Config::new();
    config.add_after(Phase::C, Proc::Y).add_before(Phase::A, Proc::X);

    assert_eq!(
        resolve(&PHASES, &config).unwrap(),
        vec![k(Proc::X), p(Phase::A), p(Phase::B), p(Phase::C), k(Proc::Y)]
    );
}

#[test]
fn resolve_same_slot_runs_after_its_anchor_regardless_of_id_order() {
    let mut config = Config::new();
    config
        .add_after(Phase::A, Proc::Z)
        .add_same_slot(Proc::Z, Proc::X);

    assert_eq!(
        resolve(&PHASES, &config).unwrap(),
        vec![p(Phase::A), k(Proc::Z), k(Proc::X), p(Phase::B), p(Phase::C)]
    );
}

#[test]
fn resolve_orders_a_slot_topologically_then_by_id() {
    let mut config = Config::new();
    config
        .add_before(Phase::C, Proc::W)
        .add_same_slot(Proc::W, Proc::X)
        .add_same_slot(Proc::X, Proc::Y)
        .add_before(Phase::C, Proc::Z);

    assert_eq!(
        resolve(&PHASES, &config).unwrap(),
        vec![
            p(Phase::A),
            p(Phase::B),
            k(Proc::Z),
            k(Proc::W),
            k(Proc::X),
            k(Proc::Y),
            p(Phase::C),
        ]
    );
}

#[test]
fn resolve_is_independent_of_registration_order() {
    let mut forward = Config::new();
    forward
        .add_after(Phase::A, Proc::Y)
        .add_after(Phase::A, Proc::X)
        .add_before(Phase::C, Proc::Z);
    let mut backward = Config::new();
    backward
        .add_before(Phase::C, Proc::Z)
        .add_after(Phase::A, Proc::X)
        .add_after(Phase::A, Proc::Y);

    let a = resolve(&PHASES, &forward).unwrap();
    let b = resolve(&PHASES, &backward).unwrap();
    assert_eq!(a, b);
    assert_eq!(a, resolve(&PHASES, &forward).unwrap());
}

#[test]
fn resolve_ignores_repeated_constraints() {
    let mut config = Config::new();
    config
        .add_before(Phase::B, Proc::X)
        .add_before(Phase::B, Proc::X)
        .add_after(Phase::A, Proc::X);
    assert_eq!(config.placements().len(), 3);
    assert!(config.contains(Proc::X));
    assert!(!config.contains(Proc::Y));

    assert_eq!(
        resolve(&PHASES, &config).unwrap(),
        vec![p(Phase::A), k(Proc::X), p(Phase::B), p(Phase::C)]
    );
}

#[test]
fn resolve_add_all_merges_configurations() {
    let mut a = Config::new();
    a.add_before(Phase::B, Proc::X);
    let mut b = Config::new();
    b.add_after(Phase::C, Proc::Y);
    a.add_all(&b);

    assert_eq!(
        a.placements(),
        &[
            (Proc::X, Placement::Before(Phase::B)),
            (Proc::Y, Placement::After(Phase::C)),
        ]
    );
}

#[test]
fn resolve_rejects_contradictory_placements() {
    let mut config = Config::new();
    config.add_before(Phase::A, Proc::X).add_after(Phase::B, Proc::X);

    let err = resolve(&PHASES, &config).unwrap_err();
    assert_eq!(
        err,
        ConfigurationError::ContradictoryPlacement {
            processor: "X".to_string(),
            first: "before A".to_string(),
            second: "after B".to_string(),
        }
    );
    assert_eq!(err.to_string(), "processor X is placed before A and after B");
}

#[test]
fn resolve_rejects_a_same_slot_anchor_in_another_slot() {
    let mut config = Config::new();
    config
        .add_before(Phase::A, Proc::X)
        .add_after(Phase::C, Proc::Y)
        .add_same_slot(Proc::Y, Proc::X);

    assert!(matches!(
        resolve(&PHASES, &config),
        Err(ConfigurationError::ContradictoryPlacement { .. })
    ));
}

#[test]
fn resolve_rejects_unknown_anchors() {
    let mut config = Config::new();
    config.add_same_slot(Proc::Z, Proc::X);

    assert_eq!(
        resolve(&PHASES, &config).unwrap_err(),
        ConfigurationError::UnknownAnchor {
            processor: "X".to_string(),
            anchor: "Z".to_string(),
        }
    );
}

#[test]
fn resolve_rejects_same_slot_cycles() {
    let mut config = Config::new();
    config
        .add_after(Phase::A, Proc::X)
        .add_same_slot(Proc::Y, Proc::X)
        .add_same_slot(Proc::X, Proc::Y);

    let Err(ConfigurationError::CyclicDependency { processors }) = resolve(&PHASES, &config)
    else {
        panic!("expected a cyclic dependency");
    };
    assert!(processors.contains(&"X".to_string()));
    assert!(processors.contains(&"Y".to_string()));
}

#[test]
fn resolve_rejects_phases_outside_the_pipeline() {
    let mut config = Config::new();
    config.add_before(Phase::C, Proc::X);

    let err = resolve(&[Phase::A, Phase::B], &config).unwrap_err();
    assert_eq!(
        err,
        ConfigurationError::UnknownPhase {
            phase: "C".to_string()
        }
    );

    let wrapped = heron::Error::from(err);
    assert_eq!(
        wrapped.to_string(),
        "invalid processor configuration: phase C is not part of the pipeline"
    );
}
