//! Processors, phases and the resolution of their execution order.
//!
//! A pipeline is a fixed sequence of phases. Intermediate processors are placed into *slots*
//! between phases: slot `i` runs right before phase `i`, so "after phase `i`" and "before phase
//! `i + 1`" name the same slot. A processor can also be placed in the slot of another processor
//! ([`LayoutProcessorConfiguration::add_same_slot`]), in which case it runs after that anchor.

use crate::intermediate::IntermediateProcessorStrategy;
use crate::monitor::ProgressMonitor;
use heron_graph::LGraph;
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::Hash;

pub trait LayoutProcessor {
    fn process(&mut self, graph: &mut LGraph, monitor: &mut dyn ProgressMonitor);
}

/// A phase of the layered pipeline. Besides doing its own work, a phase declares the
/// intermediate processors it relies on.
pub trait LayoutPhase: LayoutProcessor {
    fn processor_configuration(&self, _graph: &LGraph) -> LayeredConfiguration {
        LayeredConfiguration::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LayeredPhase {
    P1CycleBreaking,
    P2Layering,
    P3NodeOrdering,
    P4NodePlacement,
    P5EdgeRouting,
}

impl LayeredPhase {
    pub const ALL: [LayeredPhase; 5] = [
        LayeredPhase::P1CycleBreaking,
        LayeredPhase::P2Layering,
        LayeredPhase::P3NodeOrdering,
        LayeredPhase::P4NodePlacement,
        LayeredPhase::P5EdgeRouting,
    ];
}

pub type LayeredConfiguration =
    LayoutProcessorConfiguration<LayeredPhase, IntermediateProcessorStrategy>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement<P, K> {
    Before(P),
    After(P),
    SameSlotAs(K),
}

/// Placement constraints in registration order. Registering the same constraint twice is
/// harmless.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutProcessorConfiguration<P, K> {
    placements: Vec<(K, Placement<P, K>)>,
}

impl<P, K> Default for LayoutProcessorConfiguration<P, K> {
    fn default() -> Self {
        Self {
            placements: Vec::new(),
        }
    }
}

impl<P: Copy, K: Copy> LayoutProcessorConfiguration<P, K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_before(&mut self, phase: P, processor: K) -> &mut Self {
        self.placements.push((processor, Placement::Before(phase)));
        self
    }

    pub fn add_after(&mut self, phase: P, processor: K) -> &mut Self {
        self.placements.push((processor, Placement::After(phase)));
        self
    }

    /// Runs `processor` in the slot of `anchor`, after it.
    pub fn add_same_slot(&mut self, anchor: K, processor: K) -> &mut Self {
        self.placements.push((processor, Placement::SameSlotAs(anchor)));
        self
    }

    pub fn add_all(&mut self, other: &LayoutProcessorConfiguration<P, K>) -> &mut Self {
        self.placements.extend(other.placements.iter().copied());
        self
    }

    pub fn placements(&self) -> &[(K, Placement<P, K>)] {
        &self.placements
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }
}

impl<P: Copy, K: Copy + PartialEq> LayoutProcessorConfiguration<P, K> {
    pub fn contains(&self, processor: K) -> bool {
        self.placements.iter().any(|(k, _)| *k == processor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step<P, K> {
    Phase(P),
    Processor(K),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("processor {processor} is placed {first} and {second}")]
    ContradictoryPlacement {
        processor: String,
        first: String,
        second: String,
    },
    #[error("processor {processor} runs in the slot of {anchor}, which is never placed")]
    UnknownAnchor { processor: String, anchor: String },
    #[error("same-slot placements form a cycle: {}", .processors.join(" -> "))]
    CyclicDependency { processors: Vec<String> },
    #[error("phase {phase} is not part of the pipeline")]
    UnknownPhase { phase: String },
}

#[derive(Debug)]
struct Entry<K> {
    direct: Option<(usize, String)>,
    anchors: Vec<K>,
}

impl<K> Default for Entry<K> {
    fn default() -> Self {
        Self {
            direct: None,
            anchors: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    New,
    Active,
    Done,
}

/// Orders `phases` and the processors of `configuration` into one sequence.
///
/// Processors sharing a slot are ordered topologically along their same-slot anchors; ties go
/// to the smaller processor id, then to the earlier registration.
pub fn resolve<P, K>(
    phases: &[P],
    configuration: &LayoutProcessorConfiguration<P, K>,
) -> Result<Vec<Step<P, K>>, ConfigurationError>
where
    P: Copy + Eq + fmt::Debug,
    K: Copy + Ord + Hash + fmt::Debug,
{
    let phase_slot = |phase: P| {
        phases
            .iter()
            .position(|p| *p == phase)
            .ok_or_else(|| ConfigurationError::UnknownPhase {
                phase: format!("{phase:?}"),
            })
    };

    let mut entries: IndexMap<K, Entry<K>, FxBuildHasher> = IndexMap::default();
    for (processor, placement) in &configuration.placements {
        let (slot, description) = match placement {
            Placement::Before(p) => (phase_slot(*p)?, format!("before {p:?}")),
            Placement::After(p) => (phase_slot(*p)? + 1, format!("after {p:?}")),
            Placement::SameSlotAs(anchor) => {
                let entry = entries.entry(*processor).or_insert_with(Entry::default);
                if !entry.anchors.contains(anchor) {
                    entry.anchors.push(*anchor);
                }
                continue;
            }
        };
        let entry = entries.entry(*processor).or_insert_with(Entry::default);
        match &entry.direct {
            Some((existing, first)) if *existing != slot => {
                return Err(ConfigurationError::ContradictoryPlacement {
                    processor: format!("{processor:?}"),
                    first: first.clone(),
                    second: description,
                });
            }
            Some(_) => {}
            None => entry.direct = Some((slot, description)),
        }
    }

    let mut resolver = SlotResolver {
        entries: &entries,
        visit: vec![Visit::New; entries.len()],
        slots: vec![0; entries.len()],
        stack: Vec::new(),
    };
    for i in 0..entries.len() {
        resolver.slot(i)?;
    }
    let slots = resolver.slots;

    // Anchor -> dependents, all within one slot.
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); entries.len()];
    let mut pending: Vec<usize> = vec![0; entries.len()];
    for (i, entry) in entries.values().enumerate() {
        for anchor in &entry.anchors {
            if let Some(j) = entries.get_index_of(anchor) {
                dependents[j].push(i);
                pending[i] += 1;
            }
        }
    }

    let keys: Vec<K> = entries.keys().copied().collect();
    let key = |i: usize| (slots[i], keys[i], i);
    let mut ready: BTreeSet<(usize, K, usize)> = (0..entries.len())
        .filter(|i| pending[*i] == 0)
        .map(key)
        .collect();
    let mut ordered: Vec<(usize, K)> = Vec::with_capacity(entries.len());
    while let Some((slot, processor, i)) = ready.pop_first() {
        ordered.push((slot, processor));
        for &d in &dependents[i] {
            pending[d] -= 1;
            if pending[d] == 0 {
                ready.insert(key(d));
            }
        }
    }
    if ordered.len() != entries.len() {
        let processors = keys
            .iter()
            .enumerate()
            .filter(|(i, _)| pending[*i] > 0)
            .map(|(_, k)| format!("{k:?}"))
            .collect();
        return Err(ConfigurationError::CyclicDependency { processors });
    }

    let mut steps = Vec::with_capacity(phases.len() + ordered.len());
    let mut next = ordered.into_iter().peekable();
    for slot in 0..=phases.len() {
        while let Some((_, processor)) = next.next_if(|(s, _)| *s == slot) {
            steps.push(Step::Processor(processor));
        }
        if let Some(phase) = phases.get(slot) {
            steps.push(Step::Phase(*phase));
        }
    }
    Ok(steps)
}

struct SlotResolver<'a, K> {
    entries: &'a IndexMap<K, Entry<K>, FxBuildHasher>,
    visit: Vec<Visit>,
    slots: Vec<usize>,
    stack: Vec<usize>,
}

impl<K> SlotResolver<'_, K>
where
    K: Copy + Hash + Eq + fmt::Debug,
{
    fn slot(&mut self, i: usize) -> Result<usize, ConfigurationError> {
        match self.visit[i] {
            Visit::Done => return Ok(self.slots[i]),
            Visit::Active => {
                let start = self.stack.iter().position(|s| *s == i).unwrap_or(0);
                let mut processors: Vec<String> = self.stack[start..]
                    .iter()
                    .map(|s| self.name(*s))
                    .collect();
                processors.push(self.name(i));
                return Err(ConfigurationError::CyclicDependency { processors });
            }
            Visit::New => {}
        }
        self.visit[i] = Visit::Active;
        self.stack.push(i);

        let Some((processor, entry)) = self.entries.get_index(i) else {
            unreachable!("slot index within entries");
        };
        let mut resolved = entry.direct.clone();
        for anchor in &entry.anchors {
            let Some(j) = self.entries.get_index_of(anchor) else {
                return Err(ConfigurationError::UnknownAnchor {
                    processor: format!("{processor:?}"),
                    anchor: format!("{anchor:?}"),
                });
            };
            let slot = self.slot(j)?;
            let description = format!("in the slot of {anchor:?}");
            match &resolved {
                Some((existing, first)) if *existing != slot => {
                    return Err(ConfigurationError::ContradictoryPlacement {
                        processor: format!("{processor:?}"),
                        first: first.clone(),
                        second: description,
                    });
                }
                Some(_) => {}
                None => resolved = Some((slot, description)),
            }
        }
        let Some((slot, _)) = resolved else {
            unreachable!("processors are only registered through a placement");
        };

        self.stack.pop();
        self.visit[i] = Visit::Done;
        self.slots[i] = slot;
        Ok(slot)
    }

    fn name(&self, i: usize) -> String {
        self.entries
            .get_index(i)
            .map(|(k, _)| format!("{k:?}"))
            .unwrap_or_default()
    }
}
