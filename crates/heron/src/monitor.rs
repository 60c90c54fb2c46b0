//! Progress reporting and cooperative cancellation.

use heron_graph::{LGraph, NodeId};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

pub trait ProgressMonitor {
    fn begin(&mut self, task: &str, total_work: f64);

    fn worked(&mut self, _work: f64) {}

    fn done(&mut self);

    /// Diagnostic hook called after each processor with the processor's name.
    fn log_graph(&mut self, _graph: &LGraph, _tag: &str) {}

    /// Checked between processors; a running processor is never interrupted.
    fn is_canceled(&self) -> bool {
        false
    }
}

/// Ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullMonitor;

impl ProgressMonitor for NullMonitor {
    fn begin(&mut self, _task: &str, _total_work: f64) {}

    fn done(&mut self) {}
}

/// Handle that cancels the layout run of the monitor it was taken from.
#[derive(Debug, Clone)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphSnapshot {
    pub tag: String,
    pub layers: Vec<Vec<NodeId>>,
    pub layerless: Vec<NodeId>,
}

#[derive(Debug)]
struct Task {
    name: String,
    started: Instant,
    total_work: f64,
    worked: f64,
}

/// Logs task boundaries through `tracing` and optionally records layer snapshots.
#[derive(Debug)]
pub struct BasicProgressMonitor {
    tasks: Vec<Task>,
    canceled: Arc<AtomicBool>,
    record_snapshots: bool,
    snapshots: Vec<GraphSnapshot>,
}

impl Default for BasicProgressMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl BasicProgressMonitor {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            canceled: Arc::new(AtomicBool::new(false)),
            record_snapshots: false,
            snapshots: Vec::new(),
        }
    }

    /// Keeps a copy of the layering every time a processor finishes.
    pub fn with_snapshots(mut self) -> Self {
        self.record_snapshots = true;
        self
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle(self.canceled.clone())
    }

    pub fn snapshots(&self) -> &[GraphSnapshot] {
        &self.snapshots
    }

    /// Fraction of the innermost running task's work reported so far.
    pub fn progress(&self) -> Option<f64> {
        let task = self.tasks.last()?;
        if task.total_work <= 0.0 {
            return Some(0.0);
        }
        Some((task.worked / task.total_work).min(1.0))
    }
}

impl ProgressMonitor for BasicProgressMonitor {
    fn begin(&mut self, task: &str, total_work: f64) {
        tracing::debug!(task, depth = self.tasks.len(), "begin");
        self.tasks.push(Task {
            name: task.to_string(),
            started: Instant::now(),
            total_work,
            worked: 0.0,
        });
    }

    fn worked(&mut self, work: f64) {
        if let Some(task) = self.tasks.last_mut() {
            task.worked += work;
        }
    }

    fn done(&mut self) {
        let Some(task) = self.tasks.pop() else {
            tracing::warn!("done() without a running task");
            return;
        };
        tracing::debug!(
            task = %task.name,
            elapsed_ms = task.started.elapsed().as_secs_f64() * 1000.0,
            "finished"
        );
    }

    fn log_graph(&mut self, graph: &LGraph, tag: &str) {
        tracing::trace!(
            tag,
            layers = graph.layer_count(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "graph"
        );
        if self.record_snapshots {
            self.snapshots.push(GraphSnapshot {
                tag: tag.to_string(),
                layers: graph.layer_matrix(),
                layerless: graph.layerless_nodes().to_vec(),
            });
        }
    }

    fn is_canceled(&self) -> bool {
        self.canceled.load(Ordering::Relaxed)
    }
}
