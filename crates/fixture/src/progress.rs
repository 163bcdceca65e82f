use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::Error;

/// Number of checkpoints reported per progress signal over a whole run.
pub const CHECKPOINTS: usize = 200;

/// A shared flag used to request cooperative cancellation.
///
/// Cloning the token hands out another reference to the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// The two independent progress signals of a generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Nodes,
    Edges,
}

/// Checkpoint bookkeeping threaded through every generation routine.
///
/// Each call to [`Progress::check`], [`Progress::node_created`] or
/// [`Progress::edges_added`] first polls the cancellation token and fails
/// with [`Error::Aborted`] once cancellation was requested. Reports are
/// throttled to roughly [`CHECKPOINTS`] per signal.
pub struct Progress<'a> {
    token: Option<CancellationToken>,
    sink: Option<Box<dyn FnMut(Stage, usize, usize) + 'a>>,
    node_total: usize,
    node_step: usize,
    edge_goal: usize,
    edge_step: usize,
    edge_count: usize,
}

impl<'a> Progress<'a> {
    /// A progress tracker that never reports and can never be cancelled.
    pub fn silent() -> Self {
        Self {
            token: None,
            sink: None,
            node_total: 0,
            node_step: 1,
            edge_goal: 1,
            edge_step: 1,
            edge_count: 0,
        }
    }

    /// Creates a tracker for a run producing `node_total` nodes and an
    /// estimated `edge_goal` edges.
    pub fn new(node_total: usize, edge_goal: usize) -> Self {
        let edge_goal = usize::max(1, edge_goal);
        Self {
            node_total,
            node_step: step_for(node_total),
            edge_goal,
            edge_step: step_for(edge_goal),
            ..Self::silent()
        }
    }

    #[must_use]
    pub fn with_token(mut self, token: CancellationToken) -> Self {
        self.token = Some(token);
        self
    }

    #[must_use]
    pub fn with_sink(mut self, sink: impl FnMut(Stage, usize, usize) + 'a) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Fails with [`Error::Aborted`] if cancellation was requested.
    pub fn check(&self) -> Result<(), Error> {
        match &self.token {
            Some(token) if token.is_cancelled() => Err(Error::Aborted {
                reason: "Generation aborted by user.",
            }),
            _ => Ok(()),
        }
    }

    /// Records that the `count`-th node was created.
    pub fn node_created(&mut self, count: usize) -> Result<(), Error> {
        self.check()?;
        if self.node_total > 0 && (count >= self.node_total || count % self.node_step == 0) {
            self.report(Stage::Nodes, count, self.node_total);
        }
        Ok(())
    }

    /// Records `delta` newly inserted edges.
    pub fn edges_added(&mut self, delta: usize) -> Result<(), Error> {
        self.check()?;
        if delta == 0 {
            return Ok(());
        }

        let before = self.edge_count;
        self.edge_count += delta;
        // An overtaken goal doubles and the step follows it.
        while self.edge_count > self.edge_goal {
            self.edge_goal = self.edge_goal.saturating_mul(2);
            self.edge_step = step_for(self.edge_goal);
        }

        if self.edge_count == self.edge_goal
            || self.edge_count / self.edge_step > before / self.edge_step
        {
            self.report(Stage::Edges, self.edge_count, self.edge_goal);
        }
        Ok(())
    }

    /// Reports the final edge count of the run as complete.
    pub fn finish_edges(&mut self, edge_count: usize) {
        let done = usize::max(self.edge_count, edge_count);
        self.report(Stage::Edges, done, usize::max(done, 1));
    }

    fn report(&mut self, stage: Stage, done: usize, total: usize) {
        if let Some(sink) = self.sink.as_mut() {
            sink(stage, done, total);
        }
    }
}

fn step_for(total: usize) -> usize {
    usize::max(1, total / CHECKPOINTS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_checkpoints_are_throttled() {
        let mut reports = Vec::new();
        let mut progress = Progress::new(1000, 1).with_sink(|stage, done, total| {
            reports.push((stage, done, total));
        });

        for count in 1..=1000 {
            progress.node_created(count).unwrap();
        }
        drop(progress);

        assert_eq!(reports.len(), CHECKPOINTS);
        assert_eq!(reports[0], (Stage::Nodes, 5, 1000));
        assert_eq!(reports.last(), Some(&(Stage::Nodes, 1000, 1000)));
    }

    #[test]
    fn edge_goal_doubles_when_overtaken() {
        let mut reports = Vec::new();
        let mut progress = Progress::new(0, 2).with_sink(|stage, done, total| {
            reports.push((stage, done, total));
        });

        for _ in 0..3 {
            progress.edges_added(1).unwrap();
        }
        progress.finish_edges(3);
        drop(progress);

        assert_eq!(
            reports,
            vec![
                (Stage::Edges, 1, 2),
                (Stage::Edges, 2, 2),
                (Stage::Edges, 3, 4),
                (Stage::Edges, 3, 3),
            ]
        );
    }

    #[test]
    fn low_estimate_stays_throttled() {
        let mut edge_reports = 0;
        let mut last = None;
        let mut progress = Progress::new(0, 1000).with_sink(|_, done, total| {
            edge_reports += 1;
            last = Some((done, total));
        });

        for _ in 0..100_000 {
            progress.edges_added(1).unwrap();
        }
        progress.finish_edges(100_000);
        drop(progress);

        assert!(edge_reports <= 1000, "{edge_reports} edge checkpoints");
        assert_eq!(last, Some((100_000, 100_000)));
    }

    #[test]
    fn batched_edges_cross_checkpoints() {
        let mut reports = Vec::new();
        let mut progress = Progress::new(0, 1000).with_sink(|_, done, _| reports.push(done));

        progress.edges_added(3).unwrap();
        progress.edges_added(3).unwrap();
        drop(progress);

        assert_eq!(reports, vec![6]);
    }

    #[test]
    fn cancellation_aborts_next_checkpoint() {
        let token = CancellationToken::new();
        let mut progress = Progress::new(10, 10).with_token(token.clone());

        assert!(progress.node_created(1).is_ok());
        token.cancel();

        let err = progress.node_created(2).unwrap_err();
        assert!(err.is_aborted());
        assert!(progress.edges_added(1).unwrap_err().is_aborted());
    }

    #[test]
    fn silent_progress_never_aborts() {
        let mut progress = Progress::silent();

        assert!(progress.node_created(1).is_ok());
        assert!(progress.edges_added(1).is_ok());
    }
}
