use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use crate::animation::runner::{RunState, Runner};

/// Outcome delivered to a [`Animation::start_with`] callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Finished {
    /// `true` when the run reached its target, `false` when it was stopped or restarted.
    pub finished: bool,
}

type FinishCallback = Box<dyn FnOnce(Finished)>;

struct AnimationCore {
    runner: Box<dyn Runner>,
    on_finish: Option<FinishCallback>,
}

/// Lifecycle request made while the runner is busy writing its drive values.
enum Deferred {
    Stop,
    Restart(Option<FinishCallback>),
}

struct AnimationCell {
    core: RefCell<AnimationCore>,
    // Held outside `core` so subscribers can reach it mid-advance. Last request wins.
    deferred: RefCell<Option<Deferred>>,
}

type CellRef = Rc<AnimationCell>;

type Pending = Vec<(FinishCallback, Finished)>;

// A subscriber that restarts its own animation on every write would otherwise loop.
const MAX_DEFERRED_PASSES: usize = 4;

struct TimelineInner {
    now: Duration,
    running: Vec<CellRef>,
}

/// Cooperative host clock that advances every running [`Animation`].
///
/// Cloning shares the clock. The host calls [`Timeline::tick`] with monotonic time;
/// animations never advance on their own.
#[derive(Clone)]
pub struct Timeline {
    inner: Rc<RefCell<TimelineInner>>,
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Timeline {
    /// Clock starting at zero with nothing running.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(TimelineInner {
                now: Duration::ZERO,
                running: Vec::new(),
            })),
        }
    }

    /// Time of the latest accepted tick.
    pub fn now(&self) -> Duration {
        self.inner.borrow().now
    }

    /// Number of animations currently registered as running.
    pub fn running_count(&self) -> usize {
        self.inner.borrow().running.len()
    }

    /// Advance every running animation to `now`.
    ///
    /// Time going backwards is ignored. Animations finishing during the pass are dropped
    /// from the clock and their callbacks fire after every animation has advanced.
    pub fn tick(&self, now: Duration) {
        let snapshot = {
            let mut inner = self.inner.borrow_mut();
            if now < inner.now {
                tracing::warn!(now = ?now, last = ?inner.now, "timeline tick went backwards; ignored");
                return;
            }
            inner.now = now;
            inner.running.clone()
        };

        let mut pending = Pending::new();
        for cell in &snapshot {
            let Ok(mut core) = cell.core.try_borrow_mut() else {
                continue;
            };
            core.runner.advance(now);
            apply_deferred(cell, &mut core, now, &mut pending);
            take_finished(&mut core, &mut pending);
        }

        self.inner
            .borrow_mut()
            .running
            .retain(|cell| !cell_state(cell).is_finished());
        tracing::trace!(now = ?now, running = self.running_count(), finished = pending.len(), "timeline tick");

        fire(pending);
    }

    /// Stop every running animation. Their callbacks receive `finished: false`.
    pub fn stop_all(&self) {
        let running = std::mem::take(&mut self.inner.borrow_mut().running);
        tracing::debug!(count = running.len(), "timeline stop_all");
        let callbacks: Vec<FinishCallback> = running.iter().filter_map(cancel).collect();
        for cb in callbacks {
            cb(Finished { finished: false });
        }
    }

    fn register(&self, cell: &CellRef) {
        let mut inner = self.inner.borrow_mut();
        if !inner.running.iter().any(|c| Rc::ptr_eq(c, cell)) {
            inner.running.push(Rc::clone(cell));
        }
    }

    fn unregister(&self, cell: &CellRef) {
        self.inner
            .borrow_mut()
            .running
            .retain(|c| !Rc::ptr_eq(c, cell));
    }
}

impl fmt::Debug for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Timeline")
            .field("now", &inner.now)
            .field("running", &inner.running.len())
            .finish()
    }
}

/// Cloneable handle pairing a [`Runner`] with the [`Timeline`] that drives it.
///
/// `start` and `stop` may be called from a subscriber of a drive value the animation
/// itself writes. Such calls are applied as soon as the runner's current write returns:
/// a stop prevents any further writes and [`Animation::state`] reports `Canceled` at once.
#[derive(Clone)]
pub struct Animation {
    cell: CellRef,
    timeline: Timeline,
}

impl Animation {
    /// Wrap `runner`; nothing moves until [`Animation::start`].
    pub fn new(timeline: &Timeline, runner: impl Runner + 'static) -> Self {
        Self {
            cell: Rc::new(AnimationCell {
                core: RefCell::new(AnimationCore {
                    runner: Box::new(runner),
                    on_finish: None,
                }),
                deferred: RefCell::new(None),
            }),
            timeline: timeline.clone(),
        }
    }

    /// Start (or restart) at the timeline's current time.
    pub fn start(&self) {
        self.begin(None);
    }

    /// Like [`Animation::start`], calling `on_finish` once this run ends.
    ///
    /// A pending callback from a previous run receives `finished: false`.
    pub fn start_with(&self, on_finish: impl FnOnce(Finished) + 'static) {
        self.begin(Some(Box::new(on_finish)));
    }

    fn begin(&self, on_finish: Option<FinishCallback>) {
        let now = self.timeline.now();
        let Ok(mut core) = self.cell.core.try_borrow_mut() else {
            tracing::debug!("animation restarted from inside its own write; deferred");
            *self.cell.deferred.borrow_mut() = Some(Deferred::Restart(on_finish));
            return;
        };
        let mut pending = Pending::new();
        restart(&mut core, on_finish, now, &mut pending);
        apply_deferred(&self.cell, &mut core, now, &mut pending);
        let state = take_finished(&mut core, &mut pending);
        drop(core);

        if state == RunState::Running {
            self.timeline.register(&self.cell);
        } else {
            self.timeline.unregister(&self.cell);
        }
        fire(pending);
    }

    /// Cancel if running. Drive values keep what they last reached.
    pub fn stop(&self) {
        self.timeline.unregister(&self.cell);
        if let Some(cb) = cancel(&self.cell) {
            cb(Finished { finished: false });
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RunState {
        cell_state(&self.cell)
    }

    /// Return `true` while the runner is driving its values.
    pub fn is_running(&self) -> bool {
        self.state() == RunState::Running
    }

    /// Exact completion instant of the latest run.
    pub fn completed_at(&self) -> Option<Duration> {
        self.cell
            .core
            .try_borrow()
            .ok()
            .and_then(|c| c.runner.completed_at())
    }
}

impl fmt::Debug for Animation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animation")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

fn cell_state(cell: &AnimationCell) -> RunState {
    match cell.core.try_borrow() {
        Ok(core) => core.runner.state(),
        // Borrowed means mid-write: running unless a stop is already queued.
        Err(_) => match *cell.deferred.borrow() {
            Some(Deferred::Stop) => RunState::Canceled,
            _ => RunState::Running,
        },
    }
}

fn restart(
    core: &mut AnimationCore,
    on_finish: Option<FinishCallback>,
    now: Duration,
    pending: &mut Pending,
) {
    if let Some(previous) = core.on_finish.take() {
        pending.push((previous, Finished { finished: false }));
    }
    core.runner.start_at(now);
    core.on_finish = on_finish;
}

fn apply_deferred(
    cell: &AnimationCell,
    core: &mut AnimationCore,
    now: Duration,
    pending: &mut Pending,
) {
    for _ in 0..MAX_DEFERRED_PASSES {
        let Some(request) = cell.deferred.borrow_mut().take() else {
            return;
        };
        match request {
            Deferred::Stop => {
                core.runner.stop();
                tracing::debug!(state = ?core.runner.state(), "deferred stop applied");
            }
            Deferred::Restart(on_finish) => restart(core, on_finish, now, pending),
        }
    }
    if cell.deferred.borrow_mut().take().is_some() {
        tracing::warn!(
            passes = MAX_DEFERRED_PASSES,
            "animation keeps restarting itself; request dropped"
        );
    }
}

fn take_finished(core: &mut AnimationCore, pending: &mut Pending) -> RunState {
    let state = core.runner.state();
    if state.is_finished()
        && let Some(cb) = core.on_finish.take()
    {
        pending.push((
            cb,
            Finished {
                finished: state == RunState::Completed,
            },
        ));
    }
    state
}

fn fire(pending: Pending) {
    for (cb, outcome) in pending {
        cb(outcome);
    }
}

// Busy cores get the stop queued and report through their own tick.
fn cancel(cell: &CellRef) -> Option<FinishCallback> {
    let Ok(mut core) = cell.core.try_borrow_mut() else {
        *cell.deferred.borrow_mut() = Some(Deferred::Stop);
        return None;
    };
    if core.runner.state() != RunState::Running {
        return None;
    }
    core.runner.stop();
    core.on_finish.take()
}

#[cfg(test)]
#[path = "../../tests/unit/animation/timeline.rs"]
mod tests;
