use std::time::Duration;

use crate::animation::runner::{RunState, Runner};

/// Timing rule of a [`Composite`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompositeKind {
    /// Every child starts at the composite's start.
    Parallel,
    /// Each child starts at the instant the previous one completes.
    Sequential,
    /// Child slot `i` starts at `start + i * delay`.
    Staggered(Duration),
}

#[derive(Debug)]
struct Slot {
    index: usize,
    runner: Box<dyn Runner>,
    started: bool,
}

/// Runner built from other runners under a [`CompositeKind`] timing rule.
///
/// A composite honors the same start/stop contract as a leaf: restarting cancels every
/// active child and begins again from the drive values' current readings.
#[derive(Debug)]
pub struct Composite {
    kind: CompositeKind,
    slots: Vec<Slot>,
    next_index: usize,
    state: RunState,
    origin: Duration,
    // Sequential: next child to run and the instant it may start.
    cursor: usize,
    next_start: Duration,
    completed_at: Option<Duration>,
}

impl Composite {
    /// Empty composite with `kind` timing.
    pub fn new(kind: CompositeKind) -> Self {
        Self {
            kind,
            slots: Vec::new(),
            next_index: 0,
            state: RunState::Idle,
            origin: Duration::ZERO,
            cursor: 0,
            next_start: Duration::ZERO,
            completed_at: None,
        }
    }

    /// Empty parallel composite.
    pub fn parallel() -> Self {
        Self::new(CompositeKind::Parallel)
    }

    /// Empty sequential composite.
    pub fn sequential() -> Self {
        Self::new(CompositeKind::Sequential)
    }

    /// Empty staggered composite.
    pub fn staggered(delay: Duration) -> Self {
        Self::new(CompositeKind::Staggered(delay))
    }

    /// Append a child.
    pub fn with(mut self, runner: impl Runner + 'static) -> Self {
        self.push(runner);
        self
    }

    /// Append a child only when `include` holds.
    ///
    /// An omitted child still consumes its slot, so the remaining children keep the
    /// start offsets they would have had.
    pub fn with_if(mut self, include: bool, runner: impl Runner + 'static) -> Self {
        self.push_if(include, runner);
        self
    }

    /// Append a child.
    pub fn push(&mut self, runner: impl Runner + 'static) {
        self.push_if(true, runner);
    }

    /// Append a child only when `include` holds (see [`Composite::with_if`]).
    pub fn push_if(&mut self, include: bool, runner: impl Runner + 'static) {
        let index = self.next_index;
        self.next_index += 1;
        if include {
            self.slots.push(Slot {
                index,
                runner: Box::new(runner),
                started: false,
            });
        }
    }

    /// Timing rule.
    pub fn kind(&self) -> CompositeKind {
        self.kind
    }

    /// Number of included children.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Return `true` when no child was included.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// State of the `i`-th included child.
    pub fn child_state(&self, i: usize) -> Option<RunState> {
        self.slots.get(i).map(|s| s.runner.state())
    }

    /// Completion instant of the `i`-th included child.
    pub fn child_completed_at(&self, i: usize) -> Option<Duration> {
        self.slots.get(i).and_then(|s| s.runner.completed_at())
    }

    fn complete(&mut self, at: Duration) {
        self.state = RunState::Completed;
        self.completed_at = Some(at);
        tracing::debug!(kind = ?self.kind, at = ?at, "composite completed");
    }

    fn latest_child_completion(&self) -> Duration {
        self.slots
            .iter()
            .filter_map(|s| s.runner.completed_at())
            .max()
            .unwrap_or(self.origin)
    }

    fn pump(&mut self, now: Duration) {
        match self.kind {
            CompositeKind::Parallel => {
                for slot in &mut self.slots {
                    if !slot.started {
                        slot.runner.start_at(self.origin);
                        slot.started = true;
                    }
                    slot.runner.advance(now);
                }
                if self
                    .slots
                    .iter()
                    .all(|s| s.runner.state() == RunState::Completed)
                {
                    self.complete(self.latest_child_completion());
                }
            }
            CompositeKind::Staggered(delay) => {
                for slot in &mut self.slots {
                    let due = delay
                        .checked_mul(slot_offset(slot.index))
                        .and_then(|offset| self.origin.checked_add(offset))
                        .unwrap_or(Duration::MAX);
                    if !slot.started && due <= now {
                        slot.runner.start_at(due);
                        slot.started = true;
                    }
                    if slot.started {
                        slot.runner.advance(now);
                    }
                }
                if self
                    .slots
                    .iter()
                    .all(|s| s.started && s.runner.state() == RunState::Completed)
                {
                    self.complete(self.latest_child_completion());
                }
            }
            CompositeKind::Sequential => loop {
                let Some(slot) = self.slots.get_mut(self.cursor) else {
                    let at = self.next_start;
                    self.complete(at);
                    break;
                };
                if !slot.started {
                    slot.runner.start_at(self.next_start);
                    slot.started = true;
                }
                if slot.runner.advance(now) != RunState::Completed {
                    break;
                }
                self.next_start = slot.runner.completed_at().unwrap_or(now);
                self.cursor += 1;
            },
        }
    }
}

fn slot_offset(index: usize) -> u32 {
    u32::try_from(index).unwrap_or(u32::MAX)
}

impl Runner for Composite {
    fn start_at(&mut self, now: Duration) {
        if self.state == RunState::Running {
            tracing::debug!(kind = ?self.kind, "composite restarted mid-flight");
        }
        for slot in &mut self.slots {
            slot.runner.stop();
            slot.started = false;
        }
        self.state = RunState::Running;
        self.origin = now;
        self.cursor = 0;
        self.next_start = now;
        self.completed_at = None;
        tracing::debug!(kind = ?self.kind, children = self.slots.len(), "composite started");
        self.pump(now);
    }

    fn advance(&mut self, now: Duration) -> RunState {
        if self.state == RunState::Running {
            self.pump(now);
        }
        self.state
    }

    fn stop(&mut self) {
        if self.state != RunState::Running {
            return;
        }
        for slot in &mut self.slots {
            if slot.started {
                slot.runner.stop();
            }
        }
        self.state = RunState::Canceled;
        tracing::debug!(kind = ?self.kind, "composite canceled");
    }

    fn state(&self) -> RunState {
        self.state
    }

    fn completed_at(&self) -> Option<Duration> {
        self.completed_at
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/composite.rs"]
mod tests;
