use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::foundation::error::{MotionError, MotionResult};

/// Identity of a drive value cell, shared by all of its clones.
///
/// Derived from the cell's address: unique among live cells, and may be reused once every
/// clone of a cell is dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DriveId(pub usize);

/// Token returned by [`DriveValue::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Rc<dyn Fn(f64)>;

struct Inner {
    value: f64,
    next_subscription: u64,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
}

/// Mutable scalar cell with ordered subscribers; the root every animation derives from.
///
/// Cloning shares the cell. Writers are the host gesture bridge and animation runners;
/// the cell never changes on its own.
#[derive(Clone)]
pub struct DriveValue {
    inner: Rc<RefCell<Inner>>,
}

impl DriveValue {
    /// Create a cell holding `initial`.
    pub fn new(initial: f64) -> MotionResult<Self> {
        check_finite(initial)?;
        Ok(Self {
            inner: Rc::new(RefCell::new(Inner {
                value: initial,
                next_subscription: 0,
                subscribers: Vec::new(),
            })),
        })
    }

    /// Cell identity.
    pub fn id(&self) -> DriveId {
        DriveId(Rc::as_ptr(&self.inner).cast::<()>() as usize)
    }

    /// Current value.
    pub fn get(&self) -> f64 {
        self.inner.borrow().value
    }

    /// Store `value` and notify subscribers in subscription order.
    ///
    /// Non-finite values are rejected and leave the cell untouched. Subscribers run after
    /// the internal borrow is released, so they may read, set, subscribe or unsubscribe.
    /// The dispatch list is snapshotted first: unsubscribing during a pass only affects
    /// later passes.
    pub fn set(&self, value: f64) -> MotionResult<()> {
        check_finite(value)?;
        let snapshot: Vec<Subscriber> = {
            let mut inner = self.inner.borrow_mut();
            inner.value = value;
            inner.subscribers.iter().map(|(_, f)| Rc::clone(f)).collect()
        };
        tracing::trace!(drive = self.id().0, value, subscribers = snapshot.len(), "drive set");
        for f in snapshot {
            f(value);
        }
        Ok(())
    }

    /// Register `f` to be called with every new value.
    pub fn subscribe(&self, f: impl Fn(f64) + 'static) -> SubscriptionId {
        let mut inner = self.inner.borrow_mut();
        let id = SubscriptionId(inner.next_subscription);
        inner.next_subscription += 1;
        inner.subscribers.push((id, Rc::new(f)));
        id
    }

    /// Remove a subscriber. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.subscribers.len();
        inner.subscribers.retain(|(sid, _)| *sid != id);
        inner.subscribers.len() != before
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    /// Drop every subscriber. Called when the owning component is torn down.
    pub fn dispose(&self) {
        let dropped = std::mem::take(&mut self.inner.borrow_mut().subscribers);
        tracing::debug!(drive = self.id().0, subscribers = dropped.len(), "drive disposed");
    }

    /// Return `true` when `other` shares this cell.
    pub fn same_cell(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for DriveValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("DriveValue")
            .field("id", &self.id().0)
            .field("value", &inner.value)
            .field("subscribers", &inner.subscribers.len())
            .finish()
    }
}

fn check_finite(value: f64) -> MotionResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(MotionError::invalid_value(format!(
            "drive value must be finite, got {value}"
        )))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/drive/value.rs"]
mod tests;
