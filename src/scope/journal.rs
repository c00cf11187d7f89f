use std::cell::RefCell;
use std::rc::Rc;

use derive_more::{Display, IsVariant};

/// What happened to a value in a [`LifecycleEvent`].
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, IsVariant)]
pub enum EventKind {
    /// The value finished construction and now has an owner.
    #[display("acquired")]
    Acquired,
    /// The value was destroyed by its owner.
    #[display("released")]
    Released,
}

/// A single entry in a [`Journal`].
#[derive(Debug, Display, Clone, PartialEq, Eq, Hash)]
#[display("{label} {kind}")]
pub struct LifecycleEvent {
    /// The label the value was registered under.
    pub label: String,
    /// What happened to it.
    pub kind: EventKind,
}

/// A shared, append-only record of [`LifecycleEvent`]s.
///
/// Clones of a Journal share the same record, so a single Journal can be handed to several
/// [`Scope`](super::Scope)s and [`Tracer`](super::Tracer)s to observe the order in which they
/// acquire and release values.
///
/// # Examples
/// ```
/// # use ownership_lib::scope::{EventKind, Journal};
/// let journal = Journal::new();
/// let shared = journal.clone();
/// shared.record("a", EventKind::Acquired);
/// shared.record("a", EventKind::Released);
/// assert_eq!(journal.released(), ["a"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<LifecycleEvent>>>);

impl Journal {
    /// Creates a new, empty Journal.
    pub fn new() -> Journal {
        Journal::default()
    }

    /// Appends an event to the Journal.
    pub fn record(&self, label: impl Into<String>, kind: EventKind) {
        self.0.borrow_mut().push(LifecycleEvent {
            label: label.into(),
            kind,
        });
    }

    /// Returns a copy of every event recorded so far, oldest first.
    pub fn events(&self) -> Vec<LifecycleEvent> {
        self.0.borrow().clone()
    }

    /// Returns the labels of every acquired value, in the order they were acquired.
    pub fn acquired(&self) -> Vec<String> {
        self.labels(EventKind::Acquired)
    }

    /// Returns the labels of every released value, in the order they were released.
    pub fn released(&self) -> Vec<String> {
        self.labels(EventKind::Released)
    }

    /// Returns the number of events with the given label and kind.
    pub fn count(&self, label: &str, kind: EventKind) -> usize {
        self.0
            .borrow()
            .iter()
            .filter(|event| event.kind == kind && event.label == label)
            .count()
    }

    /// Returns the number of recorded events.
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// Returns true if no events have been recorded.
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Removes every recorded event, for all clones of this Journal.
    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    fn labels(&self, kind: EventKind) -> Vec<String> {
        self.0
            .borrow()
            .iter()
            .filter(|event| event.kind == kind)
            .map(|event| event.label.clone())
            .collect()
    }
}
