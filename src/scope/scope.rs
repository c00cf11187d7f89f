use std::any::Any;
use std::fmt::{self, Debug, Formatter};
use std::mem;

use tracing::{debug, trace};

use super::journal::{EventKind, Journal};

/// An explicit teardown stack.
///
/// Values acquired through a Scope are owned by it and released in the reverse order of their
/// acquisition when the Scope ends, on every exit path: normal completion, an early return through
/// `?` or a panic. A value whose construction fails is never registered, so it is never released.
///
/// Scopes nest: [`nested`](Scope::nested) creates a child Scope sharing the parent's [`Journal`].
/// Because the child is a local of the inner function, it ends before an error returned from that
/// function reaches the parent, which reproduces stack unwinding one frame at a time.
///
/// # Examples
/// ```
/// # use ownership_lib::scope::{Journal, Scope};
/// let journal = Journal::new();
/// {
///     let mut scope = Scope::with_journal("outer", journal.clone());
///     scope.adopt("first", String::from("one"));
///     scope.adopt("second", String::from("two"));
/// }
/// assert_eq!(journal.released(), ["second", "first"]);
/// ```
pub struct Scope {
    label: String,
    depth: usize,
    journal: Option<Journal>,
    entries: Vec<Entry>,
}

struct Entry {
    label: String,
    resource: Resource,
}

enum Resource {
    Value(Box<dyn Any>),
    Action(Box<dyn FnOnce()>),
}

impl Scope {
    /// Creates a new, empty Scope.
    pub fn new(label: impl Into<String>) -> Scope {
        Self::build(label.into(), 0, None)
    }

    /// Creates a new, empty Scope which records every acquisition and release in `journal`.
    pub fn with_journal(label: impl Into<String>, journal: Journal) -> Scope {
        Self::build(label.into(), 0, Some(journal))
    }

    /// Creates a child Scope which shares this Scope's [`Journal`]. The child must end before the
    /// parent does, which the borrow of self doesn't enforce, so callers keep it as a local.
    pub fn nested(&self, label: impl Into<String>) -> Scope {
        Self::build(label.into(), self.depth + 1, self.journal.clone())
    }

    fn build(label: String, depth: usize, journal: Option<Journal>) -> Scope {
        trace!(scope = %label, depth, "entered scope");
        Scope {
            label,
            depth,
            journal,
            entries: Vec::new(),
        }
    }

    /// Returns the label of the Scope.
    pub const fn label(&self) -> &str {
        self.label.as_str()
    }

    /// Returns how many Scopes enclose this one.
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Returns the number of resources waiting to be released.
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the Scope has nothing to release.
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Runs `ctor` and, if it succeeds, takes ownership of the constructed value.
    ///
    /// # Errors
    /// Returns the error produced by `ctor`. Nothing is registered in that case, and everything
    /// acquired earlier is still released when the Scope ends.
    ///
    /// # Examples
    /// ```
    /// # use ownership_lib::buffer::DynamicBuffer;
    /// # use ownership_lib::scope::Scope;
    /// let mut scope = Scope::new("main");
    /// let buf = scope.acquire("buf", || DynamicBuffer::new(8)).unwrap();
    /// buf.append("hi").unwrap();
    ///
    /// assert!(scope.acquire("empty", || DynamicBuffer::new(0)).is_err());
    /// assert_eq!(scope.len(), 1);
    /// ```
    pub fn acquire<T, E, F>(&mut self, label: impl Into<String>, ctor: F) -> Result<&mut T, E>
    where
        T: 'static,
        F: FnOnce() -> Result<T, E>,
    {
        let label = label.into();
        match ctor() {
            Ok(value) => Ok(self.adopt(label, value)),
            Err(error) => {
                debug!(scope = %self.label, %label, "construction failed, nothing registered");
                Err(error)
            }
        }
    }

    /// Takes ownership of an already constructed value.
    pub fn adopt<T: 'static>(&mut self, label: impl Into<String>, value: T) -> &mut T {
        let label = label.into();
        self.record(&label, EventKind::Acquired);
        self.entries.push(Entry {
            label,
            resource: Resource::Value(Box::new(value)),
        });

        let Some(Resource::Value(value)) = self.entries.last_mut().map(|entry| &mut entry.resource)
        else {
            unreachable!("a value entry was just pushed");
        };

        match value.downcast_mut::<T>() {
            Some(value) => value,
            None => unreachable!("the pushed entry holds a {}", std::any::type_name::<T>()),
        }
    }

    /// Registers an action to run when the Scope ends, in order with the other resources.
    ///
    /// # Examples
    /// ```
    /// # use std::cell::Cell;
    /// # use std::rc::Rc;
    /// # use ownership_lib::scope::Scope;
    /// let closed = Rc::new(Cell::new(false));
    /// let mut scope = Scope::new("file");
    /// let flag = closed.clone();
    /// scope.defer("close", move || flag.set(true));
    ///
    /// scope.close();
    /// assert!(closed.get());
    /// ```
    pub fn defer(&mut self, label: impl Into<String>, action: impl FnOnce() + 'static) {
        let label = label.into();
        self.record(&label, EventKind::Acquired);
        self.entries.push(Entry {
            label,
            resource: Resource::Action(Box::new(action)),
        });
    }

    /// Ends the Scope, releasing everything it owns in reverse order. Equivalent to dropping it.
    ///
    /// # Panics
    /// Panics if a deferred action or a value's [`Drop`] panics. The entries that haven't been
    /// released yet are still dropped, in reverse order of acquisition, but their deferred actions
    /// don't run and their releases aren't recorded in the [`Journal`].
    pub fn close(self) {
        drop(self)
    }

    fn record(&self, label: &str, kind: EventKind) {
        if let Some(journal) = &self.journal {
            journal.record(label, kind);
        }
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        // Reversed up front, so that a panic part way through still drops what is left in
        // reverse order of acquisition.
        let mut entries = mem::take(&mut self.entries);
        entries.reverse();

        for Entry { label, resource } in entries {
            match resource {
                Resource::Value(value) => drop(value),
                Resource::Action(action) => action(),
            }

            debug!(scope = %self.label, %label, "released");
            self.record(&label, EventKind::Released);
        }

        trace!(scope = %self.label, depth = self.depth, "left scope");
    }
}

impl Debug for Scope {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("label", &self.label)
            .field("depth", &self.depth)
            .field(
                "entries",
                &self.entries.iter().map(|entry| entry.label.as_str()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
