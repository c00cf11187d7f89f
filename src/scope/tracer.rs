use tracing::debug;

use super::journal::{EventKind, Journal};

/// A named value which reports its own construction and destruction, both as a tracing event and,
/// optionally, in a [`Journal`].
///
/// Wrapping a Tracer in another owner makes that owner's release visible.
///
/// # Examples
/// ```
/// # use ownership_lib::handle::OwningHandle;
/// # use ownership_lib::scope::{Journal, Tracer};
/// let journal = Journal::new();
/// let handle = OwningHandle::new_with(Tracer::with_journal("ptr_a", journal.clone()));
/// assert_eq!(journal.acquired(), ["ptr_a"]);
///
/// drop(handle);
/// assert_eq!(journal.released(), ["ptr_a"]);
/// ```
#[derive(Debug)]
pub struct Tracer {
    name: String,
    journal: Option<Journal>,
}

impl Tracer {
    /// Creates a Tracer which only reports through tracing.
    pub fn new(name: impl Into<String>) -> Tracer {
        Self::build(name.into(), None)
    }

    /// Creates a Tracer which also records its lifecycle in `journal`.
    pub fn with_journal(name: impl Into<String>, journal: Journal) -> Tracer {
        Self::build(name.into(), Some(journal))
    }

    /// Returns the name of the Tracer.
    pub fn name(&self) -> &str {
        &self.name
    }

    fn build(name: String, journal: Option<Journal>) -> Tracer {
        debug!(tracer = %name, "constructed");
        if let Some(journal) = &journal {
            journal.record(name.as_str(), EventKind::Acquired);
        }
        Tracer { name, journal }
    }
}

impl Drop for Tracer {
    fn drop(&mut self) {
        debug!(tracer = %self.name, "destructed");
        if let Some(journal) = &self.journal {
            journal.record(self.name.as_str(), EventKind::Released);
        }
    }
}
