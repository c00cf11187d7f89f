//! Scoped ownership made explicit. Primarily revolves around [`Scope`], a teardown stack which
//! releases what it owns in reverse order, and [`Journal`] for observing that order.
//!
//! [`Tracer`] is a small value that reports its own construction and destruction, useful for
//! watching where a value's lifetime ends once it is handed between owners.
#![warn(missing_docs)]

mod journal;
mod scope;
mod tracer;

pub use journal::*;
pub use scope::*;
pub use tracer::*;
