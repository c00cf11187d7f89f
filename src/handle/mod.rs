//! A module containing [`OwningHandle`], a move-only owner of a single heap value, and its
//! [`HandleState`].
#![warn(missing_docs)]

mod owning_handle;
mod tests;

pub use owning_handle::*;
