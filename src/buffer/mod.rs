//! A module containing [`DynamicBuffer`] and its error types.
//!
//! [`DynamicBuffer`] is a fixed-capacity text buffer that grows by appending lines, always keeping
//! a NUL terminator after its content. It owns its storage outright: cloning produces an
//! independent allocation, and [`DynamicBuffer::move_from`] hands the allocation over without
//! copying, leaving the source in the moved-from state.
#![warn(missing_docs)]

mod dynamic_buffer;
mod error;

pub use dynamic_buffer::*;
pub use error::*;
