//! Helpers shared by the test modules.

pub mod alloc;
pub mod log;
pub mod panic;
pub mod result;
