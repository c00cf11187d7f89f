//! A module containing [`ResourceOwner`], a composite that owns a single
//! [`DynamicBuffer`](crate::buffer::DynamicBuffer) and can fail during construction, along with
//! its error types.
#![warn(missing_docs)]

mod error;
mod resource_owner;
mod tests;

pub use error::*;
pub use resource_owner::*;
