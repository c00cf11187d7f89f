//! This crate is a small study of resource ownership: who allocates, who copies, who hands things
//! over and who cleans up.
//!
//! # Purpose
//! Rust already answers most of these questions with [`Box`], [`Clone`] and [`Drop`]. Writing the
//! types here by hand, on top of raw allocations, makes the answers visible: a buffer that deep
//! copies its storage, a handle that can only ever have one owner, and a composite that either
//! finishes construction or leaves nothing behind.
//!
//! # Contents
//! - [`buffer`]: [`DynamicBuffer`](buffer::DynamicBuffer), a fixed-capacity, NUL-terminated text
//!   buffer which grows by appending lines, with deep copy and ownership transfer.
//! - [`handle`]: [`OwningHandle`](handle::OwningHandle), the sole owner of one heap value. It can
//!   be moved or released but never duplicated.
//! - [`owner`]: [`ResourceOwner`](owner::ResourceOwner), which owns one buffer and fails to
//!   construct if its initial line doesn't fit.
//! - [`scope`]: [`Scope`](scope::Scope), an explicit teardown stack, and
//!   [`Journal`](scope::Journal) for recording the order in which things are released.
//!
//! # Error Handling
//! Running out of room in a buffer is an everyday event, so
//! [`DynamicBuffer::append`](buffer::DynamicBuffer::append) reports it as an ordinary [`Err`]
//! which the caller is expected to look at. Constructors that can't establish their invariants
//! return errors too, and because every owner in this crate releases its resources in [`Drop`],
//! anything that was fully constructed before the failure is released, in reverse order, before
//! the error reaches whoever handles it.
//!
//! Errors are strongly typed: small structs which implement [`Error`](std::error::Error),
//! combined into enums for static dispatch where a function can fail in more than one way.
//!
//! # Features
//! Each module sits behind a feature of the same name. `owner` requires `buffer` and `scope`. The
//! default features are `buffer`, `handle` and `owner`.
//!
//! # Logging
//! Allocations, releases and ownership transfers are reported through [`tracing`] at the `trace`
//! level; construction and destruction of owners and scoped values at the `debug` level. Nothing
//! is printed unless a subscriber is installed.
#![warn(clippy::missing_safety_doc)]
#![warn(clippy::undocumented_unsafe_blocks)]
#![warn(clippy::missing_const_for_fn)]
#![warn(clippy::missing_panics_doc)]
#![warn(clippy::unwrap_used)]
#![allow(clippy::module_inception)]

#[cfg(feature = "buffer")]
pub mod buffer;
#[cfg(feature = "handle")]
pub mod handle;
#[cfg(feature = "owner")]
pub mod owner;
#[cfg(feature = "scope")]
pub mod scope;

#[cfg(test)]
mod util;
