use derive_more::{Display, Error, From, IsVariant};

pub use crate::buffer::InvalidCapacity;

/// The error produced when a [`ResourceOwner`](super::ResourceOwner)'s initial line doesn't fit in
/// its buffer.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Error)]
#[display("not enough capacity: a line of {line_len} bytes needs more than {cap} bytes")]
pub struct InsufficientCapacity {
    /// The length of the rejected initial line.
    pub line_len: usize,
    /// The capacity of the buffer it was appended to.
    pub cap: usize,
}

/// Every way the construction of a [`ResourceOwner`](super::ResourceOwner) can fail.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, From, Error, IsVariant)]
pub enum OwnerError {
    /// The requested buffer capacity was zero.
    InvalidCapacity(InvalidCapacity),
    /// The initial line didn't fit in the buffer.
    InsufficientCapacity(InsufficientCapacity),
}
