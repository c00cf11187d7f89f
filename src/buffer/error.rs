use derive_more::{Display, Error};

/// The error produced when a [`DynamicBuffer`](super::DynamicBuffer) is created with a capacity of
/// zero. Every live buffer needs at least one byte for its terminator.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Error)]
#[display("buffer capacity must be at least 1")]
pub struct InvalidCapacity;

/// The error returned by [`DynamicBuffer::append`](super::DynamicBuffer::append) when a line
/// doesn't fit. The buffer is left exactly as it was.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Error)]
#[display("line of {requested} bytes doesn't fit, {available} bytes of text remain")]
pub struct CapacityExceeded {
    /// The length of the rejected text, excluding the separator and terminator.
    pub requested: usize,
    /// The longest text that would still have fit.
    pub available: usize,
}
