use std::fmt::{self, Display, Formatter};

use tracing::debug;

use super::error::{InsufficientCapacity, OwnerError};
use crate::buffer::DynamicBuffer;

/// The capacity of the buffer embedded in a [`ResourceOwner`] created with
/// [`ResourceOwner::new`].
pub const OWNER_CAP: usize = 10;

/// A value which owns exactly one [`DynamicBuffer`], and is only ever observable with its required
/// initial line already in place.
///
/// Construction either produces a complete ResourceOwner or an [`OwnerError`]; there is no
/// partially constructed state. If the initial line doesn't fit, the buffer that was already
/// allocated is released on the way out and the owner's own [`Drop`] never runs.
///
/// When a ResourceOwner is dropped, its own cleanup runs first and the embedded buffer is released
/// afterwards. Owners living in nested scopes are dropped in the reverse order of their
/// construction, including while an error is being returned through them; see
/// [`Scope`](crate::scope::Scope) for an explicit version of this.
///
/// # Examples
/// ```
/// # use ownership_lib::owner::{OwnerError, ResourceOwner};
/// let x = ResourceOwner::new("x").unwrap();
/// assert_eq!(x.content(), "x\n");
///
/// let too_long = ResourceOwner::new("cccccccccc");
/// assert!(matches!(too_long, Err(OwnerError::InsufficientCapacity(_))));
/// ```
#[derive(Debug, PartialEq, Eq)]
pub struct ResourceOwner {
    buf: DynamicBuffer,
}

impl ResourceOwner {
    /// Creates a ResourceOwner with a buffer of [`OWNER_CAP`] bytes holding `initial_line`.
    ///
    /// # Errors
    /// Returns [`OwnerError::InsufficientCapacity`] if `initial_line` is longer than
    /// `OWNER_CAP - 2` bytes.
    pub fn new(initial_line: &str) -> Result<ResourceOwner, OwnerError> {
        Self::with_cap(OWNER_CAP, initial_line)
    }

    /// Creates a ResourceOwner with a buffer of `cap` bytes holding `initial_line`.
    ///
    /// # Errors
    /// Returns [`OwnerError::InvalidCapacity`] if `cap` is zero, or
    /// [`OwnerError::InsufficientCapacity`] if `initial_line` doesn't fit.
    pub fn with_cap(cap: usize, initial_line: &str) -> Result<ResourceOwner, OwnerError> {
        let mut buf = DynamicBuffer::new(cap)?;

        // On failure buf is dropped here, before the error reaches the caller.
        buf.append(initial_line).map_err(|_| InsufficientCapacity {
            line_len: initial_line.len(),
            cap,
        })?;

        let owner = ResourceOwner { buf };
        debug!(content = owner.buf.content().trim_end(), "constructed");
        Ok(owner)
    }

    /// Returns the embedded buffer.
    pub const fn buffer(&self) -> &DynamicBuffer {
        &self.buf
    }

    /// Returns the content of the embedded buffer.
    pub fn content(&self) -> &str {
        self.buf.content()
    }
}

impl Drop for ResourceOwner {
    fn drop(&mut self) {
        debug!(content = self.buf.content().trim_end(), "about to destroy");
    }
}

impl Display for ResourceOwner {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.buf, f)
    }
}
