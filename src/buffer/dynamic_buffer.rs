use std::alloc::{self, Layout};
use std::ffi::CStr;
use std::fmt::{self, Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::mem;
use std::ptr::{self, NonNull};
use std::slice;
use std::str;

use tracing::trace;

use super::error::{CapacityExceeded, InvalidCapacity};

const SEPARATOR: u8 = b'\n';
const TERMINATOR: u8 = 0;

/// Every appended line costs its text plus a separator and a terminator.
const LINE_OVERHEAD: usize = 2;

/// A text buffer with a capacity fixed at construction, which grows by appending lines.
///
/// The storage is always exactly `cap` bytes long and the content is always followed by a NUL
/// terminator, so `len() + 1 <= cap()` holds for every live buffer. Appending never reallocates:
/// a line that doesn't fit is rejected with [`CapacityExceeded`] and the buffer is left untouched.
///
/// # Ownership
/// Each live buffer owns its own allocation.
/// - [`Clone::clone`] and [`Clone::clone_from`] perform a deep copy, the copy and the original
///   never observe each other's changes.
/// - [`DynamicBuffer::move_from`], [`DynamicBuffer::take`] and ordinary moves transfer the
///   allocation without copying. The source of `move_from` and `take` is left in the moved-from
///   state: capacity 0, length 0, no allocation. A moved-from buffer can be dropped, assigned to
///   or read as empty, but every append to it fails.
///
/// # Time Complexity
/// For this analysis of time complexity, variables are defined as follows:
/// - `n`: The length of the buffer's content.
/// - `m`: The length of the appended text.
///
/// | Method | Complexity |
/// |-|-|
/// | `new` | `O(1)` |
/// | `append` | `O(m)` |
/// | `content` | `O(1)` |
/// | `clone` | `O(n)` |
/// | `move_from` | `O(1)` |
pub struct DynamicBuffer {
    pub(crate) ptr: NonNull<u8>,
    pub(crate) cap: usize,
    pub(crate) len: usize,
}

impl DynamicBuffer {
    /// Creates a new, empty DynamicBuffer with storage for exactly `cap` bytes, including the
    /// terminator.
    ///
    /// # Errors
    /// Returns [`InvalidCapacity`] if `cap` is zero.
    ///
    /// # Panics
    /// Panics if `cap` exceeds [`isize::MAX`].
    ///
    /// # Examples
    /// ```
    /// # use ownership_lib::buffer::{DynamicBuffer, InvalidCapacity};
    /// let buf = DynamicBuffer::new(10).unwrap();
    /// assert_eq!(buf.cap(), 10);
    /// assert_eq!(buf.len(), 0);
    /// assert_eq!(DynamicBuffer::new(0), Err(InvalidCapacity));
    /// ```
    pub fn new(cap: usize) -> Result<DynamicBuffer, InvalidCapacity> {
        if cap == 0 {
            return Err(InvalidCapacity);
        }

        let ptr = Self::make_ptr(Self::make_layout(cap));

        // SAFETY: The allocation holds cap > 0 bytes, so index 0 is in bounds.
        unsafe {
            ptr.write(TERMINATOR);
        }

        trace!(cap, "allocated buffer storage");

        Ok(DynamicBuffer { ptr, cap, len: 0 })
    }

    /// Returns the capacity of the DynamicBuffer, which is 0 only in the moved-from state.
    pub const fn cap(&self) -> usize {
        self.cap
    }

    /// Returns the length of the content, excluding the terminator.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the DynamicBuffer has no content.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the length of the longest text that [`append`](DynamicBuffer::append) would still
    /// accept.
    ///
    /// # Examples
    /// ```
    /// # use ownership_lib::buffer::DynamicBuffer;
    /// let mut buf = DynamicBuffer::new(10).unwrap();
    /// assert_eq!(buf.remaining(), 8);
    /// buf.append("ab").unwrap();
    /// assert_eq!(buf.remaining(), 5);
    /// ```
    pub const fn remaining(&self) -> usize {
        self.cap.saturating_sub(self.len + LINE_OVERHEAD)
    }

    /// Returns true if the storage of this DynamicBuffer has been handed to another one.
    pub const fn is_moved_from(&self) -> bool {
        self.cap == 0
    }

    /// Appends `text` followed by a line separator.
    ///
    /// The text, the separator and the terminator all have to fit within the capacity. If they
    /// don't, nothing is written. Running out of room is an expected condition rather than a
    /// bug, so callers are expected to check the result and decide whether to shorten the text,
    /// use a larger buffer or give up.
    ///
    /// # Errors
    /// Returns [`CapacityExceeded`] if `len() + text.len() + 2 > cap()`. Appending to a moved-from
    /// buffer always fails.
    ///
    /// # Examples
    /// ```
    /// # use ownership_lib::buffer::DynamicBuffer;
    /// let mut buf = DynamicBuffer::new(10).unwrap();
    /// assert!(buf.append("ab").is_ok());
    /// assert_eq!(buf.content(), "ab\n");
    ///
    /// assert!(buf.append("abcdefgh").is_err());
    /// assert_eq!(buf.content(), "ab\n");
    /// ```
    pub fn append(&mut self, text: &str) -> Result<(), CapacityExceeded> {
        let fits = self
            .len
            .checked_add(text.len())
            .and_then(|n| n.checked_add(LINE_OVERHEAD))
            .is_some_and(|required| required <= self.cap);

        if !fits {
            return Err(CapacityExceeded {
                requested: text.len(),
                available: self.remaining(),
            });
        }

        // SAFETY: len + text.len() + 2 <= cap, so every byte written here is within the
        // allocation. The text is borrowed from the caller and can't overlap storage owned by
        // self, which is only reachable through &mut self.
        unsafe {
            let end = self.ptr.add(self.len);
            ptr::copy_nonoverlapping(text.as_ptr(), end.as_ptr(), text.len());
            end.add(text.len()).write(SEPARATOR);
            end.add(text.len() + 1).write(TERMINATOR);
        }

        self.len += text.len() + 1;
        Ok(())
    }

    /// Returns the content of the DynamicBuffer, excluding the terminator.
    pub fn content(&self) -> &str {
        // SAFETY: The content is only ever written from &str values and ASCII separators, so it
        // is always valid UTF-8.
        unsafe { str::from_utf8_unchecked(self.as_bytes()) }
    }

    /// Returns the content of the DynamicBuffer as bytes, excluding the terminator.
    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: The first len bytes are initialized. For a moved-from buffer, len is 0 and the
        // dangling pointer is non-null and aligned, which is all a zero-length slice needs.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    /// Returns the content of the DynamicBuffer as bytes, including the terminator. A moved-from
    /// buffer has no terminator and produces an empty slice.
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        if self.cap == 0 {
            return &[];
        }

        // SAFETY: Live buffers always have an initialized terminator at index len < cap.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len + 1) }
    }

    /// Returns the content as a [`CStr`]. If an appended line contained a NUL byte, the C string
    /// ends there.
    ///
    /// # Examples
    /// ```
    /// # use ownership_lib::buffer::DynamicBuffer;
    /// let mut buf = DynamicBuffer::new(8).unwrap();
    /// buf.append("hi").unwrap();
    /// assert_eq!(buf.as_c_str(), c"hi\n");
    /// ```
    pub fn as_c_str(&self) -> &CStr {
        CStr::from_bytes_until_nul(self.as_bytes_with_nul()).unwrap_or_default()
    }

    /// Takes ownership of `other`'s storage, releasing the storage previously held by self. No
    /// bytes are copied and `other` is left in the moved-from state.
    ///
    /// # Examples
    /// ```
    /// # use ownership_lib::buffer::DynamicBuffer;
    /// let mut a = DynamicBuffer::new(50).unwrap();
    /// a.append("We apologize for").unwrap();
    /// let mut b = DynamicBuffer::new(50).unwrap();
    /// b.append("Last Message").unwrap();
    ///
    /// b.move_from(&mut a);
    /// assert_eq!(b.content(), "We apologize for\n");
    /// assert!(a.is_moved_from());
    /// ```
    pub fn move_from(&mut self, other: &mut DynamicBuffer) {
        trace!(cap = other.cap, len = other.len, "moving buffer storage");
        *self = mem::take(other);
    }

    /// Moves the storage out of self into a new DynamicBuffer, leaving self in the moved-from
    /// state.
    pub fn take(&mut self) -> DynamicBuffer {
        mem::take(self)
    }

    /// Returns a value which displays the content prefixed with `tag`, as in `"{tag}: {content}"`.
    ///
    /// # Examples
    /// ```
    /// # use ownership_lib::buffer::DynamicBuffer;
    /// let mut buf = DynamicBuffer::new(16).unwrap();
    /// buf.append("Galactica!").unwrap();
    /// assert_eq!(buf.tagged("A").to_string(), "A: Galactica!\n");
    /// ```
    pub const fn tagged<'a>(&'a self, tag: &'a str) -> Tagged<'a> {
        Tagged { tag, buf: self }
    }
}

impl DynamicBuffer {
    /// A helper function to create a [`Layout`] for `cap` bytes.
    ///
    /// # Panics
    /// Panics if `cap` exceeds [`isize::MAX`].
    pub(crate) fn make_layout(cap: usize) -> Layout {
        Layout::array::<u8>(cap).expect("Capacity overflow!")
    }

    /// A helper function to allocate storage for a non-zero-sized [`Layout`].
    ///
    /// # Errors
    /// In the event of an allocation error, this method calls [`alloc::handle_alloc_error`] as
    /// recommended, to avoid new allocations rather than panicking.
    pub(crate) fn make_ptr(layout: Layout) -> NonNull<u8> {
        debug_assert_ne!(layout.size(), 0);

        NonNull::new(
            // SAFETY: Callers only request layouts for a capacity of at least 1.
            unsafe { alloc::alloc(layout) }
        ).unwrap_or_else(|| alloc::handle_alloc_error(layout))
    }
}

impl Default for DynamicBuffer {
    /// Creates a DynamicBuffer in the moved-from state, without allocating.
    fn default() -> Self {
        DynamicBuffer {
            ptr: NonNull::dangling(),
            cap: 0,
            len: 0,
        }
    }
}

impl Drop for DynamicBuffer {
    fn drop(&mut self) {
        if self.cap == 0 {
            return;
        }

        // SAFETY: ptr was allocated in the global allocator with the layout for cap bytes, and
        // ownership of it is never shared, so this is the only deallocation.
        unsafe {
            alloc::dealloc(self.ptr.as_ptr(), Self::make_layout(self.cap));
        }

        trace!(cap = self.cap, "released buffer storage");
    }
}

impl Clone for DynamicBuffer {
    /// Creates a deep copy, with its own storage of the same capacity.
    fn clone(&self) -> Self {
        if self.cap == 0 {
            return DynamicBuffer::default();
        }

        let ptr = Self::make_ptr(Self::make_layout(self.cap));

        // SAFETY: Both allocations hold cap > len bytes and the source has len + 1 initialized
        // bytes. The new allocation can't overlap the existing one.
        unsafe {
            ptr::copy_nonoverlapping(self.ptr.as_ptr(), ptr.as_ptr(), self.len + 1);
        }

        trace!(cap = self.cap, len = self.len, "copied buffer storage");

        DynamicBuffer {
            ptr,
            cap: self.cap,
            len: self.len,
        }
    }

    /// Replaces the content of self with a deep copy of `source`. When both buffers have the same
    /// nonzero capacity the existing storage is reused, otherwise new storage is allocated before
    /// the old storage is released.
    fn clone_from(&mut self, source: &Self) {
        if self.cap != source.cap || self.cap == 0 {
            *self = source.clone();
            return;
        }

        // SAFETY: Both allocations hold cap > len bytes and the source has len + 1 initialized
        // bytes. The borrow of source rules out aliasing self, so the allocations are distinct.
        unsafe {
            ptr::copy_nonoverlapping(source.ptr.as_ptr(), self.ptr.as_ptr(), source.len + 1);
        }
        self.len = source.len;

        trace!(cap = self.cap, len = self.len, "copied buffer storage in place");
    }
}

// SAFETY: DynamicBuffer owns its storage uniquely, like a Box<[u8]>, so it can be sent to another
// thread.
unsafe impl Send for DynamicBuffer {}
// SAFETY: The only way to mutate the storage is through &mut self, so shared references never
// observe interior mutability.
unsafe impl Sync for DynamicBuffer {}

impl PartialEq for DynamicBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for DynamicBuffer {}

impl Hash for DynamicBuffer {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_bytes().hash(state);
    }
}

impl AsRef<str> for DynamicBuffer {
    fn as_ref(&self) -> &str {
        self.content()
    }
}

impl Debug for DynamicBuffer {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicBuffer")
            .field("content", &self.content())
            .field("len", &self.len)
            .field("cap", &self.cap)
            .finish()
    }
}

impl Display for DynamicBuffer {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.content())
    }
}

/// The [`Display`] adapter returned by [`DynamicBuffer::tagged`].
#[derive(Debug, Clone, Copy)]
pub struct Tagged<'a> {
    tag: &'a str,
    buf: &'a DynamicBuffer,
}

impl Display for Tagged<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.tag, self.buf.content())
    }
}
