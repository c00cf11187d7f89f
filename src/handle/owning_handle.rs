use std::fmt::{self, Debug, Formatter};
use std::marker::PhantomData;
use std::mem;
use std::ptr::NonNull;

use derive_more::IsVariant;
use tracing::trace;

/// The two states an [`OwningHandle`] can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IsVariant)]
pub enum HandleState {
    /// The handle owns nothing.
    Empty,
    /// The handle owns exactly one heap-allocated value.
    Owning,
}

/// A handle which is the sole owner of a single heap-allocated value, similar to a
/// [`Box<T>`](Box) that can also be empty.
///
/// The value is destroyed exactly once, when the owning handle is dropped, unless ownership is
/// relinquished first with [`release`](OwningHandle::release). Ownership can be transferred but
/// never shared: there is no [`Clone`] implementation, so attempting to duplicate a handle is
/// rejected at compile time.
///
/// ```compile_fail
/// # use ownership_lib::handle::OwningHandle;
/// let a = OwningHandle::new_with(5);
/// let b = a.clone();
/// ```
///
/// # State
/// A handle is either [`Empty`](HandleState::Empty) or [`Owning`](HandleState::Owning).
/// - [`new`](OwningHandle::new) creates an empty handle; [`new_with`](OwningHandle::new_with)
///   and [`from_box`](OwningHandle::from_box) create an owning one.
/// - Moving out of a handle with [`take`](OwningHandle::take) or
///   [`move_from`](OwningHandle::move_from) leaves the source empty.
/// - [`release`](OwningHandle::release) hands the value to the caller and leaves the handle
///   empty.
/// - The only ways back to owning are [`reset`](OwningHandle::reset) or another transfer.
pub struct OwningHandle<T> {
    pub(crate) ptr: Option<NonNull<T>>,
    pub(crate) _phantom: PhantomData<T>,
}

impl<T> OwningHandle<T> {
    /// Creates an empty OwningHandle.
    ///
    /// # Examples
    /// ```
    /// # use ownership_lib::handle::OwningHandle;
    /// let handle: OwningHandle<u8> = OwningHandle::new();
    /// assert!(handle.is_empty());
    /// assert_eq!(handle.get(), None);
    /// ```
    pub const fn new() -> OwningHandle<T> {
        OwningHandle {
            ptr: None,
            _phantom: PhantomData,
        }
    }

    /// Creates an OwningHandle which takes ownership of an existing allocation.
    pub fn from_box(value: Box<T>) -> OwningHandle<T> {
        trace!(ty = std::any::type_name::<T>(), "handle adopted value");

        OwningHandle {
            ptr: Some(NonNull::from(Box::leak(value))),
            _phantom: PhantomData,
        }
    }

    /// Allocates `value` on the heap and creates an OwningHandle which owns it.
    ///
    /// # Examples
    /// ```
    /// # use ownership_lib::handle::OwningHandle;
    /// let handle = OwningHandle::new_with(String::from("ptr_a"));
    /// assert_eq!(handle.get().map(String::as_str), Some("ptr_a"));
    /// ```
    pub fn new_with(value: T) -> OwningHandle<T> {
        Self::from_box(Box::new(value))
    }

    /// Creates an OwningHandle from a pointer previously produced by
    /// [`release_raw`](OwningHandle::release_raw).
    ///
    /// # Safety
    /// `ptr` must have been produced by [`release_raw`](OwningHandle::release_raw) (or
    /// [`Box::into_raw`]) and must not be owned by anything else. After this call, the handle is
    /// responsible for destroying the value.
    ///
    /// # Examples
    /// ```
    /// # use ownership_lib::handle::OwningHandle;
    /// let mut a = OwningHandle::new_with(7_u32);
    /// let ptr = a.release_raw().unwrap();
    /// assert!(a.is_empty());
    ///
    /// // SAFETY: ptr was released by a and nothing else owns it.
    /// let b = unsafe { OwningHandle::from_raw(ptr) };
    /// assert_eq!(b.get(), Some(&7));
    /// ```
    pub const unsafe fn from_raw(ptr: NonNull<T>) -> OwningHandle<T> {
        OwningHandle {
            ptr: Some(ptr),
            _phantom: PhantomData,
        }
    }

    /// Returns the current [`HandleState`].
    pub const fn state(&self) -> HandleState {
        match self.ptr {
            Some(_) => HandleState::Owning,
            None => HandleState::Empty,
        }
    }

    /// Returns true if the OwningHandle owns nothing.
    pub const fn is_empty(&self) -> bool {
        self.ptr.is_none()
    }

    /// Returns true if the OwningHandle owns a value.
    pub const fn is_owning(&self) -> bool {
        self.ptr.is_some()
    }

    /// Returns a reference to the owned value, or None if the handle is empty. Ownership is not
    /// affected.
    pub fn get(&self) -> Option<&T> {
        // SAFETY: The pointer is uniquely owned by self and points to a live value, so it can be
        // borrowed for as long as self is.
        self.ptr.map(|ptr| unsafe { ptr.as_ref() })
    }

    /// Returns a mutable reference to the owned value, or None if the handle is empty.
    pub fn get_mut(&mut self) -> Option<&mut T> {
        // SAFETY: As for get, and &mut self guarantees that no other reference exists.
        self.ptr.map(|mut ptr| unsafe { ptr.as_mut() })
    }

    /// Relinquishes ownership of the value without destroying it, leaving the handle empty. The
    /// caller becomes responsible for the returned value.
    ///
    /// # Examples
    /// ```
    /// # use ownership_lib::handle::OwningHandle;
    /// let mut handle = OwningHandle::new_with(vec![1, 2, 3]);
    /// let value = handle.release();
    /// assert!(handle.is_empty());
    /// assert_eq!(value.as_deref(), Some(&vec![1, 2, 3]));
    /// ```
    pub fn release(&mut self) -> Option<Box<T>> {
        // SAFETY: The pointer was created from a Box and is uniquely owned by self. Taking it out
        // of self means that it is converted back into a Box exactly once.
        self.release_raw().map(|ptr| unsafe { Box::from_raw(ptr.as_ptr()) })
    }

    /// Relinquishes ownership of the value as a raw pointer, leaving the handle empty. The value
    /// can be reclaimed with [`from_raw`](OwningHandle::from_raw), otherwise it is leaked.
    #[must_use = "losing the pointer leaks the value"]
    pub fn release_raw(&mut self) -> Option<NonNull<T>> {
        let ptr = self.ptr.take();
        if ptr.is_some() {
            trace!(ty = std::any::type_name::<T>(), "handle released ownership");
        }
        ptr
    }

    /// Moves the value out of self into a new OwningHandle, leaving self empty.
    pub fn take(&mut self) -> OwningHandle<T> {
        mem::take(self)
    }

    /// Destroys the value currently owned by self, if any, then takes ownership of `other`'s
    /// value, leaving `other` empty.
    ///
    /// Both handles are borrowed mutably, so a handle can't be moved into itself this way.
    ///
    /// # Examples
    /// ```
    /// # use ownership_lib::handle::OwningHandle;
    /// let mut a = OwningHandle::new_with("a");
    /// let mut b = OwningHandle::new_with("b");
    /// b.move_from(&mut a);
    /// assert_eq!(a.get(), None);
    /// assert_eq!(b.get(), Some(&"a"));
    /// ```
    pub fn move_from(&mut self, other: &mut OwningHandle<T>) {
        *self = other.take();
    }

    /// Replaces the owned value with `value`, destroying the previous value if there was one.
    pub fn reset(&mut self, value: Option<Box<T>>) {
        *self = match value {
            Some(value) => Self::from_box(value),
            None => Self::new(),
        };
    }
}

impl<T> Default for OwningHandle<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for OwningHandle<T> {
    fn drop(&mut self) {
        if let Some(ptr) = self.ptr.take() {
            // SAFETY: The pointer was created from a Box and is uniquely owned by self, which is
            // being dropped, so the value is destroyed exactly once.
            drop(unsafe { Box::from_raw(ptr.as_ptr()) });
            trace!(ty = std::any::type_name::<T>(), "handle destroyed value");
        }
    }
}

impl<T> From<Box<T>> for OwningHandle<T> {
    fn from(value: Box<T>) -> Self {
        Self::from_box(value)
    }
}

impl<T> From<Option<Box<T>>> for OwningHandle<T> {
    fn from(value: Option<Box<T>>) -> Self {
        value.map_or_else(Self::new, Self::from_box)
    }
}

// SAFETY: OwningHandle uniquely owns its value, like a Box<T>, so it is safe for Send when T: Send.
unsafe impl<T: Send> Send for OwningHandle<T> {}
// SAFETY: OwningHandle's safe API only allows mutation through &mut self, so it can safely
// implement Sync when T: Sync.
unsafe impl<T: Sync> Sync for OwningHandle<T> {}

impl<T: Debug> Debug for OwningHandle<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(value) => f.debug_tuple("Owning").field(value).finish(),
            None => f.write_str("Empty"),
        }
    }
}
