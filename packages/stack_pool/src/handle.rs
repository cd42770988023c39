use std::fmt;

/// Identifies one node slot in a [`StackPool`][crate::StackPool].
///
/// A stack is never materialized as an object; it is simply the handle of its current head
/// node, held by the caller. Every operation that changes the head of a stack returns the new
/// head handle, which the caller must store in place of the old one.
///
/// The raw value of a handle is the 1-based position of its slot in the pool's backing store.
/// The raw value 0 is reserved as [`Handle::END`], shared by every stack as "no node": it is the
/// handle of an empty stack and the end of every traversal. The pool never hands out
/// [`Handle::END`] as the handle of an allocated node.
///
/// Handles are plain indices, so they stay valid when the backing store reallocates.
///
/// # Examples
///
/// ```
/// use stack_pool::{Handle, StackPool};
///
/// let mut pool = StackPool::<u32>::new();
///
/// let stack = pool.new_stack();
/// assert_eq!(stack, Handle::END);
///
/// let stack = pool.push(7, stack).unwrap();
/// assert_ne!(stack, Handle::END);
/// assert_eq!(stack.as_raw(), 1);
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Handle(usize);

impl Handle {
    /// The sentinel handle: an empty stack, the end of a traversal or an empty free list.
    pub const END: Self = Self(0);

    /// Creates a handle from its raw value.
    ///
    /// Any value is accepted. Handles that do not refer to an allocated slot are rejected with
    /// [`Error::OutOfRange`][crate::Error::OutOfRange] by the pool when used.
    #[must_use]
    pub const fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    /// The raw value of the handle. [`Handle::END`] has the raw value 0.
    #[must_use]
    pub const fn as_raw(self) -> usize {
        self.0
    }

    /// Whether this is the [`Handle::END`] sentinel.
    #[must_use]
    pub const fn is_end(self) -> bool {
        self.0 == 0
    }

    /// Position of the slot in the backing store, or `None` for the sentinel.
    #[must_use]
    pub(crate) fn slot_index(self) -> Option<usize> {
        self.0.checked_sub(1)
    }

    #[must_use]
    pub(crate) fn from_slot_index(index: usize) -> Self {
        Self(
            index
                .checked_add(1)
                .expect("a backing store can never hold usize::MAX slots, so index + 1 fits"),
        )
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Handle> for usize {
    fn from(value: Handle) -> Self {
        value.0
    }
}
