use crate::Handle;

/// One slot of the backing store.
///
/// A slot is never deallocated individually. Once created it either belongs to a live stack or
/// sits in the free list waiting to be recycled by a later push.
#[derive(Debug)]
pub(crate) struct Node<T> {
    pub(crate) value: T,

    /// The following node in the same stack (or free list), [`Handle::END`] if none.
    pub(crate) next: Handle,

    /// True iff this node is currently the topmost node of some live stack.
    /// Always false for nodes in the free list.
    pub(crate) is_head: bool,
}

impl<T> Node<T> {
    /// A node that is about to become the head of a stack whose previous head is `next`.
    #[must_use]
    pub(crate) fn new_head(value: T, next: Handle) -> Self {
        Self {
            value,
            next,
            is_head: true,
        }
    }
}
