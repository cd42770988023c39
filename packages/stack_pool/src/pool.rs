use std::any::type_name;
use std::{mem, thread};

use tracing::{debug, trace, warn};

use crate::{
    Cursor, CursorMut, DropPolicy, Error, Handle, Iter, Node, Result, StackDisplay,
    StackPoolBuilder,
};

/// A pool of independent LIFO stacks that share one growable backing store.
///
/// Each stack is identified by the [`Handle`] of its current head node. An empty stack is
/// [`Handle::END`], which is also what [`new_stack()`][1] returns. Operations that change the
/// head of a stack return the new head, which replaces the old handle held by the caller:
///
/// ```
/// use stack_pool::StackPool;
///
/// let mut pool = StackPool::<i32>::new();
///
/// let mut stack = pool.new_stack();
/// stack = pool.push(10, stack).unwrap();
/// stack = pool.push(20, stack).unwrap();
///
/// assert_eq!(pool.iter(stack).copied().collect::<Vec<_>>(), [20, 10]);
///
/// stack = pool.pop(stack).unwrap();
/// assert_eq!(*pool.value(stack).unwrap(), 10);
/// ```
///
/// # Slot recycling
///
/// Popped nodes are not deallocated. Their slots go onto an internal free list and are handed
/// out again by the next push, before the backing store is grown. The backing store itself only
/// ever grows. A popped value stays in its slot until the slot is reused or the pool is dropped.
///
/// # Misuse detection
///
/// Only the current head of a stack can be pushed onto or popped. Using a handle that has been
/// pushed over or popped is reported as [`Error::NotHead`], and handles that never referred to
/// an allocated slot are reported as [`Error::OutOfRange`]. A failed operation never modifies
/// the pool.
///
/// # Thread safety
///
/// The pool is designed for a single owner. It may be moved between threads if `T` can be, but
/// concurrent access requires external synchronization around the whole pool.
///
/// [1]: Self::new_stack
#[derive(Debug)]
pub struct StackPool<T> {
    /// Append-only backing store. The node with handle `h` lives at index `h - 1`.
    nodes: Vec<Node<T>>,

    /// Head of the free list, which links recycled slots through their `next` handles exactly
    /// like a regular stack. [`Handle::END`] if there are no recycled slots.
    free_head: Handle,

    /// Number of slots in the free list.
    free_count: usize,

    drop_policy: DropPolicy,
}

impl<T> StackPool<T> {
    #[must_use]
    pub(crate) fn new_inner(drop_policy: DropPolicy) -> Self {
        Self {
            nodes: Vec::new(),
            free_head: Handle::END,
            free_count: 0,
            drop_policy,
        }
    }

    /// Creates an empty pool with the default configuration and no reserved storage.
    ///
    /// # Example
    ///
    /// ```rust
    /// use stack_pool::StackPool;
    ///
    /// let pool = StackPool::<String>::new();
    ///
    /// assert_eq!(pool.capacity(), 0);
    /// assert_eq!(pool.node_count(), 0);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::new_inner(DropPolicy::default())
    }

    /// Creates an empty pool with storage reserved for at least `slots` nodes.
    ///
    /// The capacity is only a performance hint; the pool grows past it as needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocationFailed`] if the storage cannot be reserved.
    pub fn with_capacity(slots: usize) -> Result<Self> {
        Self::builder().initial_capacity(slots).build()
    }

    /// Starts building a new [`StackPool`].
    ///
    /// Use this when you want to customize the pool configuration beyond the defaults.
    pub fn builder() -> StackPoolBuilder<T> {
        StackPoolBuilder::new()
    }

    /// Returns the head of a new, empty stack. This is always [`Handle::END`] and allocates
    /// nothing.
    #[must_use]
    #[expect(
        clippy::unused_self,
        reason = "stacks are created through the pool they will live in"
    )]
    pub fn new_stack(&self) -> Handle {
        Handle::END
    }

    /// Whether the stack with the given head is empty.
    #[must_use]
    #[expect(
        clippy::unused_self,
        reason = "emptiness is a property of the handle, kept on the pool for symmetry"
    )]
    pub fn is_empty(&self, head: Handle) -> bool {
        head.is_end()
    }

    /// The number of nodes the backing store can hold without reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// The number of slots ever allocated in the backing store, including recycled ones.
    ///
    /// Every handle from 1 to this value (inclusive) refers to an allocated slot.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.nodes.len()
    }

    /// The number of recycled slots waiting to be reused by a push.
    #[must_use]
    pub fn free_slot_count(&self) -> usize {
        self.free_count
    }

    /// The number of nodes currently linked into live stacks.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes
            .len()
            .checked_sub(self.free_count)
            .expect("free slots are a subset of allocated slots")
    }

    /// Reserves capacity for at least `additional` more slots beyond those already allocated.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocationFailed`] if the storage cannot grow. The pool is unchanged.
    ///
    /// # Example
    ///
    /// ```rust
    /// use stack_pool::StackPool;
    ///
    /// let mut pool = StackPool::<u32>::new();
    /// pool.reserve(10).unwrap();
    ///
    /// assert!(pool.capacity() >= 10);
    /// ```
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        self.try_grow(additional)?;

        debug!(
            additional,
            capacity = self.nodes.capacity(),
            value_type = type_name::<T>(),
            "reserved stack pool storage"
        );

        Ok(())
    }

    /// Pushes `value` onto the stack whose head is `head` and returns the new head.
    ///
    /// A slot recycled by an earlier pop is reused if one is available. Otherwise a new slot is
    /// appended to the backing store. The previous head stops being a head, so its handle can
    /// no longer be used to pop.
    ///
    /// # Errors
    ///
    /// * [`Error::OutOfRange`] if `head` is neither [`Handle::END`] nor an allocated slot.
    /// * [`Error::NotHead`] if `head` is an allocated slot that is not a stack head.
    /// * [`Error::AllocationFailed`] if the backing store needs to grow and cannot.
    ///
    /// # Example
    ///
    /// ```rust
    /// use stack_pool::StackPool;
    ///
    /// let mut pool = StackPool::<u32>::new();
    ///
    /// let first = pool.push(1, pool.new_stack()).unwrap();
    /// let second = pool.push(2, first).unwrap();
    ///
    /// assert!(pool.is_head(second).unwrap());
    /// assert!(!pool.is_head(first).unwrap());
    /// ```
    pub fn push(&mut self, value: T, head: Handle) -> Result<Handle> {
        self.ensure_head(head)?;

        let new_head = if self.free_head.is_end() {
            self.append(value, head)?
        } else {
            self.reuse_free_slot(value, head)?
        };

        if !head.is_end() {
            self.node_mut(head)
                .expect("head was validated at the start of the push")
                .is_head = false;
        }

        Ok(new_head)
    }

    fn append(&mut self, value: T, head: Handle) -> Result<Handle> {
        if self.nodes.len() == self.nodes.capacity() {
            let old_capacity = self.nodes.capacity();

            self.try_grow(1)?;

            trace!(
                old_capacity,
                new_capacity = self.nodes.capacity(),
                "stack pool storage grew"
            );
        }

        let handle = Handle::from_slot_index(self.nodes.len());
        self.nodes.push(Node::new_head(value, head));

        Ok(handle)
    }

    fn reuse_free_slot(&mut self, value: T, head: Handle) -> Result<Handle> {
        let handle = self.free_head;

        let slot = self.node_mut(handle)?;
        let next_free = slot.next;
        *slot = Node::new_head(value, head);

        self.free_head = next_free;
        self.free_count = self
            .free_count
            .checked_sub(1)
            .expect("the free list was not empty so its count is non-zero");

        Ok(handle)
    }

    /// Removes the head node of a stack and returns the new head, which is [`Handle::END`] if
    /// the stack is now empty.
    ///
    /// The slot of the removed node is recycled for a future push.
    ///
    /// # Errors
    ///
    /// * [`Error::EmptyStack`] if `head` is [`Handle::END`].
    /// * [`Error::OutOfRange`] if `head` does not refer to an allocated slot.
    /// * [`Error::NotHead`] if `head` is not currently the head of a stack.
    ///
    /// # Example
    ///
    /// ```rust
    /// use stack_pool::{Error, Handle, StackPool};
    ///
    /// let mut pool = StackPool::<u32>::new();
    ///
    /// let stack = pool.push(1, pool.new_stack()).unwrap();
    /// let stack = pool.pop(stack).unwrap();
    /// assert_eq!(stack, Handle::END);
    ///
    /// assert!(matches!(pool.pop(stack), Err(Error::EmptyStack)));
    /// ```
    pub fn pop(&mut self, head: Handle) -> Result<Handle> {
        if head.is_end() {
            return Err(Error::EmptyStack);
        }

        let free_head = self.free_head;
        let node = self.node_mut(head)?;

        if !node.is_head {
            return Err(Error::NotHead { handle: head });
        }

        let successor = mem::replace(&mut node.next, free_head);
        node.is_head = false;

        self.free_head = head;
        self.free_count = self
            .free_count
            .checked_add(1)
            .expect("free slots are bounded by the size of the backing store");

        if !successor.is_end() {
            self.node_mut(successor)
                .expect("next handles always refer to allocated slots")
                .is_head = true;
        }

        Ok(successor)
    }

    /// Pops every node of a stack and returns [`Handle::END`].
    ///
    /// # Errors
    ///
    /// Fails with the same errors as [`pop()`][Self::pop] if `head` is not the head of a stack,
    /// except that freeing an already empty stack succeeds. Only the first pop can fail, so a
    /// failed call leaves the stack intact.
    pub fn free_stack(&mut self, head: Handle) -> Result<Handle> {
        let mut head = head;

        while !head.is_end() {
            head = self.pop(head)?;
        }

        Ok(head)
    }

    /// The number of nodes in the stack with the given head.
    ///
    /// This walks the whole stack. A handle that does not refer to an allocated slot counts as
    /// an empty stack.
    #[must_use]
    pub fn length(&self, head: Handle) -> usize {
        self.iter(head).count()
    }

    /// The value stored in a node.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `handle` does not refer to an allocated slot.
    pub fn value(&self, handle: Handle) -> Result<&T> {
        Ok(&self.node(handle)?.value)
    }

    /// Exclusive access to the value stored in a node.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `handle` does not refer to an allocated slot.
    pub fn value_mut(&mut self, handle: Handle) -> Result<&mut T> {
        Ok(&mut self.node_mut(handle)?.value)
    }

    /// The handle of the node below this one, or [`Handle::END`] if it is the bottom node.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `handle` does not refer to an allocated slot.
    pub fn next(&self, handle: Handle) -> Result<Handle> {
        Ok(self.node(handle)?.next)
    }

    /// Whether the node is currently the head of a stack.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `handle` does not refer to an allocated slot.
    pub fn is_head(&self, handle: Handle) -> Result<bool> {
        Ok(self.node(handle)?.is_head)
    }

    /// Iterates over the values of a stack, from the head to the bottom.
    #[must_use]
    pub fn iter(&self, head: Handle) -> Iter<'_, T> {
        Iter::new(self, head)
    }

    /// A cursor positioned at the head of a stack.
    #[must_use]
    pub fn begin(&self, head: Handle) -> Cursor<'_, T> {
        Cursor::new(self, head)
    }

    /// The end cursor of a stack. This is the same for every stack and compares equal to any
    /// cursor that has advanced past the bottom node.
    #[must_use]
    pub fn end(&self, head: Handle) -> Cursor<'_, T> {
        _ = head;
        Cursor::new(self, Handle::END)
    }

    /// A cursor positioned at the head of a stack that allows modifying values in place.
    #[must_use]
    pub fn cursor_mut(&mut self, head: Handle) -> CursorMut<'_, T> {
        CursorMut::new(self, head)
    }

    /// Displays the values of a stack from the head to the bottom, separated by spaces.
    ///
    /// # Example
    ///
    /// ```rust
    /// use stack_pool::StackPool;
    ///
    /// let mut pool = StackPool::<u32>::new();
    /// let stack = pool.push(1, pool.new_stack()).unwrap();
    /// let stack = pool.push(2, stack).unwrap();
    ///
    /// assert_eq!(pool.display_stack(stack).to_string(), "2 1");
    /// ```
    #[must_use]
    pub fn display_stack(&self, head: Handle) -> StackDisplay<'_, T> {
        StackDisplay::new(self, head)
    }

    pub(crate) fn node(&self, handle: Handle) -> Result<&Node<T>> {
        handle
            .slot_index()
            .and_then(|index| self.nodes.get(index))
            .ok_or(Error::OutOfRange {
                handle,
                slot_count: self.nodes.len(),
            })
    }

    pub(crate) fn node_mut(&mut self, handle: Handle) -> Result<&mut Node<T>> {
        let slot_count = self.nodes.len();

        handle
            .slot_index()
            .and_then(|index| self.nodes.get_mut(index))
            .ok_or(Error::OutOfRange { handle, slot_count })
    }

    /// Only the end sentinel or the current head of a stack may have values pushed onto it.
    fn ensure_head(&self, head: Handle) -> Result<()> {
        if head.is_end() || self.node(head)?.is_head {
            Ok(())
        } else {
            Err(Error::NotHead { handle: head })
        }
    }

    fn try_grow(&mut self, additional: usize) -> Result<()> {
        self.nodes.try_reserve(additional).map_err(|source| {
            warn!(
                additional,
                slot_count = self.nodes.len(),
                value_type = type_name::<T>(),
                "stack pool storage could not grow"
            );

            Error::AllocationFailed { additional, source }
        })
    }

    /// Verifies the structural invariants of the pool, panicking on the first violation.
    #[cfg(test)]
    #[cfg_attr(test, mutants::skip)] // This is essentially test logic, mutation is meaningless.
    pub(crate) fn integrity_check(&self) {
        let slot_count = self.nodes.len();

        // Each slot may be visited at most once, either from the free list or from a stack.
        let mut visited = vec![false; slot_count];

        let mut observed_free_count: usize = 0;
        let mut cursor = self.free_head;

        while !cursor.is_end() {
            let node = self
                .node(cursor)
                .unwrap_or_else(|_| panic!("free list references unallocated slot {cursor}"));

            assert!(!node.is_head, "free slot {cursor} is marked as a stack head");
            Self::mark_visited(&mut visited, cursor);

            observed_free_count = observed_free_count
                .checked_add(1)
                .expect("bounded by the number of slots");
            cursor = node.next;
        }

        assert_eq!(
            observed_free_count, self.free_count,
            "free list length does not match the tracked free slot count"
        );

        for (index, node) in self.nodes.iter().enumerate() {
            let handle = Handle::from_slot_index(index);

            assert!(
                node.next.as_raw() <= slot_count,
                "slot {handle} links to unallocated handle {}",
                node.next
            );

            if !node.is_head {
                continue;
            }

            Self::mark_visited(&mut visited, handle);
            let mut cursor = node.next;

            while !cursor.is_end() {
                let below = self.node(cursor).expect("next handles were checked above");

                assert!(
                    !below.is_head,
                    "stack headed by {handle} contains another head {cursor}"
                );
                Self::mark_visited(&mut visited, cursor);

                cursor = below.next;
            }
        }
    }

    #[cfg(test)]
    fn mark_visited(visited: &mut [bool], handle: Handle) {
        let seen = handle
            .slot_index()
            .and_then(|index| visited.get_mut(index))
            .expect("only allocated slots are visited");

        assert!(
            !*seen,
            "slot {handle} is reachable twice: shared between stacks, in a cycle or both freed and live in a pool of {}",
            type_name::<T>()
        );

        *seen = true;
    }
}

impl<T> Default for StackPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for StackPool<T> {
    fn drop(&mut self) {
        // If we are already panicking, we do not want to panic again because that will
        // simply obscure whatever the original panic was, leading to debug difficulties.
        if self.drop_policy == DropPolicy::MustNotDropNodes && !thread::panicking() {
            let node_count = self.node_count();

            assert!(
                node_count == 0,
                "dropped a stack pool of {} with {node_count} nodes still in live stacks, which its drop policy forbids",
                type_name::<T>()
            );
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    #![allow(
        clippy::indexing_slicing,
        reason = "we do not need to worry about these things when writing test code"
    )]

    use std::cell::Cell;
    use std::rc::Rc;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(StackPool<u32>: Send, Sync);

    fn collect(pool: &StackPool<i32>, head: Handle) -> Vec<i32> {
        pool.iter(head).copied().collect()
    }

    #[test]
    fn smoke_test() {
        let mut pool = StackPool::<i32>::new();

        let h0 = pool.new_stack();
        assert_eq!(h0, Handle::END);

        let h1 = pool.push(10, h0).unwrap();
        let h2 = pool.push(20, h1).unwrap();
        assert_eq!(collect(&pool, h2), [20, 10]);

        let h3 = pool.pop(h2).unwrap();
        assert_eq!(h3, h1);
        assert_eq!(collect(&pool, h3), [10]);

        assert!(matches!(pool.pop(h2), Err(Error::NotHead { handle }) if handle == h2));

        pool.integrity_check();
    }

    #[test]
    fn handles_are_one_based_positions() {
        let mut pool = StackPool::<i32>::new();

        let a = pool.push(1, Handle::END).unwrap();
        let b = pool.push(2, a).unwrap();
        let c = pool.push(3, Handle::END).unwrap();

        assert_eq!(a.as_raw(), 1);
        assert_eq!(b.as_raw(), 2);
        assert_eq!(c.as_raw(), 3);
        assert_eq!(pool.slot_count(), 3);
    }

    #[test]
    fn push_links_and_demotes_previous_head() {
        let mut pool = StackPool::<i32>::new();

        let a = pool.push(1, Handle::END).unwrap();
        assert!(pool.is_head(a).unwrap());
        assert_eq!(pool.next(a).unwrap(), Handle::END);

        let b = pool.push(2, a).unwrap();
        assert!(pool.is_head(b).unwrap());
        assert!(!pool.is_head(a).unwrap());
        assert_eq!(pool.next(b).unwrap(), a);

        pool.integrity_check();
    }

    #[test]
    fn pop_promotes_successor() {
        let mut pool = StackPool::<i32>::new();

        let a = pool.push(1, Handle::END).unwrap();
        let b = pool.push(2, a).unwrap();

        let head = pool.pop(b).unwrap();

        assert_eq!(head, a);
        assert!(pool.is_head(a).unwrap());
        assert!(!pool.is_head(b).unwrap());
        assert_eq!(pool.free_slot_count(), 1);
        assert_eq!(pool.node_count(), 1);

        pool.integrity_check();
    }

    #[test]
    fn push_reuses_most_recently_freed_slot() {
        let mut pool = StackPool::<i32>::new();

        let a = pool.push(1, Handle::END).unwrap();
        let b = pool.push(2, a).unwrap();
        let c = pool.push(3, b).unwrap();

        let head = pool.pop(c).unwrap();
        let head = pool.pop(head).unwrap();
        assert_eq!(head, a);
        assert_eq!(pool.free_slot_count(), 2);

        // The free list is itself a stack, so b (freed last) comes back first.
        let reused_first = pool.push(20, head).unwrap();
        assert_eq!(reused_first, b);

        let reused_second = pool.push(30, reused_first).unwrap();
        assert_eq!(reused_second, c);

        assert_eq!(pool.slot_count(), 3);
        assert_eq!(pool.free_slot_count(), 0);
        assert_eq!(collect(&pool, reused_second), [30, 20, 1]);

        pool.integrity_check();
    }

    #[test]
    fn reused_slot_drops_previous_value() {
        struct Tracked(Rc<Cell<usize>>);

        impl Drop for Tracked {
            fn drop(&mut self) {
                self.0.set(self.0.get() + 1);
            }
        }

        let drops = Rc::new(Cell::new(0_usize));

        let mut pool = StackPool::<Tracked>::new();

        let head = pool
            .push(Tracked(Rc::clone(&drops)), Handle::END)
            .unwrap();
        let head = pool.pop(head).unwrap();

        // Popped values stay in their slot until the slot is reused.
        assert_eq!(drops.get(), 0);

        let head = pool.push(Tracked(Rc::clone(&drops)), head).unwrap();
        assert_eq!(drops.get(), 1);

        _ = head;
        drop(pool);
        assert_eq!(drops.get(), 2);
    }

    #[test]
    fn pop_empty_stack_fails() {
        let mut pool = StackPool::<i32>::new();

        assert!(matches!(pool.pop(Handle::END), Err(Error::EmptyStack)));
    }

    #[test]
    fn pop_out_of_range_fails() {
        let mut pool = StackPool::<i32>::new();
        _ = pool.push(1, Handle::END).unwrap();

        assert!(matches!(
            pool.pop(Handle::from_raw(2)),
            Err(Error::OutOfRange {
                slot_count: 1,
                ..
            })
        ));
    }

    #[test]
    fn push_onto_non_head_fails_without_side_effects() {
        let mut pool = StackPool::<i32>::new();

        let a = pool.push(1, Handle::END).unwrap();
        let b = pool.push(2, a).unwrap();

        assert!(matches!(pool.push(3, a), Err(Error::NotHead { handle }) if handle == a));
        assert_eq!(pool.slot_count(), 2);
        assert_eq!(collect(&pool, b), [2, 1]);

        pool.integrity_check();
    }

    #[test]
    fn push_onto_freed_slot_fails_without_side_effects() {
        let mut pool = StackPool::<i32>::new();

        let a = pool.push(1, Handle::END).unwrap();
        let b = pool.push(2, a).unwrap();
        let head = pool.pop(b).unwrap();

        assert!(matches!(pool.push(3, b), Err(Error::NotHead { .. })));
        assert_eq!(pool.free_slot_count(), 1);
        assert_eq!(collect(&pool, head), [1]);

        pool.integrity_check();
    }

    #[test]
    fn push_onto_out_of_range_fails() {
        let mut pool = StackPool::<i32>::new();

        assert!(matches!(
            pool.push(1, Handle::from_raw(1)),
            Err(Error::OutOfRange {
                slot_count: 0,
                ..
            })
        ));
        assert_eq!(pool.slot_count(), 0);
    }

    #[test]
    fn accessors_reject_sentinel_and_out_of_range() {
        let mut pool = StackPool::<i32>::new();
        let head = pool.push(1, Handle::END).unwrap();

        assert!(matches!(pool.value(Handle::END), Err(Error::OutOfRange { .. })));
        assert!(matches!(pool.next(Handle::END), Err(Error::OutOfRange { .. })));
        assert!(matches!(pool.is_head(Handle::END), Err(Error::OutOfRange { .. })));
        assert!(matches!(
            pool.value_mut(Handle::from_raw(2)),
            Err(Error::OutOfRange { .. })
        ));

        assert_eq!(*pool.value(head).unwrap(), 1);
    }

    #[test]
    fn value_mut_modifies_in_place() {
        let mut pool = StackPool::<i32>::new();
        let head = pool.push(1, Handle::END).unwrap();

        *pool.value_mut(head).unwrap() = 5;

        assert_eq!(*pool.value(head).unwrap(), 5);
    }

    #[test]
    fn free_stack_releases_every_node() {
        let mut pool = StackPool::<i32>::new();

        let mut head = pool.new_stack();
        for value in 0..5 {
            head = pool.push(value, head).unwrap();
        }
        assert_eq!(pool.length(head), 5);

        let head = pool.free_stack(head).unwrap();

        assert_eq!(head, Handle::END);
        assert_eq!(pool.length(head), 0);
        assert_eq!(pool.free_slot_count(), 5);
        assert_eq!(pool.node_count(), 0);

        pool.integrity_check();
    }

    #[test]
    fn free_stack_of_non_head_changes_nothing() {
        let mut pool = StackPool::<i32>::new();

        let a = pool.push(1, Handle::END).unwrap();
        let b = pool.push(2, a).unwrap();

        assert!(matches!(pool.free_stack(a), Err(Error::NotHead { .. })));
        assert_eq!(collect(&pool, b), [2, 1]);
        assert_eq!(pool.free_slot_count(), 0);
    }

    #[test]
    fn free_empty_stack_is_noop() {
        let mut pool = StackPool::<i32>::new();

        assert_eq!(pool.free_stack(Handle::END).unwrap(), Handle::END);
    }

    #[test]
    fn length_of_unallocated_handle_is_zero() {
        let pool = StackPool::<i32>::new();

        assert_eq!(pool.length(Handle::END), 0);
        assert_eq!(pool.length(Handle::from_raw(99)), 0);
    }

    #[test]
    fn stacks_are_isolated() {
        let mut pool = StackPool::<i32>::new();

        let mut a = pool.new_stack();
        let mut b = pool.new_stack();

        for value in 0..3 {
            a = pool.push(value, a).unwrap();
            b = pool.push(value + 100, b).unwrap();
        }

        a = pool.pop(a).unwrap();
        a = pool.push(7, a).unwrap();

        assert_eq!(collect(&pool, a), [7, 1, 0]);
        assert_eq!(collect(&pool, b), [102, 101, 100]);

        pool.integrity_check();
    }

    #[test]
    fn growth_keeps_handles_valid() {
        let mut pool = StackPool::<i32>::new();

        let first = pool.push(-1, Handle::END).unwrap();
        let initial_capacity = pool.capacity();

        let mut head = first;
        for value in 0..1000 {
            head = pool.push(value, head).unwrap();
        }

        assert!(pool.capacity() > initial_capacity);
        assert_eq!(*pool.value(first).unwrap(), -1);
        assert_eq!(pool.length(head), 1001);
    }

    #[test]
    fn reserve_grows_capacity() {
        let mut pool = StackPool::<i32>::new();

        pool.reserve(100).unwrap();

        assert!(pool.capacity() >= 100);
        assert_eq!(pool.slot_count(), 0);
    }

    #[test]
    fn reserve_failure_leaves_pool_intact() {
        let mut pool = StackPool::<u64>::new();
        let head = pool.push(1, Handle::END).unwrap();

        assert!(matches!(
            pool.reserve(usize::MAX),
            Err(Error::AllocationFailed { .. })
        ));
        assert_eq!(pool.length(head), 1);
    }

    #[test]
    fn with_capacity_reserves() {
        let pool = StackPool::<i32>::with_capacity(16).unwrap();

        assert!(pool.capacity() >= 16);
    }

    #[test]
    fn is_empty_checks_for_sentinel() {
        let mut pool = StackPool::<i32>::new();

        assert!(pool.is_empty(pool.new_stack()));

        let head = pool.push(1, Handle::END).unwrap();
        assert!(!pool.is_empty(head));
    }

    #[test]
    fn drop_with_live_nodes_allowed_by_default() {
        let mut pool = StackPool::<i32>::new();
        _ = pool.push(1, Handle::END).unwrap();

        drop(pool);
    }

    #[test]
    #[should_panic]
    fn drop_with_live_nodes_panics_under_strict_policy() {
        let mut pool = StackPool::<i32>::builder()
            .drop_policy(DropPolicy::MustNotDropNodes)
            .build()
            .unwrap();
        _ = pool.push(1, Handle::END).unwrap();

        drop(pool);
    }

    #[test]
    fn drop_after_free_passes_under_strict_policy() {
        let mut pool = StackPool::<i32>::builder()
            .drop_policy(DropPolicy::MustNotDropNodes)
            .build()
            .unwrap();

        let head = pool.push(1, Handle::END).unwrap();
        let head = pool.push(2, head).unwrap();
        pool.free_stack(head).unwrap();

        drop(pool);
    }
}
