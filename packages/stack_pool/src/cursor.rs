use std::any::type_name;
use std::fmt;
use std::iter::FusedIterator;

use crate::{Handle, Result, StackPool};

/// A forward-only position within one stack of a [`StackPool`].
///
/// Obtained from [`StackPool::begin()`] (the head of a stack) or [`StackPool::end()`] (past the
/// bottom node). Two cursors compare equal when they point at the same handle, so a cursor that
/// has advanced past the bottom of any stack equals the end cursor.
///
/// The cursor borrows the pool, so the stack cannot be pushed onto or popped while a cursor
/// over it exists.
///
/// # Examples
///
/// ```
/// use stack_pool::StackPool;
///
/// let mut pool = StackPool::<u32>::new();
/// let stack = pool.push(1, pool.new_stack()).unwrap();
/// let stack = pool.push(2, stack).unwrap();
///
/// let mut cursor = pool.begin(stack);
/// let end = pool.end(stack);
///
/// let mut values = Vec::new();
/// while cursor != end {
///     values.push(*cursor.value().unwrap());
///     cursor.advance().unwrap();
/// }
///
/// assert_eq!(values, [2, 1]);
/// ```
pub struct Cursor<'p, T> {
    pool: &'p StackPool<T>,
    current: Handle,
}

impl<'p, T> Cursor<'p, T> {
    pub(crate) fn new(pool: &'p StackPool<T>, current: Handle) -> Self {
        Self { pool, current }
    }

    /// The handle of the node the cursor points at.
    #[must_use]
    pub fn handle(&self) -> Handle {
        self.current
    }

    /// Whether the cursor has moved past the bottom of the stack.
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.current.is_end()
    }

    /// The value of the node the cursor points at.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`][crate::Error::OutOfRange] for the end cursor or if the
    /// cursor was created from a handle that does not refer to an allocated slot.
    pub fn value(&self) -> Result<&'p T> {
        self.pool.value(self.current)
    }

    /// Moves the cursor to the node below the current one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`][crate::Error::OutOfRange] if the cursor is already at the
    /// end or was created from a handle that does not refer to an allocated slot. The cursor
    /// does not move in that case.
    pub fn advance(&mut self) -> Result<()> {
        self.current = self.pool.next(self.current)?;
        Ok(())
    }
}

impl<T> Clone for Cursor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Cursor<'_, T> {}

impl<T> PartialEq for Cursor<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.current == other.current
    }
}

impl<T> Eq for Cursor<'_, T> {}

impl<T> fmt::Debug for Cursor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(type_name::<Self>())
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

impl<'p, T> IntoIterator for Cursor<'p, T> {
    type Item = &'p T;
    type IntoIter = Iter<'p, T>;

    fn into_iter(self) -> Self::IntoIter {
        Iter::new(self.pool, self.current)
    }
}

/// Like [`Cursor`] but grants exclusive access to the values it passes over.
///
/// Only values can be modified; the shape of the stack stays the same.
///
/// # Examples
///
/// ```
/// use stack_pool::StackPool;
///
/// let mut pool = StackPool::<u32>::new();
/// let stack = pool.push(1, pool.new_stack()).unwrap();
/// let stack = pool.push(2, stack).unwrap();
///
/// let mut cursor = pool.cursor_mut(stack);
/// while !cursor.is_end() {
///     *cursor.value_mut().unwrap() *= 10;
///     cursor.advance().unwrap();
/// }
///
/// assert_eq!(pool.iter(stack).copied().collect::<Vec<_>>(), [20, 10]);
/// ```
pub struct CursorMut<'p, T> {
    pool: &'p mut StackPool<T>,
    current: Handle,
}

impl<'p, T> CursorMut<'p, T> {
    pub(crate) fn new(pool: &'p mut StackPool<T>, current: Handle) -> Self {
        Self { pool, current }
    }

    /// The handle of the node the cursor points at.
    #[must_use]
    pub fn handle(&self) -> Handle {
        self.current
    }

    /// Whether the cursor has moved past the bottom of the stack.
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.current.is_end()
    }

    /// The value of the node the cursor points at.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`][crate::Error::OutOfRange] if the cursor is at the end.
    pub fn value(&self) -> Result<&T> {
        self.pool.value(self.current)
    }

    /// Exclusive access to the value of the node the cursor points at.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`][crate::Error::OutOfRange] if the cursor is at the end.
    pub fn value_mut(&mut self) -> Result<&mut T> {
        self.pool.value_mut(self.current)
    }

    /// Moves the cursor to the node below the current one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`][crate::Error::OutOfRange] if the cursor is already at the
    /// end. The cursor does not move in that case.
    pub fn advance(&mut self) -> Result<()> {
        self.current = self.pool.next(self.current)?;
        Ok(())
    }
}

impl<T> fmt::Debug for CursorMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(type_name::<Self>())
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

/// Iterates over the values of one stack, from the head to the bottom.
///
/// Returned by [`StackPool::iter()`]. Iteration stops at [`Handle::END`] or at the first handle
/// that does not refer to an allocated slot.
pub struct Iter<'p, T> {
    pool: &'p StackPool<T>,
    current: Handle,
}

impl<'p, T> Iter<'p, T> {
    pub(crate) fn new(pool: &'p StackPool<T>, current: Handle) -> Self {
        Self { pool, current }
    }
}

impl<'p, T> Iterator for Iter<'p, T> {
    type Item = &'p T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.pool.node(self.current).ok()?;
        self.current = node.next;

        Some(&node.value)
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool,
            current: self.current,
        }
    }
}

impl<T> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(type_name::<Self>())
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}
