use std::collections::TryReserveError;

use thiserror::Error;

use crate::Handle;

/// Errors that can occur when operating on a [`StackPool`][crate::StackPool].
///
/// Every error aborts only the operation that raised it. A failed operation leaves the pool
/// exactly as it was before the call.
///
/// There is no "wrong value type" error: the value type is a generic parameter of the pool, so
/// inserting a value of another type is rejected by the compiler.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The handle does not refer to a slot that has been allocated in the pool.
    ///
    /// [`Handle::END`] is never dereferenceable, so it also produces this error when used with
    /// a field accessor.
    #[error("handle {handle} does not refer to an allocated slot (pool has {slot_count} slots)")]
    OutOfRange {
        /// The offending handle.
        handle: Handle,

        /// The number of slots allocated in the pool when the error occurred.
        slot_count: usize,
    },

    /// The handle refers to a node that is not currently the head of a stack.
    ///
    /// Only the current head of a stack may be popped or pushed onto. Handles become stale when
    /// another value is pushed on top of them or when they are popped.
    #[error("handle {handle} is not the head of a stack")]
    NotHead {
        /// The offending handle.
        handle: Handle,
    },

    /// Attempted to pop from an empty stack (the [`Handle::END`] sentinel).
    #[error("cannot pop from an empty stack")]
    EmptyStack,

    /// The backing store could not grow.
    #[error("failed to grow the backing store by {additional} slots")]
    AllocationFailed {
        /// The number of additional slots that were requested.
        additional: usize,

        /// The underlying allocation failure.
        #[source]
        source: TryReserveError,
    },
}

/// A specialized `Result` type for stack pool operations, returning the crate's
/// [`Error`] type as the error value.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::error::Error as _;
    use std::fmt::Debug;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(Error: Send, Sync, Debug);

    #[test]
    fn messages_name_the_handle() {
        let error = Error::OutOfRange {
            handle: Handle::from_raw(9),
            slot_count: 3,
        };
        assert_eq!(
            error.to_string(),
            "handle 9 does not refer to an allocated slot (pool has 3 slots)"
        );

        let error = Error::NotHead {
            handle: Handle::from_raw(2),
        };
        assert_eq!(error.to_string(), "handle 2 is not the head of a stack");

        assert_eq!(Error::EmptyStack.to_string(), "cannot pop from an empty stack");
    }

    #[test]
    fn allocation_failure_exposes_source() {
        let source = Vec::<u64>::new()
            .try_reserve(usize::MAX)
            .expect_err("reserving usize::MAX elements of u64 must overflow");

        let error = Error::AllocationFailed {
            additional: usize::MAX,
            source,
        };

        assert!(error.source().is_some());
    }
}
