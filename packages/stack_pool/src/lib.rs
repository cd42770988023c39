#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! A pool of many independent LIFO stacks stored in one contiguous backing store.
//!
//! This crate provides [`StackPool`], which keeps the nodes of all its stacks in a single
//! growable array and addresses them by integer [`Handle`] instead of by reference. A stack is
//! just the handle of its current head node; the pool keeps no registry of stacks.
//!
//! This is part of the [Folo project](https://github.com/folo-rs/folo) that provides mechanisms for
//! high-performance hardware-aware programming in Rust.
//!
//! # Key Features
//!
//! - **Handles, not references**: handles are 1-based indices, so they stay valid when the
//!   backing store reallocates. The handle [`Handle::END`] (raw value 0) is the empty stack and
//!   the end of every traversal.
//! - **Constant-time operations**: push is amortized O(1), pop is O(1).
//! - **Slot recycling**: popped slots are kept in a free list and reused by later pushes before
//!   the backing store grows. The backing store never shrinks.
//! - **Misuse detection**: popping or pushing onto a handle that is no longer a stack head,
//!   popping an empty stack and using handles outside the pool are reported as [`Error`]s,
//!   and a failed operation leaves the pool untouched.
//!
//! # Example
//!
//! ```rust
//! use stack_pool::{Error, StackPool};
//!
//! let mut pool = StackPool::<i32>::with_capacity(1000).unwrap();
//!
//! let h0 = pool.new_stack();
//! let h1 = pool.push(10, h0).unwrap();
//! let h2 = pool.push(20, h1).unwrap();
//! assert_eq!(pool.iter(h2).copied().collect::<Vec<_>>(), [20, 10]);
//!
//! let h3 = pool.pop(h2).unwrap();
//! assert_eq!(h3, h1);
//! assert_eq!(pool.iter(h3).copied().collect::<Vec<_>>(), [10]);
//!
//! // h2 was popped, so it is no longer the head of a stack.
//! assert!(matches!(pool.pop(h2), Err(Error::NotHead { .. })));
//! ```
//!
//! # Usage contract
//!
//! Each push or pop returns the new head of the stack and invalidates the handle that was passed
//! in. Callers must always continue with the returned handle. The pool has a single owner and
//! performs no internal synchronization.

mod builder;
mod cursor;
mod display;
mod drop_policy;
mod error;
mod handle;
mod node;
mod pool;

pub use builder::*;
pub use cursor::*;
pub use display::*;
pub use drop_policy::*;
pub use error::*;
pub use handle::*;
pub(crate) use node::*;
pub use pool::StackPool;
