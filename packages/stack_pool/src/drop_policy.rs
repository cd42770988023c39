/// Determines how a [`StackPool`][crate::StackPool] treats nodes that are still linked into
/// live stacks when the pool itself is dropped.
///
/// # Examples
///
/// ```
/// use stack_pool::{DropPolicy, StackPool};
///
/// let mut pool = StackPool::<u32>::builder()
///     .drop_policy(DropPolicy::MustNotDropNodes)
///     .build()
///     .unwrap();
///
/// let stack = pool.push(1, pool.new_stack()).unwrap();
///
/// // Every stack must be freed before the pool is dropped.
/// pool.free_stack(stack).unwrap();
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[non_exhaustive]
pub enum DropPolicy {
    /// The pool drops the values of all its nodes when it is dropped. This is the default.
    #[default]
    MayDropNodes,

    /// The pool panics if any node is still linked into a live stack when it is dropped.
    ///
    /// This is useful when the caller is expected to release every stack via
    /// [`free_stack()`][crate::StackPool::free_stack] and a forgotten stack indicates a bug.
    MustNotDropNodes,
}
