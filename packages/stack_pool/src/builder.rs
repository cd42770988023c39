use std::marker::PhantomData;

use crate::{DropPolicy, Result, StackPool};

/// Builder for creating an instance of [`StackPool`].
///
/// You only need to use this builder if you want to customize the pool configuration.
/// The default configuration used by [`StackPool::new()`][1] is sufficient for most use cases.
///
/// # Examples
///
/// ```
/// use stack_pool::{DropPolicy, StackPool};
///
/// let pool = StackPool::<u32>::builder()
///     .initial_capacity(1000)
///     .drop_policy(DropPolicy::MustNotDropNodes)
///     .build()
///     .unwrap();
///
/// assert!(pool.capacity() >= 1000);
/// ```
///
/// [1]: StackPool::new
#[must_use]
pub struct StackPoolBuilder<T> {
    initial_capacity: usize,
    drop_policy: DropPolicy,

    _value: PhantomData<T>,
}

impl<T> std::fmt::Debug for StackPoolBuilder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StackPoolBuilder")
            .field(
                "value_type",
                &std::format_args!("{}", std::any::type_name::<T>()),
            )
            .field("initial_capacity", &self.initial_capacity)
            .field("drop_policy", &self.drop_policy)
            .finish()
    }
}

impl<T> StackPoolBuilder<T> {
    pub(crate) fn new() -> Self {
        Self {
            initial_capacity: 0,
            drop_policy: DropPolicy::default(),
            _value: PhantomData,
        }
    }

    /// Sets the number of node slots to reserve up front.
    ///
    /// This is only a performance hint. The pool grows automatically when more slots are needed.
    ///
    /// # Examples
    ///
    /// ```
    /// use stack_pool::StackPool;
    ///
    /// let pool = StackPool::<u64>::builder()
    ///     .initial_capacity(64)
    ///     .build()
    ///     .unwrap();
    ///
    /// assert!(pool.capacity() >= 64);
    /// assert_eq!(pool.slot_count(), 0);
    /// ```
    pub fn initial_capacity(mut self, slots: usize) -> Self {
        self.initial_capacity = slots;
        self
    }

    /// Sets the [drop policy][DropPolicy] for the pool. This governs how
    /// to treat nodes still linked into live stacks when the pool is dropped.
    pub fn drop_policy(mut self, policy: DropPolicy) -> Self {
        self.drop_policy = policy;
        self
    }

    /// Builds the stack pool with the specified configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocationFailed`][crate::Error::AllocationFailed] if the initial
    /// capacity cannot be reserved.
    pub fn build(self) -> Result<StackPool<T>> {
        let mut pool = StackPool::new_inner(self.drop_policy);

        if self.initial_capacity > 0 {
            pool.reserve(self.initial_capacity)?;
        }

        Ok(pool)
    }
}
