use std::any::type_name;
use std::fmt;

use crate::{Handle, StackPool};

/// Displays the values of one stack from the head to the bottom, separated by spaces.
///
/// Returned by [`StackPool::display_stack()`].
pub struct StackDisplay<'p, T> {
    pool: &'p StackPool<T>,
    head: Handle,
}

impl<'p, T> StackDisplay<'p, T> {
    pub(crate) fn new(pool: &'p StackPool<T>, head: Handle) -> Self {
        Self { pool, head }
    }
}

impl<T: fmt::Display> fmt::Display for StackDisplay<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut values = self.pool.iter(self.head);

        if let Some(first) = values.next() {
            write!(f, "{first}")?;
        }

        for value in values {
            write!(f, " {value}")?;
        }

        Ok(())
    }
}

impl<T> fmt::Debug for StackDisplay<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(type_name::<Self>())
            .field("head", &self.head)
            .finish_non_exhaustive()
    }
}
