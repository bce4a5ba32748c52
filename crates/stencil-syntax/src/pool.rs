//! Object pool for transient, single-owner scratch buffers.

use std::ops::{Deref, DerefMut};

use parking_lot::Mutex;

/// Limits applied when objects are returned to a [`Pool`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PoolConfig {
    /// Maximum number of idle objects kept around.
    pub max_pooled: usize,
    /// Storage beyond this many elements is released on return.
    pub max_retained_capacity: usize,
}

impl PoolConfig {
    pub const DEFAULT: Self = Self { max_pooled: 16, max_retained_capacity: 256 };
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Objects that can be reset before going back into a pool.
pub trait Recycle {
    /// Clears the contents and trims storage above `max_retained_capacity`.
    fn recycle(&mut self, max_retained_capacity: usize);
}

impl<T> Recycle for Vec<T> {
    fn recycle(&mut self, max_retained_capacity: usize) {
        self.clear();
        if self.capacity() > max_retained_capacity {
            tracing::trace!(
                capacity = self.capacity(),
                max_retained_capacity,
                "trimming pooled buffer"
            );
            self.shrink_to(max_retained_capacity);
        }
    }
}

/// A thread-safe pool. Borrowed objects are not shared: each [`Pooled`]
/// guard has exclusive access until it is dropped.
pub struct Pool<T> {
    idle: Mutex<Vec<T>>,
    config: PoolConfig,
    create: fn() -> T,
}

impl<T: Recycle> Pool<T> {
    pub const fn new(create: fn() -> T) -> Self {
        Self::with_config(create, PoolConfig::DEFAULT)
    }

    pub const fn with_config(create: fn() -> T, config: PoolConfig) -> Self {
        Self { idle: Mutex::new(Vec::new()), config, create }
    }

    /// Borrows an object, creating one if the pool is empty. The object is
    /// recycled and returned when the guard drops, including during unwinding.
    pub fn acquire(&self) -> Pooled<'_, T> {
        let item = self.idle.lock().pop().unwrap_or_else(self.create);
        Pooled { pool: self, item: Some(item) }
    }

    pub fn idle_count(&self) -> usize {
        self.idle.lock().len()
    }

    fn release(&self, mut item: T) {
        item.recycle(self.config.max_retained_capacity);
        let mut idle = self.idle.lock();
        if idle.len() < self.config.max_pooled {
            idle.push(item);
        }
    }
}

/// Exclusive loan of a pooled object.
pub struct Pooled<'a, T: Recycle> {
    pool: &'a Pool<T>,
    item: Option<T>,
}

impl<T: Recycle> Deref for Pooled<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        match &self.item {
            Some(item) => item,
            None => unreachable!("pooled item is only taken on drop"),
        }
    }
}

impl<T: Recycle> DerefMut for Pooled<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        match &mut self.item {
            Some(item) => item,
            None => unreachable!("pooled item is only taken on drop"),
        }
    }
}

impl<T: Recycle> Drop for Pooled<'_, T> {
    fn drop(&mut self) {
        if let Some(item) = self.item.take() {
            self.pool.release(item);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{AssertUnwindSafe, catch_unwind};

    use super::*;

    #[test]
    fn returned_objects_are_cleared_and_reused() {
        let pool: Pool<Vec<u32>> = Pool::new(Vec::new);
        {
            let mut buffer = pool.acquire();
            buffer.extend([1, 2, 3]);
        }
        assert_eq!(pool.idle_count(), 1);

        let buffer = pool.acquire();
        assert!(buffer.is_empty());
        assert!(buffer.capacity() >= 3);
        assert_eq!(pool.idle_count(), 0);
    }

    #[test]
    fn capacity_above_ceiling_is_trimmed() {
        let config = PoolConfig { max_pooled: 4, max_retained_capacity: 8 };
        let pool: Pool<Vec<u32>> = Pool::with_config(Vec::new, config);
        {
            let mut buffer = pool.acquire();
            buffer.extend(0..1000);
        }

        let buffer = pool.acquire();
        assert!(buffer.capacity() < 1000);
        assert!(buffer.is_empty());
    }

    #[test]
    fn pool_keeps_at_most_max_pooled() {
        let config = PoolConfig { max_pooled: 2, max_retained_capacity: 8 };
        let pool: Pool<Vec<u32>> = Pool::with_config(Vec::new, config);
        let guards: Vec<_> = (0..5).map(|_| pool.acquire()).collect();
        drop(guards);

        assert_eq!(pool.idle_count(), 2);
    }

    #[test]
    fn released_on_panic() {
        let pool: Pool<Vec<u32>> = Pool::new(Vec::new);
        let result = catch_unwind(AssertUnwindSafe(|| {
            let mut buffer = pool.acquire();
            buffer.push(1);
            panic!("construction failed");
        }));

        assert!(result.is_err());
        assert_eq!(pool.idle_count(), 1);
        assert!(pool.acquire().is_empty());
    }
}
