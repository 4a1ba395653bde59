use std::fmt;
use std::hash::Hash;
use std::rc::{Rc, Weak};

use rustc_hash::FxHashMap;

use crate::errors::Result;

/// Non-owning reference to a pooled resource.
///
/// The pool keeps the only strong reference. After
/// [`ResourcePool::release`] every outstanding `PoolRef` reports
/// [`is_valid`](Self::is_valid) `== false` and [`get`](Self::get) returns
/// `None`.
pub struct PoolRef<T> {
    inner: Weak<T>,
}

impl<T> PoolRef<T> {
    /// Temporarily upgrades to the resource, if it is still pooled.
    #[must_use]
    pub fn get(&self) -> Option<Rc<T>> {
        self.inner.upgrade()
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.inner.strong_count() > 0
    }

    /// Whether both references point at the same pooled instance.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Weak::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T> Clone for PoolRef<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> fmt::Debug for PoolRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolRef").field("valid", &self.is_valid()).finish()
    }
}

/// Memoizing cache: each key is loaded at most once until [`release`](Self::release).
pub struct ResourcePool<K, T> {
    entries: FxHashMap<K, Rc<T>>,
}

impl<K: Eq + Hash + Clone + fmt::Debug, T> ResourcePool<K, T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: FxHashMap::default(),
        }
    }

    /// Returns the pooled instance for `key`, running `loader` on a miss.
    ///
    /// A failed load caches nothing; the next call retries.
    pub fn get_or_load<F>(&mut self, key: K, loader: F) -> Result<PoolRef<T>>
    where
        F: FnOnce(&K) -> Result<T>,
    {
        if let Some(existing) = self.entries.get(&key) {
            return Ok(PoolRef {
                inner: Rc::downgrade(existing),
            });
        }

        let resource = Rc::new(loader(&key)?);
        log::debug!("Pooled {key:?}");
        let reference = PoolRef {
            inner: Rc::downgrade(&resource),
        };
        self.entries.insert(key, resource);
        Ok(reference)
    }

    #[must_use]
    pub fn get(&self, key: &K) -> Option<PoolRef<T>> {
        self.entries.get(key).map(|rc| PoolRef {
            inner: Rc::downgrade(rc),
        })
    }

    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Frees every pooled resource at once.
    pub fn release(&mut self) {
        if !self.entries.is_empty() {
            log::debug!("Releasing {} pooled resources", self.entries.len());
        }
        self.entries.clear();
    }
}

impl<K: Eq + Hash + Clone + fmt::Debug, T> Default for ResourcePool<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::EncoError;

    #[test]
    fn failed_load_is_not_cached() {
        let mut pool: ResourcePool<&str, u32> = ResourcePool::new();
        let result = pool.get_or_load("missing", |_| {
            Err(EncoError::ResourceLoad {
                path: "missing".into(),
                reason: "not found".into(),
            })
        });
        assert!(result.is_err());
        assert!(pool.is_empty());

        let loaded = pool.get_or_load("missing", |_| Ok(7)).map(|r| r.get().map(|v| *v));
        assert_eq!(loaded.ok().flatten(), Some(7));
    }
}
