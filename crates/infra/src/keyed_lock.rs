//! Per-key mutual exclusion.
//!
//! Holders of different keys never wait on each other beyond the brief
//! critical section guarding the held-key set.

use std::collections::HashSet;
use std::hash::Hash;
use std::sync::{Condvar, Mutex};
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LockError {
    #[error("timed out after {0:?} waiting for lock")]
    Timeout(Duration),

    #[error("lock table poisoned")]
    Poisoned,
}

#[derive(Debug, Default)]
pub struct KeyedLock<K> {
    held: Mutex<HashSet<K>>,
    released: Condvar,
}

impl<K> KeyedLock<K>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self {
            held: Mutex::new(HashSet::new()),
            released: Condvar::new(),
        }
    }

    /// Block until `key` is free (or `timeout` elapses), then hold it until
    /// the returned guard is dropped.
    pub fn acquire(&self, key: &K, timeout: Duration) -> Result<KeyGuard<'_, K>, LockError> {
        let held = self.held.lock().map_err(|_| LockError::Poisoned)?;
        let (mut held, wait) = self
            .released
            .wait_timeout_while(held, timeout, |held| held.contains(key))
            .map_err(|_| LockError::Poisoned)?;

        if wait.timed_out() && held.contains(key) {
            return Err(LockError::Timeout(timeout));
        }

        held.insert(key.clone());
        Ok(KeyGuard {
            lock: self,
            key: key.clone(),
        })
    }

    pub fn is_held(&self, key: &K) -> bool {
        self.held.lock().map(|held| held.contains(key)).unwrap_or(false)
    }
}

/// Releases its key on drop.
#[derive(Debug)]
pub struct KeyGuard<'a, K>
where
    K: Eq + Hash + Clone,
{
    lock: &'a KeyedLock<K>,
    key: K,
}

impl<K> Drop for KeyGuard<'_, K>
where
    K: Eq + Hash + Clone,
{
    fn drop(&mut self) {
        let mut held = match self.lock.held.lock() {
            Ok(held) => held,
            Err(poisoned) => poisoned.into_inner(),
        };
        held.remove(&self.key);
        drop(held);
        self.lock.released.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    #[test]
    fn guard_releases_on_drop() {
        let lock = KeyedLock::new();
        {
            let _guard = lock.acquire(&1u32, Duration::from_millis(10)).unwrap();
            assert!(lock.is_held(&1));
        }
        assert!(!lock.is_held(&1));
    }

    #[test]
    fn second_holder_times_out() {
        let lock = KeyedLock::new();
        let _guard = lock.acquire(&"food", Duration::from_millis(10)).unwrap();
        let err = lock.acquire(&"food", Duration::from_millis(20)).unwrap_err();
        assert_eq!(err, LockError::Timeout(Duration::from_millis(20)));

        // Other keys are unaffected.
        assert!(lock.acquire(&"toys", Duration::from_millis(10)).is_ok());
    }

    #[test]
    fn serializes_holders_of_one_key() {
        let lock = Arc::new(KeyedLock::new());
        let inside = Arc::new(AtomicUsize::new(0));
        let max_inside = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let lock = lock.clone();
                let inside = inside.clone();
                let max_inside = max_inside.clone();
                thread::spawn(move || {
                    let _guard = lock.acquire(&7u8, Duration::from_secs(5)).unwrap();
                    let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                    max_inside.fetch_max(now, Ordering::SeqCst);
                    thread::sleep(Duration::from_millis(2));
                    inside.fetch_sub(1, Ordering::SeqCst);
                })
            })
            .collect();

        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(max_inside.load(Ordering::SeqCst), 1);
    }
}
