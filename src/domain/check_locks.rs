//! Per-(competitor, url) serialisation of monitoring checks.
//!
//! Two concurrent checks of the same page would both read the same
//! "latest snapshot" and compare against it. [`CheckLocks`] hands out one
//! [`tokio::sync::Mutex`] per key so such checks run one after the other,
//! while checks of different pages proceed concurrently. An entry lives
//! only while a check holds or waits for it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError};

use tokio::sync::{Mutex, OwnedMutexGuard};

use super::CompetitorId;

type CheckKey = (CompetitorId, String);
type LockMap = HashMap<CheckKey, Arc<Mutex<()>>>;

/// Registry of per-page check locks.
///
/// The outer map sits behind a synchronous mutex that is never held
/// across an await, so [`CheckGuard`] can prune its entry on drop.
#[derive(Debug, Default)]
pub struct CheckLocks {
    locks: Arc<StdMutex<LockMap>>,
}

/// Exclusive access to one page; released and pruned on drop.
#[derive(Debug)]
pub struct CheckGuard {
    guard: Option<OwnedMutexGuard<()>>,
    key: CheckKey,
    locks: Arc<StdMutex<LockMap>>,
}

fn lock_map(locks: &StdMutex<LockMap>) -> MutexGuard<'_, LockMap> {
    locks.lock().unwrap_or_else(PoisonError::into_inner)
}

impl CheckLocks {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to the given page.
    ///
    /// The returned guard releases the page when dropped, including when
    /// the owning task is cancelled.
    pub async fn acquire(&self, competitor_id: &CompetitorId, url: &str) -> CheckGuard {
        let key = (competitor_id.clone(), url.to_string());
        let lock = Arc::clone(lock_map(&self.locks).entry(key.clone()).or_default());
        let guard = lock.lock_owned().await;
        CheckGuard {
            guard: Some(guard),
            key,
            locks: Arc::clone(&self.locks),
        }
    }

    /// Returns the number of pages currently being checked or waited on.
    #[must_use]
    pub fn len(&self) -> usize {
        lock_map(&self.locks).len()
    }

    /// Returns `true` if no check is in flight.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        lock_map(&self.locks).is_empty()
    }
}

impl Drop for CheckGuard {
    fn drop(&mut self) {
        let mut map = lock_map(&self.locks);
        drop(self.guard.take());
        // Only the map still refers to the lock: nobody holds or awaits it.
        if map
            .get(&self.key)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            map.remove(&self.key);
        }
    }
}
