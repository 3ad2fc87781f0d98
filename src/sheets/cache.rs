use async_trait::async_trait;
use log::debug;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use super::{LoadError, SheetLoader};
use crate::grades::Roster;

pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

struct Memo {
    loaded_at: Instant,
    roster: Arc<Roster>,
}

/// Time-bounded memo around another loader.
///
/// A successful load is reused until `ttl` has elapsed; failures are never
/// cached. A zero `ttl` disables caching entirely.
pub struct CachedSheetLoader<L> {
    inner: L,
    ttl: Duration,
    memo: Mutex<Option<Memo>>,
}

impl<L: SheetLoader> CachedSheetLoader<L> {
    pub fn new(inner: L, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            memo: Mutex::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn inner(&self) -> &L {
        &self.inner
    }

    /// Drop the memoized roster so the next load goes to the source.
    pub async fn invalidate(&self) {
        self.memo.lock().await.take();
    }
}

#[async_trait]
impl<L: SheetLoader> SheetLoader for CachedSheetLoader<L> {
    async fn load(&self) -> Result<Arc<Roster>, LoadError> {
        // Held across the fetch so concurrent callers share one round trip
        let mut memo = self.memo.lock().await;

        if let Some(cached) = memo.as_ref() {
            let age = cached.loaded_at.elapsed();
            if age < self.ttl {
                debug!("Reusing cached roster ({}s old)", age.as_secs());
                return Ok(Arc::clone(&cached.roster));
            }
        }

        let roster = self.inner.load().await?;
        if !self.ttl.is_zero() {
            *memo = Some(Memo {
                loaded_at: Instant::now(),
                roster: Arc::clone(&roster),
            });
        }
        Ok(roster)
    }

    fn describe(&self) -> String {
        format!("{} (cached {}s)", self.inner.describe(), self.ttl.as_secs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grades::CellValue;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingLoader {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingLoader {
        fn new(fail: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail,
            }
        }
    }

    #[async_trait]
    impl SheetLoader for CountingLoader {
        async fn load(&self) -> Result<Arc<Roster>, LoadError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(LoadError::Status {
                    url: "stub".to_string(),
                    status: 503,
                });
            }
            Ok(Arc::new(Roster::from_records(
                ["ID"],
                vec![vec![CellValue::Integer(123456)]],
            )))
        }

        fn describe(&self) -> String {
            "stub".to_string()
        }
    }

    #[tokio::test]
    async fn test_reuses_roster_within_ttl() {
        let loader = CachedSheetLoader::new(CountingLoader::new(false), DEFAULT_TTL);

        let first = loader.load().await.unwrap();
        let second = loader.load().await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(loader.inner().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_zero_ttl_always_reloads() {
        let loader = CachedSheetLoader::new(CountingLoader::new(false), Duration::ZERO);

        loader.load().await.unwrap();
        loader.load().await.unwrap();
        assert_eq!(loader.inner().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalidate_forces_reload() {
        let loader = CachedSheetLoader::new(CountingLoader::new(false), DEFAULT_TTL);

        loader.load().await.unwrap();
        loader.invalidate().await;
        loader.load().await.unwrap();
        assert_eq!(loader.inner().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let loader = CachedSheetLoader::new(CountingLoader::new(true), DEFAULT_TTL);

        assert!(loader.load().await.is_err());
        assert!(loader.load().await.is_err());
        assert_eq!(loader.inner().calls.load(Ordering::SeqCst), 2);
    }
}
