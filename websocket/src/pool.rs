//! Agent pool: bounded idle cache with lease/release accounting.

use devmate_agent::{AgentError, Resettable};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::debug;

/// Constructs a fresh agent when the idle cache is empty.
pub type AgentFactory<A> = Box<dyn Fn() -> Result<A, AgentError> + Send + Sync>;

/// Pool of reusable agent instances.
///
/// The capacity bounds only the idle cache, never concurrency: when the
/// cache is empty, `acquire` constructs overflow agents freely, and agents
/// released while the cache is full are dropped.
pub struct AgentPool<A: Resettable + Send> {
    capacity: usize,
    factory: AgentFactory<A>,
    inner: Mutex<PoolInner<A>>,
}

struct PoolInner<A> {
    /// LIFO idle cache; most recently released agent is reused first.
    idle: Vec<A>,
    leased_count: usize,
}

impl<A: Resettable + Send> AgentPool<A> {
    /// Create an empty pool. Agents are constructed lazily on `acquire`.
    ///
    /// `capacity` must be positive.
    pub fn new(capacity: usize, factory: AgentFactory<A>) -> Self {
        assert!(capacity > 0, "pool capacity must be positive");
        Self {
            capacity,
            factory,
            inner: Mutex::new(PoolInner {
                idle: Vec::new(),
                leased_count: 0,
            }),
        }
    }

    /// Lease an agent, reusing an idle one when available.
    ///
    /// Construction failures propagate to the caller and leave the
    /// accounting untouched.
    pub async fn acquire(&self) -> Result<A, AgentError> {
        let mut inner = self.inner.lock().await;

        if let Some(mut agent) = inner.idle.pop() {
            debug!(idle = inner.idle.len(), "reusing idle agent");
            agent.reset();
            inner.leased_count += 1;
            return Ok(agent);
        }

        let agent = (self.factory)()?;
        inner.leased_count += 1;
        debug!(leased = inner.leased_count, "constructed new agent");
        Ok(agent)
    }

    /// Return a leased agent. The agent is reset and cached when the idle
    /// cache has room, dropped otherwise.
    pub async fn release(&self, mut agent: A) {
        let mut inner = self.inner.lock().await;

        inner.leased_count = inner.leased_count.saturating_sub(1);
        agent.reset();

        if inner.idle.len() < self.capacity {
            inner.idle.push(agent);
        } else {
            debug!(capacity = self.capacity, "idle cache full, dropping agent");
        }
    }

    /// Snapshot of the pool counters. Non-authoritative: `usage_rate` can
    /// exceed 1.0 while overflow agents are leased out.
    pub async fn status(&self) -> PoolStatus {
        let inner = self.inner.lock().await;

        PoolStatus {
            capacity: self.capacity,
            idle_count: inner.idle.len(),
            leased_count: inner.leased_count,
            usage_rate: round2(inner.leased_count as f64 / self.capacity as f64),
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Pool counter snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoolStatus {
    pub capacity: usize,
    pub idle_count: usize,
    pub leased_count: usize,
    pub usage_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TestAgent {
        id: usize,
        dirty: bool,
    }

    impl Resettable for TestAgent {
        fn reset(&mut self) {
            self.dirty = false;
        }
    }

    fn pool_with_counter(capacity: usize) -> (AgentPool<TestAgent>, Arc<AtomicUsize>) {
        let created = Arc::new(AtomicUsize::new(0));
        let counter = created.clone();
        let pool = AgentPool::new(
            capacity,
            Box::new(move || {
                let id = counter.fetch_add(1, Ordering::SeqCst);
                Ok(TestAgent { id, dirty: false })
            }),
        );
        (pool, created)
    }

    #[tokio::test]
    async fn test_overflow_acquire_and_bounded_release() {
        let (pool, created) = pool_with_counter(2);

        // capacity=2; three acquires never block and yield distinct agents.
        let a = pool.acquire().await.unwrap();
        let b = pool.acquire().await.unwrap();
        let c = pool.acquire().await.unwrap();
        assert_eq!(created.load(Ordering::SeqCst), 3);
        assert_ne!(a.id, b.id);
        assert_ne!(b.id, c.id);

        let status = pool.status().await;
        assert_eq!(status.leased_count, 3);
        assert_eq!(status.idle_count, 0);
        assert_eq!(status.usage_rate, 1.5);

        // Releasing all three caches two and drops the third.
        pool.release(a).await;
        pool.release(b).await;
        pool.release(c).await;

        let status = pool.status().await;
        assert_eq!(status.leased_count, 0);
        assert_eq!(status.idle_count, 2);
        assert_eq!(status.usage_rate, 0.0);
    }

    #[tokio::test]
    async fn test_leased_count_tracks_acquires_minus_releases() {
        let (pool, _) = pool_with_counter(4);

        let a = pool.acquire().await.unwrap();
        let b = pool.acquire().await.unwrap();
        assert_eq!(pool.status().await.leased_count, 2);

        pool.release(a).await;
        assert_eq!(pool.status().await.leased_count, 1);

        pool.release(b).await;
        assert_eq!(pool.status().await.leased_count, 0);
    }

    #[tokio::test]
    async fn test_spurious_release_saturates_at_zero() {
        let (pool, _) = pool_with_counter(2);

        pool.release(TestAgent { id: 99, dirty: true }).await;
        let status = pool.status().await;
        assert_eq!(status.leased_count, 0);
        assert_eq!(status.idle_count, 1);
    }

    #[tokio::test]
    async fn test_reused_agent_is_reset() {
        let (pool, created) = pool_with_counter(2);

        let mut agent = pool.acquire().await.unwrap();
        agent.dirty = true;
        pool.release(agent).await;

        // The idle agent is reused (no new construction) and comes back clean.
        let agent = pool.acquire().await.unwrap();
        assert_eq!(created.load(Ordering::SeqCst), 1);
        assert!(!agent.dirty);
    }

    #[tokio::test]
    async fn test_construction_failure_propagates() {
        let pool: AgentPool<TestAgent> = AgentPool::new(
            1,
            Box::new(|| Err(AgentError::ChatBackend("no backend".to_string()))),
        );

        assert!(pool.acquire().await.is_err());
        // Failed acquires leave the accounting untouched.
        assert_eq!(pool.status().await.leased_count, 0);
    }

    #[tokio::test]
    async fn test_usage_rate_rounding() {
        let (pool, _) = pool_with_counter(3);
        let a = pool.acquire().await.unwrap();
        assert_eq!(pool.status().await.usage_rate, 0.33);
        pool.release(a).await;
    }
}
