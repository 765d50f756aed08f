//! Monotonic identifiers for clusters and owned points.
//!
//! Both kinds of id come from an [`IdAllocator`], a single atomic counter.
//! The process-wide allocators are `const`-initialised statics, so they
//! exist before any cluster is built and never race.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Hands out strictly increasing ids from an atomic counter
#[derive(Debug)]
pub struct IdAllocator {
    next: AtomicU64,
}

impl IdAllocator {
    /// Create an allocator whose first id is `start`
    pub const fn new(start: u64) -> Self {
        Self {
            next: AtomicU64::new(start),
        }
    }

    fn next_raw(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// Allocate the next cluster id
    pub fn next_cluster_id(&self) -> ClusterId {
        ClusterId(self.next_raw())
    }

    /// Allocate the next point id
    pub fn next_point_id(&self) -> PointId {
        PointId(self.next_raw())
    }

    /// Peek at the id the next allocation will return
    pub fn peek(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new(0)
    }
}

static CLUSTER_IDS: IdAllocator = IdAllocator::new(0);
static POINT_IDS: IdAllocator = IdAllocator::new(0);

/// The process-wide cluster id allocator
pub fn cluster_ids() -> &'static IdAllocator {
    &CLUSTER_IDS
}

/// The process-wide point identity allocator
pub fn point_ids() -> &'static IdAllocator {
    &POINT_IDS
}

/// Identity of a cluster, preserved by copies
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct ClusterId(u64);

impl ClusterId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of an owned point; membership tests compare these, never coordinates
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct PointId(u64);

impl PointId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_cluster_ids() {
        let alloc = IdAllocator::new(7);
        let ids: Vec<ClusterId> = (0..10).map(|_| alloc.next_cluster_id()).collect();
        for (i, id) in ids.iter().enumerate() {
            assert_eq!(id.as_u64() - ids[0].as_u64(), i as u64);
        }
        assert_eq!(ids[0].as_u64(), 7);
        assert_eq!(alloc.peek(), 17);
    }

    #[test]
    fn test_global_allocators_are_monotonic() {
        let a = point_ids().next_point_id();
        let b = point_ids().next_point_id();
        assert!(b > a);

        let c = cluster_ids().next_cluster_id();
        let d = cluster_ids().next_cluster_id();
        assert!(d > c);
    }

    #[test]
    fn test_concurrent_allocation_is_unique() {
        let alloc = IdAllocator::default();
        let mut ids: Vec<u64> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    s.spawn(|| {
                        (0..250)
                            .map(|_| alloc.next_point_id().as_u64())
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|h| h.join().unwrap_or_default())
                .collect()
        });
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 1000);
    }
}
