//!Bounded interning cache for shared value objects

use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use once_cell::sync::Lazy;
use parking_lot::Mutex;

use crate::space::{Ip6Space, IpSpace};

///Maximum entries per interner before least-recently-used eviction
const CACHE_SIZE: usize = 1 << 16;

///Bounded get-or-insert cache deduplicating equal-by-value instances
///
///Eviction never affects correctness, only sharing: a miss after eviction
///reconstructs an equal value. The single lock makes get-or-insert atomic,
///so two concurrent requests for the same value observe one instance.
pub struct Interner<T: Eq + Hash + Clone> {
    cache: Mutex<LruCache<T, Arc<T>>>,
}

impl<T: Eq + Hash + Clone> Interner<T> {
    ///Creates an interner holding at most `capacity` entries
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    ///Returns the shared instance equal to `value`, inserting on miss
    pub fn intern(&self, value: T) -> Arc<T> {
        let mut cache = self.cache.lock();
        if let Some(shared) = cache.get(&value) {
            return Arc::clone(shared);
        }
        tracing::trace!("intern miss, caching new instance");
        let shared = Arc::new(value.clone());
        cache.put(value, Arc::clone(&shared));
        shared
    }

    ///Number of currently cached entries
    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    ///Checks if nothing is cached
    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }
}

//NonZeroUsize::new only fails on zero
static CACHE_CAPACITY: Lazy<NonZeroUsize> =
    Lazy::new(|| NonZeroUsize::new(CACHE_SIZE).unwrap_or(NonZeroUsize::MIN));

static IP_SPACE_CACHE: Lazy<Interner<IpSpace>> = Lazy::new(|| Interner::new(*CACHE_CAPACITY));
static IP6_SPACE_CACHE: Lazy<Interner<Ip6Space>> = Lazy::new(|| Interner::new(*CACHE_CAPACITY));

impl IpSpace {
    ///Returns the shared deduplicated instance of this space
    pub fn interned(self) -> Arc<IpSpace> {
        IP_SPACE_CACHE.intern(self)
    }
}

impl Ip6Space {
    ///Returns the shared deduplicated instance of this space
    pub fn interned(self) -> Arc<Ip6Space> {
        IP6_SPACE_CACHE.intern(self)
    }
}
