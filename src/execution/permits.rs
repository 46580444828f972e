use std::sync::{Condvar, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Bounds how many chunks of groups are evaluated at once.
///
/// A permit is held for as long as its [`ChunkPermit`] lives, so a chunk that panics still frees
/// its slot while the pool unwinds.
pub struct ChunkPermits {
    free: Mutex<usize>,
    freed: Condvar,
}

/// One in-flight chunk. Dropping it frees the slot.
pub struct ChunkPermit<'a> {
    permits: &'a ChunkPermits,
}

impl ChunkPermits {
    pub fn new(max_in_flight: usize) -> Self {
        assert!(max_in_flight > 0, "max_in_flight must be > 0");
        Self {
            free: Mutex::new(max_in_flight),
            freed: Condvar::new(),
        }
    }

    /// Block until a chunk may start. Also returns how long the caller was held back.
    pub fn acquire(&self) -> (ChunkPermit<'_>, Duration) {
        let start = Instant::now();
        let mut free = self.free.lock().unwrap_or_else(PoisonError::into_inner);
        let held_back = *free == 0;
        while *free == 0 {
            free = self.freed.wait(free).unwrap_or_else(PoisonError::into_inner);
        }
        *free -= 1;
        let waited = if held_back { start.elapsed() } else { Duration::ZERO };
        (ChunkPermit { permits: self }, waited)
    }

    fn free_one(&self) {
        let mut free = self.free.lock().unwrap_or_else(PoisonError::into_inner);
        *free += 1;
        self.freed.notify_one();
    }
}

impl Drop for ChunkPermit<'_> {
    fn drop(&mut self) {
        self.permits.free_one();
    }
}
