// Per-connection sequence number allocator (Section 4.5).
//
// SMPP reserves sequence number 0 and anything above 0x7FFFFFFF (the
// high bit set), so the allocator only ever hands out values in
// [1, 0x7FFFFFFF]. The initial value is randomized so that two
// sessions racing against the same peer don't collide on low numbers.

use std::sync::atomic::{AtomicU32, Ordering};

const MAX_SEQUENCE: u32 = 0x7FFF_FFFF;

/// Thread-safe, monotonically increasing source of SMPP sequence numbers.
///
/// One allocator is owned by one session/connection; sequence uniqueness
/// is only guaranteed per-session, matching the protocol's requirement.
#[derive(Debug)]
pub struct SequenceAllocator {
    next: AtomicU32,
}

impl SequenceAllocator {
    /// Creates an allocator seeded with a random value in [1, 0x7FFFFFFF].
    pub fn new() -> Self {
        Self::seeded(Self::random_seed())
    }

    /// Creates an allocator starting from a specific seed, clamped into the
    /// valid range. Useful for tests that need deterministic sequences.
    pub fn seeded(seed: u32) -> Self {
        let seed = Self::normalize(seed);
        Self {
            next: AtomicU32::new(seed),
        }
    }

    fn random_seed() -> u32 {
        use rand::Rng;
        rand::rng().random_range(1..=MAX_SEQUENCE)
    }

    fn normalize(value: u32) -> u32 {
        if value == 0 || value > MAX_SEQUENCE {
            1
        } else {
            value
        }
    }

    /// Returns the next sequence number, wrapping back to 1 once the
    /// 31-bit range is exhausted.
    pub fn next(&self) -> u32 {
        loop {
            let current = self.next.load(Ordering::Relaxed);
            let advanced = if current >= MAX_SEQUENCE {
                1
            } else {
                current + 1
            };
            if self
                .next
                .compare_exchange_weak(
                    current,
                    advanced,
                    Ordering::Relaxed,
                    Ordering::Relaxed,
                )
                .is_ok()
            {
                return current;
            }
        }
    }
}

impl Default for SequenceAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn starts_at_seed() {
        let alloc = SequenceAllocator::seeded(41);
        assert_eq!(alloc.next(), 41);
        assert_eq!(alloc.next(), 42);
    }

    #[test]
    fn wraps_to_one_past_max() {
        let alloc = SequenceAllocator::seeded(MAX_SEQUENCE);
        assert_eq!(alloc.next(), MAX_SEQUENCE);
        assert_eq!(alloc.next(), 1);
    }

    #[test]
    fn normalizes_out_of_range_seeds() {
        assert_eq!(SequenceAllocator::seeded(0).next(), 1);
        assert_eq!(SequenceAllocator::seeded(0x8000_0000).next(), 1);
    }

    #[test]
    fn concurrent_callers_get_distinct_values() {
        let alloc = Arc::new(SequenceAllocator::seeded(1));
        let mut handles = Vec::new();
        for _ in 0..8 {
            let alloc = Arc::clone(&alloc);
            handles.push(std::thread::spawn(move || {
                (0..1000).map(|_| alloc.next()).collect::<Vec<_>>()
            }));
        }

        let mut seen = HashSet::new();
        for handle in handles {
            for value in handle.join().unwrap() {
                assert!(seen.insert(value), "sequence number {value} issued twice");
            }
        }
        assert_eq!(seen.len(), 8000);
    }
}
