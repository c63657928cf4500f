//! Time-based identifiers.
//!
//! Orders, accounts and wallet transactions are keyed by the wall-clock millisecond they
//! were created in. Two ids minted in the same millisecond must still differ, so every
//! generator here is strictly increasing.

use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Strictly increasing millisecond stamps: `max(now, last + 1)`.
#[derive(Debug, Clone, Default)]
pub struct MonotonicMillis {
    last: Arc<AtomicU64>,
}

impl MonotonicMillis {
    /// A clock that never issues a stamp at or below `floor` (e.g. the newest restored id).
    pub fn starting_after(floor: u64) -> Self {
        Self {
            last: Arc::new(AtomicU64::new(floor)),
        }
    }

    pub fn next(&self) -> u64 {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        let mut last = self.last.load(Ordering::SeqCst);
        loop {
            let candidate = now.max(last + 1);
            match self
                .last
                .compare_exchange(last, candidate, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => return candidate,
                Err(actual) => last = actual,
            }
        }
    }
}

static TRANSACTION_SEQ: AtomicU64 = AtomicU64::new(1);

/// `txn_<millis>_<seq>`; the process-wide sequence keeps ids unique within a millisecond.
pub fn next_transaction_id() -> String {
    let seq = TRANSACTION_SEQ.fetch_add(1, Ordering::SeqCst);
    format!("txn_{}_{}", Utc::now().timestamp_millis(), seq)
}

/// Millisecond part of an id shaped like `<prefix><millis>` (`KM1718000000000`).
pub fn millis_suffix(id: &str, prefix: &str) -> Option<u64> {
    id.strip_prefix(prefix)?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monotonic_within_one_millisecond() {
        let clock = MonotonicMillis::default();
        let stamps: Vec<u64> = (0..100).map(|_| clock.next()).collect();
        assert!(stamps.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_floor_is_respected() {
        let far_future = 9_999_999_999_999;
        let clock = MonotonicMillis::starting_after(far_future);
        assert_eq!(clock.next(), far_future + 1);
    }

    #[test]
    fn test_transaction_ids_are_unique() {
        let a = next_transaction_id();
        let b = next_transaction_id();
        assert_ne!(a, b);
        assert!(a.starts_with("txn_"));
    }

    #[test]
    fn test_millis_suffix() {
        assert_eq!(millis_suffix("KM1718000000000", "KM"), Some(1_718_000_000_000));
        assert_eq!(millis_suffix("order_1", "KM"), None);
    }
}
