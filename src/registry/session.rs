//! Armed capture windows
//!
//! A capture command without an attached image arms a short-lived window
//! for that (conversation, participant) pair: the next image they send is
//! ingested instead of matched for repost. Windows live only in memory;
//! a restart clears them, which is fine for a 60-second convenience.

use std::collections::HashMap;

/// Key identifying one chat participant in one conversation
type PairKey = (String, String);

/// Time-bounded capture windows, one slot per (conversation, participant)
pub struct CaptureSessions {
    ttl_ms: i64,
    entries: HashMap<PairKey, i64>,
}

impl CaptureSessions {
    /// Create a tracker with the given window length in seconds
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            ttl_ms: ttl_secs as i64 * 1000,
            entries: HashMap::new(),
        }
    }

    /// Arm (or re-arm) the window for a pair. Arming replaces any prior
    /// window for the pair, it never stacks.
    pub fn arm(&mut self, conversation: &str, participant: &str, now_ms: i64) {
        self.entries.insert(
            (conversation.to_string(), participant.to_string()),
            now_ms + self.ttl_ms,
        );
    }

    /// Consume the pair's window if it is armed and unexpired.
    ///
    /// Called for every image-bearing event. A live window is removed and
    /// reported armed (single-shot: one candidate image consumes it even
    /// if the ingest then fails). An expired window is removed lazily and
    /// reported not armed.
    pub fn take_if_armed(&mut self, conversation: &str, participant: &str, now_ms: i64) -> bool {
        let key = (conversation.to_string(), participant.to_string());
        match self.entries.get(&key) {
            Some(&expiry) if now_ms <= expiry => {
                self.entries.remove(&key);
                true
            }
            Some(_) => {
                self.entries.remove(&key);
                false
            }
            None => false,
        }
    }

    /// Number of currently tracked windows (expired ones included until
    /// lazily dropped)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no windows are tracked
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: u64 = 60;

    #[test]
    fn test_take_within_window() {
        let mut sessions = CaptureSessions::new(TTL);
        sessions.arm("group-1", "alice", 1_000);

        assert!(sessions.take_if_armed("group-1", "alice", 30_000));
        // Single-shot: consumed
        assert!(!sessions.take_if_armed("group-1", "alice", 30_000));
    }

    #[test]
    fn test_take_at_exact_expiry() {
        let mut sessions = CaptureSessions::new(TTL);
        sessions.arm("g", "u", 0);
        // now == expiry still counts as armed
        assert!(sessions.take_if_armed("g", "u", 60_000));
    }

    #[test]
    fn test_expired_window_is_dropped() {
        let mut sessions = CaptureSessions::new(TTL);
        sessions.arm("g", "u", 0);

        assert!(!sessions.take_if_armed("g", "u", 60_001));
        // Lazily removed, not just hidden
        assert!(sessions.is_empty());
    }

    #[test]
    fn test_rearm_replaces() {
        let mut sessions = CaptureSessions::new(TTL);
        sessions.arm("g", "u", 0);
        // Re-arm much later: the fresh window applies
        sessions.arm("g", "u", 100_000);

        assert_eq!(sessions.len(), 1);
        assert!(sessions.take_if_armed("g", "u", 150_000));
    }

    #[test]
    fn test_pairs_are_independent() {
        let mut sessions = CaptureSessions::new(TTL);
        sessions.arm("g", "alice", 0);
        sessions.arm("g", "bob", 0);
        sessions.arm("other", "alice", 0);

        assert!(sessions.take_if_armed("g", "alice", 10_000));
        assert!(sessions.take_if_armed("g", "bob", 10_000));
        assert!(sessions.take_if_armed("other", "alice", 10_000));
        assert!(!sessions.take_if_armed("g", "alice", 10_000));
    }

    #[test]
    fn test_empty_ids_are_valid_keys() {
        let mut sessions = CaptureSessions::new(TTL);
        sessions.arm("", "", 0);
        assert!(sessions.take_if_armed("", "", 1_000));
    }
}
