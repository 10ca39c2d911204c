use std::collections::HashMap;

use crate::types::{RawScanResponse, RequestKey, ScanRequestState, ScanResult};
use crate::verdict::parse_response;

/// Handed out by `begin`; only the most recently issued token for a key
/// may change that key's state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanToken {
    key: RequestKey,
    generation: u64,
}

impl ScanToken {
    pub fn key(&self) -> &RequestKey {
        &self.key
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    Stale,
}

struct Slot {
    generation: u64,
    state: ScanRequestState,
}

pub struct ResultStore {
    slots: HashMap<RequestKey, Slot>,
    next_generation: u64,
}

impl ResultStore {
    pub fn new() -> Self {
        Self {
            slots: HashMap::new(),
            next_generation: 1,
        }
    }

    pub fn begin(&mut self, key: RequestKey) -> ScanToken {
        // Generations are global so a token issued before `close` can never
        // match a slot re-created afterwards.
        let generation = self.next_generation;
        self.next_generation += 1;

        self.slots.insert(
            key.clone(),
            Slot {
                generation,
                state: ScanRequestState::pending(),
            },
        );

        ScanToken { key, generation }
    }

    pub fn resolve(&mut self, token: &ScanToken, raw: &RawScanResponse) -> Resolution {
        self.apply(token, ScanRequestState::resolved(parse_response(raw)))
    }

    /// Stores an already-built result.
    pub fn resolve_with(&mut self, token: &ScanToken, result: ScanResult) -> Resolution {
        self.apply(token, ScanRequestState::resolved(result))
    }

    pub fn fail(&mut self, token: &ScanToken, message: &str) -> Resolution {
        self.apply(token, ScanRequestState::failed(message))
    }

    pub fn current(&self, key: &RequestKey) -> ScanRequestState {
        self.slots
            .get(key)
            .map(|slot| slot.state.clone())
            .unwrap_or_default()
    }

    pub fn is_live(&self, token: &ScanToken) -> bool {
        self.slots
            .get(&token.key)
            .map_or(false, |slot| slot.generation == token.generation)
    }

    pub fn close(&mut self, key: &RequestKey) -> bool {
        self.slots.remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    pub fn size(&self) -> usize {
        self.slots.len()
    }

    fn apply(&mut self, token: &ScanToken, state: ScanRequestState) -> Resolution {
        match self.slots.get_mut(&token.key) {
            Some(slot) if slot.generation == token.generation => {
                slot.state = state;
                Resolution::Applied
            }
            _ => {
                tracing::debug!(
                    "Dropping stale {} response for {}",
                    token.key.purpose.as_str(),
                    token.key.target
                );
                Resolution::Stale
            }
        }
    }
}

impl Default for ResultStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ScanPurpose, ScanStatus, Verdict};

    fn response(level: &str, reason: &str) -> RawScanResponse {
        RawScanResponse {
            risk_level: Some(level.to_string()),
            reason_text: Some(reason.to_string()),
            ..Default::default()
        }
    }

    fn key() -> RequestKey {
        RequestKey::new("http://example.com", ScanPurpose::Url)
    }

    #[test]
    fn test_current_idle_before_begin() {
        let store = ResultStore::new();
        assert_eq!(store.current(&key()).status, ScanStatus::Idle);
    }

    #[test]
    fn test_begin_then_resolve() {
        let mut store = ResultStore::new();
        let token = store.begin(key());
        assert_eq!(store.current(&key()).status, ScanStatus::Pending);

        let outcome = store.resolve(&token, &response("GREEN", "Looks fine"));
        assert_eq!(outcome, Resolution::Applied);

        let state = store.current(&key());
        assert_eq!(state.status, ScanStatus::Resolved);
        let result = state.result.unwrap();
        assert_eq!(result.verdict(), Verdict::Safe);
        assert_eq!(result.reason_text(), "Looks fine");
    }

    #[test]
    fn test_newer_wins_when_older_finishes_first() {
        let mut store = ResultStore::new();
        let t1 = store.begin(key());
        let t2 = store.begin(key());

        assert_eq!(store.resolve(&t1, &response("RED", "old")), Resolution::Stale);
        assert_eq!(store.current(&key()).status, ScanStatus::Pending);

        assert_eq!(store.resolve(&t2, &response("GREEN", "new")), Resolution::Applied);
        let result = store.current(&key()).result.unwrap();
        assert_eq!(result.reason_text(), "new");
    }

    #[test]
    fn test_newer_wins_when_older_finishes_last() {
        let mut store = ResultStore::new();
        let t1 = store.begin(key());
        let t2 = store.begin(key());

        store.resolve(&t2, &response("GREEN", "new"));
        store.resolve(&t1, &response("RED", "old"));

        let result = store.current(&key()).result.unwrap();
        assert_eq!(result.verdict(), Verdict::Safe);
        assert_eq!(result.reason_text(), "new");
    }

    #[test]
    fn test_stale_fail_does_not_change_state() {
        let mut store = ResultStore::new();
        let t1 = store.begin(key());
        let t2 = store.begin(key());
        store.resolve(&t2, &response("YELLOW", "Shortened URL"));

        let before = store.current(&key());
        assert_eq!(store.fail(&t1, "Error: Could not connect to server."), Resolution::Stale);
        assert_eq!(store.current(&key()), before);
    }

    #[test]
    fn test_begin_discards_previous_result() {
        let mut store = ResultStore::new();
        let t1 = store.begin(key());
        store.resolve(&t1, &response("RED", "bad"));

        store.begin(key());
        let state = store.current(&key());
        assert_eq!(state.status, ScanStatus::Pending);
        assert!(state.result.is_none());
    }

    #[test]
    fn test_keys_are_independent() {
        let mut store = ResultStore::new();
        let url = store.begin(RequestKey::new("page", ScanPurpose::Url));
        let content = store.begin(RequestKey::new("page", ScanPurpose::Content));

        store.fail(&url, "down");
        store.resolve(&content, &response("GREEN", "ok"));

        assert_eq!(store.current(&RequestKey::new("page", ScanPurpose::Url)).status, ScanStatus::Failed);
        assert_eq!(
            store.current(&RequestKey::new("page", ScanPurpose::Content)).status,
            ScanStatus::Resolved
        );
        assert_eq!(store.size(), 2);
    }

    #[test]
    fn test_close_invalidates_outstanding_token() {
        let mut store = ResultStore::new();
        let t1 = store.begin(key());
        assert!(store.close(&key()));
        assert!(!store.is_live(&t1));

        // A slot re-created after close must not accept the old token.
        let t2 = store.begin(key());
        assert_eq!(store.resolve(&t1, &response("RED", "old")), Resolution::Stale);
        assert!(store.is_live(&t2));
        assert_eq!(store.current(&key()).status, ScanStatus::Pending);
    }
}
