use crate::domain::LobbyId;
use crate::protocol::RequestId;
use instant::{Duration, Instant};
use std::collections::{HashMap, VecDeque};

#[derive(Debug, Clone)]
struct PendingJoin {
    lobby_id: LobbyId,
    issued_at: Instant,
}

/// Outstanding `join_lobby` requests, keyed by request id.
///
/// Insertion order is kept so that answers without an echoed id resolve
/// the oldest request first.
#[derive(Debug)]
pub struct PendingJoins {
    entries: HashMap<RequestId, PendingJoin>,
    order: VecDeque<RequestId>,
    max_outstanding: usize,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PendingError {
    #[error("Too many outstanding join requests (max: {max})")]
    Full { max: usize },

    #[error("Join request {0} is already pending")]
    Duplicate(RequestId),
}

impl PendingJoins {
    pub fn new(max_outstanding: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            max_outstanding,
        }
    }

    pub fn track(
        &mut self,
        request_id: RequestId,
        lobby_id: LobbyId,
        now: Instant,
    ) -> Result<(), PendingError> {
        if self.entries.contains_key(&request_id) {
            return Err(PendingError::Duplicate(request_id));
        }
        if self.entries.len() >= self.max_outstanding {
            return Err(PendingError::Full {
                max: self.max_outstanding,
            });
        }

        self.entries.insert(
            request_id,
            PendingJoin {
                lobby_id,
                issued_at: now,
            },
        );
        self.order.push_back(request_id);
        Ok(())
    }

    /// Take the request an answer belongs to.
    ///
    /// An echoed id resolves exactly that request (or nothing, if it is no
    /// longer pending). Without an echo the oldest request is taken.
    pub fn resolve(&mut self, echoed: Option<RequestId>) -> Option<(RequestId, LobbyId)> {
        let request_id = match echoed {
            Some(id) => id,
            None => *self.order.front()?,
        };
        self.remove(&request_id)
            .map(|lobby_id| (request_id, lobby_id))
    }

    /// Forget a request without resolving it, returning the lobby it targeted
    pub fn remove(&mut self, request_id: &RequestId) -> Option<LobbyId> {
        let entry = self.entries.remove(request_id)?;
        self.order.retain(|id| id != request_id);
        Some(entry.lobby_id)
    }

    /// Remove every request issued more than `timeout` before `now`
    pub fn expire(&mut self, now: Instant, timeout: Duration) -> Vec<RequestId> {
        let expired: Vec<RequestId> = self
            .order
            .iter()
            .filter(|id| {
                self.entries
                    .get(id)
                    .is_some_and(|entry| now.saturating_duration_since(entry.issued_at) >= timeout)
            })
            .copied()
            .collect();

        for id in &expired {
            self.remove(id);
        }
        expired
    }

    /// Remove every request, oldest first
    pub fn drain(&mut self) -> Vec<RequestId> {
        self.entries.clear();
        self.order.drain(..).collect()
    }

    pub fn contains(&self, request_id: &RequestId) -> bool {
        self.entries.contains_key(request_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for PendingJoins {
    fn default() -> Self {
        Self::new(16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lobby(id: &str) -> LobbyId {
        LobbyId::new(id)
    }

    #[test]
    fn test_resolve_by_echoed_id() {
        let mut pending = PendingJoins::new(10);
        let now = Instant::now();
        let first = RequestId::new();
        let second = RequestId::new();

        pending.track(first, lobby("L1"), now).unwrap();
        pending.track(second, lobby("L2"), now).unwrap();

        assert_eq!(pending.resolve(Some(second)), Some((second, lobby("L2"))));
        assert!(pending.contains(&first));
        assert_eq!(pending.len(), 1);
    }

    #[test]
    fn test_resolve_without_echo_takes_oldest() {
        let mut pending = PendingJoins::new(10);
        let now = Instant::now();
        let ids: Vec<RequestId> = (0..3).map(|_| RequestId::new()).collect();

        for (i, id) in ids.iter().enumerate() {
            pending.track(*id, lobby(&format!("L{}", i)), now).unwrap();
        }

        for (i, id) in ids.iter().enumerate() {
            assert_eq!(pending.resolve(None), Some((*id, lobby(&format!("L{}", i)))));
        }
        assert_eq!(pending.resolve(None), None);
    }

    #[test]
    fn test_unknown_echo_resolves_nothing() {
        let mut pending = PendingJoins::new(10);
        pending
            .track(RequestId::new(), lobby("L1"), Instant::now())
            .unwrap();

        assert_eq!(pending.resolve(Some(RequestId::new())), None);
        assert_eq!(pending.len(), 1);
    }

    #[test]
    fn test_track_limits() {
        let mut pending = PendingJoins::new(2);
        let now = Instant::now();
        let id = RequestId::new();

        pending.track(id, lobby("L1"), now).unwrap();
        assert_eq!(
            pending.track(id, lobby("L1"), now),
            Err(PendingError::Duplicate(id))
        );

        pending.track(RequestId::new(), lobby("L2"), now).unwrap();
        assert_eq!(
            pending.track(RequestId::new(), lobby("L3"), now),
            Err(PendingError::Full { max: 2 })
        );
    }

    #[test]
    fn test_expire_only_old_requests() {
        let mut pending = PendingJoins::new(10);
        let start = Instant::now();
        let old = RequestId::new();
        let fresh = RequestId::new();

        pending.track(old, lobby("L1"), start).unwrap();
        pending
            .track(fresh, lobby("L2"), start + Duration::from_secs(8))
            .unwrap();

        let expired = pending.expire(start + Duration::from_secs(10), Duration::from_secs(5));
        assert_eq!(expired, vec![old]);
        assert!(pending.contains(&fresh));
    }

    #[test]
    fn test_drain_keeps_order() {
        let mut pending = PendingJoins::default();
        let now = Instant::now();
        let a = RequestId::new();
        let b = RequestId::new();
        pending.track(a, lobby("L1"), now).unwrap();
        pending.track(b, lobby("L2"), now).unwrap();

        assert_eq!(pending.drain(), vec![a, b]);
        assert!(pending.is_empty());
    }
}
