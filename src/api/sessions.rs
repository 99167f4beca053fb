use std::collections::{HashMap, VecDeque};
use uuid::Uuid;

use crate::api::SessionResult;

/// Last result per browser session, bounded to `capacity` entries.
///
/// Writing to an existing session replaces its result and marks it as the
/// most recent one. When a new session would exceed the capacity, the
/// session written least recently is dropped.
#[derive(Debug)]
pub struct SessionStore {
    capacity: usize,
    results: HashMap<Uuid, SessionResult>,
    order: VecDeque<Uuid>,
}

impl SessionStore {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            results: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn get(&self, session_id: &Uuid) -> Option<&SessionResult> {
        self.results.get(session_id)
    }

    pub fn insert(&mut self, session: SessionResult) {
        let session_id = session.session_id;
        if self.results.insert(session_id, session).is_some() {
            self.order.retain(|id| *id != session_id);
        }
        self.order.push_back(session_id);

        while self.results.len() > self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.results.remove(&oldest);
                }
                None => break,
            }
        }
    }
}
