//! Dependency-keyed asynchronous values.
//!
//! A [`FetchResource`] remembers the key it last fetched for. Asking it to
//! track a new key bumps its generation and hands out a [`FetchTicket`]; a
//! result is adopted only when it arrives with the current generation, so a
//! slow response for an older key can never overwrite a newer one.

use crate::catalog::FetchError;

#[derive(Debug, Clone, PartialEq)]
pub enum ResourceState<T> {
    /// No key, nothing to fetch.
    Idle,
    Loading,
    Ready(T),
    Errored(FetchError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchTicket<K> {
    generation: u64,
    key: K,
}

impl<K> FetchTicket<K> {
    pub fn key(&self) -> &K {
        &self.key
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchResource<K, T> {
    key: Option<K>,
    generation: u64,
    state: ResourceState<T>,
}

impl<K, T> Default for FetchResource<K, T> {
    fn default() -> Self {
        Self {
            key: None,
            generation: 0,
            state: ResourceState::Idle,
        }
    }
}

impl<K: Clone + PartialEq, T> FetchResource<K, T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track `key`. Returns a ticket only when the key differs from the one
    /// already tracked.
    pub fn track(&mut self, key: Option<K>) -> Option<FetchTicket<K>> {
        if self.key == key {
            return None;
        }
        self.key = key;
        self.issue()
    }

    /// Re-fetch the current key even though it has not changed.
    pub fn invalidate(&mut self) -> Option<FetchTicket<K>> {
        self.issue()
    }

    fn issue(&mut self) -> Option<FetchTicket<K>> {
        self.generation += 1;
        match &self.key {
            Some(key) => {
                self.state = ResourceState::Loading;
                Some(FetchTicket {
                    generation: self.generation,
                    key: key.clone(),
                })
            }
            None => {
                self.state = ResourceState::Idle;
                None
            }
        }
    }

    /// Adopt `result` if `ticket` is still current. Returns whether it was adopted.
    pub fn resolve(&mut self, ticket: &FetchTicket<K>, result: Result<T, FetchError>) -> bool {
        if ticket.generation != self.generation {
            log::debug!(
                "Discarding stale result (generation {}, current {})",
                ticket.generation,
                self.generation
            );
            return false;
        }
        self.state = match result {
            Ok(value) => ResourceState::Ready(value),
            Err(e) => ResourceState::Errored(e),
        };
        true
    }

    pub fn key(&self) -> Option<&K> {
        self.key.as_ref()
    }

    pub fn state(&self) -> &ResourceState<T> {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ResourceState::Loading)
    }

    pub fn value(&self) -> Option<&T> {
        match &self.state {
            ResourceState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match &self.state {
            ResourceState::Errored(e) => Some(e),
            _ => None,
        }
    }
}
