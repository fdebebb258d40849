//! Keyed cache of server data.
//!
//! Views never call the API directly for reads. They declare the resources
//! they observe through a [`QueryObserver`], read state with
//! [`QueryClient::state`], and learn about changes from
//! [`QueryClient::subscribe`]. Writes go through [`QueryClient::mutate`],
//! which invalidates the affected keys and waits for observed keys to
//! refetch before returning.
//!
//! Per key, only the most recently issued fetch may update the entry; each
//! fetch carries the entry's generation at issue time and a response with an
//! older generation is dropped.

pub mod key;
pub mod mutation;
pub mod resource;
pub mod state;

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast;

use crate::api::TicketApi;
use crate::error::Result;

pub use key::{KeyPart, QueryKey};
pub use mutation::{Mutation, MutationOutcome};
pub use resource::{QueryData, Resource};
pub use state::QueryState;

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Unobserved entries kept for instant back-navigation and list placeholders
pub const MAX_IDLE_ENTRIES: usize = 64;

/// Notification sent when the cache changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEvent {
    /// A fetch was issued for the key
    Fetching(QueryKey),
    /// A fetch result was applied to the key
    Updated(QueryKey),
    /// Keys under this prefix were marked stale
    Invalidated(QueryKey),
    /// The key's data was dropped because it no longer exists on the server
    Removed(QueryKey),
}

/// Issued by [`QueryClient::begin_fetch`] and handed back on completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchToken {
    pub key: QueryKey,
    pub generation: u64,
}

struct Entry {
    resource: Resource,
    state: QueryState<QueryData>,
    /// Incremented each time a fetch is issued
    generation: u64,
    stale: bool,
    observers: usize,
    /// Cache-wide sequence number of the last applied success
    updated_seq: u64,
    /// Cache-wide sequence number of the moment the last observer left
    released_seq: u64,
}

impl Entry {
    fn new(resource: Resource) -> Self {
        Self {
            resource,
            state: QueryState::Empty,
            generation: 0,
            stale: false,
            observers: 0,
            updated_seq: 0,
            released_seq: 0,
        }
    }
}

#[derive(Default)]
struct Cache {
    entries: HashMap<QueryKey, Entry>,
    next_seq: u64,
}

impl Cache {
    fn bump_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    /// Drop the least recently released idle entries beyond `keep`.
    /// Entries with a fetch in flight are never dropped.
    fn evict_idle(&mut self, keep: usize) -> Vec<QueryKey> {
        let mut idle: Vec<(u64, QueryKey)> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.observers == 0 && !entry.state.is_fetching())
            .map(|(key, entry)| (entry.released_seq, key.clone()))
            .collect();
        if idle.len() <= keep {
            return Vec::new();
        }

        idle.sort_unstable_by_key(|(seq, _)| *seq);
        let excess = idle.len() - keep;
        idle.into_iter()
            .take(excess)
            .map(|(_, key)| {
                self.entries.remove(&key);
                key
            })
            .collect()
    }
}

struct Inner {
    api: Arc<dyn TicketApi>,
    cache: Mutex<Cache>,
    events: broadcast::Sender<CacheEvent>,
}

/// Shared handle to the cache; clones refer to the same cache
#[derive(Clone)]
pub struct QueryClient {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for QueryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryClient")
            .field("entries", &self.inner.cache.lock().entries.len())
            .finish()
    }
}

impl QueryClient {
    pub fn new(api: Arc<dyn TicketApi>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                api,
                cache: Mutex::new(Cache::default()),
                events,
            }),
        }
    }

    pub fn api(&self) -> &Arc<dyn TicketApi> {
        &self.inner.api
    }

    /// Subscribe to cache change notifications
    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.inner.events.subscribe()
    }

    fn emit(&self, event: CacheEvent) {
        // No receivers is fine; nobody is rendering
        let _ = self.inner.events.send(event);
    }

    /// Last-known state for exactly this key
    pub fn state(&self, key: &QueryKey) -> QueryState<QueryData> {
        self.inner
            .cache
            .lock()
            .entries
            .get(key)
            .map(|entry| entry.state.clone())
            .unwrap_or_default()
    }

    pub fn is_stale(&self, key: &QueryKey) -> bool {
        self.inner
            .cache
            .lock()
            .entries
            .get(key)
            .is_some_and(|entry| entry.stale)
    }

    /// Number of live observers of this key
    pub fn observer_count(&self, key: &QueryKey) -> usize {
        self.inner
            .cache
            .lock()
            .entries
            .get(key)
            .map_or(0, |entry| entry.observers)
    }

    /// Number of keys currently cached
    pub fn entry_count(&self) -> usize {
        self.inner.cache.lock().entries.len()
    }

    /// Data of the most recently updated entry under `prefix`
    pub fn latest_data(&self, prefix: &QueryKey) -> Option<QueryData> {
        let cache = self.inner.cache.lock();
        cache
            .entries
            .iter()
            .filter(|(key, entry)| key.starts_with(prefix) && entry.state.data().is_some())
            .max_by_key(|(_, entry)| entry.updated_seq)
            .and_then(|(_, entry)| entry.state.data().cloned())
    }

    /// Mark a fetch as issued for `resource`, superseding any fetch in flight
    pub fn begin_fetch(&self, resource: &Resource) -> FetchToken {
        let key = resource.key();
        let generation = {
            let mut cache = self.inner.cache.lock();
            let entry = cache
                .entries
                .entry(key.clone())
                .or_insert_with(|| Entry::new(resource.clone()));
            entry.generation += 1;
            entry.stale = false;
            entry.state = std::mem::take(&mut entry.state).begin();
            entry.generation
        };

        tracing::debug!("Fetching {} (generation {})", key, generation);
        self.emit(CacheEvent::Fetching(key.clone()));
        FetchToken { key, generation }
    }

    /// Apply a fetch result. Returns false when a newer fetch for the same
    /// key has been issued since, in which case the result is discarded.
    pub fn complete_fetch(&self, token: FetchToken, result: Result<QueryData>) -> bool {
        {
            let mut cache = self.inner.cache.lock();
            let seq = cache.bump_seq();

            let Some(entry) = cache.entries.get_mut(&token.key) else {
                return false;
            };
            if entry.generation != token.generation {
                tracing::debug!(
                    "Discarding superseded response for {} (generation {}, current {})",
                    token.key,
                    token.generation,
                    entry.generation
                );
                return false;
            }

            let state = std::mem::take(&mut entry.state);
            entry.state = match result {
                Ok(data) => {
                    entry.updated_seq = seq;
                    state.succeed(data)
                }
                Err(e) => {
                    tracing::warn!("Fetch of {} failed: {}", token.key, e);
                    state.fail(e.to_string())
                }
            };
        }

        self.emit(CacheEvent::Updated(token.key));
        true
    }

    /// Fetch `resource` now and apply the result
    pub async fn fetch(&self, resource: &Resource) -> bool {
        let token = self.begin_fetch(resource);
        let result = resource.fetch(self.inner.api.as_ref()).await;
        self.complete_fetch(token, result)
    }

    /// Start observing resources for a mounted view
    pub fn observer(&self) -> QueryObserver {
        QueryObserver {
            client: self.clone(),
            resources: Vec::new(),
        }
    }

    /// Mark every key under `prefix` stale and refetch the observed ones.
    ///
    /// Returns the keys that were refetched once their fetches have settled.
    pub async fn invalidate(&self, prefix: &QueryKey) -> Vec<QueryKey> {
        self.invalidate_all(std::slice::from_ref(prefix)).await
    }

    /// [`invalidate`](Self::invalidate) for several prefixes at once; a key
    /// covered by more than one prefix is refetched once.
    pub async fn invalidate_all(&self, prefixes: &[QueryKey]) -> Vec<QueryKey> {
        let to_refetch: Vec<Resource> = {
            let mut cache = self.inner.cache.lock();
            cache
                .entries
                .iter_mut()
                .filter(|(key, _)| prefixes.iter().any(|prefix| key.starts_with(prefix)))
                .filter_map(|(_, entry)| {
                    entry.stale = true;
                    (entry.observers > 0).then(|| entry.resource.clone())
                })
                .collect()
        };

        for prefix in prefixes {
            tracing::debug!("Invalidated {}", prefix);
            self.emit(CacheEvent::Invalidated(prefix.clone()));
        }

        let keys: Vec<QueryKey> = to_refetch.iter().map(Resource::key).collect();
        futures::future::join_all(to_refetch.iter().map(|resource| self.fetch(resource))).await;
        keys
    }

    /// Forget the data under exactly these keys without refetching.
    ///
    /// An observed entry is reset to empty and keeps its observers; a fetch
    /// still in flight for it is discarded on completion.
    pub fn remove(&self, keys: &[QueryKey]) {
        {
            let mut cache = self.inner.cache.lock();
            for key in keys {
                let Some(entry) = cache.entries.remove(key) else {
                    continue;
                };
                if entry.observers > 0 {
                    let mut reset = Entry::new(entry.resource);
                    reset.observers = entry.observers;
                    reset.generation = entry.generation + 1;
                    cache.entries.insert(key.clone(), reset);
                }
            }
        }

        for key in keys {
            tracing::debug!("Removed {}", key);
            self.emit(CacheEvent::Removed(key.clone()));
        }
    }

    /// Perform a write; on success drop the data it deleted, invalidate the
    /// affected keys and wait for the observed ones to refetch.
    pub async fn mutate(&self, mutation: &Mutation) -> Result<MutationOutcome> {
        tracing::debug!("Running mutation: {}", mutation.label());
        let outcome = mutation
            .execute(self.inner.api.as_ref())
            .await
            .inspect_err(|e| tracing::warn!("Mutation '{}' failed: {}", mutation.label(), e))?;

        self.remove(&mutation.removes());
        self.invalidate_all(&mutation.invalidates()).await;
        tracing::info!("Mutation '{}' succeeded", mutation.label());
        Ok(outcome)
    }

    fn register(&self, resource: &Resource) -> bool {
        let mut cache = self.inner.cache.lock();
        let entry = cache
            .entries
            .entry(resource.key())
            .or_insert_with(|| Entry::new(resource.clone()));
        entry.observers += 1;
        // Newly observed: fetch if never fetched, stale, or last fetch failed
        !entry.state.is_fetching()
            && (entry.state.is_empty() || entry.stale || entry.state.error().is_some())
    }

    fn release(&self, resource: &Resource) {
        let mut cache = self.inner.cache.lock();
        let seq = cache.bump_seq();
        if let Some(entry) = cache.entries.get_mut(&resource.key()) {
            entry.observers = entry.observers.saturating_sub(1);
            if entry.observers == 0 {
                entry.released_seq = seq;
            }
        }

        for key in cache.evict_idle(MAX_IDLE_ENTRIES) {
            tracing::debug!("Evicted idle {}", key);
        }
    }
}

/// The set of resources one mounted view is observing
///
/// Keys are released when the observer is dropped; their data stays cached.
pub struct QueryObserver {
    client: QueryClient,
    resources: Vec<Resource>,
}

impl QueryObserver {
    /// Replace the observed set. Returns the resources that need a fetch:
    /// newly observed ones that were never fetched, are stale, or failed.
    /// Resources that stay observed are not returned again.
    pub fn set_resources(&mut self, resources: Vec<Resource>) -> Vec<Resource> {
        let mut needs_fetch = Vec::new();

        for resource in &resources {
            if !self.resources.contains(resource) && self.client.register(resource) {
                needs_fetch.push(resource.clone());
            }
        }
        for resource in &self.resources {
            if !resources.contains(resource) {
                self.client.release(resource);
            }
        }

        self.resources = resources;
        needs_fetch
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn client(&self) -> &QueryClient {
        &self.client
    }
}

impl Drop for QueryObserver {
    fn drop(&mut self) {
        for resource in &self.resources {
            self.client.release(resource);
        }
    }
}
