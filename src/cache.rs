// Keyed refresh cache: serves a value until its TTL runs out, then recomputes on demand.
// Concurrent misses for one key share a single computation.

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::time::{Duration, Instant};

struct Entry<V> {
    value: V,
    expires_at: Instant,
}

/// `Err` means the computation panicked or was cancelled; its marker is already cleared.
type InFlight<V> = Shared<BoxFuture<'static, Result<V, ()>>>;

struct Slot<V> {
    entry: Option<Entry<V>>,
    /// Ticket identifies which computation owns the marker, so a late finisher can't clear a newer one.
    in_flight: Option<(u64, InFlight<V>)>,
}

impl<V> Default for Slot<V> {
    fn default() -> Self {
        Self {
            entry: None,
            in_flight: None,
        }
    }
}

struct State<K, V> {
    slots: HashMap<K, Slot<V>>,
    next_ticket: u64,
}

/// TTL cache keyed by metric class.
///
/// Errors are not special: whatever `compute` returns is cached until expiry. The lock is only
/// held for map reads and writes, never across a computation.
pub struct RefreshCache<K, V> {
    state: Arc<Mutex<State<K, V>>>,
}

impl<K, V> Clone for RefreshCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<K, V> Default for RefreshCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<K, V>(state: &Mutex<State<K, V>>) -> MutexGuard<'_, State<K, V>> {
    // Critical sections only swap whole values in and out, so a poisoned map is still consistent.
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn store<K, V>(
    state: &Mutex<State<K, V>>,
    key: K,
    value: V,
    ttl: Duration,
    ticket: Option<u64>,
) where
    K: Eq + Hash,
{
    let mut guard = lock(state);
    let slot = guard.slots.entry(key).or_default();
    slot.entry = Some(Entry {
        value,
        expires_at: Instant::now() + ttl,
    });
    if let Some(ticket) = ticket
        && slot.in_flight.as_ref().is_some_and(|(t, _)| *t == ticket)
    {
        slot.in_flight = None;
    }
}

/// Drop the in-flight marker for `key` if `ticket` still owns it.
fn clear_in_flight<K, V>(state: &Mutex<State<K, V>>, key: &K, ticket: u64)
where
    K: Eq + Hash,
{
    let mut guard = lock(state);
    if let Some(slot) = guard.slots.get_mut(key)
        && slot.in_flight.as_ref().is_some_and(|(t, _)| *t == ticket)
    {
        slot.in_flight = None;
    }
}

impl<K, V> RefreshCache<K, V> {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                slots: HashMap::new(),
                next_ticket: 0,
            })),
        }
    }
}

impl<K, V> RefreshCache<K, V>
where
    K: Eq + Hash + Clone + Debug + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// The cached value for `key`, if present and not expired.
    pub fn get(&self, key: &K) -> Option<V> {
        let guard = lock(&self.state);
        let entry = guard.slots.get(key)?.entry.as_ref()?;
        (entry.expires_at > Instant::now()).then(|| entry.value.clone())
    }

    /// Store `value` under `key`, replacing any previous entry, valid for `ttl`.
    pub fn set(&self, key: K, value: V, ttl: Duration) {
        store(&self.state, key, value, ttl, None);
    }

    /// Return the fresh cached value, or run `compute`, cache its result for `ttl` and return it.
    ///
    /// At most one computation per key runs at a time: callers that miss while one is already
    /// running wait for it instead of starting another. The computation runs as its own tokio
    /// task and stores its result when it finishes, whether or not anyone is still waiting.
    ///
    /// Must be called from within a tokio runtime. If `compute` panics, the marker is cleared
    /// so the next caller starts afresh, and every caller waiting on it panics.
    pub async fn get_or_compute<F, Fut>(&self, key: K, ttl: Duration, compute: F) -> V
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V> + Send + 'static,
    {
        let pending = {
            let mut guard = lock(&self.state);
            let state = &mut *guard;
            let slot = state.slots.entry(key.clone()).or_default();

            if let Some(entry) = &slot.entry
                && entry.expires_at > Instant::now()
            {
                tracing::debug!(key = ?key, "cache hit");
                return entry.value.clone();
            }

            let joined = slot.in_flight.as_ref().map(|(_, pending)| pending.clone());
            match joined {
                Some(pending) => {
                    tracing::debug!(key = ?key, "cache miss; joining in-flight collection");
                    pending
                }
                None => {
                    tracing::debug!(key = ?key, "cache miss; collecting");
                    let ticket = state.next_ticket;
                    state.next_ticket = state.next_ticket.wrapping_add(1);

                    let shared_state = Arc::clone(&self.state);
                    let task_key = key.clone();
                    let fut = compute();
                    let handle = tokio::spawn(async move {
                        match AssertUnwindSafe(fut).catch_unwind().await {
                            Ok(value) => {
                                store(&shared_state, task_key, value.clone(), ttl, Some(ticket));
                                Ok(value)
                            }
                            Err(_) => {
                                clear_in_flight(&shared_state, &task_key, ticket);
                                Err(())
                            }
                        }
                    });
                    let pending = handle.map(|joined| joined.unwrap_or(Err(()))).boxed().shared();
                    slot.in_flight = Some((ticket, pending.clone()));
                    pending
                }
            }
        };
        match pending.await {
            Ok(value) => value,
            Err(()) => panic!("collection for {key:?} did not complete"),
        }
    }
}
