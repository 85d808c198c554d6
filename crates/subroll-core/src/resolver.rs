//! Display-name resolution: the resolver seam and an in-memory cache in front
//! of it.
//!
//! Lookups are best-effort. A failed or missing lookup is cached as `None`
//! just like a hit, so each login costs at most one request per session.
//! While a request for a login is in flight, further lookups for it return
//! `None` right away instead of issuing a second request.

use crate::summary::DisplayNameSource;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

/// Maps a login to its human display name.
#[async_trait]
pub trait DisplayNameResolver: Send + Sync {
    /// `None` when the login is unknown or the lookup failed.
    async fn resolve(&self, login: &str) -> Option<String>;
}

#[async_trait]
impl<R: DisplayNameResolver + ?Sized> DisplayNameResolver for Arc<R> {
    async fn resolve(&self, login: &str) -> Option<String> {
        (**self).resolve(login).await
    }
}

#[derive(Debug, Default)]
struct CacheState {
    resolved: HashMap<String, Option<String>>,
    pending: HashSet<String>,
}

/// Caching, de-duplicating front for a [`DisplayNameResolver`].
pub struct DisplayNameCache<R> {
    resolver: R,
    state: Mutex<CacheState>,
}

impl<R: DisplayNameResolver> DisplayNameCache<R> {
    pub fn new(resolver: R) -> Self {
        Self { resolver, state: Mutex::new(CacheState::default()) }
    }

    /// Resolve `login`, consulting the cache first.
    ///
    /// Returns `None` without calling the resolver when the login is empty or
    /// a lookup for it is already running.
    pub async fn lookup(&self, login: &str) -> Option<String> {
        if login.is_empty() {
            return None;
        }
        {
            let mut state = self.lock();
            if let Some(cached) = state.resolved.get(login) {
                return cached.clone();
            }
            if !state.pending.insert(login.to_string()) {
                tracing::trace!(login, "display name: already in flight");
                return None;
            }
        }

        tracing::debug!(login, "display name: resolving");
        let resolved = self.resolver.resolve(login).await;

        let mut state = self.lock();
        state.pending.remove(login);
        state.resolved.insert(login.to_string(), resolved.clone());
        resolved
    }

    /// Cached outcome for `login`: `None` if never resolved, `Some(None)` if
    /// resolved without a display name.
    pub fn cached(&self, login: &str) -> Option<Option<String>> {
        self.lock().resolved.get(login).cloned()
    }

    pub fn is_pending(&self, login: &str) -> bool {
        self.lock().pending.contains(login)
    }

    /// Logins among `logins` that are neither cached nor in flight, in first
    /// appearance order without duplicates.
    pub fn unresolved<'a>(&self, logins: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
        let state = self.lock();
        let mut seen = HashSet::new();
        logins
            .into_iter()
            .filter(|login| {
                !login.is_empty()
                    && seen.insert(*login)
                    && !state.resolved.contains_key(*login)
                    && !state.pending.contains(*login)
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().resolved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        // The state is plain maps; a panic elsewhere cannot leave it torn.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<R: DisplayNameResolver> DisplayNameSource for DisplayNameCache<R> {
    fn display_name(&self, login: &str) -> Option<String> {
        self.cached(login).flatten()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
