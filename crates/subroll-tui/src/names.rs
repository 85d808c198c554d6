//! Background display-name lookups for the TUI.
//!
//! The event loop is synchronous, so lookups run on a small owned tokio
//! runtime. Each finished lookup sends its login back over a channel; the
//! loop drains it between frames and re-filters the summary, since a newly
//! known display name can make a row match the query.

use std::sync::{mpsc, Arc};
use subroll_core::{
    resolver::{DisplayNameCache, DisplayNameResolver},
    summary::DisplayNameSource,
};

/// The cache type the TUI shares with its lookup tasks.
pub type SharedCache = Arc<DisplayNameCache<Arc<dyn DisplayNameResolver>>>;

pub struct NameLookups {
    cache: SharedCache,
    runtime: tokio::runtime::Runtime,
    done_tx: mpsc::Sender<String>,
    done_rx: mpsc::Receiver<String>,
}

impl NameLookups {
    pub fn new(resolver: Arc<dyn DisplayNameResolver>) -> anyhow::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("subroll-lookup")
            .enable_all()
            .build()?;
        let (done_tx, done_rx) = mpsc::channel();
        Ok(Self {
            cache: Arc::new(DisplayNameCache::new(resolver)),
            runtime,
            done_tx,
            done_rx,
        })
    }

    /// Start a lookup for every login not yet cached or in flight. Returns
    /// how many were started.
    pub fn request<'a>(&self, logins: impl IntoIterator<Item = &'a str>) -> usize {
        let todo: Vec<String> = self
            .cache
            .unresolved(logins)
            .into_iter()
            .map(str::to_string)
            .collect();
        for login in &todo {
            let cache = Arc::clone(&self.cache);
            let tx = self.done_tx.clone();
            let login = login.clone();
            self.runtime.spawn(async move {
                cache.lookup(&login).await;
                let _ = tx.send(login);
            });
        }
        if !todo.is_empty() {
            tracing::debug!(count = todo.len(), "names: lookups started");
        }
        todo.len()
    }

    /// Logins whose lookups finished since the last call.
    pub fn drain_finished(&self) -> Vec<String> {
        self.done_rx.try_iter().collect()
    }

    /// Wait up to `timeout` for one lookup to finish.
    pub fn wait_finished(&self, timeout: std::time::Duration) -> Option<String> {
        self.done_rx.recv_timeout(timeout).ok()
    }

    pub fn display_name(&self, login: &str) -> Option<String> {
        self.cache.display_name(login)
    }

    pub fn source(&self) -> &dyn DisplayNameSource {
        &*self.cache
    }

    /// Lookups started but not finished, among `logins`.
    pub fn pending<'a>(&self, logins: impl IntoIterator<Item = &'a str>) -> usize {
        let mut seen = std::collections::HashSet::new();
        logins
            .into_iter()
            .filter(|login| seen.insert(*login) && self.cache.is_pending(login))
            .count()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
