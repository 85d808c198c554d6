//! subroll-lookup: display-name lookup for extracted logins.
//!
//! [`IvrClient`] asks the public IVR Twitch API for a login's display name and
//! implements [`subroll_core::resolver::DisplayNameResolver`], so it can sit
//! behind a [`subroll_core::resolver::DisplayNameCache`].

pub mod client;
pub mod error;

pub use client::IvrClient;
pub use error::LookupError;

use subroll_core::config::LookupConfig;
use subroll_core::resolver::DisplayNameCache;

/// Build the cache the application uses, or `None` when lookups are disabled
/// in config.
pub fn cache_from_config(config: &LookupConfig) -> Option<DisplayNameCache<IvrClient>> {
    if !config.enabled {
        tracing::debug!("display-name lookup disabled by config");
        return None;
    }
    Some(DisplayNameCache::new(IvrClient::from_config(config)))
}
