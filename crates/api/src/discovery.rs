//! Discovery related types.
//!
//! The set of all proxy servers must never be revealed in full: revealing
//! too many endpoints at once lets an adversary enumerate and block them.
//! The [Discovery] module maps each client identifier to a small, stable
//! subset of the currently-discoverable servers instead.

use crate::*;
use std::sync::Arc;

/// Assigns clients to the proxy servers they are allowed to discover.
pub trait Discovery: 'static + Send + Sync + std::fmt::Debug {
    /// Replace the authoritative set of discoverable servers.
    ///
    /// The input is the complete current set, not a delta. An empty list
    /// is valid and means nothing is currently discoverable. After this
    /// call returns, every supplied server is reachable by at least one
    /// client key, with its [DiscoveryWindow] independently gating
    /// visibility at lookup time.
    fn servers_changed(&self, servers: Vec<Arc<DiscoveryServer>>);

    /// Get the servers the given client may see right now.
    ///
    /// `client_key` is an opaque client identifier, such as the raw bytes
    /// of an IP address. The result holds zero or one servers. Absence of
    /// a result carries no signal about *why* no server was returned.
    fn select_servers(&self, client_key: &[u8]) -> Vec<Arc<DiscoveryServer>>;
}

/// Trait-object [Discovery].
pub type DynDiscovery = Arc<dyn Discovery>;

/// A factory for constructing [Discovery] instances.
pub trait DiscoveryFactory: 'static + Send + Sync + std::fmt::Debug {
    /// Help the builder construct a default config from the chosen
    /// module factories.
    fn default_config(&self, config: &mut Config) -> BurrowResult<()>;

    /// Validate configuration.
    fn validate_config(&self, config: &Config) -> BurrowResult<()>;

    /// Construct a discovery instance.
    fn create(
        &self,
        builder: Arc<Builder>,
    ) -> BoxFut<'static, BurrowResult<DynDiscovery>>;
}

/// Trait-object [DiscoveryFactory].
pub type DynDiscoveryFactory = Arc<dyn DiscoveryFactory>;
