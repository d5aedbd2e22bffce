//! Builder-related types.

use crate::*;
use std::sync::Arc;

/// The general Burrow builder.
/// This contains both configuration and factory instances,
/// allowing construction of runtime module instances.
#[derive(Debug)]
pub struct Builder {
    /// The module configuration to be used when building modules.
    /// This can be loaded from disk or modified before freezing the builder.
    pub config: crate::config::Config,

    /// The [Clock] capability to use for this Burrow instance.
    pub clock: DynClock,

    /// The [DiscoveryFactory] to be used for creating
    /// [Discovery] instances.
    pub discovery: DynDiscoveryFactory,
}

impl Builder {
    /// Construct a default config given the configured module factories.
    /// Note, this should be called before freezing the Builder instance
    /// in an Arc<>.
    pub fn set_default_config(&mut self) -> BurrowResult<()> {
        let Self {
            config,
            clock: _,
            discovery,
        } = self;

        discovery.default_config(config)?;

        Ok(())
    }

    /// Validate the config against the configured module factories.
    pub fn validate_config(&self) -> BurrowResult<()> {
        self.discovery.validate_config(&self.config)?;

        Ok(())
    }

    /// Freeze this builder so module factories can be invoked against it.
    pub fn build(self) -> Arc<Self> {
        Arc::new(self)
    }
}
