#![deny(missing_docs)]
//! Burrow circumvention tunnel discovery core.

use burrow_api::*;

/// A default [burrow_api::clock::Clock] backed by the system time source.
#[derive(Debug)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// Construct a production-ready default builder.
///
/// - `clock` - The default clock is [SystemClock].
/// - `discovery` - The default discovery module is
///   [factories::RingDiscoveryFactory].
pub fn default_builder() -> Builder {
    Builder {
        config: Config::default(),
        clock: std::sync::Arc::new(SystemClock),
        discovery: factories::RingDiscoveryFactory::create(),
    }
}

pub mod factories;
