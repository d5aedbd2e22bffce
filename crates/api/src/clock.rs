//! Clock related types.

use crate::*;
use std::sync::Arc;

/// Supplies the current time.
///
/// Burrow modules never read the system time directly. Keeping the time
/// source an explicit capability on the [Builder](crate::Builder) lets
/// tests drive arbitrary timestamps deterministically.
pub trait Clock: 'static + Send + Sync + std::fmt::Debug {
    /// Get the current time.
    fn now(&self) -> Timestamp;
}

/// Trait-object [Clock].
pub type DynClock = Arc<dyn Clock>;
