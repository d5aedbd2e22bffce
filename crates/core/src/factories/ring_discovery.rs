//! The consistent-hashing discovery implementation provided by Burrow.

use burrow_api::*;
use burrow_ring::HashRing;
use std::sync::{Arc, RwLock};

/// Virtual nodes per ring member. Discovery wants a single deterministic
/// owner per client key, not failover replicas, so the minimum suffices.
const REPLICATION_FACTOR: usize = 1;

/// Per-member load bound. Exactly 1.0, together with a partition count
/// equal to the member count, makes ring construction assign every member
/// at least one partition, so no server can become unreachable.
const LOAD: f64 = 1.0;

/// The consistent-hashing discovery implementation provided by Burrow.
///
/// The current membership is placed on a bounded-load hash ring and each
/// client key deterministically resolves to at most one server. Discovery
/// windows are checked live at lookup time, so a server can age in or out
/// of discoverability without a rebuild; rebuilds happen only on
/// membership change.
#[derive(Debug)]
pub struct RingDiscoveryFactory {}

impl RingDiscoveryFactory {
    /// Construct a new RingDiscoveryFactory.
    pub fn create() -> DynDiscoveryFactory {
        let out: DynDiscoveryFactory = Arc::new(RingDiscoveryFactory {});
        out
    }
}

impl DiscoveryFactory for RingDiscoveryFactory {
    fn default_config(&self, _config: &mut Config) -> BurrowResult<()> {
        // no tunables. the partition count is derived from membership and
        // the remaining ring parameters are fixed by the reachability
        // guarantee above.
        Ok(())
    }

    fn validate_config(&self, _config: &Config) -> BurrowResult<()> {
        Ok(())
    }

    fn create(
        &self,
        builder: Arc<Builder>,
    ) -> BoxFut<'static, BurrowResult<DynDiscovery>> {
        Box::pin(async move {
            let out: DynDiscovery =
                Arc::new(RingDiscovery::new(builder.clock.clone()));
            Ok(out)
        })
    }
}

/// burrow_ring::Hasher implementation.
#[derive(Debug)]
struct Xxh64Hasher;

impl burrow_ring::Hasher for Xxh64Hasher {
    fn sum64(&self, data: &[u8]) -> u64 {
        xxhash_rust::xxh64::xxh64(data, 0)
    }
}

/// Ring member newtype carrying the full server record, so a resolved
/// member is already the record to hand out.
#[derive(Debug, Clone)]
struct ServerMember(Arc<DiscoveryServer>);

impl burrow_ring::Member for ServerMember {
    fn ring_key(&self) -> &[u8] {
        &self.0.server
    }
}

struct RingDiscovery {
    clock: DynClock,
    ring: RwLock<Option<HashRing<ServerMember>>>,
}

impl std::fmt::Debug for RingDiscovery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RingDiscovery").finish()
    }
}

impl RingDiscovery {
    pub fn new(clock: DynClock) -> Self {
        Self {
            clock,
            ring: RwLock::new(None),
        }
    }
}

impl Discovery for RingDiscovery {
    fn servers_changed(&self, servers: Vec<Arc<DiscoveryServer>>) {
        if servers.is_empty() {
            *self.ring.write().unwrap() = None;
            return;
        }

        let members: Vec<ServerMember> =
            servers.into_iter().map(ServerMember).collect();
        let member_count = members.len();

        // The partition count cannot change on a live ring, and it must
        // track the member count for every server to stay reachable, so
        // a membership change rebuilds the ring from scratch.
        let config = burrow_ring::Config {
            partition_count: member_count,
            replication_factor: REPLICATION_FACTOR,
            load: LOAD,
            hasher: Arc::new(Xxh64Hasher),
        };

        // construction happens under the write lock so concurrent
        // membership changes serialize and readers never observe a
        // half-built ring
        let mut lock = self.ring.write().unwrap();
        *lock = match HashRing::new(members, config) {
            Ok(ring) => Some(ring),
            Err(err) => {
                // unreachable with the constants above. an internal bug
                // must degrade to unavailability, not fail the caller.
                tracing::error!(?err, "failed to rebuild discovery ring");
                None
            }
        };
        drop(lock);

        tracing::debug!(member_count, "discovery ring rebuilt");
    }

    fn select_servers(&self, client_key: &[u8]) -> Vec<Arc<DiscoveryServer>> {
        let lock = self.ring.read().unwrap();

        let ring = match lock.as_ref() {
            // No discoverable servers.
            None => return Vec::new(),
            Some(ring) => ring,
        };

        let member = match ring.locate_key(client_key) {
            Some(member) => member,
            None => {
                // construction assigns every partition an owner
                tracing::warn!("discovery ring reported no owner for key");
                return Vec::new();
            }
        };

        let server = member.0.clone();

        // the clock is read while the read guard is still held, keeping
        // the eligibility check consistent with the snapshot the key
        // resolved against
        let now = self.clock.now();

        // Double check that the server is discoverable at this time.
        if !server.discoverable_at(now) {
            return Vec::new();
        }

        vec![server]
    }
}
