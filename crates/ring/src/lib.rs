#![deny(missing_docs)]
//! A bounded-load consistent hash ring.
//!
//! Members are placed onto a 64-bit hash space via a configurable number
//! of virtual nodes, and the key space is divided into a fixed number of
//! partitions. Each partition is owned by the nearest member on the ring
//! whose load stays within a bounded deviation from the average, keeping
//! per-member load near-uniform. Keys resolve to the owner of the
//! partition they hash into.
//!
//! Despite being in the burrow repo, `burrow_ring` does not depend on any
//! burrow crates. This is to ensure the ring is well-defined,
//! self-contained, and easily testable in isolation.
//!
//! With `partition_count` equal to the member count, a `load` of exactly
//! `1.0`, and a `replication_factor` of `1`, construction assigns every
//! member exactly one partition. Callers that rely on every member being
//! reachable by some key must use that configuration; raising `load` or
//! the partition count trades that guarantee for smoother scaling of
//! per-member load.

use std::collections::BTreeMap;
use std::sync::Arc;

/// A non-cryptographic 64-bit hash over arbitrary byte strings.
///
/// The same hasher instance is used to place members, to place
/// partitions, and to look up keys, so all three share one hash space.
pub trait Hasher: 'static + Send + Sync + std::fmt::Debug {
    /// Hash the given bytes.
    fn sum64(&self, data: &[u8]) -> u64;
}

/// Trait-object [Hasher].
pub type DynHasher = Arc<dyn Hasher>;

/// A member that can be placed on the ring.
pub trait Member: 'static + Send + Sync {
    /// The stable identity bytes this member is placed by.
    /// Two members of the same ring must never share a key.
    fn ring_key(&self) -> &[u8];
}

/// Hash ring construction parameters.
#[derive(Debug, Clone)]
pub struct Config {
    /// The number of partitions the key space is divided into.
    /// Must be at least the member count for every member to be able to
    /// receive a partition.
    pub partition_count: usize,

    /// Virtual nodes placed on the ring per member.
    pub replication_factor: usize,

    /// The allowed deviation from the average partition load per member.
    /// `1.0` means no overload allowance beyond the natural ceiling.
    pub load: f64,

    /// The hash function members, partitions, and keys are placed with.
    pub hasher: DynHasher,
}

/// Errors produced by ring construction.
#[derive(Debug, thiserror::Error)]
pub enum RingError {
    /// Construction was attempted over an empty member set.
    #[error("cannot build a ring over an empty member set")]
    NoMembers,

    /// `partition_count` was zero.
    #[error("cannot build a ring with zero partitions")]
    NoPartitions,

    /// `replication_factor` was zero.
    #[error("cannot build a ring with zero virtual nodes per member")]
    NoReplication,

    /// The load bound left some partition without an assignable owner.
    #[error("not enough room to distribute partitions over {member_count} members")]
    InsufficientCapacity {
        /// The member count of the rejected configuration.
        member_count: usize,
    },
}

/// An immutable-once-built consistent hash ring.
///
/// Lookups take `&self` and the ring holds no interior mutability, so a
/// shared ring may be consulted from any number of threads concurrently.
/// Membership changes are expressed by building a new ring.
#[derive(Debug)]
pub struct HashRing<M: Member> {
    members: Vec<M>,
    hasher: DynHasher,
    /// partition id -> index into `members`.
    partitions: Vec<usize>,
}

impl<M: Member> HashRing<M> {
    /// Build a ring over the given members.
    ///
    /// Placement is deterministic and a pure function of the member
    /// identity set plus the config. The order members are supplied in
    /// does not affect which member a key resolves to.
    pub fn new(members: Vec<M>, config: Config) -> Result<Self, RingError> {
        if members.is_empty() {
            return Err(RingError::NoMembers);
        }
        if config.partition_count == 0 {
            return Err(RingError::NoPartitions);
        }
        if config.replication_factor == 0 {
            return Err(RingError::NoReplication);
        }

        // place the virtual nodes
        let mut ring = BTreeMap::new();
        for (idx, member) in members.iter().enumerate() {
            for replica in 0..config.replication_factor {
                let mut vnode_key = member.ring_key().to_vec();
                vnode_key.extend_from_slice(replica.to_string().as_bytes());
                ring.insert(config.hasher.sum64(&vnode_key), idx);
            }
        }

        let avg_load =
            average_load(config.partition_count, members.len(), config.load);

        // assign each partition to the nearest vnode at-or-after its
        // hash whose member still has capacity under the load bound
        let mut loads = vec![0_u64; members.len()];
        let mut partitions = Vec::with_capacity(config.partition_count);
        for partition in 0..config.partition_count {
            let hash =
                config.hasher.sum64(partition.to_string().as_bytes());
            let owner = ring
                .range(hash..)
                .chain(ring.range(..hash))
                .map(|(_, idx)| *idx)
                .find(|idx| loads[*idx] + 1 <= avg_load)
                .ok_or(RingError::InsufficientCapacity {
                    member_count: members.len(),
                })?;
            loads[owner] += 1;
            partitions.push(owner);
        }

        Ok(Self {
            members,
            hasher: config.hasher,
            partitions,
        })
    }

    /// Map a key to the member owning the partition the key hashes into.
    ///
    /// The same key against the same ring always resolves to the same
    /// member.
    pub fn locate_key(&self, key: &[u8]) -> Option<&M> {
        let partition =
            (self.hasher.sum64(key) % self.partitions.len() as u64) as usize;
        self.partition_owner(partition)
    }

    /// The member owning the given partition.
    pub fn partition_owner(&self, partition: usize) -> Option<&M> {
        self.partitions.get(partition).map(|idx| &self.members[*idx])
    }

    /// The members this ring was built over.
    pub fn members(&self) -> &[M] {
        &self.members
    }

    /// The number of partitions the key space is divided into.
    pub fn partition_count(&self) -> usize {
        self.partitions.len()
    }
}

/// The maximum number of partitions any single member may own.
fn average_load(partition_count: usize, member_count: usize, load: f64) -> u64 {
    ((partition_count as f64 / member_count as f64) * load).ceil() as u64
}
