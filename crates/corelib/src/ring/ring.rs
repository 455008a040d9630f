//! Hash ring data structure.
//!
//! # Layout
//!
//! All ring state lives behind a single `RwLock`:
//!
//! - `vnodes`: `BTreeMap<(Position, sequence), VirtualNode>`, the sorted
//!   keyspace. The insertion sequence breaks position ties, so colliding
//!   virtual nodes are kept and ordered by arrival.
//! - `vnode_index`: virtual node name -> slot in `vnodes`.
//! - `members`: member name -> shared member record.
//!
//! # Concurrency
//!
//! `add`/`remove` take the write lock, so a member's virtual nodes appear
//! and disappear all at once. `lookup` and snapshots take the read lock; the
//! per-member hit counter is atomic, so concurrent lookups under the shared
//! lock never lose increments.
//!
//! # Performance
//!
//! - **Lookup**: O(log n) successor search, n = total virtual nodes
//! - **Add/Remove**: O(w log n), w = virtual nodes of the member

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::member::{Member, MemberRecord};
use crate::partitioner::{FnPartitioner, HashAlgorithm, Partitioner};
use crate::ring::position::Position;
use crate::ring::ConsistentHash;
use crate::topology::{Topology, TopologyEntry};
use crate::vnode::{self, vnode_name, VirtualNode};

/// Key into the ordered keyspace: position first, insertion order second.
type Slot = (Position, u64);

#[derive(Default)]
struct RingState {
    vnodes: BTreeMap<Slot, Arc<VirtualNode>>,
    vnode_index: HashMap<String, Slot>,
    members: HashMap<String, Arc<MemberRecord>>,
    next_sequence: u64,
}

impl RingState {
    /// First virtual node at or after `position`, wrapping to the start.
    fn successor(&self, position: Position) -> Option<&Arc<VirtualNode>> {
        self.vnodes
            .range((position, 0)..)
            .next()
            .or_else(|| self.vnodes.iter().next())
            .map(|(_, vnode)| vnode)
    }
}

/// Consistent hash ring mapping string keys to weighted members.
///
/// # Example
///
/// ```rust
/// use corelib::{HashRing, Member};
///
/// let ring = HashRing::new();
/// ring.add(Member::new("machine1", "192.168.0.1:8080").with_weight(24));
/// ring.add(Member::new("machine2", "192.168.0.2:8080").with_weight(32));
///
/// let member = ring.lookup("my_test_key_0").unwrap();
/// assert!(member.name == "machine1" || member.name == "machine2");
/// assert_eq!(member.hits, 1);
/// ```
pub struct HashRing {
    state: RwLock<RingState>,
    partitioner: Arc<dyn Partitioner>,
}

impl HashRing {
    /// Creates an empty ring hashed with CRC-32.
    pub fn new() -> Self {
        RingBuilder::new().build()
    }

    pub fn builder() -> RingBuilder {
        RingBuilder::new()
    }

    /// Creates an empty ring hashed with `partitioner`.
    pub fn with_partitioner<P: Partitioner>(partitioner: P) -> Self {
        RingBuilder::new().partitioner(partitioner).build()
    }

    /// Adds `member` with `max(weight, 1)` virtual nodes.
    ///
    /// Returns `false` and leaves the ring untouched if a member with the same
    /// name is already registered; there is no overwrite.
    ///
    /// Virtual node names are hashed before the write lock is taken, so
    /// lookups only wait for the index inserts.
    ///
    /// # Panics
    ///
    /// The weight is a virtual node count and every virtual node is
    /// materialized. A weight whose vnodes cannot be allocated (such as
    /// `i64::MAX`) panics with a capacity overflow or aborts on allocation
    /// failure. A panic happens before the lock is taken and leaves the
    /// ring unchanged.
    pub fn add(&self, member: Member) -> bool {
        let placements = vnode::placements(&member, self.partitioner.as_ref());
        let record = Arc::new(MemberRecord::new(member));

        let mut guard = self.state.write();
        let state = &mut *guard;
        if state.members.contains_key(record.name()) {
            return false;
        }

        let vnodes = VirtualNode::for_member(&record, placements, state.next_sequence);
        state.next_sequence += vnodes.len() as u64;
        let count = vnodes.len();

        for vnode in vnodes {
            let slot = (vnode.position(), vnode.sequence());
            trace!(vnode = vnode.name(), position = %vnode.position(), "placing vnode");
            state.vnode_index.insert(vnode.name().to_string(), slot);
            state.vnodes.insert(slot, Arc::new(vnode));
        }
        state.members.insert(record.name().to_string(), Arc::clone(&record));

        debug!(
            member = record.name(),
            vnodes = count,
            total_vnodes = state.vnodes.len(),
            "added member to ring"
        );
        true
    }

    /// Removes the named member and every one of its virtual nodes.
    ///
    /// Returns `false` if no such member is registered.
    pub fn remove(&self, name: &str) -> bool {
        let mut guard = self.state.write();
        let state = &mut *guard;
        let Some(record) = state.members.remove(name) else {
            return false;
        };

        for index in 0..record.vnode_count() {
            if let Some(slot) = state.vnode_index.remove(&vnode_name(name, index)) {
                state.vnodes.remove(&slot);
            }
        }

        debug!(
            member = name,
            vnodes = record.vnode_count(),
            total_vnodes = state.vnodes.len(),
            "removed member from ring"
        );
        true
    }

    /// Resolves `key` to the member owning the first virtual node at or after
    /// `hash(key)`, wrapping around to the first virtual node of the ring.
    ///
    /// Counts one hit on the resolved member and returns a copy of it with the
    /// updated count.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyRing`] if no member is registered.
    pub fn lookup(&self, key: &str) -> Result<Member> {
        self.lookup_bytes(key.as_bytes())
    }

    /// Byte-key variant of [`lookup`](Self::lookup).
    pub fn lookup_bytes(&self, key: &[u8]) -> Result<Member> {
        let position = self.partitioner.partition(key);
        let state = self.state.read();
        let vnode = state.successor(position).ok_or(Error::EmptyRing)?;
        Ok(vnode.record().record_hit())
    }

    /// Like [`lookup`](Self::lookup) but leaves the hit counter alone.
    pub fn peek(&self, key: &str) -> Result<Member> {
        let position = self.partitioner.partition(key.as_bytes());
        let state = self.state.read();
        let vnode = state.successor(position).ok_or(Error::EmptyRing)?;
        Ok(vnode.member())
    }

    /// Position of `key` on the ring.
    #[inline]
    pub fn position_of(&self, key: &str) -> Position {
        self.partitioner.partition(key.as_bytes())
    }

    /// Snapshot copies of all registered members, in no particular order.
    pub fn get_members(&self) -> Vec<Member> {
        let state = self.state.read();
        state.members.values().map(|m| m.snapshot()).collect()
    }

    /// Snapshot copy of a single member.
    pub fn get_member(&self, name: &str) -> Option<Member> {
        self.state.read().members.get(name).map(|m| m.snapshot())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.state.read().members.contains_key(name)
    }

    pub fn member_count(&self) -> usize {
        self.state.read().members.len()
    }

    /// Total number of virtual nodes on the ring.
    pub fn vnode_count(&self) -> usize {
        self.state.read().vnodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().vnodes.is_empty()
    }

    /// Name of the configured partitioner.
    pub fn hash_name(&self) -> &'static str {
        self.partitioner.name()
    }

    /// Point-in-time copy of all virtual nodes in ring order.
    pub fn topology(&self) -> Topology {
        let state = self.state.read();
        let entries = state
            .vnodes
            .values()
            .map(|vnode| TopologyEntry {
                position: vnode.position(),
                vnode: vnode.name().to_string(),
                member: vnode.member_name().to_string(),
            })
            .collect();
        Topology::new(self.partitioner.name(), entries)
    }
}

impl Default for HashRing {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HashRing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("HashRing")
            .field("partitioner", &self.partitioner.name())
            .field("members", &state.members.len())
            .field("vnodes", &state.vnodes.len())
            .finish()
    }
}

impl ConsistentHash for HashRing {
    fn add(&self, member: Member) -> bool {
        HashRing::add(self, member)
    }

    fn remove(&self, name: &str) -> bool {
        HashRing::remove(self, name)
    }

    fn lookup(&self, key: &str) -> Result<Member> {
        HashRing::lookup(self, key)
    }

    fn members(&self) -> Vec<Member> {
        self.get_members()
    }
}

/// Builder for [`HashRing`].
///
/// The only option is the hash function; when several are given the last one
/// wins, and when none is given the ring uses CRC-32.
///
/// ```rust
/// use corelib::{HashAlgorithm, HashRing};
///
/// let ring = HashRing::builder().hash_algorithm(HashAlgorithm::Xxh3).build();
/// assert_eq!(ring.hash_name(), "xxh3");
///
/// let ring = HashRing::builder().hash_fn(|key| key.len() as u32).build();
/// assert_eq!(ring.hash_name(), "custom");
/// ```
#[derive(Default)]
pub struct RingBuilder {
    partitioner: Option<Arc<dyn Partitioner>>,
}

impl RingBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash virtual node names and keys with `hash`.
    pub fn hash_fn<F>(self, hash: F) -> Self
    where
        F: Fn(&[u8]) -> u32 + Send + Sync + 'static,
    {
        self.partitioner(FnPartitioner::new(hash))
    }

    pub fn partitioner<P: Partitioner>(mut self, partitioner: P) -> Self {
        self.partitioner = Some(Arc::new(partitioner));
        self
    }

    pub fn hash_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.partitioner = Some(algorithm.partitioner());
        self
    }

    pub fn build(self) -> HashRing {
        let partitioner = self
            .partitioner
            .unwrap_or_else(|| HashAlgorithm::default().partitioner());
        HashRing {
            state: RwLock::new(RingState::default()),
            partitioner,
        }
    }
}

impl fmt::Debug for RingBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingBuilder")
            .field("partitioner", &self.partitioner.as_ref().map(|p| p.name()))
            .finish()
    }
}
