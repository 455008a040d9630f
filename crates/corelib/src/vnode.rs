//! Virtual node abstractions.
//!
//! # Virtual Nodes (VNodes) Concept
//!
//! Instead of each member having a single position on the ring, a member of
//! weight `w` is placed at `w` positions, one per virtual node. This provides:
//!
//! 1. **Weighted Load Distribution**: a member's share of the keyspace grows
//!    with its weight
//! 2. **Smoother Distribution**: more points per member = more even shares
//! 3. **Gradual Rebalancing**: when a member joins or leaves, only the keys on
//!    its own virtual nodes move
//!
//! # Naming
//!
//! Virtual node `i` of member `m` is named `m__i`; its position is the hash of
//! that name. The scheme is deterministic, so the same member names and
//! weights always produce the same ring under the same hash function.

use std::fmt;
use std::sync::Arc;

use crate::member::{Member, MemberRecord};
use crate::partitioner::Partitioner;
use crate::ring::Position;

/// Separator between member name and index in a virtual node name.
pub const VNODE_SEPARATOR: &str = "__";

/// Derive the name of virtual node `index` of `member`.
///
/// ```
/// assert_eq!(corelib::vnode::vnode_name("machine1", 3), "machine1__3");
/// ```
#[inline]
pub fn vnode_name(member: &str, index: usize) -> String {
    format!("{member}{VNODE_SEPARATOR}{index}")
}

/// Name and position of every virtual node of `member`.
///
/// Pure hashing with no ring state involved, so the ring runs it before
/// taking its write lock.
pub(crate) fn placements(
    member: &Member,
    partitioner: &dyn Partitioner,
) -> Vec<(String, Position)> {
    (0..member.vnode_count())
        .map(|index| {
            let name = vnode_name(&member.name, index);
            let position = partitioner.partition(name.as_bytes());
            (name, position)
        })
        .collect()
}

/// A virtual node on the hash ring.
///
/// # Invariants
///
/// - Every `VirtualNode` belongs to exactly one member and shares that
///   member's record (and hit counter) with its siblings
/// - Positions may collide, across members too; the ring orders ties by
///   insertion sequence
#[derive(Clone)]
pub struct VirtualNode {
    name: String,
    position: Position,
    /// Insertion order, used to break position ties.
    sequence: u64,
    member: Arc<MemberRecord>,
}

impl VirtualNode {
    pub(crate) fn new(
        name: String,
        position: Position,
        sequence: u64,
        member: Arc<MemberRecord>,
    ) -> Self {
        Self {
            name,
            position,
            sequence,
            member,
        }
    }

    /// Build all virtual nodes for `record` from precomputed `placements`.
    /// Sequences are assigned from `first_sequence` upward.
    pub(crate) fn for_member(
        record: &Arc<MemberRecord>,
        placements: Vec<(String, Position)>,
        first_sequence: u64,
    ) -> Vec<VirtualNode> {
        placements
            .into_iter()
            .zip(first_sequence..)
            .map(|((name, position), sequence)| {
                VirtualNode::new(name, position, sequence, Arc::clone(record))
            })
            .collect()
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }

    #[inline]
    pub(crate) fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Name of the owning member.
    #[inline]
    pub fn member_name(&self) -> &str {
        self.member.name()
    }

    /// Copy of the owning member's current state.
    pub fn member(&self) -> Member {
        self.member.snapshot()
    }

    #[inline]
    pub(crate) fn record(&self) -> &Arc<MemberRecord> {
        &self.member
    }

    /// Clockwise distance to another virtual node.
    #[inline]
    pub fn distance_to(&self, other: &Self) -> u32 {
        self.position.distance_to(&other.position)
    }
}

impl fmt::Debug for VirtualNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VirtualNode")
            .field("name", &self.name)
            .field("position", &self.position)
            .field("member", &self.member.name())
            .finish()
    }
}

impl fmt::Display for VirtualNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VNode(position={}, name={})", self.position, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partitioner::{Crc32Partitioner, FnPartitioner};

    fn record(name: &str, weight: i64) -> Arc<MemberRecord> {
        Arc::new(MemberRecord::new(Member::new(name, "addr").with_weight(weight)))
    }

    fn build(
        record: &Arc<MemberRecord>,
        partitioner: &dyn Partitioner,
        first: u64,
    ) -> Vec<VirtualNode> {
        let placed = placements(&record.snapshot(), partitioner);
        VirtualNode::for_member(record, placed, first)
    }

    #[test]
    fn test_vnode_names() {
        assert_eq!(vnode_name("m", 0), "m__0");
        assert_eq!(vnode_name("machine__1", 12), "machine__1__12");
    }

    #[test]
    fn test_for_member_uses_weight() {
        let vnodes = build(&record("node1", 4), &Crc32Partitioner, 10);
        assert_eq!(vnodes.len(), 4);

        let names: Vec<&str> = vnodes.iter().map(|v| v.name()).collect();
        assert_eq!(names, ["node1__0", "node1__1", "node1__2", "node1__3"]);

        let sequences: Vec<u64> = vnodes.iter().map(|v| v.sequence()).collect();
        assert_eq!(sequences, [10, 11, 12, 13]);

        for vnode in &vnodes {
            assert_eq!(vnode.member_name(), "node1");
            assert_eq!(
                vnode.position(),
                Crc32Partitioner.partition(vnode.name().as_bytes())
            );
        }
    }

    #[test]
    fn test_for_member_normalizes_weight() {
        let vnodes = build(&record("abc", -5), &Crc32Partitioner, 0);
        assert_eq!(vnodes.len(), 1);
        assert_eq!(vnodes[0].name(), "abc__0");
        assert_eq!(vnodes[0].member().weight, -5);
    }

    #[test]
    fn test_placements_need_no_ring() {
        let member = Member::new("m", "").with_weight(3);
        let placed = placements(&member, &FnPartitioner::new(|key: &[u8]| key.len() as u32));
        assert_eq!(
            placed,
            [
                ("m__0".to_string(), Position(4)),
                ("m__1".to_string(), Position(4)),
                ("m__2".to_string(), Position(4)),
            ]
        );

        let vnodes = VirtualNode::for_member(&Arc::new(MemberRecord::new(member)), placed, 7);
        let slots: Vec<(Position, u64)> =
            vnodes.iter().map(|v| (v.position(), v.sequence())).collect();
        assert_eq!(slots, [(Position(4), 7), (Position(4), 8), (Position(4), 9)]);
    }

    #[test]
    fn test_vnodes_share_member_record() {
        let rec = record("shared", 3);
        let vnodes = build(&rec, &Crc32Partitioner, 0);

        vnodes[0].record().record_hit();
        vnodes[2].record().record_hit();

        for vnode in &vnodes {
            assert_eq!(vnode.member().hits, 2);
        }
    }

    #[test]
    fn test_vnode_distance() {
        let p = FnPartitioner::new(|key: &[u8]| if key.ends_with(b"0") { 100 } else { 200 });
        let vnodes = build(&record("n", 2), &p, 0);
        assert_eq!(vnodes[0].distance_to(&vnodes[1]), 100);
        assert_eq!(vnodes[1].distance_to(&vnodes[0]), u32::MAX - 99);
    }
}
