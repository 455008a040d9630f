//! Ring topology views.
//!
//! A [`Topology`] is a point-in-time copy of the ring's virtual nodes in ring
//! order. It is detached from the ring: later membership changes do not
//! affect it. Ownership is computed from the arcs between consecutive
//! positions: a virtual node at position `p` owns every key hash in
//! `(previous position, p]`, and the first virtual node also owns the wrap
//! around past the last one.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::ring::{Position, RING_SIZE};

/// One virtual node in a topology snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopologyEntry {
    pub position: Position,
    pub vnode: String,
    pub member: String,
}

/// Snapshot of the ring in ascending position order.
#[derive(Debug, Clone, Serialize)]
pub struct Topology {
    partitioner: &'static str,
    entries: Vec<TopologyEntry>,
}

impl Topology {
    /// `entries` must already be in ring order.
    pub(crate) fn new(partitioner: &'static str, entries: Vec<TopologyEntry>) -> Self {
        debug_assert!(entries.windows(2).all(|w| w[0].position <= w[1].position));
        Self {
            partitioner,
            entries,
        }
    }

    /// Name of the partitioner that placed these virtual nodes.
    pub fn partitioner(&self) -> &'static str {
        self.partitioner
    }

    pub fn entries(&self) -> &[TopologyEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Virtual nodes belonging to `member`, in ring order.
    pub fn vnodes_of<'a>(&'a self, member: &'a str) -> impl Iterator<Item = &'a TopologyEntry> {
        self.entries.iter().filter(move |e| e.member == member)
    }

    /// Number of virtual nodes per member.
    pub fn vnode_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for entry in &self.entries {
            *counts.entry(entry.member.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Number of key hashes each member is responsible for.
    ///
    /// The values always sum to `2^32` on a non-empty ring. Virtual nodes that
    /// share a position with an earlier one own nothing.
    pub fn owned_hashes(&self) -> BTreeMap<String, u64> {
        let mut owned: BTreeMap<String, u64> = BTreeMap::new();
        let Some(last) = self.entries.last() else {
            return owned;
        };

        let mut previous = last.position.value() as u64;
        for (i, entry) in self.entries.iter().enumerate() {
            let current = entry.position.value() as u64;
            let span = if i == 0 {
                // wraps past the end of the ring
                RING_SIZE - previous + current
            } else {
                current - previous
            };
            *owned.entry(entry.member.clone()).or_insert(0) += span;
            previous = current;
        }
        owned
    }

    /// Fraction of the keyspace each member is responsible for.
    pub fn ownership(&self) -> BTreeMap<String, f64> {
        self.owned_hashes()
            .into_iter()
            .map(|(member, count)| (member, count as f64 / RING_SIZE as f64))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(position: u32, vnode: &str, member: &str) -> TopologyEntry {
        TopologyEntry {
            position: Position(position),
            vnode: vnode.to_string(),
            member: member.to_string(),
        }
    }

    #[test]
    fn test_empty_topology() {
        let topology = Topology::new("crc32", Vec::new());
        assert!(topology.is_empty());
        assert!(topology.owned_hashes().is_empty());
        assert!(topology.ownership().is_empty());
    }

    #[test]
    fn test_single_vnode_owns_everything() {
        let topology = Topology::new("crc32", vec![entry(12345, "a__0", "a")]);
        assert_eq!(topology.owned_hashes()["a"], RING_SIZE);
        assert_eq!(topology.ownership()["a"], 1.0);
    }

    #[test]
    fn test_ownership_wraps() {
        let half = 1u32 << 31;
        let topology = Topology::new(
            "crc32",
            vec![
                entry(0, "a__0", "a"),
                entry(half, "b__0", "b"),
                entry(half + (half / 2), "a__1", "a"),
            ],
        );
        let owned = topology.owned_hashes();
        // b owns (0, half]; a owns the rest, including the wrap to 0.
        assert_eq!(owned["b"], half as u64);
        assert_eq!(owned["a"], RING_SIZE - half as u64);
        assert_eq!(owned.values().sum::<u64>(), RING_SIZE);

        assert_eq!(topology.vnode_counts()["a"], 2);
        let a_vnodes: Vec<&str> = topology.vnodes_of("a").map(|e| e.vnode.as_str()).collect();
        assert_eq!(a_vnodes, ["a__0", "a__1"]);
    }

    #[test]
    fn test_colliding_position_owns_nothing() {
        let topology = Topology::new(
            "custom",
            vec![entry(10, "a__0", "a"), entry(10, "b__0", "b")],
        );
        let owned = topology.owned_hashes();
        assert_eq!(owned["a"], RING_SIZE);
        assert_eq!(owned["b"], 0);
    }
}
