//! Consistent hash ring implementation.
//!
//! The ring manages virtual node positions and provides efficient successor
//! lookup for finding the member responsible for a key.

pub mod position;
pub mod ring;

use crate::error::Result;
use crate::member::Member;

pub use position::{Position, RING_SIZE};
pub use ring::{HashRing, RingBuilder};

/// Alias for the main ring type (used by lib.rs).
pub type Ring = HashRing;

/// Public contract of a consistent hash ring.
///
/// All methods take `&self`: implementations synchronize internally and are
/// shared between threads behind an `Arc`.
pub trait ConsistentHash: Send + Sync {
    /// Adds a member with as many virtual nodes as its (normalized) weight.
    ///
    /// Returns `false` without touching the ring if the name is taken.
    fn add(&self, member: Member) -> bool;

    /// Removes the named member and all of its virtual nodes.
    ///
    /// Returns `false` if no such member exists.
    fn remove(&self, name: &str) -> bool;

    /// Resolves `key` to its member and counts the hit.
    fn lookup(&self, key: &str) -> Result<Member>;

    /// Snapshot of every registered member, in no particular order.
    fn members(&self) -> Vec<Member>;
}
