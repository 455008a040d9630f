//! Ring position implementation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Size of the keyspace: positions live in `[0, 2^32)` and wrap back to 0.
pub const RING_SIZE: u64 = 1 << 32;

/// A position on the consistent hash ring.
///
/// Positions are plain 32-bit hash values, ordered numerically. Both
/// virtual nodes and lookup keys are mapped onto the same space.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize)]
pub struct Position(pub u32);

impl Position {
    /// Start of the ring.
    pub const MIN: Position = Position(u32::MIN);
    /// End of the ring; the successor of `MAX` is `MIN`.
    pub const MAX: Position = Position(u32::MAX);

    /// Folds a 64-bit digest into a position by xoring its halves.
    #[inline]
    pub fn fold(hash: u64) -> Self {
        Position((hash ^ (hash >> 32)) as u32)
    }

    #[inline]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Clockwise distance from `self` to `other` on the ring.
    #[inline]
    pub fn distance_to(&self, other: &Self) -> u32 {
        other.0.wrapping_sub(self.0)
    }
}

impl From<u32> for Position {
    fn from(value: u32) -> Self {
        Position(value)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_clockwise() {
        assert_eq!(Position(100).distance_to(&Position(200)), 100);
        assert_eq!(Position(200).distance_to(&Position(100)), u32::MAX - 99);
        assert_eq!(Position::MAX.distance_to(&Position::MIN), 1);
        assert_eq!(Position(7).distance_to(&Position(7)), 0);
    }

    #[test]
    fn test_ordering_and_display() {
        assert!(Position(1) < Position(2));
        assert!(Position::MIN < Position::MAX);
        assert_eq!(Position(0xab).to_string(), "000000ab");
    }

    #[test]
    fn test_fold() {
        assert_eq!(Position::fold(0x0000_0001_0000_0001), Position(0));
        assert_eq!(Position::fold(0xffff_ffff), Position(0xffff_ffff));
    }
}
