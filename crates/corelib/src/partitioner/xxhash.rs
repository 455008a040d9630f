//! xxHash partitioner implementations.

use xxhash_rust::xxh3::xxh3_64;
use xxhash_rust::xxh32::xxh32;

use crate::partitioner::traits::Partitioner;
use crate::ring::Position;

/// xxHash32 partitioner.
#[derive(Clone, Copy, Debug, Default)]
pub struct Xxh32Partitioner {
    seed: u32,
}

impl Xxh32Partitioner {
    pub fn with_seed(seed: u32) -> Self {
        Self { seed }
    }
}

impl Partitioner for Xxh32Partitioner {
    #[inline]
    fn partition(&self, key: &[u8]) -> Position {
        Position(xxh32(key, self.seed))
    }

    fn name(&self) -> &'static str {
        "xxh32"
    }
}

/// XXH3 partitioner; the 64-bit digest is folded to 32 bits.
#[derive(Clone, Copy, Debug, Default)]
pub struct Xxh3Partitioner;

impl Partitioner for Xxh3Partitioner {
    #[inline]
    fn partition(&self, key: &[u8]) -> Position {
        Position::fold(xxh3_64(key))
    }

    fn name(&self) -> &'static str {
        "xxh3"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xxh32_seed_changes_output() {
        let a = Xxh32Partitioner::default().partition(b"key");
        let b = Xxh32Partitioner::with_seed(7).partition(b"key");
        assert_ne!(a, b);
    }

    #[test]
    fn test_xxh3_fold() {
        let full = xxh3_64(b"key");
        assert_eq!(
            Xxh3Partitioner.partition(b"key"),
            Position((full ^ (full >> 32)) as u32)
        );
    }
}
