//! SipHash partitioner implementation.

use std::hash::Hasher;

use siphasher::sip::SipHasher13;

use crate::partitioner::traits::Partitioner;
use crate::ring::Position;

/// SipHash-1-3 partitioner with fixed keys; the 64-bit digest is folded to
/// 32 bits.
#[derive(Clone, Copy, Debug, Default)]
pub struct SipPartitioner {
    key0: u64,
    key1: u64,
}

impl SipPartitioner {
    pub fn with_keys(key0: u64, key1: u64) -> Self {
        Self { key0, key1 }
    }
}

impl Partitioner for SipPartitioner {
    #[inline]
    fn partition(&self, key: &[u8]) -> Position {
        let mut hasher = SipHasher13::new_with_keys(self.key0, self.key1);
        hasher.write(key);
        Position::fold(hasher.finish())
    }

    fn name(&self) -> &'static str {
        "sip13"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_change_output() {
        let a = SipPartitioner::default().partition(b"machine1__0");
        let b = SipPartitioner::with_keys(1, 2).partition(b"machine1__0");
        assert_ne!(a, b);
        assert_eq!(a, SipPartitioner::default().partition(b"machine1__0"));
    }
}
