//! CRC-32 (IEEE) partitioner implementation.

use crate::partitioner::traits::Partitioner;
use crate::ring::Position;

/// CRC-32 partitioner using the IEEE polynomial.
///
/// Output matches the well-known `crc32` checksum, so virtual node placement
/// is reproducible across runs, processes and languages.
#[derive(Clone, Copy, Debug, Default)]
pub struct Crc32Partitioner;

impl Partitioner for Crc32Partitioner {
    #[inline]
    fn partition(&self, key: &[u8]) -> Position {
        Position(crc32fast::hash(key))
    }

    fn name(&self) -> &'static str {
        "crc32"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc32_check_value() {
        assert_eq!(Crc32Partitioner.partition(b"123456789"), Position(0xCBF4_3926));
        assert_eq!(Crc32Partitioner.partition(b""), Position(0));
    }
}
