//! Core partitioner trait definitions.

use std::fmt;

use crate::ring::Position;

/// Plain hash function signature accepted by the ring builder.
pub type HashFn = fn(&[u8]) -> u32;

/// A partitioner converts byte strings into positions on the hash ring.
///
/// Partitioners are stateless and thread-safe, allowing concurrent
/// lookups without synchronization overhead. Implementations must be pure:
/// the same input always yields the same position.
pub trait Partitioner: Send + Sync + 'static {
    /// Converts a key (or virtual node name) into a ring position.
    fn partition(&self, key: &[u8]) -> Position;

    /// Returns the name of this partitioner.
    fn name(&self) -> &'static str;
}

/// Adapts any `Fn(&[u8]) -> u32` into a [`Partitioner`].
pub struct FnPartitioner<F> {
    hash: F,
    name: &'static str,
}

impl<F> FnPartitioner<F>
where
    F: Fn(&[u8]) -> u32 + Send + Sync + 'static,
{
    pub fn new(hash: F) -> Self {
        Self::named("custom", hash)
    }

    pub fn named(name: &'static str, hash: F) -> Self {
        Self { hash, name }
    }
}

impl<F> Partitioner for FnPartitioner<F>
where
    F: Fn(&[u8]) -> u32 + Send + Sync + 'static,
{
    #[inline]
    fn partition(&self, key: &[u8]) -> Position {
        Position((self.hash)(key))
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

impl<F> fmt::Debug for FnPartitioner<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnPartitioner").field("name", &self.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fn_partitioner() {
        let p = FnPartitioner::new(|key: &[u8]| key.len() as u32);
        assert_eq!(p.partition(b"abcd"), Position(4));
        assert_eq!(p.name(), "custom");

        let first_byte: HashFn = |key| key.first().copied().unwrap_or(0) as u32;
        let p = FnPartitioner::named("first-byte", first_byte);
        assert_eq!(p.partition(b"a"), Position(97));
        assert_eq!(p.name(), "first-byte");
    }
}
