//! Partitioner abstraction for consistent hashing.
//!
//! Partitioners are responsible for converting byte strings into positions
//! on the 32-bit hash ring. The same partitioner places virtual nodes and
//! resolves keys, and is fixed for the lifetime of a ring.

pub mod crc32;
pub mod sip;
pub mod traits;
pub mod xxhash;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Error;

pub use crc32::Crc32Partitioner;
pub use sip::SipPartitioner;
pub use traits::{FnPartitioner, HashFn, Partitioner};
pub use xxhash::{Xxh32Partitioner, Xxh3Partitioner};

/// Built-in hash algorithms, selectable by name from configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// CRC-32 (IEEE). Stable across runs and platforms; the ring default.
    #[default]
    Crc32,
    /// xxHash32 with seed 0.
    Xxh32,
    /// XXH3 64-bit folded to 32 bits.
    Xxh3,
    /// SipHash-1-3 with zero keys, folded to 32 bits.
    Sip13,
}

impl HashAlgorithm {
    pub const ALL: [HashAlgorithm; 4] = [
        HashAlgorithm::Crc32,
        HashAlgorithm::Xxh32,
        HashAlgorithm::Xxh3,
        HashAlgorithm::Sip13,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Crc32 => "crc32",
            HashAlgorithm::Xxh32 => "xxh32",
            HashAlgorithm::Xxh3 => "xxh3",
            HashAlgorithm::Sip13 => "sip13",
        }
    }

    /// Instantiate the partitioner for this algorithm.
    pub fn partitioner(&self) -> Arc<dyn Partitioner> {
        match self {
            HashAlgorithm::Crc32 => Arc::new(Crc32Partitioner),
            HashAlgorithm::Xxh32 => Arc::new(Xxh32Partitioner::default()),
            HashAlgorithm::Xxh3 => Arc::new(Xxh3Partitioner),
            HashAlgorithm::Sip13 => Arc::new(SipPartitioner::default()),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        HashAlgorithm::ALL
            .into_iter()
            .find(|alg| alg.as_str() == wanted)
            .ok_or_else(|| Error::UnknownHashAlgorithm(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_algorithm_names() {
        for alg in HashAlgorithm::ALL {
            assert_eq!(alg.as_str().parse::<HashAlgorithm>().unwrap(), alg);
        }
        assert_eq!("CRC32".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Crc32);
        assert_eq!(
            "md5".parse::<HashAlgorithm>(),
            Err(Error::UnknownHashAlgorithm("md5".to_string()))
        );
    }

    #[test]
    fn test_default_is_crc32() {
        assert_eq!(HashAlgorithm::default(), HashAlgorithm::Crc32);
        assert_eq!(HashAlgorithm::default().partitioner().name(), "crc32");
    }

    #[test]
    fn test_partitioners_are_stable() {
        for alg in HashAlgorithm::ALL {
            let p = alg.partitioner();
            assert_eq!(p.partition(b"machine1__0"), p.partition(b"machine1__0"));
            assert_eq!(p.name(), alg.as_str());
        }
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&HashAlgorithm::Xxh3).unwrap();
        assert_eq!(json, "\"xxh3\"");
        let alg: HashAlgorithm = serde_json::from_str("\"sip13\"").unwrap();
        assert_eq!(alg, HashAlgorithm::Sip13);
    }
}
