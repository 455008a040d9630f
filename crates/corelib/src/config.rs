//! Serializable ring configuration.
//!
//! A [`RingConfig`] names the hash algorithm and an initial member set, so a
//! ring can be described in a JSON file:
//!
//! ```json
//! {
//!   "hash": "crc32",
//!   "members": [
//!     { "name": "machine1", "address": "192.168.0.1:8080", "weight": 24 },
//!     { "name": "machine2", "address": "192.168.0.2:8080", "weight": 32 }
//!   ]
//! }
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::member::Member;
use crate::partitioner::HashAlgorithm;
use crate::ring::HashRing;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RingConfig {
    #[serde(default)]
    pub hash: HashAlgorithm,
    #[serde(default)]
    pub members: Vec<Member>,
}

impl RingConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::InvalidConfig(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::InvalidConfig(e.to_string()))
    }

    /// Checks that member names are present and unique.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for member in &self.members {
            if member.name.is_empty() {
                return Err(Error::InvalidConfig("member with empty name".to_string()));
            }
            if !seen.insert(member.name.as_str()) {
                return Err(Error::InvalidConfig(format!(
                    "duplicate member {:?}",
                    member.name
                )));
            }
        }
        Ok(())
    }

    /// Builds a ring with the configured hash and adds every member.
    pub fn build(&self) -> Result<HashRing> {
        self.validate()?;
        let ring = HashRing::builder().hash_algorithm(self.hash).build();
        for member in &self.members {
            ring.add(member.clone());
        }
        Ok(ring)
    }
}
