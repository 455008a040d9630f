//! Member abstractions for the consistent hash ring.
//!
//! A [`Member`] is a physical participant (a backend, a shard owner, a cache
//! server). Callers hand the ring plain `Member` values and always get plain
//! copies back; the ring keeps its own shared `MemberRecord` so that every
//! virtual node of a member points at the same hit counter.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Physical participant on the ring.
///
/// Cheap to clone; every value returned by the ring is an independent copy
/// that does not track later state changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// Unique name, also the prefix of every virtual node name.
    pub name: String,
    /// Opaque network locator, e.g. `":8080"` or `"https://server.com"`.
    #[serde(default)]
    pub address: String,
    /// Requested number of virtual nodes. Values below 1 are placed as 1 but
    /// reported as given.
    ///
    /// Every virtual node is allocated and hashed on add, so the weight must
    /// stay within memory: a weight like `i64::MAX` makes
    /// [`HashRing::add`](crate::HashRing::add) panic.
    #[serde(default = "default_weight")]
    pub weight: i64,
    /// Lookups resolved to this member since it joined the ring.
    #[serde(default)]
    pub hits: u64,
    /// Extra configuration, passed through unmodified.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub config: BTreeMap<String, serde_json::Value>,
}

fn default_weight() -> i64 {
    1
}

impl Member {
    /// Construct a member with weight 1 and no extra configuration.
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            weight: default_weight(),
            hits: 0,
            config: BTreeMap::new(),
        }
    }

    pub fn with_weight(mut self, weight: i64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_config(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.config.insert(key.into(), value);
        self
    }

    /// Number of virtual nodes this member occupies on the ring.
    ///
    /// Non-positive weights are normalized to 1.
    #[inline]
    pub fn vnode_count(&self) -> usize {
        usize::try_from(self.weight).unwrap_or(0).max(1)
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, weight={})", self.name, self.address, self.weight)
    }
}

/// Parses `name[,address[,weight]]`.
///
/// ```
/// use corelib::Member;
///
/// let m: Member = "machine1,192.168.0.1:8080,24".parse().unwrap();
/// assert_eq!(m.name, "machine1");
/// assert_eq!(m.address, "192.168.0.1:8080");
/// assert_eq!(m.weight, 24);
/// ```
impl FromStr for Member {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ',').map(str::trim);
        let name = match parts.next() {
            Some(name) if !name.is_empty() => name,
            _ => return Err(Error::InvalidMember(format!("missing name in {s:?}"))),
        };
        let address = parts.next().unwrap_or_default();
        let weight = match parts.next() {
            Some(w) => w
                .parse::<i64>()
                .map_err(|e| Error::InvalidMember(format!("bad weight {w:?}: {e}")))?,
            None => default_weight(),
        };
        Ok(Member::new(name, address).with_weight(weight))
    }
}

/// The ring's live record of a member.
///
/// Shared (via `Arc`) by every virtual node of the member. The descriptive
/// fields never change after registration; only the hit counter moves.
#[derive(Debug)]
pub(crate) struct MemberRecord {
    member: Member,
    hits: AtomicU64,
}

impl MemberRecord {
    pub(crate) fn new(member: Member) -> Self {
        let hits = AtomicU64::new(member.hits);
        Self { member, hits }
    }

    #[inline]
    pub(crate) fn name(&self) -> &str {
        &self.member.name
    }

    #[inline]
    pub(crate) fn vnode_count(&self) -> usize {
        self.member.vnode_count()
    }

    /// Copy of the member with the current hit count.
    pub(crate) fn snapshot(&self) -> Member {
        Member {
            hits: self.hits.load(Ordering::Relaxed),
            ..self.member.clone()
        }
    }

    /// Count one resolved lookup and return the member as of that hit.
    pub(crate) fn record_hit(&self) -> Member {
        let hits = self.hits.fetch_add(1, Ordering::Relaxed) + 1;
        Member {
            hits,
            ..self.member.clone()
        }
    }
}
