//! Core library for consistent hashing implementation.
//!
//! This crate provides the fundamental abstractions for consistent hashing:
//! - Members and the virtual nodes that place them on the ring
//! - Partitioners (pluggable `bytes -> u32` hash functions)
//! - Ring positions on the 32-bit keyspace
//! - The hash ring itself, with successor lookup and membership changes
//! - Point-in-time topology views and keyspace ownership

pub mod config;
pub mod error;
pub mod member;
pub mod partitioner;
pub mod ring;
pub mod topology;
pub mod vnode;

pub use config::RingConfig;
pub use error::{Error, Result};
pub use member::Member;
pub use partitioner::{HashAlgorithm, Partitioner};
pub use ring::{ConsistentHash, HashRing, Position, Ring, RingBuilder};
pub use topology::Topology;
pub use vnode::VirtualNode;
