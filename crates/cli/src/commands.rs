//! Command implementations.
//!
//! Commands build a ring from the resolved [`RingConfig`], drive it through
//! its public API only, and return a [`CommandResult`] that the caller
//! renders as text or JSON.

use std::collections::HashMap;
use std::fmt::Write as _;

use anyhow::{Context, Result};
use corelib::{HashRing, Member, RingConfig};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::Command;

/// Per-member statistics after one simulation round.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberHits {
    pub name: String,
    pub address: String,
    pub weight: i64,
    /// Lookups resolved to the member during this round.
    pub hits: u64,
    /// Hit counter as reported by the ring, accumulated since the member joined.
    pub total_hits: u64,
}

/// One batch of lookups in a simulation.
#[derive(Debug, Clone, Serialize)]
pub struct Round {
    pub label: String,
    pub members: Vec<MemberHits>,
    /// Keys resolved to a different member than in the previous round.
    pub moved: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct KeyAssignment {
    pub key: String,
    pub position: String,
    pub member: String,
    pub address: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OwnershipRow {
    pub member: String,
    pub weight: i64,
    pub vnodes: usize,
    pub share: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "command", rename_all = "lowercase")]
pub enum CommandResult {
    Simulate {
        hash: &'static str,
        keys: usize,
        rounds: Vec<Round>,
    },
    Lookup {
        hash: &'static str,
        assignments: Vec<KeyAssignment>,
    },
    Ownership {
        hash: &'static str,
        members: Vec<OwnershipRow>,
    },
}

pub fn execute(command: &Command, ring_config: &RingConfig) -> Result<CommandResult> {
    let ring = ring_config.build().context("building ring")?;
    info!(
        hash = ring.hash_name(),
        members = ring.member_count(),
        vnodes = ring.vnode_count(),
        "ring ready"
    );

    match command {
        Command::Simulate {
            keys,
            key_prefix,
            remove,
            join,
        } => simulate(&ring, *keys, key_prefix, remove, join),
        Command::Lookup { keys } => lookup(&ring, keys),
        Command::Ownership => Ok(ownership(&ring)),
    }
}

fn simulate(
    ring: &HashRing,
    keys: usize,
    key_prefix: &str,
    remove: &str,
    join: &Member,
) -> Result<CommandResult> {
    let mut rounds = Vec::with_capacity(3);

    let (round, owners) = run_round(ring, "initial members", keys, key_prefix, None)?;
    rounds.push(round);

    if !ring.remove(remove) {
        warn!(member = remove, "member not on the ring, nothing removed");
    }
    let label = format!("after removing {remove}");
    let (round, owners) = run_round(ring, &label, keys, key_prefix, Some(owners.as_slice()))?;
    rounds.push(round);

    if !ring.add(join.clone()) {
        warn!(member = %join.name, "member already on the ring, nothing added");
    }
    let label = format!("after adding {}", join.name);
    let (round, _) = run_round(ring, &label, keys, key_prefix, Some(owners.as_slice()))?;
    rounds.push(round);

    Ok(CommandResult::Simulate {
        hash: ring.hash_name(),
        keys,
        rounds,
    })
}

/// Look up `keys` keys and record who owns each.
///
/// Hit counters only grow, so a round's hits are the difference between
/// member snapshots taken before and after its lookups.
fn run_round(
    ring: &HashRing,
    label: &str,
    keys: usize,
    key_prefix: &str,
    previous: Option<&[String]>,
) -> Result<(Round, Vec<String>)> {
    let before: HashMap<String, u64> = ring
        .get_members()
        .into_iter()
        .map(|m| (m.name, m.hits))
        .collect();

    let mut owners = Vec::with_capacity(keys);
    for i in 0..keys {
        let key = format!("{key_prefix}{i}");
        let member = ring
            .lookup(&key)
            .with_context(|| format!("looking up {key}"))?;
        owners.push(member.name);
    }

    let moved = previous.map(|before| {
        before
            .iter()
            .zip(&owners)
            .filter(|(old, new)| old != new)
            .count()
    });

    let mut members: Vec<MemberHits> = ring
        .get_members()
        .into_iter()
        .map(|m| MemberHits {
            hits: m.hits - before.get(&m.name).copied().unwrap_or(0),
            total_hits: m.hits,
            name: m.name,
            address: m.address,
            weight: m.weight,
        })
        .collect();
    members.sort_by(|a, b| a.name.cmp(&b.name));

    info!(round = label, keys, moved = ?moved, "round complete");
    Ok((
        Round {
            label: label.to_string(),
            members,
            moved,
        },
        owners,
    ))
}

fn lookup(ring: &HashRing, keys: &[String]) -> Result<CommandResult> {
    let assignments = keys
        .iter()
        .map(|key| {
            let member = ring
                .lookup(key)
                .with_context(|| format!("looking up {key}"))?;
            Ok(KeyAssignment {
                key: key.clone(),
                position: ring.position_of(key).to_string(),
                member: member.name,
                address: member.address,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CommandResult::Lookup {
        hash: ring.hash_name(),
        assignments,
    })
}

fn ownership(ring: &HashRing) -> CommandResult {
    let topology = ring.topology();
    let shares = topology.ownership();
    let vnodes = topology.vnode_counts();

    let mut members: Vec<OwnershipRow> = ring
        .get_members()
        .into_iter()
        .map(|m| OwnershipRow {
            vnodes: vnodes.get(&m.name).copied().unwrap_or(0),
            share: shares.get(&m.name).copied().unwrap_or(0.0),
            member: m.name,
            weight: m.weight,
        })
        .collect();
    members.sort_by(|a, b| a.member.cmp(&b.member));

    CommandResult::Ownership {
        hash: topology.partitioner(),
        members,
    }
}

impl CommandResult {
    pub fn render(&self, json: bool) -> Result<String> {
        if json {
            return serde_json::to_string_pretty(self).context("encoding result");
        }

        let mut out = String::new();
        match self {
            CommandResult::Simulate { hash, keys, rounds } => {
                writeln!(out, "hash: {hash}, keys per round: {keys}")?;
                for round in rounds {
                    writeln!(out, "------- {} -------", round.label)?;
                    for m in &round.members {
                        writeln!(
                            out,
                            "node [{}] serving [{}] got [{}] hits",
                            m.name, m.address, m.hits
                        )?;
                    }
                    if let Some(moved) = round.moved {
                        writeln!(out, "keys moved: {moved}")?;
                    }
                }
            }
            CommandResult::Lookup { assignments, .. } => {
                for a in assignments {
                    writeln!(
                        out,
                        "key [{}] at [{}] matches node [{}] serving [{}]",
                        a.key, a.position, a.member, a.address
                    )?;
                }
            }
            CommandResult::Ownership { hash, members } => {
                writeln!(out, "hash: {hash}")?;
                for m in members {
                    writeln!(
                        out,
                        "node [{}] weight [{}] vnodes [{}] owns [{:.2}%]",
                        m.member,
                        m.weight,
                        m.vnodes,
                        m.share * 100.0
                    )?;
                }
            }
        }
        Ok(out.trim_end().to_string())
    }
}
