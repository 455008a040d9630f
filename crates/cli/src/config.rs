//! Command-line configuration.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use corelib::{HashAlgorithm, Member, RingConfig};
use tracing::debug;

use crate::commands;

#[derive(Parser, Debug)]
#[command(
    name = "ringctl",
    version,
    about = "Inspect and exercise a consistent hash ring"
)]
pub struct CliConfig {
    /// Ring config file (JSON) with the hash algorithm and initial members.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Hash algorithm (crc32, xxh32, xxh3, sip13). Overrides the config file.
    #[arg(long, global = true)]
    pub hash: Option<HashAlgorithm>,

    /// Member as `name[,address[,weight]]`. Can be specified multiple times;
    /// added after the members of the config file.
    #[arg(short, long = "member", global = true)]
    pub members: Vec<Member>,

    /// Print results as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    /// Log level filter, used when `RUST_LOG` is unset.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Look up a batch of keys, remove a member, look up again, add a
    /// member, look up again; report per-member hits after every round.
    Simulate {
        /// Number of keys per round.
        #[arg(short = 'n', long, default_value_t = 1_000_000)]
        keys: usize,

        /// Keys are `<prefix><i>`.
        #[arg(long, default_value = "my_test_key_")]
        key_prefix: String,

        /// Member removed after the first round.
        #[arg(long, default_value = "machine2")]
        remove: String,

        /// Member added after the second round.
        #[arg(long, default_value = "machine5,192.168.0.5:8080,1024")]
        join: Member,
    },

    /// Resolve keys to members.
    Lookup {
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// Show each member's virtual nodes and share of the keyspace.
    Ownership,
}

/// Members used when neither a config file nor `--member` is given.
pub fn default_members() -> Vec<Member> {
    vec![
        Member::new("machine1", "192.168.0.1:8080").with_weight(1032),
        Member::new("machine2", "192.168.0.2:8080").with_weight(1024),
        Member::new("machine3", "192.168.0.3:8080").with_weight(1032),
        Member::new("machine4", "192.168.0.4:8080").with_weight(1016),
    ]
}

impl CliConfig {
    /// Merge the config file, `--hash` and `--member` into one ring config.
    pub fn ring_config(&self) -> Result<RingConfig> {
        let mut ring_config = match &self.config {
            Some(path) => {
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("reading ring config {}", path.display()))?;
                RingConfig::from_json(&raw)
                    .with_context(|| format!("parsing ring config {}", path.display()))?
            }
            None => RingConfig::default(),
        };

        if let Some(hash) = self.hash {
            ring_config.hash = hash;
        }
        ring_config.members.extend(self.members.iter().cloned());
        if self.config.is_none() && ring_config.members.is_empty() {
            ring_config.members = default_members();
        }

        debug!(
            hash = %ring_config.hash,
            members = ring_config.members.len(),
            "resolved ring config"
        );
        Ok(ring_config)
    }

    pub fn run(self) -> Result<()> {
        let ring_config = self.ring_config()?;
        let result = commands::execute(&self.command, &ring_config)?;
        println!("{}", result.render(self.json)?);
        Ok(())
    }
}
