//! Static lookup tables for the search bar
//!
//! Known programs, program loaders, sysvars, special accounts and feature
//! gates. Everything here is read-only once built: construct a [`Registry`]
//! at startup and hand it to the search engine behind an `Arc`.
//!
//! Table order matters. Search results within a group follow the order the
//! entries are listed here.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::types::Cluster;

const ALL_CLUSTERS: &[Cluster] = &[
    Cluster::MainnetBeta,
    Cluster::Testnet,
    Cluster::Devnet,
    Cluster::Custom,
];
const LIVE_CLUSTERS: &[Cluster] = &[Cluster::MainnetBeta, Cluster::Testnet, Cluster::Devnet];
const MAINNET_ONLY: &[Cluster] = &[Cluster::MainnetBeta];

const PROGRAMS: &[(&str, &str, &[Cluster])] = &[
    ("AddressLookupTab1e1111111111111111111111111", "Address Lookup Table Program", ALL_CLUSTERS),
    ("ComputeBudget111111111111111111111111111111", "Compute Budget Program", ALL_CLUSTERS),
    ("Config1111111111111111111111111111111111111", "Config Program", ALL_CLUSTERS),
    ("Stake11111111111111111111111111111111111111", "Stake Program", ALL_CLUSTERS),
    ("11111111111111111111111111111111", "System Program", ALL_CLUSTERS),
    ("Vote111111111111111111111111111111111111111", "Vote Program", ALL_CLUSTERS),
    ("KeccakSecp256k11111111111111111111111111111", "Secp256k1 SigVerify Precompile", ALL_CLUSTERS),
    ("Ed25519SigVerify111111111111111111111111111", "Ed25519 SigVerify Precompile", ALL_CLUSTERS),
    ("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA", "Token Program", ALL_CLUSTERS),
    ("TokenzQdBNbLqP5VEhdkAS6EPFLC1PHnBqCXEpPxuEb", "Token-2022 Program", ALL_CLUSTERS),
    ("ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL", "Associated Token Account Program", ALL_CLUSTERS),
    ("Memo1UhkJRfHyvLMcVucJwxXeuD728EqVDDwQDxFMNo", "Memo Program v1", ALL_CLUSTERS),
    ("MemoSq4gqABAXKb96qnH8TysNcWxMyWCqXgDLGmfcHr", "Memo Program v2", ALL_CLUSTERS),
    ("namesLPneVptA9Z5rqUDD9tMTWEJwofgaYwp8cawRkX", "Name Service Program", LIVE_CLUSTERS),
    ("SwaPpA9LAaLfeLi3a68M4DjnLqgtticKg6CnyNwgAC8", "Token Swap Program", LIVE_CLUSTERS),
    ("SPoo1Ku8WFXoNDMHPsrGSTSG1Y47rzgn41SLUNakuHy", "Stake Pool Program", LIVE_CLUSTERS),
    ("metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s", "Token Metadata Program", LIVE_CLUSTERS),
    ("9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin", "Serum Dex Program v3", MAINNET_ONLY),
    ("22Y43yTVxuUkoRKdm9thyRhQ3SdgQS7c7kB6UNCiaczD", "Serum Swap Program", MAINNET_ONLY),
    ("JUP6LkbZbjS1jKKwapdHNy74zcZ3tLUZoi5QNyVTaV4", "Jupiter Aggregator v6", MAINNET_ONLY),
    ("MarBmsSgKXdrN1egZf5sqe1TMai9K1rChYNDJgjq7aD", "Marinade Staking Program", MAINNET_ONLY),
    ("worm2ZoG2kUd4vFXhvjh93UUH596ayRfgQ2MgjNMTth", "Wormhole Core Bridge", MAINNET_ONLY),
];

const LOADERS: &[(&str, &str)] = &[
    ("MoveLdr111111111111111111111111111111111111", "Move Loader"),
    ("NativeLoader1111111111111111111111111111111", "Native Loader"),
    ("BPFLoader1111111111111111111111111111111111", "BPF Loader"),
    ("BPFLoader2111111111111111111111111111111111", "BPF Loader 2"),
    ("BPFLoaderUpgradeab1e11111111111111111111111", "BPF Upgradeable Loader"),
    ("LoaderV411111111111111111111111111111111111", "Loader v4"),
];

const SYSVARS: &[(&str, &str)] = &[
    ("SysvarC1ock11111111111111111111111111111111", "Sysvar: Clock"),
    ("SysvarEpochSchedu1e111111111111111111111111", "Sysvar: Epoch Schedule"),
    ("SysvarFees111111111111111111111111111111111", "Sysvar: Fees"),
    ("SysvarRecentB1ockHashes11111111111111111111", "Sysvar: Recent Blockhashes"),
    ("SysvarRent111111111111111111111111111111111", "Sysvar: Rent"),
    ("SysvarRewards111111111111111111111111111111", "Sysvar: Rewards"),
    ("SysvarS1otHashes111111111111111111111111111", "Sysvar: Slot Hashes"),
    ("SysvarS1otHistory11111111111111111111111111", "Sysvar: Slot History"),
    ("SysvarStakeHistory1111111111111111111111111", "Sysvar: Stake History"),
    ("Sysvar1nstructions1111111111111111111111111", "Sysvar: Instructions"),
    ("SysvarEpochRewards1111111111111111111111111", "Sysvar: Epoch Rewards"),
    ("SysvarLastRestartS1ot1111111111111111111111", "Sysvar: Last Restart Slot"),
];

const SPECIAL: &[(&str, &str)] = &[
    ("1nc1nerator11111111111111111111111111111111", "Incinerator"),
    ("Sysvar1111111111111111111111111111111111111", "SYSVAR"),
];

/// Bundled feature gate snapshot
const FEATURE_GATES_JSON: &str = include_str!("../data/feature_gates.json");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramInfo {
    pub address: String,
    pub name: String,
    pub deployments: Vec<Cluster>,
}

impl ProgramInfo {
    pub fn is_deployed_on(&self, cluster: Cluster) -> bool {
        self.deployments.contains(&cluster)
    }
}

/// An address with a human-readable name (loaders, sysvars, special accounts)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedAddress {
    pub address: String,
    pub name: String,
}

impl NamedAddress {
    pub fn new(address: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            name: name.into(),
        }
    }
}

/// Feature gate entry as it appears in the feature gate JSON list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureGate {
    /// Feature account address; a few proposals don't have one yet
    #[serde(default)]
    pub key: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub simds: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Registry {
    programs: Vec<ProgramInfo>,
    loaders: Vec<NamedAddress>,
    sysvars: Vec<NamedAddress>,
    special: Vec<NamedAddress>,
    feature_gates: Vec<FeatureGate>,
}

fn named(table: &[(&str, &str)]) -> Vec<NamedAddress> {
    table
        .iter()
        .map(|(address, name)| NamedAddress::new(*address, *name))
        .collect()
}

impl Registry {
    /// Empty registry, mostly useful for tests
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry populated with the built-in tables and bundled feature gates
    pub fn builtin() -> Result<Self> {
        let programs = PROGRAMS
            .iter()
            .map(|(address, name, deployments)| ProgramInfo {
                address: address.to_string(),
                name: name.to_string(),
                deployments: deployments.to_vec(),
            })
            .collect();

        Ok(Self {
            programs,
            loaders: named(LOADERS),
            sysvars: named(SYSVARS),
            special: named(SPECIAL),
            feature_gates: parse_feature_gates(FEATURE_GATES_JSON)
                .context("bundled feature gate list")?,
        })
    }

    /// Replace the feature gate list with one read from a JSON file
    pub fn with_feature_gates_file(mut self, path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read feature gate list: {}", path.display()))?;
        self.feature_gates = parse_feature_gates(&contents)
            .with_context(|| format!("Failed to parse feature gate list: {}", path.display()))?;
        log::info!(
            "Loaded {} feature gates from {}",
            self.feature_gates.len(),
            path.display()
        );
        Ok(self)
    }

    pub fn with_program(mut self, address: &str, name: &str, deployments: &[Cluster]) -> Self {
        self.programs.push(ProgramInfo {
            address: address.to_string(),
            name: name.to_string(),
            deployments: deployments.to_vec(),
        });
        self
    }

    pub fn with_loader(mut self, address: &str, name: &str) -> Self {
        self.loaders.push(NamedAddress::new(address, name));
        self
    }

    pub fn with_sysvar(mut self, address: &str, name: &str) -> Self {
        self.sysvars.push(NamedAddress::new(address, name));
        self
    }

    pub fn with_special(mut self, address: &str, name: &str) -> Self {
        self.special.push(NamedAddress::new(address, name));
        self
    }

    pub fn with_feature_gate(mut self, gate: FeatureGate) -> Self {
        self.feature_gates.push(gate);
        self
    }

    pub fn programs(&self) -> &[ProgramInfo] {
        &self.programs
    }

    pub fn loaders(&self) -> &[NamedAddress] {
        &self.loaders
    }

    pub fn sysvars(&self) -> &[NamedAddress] {
        &self.sysvars
    }

    pub fn special(&self) -> &[NamedAddress] {
        &self.special
    }

    pub fn feature_gates(&self) -> &[FeatureGate] {
        &self.feature_gates
    }
}

fn parse_feature_gates(json: &str) -> Result<Vec<FeatureGate>> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables_load() {
        let registry = Registry::builtin().unwrap();
        assert!(!registry.programs().is_empty());
        assert!(!registry.feature_gates().is_empty());
        assert!(registry
            .loaders()
            .iter()
            .any(|l| l.name == "BPF Upgradeable Loader"));
        assert!(registry.sysvars().iter().all(|s| s.name.starts_with("Sysvar: ")));
    }

    #[test]
    fn test_builtin_addresses_are_unique_per_table() {
        let registry = Registry::builtin().unwrap();
        let mut seen = std::collections::HashSet::new();
        for p in registry.programs() {
            assert!(seen.insert(p.address.as_str()), "duplicate {}", p.address);
        }
    }

    #[test]
    fn test_mainnet_only_program() {
        let registry = Registry::builtin().unwrap();
        let jup = registry
            .programs()
            .iter()
            .find(|p| p.name == "Jupiter Aggregator v6")
            .unwrap();
        assert!(jup.is_deployed_on(Cluster::MainnetBeta));
        assert!(!jup.is_deployed_on(Cluster::Devnet));
    }

    #[test]
    fn test_feature_gate_without_key_parses() {
        let gates = parse_feature_gates(r#"[{"title": "Pending proposal"}]"#).unwrap();
        assert_eq!(gates[0].key, None);
        assert!(gates[0].simds.is_empty());
    }

    #[test]
    fn test_bad_feature_gate_json_is_an_error() {
        assert!(parse_feature_gates("{not json").is_err());
    }
}
