use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// Cluster the explorer is pointed at
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cluster {
    MainnetBeta,
    Testnet,
    Devnet,
    Custom,
}

impl Cluster {
    pub const ALL: [Cluster; 4] = [
        Cluster::MainnetBeta,
        Cluster::Testnet,
        Cluster::Devnet,
        Cluster::Custom,
    ];

    /// Token-list chain id for this cluster (custom clusters have none)
    pub fn chain_id(self) -> Option<u64> {
        match self {
            Cluster::MainnetBeta => Some(101),
            Cluster::Testnet => Some(102),
            Cluster::Devnet => Some(103),
            Cluster::Custom => None,
        }
    }
}

impl std::str::FromStr for Cluster {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "mainnet-beta" | "mainnet" => Ok(Cluster::MainnetBeta),
            "testnet" => Ok(Cluster::Testnet),
            "devnet" => Ok(Cluster::Devnet),
            "custom" | "localnet" => Ok(Cluster::Custom),
            _ => Err(anyhow!(
                "Invalid cluster '{s}'. Valid options: mainnet-beta, testnet, devnet, custom"
            )),
        }
    }
}

impl std::fmt::Display for Cluster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cluster::MainnetBeta => write!(f, "mainnet-beta"),
            Cluster::Testnet => write!(f, "testnet"),
            Cluster::Devnet => write!(f, "devnet"),
            Cluster::Custom => write!(f, "custom"),
        }
    }
}

/// One navigable search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCandidate {
    pub label: String,
    /// Application route, always starts with `/`
    pub pathname: String,
    pub value: Vec<String>,
}

impl SearchCandidate {
    pub fn new(label: impl Into<String>, pathname: impl Into<String>, value: Vec<String>) -> Self {
        Self {
            label: label.into(),
            pathname: pathname.into(),
            value,
        }
    }

    /// Candidate pointing at `/address/<address>`
    pub fn address(label: impl Into<String>, address: &str, value: Vec<String>) -> Self {
        Self::new(label, format!("/address/{address}"), value)
    }
}

/// Candidates sharing a heading ("Programs", "Tokens", ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchGroup {
    pub label: String,
    pub options: Vec<SearchCandidate>,
}

impl SearchGroup {
    /// Build a group, or `None` when there is nothing to show
    pub fn non_empty(label: impl Into<String>, options: Vec<SearchCandidate>) -> Option<Self> {
        if options.is_empty() {
            None
        } else {
            Some(Self {
                label: label.into(),
                options,
            })
        }
    }

    pub fn single(label: impl Into<String>, option: SearchCandidate) -> Self {
        Self {
            label: label.into(),
            options: vec![option],
        }
    }
}

/// Caller-supplied chain state for a single query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainContext {
    pub current_epoch: Option<u64>,
    pub cluster: Cluster,
}

impl ChainContext {
    pub fn new(cluster: Cluster) -> Self {
        Self {
            current_epoch: None,
            cluster,
        }
    }

    pub fn with_epoch(mut self, epoch: u64) -> Self {
        self.current_epoch = Some(epoch);
        self
    }
}

/// A raw transaction split into its message and (optional) signatures
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedTransaction {
    /// Message bytes, base64
    pub message: String,
    /// Base58 signatures, present only for a fully parsed envelope
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signatures: Option<Vec<String>>,
}

/// Name-service lookup result for a `.sol`-style domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainInfo {
    pub owner: String,
    pub address: String,
}
