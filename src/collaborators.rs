//! Lookups that run alongside local classification
//!
//! Token search and domain resolution are asynchronous and may fail. The
//! search engine joins them after the local tables and drops whatever
//! fails. The implementations here are local (file-backed); network-backed
//! ones plug in through the same traits.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::types::{Cluster, DomainInfo, SearchCandidate};

/// Maximum number of token results returned for one query
pub const TOKEN_RESULT_LIMIT: usize = 20;

#[async_trait]
pub trait TokenSearch: Send + Sync {
    /// Tokens whose name, symbol or mint match the query
    async fn search_tokens(&self, query: &str, cluster: Cluster) -> Result<Vec<SearchCandidate>>;
}

#[async_trait]
pub trait DomainResolver: Send + Sync {
    /// Owner and name account for a domain such as `bonfida.sol`
    async fn resolve_domain(&self, domain: &str) -> Result<Option<DomainInfo>>;
}

/// Token search that never matches
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTokens;

#[async_trait]
impl TokenSearch for NoTokens {
    async fn search_tokens(&self, _query: &str, _cluster: Cluster) -> Result<Vec<SearchCandidate>> {
        Ok(Vec::new())
    }
}

/// Domain resolver that never resolves
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDomains;

#[async_trait]
impl DomainResolver for NoDomains {
    async fn resolve_domain(&self, _domain: &str) -> Result<Option<DomainInfo>> {
        Ok(None)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenEntry {
    pub chain_id: u64,
    pub address: String,
    pub symbol: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct TokenListFile {
    tokens: Vec<TokenEntry>,
}

/// Token search over a token-list JSON document
/// (`{ "tokens": [{ "chainId", "address", "symbol", "name" }] }`)
#[derive(Debug, Clone, Default)]
pub struct TokenList {
    tokens: Vec<TokenEntry>,
}

impl TokenList {
    pub fn new(tokens: Vec<TokenEntry>) -> Self {
        Self { tokens }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let file: TokenListFile = serde_json::from_str(json)?;
        Ok(Self::new(file.tokens))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read token list: {}", path.display()))?;
        let list = Self::from_json(&contents)
            .with_context(|| format!("Failed to parse token list: {}", path.display()))?;
        log::info!("Loaded {} tokens from {}", list.len(), path.display());
        Ok(list)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    fn matches(&self, query: &str, cluster: Cluster) -> Vec<SearchCandidate> {
        let Some(chain_id) = cluster.chain_id() else {
            return Vec::new();
        };
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        self.tokens
            .iter()
            .filter(|t| t.chain_id == chain_id)
            .filter(|t| {
                t.name.to_lowercase().contains(&needle)
                    || t.symbol.to_lowercase().contains(&needle)
                    || t.address == query.trim()
            })
            .take(TOKEN_RESULT_LIMIT)
            .map(|t| {
                SearchCandidate::address(
                    t.name.clone(),
                    &t.address,
                    vec![t.name.clone(), t.symbol.clone(), t.address.clone()],
                )
            })
            .collect()
    }
}

#[async_trait]
impl TokenSearch for TokenList {
    async fn search_tokens(&self, query: &str, cluster: Cluster) -> Result<Vec<SearchCandidate>> {
        Ok(self.matches(query, cluster))
    }
}

#[derive(Debug, Default, Deserialize)]
struct DomainsFile {
    #[serde(default)]
    domains: HashMap<String, DomainInfo>,
}

/// Domain resolver backed by a fixed table, loaded from TOML:
///
/// ```toml
/// [domains."bonfida.sol"]
/// owner = "HKKp49qGWXd639QsuH7JiLijfVW5UtCVY4s1n2HANwEA"
/// address = "Crf8hzfthWGbGbLTVCiqRqV5MVnbpHB1L9KQMd6gsinb"
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticDomains {
    domains: HashMap<String, DomainInfo>,
}

impl StaticDomains {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_domain(mut self, domain: &str, info: DomainInfo) -> Self {
        self.domains.insert(domain.to_lowercase(), info);
        self
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let file: DomainsFile = toml::from_str(contents)?;
        Ok(Self {
            domains: file
                .domains
                .into_iter()
                .map(|(k, v)| (k.to_lowercase(), v))
                .collect(),
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read domain table: {}", path.display()))?;
        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse domain table: {}", path.display()))
    }
}

#[async_trait]
impl DomainResolver for StaticDomains {
    async fn resolve_domain(&self, domain: &str) -> Result<Option<DomainInfo>> {
        Ok(self.domains.get(&domain.trim().to_lowercase()).cloned())
    }
}
