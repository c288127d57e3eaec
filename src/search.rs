//! Search bar query classification
//!
//! Turns free text into grouped navigation candidates. Named matches from
//! the static tables, feature gates and slot/epoch numbers come first; if
//! any of them hit, the query is not tried as a raw address, signature or
//! transaction blob. Human-chosen names are a far likelier intent than a
//! base58 string that happens to decode to the right length.
//!
//! Evaluation order:
//!
//! 1. Programs (deployed on the current cluster), Program Loaders, Sysvars,
//!    Accounts
//! 2. Feature Gates
//! 3. Block (any number literal), Epoch (integer up to current epoch + 1)
//! 4. Only if nothing above matched: Account (32-byte base58), Transaction
//!    (64-byte base58), or Transaction Inspector (base64 transaction)
//!
//! No stage can fail the whole query. A stage that errors contributes
//! nothing and logs why.

use anyhow::{anyhow, Result};
use futures::FutureExt as _;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use crate::collaborators::{DomainResolver, TokenSearch};
use crate::inspector::inspector_pathname;
use crate::numeric::{has_zero_prefix, integer_at_most, is_numeric_literal};
use crate::registry::{NamedAddress, Registry};
use crate::tx_decode::{decode_transaction_from_base64, looks_like_base64};
use crate::types::{ChainContext, Cluster, SearchCandidate, SearchGroup};

/// Loaders worth suggesting; the rest are internal
pub const SEARCHABLE_LOADERS: &[&str] = &["BPF Loader", "BPF Loader 2", "BPF Upgradeable Loader"];

/// Search over the shared static tables
#[derive(Debug, Clone)]
pub struct SearchEngine {
    registry: Arc<Registry>,
}

impl SearchEngine {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Local (synchronous) classification of a query
    pub fn classify(&self, raw_search: &str, context: &ChainContext) -> Vec<SearchGroup> {
        let search = raw_search.trim();
        if search.is_empty() {
            return Vec::new();
        }

        let mut groups: Vec<SearchGroup> = [
            self.program_options(search, context.cluster),
            self.loader_options(search),
            named_options("Sysvars", self.registry.sysvars(), search),
            named_options("Accounts", self.registry.special(), search),
            self.feature_gate_options(search),
        ]
        .into_iter()
        .flatten()
        .collect();

        groups.extend(numeric_options(search, context.current_epoch));

        // Prefer nice suggestions over raw ones
        if !groups.is_empty() {
            return groups;
        }

        binary_options(search).into_iter().collect()
    }

    /// Full search: local classification plus token and domain lookups.
    ///
    /// The lookups run concurrently and each one settles on its own; a
    /// failure is logged and contributes no groups. Results are ordered
    /// local, domain, tokens.
    pub async fn perform_search(
        &self,
        raw_search: &str,
        context: &ChainContext,
        tokens: &dyn TokenSearch,
        domains: &dyn DomainResolver,
    ) -> Vec<SearchGroup> {
        let mut groups = self.classify(raw_search, context);

        let lookup_domain = has_domain_syntax(raw_search) && context.cluster == Cluster::MainnetBeta;
        let (token_groups, domain_groups) = futures::join!(
            settle(build_token_options(tokens, raw_search, context.cluster)),
            settle(async {
                if lookup_domain {
                    build_domain_options(domains, raw_search).await
                } else {
                    Ok(Vec::new())
                }
            }),
        );

        groups.extend(appendable(domain_groups, "domain"));
        groups.extend(appendable(token_groups, "token"));
        groups
    }

    fn program_options(&self, search: &str, cluster: Cluster) -> Option<SearchGroup> {
        let needle = search.to_lowercase();
        let options = self
            .registry
            .programs()
            .iter()
            .filter(|p| p.is_deployed_on(cluster))
            .filter(|p| p.name.to_lowercase().contains(&needle) || p.address.contains(search))
            .map(|p| address_candidate(&p.name, &p.address))
            .collect();
        SearchGroup::non_empty("Programs", options)
    }

    fn loader_options(&self, search: &str) -> Option<SearchGroup> {
        let searchable: Vec<NamedAddress> = self
            .registry
            .loaders()
            .iter()
            .filter(|l| SEARCHABLE_LOADERS.contains(&l.name.as_str()))
            .cloned()
            .collect();
        named_options("Program Loaders", &searchable, search)
    }

    fn feature_gate_options(&self, search: &str) -> Option<SearchGroup> {
        let needle = search.to_uppercase();
        let options = self
            .registry
            .feature_gates()
            .iter()
            .filter(|f| f.title.to_uppercase().contains(&needle))
            .filter_map(|f| {
                // proposals without a feature account have nowhere to link to
                let key = f.key.as_deref()?;
                Some(SearchCandidate::address(f.title.clone(), key, vec![key.to_string()]))
            })
            .collect();
        SearchGroup::non_empty("Feature Gates", options)
    }
}

fn address_candidate(name: &str, address: &str) -> SearchCandidate {
    SearchCandidate::address(name, address, vec![name.to_string(), address.to_string()])
}

fn named_options(label: &str, table: &[NamedAddress], search: &str) -> Option<SearchGroup> {
    let needle = search.to_lowercase();
    let options = table
        .iter()
        .filter(|e| e.name.to_lowercase().contains(&needle) || e.address.contains(search))
        .map(|e| address_candidate(&e.name, &e.address))
        .collect();
    SearchGroup::non_empty(label, options)
}

fn numeric_options(search: &str, current_epoch: Option<u64>) -> Vec<SearchGroup> {
    let mut groups = Vec::new();
    if !is_numeric_literal(search) {
        return groups;
    }

    groups.push(SearchGroup::single(
        "Block",
        SearchCandidate::new(
            format!("Slot #{search}"),
            format!("/block/{search}"),
            vec![search.to_string()],
        ),
    ));

    // Not for 0x.. / 0b.. style inputs
    if let Some(epoch) = current_epoch {
        if !has_zero_prefix(search) {
            match integer_at_most(search, u128::from(epoch) + 1) {
                Some(true) => groups.push(SearchGroup::single(
                    "Epoch",
                    SearchCandidate::new(
                        format!("Epoch #{search}"),
                        format!("/epoch/{search}"),
                        vec![search.to_string()],
                    ),
                )),
                Some(false) => {}
                None => log::debug!("{search:?} is numeric but not an integer, no epoch match"),
            }
        }
    }

    groups
}

fn binary_options(search: &str) -> Option<SearchGroup> {
    let decoded = match bs58::decode(search).into_vec() {
        Ok(decoded) => decoded,
        Err(e) => {
            log::debug!("{search:?} is not base58 ({e}), trying base64");
            return inspector_options(search);
        }
    };

    match decoded.len() {
        32 => Some(SearchGroup::single(
            "Account",
            SearchCandidate::address(search, search, vec![search.to_string()]),
        )),
        64 => Some(SearchGroup::single(
            "Transaction",
            SearchCandidate::new(search, format!("/tx/{search}"), vec![search.to_string()]),
        )),
        _ => None,
    }
}

fn inspector_options(search: &str) -> Option<SearchGroup> {
    if !looks_like_base64(search) {
        return None;
    }
    let decoded = decode_transaction_from_base64(search)?;
    match inspector_pathname(&decoded) {
        Ok(pathname) => Some(SearchGroup::single(
            "Transaction Inspector",
            SearchCandidate::new("Inspect Decoded Transaction", pathname, vec![search.to_string()]),
        )),
        Err(e) => {
            log::warn!("Failed to build inspector link: {e:#}");
            None
        }
    }
}

/// `name.tld` longer than three UTF-16 code units
pub fn has_domain_syntax(value: &str) -> bool {
    value.encode_utf16().count() > 3 && value.split('.').count() == 2
}

async fn build_token_options(
    tokens: &dyn TokenSearch,
    search: &str,
    cluster: Cluster,
) -> Result<Vec<SearchGroup>> {
    let matched = tokens.search_tokens(search, cluster).await?;
    Ok(SearchGroup::non_empty("Tokens", matched).into_iter().collect())
}

async fn build_domain_options(domains: &dyn DomainResolver, search: &str) -> Result<Vec<SearchGroup>> {
    let Some(info) = domains.resolve_domain(search).await? else {
        return Ok(Vec::new());
    };
    if info.owner.is_empty() || info.address.is_empty() {
        return Ok(Vec::new());
    }

    Ok(vec![
        SearchGroup::single(
            "Domain Owner",
            SearchCandidate::address(info.owner.clone(), &info.owner, vec![search.to_string()]),
        ),
        SearchGroup::single(
            "Name Service Account",
            SearchCandidate::address(search, &info.address, vec![search.to_string()]),
        ),
    ])
}

/// Run a lookup to completion, turning a panic into an error
async fn settle<T>(lookup: impl Future<Output = Result<T>>) -> Result<T> {
    match AssertUnwindSafe(lookup).catch_unwind().await {
        Ok(result) => result,
        Err(_) => Err(anyhow!("lookup panicked")),
    }
}

fn appendable(result: Result<Vec<SearchGroup>>, name: &str) -> Vec<SearchGroup> {
    match result {
        Ok(groups) => groups,
        Err(e) => {
            log::error!("Failed to build {name} options for search: {e:#}");
            Vec::new()
        }
    }
}
