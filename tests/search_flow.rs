//! End-to-end search tests - local classification plus token and domain lookups

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use base64::Engine as _;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use solx::collaborators::{DomainResolver, NoDomains, NoTokens, StaticDomains, TokenList, TokenSearch};
use solx::inspector::parse_inspector_pathname;
use solx::registry::Registry;
use solx::types::DomainInfo;
use solx::{ChainContext, Cluster, SearchCandidate, SearchEngine, SearchGroup};

const OWNER: &str = "HKKp49qGWXd639QsuH7JiLijfVW5UtCVY4s1n2HANwEA";
const NAME_ACCOUNT: &str = "Crf8hzfthWGbGbLTVCiqRqV5MVnbpHB1L9KQMd6gsinb";

fn engine() -> SearchEngine {
    SearchEngine::new(Arc::new(Registry::builtin().unwrap()))
}

fn labels(groups: &[SearchGroup]) -> Vec<&str> {
    groups.iter().map(|g| g.label.as_str()).collect()
}

fn domains() -> StaticDomains {
    StaticDomains::new().with_domain(
        "bonfida.sol",
        DomainInfo {
            owner: OWNER.to_string(),
            address: NAME_ACCOUNT.to_string(),
        },
    )
}

struct FailingTokens;

#[async_trait]
impl TokenSearch for FailingTokens {
    async fn search_tokens(&self, _query: &str, _cluster: Cluster) -> Result<Vec<SearchCandidate>> {
        Err(anyhow!("token service unavailable"))
    }
}

struct PanickingTokens;

#[async_trait]
impl TokenSearch for PanickingTokens {
    async fn search_tokens(&self, _query: &str, _cluster: Cluster) -> Result<Vec<SearchCandidate>> {
        panic!("token index corrupted")
    }
}

struct FixedTokens;

#[async_trait]
impl TokenSearch for FixedTokens {
    async fn search_tokens(&self, query: &str, _cluster: Cluster) -> Result<Vec<SearchCandidate>> {
        Ok(vec![SearchCandidate::address(
            format!("{query} token"),
            "So11111111111111111111111111111111111111112",
            vec![query.to_string()],
        )])
    }
}

/// Counts lookups so tests can tell whether the resolver was consulted
#[derive(Default)]
struct CountingDomains {
    calls: AtomicUsize,
}

#[async_trait]
impl DomainResolver for CountingDomains {
    async fn resolve_domain(&self, _domain: &str) -> Result<Option<DomainInfo>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(None)
    }
}

#[tokio::test]
async fn domain_groups_come_before_tokens() {
    let groups = engine()
        .perform_search("bonfida.sol", &ChainContext::new(Cluster::MainnetBeta), &FixedTokens, &domains())
        .await;

    assert_eq!(labels(&groups), vec!["Domain Owner", "Name Service Account", "Tokens"]);
    assert_eq!(groups[0].options[0].pathname, format!("/address/{OWNER}"));
    assert_eq!(groups[0].options[0].label, OWNER);
    assert_eq!(groups[1].options[0].pathname, format!("/address/{NAME_ACCOUNT}"));
    assert_eq!(groups[1].options[0].label, "bonfida.sol");
    assert_eq!(groups[1].options[0].value, vec!["bonfida.sol"]);
}

#[tokio::test]
async fn local_groups_come_first() {
    let groups = engine()
        .perform_search("token program", &ChainContext::new(Cluster::MainnetBeta), &FixedTokens, &NoDomains)
        .await;
    assert_eq!(labels(&groups), vec!["Programs", "Tokens"]);
}

#[tokio::test]
async fn failing_token_search_keeps_other_results() {
    let groups = engine()
        .perform_search("bonfida.sol", &ChainContext::new(Cluster::MainnetBeta), &FailingTokens, &domains())
        .await;
    assert_eq!(labels(&groups), vec!["Domain Owner", "Name Service Account"]);
}

#[tokio::test]
async fn panicking_token_search_keeps_other_results() {
    let groups = engine()
        .perform_search("1234", &ChainContext::new(Cluster::MainnetBeta), &PanickingTokens, &NoDomains)
        .await;
    assert_eq!(labels(&groups), vec!["Block"]);
}

#[tokio::test]
async fn domains_only_resolve_on_mainnet() {
    let resolver = CountingDomains::default();
    for cluster in [Cluster::Devnet, Cluster::Testnet, Cluster::Custom] {
        let groups = engine()
            .perform_search("bonfida.sol", &ChainContext::new(cluster), &NoTokens, &resolver)
            .await;
        assert!(groups.is_empty());
    }
    assert_eq!(resolver.calls.load(Ordering::SeqCst), 0);

    engine()
        .perform_search("bonfida.sol", &ChainContext::new(Cluster::MainnetBeta), &NoTokens, &resolver)
        .await;
    assert_eq!(resolver.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn non_domain_queries_skip_resolver() {
    let resolver = CountingDomains::default();
    let context = ChainContext::new(Cluster::MainnetBeta);
    for query in ["bonfida", "a.b", "a.b.sol"] {
        engine().perform_search(query, &context, &NoTokens, &resolver).await;
    }
    assert_eq!(resolver.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn token_list_results_on_the_right_cluster() {
    let list = TokenList::from_json(
        r#"{"tokens": [
            {"chainId": 101, "address": "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v", "symbol": "USDC", "name": "USD Coin"}
        ]}"#,
    )
    .unwrap();

    let groups = engine()
        .perform_search("usdc", &ChainContext::new(Cluster::MainnetBeta), &list, &NoDomains)
        .await;
    assert_eq!(labels(&groups), vec!["Tokens"]);
    assert_eq!(groups[0].options[0].label, "USD Coin");

    let groups = engine()
        .perform_search("usdc", &ChainContext::new(Cluster::Devnet), &list, &NoDomains)
        .await;
    assert!(groups.is_empty());
}

#[tokio::test]
async fn empty_query_with_collaborators() {
    let groups = engine()
        .perform_search("", &ChainContext::new(Cluster::MainnetBeta), &NoTokens, &NoDomains)
        .await;
    assert!(groups.is_empty());
}

#[test]
fn pasted_transaction_goes_to_inspector() {
    // [0xff; 64] signatures put '/' into the base64, which is not base58
    let mut message = vec![1u8, 0, 1, 1];
    message.extend_from_slice(&[7u8; 32]);
    message.extend_from_slice(&[9u8; 32]);
    message.push(0);

    let mut buf = vec![1u8];
    buf.extend_from_slice(&[0xffu8; 64]);
    buf.extend_from_slice(&message);
    let blob = base64::engine::general_purpose::STANDARD.encode(&buf);

    let groups = engine().classify(&blob, &ChainContext::new(Cluster::MainnetBeta));
    assert_eq!(labels(&groups), vec!["Transaction Inspector"]);

    let option = &groups[0].options[0];
    assert_eq!(option.label, "Inspect Decoded Transaction");
    assert_eq!(option.value, vec![blob.clone()]);
    assert!(option.pathname.starts_with("/tx/inspector?message="));

    let decoded = parse_inspector_pathname(&option.pathname).unwrap();
    assert_eq!(
        decoded.message,
        base64::engine::general_purpose::STANDARD.encode(&message)
    );
    assert_eq!(
        decoded.signatures.unwrap(),
        vec![bs58::encode([0xffu8; 64]).into_string()]
    );
}

#[test]
fn named_match_suppresses_blob_decoding() {
    // a registry entry whose name is itself a base64 transaction-looking string
    let registry = Registry::new().with_special("Spec1111", "AQID+/AQID");
    let engine = SearchEngine::new(Arc::new(registry));
    let groups = engine.classify("AQID+/AQID", &ChainContext::new(Cluster::MainnetBeta));
    assert_eq!(labels(&groups), vec!["Accounts"]);
}

#[test]
fn garbage_matches_nothing() {
    let groups = engine().classify("!!not a thing!!", &ChainContext::new(Cluster::MainnetBeta));
    assert!(groups.is_empty());
}
