// Native binary for solx - one-shot search from the terminal

use anyhow::{Context, Result};
use std::sync::Arc;

use solx::{
    collaborators::{DomainResolver, NoDomains, NoTokens, StaticDomains, TokenList, TokenSearch},
    config::{load, Config, Mode, OutputFormat},
    registry::Registry,
    search::SearchEngine,
    tx_decode::decode_transaction_from_base64,
    types::SearchGroup,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (safe to ignore if not found)
    #[cfg(feature = "native")]
    {
        let _ = dotenvy::dotenv();
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cfg = load().context("Failed to load configuration")?;
    cfg.log_summary();

    match &cfg.mode {
        Mode::Search(query) => search(&cfg, query).await,
        Mode::Inspect(blob) => inspect(&cfg, blob),
    }
}

async fn search(cfg: &Config, query: &str) -> Result<()> {
    let registry = match &cfg.feature_gates {
        Some(path) => Registry::builtin()?.with_feature_gates_file(path)?,
        None => Registry::builtin()?,
    };
    let engine = SearchEngine::new(Arc::new(registry));

    let tokens: Box<dyn TokenSearch> = match &cfg.token_list {
        Some(path) => Box::new(TokenList::load(path)?),
        None => Box::new(NoTokens),
    };
    let domains: Box<dyn DomainResolver> = match &cfg.domains {
        Some(path) => Box::new(StaticDomains::load(path)?),
        None => Box::new(NoDomains),
    };

    let groups = engine
        .perform_search(query, &cfg.chain_context(), tokens.as_ref(), domains.as_ref())
        .await;

    match cfg.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&groups)?),
        OutputFormat::Text => print_groups(&groups),
    }
    Ok(())
}

fn inspect(cfg: &Config, blob: &str) -> Result<()> {
    let Some(decoded) = decode_transaction_from_base64(blob) else {
        eprintln!("not a transaction");
        std::process::exit(1);
    };

    match cfg.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&decoded)?),
        OutputFormat::Text => {
            println!("message: {}", decoded.message);
            match &decoded.signatures {
                Some(signatures) => {
                    println!("signatures ({}):", signatures.len());
                    for sig in signatures {
                        println!("  {sig}");
                    }
                }
                None => println!("signatures: none (bare message)"),
            }
            println!("inspector: {}", solx::inspector::inspector_pathname(&decoded)?);
        }
    }
    Ok(())
}

fn print_groups(groups: &[SearchGroup]) {
    if groups.is_empty() {
        println!("No results");
        return;
    }
    for group in groups {
        println!("{}", group.label);
        for option in &group.options {
            println!("  {:<40} {}", option.label, option.pathname);
        }
    }
}
