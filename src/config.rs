// Command-line configuration for the solx binary
// Priority: CLI args > Environment variables > Config file > Defaults

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::types::{ChainContext, Cluster};

/// solx - Solana explorer search from the terminal
///
/// Classifies a search query the way the explorer search bar does, or
/// decodes a base64 transaction for the inspector.
#[derive(Parser, Debug, Default)]
#[command(name = "solx")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Solana explorer search bar classifier", long_about = None)]
pub struct CliArgs {
    /// Search query (address, signature, slot, epoch, program name, ...)
    #[arg(conflicts_with = "inspect")]
    pub query: Option<String>,

    /// Decode a base64 transaction or message instead of searching
    #[arg(long)]
    pub inspect: Option<String>,

    /// Cluster: mainnet-beta, testnet, devnet or custom
    #[arg(short, long, env = "SOLX_CLUSTER", value_parser = clap::value_parser!(Cluster))]
    pub cluster: Option<Cluster>,

    /// Current epoch, enables epoch suggestions
    #[arg(long, env = "SOLX_CURRENT_EPOCH")]
    pub current_epoch: Option<u64>,

    /// Token list JSON used for token search
    #[arg(long, env = "SOLX_TOKEN_LIST")]
    pub token_list: Option<PathBuf>,

    /// TOML table of known domains
    #[arg(long, env = "SOLX_DOMAINS")]
    pub domains: Option<PathBuf>,

    /// Feature gate JSON replacing the bundled list
    #[arg(long, env = "SOLX_FEATURE_GATES")]
    pub feature_gates: Option<PathBuf>,

    /// Optional config file path (TOML format)
    #[arg(long, env = "SOLX_CONFIG")]
    pub config_file: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow!("Invalid format '{s}'. Valid options: text, json")),
        }
    }
}

/// What the binary was asked to do
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    Search(String),
    Inspect(String),
}

/// Configuration loaded from TOML file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    pub cluster: Option<String>,
    pub current_epoch: Option<u64>,
    pub token_list: Option<PathBuf>,
    pub domains: Option<PathBuf>,
    pub feature_gates: Option<PathBuf>,
    pub format: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub mode: Mode,
    pub cluster: Cluster,
    pub current_epoch: Option<u64>,
    pub token_list: Option<PathBuf>,
    pub domains: Option<PathBuf>,
    pub feature_gates: Option<PathBuf>,
    pub format: OutputFormat,
}

impl Config {
    pub fn chain_context(&self) -> ChainContext {
        ChainContext {
            current_epoch: self.current_epoch,
            cluster: self.cluster,
        }
    }
}

/// Load configuration from CLI args, environment variables and config file
pub fn load() -> Result<Config> {
    from_args(CliArgs::parse())
}

/// Resolve parsed arguments against the optional config file and defaults
pub fn from_args(args: CliArgs) -> Result<Config> {
    let file = match &args.config_file {
        Some(path) => {
            log::info!("Loading configuration from {}", path.display());
            load_file(path)?
        }
        None => ConfigFile::default(),
    };

    let mode = match (args.query, args.inspect) {
        (_, Some(blob)) => Mode::Inspect(blob),
        (Some(query), None) => Mode::Search(query),
        (None, None) => return Err(anyhow!("Nothing to do: pass a search query or --inspect <BASE64>")),
    };

    let cluster = match args.cluster {
        Some(cluster) => cluster,
        None => file
            .cluster
            .as_deref()
            .map(str::parse)
            .transpose()
            .context("Invalid cluster in config file")?
            .unwrap_or(Cluster::MainnetBeta),
    };

    let format = if args.json {
        OutputFormat::Json
    } else {
        file.format
            .as_deref()
            .map(str::parse)
            .transpose()
            .context("Invalid format in config file")?
            .unwrap_or(OutputFormat::Text)
    };

    Ok(Config {
        mode,
        cluster,
        current_epoch: args.current_epoch.or(file.current_epoch),
        token_list: args.token_list.or(file.token_list),
        domains: args.domains.or(file.domains),
        feature_gates: args.feature_gates.or(file.feature_gates),
        format,
    })
}

fn load_file(path: &Path) -> Result<ConfigFile> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse_file(&contents).with_context(|| format!("Failed to parse TOML config: {}", path.display()))
}

fn parse_file(contents: &str) -> Result<ConfigFile> {
    Ok(toml::from_str(contents)?)
}

impl Config {
    /// Log the effective configuration at debug level
    pub fn log_summary(&self) {
        log::debug!("solx configuration:");
        log::debug!("  Cluster: {}", self.cluster);
        match self.current_epoch {
            Some(epoch) => log::debug!("  Current epoch: {epoch}"),
            None => log::debug!("  Current epoch: unknown (no epoch suggestions)"),
        }
        if let Some(path) = &self.token_list {
            log::debug!("  Token list: {}", path.display());
        }
        if let Some(path) = &self.domains {
            log::debug!("  Domains: {}", path.display());
        }
        if let Some(path) = &self.feature_gates {
            log::debug!("  Feature gates: {}", path.display());
        }
    }
}
