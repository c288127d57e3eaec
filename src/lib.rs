//! solx - Solana explorer search bar logic
//!
//! This library turns whatever a user types into an explorer search bar into
//! grouped navigation suggestions: named programs, sysvars, feature gates,
//! slots, epochs, raw addresses and signatures, tokens, domains, and pasted
//! base64 transactions (routed to the transaction inspector).
//!
//! ## Layout
//!
//! - [`search`] - classification and the full concurrent search
//! - [`registry`] - static tables of well-known addresses
//! - [`tx_decode`] / [`inspector`] - raw transaction decoding and inspector links
//! - [`collaborators`] - token search and domain resolution seams
//!
//! ## Usage
//!
//! ```bash
//! cargo run -- --current-epoch 600 1234
//! cargo run -- --inspect AQAB...
//! ```

// Core modules
pub mod numeric;
pub mod registry;
pub mod types;

// Decoding
pub mod inspector;
pub mod tx_decode;

// Search
pub mod collaborators;
pub mod search;

// Configuration (CLI args, env, TOML file)
pub mod config;

pub use search::SearchEngine;
pub use types::{ChainContext, Cluster, DecodedTransaction, SearchCandidate, SearchGroup};
