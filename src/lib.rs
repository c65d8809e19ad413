//! # roslist - RouterOS country address-list generator
//!
//! Fetches an RIR delegation file, extracts the address ranges assigned to
//! a target country, merges in manually configured ranges, collapses the
//! result into the minimal CIDR set, and writes a RouterOS firewall
//! address-list script that replaces the named list with the computed
//! ranges. IPv4 and IPv6 run as independent pipelines over the same feed.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                       roslist                          │
//! ├────────────────────────────────────────────────────────┤
//! │  CLI (clap)                                            │
//! │    └── Commands: generate, init-config, version        │
//! ├────────────────────────────────────────────────────────┤
//! │  Config (serde_yaml)                                   │
//! │    └── country, list name, feed URL, custom ranges     │
//! ├────────────────────────────────────────────────────────┤
//! │  Fetch (reqwest + rustls)                              │
//! │    └── one GET of the delegation feed, 30 s timeout    │
//! ├────────────────────────────────────────────────────────┤
//! │  Feed -> Normalize -> Collapse (ipnet)                 │
//! │    └── records to canonical blocks, minimal cover      │
//! ├────────────────────────────────────────────────────────┤
//! │  Render                                                │
//! │    └── RouterOS .rsc script, atomic write              │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use roslist::config::Config;
//! use roslist::feed::AddressFamily;
//! use roslist::pipeline;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load_or_default("roslist.yaml")?;
//!     let report = pipeline::run(&config, AddressFamily::V4).await?;
//!     println!("wrote {}", report.output_path.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`cli`] - Command-line interface definitions
//! - [`collapse`] - Minimal CIDR cover of a block collection
//! - [`commands`] - CLI command implementations
//! - [`config`] - Configuration parsing and validation
//! - [`feed`] - Delegation feed parsing
//! - [`fetch`] - HTTP client for the delegation feed
//! - [`normalize`] - Range-to-CIDR decomposition
//! - [`pipeline`] - Per-family orchestration
//! - [`render`] - RouterOS script rendering and persistence
//! - [`util`] - Formatting helpers

pub mod cli;
pub mod collapse;
pub mod commands;
pub mod config;
pub mod error;
pub mod feed;
pub mod fetch;
pub mod normalize;
pub mod pipeline;
pub mod render;
pub mod util;

pub use cli::{Cli, Commands, FamilyArg};
pub use config::Config;
pub use error::GenerateError;
