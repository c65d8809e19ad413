//! Per-family generation pipeline.
//!
//! One run is a straight line: fetch, check, filter, normalize, merge,
//! collapse, render, persist. The first error aborts the run; there are no
//! retries.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use ipnet::{IpNet, Ipv4Net, Ipv6Net};
use tracing::info;

use crate::collapse::{collapse_v4, collapse_v6};
use crate::config::Config;
use crate::error::GenerateError;
use crate::feed::{check_feed, qualifying_records, AddressFamily, FeedFilter};
use crate::fetch::Fetcher;
use crate::normalize::{record_to_v4_nets, record_to_v6_net};
use crate::render::{persist, render, AddressListSpec};
use crate::util::{format_bytes, format_count};

/// Entry counts for one generated script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunCounts {
    /// Qualifying registry records.
    pub registry: usize,
    /// Configured manual ranges.
    pub custom: usize,
    /// Blocks in the rendered script.
    pub final_blocks: usize,
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub output_path: PathBuf,
    pub bytes_written: u64,
    pub counts: RunCounts,
}

/// Fetch the feed and build the script for one address family, without
/// writing anything.
pub async fn fetch_and_build(
    config: &Config,
    family: AddressFamily,
) -> Result<(String, RunCounts), GenerateError> {
    let fetcher = Fetcher::new(config.timeout())?;
    let feed = fetcher.fetch_feed(&config.delegation_url).await?;
    build_script(&feed, config, family, Utc::now())
}

/// Fetch the feed and write the script for one address family.
pub async fn run(config: &Config, family: AddressFamily) -> Result<RunReport, GenerateError> {
    info!("Generating {} address list for {}", family, config.country);

    let (script, counts) = fetch_and_build(config, family).await?;

    let output = config.output_for(family);
    let bytes_written = persist(output, &script)?;
    info!(
        "Generated {} ({})",
        output.display(),
        format_bytes(bytes_written)
    );

    Ok(RunReport {
        output_path: output.to_path_buf(),
        bytes_written,
        counts,
    })
}

/// Everything between fetch and persist. Pure, so tests can drive it with
/// fixture feeds and a fixed timestamp.
pub fn build_script(
    feed: &str,
    config: &Config,
    family: AddressFamily,
    generated_at: DateTime<Utc>,
) -> Result<(String, RunCounts), GenerateError> {
    check_feed(feed)?;

    let filter = FeedFilter {
        registry: config.registry.clone(),
        country: config.country.clone(),
        family,
    };
    let records = qualifying_records(feed, &filter).collect::<Result<Vec<_>, _>>()?;
    info!(
        "Found {} qualifying {} records",
        format_count(records.len()),
        family
    );

    let (blocks, custom_blocks) = match family {
        AddressFamily::V4 => {
            let mut nets: Vec<Ipv4Net> = Vec::new();
            for record in &records {
                nets.extend(record_to_v4_nets(record)?);
            }

            let custom = config.custom_v4_nets()?;
            nets.extend(custom.iter().copied());

            let merged = maybe_collapse(config, nets, collapse_v4);
            (merged.into_iter().map(IpNet::V4).collect(), custom)
        }
        AddressFamily::V6 => {
            let mut nets: Vec<Ipv6Net> = Vec::new();
            for record in &records {
                nets.push(record_to_v6_net(record)?);
            }

            let merged = maybe_collapse(config, nets, collapse_v6);
            (merged.into_iter().map(IpNet::V6).collect(), Vec::new())
        }
    };

    let spec = AddressListSpec {
        country: config.country.clone(),
        list_name: config.list_name.clone(),
        family,
        source: config.source_label(),
        blocks,
        custom_blocks,
        raw_count: records.len(),
        generated_at,
    };

    let counts = RunCounts {
        registry: spec.raw_count,
        custom: spec.custom_blocks.len(),
        final_blocks: spec.blocks.len(),
    };

    Ok((render(&spec), counts))
}

fn maybe_collapse<N>(config: &Config, nets: Vec<N>, collapse: impl Fn(&[N]) -> Vec<N>) -> Vec<N> {
    if !config.collapse {
        return nets;
    }
    let collapsed = collapse(&nets);
    info!(
        "Collapsed {} blocks into {}",
        format_count(nets.len()),
        format_count(collapsed.len())
    );
    collapsed
}
