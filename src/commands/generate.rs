//! Generate command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::FamilyArg;
use crate::config::Config;
use crate::feed::AddressFamily;
use crate::pipeline;
use crate::util::format_bytes;

fn families(arg: FamilyArg) -> Vec<AddressFamily> {
    match arg {
        FamilyArg::Ipv4 => vec![AddressFamily::V4],
        FamilyArg::Ipv6 => vec![AddressFamily::V6],
        FamilyArg::All => vec![AddressFamily::V4, AddressFamily::V6],
    }
}

/// Run the generate command.
pub async fn run(family: FamilyArg, dry_run: bool, config_path: &Path) -> Result<()> {
    let config = Config::load_or_default(config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    for family in families(family) {
        if dry_run {
            let (script, counts) = pipeline::fetch_and_build(&config, family).await?;
            info!(
                "{}: {} registry / {} custom / {} final entries (dry run)",
                family, counts.registry, counts.custom, counts.final_blocks
            );
            println!("{}", script);
        } else {
            let report = pipeline::run(&config, family).await?;
            println!(
                "[OK] {} -> {} ({}, {} entries)",
                family,
                report.output_path.display(),
                format_bytes(report.bytes_written),
                report.counts.final_blocks
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_families_expansion() {
        assert_eq!(families(FamilyArg::Ipv4), vec![AddressFamily::V4]);
        assert_eq!(families(FamilyArg::Ipv6), vec![AddressFamily::V6]);
        assert_eq!(
            families(FamilyArg::All),
            vec![AddressFamily::V4, AddressFamily::V6]
        );
    }
}
