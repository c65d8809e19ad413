//! Init-config command implementation.

use std::path::Path;

use anyhow::Result;

use crate::config::Config;

/// Write the default configuration to `config_path`. Refuses to overwrite
/// an existing file unless `force` is set.
pub fn run(force: bool, config_path: &Path) -> Result<()> {
    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists; pass --force to overwrite",
            config_path.display()
        );
    }

    Config::default().save(config_path)?;
    println!("Wrote default config to {}", config_path.display());
    Ok(())
}
