//! RouterOS address-list script rendering.

use std::path::Path;

use chrono::{DateTime, Utc};
use ipnet::{IpNet, Ipv4Net};
use tracing::debug;

use crate::error::GenerateError;
use crate::feed::AddressFamily;

const BANNER: &str =
    "################################################################";

/// Everything the renderer needs for one script. Assembled once per run and
/// discarded after the script is written.
#[derive(Debug, Clone)]
pub struct AddressListSpec {
    pub country: String,
    pub list_name: String,
    pub family: AddressFamily,
    /// Data-source label for the header (e.g. "APNIC").
    pub source: String,
    /// Final blocks in emission order.
    pub blocks: Vec<IpNet>,
    /// Configured manual ranges. Already merged into `blocks`; kept here so
    /// their entries stay recognizable in the rendered script.
    pub custom_blocks: Vec<Ipv4Net>,
    /// Qualifying registry records before optimization.
    pub raw_count: usize,
    pub generated_at: DateTime<Utc>,
}

impl AddressListSpec {
    fn context_prefix(&self) -> &'static str {
        match self.family {
            AddressFamily::V4 => "/ip firewall address-list",
            AddressFamily::V6 => "/ipv6 firewall address-list",
        }
    }

    /// True when `block` overlaps one of the manual ranges.
    fn is_custom(&self, block: &IpNet) -> bool {
        let IpNet::V4(block) = block else {
            return false;
        };
        self.custom_blocks
            .iter()
            .any(|custom| custom.contains(block) || block.contains(custom))
    }
}

/// Render the literal script text: banner header with date, source, and
/// counts; a removal directive for the named list; then one add command per
/// block. Deterministic for a fixed spec.
pub fn render(spec: &AddressListSpec) -> String {
    let mut script = String::new();

    script.push_str(BANNER);
    script.push('\n');
    script.push_str(&format!(
        "# {} {} address list - generated {}\n",
        spec.country,
        spec.family,
        spec.generated_at.format("%Y-%m-%d")
    ));
    script.push_str(&format!(
        "# Source: {} | Registry entries: {} | Custom entries: {} | Optimized entries: {}\n",
        spec.source,
        spec.raw_count,
        spec.custom_blocks.len(),
        spec.blocks.len()
    ));
    script.push_str(BANNER);
    script.push('\n');

    script.push_str(&format!(
        "{} remove [find where list=\"{}\"]\n",
        spec.context_prefix(),
        spec.list_name
    ));
    script.push_str(spec.context_prefix());
    script.push('\n');

    for block in &spec.blocks {
        if spec.is_custom(block) {
            script.push_str(&format!(
                "add address={} list={} comment=\"Custom Range\"\n",
                block, spec.list_name
            ));
        } else {
            script.push_str(&format!("add address={} list={}\n", block, spec.list_name));
        }
    }

    script
}

/// Write `text` to `path`, replacing any existing file.
///
/// The write goes to a temporary file in the destination directory first,
/// then renames into place, so a failure cannot leave a truncated script
/// behind. Returns the number of bytes written.
pub fn persist(path: &Path, text: &str) -> Result<u64, GenerateError> {
    use std::io::Write;
    use tempfile::NamedTempFile;

    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut temp = NamedTempFile::new_in(parent).map_err(|e| {
        GenerateError::Io(format!(
            "failed to create temporary file in {}: {}",
            parent.display(),
            e
        ))
    })?;
    temp.write_all(text.as_bytes())
        .map_err(|e| GenerateError::Io(format!("failed to write script: {}", e)))?;
    temp.as_file()
        .sync_all()
        .map_err(|e| GenerateError::Io(format!("failed to flush script: {}", e)))?;
    temp.persist(path).map_err(|e| {
        GenerateError::Io(format!("failed to persist {}: {}", path.display(), e))
    })?;

    debug!("Wrote {} bytes to {}", text.len(), path.display());
    Ok(text.len() as u64)
}
