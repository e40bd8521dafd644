//! Convert command: fetch the inventory, extract tags, write the tag file.

use anyhow::Result;
use inv2tag_core::inventory;
use inv2tag_core::tags;

/// Fetch the inventory at `url`, build the tag model, and write
/// `<package>.tag` into the current directory.
pub fn run_convert(package: &str, url: &str) -> Result<()> {
    let inventory = inventory::load(url)?;
    tracing::debug!(
        "inventory for {} {}: {} domains",
        inventory.project,
        inventory.version,
        inventory.domains.len()
    );

    let model = tags::extract(&inventory, url);
    let path = tags::write_tagfile(&model, package)?;
    println!("{}", path.display());
    Ok(())
}
