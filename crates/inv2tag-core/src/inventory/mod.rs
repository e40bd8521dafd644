//! Sphinx object-inventory retrieval and parsing.
//!
//! An inventory (`objects.inv`) maps fully-qualified symbol names to the
//! absolute URL of their documentation page, partitioned by domain
//! ("cpp:class", "cpp:function", ...). Two wire formats exist, selected by
//! an exact first-line marker; version 2 compresses its records with zlib.

mod fetch;
mod parse;

pub use parse::{parse, InventoryError};

use anyhow::{Context, Result};
use indexmap::IndexMap;

/// Domain key for C++ classes.
pub const DOMAIN_CLASS: &str = "cpp:class";
/// Domain key for C++ functions and class methods (indistinguishable here
/// except by name shape).
pub const DOMAIN_FUNCTION: &str = "cpp:function";
/// Domain key for C++ type aliases.
pub const DOMAIN_TYPE: &str = "cpp:type";

/// One inventory record: where a symbol's documentation lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryEntry {
    /// Absolute URL of the documentation page, anchor included.
    pub uri: String,
    /// Display name; `-` on the wire means "same as the key".
    pub display_name: String,
}

/// Per-domain map from fully-qualified symbol name to its entry. Iteration
/// order is the inventory's own record order; extraction and serialization
/// preserve it, so it is part of the contract.
pub type DomainMap = IndexMap<String, InventoryEntry>;

/// A parsed inventory.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Inventory {
    pub project: String,
    pub version: String,
    /// Domain key ("cpp:class", ...) to symbol map, in file order.
    pub domains: IndexMap<String, DomainMap>,
}

impl Inventory {
    /// Entries for a domain, in record order; empty if the domain is absent.
    pub fn domain(&self, key: &str) -> impl Iterator<Item = (&str, &InventoryEntry)> {
        self.domains
            .get(key)
            .into_iter()
            .flat_map(|entries| entries.iter().map(|(name, entry)| (name.as_str(), entry)))
    }
}

/// Fetch `objects.inv` relative to `base_url` and parse it.
pub fn load(base_url: &str) -> Result<Inventory> {
    let bytes = fetch::fetch_bytes(base_url)?;
    let inventory =
        parse(&bytes, base_url).with_context(|| format!("parse inventory from {}", base_url))?;
    Ok(inventory)
}
