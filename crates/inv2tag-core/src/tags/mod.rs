//! Tag model: the normalized, hierarchical form of an inventory.
//!
//! Classes own their methods, and every stored URL is relative to the base
//! documentation URL; absolute URLs never leave the extractor. The model is
//! built once per run by [`extract`] and consumed once by the writer.

mod extract;
mod write;

pub use extract::extract;
pub use write::{render, write_tagfile, write_tagfile_at};

use indexmap::IndexMap;

/// A class and its methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassTag {
    /// Fully-qualified class name. Also the model key, so equal short names
    /// in different namespaces stay distinct.
    pub name: String,
    /// Documentation page, relative to the model's base URL.
    pub location: String,
    /// Method name (owning-class prefix stripped) to relative URL, in
    /// inventory order.
    pub methods: IndexMap<String, String>,
}

/// Normalized tag structure, ready for serialization.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TagModel {
    /// Documentation root all URLs are relative to.
    pub base_url: String,
    /// Fully-qualified class name to tag, in inventory order.
    pub classes: IndexMap<String, ClassTag>,
    /// Function-domain entries that matched no class prefix.
    pub free_functions: IndexMap<String, String>,
    /// Type-domain entries; never associated with a class.
    pub free_types: IndexMap<String, String>,
}
