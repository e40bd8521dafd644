//! Inventory to tag-model extraction.

use indexmap::IndexMap;

use crate::inventory::{Inventory, DOMAIN_CLASS, DOMAIN_FUNCTION, DOMAIN_TYPE};

use super::{ClassTag, TagModel};

/// Build a [`TagModel`] from `inventory`, relativizing every URL against
/// `base_url`.
///
/// Classes are registered first, in inventory order. Function entries are
/// then attached to the class whose `Name::` occurs in the qualified name;
/// when several registered classes match (nested classes), the longest class
/// name wins, with registration order breaking ties. Unmatched functions
/// become free functions, and type entries pass through unmatched. Only the
/// class, function, and type domains are read; other domains are ignored.
pub fn extract(inventory: &Inventory, base_url: &str) -> TagModel {
    let mut model = TagModel {
        base_url: base_url.to_string(),
        ..TagModel::default()
    };

    for (name, entry) in inventory.domain(DOMAIN_CLASS) {
        model.classes.insert(
            name.to_string(),
            ClassTag {
                name: name.to_string(),
                location: relativize(&entry.uri, base_url),
                methods: IndexMap::new(),
            },
        );
    }

    for (name, entry) in inventory.domain(DOMAIN_FUNCTION) {
        let relative = relativize(&entry.uri, base_url);
        match owning_class(&model, name) {
            Some(class_key) => {
                let needle = format!("{}::", class_key);
                let method = name.replacen(&needle, "", 1);
                if let Some(class) = model.classes.get_mut(&class_key) {
                    class.methods.insert(method, relative);
                }
            }
            None => {
                model.free_functions.insert(name.to_string(), relative);
            }
        }
    }

    for (name, entry) in inventory.domain(DOMAIN_TYPE) {
        model
            .free_types
            .insert(name.to_string(), relativize(&entry.uri, base_url));
    }

    tracing::debug!(
        "extracted {} classes, {} free functions, {} types",
        model.classes.len(),
        model.free_functions.len(),
        model.free_types.len()
    );
    model
}

/// Longest-match class lookup: among registered classes whose `Name::`
/// occurs in `qualified`, pick the longest name; ties go to the earlier
/// registration.
fn owning_class(model: &TagModel, qualified: &str) -> Option<String> {
    let mut best: Option<&str> = None;
    for class in model.classes.keys() {
        let needle = format!("{}::", class);
        if qualified.contains(&needle) && best.map_or(true, |b| class.len() > b.len()) {
            best = Some(class);
        }
    }
    best.map(str::to_string)
}

/// Strip the base-URL prefix; a URL outside the base is kept as-is.
fn relativize(absolute: &str, base_url: &str) -> String {
    absolute
        .strip_prefix(base_url)
        .unwrap_or(absolute)
        .to_string()
}
