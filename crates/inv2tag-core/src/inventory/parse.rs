//! Inventory wire-format parsing (versions 1 and 2).
//!
//! The version is chosen by an exact match on the first line; anything else
//! is rejected before any record is read. Version 1 is a plain-text format
//! whose anchors are derived from the record name; version 2 compresses its
//! records with zlib.

use flate2::read::ZlibDecoder;
use indexmap::IndexMap;
use regex::Regex;
use std::io::Read;
use std::str;
use std::sync::LazyLock;
use thiserror::Error;
use url::Url;

use super::{DomainMap, Inventory, InventoryEntry};

const V1_MARKER: &str = "# Sphinx inventory version 1";
const V2_MARKER: &str = "# Sphinx inventory version 2";

/// Version-2 record: `name domain:role priority location dispname`.
/// Name and display name may contain spaces, so the name match is lazy.
static V2_RECORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?)\s+(\S+)\s+(-?\d+)\s+?(\S*)\s+(.*)$").expect("static record pattern")
});

/// Failure to decode an inventory.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// First line matched neither known version marker.
    #[error("unrecognized inventory format: {0:?}")]
    UnrecognizedFormat(String),
    /// The header ended before an expected line was seen.
    #[error("truncated inventory header: missing {0}")]
    TruncatedHeader(&'static str),
    /// Version-2 inventories must declare zlib compression in the header.
    #[error("inventory header does not declare zlib compression")]
    MissingZlibMarker,
    /// The compressed record block could not be inflated.
    #[error("inflate inventory records")]
    Inflate(#[source] std::io::Error),
    /// Header or records were not valid UTF-8.
    #[error("inventory is not valid UTF-8")]
    Encoding,
    /// A record line did not match the expected shape.
    #[error("malformed inventory record: {0:?}")]
    MalformedRecord(String),
    /// The base URL record locations are resolved against is invalid.
    #[error("invalid base URL: {0:?}")]
    BadBaseUrl(String),
}

/// Parse raw `objects.inv` bytes, resolving record locations against
/// `base_url`. Record order is preserved in the returned maps.
pub fn parse(bytes: &[u8], base_url: &str) -> Result<Inventory, InventoryError> {
    let base = Url::parse(base_url).map_err(|_| InventoryError::BadBaseUrl(base_url.to_string()))?;

    let (marker, rest) = header_line(bytes, "version marker")?;
    match marker {
        V1_MARKER => parse_v1(rest, &base),
        V2_MARKER => parse_v2(rest, &base),
        other => Err(InventoryError::UnrecognizedFormat(other.to_string())),
    }
}

fn parse_v1(rest: &[u8], base: &Url) -> Result<Inventory, InventoryError> {
    let (project_line, rest) = header_line(rest, "project header")?;
    let (version_line, rest) = header_line(rest, "version header")?;
    let body = str::from_utf8(rest).map_err(|_| InventoryError::Encoding)?;

    let mut inventory = Inventory {
        project: header_value(project_line, "# Project:"),
        version: header_value(version_line, "# Version:"),
        domains: IndexMap::new(),
    };

    for line in body.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let mut fields = line.split_whitespace();
        let (name, kind, location) = match (fields.next(), fields.next(), fields.next()) {
            (Some(name), Some(kind), Some(location)) => (name, kind, location),
            _ => return Err(InventoryError::MalformedRecord(line.to_string())),
        };
        // Version 1 predates explicit anchors; they are derived from the name.
        let (domain, anchor) = if kind == "mod" {
            ("py:module".to_string(), format!("#module-{}", name))
        } else {
            (format!("py:{}", kind), format!("#{}", name))
        };
        let uri = join_location(base, location)? + &anchor;
        insert(
            &mut inventory.domains,
            domain,
            name.to_string(),
            InventoryEntry {
                uri,
                display_name: "-".to_string(),
            },
        );
    }

    Ok(inventory)
}

fn parse_v2(rest: &[u8], base: &Url) -> Result<Inventory, InventoryError> {
    let (project_line, rest) = header_line(rest, "project header")?;
    let (version_line, rest) = header_line(rest, "version header")?;
    let (note_line, rest) = header_line(rest, "compression note")?;
    if !note_line.contains("zlib") {
        return Err(InventoryError::MissingZlibMarker);
    }

    let mut inflated = Vec::new();
    ZlibDecoder::new(rest)
        .read_to_end(&mut inflated)
        .map_err(InventoryError::Inflate)?;
    let records = str::from_utf8(&inflated).map_err(|_| InventoryError::Encoding)?;

    let mut inventory = Inventory {
        project: header_value(project_line, "# Project:"),
        version: header_value(version_line, "# Version:"),
        domains: IndexMap::new(),
    };

    for line in records.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let caps = V2_RECORD
            .captures(line)
            .ok_or_else(|| InventoryError::MalformedRecord(line.to_string()))?;
        let name = caps[1].to_string();
        let domain = caps[2].to_string();
        let location = &caps[4];
        let display_name = caps[5].trim().to_string();

        // Some badly formed inventories carry records without a domain
        // qualifier; skip them like the reference reader does.
        if !domain.contains(':') {
            continue;
        }
        // Older generators emitted duplicate py:module records; first wins.
        if domain == "py:module"
            && inventory
                .domains
                .get(&domain)
                .is_some_and(|entries| entries.contains_key(&name))
        {
            continue;
        }

        // A trailing `$` is wire shorthand for the record name.
        let location = match location.strip_suffix('$') {
            Some(stripped) => format!("{}{}", stripped, name),
            None => location.to_string(),
        };
        let uri = join_location(base, &location)?;
        insert(
            &mut inventory.domains,
            domain,
            name,
            InventoryEntry { uri, display_name },
        );
    }

    Ok(inventory)
}

/// Split one `\n`-terminated header line off the front of `bytes`.
fn header_line<'a>(
    bytes: &'a [u8],
    what: &'static str,
) -> Result<(&'a str, &'a [u8]), InventoryError> {
    let pos = bytes
        .iter()
        .position(|&b| b == b'\n')
        .ok_or(InventoryError::TruncatedHeader(what))?;
    let line = str::from_utf8(&bytes[..pos]).map_err(|_| InventoryError::Encoding)?;
    Ok((line.trim_end_matches('\r'), &bytes[pos + 1..]))
}

fn header_value(line: &str, prefix: &str) -> String {
    line.strip_prefix(prefix).unwrap_or(line).trim().to_string()
}

fn join_location(base: &Url, location: &str) -> Result<String, InventoryError> {
    let url = base
        .join(location)
        .map_err(|_| InventoryError::MalformedRecord(location.to_string()))?;
    Ok(url.to_string())
}

fn insert(
    domains: &mut IndexMap<String, DomainMap>,
    domain: String,
    name: String,
    entry: InventoryEntry,
) {
    domains.entry(domain).or_default().insert(name, entry);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::{DOMAIN_CLASS, DOMAIN_FUNCTION};
    use flate2::write::ZlibEncoder;
    use flate2::Compression;
    use std::io::Write;

    const BASE: &str = "https://docs.example.org/v1/";

    fn v2_inventory(records: &str) -> Vec<u8> {
        let mut bytes = Vec::from(
            &b"# Sphinx inventory version 2\n\
               # Project: xwidgets\n\
               # Version: 0.9\n\
               # The remainder of this file is compressed using zlib.\n"[..],
        );
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(records.as_bytes()).unwrap();
        bytes.extend_from_slice(&encoder.finish().unwrap());
        bytes
    }

    #[test]
    fn v2_parses_header_and_records_in_order() {
        let records = "ns::Widget cpp:class 1 classWidget.html -\n\
                       ns::Widget::resize cpp:function 1 classWidget.html#resize -\n\
                       ns::helper cpp:function 1 helper.html -\n";
        let inventory = parse(&v2_inventory(records), BASE).unwrap();

        assert_eq!(inventory.project, "xwidgets");
        assert_eq!(inventory.version, "0.9");

        let classes: Vec<_> = inventory.domain(DOMAIN_CLASS).collect();
        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].0, "ns::Widget");
        assert_eq!(
            classes[0].1.uri,
            "https://docs.example.org/v1/classWidget.html"
        );

        let functions: Vec<_> = inventory.domain(DOMAIN_FUNCTION).collect();
        assert_eq!(
            functions.iter().map(|(name, _)| *name).collect::<Vec<_>>(),
            vec!["ns::Widget::resize", "ns::helper"]
        );
    }

    #[test]
    fn v2_expands_dollar_location_shorthand() {
        let records = "ns::Widget cpp:class 1 classWidget.html#$ -\n";
        let inventory = parse(&v2_inventory(records), BASE).unwrap();
        let (_, entry) = inventory.domain(DOMAIN_CLASS).next().unwrap();
        assert_eq!(
            entry.uri,
            "https://docs.example.org/v1/classWidget.html#ns::Widget"
        );
    }

    #[test]
    fn v2_keeps_display_name() {
        let records = "ns::Widget cpp:class 1 classWidget.html ns::Widget<T>\n";
        let inventory = parse(&v2_inventory(records), BASE).unwrap();
        let (_, entry) = inventory.domain(DOMAIN_CLASS).next().unwrap();
        assert_eq!(entry.display_name, "ns::Widget<T>");
    }

    #[test]
    fn v2_skips_records_without_domain_qualifier() {
        let records = "broken std 1 broken.html -\n\
                       ns::Widget cpp:class 1 classWidget.html -\n";
        let inventory = parse(&v2_inventory(records), BASE).unwrap();
        assert_eq!(inventory.domain(DOMAIN_CLASS).count(), 1);
        assert!(inventory.domains.get("std").is_none());
    }

    #[test]
    fn v1_derives_anchor_from_name() {
        let bytes = b"# Sphinx inventory version 1\n\
                      # Project: xwidgets\n\
                      # Version: 0.9\n\
                      Widget class widget.html\n\
                      widgets mod widgets.html\n";
        let inventory = parse(bytes, BASE).unwrap();
        assert_eq!(
            inventory.domains["py:class"]["Widget"].uri,
            "https://docs.example.org/v1/widget.html#Widget"
        );
        assert_eq!(
            inventory.domains["py:module"]["widgets"].uri,
            "https://docs.example.org/v1/widgets.html#module-widgets"
        );
    }

    #[test]
    fn unknown_marker_is_rejected() {
        let bytes = b"# Sphinx inventory version 3\nanything\n";
        match parse(bytes, BASE) {
            Err(InventoryError::UnrecognizedFormat(line)) => {
                assert_eq!(line, "# Sphinx inventory version 3");
            }
            other => panic!("expected UnrecognizedFormat, got {:?}", other),
        }
    }

    #[test]
    fn truncated_header_is_rejected() {
        let bytes = b"# Sphinx inventory version 2\n# Project: x\n";
        match parse(bytes, BASE) {
            Err(InventoryError::TruncatedHeader(what)) => {
                assert_eq!(what, "version header");
            }
            other => panic!("expected TruncatedHeader, got {:?}", other),
        }
    }

    #[test]
    fn v2_requires_zlib_note() {
        let bytes = b"# Sphinx inventory version 2\n\
                      # Project: x\n\
                      # Version: 1\n\
                      # The remainder of this file is plain text.\n";
        assert!(matches!(
            parse(bytes, BASE),
            Err(InventoryError::MissingZlibMarker)
        ));
    }

    #[test]
    fn garbage_after_zlib_note_is_an_inflate_error() {
        let mut bytes = Vec::from(
            &b"# Sphinx inventory version 2\n\
               # Project: x\n\
               # Version: 1\n\
               # The remainder of this file is compressed using zlib.\n"[..],
        );
        bytes.extend_from_slice(b"not zlib data");
        assert!(matches!(
            parse(&bytes, BASE),
            Err(InventoryError::Inflate(_))
        ));
    }
}
