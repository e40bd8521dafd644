//! Doxygen tag-file serialization.
//!
//! Emits the `<tagfile>` schema Doxygen's TAGFILES option consumes. Type
//! entries reuse the `kind="function"` member shape; downstream tooling
//! keys on that shape, so it is kept.

use anyhow::{Context, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::TagModel;

/// Serialize `model` to an indented UTF-8 XML document with declaration.
///
/// Element order follows the model: base URL first, then one compound per
/// class (with its members), then free functions, then free types.
pub fn render(model: &TagModel) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new("tagfile")))?;

    text_element(&mut writer, "url", &model.base_url)?;

    for class in model.classes.values() {
        let mut compound = BytesStart::new("compound");
        compound.push_attribute(("kind", "class"));
        writer.write_event(Event::Start(compound))?;
        text_element(&mut writer, "name", &class.name)?;
        text_element(&mut writer, "filename", &class.location)?;
        for (method, location) in &class.methods {
            member(&mut writer, method, location)?;
        }
        writer.write_event(Event::End(BytesEnd::new("compound")))?;
    }

    for (name, location) in &model.free_functions {
        member(&mut writer, name, location)?;
    }
    for (name, location) in &model.free_types {
        member(&mut writer, name, location)?;
    }

    writer.write_event(Event::End(BytesEnd::new("tagfile")))?;

    let mut document = writer.into_inner();
    document.push(b'\n');
    String::from_utf8(document).context("serialized tag file is not UTF-8")
}

/// Render `model` and write it to `<dir>/<package>.tag`.
///
/// The document is rendered in full before the single write, so a failed
/// run never leaves a partially written tag file behind.
pub fn write_tagfile_at(model: &TagModel, package: &str, dir: &Path) -> Result<PathBuf> {
    let document = render(model)?;
    let path = dir.join(format!("{}.tag", package));
    fs::write(&path, document).with_context(|| format!("write {}", path.display()))?;
    tracing::info!("wrote tag file {}", path.display());
    Ok(path)
}

/// Like [`write_tagfile_at`], into the current directory.
pub fn write_tagfile(model: &TagModel, package: &str) -> Result<PathBuf> {
    write_tagfile_at(model, package, Path::new("."))
}

/// `<member kind="function">` with name and anchorfile children. Used for
/// class methods, free functions, and free types alike.
fn member<W: Write>(writer: &mut Writer<W>, name: &str, anchorfile: &str) -> Result<()> {
    let mut element = BytesStart::new("member");
    element.push_attribute(("kind", "function"));
    writer.write_event(Event::Start(element))?;
    text_element(writer, "name", name)?;
    text_element(writer, "anchorfile", anchorfile)?;
    writer.write_event(Event::End(BytesEnd::new("member")))?;
    Ok(())
}

fn text_element<W: Write>(writer: &mut Writer<W>, tag: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}
