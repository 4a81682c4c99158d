use std::io::{Read, Seek, Write};

use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

use crate::error::Error;
use crate::fields::{self, Fields};
use crate::layout::LayoutConstants;
use crate::section;
use crate::substitute::{Replacement, substitute};
use crate::xml;

/// One archive member, kept in archive order.
#[derive(Clone, Debug, PartialEq)]
pub struct Entry {
    pub name: String,
    pub data: Vec<u8>,
    pub compression: CompressionMethod,
}

/// `Contents/section<N>.xml`, any case. These are the only text entries the
/// engine rewrites; everything else is copied byte for byte.
pub fn is_section_entry(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower
        .strip_prefix("contents/section")
        .and_then(|rest| rest.strip_suffix(".xml"))
        .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}

pub fn read_package<R: Read + Seek>(reader: R) -> Result<Vec<Entry>, Error> {
    let mut zip = zip::ZipArchive::new(reader)?;
    let mut entries = Vec::with_capacity(zip.len());
    for i in 0..zip.len() {
        let mut file = zip.by_index(i)?;
        if file.is_dir() {
            continue;
        }
        let mut data = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut data)?;
        entries.push(Entry {
            name: file.name().to_string(),
            data,
            compression: file.compression(),
        });
    }
    Ok(entries)
}

/// Writes entries in order. Stored entries (the leading `mimetype` in
/// particular) stay stored; everything else is deflated.
pub fn write_package<W: Write + Seek>(writer: W, entries: &[Entry]) -> Result<W, Error> {
    let mut zip = zip::ZipWriter::new(writer);
    for entry in entries {
        let method = match entry.compression {
            CompressionMethod::Stored => CompressionMethod::Stored,
            _ => CompressionMethod::Deflated,
        };
        let options = SimpleFileOptions::default().compression_method(method);
        zip.start_file(entry.name.as_str(), options)?;
        zip.write_all(&entry.data)?;
    }
    Ok(zip.finish()?)
}

fn section_text(entry: &Entry) -> Result<&str, Error> {
    std::str::from_utf8(&entry.data)
        .map(|text| text.trim_start_matches('\u{feff}'))
        .map_err(|e| Error::InvalidHwpx(format!("{} is not UTF-8: {e}", entry.name)))
}

/// Field values read from the first section with the local extractor.
pub fn extract_fields(entries: &[Entry]) -> Result<Fields, Error> {
    let first = entries
        .iter()
        .find(|entry| is_section_entry(&entry.name))
        .ok_or_else(|| Error::InvalidHwpx("no Contents/section*.xml entry".into()))?;
    Ok(fields::extract_local(section_text(first)?))
}

/// Parse, substitute, reflow and re-serialize one section document.
pub fn process_section(
    text: &str,
    replacements: &[Replacement],
    constants: &LayoutConstants,
) -> Result<String, Error> {
    let mut doc = xml::parse(text)?;
    let rewritten = substitute(&mut doc.root, replacements);
    let reflowed = section::reflow_sections(&mut doc.root, constants);
    log::debug!("{rewritten} text node(s) rewritten, {reflowed} section(s) reflowed");
    Ok(xml::serialize(&doc))
}

/// Runs [`process_section`] over every section entry in place. Returns the
/// number of sections processed.
pub fn fill_package(
    entries: &mut [Entry],
    replacements: &[Replacement],
    constants: &LayoutConstants,
) -> Result<usize, Error> {
    let mut sections = 0;
    for entry in entries.iter_mut() {
        if !is_section_entry(&entry.name) {
            log::debug!("copying {} verbatim", entry.name);
            continue;
        }
        log::info!("processing {}", entry.name);
        let output = process_section(section_text(entry)?, replacements, constants)?;
        entry.data = output.into_bytes();
        sections += 1;
    }
    if sections == 0 {
        return Err(Error::InvalidHwpx("no Contents/section*.xml entry".into()));
    }
    Ok(sections)
}
