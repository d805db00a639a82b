//! lopdf helpers - pure Rust PDF decoding.

use std::collections::BTreeMap;

use lopdf::{Dictionary, Document, Object};

use super::ExtractionError;

/// Parse a PDF held in memory.
pub(super) fn load(bytes: &[u8]) -> Result<Document, ExtractionError> {
    Document::load_mem(bytes).map_err(|e| ExtractionError::Decode(e.to_string()))
}

const PAGE_SEPARATOR: &str = "\n\n";

/// Text layer of every page, in page order, pages separated by a blank line.
pub(super) fn page_text(document: &Document) -> Result<String, ExtractionError> {
    let pages = document
        .get_pages()
        .keys()
        .map(|&number| {
            document
                .extract_text(&[number])
                .map_err(|e| ExtractionError::Decode(e.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(pages.join(PAGE_SEPARATOR))
}

/// Read string entries of the trailer's `Info` dictionary.
pub(super) fn info_metadata(document: &Document) -> BTreeMap<String, String> {
    let info = match document.trailer.get(b"Info") {
        Ok(Object::Reference(id)) => document.get_dictionary(*id).ok(),
        Ok(Object::Dictionary(dict)) => Some(dict),
        _ => None,
    };

    info.map(string_entries).unwrap_or_default()
}

fn string_entries(dict: &Dictionary) -> BTreeMap<String, String> {
    dict.iter()
        .filter_map(|(key, value)| {
            let value = match value {
                Object::String(bytes, _) => decode_pdf_string(bytes),
                Object::Name(bytes) => String::from_utf8_lossy(bytes).into_owned(),
                _ => return None,
            };
            Some((String::from_utf8_lossy(key).into_owned(), value))
        })
        .collect()
}

/// Decode a PDF text string: UTF-16BE when it carries a BOM, otherwise
/// UTF-8 with a Latin-1 fallback.
fn decode_pdf_string(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = rest
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }

    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}
