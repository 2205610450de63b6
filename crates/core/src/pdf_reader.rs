use crate::filename_date::local_from_naive;
use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Local, NaiveDateTime};
use lopdf::{Dictionary, Document, Object};
use std::path::Path;

/// `/CreationDate` of the document-info dictionary, in local time.
pub fn read_pdf_creation_date(path: &Path) -> Result<Option<DateTime<Local>>> {
    let doc = Document::load(path)
        .with_context(|| format!("could not open document: {}", path.display()))?;

    let Some(info) = info_dictionary(&doc) else {
        return Ok(None);
    };
    let Some(raw) = info.get(b"CreationDate").ok().and_then(|v| v.as_str().ok()) else {
        return Ok(None);
    };

    Ok(parse_pdf_date(&decode_pdf_text(raw)))
}

fn info_dictionary(doc: &Document) -> Option<&Dictionary> {
    match doc.trailer.get(b"Info").ok()? {
        Object::Reference(id) => doc.get_dictionary(*id).ok(),
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}

/// PDF text strings are either PDFDocEncoding or UTF-16BE with a BOM.
fn decode_pdf_text(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = rest
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    bytes.iter().map(|b| char::from(*b)).collect()
}

/// Parses `D:YYYYMMDDHHMMSS` with an optional `Z`, `Z00'00'`, `+HHMM` or
/// `-HHMM` suffix (apostrophes such as `+01'00'` are tolerated). Without a suffix the value
/// is taken as local wall time.
pub fn parse_pdf_date(raw: &str) -> Option<DateTime<Local>> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != '\'').collect();
    let body = cleaned.strip_prefix("D:")?;
    let digits = body.get(..14)?;
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let offset = &body[14..];

    if offset.is_empty() {
        let naive = NaiveDateTime::parse_from_str(digits, "%Y%m%d%H%M%S").ok()?;
        return local_from_naive(naive);
    }

    let offset = match offset.strip_prefix('Z') {
        Some("") => "+0000".to_string(),
        Some(rest) => format!("+{rest}"),
        None => offset.to_string(),
    };
    let stamp = format!("{digits}{offset}");
    DateTime::<FixedOffset>::parse_from_str(&stamp, "%Y%m%d%H%M%S%z")
        .ok()
        .map(|dt| dt.with_timezone(&Local))
}
