use crate::filename_date::local_from_naive;
use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDateTime};
use exif::{Exif, In, Reader, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

const DATE_TAGS: &[Tag] = &[Tag::DateTimeOriginal, Tag::DateTime];

/// Capture time from the primary IFD. `Ok(None)` when the container has EXIF
/// but no usable date field.
pub fn read_exif_date(path: &Path) -> Result<Option<DateTime<Local>>> {
    let file = File::open(path)
        .with_context(|| format!("could not open image for EXIF: {}", path.display()))?;
    let mut buf = BufReader::new(file);
    let exif = Reader::new()
        .read_from_container(&mut buf)
        .with_context(|| format!("could not parse EXIF: {}", path.display()))?;

    Ok(DATE_TAGS
        .iter()
        .find_map(|tag| field_ascii(&exif, *tag))
        .and_then(|raw| parse_exif_datetime(&raw)))
}

fn field_ascii(exif: &Exif, tag: Tag) -> Option<String> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    match &field.value {
        Value::Ascii(values) => values
            .first()
            .and_then(|bytes| String::from_utf8(bytes.clone()).ok())
            .map(|s| s.trim_end_matches('\0').trim().to_string())
            .filter(|s| !s.is_empty()),
        _ => None,
    }
}

fn parse_exif_datetime(value: &str) -> Option<DateTime<Local>> {
    let trimmed = value.trim().trim_matches('"');
    let candidates = ["%Y:%m:%d %H:%M:%S", "%Y-%m-%d %H:%M:%S"];
    candidates
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .and_then(local_from_naive)
}
