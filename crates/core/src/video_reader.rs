use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use std::process::Command;
use std::sync::OnceLock;

/// Seconds between 1904-01-01 (QuickTime epoch) and 1970-01-01.
const QT_TO_UNIX_OFFSET: i64 = 2_082_844_800;

#[derive(Debug, Clone, Copy)]
struct AtomRange {
    data_start: u64,
    data_end: u64,
}

/// Encoded date of a video, in local time.
///
/// ISO-BMFF containers (`.mp4`, `.mov`) are read natively from `moov/mvhd`.
/// Other containers are handed to `ffprobe` when it is installed; without it
/// they have no date.
pub fn read_video_date(path: &Path) -> Result<Option<DateTime<Local>>> {
    let mut file = File::open(path)
        .with_context(|| format!("could not open video: {}", path.display()))?;
    let file_len = file
        .metadata()
        .with_context(|| format!("could not stat video: {}", path.display()))?
        .len();

    if let Some(date) = read_mvhd_creation(&mut file, file_len) {
        return Ok(Some(date));
    }

    Ok(read_ffprobe_date(path))
}

fn read_mvhd_creation(file: &mut File, file_len: u64) -> Option<DateTime<Local>> {
    let moov = find_atom(file, 0, file_len, *b"moov")?;
    let mvhd = find_atom(file, moov.data_start, moov.data_end, *b"mvhd")?;
    file.seek(SeekFrom::Start(mvhd.data_start)).ok()?;

    let mut ver_flags = [0u8; 4];
    file.read_exact(&mut ver_flags).ok()?;
    let qt_seconds = if ver_flags[0] == 1 {
        let mut buf = [0u8; 8];
        file.read_exact(&mut buf).ok()?;
        u64::from_be_bytes(buf)
    } else {
        let mut buf = [0u8; 4];
        file.read_exact(&mut buf).ok()?;
        u64::from(u32::from_be_bytes(buf))
    };
    qt_seconds_to_local(qt_seconds)
}

fn find_atom(file: &mut File, start: u64, end: u64, atom_type: [u8; 4]) -> Option<AtomRange> {
    let mut offset = start;
    while offset + 8 <= end {
        file.seek(SeekFrom::Start(offset)).ok()?;
        let mut header = [0u8; 8];
        file.read_exact(&mut header).ok()?;
        let mut atom_size = u64::from(u32::from_be_bytes([
            header[0], header[1], header[2], header[3],
        ]));
        let atom_kind = [header[4], header[5], header[6], header[7]];
        let mut header_size = 8u64;

        if atom_size == 1 {
            let mut ext = [0u8; 8];
            file.read_exact(&mut ext).ok()?;
            atom_size = u64::from_be_bytes(ext);
            header_size = 16;
        } else if atom_size == 0 {
            atom_size = end.saturating_sub(offset);
        }
        if atom_size < header_size {
            return None;
        }
        let atom_end = offset.saturating_add(atom_size).min(end);

        if atom_kind == atom_type {
            return Some(AtomRange {
                data_start: offset + header_size,
                data_end: atom_end,
            });
        }
        offset = atom_end;
    }
    None
}

fn qt_seconds_to_local(qt_seconds: u64) -> Option<DateTime<Local>> {
    // zero means the muxer never set it
    if qt_seconds == 0 {
        return None;
    }
    let unix = i64::try_from(qt_seconds).ok()?.checked_sub(QT_TO_UNIX_OFFSET)?;
    let utc = DateTime::<Utc>::from_timestamp(unix, 0)?;
    Some(utc.with_timezone(&Local))
}

fn ffprobe_available() -> bool {
    static AVAILABLE: OnceLock<bool> = OnceLock::new();
    *AVAILABLE.get_or_init(|| {
        Command::new("ffprobe")
            .arg("-version")
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    })
}

fn read_ffprobe_date(path: &Path) -> Option<DateTime<Local>> {
    if !ffprobe_available() {
        log::debug!("ffprobe not available, no container date for {}", path.display());
        return None;
    }
    let output = Command::new("ffprobe")
        .args(["-v", "error", "-show_entries"])
        .arg("format_tags=creation_time:stream_tags=creation_time")
        .args(["-of", "default=nokey=1:noprint_wrappers=1"])
        .arg(path)
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .find_map(|line| DateTime::parse_from_rfc3339(line.trim()).ok())
        .map(|dt| dt.with_timezone(&Local))
}

#[cfg(test)]
pub(crate) fn mp4_with_creation_time(qt_seconds: u32) -> Vec<u8> {
    let mut mvhd = Vec::new();
    mvhd.extend_from_slice(&20u32.to_be_bytes());
    mvhd.extend_from_slice(b"mvhd");
    mvhd.extend_from_slice(&[0, 0, 0, 0]);
    mvhd.extend_from_slice(&qt_seconds.to_be_bytes());
    mvhd.extend_from_slice(&qt_seconds.to_be_bytes());

    let mut out = Vec::new();
    out.extend_from_slice(&16u32.to_be_bytes());
    out.extend_from_slice(b"ftypisom");
    out.extend_from_slice(&[0, 0, 2, 0]);
    out.extend_from_slice(&(8 + mvhd.len() as u32).to_be_bytes());
    out.extend_from_slice(b"moov");
    out.extend_from_slice(&mvhd);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    // 2022-01-03T12:00:00Z
    const SAMPLE_UNIX: i64 = 1_641_211_200;

    #[test]
    fn reads_mvhd_creation_time() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("clip.mp4");
        let qt = (SAMPLE_UNIX + QT_TO_UNIX_OFFSET) as u32;
        fs::write(&path, mp4_with_creation_time(qt)).expect("write mp4");

        let date = read_video_date(&path).expect("readable").expect("dated");
        assert_eq!(date.timestamp(), SAMPLE_UNIX);
    }

    #[test]
    fn zero_creation_time_is_absent() {
        assert!(qt_seconds_to_local(0).is_none());
    }

    #[test]
    fn pre_unix_epoch_quicktime_times_convert() {
        let date = qt_seconds_to_local(1).expect("valid");
        assert_eq!(date.timestamp(), 1 - QT_TO_UNIX_OFFSET);
    }

    #[test]
    fn truncated_atom_does_not_panic() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("broken.mov");
        let mut bytes = mp4_with_creation_time(5);
        bytes.truncate(30);
        fs::write(&path, bytes).expect("write");

        let mut file = File::open(&path).expect("open");
        let len = file.metadata().expect("meta").len();
        assert!(read_mvhd_creation(&mut file, len).is_none());
    }

    #[test]
    fn missing_file_is_an_error() {
        let temp = tempdir().expect("tempdir");
        assert!(read_video_date(&temp.path().join("gone.mp4")).is_err());
    }
}
