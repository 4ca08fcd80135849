//! # Timestamp Module
//!
//! Works out when a file was created, trying the most trustworthy source first:
//!
//! 1. **File name** - names like `20240115-143000_beach.jpg` carry their own timestamp
//! 2. **EXIF** - the `DateTimeOriginal` tag (0x9003) of PNG, JPEG and GIF files
//! 3. **Filesystem** - the earlier of creation and modification time
//!
//! Resolution never fails; the filesystem tier always produces a value.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use exif::{In, Reader, Tag, Value};
use serde::{Deserialize, Serialize};
use std::fs::{File, Metadata};
use std::io::BufReader;
use std::path::Path;
use std::time::SystemTime;
use tracing::debug;

/// Width of the `YYYYMMDD-HHMMSS` prefix
const NORMALIZED_PREFIX_LEN: usize = 15;

/// Extensions worth opening to look for EXIF data
const EXIF_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg", ".gif"];

/// Which tier produced a file's date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateSource {
    FileName,
    Exif,
    FileSystem,
}

impl std::fmt::Display for DateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateSource::FileName => write!(f, "file name"),
            DateSource::Exif => write!(f, "EXIF"),
            DateSource::FileSystem => write!(f, "filesystem"),
        }
    }
}

/// Resolves the canonical date of a single file
pub struct TimestampResolver;

impl TimestampResolver {
    /// Resolve the date of `path`.
    ///
    /// `metadata` must belong to `path`; the scanner has already read it.
    pub fn resolve(path: &Path, metadata: &Metadata) -> (NaiveDateTime, DateSource) {
        if let Some(date) = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(parse_normalized_name)
        {
            return (date, DateSource::FileName);
        }

        if Self::may_have_exif(path) {
            if let Some(date) = exif_date_taken(path) {
                return (date, DateSource::Exif);
            }
        }

        (filesystem_date(metadata), DateSource::FileSystem)
    }

    fn may_have_exif(path: &Path) -> bool {
        let ext = lowercase_extension(path);
        EXIF_EXTENSIONS.contains(&ext.as_str())
    }
}

/// Lowercased extension including the leading dot, or an empty string
pub fn lowercase_extension(path: &Path) -> String {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

/// Parse the `YYYYMMDD-HHMMSS` prefix of a file stem.
///
/// Anything after the first 15 characters is ignored.
pub fn parse_normalized_name(stem: &str) -> Option<NaiveDateTime> {
    let prefix: String = stem.chars().take(NORMALIZED_PREFIX_LEN).collect();
    if prefix.chars().count() < NORMALIZED_PREFIX_LEN {
        return None;
    }

    // chrono accepts a leading sign on %Y, so check the shape first
    let shape_ok = prefix.char_indices().all(|(i, c)| {
        if i == 8 {
            c == '-'
        } else {
            c.is_ascii_digit()
        }
    });
    if !shape_ok {
        return None;
    }

    NaiveDateTime::parse_from_str(&prefix, "%Y%m%d-%H%M%S").ok()
}

/// Parse an EXIF date string of the form `YYYY:MM:DD HH:MM:SS`
pub fn parse_exif_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim_matches(|c: char| c == '\0' || c.is_whitespace());
    let fields: Vec<&str> = value.split([':', ' ']).collect();
    if fields.len() != 6 {
        return None;
    }

    let year: i32 = fields[0].parse().ok()?;
    let numbers = fields[1..]
        .iter()
        .map(|f| f.parse::<u32>().ok())
        .collect::<Option<Vec<u32>>>()?;

    NaiveDate::from_ymd_opt(year, numbers[0], numbers[1])?.and_hms_opt(
        numbers[2],
        numbers[3],
        numbers[4],
    )
}

/// Read the "date taken" tag from a file's embedded EXIF data.
///
/// Every failure (unreadable file, no EXIF block, malformed value) yields `None`.
pub fn exif_date_taken(path: &Path) -> Option<NaiveDateTime> {
    let file = File::open(path).ok()?;
    let mut reader = BufReader::new(file);
    let exif = match Reader::new().read_from_container(&mut reader) {
        Ok(exif) => exif,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "no readable EXIF block");
            return None;
        }
    };

    let field = exif.get_field(Tag::DateTimeOriginal, In::PRIMARY)?;
    match field.value {
        Value::Ascii(ref values) => {
            let bytes = values.first()?;
            let text = std::str::from_utf8(bytes).ok()?;
            parse_exif_datetime(text)
        }
        _ => None,
    }
}

/// The earlier of the creation and modification times, in local time.
///
/// Copying a file usually resets its creation time but keeps the
/// modification time, so the minimum is the better guess.
pub fn filesystem_date(metadata: &Metadata) -> NaiveDateTime {
    let earliest = match (metadata.created().ok(), metadata.modified().ok()) {
        (Some(created), Some(modified)) => created.min(modified),
        (Some(t), None) | (None, Some(t)) => t,
        (None, None) => SystemTime::UNIX_EPOCH,
    };
    to_local(earliest)
}

/// Convert a filesystem timestamp to local wall-clock time
pub fn to_local(time: SystemTime) -> NaiveDateTime {
    DateTime::<Local>::from(time).naive_local()
}
