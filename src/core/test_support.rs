//! Fixtures shared by unit tests.

use chrono::{NaiveDate, NaiveDateTime};
use std::path::PathBuf;

use super::scanner::FileDescriptor;
use super::timestamp::DateSource;

#[path = "../../tests/common/mod.rs"]
mod common;

pub use common::jpeg_with_date_taken;

/// 2024-01-15 00:00:00
pub fn base_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 15)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// An in-memory descriptor that never touches the disk
pub fn descriptor(path: &str, date: NaiveDateTime) -> FileDescriptor {
    FileDescriptor::new(PathBuf::from(path), date, DateSource::FileSystem)
}
