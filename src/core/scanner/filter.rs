//! Media classification by file extension.

use serde::{Deserialize, Serialize};

/// Extensions treated as still images. Both `.bpm` and `.bmp` are accepted.
const IMAGE_EXTENSIONS: &[&str] = &[
    ".jpg", ".jpeg", ".png", ".bpm", ".bmp", ".gif", ".tga", ".webp",
];

/// Extensions treated as movies
const MOVIE_EXTENSIONS: &[&str] = &[".avi", ".mkv", ".mp4", ".mov", ".webm", ".flv"];

/// The two kinds of file that take part in clustering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Movie,
}

impl MediaKind {
    /// Classify a dotted extension such as `.jpg`.
    ///
    /// The comparison is case-insensitive; anything unrecognised is `None`.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_lowercase();
        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            Some(MediaKind::Image)
        } else if MOVIE_EXTENSIONS.contains(&ext.as_str()) {
            Some(MediaKind::Movie)
        } else {
            None
        }
    }
}
