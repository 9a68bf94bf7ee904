// src/store.rs
//! Loading and saving the tracker file.
//!
//! The file is pretty-printed JSON with glyphs written as-is. Saving goes
//! through a sibling temp file and a rename, so a crash mid-write leaves the
//! previous file intact.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::model::TrackerData;

pub fn load(path: &Path) -> Result<TrackerData> {
    let text = fs::read_to_string(path).map_err(|source| Error::Io { path: path.to_path_buf(), source })?;
    serde_json::from_str(&text).map_err(|source| Error::Json { path: path.to_path_buf(), source })
}

pub fn save(path: &Path, data: &TrackerData) -> Result<()> {
    let mut text = serde_json::to_string_pretty(data)?;
    text.push('\n');

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| Error::Io { path: parent.to_path_buf(), source })?;
        }
    }

    let tmp = temp_path(path);
    fs::write(&tmp, text).map_err(|source| Error::Io { path: tmp.clone(), source })?;
    fs::rename(&tmp, path).map_err(|source| Error::Io { path: path.to_path_buf(), source })
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_file_sits_next_to_target() {
        assert_eq!(temp_path(Path::new("site/data.json")), PathBuf::from("site/data.json.tmp"));
    }
}
