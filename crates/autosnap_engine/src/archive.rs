use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use autosnap_core::ResourceId;
use tempfile::NamedTempFile;
use thiserror::Error;

const MAX_STEM_LEN: usize = 80;
const MAX_DUPLICATES: u32 = 999;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("download directory missing or not writable: {0}")]
    DownloadDir(String),
    #[error("no free file name for {0}")]
    NameExhausted(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure the download directory exists; create if missing.
pub fn ensure_download_dir(dir: &Path) -> Result<(), SaveError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| SaveError::DownloadDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(SaveError::DownloadDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| SaveError::DownloadDir(e.to_string()))?;
    }
    Ok(())
}

/// Writes fetched archives as `{dir}/{year}.zip`.
///
/// Bytes first land in a temp file inside `dir`. The temp file is removed when it
/// goes out of scope, so a failed write leaves nothing behind; a successful one is
/// renamed into place. An existing archive of the same name is kept and the new one
/// gets a ` (n)` suffix.
#[derive(Debug, Clone)]
pub struct ArchiveSaver {
    dir: PathBuf,
}

impl ArchiveSaver {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn save(&self, resource_id: &ResourceId, bytes: &[u8]) -> Result<PathBuf, SaveError> {
        ensure_download_dir(&self.dir)?;

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(bytes)?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        let stem = archive_file_stem(resource_id);
        for attempt in 0..=MAX_DUPLICATES {
            let target = self.dir.join(candidate_name(&stem, attempt));
            match tmp.persist_noclobber(&target) {
                Ok(_) => return Ok(target),
                Err(err) if err.error.kind() == io::ErrorKind::AlreadyExists => {
                    tmp = err.file;
                }
                Err(err) => return Err(SaveError::Io(err.error)),
            }
        }
        Err(SaveError::NameExhausted(stem))
    }
}

fn candidate_name(stem: &str, attempt: u32) -> String {
    if attempt == 0 {
        format!("{stem}.zip")
    } else {
        format!("{stem} ({attempt}).zip")
    }
}

/// Filesystem-safe stem for an archive; `<stem>.zip` is what the user receives.
///
/// The key is normally a plain year and passes through unchanged.
pub fn archive_file_stem(resource_id: &ResourceId) -> String {
    let cleaned: String = resource_id
        .as_str()
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    let mut stem = cleaned.trim_matches(&['_', ' ', '.'][..]).to_string();
    if stem.is_empty() {
        stem = "archive".to_string();
    }
    if stem.len() > MAX_STEM_LEN {
        let mut cut = MAX_STEM_LEN;
        while !stem.is_char_boundary(cut) {
            cut -= 1;
        }
        stem.truncate(cut);
    }
    if is_reserved_windows_name(&stem) {
        stem.push('_');
    }
    stem
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: &str) -> ResourceId {
        ResourceId::parse(raw).unwrap()
    }

    #[test]
    fn plain_year_is_unchanged() {
        assert_eq!(archive_file_stem(&id("2016")), "2016");
    }

    #[test]
    fn path_separators_are_replaced() {
        assert_eq!(archive_file_stem(&id("../etc/passwd")), "etc_passwd");
        assert_eq!(archive_file_stem(&id("a:b")), "a_b");
    }

    #[test]
    fn degenerate_keys_get_a_name() {
        assert_eq!(archive_file_stem(&id("...")), "archive");
        assert_eq!(archive_file_stem(&id("con")), "con_");
    }

    #[test]
    fn duplicate_names_get_suffix() {
        assert_eq!(candidate_name("2016", 0), "2016.zip");
        assert_eq!(candidate_name("2016", 2), "2016 (2).zip");
    }
}
