use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::PathBuf;

/// Maximum length of the readable URL prefix in a snapshot file name
const NAME_PREFIX_LEN: usize = 100;

/// Writes fetched page bodies to a directory, one file per URL
///
/// File names are derived from the URL alone, so re-fetching a page
/// overwrites its previous snapshot.
#[derive(Debug, Clone)]
pub struct HtmlStore {
    dir: PathBuf,
}

impl HtmlStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the snapshot for `url`
    pub fn path_for(&self, url: &str) -> PathBuf {
        self.dir.join(snapshot_file_name(url))
    }

    /// Writes `html` as the snapshot for `url`, creating the directory if needed
    pub fn save(&self, url: &str, html: &str) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(url);
        fs::write(&path, html)?;
        Ok(path)
    }
}

/// Builds `{sanitized-prefix}-{hash}.html` for a URL
///
/// Characters outside `[A-Za-z0-9_-]` become `_`. The hash suffix keeps
/// URLs that share a long prefix from colliding.
pub fn snapshot_file_name(url: &str) -> String {
    let prefix: String = url
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .take(NAME_PREFIX_LEN)
        .collect();

    let digest = Sha256::digest(url.as_bytes());
    let hash = hex::encode(&digest[..6]);

    format!("{}-{}.html", prefix, hash)
}
