//! Line-oriented frontier persistence
//!
//! Two plain text files hold the frontier between runs:
//! - visited: one canonical URL per line, sorted
//! - pending: one raw URL per line, FIFO order
//!
//! Both are fully rewritten on every save. Each file is written to a sibling
//! temporary file and renamed into place, so a reader never observes a
//! half-written file.
//!
//! A single writer is assumed: running two crawl processes against the same
//! files at the same time is unsupported and is not guarded against here.

use crate::config::FrontierConfig;
use crate::frontier::{Frontier, FrontierError, FrontierResult, PendingQueue, VisitedSet};
use crate::url::CanonicalUrl;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Durable home of the visited set and pending queue
#[derive(Debug, Clone)]
pub struct FrontierStore {
    visited_path: PathBuf,
    pending_path: PathBuf,
}

impl FrontierStore {
    pub fn new(visited_path: impl Into<PathBuf>, pending_path: impl Into<PathBuf>) -> Self {
        Self {
            visited_path: visited_path.into(),
            pending_path: pending_path.into(),
        }
    }

    pub fn from_config(config: &FrontierConfig) -> Self {
        Self::new(&config.visited_path, &config.pending_path)
    }

    pub fn visited_path(&self) -> &Path {
        &self.visited_path
    }

    pub fn pending_path(&self) -> &Path {
        &self.pending_path
    }

    /// Loads the frontier; missing files mean a first run and yield empty containers
    ///
    /// Blank lines and surrounding whitespace are ignored.
    pub fn load(&self) -> FrontierResult<Frontier> {
        let visited: VisitedSet = read_lines(&self.visited_path)?
            .iter()
            .map(|line| CanonicalUrl::from_persisted(line))
            .collect();
        let pending: PendingQueue = read_lines(&self.pending_path)?.into();

        tracing::debug!(
            "Loaded frontier: {} visited, {} pending",
            visited.len(),
            pending.len()
        );

        Ok(Frontier { visited, pending })
    }

    /// Overwrites both files with the given frontier
    ///
    /// Both temporary files are fully written before either is renamed into
    /// place; a write failure removes them and leaves the previous state
    /// untouched.
    pub fn save(&self, frontier: &Frontier) -> FrontierResult<()> {
        let visited_tmp = temp_path(&self.visited_path);
        let pending_tmp = temp_path(&self.pending_path);

        let written = write_lines(&visited_tmp, frontier.visited.iter().map(|u| u.as_str()))
            .and_then(|()| write_lines(&pending_tmp, frontier.pending.iter().map(String::as_str)));
        if let Err(e) = written {
            let _ = fs::remove_file(&visited_tmp);
            let _ = fs::remove_file(&pending_tmp);
            return Err(e);
        }

        rename(&visited_tmp, &self.visited_path)?;
        rename(&pending_tmp, &self.pending_path)?;

        tracing::debug!(
            "Saved frontier: {} visited, {} pending",
            frontier.visited.len(),
            frontier.pending.len()
        );

        Ok(())
    }
}

/// Reads the seed list; a missing file means no seeds
pub fn load_seeds(path: &Path) -> FrontierResult<Vec<String>> {
    read_lines(path)
}

fn read_lines(path: &Path) -> FrontierResult<Vec<String>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(FrontierError::Read {
                path: path.display().to_string(),
                source,
            })
        }
    };

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

fn write_lines<'a>(path: &Path, lines: impl Iterator<Item = &'a str>) -> FrontierResult<()> {
    let write_err = |source: std::io::Error| FrontierError::Write {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }

    let mut buf = String::new();
    for line in lines {
        buf.push_str(line);
        buf.push('\n');
    }

    let mut file = fs::File::create(path).map_err(write_err)?;
    file.write_all(buf.as_bytes()).map_err(write_err)?;
    file.sync_all().map_err(write_err)?;
    Ok(())
}

fn rename(from: &Path, to: &Path) -> FrontierResult<()> {
    fs::rename(from, to).map_err(|source| FrontierError::Write {
        path: to.display().to_string(),
        source,
    })
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
