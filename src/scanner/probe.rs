//! Bounded-time filesystem probes
//!
//! A stalled network mount or a FIFO posing as a regular file must not hang
//! the whole run. Each blocking call runs on a helper thread and the caller
//! waits on a channel with a deadline. On timeout the helper is abandoned and
//! the fact is reported as unknown.

use crate::models::{AnalysisWarning, FileFacts, WarningKind};
use crossbeam_channel::{bounded, RecvTimeoutError};
use std::fs::Metadata;
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use thiserror::Error;

/// Why a probe produced no answer
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("not found")]
    NotFound,

    #[error("timed out after {0:?}")]
    TimedOut(Duration),

    #[error("content is not valid UTF-8")]
    Encoding,

    #[error("{0}")]
    Io(#[from] io::Error),
}

impl ProbeError {
    fn from_io(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            ProbeError::NotFound
        } else {
            ProbeError::Io(err)
        }
    }

    /// Warning kind for this failure, `None` when absence is just a fact
    pub fn warning_kind(&self) -> Option<WarningKind> {
        match self {
            ProbeError::NotFound => None,
            ProbeError::TimedOut(_) => Some(WarningKind::Timeout),
            ProbeError::Encoding => Some(WarningKind::Encoding),
            ProbeError::Io(_) => Some(WarningKind::Unreadable),
        }
    }

    /// Convert into a warning attached to `rel_path`
    pub fn to_warning(&self, rel_path: &str) -> Option<AnalysisWarning> {
        self.warning_kind()
            .map(|kind| AnalysisWarning::for_path(kind, rel_path, self.to_string()))
    }
}

/// Run `f` on a helper thread, giving up after `timeout`.
///
/// Returns `None` if the deadline passed or the helper died.
pub fn bounded_call<T, F>(timeout: Duration, f: F) -> Option<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = bounded(1);
    let spawned = thread::Builder::new()
        .name("shipready-probe".to_string())
        .spawn(move || {
            // Receiver may be gone after a timeout
            let _ = tx.send(f());
        });
    if let Err(e) = spawned {
        tracing::warn!("Failed to spawn probe thread: {}", e);
        return None;
    }

    match rx.recv_timeout(timeout) {
        Ok(value) => Some(value),
        Err(RecvTimeoutError::Timeout) => None,
        Err(RecvTimeoutError::Disconnected) => None,
    }
}

/// Bounded `fs::metadata`
pub fn metadata(path: &Path, timeout: Duration) -> Result<Metadata, ProbeError> {
    let owned: PathBuf = path.to_path_buf();
    match bounded_call(timeout, move || std::fs::metadata(owned)) {
        Some(result) => result.map_err(ProbeError::from_io),
        None => Err(ProbeError::TimedOut(timeout)),
    }
}

/// Bounded `fs::read`
pub fn read_bytes(path: &Path, timeout: Duration) -> Result<Vec<u8>, ProbeError> {
    let owned: PathBuf = path.to_path_buf();
    match bounded_call(timeout, move || std::fs::read(owned)) {
        Some(result) => result.map_err(ProbeError::from_io),
        None => Err(ProbeError::TimedOut(timeout)),
    }
}

/// Bounded read that requires valid UTF-8
pub fn read_text(path: &Path, timeout: Duration) -> Result<String, ProbeError> {
    let bytes = read_bytes(path, timeout)?;
    String::from_utf8(bytes).map_err(|_| ProbeError::Encoding)
}

/// Bounded read that replaces invalid UTF-8 sequences
pub fn read_text_lossy(path: &Path, timeout: Duration) -> Result<String, ProbeError> {
    let bytes = read_bytes(path, timeout)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Regular files directly inside `dir` as (name, size), sorted by name
pub fn list_files(dir: &Path, timeout: Duration) -> Result<Vec<(String, u64)>, ProbeError> {
    let owned: PathBuf = dir.to_path_buf();
    let listed = bounded_call(timeout, move || -> io::Result<Vec<(String, u64)>> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(owned)? {
            let entry = entry?;
            let meta = entry.metadata()?;
            if meta.is_file() {
                files.push((entry.file_name().to_string_lossy().into_owned(), meta.len()));
            }
        }
        Ok(files)
    });

    let mut files = match listed {
        Some(result) => result.map_err(ProbeError::from_io)?,
        None => return Err(ProbeError::TimedOut(timeout)),
    };
    files.sort();
    Ok(files)
}

/// Presence and size of `rel_path` under `root`.
///
/// Absence is a fact, not an error; a probe that fails for any other reason
/// reports the file as missing and returns a warning alongside.
pub fn file_facts(
    root: &Path,
    rel_path: &str,
    timeout: Duration,
) -> (FileFacts, Option<AnalysisWarning>) {
    match metadata(&root.join(rel_path), timeout) {
        Ok(meta) => (
            FileFacts {
                path: rel_path.to_string(),
                exists: true,
                size_bytes: if meta.is_file() { meta.len() } else { 0 },
            },
            None,
        ),
        Err(e) => (FileFacts::missing(rel_path), e.to_warning(rel_path)),
    }
}

/// Count lines the way `str::lines` does: a trailing newline adds no line
pub fn count_lines(text: &str) -> usize {
    text.lines().count()
}
