//! Teams log status extraction.
//!
//! The Teams client appends presence announcements to a dated log file
//! (`MSTeams_YYYY-MM-DD*.log`) that an external process rotates and rewrites
//! at will. Nothing here caches a byte offset between polls: the current
//! day's file is re-resolved and re-scanned from its end on every call, so a
//! rotation or midnight rollover can never leave a stale cursor behind.

use std::fmt;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};

use crate::status::Status;

/// Log file name shape: `MSTeams_<date><anything>.log`.
const LOG_PREFIX: &str = "MSTeams_";
const LOG_SUFFIX: &str = ".log";

/// Literal token the producer writes before the status word.
const STATUS_TOKEN: &[u8] = b"status";
const STATUS_MARKER: &str = "status ";

/// Block size for the backward scan. Status lines live near the end of the
/// file, so the first block almost always hits.
const BACKWARD_BLOCK: usize = 64 * 1024;

// ── Error type ──

/// Log extraction errors. All of them are non-fatal to callers: the
/// reconciliation loop degrades them to [`Status::Unknown`] and retries on
/// the next poll.
#[derive(Debug)]
pub enum ExtractError {
    /// No file in the directory matches today's date pattern.
    NoLogFile(String),
    /// Underlying I/O failure (directory listing, open, read).
    Io(std::io::Error),
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractError::NoLogFile(dir) => {
                write!(f, "No Teams log file for today in {dir}")
            }
            ExtractError::Io(e) => write!(f, "Log read failed: {e}"),
        }
    }
}

impl std::error::Error for ExtractError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExtractError::Io(e) => Some(e),
            ExtractError::NoLogFile(_) => None,
        }
    }
}

impl From<std::io::Error> for ExtractError {
    fn from(e: std::io::Error) -> Self {
        ExtractError::Io(e)
    }
}

pub type Result<T> = std::result::Result<T, ExtractError>;

// ── File resolution ──

/// Find the log file for `date` in `dir`.
///
/// Multiple files can exist for one day (numeric suffixes); the
/// lexicographically last name wins, which sorts the highest suffix — and
/// thus the most recent file — to the top.
pub fn log_file_for_date(dir: &Path, date: NaiveDate) -> Result<PathBuf> {
    let stem = format!("{LOG_PREFIX}{}", date.format("%Y-%m-%d"));
    let mut best: Option<String> = None;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if name.starts_with(&stem) && name.ends_with(LOG_SUFFIX) {
            match &best {
                Some(current) if name <= current.as_str() => {}
                _ => best = Some(name.to_string()),
            }
        }
    }
    best.map(|name| dir.join(name))
        .ok_or_else(|| ExtractError::NoLogFile(dir.display().to_string()))
}

/// Find the log file for the current local date. Resolved fresh on every
/// call: the "current day's file" changes at midnight.
pub fn todays_log_file(dir: &Path) -> Result<PathBuf> {
    log_file_for_date(dir, Local::now().date_naive())
}

// ── Backward scan ──

/// Last occurrence of `needle` in `haystack`.
fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).rposition(|w| w == needle)
}

/// Byte offset of the last occurrence of `needle` in `file` (length `len`),
/// scanning backward in fixed-size blocks with an overlap of
/// `needle.len() - 1` so matches straddling a block boundary are seen.
fn rfind_in_file(file: &mut File, len: u64, needle: &[u8]) -> std::io::Result<Option<u64>> {
    let overlap = needle.len().saturating_sub(1) as u64;
    let mut buf = vec![0u8; BACKWARD_BLOCK + overlap as usize];
    let mut end = len;
    while end > 0 {
        let start = end.saturating_sub(BACKWARD_BLOCK as u64);
        let read_end = (end + overlap).min(len);
        let chunk = &mut buf[..(read_end - start) as usize];
        file.seek(SeekFrom::Start(start))?;
        file.read_exact(chunk)?;
        if let Some(pos) = rfind(chunk, needle) {
            return Ok(Some(start + pos as u64));
        }
        end = start;
    }
    Ok(None)
}

/// One line starting at `offset`, up to (and excluding) the next terminator.
fn read_line_at(file: &mut File, offset: u64) -> std::io::Result<String> {
    file.seek(SeekFrom::Start(offset))?;
    let mut line = String::new();
    BufReader::new(file).read_line(&mut line)?;
    Ok(line)
}

/// The line containing the last `status` token in `path`, or `None` when the
/// file is empty or holds no token.
///
/// A 0-byte file is the normal state right after rotation, not an error.
pub fn last_status_line(path: &Path) -> Result<Option<String>> {
    let mut file = File::open(path)?;
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(None);
    }
    match rfind_in_file(&mut file, len, STATUS_TOKEN)? {
        Some(offset) => Ok(Some(read_line_at(&mut file, offset)?)),
        None => Ok(None),
    }
}

/// Parse a status-bearing line: the text after `"status "` up to line end,
/// trimmed, matched exactly against the known status words.
pub fn parse_status_line(line: &str) -> Status {
    match line.split_once(STATUS_MARKER) {
        Some((_, rest)) => Status::from_log_token(rest),
        None => Status::Unknown,
    }
}

/// Most recent status announced in `dir`'s log file for `date`.
///
/// Every failure mode (missing directory, no dated file, empty file, no
/// token, unrecognized word) degrades to [`Status::Unknown`] with a log
/// entry; the next scheduled poll attempts recovery.
pub fn extract_status_on(dir: &Path, date: NaiveDate) -> Status {
    let file = match log_file_for_date(dir, date) {
        Ok(file) => file,
        Err(e) => {
            log::warn!("[teams] {e}");
            return Status::Unknown;
        }
    };
    match last_status_line(&file) {
        Ok(Some(line)) => parse_status_line(&line),
        Ok(None) => Status::Unknown,
        Err(e) => {
            log::warn!("[teams] {}: {e}", file.display());
            Status::Unknown
        }
    }
}

/// Most recent status announced in today's log file under `dir`.
pub fn extract_status(dir: &Path) -> Status {
    extract_status_on(dir, Local::now().date_naive())
}
