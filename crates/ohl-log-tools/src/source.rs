//! Log source abstraction: find the most recent line containing a term.

use async_trait::async_trait;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

use crate::error::{LogError, LogResult};

/// Bytes read per backwards step of the file scan.
const CHUNK_SIZE: usize = 64 * 1024;

/// Lines longer than this are skipped rather than buffered.
const MAX_LINE_BYTES: usize = 1024 * 1024;

/// Default per-lookup wall-clock budget.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// Abstraction over "last line of a file containing a literal string".
///
/// Implementations must only ever hold the single best line, never the
/// whole file, and must give up after a bounded time.
#[async_trait]
pub trait LogSource: Send + Sync {
    /// Return the last line of `path` containing `term` as a case-sensitive
    /// fixed string. `Ok(None)` when no line matches.
    ///
    /// `LogError::NotFound`, `LogError::SearchUnavailable` and
    /// `LogError::Timeout` are soft failures for the caller.
    async fn find_last_match(&self, path: &str, term: &str) -> LogResult<Option<String>>;
}

// ── File scan ─────────────────────────────────────────────────

/// Scans the file backwards in-process, stopping at the first hit.
pub struct FileLogSource {
    timeout: Duration,
}

impl FileLogSource {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for FileLogSource {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

#[async_trait]
impl LogSource for FileLogSource {
    async fn find_last_match(&self, path: &str, term: &str) -> LogResult<Option<String>> {
        let owned_path = path.to_string();
        let needle = term.as_bytes().to_vec();
        let deadline = Instant::now() + self.timeout;

        let result = tokio::task::spawn_blocking(move || {
            scan_last_match(Path::new(&owned_path), &needle, deadline)
        })
        .await
        .map_err(|e| LogError::Other(format!("scan task failed: {e}")))?;

        result.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => LogError::NotFound(path.to_string()),
            std::io::ErrorKind::TimedOut => LogError::Timeout {
                path: path.to_string(),
                after: self.timeout,
            },
            _ => LogError::Io(format!("{path}: {e}")),
        })
    }
}

/// Walk `path` from the end, returning the last line containing `needle`.
fn scan_last_match(path: &Path, needle: &[u8], deadline: Instant) -> std::io::Result<Option<String>> {
    if needle.is_empty() {
        return Ok(None);
    }

    let mut file = std::fs::File::open(path)?;
    let mut pos = file.metadata()?.len();
    let mut buf = vec![0u8; CHUNK_SIZE];
    // Tail of the line currently being assembled, in file order.
    let mut carry: Vec<u8> = Vec::new();
    let mut overflow = false;

    while pos > 0 {
        if Instant::now() >= deadline {
            return Err(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                "scan deadline exceeded",
            ));
        }

        let len = CHUNK_SIZE.min(usize::try_from(pos).unwrap_or(CHUNK_SIZE));
        pos -= len as u64;
        file.seek(SeekFrom::Start(pos))?;
        file.read_exact(&mut buf[..len])?;
        let chunk = &buf[..len];

        let mut end = len;
        while let Some(nl) = chunk[..end].iter().rposition(|&b| b == b'\n') {
            if !overflow {
                let mut line = Vec::with_capacity(end - nl - 1 + carry.len());
                line.extend_from_slice(&chunk[nl + 1..end]);
                line.extend_from_slice(&carry);
                if contains(&line, needle) {
                    return Ok(Some(finish_line(&line)));
                }
            }
            carry.clear();
            overflow = false;
            end = nl;
        }

        if !overflow {
            if end + carry.len() > MAX_LINE_BYTES {
                overflow = true;
                carry.clear();
            } else {
                carry.splice(0..0, chunk[..end].iter().copied());
            }
        }
    }

    if !overflow && contains(&carry, needle) {
        return Ok(Some(finish_line(&carry)));
    }
    Ok(None)
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.len() >= needle.len() && haystack.windows(needle.len()).any(|w| w == needle)
}

fn finish_line(bytes: &[u8]) -> String {
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

// ── grep subprocess ───────────────────────────────────────────

/// Delegates the scan to an external `grep -F`, keeping only its last line.
///
/// Runs the program directly (no shell), so the term needs no quoting.
pub struct GrepLogSource {
    program: String,
    timeout: Duration,
}

impl GrepLogSource {
    pub fn new(timeout: Duration) -> Self {
        Self::with_program("grep", timeout)
    }

    pub fn with_program(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }
}

#[async_trait]
impl LogSource for GrepLogSource {
    async fn find_last_match(&self, path: &str, term: &str) -> LogResult<Option<String>> {
        if let Err(e) = tokio::fs::metadata(path).await {
            return Err(if e.kind() == std::io::ErrorKind::NotFound {
                LogError::NotFound(path.to_string())
            } else {
                LogError::Io(format!("{path}: {e}"))
            });
        }

        let mut child = Command::new(&self.program)
            .arg("-F")
            .arg("-a")
            .arg("-e")
            .arg(term)
            .arg("--")
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    LogError::SearchUnavailable(format!("{}: {e}", self.program))
                } else {
                    LogError::Io(format!("{}: {e}", self.program))
                }
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| LogError::Other(format!("{}: stdout not captured", self.program)))?;

        let scan = async {
            let mut reader = BufReader::new(stdout);
            let mut current = Vec::new();
            let mut last: Option<Vec<u8>> = None;
            loop {
                current.clear();
                if reader.read_until(b'\n', &mut current).await? == 0 {
                    break;
                }
                let line = current.strip_suffix(b"\n").unwrap_or(&current[..]);
                last = Some(line.to_vec());
            }
            let status = child.wait().await?;
            Ok::<_, std::io::Error>((last, status))
        };

        let (last, status) = match tokio::time::timeout(self.timeout, scan).await {
            Ok(Ok(done)) => done,
            Ok(Err(e)) => return Err(LogError::Io(format!("{}: {e}", self.program))),
            Err(_) => {
                return Err(LogError::Timeout {
                    path: path.to_string(),
                    after: self.timeout,
                });
            }
        };

        match status.code() {
            Some(0) => Ok(last.map(|line| finish_line(&line))),
            Some(1) => Ok(None),
            _ => Err(LogError::SearchUnavailable(format!(
                "{} exited with {status}",
                self.program
            ))),
        }
    }
}
