//! Line sources feeding ingestion.
//!
//! [`FileTailer`] follows a growing log file the way `tail -F` does: it reads
//! whatever was appended since the last poll, starts over when the file is
//! truncated and switches to the new file after a rotation.

use std::fs::{File, Metadata};
use std::io::{self, BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::error::{LogmonError, Result};

/// Most lines handed out by one poll; the rest waits for the next one
pub const MAX_LINES_PER_POLL: usize = 10_000;

/// Producer of raw log lines.
///
/// Polling may block on I/O, so the ingestion task always calls it on the
/// blocking thread pool.
pub trait LineSource: Send {
    /// Return complete lines that became available since the last call.
    ///
    /// An empty vector means nothing new. An error means the source is gone
    /// for good and ingestion should stop.
    fn poll_lines(&mut self) -> Result<Vec<String>>;

    /// Human-readable name for logs and the dashboard
    fn describe(&self) -> String;
}

/// Identity of the file behind a path, used to detect rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileIdentity {
    dev: u64,
    ino: u64,
}

impl FileIdentity {
    #[cfg(unix)]
    fn of(metadata: &Metadata) -> Option<Self> {
        use std::os::unix::fs::MetadataExt;
        Some(Self {
            dev: metadata.dev(),
            ino: metadata.ino(),
        })
    }

    // Without inode numbers only truncation can be detected
    #[cfg(not(unix))]
    fn of(_metadata: &Metadata) -> Option<Self> {
        None
    }
}

/// Polling follower for a single log file
#[derive(Debug)]
pub struct FileTailer {
    path: PathBuf,
    reader: BufReader<File>,
    identity: Option<FileIdentity>,
    position: u64,
    /// Bytes of a line whose newline has not been written yet
    partial: Vec<u8>,
}

impl FileTailer {
    /// Open `path`. With `start_at_end` only lines appended afterwards are read.
    pub fn open(path: impl AsRef<Path>, start_at_end: bool) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|e| {
            LogmonError::source_unavailable(format!("cannot open {}: {}", path.display(), e))
        })?;
        let metadata = file.metadata()?;

        let mut reader = BufReader::new(file);
        let position = if start_at_end {
            reader.seek(SeekFrom::End(0))?
        } else {
            0
        };

        log::info!(
            "Tailing {} from offset {}",
            path.display(),
            position
        );

        Ok(Self {
            path,
            reader,
            identity: FileIdentity::of(&metadata),
            position,
            partial: Vec::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Byte offset of the next unread byte in the current file
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Read complete lines from the current handle until EOF or until
    /// `lines` holds `limit` entries.
    fn read_available(&mut self, lines: &mut Vec<String>, limit: usize) -> io::Result<()> {
        while lines.len() < limit {
            let read = self.reader.read_until(b'\n', &mut self.partial)?;
            if read == 0 {
                break;
            }
            self.position += read as u64;

            if self.partial.last() == Some(&b'\n') {
                self.take_partial(lines);
            }
        }
        Ok(())
    }

    /// Move the buffered bytes out as one line.
    fn take_partial(&mut self, lines: &mut Vec<String>) {
        let line = String::from_utf8_lossy(&self.partial)
            .trim_end_matches(['\r', '\n'])
            .to_string();
        self.partial.clear();
        if !line.is_empty() {
            lines.push(line);
        }
    }

    fn reopen_from_start(&mut self) -> io::Result<()> {
        let file = File::open(&self.path)?;
        let metadata = file.metadata()?;
        self.reader = BufReader::new(file);
        self.identity = FileIdentity::of(&metadata);
        self.position = 0;
        self.partial.clear();
        Ok(())
    }
}

impl LineSource for FileTailer {
    fn poll_lines(&mut self) -> Result<Vec<String>> {
        let mut lines = Vec::new();

        match std::fs::metadata(&self.path) {
            Ok(metadata) => {
                let identity = FileIdentity::of(&metadata);
                if identity.is_some() && identity != self.identity {
                    // Rotated: finish the old file, then follow the new one.
                    // Its last line is complete even without a newline.
                    self.read_available(&mut lines, usize::MAX)?;
                    self.take_partial(&mut lines);
                    log::info!("{} was rotated, following the new file", self.path.display());
                    self.reopen_from_start()?;
                } else if metadata.len() < self.position {
                    log::info!(
                        "{} was truncated ({} < {}), reading from the start",
                        self.path.display(),
                        metadata.len(),
                        self.position
                    );
                    self.reader.seek(SeekFrom::Start(0))?;
                    self.position = 0;
                    self.partial.clear();
                }
            }
            // Between rotation steps the path may briefly not exist
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("{} is missing, keeping the current handle", self.path.display());
            }
            Err(e) => {
                return Err(LogmonError::source_unavailable(format!(
                    "cannot stat {}: {}",
                    self.path.display(),
                    e
                )))
            }
        }

        self.read_available(&mut lines, MAX_LINES_PER_POLL).map_err(|e| {
            LogmonError::source_unavailable(format!("cannot read {}: {}", self.path.display(), e))
        })?;
        Ok(lines)
    }

    fn describe(&self) -> String {
        self.path().display().to_string()
    }
}
