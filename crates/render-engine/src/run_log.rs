//! Human-readable run log.
//!
//! One line per appended frame (`<source> -> <artifact>`), with gap and
//! skip warnings interleaved. The file is opened once per run and flushed
//! when the log is dropped, whichever way the run ends.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use goesgif_common::error::GoesgifResult;
use goesgif_selection_core::gap::Gap;

/// Optional append-only log for one pipeline run.
pub struct RunLog {
    writer: Option<BufWriter<File>>,
    path: Option<PathBuf>,
    lines_written: u64,
}

impl RunLog {
    /// A log that records nothing.
    pub fn disabled() -> Self {
        Self {
            writer: None,
            path: None,
            lines_written: 0,
        }
    }

    /// Create (or truncate) the log file at `path`.
    pub fn create(path: &Path) -> GoesgifResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        Ok(Self {
            writer: Some(BufWriter::new(file)),
            path: Some(path.to_path_buf()),
            lines_written: 0,
        })
    }

    /// Create a log at `path` if one is configured.
    pub fn open(path: Option<&Path>) -> GoesgifResult<Self> {
        match path {
            Some(path) => Self::create(path),
            None => Ok(Self::disabled()),
        }
    }

    pub fn record_frame(&mut self, source: &Path, artifact: &Path) -> GoesgifResult<()> {
        self.write_line(&format!("{} -> {}", source.display(), artifact.display()))
    }

    pub fn record_gap(&mut self, gap: &Gap) -> GoesgifResult<()> {
        self.write_line(&gap.log_line())
    }

    pub fn record_skip(&mut self, source: &Path, reason: &str) -> GoesgifResult<()> {
        self.write_line(&format!("  ⚠ Skipped {}: {reason}", source.display()))
    }

    fn write_line(&mut self, line: &str) -> GoesgifResult<()> {
        if let Some(writer) = self.writer.as_mut() {
            writeln!(writer, "{line}")?;
            self.lines_written += 1;
        }
        Ok(())
    }

    /// Flush buffered lines to disk.
    pub fn flush(&mut self) -> GoesgifResult<()> {
        if let Some(writer) = self.writer.as_mut() {
            writer.flush()?;
        }
        Ok(())
    }

    pub fn is_enabled(&self) -> bool {
        self.writer.is_some()
    }

    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl Drop for RunLog {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}
