//! Output sinks for rendered reports
//!
//! A sink receives the finished document and commits it on `finish`. A sink
//! dropped before `finish` leaves nothing behind.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

pub trait ReportSink {
    fn write_document(&mut self, bytes: &[u8]) -> AppResult<()>;

    /// Commit everything written so far
    fn finish(&mut self) -> AppResult<()>;
}

/// Collects the document in memory for an HTTP body
#[derive(Debug, Default)]
pub struct MemorySink {
    buffer: Vec<u8>,
    finished: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The committed bytes; empty if `finish` was never called
    pub fn into_bytes(self) -> Vec<u8> {
        if self.finished {
            self.buffer
        } else {
            Vec::new()
        }
    }
}

impl ReportSink for MemorySink {
    fn write_document(&mut self, bytes: &[u8]) -> AppResult<()> {
        if self.finished {
            return Err(AppError::Stream("sink already finished".to_string()));
        }
        self.buffer.extend_from_slice(bytes);
        Ok(())
    }

    fn finish(&mut self) -> AppResult<()> {
        self.finished = true;
        Ok(())
    }
}

/// Writes to `<path>.partial` and renames into place on `finish`
#[derive(Debug)]
pub struct FileSink {
    final_path: PathBuf,
    partial_path: PathBuf,
    file: Option<File>,
    committed: bool,
}

impl FileSink {
    pub fn create(final_path: impl Into<PathBuf>) -> AppResult<Self> {
        let final_path = final_path.into();
        if let Some(parent) = final_path.parent() {
            fs::create_dir_all(parent).map_err(|e| stream_error(parent, e))?;
        }

        let mut partial = final_path.clone().into_os_string();
        partial.push(".partial");
        let partial_path = PathBuf::from(partial);

        let file = File::create(&partial_path).map_err(|e| stream_error(&partial_path, e))?;
        Ok(Self {
            final_path,
            partial_path,
            file: Some(file),
            committed: false,
        })
    }
}

impl ReportSink for FileSink {
    fn write_document(&mut self, bytes: &[u8]) -> AppResult<()> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| AppError::Stream("sink already finished".to_string()))?;
        file.write_all(bytes).map_err(|e| stream_error(&self.partial_path, e))
    }

    fn finish(&mut self) -> AppResult<()> {
        let file = self
            .file
            .take()
            .ok_or_else(|| AppError::Stream("sink already finished".to_string()))?;
        file.sync_all().map_err(|e| stream_error(&self.partial_path, e))?;
        drop(file);

        fs::rename(&self.partial_path, &self.final_path).map_err(|e| stream_error(&self.final_path, e))?;
        self.committed = true;
        tracing::info!(path = %self.final_path.display(), "Report written");
        Ok(())
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        drop(self.file.take());
        if !self.committed && self.partial_path.exists() {
            if let Err(e) = fs::remove_file(&self.partial_path) {
                tracing::warn!(path = %self.partial_path.display(), "Could not remove partial report: {}", e);
            }
        }
    }
}

fn stream_error(path: &Path, err: std::io::Error) -> AppError {
    AppError::Stream(format!("{}: {}", path.display(), err))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("stock-ledger-sink-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_memory_sink_commits_on_finish() {
        let mut sink = MemorySink::new();
        sink.write_document(b"%PDF-1.7").unwrap();
        sink.finish().unwrap();
        assert_eq!(sink.into_bytes(), b"%PDF-1.7".to_vec());
    }

    #[test]
    fn test_unfinished_memory_sink_is_empty() {
        let mut sink = MemorySink::new();
        sink.write_document(b"partial").unwrap();
        assert!(sink.into_bytes().is_empty());
    }

    #[test]
    fn test_file_sink_renames_on_finish() {
        let dir = scratch_dir();
        let path = dir.join("report.pdf");

        let mut sink = FileSink::create(&path).unwrap();
        sink.write_document(b"hello").unwrap();
        assert!(!path.exists());
        sink.finish().unwrap();
        drop(sink);

        assert_eq!(fs::read(&path).unwrap(), b"hello");
        assert!(!dir.join("report.pdf.partial").exists());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_dropped_file_sink_leaves_nothing() {
        let dir = scratch_dir();
        let path = dir.join("report.pdf");

        {
            let mut sink = FileSink::create(&path).unwrap();
            sink.write_document(b"half a report").unwrap();
        }

        assert!(!path.exists());
        assert!(!dir.join("report.pdf.partial").exists());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_write_after_finish_fails() {
        let dir = scratch_dir();
        let mut sink = FileSink::create(dir.join("report.pdf")).unwrap();
        sink.finish().unwrap();
        assert!(matches!(sink.write_document(b"late"), Err(AppError::Stream(_))));
        fs::remove_dir_all(&dir).unwrap();
    }
}
