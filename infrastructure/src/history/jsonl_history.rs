//! JSONL analysis history.
//!
//! Each [`AnalysisRecord`] is serialized as a single JSON line and appended
//! to the file. Lines are never rewritten: the last record of a discussion
//! is its current result.

use agora_application::{AnalysisRecord, AnalysisResultStore, ResultStoreError};
use agora_domain::DiscussionId;
use async_trait::async_trait;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Append-only analysis history backed by a JSONL file.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes after every record.
pub struct JsonlAnalysisHistory {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlAnalysisHistory {
    /// Open (or create) the history file, creating parent directories.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ResultStoreError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                ResultStoreError::Io(format!(
                    "could not create history directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                ResultStoreError::Io(format!(
                    "could not open history file {}: {}",
                    path.display(),
                    e
                ))
            })?;

        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the history file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every readable record, oldest first. Unparseable lines are skipped.
    pub async fn records(&self) -> Result<Vec<AnalysisRecord>, ResultStoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(ResultStoreError::Io(e.to_string())),
        };

        let mut records = Vec::new();
        for (index, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<AnalysisRecord>(line) {
                Ok(record) => records.push(record),
                Err(e) => warn!(
                    "Skipping unreadable history line {} in {}: {}",
                    index + 1,
                    self.path.display(),
                    e
                ),
            }
        }
        Ok(records)
    }
}

#[async_trait]
impl AnalysisResultStore for JsonlAnalysisHistory {
    async fn append(&self, record: &AnalysisRecord) -> Result<(), ResultStoreError> {
        let line =
            serde_json::to_string(record).map_err(|e| ResultStoreError::Malformed(e.to_string()))?;

        let mut writer = self
            .writer
            .lock()
            .map_err(|_| ResultStoreError::Io("history writer poisoned".to_string()))?;
        writeln!(writer, "{}", line).map_err(|e| ResultStoreError::Io(e.to_string()))?;
        writer
            .flush()
            .map_err(|e| ResultStoreError::Io(e.to_string()))
    }

    async fn latest(
        &self,
        discussion: &DiscussionId,
    ) -> Result<Option<AnalysisRecord>, ResultStoreError> {
        Ok(self
            .records()
            .await?
            .into_iter()
            .rev()
            .find(|r| &r.discussion_id == discussion))
    }
}

impl Drop for JsonlAnalysisHistory {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}
