//! File-based Session Store Adapter
//!
//! Stores each session under its own directory:
//!
//! ```text
//! <base>/<sha256(session id)>/events.jsonl   one JSON event per line
//! <base>/<sha256(session id)>/metadata.json
//! ```
//!
//! Session ids come from the client, so the directory name is a digest of
//! the id rather than the id itself.

use async_trait::async_trait;
use futures::future::try_join_all;
use sha2::{Digest, Sha256};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::domain::foundation::{DomainError, SessionId};
use crate::domain::session::{select_page, SessionEvent, SessionMetadata};
use crate::ports::{SessionRepository, SessionWriter};

const EVENTS_FILE: &str = "events.jsonl";
const METADATA_FILE: &str = "metadata.json";

/// File-based storage for recorded sessions
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    base_path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl FileSessionStore {
    /// Create a new file store rooted at `base_path`
    ///
    /// The directory is created lazily on first write.
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Root directory of the store
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn session_dir(&self, id: &SessionId) -> PathBuf {
        self.base_path.join(session_dir_name(id))
    }

    fn events_file_path(&self, id: &SessionId) -> PathBuf {
        self.session_dir(id).join(EVENTS_FILE)
    }

    fn metadata_file_path(&self, id: &SessionId) -> PathBuf {
        self.session_dir(id).join(METADATA_FILE)
    }

    async fn ensure_dir(&self, path: &Path) -> Result<(), DomainError> {
        fs::create_dir_all(path)
            .await
            .map_err(|e| io_error("create directory", path, e))
    }
}

/// Hex-encoded SHA-256 of the session id.
fn session_dir_name(id: &SessionId) -> String {
    format!("{:x}", Sha256::digest(id.as_str().as_bytes()))
}

fn io_error(op: &str, path: &Path, err: std::io::Error) -> DomainError {
    DomainError::storage(format!("Failed to {}: {}", op, err))
        .with_detail("path", path.display().to_string())
}

fn parse_events(content: &str, path: &Path) -> Result<Vec<SessionEvent>, DomainError> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line).map_err(|e| {
                DomainError::serialization(format!("Malformed event on line {}: {}", index + 1, e))
                    .with_detail("path", path.display().to_string())
            })
        })
        .collect()
}

/// Reads one metadata file; a missing file means the session has no metadata.
async fn read_metadata_file(path: PathBuf) -> Result<Option<SessionMetadata>, DomainError> {
    let content = match fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(io_error("read metadata", &path, e)),
    };

    serde_json::from_str(&content).map(Some).map_err(|e| {
        DomainError::serialization(format!("Malformed metadata: {}", e))
            .with_detail("path", path.display().to_string())
    })
}

#[async_trait]
impl SessionRepository for FileSessionStore {
    async fn get_events(&self, id: &SessionId) -> Result<Option<Vec<SessionEvent>>, DomainError> {
        let path = self.events_file_path(id);

        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error("read events", &path, e)),
        };

        parse_events(&content, &path).map(Some)
    }

    async fn get_metadata(&self, id: &SessionId) -> Result<Option<SessionMetadata>, DomainError> {
        read_metadata_file(self.metadata_file_path(id)).await
    }

    async fn list_metadata(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<SessionMetadata>, DomainError> {
        let mut entries = match fs::read_dir(&self.base_path).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error("list sessions", &self.base_path, e)),
        };

        let mut paths = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| io_error("list sessions", &self.base_path, e))?
        {
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| io_error("inspect entry", &entry.path(), e))?;
            if file_type.is_dir() {
                paths.push(entry.path().join(METADATA_FILE));
            }
        }

        let all: Vec<SessionMetadata> = try_join_all(paths.into_iter().map(read_metadata_file))
            .await?
            .into_iter()
            .flatten()
            .collect();

        Ok(select_page(all, limit, offset))
    }
}

#[async_trait]
impl SessionWriter for FileSessionStore {
    async fn append_events(
        &self,
        id: &SessionId,
        events: &[SessionEvent],
    ) -> Result<(), DomainError> {
        let mut buf = String::new();
        for event in events {
            let line = serde_json::to_string(event)
                .map_err(|e| DomainError::serialization(format!("Failed to encode event: {}", e)))?;
            buf.push_str(&line);
            buf.push('\n');
        }

        let _guard = self.write_lock.lock().await;

        let dir = self.session_dir(id);
        self.ensure_dir(&dir).await?;

        let path = self.events_file_path(id);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| io_error("open events", &path, e))?;

        file.write_all(buf.as_bytes())
            .await
            .map_err(|e| io_error("append events", &path, e))?;
        file.flush()
            .await
            .map_err(|e| io_error("flush events", &path, e))?;

        Ok(())
    }

    async fn save_metadata(&self, metadata: &SessionMetadata) -> Result<(), DomainError> {
        let json = serde_json::to_string_pretty(metadata)
            .map_err(|e| DomainError::serialization(format!("Failed to encode metadata: {}", e)))?;

        let _guard = self.write_lock.lock().await;

        let dir = self.session_dir(&metadata.session_id);
        self.ensure_dir(&dir).await?;

        // Write-then-rename so readers never see a half-written file
        let path = self.metadata_file_path(&metadata.session_id);
        let tmp_path = dir.join(format!("{}.tmp", METADATA_FILE));
        fs::write(&tmp_path, json)
            .await
            .map_err(|e| io_error("write metadata", &tmp_path, e))?;
        fs::rename(&tmp_path, &path)
            .await
            .map_err(|e| io_error("replace metadata", &path, e))?;

        Ok(())
    }
}
