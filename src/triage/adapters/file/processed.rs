//! Processed pull request log stored as one identifier per line.

use crate::triage::{
    domain::PullRequestId,
    ports::{ProcessedLog, ProcessedLogError, ProcessedLogResult},
};
use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::OpenOptions;
use cap_std::fs_utf8::Dir;
use std::io::{ErrorKind, Write};
use std::sync::Arc;

/// Line-oriented processed log inside a capability-scoped directory.
#[derive(Debug, Clone)]
pub struct FileProcessedLog {
    dir: Arc<Dir>,
    file_name: Utf8PathBuf,
}

impl FileProcessedLog {
    /// Opens the log at `path`. The file itself is created on first write;
    /// its parent directory must exist.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessedLogError::Storage`] when the parent directory
    /// cannot be opened or `path` has no file name.
    pub fn open(path: &Utf8Path) -> ProcessedLogResult<Self> {
        let file_name = path.file_name().ok_or_else(|| {
            std::io::Error::new(
                ErrorKind::InvalidInput,
                format!("processed log path '{path}' has no file name"),
            )
        })?;
        let parent = path
            .parent()
            .filter(|parent| !parent.as_str().is_empty())
            .unwrap_or_else(|| Utf8Path::new("."));
        let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
        Ok(Self {
            dir: Arc::new(dir),
            file_name: Utf8PathBuf::from(file_name),
        })
    }

    async fn run_blocking<F, T>(&self, f: F) -> ProcessedLogResult<T>
    where
        F: FnOnce(&Dir, &Utf8Path) -> std::io::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let dir = Arc::clone(&self.dir);
        let file_name = self.file_name.clone();
        tokio::task::spawn_blocking(move || f(&dir, &file_name))
            .await
            .map_err(|err| ProcessedLogError::from(std::io::Error::other(err)))?
            .map_err(ProcessedLogError::from)
    }
}

#[async_trait]
impl ProcessedLog for FileProcessedLog {
    async fn is_processed(&self, id: &PullRequestId) -> ProcessedLogResult<bool> {
        let wanted = id.as_str().to_owned();
        self.run_blocking(move |dir, file_name| match dir.read_to_string(file_name) {
            Ok(content) => Ok(content.lines().any(|line| line == wanted)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err),
        })
        .await
    }

    async fn mark_processed(&self, id: &PullRequestId) -> ProcessedLogResult<()> {
        let line = id.as_str().to_owned();
        self.run_blocking(move |dir, file_name| {
            let mut options = OpenOptions::new();
            options.create(true).append(true);
            let mut file = dir.open_with(file_name, &options)?;
            writeln!(file, "{line}")
        })
        .await
    }
}
