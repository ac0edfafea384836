use bearing::session::Response;
use fs_err as fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResponseLogError {
    #[error("Failed to determine data directory")]
    DataDirNotFound,
    #[error("Response log I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Append-only JSON Lines file of committed answers.
#[derive(Debug, Clone)]
pub struct ResponseLog {
    path: PathBuf,
}

impl ResponseLog {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ResponseLogError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        Ok(Self { path })
    }

    pub fn append(&self, response: &Response) -> Result<(), ResponseLogError> {
        let mut line = serde_json::to_string(response)?;
        line.push('\n');

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

pub fn default_path() -> Result<PathBuf, ResponseLogError> {
    let proj_dirs = crate::config::project_dirs().ok_or(ResponseLogError::DataDirNotFound)?;
    Ok(proj_dirs.data_dir().join("responses.jsonl"))
}
