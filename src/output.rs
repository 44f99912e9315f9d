use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::record::CatalogRecord;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("cannot create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot serialize records: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Write records as a pretty JSON array to `dir/filename`, creating `dir` if needed.
pub fn write_output(
    dir: &Path,
    filename: &str,
    records: &[CatalogRecord],
) -> Result<PathBuf, OutputError> {
    fs::create_dir_all(dir).map_err(|source| OutputError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(filename);
    let file = File::create(&path).map_err(|source| OutputError::Write {
        path: path.clone(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.flush().map_err(|source| OutputError::Write {
        path: path.clone(),
        source,
    })?;
    info!(count = records.len(), path = %path.display(), "wrote records");
    Ok(path)
}
