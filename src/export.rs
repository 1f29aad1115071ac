//! Export sink: CSV serialization to local disk or a remote backend.

pub mod naming;
pub mod serialize;
pub mod uploader;

pub use naming::{disambiguator, repo_name_from_file_name, OutputName};
pub use serialize::{to_csv_bytes, write_csv};
pub use uploader::CsvUploader;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;
use url::Url;

use crate::error::{Result, SheetError};
use crate::timesheet::LogTable;

/// Where an export goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// A directory on local disk, created on demand.
    Local {
        /// Output directory.
        dir: PathBuf,
    },
    /// A backend accepting `POST {base_url}/csv`.
    Remote {
        /// Backend base URL.
        base_url: Url,
    },
}

impl Destination {
    /// Remote when a backend URL is configured, local otherwise.
    pub fn resolve(backend_url: Option<Url>, out_dir: impl Into<PathBuf>) -> Self {
        match backend_url {
            Some(base_url) => Self::Remote { base_url },
            None => Self::Local {
                dir: out_dir.into(),
            },
        }
    }
}

/// What the caller can report after a successful export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportReference {
    /// File written locally.
    Local {
        /// File name inside the output directory.
        file_name: String,
        /// Full path of the written file.
        path: PathBuf,
    },
    /// File accepted by the backend.
    Remote {
        /// Name the backend stored the file under.
        file_name: String,
        /// Download link.
        url: String,
    },
}

impl ExportReference {
    /// File name of the exported artifact.
    pub fn file_name(&self) -> &str {
        match self {
            Self::Local { file_name, .. } | Self::Remote { file_name, .. } => file_name,
        }
    }
}

impl fmt::Display for ExportReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local { path, .. } => write!(f, "CSV generated: {}", path.display()),
            Self::Remote { url, .. } => write!(f, "Get your csv from here: {url}"),
        }
    }
}

/// Serializes `table` and delivers it to `destination`.
pub async fn export(
    table: &LogTable,
    destination: &Destination,
    repo_name: Option<&str>,
) -> Result<ExportReference> {
    let name = OutputName::generate(repo_name);
    match destination {
        Destination::Local { dir } => export_local(table, dir, &name),
        Destination::Remote { base_url } => export_remote(table, base_url, &name).await,
    }
}

/// Writes `table` to `dir/{name}`, creating `dir` if needed.
pub fn export_local(table: &LogTable, dir: &Path, name: &OutputName) -> Result<ExportReference> {
    fs::create_dir_all(dir).map_err(|e| SheetError::io(dir, e))?;

    let file_name = name.file_name();
    let path = dir.join(&file_name);
    let bytes = to_csv_bytes(table)?;
    fs::write(&path, bytes).map_err(|e| SheetError::io(&path, e))?;

    info!(path = %path.display(), rows = table.len(), "CSV written");
    Ok(ExportReference::Local { file_name, path })
}

/// Uploads `table` to the backend at `base_url`.
pub async fn export_remote(
    table: &LogTable,
    base_url: &Url,
    name: &OutputName,
) -> Result<ExportReference> {
    let bytes = to_csv_bytes(table)?;
    let uploader = CsvUploader::new(base_url)?;
    let stored = uploader.upload(&name.file_name(), bytes).await?;
    let url = uploader.download_url(&stored);

    Ok(ExportReference::Remote {
        file_name: stored,
        url,
    })
}
