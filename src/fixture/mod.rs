pub mod types;

pub use types::{FixtureDocument, FixtureFormat};

use std::fs;
use std::io::Cursor;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("Failed to read fixture {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse fixture {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: plist::Error,
    },

    #[error("Failed to write fixture {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: plist::Error,
    },

    #[error("Fixture {path} must have an array at its root, found {found}")]
    UnexpectedRoot { path: PathBuf, found: &'static str },
}

/// Loads a single fixture file and writes it back.
#[derive(Debug, Clone)]
pub struct FixtureUpdater {
    plist_path: PathBuf,
}

impl FixtureUpdater {
    pub fn new(plist_path: impl Into<PathBuf>) -> Self {
        Self {
            plist_path: plist_path.into(),
        }
    }

    /// Read and decode the fixture. The root must be an array; its elements
    /// are the recording entries.
    #[instrument(skip(self), fields(path = %self.plist_path.display()))]
    pub fn get_plist_contents(&self) -> Result<FixtureDocument, FixtureError> {
        let bytes = fs::read(&self.plist_path).map_err(|source| FixtureError::Read {
            path: self.plist_path.clone(),
            source,
        })?;
        let format = FixtureFormat::sniff(&bytes);
        let root = plist::Value::from_reader(Cursor::new(bytes)).map_err(|source| {
            FixtureError::Parse {
                path: self.plist_path.clone(),
                source,
            }
        })?;

        let recordings = match root {
            plist::Value::Array(items) => items,
            other => {
                return Err(FixtureError::UnexpectedRoot {
                    path: self.plist_path.clone(),
                    found: value_kind(&other),
                })
            }
        };
        debug!(%format, recordings = recordings.len(), "loaded fixture");

        Ok(FixtureDocument {
            format,
            recordings,
        })
    }

    /// Encode `document` back to this fixture's path, in the document's format.
    #[instrument(skip(self, document), fields(path = %self.plist_path.display(), format = %document.format))]
    pub fn save(&self, document: &FixtureDocument) -> Result<(), FixtureError> {
        let root = plist::Value::Array(document.recordings.clone());
        let written = match document.format {
            FixtureFormat::Xml => root.to_file_xml(&self.plist_path),
            FixtureFormat::Binary => root.to_file_binary(&self.plist_path),
        };
        written.map_err(|source| FixtureError::Write {
            path: self.plist_path.clone(),
            source,
        })?;
        debug!(recordings = document.recordings.len(), "saved fixture");
        Ok(())
    }
}

/// Human-readable name of a value's type, for error messages.
pub fn value_kind(value: &plist::Value) -> &'static str {
    match value {
        plist::Value::Array(_) => "array",
        plist::Value::Dictionary(_) => "dictionary",
        plist::Value::Boolean(_) => "boolean",
        plist::Value::Data(_) => "data",
        plist::Value::Date(_) => "date",
        plist::Value::Real(_) => "real",
        plist::Value::Integer(_) => "integer",
        plist::Value::String(_) => "string",
        plist::Value::Uid(_) => "uid",
        _ => "unknown",
    }
}
