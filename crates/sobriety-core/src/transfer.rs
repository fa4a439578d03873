//! Import/export of the check-in collection.
//!
//! Export document:
//!
//! ```json
//! {
//!   "checkIns": [ { "date": "Fri Oct 16 2026", "mood": "good", "habits": [] } ],
//!   "exportDate": "2026-10-16T08:30:00.000Z",
//!   "version": "1.0"
//! }
//! ```
//!
//! On import only the presence and array shape of `checkIns` is required;
//! `version` and `exportDate` are informational. Each entry must still be a
//! well-formed check-in before anything reaches the store.

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};

use crate::checkin::CheckIn;
use crate::error::ImportError;

/// Format version written into every export.
pub const FORMAT_VERSION: &str = "1.0";

const RECORDS_FIELD: &str = "checkIns";

/// Portable snapshot of the check-in collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedDocument {
    #[serde(rename = "checkIns")]
    pub records: Vec<CheckIn>,

    #[serde(rename = "exportDate", serialize_with = "serialize_instant")]
    pub exported_at: DateTime<Utc>,

    #[serde(rename = "version")]
    pub format_version: String,
}

impl ExportedDocument {
    /// Render as JSON; `pretty` uses two-space indentation.
    pub fn to_json(&self, pretty: bool) -> Result<String, serde_json::Error> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }

    /// Download name for this document.
    pub fn file_name(&self) -> String {
        export_file_name(self.exported_at)
    }
}

fn serialize_instant<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// `sobriety-tracker-YYYY-MM-DD.json`, dated from the UTC export instant.
pub fn export_file_name(at: DateTime<Utc>) -> String {
    format!("sobriety-tracker-{}.json", at.format("%Y-%m-%d"))
}

/// Serializes and validates export documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportExportCodec;

impl ImportExportCodec {
    pub fn new() -> Self {
        Self
    }

    /// Snapshot `records` into a document stamped with `now`.
    pub fn export(&self, records: &[CheckIn], now: DateTime<Utc>) -> ExportedDocument {
        ExportedDocument {
            records: records.to_vec(),
            exported_at: now,
            format_version: FORMAT_VERSION.to_string(),
        }
    }

    /// Parse and validate raw document bytes.
    ///
    /// # Errors
    /// - [`ImportError::Parse`] if the bytes are not JSON at all.
    /// - [`ImportError::Format`] if the JSON lacks an array-valued
    ///   `checkIns` field or any entry is not a valid check-in.
    pub fn import(&self, raw: &[u8]) -> Result<Vec<CheckIn>, ImportError> {
        let document: serde_json::Value = serde_json::from_slice(raw).map_err(ImportError::Parse)?;

        let entries = document
            .get(RECORDS_FIELD)
            .and_then(|v| v.as_array())
            .ok_or_else(|| ImportError::format("document has no checkIns array"))?;

        entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                CheckIn::deserialize(entry)
                    .map_err(|e| ImportError::format(format!("checkIns[{index}]: {e}")))
            })
            .collect()
    }
}

/// An externally supplied file waiting to be imported.
///
/// A successful import clears the source so the same file can be selected
/// again; a rejected import leaves it untouched.
#[derive(Debug, Clone, Default)]
pub struct ImportSource {
    origin: Option<PathBuf>,
    contents: Option<Vec<u8>>,
}

impl ImportSource {
    pub fn from_bytes(contents: impl Into<Vec<u8>>) -> Self {
        Self {
            origin: None,
            contents: Some(contents.into()),
        }
    }

    /// Read the whole file. Nothing in the tracker changes until the
    /// returned source is handed to an import.
    pub fn read(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read(path)?;
        Ok(Self {
            origin: Some(path.to_path_buf()),
            contents: Some(contents),
        })
    }

    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }

    pub fn contents(&self) -> Option<&[u8]> {
        self.contents.as_deref()
    }

    /// Nothing selected, or already consumed.
    pub fn is_empty(&self) -> bool {
        self.contents.is_none()
    }

    pub fn clear(&mut self) {
        self.origin = None;
        self.contents = None;
    }
}
