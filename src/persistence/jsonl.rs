//! JSON Lines Store
//!
//! Appends each prediction as one JSON document to the `predictions`
//! collection file under the data directory named by the credentials file.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PersistError;
use crate::persistence::{PredictionRecord, RecordStore};

/// Collection every prediction is written to.
pub const COLLECTION: &str = "predictions";

// == Credentials ==
/// Contents of the credentials file.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    /// Project the records belong to
    pub project_id: String,
    /// Directory holding the collection files
    pub data_dir: PathBuf,
}

impl Credentials {
    pub fn load(path: &Path) -> Result<Self, PersistError> {
        let raw = fs::read_to_string(path).map_err(|e| PersistError::Credentials {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&raw).map_err(|e| PersistError::Credentials {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

/// On-disk document layout.
#[derive(Serialize)]
struct Document<'a> {
    #[serde(flatten)]
    record: &'a PredictionRecord,
    project_id: &'a str,
    recorded_at: DateTime<Utc>,
}

// == JSONL Store ==
/// Append-only store backed by a `.jsonl` file.
#[derive(Debug)]
pub struct JsonlStore {
    project_id: String,
    path: PathBuf,
    file: Mutex<File>,
}

impl JsonlStore {
    /// Reads the credentials and opens the collection file for appending.
    pub fn open(credentials_path: &Path) -> Result<Self, PersistError> {
        let credentials = Credentials::load(credentials_path)?;
        fs::create_dir_all(&credentials.data_dir)?;

        let path = credentials.data_dir.join(format!("{}.jsonl", COLLECTION));
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self {
            project_id: credentials.project_id,
            path,
            file: Mutex::new(file),
        })
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordStore for JsonlStore {
    fn record(&self, record: &PredictionRecord) -> Result<(), PersistError> {
        let document = Document {
            record,
            project_id: &self.project_id,
            recorded_at: Utc::now(),
        };
        let mut line = serde_json::to_vec(&document)?;
        line.push(b'\n');

        let mut file = self
            .file
            .lock()
            .map_err(|_| PersistError::Worker("store lock poisoned".to_string()))?;
        file.write_all(&line)?;
        file.flush()?;
        Ok(())
    }
}
