//! In-memory reference data loaded from CSV/JSON files.

mod collectors;
mod locations;
mod mileage_table;
mod tpd_psr_store;

pub use collectors::{TableMpmCollector, TableTpmCollector};
pub use locations::LocationTable;
pub use mileage_table::{MileageEntry, MileageKind, MileageTable};
pub use tpd_psr_store::TpdPsrStore;

use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use crate::routing::{MileageServices, MileageValidator};

pub const LOCATIONS_FILE: &str = "locations.csv";
pub const MILEAGES_FILE: &str = "mileages.csv";
pub const TPD_PSR_FILE: &str = "tpd_psr.json";

#[derive(Debug)]
pub enum DataLoadError {
    Io { path: PathBuf, source: std::io::Error },
    Csv(csv::Error),
    Json(serde_json::Error),
    InvalidRow { line: u64, message: String },
}

impl fmt::Display for DataLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataLoadError::Io { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            DataLoadError::Csv(err) => write!(f, "invalid CSV reference data: {}", err),
            DataLoadError::Json(err) => write!(f, "invalid TPD/PSR records: {}", err),
            DataLoadError::InvalidRow { line, message } => {
                write!(f, "invalid reference row at line {}: {}", line, message)
            }
        }
    }
}

impl std::error::Error for DataLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DataLoadError::Io { source, .. } => Some(source),
            DataLoadError::Csv(err) => Some(err),
            DataLoadError::Json(err) => Some(err),
            DataLoadError::InvalidRow { .. } => None,
        }
    }
}

impl From<csv::Error> for DataLoadError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<serde_json::Error> for DataLoadError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

pub(crate) fn open(path: &Path) -> Result<File, DataLoadError> {
    File::open(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Every reference store needed to validate routes.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    pub locations: Arc<LocationTable>,
    pub mileages: Arc<MileageTable>,
    pub records: Arc<TpdPsrStore>,
}

impl ReferenceData {
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, DataLoadError> {
        let dir = dir.as_ref();
        let locations = LocationTable::from_path(dir.join(LOCATIONS_FILE))?;
        let mileages = MileageTable::from_path(dir.join(MILEAGES_FILE))?;
        let records = TpdPsrStore::from_path(dir.join(TPD_PSR_FILE))?;

        info!(
            dir = %dir.display(),
            locations = locations.len(),
            mileages = mileages.len(),
            records = records.len(),
            "reference data loaded"
        );

        Ok(Self {
            locations: Arc::new(locations),
            mileages: Arc::new(mileages),
            records: Arc::new(records),
        })
    }

    pub fn services(&self) -> MileageServices {
        MileageServices {
            locations: self.locations.clone(),
            tpm: Arc::new(TableTpmCollector::new(Arc::clone(&self.mileages))),
            mpm: Arc::new(TableMpmCollector::new(Arc::clone(&self.mileages))),
            records: self.records.clone(),
        }
    }

    pub fn validator(&self) -> MileageValidator {
        MileageValidator::new(self.services())
    }
}
