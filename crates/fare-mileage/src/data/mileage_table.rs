use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::{open, DataLoadError};
use crate::routing::GlobalDirection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum MileageKind {
    #[serde(rename = "T")]
    Tpm,
    #[serde(rename = "M")]
    Mpm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MileageEntry {
    pub mileage: u16,
    pub global_direction: GlobalDirection,
}

#[derive(Debug, Deserialize)]
struct MileageRow {
    origin: String,
    destination: String,
    kind: MileageKind,
    #[serde(default)]
    global_direction: String,
    mileage: u16,
}

/// Published TPM/MPM between city pairs. Lookups ignore the direction of
/// travel.
#[derive(Debug, Clone, Default)]
pub struct MileageTable {
    entries: HashMap<(String, String, MileageKind), MileageEntry>,
}

impl MileageTable {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DataLoadError> {
        Self::from_reader(open(path.as_ref())?)
    }

    /// Reads `origin,destination,kind,global_direction,mileage` rows.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DataLoadError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut table = Self::default();
        for (idx, row) in csv_reader.deserialize::<MileageRow>().enumerate() {
            let row = row?;
            let global_direction = row.global_direction.parse::<GlobalDirection>().map_err(|err| {
                DataLoadError::InvalidRow {
                    line: idx as u64 + 2,
                    message: err.to_string(),
                }
            })?;
            table.insert(&row.origin, &row.destination, row.kind, row.mileage, global_direction);
        }
        Ok(table)
    }

    pub fn insert(
        &mut self,
        origin: &str,
        destination: &str,
        kind: MileageKind,
        mileage: u16,
        global_direction: GlobalDirection,
    ) {
        self.entries.insert(
            (origin.to_string(), destination.to_string(), kind),
            MileageEntry {
                mileage,
                global_direction,
            },
        );
    }

    pub fn lookup(&self, origin: &str, destination: &str, kind: MileageKind) -> Option<MileageEntry> {
        self.entries
            .get(&(origin.to_string(), destination.to_string(), kind))
            .or_else(|| {
                self.entries
                    .get(&(destination.to_string(), origin.to_string(), kind))
            })
            .copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
