use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;

use super::{open, DataLoadError};
use crate::routing::{Loc, LocationLookup};

/// Location reference table keyed by airport/city code.
#[derive(Debug, Clone, Default)]
pub struct LocationTable {
    locations: HashMap<String, Arc<Loc>>,
}

impl LocationTable {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DataLoadError> {
        Self::from_reader(open(path.as_ref())?)
    }

    /// Reads `code,city,nation,state,area,sub_area` rows.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DataLoadError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut table = Self::default();
        for row in csv_reader.deserialize::<Loc>() {
            let loc = row?;
            if loc.code.is_empty() || loc.area.is_empty() {
                return Err(DataLoadError::InvalidRow {
                    line: table.len() as u64 + 2,
                    message: "location code and area are required".to_string(),
                });
            }
            table.insert(loc);
        }
        Ok(table)
    }

    pub fn from_locations(locations: impl IntoIterator<Item = Loc>) -> Self {
        let mut table = Self::default();
        for loc in locations {
            table.insert(loc);
        }
        table
    }

    pub fn insert(&mut self, loc: Loc) {
        self.locations.insert(loc.code.clone(), Arc::new(loc));
    }

    pub fn get(&self, code: &str) -> Option<Arc<Loc>> {
        self.locations.get(code).cloned()
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

impl LocationLookup for LocationTable {
    fn location(&self, code: &str, _date: NaiveDate) -> Option<Arc<Loc>> {
        self.get(code)
    }

    fn multi_transport_city(&self, code: &str) -> Option<String> {
        self.locations
            .get(code)
            .filter(|loc| !loc.city.is_empty())
            .map(|loc| loc.city.clone())
    }
}
