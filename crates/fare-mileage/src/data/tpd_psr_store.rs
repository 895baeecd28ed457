use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;

use super::{open, DataLoadError};
use crate::routing::{ApplInd, TpdPsr, TpdPsrRepository};

/// TPD and PSR records kept in publication order.
#[derive(Debug, Clone, Default)]
pub struct TpdPsrStore {
    records: Vec<Arc<TpdPsr>>,
}

impl TpdPsrStore {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DataLoadError> {
        Self::from_reader(open(path.as_ref())?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DataLoadError> {
        let records: Vec<TpdPsr> = serde_json::from_reader(reader)?;
        Ok(Self::from_records(records))
    }

    pub fn from_records(records: impl IntoIterator<Item = TpdPsr>) -> Self {
        Self {
            records: records.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn areas_match(record: &TpdPsr, area1: &str, area2: &str) -> bool {
    let admits = |published: &str, area: &str| published.is_empty() || published == area;
    (admits(&record.area1, area1) && admits(&record.area2, area2))
        || (admits(&record.area1, area2) && admits(&record.area2, area1))
}

impl TpdPsrRepository for TpdPsrStore {
    fn tpd_psr(
        &self,
        appl_ind: ApplInd,
        carrier: &str,
        area1: &str,
        area2: &str,
        date: NaiveDate,
    ) -> Vec<Arc<TpdPsr>> {
        self.records
            .iter()
            .filter(|record| record.appl_ind == appl_ind)
            .filter(|record| record.carrier.is_empty() || record.carrier == carrier)
            .filter(|record| areas_match(record, area1, area2))
            .filter(|record| record.is_effective_on(date))
            .cloned()
            .collect()
    }
}
