use a1_notation::A1;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Mutex;
use thiserror::Error;

use crate::providers::{BatchResponse, RangeResult, SpreadsheetProvider};
use crate::request::Mutation;
use crate::sheet::{SheetCatalog, SheetInfo, SpreadsheetInfo, SpreadsheetMetadata};

#[derive(Debug, Error)]
#[error("in-memory provider: {0}")]
pub(crate) struct MemoryError(&'static str);

/// Provider that keeps values in a map keyed by the rendered A1 range and
/// records every batch it is asked to apply.
#[derive(Debug, Default)]
pub(crate) struct MemoryProvider {
    metadata: Mutex<SpreadsheetMetadata>,
    values: Mutex<BTreeMap<String, Vec<Vec<Value>>>>,
    reads: Mutex<Vec<String>>,
    batches: Mutex<Vec<Vec<Mutation>>>,
    fail_next: Mutex<bool>,
}

impl MemoryProvider {
    pub fn with_sheet(title: &str, sheet_id: i32, row_count: u32, column_count: u32) -> Self {
        let mut sheets = SheetCatalog::new();
        sheets.insert(
            title,
            SheetInfo {
                sheet_id,
                index: 0,
                sheet_type: "GRID".to_owned(),
                row_count,
                column_count,
            },
        );
        let info = SpreadsheetInfo {
            title: "Inventory".to_owned(),
            url: "https://docs.google.com/spreadsheets/d/memory".to_owned(),
            locale: "nl_NL".to_owned(),
            time_zone: "Europe/Amsterdam".to_owned(),
        };

        MemoryProvider {
            metadata: Mutex::new(SpreadsheetMetadata { info, sheets }),
            ..Default::default()
        }
    }

    pub fn catalog(&self) -> SheetCatalog {
        self.metadata.lock().unwrap().sheets.clone()
    }

    pub fn set_sheet(&self, title: &str, info: SheetInfo) {
        self.metadata.lock().unwrap().sheets.insert(title, info);
    }

    pub fn fail_next_batch(&self) {
        *self.fail_next.lock().unwrap() = true;
    }

    pub fn batches(&self) -> Vec<Vec<Mutation>> {
        self.batches.lock().unwrap().clone()
    }

    pub fn reads(&self) -> Vec<String> {
        self.reads.lock().unwrap().clone()
    }

    pub fn stored(&self, range: &str) -> Option<Vec<Vec<Value>>> {
        self.values.lock().unwrap().get(range).cloned()
    }
}

impl SpreadsheetProvider for MemoryProvider {
    type Error = MemoryError;

    fn document_id(&self) -> &str {
        "memory"
    }

    async fn fetch_metadata(&self) -> Result<SpreadsheetMetadata, Self::Error> {
        Ok(self.metadata.lock().unwrap().clone())
    }

    async fn read_range(&self, range: &str) -> Result<RangeResult, Self::Error> {
        self.reads.lock().unwrap().push(range.to_owned());
        let values = self.values.lock().unwrap().get(range).cloned();

        Ok(RangeResult {
            values: values.unwrap_or_default(),
            range: A1::from_str(range).ok(),
        })
    }

    async fn write_range(&self, range: &str, values: Vec<Vec<Value>>) -> Result<(), Self::Error> {
        self.values.lock().unwrap().insert(range.to_owned(), values);
        Ok(())
    }

    async fn clear_range(&self, range: &str) -> Result<(), Self::Error> {
        self.values.lock().unwrap().remove(range);
        Ok(())
    }

    async fn batch_update(&self, requests: &[Mutation]) -> Result<BatchResponse, Self::Error> {
        if std::mem::take(&mut *self.fail_next.lock().unwrap()) {
            return Err(MemoryError("batch rejected"));
        }
        self.batches.lock().unwrap().push(requests.to_vec());

        Ok(BatchResponse {
            replies: vec![json!({}); requests.len()],
        })
    }
}
