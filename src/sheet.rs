use std::collections::BTreeMap;

use crate::error::SheetError;

/// Cached properties of one sheet (tab) in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetInfo {
    pub sheet_id: i32,
    pub index: i32,
    pub sheet_type: String,
    pub row_count: u32,
    pub column_count: u32,
}

/// Document-level properties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpreadsheetInfo {
    pub title: String,
    pub url: String,
    pub locale: String,
    pub time_zone: String,
}

/// Sheet properties keyed by sheet title.
///
/// Loaded once per [`Spreadsheet`](crate::Spreadsheet) and never updated by
/// queued mutations: row and column counts go stale after an append, insert
/// or delete until [`Spreadsheet::refresh`](crate::Spreadsheet::refresh).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetCatalog {
    sheets: BTreeMap<String, SheetInfo>,
}

impl SheetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, title: impl Into<String>, info: SheetInfo) {
        self.sheets.insert(title.into(), info);
    }

    pub fn get(&self, title: &str) -> Result<&SheetInfo, SheetError> {
        self.sheets
            .get(title)
            .ok_or_else(|| SheetError::UnknownSheet(title.to_owned()))
    }

    /// Like [`get`](Self::get), but only for sheets with a cell grid.
    pub fn grid(&self, title: &str) -> Result<&SheetInfo, SheetError> {
        let info = self.get(title)?;
        if info.row_count == 0 || info.column_count == 0 {
            return Err(SheetError::NotAGrid {
                sheet: title.to_owned(),
                sheet_type: info.sheet_type.clone(),
            });
        }
        Ok(info)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SheetInfo)> {
        self.sheets.iter().map(|(title, info)| (title.as_str(), info))
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

impl FromIterator<(String, SheetInfo)> for SheetCatalog {
    fn from_iter<I: IntoIterator<Item = (String, SheetInfo)>>(iter: I) -> Self {
        SheetCatalog {
            sheets: iter.into_iter().collect(),
        }
    }
}

/// Everything a provider reports about a document when it is opened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpreadsheetMetadata {
    pub info: SpreadsheetInfo,
    pub sheets: SheetCatalog,
}
