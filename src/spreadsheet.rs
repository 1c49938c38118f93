use a1_notation::A1;
use serde_json::Value;
use std::str::FromStr;

use crate::actions::ActionChain;
use crate::column;
use crate::error::SheetError;
use crate::providers::{BatchResponse, SpreadsheetProvider};
use crate::request::PasteType;
use crate::sheet::{SheetCatalog, SheetInfo, SpreadsheetInfo, SpreadsheetMetadata};

/// An open spreadsheet document.
///
/// Sheet metadata is fetched once by [`open`](Spreadsheet::open) and only
/// reloaded by an explicit [`refresh`](Spreadsheet::refresh).
#[derive(Debug)]
pub struct Spreadsheet<P: SpreadsheetProvider> {
    provider: P,
    info: SpreadsheetInfo,
    sheets: SheetCatalog,
}

impl<P: SpreadsheetProvider> Spreadsheet<P> {
    pub async fn open(provider: P) -> Result<Self, SheetError> {
        let SpreadsheetMetadata { info, sheets } = provider
            .fetch_metadata()
            .await
            .map_err(SheetError::provider)?;

        log::debug!(
            "opened spreadsheet '{}' ({}) with {} sheet(s)",
            info.title,
            provider.document_id(),
            sheets.len()
        );

        Ok(Spreadsheet {
            provider,
            info,
            sheets,
        })
    }

    pub fn id(&self) -> &str {
        self.provider.document_id()
    }

    pub fn title(&self) -> &str {
        &self.info.title
    }

    pub fn url(&self) -> &str {
        &self.info.url
    }

    pub fn locale(&self) -> &str {
        &self.info.locale
    }

    pub fn time_zone(&self) -> &str {
        &self.info.time_zone
    }

    pub fn sheets(&self) -> &SheetCatalog {
        &self.sheets
    }

    pub fn sheet(&self, title: &str) -> Result<&SheetInfo, SheetError> {
        self.sheets.get(title)
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Reload document and sheet metadata, e.g. after a batch that changed
    /// row or column counts.
    pub async fn refresh(&mut self) -> Result<(), SheetError> {
        let SpreadsheetMetadata { info, sheets } = self
            .provider
            .fetch_metadata()
            .await
            .map_err(SheetError::provider)?;
        self.info = info;
        self.sheets = sheets;
        Ok(())
    }

    /// Start a batch of structural mutations against this document.
    pub fn actions(&self) -> ActionChain<'_, P> {
        ActionChain::new(&self.provider, &self.sheets)
    }

    /// Read the values of `range` on `sheet`; `None` reads every column.
    pub async fn get(
        &self,
        sheet: &str,
        range: Option<&str>,
    ) -> Result<Vec<Vec<Value>>, SheetError> {
        let range = self.range_for(sheet, range)?;
        let result = self
            .provider
            .read_range(&range)
            .await
            .map_err(SheetError::provider)?;
        Ok(result.values)
    }

    /// Write `values` (row-major) into `range` on `sheet`.
    pub async fn update(
        &self,
        sheet: &str,
        range: &str,
        values: Vec<Vec<Value>>,
    ) -> Result<(), SheetError> {
        let range = self.range_for(sheet, Some(range))?;
        self.provider
            .write_range(&range, values)
            .await
            .map_err(SheetError::provider)
    }

    pub async fn update_cell(
        &self,
        sheet: &str,
        cell: &str,
        value: Value,
    ) -> Result<(), SheetError> {
        self.update(sheet, cell, vec![vec![value]]).await
    }

    /// Write `values` left to right starting at `range`.
    pub async fn update_row(
        &self,
        sheet: &str,
        range: &str,
        values: Vec<Value>,
    ) -> Result<(), SheetError> {
        self.update(sheet, range, vec![values]).await
    }

    /// Write `values` top to bottom starting at `range`.
    pub async fn update_column(
        &self,
        sheet: &str,
        range: &str,
        values: Vec<Value>,
    ) -> Result<(), SheetError> {
        let values = values.into_iter().map(|v| vec![v]).collect();
        self.update(sheet, range, values).await
    }

    /// Clear every value on `sheet`.
    pub async fn clear(&self, sheet: &str) -> Result<(), SheetError> {
        let range = self.range_for(sheet, None)?;
        self.provider
            .clear_range(&range)
            .await
            .map_err(SheetError::provider)
    }

    /// Copy and paste immediately, in a batch of its own.
    pub async fn copy_paste(
        &self,
        sheet: &str,
        source: &str,
        destination: &str,
        paste_type: PasteType,
    ) -> Result<BatchResponse, SheetError> {
        let mut chain = self.actions();
        chain.copy_paste(sheet, source, destination, paste_type)?;
        chain.flush().await
    }

    /// Cut and paste immediately, in a batch of its own.
    pub async fn cut_paste(
        &self,
        sheet: &str,
        source: &str,
        destination: &str,
        paste_type: PasteType,
    ) -> Result<BatchResponse, SheetError> {
        let mut chain = self.actions();
        chain.cut_paste(sheet, source, destination, paste_type)?;
        chain.flush().await
    }

    /// Sheet-qualified A1 text for `range` on `sheet`, with the sheet name
    /// quoted the way the Sheets API expects.
    fn range_for(&self, sheet: &str, range: Option<&str>) -> Result<String, SheetError> {
        let info = self.sheets.grid(sheet)?;
        let cells = match range {
            Some(range) => {
                let parsed = A1::from_str(range).map_err(|e| SheetError::InvalidA1Range {
                    range: range.to_owned(),
                    reason: e.to_string(),
                })?;
                if parsed.sheet_name.is_some() {
                    return Err(SheetError::InvalidA1Range {
                        range: range.to_owned(),
                        reason: "the sheet is given separately".to_owned(),
                    });
                }
                range.to_owned()
            }
            None => format!("A:{}", column::encode(info.column_count)?),
        };

        Ok(format!("{}!{}", quote_sheet_name(sheet), cells))
    }
}

fn quote_sheet_name(name: &str) -> String {
    if name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        name.to_owned()
    } else {
        format!("'{}'", name.replace('\'', "''"))
    }
}
