//! Batched structural mutations.
//!
//! An [`ActionChain`] queues mutations locally and sends them all in one
//! `batchUpdate` call on [`flush`](ActionChain::flush). Every operation
//! validates and resolves its arguments against the cached sheet dimensions
//! before anything is queued, so a failed call leaves the queue untouched.
//! Every index that reaches the queue fits the API's `i32` range.
//!
//! The queue has a single owner; share a chain across tasks only behind a lock.

use crate::column;
use crate::error::{InputError, SheetError};
use crate::providers::{BatchResponse, SpreadsheetProvider};
use crate::range::{self, GridRect, Shape};
use crate::request::{
    AppendDimension, CopyPaste, CutPaste, DeleteDimension, Dimension, DimensionRange,
    DuplicateSheet, GridCoordinate, GridRange, InsertDimension, Mutation, PasteType, PixelSize,
    MAX_PIXEL_SIZE, MIN_PIXEL_SIZE,
};
use crate::sheet::{SheetCatalog, SheetInfo};

pub struct ActionChain<'a, P: SpreadsheetProvider> {
    provider: &'a P,
    sheets: &'a SheetCatalog,
    requests: Vec<Mutation>,
}

impl<'a, P: SpreadsheetProvider> ActionChain<'a, P> {
    pub fn new(provider: &'a P, sheets: &'a SheetCatalog) -> Self {
        ActionChain {
            provider,
            sheets,
            requests: Vec::new(),
        }
    }

    /// Mutations queued so far, in submission order.
    pub fn requests(&self) -> &[Mutation] {
        &self.requests
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Copy `source` to `destination` on `sheet`.
    pub fn copy_paste(
        &mut self,
        sheet: &str,
        source: &str,
        destination: &str,
        paste_type: PasteType,
    ) -> Result<&mut Self, SheetError> {
        let info = self.grid(sheet)?;
        let source = resolve(info, source, Shape::General)?;
        let destination = resolve(info, destination, Shape::General)?;

        Ok(self.push(Mutation::CopyPaste(CopyPaste {
            source: GridRange::new(info.sheet_id, source),
            destination: GridRange::new(info.sheet_id, destination),
            paste_type,
        })))
    }

    /// Move `source` so that its top-left cell lands on the top-left cell of
    /// `destination`.
    pub fn cut_paste(
        &mut self,
        sheet: &str,
        source: &str,
        destination: &str,
        paste_type: PasteType,
    ) -> Result<&mut Self, SheetError> {
        let info = self.grid(sheet)?;
        let source = resolve(info, source, Shape::General)?;
        let destination = resolve(info, destination, Shape::General)?;

        Ok(self.push(Mutation::CutPaste(CutPaste {
            source: GridRange::new(info.sheet_id, source),
            destination: GridCoordinate {
                sheet_id: info.sheet_id,
                row_index: destination.start_row,
                column_index: destination.start_column,
            },
            paste_type,
        })))
    }

    /// Resize the rows in `rows` (e.g. `"3:5"`).
    pub fn resize_row(
        &mut self,
        sheet: &str,
        rows: &str,
        size: PixelSize,
    ) -> Result<&mut Self, SheetError> {
        self.resize(sheet, rows, size, Dimension::Rows)
    }

    /// Resize the columns in `columns` (e.g. `"B:D"`).
    pub fn resize_column(
        &mut self,
        sheet: &str,
        columns: &str,
        size: PixelSize,
    ) -> Result<&mut Self, SheetError> {
        self.resize(sheet, columns, size, Dimension::Columns)
    }

    /// Add `count` rows at the bottom of `sheet`.
    pub fn append_row(&mut self, sheet: &str, count: u32) -> Result<&mut Self, SheetError> {
        self.append(sheet, count, Dimension::Rows)
    }

    /// Add `count` columns at the right of `sheet`.
    pub fn append_column(&mut self, sheet: &str, count: u32) -> Result<&mut Self, SheetError> {
        self.append(sheet, count, Dimension::Columns)
    }

    /// Delete the rows in `rows` (e.g. `"3:5"`).
    pub fn delete_row(&mut self, sheet: &str, rows: &str) -> Result<&mut Self, SheetError> {
        self.delete(sheet, rows, Dimension::Rows)
    }

    /// Delete the columns in `columns` (e.g. `"B:D"`).
    pub fn delete_column(&mut self, sheet: &str, columns: &str) -> Result<&mut Self, SheetError> {
        self.delete(sheet, columns, Dimension::Columns)
    }

    /// Insert `count` empty rows so that the first one becomes row `start_row` (1-based).
    pub fn insert_row(
        &mut self,
        sheet: &str,
        count: u32,
        start_row: u32,
    ) -> Result<&mut Self, SheetError> {
        if start_row == 0 {
            return Err(InputError::ZeroRow.into());
        }
        self.insert(sheet, count, start_row, Dimension::Rows)
    }

    /// Insert `count` empty columns so that the first one becomes column
    /// `start_column` (letters, e.g. `"C"`).
    pub fn insert_column(
        &mut self,
        sheet: &str,
        count: u32,
        start_column: &str,
    ) -> Result<&mut Self, SheetError> {
        let start = column::decode(start_column)?;
        self.insert(sheet, count, start, Dimension::Columns)
    }

    /// Copy `sheet` into a new sheet called `new_name`.
    pub fn duplicate_sheet(
        &mut self,
        sheet: &str,
        new_name: &str,
    ) -> Result<&mut Self, SheetError> {
        let info = self.sheet(sheet)?;

        Ok(self.push(Mutation::DuplicateSheet(DuplicateSheet {
            source_sheet_id: info.sheet_id,
            new_sheet_name: new_name.to_owned(),
        })))
    }

    /// Send every queued mutation as one batch.
    ///
    /// The queue is empty afterwards even if the provider fails; a failed
    /// batch is not retried and has to be queued again by the caller.
    /// Flushing an empty queue makes no provider call and returns an empty
    /// [`BatchResponse`].
    pub async fn flush(&mut self) -> Result<BatchResponse, SheetError> {
        let requests = std::mem::take(&mut self.requests);
        if requests.is_empty() {
            return Ok(BatchResponse::default());
        }

        log::debug!(
            "applying {} queued mutation(s) to {}",
            requests.len(),
            self.provider.document_id()
        );

        self.provider.batch_update(&requests).await.map_err(|e| {
            log::warn!("dropping batch of {} mutation(s): {e}", requests.len());
            SheetError::apply(e)
        })
    }

    fn resize(
        &mut self,
        sheet: &str,
        notation: &str,
        size: PixelSize,
        dimension: Dimension,
    ) -> Result<&mut Self, SheetError> {
        if let PixelSize::Fixed(px) = size {
            if !(MIN_PIXEL_SIZE..=MAX_PIXEL_SIZE).contains(&px) {
                return Err(InputError::PixelSize(px).into());
            }
        }

        let info = self.grid(sheet)?;
        let rect = resolve(info, notation, dimension.shape())?;
        let range = DimensionRange::from_rect(info.sheet_id, dimension, rect);

        Ok(self.push(Mutation::resize(range, size)))
    }

    fn append(
        &mut self,
        sheet: &str,
        count: u32,
        dimension: Dimension,
    ) -> Result<&mut Self, SheetError> {
        if count == 0 {
            return Err(InputError::ZeroCount("append").into());
        }
        if count > column::MAX_ORDINAL {
            return Err(InputError::IndexOverflow.into());
        }
        let info = self.grid(sheet)?;

        Ok(self.push(Mutation::AppendDimension(AppendDimension {
            sheet_id: info.sheet_id,
            dimension,
            length: count,
        })))
    }

    fn delete(
        &mut self,
        sheet: &str,
        notation: &str,
        dimension: Dimension,
    ) -> Result<&mut Self, SheetError> {
        let info = self.grid(sheet)?;
        let rect = resolve(info, notation, dimension.shape())?;

        Ok(self.push(Mutation::DeleteDimension(DeleteDimension {
            range: DimensionRange::from_rect(info.sheet_id, dimension, rect),
        })))
    }

    /// `start` is the 1-based row or column ordinal of the first inserted line.
    fn insert(
        &mut self,
        sheet: &str,
        count: u32,
        start: u32,
        dimension: Dimension,
    ) -> Result<&mut Self, SheetError> {
        if count == 0 {
            return Err(InputError::ZeroCount("insert").into());
        }
        let info = self.grid(sheet)?;
        let start_index = start - 1;
        let end_index = start_index
            .checked_add(count)
            .filter(|&end| end <= column::MAX_ORDINAL)
            .ok_or(InputError::IndexOverflow)?;

        Ok(self.push(Mutation::InsertDimension(InsertDimension {
            range: DimensionRange {
                sheet_id: info.sheet_id,
                dimension,
                start_index,
                end_index,
            },
        })))
    }

    fn sheet(&self, title: &str) -> Result<&'a SheetInfo, SheetError> {
        let sheets: &'a SheetCatalog = self.sheets;
        sheets.get(title)
    }

    fn grid(&self, title: &str) -> Result<&'a SheetInfo, SheetError> {
        let sheets: &'a SheetCatalog = self.sheets;
        sheets.grid(title)
    }

    fn push(&mut self, mutation: Mutation) -> &mut Self {
        self.requests.push(mutation);
        self
    }
}

impl Dimension {
    fn shape(self) -> Shape {
        match self {
            Dimension::Rows => Shape::Row,
            Dimension::Columns => Shape::Column,
        }
    }
}

fn resolve(info: &SheetInfo, notation: &str, shape: Shape) -> Result<GridRect, SheetError> {
    range::resolve(notation, info.row_count, info.column_count, shape)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::testing::MemoryProvider;
    use crate::request::AutoResizeDimensions;

    fn provider() -> MemoryProvider {
        MemoryProvider::with_sheet("Blad1", 7, 50, 26)
    }

    #[test]
    fn copy_paste_resolves_both_ranges() {
        let provider = provider();
        let sheets = provider.catalog();
        let mut chain = ActionChain::new(&provider, &sheets);

        chain
            .copy_paste("Blad1", "A1:C10", "B7", PasteType::Values)
            .unwrap();

        assert_eq!(
            chain.requests(),
            [Mutation::CopyPaste(CopyPaste {
                source: GridRange {
                    sheet_id: 7,
                    start_row_index: 0,
                    end_row_index: 10,
                    start_column_index: 0,
                    end_column_index: 3,
                },
                destination: GridRange {
                    sheet_id: 7,
                    start_row_index: 6,
                    end_row_index: 7,
                    start_column_index: 1,
                    end_column_index: 2,
                },
                paste_type: PasteType::Values,
            })]
        );
    }

    #[test]
    fn cut_paste_targets_top_left_of_destination() {
        let provider = provider();
        let sheets = provider.catalog();
        let mut chain = ActionChain::new(&provider, &sheets);

        chain
            .cut_paste("Blad1", "B:D", "F10:H20", PasteType::default())
            .unwrap();

        let Mutation::CutPaste(cut) = &chain.requests()[0] else {
            panic!("expected cut/paste, got {:?}", chain.requests());
        };
        assert_eq!(cut.source.end_row_index, 50);
        assert_eq!(
            cut.destination,
            GridCoordinate {
                sheet_id: 7,
                row_index: 9,
                column_index: 5,
            }
        );
        assert_eq!(cut.paste_type, PasteType::Formula);
    }

    #[test]
    fn auto_resize_rows() {
        let provider = provider();
        let sheets = provider.catalog();
        let mut chain = ActionChain::new(&provider, &sheets);

        chain.resize_row("Blad1", "3:5", PixelSize::Auto).unwrap();

        assert_eq!(
            chain.requests(),
            [Mutation::AutoResizeDimensions(AutoResizeDimensions {
                dimensions: DimensionRange {
                    sheet_id: 7,
                    dimension: Dimension::Rows,
                    start_index: 2,
                    end_index: 5,
                },
            })]
        );
    }

    #[test]
    fn fixed_resize_bounds_are_inclusive() {
        let provider = provider();
        let sheets = provider.catalog();
        let mut chain = ActionChain::new(&provider, &sheets);

        for px in [1, 2001] {
            assert!(matches!(
                chain.resize_column("Blad1", "B:D", PixelSize::Fixed(px)),
                Err(SheetError::Input(InputError::PixelSize(p))) if p == px
            ));
            assert!(matches!(
                chain.resize_row("Blad1", "3:5", PixelSize::Fixed(px)),
                Err(SheetError::Input(InputError::PixelSize(_)))
            ));
        }
        assert!(chain.is_empty());

        chain.resize_column("Blad1", "B:D", PixelSize::Fixed(2)).unwrap();
        chain.resize_column("Blad1", "B:D", PixelSize::Fixed(2000)).unwrap();
        assert_eq!(chain.len(), 2);
        assert!(chain
            .requests()
            .iter()
            .all(|m| matches!(m, Mutation::UpdateDimensionProperties(_))));
    }

    #[test]
    fn resize_checks_the_shape() {
        let provider = provider();
        let sheets = provider.catalog();
        let mut chain = ActionChain::new(&provider, &sheets);

        assert!(chain.resize_row("Blad1", "B:D", PixelSize::Auto).is_err());
        assert!(chain.resize_column("Blad1", "3:5", PixelSize::Auto).is_err());
        assert!(chain.delete_row("Blad1", "A1:B2").is_err());
        assert!(chain.is_empty());
    }

    #[test]
    fn delete_columns() {
        let provider = provider();
        let sheets = provider.catalog();
        let mut chain = ActionChain::new(&provider, &sheets);

        chain.delete_column("Blad1", "AA:AB").unwrap();

        assert_eq!(
            chain.requests(),
            [Mutation::DeleteDimension(DeleteDimension {
                range: DimensionRange {
                    sheet_id: 7,
                    dimension: Dimension::Columns,
                    start_index: 26,
                    end_index: 28,
                },
            })]
        );
    }

    #[test]
    fn insert_covers_exactly_count_lines() {
        let provider = provider();
        let sheets = provider.catalog();
        let mut chain = ActionChain::new(&provider, &sheets);

        chain
            .insert_row("Blad1", 3, 2)
            .unwrap()
            .insert_column("Blad1", 1, "C")
            .unwrap();

        let ranges: Vec<_> = chain
            .requests()
            .iter()
            .map(|m| match m {
                Mutation::InsertDimension(InsertDimension { range }) => {
                    (range.dimension, range.start_index, range.end_index)
                }
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(
            ranges,
            [(Dimension::Rows, 1, 4), (Dimension::Columns, 2, 3)]
        );
    }

    #[test]
    fn zero_counts_and_rows_are_rejected() {
        let provider = provider();
        let sheets = provider.catalog();
        let mut chain = ActionChain::new(&provider, &sheets);

        assert!(matches!(
            chain.append_row("Blad1", 0),
            Err(SheetError::Input(InputError::ZeroCount(_)))
        ));
        assert!(matches!(
            chain.insert_column("Blad1", 0, "A"),
            Err(SheetError::Input(InputError::ZeroCount(_)))
        ));
        assert!(matches!(
            chain.insert_row("Blad1", 1, 0),
            Err(SheetError::Input(InputError::ZeroRow))
        ));
        assert!(matches!(
            chain.insert_column("Blad1", 1, "c"),
            Err(SheetError::Input(InputError::InvalidColumn(_)))
        ));
        assert!(chain.is_empty());
    }

    #[test]
    fn indices_past_the_api_range_are_rejected_when_queued() {
        let provider = provider();
        let sheets = provider.catalog();
        let mut chain = ActionChain::new(&provider, &sheets);

        assert!(matches!(
            chain.delete_row("Blad1", "1:3000000000"),
            Err(SheetError::Input(InputError::InvalidNotation { .. }))
        ));
        assert!(matches!(
            chain.insert_row("Blad1", u32::MAX, 2),
            Err(SheetError::Input(InputError::IndexOverflow))
        ));
        assert!(matches!(
            chain.insert_row("Blad1", 1, u32::MAX),
            Err(SheetError::Input(InputError::IndexOverflow))
        ));
        assert!(matches!(
            chain.append_column("Blad1", u32::MAX),
            Err(SheetError::Input(InputError::IndexOverflow))
        ));
        assert!(chain.is_empty());

        chain.insert_row("Blad1", 1, column::MAX_ORDINAL).unwrap();
        let Mutation::InsertDimension(InsertDimension { range }) = &chain.requests()[0] else {
            panic!("expected insert, got {:?}", chain.requests());
        };
        assert_eq!(range.end_index, column::MAX_ORDINAL);
    }

    #[test]
    fn sheets_without_a_grid_only_allow_duplication() {
        let provider = provider();
        provider.set_sheet(
            "Chart",
            SheetInfo {
                sheet_id: 9,
                index: 1,
                sheet_type: "OBJECT".to_owned(),
                row_count: 0,
                column_count: 0,
            },
        );
        let sheets = provider.catalog();
        let mut chain = ActionChain::new(&provider, &sheets);

        assert!(matches!(
            chain.resize_row("Chart", "1:1", PixelSize::Auto),
            Err(SheetError::NotAGrid { .. })
        ));
        assert!(matches!(
            chain.copy_paste("Chart", "A1", "B1", PasteType::Values),
            Err(SheetError::NotAGrid { .. })
        ));
        assert!(matches!(
            chain.append_row("Chart", 1),
            Err(SheetError::NotAGrid { .. })
        ));
        assert!(chain.is_empty());

        chain.duplicate_sheet("Chart", "Chart (copy)").unwrap();
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn unknown_sheet_is_reported() {
        let provider = provider();
        let sheets = provider.catalog();
        let mut chain = ActionChain::new(&provider, &sheets);

        assert!(matches!(
            chain.append_column("Nope", 2),
            Err(SheetError::UnknownSheet(name)) if name == "Nope"
        ));
        assert!(matches!(
            chain.duplicate_sheet("Nope", "Copy"),
            Err(SheetError::UnknownSheet(_))
        ));
    }

    #[test]
    fn append_and_duplicate() {
        let provider = provider();
        let sheets = provider.catalog();
        let mut chain = ActionChain::new(&provider, &sheets);

        chain
            .append_row("Blad1", 10)
            .unwrap()
            .append_column("Blad1", 2)
            .unwrap()
            .duplicate_sheet("Blad1", "Blad1 (copy)")
            .unwrap();

        assert_eq!(
            chain.requests(),
            [
                Mutation::AppendDimension(AppendDimension {
                    sheet_id: 7,
                    dimension: Dimension::Rows,
                    length: 10,
                }),
                Mutation::AppendDimension(AppendDimension {
                    sheet_id: 7,
                    dimension: Dimension::Columns,
                    length: 2,
                }),
                Mutation::DuplicateSheet(DuplicateSheet {
                    source_sheet_id: 7,
                    new_sheet_name: "Blad1 (copy)".to_owned(),
                }),
            ]
        );
    }

    #[tokio::test]
    async fn flush_sends_everything_in_order_and_clears() {
        let provider = provider();
        let sheets = provider.catalog();
        let mut chain = ActionChain::new(&provider, &sheets);

        chain.append_row("Blad1", 1).unwrap();
        chain.delete_row("Blad1", "2:2").unwrap();
        let queued = chain.requests().to_vec();

        let response = chain.flush().await.unwrap();

        assert_eq!(response.replies.len(), 2);
        assert!(chain.is_empty());
        assert_eq!(provider.batches(), [queued]);
    }

    #[tokio::test]
    async fn flush_clears_on_failure() {
        let provider = provider();
        provider.fail_next_batch();
        let sheets = provider.catalog();
        let mut chain = ActionChain::new(&provider, &sheets);

        chain.append_row("Blad1", 1).unwrap();

        assert!(matches!(chain.flush().await, Err(SheetError::Apply(_))));
        assert!(chain.is_empty());
        assert!(provider.batches().is_empty());
    }

    #[tokio::test]
    async fn empty_flush_skips_the_provider() {
        let provider = provider();
        let sheets = provider.catalog();
        let mut chain = ActionChain::new(&provider, &sheets);

        assert_eq!(chain.flush().await.unwrap(), BatchResponse::default());
        assert!(provider.batches().is_empty());
    }
}
