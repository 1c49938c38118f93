//! Mutation descriptors queued by [`ActionChain`](crate::ActionChain).
//!
//! Each [`Mutation`] serializes to one entry of a Sheets `batchUpdate`
//! request list, e.g. `{"copyPaste": {"source": {...}, ...}}`.

use serde::Serialize;

use crate::range::GridRect;

pub const MIN_PIXEL_SIZE: u32 = 2;
pub const MAX_PIXEL_SIZE: u32 = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Dimension {
    Rows,
    Columns,
}

/// What a paste carries over from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum PasteType {
    #[serde(rename = "PASTE_NORMAL")]
    Normal,
    #[serde(rename = "PASTE_VALUES")]
    Values,
    #[serde(rename = "PASTE_FORMAT")]
    Format,
    #[serde(rename = "PASTE_NO_BORDERS")]
    NoBorders,
    #[default]
    #[serde(rename = "PASTE_FORMULA")]
    Formula,
    #[serde(rename = "PASTE_DATA_VALIDATION")]
    DataValidation,
    #[serde(rename = "PASTE_CONDITIONAL_FORMATTING")]
    ConditionalFormatting,
}

/// Row height / column width for a resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PixelSize {
    /// Fit to content.
    #[default]
    Auto,
    /// Fixed size in pixels, `2..=2000`.
    Fixed(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridRange {
    pub sheet_id: i32,
    pub start_row_index: u32,
    pub end_row_index: u32,
    pub start_column_index: u32,
    pub end_column_index: u32,
}

impl GridRange {
    pub fn new(sheet_id: i32, rect: GridRect) -> Self {
        GridRange {
            sheet_id,
            start_row_index: rect.start_row,
            end_row_index: rect.end_row,
            start_column_index: rect.start_column,
            end_column_index: rect.end_column,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridCoordinate {
    pub sheet_id: i32,
    pub row_index: u32,
    pub column_index: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionRange {
    pub sheet_id: i32,
    pub dimension: Dimension,
    pub start_index: u32,
    pub end_index: u32,
}

impl DimensionRange {
    /// Project `rect` onto one axis.
    pub fn from_rect(sheet_id: i32, dimension: Dimension, rect: GridRect) -> Self {
        let (start_index, end_index) = match dimension {
            Dimension::Rows => (rect.start_row, rect.end_row),
            Dimension::Columns => (rect.start_column, rect.end_column),
        };
        DimensionRange {
            sheet_id,
            dimension,
            start_index,
            end_index,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyPaste {
    pub source: GridRange,
    pub destination: GridRange,
    pub paste_type: PasteType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CutPaste {
    pub source: GridRange,
    pub destination: GridCoordinate,
    pub paste_type: PasteType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AutoResizeDimensions {
    pub dimensions: DimensionRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionProperties {
    pub pixel_size: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateDimensionProperties {
    pub range: DimensionRange,
    pub properties: DimensionProperties,
    /// Field mask limiting the update to `properties.pixelSize`.
    pub fields: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendDimension {
    pub sheet_id: i32,
    pub dimension: Dimension,
    pub length: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteDimension {
    pub range: DimensionRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsertDimension {
    pub range: DimensionRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateSheet {
    pub source_sheet_id: i32,
    pub new_sheet_name: String,
}

/// One queued mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Mutation {
    CopyPaste(CopyPaste),
    CutPaste(CutPaste),
    AutoResizeDimensions(AutoResizeDimensions),
    UpdateDimensionProperties(UpdateDimensionProperties),
    AppendDimension(AppendDimension),
    DeleteDimension(DeleteDimension),
    InsertDimension(InsertDimension),
    DuplicateSheet(DuplicateSheet),
}

impl Mutation {
    /// Resize `range`; `PixelSize::Auto` fits to content.
    /// The caller validates fixed sizes.
    pub(crate) fn resize(range: DimensionRange, size: PixelSize) -> Self {
        match size {
            PixelSize::Auto => {
                Mutation::AutoResizeDimensions(AutoResizeDimensions { dimensions: range })
            }
            PixelSize::Fixed(pixel_size) => {
                Mutation::UpdateDimensionProperties(UpdateDimensionProperties {
                    range,
                    properties: DimensionProperties { pixel_size },
                    fields: "pixelSize",
                })
            }
        }
    }
}
