//! A1 range notation -> zero-based, half-open index rectangles.
//!
//! Accepted notations are a single cell (`B7`), cell to cell (`A1:C10`),
//! whole rows (`3:5`) and whole columns (`B:D`). Rows and columns are 1-based
//! in the notation and 0-based in the resolved [`GridRect`].

use std::sync::LazyLock;

use regex::Regex;

use crate::column;
use crate::error::{InputError, SheetError};

static ROW_RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+:[0-9]+$").expect("row range pattern compiles"));

static COLUMN_RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]+:[A-Z]+$").expect("column range pattern compiles"));

static ANY_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z]+[0-9]+:[A-Z]+[0-9]+$|^[0-9]+:[0-9]+$|^[A-Z]+:[A-Z]+$|^[A-Z]+[0-9]+$")
        .expect("general range pattern compiles")
});

/// The notation shape an operation expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Shape {
    /// Whole rows only, e.g. `3:5`.
    Row,
    /// Whole columns only, e.g. `B:D`.
    Column,
    /// Any accepted notation.
    #[default]
    General,
}

impl Shape {
    fn pattern(self) -> &'static Regex {
        match self {
            Shape::Row => &ROW_RANGE,
            Shape::Column => &COLUMN_RANGE,
            Shape::General => &ANY_RANGE,
        }
    }

    fn mismatch(self) -> &'static str {
        match self {
            Shape::Row => "expected a row range such as 3:5",
            Shape::Column => "expected a column range such as B:D",
            Shape::General => "expected a cell, cell range, row range or column range",
        }
    }
}

/// Zero-based, half-open rectangle of row and column indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridRect {
    pub start_row: u32,
    pub end_row: u32,
    pub start_column: u32,
    pub end_column: u32,
}

impl GridRect {
    #[inline]
    pub const fn height(&self) -> u32 {
        self.end_row - self.start_row
    }

    #[inline]
    pub const fn width(&self) -> u32 {
        self.end_column - self.start_column
    }
}

/// One side of a notation: optional column letters and optional row number,
/// both kept as 1-based ordinals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub column: Option<u32>,
    pub row: Option<u32>,
}

impl Endpoint {
    fn parse(text: &str, notation: &str) -> Result<Self, SheetError> {
        let split = text
            .find(|c: char| !c.is_ascii_uppercase())
            .unwrap_or(text.len());
        let (letters, digits) = text.split_at(split);

        let column = match letters {
            "" => None,
            letters => Some(column::decode(letters)?),
        };

        let row = match digits {
            "" => None,
            digits => {
                let row: u32 = digits
                    .parse()
                    .ok()
                    .filter(|&row| row <= column::MAX_ORDINAL)
                    .ok_or_else(|| invalid(notation, "row number is out of range"))?;
                if row == 0 {
                    return Err(invalid(notation, "row numbers start at 1"));
                }
                Some(row)
            }
        };

        Ok(Endpoint { column, row })
    }
}

/// Parsed range notation, before it is bound to a sheet's dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notation {
    pub start: Endpoint,
    pub end: Option<Endpoint>,
}

impl Notation {
    /// Validate `text` against `shape` and split it into endpoints.
    pub fn parse(text: &str, shape: Shape) -> Result<Self, SheetError> {
        if !shape.pattern().is_match(text) {
            return Err(invalid(text, shape.mismatch()));
        }

        let (start, end) = match text.split_once(':') {
            Some((start, end)) => (start, Some(end)),
            None => (text, None),
        };

        let start = Endpoint::parse(start, text)?;
        let end = end.map(|end| Endpoint::parse(end, text)).transpose()?;

        if let Some(end) = end {
            if !ordered(start.row, end.row) || !ordered(start.column, end.column) {
                return Err(invalid(text, "range end comes before its start"));
            }
        }

        Ok(Notation { start, end })
    }

    /// Bind to a sheet of `row_count` x `column_count`. Sides the notation
    /// leaves open span the whole sheet on that axis.
    pub fn to_rect(&self, row_count: u32, column_count: u32) -> GridRect {
        let start_row = self.start.row.map_or(0, |r| r - 1);
        let start_column = self.start.column.map_or(0, |c| c - 1);

        let (end_row, end_column) = match self.end {
            Some(end) => (
                end.row.unwrap_or(row_count),
                end.column.unwrap_or(column_count),
            ),
            None => (start_row + 1, start_column + 1),
        };

        GridRect {
            start_row,
            end_row,
            start_column,
            end_column,
        }
    }
}

/// Resolve `notation` against a sheet of `row_count` x `column_count`.
pub fn resolve(
    notation: &str,
    row_count: u32,
    column_count: u32,
    shape: Shape,
) -> Result<GridRect, SheetError> {
    Ok(Notation::parse(notation, shape)?.to_rect(row_count, column_count))
}

fn ordered(start: Option<u32>, end: Option<u32>) -> bool {
    match (start, end) {
        (Some(start), Some(end)) => start <= end,
        _ => true,
    }
}

fn invalid(notation: &str, reason: &'static str) -> SheetError {
    InputError::InvalidNotation {
        notation: notation.to_owned(),
        reason,
    }
    .into()
}
