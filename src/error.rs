use std::error::Error as StdError;

use thiserror::Error;

/// Boxed error reported by a [`SpreadsheetProvider`](crate::providers::SpreadsheetProvider).
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Errors raised by this crate.
#[derive(Debug, Error)]
pub enum SheetError {
    /// Bad caller input, rejected before anything is queued or sent.
    #[error(transparent)]
    Input(#[from] InputError),

    #[error("unknown sheet '{0}'")]
    UnknownSheet(String),

    /// The sheet exists but has no rows and columns to address, e.g. a
    /// chart (`OBJECT`) sheet.
    #[error("sheet '{sheet}' is a {sheet_type} sheet without a cell grid")]
    NotAGrid { sheet: String, sheet_type: String },

    #[error("Invalid A1 range '{range}': {reason}")]
    InvalidA1Range { range: String, reason: String },

    /// The provider rejected a batch. The batch is gone from the queue.
    #[error("batch update failed: {0}")]
    Apply(#[source] BoxError),

    /// Any other provider call (metadata, values) failed.
    #[error("provider error: {0}")]
    Provider(#[source] BoxError),
}

impl SheetError {
    pub(crate) fn apply<E: StdError + Send + Sync + 'static>(e: E) -> Self {
        SheetError::Apply(Box::new(e))
    }

    pub(crate) fn provider<E: StdError + Send + Sync + 'static>(e: E) -> Self {
        SheetError::Provider(Box::new(e))
    }
}

/// Synchronous input validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("invalid range notation '{notation}': {reason}")]
    InvalidNotation {
        notation: String,
        reason: &'static str,
    },

    #[error("invalid column letters '{0}'")]
    InvalidColumn(String),

    #[error("column ordinal must be at least 1")]
    ZeroOrdinal,

    #[error("pixel size {0} is outside 2..=2000")]
    PixelSize(u32),

    #[error("{0} count must be at least 1")]
    ZeroCount(&'static str),

    #[error("row number must be at least 1")]
    ZeroRow,

    #[error("range runs past the last addressable row or column")]
    IndexOverflow,
}
