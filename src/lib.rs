//! Batched row and column mutations for Google Sheets.
//!
//! Range notation such as `A1:C10`, `B:D` or `3:5` is resolved against the
//! cached dimensions of a sheet into zero-based, half-open index rectangles,
//! which are then queued as `batchUpdate` requests and sent in one call.
//!
//! ```rust,no_run
//! use sheetchain::{GoogleSheetProvider, PasteType, PixelSize, Spreadsheet};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = GoogleSheetProvider::try_new_from_env().await?;
//! let doc = Spreadsheet::open(provider).await?;
//!
//! let mut chain = doc.actions();
//! chain
//!     .copy_paste("Blad1", "A1:B10", "D1", PasteType::Values)?
//!     .resize_column("Blad1", "D:E", PixelSize::Auto)?
//!     .delete_row("Blad1", "12:20")?;
//! chain.flush().await?;
//! # Ok(())
//! # }
//! ```

pub mod actions;
pub mod column;
pub mod error;
pub mod providers;
pub mod range;
pub mod request;
pub mod sheet;
pub mod spreadsheet;

pub use actions::ActionChain;
pub use error::{InputError, SheetError};
pub use providers::google_sheets::{GoogleSheetConfig, GoogleSheetError, GoogleSheetProvider};
pub use providers::{BatchResponse, RangeResult, SpreadsheetProvider};
pub use range::{resolve, GridRect, Shape};
pub use request::{Dimension, Mutation, PasteType, PixelSize};
pub use sheet::{SheetCatalog, SheetInfo, SpreadsheetInfo, SpreadsheetMetadata};
pub use spreadsheet::Spreadsheet;
