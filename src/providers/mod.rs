use a1_notation::A1;
use serde_json::Value;
use std::error::Error as StdError;
use std::fmt::Debug;

use crate::request::Mutation;
use crate::sheet::SpreadsheetMetadata;

pub mod google_sheets;
#[cfg(test)]
pub(crate) mod testing;

/// Result of reading a range from a provider.
#[derive(Debug, Clone)]
pub struct RangeResult {
    /// 2D values, row-major: Vec<row>[Vec<cell>]
    pub values: Vec<Vec<Value>>,

    /// Effective A1 range returned by the provider.
    pub range: Option<A1>,
}

/// Result of applying a batch of mutations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchResponse {
    /// One reply per applied mutation, in request order.
    pub replies: Vec<Value>,
}

#[allow(async_fn_in_trait)]
pub trait SpreadsheetProvider: Debug + Send + Sync {
    /// Provider-specific error type.
    type Error: StdError + Send + Sync + 'static;

    /// Identifier of the remote document.
    fn document_id(&self) -> &str;

    /// Fetch document properties and the per-sheet grid dimensions.
    async fn fetch_metadata(&self) -> Result<SpreadsheetMetadata, Self::Error>;

    /// Read a 2D range of values.
    ///
    /// Value ranges are passed in A1 form with a quoted sheet prefix,
    /// e.g. `'Bob''s'!A1:B2`, and should go to the API unchanged.
    async fn read_range(&self, range: &str) -> Result<RangeResult, Self::Error>;

    /// Write values in a range, interpreted as if typed by a user.
    async fn write_range(
        &self,
        range: &str,
        values: Vec<Vec<Value>>,
    ) -> Result<(), Self::Error>;

    /// Clear a range without fully deleting any rows or columns.
    async fn clear_range(
        &self,
        range: &str,
    ) -> Result<(), Self::Error>;

    /// Apply `requests` as a single atomic batch.
    async fn batch_update(
        &self,
        requests: &[Mutation],
    ) -> Result<BatchResponse, Self::Error>;
}
