use a1_notation::A1;
use google_sheets4::api::{
    BatchUpdateSpreadsheetRequest, ClearValuesRequest, Request, Spreadsheet as ApiSpreadsheet,
    ValueRange,
};
use google_sheets4::yup_oauth2::{ServiceAccountAuthenticator, ServiceAccountKey};
use google_sheets4::{
    hyper, hyper_rustls,
    hyper_rustls::HttpsConnector,
    hyper_util::{self, client::legacy::connect::HttpConnector},
    Sheets,
};
use serde_json::{Error as JsonError, Value};
use std::{env, fmt, fs, io, str::FromStr, sync::Arc};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::providers::{BatchResponse, RangeResult, SpreadsheetProvider};
use crate::request::Mutation;
use crate::sheet::{SheetCatalog, SheetInfo, SpreadsheetInfo, SpreadsheetMetadata};

/// Where to find the document and the service account credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleSheetConfig {
    pub document_id: String,
    pub service_account_path: String,
}

impl GoogleSheetConfig {
    /// Read `GOOGLE_SHEET_ID` and `SERVICE_ACCOUNT_JSON` from the environment.
    pub fn from_env() -> Result<Self, GoogleSheetError> {
        Ok(GoogleSheetConfig {
            document_id: env::var("GOOGLE_SHEET_ID")?,
            service_account_path: env::var("SERVICE_ACCOUNT_JSON")?,
        })
    }
}

pub struct GoogleSheetProvider {
    sheets: Arc<Mutex<Sheets<HttpsConnector<HttpConnector>>>>,
    pub document_id: String,
}

impl fmt::Debug for GoogleSheetProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleSheetProvider")
            .field("document_id", &self.document_id)
            .finish()
    }
}

impl GoogleSheetProvider {
    pub async fn try_new_from_env() -> Result<Self, GoogleSheetError> {
        Self::try_new(GoogleSheetConfig::from_env()?).await
    }

    pub async fn try_new(config: GoogleSheetConfig) -> Result<Self, GoogleSheetError> {
        let service_account = read_service_account_json(&config.service_account_path)?;

        let auth = ServiceAccountAuthenticator::builder(service_account)
            .build()
            .await
            .map_err(|e| GoogleSheetError::Auth(e.to_string()))?;

        let https = hyper_rustls::HttpsConnectorBuilder::new()
            .with_native_roots()
            .map_err(|e| GoogleSheetError::TlsConfig(e.to_string()))?
            .https_or_http()
            .enable_http1()
            .build();

        let client =
            hyper_util::client::legacy::Client::builder(hyper_util::rt::TokioExecutor::new())
                .build(https);

        let sheets = Sheets::new(client, auth);

        Ok(GoogleSheetProvider {
            sheets: Arc::new(Mutex::new(sheets)),
            document_id: config.document_id,
        })
    }
}

fn read_service_account_json(file_path: &str) -> Result<ServiceAccountKey, GoogleSheetError> {
    let contents = fs::read_to_string(file_path)?;
    let acc = serde_json::from_str(&contents)?;
    Ok(acc)
}

/// Flatten the `spreadsheets.get` payload into our metadata types.
fn metadata_from_api(spreadsheet: ApiSpreadsheet) -> Result<SpreadsheetMetadata, GoogleSheetError> {
    let properties = spreadsheet.properties.unwrap_or_default();
    let info = SpreadsheetInfo {
        title: properties.title.unwrap_or_default(),
        url: spreadsheet.spreadsheet_url.unwrap_or_default(),
        locale: properties.locale.unwrap_or_default(),
        time_zone: properties.time_zone.unwrap_or_default(),
    };

    let mut sheets = SheetCatalog::new();
    for sheet in spreadsheet.sheets.unwrap_or_default() {
        let props = sheet.properties.ok_or_else(|| {
            GoogleSheetError::IncompleteMetadata("sheet without properties".to_owned())
        })?;
        let title = props.title.ok_or_else(|| {
            GoogleSheetError::IncompleteMetadata("sheet without a title".to_owned())
        })?;
        let sheet_id = props.sheet_id.ok_or_else(|| {
            GoogleSheetError::IncompleteMetadata(format!("no sheet id for sheet '{title}'"))
        })?;
        let sheet_type = props.sheet_type.unwrap_or_default();

        // Only grid sheets carry row and column counts; others keep 0 x 0.
        let grid = match props.grid_properties {
            Some(grid) => grid,
            None if sheet_type == "GRID" || sheet_type.is_empty() => {
                return Err(GoogleSheetError::IncompleteMetadata(format!(
                    "no grid properties for sheet '{title}'"
                )));
            }
            None => Default::default(),
        };

        sheets.insert(
            title,
            SheetInfo {
                sheet_id,
                index: props.index.unwrap_or_default(),
                sheet_type,
                row_count: count(grid.row_count),
                column_count: count(grid.column_count),
            },
        );
    }

    Ok(SpreadsheetMetadata { info, sheets })
}

fn count(n: Option<i32>) -> u32 {
    n.and_then(|n| u32::try_from(n).ok()).unwrap_or_default()
}

/// Our descriptors serialize to the same JSON the API types deserialize from.
///
/// Goes through a JSON string rather than a `Value`: `FieldMask` only
/// deserializes from borrowed text.
fn to_api_request(mutation: &Mutation) -> Result<Request, JsonError> {
    let json = serde_json::to_string(mutation)?;
    serde_json::from_str(&json)
}

impl SpreadsheetProvider for GoogleSheetProvider {
    type Error = GoogleSheetError;

    fn document_id(&self) -> &str {
        &self.document_id
    }

    async fn fetch_metadata(&self) -> Result<SpreadsheetMetadata, Self::Error> {
        let sheets = self.sheets.lock().await;

        let (_, spreadsheet) = sheets
            .spreadsheets()
            .get(&self.document_id)
            .doit()
            .await?;

        metadata_from_api(spreadsheet)
    }

    async fn read_range(&self, range: &str) -> Result<RangeResult, Self::Error> {
        let sheets = self.sheets.lock().await;

        let (_, result) = sheets
            .spreadsheets()
            .values_get(&self.document_id, range)
            .doit()
            .await?;

        let returned_range = result
            .range
            .as_deref()
            .map(|rs| {
                A1::from_str(rs).map_err(|e| GoogleSheetError::InvalidA1Range {
                    range: rs.to_owned(),
                    reason: e.to_string(),
                })
            })
            .transpose()?;

        Ok(RangeResult {
            values: result.values.unwrap_or_default(),
            range: returned_range,
        })
    }

    async fn write_range(
        &self,
        range: &str,
        values: Vec<Vec<Value>>,
    ) -> Result<(), Self::Error> {
        let request = ValueRange {
            major_dimension: Some("ROWS".to_owned()),
            range: Some(range.to_owned()),
            values: Some(values),
        };

        let sheets = self.sheets.lock().await;

        sheets
            .spreadsheets()
            .values_update(request, &self.document_id, range)
            .value_input_option("USER_ENTERED")
            .doit()
            .await?;

        Ok(())
    }

    async fn clear_range(&self, range: &str) -> Result<(), Self::Error> {
        let sheets = self.sheets.lock().await;

        sheets
            .spreadsheets()
            .values_clear(ClearValuesRequest::default(), &self.document_id, range)
            .doit()
            .await?;

        Ok(())
    }

    async fn batch_update(&self, requests: &[Mutation]) -> Result<BatchResponse, Self::Error> {
        let requests = requests
            .iter()
            .map(to_api_request)
            .collect::<Result<Vec<_>, _>>()?;

        let request = BatchUpdateSpreadsheetRequest {
            requests: Some(requests),
            ..Default::default()
        };

        let sheets = self.sheets.lock().await;

        let (_, response) = sheets
            .spreadsheets()
            .batch_update(request, &self.document_id)
            .doit()
            .await?;

        let replies = response
            .replies
            .unwrap_or_default()
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<_, _>>()?;

        Ok(BatchResponse { replies })
    }
}

#[derive(Debug, Error)]
pub enum GoogleSheetError {
    #[error("environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("failed to read service account JSON: {0}")]
    ServiceAccountIo(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] JsonError),

    #[error("OAuth authentication failed: {0}")]
    Auth(String),

    #[error("TLS configuration error: {0}")]
    TlsConfig(String),

    #[error("HTTP transport error: {0}")]
    HttpTransport(#[from] hyper::Error),

    #[error("Google Sheets API error: {0}")]
    Api(#[from] google_sheets4::Error),

    #[error("incomplete spreadsheet metadata: {0}")]
    IncompleteMetadata(String),

    #[error("Invalid A1 range '{range}': {reason}")]
    InvalidA1Range { range: String, reason: String },
}
