use std::fmt::Debug;
use std::path::Path;

use error_stack::Report;
use google_sheets4::api::ValueRange;
use google_sheets4::{hyper, hyper_rustls, Error as SheetsApiError, Sheets};
use tracing::instrument;

use super::auth::{self, AuthError};
use super::http_client;
use crate::ports::spreadsheet::{SpreadsheetService, SpreadsheetServiceError, ValueRender};

type Connector = hyper_rustls::HttpsConnector<hyper::client::HttpConnector>;

/// `google-sheets4` hub behind the [`SpreadsheetService`] port. One client
/// serves every document a run touches; the spreadsheet id travels with each
/// call.
pub struct GoogleSheetsClient {
    hub: Sheets<Connector>,
}

impl Debug for GoogleSheetsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GoogleSheetsClient")
    }
}

impl GoogleSheetsClient {
    #[instrument(name = "GoogleSheetsClient::new")]
    pub async fn new(
        credentials_file: &Path,
        token_cache_file: &Path,
    ) -> error_stack::Result<Self, AuthError> {
        let client = http_client::http_client();
        let auth = auth::auth(credentials_file, token_cache_file, client.clone()).await?;
        let hub: Sheets<Connector> = Sheets::new(client, auth);

        Ok(GoogleSheetsClient { hub })
    }
}

/// The quota signal arrives either as a plain HTTP 429 or inside the JSON
/// error body; everything else is a generic request failure.
fn is_rate_limit(err: &SheetsApiError) -> bool {
    match err {
        SheetsApiError::Failure(response) => {
            response.status() == hyper::StatusCode::TOO_MANY_REQUESTS
        }
        SheetsApiError::BadRequest(body) => body["error"]["code"].as_i64() == Some(429),
        _ => false,
    }
}

fn classify(err: SheetsApiError) -> Report<SpreadsheetServiceError> {
    let context = if is_rate_limit(&err) {
        SpreadsheetServiceError::RateLimited
    } else {
        SpreadsheetServiceError::RequestFailed
    };
    Report::new(context).attach_printable(err.to_string())
}

#[async_trait::async_trait]
impl SpreadsheetService for GoogleSheetsClient {
    #[instrument]
    async fn get_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        render: ValueRender,
    ) -> error_stack::Result<ValueRange, SpreadsheetServiceError> {
        let response = self
            .hub
            .spreadsheets()
            .values_get(spreadsheet_id, range)
            .major_dimension("ROWS")
            .value_render_option(render.as_api_str())
            .doit()
            .await
            .map_err(|err| {
                classify(err).attach_printable(format!("Failed to fetch values for range {range}"))
            })?;

        Ok(response.1)
    }

    #[instrument(skip(body))]
    async fn update_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        body: ValueRange,
    ) -> error_stack::Result<(), SpreadsheetServiceError> {
        self.hub
            .spreadsheets()
            .values_update(body, spreadsheet_id, range)
            .value_input_option("RAW")
            .doit()
            .await
            .map(|_| ())
            .map_err(|err| {
                classify(err).attach_printable(format!("Failed to write to range {range}"))
            })
    }
}
