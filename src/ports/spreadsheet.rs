use google_sheets4::api::ValueRange;
use thiserror::Error;

/// How cell values are rendered in a read response. `Unformatted` transfers
/// the stored values without display formatting applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueRender {
    Formatted,
    Unformatted,
}

impl ValueRender {
    pub fn as_api_str(&self) -> &'static str {
        match self {
            ValueRender::Formatted => "FORMATTED_VALUE",
            ValueRender::Unformatted => "UNFORMATTED_VALUE",
        }
    }
}

#[derive(Error, Debug)]
pub enum SpreadsheetServiceError {
    #[error("Request quota exceeded")]
    RateLimited,
    #[error("Spreadsheet request failed")]
    RequestFailed,
}

/// The two remote operations this job consumes. Unlike a manager bound to a
/// single document, every call names its spreadsheet: tasks read from and
/// write to documents other than the control document.
#[async_trait::async_trait]
pub trait SpreadsheetService: Send + Sync {
    async fn get_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        render: ValueRender,
    ) -> error_stack::Result<ValueRange, SpreadsheetServiceError>;

    /// Writes `body` into `range` with RAW input interpretation.
    async fn update_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        body: ValueRange,
    ) -> error_stack::Result<(), SpreadsheetServiceError>;
}
