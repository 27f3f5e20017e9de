//! Google Sheets v4 values API client

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::sheet::rows_to_records;
use crate::domain::{AccessTokenProvider, AppendAck, DomainError, Record, SheetStore};
use crate::infrastructure::http::{HttpClientTrait, HttpRequest, HttpResponse};

pub const SHEETS_API_BASE_URL: &str = "https://sheets.googleapis.com";

/// Columns read for every sheet
const READ_COLUMNS: &str = "A:Z";

#[derive(Debug, Deserialize)]
struct ValuesResponse {
    #[serde(default)]
    values: Option<Vec<Vec<serde_json::Value>>>,
}

#[derive(Debug, Deserialize)]
struct AppendResponse {
    #[serde(default)]
    updates: Option<AppendUpdates>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppendUpdates {
    updated_range: Option<String>,
    updated_rows: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
    status: Option<String>,
}

/// Sheet store backed by one Google spreadsheet
#[derive(Debug)]
pub struct GoogleSheetsClient {
    client: Arc<dyn HttpClientTrait>,
    tokens: Arc<dyn AccessTokenProvider>,
    spreadsheet_id: String,
    base_url: String,
}

impl GoogleSheetsClient {
    pub fn new(
        client: Arc<dyn HttpClientTrait>,
        tokens: Arc<dyn AccessTokenProvider>,
        spreadsheet_id: impl Into<String>,
    ) -> Self {
        Self::with_base_url(client, tokens, spreadsheet_id, SHEETS_API_BASE_URL)
    }

    pub fn with_base_url(
        client: Arc<dyn HttpClientTrait>,
        tokens: Arc<dyn AccessTokenProvider>,
        spreadsheet_id: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            tokens,
            spreadsheet_id: spreadsheet_id.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn ensure_configured(&self) -> Result<(), DomainError> {
        if self.spreadsheet_id.trim().is_empty() {
            return Err(DomainError::configuration("Spreadsheet ID is not configured"));
        }
        Ok(())
    }

    /// `.../v4/spreadsheets/{id}/values/{range}{suffix}` with path segments encoded
    fn values_url(&self, range: &str, suffix: &str) -> Result<String, DomainError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            DomainError::configuration(format!("Invalid Sheets API base URL: {}", e))
        })?;
        let target = format!("{}{}", range, suffix);

        url.path_segments_mut()
            .map_err(|_| DomainError::configuration("Sheets API base URL cannot be a base"))?
            .pop_if_empty()
            .extend([
                "v4",
                "spreadsheets",
                self.spreadsheet_id.as_str(),
                "values",
                target.as_str(),
            ]);

        Ok(url.to_string())
    }

    async fn authorization(&self) -> Result<String, DomainError> {
        Ok(self.tokens.access_token().await?.bearer_header())
    }
}

/// A1 range covering the read columns of a sheet, quoting names that need it
pub fn sheet_range(sheet: &str) -> String {
    let plain = sheet.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');

    if plain {
        format!("{}!{}", sheet, READ_COLUMNS)
    } else {
        format!("'{}'!{}", sheet.replace('\'', "''"), READ_COLUMNS)
    }
}

fn cell_to_string(cell: serde_json::Value) -> String {
    match cell {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Message from a Sheets error payload, or the raw body
fn error_detail(response: &HttpResponse) -> String {
    match response.json::<ErrorEnvelope>() {
        Ok(envelope) => {
            let status = envelope.error.status.unwrap_or_default();
            let message = envelope.error.message.unwrap_or_default();
            format!("HTTP {} {}: {}", response.status, status, message)
                .trim()
                .to_string()
        }
        Err(_) => format!("HTTP {}: {}", response.status, response.body_excerpt()),
    }
}

#[async_trait]
impl SheetStore for GoogleSheetsClient {
    async fn fetch_sheet(&self, sheet: &str) -> Result<Vec<Record>, DomainError> {
        self.ensure_configured()?;

        let url = self.values_url(&sheet_range(sheet), "")?;
        let request = HttpRequest::get(url)
            .service("google-sheets")
            .header("Authorization", self.authorization().await?)
            .query("majorDimension", "ROWS");

        let response = self
            .client
            .send(request)
            .await
            .map_err(|e| DomainError::sheet_fetch(sheet, e.to_string()))?;

        if !response.is_success() {
            let detail = error_detail(&response);
            warn!(sheet = %sheet, detail = %detail, "Sheets API rejected read");
            return Err(DomainError::sheet_fetch(sheet, detail));
        }

        let parsed: ValuesResponse = response.json().map_err(|e| {
            DomainError::sheet_fetch(sheet, format!("Failed to parse response: {}", e))
        })?;

        let rows: Vec<Vec<String>> = parsed
            .values
            .unwrap_or_default()
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect();

        let records = rows_to_records(&rows);
        debug!(sheet = %sheet, records = records.len(), "Fetched sheet");

        Ok(records)
    }

    async fn append_rows(
        &self,
        sheet: &str,
        rows: Vec<Vec<String>>,
    ) -> Result<AppendAck, DomainError> {
        self.ensure_configured()?;

        let row_count = rows.len();
        let url = self.values_url(&sheet_range(sheet), ":append")?;
        let request = HttpRequest::post(url)
            .service("google-sheets")
            .header("Authorization", self.authorization().await?)
            .query("valueInputOption", "USER_ENTERED")
            .query("insertDataOption", "INSERT_ROWS")
            .json(serde_json::json!({ "values": rows }));

        let response = self
            .client
            .send(request)
            .await
            .map_err(|e| DomainError::sheet_write(sheet, e.to_string()))?;

        if !response.is_success() {
            let detail = error_detail(&response);
            warn!(sheet = %sheet, detail = %detail, "Sheets API rejected append");
            return Err(DomainError::sheet_write(sheet, detail));
        }

        let updates = response
            .json::<AppendResponse>()
            .ok()
            .and_then(|r| r.updates);

        let ack = AppendAck {
            updated_range: updates.as_ref().and_then(|u| u.updated_range.clone()),
            updated_rows: updates
                .and_then(|u| u.updated_rows)
                .unwrap_or(row_count),
        };

        info!(sheet = %sheet, rows = ack.updated_rows, "Appended rows to sheet");

        Ok(ack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::credentials::mock::StaticTokenProvider;
    use crate::infrastructure::http::mock::MockHttpClient;
    use crate::infrastructure::http::RequestBody;

    const CITIES_URL: &str =
        "https://sheets.googleapis.com/v4/spreadsheets/sheet-123/values/Cities!A:Z";
    const SUBMISSIONS_APPEND_URL: &str =
        "https://sheets.googleapis.com/v4/spreadsheets/sheet-123/values/Submissions!A:Z:append";

    fn client_with(http: Arc<MockHttpClient>) -> GoogleSheetsClient {
        GoogleSheetsClient::new(http, Arc::new(StaticTokenProvider::new("ya29.test")), "sheet-123")
    }

    #[test]
    fn test_sheet_range_quoting() {
        assert_eq!(sheet_range("Cities"), "Cities!A:Z");
        assert_eq!(sheet_range("Practice Areas"), "'Practice Areas'!A:Z");
        assert_eq!(sheet_range("Bob's"), "'Bob''s'!A:Z");
    }

    #[tokio::test]
    async fn test_fetch_sheet_builds_records() {
        let http = Arc::new(MockHttpClient::new().with_response(
            CITIES_URL,
            200,
            serde_json::json!({
                "range": "Cities!A1:Z3",
                "majorDimension": "ROWS",
                "values": [
                    ["City", "State", "Slug"],
                    ["Los Angeles", "CA", "los-angeles"],
                    ["Fresno", "CA"]
                ]
            }),
        ));

        let records = client_with(http.clone()).fetch_sheet("Cities").await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("City"), Some("Los Angeles"));
        assert_eq!(records[1].get("Slug"), Some(""));

        let requests = http.requests();
        assert_eq!(requests[0].header_value("authorization"), Some("Bearer ya29.test"));
    }

    #[tokio::test]
    async fn test_header_only_sheet_is_empty() {
        let http = Arc::new(MockHttpClient::new().with_response(
            CITIES_URL,
            200,
            serde_json::json!({"values": [["City", "State"]]}),
        ));

        let records = client_with(http).fetch_sheet("Cities").await.unwrap();

        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_sheet_without_values_is_empty() {
        let http = Arc::new(MockHttpClient::new().with_response(
            CITIES_URL,
            200,
            serde_json::json!({"range": "Cities!A1:Z1000", "majorDimension": "ROWS"}),
        ));

        let records = client_with(http).fetch_sheet("Cities").await.unwrap();

        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_numeric_cells_are_stringified() {
        let http = Arc::new(MockHttpClient::new().with_response(
            CITIES_URL,
            200,
            serde_json::json!({"values": [["City", "Population"], ["Fresno", 542107]]}),
        ));

        let records = client_with(http).fetch_sheet("Cities").await.unwrap();

        assert_eq!(records[0].get("Population"), Some("542107"));
    }

    #[tokio::test]
    async fn test_api_error_is_sheet_fetch_error() {
        let http = Arc::new(MockHttpClient::new().with_response(
            CITIES_URL,
            400,
            serde_json::json!({
                "error": {"code": 400, "message": "Unable to parse range: Cities!A:Z", "status": "INVALID_ARGUMENT"}
            }),
        ));

        let err = client_with(http).fetch_sheet("Cities").await.unwrap_err();

        match err {
            DomainError::SheetFetch { sheet, message } => {
                assert_eq!(sheet, "Cities");
                assert!(message.contains("Unable to parse range"));
            }
            other => panic!("expected sheet fetch error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_network_failure_is_sheet_fetch_error() {
        let http = Arc::new(
            MockHttpClient::new()
                .with_error(CITIES_URL, DomainError::upstream("google-sheets", "connection reset")),
        );

        let err = client_with(http).fetch_sheet("Cities").await.unwrap_err();

        assert!(matches!(err, DomainError::SheetFetch { .. }));
    }

    #[tokio::test]
    async fn test_token_failure_propagates() {
        let http = Arc::new(MockHttpClient::new());
        let client = GoogleSheetsClient::new(
            http.clone(),
            Arc::new(StaticTokenProvider::failing(DomainError::configuration("no key"))),
            "sheet-123",
        );

        let err = client.fetch_sheet("Cities").await.unwrap_err();

        assert!(matches!(err, DomainError::Configuration { .. }));
        assert!(http.requests().is_empty());
    }

    #[tokio::test]
    async fn test_missing_spreadsheet_id_is_configuration_error() {
        let http = Arc::new(MockHttpClient::new());
        let client = GoogleSheetsClient::new(http, Arc::new(StaticTokenProvider::new("t")), "");

        let err = client.fetch_sheet("Cities").await.unwrap_err();

        assert!(matches!(err, DomainError::Configuration { .. }));
    }

    #[tokio::test]
    async fn test_append_rows_posts_values() {
        let http = Arc::new(MockHttpClient::new().with_response(
            SUBMISSIONS_APPEND_URL,
            200,
            serde_json::json!({
                "spreadsheetId": "sheet-123",
                "updates": {"updatedRange": "Submissions!A5:G5", "updatedRows": 1}
            }),
        ));

        let ack = client_with(http.clone())
            .append_rows("Submissions", vec![vec!["Ada".to_string(), "Lovelace".to_string()]])
            .await
            .unwrap();

        assert_eq!(ack.updated_rows, 1);
        assert_eq!(ack.updated_range.as_deref(), Some("Submissions!A5:G5"));

        let request = &http.requests()[0];
        assert_eq!(request.query_value("valueInputOption"), Some("USER_ENTERED"));
        assert_eq!(
            request.body,
            Some(RequestBody::Json(serde_json::json!({"values": [["Ada", "Lovelace"]]})))
        );
    }

    #[tokio::test]
    async fn test_append_failure_is_sheet_write_error() {
        let http = Arc::new(MockHttpClient::new().with_response(
            SUBMISSIONS_APPEND_URL,
            403,
            serde_json::json!({"error": {"code": 403, "message": "The caller does not have permission", "status": "PERMISSION_DENIED"}}),
        ));

        let err = client_with(http)
            .append_rows("Submissions", vec![vec!["x".to_string()]])
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::SheetWrite { .. }));
    }
}
