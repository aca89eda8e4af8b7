//! Schedule rows stored in a Google Sheets tab.
//!
//! Rows are read unformatted with dates as serial numbers, so checkboxes
//! come back as booleans and times don't depend on the sheet's locale.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sheetcal_core::error::{SyncError, SyncResult};
use sheetcal_core::row::{COLUMN_COUNT, RowBlock, column};
use sheetcal_core::store::{RowStore, RowWrite};
use tracing::debug;
use url::Url;

/// A tab of a spreadsheet, accessed with a bearer token.
pub struct GoogleSheet {
    http: reqwest::Client,
    base: Url,
    spreadsheet_id: String,
    sheet_name: String,
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchUpdateRequest<'a> {
    value_input_option: &'static str,
    data: Vec<RangeValues<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RangeValues<'a> {
    range: String,
    major_dimension: &'static str,
    values: [[&'a str; 2]; 1],
}

impl GoogleSheet {
    pub fn new(
        api_base: &str,
        spreadsheet_id: &str,
        sheet_name: &str,
        access_token: &str,
    ) -> SyncResult<Self> {
        let base = Url::parse(api_base)
            .map_err(|e| SyncError::Config(format!("Invalid Sheets API URL '{api_base}': {e}")))?;
        if base.cannot_be_a_base() {
            return Err(SyncError::Config(format!(
                "Invalid Sheets API URL '{api_base}'"
            )));
        }

        Ok(GoogleSheet {
            http: reqwest::Client::new(),
            base,
            spreadsheet_id: spreadsheet_id.to_string(),
            sheet_name: sheet_name.to_string(),
            access_token: access_token.to_string(),
        })
    }

    /// `.../v4/spreadsheets/{id}/` followed by `segments`.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // cannot_be_a_base was rejected in new()
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty()
                .extend(["v4", "spreadsheets", self.spreadsheet_id.as_str()])
                .extend(segments);
        }
        url
    }

    fn range(&self, first_column: usize, last_column: usize, first_row: u32, last_row: u32) -> String {
        a1_range(&self.sheet_name, first_column, last_column, first_row, last_row)
    }

    async fn send(&self, request: reqwest::RequestBuilder, what: &str) -> SyncResult<reqwest::Response> {
        let response = request
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| SyncError::Sheet(format!("Failed to {what}: {e}")))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(SyncError::Sheet(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                format!("Failed to {what}: access denied ({status})")
            }
            _ => format!("Failed to {what}: {status}: {body}"),
        }))
    }
}

impl RowStore for GoogleSheet {
    async fn read_rows(&self, block: RowBlock) -> SyncResult<Vec<Vec<Value>>> {
        let range = self.range(0, COLUMN_COUNT - 1, block.first_row, block.last_row());
        let url = self.url(&["values", &range]);
        debug!(%range, "reading rows");

        let request = self.http.get(url).query(&[
            ("majorDimension", "ROWS"),
            ("valueRenderOption", "UNFORMATTED_VALUE"),
            ("dateTimeRenderOption", "SERIAL_NUMBER"),
        ]);
        let response = self.send(request, "read rows").await?;

        let body: ValueRange = response
            .json()
            .await
            .map_err(|e| SyncError::Sheet(format!("Failed to parse rows: {e}")))?;
        Ok(body.values)
    }

    async fn write_results(&self, writes: &[RowWrite]) -> SyncResult<()> {
        if writes.is_empty() {
            return Ok(());
        }

        let data = writes
            .iter()
            .map(|w| RangeValues {
                range: self.range(column::STATUS, column::EVENT_ID, w.row, w.row),
                major_dimension: "ROWS",
                values: [[w.result.status.as_str(), w.result.event_id.as_str()]],
            })
            .collect();
        let body = BatchUpdateRequest {
            value_input_option: "RAW",
            data,
        };
        debug!(rows = writes.len(), "writing results");

        let request = self.http.post(self.url(&["values:batchUpdate"])).json(&body);
        self.send(request, "write results").await?;
        Ok(())
    }

    async fn clear_actions(&self, block: RowBlock) -> SyncResult<()> {
        let range = self.range(column::ACTION, column::ACTION, block.first_row, block.last_row());
        debug!(%range, "clearing actions");

        let request = self
            .http
            .post(self.url(&["values", &format!("{range}:clear")]))
            .json(&serde_json::json!({}));
        self.send(request, "clear actions").await?;
        Ok(())
    }
}

/// Column letters for a 0-based index: 0 → A, 25 → Z, 26 → AA.
fn column_letters(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// An A1 range on `sheet`. Sheet names other than plain words are quoted.
fn a1_range(sheet: &str, first_column: usize, last_column: usize, first_row: u32, last_row: u32) -> String {
    let plain = !sheet.is_empty() && sheet.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    let sheet = if plain {
        sheet.to_string()
    } else {
        format!("'{}'", sheet.replace('\'', "''"))
    };

    format!(
        "{sheet}!{}{first_row}:{}{last_row}",
        column_letters(first_column),
        column_letters(last_column)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sheetcal_core::row::RowResult;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sheet(server: &MockServer) -> GoogleSheet {
        GoogleSheet::new(&server.uri(), "sheet-1", "Scheduler", "token-1").expect("sheet")
    }

    #[test]
    fn column_letters_wrap_past_z() {
        assert_eq!(column_letters(0), "A");
        assert_eq!(column_letters(8), "I");
        assert_eq!(column_letters(11), "L");
        assert_eq!(column_letters(25), "Z");
        assert_eq!(column_letters(26), "AA");
        assert_eq!(column_letters(27), "AB");
    }

    #[test]
    fn a1_ranges_quote_odd_sheet_names() {
        assert_eq!(a1_range("Scheduler", 0, 11, 2, 9), "Scheduler!A2:L9");
        assert_eq!(a1_range("My Plan", 8, 9, 4, 4), "'My Plan'!I4:J4");
        assert_eq!(a1_range("Bob's", 0, 0, 1, 1), "'Bob''s'!A1:A1");
    }

    #[test]
    fn rejects_bad_base_url() {
        assert!(GoogleSheet::new("not a url", "id", "Scheduler", "t").is_err());
        assert!(GoogleSheet::new("mailto:me@example.com", "id", "Scheduler", "t").is_err());
    }

    #[tokio::test]
    async fn read_rows_requests_unformatted_block() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v4/spreadsheets/sheet-1/values/Scheduler!A2:L4"))
            .and(query_param("valueRenderOption", "UNFORMATTED_VALUE"))
            .and(query_param("dateTimeRenderOption", "SERIAL_NUMBER"))
            .and(header("authorization", "Bearer token-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "range": "Scheduler!A2:L4",
                "majorDimension": "ROWS",
                "values": [
                    ["Add", "", "", "", "Team Sync", "", "a@x.com", true, "", "", 45658.375, 45658.4166],
                    ["Delete"]
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let rows = sheet(&server)
            .read_rows(RowBlock::new(2, 4).unwrap())
            .await
            .expect("rows");

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][4], json!("Team Sync"));
        assert_eq!(rows[0][7], json!(true));
        assert_eq!(rows[1], vec![json!("Delete")]);
    }

    #[tokio::test]
    async fn read_rows_of_empty_block() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "range": "Scheduler!A2:L4",
                "majorDimension": "ROWS"
            })))
            .mount(&server)
            .await;

        let rows = sheet(&server)
            .read_rows(RowBlock::new(2, 4).unwrap())
            .await
            .expect("rows");
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn write_results_sends_one_batch() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v4/spreadsheets/sheet-1/values:batchUpdate"))
            .and(body_json(json!({
                "valueInputOption": "RAW",
                "data": [
                    {"range": "Scheduler!I2:J2", "majorDimension": "ROWS", "values": [["Added", "evt-1"]]},
                    {"range": "Scheduler!I5:J5", "majorDimension": "ROWS", "values": [["Deleted", ""]]}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let writes = vec![
            RowWrite {
                row: 2,
                result: RowResult::new("Added", "evt-1"),
            },
            RowWrite {
                row: 5,
                result: RowResult::new("Deleted", ""),
            },
        ];
        sheet(&server).write_results(&writes).await.expect("write");
    }

    #[tokio::test]
    async fn write_results_skips_empty_batch() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        sheet(&server).write_results(&[]).await.expect("write");
    }

    #[tokio::test]
    async fn clear_actions_clears_first_column() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v4/spreadsheets/sheet-1/values/Scheduler!A2:A9:clear"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        sheet(&server)
            .clear_actions(RowBlock::new(2, 9).unwrap())
            .await
            .expect("clear");
    }

    #[tokio::test]
    async fn http_errors_become_sheet_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let err = sheet(&server)
            .read_rows(RowBlock::new(1, 1).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::Sheet(ref msg) if msg.contains("access denied")));
    }
}
