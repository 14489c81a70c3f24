use super::api::{Rows, SheetsApi};
use super::auth;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;

const SHEETS_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const DRIVE_FILES: &str = "https://www.googleapis.com/drive/v3/files";
const SPREADSHEET_MIME: &str = "application/vnd.google-apps.spreadsheet";

/// Blocking Drive + Sheets client authenticated with a bearer token.
pub struct GoogleClient {
    http: Client,
    token: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct DriveFiles {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Spreadsheet {
    #[serde(default)]
    spreadsheet_id: String,
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    sheet_id: i64,
    title: String,
}

pub fn http_client(timeout_secs: u64) -> AppResult<Client> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(timeout_secs.max(1)))
        .user_agent(concat!("taxibook/", env!("CARGO_PKG_VERSION")))
        .build()?)
}

impl GoogleClient {
    pub fn new(http: Client, token: String) -> Self {
        Self { http, token }
    }

    /// Build a client from the configuration, resolving credentials.
    pub fn from_config(cfg: &Config) -> AppResult<Self> {
        let http = http_client(cfg.sync.timeout_secs)?;
        let token = auth::access_token(&http, cfg)?;
        Ok(Self::new(http, token))
    }

    fn url(base: &str, segments: &[&str]) -> AppResult<Url> {
        let mut url = Url::parse(base).map_err(|e| AppError::Other(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| AppError::Other(format!("cannot-be-a-base URL: {base}")))?
            .extend(segments);
        Ok(url)
    }

    fn values_url(spreadsheet_id: &str, range: &str, action: Option<&str>) -> AppResult<Url> {
        let last = match action {
            Some(a) => format!("{range}:{a}"),
            None => range.to_string(),
        };
        Self::url(SHEETS_BASE, &[spreadsheet_id, "values", &last])
    }

    fn send(&self, req: RequestBuilder) -> AppResult<Response> {
        let resp = req.bearer_auth(&self.token).send()?;
        check(resp)
    }

    fn metadata(&self, spreadsheet_id: &str) -> AppResult<Spreadsheet> {
        let url = Self::url(SHEETS_BASE, &[spreadsheet_id])?;
        let resp = self.send(
            self.http
                .get(url)
                .query(&[("fields", "spreadsheetId,sheets.properties(sheetId,title)")]),
        )?;
        Ok(resp.json()?)
    }

    fn batch_update(&self, spreadsheet_id: &str, requests: Value) -> AppResult<()> {
        let url = Self::url(SHEETS_BASE, &[&format!("{spreadsheet_id}:batchUpdate")])?;
        self.send(self.http.post(url).json(&json!({ "requests": requests })))?;
        Ok(())
    }
}

/// Turn a non-2xx response into `AppError::GoogleApi` with Google's message.
fn check(resp: Response) -> AppResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().unwrap_or_default();
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or(body);
    Err(AppError::GoogleApi {
        status: status.as_u16(),
        message,
    })
}

fn cell_to_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl SheetsApi for GoogleClient {
    fn spreadsheet_exists(&self, spreadsheet_id: &str) -> AppResult<bool> {
        match self.metadata(spreadsheet_id) {
            Ok(_) => Ok(true),
            Err(AppError::GoogleApi { status, .. })
                if status == StatusCode::NOT_FOUND.as_u16()
                    || status == StatusCode::FORBIDDEN.as_u16() =>
            {
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    fn find_spreadsheet(&self, name: &str) -> AppResult<Option<String>> {
        let query = format!(
            "name = '{}' and mimeType = '{}' and trashed = false",
            name.replace('\\', "\\\\").replace('\'', "\\'"),
            SPREADSHEET_MIME
        );
        let url = Self::url(DRIVE_FILES, &[])?;
        let resp = self.send(self.http.get(url).query(&[
            ("q", query.as_str()),
            ("fields", "files(id,name)"),
            ("spaces", "drive"),
        ]))?;
        let files: DriveFiles = resp.json()?;
        Ok(files.files.into_iter().next().map(|f| f.id))
    }

    fn create_spreadsheet(&self, name: &str, sheets: &[&str]) -> AppResult<String> {
        let url = Self::url(SHEETS_BASE, &[])?;
        let body = json!({
            "properties": { "title": name },
            "sheets": sheets
                .iter()
                .map(|title| json!({ "properties": { "title": title } }))
                .collect::<Vec<_>>(),
        });
        let created: Spreadsheet = self.send(self.http.post(url).json(&body))?.json()?;
        if created.spreadsheet_id.is_empty() {
            return Err(AppError::Sync("Sheets API returned no spreadsheetId".into()));
        }
        Ok(created.spreadsheet_id)
    }

    fn sheet_titles(&self, spreadsheet_id: &str) -> AppResult<Vec<String>> {
        Ok(self
            .metadata(spreadsheet_id)?
            .sheets
            .into_iter()
            .map(|s| s.properties.title)
            .collect())
    }

    fn add_sheet(&self, spreadsheet_id: &str, title: &str) -> AppResult<()> {
        self.batch_update(
            spreadsheet_id,
            json!([{ "addSheet": { "properties": { "title": title } } }]),
        )
    }

    fn get_values(&self, spreadsheet_id: &str, range: &str) -> AppResult<Rows> {
        let url = Self::values_url(spreadsheet_id, range, None)?;
        let vr: ValueRange = self.send(self.http.get(url))?.json()?;
        Ok(vr
            .values
            .iter()
            .map(|row| row.iter().map(cell_to_string).collect())
            .collect())
    }

    fn update_values(&self, spreadsheet_id: &str, range: &str, values: Rows) -> AppResult<()> {
        let url = Self::values_url(spreadsheet_id, range, None)?;
        self.send(
            self.http
                .put(url)
                .query(&[("valueInputOption", "USER_ENTERED")])
                .json(&json!({ "range": range, "majorDimension": "ROWS", "values": values })),
        )?;
        Ok(())
    }

    fn append_values(&self, spreadsheet_id: &str, range: &str, values: Rows) -> AppResult<()> {
        let url = Self::values_url(spreadsheet_id, range, Some("append"))?;
        self.send(
            self.http
                .post(url)
                .query(&[
                    ("valueInputOption", "USER_ENTERED"),
                    ("insertDataOption", "INSERT_ROWS"),
                ])
                .json(&json!({ "majorDimension": "ROWS", "values": values })),
        )?;
        Ok(())
    }

    fn clear_values(&self, spreadsheet_id: &str, range: &str) -> AppResult<()> {
        let url = Self::values_url(spreadsheet_id, range, Some("clear"))?;
        self.send(self.http.post(url).json(&json!({})))?;
        Ok(())
    }

    fn delete_row(&self, spreadsheet_id: &str, sheet: &str, row: usize) -> AppResult<()> {
        if row == 0 {
            return Err(AppError::Sync("rows are 1-based".into()));
        }
        let sheet_id = self
            .metadata(spreadsheet_id)?
            .sheets
            .into_iter()
            .find(|s| s.properties.title == sheet)
            .map(|s| s.properties.sheet_id)
            .ok_or_else(|| AppError::Sync(format!("sheet '{}' not found", sheet)))?;

        self.batch_update(
            spreadsheet_id,
            json!([{
                "deleteDimension": {
                    "range": {
                        "sheetId": sheet_id,
                        "dimension": "ROWS",
                        "startIndex": row - 1,
                        "endIndex": row,
                    }
                }
            }]),
        )
    }
}
