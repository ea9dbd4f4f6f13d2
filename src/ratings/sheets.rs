// ABOUTME: Google Sheets rating logger that appends one row per rating change
// ABOUTME: Finds the spreadsheet by name through Drive, resolves the worksheet, then calls values:append
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use async_trait::async_trait;
use idea_core::constants::{endpoints, service_names};
use idea_core::errors::{AppError, AppResult, ErrorCode};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, instrument, warn};

use super::{RatingEvent, RatingSink};
use crate::credentials::AccessTokenProvider;

#[derive(Debug, Deserialize)]
struct DriveFileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMetadata {
    #[serde(default)]
    sheets: Vec<Sheet>,
}

#[derive(Debug, Deserialize)]
struct Sheet {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
    #[serde(default)]
    index: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorEnvelope {
    error: GoogleError,
}

#[derive(Debug, Deserialize)]
struct GoogleError {
    message: String,
}

/// Appends rating rows to a spreadsheet located by name
pub struct SheetsRatingLogger {
    spreadsheet_name: String,
    worksheet_index: usize,
    client: Client,
    credentials: Arc<dyn AccessTokenProvider>,
    drive_base: String,
    sheets_base: String,
}

impl SheetsRatingLogger {
    /// Create a logger writing to the first worksheet of `spreadsheet_name`
    #[must_use]
    pub fn new(
        spreadsheet_name: impl Into<String>,
        credentials: Arc<dyn AccessTokenProvider>,
        client: Client,
    ) -> Self {
        Self {
            spreadsheet_name: spreadsheet_name.into(),
            worksheet_index: 0,
            client,
            credentials,
            drive_base: endpoints::DRIVE_API_BASE.to_owned(),
            sheets_base: endpoints::SHEETS_API_BASE.to_owned(),
        }
    }

    /// Point the Drive and Sheets calls at different API roots
    #[must_use]
    pub fn with_api_bases(
        mut self,
        drive_base: impl Into<String>,
        sheets_base: impl Into<String>,
    ) -> Self {
        self.drive_base = drive_base.into().trim_end_matches('/').to_owned();
        self.sheets_base = sheets_base.into().trim_end_matches('/').to_owned();
        self
    }

    /// Drive search expression matching the spreadsheet by exact name
    fn drive_query(name: &str) -> String {
        let escaped = name.replace('\\', "\\\\").replace('\'', "\\'");
        format!(
            "name = '{escaped}' and mimeType = '{}' and trashed = false",
            endpoints::SPREADSHEET_MIME_TYPE
        )
    }

    /// A1 range addressing the top-left cell of `title`
    fn append_range(title: &str) -> String {
        let quoted = title.replace('\'', "''");
        urlencoding::encode(&format!("'{quoted}'!A1")).into_owned()
    }

    #[instrument(skip(self, token), fields(spreadsheet = %self.spreadsheet_name))]
    async fn find_spreadsheet_id(&self, token: &str) -> AppResult<String> {
        let response = self
            .client
            .get(format!("{}/files", self.drive_base))
            .bearer_auth(token)
            .query(&[
                ("q", Self::drive_query(&self.spreadsheet_name).as_str()),
                ("fields", "files(id,name)"),
                ("pageSize", "1"),
                ("supportsAllDrives", "true"),
                ("includeItemsFromAllDrives", "true"),
            ])
            .send()
            .await
            .map_err(transport_error)?;

        let listing: DriveFileList = parse_response(response).await?;
        listing
            .files
            .into_iter()
            .next()
            .map(|file| file.id)
            .ok_or_else(|| {
                AppError::new(
                    ErrorCode::ResourceNotFound,
                    format!(
                        "Spreadsheet '{}' not found; share it with the service account",
                        self.spreadsheet_name
                    ),
                )
            })
    }

    #[instrument(skip(self, token))]
    async fn worksheet_title(&self, token: &str, spreadsheet_id: &str) -> AppResult<String> {
        let response = self
            .client
            .get(format!("{}/spreadsheets/{spreadsheet_id}", self.sheets_base))
            .bearer_auth(token)
            .query(&[("fields", "sheets.properties(sheetId,title,index)")])
            .send()
            .await
            .map_err(transport_error)?;

        let metadata: SpreadsheetMetadata = parse_response(response).await?;
        metadata
            .sheets
            .into_iter()
            .enumerate()
            .find(|(position, sheet)| {
                sheet.properties.index.unwrap_or(*position) == self.worksheet_index
            })
            .map(|(_, sheet)| sheet.properties.title)
            .ok_or_else(|| {
                AppError::not_found(format!(
                    "Worksheet {} of '{}'",
                    self.worksheet_index, self.spreadsheet_name
                ))
            })
    }

    #[instrument(skip(self, token, row))]
    async fn append_row(
        &self,
        token: &str,
        spreadsheet_id: &str,
        worksheet: &str,
        row: Vec<Value>,
    ) -> AppResult<()> {
        let url = format!(
            "{}/spreadsheets/{spreadsheet_id}/values/{}:append",
            self.sheets_base,
            Self::append_range(worksheet)
        );
        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .query(&[
                ("valueInputOption", "RAW"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .json(&json!({ "majorDimension": "ROWS", "values": [row] }))
            .send()
            .await
            .map_err(transport_error)?;

        let _: Value = parse_response(response).await?;
        Ok(())
    }
}

#[async_trait]
impl RatingSink for SheetsRatingLogger {
    async fn log_rating(&self, event: &RatingEvent) -> AppResult<()> {
        let token = self.credentials.access_token().await?;
        let spreadsheet_id = self.find_spreadsheet_id(&token).await?;
        let worksheet = self.worksheet_title(&token, &spreadsheet_id).await?;
        debug!(%spreadsheet_id, %worksheet, "Resolved rating worksheet");

        self.append_row(&token, &spreadsheet_id, &worksheet, event.to_row())
            .await?;

        info!(
            stars = event.stars.get(),
            field = %event.field,
            idea_count = event.idea_count.get(),
            "Rating appended to spreadsheet"
        );
        Ok(())
    }
}

impl Debug for SheetsRatingLogger {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("SheetsRatingLogger")
            .field("spreadsheet_name", &self.spreadsheet_name)
            .field("worksheet_index", &self.worksheet_index)
            .field("drive_base", &self.drive_base)
            .field("sheets_base", &self.sheets_base)
            .finish_non_exhaustive()
    }
}

fn transport_error(error: reqwest::Error) -> AppError {
    AppError::external_unavailable(
        service_names::GOOGLE_SHEETS,
        format!("HTTP request failed: {error}"),
    )
}

/// Decode a successful response body or classify the failure
async fn parse_response<T: DeserializeOwned>(response: Response) -> AppResult<T> {
    let status = response.status();
    let body = response.text().await.map_err(transport_error)?;

    if !status.is_success() {
        warn!(status = %status, "Google Sheets API error");
        return Err(map_api_error(status, &body));
    }

    serde_json::from_str(&body).map_err(|e| {
        AppError::external_service(
            service_names::GOOGLE_SHEETS,
            format!("Failed to parse response: {e}"),
        )
    })
}

fn map_api_error(status: StatusCode, body: &str) -> AppError {
    let message = serde_json::from_str::<GoogleErrorEnvelope>(body)
        .map_or_else(|_| body.to_owned(), |e| e.error.message);
    let detail = format!("({status}) {message}");

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            AppError::external_auth(service_names::GOOGLE_SHEETS, detail)
        }
        StatusCode::NOT_FOUND => AppError::new(
            ErrorCode::ResourceNotFound,
            format!("{}: {detail}", service_names::GOOGLE_SHEETS),
        ),
        StatusCode::TOO_MANY_REQUESTS => {
            AppError::external_rate_limited(service_names::GOOGLE_SHEETS, detail)
        }
        _ => AppError::external_service(service_names::GOOGLE_SHEETS, detail),
    }
}
