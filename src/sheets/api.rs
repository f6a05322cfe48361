//! Google Sheets values API クライアント
//!
//! アクセストークンは呼び出し側が用意する（サービスアカウントの
//! トークン発行はこのツールの外で行う）。失敗時の再試行はしない。

use super::{SheetTarget, ValueRange};
use crate::error::{ReviewSheetError, Result};
use reqwest::header::ACCEPT;
use review_sheet_common::SheetData;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com";

pub struct SheetsClient {
    http: reqwest::Client,
    base_url: String,
}

impl SheetsClient {
    pub fn new(timeout_seconds: u64) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;
        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// 接続先を差し替える（プロキシや手元のスタブ向け）
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// 範囲の値を取得し、先頭行をヘッダーとしたシートデータを返す
    ///
    /// 範囲に値がなければ `None`。
    pub async fn fetch(&self, target: &SheetTarget, token: &str) -> Result<Option<SheetData>> {
        let url = target.values_url(&self.base_url);
        debug!(range = %target.a1_range(), %url, "Sheets APIから取得");

        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Sheets APIがエラーを返しました");
            return Err(ReviewSheetError::SheetApi {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let range = ValueRange::from_json(&body)?;
        info!(rows = range.values.len(), "シートを取得しました");

        Ok(range.into_sheet())
    }
}
