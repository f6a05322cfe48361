//! ワークフローWebhook呼び出し
//!
//! - 編集した本文の保存依頼
//! - PDF再生成の依頼
//!
//! どちらもファイルレコードの情報をJSONでPOSTし、レスポンスをそのまま返す。

use crate::error::{ReviewSheetError, Result};
use crate::store::FileRecord;
use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};

/// 本文保存の送信内容
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveContentPayload<'a> {
    pub file_id: &'a str,
    pub file_name: &'a str,
    pub minio_path: &'a str,
    pub new_content: &'a str,
}

/// PDF再生成の送信内容
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegeneratePdfPayload<'a> {
    pub file_id: &'a str,
    pub file_name: &'a str,
    pub minio_path: &'a str,
}

impl<'a> SaveContentPayload<'a> {
    pub fn new(record: &'a FileRecord, new_content: &'a str) -> Self {
        Self {
            file_id: &record.id,
            file_name: &record.name,
            minio_path: &record.minio_path,
            new_content,
        }
    }
}

impl<'a> RegeneratePdfPayload<'a> {
    pub fn new(record: &'a FileRecord) -> Self {
        Self {
            file_id: &record.id,
            file_name: &record.name,
            minio_path: &record.minio_path,
        }
    }
}

pub struct WebhookClient {
    http: reqwest::Client,
}

impl WebhookClient {
    pub fn new(timeout_seconds: u64) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;
        Ok(Self { http })
    }

    /// 編集した本文を保存ワークフローへ送る
    pub async fn save_content(
        &self,
        url: &str,
        record: &FileRecord,
        new_content: &str,
    ) -> Result<serde_json::Value> {
        info!(id = %record.id, bytes = new_content.len(), "本文保存Webhookを呼び出し");
        self.post(url, &SaveContentPayload::new(record, new_content)).await
    }

    /// PDF再生成ワークフローを起動する
    pub async fn regenerate_pdf(&self, url: &str, record: &FileRecord) -> Result<serde_json::Value> {
        info!(id = %record.id, "PDF再生成Webhookを呼び出し");
        self.post(url, &RegeneratePdfPayload::new(record)).await
    }

    /// 保存先URLからテキスト本文を取得する（編集用）
    pub async fn download_text(&self, url: &str) -> Result<String> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReviewSheetError::Download {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.text().await?)
    }

    async fn post<T: Serialize + ?Sized>(&self, url: &str, payload: &T) -> Result<serde_json::Value> {
        let response = self.http.post(url).json(payload).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Webhookがエラーを返しました");
            return Err(ReviewSheetError::Webhook {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        Ok(parse_response_body(&body))
    }
}

/// レスポンス本文をJSONとして読む（JSONでなければ文字列として包む）
pub fn parse_response_body(body: &str) -> serde_json::Value {
    if body.trim().is_empty() {
        return serde_json::Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|_| serde_json::Value::String(body.to_string()))
}
