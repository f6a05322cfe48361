//! シートデータの取得元
//!
//! - api: Google Sheets values API
//! - local: 手元のスナップショット（JSON / CSV / Excel・ODS）
//!
//! どちらも照合用の [`SheetData`] を返すだけで、照合そのものは
//! `review_sheet_common::lookup` が行う。

pub mod api;
pub mod local;

pub use api::SheetsClient;
pub use local::load_local;

use crate::config::Config;
use crate::error::Result;
use crate::progress::spinner;
use review_sheet_common::SheetData;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

/// 照合用のシートを用意する
///
/// `local` があればそのファイルを、なければ設定の Sheets API 範囲を読む。
pub async fn load_sheet(
    config: &Config,
    local: Option<&Path>,
    sheet_name: Option<&str>,
) -> Result<Option<SheetData>> {
    if let Some(path) = local {
        return load_local(path, sheet_name);
    }

    let mut target = config.sheet_target()?;
    if let Some(name) = sheet_name {
        target.sheet_name = name.to_string();
    }
    let token = config.access_token()?;
    let client = SheetsClient::new(config.timeout_seconds)?;

    let pb = spinner(format!("シートを取得中... {}", target.a1_range()));
    let result = client.fetch(&target, token).await;
    pb.finish_and_clear();
    result
}

/// 照合用のシートを用意する（失敗しても `None` で続ける）
///
/// レビューではシートの行は補助情報なので、設定不足や取得失敗は
/// 警告だけ出して照合なしで進める。
pub async fn load_sheet_or_none(
    config: &Config,
    local: Option<&Path>,
    sheet_name: Option<&str>,
) -> Option<SheetData> {
    match load_sheet(config, local, sheet_name).await {
        Ok(sheet) => sheet,
        Err(e) => {
            warn!(error = %e, "シートを読み込めないため照合なしで続けます");
            None
        }
    }
}

/// Sheets APIの取得対象
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetTarget {
    pub sheet_id: String,
    pub sheet_name: String,
    /// シート内の範囲（例: `A1:BA300`）
    pub range: String,
}

impl SheetTarget {
    /// `'シート名'!範囲` 形式のA1表記
    pub fn a1_range(&self) -> String {
        format!("'{}'!{}", self.sheet_name, self.range)
    }

    /// values API のURL（範囲はパーセントエンコード）
    pub fn values_url(&self, base_url: &str) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}",
            base_url.trim_end_matches('/'),
            self.sheet_id,
            urlencoding::encode(&self.a1_range())
        )
    }
}

/// values API のレスポンス
///
/// 値がない範囲では `values` 自体が省略される。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValueRange {
    pub range: String,
    pub major_dimension: String,
    pub values: Vec<Vec<serde_json::Value>>,
}

impl ValueRange {
    pub fn from_json(json: &str) -> Result<Self> {
        let range: Self = serde_json::from_str(json)?;
        Ok(range)
    }

    /// 文字列グリッドに変換
    pub fn into_grid(self) -> Vec<Vec<String>> {
        self.values
            .into_iter()
            .map(|row| row.iter().map(cell_to_string).collect())
            .collect()
    }

    /// 先頭行をヘッダーとしてシートデータにする（値がなければ `None`）
    pub fn into_sheet(self) -> Option<SheetData> {
        SheetData::from_values(self.into_grid())
    }
}

/// セル値を文字列化（数値・真偽値も文字列として照合する）
pub fn cell_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// 行末の空セルを落とす（APIが省略するのと同じ形にそろえる）
pub(crate) fn trim_trailing_empty(mut row: Vec<String>) -> Vec<String> {
    while row.last().map(|c| c.is_empty()).unwrap_or(false) {
        row.pop();
    }
    row
}
