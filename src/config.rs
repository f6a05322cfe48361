use crate::error::{ReviewSheetError, Result};
use crate::sheets::SheetTarget;
use review_sheet_common::LookupOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 環境変数名（バックエンド関数のシークレット名に合わせる）
pub mod env {
    pub const SHEET_ID: &str = "SHEET_ID";
    pub const SHEET_NAME: &str = "SHEET_NAME";
    pub const SHEET_RANGE: &str = "SHEET_RANGE_PART";
    pub const FILE_NAME_COLUMN_INDEX: &str = "FILE_NAME_COLUMN_INDEX";
    pub const DISPLAY_START_COLUMN_INDEX: &str = "DISPLAY_START_COLUMN_INDEX";
    pub const ACCESS_TOKEN: &str = "GOOGLE_SHEETS_ACCESS_TOKEN";
    pub const SAVE_CONTENT_WEBHOOK: &str = "N8N_SAVE_CONTENT_WEBHOOK_URL";
    pub const REGENERATE_PDF_WEBHOOK: &str = "N8N_REGENERATE_PDF_WEBHOOK_URL";
    pub const STORE_PATH: &str = "REVIEW_SHEET_STORE";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sheet_id: Option<String>,
    pub sheet_name: Option<String>,
    /// シート内の範囲（例: `A1:BA300`）
    pub sheet_range: Option<String>,
    /// ファイル名が入っている列（0始まり）
    pub file_name_column_index: i64,
    /// 表示を始める列（0始まり）
    pub display_start_column_index: i64,
    pub sheets_access_token: Option<String>,
    pub save_content_webhook_url: Option<String>,
    pub regenerate_pdf_webhook_url: Option<String>,
    pub store_path: Option<PathBuf>,
    pub timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sheet_id: None,
            sheet_name: None,
            sheet_range: None,
            file_name_column_index: 0,
            display_start_column_index: 0,
            sheets_access_token: None,
            save_content_webhook_url: None,
            regenerate_pdf_webhook_url: None,
            store_path: None,
            timeout_seconds: 30,
        }
    }
}

impl Config {
    /// 設定ファイルを読み、環境変数で上書きする
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// 指定パスから読み込み（存在しなければデフォルト）
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ReviewSheetError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("review-sheet"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// 環境変数による上書き
    ///
    /// 空文字の変数は未設定として扱う。
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(v) = get(env::SHEET_ID) {
            self.sheet_id = Some(v);
        }
        if let Some(v) = get(env::SHEET_NAME) {
            self.sheet_name = Some(v);
        }
        if let Some(v) = get(env::SHEET_RANGE) {
            self.sheet_range = Some(v);
        }
        if let Some(v) = get(env::FILE_NAME_COLUMN_INDEX) {
            self.file_name_column_index = parse_index(env::FILE_NAME_COLUMN_INDEX, &v)?;
        }
        if let Some(v) = get(env::DISPLAY_START_COLUMN_INDEX) {
            self.display_start_column_index = parse_index(env::DISPLAY_START_COLUMN_INDEX, &v)?;
        }
        if let Some(v) = get(env::ACCESS_TOKEN) {
            self.sheets_access_token = Some(v);
        }
        if let Some(v) = get(env::SAVE_CONTENT_WEBHOOK) {
            self.save_content_webhook_url = Some(v);
        }
        if let Some(v) = get(env::REGENERATE_PDF_WEBHOOK) {
            self.regenerate_pdf_webhook_url = Some(v);
        }
        if let Some(v) = get(env::STORE_PATH) {
            self.store_path = Some(PathBuf::from(v));
        }
        Ok(())
    }

    /// Sheets APIの取得対象（ID・シート名・範囲がすべて必要）
    pub fn sheet_target(&self) -> Result<SheetTarget> {
        let missing: Vec<&str> = [
            (env::SHEET_ID, &self.sheet_id),
            (env::SHEET_NAME, &self.sheet_name),
            (env::SHEET_RANGE, &self.sheet_range),
        ]
        .iter()
        .filter(|(_, value)| value.as_deref().map(str::trim).unwrap_or("").is_empty())
        .map(|(name, _)| *name)
        .collect();

        if !missing.is_empty() {
            return Err(ReviewSheetError::Config(format!(
                "シート設定が不完全です: {}",
                missing.join(", ")
            )));
        }

        Ok(SheetTarget {
            sheet_id: self.sheet_id.clone().unwrap_or_default(),
            sheet_name: self.sheet_name.clone().unwrap_or_default(),
            range: self.sheet_range.clone().unwrap_or_default(),
        })
    }

    pub fn access_token(&self) -> Result<&str> {
        self.sheets_access_token.as_deref().ok_or_else(|| {
            ReviewSheetError::Config(format!("{} が設定されていません", env::ACCESS_TOKEN))
        })
    }

    pub fn lookup_options(&self) -> LookupOptions {
        LookupOptions::new(self.file_name_column_index, self.display_start_column_index)
    }

    pub fn save_content_webhook(&self) -> Result<&str> {
        require_url(&self.save_content_webhook_url, env::SAVE_CONTENT_WEBHOOK)
    }

    pub fn regenerate_pdf_webhook(&self) -> Result<&str> {
        require_url(&self.regenerate_pdf_webhook_url, env::REGENERATE_PDF_WEBHOOK)
    }

    /// ファイルレコードストアのパス
    pub fn store_path(&self) -> Result<PathBuf> {
        match &self.store_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::config_dir()?.join("files.json")),
        }
    }

    /// `config --set KEY=VALUE` 用
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let text = || {
            let v = value.trim();
            if v.is_empty() { None } else { Some(v.to_string()) }
        };

        match key {
            "sheet_id" => self.sheet_id = text(),
            "sheet_name" => self.sheet_name = text(),
            "sheet_range" => self.sheet_range = text(),
            "file_name_column_index" => self.file_name_column_index = parse_index(key, value)?,
            "display_start_column_index" => {
                self.display_start_column_index = parse_index(key, value)?
            }
            "sheets_access_token" => self.sheets_access_token = text(),
            "save_content_webhook_url" => self.save_content_webhook_url = text(),
            "regenerate_pdf_webhook_url" => self.regenerate_pdf_webhook_url = text(),
            "store_path" => self.store_path = text().map(PathBuf::from),
            "timeout_seconds" => {
                self.timeout_seconds = value.trim().parse().map_err(|_| {
                    ReviewSheetError::Config(format!("{} は整数で指定してください: {}", key, value))
                })?
            }
            _ => return Err(ReviewSheetError::Config(format!("不明な設定キー: {}", key))),
        }
        Ok(())
    }
}

fn parse_index(name: &str, value: &str) -> Result<i64> {
    value.trim().parse::<i64>().map_err(|_| {
        ReviewSheetError::Config(format!("{} は整数で指定してください: {}", name, value))
    })
}

fn require_url<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str> {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ReviewSheetError::Config(format!("{} が設定されていません", name)))
}

/// 秘密情報を伏せ字にする（先頭4文字のみ表示）
pub fn mask_secret(value: Option<&str>) -> String {
    match value {
        None => "未設定".to_string(),
        Some(v) if v.chars().count() <= 4 => "****".to_string(),
        Some(v) => format!("{}****", v.chars().take(4).collect::<String>()),
    }
}
