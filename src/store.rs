//! ファイルレコードストア
//!
//! 取り込まれたファイル（名前と保存先パス）とレビュー状態をJSONファイルに
//! 保存する。状態はこの構造体が持ち、モジュールレベルの可変状態は持たない。

use crate::error::{ReviewSheetError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// レビュー結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Confirmed,
    Denied,
}

impl std::str::FromStr for ReviewStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "confirmed" | "confirm" | "ok" => Ok(ReviewStatus::Confirmed),
            "denied" | "deny" | "ng" => Ok(ReviewStatus::Denied),
            _ => Err(format!("Unknown status: {}. Use confirmed or denied", s)),
        }
    }
}

impl std::fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReviewStatus::Confirmed => write!(f, "confirmed"),
            ReviewStatus::Denied => write!(f, "denied"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub status: ReviewStatus,
    pub reviewed_at: DateTime<Utc>,
}

/// 取り込まれたファイル1件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: String,
    /// 取り込み側が付けた生のファイル名
    pub name: String,
    /// 保存先（公開URL）
    pub minio_path: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub review: Option<Review>,
}

impl FileRecord {
    pub fn is_pending(&self) -> bool {
        self.review.is_none()
    }
}

/// ストアファイルの構造
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileStore {
    /// バージョン（互換性チェック用）
    version: u32,
    files: Vec<FileRecord>,
    #[serde(skip)]
    path: PathBuf,
}

impl FileStore {
    const CURRENT_VERSION: u32 = 1;

    /// ストアを読み込む（ファイルがなければ空）
    ///
    /// 壊れたファイルやバージョン違いはエラーにする。
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "ストアファイルがないため空で開始");
            return Ok(Self::empty(path));
        }

        let content = std::fs::read_to_string(path)?;
        let mut store: FileStore = serde_json::from_str(&content)?;
        if store.version != Self::CURRENT_VERSION {
            return Err(ReviewSheetError::InvalidStore(format!(
                "バージョン不一致: {} (期待値 {})",
                store.version,
                Self::CURRENT_VERSION
            )));
        }
        store.path = path.to_path_buf();
        Ok(store)
    }

    pub fn empty(path: &Path) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            files: Vec::new(),
            path: path.to_path_buf(),
        }
    }

    /// 一時ファイルに書いてから置き換える
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_string_pretty(self)?)?;
        std::fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), files = self.files.len(), "ストアを保存");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// ファイルを登録する（名前と保存先はどちらも必須）
    pub fn register(&mut self, minio_path: &str, name: &str) -> Result<&FileRecord> {
        self.register_at(minio_path, name, Utc::now())
    }

    pub fn register_at(
        &mut self,
        minio_path: &str,
        name: &str,
        created_at: DateTime<Utc>,
    ) -> Result<&FileRecord> {
        let minio_path = minio_path.trim();
        let name = name.trim();
        if minio_path.is_empty() || name.is_empty() {
            return Err(ReviewSheetError::InvalidRecord(
                "minio_path と name はどちらも必須です".into(),
            ));
        }

        let mut salt = 0u32;
        let id = loop {
            let candidate = record_id(minio_path, name, &created_at, salt);
            if self.get(&candidate).is_none() {
                break candidate;
            }
            salt += 1;
        };

        info!(%id, name, minio_path, "ファイルを登録");
        self.files.push(FileRecord {
            id,
            name: name.to_string(),
            minio_path: minio_path.to_string(),
            created_at,
            review: None,
        });

        let index = self.files.len() - 1;
        Ok(&self.files[index])
    }

    pub fn get(&self, id: &str) -> Option<&FileRecord> {
        self.files.iter().find(|f| f.id == id)
    }

    /// IDでレコードを取得（なければ `RecordNotFound`）
    pub fn require(&self, id: &str) -> Result<&FileRecord> {
        self.get(id)
            .ok_or_else(|| ReviewSheetError::RecordNotFound(id.to_string()))
    }

    pub fn all(&self) -> &[FileRecord] {
        &self.files
    }

    /// 未レビューのファイル（新しい順）
    pub fn pending(&self) -> Vec<&FileRecord> {
        let mut pending: Vec<&FileRecord> = self.files.iter().filter(|f| f.is_pending()).collect();
        pending.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        pending
    }

    /// レビュー済みのファイル（レビュー日時の新しい順）
    pub fn history(&self) -> Vec<&FileRecord> {
        let mut reviewed: Vec<&FileRecord> = self.files.iter().filter(|f| !f.is_pending()).collect();
        reviewed.sort_by(|a, b| {
            let at = |r: &FileRecord| r.review.as_ref().map(|rv| rv.reviewed_at);
            at(b).cmp(&at(a))
        });
        reviewed
    }

    /// レビュー結果を記録する（再レビューは上書き）
    pub fn mark_reviewed(&mut self, id: &str, status: ReviewStatus) -> Result<&FileRecord> {
        self.mark_reviewed_at(id, status, Utc::now())
    }

    pub fn mark_reviewed_at(
        &mut self,
        id: &str,
        status: ReviewStatus,
        reviewed_at: DateTime<Utc>,
    ) -> Result<&FileRecord> {
        let record = self
            .files
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| ReviewSheetError::RecordNotFound(id.to_string()))?;

        info!(id, %status, "レビュー結果を記録");
        record.review = Some(Review {
            status,
            reviewed_at,
        });
        Ok(&*record)
    }
}

/// 保存先・名前・登録日時から12桁のIDを作る
fn record_id(minio_path: &str, name: &str, created_at: &DateTime<Utc>, salt: u32) -> String {
    let mut hasher = Sha256::new();
    hasher.update(minio_path.as_bytes());
    hasher.update(b"\n");
    hasher.update(name.as_bytes());
    hasher.update(b"\n");
    hasher.update(created_at.to_rfc3339().as_bytes());
    hasher.update(salt.to_le_bytes());
    let digest = hex::encode(hasher.finalize());
    digest[..12].to_string()
}
