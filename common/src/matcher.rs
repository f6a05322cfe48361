//! シート行の照合
//!
//! 照合キーと一致する行をデータ行から探す。

use crate::normalize::CanonicalKey;
use crate::projector::project;
use crate::types::ColumnValue;

/// 照合で見つかった行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedRow<'a> {
    /// 照合に使ったキー
    pub key: CanonicalKey,
    /// ヘッダー行
    pub header: &'a [String],
    /// 一致した行
    pub row: &'a [String],
    /// データ行の中での位置（0始まり、ヘッダーを含まない）
    pub row_index: usize,
}

impl<'a> MatchedRow<'a> {
    /// `start` 列以降の空でない値を取り出す
    pub fn project(&self, start: usize) -> Vec<ColumnValue> {
        project(self.header, self.row, start)
    }
}

/// 照合結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult<'a> {
    Found(MatchedRow<'a>),
    NotFound { key: CanonicalKey },
}

impl<'a> MatchResult<'a> {
    pub fn is_found(&self) -> bool {
        matches!(self, MatchResult::Found(_))
    }

    pub fn key(&self) -> &CanonicalKey {
        match self {
            MatchResult::Found(m) => &m.key,
            MatchResult::NotFound { key } => key,
        }
    }

    pub fn found(self) -> Option<MatchedRow<'a>> {
        match self {
            MatchResult::Found(m) => Some(m),
            MatchResult::NotFound { .. } => None,
        }
    }
}

/// キー列が照合キーと一致する最初の行を返す
///
/// - 行順に走査し、最初に一致した行を返す（後続の重複行は返さない）
/// - セルとキーはそれぞれ前後の空白を除いて完全一致で比較
/// - `key_column + 1` より短い行は読み飛ばす
///
/// 索引は作らず毎回線形に走査する。行数が数千を超えるか照合頻度が
/// 上がる場合はキーによる索引に置き換えること。
pub fn find_row<'a>(
    key: &CanonicalKey,
    header: &'a [String],
    rows: &'a [Vec<String>],
    key_column: usize,
) -> MatchResult<'a> {
    let target = key.as_str().trim();

    let hit = rows.iter().enumerate().find(|(_, row)| {
        row.get(key_column)
            .map(|cell| cell.trim() == target)
            .unwrap_or(false)
    });

    match hit {
        Some((row_index, row)) => MatchResult::Found(MatchedRow {
            key: key.clone(),
            header,
            row: row.as_slice(),
            row_index,
        }),
        None => MatchResult::NotFound { key: key.clone() },
    }
}
