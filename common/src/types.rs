//! シートデータの型定義
//!
//! - SheetData: ヘッダー行とデータ行に分けたシートのスナップショット
//! - ColumnValue: 表示用に取り出した (列名, 値) の組

use serde::{Deserialize, Serialize};

/// シートのスナップショット（1回の照合ごとに作って捨てる）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetData {
    /// ヘッダー行
    pub header: Vec<String>,
    /// データ行（ヘッダーを含まない）。ヘッダーより短い行もある
    pub rows: Vec<Vec<String>>,
}

impl SheetData {
    pub fn new(header: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { header, rows }
    }

    /// 値のグリッドから作る（先頭行がヘッダー）
    ///
    /// グリッドが空なら `None`。
    pub fn from_values(values: Vec<Vec<String>>) -> Option<Self> {
        let mut iter = values.into_iter();
        let header = iter.next()?;
        Some(Self {
            header,
            rows: iter.collect(),
        })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// 表示用の (列名, 値)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnValue {
    pub name: String,
    pub value: String,
}

impl ColumnValue {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_from_values_splits_header() {
        let sheet = SheetData::from_values(grid(&[&["ID", "Name"], &["1", "a"], &["2"]])).unwrap();
        assert_eq!(sheet.header, vec!["ID", "Name"]);
        assert_eq!(sheet.row_count(), 2);
        assert_eq!(sheet.rows[1], vec!["2"]);
    }

    #[test]
    fn test_from_values_empty_grid() {
        assert!(SheetData::from_values(Vec::new()).is_none());
    }

    #[test]
    fn test_from_values_header_only() {
        let sheet = SheetData::from_values(grid(&[&["ID"]])).unwrap();
        assert!(sheet.rows.is_empty());
    }
}
