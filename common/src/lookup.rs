//! ファイル名からシート行を引く入口
//!
//! 正規化 → 行照合 → 表示列の取り出しを1回の呼び出しで行う。
//! シートの取得や再試行は呼び出し側の責任。

use crate::error::{Error, Result};
use crate::matcher::{find_row, MatchResult};
use crate::normalize::CanonicalKey;
use crate::types::{ColumnValue, SheetData};
use serde::{Deserialize, Serialize};

/// 照合の列設定
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LookupOptions {
    /// ファイル名が入っている列（0始まり）
    pub key_column: i64,
    /// 表示を始める列（0始まり）
    pub display_start_column: i64,
}

impl LookupOptions {
    pub fn new(key_column: i64, display_start_column: i64) -> Self {
        Self {
            key_column,
            display_start_column,
        }
    }

    /// 負の列番号を弾いて `usize` に変換する
    pub fn validate(&self) -> Result<(usize, usize)> {
        let key_column = column_index("key_column", self.key_column)?;
        let start = column_index("display_start_column", self.display_start_column)?;
        Ok((key_column, start))
    }
}

fn column_index(name: &str, value: i64) -> Result<usize> {
    usize::try_from(value)
        .map_err(|_| Error::MalformedInput(format!("{} must be >= 0 (got {})", name, value)))
}

/// 照合結果（呼び出し側に返す形）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupOutcome {
    pub found: bool,
    /// 照合に使ったキー
    pub key: CanonicalKey,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<Vec<String>>,
    /// 一致した行そのもの
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_columns: Option<Vec<ColumnValue>>,
}

impl LookupOutcome {
    fn not_found(key: CanonicalKey) -> Self {
        Self {
            found: false,
            key,
            header: None,
            row: None,
            matched_columns: None,
        }
    }
}

/// 生のファイル名でシートを照合する
///
/// - 列番号が負、またはシートがない場合は `MalformedInput`
/// - 一致なしは `found: false` として正常に返す
pub fn lookup(
    raw_file_name: &str,
    sheet: Option<&SheetData>,
    options: &LookupOptions,
) -> Result<LookupOutcome> {
    let (key_column, start) = options.validate()?;
    let sheet = sheet.ok_or_else(|| {
        Error::MalformedInput("sheet data (header and rows) is missing".to_string())
    })?;

    let key = CanonicalKey::from_raw(raw_file_name);

    match find_row(&key, &sheet.header, &sheet.rows, key_column) {
        MatchResult::Found(matched) => {
            let matched_columns = matched.project(start);
            Ok(LookupOutcome {
                found: true,
                key: matched.key,
                header: Some(sheet.header.clone()),
                row: Some(matched.row.to_vec()),
                matched_columns: Some(matched_columns),
            })
        }
        MatchResult::NotFound { key } => Ok(LookupOutcome::not_found(key)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    fn sample_sheet() -> SheetData {
        SheetData::new(
            strings(&["ID", "Phone", "Name", "Email", "", "", "", "Notes", "Status"]),
            vec![
                strings(&["41", "5511888888888", "Ana"]),
                strings(&["42", "5511999999999", "Jane", "", "", "", "", "Approved", ""]),
                strings(&["43", "5511999999999", "Dup", "", "", "", "", "Later", ""]),
            ],
        )
    }

    #[test]
    fn test_lookup_found() {
        let sheet = sample_sheet();
        let outcome = lookup(
            "5511999999999@s.whatsapp.net",
            Some(&sheet),
            &LookupOptions::new(1, 7),
        )
        .unwrap();

        assert!(outcome.found);
        assert_eq!(outcome.key.as_str(), "5511999999999");
        assert_eq!(outcome.header.as_deref(), Some(sheet.header.as_slice()));
        assert_eq!(outcome.row.unwrap()[0], "42");
        assert_eq!(
            outcome.matched_columns.unwrap(),
            vec![ColumnValue::new("Notes", "Approved")]
        );
    }

    #[test]
    fn test_lookup_found_with_nothing_to_show() {
        let sheet = sample_sheet();
        let outcome = lookup("5511888888888.txt", Some(&sheet), &LookupOptions::new(1, 7)).unwrap();

        // 見つかったが表示する列がない（not found とは区別される）
        assert!(outcome.found);
        assert_eq!(outcome.matched_columns, Some(Vec::new()));
    }

    #[test]
    fn test_lookup_not_found() {
        let sheet = sample_sheet();
        let outcome = lookup("5511000000000", Some(&sheet), &LookupOptions::new(1, 0)).unwrap();

        assert!(!outcome.found);
        assert!(outcome.header.is_none());
        assert!(outcome.matched_columns.is_none());
    }

    #[test]
    fn test_lookup_negative_key_column() {
        let sheet = sample_sheet();
        let err = lookup("x", Some(&sheet), &LookupOptions::new(-1, 0)).unwrap_err();
        assert!(matches!(err, Error::MalformedInput(_)));
        assert!(err.to_string().contains("key_column"));
    }

    #[test]
    fn test_lookup_negative_start_column() {
        let sheet = sample_sheet();
        let err = lookup("x", Some(&sheet), &LookupOptions::new(0, -3)).unwrap_err();
        assert!(matches!(err, Error::MalformedInput(_)));
        assert!(err.to_string().contains("display_start_column"));
    }

    #[test]
    fn test_lookup_missing_sheet() {
        let err = lookup("x", None, &LookupOptions::default()).unwrap_err();
        assert!(matches!(err, Error::MalformedInput(_)));
    }

    #[test]
    fn test_lookup_outcome_json_shape() {
        let sheet = sample_sheet();
        let found = lookup("5511999999999", Some(&sheet), &LookupOptions::new(1, 7)).unwrap();
        let json = serde_json::to_value(&found).unwrap();
        assert_eq!(json["found"], true);
        assert_eq!(json["matchedColumns"][0]["name"], "Notes");
        assert_eq!(json["matchedColumns"][0]["value"], "Approved");

        let missing = lookup("nobody", Some(&sheet), &LookupOptions::new(1, 7)).unwrap();
        let json = serde_json::to_value(&missing).unwrap();
        assert_eq!(json["found"], false);
        assert_eq!(json["key"], "nobody");
        assert!(json.get("header").is_none());
        assert!(json.get("matchedColumns").is_none());
    }

    #[test]
    fn test_lookup_options_from_json() {
        let options: LookupOptions =
            serde_json::from_str(r#"{"keyColumn": 1, "displayStartColumn": 7}"#).unwrap();
        assert_eq!(options, LookupOptions::new(1, 7));

        let defaults: LookupOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(defaults, LookupOptions::default());
    }
}
