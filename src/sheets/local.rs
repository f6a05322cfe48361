//! 手元のシートスナップショットを読み込む
//!
//! 対応形式:
//! - `.json`: values API のレスポンス、または `[[...], ...]` のグリッド
//! - `.csv`: ダブルクォート対応、先頭行がヘッダー
//! - `.xlsx` `.xlsm` `.xlsb` `.xls` `.ods`: 先頭シート（または指定シート）
//!
//! Excel・ODSは使用範囲の左上がA1でなくても、列番号がA列=0になるよう
//! 先頭を空セルで埋める。

use super::{cell_to_string, trim_trailing_empty, ValueRange};
use crate::error::{ReviewSheetError, Result};
use calamine::{open_workbook_auto, Data, DataType, Reader};
use chrono::{NaiveDateTime, Timelike};
use review_sheet_common::SheetData;
use std::path::Path;
use tracing::debug;

const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// スナップショットを読み込む（値がなければ `None`）
pub fn load_local(path: &Path, sheet_name: Option<&str>) -> Result<Option<SheetData>> {
    if !path.exists() {
        return Err(ReviewSheetError::FileNotFound(path.display().to_string()));
    }

    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let grid = match ext.as_str() {
        "json" => read_json_grid(&std::fs::read_to_string(path)?)?,
        "csv" => parse_csv(&std::fs::read_to_string(path)?),
        e if WORKBOOK_EXTENSIONS.contains(&e) => read_workbook_grid(path, sheet_name)?,
        _ => {
            return Err(ReviewSheetError::InvalidSheetFile(format!(
                "未対応の形式です: {}",
                path.display()
            )))
        }
    };

    debug!(path = %path.display(), rows = grid.len(), "シートファイルを読み込みました");
    Ok(SheetData::from_values(grid))
}

fn read_json_grid(content: &str) -> Result<Vec<Vec<String>>> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    match value {
        serde_json::Value::Array(rows) => rows
            .iter()
            .map(|row| match row {
                serde_json::Value::Array(cells) => Ok(cells.iter().map(cell_to_string).collect()),
                _ => Err(ReviewSheetError::InvalidSheetFile(
                    "JSONグリッドの各行は配列である必要があります".into(),
                )),
            })
            .collect(),
        serde_json::Value::Object(_) => {
            let range: ValueRange = serde_json::from_value(value)?;
            Ok(range.into_grid())
        }
        _ => Err(ReviewSheetError::InvalidSheetFile(
            "JSONはグリッドか values API のレスポンスである必要があります".into(),
        )),
    }
}

fn read_workbook_grid(path: &Path, sheet_name: Option<&str>) -> Result<Vec<Vec<String>>> {
    let mut workbook = open_workbook_auto(path)?;

    let name = match sheet_name {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ReviewSheetError::InvalidSheetFile("シートがありません".into()))?,
    };

    let range = workbook.worksheet_range(&name)?;
    let col_offset = range.start().map(|(_, col)| col as usize).unwrap_or(0);

    let grid = range
        .rows()
        .map(|row| {
            let cells = std::iter::repeat(String::new())
                .take(col_offset)
                .chain(row.iter().map(cell_text))
                .collect();
            trim_trailing_empty(cells)
        })
        .collect();

    Ok(grid)
}

/// セルを文字列化する
///
/// 日付セルはシリアル値ではなく `YYYY-MM-DD`（時刻があれば `YYYY-MM-DD HH:MM:SS`）。
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::DateTime(_) => cell
            .as_datetime()
            .map(format_datetime)
            .unwrap_or_else(|| cell.to_string()),
        Data::DateTimeIso(iso) => iso.clone(),
        _ => cell.to_string(),
    }
}

fn format_datetime(value: NaiveDateTime) -> String {
    if value.hour() == 0 && value.minute() == 0 && value.second() == 0 {
        value.format("%Y-%m-%d").to_string()
    } else {
        value.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// CSVを行×セルに分解する
///
/// - `"..."` 内のカンマ・改行はセルの一部
/// - `""` はダブルクォート1文字
/// - 先頭のBOMと空行は無視
pub fn parse_csv(content: &str) -> Vec<Vec<String>> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' => in_quotes = true,
            ',' => row.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                row.push(std::mem::take(&mut field));
                push_row(&mut rows, std::mem::take(&mut row));
            }
            _ => field.push(c),
        }
    }

    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        push_row(&mut rows, row);
    }

    rows
}

fn push_row(rows: &mut Vec<Vec<String>>, row: Vec<String>) {
    // 空行（セル1つで空）は飛ばす
    if row.len() == 1 && row[0].is_empty() {
        return;
    }
    rows.push(trim_trailing_empty(row));
}
