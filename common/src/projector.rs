//! 表示列の取り出し
//!
//! 照合で見つかった行から、ヘッダー名と空でない値の組を取り出す。

use crate::types::ColumnValue;

/// `start` 列以降のうち、ヘッダーがあり値が空でない列を取り出す
///
/// - ヘッダーより長い行の余りの列は出さない
/// - 空文字・空白だけの値は出さない（空の項目として出すことはない）
/// - 値はトリムせずそのまま返す
pub fn project(header: &[String], row: &[String], start: usize) -> Vec<ColumnValue> {
    row.iter()
        .enumerate()
        .skip(start)
        .filter(|(_, value)| !value.trim().is_empty())
        .filter_map(|(i, value)| {
            header
                .get(i)
                .map(|name| ColumnValue::new(name.clone(), value.clone()))
        })
        .collect()
}
