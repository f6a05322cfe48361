//! エラー型定義

use thiserror::Error;

/// 共通エラー型
///
/// 照合そのものは入出力を持たないので、入力の誤りだけを表す。
/// 「該当行なし」はエラーではなく照合結果として返す。
#[derive(Error, Debug)]
pub enum Error {
    /// 照合設定の誤り（負の列番号、シートデータなし）
    #[error("Malformed input: {0}")]
    MalformedInput(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
