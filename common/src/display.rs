//! 画面表示用のファイル名整形
//!
//! 一覧やレビュー画面で見せる名前を作る。照合キーではないので、
//! 結果を比較に使わないこと（照合は [`crate::normalize`] を使う）。

use crate::normalize::{strip_messaging_suffix, strip_text_extension};

/// 表示用のファイル名を作る
///
/// 拡張子 `.txt` を先に外し、その後メッセージング接尾辞を外す（各1回）。
pub fn display_name(raw: &str) -> String {
    strip_messaging_suffix(strip_text_extension(raw)).to_string()
}
