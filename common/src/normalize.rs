//! ファイル名の正規化
//!
//! 取り込み側が付けた接尾辞を除去し、シート照合用のキーを作る。
//!
//! ## 除去順序
//! 1. メッセージング接尾辞 `@s.whatsapp.net`（大文字小文字を区別）
//! 2. 拡張子 `.txt`（ASCII大文字小文字を無視）
//!
//! 照合キーを作る経路はすべて [`CanonicalKey::from_raw`] を通すこと。
//! 画面表示用の整形は [`crate::display`] にあり、照合には使わない。

use serde::Serialize;
use std::fmt;

/// メッセージング接尾辞
pub const MESSAGING_SUFFIX: &str = "@s.whatsapp.net";

/// テキスト拡張子
pub const TEXT_EXTENSION: &str = ".txt";

/// 生のファイル名を照合キーに正規化する
///
/// 末尾の接尾辞だけを対象とし、途中に現れるものは残す。
/// 接尾辞が重なっている場合（`a.txt@s.whatsapp.net` など）は
/// どちらも残らなくなるまで同じ順序で除去を繰り返すため、
/// `normalize(normalize(s)) == normalize(s)` が常に成り立つ。
pub fn normalize(raw: &str) -> String {
    let mut current = raw;
    loop {
        let stripped = strip_text_extension(strip_messaging_suffix(current));
        if stripped.len() == current.len() {
            return stripped.to_string();
        }
        current = stripped;
    }
}

/// 末尾の `@s.whatsapp.net` を1回だけ除去
pub(crate) fn strip_messaging_suffix(name: &str) -> &str {
    name.strip_suffix(MESSAGING_SUFFIX).unwrap_or(name)
}

/// 末尾の `.txt` を1回だけ除去（大文字小文字無視）
pub(crate) fn strip_text_extension(name: &str) -> &str {
    let ext_len = TEXT_EXTENSION.len();
    if name.len() < ext_len {
        return name;
    }
    let split = name.len() - ext_len;
    // マルチバイト文字の途中では切らない
    match name.get(split..) {
        Some(tail) if tail.eq_ignore_ascii_case(TEXT_EXTENSION) => &name[..split],
        _ => name,
    }
}

/// 照合キー
///
/// [`normalize`] を通した文字列だけを保持する。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CanonicalKey(String);

impl CanonicalKey {
    /// 生のファイル名から照合キーを作る
    pub fn from_raw(raw: &str) -> Self {
        Self(normalize(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CORPUS: &[&str] = &[
        "",
        "@s.whatsapp.net",
        ".txt",
        ".TXT",
        "5511999999999",
        "5511999999999.txt",
        "5511999999999@s.whatsapp.net",
        "5511999999999@s.whatsapp.net.txt",
        "5511999999999.txt@s.whatsapp.net",
        "5511999999999.TxT",
        "foo.txt.txt",
        "foo@s.whatsapp.net@s.whatsapp.net",
        "foo@S.WHATSAPP.NET",
        "notes.txt.bak",
        "a@s.whatsapp.net-copy",
        "relatório.txt",
        "日本語.txt",
        "x.tx",
        "  padded.txt  ",
    ];

    #[test]
    fn test_normalize_strips_messaging_suffix() {
        assert_eq!(normalize("5511999999999@s.whatsapp.net"), "5511999999999");
    }

    #[test]
    fn test_normalize_strips_extension_case_insensitive() {
        assert_eq!(normalize("5511999999999.txt"), "5511999999999");
        assert_eq!(normalize("5511999999999.TXT"), "5511999999999");
        assert_eq!(normalize("5511999999999.TxT"), "5511999999999");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_normalize_suffix_only() {
        assert_eq!(normalize("@s.whatsapp.net"), "");
        assert_eq!(normalize(".txt"), "");
    }

    #[test]
    fn test_normalize_stacked_suffixes_in_either_position() {
        // 拡張子が外側: 1周目で .txt、2周目で @s.whatsapp.net が外れる
        assert_eq!(normalize("5511999999999@s.whatsapp.net.txt"), "5511999999999");
        // 拡張子が内側: 1周目で両方外れる
        assert_eq!(normalize("5511999999999.txt@s.whatsapp.net"), "5511999999999");
        assert_eq!(normalize("foo.txt@s.whatsapp.net"), "foo");
        assert_eq!(normalize("foo@s.whatsapp.net.txt"), "foo");
    }

    #[test]
    fn test_normalize_only_strips_at_end() {
        assert_eq!(normalize("notes.txt.bak"), "notes.txt.bak");
        assert_eq!(normalize("a@s.whatsapp.net-copy"), "a@s.whatsapp.net-copy");
        assert_eq!(normalize("x.tx"), "x.tx");
    }

    #[test]
    fn test_messaging_suffix_is_case_sensitive() {
        assert_eq!(normalize("foo@S.WHATSAPP.NET"), "foo@S.WHATSAPP.NET");
    }

    #[test]
    fn test_normalize_does_not_trim_whitespace() {
        // 空白の扱いは照合側（trim比較）に任せる
        assert_eq!(normalize("  padded.txt  "), "  padded.txt  ");
    }

    #[test]
    fn test_normalize_multibyte_names() {
        assert_eq!(normalize("relatório.txt"), "relatório");
        assert_eq!(normalize("日本語.txt"), "日本語");
        // 末尾4バイトが文字境界にない場合も落ちない
        assert_eq!(normalize("日本語"), "日本語");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in CORPUS {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "idempotence broken for {:?}", raw);
        }
    }

    #[test]
    fn test_normalize_strips_repeated_extension() {
        // 1回の除去では `foo.txt` が残るが、照合キーは繰り返し除去した結果
        assert_eq!(normalize("foo.txt.txt"), "foo");
        assert_eq!(normalize("foo.TXT.txt"), "foo");
        assert_eq!(normalize("foo.txt@s.whatsapp.net.txt"), "foo");
    }

    #[test]
    fn test_normalize_is_deterministic() {
        for raw in CORPUS {
            assert_eq!(normalize(raw), normalize(raw));
        }
    }

    #[test]
    fn test_canonical_key_from_raw() {
        let key = CanonicalKey::from_raw("5511999999999@s.whatsapp.net");
        assert_eq!(key.as_str(), "5511999999999");
        assert_eq!(key.to_string(), "5511999999999");
        assert!(!key.is_empty());
        assert!(CanonicalKey::from_raw("@s.whatsapp.net").is_empty());
    }

    #[test]
    fn test_canonical_keys_for_same_file_compare_equal() {
        let a = CanonicalKey::from_raw("5511999999999.txt");
        let b = CanonicalKey::from_raw("5511999999999@s.whatsapp.net");
        assert_eq!(a, b);
    }

    #[test]
    fn test_canonical_key_serializes_as_string() {
        let key = CanonicalKey::from_raw("abc.txt");
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"abc\"");
    }
}
