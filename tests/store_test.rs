//! ファイルレコードストアのテスト
//!
//! 登録・レビュー記録・保存と再読み込みを検証

use chrono::{TimeZone, Utc};
use review_sheet::error::ReviewSheetError;
use review_sheet::store::{FileStore, ReviewStatus};
use tempfile::tempdir;

/// ファイルがなければ空のストア
#[test]
fn test_load_missing_store_is_empty() {
    let dir = tempdir().expect("Failed to create temp dir");
    let store = FileStore::load(&dir.path().join("files.json")).expect("読み込み失敗");

    assert!(store.all().is_empty());
    assert!(store.pending().is_empty());
}

/// 登録・保存・再読み込み
#[test]
fn test_register_save_and_reload() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("nested").join("files.json");

    let mut store = FileStore::load(&path).unwrap();
    let id = store
        .register(
            "https://files.example.com/5511999999999.txt",
            "5511999999999@s.whatsapp.net.txt",
        )
        .expect("登録失敗")
        .id
        .clone();
    store.save().expect("保存失敗");
    assert!(path.exists());

    let loaded = FileStore::load(&path).unwrap();
    let record = loaded.require(&id).expect("レコードが見つからない");
    assert_eq!(record.name, "5511999999999@s.whatsapp.net.txt");
    assert!(record.is_pending());
    assert_eq!(loaded.path(), path.as_path());
}

/// 未レビューは新しい順、レビュー済みは履歴へ移る
#[test]
fn test_pending_and_history_flow() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("files.json");
    let mut store = FileStore::load(&path).unwrap();

    let day = |d| Utc.with_ymd_and_hms(2024, 6, d, 8, 0, 0).unwrap();
    let old = store.register_at("p/1.txt", "1.txt", day(1)).unwrap().id.clone();
    let new = store.register_at("p/2.txt", "2.txt", day(2)).unwrap().id.clone();

    let pending: Vec<&str> = store.pending().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(pending, vec![new.as_str(), old.as_str()]);

    store.mark_reviewed_at(&old, ReviewStatus::Confirmed, day(3)).unwrap();
    store.mark_reviewed_at(&new, ReviewStatus::Denied, day(4)).unwrap();
    store.save().unwrap();

    let loaded = FileStore::load(&path).unwrap();
    assert!(loaded.pending().is_empty());
    let history = loaded.history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].id, new);
    assert_eq!(
        history[0].review.as_ref().map(|r| r.status),
        Some(ReviewStatus::Denied)
    );
}

/// 存在しないIDへのレビュー記録
#[test]
fn test_mark_unknown_record() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut store = FileStore::load(&dir.path().join("files.json")).unwrap();

    let err = store.mark_reviewed("missing", ReviewStatus::Confirmed).unwrap_err();
    assert!(matches!(err, ReviewSheetError::RecordNotFound(_)));
}

/// バージョン違いのストアは読み込まない
#[test]
fn test_version_mismatch() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("files.json");
    std::fs::write(&path, r#"{"version": 99, "files": []}"#).unwrap();

    let err = FileStore::load(&path).unwrap_err();
    assert!(matches!(err, ReviewSheetError::InvalidStore(_)));
}

/// 壊れたストア
#[test]
fn test_corrupt_store() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("files.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = FileStore::load(&path).unwrap_err();
    assert!(matches!(err, ReviewSheetError::JsonParse(_)));
}
