//! 対話式レビュー
//!
//! ファイル情報とシートの該当行を表示し、承認・却下・本文表示・本文編集・
//! PDF再生成を選ばせる。

use crate::config::Config;
use crate::error::{ReviewSheetError, Result};
use crate::progress::spinner;
use crate::store::{FileRecord, FileStore, ReviewStatus};
use crate::webhook::WebhookClient;
use dialoguer::{Editor, Select};
use review_sheet_common::{display_name, lookup, LookupOutcome, SheetData};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 対話アクション
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    /// 承認して終了
    Confirm,
    /// 却下して終了
    Deny,
    /// 本文を表示
    Preview,
    /// 本文をエディタで編集して保存ワークフローへ送る
    EditContent,
    /// PDF再生成ワークフローを起動
    RegeneratePdf,
    /// 何もせず次へ
    Skip,
}

impl ReviewAction {
    pub const ALL: [ReviewAction; 6] = [
        ReviewAction::Confirm,
        ReviewAction::Deny,
        ReviewAction::Preview,
        ReviewAction::EditContent,
        ReviewAction::RegeneratePdf,
        ReviewAction::Skip,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ReviewAction::Confirm => "承認（クライアントに送る）",
            ReviewAction::Deny => "却下",
            ReviewAction::Preview => "本文を表示",
            ReviewAction::EditContent => "本文を編集",
            ReviewAction::RegeneratePdf => "PDFを再生成",
            ReviewAction::Skip => "スキップ",
        }
    }
}

/// レコードの概要行
pub fn summarize_record(record: &FileRecord) -> Vec<String> {
    let mut lines = vec![
        format!("{} [{}]", display_name(&record.name), record.id),
        format!("  元のファイル名: {}", record.name),
        format!("  保存先: {}", record.minio_path),
        format!("  登録日: {}", record.created_at.format("%Y-%m-%d %H:%M")),
    ];
    if let Some(review) = &record.review {
        lines.push(format!(
            "  レビュー: {} ({})",
            review.status,
            review.reviewed_at.format("%Y-%m-%d %H:%M")
        ));
    }
    lines
}

/// 照合結果の表示行
pub fn render_lookup(outcome: &LookupOutcome) -> Vec<String> {
    if !outcome.found {
        return vec![format!("シートに該当行がありません（キー: {}）", outcome.key)];
    }

    match outcome.matched_columns.as_deref() {
        Some(columns) if !columns.is_empty() => columns
            .iter()
            .map(|c| format!("{}: {}", c.name, c.value))
            .collect(),
        _ => vec![format!(
            "該当行はありますが表示する値がありません（キー: {}）",
            outcome.key
        )],
    }
}

/// レコードとシート照合結果を表示する
///
/// シートがない場合は照合せずにその旨だけ表示する。
pub fn print_record_with_sheet(
    record: &FileRecord,
    sheet: Option<&SheetData>,
    config: &Config,
) -> Result<()> {
    for line in summarize_record(record) {
        println!("{}", line);
    }
    println!("---");

    if sheet.is_none() {
        println!("シートにデータがありません");
        return Ok(());
    }

    let outcome = lookup(&record.name, sheet, &config.lookup_options())?;
    debug!(id = %record.id, key = %outcome.key, found = outcome.found, "照合結果");
    for line in render_lookup(&outcome) {
        println!("  {}", line);
    }
    Ok(())
}

/// 1件を対話式でレビューする
///
/// 承認・却下した場合はストアに記録して保存し、その結果を返す。
pub async fn run_interactive_review(
    config: &Config,
    store: &mut FileStore,
    id: &str,
    sheet: Option<&SheetData>,
) -> Result<Option<ReviewStatus>> {
    let record = store.require(id)?.clone();

    println!();
    print_record_with_sheet(&record, sheet, config)?;
    println!();

    loop {
        let action = prompt_action()?;

        match action {
            ReviewAction::Confirm | ReviewAction::Deny => {
                let status = if action == ReviewAction::Confirm {
                    ReviewStatus::Confirmed
                } else {
                    ReviewStatus::Denied
                };
                store.mark_reviewed(&record.id, status)?;
                store.save()?;
                println!("  → {}\n", status);
                return Ok(Some(status));
            }
            ReviewAction::Preview => {
                if let Err(e) = preview_content(config, &record).await {
                    println!("  ⚠ {}", e);
                }
            }
            ReviewAction::EditContent => {
                if let Err(e) = edit_content(config, &record).await {
                    println!("  ⚠ {}", e);
                }
            }
            ReviewAction::RegeneratePdf => {
                if let Err(e) = regenerate_pdf(config, &record).await {
                    println!("  ⚠ {}", e);
                }
            }
            ReviewAction::Skip => {
                println!("  → スキップ\n");
                return Ok(None);
            }
        }
    }
}

fn prompt_action() -> Result<ReviewAction> {
    let labels: Vec<&str> = ReviewAction::ALL.iter().map(|a| a.label()).collect();
    let index = Select::new()
        .with_prompt("このファイルをクライアントに送りますか？")
        .items(&labels)
        .default(0)
        .interact()
        .map_err(|e| ReviewSheetError::Interaction(e.to_string()))?;
    Ok(ReviewAction::ALL[index])
}

/// 保存先から本文を取得する
async fn fetch_content(config: &Config, record: &FileRecord) -> Result<String> {
    let client = WebhookClient::new(config.timeout_seconds)?;
    let pb = spinner("本文を取得中...");
    let text = client.download_text(&record.minio_path).await;
    pb.finish_and_clear();
    text
}

/// 本文を表示する
pub async fn preview_content(config: &Config, record: &FileRecord) -> Result<()> {
    let text = fetch_content(config, record).await?;
    println!("----- {} -----", display_name(&record.name));
    println!("{}", text.trim_end());
    println!("-----");
    Ok(())
}

/// 保存先のファイルパスを決める
///
/// 既存のディレクトリを指定した場合は、その中にファイル名で保存する。
/// ファイル名が使えない場合は `<id>.txt`。
pub fn download_path(record: &FileRecord, output: &Path) -> PathBuf {
    if !output.is_dir() {
        return output.to_path_buf();
    }
    let file_name = Path::new(&record.name)
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| format!("{}.txt", record.id).into());
    output.join(file_name)
}

/// 本文をダウンロードする（出力先がなければ標準出力へ）
pub async fn download_content(
    config: &Config,
    record: &FileRecord,
    output: Option<&Path>,
) -> Result<()> {
    let text = fetch_content(config, record).await?;
    match output {
        Some(output) => {
            let path = download_path(record, output);
            std::fs::write(&path, &text)?;
            info!(id = %record.id, path = %path.display(), "本文を保存");
            println!("✔ 保存しました: {}", path.display());
        }
        None => print!("{}", text),
    }
    Ok(())
}

/// 本文を取得してエディタで編集し、変更があれば保存ワークフローへ送る
pub async fn edit_content(config: &Config, record: &FileRecord) -> Result<()> {
    let url = config.save_content_webhook()?;
    let client = WebhookClient::new(config.timeout_seconds)?;
    let original = fetch_content(config, record).await?;

    let edited = Editor::new()
        .extension(".txt")
        .edit(&original)
        .map_err(|e| ReviewSheetError::Interaction(e.to_string()))?;

    match edited {
        Some(text) if text != original => {
            let pb = spinner("本文を保存中...");
            let response = client.save_content(url, record, &text).await;
            pb.finish_and_clear();
            let response = response?;
            println!("  ✔ 本文を保存ワークフローへ送りました: {}", response);
        }
        _ => println!("  → 変更なし"),
    }
    Ok(())
}

/// PDF再生成ワークフローを起動する
pub async fn regenerate_pdf(config: &Config, record: &FileRecord) -> Result<()> {
    let url = config.regenerate_pdf_webhook()?;
    let client = WebhookClient::new(config.timeout_seconds)?;

    let pb = spinner("PDF再生成を依頼中...");
    let response = client.regenerate_pdf(url, record).await;
    pb.finish_and_clear();
    let response = response?;
    println!("  ✔ PDF再生成を依頼しました: {}", response);
    Ok(())
}
