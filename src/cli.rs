use crate::store::ReviewStatus;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "review-sheet")]
#[command(about = "レビュー待ちファイルとスプレッドシート行の照合・レビュー管理ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// ファイルレコードストア（省略時は設定値）
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,
}

/// シートの取得元
#[derive(Args, Clone, Debug, Default)]
pub struct SheetArgs {
    /// 手元のシートファイル（json/csv/xlsx/ods）。省略時は Sheets API
    #[arg(long)]
    pub sheet: Option<PathBuf>,

    /// シート名（Excel・ODSのシート、または API のシート名を上書き）
    #[arg(long)]
    pub sheet_name: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// ファイル名でシート行を照合
    Lookup {
        /// 生のファイル名
        #[arg(required = true)]
        file_name: String,

        #[command(flatten)]
        sheet: SheetArgs,

        /// ファイル名の列（0始まり、設定値を上書き）
        #[arg(long, allow_negative_numbers = true)]
        key_column: Option<i64>,

        /// 表示を始める列（0始まり、設定値を上書き）
        #[arg(long, allow_negative_numbers = true)]
        start_column: Option<i64>,

        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// ファイル名の照合キーと表示名を確認
    Normalize {
        /// 生のファイル名（複数可）
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// 取り込んだファイルを登録
    Register {
        /// 保存先パス（公開URL）
        #[arg(required = true)]
        minio_path: String,

        /// ファイル名
        #[arg(required = true)]
        name: String,
    },

    /// 未レビューのファイル一覧
    Pending {
        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// レビュー履歴
    History {
        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// ファイル情報とシートの該当行を表示
    Show {
        /// ファイルID
        #[arg(required = true)]
        id: String,

        #[command(flatten)]
        sheet: SheetArgs,
    },

    /// 対話式でレビュー（ID省略時は未レビューを順に）
    Review {
        /// ファイルID
        id: Option<String>,

        #[command(flatten)]
        sheet: SheetArgs,
    },

    /// レビュー結果を記録
    Mark {
        /// ファイルID
        #[arg(required = true)]
        id: String,

        /// confirmed / denied
        #[arg(required = true)]
        status: ReviewStatus,
    },

    /// 本文をダウンロード（出力先省略時は標準出力）
    Download {
        /// ファイルID
        #[arg(required = true)]
        id: String,

        /// 出力先ファイルまたはディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 編集した本文を保存ワークフローへ送る
    SaveContent {
        /// ファイルID
        #[arg(required = true)]
        id: String,

        /// 本文ファイル（省略時は保存先から取得してエディタで編集）
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// PDF再生成ワークフローを起動
    RegeneratePdf {
        /// ファイルID
        #[arg(required = true)]
        id: String,
    },

    /// 設定を表示/編集
    Config {
        /// 設定値を保存（KEY=VALUE）
        #[arg(long)]
        set: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

/// `KEY=VALUE` を分解する
pub fn parse_key_value(input: &str) -> Option<(&str, &str)> {
    let (key, value) = input.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_value() {
        assert_eq!(parse_key_value("sheet_id=abc"), Some(("sheet_id", "abc")));
        assert_eq!(parse_key_value("sheet_range=A1:B2=x"), Some(("sheet_range", "A1:B2=x")));
        assert_eq!(parse_key_value("store_path="), Some(("store_path", "")));
        assert_eq!(parse_key_value("novalue"), None);
        assert_eq!(parse_key_value("=x"), None);
    }

    #[test]
    fn test_cli_parses_lookup_with_negative_column() {
        let cli = Cli::try_parse_from([
            "review-sheet",
            "lookup",
            "5511999999999@s.whatsapp.net",
            "--key-column",
            "-1",
            "--sheet",
            "leads.csv",
        ])
        .unwrap();

        match cli.command {
            Commands::Lookup { file_name, key_column, sheet, .. } => {
                assert_eq!(file_name, "5511999999999@s.whatsapp.net");
                assert_eq!(key_column, Some(-1));
                assert_eq!(sheet.sheet, Some(PathBuf::from("leads.csv")));
            }
            _ => panic!("lookup expected"),
        }
    }

    #[test]
    fn test_cli_parses_download_output() {
        let cli = Cli::try_parse_from(["review-sheet", "download", "abc", "-o", "out"]).unwrap();
        match cli.command {
            Commands::Download { id, output } => {
                assert_eq!(id, "abc");
                assert_eq!(output, Some(PathBuf::from("out")));
            }
            _ => panic!("download expected"),
        }

        let cli = Cli::try_parse_from(["review-sheet", "download", "abc"]).unwrap();
        assert!(matches!(cli.command, Commands::Download { output: None, .. }));
    }

    #[test]
    fn test_cli_parses_mark_status() {
        let cli = Cli::try_parse_from(["review-sheet", "mark", "abc", "denied", "-v"]).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Mark { id, status } => {
                assert_eq!(id, "abc");
                assert_eq!(status, ReviewStatus::Denied);
            }
            _ => panic!("mark expected"),
        }
    }
}
