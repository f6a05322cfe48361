use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReviewSheetError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("ファイルレコードが見つかりません: {0}")]
    RecordNotFound(String),

    #[error("ファイルレコードが不正: {0}")]
    InvalidRecord(String),

    #[error("シートファイルが不正: {0}")]
    InvalidSheetFile(String),

    #[error("シートデータの取得に失敗 (status {status}): {body}")]
    SheetApi { status: u16, body: String },

    #[error("Webhook呼び出しに失敗 (status {status}): {body}")]
    Webhook { status: u16, body: String },

    #[error("ファイル本文の取得に失敗 (status {status}): {body}")]
    Download { status: u16, body: String },

    #[error("HTTPエラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("ストアファイルが不正: {0}")]
    InvalidStore(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("スプレッドシート読み込みエラー: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("対話入力エラー: {0}")]
    Interaction(String),

    #[error(transparent)]
    Common(#[from] review_sheet_common::Error),
}

pub type Result<T> = std::result::Result<T, ReviewSheetError>;
