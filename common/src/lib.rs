//! Review Sheet Common Library
//!
//! レビュー対象ファイル名の正規化とシート行の照合。
//! CLIとバックエンド関数で同じ照合キーを使うための共有ライブラリ。

pub mod display;
pub mod error;
pub mod lookup;
pub mod matcher;
pub mod normalize;
pub mod projector;
pub mod types;

pub use display::display_name;
pub use error::{Error, Result};
pub use lookup::{lookup, LookupOptions, LookupOutcome};
pub use matcher::{find_row, MatchResult, MatchedRow};
pub use normalize::{normalize, CanonicalKey};
pub use projector::project;
pub use types::{ColumnValue, SheetData};
