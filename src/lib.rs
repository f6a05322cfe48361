//! review-sheet
//!
//! 取り込まれたファイルをスプレッドシートの行と照合し、
//! レビュー状態とワークフロー連携を管理するCLIのライブラリ部分。

pub mod cli;
pub mod config;
pub mod error;
pub mod progress;
pub mod review;
pub mod sheets;
pub mod store;
pub mod webhook;
