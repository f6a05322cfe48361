//! 通信中のスピナー表示

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// スピナーを開始する（端末でなければ何も描画しない）
pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
