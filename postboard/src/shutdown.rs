//! 協調的シャットダウン
//!
//! `server::serve`はCtrl+C・SIGTERMに加えてこのコントローラを待機する。
//! 停止要求後は新規接続を受け付けず、処理中のリクエストが終わるとリスナーを閉じる。
//! CLIの`serve`はその後にDBプールを閉じる。

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use tokio::sync::Notify;

/// postboardサーバーの停止要求
///
/// `AppState`が保持し、クローン間で状態を共有する。
/// 結合テストはOSシグナルを送らずにこれでサーバーを止める。
#[derive(Clone, Debug, Default)]
pub struct ShutdownController {
    state: Arc<ShutdownState>,
}

#[derive(Debug, Default)]
struct ShutdownState {
    stopping: AtomicBool,
    waiters: Notify,
}

impl ShutdownController {
    /// 停止要求済みか
    pub fn is_shutdown_requested(&self) -> bool {
        self.state.stopping.load(Ordering::Acquire)
    }

    /// 停止を要求し、待機中のタスクを起こす（2回目以降は何もしない）
    pub fn request_shutdown(&self) {
        if !self.state.stopping.swap(true, Ordering::AcqRel) {
            self.state.waiters.notify_waiters();
        }
    }

    /// 停止要求まで待機する
    ///
    /// 要求と同時に待機を始めても取りこぼさないよう、フラグ確認前に通知を登録する。
    pub async fn wait(&self) {
        let notified = self.state.waiters.notified();
        if self.is_shutdown_requested() {
            return;
        }
        notified.await;
    }
}
