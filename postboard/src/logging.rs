//! ロギング初期化ユーティリティ
//!
//! コンソール出力（テキストまたはJSON）と、任意で日次ローテーションのファイル出力を構成する。

use crate::config::{get_env_with_fallback, get_env_with_fallback_or};
use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

/// ログ出力設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// ログレベル（`RUST_LOG`が設定されていればそちらを優先）
    pub level: String,
    /// コンソール出力をJSONにするか
    pub json: bool,
    /// ファイル出力先ディレクトリ
    pub log_dir: Option<PathBuf>,
}

impl LogSettings {
    /// 環境変数から読み込む
    ///
    /// - `POSTBOARD_LOG_LEVEL`（旧: `LOG_LEVEL`、デフォルト: info）
    /// - `POSTBOARD_LOG_FORMAT`（`json`でJSON出力）
    /// - `POSTBOARD_LOG_DIR`（設定時のみファイル出力）
    pub fn from_env() -> Self {
        let level = get_env_with_fallback_or("POSTBOARD_LOG_LEVEL", "LOG_LEVEL", "info");
        let json = get_env_with_fallback("POSTBOARD_LOG_FORMAT", "LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        let log_dir = get_env_with_fallback("POSTBOARD_LOG_DIR", "LOG_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        Self {
            level,
            json,
            log_dir,
        }
    }
}

/// 環境変数の設定でロギングを初期化する
pub fn init() -> anyhow::Result<()> {
    init_with(&LogSettings::from_env())
}

/// 指定設定でロギングを初期化する
pub fn init_with(settings: &LogSettings) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.level));

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    if settings.json {
        layers.push(
            fmt::layer()
                .json()
                .with_target(true)
                .with_current_span(true)
                .with_file(true)
                .with_line_number(true)
                .boxed(),
        );
    } else {
        layers.push(fmt::layer().with_target(true).boxed());
    }

    if let Some(dir) = &settings.log_dir {
        std::fs::create_dir_all(dir)?;
        let appender = RollingFileAppender::new(Rotation::DAILY, dir, "postboard.log");
        layers.push(
            fmt::layer()
                .json()
                .with_target(true)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(appender))
                .boxed(),
        );
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .try_init()?;

    tracing::debug!(level = %settings.level, json = settings.json, "Logging initialized");
    Ok(())
}
