//! serve サブコマンド
//!
//! HTTPサーバーを起動します。

use crate::config::{self, AppConfig, ServerConfig, DEFAULT_HOST, DEFAULT_PORT};
use crate::{db, server, AppState};
use clap::Args;

/// serve サブコマンドの引数
#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Listen port
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "POSTBOARD_PORT")]
    pub port: u16,

    /// Bind address
    #[arg(short = 'H', long, default_value = DEFAULT_HOST, env = "POSTBOARD_HOST")]
    pub host: String,
}

/// serve サブコマンドを実行
pub async fn execute(args: &ServeArgs) -> anyhow::Result<()> {
    run(ServerConfig::from_args(args.host.clone(), args.port)).await
}

/// DBを初期化してサーバーを起動し、終了時に接続を閉じる
pub async fn run(server_config: ServerConfig) -> anyhow::Result<()> {
    let database_url = config::database_url();
    let pool = db::initialize_database(&database_url).await?;
    tracing::info!(database_url = %database_url, "Database ready");

    let state = AppState::new(pool.clone(), AppConfig::from_env());
    if state.config.audit_api_requests {
        tracing::info!("API request auditing enabled");
    }

    let result = server::run(state, &server_config.bind_addr()).await;
    db::close_database(&pool).await;
    result?;
    Ok(())
}
