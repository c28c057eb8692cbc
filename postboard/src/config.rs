//! Configuration management via environment variables
//!
//! Provides helper functions for reading environment variables with fallback
//! to deprecated variable names with warning logs.

/// デフォルトのデータベースURL
pub const DEFAULT_DATABASE_URL: &str = "sqlite:./database.sqlite";
/// デフォルトの待受ホスト
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// デフォルトの待受ポート
pub const DEFAULT_PORT: u16 = 3001;

/// 常に許可するCORSオリジン（開発用フロントエンド）
const DEFAULT_CORS_ORIGINS: [&str; 4] = [
    "http://localhost:5173",
    "http://127.0.0.1:5173",
    "http://localhost:3000",
    "http://127.0.0.1:3000",
];

/// Get an environment variable with fallback to a deprecated name
///
/// If the new variable name is set, returns its value.
/// If only the old (deprecated) variable name is set, returns its value
/// and logs a deprecation warning.
///
/// # Example
/// ```
/// use postboard::config::get_env_with_fallback;
///
/// let port = get_env_with_fallback("POSTBOARD_PORT", "PORT");
/// ```
pub fn get_env_with_fallback(new_name: &str, old_name: &str) -> Option<String> {
    if let Ok(val) = std::env::var(new_name) {
        return Some(val);
    }
    if let Ok(val) = std::env::var(old_name) {
        tracing::warn!(
            "Environment variable '{}' is deprecated, use '{}' instead",
            old_name,
            new_name
        );
        return Some(val);
    }
    None
}

/// Get an environment variable with fallback and default value
pub fn get_env_with_fallback_or(new_name: &str, old_name: &str, default: &str) -> String {
    get_env_with_fallback(new_name, old_name).unwrap_or_else(|| default.to_string())
}

/// Get an environment variable with fallback, parsing to a specific type
///
/// Returns `default` if neither is set or parsing fails.
pub fn get_env_with_fallback_parse<T: std::str::FromStr>(
    new_name: &str,
    old_name: &str,
    default: T,
) -> T {
    get_env_with_fallback(new_name, old_name)
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// `true/1/yes/on` を真として解釈する
pub fn parse_bool_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// データベースURLを取得
///
/// 環境変数 `POSTBOARD_DATABASE_URL`（旧: `DATABASE_URL`）から取得する。
pub fn database_url() -> String {
    get_env_with_fallback_or("POSTBOARD_DATABASE_URL", "DATABASE_URL", DEFAULT_DATABASE_URL)
}

/// サーバー待受設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// 待受ホスト
    pub host: String,
    /// 待受ポート
    pub port: u16,
}

impl ServerConfig {
    /// 環境変数から読み込む
    pub fn from_env() -> Self {
        let host = get_env_with_fallback_or("POSTBOARD_HOST", "HOST", DEFAULT_HOST);
        let port = get_env_with_fallback_parse("POSTBOARD_PORT", "PORT", DEFAULT_PORT);
        Self { host, port }
    }

    /// CLI引数から生成する
    pub fn from_args(host: String, port: u16) -> Self {
        Self { host, port }
    }

    /// バインドアドレス
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// アプリケーション設定（ハンドラー・ミドルウェアから参照）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// CORSで許可するオリジン
    pub cors_origins: Vec<String>,
    /// `/api/posts` 配下のAPIリクエストを監査ログに記録するか
    pub audit_api_requests: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
            audit_api_requests: false,
        }
    }
}

impl AppConfig {
    /// 環境変数から読み込む
    ///
    /// `POSTBOARD_CORS_ORIGIN`（旧: `CORS_ORIGIN`）はカンマ区切りで既定のオリジンに追加される。
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(extra) = get_env_with_fallback("POSTBOARD_CORS_ORIGIN", "CORS_ORIGIN") {
            for origin in extra.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                if !config.cors_origins.iter().any(|o| o == origin) {
                    config.cors_origins.push(origin.to_string());
                }
            }
        }

        config.audit_api_requests = get_env_with_fallback(
            "POSTBOARD_AUDIT_API_REQUESTS",
            "AUDIT_API_REQUESTS",
        )
        .map(|v| parse_bool_flag(&v))
        .unwrap_or(false);

        config
    }
}
