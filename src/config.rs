use thiserror::Error;

/// 設定読み込みのエラー
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be {expected}, got {value:?}")]
    InvalidValue {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// 永続化バックエンド
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// プロセス内メモリ（再起動で消える）
    InMemory,
    /// PostgreSQL
    Postgres {
        database_url: String,
        max_connections: u32,
    },
}

/// アプリケーション設定
///
/// 環境変数から読み込む:
/// - `BIND_ADDR`（既定: 0.0.0.0）
/// - `PORT`（既定: 3000）
/// - `DATABASE_URL`（設定時はPostgreSQL、未設定時はメモリ）
/// - `DB_MAX_CONNECTIONS`（既定: 5）
/// - `REBUILD_READ_MODELS`（true/1 で起動時にRead Modelを再構築）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: String,
    pub port: u16,
    pub storage: StorageBackend,
    pub rebuild_read_models: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 任意のキー参照関数から設定を構築する
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = match lookup("PORT") {
            Some(value) => value.parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                name: "PORT",
                expected: "a port number",
                value,
            })?,
            None => 3000,
        };

        let storage = match lookup("DATABASE_URL").filter(|url| !url.is_empty()) {
            Some(database_url) => {
                let max_connections = match lookup("DB_MAX_CONNECTIONS") {
                    Some(value) => value
                        .parse::<u32>()
                        .ok()
                        .filter(|n| *n > 0)
                        .ok_or(ConfigError::InvalidValue {
                            name: "DB_MAX_CONNECTIONS",
                            expected: "a positive integer",
                            value,
                        })?,
                    None => 5,
                };
                StorageBackend::Postgres {
                    database_url,
                    max_connections,
                }
            }
            None => StorageBackend::InMemory,
        };

        let rebuild_read_models = match lookup("REBUILD_READ_MODELS") {
            Some(value) => parse_flag(&value).ok_or(ConfigError::InvalidValue {
                name: "REBUILD_READ_MODELS",
                expected: "true/false/1/0",
                value,
            })?,
            None => false,
        };

        Ok(Self {
            bind_addr,
            port,
            storage,
            rebuild_read_models,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" | "" => Some(false),
        _ => None,
    }
}
