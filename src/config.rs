use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::OnceLock;

const DEFAULT_DATABASE_URL: &str = "sqlite://annotations.db?mode=rwc";
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_MAX_BULK_UPLOAD_BYTES: usize = 200 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub upload_dir: PathBuf,
    pub export_dir: PathBuf,
    pub cors_origins: Vec<String>,
    /// Cap on a single uploaded file.
    pub max_upload_bytes: usize,
    /// Cap on a whole `POST /images/bulk` request.
    pub max_bulk_upload_bytes: usize,
}

impl Config {
    /// | Env Var                 | Default                                       |
    /// |-------------------------|-----------------------------------------------|
    /// | `DATABASE_URL`          | `sqlite://annotations.db?mode=rwc`            |
    /// | `UPLOAD_DIR`            | `uploads`                                     |
    /// | `EXPORT_DIR`            | `annotations_export`                          |
    /// | `CORS_ORIGINS`          | `http://localhost:3000,http://127.0.0.1:3000` |
    /// | `MAX_UPLOAD_BYTES`      | `10485760`                                    |
    /// | `MAX_BULK_UPLOAD_BYTES` | `209715200`                                   |
    pub fn from_env() -> Self {
        let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.into());
        let upload_dir = env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".into());
        let export_dir = env::var("EXPORT_DIR").unwrap_or_else(|_| "annotations_export".into());

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            database_url,
            upload_dir: upload_dir.into(),
            export_dir: export_dir.into(),
            cors_origins,
            max_upload_bytes: parse_or("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES),
            max_bulk_upload_bytes: parse_or("MAX_BULK_UPLOAD_BYTES", DEFAULT_MAX_BULK_UPLOAD_BYTES),
        }
    }
}

fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Unparseable config value, using default");
            default
        }),
        Err(_) => default,
    }
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

pub fn get_config() -> &'static Config {
    CONFIG.get_or_init(Config::from_env)
}
