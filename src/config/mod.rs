use std::env;
use std::path::PathBuf;

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::create_security_headers_layer;

const DEFAULT_PORT: u16 = 3000;

/// Process configuration, read once at startup. Every variable has a
/// development default.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub public_dir: PathBuf,
    pub views_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: database_url_from_env(),
            port: env::var("PORT")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            public_dir: dir_from_env("PUBLIC_DIR", "public"),
            views_dir: dir_from_env("VIEWS_DIR", "views"),
        }
    }
}

/// `DATABASE_URL` wins; otherwise the URL is composed from the individual
/// `DB_*` variables and their development defaults.
fn database_url_from_env() -> String {
    env::var("DATABASE_URL").unwrap_or_else(|_| {
        let host = env::var("DB_HOST").unwrap_or_else(|_| "localhost".to_string());
        let user = env::var("DB_USER").unwrap_or_else(|_| "postgres".to_string());
        let password = env::var("DB_PASSWORD").unwrap_or_else(|_| "postgres".to_string());
        let name = env::var("DB_NAME").unwrap_or_else(|_| "event_manager".to_string());
        format!("postgres://{user}:{password}@{host}/{name}")
    })
}

fn dir_from_env(var: &str, default: &str) -> PathBuf {
    env::var(var).map(PathBuf::from).unwrap_or_else(|_| PathBuf::from(default))
}
