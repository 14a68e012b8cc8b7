use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    /// Optional lexicon file (TOML or JSON) replacing the built-in vocabulary
    pub lexicon_path: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    /// Falls back to libpq's own lookup (PGPASSWORD, .pgpass) when unset
    pub password: Option<String>,
    pub max_connections: u32,
}

impl Config {
    /// Configuration from environment variables (a `.env` file is loaded
    /// by the binary beforehand).
    pub fn new() -> Result<Self> {
        Ok(Config {
            database: DatabaseConfig {
                host: env_or("DB_HOST", "localhost"),
                port: env_or("DB_PORT", "5432")
                    .parse()
                    .context("DB_PORT must be a port number")?,
                database: env_or("DB_NAME", "parcelnotes"),
                username: env_or("DB_USERNAME", "postgres"),
                password: std::env::var("DB_PASSWORD").ok(),
                max_connections: env_or("DB_MAX_CONNECTIONS", "5")
                    .parse()
                    .context("DB_MAX_CONNECTIONS must be a positive integer")?,
            },
            lexicon_path: std::env::var("PARCEL_LEXICON_PATH")
                .ok()
                .filter(|path| !path.trim().is_empty()),
        })
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}
