use clap::Parser;

/// Record store API server configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "record-store", about = "Record store REST API", long_about = None)]
pub struct Config {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: String,

    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(short, long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Maximum number of pooled database connections
    #[arg(long, env = "DB_POOL_SIZE", default_value_t = 10)]
    pub db_pool_size: u32,
}

impl Config {
    /// Reads `.env` if present, then parses arguments with environment
    /// fallbacks.
    pub fn load() -> Result<Self, clap::Error> {
        _ = dotenvy::dotenv();
        Self::try_parse()
    }
}
