use std::io;

use record_store::{build_server, create_pool, run_migrations, AppState, Config};

#[actix_web::main]
async fn main() -> io::Result<()> {
    let config = Config::load().unwrap_or_else(|e| e.exit());
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let pool = create_pool(&config.database_url, config.db_pool_size)
        .map_err(|e| io::Error::other(format!("Failed to create database pool: {}", e)))?;
    run_migrations(&pool)
        .map_err(|e| io::Error::other(format!("Failed to run database migrations: {}", e)))?;

    log::info!("Starting server at http://{}:{}", config.host, config.port);
    log::info!("Swagger UI at http://{}:{}/swagger-ui/", config.host, config.port);

    build_server(AppState::from_pool(pool), &config.host, config.port)?.await
}
