use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::NormalizePath, web, App, HttpServer};
use migration::{Migrator, MigratorTrait};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use api::config::Config;
use api::middleware::auth::AuthMiddleware;
use api::middleware::rate_limit::CallerRateLimitMiddleware;
use application::PinStep;
use infrastructure::ipfs::IpfsClient;
use infrastructure::repositories::Repositories;
use infrastructure::storage::LocalFileStorage;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging with JSON support
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,api=debug,actix_web=info".into());

    let is_json = std::env::var("LOG_FORMAT").unwrap_or_default() == "json";

    if is_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_file(false)
                    .with_line_number(false)
                    .compact(),
            )
            .init();
    }

    let config = Config::from_env()?;
    let config_data = web::Data::new(config.clone());
    tracing::info!("Starting terra API server...");

    let db = infrastructure::database::init_database(&config.database_url).await?;
    if config.run_migrations {
        Migrator::up(&db, None).await?;
        tracing::info!("Database migrations applied");
    }
    let repos = web::Data::new(Repositories::postgres(db));

    tokio::fs::create_dir_all(&config.media_root).await?;
    let storage = web::Data::new(LocalFileStorage::new(&config.media_root));

    let pin_step = match &config.ipfs_api_url {
        Some(url) => {
            tracing::info!(ipfs_api_url = %url, "IPFS pinning enabled");
            PinStep::new(Arc::new(IpfsClient::new(url.as_str(), config.pin_policy())?))
        }
        None => {
            tracing::warn!("IPFS_API_URL not set; uploads will not be pinned");
            PinStep::disabled()
        }
    };
    let pin_step = web::Data::new(pin_step);

    let server_addr = format!("{}:{}", config.server_host, config.server_port);
    tracing::info!("Server listening on {}", server_addr);

    let rate_limit_per_minute = config.rate_limit_per_minute;

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .wrap(CallerRateLimitMiddleware::new(rate_limit_per_minute))
            .wrap(AuthMiddleware)
            .wrap(TracingLogger::default())
            .wrap(cors)
            .wrap(NormalizePath::trim())
            .app_data(repos.clone())
            .app_data(storage.clone())
            .app_data(pin_step.clone())
            .app_data(config_data.clone())
            .configure(api::configure)
    })
    .bind(&server_addr)?
    .run()
    .await?;

    Ok(())
}
