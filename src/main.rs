use actix_cors::Cors;
use actix_web::{http::header, middleware::NormalizePath, web, App, HttpServer};
use tracing_actix_web::TracingLogger;

use portfolio_cms::{
    bootstrap::ensure_admin_user,
    db::postgres::{create_pool, run_migrations},
    graceful_shutdown::shutdown_signal,
    middlewares::auth::AuthMiddleware,
    routes::{configure_routes, multipart_config},
    settings::AppConfig,
    telemetry::init_tracing,
    AppState,
};

fn cors(config: &AppConfig) -> Cors {
    let origins = config.cors_origins();
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(3600);

    if origins.iter().any(|o| o == "*") {
        cors.allow_any_origin()
    } else {
        origins
            .iter()
            .fold(cors, |cors, origin| cors.allowed_origin(origin))
            .supports_credentials()
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = match AppConfig::new() {
        Ok(cfg) => cfg,
        Err(e) => {
            init_tracing(portfolio_cms::settings::LogFormat::Pretty);
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };
    init_tracing(config.log_format);
    tracing::info!("Loaded configuration: {:?}", config);

    let pool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;

    let app_state = web::Data::new(AppState::new(&config, pool));
    ensure_admin_user(&app_state).await?;

    let server_addr = format!("{}:{}", config.host, config.port);
    tracing::info!(
        "🚀 Starting {} v{} on {} ({})",
        config.name,
        env!("CARGO_PKG_VERSION"),
        server_addr,
        config.env
    );

    let worker_config = config.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .app_data(multipart_config(worker_config.max_upload_bytes))
            .wrap(AuthMiddleware)
            .wrap(cors(&worker_config))
            .wrap(NormalizePath::trim())
            .wrap(TracingLogger::default())
            .configure(configure_routes)
    })
    .workers(config.worker_count.max(1))
    .bind(&server_addr)?
    .shutdown_timeout(30)
    .run();

    let handle = server.handle();

    tokio::select! {
        res = server => res?,
        _ = shutdown_signal() => handle.stop(true).await,
    }

    tracing::info!("Server stopped");
    Ok(())
}
