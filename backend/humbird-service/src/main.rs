use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use humbird_service::middleware::build_cors;
use humbird_service::{db, handlers, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing() {
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info,mongodb=warn".into()),
        )
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(|| tracing_subscriber::fmt::layer()))
        .init();
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = terminate.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable; waiting for Ctrl+C only");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

/// HumBird Service
///
/// Startup order: configuration, document store, routes, and only then the
/// listener. A store that cannot be initialized does not stop the process;
/// health checks keep answering while data routes report the failure.
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = Config::from_env().context("Failed to load configuration")?;

    tracing::info!("Starting humbird-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    let store = db::init_store(&config.store).await;
    let store_data = web::Data::new(store);
    let cors_config = config.cors.clone();

    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(store_data.clone())
            .wrap(build_cors(&cors_config))
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(handlers::configure)
    })
    .disable_signals();

    if let Some(workers) = config.app.workers {
        server = server.workers(workers);
    }

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    let server = server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run();
    tracing::info!("HTTP server listening on {}", bind_address);

    let server_handle = server.handle();
    let mut server_task = tokio::spawn(server);

    tokio::select! {
        joined = &mut server_task => {
            joined
                .context("HTTP server task panicked")?
                .context("HTTP server failed")?;
        }
        _ = shutdown_signal() => {
            tracing::info!("Shutdown signal received");
            server_handle.stop(true).await;
            server_task
                .await
                .context("HTTP server task panicked")?
                .context("HTTP server failed")?;
        }
    }

    tracing::info!("humbird-service shut down");
    Ok(())
}
