use actix_cors::Cors;
use actix_web::{middleware::NormalizePath, web, App, HttpServer};
use anyhow::Context;
use crypto_core::jwt;
use std::io;
use store_service::config::Config;
use store_service::services::AccountService;
use store_service::{configure_routes, db, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

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
                tracing::warn!(error = %e, "SIGTERM handler unavailable, waiting for Ctrl+C");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

fn init_tracing(json_logs: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,actix_web=info,sqlx=warn".into());
    let registry = tracing_subscriber::registry().with(filter);

    if json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// `store-service healthcheck`: hit the local health endpoint
async fn run_healthcheck() -> io::Result<()> {
    let port = std::env::var("STORE_SERVICE_PORT").unwrap_or_else(|_| "8080".to_string());
    let url = format!("http://127.0.0.1:{}/api/v1/health", port);

    match reqwest::Client::new().get(&url).send().await {
        Ok(resp) if resp.status().is_success() => Ok(()),
        Ok(resp) => {
            eprintln!("healthcheck HTTP status: {}", resp.status());
            Err(io::Error::new(io::ErrorKind::Other, "healthcheck failed"))
        }
        Err(e) => {
            eprintln!("healthcheck HTTP error: {}", e);
            Err(io::Error::new(io::ErrorKind::Other, "healthcheck error"))
        }
    }
}

/// `store-service create-staff <username> <password>`
async fn run_create_staff(config: &Config, username: &str, password: &str) -> anyhow::Result<()> {
    let pool = db::create_pool(&config.database)
        .await
        .context("Failed to connect to database")?;
    if config.database.run_migrations {
        db::run_migrations(&pool)
            .await
            .context("Failed to run migrations")?;
    }

    let user = AccountService::new(pool)
        .create_staff(username, password)
        .await
        .context("Failed to create staff user")?;
    println!("staff user '{}' ready (id {})", user.username, user.id);
    Ok(())
}

fn build_cors(allowed_origins: &str) -> Cors {
    let mut cors = Cors::default();
    for origin in allowed_origins.split(',') {
        let origin = origin.trim();
        if origin.is_empty() {
            continue;
        }
        if origin == "*" {
            cors = cors.allow_any_origin();
        } else {
            cors = cors.allowed_origin(origin);
        }
    }
    cors.allow_any_method().allow_any_header().max_age(3600)
}

fn to_io(err: anyhow::Error) -> io::Error {
    io::Error::new(io::ErrorKind::Other, format!("{:#}", err))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    let _ = dotenvy::dotenv();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.first().map(String::as_str) == Some("healthcheck") {
        return run_healthcheck().await;
    }

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(config.app.json_logs);

    if args.first().map(String::as_str) == Some("create-staff") {
        return match (args.get(1), args.get(2)) {
            (Some(username), Some(password)) => run_create_staff(&config, username, password)
                .await
                .map_err(to_io),
            _ => {
                eprintln!("usage: store-service create-staff <username> <password>");
                Err(io::Error::new(io::ErrorKind::InvalidInput, "missing arguments"))
            }
        };
    }

    tracing::info!("Starting store-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    match (&config.auth.private_key_pem, &config.auth.public_key_pem) {
        (Some(private_key), Some(public_key)) => {
            jwt::initialize_jwt_keys(private_key, public_key).map_err(to_io)?;
        }
        _ => {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "JWT_PRIVATE_KEY_PEM and JWT_PUBLIC_KEY_PEM must be set",
            ));
        }
    }

    let pool = db::create_pool(&config.database)
        .await
        .context("Failed to create database pool")
        .map_err(to_io)?;

    if config.database.run_migrations {
        db::run_migrations(&pool)
            .await
            .context("Failed to run database migrations")
            .map_err(to_io)?;
    }

    let state = web::Data::new(AppState {
        db: pool,
        token_ttl_secs: config.auth.access_token_ttl_secs,
    });
    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    let allowed_origins = config.cors.allowed_origins.clone();

    tracing::info!("Listening on {}", bind_address);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(build_cors(&allowed_origins))
            .wrap(NormalizePath::trim())
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(configure_routes)
    })
    .bind(&bind_address)?
    .run();

    let server_handle = server.handle();
    actix_web::rt::spawn(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received");
        server_handle.stop(true).await;
    });

    server.await?;

    tracing::info!("store-service shut down");
    Ok(())
}
