use std::{
    net::{IpAddr, SocketAddr},
    path::PathBuf,
    sync::Arc,
};

use axum::http::Method;
use clap::Parser;
use eyre::{Context, Result};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::MakeRequestUuid,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
    ServiceBuilderExt,
};
use tracing::info;
use tracing_error::ErrorLayer;
use tracing_subscriber::{prelude::*, EnvFilter};

use vellum::{
    app_state::{AppState, SharedState},
    routes,
};
use vellum_core::{
    config::{self, Config},
    model::repository::db::{self, DbPool},
    upload::{CloudinaryStore, ImageStore},
};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[arg(short, long)]
    config: String,
}

fn init_error_reporting() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "1")
    }
    if std::env::var("RUST_SPANTRACE").is_err() {
        std::env::set_var("RUST_SPANTRACE", "1");
    }
    color_eyre::install()
}

fn init_tracing() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "debug,hyper=info")
    }
    tracing_subscriber::registry()
        .with(EnvFilter::from_env("VELLUM_LOG"))
        .with(ErrorLayer::default())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn open_database(config_dir: &std::path::Path, config: &Config) -> Result<DbPool> {
    let data_dir = if config.data_dir.path.is_absolute() {
        config.data_dir.path.clone()
    } else {
        config_dir.join(&config.data_dir.path)
    };
    std::fs::create_dir_all(&data_dir).wrap_err("could not create data directory")?;
    let db_url = format!("sqlite://{}", data_dir.join("vellum.db").display());
    db::open_db_pool(&db_url).await
}

fn listen_addr(config: &Config) -> Result<SocketAddr> {
    let addr: IpAddr = match &config.address {
        Some(a) => a.parse().wrap_err("error parsing listening address")?,
        None => "127.0.0.1".parse().expect("is a valid address"),
    };
    Ok(SocketAddr::new(addr, config.port.unwrap_or(3000)))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_error_reporting()?;
    init_tracing();

    let config_path = PathBuf::from(args.config);
    let config = config::read_config(&config_path).await?;
    // relative paths in the config file resolve against its directory
    let config_dir = config_path
        .parent()
        .expect("has read config file, so parent must be a directory");

    info!("Starting up...");
    let pool = open_database(config_dir, &config).await?;
    let image_store: Arc<dyn ImageStore> = Arc::new(CloudinaryStore::new(config.upload.clone()));
    let shared_state: SharedState = Arc::new(AppState {
        pool: pool.clone(),
        image_store,
    });

    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers(Any)
        // the admin frontend is served from a different origin
        .allow_origin(Any);
    let app = routes::api_router()
        .layer(
            ServiceBuilder::new()
                .set_x_request_id(MakeRequestUuid)
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().include_headers(true))
                        .on_response(DefaultOnResponse::new().include_headers(true)),
                ),
        )
        .layer(cors)
        .with_state(shared_state);

    let addr = listen_addr(&config)?;
    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .wrap_err("Error binding socket")?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("server error")?;
    info!("Shutting down...");
    pool.close().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        eprintln!("Unable to listen for shutdown signal: {}", err);
        // shut down anyway
        std::process::exit(1);
    }
}
