//! Web layer
//!
//! One router per service: the background-removal app and the
//! size-comparison app are deployed as separate processes on separate ports
//! and share nothing but this module's plumbing. Handlers stay thin and
//! delegate to the service layer.

use std::net::SocketAddr;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::compare::CompareService;
use crate::config::Config;
use crate::errors::AppError;
use crate::removal::{MatteEngine, MatteOptions, RemovalService};
use crate::storage::OutputStorage;

pub mod handlers;
pub mod pages;
pub mod responses;

/// State shared by the background-removal handlers
#[derive(Clone)]
pub struct RemovalState {
    pub service: RemovalService,
    pub storage: OutputStorage,
}

/// State shared by the size-comparison handlers
#[derive(Clone)]
pub struct CompareState {
    pub service: CompareService,
    pub max_upload_bytes: usize,
}

/// Web server configuration and setup
#[derive(Debug)]
pub struct WebServer {
    app: Router,
    addr: SocketAddr,
}

impl WebServer {
    /// Background-removal service, bound per the `removal` config section.
    pub fn removal(config: &Config) -> Result<Self, AppError> {
        let storage = OutputStorage::new(config.storage.output_path.clone());
        let engine = MatteEngine::new(MatteOptions {
            color_threshold: config.processing.matte_threshold,
            border_width: config.processing.matte_border_width,
        });
        let state = RemovalState {
            service: RemovalService::new(engine, storage.clone()),
            storage,
        };

        let addr = format!("{}:{}", config.removal.host, config.removal.port).parse()?;
        Ok(Self {
            app: removal_router(state),
            addr,
        })
    }

    /// Size-comparison service, bound per the `compare` config section.
    pub fn compare(config: &Config) -> Result<Self, AppError> {
        if !(1..=100).contains(&config.processing.jpeg_quality) {
            return Err(AppError::configuration(format!(
                "jpeg_quality must be between 1 and 100, got {}",
                config.processing.jpeg_quality
            )));
        }

        let state = CompareState {
            service: CompareService::new(config.processing.jpeg_quality),
            max_upload_bytes: config.processing.max_upload_bytes,
        };

        let addr = format!("{}:{}", config.compare.host, config.compare.port).parse()?;
        Ok(Self {
            app: compare_router(state),
            addr,
        })
    }

    /// Start the web server
    pub async fn serve(self) -> Result<(), AppError> {
        let listener = tokio::net::TcpListener::bind(&self.addr).await?;
        axum::serve(listener, self.app).await?;
        Ok(())
    }

    pub fn host(&self) -> String {
        self.addr.ip().to_string()
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }
}

/// Router for the background-removal app. The original imposes no upload
/// cap here, so the default body limit is lifted.
pub fn removal_router(state: RemovalState) -> Router {
    Router::new()
        .route(
            "/",
            get(handlers::removal::upload_form).post(handlers::removal::upload_image),
        )
        .route(
            "/uploads/remove/:file_name",
            post(handlers::removal::download_output),
        )
        .route("/health", get(handlers::health::health_check))
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Router for the size-comparison app, capped at the configured upload size.
pub fn compare_router(state: CompareState) -> Router {
    let max_upload_bytes = state.max_upload_bytes;
    Router::new()
        .route(
            "/",
            get(handlers::compare::compare_form).post(handlers::compare::compare_image),
        )
        .route("/health", get(handlers::health::health_check))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
