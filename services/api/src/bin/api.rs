//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{InMemoryItemStore, OpenAiTranslateAdapter, PgItemStore, WebTranslateAdapter},
    config::{Config, TranslatorKind},
    error::ApiError,
    web::{api_router, state::AppState},
};
use async_openai::{config::OpenAIConfig, Client};
use axum::http::{header::CONTENT_TYPE, HeaderValue, Method};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vocabulary_core::ports::{ItemStore, TranslationService};

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Choose the Item Store ---
    let store: Arc<dyn ItemStore> = match &config.database_url {
        Some(database_url) => {
            info!("Connecting to database...");
            let db_pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(database_url)
                .await?;
            let pg_store = PgItemStore::new(db_pool);
            info!("Running database migrations...");
            pg_store.run_migrations().await?;
            info!("Database migrations complete.");
            Arc::new(pg_store)
        }
        None => {
            info!("DATABASE_URL not set; vocabulary is kept in memory only.");
            Arc::new(InMemoryItemStore::new())
        }
    };

    // --- 3. Initialize the Translator ---
    let translator: Arc<dyn TranslationService> = match config.translator {
        TranslatorKind::Web => Arc::new(WebTranslateAdapter::new(
            config.source_language.clone(),
            config.target_language.clone(),
            config.translate_timeout,
        )?),
        TranslatorKind::OpenAi => {
            let openai_config = OpenAIConfig::new().with_api_key(
                config
                    .openai_api_key
                    .as_ref()
                    .ok_or_else(|| ApiError::Internal("OPENAI_API_KEY is required".to_string()))?,
            );
            Arc::new(OpenAiTranslateAdapter::new(
                Client::with_config(openai_config),
                config.translation_model.clone(),
                config.source_language.clone(),
                config.target_language.clone(),
            ))
        }
    };
    info!("Using the {:?} translator", config.translator);

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState::new(store, translator, config.clone()));

    let cors_origin = config.cors_origin.parse::<HeaderValue>().map_err(|e| {
        ApiError::Internal(format!("Invalid CORS origin '{}': {}", config.cors_origin, e))
    })?;
    let cors = CorsLayer::new()
        .allow_origin(cors_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    // --- 5. Create the Web Router ---
    let app = api_router(app_state).layer(cors);

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
