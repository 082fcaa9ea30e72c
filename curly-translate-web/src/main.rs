use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use curly_translate::mt::fallback_languages;
use curly_translate::{Config, Language, PreservingTranslator};

const CONFIG_ENV: &str = "CURLY_TRANSLATE_CONFIG";

#[derive(Serialize, Deserialize)]
pub struct TranslateRequest {
    pub text: String,
    pub target_language: String,
    /// Defaults to the configured source language
    #[serde(default)]
    pub source_language: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct TranslateResponse {
    pub translated: String,
    pub source: String,
    pub changed: bool,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Clone)]
pub struct AppState {
    pub translator: PreservingTranslator,
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/translate", post(translate_text))
        .route("/api/languages", get(list_languages))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::var(CONFIG_ENV).ok().map(PathBuf::from);
    let config = Config::load_or_default(config_path.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level)),
        )
        .init();

    let translator = config
        .build_translator()
        .map_err(|e| format!("Failed to initialize translator: {}", e))?;
    info!(
        provider = translator.provider_name(),
        "Starting curly-translate web server"
    );

    let listener = tokio::net::TcpListener::bind(&config.web.bind).await?;
    info!("Server running at http://{}", config.web.bind);

    axum::serve(listener, app(AppState { translator })).await?;

    Ok(())
}

async fn translate_text(
    State(state): State<AppState>,
    Json(request): Json<TranslateRequest>,
) -> Result<Json<TranslateResponse>, (StatusCode, Json<ErrorResponse>)> {
    if request.target_language.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "target_language must not be empty".to_string(),
            }),
        ));
    }

    let translator = match request.source_language.as_deref() {
        Some(source) if !source.trim().is_empty() => {
            state.translator.clone().with_source_language(source)
        }
        _ => state.translator.clone(),
    };

    info!(
        "Translating {:?} from {} to {}",
        &request.text,
        translator.source_language(),
        &request.target_language
    );
    let translated = translator
        .translate(&request.text, &request.target_language)
        .await;

    Ok(Json(TranslateResponse {
        changed: translated != request.text,
        translated,
        source: request.text,
    }))
}

async fn list_languages(State(state): State<AppState>) -> Json<Vec<Language>> {
    let languages = state
        .translator
        .supported_languages()
        .await
        .unwrap_or_else(|e| {
            warn!("Falling back to the built-in language list: {}", e);
            fallback_languages()
        });
    Json(languages)
}
