use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agrochar_core::advisory::AdvisoryEngine;
use agrochar_core::domain::advisory::{AdvisoryRequest, AdvisorySnapshot};
use agrochar_core::domain::error::AdvisoryError;
use agrochar_core::pricing::PriceModel;
use agrochar_core::tables::{Crop, NEUTRAL_DEMAND};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = agrochar_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let engine = AdvisoryEngine::from_settings(&settings)?;

    let prices = match settings.price_table_path.as_deref() {
        Some(path) => {
            tracing::info!(path, "loading price multiplier table");
            PriceModel::from_path(path)?
        }
        None => PriceModel::default(),
    };

    let state = AppState {
        engine: Arc::new(engine),
        prices: Arc::new(prices),
    };

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/advisory/analyze", post(analyze_advisory))
        .route("/crops", get(list_crops))
        .route("/prices/:alternative", get(get_price))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Clone)]
struct AppState {
    engine: Arc<AdvisoryEngine>,
    prices: Arc<PriceModel>,
}

#[derive(Debug, Deserialize)]
struct AnalyzePayload {
    field_size_acres: f64,
    crop_type: String,
    location_district: String,
    state: Option<String>,
}

async fn analyze_advisory(
    State(state): State<AppState>,
    Json(payload): Json<AnalyzePayload>,
) -> Result<Json<AdvisorySnapshot>, StatusCode> {
    let request = AdvisoryRequest::try_new(
        payload.field_size_acres,
        &payload.crop_type,
        &payload.location_district,
        payload.state.as_deref(),
    )
    .map_err(error_status)?;

    let snapshot = state
        .engine
        .advise(&request, Utc::now())
        .map_err(error_status)?;

    Ok(Json(snapshot))
}

async fn list_crops(State(state): State<AppState>) -> Json<Vec<Crop>> {
    Json(state.engine.crops())
}

#[derive(Debug, Deserialize)]
struct PriceParams {
    district: Option<String>,
    demand: Option<f64>,
}

#[derive(Debug, Serialize)]
struct PriceResponse {
    alternative: String,
    district: Option<String>,
    price_per_ton: f64,
}

async fn get_price(
    State(state): State<AppState>,
    Path(alternative): Path<String>,
    Query(params): Query<PriceParams>,
) -> Result<Json<PriceResponse>, StatusCode> {
    let demand = params.demand.unwrap_or(NEUTRAL_DEMAND);

    let price_per_ton = state
        .prices
        .predict_price(
            state.engine.profiles(),
            &alternative,
            params.district.as_deref(),
            demand,
            Utc::now(),
        )
        .map_err(|_| StatusCode::BAD_REQUEST)?;

    Ok(Json(PriceResponse {
        alternative,
        district: params.district,
        price_per_ton,
    }))
}

/// Client-input problems become 4xx; anything else is captured and reported
/// as a 500.
fn error_status(err: anyhow::Error) -> StatusCode {
    match err.downcast_ref::<AdvisoryError>() {
        Some(AdvisoryError::InvalidInput { .. }) => StatusCode::BAD_REQUEST,
        Some(AdvisoryError::UnsupportedCrop { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
        None => {
            sentry_anyhow::capture_anyhow(&err);
            tracing::error!(error = %err, "advisory request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &agrochar_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
