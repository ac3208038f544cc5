use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::Router;
use axum::extract::{RawQuery, State};
use axum::response::Html;
use axum::routing::get;
use axum::Json;
use tracing::{error, info};

use crate::app::pipeline::{DashboardView, ForecastOptions, build_dashboard};
use crate::chart::{ChartRenderer, EchartsRenderer};
use crate::domain::{DashboardOptions, Dataset, Selection};
use crate::error::AppError;
use crate::web::endpoints::{GET_DASHBOARD, GET_FORECAST_OPTIONS, GET_INDEX, GET_OPTIONS};
use crate::web::page::render_page;
use crate::web::query::parse_selection_query;

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<Dataset>,
    pub renderer: Arc<dyn ChartRenderer>,
}

pub fn router(dataset: Arc<Dataset>) -> Router {
    let state = AppState {
        dataset,
        renderer: Arc::new(EchartsRenderer),
    };
    Router::new()
        .route(GET_INDEX, get(get_index))
        .route(GET_OPTIONS, get(get_options))
        .route(GET_DASHBOARD, get(get_dashboard))
        .route(GET_FORECAST_OPTIONS, get(get_forecast_options))
        .with_state(state)
}

/// Bind `0.0.0.0:port` and serve until the process stops.
pub async fn serve(port: u16, dataset: Arc<Dataset>) -> Result<(), AppError> {
    let address = SocketAddr::new(IpAddr::from([0, 0, 0, 0]), port);
    let server = axum::Server::try_bind(&address)
        .map_err(|e| AppError::runtime(format!("Failed to bind {address}: {e}")))?;
    info!(%address, "serving dashboard");

    server.serve(router(dataset).into_make_service()).await.map_err(|err| {
        error!("Error while serving dashboard: '{err}'");
        AppError::runtime(format!("Server error: {err}"))
    })
}

fn resolve(dataset: &Dataset, raw: Option<&str>) -> Selection {
    Selection::resolve(&parse_selection_query(raw), dataset)
}

async fn get_index(State(state): State<AppState>, RawQuery(raw): RawQuery) -> Html<String> {
    let selection = resolve(&state.dataset, raw.as_deref());
    let view = build_dashboard(&state.dataset, &selection);
    Html(render_page(&state.dataset, &view, state.renderer.as_ref()))
}

async fn get_options(State(state): State<AppState>) -> Json<DashboardOptions> {
    Json(state.dataset.options.clone())
}

async fn get_dashboard(State(state): State<AppState>, RawQuery(raw): RawQuery) -> Json<DashboardView> {
    let selection = resolve(&state.dataset, raw.as_deref());
    Json(build_dashboard(&state.dataset, &selection))
}

async fn get_forecast_options(State(state): State<AppState>, RawQuery(raw): RawQuery) -> Json<ForecastOptions> {
    let query = parse_selection_query(raw.as_deref());
    Json(ForecastOptions::for_currencies(&state.dataset, &query.currencies))
}
