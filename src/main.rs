//! # Tide Calendar Server Entry Point
//!
//! This binary serves the iCalendar tide feed over HTTP. It wires the
//! library pipeline (fetch → parse → synthesize) behind a single read
//! endpoint:
//!
//! - `GET /tide/{station}` → `text/calendar` feed for a JMA station
//! - `GET /health` → liveness probe
//!
//! The feed always starts at "today" in JST and spans the configured
//! number of days (default 90). An upstream JMA failure maps to 502;
//! an unknown station still serves a feed, just with a degraded
//! calendar name (the raw station symbol instead of a place name).

// Test modules
#[cfg(test)]
mod tests;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::{FixedOffset, NaiveDate, Utc};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tide_cal_lib::tide_table::{HttpTideSource, TideError};
use tide_cal_lib::{calendar, config::Config, lunar, stations, tide_label};

/// Shared handler state: the upstream source and the feed span.
#[derive(Clone)]
struct AppState {
    source: HttpTideSource,
    feed_days: u32,
}

/// Handler-level error mapped onto HTTP status codes.
enum FeedError {
    /// The JMA fetch failed; the feed cannot be built.
    Upstream(TideError),
}

impl From<TideError> for FeedError {
    fn from(err: TideError) -> Self {
        FeedError::Upstream(err)
    }
}

impl IntoResponse for FeedError {
    fn into_response(self) -> Response {
        match self {
            FeedError::Upstream(err) => {
                tracing::error!("upstream tide table fetch failed: {err}");
                (
                    StatusCode::BAD_GATEWAY,
                    format!("upstream tide table unavailable: {err}"),
                )
                    .into_response()
            }
        }
    }
}

/// GET /tide/{station}
///
/// Build and return the calendar document for one station.
async fn tide_feed(
    State(state): State<AppState>,
    Path(station): Path<String>,
) -> Result<Response, FeedError> {
    // Unknown station: keep serving, with the raw symbol as the place.
    let place = match stations::place_for(&station) {
        Some(place) => place,
        None => station.as_str(),
    };

    let ical = calendar::synthesize(
        &station,
        place,
        jst_today(),
        state.feed_days,
        &state.source,
        lunar::lunar_age,
        tide_label::table(),
    )
    .await?;

    Ok(([(header::CONTENT_TYPE, "text/calendar")], ical).into_response())
}

/// GET /health
async fn health_check() -> &'static str {
    "ok"
}

/// Today's civil date in JST, the timezone of every JMA tide table.
fn jst_today() -> NaiveDate {
    let jst = FixedOffset::east_opt(9 * 3600).expect("JST offset is valid");
    Utc::now().with_timezone(&jst).date_naive()
}

/// Create the application router with all routes and tracing middleware.
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/tide/{station}", get(tide_feed))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::load();
    let state = AppState {
        source: HttpTideSource::new(reqwest::Client::new(), config.feed.base_url.clone()),
        feed_days: config.feed.days,
    };

    let app = create_router(state);

    info!("Serving tide calendars on http://{}", config.server.bind);
    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
