//! HTTP surface
//!
//! Exposes `GET /weather?city=<name>` on top of [`WeatherService`].

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::lookup::{LookupError, WeatherLookup, WeatherService};

/// Message returned when the `city` parameter is absent or empty
pub const MISSING_CITY_MESSAGE: &str = "Please provide a city name, e.g. /weather?city=Seoul";

/// Message returned when the upstream lookup fails
pub const UPSTREAM_FAILURE_MESSAGE: &str = "Failed to fetch weather data";

/// Shared state handed to every request
#[derive(Debug, Clone)]
pub struct AppState {
    pub weather: WeatherService,
}

/// Query string of `GET /weather`
#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    pub city: Option<String>,
}

/// JSON body for 4xx/5xx responses
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for LookupError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            LookupError::MissingCity => (StatusCode::BAD_REQUEST, MISSING_CITY_MESSAGE),
            // Detail was already logged by the lookup; the caller gets a generic message
            LookupError::Upstream(_) => (StatusCode::INTERNAL_SERVER_ERROR, UPSTREAM_FAILURE_MESSAGE),
        };

        let body = ErrorBody {
            error: message.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/weather", get(weather_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn weather_handler(
    State(state): State<AppState>,
    query: Result<Query<WeatherQuery>, QueryRejection>,
) -> Result<Json<WeatherLookup>, LookupError> {
    let city = match query {
        Ok(Query(query)) => query.city,
        Err(rejection) => {
            debug!("rejecting malformed query string: {}", rejection);
            None
        }
    };

    let lookup = state.weather.lookup(city.as_deref()).await?;
    Ok(Json(lookup))
}
