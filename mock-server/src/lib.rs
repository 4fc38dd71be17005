//! In-memory stand-in for the buoy AJAX backend.
//!
//! Speaks the same wire contract as the real backend: successful AJAX calls
//! answer with a `{Result, ResultString, ResultObject}` envelope, parameter
//! validation failures with 409 and `{"errors": [...]}`, everything else with
//! 500 and `{"error": "..."}`.

pub mod localize;

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{rejection::FormRejection, OriginalUri, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use log::{error, info};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

pub const DEFAULT_USER_ID: &str = "Unknown";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BuoyCondition {
    #[serde(rename = "wind_speed_milehour")]
    pub wind_speed: f64,
    #[serde(rename = "wind_direction_degnorth")]
    pub wind_direction: i32,
    #[serde(rename = "gust_wind_speed_milehour")]
    pub wind_gust: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BuoyLocation {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: Vec<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BuoyStation {
    pub station_id: String,
    pub name: String,
    pub location_desc: String,
    pub condition: BuoyCondition,
    pub location: BuoyLocation,
}

/// Payload of the `/testajax` envelope.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TestAjax {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Test")]
    pub test: String,
}

impl Default for TestAjax {
    fn default() -> Self {
        Self {
            name: "Buoy".to_string(),
            test: "Ajax".to_string(),
        }
    }
}

#[derive(Serialize)]
pub struct AjaxResponse<T> {
    #[serde(rename = "Result")]
    pub result: i32,
    #[serde(rename = "ResultString")]
    pub result_string: String,
    #[serde(rename = "ResultObject")]
    pub result_object: T,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Serialize)]
struct ValidationBody {
    errors: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct AppState {
    pub stations: Arc<HashMap<String, BuoyStation>>,
    pub test_ajax: TestAjax,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_stations(seed_stations())
    }
}

impl AppState {
    pub fn with_stations(stations: Vec<BuoyStation>) -> Self {
        Self {
            stations: Arc::new(stations.into_iter().map(|s| (s.station_id.clone(), s)).collect()),
            test_ajax: TestAjax::default(),
        }
    }

    fn find_station(&self, station_id: &str) -> Result<BuoyStation, ApiFailure> {
        self.stations
            .get(station_id)
            .cloned()
            .ok_or_else(|| ApiFailure::Error("not found".to_string()))
    }
}

/// A response that ends an AJAX call without a result.
#[derive(Debug)]
pub enum ApiFailure {
    Validation(Vec<String>),
    Error(String),
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        match self {
            ApiFailure::Validation(errors) => (StatusCode::CONFLICT, Json(ValidationBody { errors })).into_response(),
            ApiFailure::Error(error) => {
                (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorBody { error })).into_response()
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct StationParams {
    #[serde(rename = "stationId", default)]
    pub station_id: String,
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UserParams {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

fn user_id(raw: Option<&str>) -> &str {
    raw.filter(|id| !id.is_empty()).unwrap_or(DEFAULT_USER_ID)
}

/// Station ids are required and at least four characters long.
pub fn validate_station_id(station_id: &str) -> Result<(), ApiFailure> {
    if station_id.trim().is_empty() || station_id.chars().count() < 4 {
        return Err(ApiFailure::Validation(vec![localize::t("invalid_station_id").to_string()]));
    }
    Ok(())
}

pub fn app() -> Router {
    app_with_state(AppState::default())
}

pub fn app_with_state(state: AppState) -> Router {
    Router::new()
        .route("/buoy/retrievestation", post(retrieve_station))
        .route("/buoy/station/{station_id}", get(retrieve_station_json).post(retrieve_station_json))
        .route("/testajax", post(test_ajax))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with_state(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_state(state)).await
}

async fn retrieve_station(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    form: Result<Form<StationParams>, FormRejection>,
) -> Result<Json<AjaxResponse<String>>, ApiFailure> {
    let Form(params) = form.map_err(|rejection| form_failure(uri.path(), &rejection))?;
    let user = user_id(params.user_id.as_deref());
    info!("{user} {} stationId[{}]", uri.path(), params.station_id);

    validate_station_id(&params.station_id)?;
    let station = state.find_station(&params.station_id).inspect_err(|_| {
        error!("{user} {}: station {} not found", uri.path(), params.station_id);
    })?;

    Ok(Json(AjaxResponse {
        result: 0,
        result_string: "SUCCESS".to_string(),
        result_object: render_station(&station),
    }))
}

async fn retrieve_station_json(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(station_id): Path<String>,
    Query(query): Query<UserParams>,
) -> Result<Json<BuoyStation>, ApiFailure> {
    let user = user_id(query.user_id.as_deref());
    info!("{user} {}", uri.path());

    validate_station_id(&station_id)?;
    let station = state.find_station(&station_id).inspect_err(|_| {
        error!("{user} {}: station {station_id} not found", uri.path());
    })?;
    Ok(Json(station))
}

async fn test_ajax(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    form: Result<Form<UserParams>, FormRejection>,
) -> Result<Json<AjaxResponse<TestAjax>>, ApiFailure> {
    let Form(params) = form.map_err(|rejection| form_failure(uri.path(), &rejection))?;
    info!("{} {}", user_id(params.user_id.as_deref()), uri.path());
    Ok(Json(AjaxResponse {
        result: 0,
        result_string: "SUCCESS".to_string(),
        result_object: state.test_ajax.clone(),
    }))
}

/// The rejection detail stays in the log; the caller sees the generic message.
fn form_failure(path: &str, rejection: &FormRejection) -> ApiFailure {
    error!("{path}: parse form failed: {rejection}");
    ApiFailure::Error(localize::t("application_error").to_string())
}

/// Station detail fragment, as injected into the station modal.
pub fn render_station(station: &BuoyStation) -> String {
    format!(
        "<div class=\"station-detail\" data-station-id=\"{}\">\
         <h4>{}</h4>\
         <p>{}</p>\
         <dl>\
         <dt>Wind Speed</dt><dd>{:.2} mph</dd>\
         <dt>Wind Direction</dt><dd>{}&deg;</dd>\
         <dt>Wind Gust</dt><dd>{:.2} mph</dd>\
         </dl>\
         </div>",
        escape_html(&station.station_id),
        escape_html(&station.name),
        escape_html(&station.location_desc),
        station.condition.wind_speed,
        station.condition.wind_direction,
        station.condition.wind_gust,
    )
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn station(id: &str, name: &str, desc: &str, [lon, lat]: [f64; 2], (speed, direction, gust): (f64, i32, f64)) -> BuoyStation {
    BuoyStation {
        station_id: id.to_string(),
        name: name.to_string(),
        location_desc: desc.to_string(),
        condition: BuoyCondition {
            wind_speed: speed,
            wind_direction: direction,
            wind_gust: gust,
        },
        location: BuoyLocation {
            kind: "Point".to_string(),
            coordinates: vec![lon, lat],
        },
    }
}

pub fn seed_stations() -> Vec<BuoyStation> {
    vec![
        station("42001", "MID GULF", "180 nm South of Southwest Pass, LA", [-89.658, 25.888], (12.3, 120, 15.7)),
        station("42002", "WEST GULF", "207 NM East of Brownsville, TX", [-93.666, 26.091], (17.9, 140, 21.3)),
        station("42003", "EAST GULF", "208 NM West of Naples, FL", [-85.612, 26.007], (9.8, 90, 11.2)),
        station("42036", "WEST TAMPA", "112 NM WNW of Tampa, FL", [-84.517, 28.5], (6.7, 60, 8.9)),
        station("46050", "STONEWALL BANK", "20NM West of Newport, OR", [-124.546, 44.656], (14.5, 330, 18.4)),
    ]
}
