//! HTTP request handlers for the Matjip service.
//!
//! Every JSON response carries a `success` flag; failures add an `error`
//! message and a status code that matches the failure kind.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post},
    Router,
};
use matjip_domain::traits::PlaceStore;
use matjip_domain::{Category, Coordinate, NewPlace, Place, PlaceCandidate, PlaceId};
use matjip_extractor::{CaptionExtractionRequest, CaptionExtractor, ExtractorError};
use matjip_geocoder::{GeocodeError, GeocodeQuery, GeocodeResolver};
use matjip_llm::DynLlmProvider;
use matjip_store::{SqliteStore, StoreError};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Caption extractor
    pub extractor: Arc<CaptionExtractor<DynLlmProvider>>,
    /// Geocoding fallback chain
    pub resolver: Arc<GeocodeResolver>,
    /// Place storage
    pub store: Arc<Mutex<SqliteStore>>,
    /// Owner recorded on saved places
    pub default_user_id: Arc<str>,
}

impl AppState {
    fn store(&self) -> Result<MutexGuard<'_, SqliteStore>, ApiError> {
        self.store
            .lock()
            .map_err(|_| ApiError::Internal("place store lock poisoned".to_string()))
    }
}

/// Service banner
#[derive(Debug, Serialize, Deserialize)]
pub struct RootResponse {
    /// Greeting
    pub message: String,
    /// Always "running"
    pub status: String,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Overall health status
    pub status: String,
    /// Geocoding providers, in fallback order
    pub providers: Vec<String>,
    /// Model behind the extractor
    pub model: String,
}

/// Successful caption parse
#[derive(Debug, Serialize, Deserialize)]
pub struct ParseReelResponse {
    /// Always true
    pub success: bool,
    /// Extracted place
    pub data: PlaceCandidate,
}

/// Successful geocode
#[derive(Debug, Serialize, Deserialize)]
pub struct GeocodeResponse {
    /// Always true
    pub success: bool,
    /// Latitude
    pub lat: f64,
    /// Longitude
    pub lng: f64,
}

/// Save request
///
/// Optional text fields sent as empty strings are treated as absent.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SavePlaceRequest {
    /// Restaurant name
    #[serde(default)]
    pub name: String,
    /// Free-text address
    #[serde(default)]
    pub address: String,
    /// Category label
    #[serde(default)]
    pub category: Option<String>,
    /// Source account
    #[serde(default)]
    pub shared_from: Option<String>,
    /// User note
    #[serde(default)]
    pub memo: Option<String>,
    /// Link to the source post
    #[serde(default)]
    pub instagram_url: Option<String>,
    /// Latitude from a previous geocode
    #[serde(default)]
    pub latitude: Option<f64>,
    /// Longitude from a previous geocode
    #[serde(default)]
    pub longitude: Option<f64>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl SavePlaceRequest {
    /// Convert into an insertable place owned by `user_id`
    pub fn into_new_place(self, user_id: &str) -> Result<NewPlace, ApiError> {
        if self.name.trim().is_empty() || self.address.trim().is_empty() {
            return Err(ApiError::BadRequest(
                "name and address are required".to_string(),
            ));
        }

        let coordinate = match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some(Coordinate::new(lat, lng).map_err(ApiError::BadRequest)?),
            (None, None) => None,
            _ => {
                return Err(ApiError::BadRequest(
                    "latitude and longitude must be supplied together".to_string(),
                ))
            }
        };

        let category = non_empty(self.category).map(|label| {
            Category::parse(&label).unwrap_or_else(|| {
                warn!("Unknown category '{}', storing as {}", label, Category::default());
                Category::default()
            })
        });

        Ok(NewPlace {
            name: self.name,
            address: self.address,
            category,
            shared_from: non_empty(self.shared_from),
            memo: non_empty(self.memo),
            instagram_url: non_empty(self.instagram_url),
            coordinate,
            user_id: user_id.to_string(),
        })
    }
}

/// Successful save
#[derive(Debug, Serialize, Deserialize)]
pub struct SavePlaceResponse {
    /// Always true
    pub success: bool,
    /// Confirmation
    pub message: String,
    /// Stored record
    pub data: Place,
}

/// Place listing
#[derive(Debug, Serialize, Deserialize)]
pub struct PlacesResponse {
    /// Always true
    pub success: bool,
    /// Places, newest first
    pub data: Vec<Place>,
    /// Number of places
    pub count: usize,
}

/// Successful delete
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    /// Always true
    pub success: bool,
    /// Confirmation
    pub message: String,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always false
    pub success: bool,
    /// Error message
    pub error: String,
}

/// Application error type
#[derive(Debug)]
pub enum ApiError {
    /// Caller sent invalid input
    BadRequest(String),
    /// Requested resource does not exist
    NotFound(String),
    /// Model output could not be understood
    Unprocessable(String),
    /// Upstream dependency failed
    BadGateway(String),
    /// Internal server error
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Unprocessable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        if status.is_server_error() {
            error!("{}: {}", status, message);
        }

        let body = Json(ErrorResponse {
            success: false,
            error: message,
        });
        (status, body).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<ExtractorError> for ApiError {
    fn from(e: ExtractorError) -> Self {
        match e {
            ExtractorError::EmptyCaption | ExtractorError::CaptionTooLong(_, _) => {
                ApiError::BadRequest(e.to_string())
            }
            ExtractorError::Llm(_) => ApiError::BadGateway(e.to_string()),
            ExtractorError::UnparseableResponse(_) => ApiError::Unprocessable(e.to_string()),
        }
    }
}

impl From<GeocodeError> for ApiError {
    fn from(e: GeocodeError) -> Self {
        match e {
            GeocodeError::InvalidInput => ApiError::BadRequest("address is required".to_string()),
            GeocodeError::NotFound => ApiError::NotFound("address not found".to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(_) => ApiError::NotFound(e.to_string()),
            StoreError::InvalidData(msg) => ApiError::BadRequest(msg),
            StoreError::Database(_) => ApiError::Internal(e.to_string()),
        }
    }
}

/// GET / - Service banner
async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Matjip server is running".to_string(),
        status: "running".to_string(),
    })
}

/// GET /health - Health check
async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        providers: state
            .resolver
            .provider_names()
            .into_iter()
            .map(String::from)
            .collect(),
        model: state.extractor.model_name().to_string(),
    })
}

/// POST /api/parse-reel - Extract a place from a caption
async fn parse_reel(
    State(state): State<AppState>,
    payload: Result<Json<CaptionExtractionRequest>, JsonRejection>,
) -> Result<Json<ParseReelResponse>, ApiError> {
    let Json(request) = payload?;
    info!("Parsing caption ({} chars)", request.caption.chars().count());

    let candidate = state.extractor.extract_request(&request).await?;

    Ok(Json(ParseReelResponse {
        success: true,
        data: candidate,
    }))
}

/// POST /api/geocode - Resolve an address to coordinates
async fn geocode(
    State(state): State<AppState>,
    payload: Result<Json<GeocodeQuery>, JsonRejection>,
) -> Result<Json<GeocodeResponse>, ApiError> {
    let Json(query) = payload?;
    let coordinate = state.resolver.resolve_query(&query).await?;

    Ok(Json(GeocodeResponse {
        success: true,
        lat: coordinate.lat,
        lng: coordinate.lng,
    }))
}

/// POST /api/save-place - Persist a place
async fn save_place(
    State(state): State<AppState>,
    payload: Result<Json<SavePlaceRequest>, JsonRejection>,
) -> Result<Json<SavePlaceResponse>, ApiError> {
    let Json(request) = payload?;
    let new_place = request.into_new_place(&state.default_user_id)?;
    info!("Saving place: {} ({})", new_place.name, new_place.address);

    let place = state.store()?.insert(new_place)?;

    Ok(Json(SavePlaceResponse {
        success: true,
        message: "Place saved".to_string(),
        data: place,
    }))
}

/// GET /api/places - List places, newest first
async fn list_places(State(state): State<AppState>) -> Result<Json<PlacesResponse>, ApiError> {
    let places = state.store()?.list()?;

    Ok(Json(PlacesResponse {
        success: true,
        count: places.len(),
        data: places,
    }))
}

/// DELETE /api/places/:id - Delete a place
async fn delete_place(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let id = PlaceId::from_string(&id)
        .map_err(|e| ApiError::BadRequest(format!("invalid place id: {}", e)))?;

    state.store()?.delete(id)?;
    info!("Deleted place {}", id);

    Ok(Json(DeleteResponse {
        success: true,
        message: "Place deleted".to_string(),
    }))
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/api/parse-reel", post(parse_reel))
        .route("/api/geocode", post(geocode))
        .route("/api/save-place", post(save_place))
        .route("/api/places", get(list_places))
        .route("/api/places/:id", delete(delete_place))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use matjip_extractor::ExtractorConfig;
    use matjip_geocoder::{GeocodeCandidate, MockGeocodeProvider};
    use matjip_llm::MockProvider;
    use tower::ServiceExt; // for oneshot

    fn create_test_state() -> AppState {
        let llm: DynLlmProvider = Box::new(MockProvider::new(
            r#"{"name": "Test", "address": "Somewhere", "category": "cafe"}"#,
        ));
        let resolver = GeocodeResolver::new(vec![Box::new(MockGeocodeProvider::returning(
            "kakao",
            vec![GeocodeCandidate::new("37.5", "127.0")],
        ))]);

        AppState {
            extractor: Arc::new(CaptionExtractor::new(llm, ExtractorConfig::default())),
            resolver: Arc::new(resolver),
            store: Arc::new(Mutex::new(SqliteStore::new(":memory:").unwrap())),
            default_user_id: Arc::from("test-user"),
        }
    }

    #[tokio::test]
    async fn test_root() {
        let app = create_router(create_test_state());

        let request = Request::builder().uri("/").body(Body::empty()).unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let app = create_router(create_test_state());

        let request = Request::builder()
            .uri("/api/unknown")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_save_request_blank_optionals_become_none() {
        let request = SavePlaceRequest {
            name: "A".to_string(),
            address: "B".to_string(),
            category: Some(String::new()),
            shared_from: Some("  ".to_string()),
            memo: Some("good".to_string()),
            ..Default::default()
        };

        let place = request.into_new_place("u").unwrap();
        assert_eq!(place.category, None);
        assert_eq!(place.shared_from, None);
        assert_eq!(place.memo.as_deref(), Some("good"));
        assert_eq!(place.user_id, "u");
    }

    #[test]
    fn test_save_request_unknown_category_is_other() {
        let request = SavePlaceRequest {
            name: "A".to_string(),
            address: "B".to_string(),
            category: Some("Fusion".to_string()),
            ..Default::default()
        };

        let place = request.into_new_place("u").unwrap();
        assert_eq!(place.category, Some(Category::Other));
    }

    #[test]
    fn test_save_request_coordinates() {
        let half = SavePlaceRequest {
            name: "A".to_string(),
            address: "B".to_string(),
            latitude: Some(37.5),
            ..Default::default()
        };
        assert!(matches!(half.into_new_place("u"), Err(ApiError::BadRequest(_))));

        let out_of_range = SavePlaceRequest {
            name: "A".to_string(),
            address: "B".to_string(),
            latitude: Some(127.0),
            longitude: Some(37.5),
            ..Default::default()
        };
        assert!(matches!(
            out_of_range.into_new_place("u"),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn test_extractor_error_status_mapping() {
        let status = |e: ExtractorError| ApiError::from(e).into_response().status();

        assert_eq!(status(ExtractorError::EmptyCaption), StatusCode::BAD_REQUEST);
        assert_eq!(status(ExtractorError::CaptionTooLong(11, 10)), StatusCode::BAD_REQUEST);
        assert_eq!(status(ExtractorError::Llm("down".into())), StatusCode::BAD_GATEWAY);
        assert_eq!(
            status(ExtractorError::UnparseableResponse("no json".into())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
