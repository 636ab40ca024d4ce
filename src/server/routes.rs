//! HTTP API routes
//!
//! Two proxies the browser map calls directly, a server-side rendition of
//! the whole density pipeline, and a status probe.

use crate::constants::engine::DENSITY_PATH;
use crate::engine::client::listing_path;
use crate::error::Error;
use crate::map::InitialView;
use crate::query::{parse_rings, POLYGON_KEY};
use crate::server::state::AppState;
use crate::session::{MapSession, MapSnapshot};

use axum::{
    extract::{Query, RawQuery, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tracing::{error, info};

/// Query parameter naming the listing to fetch
const PLATFORM_HASH_PARAM: &str = "platform_hash";

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/prospect/density", get(density_proxy_handler))
        .route("/api/metasearch-property", get(listing_proxy_handler))
        .route("/api/map/density", get(map_density_handler))
        .route("/api/status", get(status_handler))
        .fallback_service(ServeDir::new(static_dir()).append_index_html_on_directories(true))
        .with_state(state)
}

/// Locate the frontend: `./static`, else next to the executable
fn static_dir() -> String {
    if std::path::Path::new("static").exists() {
        return "static".to_string();
    }
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("static")))
        .filter(|path| path.exists())
        .map(|path| path.to_string_lossy().to_string())
        .unwrap_or_else(|| "static".to_string())
}

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    /// Upstream error body, when the engine answered with one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ApiError {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }
}

type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

/// User-facing messages for one upstream service
struct Upstream {
    name: &'static str,
    connect: &'static str,
    status: &'static str,
    parse: &'static str,
}

const DENSITY_UPSTREAM: Upstream = Upstream {
    name: "density",
    connect: "Failed to connect to density search service.",
    status: "Failed to fetch density data.",
    parse: "Invalid response from density search service.",
};

const LISTING_UPSTREAM: Upstream = Upstream {
    name: "listing",
    connect: "Failed to connect to listings service.",
    status: "Failed to fetch listing.",
    parse: "Invalid response from listings service.",
};

/// Map an engine failure onto its response
///
/// Network and parse failures become 502, upstream statuses pass through
/// with the upstream body as `details`, missing configuration is a 500.
fn upstream_error(err: Error, upstream: &Upstream) -> (StatusCode, Json<ApiError>) {
    let (status, body) = match err {
        Error::MissingConfig(message) => {
            error!("Engine is not configured: {}", message);
            (StatusCode::INTERNAL_SERVER_ERROR, ApiError::new(message))
        }
        Error::UpstreamConnect(e) => {
            error!("Network error in {} route: {}", upstream.name, e);
            (StatusCode::BAD_GATEWAY, ApiError::new(upstream.connect))
        }
        Error::UpstreamStatus { status, details } => {
            error!("Upstream error in {} route: {} {}", upstream.name, status, details);
            (
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                ApiError {
                    error: upstream.status.to_string(),
                    details: Some(details),
                },
            )
        }
        Error::UpstreamParse(e) | Error::InvalidPayload(e) => {
            error!("Unparseable response in {} route: {}", upstream.name, e);
            (StatusCode::BAD_GATEWAY, ApiError::new(upstream.parse))
        }
        Error::InvalidPolygon(message) => (StatusCode::BAD_REQUEST, ApiError::new(message)),
        other => {
            error!("Unexpected error in {} route: {}", upstream.name, other);
            (StatusCode::INTERNAL_SERVER_ERROR, ApiError::new(other.to_string()))
        }
    };
    (status, Json(body))
}

/// Density proxy
///
/// GET /api/prospect/density
///
/// The query string is forwarded to the engine untouched.
async fn density_proxy_handler(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> ApiResult<Json<Value>> {
    info!("Density proxy called with query: {}", query.as_deref().unwrap_or(""));

    let engine = state
        .engine()
        .map_err(|e| upstream_error(e, &DENSITY_UPSTREAM))?;

    engine
        .get_raw(DENSITY_PATH, query.as_deref())
        .await
        .map(Json)
        .map_err(|e| upstream_error(e, &DENSITY_UPSTREAM))
}

/// Listing detail proxy
///
/// GET /api/metasearch-property?platform_hash=<id>
async fn listing_proxy_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> ApiResult<Json<Value>> {
    let hashes: Vec<&str> = params
        .iter()
        .filter(|(key, _)| key == PLATFORM_HASH_PARAM)
        .map(|(_, value)| value.as_str())
        .collect();

    // Exactly one non-empty value; a repeated parameter is not a single id
    let platform_hash = match hashes.as_slice() {
        [hash] if !hash.is_empty() => *hash,
        _ => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ApiError::new("platform_hash is required")),
            ))
        }
    };

    let engine = state
        .engine()
        .map_err(|e| upstream_error(e, &LISTING_UPSTREAM))?;

    engine
        .get_raw(&listing_path(platform_hash), None)
        .await
        .map(Json)
        .map_err(|e| upstream_error(e, &LISTING_UPSTREAM))
}

/// Server-side density pipeline
///
/// GET /api/map/density
///
/// An optional `polygon` parameter (JSON ring sequence) selects the drawn
/// polygon mode; every other parameter is a passthrough filter.
async fn map_density_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> ApiResult<Json<MapSnapshot>> {
    let (polygon, filters): (Vec<_>, Vec<_>) =
        params.into_iter().partition(|(key, _)| key == POLYGON_KEY);

    let polygon = match polygon.first() {
        Some((_, raw)) => {
            Some(parse_rings(raw).map_err(|e| upstream_error(e, &DENSITY_UPSTREAM))?)
        }
        None => None,
    };

    let engine = state
        .engine()
        .map_err(|e| upstream_error(e, &DENSITY_UPSTREAM))?;

    let mut session = MapSession::new(engine, state.config.search.clone(), state.fit_options())
        .with_filters(filters);
    if let Some(rings) = polygon {
        session = session.with_polygon(rings);
    }

    // no view to move server-side, the snapshot carries the bounds
    let _camera = session
        .refresh()
        .await
        .map_err(|e| upstream_error(e, &DENSITY_UPSTREAM))?;

    session.into_snapshot().map(Json).ok_or_else(|| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiError::new("No snapshot was produced")),
        )
    })
}

/// Server status response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub running: bool,
    pub version: String,
    /// Both engine endpoint and key are set
    pub engine_configured: bool,
    /// Opening camera for the frontend
    pub map: InitialView,
    pub uptime_secs: u64,
}

/// Server status endpoint
///
/// GET /api/status
async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        running: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        engine_configured: state.config.engine.is_complete(),
        map: state.initial_view(),
        uptime_secs: state.uptime_secs(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::constants::engine::API_KEY_HEADER;
    use crate::geometry::polyline;
    use axum::body::Body;
    use axum::extract::Path;
    use axum::http::{HeaderMap, Request};
    use axum::response::IntoResponse;
    use http_body_util::BodyExt;
    use serde_json::json;
    use std::sync::Mutex;
    use tower::ServiceExt;

    /// Query strings the fake engine has received
    type Seen = Arc<Mutex<Vec<String>>>;

    async fn fake_density(
        State(seen): State<Seen>,
        headers: HeaderMap,
        RawQuery(query): RawQuery,
    ) -> axum::response::Response {
        let query = query.unwrap_or_default();
        seen.lock().unwrap().push(query.clone());

        if headers.get(API_KEY_HEADER).map(|v| v.as_bytes()) != Some(b"test-key".as_slice()) {
            return (StatusCode::FORBIDDEN, Json(json!({"message": "forbidden"}))).into_response();
        }
        if query.contains("country=broken") {
            return (StatusCode::OK, "not json").into_response();
        }
        if query.contains("country=zz") {
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({"detail": "bad country"})))
                .into_response();
        }

        let ring = polyline::encode(&[(39.0, -9.0), (39.0, -8.0), (40.0, -8.0), (39.0, -9.0)], 6);
        Json(json!({
            "data": [[-8.5, 39.5, "h1", 250000], [-8.6, 39.4, "h2", 20]],
            "geometry": [{"type": "Polygon", "polyline": [ring]}],
            "total": 2
        }))
        .into_response()
    }

    async fn fake_listing(Path(id): Path<String>) -> axum::response::Response {
        if id == "missing" {
            return (StatusCode::NOT_FOUND, "nope").into_response();
        }
        Json(json!({"title": "Flat", "id": id})).into_response()
    }

    async fn spawn_engine() -> (String, Seen) {
        let seen: Seen = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new()
            .route("/prospect/density", get(fake_density))
            .route("/prospect/listing/:id", get(fake_listing))
            .with_state(seen.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}", addr), seen)
    }

    fn state_for(endpoint: Option<String>) -> Arc<AppState> {
        let mut config = Config::default();
        config.engine.endpoint = endpoint;
        config.engine.api_key = Some("test-key".to_string());
        config.engine.timeout_secs = 5;
        config.search.address_ids = vec!["31".to_string(), "32".to_string()];
        Arc::new(AppState::new(config).unwrap())
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_status_endpoint() {
        let app = create_router(state_for(None));

        let (status, body) = get_json(app, "/api/status").await;
        assert_eq!(status, StatusCode::OK);

        let status: StatusResponse = serde_json::from_value(body).unwrap();
        assert!(status.running);
        assert!(!status.engine_configured);
    }

    #[tokio::test]
    async fn test_status_reports_initial_view() {
        let mut config = Config::default();
        config.map.center_lng = -9.14;
        config.map.center_lat = 38.72;
        config.map.zoom = 11.0;
        let app = create_router(Arc::new(AppState::new(config).unwrap()));

        let (_, body) = get_json(app, "/api/status").await;
        assert_eq!(body["map"]["center"], json!([-9.14, 38.72]));
        assert_eq!(body["map"]["zoom"], json!(11.0));
    }

    #[tokio::test]
    async fn test_density_proxy_forwards_query_verbatim() {
        let (endpoint, seen) = spawn_engine().await;
        let app = create_router(state_for(Some(endpoint)));

        let uri = "/api/prospect/density?address_names=Entroncamento&addresses=31%2C32&country=pt&ad_type=sale&price=100000";
        let (status, body) = get_json(app, uri).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 2);
        assert_eq!(
            seen.lock().unwrap().as_slice(),
            &["address_names=Entroncamento&addresses=31%2C32&country=pt&ad_type=sale&price=100000"]
        );
    }

    #[tokio::test]
    async fn test_density_proxy_passes_upstream_status() {
        let (endpoint, _) = spawn_engine().await;
        let app = create_router(state_for(Some(endpoint)));

        let (status, body) = get_json(app, "/api/prospect/density?country=zz").await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body,
            json!({"error": "Failed to fetch density data.", "details": {"detail": "bad country"}})
        );
    }

    #[tokio::test]
    async fn test_density_proxy_unparseable_body() {
        let (endpoint, _) = spawn_engine().await;
        let app = create_router(state_for(Some(endpoint)));

        let (status, body) = get_json(app, "/api/prospect/density?country=broken").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "Invalid response from density search service.");
    }

    #[tokio::test]
    async fn test_density_proxy_network_failure() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let app = create_router(state_for(Some(format!("http://{}", addr))));

        let (status, body) = get_json(app, "/api/prospect/density?country=pt").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body, json!({"error": "Failed to connect to density search service."}));
    }

    #[tokio::test]
    async fn test_missing_endpoint_is_fatal() {
        let app = create_router(state_for(None));

        let (status, body) = get_json(app, "/api/prospect/density?country=pt").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "ENGINE_ENDPOINT is not set");
    }

    #[tokio::test]
    async fn test_listing_requires_platform_hash() {
        let app = create_router(state_for(Some("http://127.0.0.1:9".to_string())));

        for uri in [
            "/api/metasearch-property",
            "/api/metasearch-property?platform_hash=",
            "/api/metasearch-property?platform_hash=a&platform_hash=b",
        ] {
            let (status, body) = get_json(app.clone(), uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
            assert_eq!(body, json!({"error": "platform_hash is required"}));
        }
    }

    #[tokio::test]
    async fn test_listing_proxy() {
        let (endpoint, _) = spawn_engine().await;
        let app = create_router(state_for(Some(endpoint)));

        let (status, body) = get_json(app.clone(), "/api/metasearch-property?platform_hash=abc").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"title": "Flat", "id": "abc"}));

        let (status, body) =
            get_json(app, "/api/metasearch-property?platform_hash=missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body,
            json!({"error": "Failed to fetch listing.", "details": {"message": "Unknown error"}})
        );
    }

    #[tokio::test]
    async fn test_map_density_default_mode() {
        let (endpoint, seen) = spawn_engine().await;
        let app = create_router(state_for(Some(endpoint)));

        let (status, body) = get_json(app, "/api/map/density?asset_type=flat").await;
        assert_eq!(status, StatusCode::OK);

        let snapshot: MapSnapshot = serde_json::from_value(body).unwrap();
        assert!(!snapshot.mode.is_polygon());
        assert_eq!(snapshot.density.len(), 2);
        assert_eq!(snapshot.density.features[0].properties.price, "250k");
        assert_eq!(snapshot.density.features[1].properties.price, "");
        assert_eq!(snapshot.geometry.len(), 1);

        let seen = seen.lock().unwrap();
        assert!(seen[0].contains("address_names=Entroncamento"));
        assert!(seen[0].contains("addresses=31%2C32"));
        assert!(seen[0].contains("asset_type=flat"));
        assert!(!seen[0].contains("polygon="));
    }

    #[tokio::test]
    async fn test_map_density_polygon_mode() {
        let (endpoint, seen) = spawn_engine().await;
        let app = create_router(state_for(Some(endpoint)));

        let polygon = "[[[-9.16,38.74],[-9.12,38.74],[-9.12,38.76],[-9.16,38.74]]]";
        let uri = format!("/api/map/density?polygon={}", urlencoding::encode(polygon));
        let (status, body) = get_json(app, &uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["mode"]["mode"], "drawn_polygon");

        let seen = seen.lock().unwrap();
        assert!(seen[0].contains("polygon="));
        assert!(!seen[0].contains("address_names="));
        assert!(!seen[0].contains("addresses="));
    }

    #[tokio::test]
    async fn test_map_density_rejects_bad_polygon() {
        let app = create_router(state_for(Some("http://127.0.0.1:9".to_string())));

        let (status, body) = get_json(app, "/api/map/density?polygon=%5B%5D").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("ring"));
    }
}
