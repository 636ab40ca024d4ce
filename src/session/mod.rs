//! Fetch orchestration for one map view
//!
//! [`MapSession`] is the context object a view owns for its lifetime. It
//! routes draw input through the state machine, resolves the search mode,
//! and runs two independent request lines: density + geometry keyed by the
//! search mode, and listing detail keyed by the selected point. A response
//! that arrives after its line moved on is discarded, never merged.

use crate::density::{build_density_collection, normalize_prices, PointProperties};
use crate::draw::{DrawCommand, DrawMode, DrawSession};
use crate::engine::{DensityPayload, ListingDetails, ListingSummary, ProspectSource};
use crate::error::Result;
use crate::geometry::assemble::build_geometry_collection;
use crate::geometry::{BoundingBox, FeatureCollection, GeoPoint, NoProperties, PolygonRings};
use crate::map::{spawn_camera, CameraCommand, FitOptions, MapView};
use crate::query::{DensityQuery, SearchDefaults, SearchKey, SearchMode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Proof that a request was issued on a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket<K> {
    generation: u64,
    key: K,
}

impl<K> Ticket<K> {
    pub fn key(&self) -> &K {
        &self.key
    }
}

/// A single-subscriber request line
///
/// Each `begin` supersedes every ticket issued before it.
#[derive(Debug, Clone)]
pub struct RequestLine<K> {
    generation: u64,
    active: Option<K>,
}

impl<K> Default for RequestLine<K> {
    fn default() -> Self {
        Self {
            generation: 0,
            active: None,
        }
    }
}

impl<K: Clone + PartialEq> RequestLine<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket for `key`, superseding any in-flight request
    pub fn begin(&mut self, key: K) -> Ticket<K> {
        self.generation += 1;
        self.active = Some(key.clone());
        Ticket {
            generation: self.generation,
            key,
        }
    }

    /// Whether `ticket` is the latest one and interest was not cancelled
    pub fn is_current(&self, ticket: &Ticket<K>) -> bool {
        ticket.generation == self.generation && self.active.as_ref() == Some(&ticket.key)
    }

    /// Drop interest in whatever is in flight
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.active = None;
    }

    /// Finish the current request so a repeat completion is stale
    fn settle(&mut self, ticket: &Ticket<K>) -> bool {
        if self.is_current(ticket) {
            self.active = None;
            true
        } else {
            false
        }
    }

    /// Key of the request in flight, if any
    pub fn pending(&self) -> Option<&K> {
        self.active.as_ref()
    }
}

/// A density fetch that has been issued but not completed
#[derive(Debug, Clone)]
pub struct DensityRequest {
    pub ticket: Ticket<SearchKey>,
    pub query: DensityQuery,
}

/// A listing fetch for the selected point
#[derive(Debug, Clone)]
pub struct DetailRequest {
    pub ticket: Ticket<String>,
    pub platform_hash: String,
}

/// Everything rendered from one density response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapSnapshot {
    pub id: Uuid,
    pub fetched_at: DateTime<Utc>,
    pub mode: SearchMode,
    pub total: u64,
    pub density: FeatureCollection<PointProperties>,
    pub geometry: FeatureCollection<NoProperties>,
    /// Extent to frame: the search area if any, otherwise the points
    pub bounds: Option<BoundingBox>,
}

impl MapSnapshot {
    /// Run the pipeline over one engine response
    pub fn build(mode: SearchMode, payload: DensityPayload) -> Self {
        let DensityPayload {
            mut data,
            geometry,
            total,
        } = payload;

        normalize_prices(&mut data);
        let density = build_density_collection(&data);
        let geometry = build_geometry_collection(&geometry);
        let bounds = geometry.bounds().or_else(|| density.bounds());

        Self {
            id: Uuid::new_v4(),
            fetched_at: Utc::now(),
            mode,
            total,
            density,
            geometry,
            bounds,
        }
    }

    /// Points that carry a price label
    pub fn priced_points(&self) -> usize {
        self.density
            .features
            .iter()
            .filter(|f| !f.properties.price.is_empty())
            .count()
    }
}

/// Listing detail state of the selected point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DetailState {
    /// The point has no identifier, so nothing is fetched
    Unavailable,
    Loading,
    Loaded { summary: ListingSummary },
    Failed { message: String },
}

/// The point whose popup is open
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub coordinates: GeoPoint,
    pub properties: PointProperties,
    pub detail: DetailState,
}

/// Per-view orchestration state
#[derive(Debug)]
pub struct MapSession<S: ProspectSource> {
    source: S,
    draw: DrawSession,
    defaults: SearchDefaults,
    filters: Vec<(String, String)>,
    fit: FitOptions,
    density_line: RequestLine<SearchKey>,
    detail_line: RequestLine<String>,
    snapshot: Option<MapSnapshot>,
    selection: Option<Selection>,
}

impl<S: ProspectSource> MapSession<S> {
    pub fn new(source: S, defaults: SearchDefaults, fit: FitOptions) -> Self {
        Self {
            source,
            draw: DrawSession::new(),
            defaults,
            filters: Vec::new(),
            fit,
            density_line: RequestLine::new(),
            detail_line: RequestLine::new(),
            snapshot: None,
            selection: None,
        }
    }

    /// Set passthrough filters for subsequent density requests
    pub fn with_filters(mut self, filters: Vec<(String, String)>) -> Self {
        self.filters = filters;
        self
    }

    /// Search inside `polygon` instead of the named address
    pub fn with_polygon(mut self, polygon: PolygonRings) -> Self {
        self.draw = DrawSession::with_polygon(polygon);
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn draw_mode(&self) -> DrawMode {
        self.draw.mode()
    }

    pub fn polygon(&self) -> Option<&PolygonRings> {
        self.draw.polygon()
    }

    /// The most recent successfully built snapshot
    pub fn snapshot(&self) -> Option<&MapSnapshot> {
        self.snapshot.as_ref()
    }

    /// Consume the session, keeping only its latest snapshot
    pub fn into_snapshot(self) -> Option<MapSnapshot> {
        self.snapshot
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Query for the current draw state
    pub fn current_query(&self) -> DensityQuery {
        DensityQuery::new(SearchMode::resolve(self.draw.polygon(), &self.defaults))
            .with_filters(self.filters.clone())
    }

    /// Apply draw input
    ///
    /// Returns a density request exactly when the polygon data changed.
    pub fn draw(&mut self, command: DrawCommand) -> Result<Option<DensityRequest>> {
        let event = self.draw.apply(command)?;
        Ok(event.map(|event| {
            debug!("Draw event {:?}, refetching", event);
            self.begin_density()
        }))
    }

    /// Issue a density request for the current search mode
    pub fn begin_density(&mut self) -> DensityRequest {
        let query = self.current_query();
        let ticket = self.density_line.begin(query.mode.key());
        DensityRequest { ticket, query }
    }

    /// Fetch a previously issued request
    ///
    /// Takes `&self` so a caller may start a newer request before this one
    /// resolves.
    pub async fn fetch_density(&self, request: &DensityRequest) -> Result<DensityPayload> {
        self.source.density(&request.query).await
    }

    /// Deliver the result of a density request
    ///
    /// Stale results are dropped and yield `Ok(None)`. A current success
    /// replaces the snapshot wholesale and yields the camera fit for it. A
    /// current failure leaves the previous snapshot in place.
    pub fn complete_density(
        &mut self,
        request: DensityRequest,
        result: Result<DensityPayload>,
    ) -> Result<Option<CameraCommand>> {
        if !self.density_line.settle(&request.ticket) {
            debug!("Discarding stale density result for {:?}", request.ticket.key());
            return Ok(None);
        }

        let payload = result.map_err(|e| {
            warn!("Density fetch failed: {}", e);
            e
        })?;

        let snapshot = MapSnapshot::build(request.query.mode, payload);
        info!(
            "Loaded {} points and {} areas (total {})",
            snapshot.density.len(),
            snapshot.geometry.len(),
            snapshot.total
        );

        let camera = snapshot.bounds.map(|b| CameraCommand::fit(b, &self.fit));
        self.snapshot = Some(snapshot);
        Ok(camera)
    }

    /// Issue, fetch and deliver a request in one step
    pub async fn run_density(&mut self, request: DensityRequest) -> Result<Option<CameraCommand>> {
        let result = self.fetch_density(&request).await;
        self.complete_density(request, result)
    }

    /// Fetch for the current search mode
    pub async fn refresh(&mut self) -> Result<Option<CameraCommand>> {
        let request = self.begin_density();
        self.run_density(request).await
    }

    /// Run a camera move on `view` after the configured fit delay
    ///
    /// The data pipeline never waits on the returned handle.
    pub fn spawn_camera_on<V: MapView + 'static>(
        &self,
        view: &Arc<V>,
        command: CameraCommand,
    ) -> JoinHandle<()> {
        spawn_camera(
            Arc::downgrade(view),
            command,
            Duration::from_millis(self.fit.delay_ms),
        )
    }

    /// Apply draw input and refetch if the polygon changed
    pub async fn apply_draw(&mut self, command: DrawCommand) -> Result<Option<CameraCommand>> {
        match self.draw(command)? {
            Some(request) => self.run_density(request).await,
            None => Ok(None),
        }
    }

    /// Open a point's popup
    ///
    /// Any previous selection's detail result becomes stale. A point with an
    /// empty id is shown with what the map already has.
    pub fn select_point(
        &mut self,
        properties: PointProperties,
        coordinates: GeoPoint,
    ) -> Option<DetailRequest> {
        self.detail_line.cancel();

        let request = if properties.id.is_empty() {
            None
        } else {
            let platform_hash = properties.id.clone();
            Some(DetailRequest {
                ticket: self.detail_line.begin(platform_hash.clone()),
                platform_hash,
            })
        };

        self.selection = Some(Selection {
            coordinates,
            properties,
            detail: if request.is_some() {
                DetailState::Loading
            } else {
                DetailState::Unavailable
            },
        });
        request
    }

    /// Close the popup and ignore any in-flight detail fetch
    pub fn deselect(&mut self) {
        self.detail_line.cancel();
        self.selection = None;
    }

    pub async fn fetch_detail(&self, request: &DetailRequest) -> Result<ListingDetails> {
        self.source.listing(&request.platform_hash).await
    }

    /// Deliver a detail result to the selection it was issued for
    ///
    /// Failures stay on the selection and never touch the snapshot.
    pub fn complete_detail(&mut self, request: DetailRequest, result: Result<ListingDetails>) {
        if !self.detail_line.settle(&request.ticket) {
            debug!("Discarding stale listing result for {}", request.platform_hash);
            return;
        }
        let Some(selection) = self.selection.as_mut() else {
            return;
        };

        selection.detail = match result {
            Ok(details) => DetailState::Loaded {
                summary: details.summary(&selection.properties.price),
            },
            Err(e) => {
                warn!("Listing fetch for {} failed: {}", request.platform_hash, e);
                DetailState::Failed {
                    message: e.to_string(),
                }
            }
        };
    }

    /// Select a point and load its detail in one step
    pub async fn open_point(&mut self, properties: PointProperties, coordinates: GeoPoint) {
        if let Some(request) = self.select_point(properties, coordinates) {
            let result = self.fetch_detail(&request).await;
            self.complete_detail(request, result);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::geometry::polyline;
    use crate::query::POLYGON_KEY;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use crate::map::recording::RecordingView;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct FakeSource {
        density_calls: AtomicUsize,
        queries: Mutex<Vec<DensityQuery>>,
        fail_listing: bool,
    }

    impl ProspectSource for Arc<FakeSource> {
        async fn density(&self, query: &DensityQuery) -> Result<DensityPayload> {
            self.density_calls.fetch_add(1, Ordering::SeqCst);
            self.queries.lock().unwrap().push(query.clone());
            Ok(payload_for(query))
        }

        async fn listing(&self, platform_hash: &str) -> Result<ListingDetails> {
            if self.fail_listing {
                return Err(Error::UpstreamStatus {
                    status: 404,
                    details: json!({"message": "gone"}),
                });
            }
            Ok(serde_json::from_value(json!({"title": format!("Listing {}", platform_hash)}))
                .unwrap())
        }
    }

    fn payload_for(query: &DensityQuery) -> DensityPayload {
        let geometry = if query.mode.is_polygon() {
            json!([])
        } else {
            let ring = polyline::encode(&[(39.0, -9.0), (39.0, -8.0), (40.0, -8.0), (39.0, -9.0)], 6);
            json!([{"type": "Polygon", "polyline": [ring]}])
        };
        DensityPayload::from_value(json!({
            "data": [[-8.5, 39.5, 42, 150000], [-8.6, 39.4, 43, 50], ["x", 39.5, 1, 500]],
            "geometry": geometry,
            "total": 3
        }))
        .unwrap()
    }

    fn defaults() -> SearchDefaults {
        SearchDefaults {
            address_names: "Entroncamento".to_string(),
            address_ids: vec!["7".to_string()],
            country: "pt".to_string(),
            ad_type: "sale".to_string(),
        }
    }

    fn session(source: &Arc<FakeSource>) -> MapSession<Arc<FakeSource>> {
        MapSession::new(source.clone(), defaults(), FitOptions::default())
    }

    fn triangle() -> Vec<DrawCommand> {
        [(-9.16, 38.74), (-9.12, 38.74), (-9.12, 38.76)]
            .into_iter()
            .map(|(lng, lat)| DrawCommand::AddVertex {
                point: GeoPoint::new(lng, lat),
            })
            .collect()
    }

    fn point(id: &str) -> PointProperties {
        PointProperties {
            id: id.to_string(),
            price: "150k".to_string(),
        }
    }

    #[test]
    fn test_request_line_supersedes() {
        let mut line = RequestLine::new();
        let first = line.begin(SearchKey::Default);
        let second = line.begin(SearchKey::Polygon("[]".to_string()));

        assert!(!line.is_current(&first));
        assert!(line.is_current(&second));
        assert_eq!(second.key(), &SearchKey::Polygon("[]".to_string()));

        line.cancel();
        assert!(!line.is_current(&second));
        assert!(line.pending().is_none());
    }

    #[test]
    fn test_same_key_reissued_supersedes() {
        let mut line = RequestLine::new();
        let first = line.begin(SearchKey::Default);
        let second = line.begin(SearchKey::Default);
        assert!(!line.is_current(&first));
        assert!(line.is_current(&second));
    }

    #[tokio::test]
    async fn test_refresh_builds_snapshot() {
        let source = Arc::new(FakeSource::default());
        let mut session = session(&source);

        let camera = session.refresh().await.unwrap();
        let snapshot = session.snapshot().unwrap();

        assert!(!snapshot.mode.is_polygon());
        assert_eq!(snapshot.total, 3);
        // the non-numeric sample is dropped
        assert_eq!(snapshot.density.len(), 2);
        assert_eq!(snapshot.density.features[1].properties.price, "");
        assert_eq!(snapshot.priced_points(), 1);
        assert_eq!(snapshot.geometry.len(), 1);

        // geometry wins over density for framing
        let bounds = snapshot.bounds.unwrap();
        assert_eq!(bounds.to_array(), [-9.0, 39.0, -8.0, 40.0]);
        assert_eq!(
            camera,
            Some(CameraCommand::FitBounds {
                bounds,
                padding: 50,
                duration_ms: 1000
            })
        );
    }

    #[tokio::test]
    async fn test_malformed_geometry_keeps_points_and_valid_areas() {
        let source = Arc::new(FakeSource::default());
        let mut session = session(&source);
        let ring = polyline::encode(&[(39.0, -9.0), (39.0, -8.0), (40.0, -8.0), (39.0, -9.0)], 6);

        let request = session.begin_density();
        let payload = DensityPayload::from_value(json!({
            "data": [[-8.5, 39.5, 42, 150000]],
            "geometry": [
                {"polyline": [ring.clone()]},
                null,
                {"type": "Polygon", "polyline": [null]},
                {"type": "Polygon", "polyline": [ring]}
            ],
            "total": 1
        }));
        session.complete_density(request, payload).unwrap();

        let snapshot = session.snapshot().unwrap();
        assert_eq!(snapshot.density.len(), 1);
        assert_eq!(snapshot.geometry.len(), 1);
    }

    #[tokio::test]
    async fn test_camera_runs_on_view_after_delay() {
        let source = Arc::new(FakeSource::default());
        let fit = FitOptions {
            delay_ms: 5,
            ..FitOptions::default()
        };
        let mut session = MapSession::new(source.clone(), defaults(), fit);
        let view = Arc::new(RecordingView::default());

        let camera = session.refresh().await.unwrap().unwrap();
        session.spawn_camera_on(&view, camera).await.unwrap();

        let fits = view.fits.lock().unwrap();
        assert_eq!(fits.len(), 1);
        assert_eq!(fits[0].0.to_array(), [-9.0, 39.0, -8.0, 40.0]);
    }

    #[tokio::test]
    async fn test_fit_falls_back_to_density_bounds() {
        let source = Arc::new(FakeSource::default());
        let mut session = session(&source);

        for command in std::iter::once(DrawCommand::Start).chain(triangle()) {
            session.apply_draw(command).await.unwrap();
        }
        let camera = session.apply_draw(DrawCommand::Finish).await.unwrap();

        let snapshot = session.snapshot().unwrap();
        assert!(snapshot.geometry.is_empty());
        let bounds = snapshot.bounds.unwrap();
        assert_eq!(bounds.to_array(), [-8.6, 39.4, -8.5, 39.5]);
        assert!(camera.is_some());
    }

    #[tokio::test]
    async fn test_draw_cycle_refetches_twice() {
        let source = Arc::new(FakeSource::default());
        let mut session = session(&source);

        session.apply_draw(DrawCommand::Start).await.unwrap();
        for command in triangle() {
            session.apply_draw(command).await.unwrap();
        }
        session.apply_draw(DrawCommand::Finish).await.unwrap();
        assert_eq!(session.draw_mode(), DrawMode::Complete);
        session.apply_draw(DrawCommand::Clear).await.unwrap();
        assert_eq!(session.draw_mode(), DrawMode::Idle);

        assert_eq!(source.density_calls.load(Ordering::SeqCst), 2);
        let queries = source.queries.lock().unwrap();
        assert!(queries[0].mode.is_polygon());
        assert!(!queries[1].mode.is_polygon());
    }

    #[tokio::test]
    async fn test_start_and_cancel_do_not_refetch() {
        let source = Arc::new(FakeSource::default());
        let mut session = session(&source);

        assert!(session.draw(DrawCommand::Start).unwrap().is_none());
        assert!(session.draw(DrawCommand::Cancel).unwrap().is_none());
        assert_eq!(session.draw_mode(), DrawMode::Idle);
        assert_eq!(source.density_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_invalid_draw_command_issues_nothing() {
        let source = Arc::new(FakeSource::default());
        let mut session = session(&source);

        assert!(session.draw(DrawCommand::Clear).is_err());
        assert!(session.density_line.pending().is_none());
    }

    #[tokio::test]
    async fn test_stale_density_result_is_discarded() {
        let source = Arc::new(FakeSource::default());
        let mut session = session(&source);

        let old = session.begin_density();
        let old_result = session.fetch_density(&old).await;

        session.draw(DrawCommand::Start).unwrap();
        for command in triangle() {
            session.draw(command).unwrap();
        }
        let new = session.draw(DrawCommand::Finish).unwrap().unwrap();
        let new_result = session.fetch_density(&new).await;

        // the newer response lands first
        assert!(session.complete_density(new, new_result).unwrap().is_some());
        let current_id = session.snapshot().unwrap().id;

        assert!(session.complete_density(old, old_result).unwrap().is_none());
        let snapshot = session.snapshot().unwrap();
        assert_eq!(snapshot.id, current_id);
        assert!(snapshot.mode.is_polygon());
    }

    #[tokio::test]
    async fn test_failed_density_keeps_previous_snapshot() {
        let source = Arc::new(FakeSource::default());
        let mut session = session(&source);
        session.refresh().await.unwrap();
        let before = session.snapshot().unwrap().id;

        let request = session.begin_density();
        let err = session
            .complete_density(request, Err(Error::UpstreamConnect("refused".to_string())))
            .unwrap_err();

        assert!(matches!(err, Error::UpstreamConnect(_)));
        assert_eq!(session.snapshot().unwrap().id, before);
    }

    #[test]
    fn test_polygon_query_carries_rings() {
        let source = Arc::new(FakeSource::default());
        let mut session = session(&source).with_filters(vec![("asset_type".to_string(), "flat".to_string())]);

        session.draw(DrawCommand::Start).unwrap();
        for command in triangle() {
            session.draw(command).unwrap();
        }
        let request = session.draw(DrawCommand::Finish).unwrap().unwrap();

        let pairs = request.query.to_pairs();
        assert!(pairs.iter().any(|(k, _)| k == POLYGON_KEY));
        assert!(pairs.iter().any(|(k, v)| k == "asset_type" && v == "flat"));
        assert!(matches!(request.ticket.key(), SearchKey::Polygon(_)));
    }

    #[tokio::test]
    async fn test_preset_polygon_searches_inside_it() {
        let source = Arc::new(FakeSource::default());
        let rings = vec![vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(1.0, 0.0),
            GeoPoint::new(1.0, 1.0),
            GeoPoint::new(0.0, 0.0),
        ]];
        let mut session = session(&source).with_polygon(rings);

        session.refresh().await.unwrap();
        assert_eq!(session.draw_mode(), DrawMode::Complete);
        assert!(session.snapshot().unwrap().mode.is_polygon());
    }

    #[tokio::test]
    async fn test_open_point_loads_summary() {
        let source = Arc::new(FakeSource::default());
        let mut session = session(&source);

        session.open_point(point("abc"), GeoPoint::new(-8.5, 39.5)).await;

        let selection = session.selection().unwrap();
        match &selection.detail {
            DetailState::Loaded { summary } => {
                assert_eq!(summary.title, "Listing abc");
                assert_eq!(summary.price, "150k");
            }
            other => panic!("expected loaded detail, got {:?}", other),
        }
    }

    #[test]
    fn test_point_without_id_is_not_fetched() {
        let source = Arc::new(FakeSource::default());
        let mut session = session(&source);

        assert!(session.select_point(point(""), GeoPoint::new(0.0, 0.0)).is_none());
        assert_eq!(session.selection().unwrap().detail, DetailState::Unavailable);
    }

    #[tokio::test]
    async fn test_reselect_discards_previous_detail() {
        let source = Arc::new(FakeSource::default());
        let mut session = session(&source);

        let first = session.select_point(point("a"), GeoPoint::new(0.0, 0.0)).unwrap();
        let second = session.select_point(point("b"), GeoPoint::new(1.0, 1.0)).unwrap();

        let late = session.fetch_detail(&first).await;
        session.complete_detail(first, late);
        assert_eq!(session.selection().unwrap().detail, DetailState::Loading);

        let result = session.fetch_detail(&second).await;
        session.complete_detail(second, result);
        assert!(matches!(
            session.selection().unwrap().detail,
            DetailState::Loaded { .. }
        ));
    }

    #[tokio::test]
    async fn test_deselect_ignores_late_detail() {
        let source = Arc::new(FakeSource::default());
        let mut session = session(&source);

        let request = session.select_point(point("a"), GeoPoint::new(0.0, 0.0)).unwrap();
        session.deselect();
        let result = session.fetch_detail(&request).await;
        session.complete_detail(request, result);

        assert!(session.selection().is_none());
    }

    #[tokio::test]
    async fn test_detail_failure_stays_local() {
        let source = Arc::new(FakeSource {
            fail_listing: true,
            ..Default::default()
        });
        let mut session = session(&source);
        session.refresh().await.unwrap();
        let snapshot_id = session.snapshot().unwrap().id;

        session.open_point(point("a"), GeoPoint::new(0.0, 0.0)).await;

        assert!(matches!(
            session.selection().unwrap().detail,
            DetailState::Failed { .. }
        ));
        assert_eq!(session.snapshot().unwrap().id, snapshot_id);
    }

    #[test]
    fn test_snapshot_json_shape() {
        let mode = SearchMode::resolve(None, &defaults());
        let snapshot = MapSnapshot::build(mode, DensityPayload::default());
        let value = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(value["mode"]["mode"], "named_address");
        assert_eq!(value["density"]["type"], "FeatureCollection");
        assert_eq!(value["bounds"], serde_json::Value::Null);
        assert!(value["id"].is_string());
    }
}
