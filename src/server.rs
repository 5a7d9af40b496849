use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
    routing::{get, post},
    Json, Router,
};
use chrono::Local;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::sync::{broadcast, RwLock};
use tokio_stream::{wrappers::BroadcastStream, StreamExt};
use tower_http::services::{ServeDir, ServeFile};
use tracing::{info, warn};

use crate::api::{
    assistant_warnings, ChatRequest, ChatResponse, FilterQuery, ForecastResponse,
    ItineraryRequest, ItineraryResponse, LocationsResponse, SelectionRequest,
};
use skywatch::assistant::{Assistant, TextCompletionService};
use skywatch::config::SkywatchConfig;
use skywatch::feed::{FeedTimer, FeedUpdate, SystemClock};
use skywatch::forecast::generate_forecast;
use skywatch::map::{EmbedMapWidget, GeoPoint, MapMarker, MapView, MapWidget};
use skywatch::scoring::{Recommendation, RecommendationScorer};
use skywatch::shell::{comparison, selected_detail, ComparisonBar, DashboardView, SelectedDetail};
use skywatch::{LocationMetric, SharedDashboard};

#[derive(Clone)]
struct AppState {
    dashboard: SharedDashboard,
    scorer: RecommendationScorer,
    region: String,
    top_picks: usize,
    map: Arc<dyn MapWidget>,
    map_center: GeoPoint,
    map_marker_title: String,
    assistant: Arc<Assistant<Arc<dyn TextCompletionService>>>,
    ai_configured: bool,
    updates: broadcast::Sender<FeedUpdate>,
}

pub async fn serve(config: SkywatchConfig, args: crate::ServeArgs) -> Result<(), String> {
    let dashboard: SharedDashboard = Arc::new(RwLock::new(crate::seeded_state(&config)?));
    let (service, ai_configured) = crate::completion_service(&config)?;

    let mut timer = FeedTimer::new(config.feed.tick(), Arc::new(SystemClock));
    timer.start(dashboard.clone(), crate::feed_for(&config));

    let state = AppState {
        dashboard,
        scorer: RecommendationScorer::new(config.weights.clone()),
        region: config.dashboard.region.clone(),
        top_picks: config.dashboard.top_picks,
        map: Arc::new(EmbedMapWidget::from_config(&config.map)),
        map_center: config.map.center,
        map_marker_title: config.map.marker_title.clone(),
        assistant: Arc::new(Assistant::new(service, config.dashboard.region.clone())),
        ai_configured,
        updates: timer.sender(),
    };

    let host = args.host.unwrap_or(config.server.host);
    let port = args.port.unwrap_or(config.server.port);
    let web_root = args.web_root.unwrap_or(config.server.web_root);
    let index_path = format!("{}/index.html", web_root.trim_end_matches('/'));
    let static_service = ServeDir::new(web_root).not_found_service(ServeFile::new(index_path));

    let app = Router::new()
        .route("/api/health", get(health))
        .route("/api/dashboard", get(dashboard_handler))
        .route("/api/locations", get(locations_handler))
        .route("/api/locations/:id/forecast", get(forecast_handler))
        .route("/api/selection", post(selection_handler))
        .route("/api/recommendations", get(recommendations_handler))
        .route("/api/compare", get(compare_handler))
        .route("/api/map", get(map_handler))
        .route("/api/assistant/chat", post(chat_handler))
        .route("/api/assistant/itinerary", post(itinerary_handler))
        .route("/api/feed/stream", get(stream_handler))
        .fallback_service(static_service)
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .map_err(|err| format!("invalid bind address: {}", err))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| format!("failed to bind server: {}", err))?;
    info!(%addr, "serving dashboard api");

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| format!("server error: {}", err));

    timer.stop();
    result
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

async fn health() -> impl IntoResponse {
    StatusCode::OK
}

async fn dashboard_view(state: &AppState, filter: Option<String>) -> DashboardView {
    let mut snapshot = state.dashboard.read().await.clone();
    if let Some(filter) = filter {
        snapshot.set_filter(filter);
    }
    DashboardView::build(
        &snapshot,
        &state.scorer,
        &state.region,
        state.top_picks,
        &Local::now(),
    )
}

async fn dashboard_handler(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Json<DashboardView> {
    Json(dashboard_view(&state, query.filter).await)
}

async fn locations_handler(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Json<LocationsResponse> {
    let view = dashboard_view(&state, query.filter).await;
    Json(LocationsResponse {
        filter: view.filter,
        locations: view.locations,
    })
}

async fn forecast_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ForecastResponse>, (StatusCode, String)> {
    let location = find_location(&state, &id).await?;
    Ok(Json(ForecastResponse {
        points: generate_forecast(&location.conditions(), &Local::now()),
        id: location.id,
        name: location.name,
    }))
}

async fn selection_handler(
    State(state): State<AppState>,
    Json(request): Json<SelectionRequest>,
) -> Result<Json<SelectedDetail>, (StatusCode, String)> {
    let id = request.into_id().map_err(|err| (StatusCode::BAD_REQUEST, err))?;
    let mut guard = state.dashboard.write().await;
    let location = guard
        .select(&id)
        .map_err(|err| (StatusCode::NOT_FOUND, err))?;
    Ok(Json(selected_detail(location, &Local::now())))
}

async fn recommendations_handler(State(state): State<AppState>) -> Json<Vec<Recommendation>> {
    let guard = state.dashboard.read().await;
    Json(state.scorer.rank(guard.locations()))
}

async fn compare_handler(State(state): State<AppState>) -> Json<Vec<ComparisonBar>> {
    let guard = state.dashboard.read().await;
    Json(comparison(guard.locations()))
}

async fn map_handler(State(state): State<AppState>) -> Json<MapView> {
    let marker = MapMarker {
        position: state.map_center,
        title: state.map_marker_title.clone(),
    };
    Json(state.map.render(state.map_center, Some(marker)))
}

async fn chat_handler(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, String)> {
    let question = request.question.unwrap_or_default();
    if question.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "question is required".to_string()));
    }
    let location = resolve_location(&state, request.location_id.as_deref()).await?;

    let reply = state
        .assistant
        .ask(&question, &location)
        .await
        .unwrap_or_default();
    Ok(Json(ChatResponse {
        reply,
        history: state.assistant.history(),
        warnings: assistant_warnings(state.ai_configured),
    }))
}

async fn itinerary_handler(
    State(state): State<AppState>,
    request: Option<Json<ItineraryRequest>>,
) -> Result<Json<ItineraryResponse>, (StatusCode, String)> {
    let request = request.map(|Json(request)| request).unwrap_or_default();
    let location = resolve_location(&state, request.location_id.as_deref()).await?;

    let plan = state.assistant.itinerary(&location).await;
    Ok(Json(ItineraryResponse {
        location_id: location.id,
        plan,
        warnings: assistant_warnings(state.ai_configured),
    }))
}

async fn stream_handler(
    State(state): State<AppState>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, std::convert::Infallible>>> {
    let receiver = state.updates.subscribe();
    let stream = BroadcastStream::new(receiver).filter_map(|update| match update {
        Ok(update) => match serde_json::to_string(&update) {
            Ok(data) => Some(Ok(Event::default().event("feed").data(data))),
            Err(err) => {
                warn!(tick = update.tick, error = %err, "failed to encode feed update");
                None
            }
        },
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(8)))
}

async fn find_location(state: &AppState, id: &str) -> Result<LocationMetric, (StatusCode, String)> {
    let guard = state.dashboard.read().await;
    guard
        .find(id)
        .cloned()
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("unknown location id: {}", id)))
}

async fn resolve_location(
    state: &AppState,
    id: Option<&str>,
) -> Result<LocationMetric, (StatusCode, String)> {
    match id {
        Some(id) => find_location(state, id).await,
        None => Ok(state.dashboard.read().await.selected().clone()),
    }
}
