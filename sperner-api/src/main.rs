//! Sperner's Game Web API
//!
//! Thin HTTP boundary for a browser front end. The front end draws the board
//! from the snapshot, turns clicks into moves, and shows whatever the engine
//! reports. Sessions live in memory only; each game sits behind its own
//! mutex so moves within a session are processed one at a time while
//! separate sessions never contend.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use anyhow::Context;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use sperner_core::{
    Color, ColorSet, Game, GameError, GameSnapshot, MoveCheck, MoveOutcome, Point, Role,
    Triangulation, VertexId, DEFAULT_LEVEL, MAX_UI_LEVEL, MIN_UI_LEVEL,
};

// =============================================================================
// Configuration
// =============================================================================

/// Command-line / environment configuration.
#[derive(Parser, Debug, Clone)]
#[command(name = "sperner-api", about = "HTTP API for Sperner's game")]
struct Config {
    /// Address to listen on
    #[arg(long, env = "SPERNER_BIND", default_value = "0.0.0.0:8000")]
    bind: SocketAddr,

    /// Level for sessions created without one
    #[arg(
        long,
        env = "SPERNER_LEVEL",
        default_value_t = DEFAULT_LEVEL,
        value_parser = clap::value_parser!(u32).range(MIN_UI_LEVEL as i64..=MAX_UI_LEVEL as i64)
    )]
    default_level: u32,

    /// Sessions kept in memory; creating one past this drops the oldest
    #[arg(long, env = "SPERNER_MAX_SESSIONS", default_value = "1024")]
    max_sessions: NonZeroUsize,
}

// =============================================================================
// Session Store
// =============================================================================

type SessionId = u64;
type Session = Arc<Mutex<Game>>;

/// In-memory game sessions, at most `capacity` of them.
///
/// Ids only grow, so the smallest key is always the oldest session.
struct SessionStore {
    sessions: RwLock<BTreeMap<SessionId, Session>>,
    next_id: AtomicU64,
    capacity: NonZeroUsize,
}

impl SessionStore {
    fn new(capacity: NonZeroUsize) -> Self {
        Self {
            sessions: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
            capacity,
        }
    }

    fn create(&self, game: Game) -> (SessionId, Session) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let session = Arc::new(Mutex::new(game));
        let mut sessions = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        while sessions.len() >= self.capacity.get() {
            let Some((evicted, _)) = sessions.pop_first() else {
                break;
            };
            info!(session = evicted, "session evicted");
        }
        sessions.insert(id, Arc::clone(&session));
        (id, session)
    }

    fn get(&self, id: SessionId) -> Result<Session, ApiError> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
            .ok_or(ApiError::UnknownSession(id))
    }

    fn remove(&self, id: SessionId) -> Result<(), ApiError> {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .map(|_| ())
            .ok_or(ApiError::UnknownSession(id))
    }

    fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Lock a session. A panic mid-move cannot leave a game half-updated, so a
/// poisoned lock still guards a consistent game.
fn lock(session: &Session) -> MutexGuard<'_, Game> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Shared application state
struct AppStateInner {
    store: SessionStore,
    default_level: u32,
}

type AppState = Arc<AppStateInner>;

// =============================================================================
// JSON Models
// =============================================================================

#[derive(Serialize, Debug)]
struct SessionModel {
    id: SessionId,
    #[serde(flatten)]
    game: GameSnapshot,
}

#[derive(Serialize, Debug)]
struct MoveModel {
    id: SessionId,
    result: MoveOutcome,
    game: GameSnapshot,
}

#[derive(Deserialize, Default)]
struct LevelRequest {
    level: Option<u32>,
}

#[derive(Deserialize)]
struct RolesRequest {
    role: Role,
}

#[derive(Deserialize)]
struct MoveRequest {
    vertex: usize,
    color: Color,
}

#[derive(Deserialize)]
struct ClickRequest {
    x: f64,
    y: f64,
    color: Color,
}

#[derive(Deserialize)]
struct HintQuery {
    vertex: usize,
    color: Color,
}

#[derive(Serialize)]
struct HealthModel {
    status: String,
    sessions: usize,
}

#[derive(Serialize)]
struct ErrorModel {
    detail: String,
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    allowed: Option<ColorSet>,
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug)]
enum ApiError {
    Game(GameError),
    UnknownSession(SessionId),
    LevelOutOfRange(u32),
    NoVertex,
}

impl From<GameError> for ApiError {
    fn from(err: GameError) -> Self {
        ApiError::Game(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Game(GameError::AlreadyColored { .. }) => StatusCode::CONFLICT,
            ApiError::Game(_) => StatusCode::BAD_REQUEST,
            ApiError::UnknownSession(_) => StatusCode::NOT_FOUND,
            ApiError::LevelOutOfRange(_) | ApiError::NoVertex => StatusCode::BAD_REQUEST,
        }
    }

    fn model(&self) -> ErrorModel {
        match self {
            ApiError::Game(err) => ErrorModel {
                detail: err.to_string(),
                kind: err.kind(),
                allowed: match err {
                    GameError::IllegalColor { allowed, .. } => Some(*allowed),
                    _ => None,
                },
            },
            ApiError::UnknownSession(id) => ErrorModel {
                detail: format!("No session with id {}", id),
                kind: "unknown_session",
                allowed: None,
            },
            ApiError::LevelOutOfRange(level) => ErrorModel {
                detail: format!(
                    "Level {} is outside {}..={}",
                    level, MIN_UI_LEVEL, MAX_UI_LEVEL
                ),
                kind: "invalid_level",
                allowed: None,
            },
            ApiError::NoVertex => ErrorModel {
                detail: "Board has no vertices".to_string(),
                kind: "no_vertex",
                allowed: None,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.model())).into_response()
    }
}

// =============================================================================
// Conversion Functions
// =============================================================================

/// Resolve a click in board coordinates to the closest vertex.
fn nearest_vertex(triangulation: &Triangulation, click: Point) -> Option<VertexId> {
    triangulation
        .vertices()
        .iter()
        .min_by(|a, b| {
            a.position
                .distance_sq(click)
                .total_cmp(&b.position.distance_sq(click))
        })
        .map(|v| v.id)
}

fn check_level(level: u32) -> Result<u32, ApiError> {
    if (MIN_UI_LEVEL..=MAX_UI_LEVEL).contains(&level) {
        Ok(level)
    } else {
        Err(ApiError::LevelOutOfRange(level))
    }
}

fn session_model(id: SessionId, game: &Game) -> SessionModel {
    SessionModel {
        id,
        game: GameSnapshot::of(&*game),
    }
}

fn apply_move(
    id: SessionId,
    game: &mut Game,
    vertex: VertexId,
    color: Color,
) -> Result<MoveModel, ApiError> {
    let result = game.attempt_move(vertex, color).map_err(|err| {
        debug!(session = id, %err, "move rejected");
        err
    })?;
    Ok(MoveModel {
        id,
        result,
        game: GameSnapshot::of(&*game),
    })
}

// =============================================================================
// API Endpoints
// =============================================================================

async fn health(State(state): State<AppState>) -> Json<HealthModel> {
    Json(HealthModel {
        status: "ok".to_string(),
        sessions: state.store.len(),
    })
}

async fn create_session(
    State(state): State<AppState>,
    body: Option<Json<LevelRequest>>,
) -> Result<(StatusCode, Json<SessionModel>), ApiError> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let level = check_level(req.level.unwrap_or(state.default_level))?;
    let game = Game::new(level)?;
    let (id, session) = state.store.create(game);
    info!(session = id, level, "session created");

    let game = lock(&session);
    Ok((StatusCode::CREATED, Json(session_model(id, &game))))
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<Json<SessionModel>, ApiError> {
    let session = state.store.get(id)?;
    let game = lock(&session);
    Ok(Json(session_model(id, &game)))
}

async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<StatusCode, ApiError> {
    state.store.remove(id)?;
    info!(session = id, "session removed");
    Ok(StatusCode::NO_CONTENT)
}

async fn select_roles(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    Json(req): Json<RolesRequest>,
) -> Result<Json<SessionModel>, ApiError> {
    let session = state.store.get(id)?;
    let mut game = lock(&session);
    game.select_roles(req.role)?;
    Ok(Json(session_model(id, &game)))
}

async fn make_move(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    Json(req): Json<MoveRequest>,
) -> Result<Json<MoveModel>, ApiError> {
    let session = state.store.get(id)?;
    let mut game = lock(&session);
    Ok(Json(apply_move(id, &mut game, VertexId(req.vertex), req.color)?))
}

async fn click(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    Json(req): Json<ClickRequest>,
) -> Result<Json<MoveModel>, ApiError> {
    let session = state.store.get(id)?;
    let mut game = lock(&session);
    let vertex = nearest_vertex(game.triangulation(), Point { x: req.x, y: req.y })
        .ok_or(ApiError::NoVertex)?;
    Ok(Json(apply_move(id, &mut game, vertex, req.color)?))
}

async fn hint(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    Query(query): Query<HintQuery>,
) -> Result<Json<MoveCheck>, ApiError> {
    let session = state.store.get(id)?;
    let game = lock(&session);
    Ok(Json(game.check_move(VertexId(query.vertex), query.color)?))
}

async fn reset_session(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    body: Option<Json<LevelRequest>>,
) -> Result<Json<SessionModel>, ApiError> {
    let session = state.store.get(id)?;
    let mut game = lock(&session);
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let level = check_level(req.level.unwrap_or(game.level()))?;
    game.reset(level)?;
    info!(session = id, level, "session reset");
    Ok(Json(session_model(id, &game)))
}

fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/sessions", post(create_session))
        .route("/sessions/{id}", get(get_session).delete(delete_session))
        .route("/sessions/{id}/roles", post(select_roles))
        .route("/sessions/{id}/move", post(make_move))
        .route("/sessions/{id}/click", post(click))
        .route("/sessions/{id}/hint", get(hint))
        .route("/sessions/{id}/reset", post(reset_session))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    let state: AppState = Arc::new(AppStateInner {
        store: SessionStore::new(config.max_sessions),
        default_level: config.default_level,
    });

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    info!(
        addr = %config.bind,
        default_level = config.default_level,
        max_sessions = config.max_sessions.get(),
        "Sperner API running"
    );
    axum::serve(listener, router(state))
        .await
        .context("server error")?;
    Ok(())
}
