//! Single binary web server: JSON API over the league engine.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST (e.g. 0.0.0.0), PORT (e.g. 8080).

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, JsonConfig, Path, PayloadConfig},
    App, HttpResponse, HttpServer, Responder,
};
use court_league::{League, LeagueConfig, LeagueError, LeagueId, TierCourts};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Per-league entry: league data + last activity time (for auto-cleanup).
struct LeagueEntry {
    league: League,
    last_activity: Instant,
}

/// In-memory state: many leagues by ID. Entries are removed after 12h inactivity.
type AppState = Data<RwLock<HashMap<LeagueId, LeagueEntry>>>;

/// Inactivity threshold: leagues not accessed for this long are removed.
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

/// Largest accepted request body. Exports of long-running leagues grow with every archived round.
const MAX_PAYLOAD_BYTES: usize = 16 * 1024 * 1024;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

/// League formats offered when creating a league.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
enum LeagueFormat {
    #[default]
    RoundRobin,
    Ladder,
    MixedDoubles,
    SeededLadder,
}

impl LeagueFormat {
    fn config(self) -> LeagueConfig {
        match self {
            LeagueFormat::RoundRobin => LeagueConfig::round_robin(),
            LeagueFormat::Ladder => LeagueConfig::ladder(),
            LeagueFormat::MixedDoubles => LeagueConfig::mixed_doubles(),
            LeagueFormat::SeededLadder => LeagueConfig::seeded_ladder(),
        }
    }
}

#[derive(Deserialize)]
struct CreateLeagueBody {
    #[serde(default)]
    format: LeagueFormat,
}

#[derive(Deserialize)]
struct AddParticipantBody {
    name: String,
}

#[derive(Deserialize)]
struct AddTeamBody {
    player_1: String,
    player_2: String,
}

#[derive(Deserialize)]
struct ScoreBody {
    side_1_score: u32,
    side_2_score: u32,
    /// Optional side ids, to pick one of several games on the same court.
    #[serde(default)]
    side_1: Option<Vec<Uuid>>,
    #[serde(default)]
    side_2: Option<Vec<Uuid>>,
}

#[derive(Deserialize)]
struct TierCourtsBody {
    courts: [Vec<u32>; 4],
}

/// Path segment: league id (e.g. /api/leagues/{id})
#[derive(Deserialize)]
struct LeaguePath {
    id: LeagueId,
}

/// Path segments: league id and participant id
#[derive(Deserialize)]
struct LeagueParticipantPath {
    id: LeagueId,
    participant_id: Uuid,
}

/// Path segments: league id, round number and court number
#[derive(Deserialize)]
struct LeagueCourtPath {
    id: LeagueId,
    round: u32,
    court: u32,
}

fn error_response(e: LeagueError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        LeagueError::ParticipantNotFound(_) | LeagueError::RoundNotFound(_) | LeagueError::CourtNotFound { .. } => {
            HttpResponse::NotFound().json(body)
        }
        LeagueError::AlreadyCompleted { .. } => HttpResponse::Conflict().json(body),
        _ => HttpResponse::BadRequest().json(body),
    }
}

fn no_league() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "No league" }))
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "court-league",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Create a new league (returns it with id; client stores id for subsequent requests).
#[post("/api/leagues")]
async fn api_create_league(state: AppState, body: Option<Json<CreateLeagueBody>>) -> HttpResponse {
    let format = body.map(|b| b.format).unwrap_or_default();
    let league = League::new(format.config());
    let id = league.id;
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    log::info!("Created {:?} league {}", format, id);
    let response = HttpResponse::Ok().json(&league);
    g.insert(
        id,
        LeagueEntry {
            league,
            last_activity: Instant::now(),
        },
    );
    response
}

/// Get a league by id (404 if not found). Touching it refreshes last_activity.
#[get("/api/leagues/{id}")]
async fn api_get_league(state: AppState, path: Path<LeaguePath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get_mut(&path.id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            HttpResponse::Ok().json(&entry.league)
        }
        None => no_league(),
    }
}

/// Add a solo participant.
#[post("/api/leagues/{id}/participants")]
async fn api_add_participant(
    state: AppState,
    path: Path<LeaguePath>,
    body: Json<AddParticipantBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return no_league(),
    };
    entry.last_activity = Instant::now();
    let league = &mut entry.league;
    match league.add_participant(body.name.as_str()) {
        Ok(_) => HttpResponse::Ok().json(league),
        Err(e) => error_response(e),
    }
}

/// Add a fixed doubles team.
#[post("/api/leagues/{id}/teams")]
async fn api_add_team(state: AppState, path: Path<LeaguePath>, body: Json<AddTeamBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return no_league(),
    };
    entry.last_activity = Instant::now();
    let league = &mut entry.league;
    match league.add_team(&body.player_1, &body.player_2) {
        Ok(_) => HttpResponse::Ok().json(league),
        Err(e) => error_response(e),
    }
}

/// Remove a participant by id.
#[delete("/api/leagues/{id}/participants/{participant_id}")]
async fn api_remove_participant(state: AppState, path: Path<LeagueParticipantPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return no_league(),
    };
    entry.last_activity = Instant::now();
    let league = &mut entry.league;
    match league.remove_participant(path.participant_id) {
        Ok(_) => HttpResponse::Ok().json(league),
        Err(e) => error_response(e),
    }
}

/// Generate the next round of the current session.
#[post("/api/leagues/{id}/rounds/generate")]
async fn api_generate_round(state: AppState, path: Path<LeaguePath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return no_league(),
    };
    entry.last_activity = Instant::now();
    match entry.league.generate_round() {
        Ok(round) => {
            log::info!(
                "League {}: round {} with {} court(s), {} sitting out",
                path.id,
                round.number,
                round.courts.len(),
                round.sitting_out.len()
            );
            HttpResponse::Ok().json(round)
        }
        Err(e) => {
            log::warn!("League {}: round generation rejected: {}", path.id, e);
            error_response(e)
        }
    }
}

/// Record the score of one game.
#[put("/api/leagues/{id}/rounds/{round}/courts/{court}/score")]
async fn api_record_score(state: AppState, path: Path<LeagueCourtPath>, body: Json<ScoreBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return no_league(),
    };
    entry.last_activity = Instant::now();
    let sides = match (&body.side_1, &body.side_2) {
        (Some(side_1), Some(side_2)) => Some((side_1.as_slice(), side_2.as_slice())),
        _ => None,
    };
    let league = &mut entry.league;
    match league.record_score(path.round, path.court, body.side_1_score, body.side_2_score, sides) {
        Ok(()) => HttpResponse::Ok().json(league),
        Err(e) => error_response(e),
    }
}

/// Current standings.
#[get("/api/leagues/{id}/rankings")]
async fn api_rankings(state: AppState, path: Path<LeaguePath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get_mut(&path.id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            HttpResponse::Ok().json(entry.league.rankings())
        }
        None => no_league(),
    }
}

/// End the current session (seeding or promotion/relegation for tiered leagues).
#[post("/api/leagues/{id}/sessions/advance")]
async fn api_advance_session(state: AppState, path: Path<LeaguePath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return no_league(),
    };
    entry.last_activity = Instant::now();
    let summary = entry.league.advance_session();
    log::info!(
        "League {}: session {} closed, session {} open",
        path.id,
        summary.closed_session,
        summary.next_session
    );
    HttpResponse::Ok().json(summary)
}

/// Replace the tier-to-court mapping.
#[put("/api/leagues/{id}/tier-courts")]
async fn api_set_tier_courts(state: AppState, path: Path<LeaguePath>, body: Json<TierCourtsBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return no_league(),
    };
    entry.last_activity = Instant::now();
    let league = &mut entry.league;
    let result = TierCourts::new(body.into_inner().courts).and_then(|courts| league.set_tier_courts(courts));
    match result {
        Ok(()) => HttpResponse::Ok().json(league),
        Err(e) => error_response(e),
    }
}

/// Reset sessions, history and tiers; keep the roster.
#[post("/api/leagues/{id}/reset")]
async fn api_reset_league(state: AppState, path: Path<LeaguePath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return no_league(),
    };
    entry.last_activity = Instant::now();
    entry.league.reset_all();
    HttpResponse::Ok().json(&entry.league)
}

/// Drop the current session's rounds and stats without archiving them.
#[post("/api/leagues/{id}/sessions/clear")]
async fn api_clear_session(state: AppState, path: Path<LeaguePath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return no_league(),
    };
    entry.last_activity = Instant::now();
    entry.league.clear_current_session();
    HttpResponse::Ok().json(&entry.league)
}

/// Forget archived sessions.
#[post("/api/leagues/{id}/history/clear")]
async fn api_clear_history(state: AppState, path: Path<LeaguePath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return no_league(),
    };
    entry.last_activity = Instant::now();
    entry.league.clear_history();
    HttpResponse::Ok().json(&entry.league)
}

/// Remove everything, roster included.
#[post("/api/leagues/{id}/clear")]
async fn api_clear_league(state: AppState, path: Path<LeaguePath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return no_league(),
    };
    entry.last_activity = Instant::now();
    entry.league.clear_all();
    log::info!("League {}: cleared", path.id);
    HttpResponse::Ok().json(&entry.league)
}

/// Export full league state for an external store.
#[get("/api/leagues/{id}/export")]
async fn api_export_league(state: AppState, path: Path<LeaguePath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get(&path.id).map(|entry| entry.league.to_json()) {
        Some(Ok(data)) => HttpResponse::Ok().content_type("application/json").body(data),
        Some(Err(e)) => error_response(e),
        None => no_league(),
    }
}

/// Import a previously exported league (replaces any league with the same id).
#[post("/api/leagues/import")]
async fn api_import_league(state: AppState, body: String) -> HttpResponse {
    let league = match League::from_json(&body) {
        Ok(league) => league,
        Err(e) => return error_response(e),
    };
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    log::info!("Imported league {} (session {})", league.id, league.session);
    let response = HttpResponse::Ok().json(&league);
    g.insert(
        league.id,
        LeagueEntry {
            league,
            last_activity: Instant::now(),
        },
    );
    response
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(HashMap::<LeagueId, LeagueEntry>::new()));

    // Background task: every 30 minutes, remove leagues inactive for 12+ hours
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < INACTIVITY_TIMEOUT);
            let removed = before - g.len();
            if removed > 0 {
                log::info!("Cleaned up {} inactive league(s) (no activity for 12h)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(PayloadConfig::new(MAX_PAYLOAD_BYTES))
            .app_data(JsonConfig::default().limit(MAX_PAYLOAD_BYTES))
            .service(api_health)
            .service(favicon)
            .service(api_import_league)
            .service(api_create_league)
            .service(api_get_league)
            .service(api_add_participant)
            .service(api_add_team)
            .service(api_remove_participant)
            .service(api_generate_round)
            .service(api_record_score)
            .service(api_rankings)
            .service(api_advance_session)
            .service(api_set_tier_courts)
            .service(api_reset_league)
            .service(api_clear_session)
            .service(api_clear_history)
            .service(api_clear_league)
            .service(api_export_league)
    })
    .bind(bind)?
    .run()
    .await
}
