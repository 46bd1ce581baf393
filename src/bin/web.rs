//! Single binary web server: REST API over the Swiss tournament service.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST (e.g. 0.0.0.0), PORT (e.g. 8080), SWISS_RNG_SEED, SWISS_WRITE_ATTEMPTS.

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use serde::Deserialize;
use swiss_tournament::{
    MatchId, MatchResult, MemoryStore, ParticipantId, ServiceConfig, ServiceError, StoreError,
    Tournament, TournamentError, TournamentId, TournamentService,
};

type AppState = Data<TournamentService<MemoryStore>>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    name: String,
}

#[derive(Deserialize)]
struct AddParticipantBody {
    name: String,
}

/// `{"result": {"winner": "<participant id>"}}` or `{"result": "tie"}`.
#[derive(Deserialize)]
struct RecordResultBody {
    result: MatchResult,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and participant id
#[derive(Deserialize)]
struct TournamentParticipantPath {
    id: TournamentId,
    participant_id: ParticipantId,
}

/// Path segments: tournament id and match id
#[derive(Deserialize)]
struct TournamentMatchPath {
    id: TournamentId,
    match_id: MatchId,
}

fn error_response(e: &ServiceError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        ServiceError::Store(StoreError::TournamentNotFound(_))
        | ServiceError::Tournament(
            TournamentError::ParticipantNotFound(_) | TournamentError::MatchNotFound(_),
        ) => HttpResponse::NotFound().json(body),
        ServiceError::Tournament(
            TournamentError::IllegalStateTransition { .. } | TournamentError::RoundIncomplete { .. },
        ) => HttpResponse::Conflict().json(body),
        ServiceError::Tournament(_) => HttpResponse::BadRequest().json(body),
        ServiceError::Store(_) | ServiceError::Csv(_) => {
            log::error!("request failed: {}", e);
            HttpResponse::InternalServerError().json(body)
        }
    }
}

fn respond(result: Result<Tournament, ServiceError>) -> HttpResponse {
    match result {
        Ok(t) => HttpResponse::Ok().json(t),
        Err(e) => error_response(&e),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "swiss-tournament",
    })
}

/// Create a new tournament (returns it with id; client stores id for subsequent requests).
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<CreateTournamentBody>) -> HttpResponse {
    respond(state.create_tournament(&body.name))
}

/// Get a tournament by id (404 if not found).
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    respond(state.tournament(path.id))
}

/// Register a participant (Registering or Closed).
#[post("/api/tournaments/{id}/participants")]
async fn api_add_participant(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<AddParticipantBody>,
) -> HttpResponse {
    respond(state.add_participant(path.id, &body.name))
}

/// Remove a participant (Registering or Closed).
#[delete("/api/tournaments/{id}/participants/{participant_id}")]
async fn api_remove_participant(state: AppState, path: Path<TournamentParticipantPath>) -> HttpResponse {
    respond(state.remove_participant(path.id, path.participant_id))
}

/// Drop a participant; a pending match in the current round becomes a walkover.
#[post("/api/tournaments/{id}/participants/{participant_id}/drop")]
async fn api_drop_participant(state: AppState, path: Path<TournamentParticipantPath>) -> HttpResponse {
    respond(state.drop_participant(path.id, path.participant_id))
}

#[post("/api/tournaments/{id}/close")]
async fn api_close(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    respond(state.close(path.id))
}

#[post("/api/tournaments/{id}/reopen")]
async fn api_reopen(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    respond(state.reopen(path.id))
}

/// Start play (Registering/Closed -> Playing).
#[post("/api/tournaments/{id}/start")]
async fn api_start(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    respond(state.start(path.id))
}

/// Pair the next round (Playing, previous round fully reported).
#[post("/api/tournaments/{id}/rounds")]
async fn api_generate_round(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    respond(state.generate_round(path.id))
}

/// Report a winner or a tie for one match.
#[put("/api/tournaments/{id}/matches/{match_id}/result")]
async fn api_record_result(
    state: AppState,
    path: Path<TournamentMatchPath>,
    body: Json<RecordResultBody>,
) -> HttpResponse {
    respond(state.record_result(path.id, path.match_id, body.result))
}

/// Reopen a completed match for correction.
#[post("/api/tournaments/{id}/matches/{match_id}/reopen")]
async fn api_reopen_match(state: AppState, path: Path<TournamentMatchPath>) -> HttpResponse {
    respond(state.reopen_match(path.id, path.match_id))
}

/// CompleteRounds -> CompleteTournament.
#[post("/api/tournaments/{id}/finalize-rounds")]
async fn api_finalize_rounds(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    respond(state.finalize_rounds(path.id))
}

/// Host confirmation: CompleteTournament -> Finalized.
#[post("/api/tournaments/{id}/confirm")]
async fn api_confirm(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    respond(state.confirm(path.id))
}

#[get("/api/tournaments/{id}/standings")]
async fn api_standings(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    match state.standings(path.id) {
        Ok(rows) => HttpResponse::Ok().json(rows),
        Err(e) => error_response(&e),
    }
}

#[get("/api/tournaments/{id}/standings.csv")]
async fn api_standings_csv(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    match state.standings_csv(path.id) {
        Ok(csv) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .body(csv),
        Err(e) => error_response(&e),
    }
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

    let config = ServiceConfig::from_env();
    if let Some(seed) = config.rng_seed {
        log::info!("Pairing RNG seeded with {}", seed);
    }
    let state = Data::new(TournamentService::new(MemoryStore::new(), config));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_add_participant)
            .service(api_remove_participant)
            .service(api_drop_participant)
            .service(api_close)
            .service(api_reopen)
            .service(api_start)
            .service(api_generate_round)
            .service(api_record_result)
            .service(api_reopen_match)
            .service(api_finalize_rounds)
            .service(api_confirm)
            .service(api_standings_csv)
            .service(api_standings)
    })
    .bind(bind)?
    .run()
    .await
}
