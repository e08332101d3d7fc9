// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use duty_roster_api::{
    ApiError, AuditTimelineQuery, AuditTimelineResponse, AuthenticatedActor, DateRangeQuery,
    DeclareAvailabilityRequest, GenerateMonthResponse, GenerateWeekRequest, GenerateWeekResponse,
    ListMonthlyDutiesResponse, ListPersonnelResponse, ListWeeklySlotsResponse, MonthRequest,
    OverrideBatchRequest, OverrideBatchResponse, OverrideRequest, OverrideResponse,
    PersonnelChangeResponse, RegisterPersonRequest, RegisterPersonResponse,
    ReplicateFirstWeekResponse, ResolveWeekQuery, ResolveWeekResponse, SetPersonActiveRequest,
    apply_override, apply_override_batch, authenticate, declare_availability, generate_month,
    generate_week, get_audit_timeline, list_monthly_duties, list_personnel, list_weekly_slots,
    register_person, replicate_first_week, resolve_week, set_person_active,
};
use duty_roster_audit::Cause;
use duty_roster_domain::{SpecialDutyCalendar, parse_weekday_list};
use duty_roster_persistence::Persistence;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

/// Duty Roster Server - HTTP server for the duty roster scheduler
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, env = "ROSTER_DATABASE")]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, env = "ROSTER_PORT", default_value_t = 3000)]
    port: u16,

    /// Address to bind the server to
    #[arg(short, long, env = "ROSTER_BIND", default_value = "127.0.0.1")]
    bind: String,

    /// Comma-separated weekdays carrying a study session
    #[arg(long, env = "ROSTER_STUDY_DAYS", default_value = "thursday")]
    study_days: String,

    /// Comma-separated weekdays carrying a recitation-coaching session
    #[arg(long, env = "ROSTER_COACHING_DAYS", default_value = "monday,saturday")]
    coaching_days: String,
}

/// Application state shared across handlers.
///
/// Requests are serialized on the single connection held behind the mutex.
#[derive(Clone)]
struct AppState {
    /// The persistence layer.
    persistence: Arc<Mutex<Persistence>>,
    /// The weekdays carrying each special duty.
    calendar: Arc<SpecialDutyCalendar>,
}

/// A mutating request: the acting identity and cause wrapped around the
/// operation's own fields.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ActorRequest<T> {
    /// The actor ID performing this action.
    actor_id: String,
    /// The role of the actor.
    actor_role: String,
    /// The cause ID for this action.
    cause_id: String,
    /// The cause description.
    cause_description: String,
    /// The operation itself.
    #[serde(flatten)]
    request: T,
}

impl<T> ActorRequest<T> {
    /// Authenticates the actor and splits the envelope.
    fn into_parts(self) -> Result<(AuthenticatedActor, Cause, T), HttpError> {
        let actor: AuthenticatedActor =
            authenticate(&self.actor_id, &self.actor_role).map_err(ApiError::from)?;
        let cause: Cause = Cause::new(self.cause_id, self.cause_description);
        Ok((actor, cause, self.request))
    }
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// The error kind.
    kind: String,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
#[derive(Debug)]
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error kind.
    kind: &'static str,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            kind: String::from(self.kind),
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let (status, kind): (StatusCode, &'static str) = match &err {
            ApiError::AuthenticationFailed { .. } => {
                (StatusCode::UNAUTHORIZED, "AuthenticationFailed")
            }
            ApiError::Unauthorized { .. } => (StatusCode::FORBIDDEN, "Unauthorized"),
            ApiError::ValidationError { .. } => (StatusCode::BAD_REQUEST, "ValidationError"),
            ApiError::AlreadyGenerated { .. } => (StatusCode::CONFLICT, "AlreadyGenerated"),
            ApiError::NoTemplate { .. } => (StatusCode::NOT_FOUND, "NoTemplate"),
            ApiError::StorageConflict { .. } => (StatusCode::CONFLICT, "StorageConflict"),
            ApiError::DataUnavailable { .. } => {
                (StatusCode::SERVICE_UNAVAILABLE, "DataUnavailable")
            }
            ApiError::ResourceNotFound { .. } => (StatusCode::NOT_FOUND, "ResourceNotFound"),
            ApiError::Internal { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "Internal"),
        };

        if status.is_server_error() {
            error!(kind, error = %err, "Request failed");
        } else {
            warn!(kind, error = %err, "Request rejected");
        }

        Self {
            status,
            kind,
            message: err.to_string(),
        }
    }
}

/// Handler for POST `/roster/weekly/generate` endpoint.
async fn handle_generate_week(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<ActorRequest<GenerateWeekRequest>>,
) -> Result<Json<GenerateWeekResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        week_start = %req.request.week_start,
        "Handling generate_week request"
    );
    let (actor, cause, request) = req.into_parts()?;

    let mut persistence = app_state.persistence.lock().await;
    let response: GenerateWeekResponse = generate_week(&mut persistence, &request, &actor, cause)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/roster/monthly/generate` endpoint.
async fn handle_generate_month(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<ActorRequest<MonthRequest>>,
) -> Result<Json<GenerateMonthResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        month = req.request.month,
        year = req.request.year,
        "Handling generate_month request"
    );
    let (actor, cause, request) = req.into_parts()?;

    let mut persistence = app_state.persistence.lock().await;
    let response: GenerateMonthResponse = generate_month(
        &mut persistence,
        &app_state.calendar,
        request,
        &actor,
        cause,
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/roster/monthly/replicate` endpoint.
async fn handle_replicate_first_week(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<ActorRequest<MonthRequest>>,
) -> Result<Json<ReplicateFirstWeekResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        month = req.request.month,
        year = req.request.year,
        "Handling replicate_first_week request"
    );
    let (actor, cause, request) = req.into_parts()?;

    let mut persistence = app_state.persistence.lock().await;
    let response: ReplicateFirstWeekResponse =
        replicate_first_week(&mut persistence, request, &actor, cause)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/overrides` endpoint.
async fn handle_apply_override(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<ActorRequest<OverrideRequest>>,
) -> Result<Json<OverrideResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        grid = %req.request.grid,
        slot_id = ?req.request.item.slot_id,
        "Handling apply_override request"
    );
    let (actor, cause, request) = req.into_parts()?;

    let mut persistence = app_state.persistence.lock().await;
    let response: OverrideResponse = apply_override(&mut persistence, request, &actor, cause)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/overrides/batch` endpoint.
///
/// Items that cannot be applied are listed in the response; the request
/// still succeeds.
async fn handle_apply_override_batch(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<ActorRequest<OverrideBatchRequest>>,
) -> Result<Json<OverrideBatchResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        grid = %req.request.grid,
        items = req.request.items.len(),
        "Handling apply_override_batch request"
    );
    let (actor, cause, request) = req.into_parts()?;

    let mut persistence = app_state.persistence.lock().await;
    let response: OverrideBatchResponse =
        apply_override_batch(&mut persistence, request, &actor, cause)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/roster/weekly` endpoint.
async fn handle_list_weekly_slots(
    AxumState(app_state): AxumState<AppState>,
    Query(params): Query<DateRangeQuery>,
) -> Result<Json<ListWeeklySlotsResponse>, HttpError> {
    info!(start = %params.start, end = %params.end, "Handling list_weekly_slots request");

    let mut persistence = app_state.persistence.lock().await;
    let response: ListWeeklySlotsResponse = list_weekly_slots(&mut persistence, &params)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/roster/monthly` endpoint.
async fn handle_list_monthly_duties(
    AxumState(app_state): AxumState<AppState>,
    Query(params): Query<DateRangeQuery>,
) -> Result<Json<ListMonthlyDutiesResponse>, HttpError> {
    info!(start = %params.start, end = %params.end, "Handling list_monthly_duties request");

    let mut persistence = app_state.persistence.lock().await;
    let response: ListMonthlyDutiesResponse = list_monthly_duties(&mut persistence, &params)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/roster/week` endpoint.
///
/// Resolves the week containing a date; touches no storage.
#[allow(clippy::unused_async)]
async fn handle_resolve_week(
    Query(params): Query<ResolveWeekQuery>,
) -> Result<Json<ResolveWeekResponse>, HttpError> {
    Ok(Json(resolve_week(&params)?))
}

/// Handler for POST `/personnel` endpoint.
async fn handle_register_person(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<ActorRequest<RegisterPersonRequest>>,
) -> Result<Json<RegisterPersonResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        display_name = %req.request.display_name,
        "Handling register_person request"
    );
    let (actor, cause, request) = req.into_parts()?;

    let mut persistence = app_state.persistence.lock().await;
    let response: RegisterPersonResponse =
        register_person(&mut persistence, request, &actor, cause)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/personnel` endpoint.
async fn handle_list_personnel(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<ListPersonnelResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListPersonnelResponse = list_personnel(&mut persistence)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/personnel/availability` endpoint.
async fn handle_declare_availability(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<ActorRequest<DeclareAvailabilityRequest>>,
) -> Result<Json<PersonnelChangeResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        person_id = req.request.person_id,
        date = %req.request.date,
        "Handling declare_availability request"
    );
    let (actor, cause, request) = req.into_parts()?;

    let mut persistence = app_state.persistence.lock().await;
    let response: PersonnelChangeResponse =
        declare_availability(&mut persistence, request, &actor, cause)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/personnel/active` endpoint.
async fn handle_set_person_active(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<ActorRequest<SetPersonActiveRequest>>,
) -> Result<Json<PersonnelChangeResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        person_id = req.request.person_id,
        is_active = req.request.is_active,
        "Handling set_person_active request"
    );
    let (actor, cause, request) = req.into_parts()?;

    let mut persistence = app_state.persistence.lock().await;
    let response: PersonnelChangeResponse =
        set_person_active(&mut persistence, request, &actor, cause)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/audit/timeline` endpoint.
async fn handle_get_audit_timeline(
    AxumState(app_state): AxumState<AppState>,
    Query(params): Query<AuditTimelineQuery>,
) -> Result<Json<AuditTimelineResponse>, HttpError> {
    info!(scope = ?params.scope, after = ?params.after, "Handling get_audit_timeline request");

    let mut persistence = app_state.persistence.lock().await;
    let response: AuditTimelineResponse = get_audit_timeline(&mut persistence, &params)?;
    drop(persistence);

    Ok(Json(response))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/roster/weekly/generate", post(handle_generate_week))
        .route("/roster/weekly", get(handle_list_weekly_slots))
        .route("/roster/week", get(handle_resolve_week))
        .route("/roster/monthly/generate", post(handle_generate_month))
        .route("/roster/monthly/replicate", post(handle_replicate_first_week))
        .route("/roster/monthly", get(handle_list_monthly_duties))
        .route("/overrides", post(handle_apply_override))
        .route("/overrides/batch", post(handle_apply_override_batch))
        .route("/personnel", post(handle_register_person))
        .route("/personnel", get(handle_list_personnel))
        .route("/personnel/availability", post(handle_declare_availability))
        .route("/personnel/active", post(handle_set_person_active))
        .route("/audit/timeline", get(handle_get_audit_timeline))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Duty Roster Server");

    let calendar: SpecialDutyCalendar = SpecialDutyCalendar::new(
        parse_weekday_list(&args.study_days)?,
        parse_weekday_list(&args.coaching_days)?,
    );
    info!(
        study_days = ?calendar.study_days(),
        coaching_days = ?calendar.coaching_days(),
        "Special duty calendar configured"
    );

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        calendar: Arc::new(calendar),
    };

    let app: Router = build_router(app_state);

    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
