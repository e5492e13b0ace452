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
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod seed;

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use clap::Parser;
use garage_booking::BookingSession;
use garage_booking_api::{
    AvailabilityService, BookingCommitter, BookingError, BookingReceipt, CancelOutcome, Catalog,
    NoopNotifier, Notifier, SqliteStore, StoreError, WebhookNotifier, cancel_appointment,
    complete_appointment, mark_no_show, next_confirmed_appointment, upcoming_appointments,
};
use garage_booking_domain::{
    Appointment, AppointmentStatus, BusinessHours, ClientDetails, DaySlots, DomainError, Service,
    ServiceType, Technician, TechnicianChoice, VehicleDetails, format_time_slot, parse_time_slot,
};
use garage_booking_persistence::Persistence;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

/// Availability is never computed for more days than this in one request.
const MAX_AVAILABILITY_DAYS: u64 = 31;

const DEFAULT_AVAILABILITY_DAYS: u64 = 7;

/// Garage Booking Server - HTTP server for the garage booking system
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// IANA timezone the garage operates in
    #[arg(long, default_value = "Europe/Madrid")]
    timezone: String,

    /// Opening time (HH:MM, garage local time)
    #[arg(long, default_value = "09:00")]
    open: String,

    /// Closing time (HH:MM, garage local time)
    #[arg(long, default_value = "19:00")]
    close: String,

    /// Slot duration used when a service has none
    #[arg(long, default_value_t = 30)]
    slot_minutes: u32,

    /// Technician capacity assumed when the directory cannot be read
    #[arg(long, default_value_t = 3)]
    fallback_capacity: u32,

    /// URL that receives a JSON summary of each confirmed booking
    #[arg(long)]
    notify_webhook: Option<String>,

    /// Insert the default services and technicians into an empty catalog
    #[arg(long)]
    seed_catalog: bool,
}

impl Args {
    fn business_hours(&self) -> Result<BusinessHours, DomainError> {
        BusinessHours::new(
            BusinessHours::parse_timezone(&self.timezone)?,
            parse_time_slot(&self.open)?,
            parse_time_slot(&self.close)?,
            self.slot_minutes,
            self.fallback_capacity,
        )
    }
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    store: SqliteStore,
    availability: Arc<AvailabilityService>,
    committer: Arc<BookingCommitter>,
    hours: BusinessHours,
}

impl AppState {
    fn new(persistence: Persistence, hours: BusinessHours, notifier: Arc<dyn Notifier>) -> Self {
        let store: SqliteStore = SqliteStore::new(persistence);
        let shared: Arc<SqliteStore> = Arc::new(store.clone());
        Self {
            availability: Arc::new(AvailabilityService::new(
                shared.clone(),
                shared.clone(),
                hours.clone(),
            )),
            committer: Arc::new(BookingCommitter::new(shared, notifier, hours.clone())),
            store,
            hours,
        }
    }
}

/// A catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ServiceResponse {
    service_type: String,
    name: String,
    duration_minutes: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    price: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TechnicianResponse {
    technician_id: i64,
    name: String,
    specialty: String,
}

/// Query parameters for the availability endpoint.
#[derive(Debug, Clone, Deserialize)]
struct AvailabilityQuery {
    /// Catalog key, e.g. `cambio_aceite`.
    service_type: String,
    /// Omitted for "any technician".
    technician_id: Option<i64>,
    /// First local date. Defaults to today in the garage timezone.
    from: Option<NaiveDate>,
    /// Number of days to return, including `from`.
    days: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SlotResponse {
    /// Local start time (`HH:MM`).
    time: String,
    start: DateTime<Utc>,
    available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DayResponse {
    date: NaiveDate,
    slots: Vec<SlotResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AvailabilityResponse {
    service_type: String,
    duration_minutes: u32,
    technician: String,
    days: Vec<DayResponse>,
}

/// API request for booking a slot.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct CreateBookingRequest {
    service_type: String,
    /// Omitted for "any technician".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    technician_id: Option<i64>,
    /// Local date of the appointment.
    date: NaiveDate,
    /// Local start time (`HH:MM`).
    time: String,
    name: String,
    phone: String,
    email: String,
    #[serde(default)]
    consent: bool,
    plate: String,
    make: String,
    model: String,
    #[serde(default)]
    year: String,
    #[serde(default)]
    reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct BookingResponse {
    appointment_id: i64,
    access_code: String,
    start: DateTime<Utc>,
    date: NaiveDate,
    time: String,
    duration_minutes: u32,
    service_name: String,
    technician: String,
}

#[derive(Debug, Clone, Deserialize)]
struct PhoneQuery {
    phone: String,
}

/// An appointment as shown to the client who owns it.
///
/// The access code is never echoed back on lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct AppointmentResponse {
    appointment_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    technician_id: Option<i64>,
    start: DateTime<Utc>,
    date: NaiveDate,
    time: String,
    duration_minutes: u32,
    status: AppointmentStatus,
}

#[derive(Debug, Clone, Serialize)]
struct CancelResponse {
    appointment_id: i64,
    outcome: CancelOutcome,
}

#[derive(Debug, Clone, Serialize)]
struct StatusResponse {
    appointment_id: i64,
    status: AppointmentStatus,
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    status: StatusCode,
    message: String,
}

impl HttpError {
    const fn not_found(message: String) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<BookingError> for HttpError {
    fn from(err: BookingError) -> Self {
        let status: StatusCode = match &err {
            BookingError::Validation(_) => StatusCode::BAD_REQUEST,
            BookingError::Flow(_) => StatusCode::UNPROCESSABLE_ENTITY,
            BookingError::SlotConflict { .. } | BookingError::InvalidStatusTransition { .. } => {
                StatusCode::CONFLICT
            }
            BookingError::AppointmentNotFound(_) => StatusCode::NOT_FOUND,
            BookingError::LookupFailure(source) => {
                error!(error = %source, "Booking lookup failed");
                StatusCode::SERVICE_UNAVAILABLE
            }
            BookingError::Commit(source) => {
                error!(error = %source, "Booking commit failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.user_message(),
        }
    }
}

impl From<DomainError> for HttpError {
    fn from(err: DomainError) -> Self {
        BookingError::from(err).into()
    }
}

impl From<StoreError> for HttpError {
    fn from(err: StoreError) -> Self {
        BookingError::LookupFailure(err).into()
    }
}

impl From<&Service> for ServiceResponse {
    fn from(service: &Service) -> Self {
        Self {
            service_type: service.service_type.as_str().to_string(),
            name: service.name.clone(),
            duration_minutes: service.duration_minutes(),
            price: service.price.clone(),
        }
    }
}

fn appointment_to_response(
    hours: &BusinessHours,
    appointment: &Appointment,
) -> AppointmentResponse {
    let (date, time): (NaiveDate, NaiveTime) = hours.to_local(appointment.start);
    AppointmentResponse {
        appointment_id: appointment.appointment_id,
        technician_id: appointment.technician_id,
        start: appointment.start,
        date,
        time: format_time_slot(time),
        duration_minutes: appointment.duration_minutes,
        status: appointment.status,
    }
}

fn receipt_to_response(hours: &BusinessHours, receipt: BookingReceipt) -> BookingResponse {
    let (date, time): (NaiveDate, NaiveTime) = hours.to_local(receipt.start);
    BookingResponse {
        appointment_id: receipt.appointment_id,
        access_code: receipt.access_code,
        start: receipt.start,
        date,
        time: format_time_slot(time),
        duration_minutes: receipt.duration_minutes,
        service_name: receipt.service_name,
        technician: receipt.technician_label,
    }
}

fn days_to_response(hours: &BusinessHours, days: Vec<DaySlots>) -> Vec<DayResponse> {
    days.into_iter()
        .map(|day| DayResponse {
            date: day.date,
            slots: day
                .slots
                .into_iter()
                .map(|slot| SlotResponse {
                    time: format_time_slot(hours.to_local(slot.start).1),
                    start: slot.start,
                    available: slot.available,
                })
                .collect(),
        })
        .collect()
}

/// Finds an active catalog service by its key.
async fn resolve_service(app_state: &AppState, key: &str) -> Result<Service, HttpError> {
    let service_type: ServiceType = key.parse()?;
    app_state
        .store
        .list_active_services()
        .await?
        .into_iter()
        .find(|service| service.service_type == service_type)
        .ok_or_else(|| HttpError::not_found(format!("Service '{key}' is not offered")))
}

/// Maps an optional technician ID to a choice, requiring the technician to be active.
async fn resolve_technician(
    app_state: &AppState,
    technician_id: Option<i64>,
) -> Result<TechnicianChoice, HttpError> {
    let Some(technician_id) = technician_id else {
        return Ok(TechnicianChoice::Any);
    };
    app_state
        .store
        .list_active_technicians()
        .await?
        .into_iter()
        .find(|technician| technician.technician_id == technician_id)
        .map(TechnicianChoice::Specific)
        .ok_or_else(|| HttpError::not_found(format!("Technician {technician_id} not found")))
}

/// Handler for GET /services endpoint.
async fn handle_list_services(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<Vec<ServiceResponse>>, HttpError> {
    info!("Handling list_services request");
    let services: Vec<Service> = app_state.store.list_active_services().await?;
    Ok(Json(services.iter().map(ServiceResponse::from).collect()))
}

/// Handler for GET /technicians endpoint.
async fn handle_list_technicians(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<Vec<TechnicianResponse>>, HttpError> {
    info!("Handling list_technicians request");
    let technicians: Vec<Technician> = app_state.store.list_active_technicians().await?;
    Ok(Json(
        technicians
            .into_iter()
            .map(|technician| TechnicianResponse {
                technician_id: technician.technician_id,
                name: technician.name,
                specialty: technician.specialty,
            })
            .collect(),
    ))
}

/// Handler for GET /availability endpoint.
async fn handle_availability(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, HttpError> {
    info!(
        service_type = %query.service_type,
        technician_id = ?query.technician_id,
        "Handling availability request"
    );

    let service: Service = resolve_service(&app_state, &query.service_type).await?;
    let technician: TechnicianChoice = resolve_technician(&app_state, query.technician_id).await?;

    let now: DateTime<Utc> = Utc::now();
    let from: NaiveDate = query
        .from
        .unwrap_or_else(|| app_state.hours.to_local(now).0);
    let days: u64 = query
        .days
        .unwrap_or(DEFAULT_AVAILABILITY_DAYS)
        .clamp(1, MAX_AVAILABILITY_DAYS);
    let until: NaiveDate = from.checked_add_days(Days::new(days)).ok_or_else(|| HttpError {
        status: StatusCode::BAD_REQUEST,
        message: format!("Date range starting {from} is out of range"),
    })?;

    let slots: Vec<DaySlots> = app_state
        .availability
        .available_slots(from, until, &service, &technician, now)
        .await?;

    Ok(Json(AvailabilityResponse {
        service_type: query.service_type,
        duration_minutes: service.duration_minutes(),
        technician: technician.label().to_string(),
        days: days_to_response(&app_state.hours, slots),
    }))
}

/// Handler for POST /bookings endpoint.
async fn handle_create_booking(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), HttpError> {
    info!(
        service_type = %req.service_type,
        date = %req.date,
        time = %req.time,
        "Handling create_booking request"
    );

    let service: Service = resolve_service(&app_state, &req.service_type).await?;
    let technician: TechnicianChoice = resolve_technician(&app_state, req.technician_id).await?;
    let time: NaiveTime = parse_time_slot(&req.time)?;

    let mut session: BookingSession = BookingSession::new();
    session.select_service(service);
    session.select_technician(technician);
    session.select_slot(req.date, time);
    session.client = ClientDetails {
        name: req.name,
        phone: req.phone,
        email: req.email,
        consent: req.consent,
    };
    session.vehicle = VehicleDetails {
        plate: req.plate,
        make: req.make,
        model: req.model,
        year: req.year,
        reason: req.reason,
    };

    let receipt: BookingReceipt = app_state.committer.commit(&session, Utc::now()).await?;
    Ok((
        StatusCode::CREATED,
        Json(receipt_to_response(&app_state.hours, receipt)),
    ))
}

/// Handler for GET /appointments endpoint.
async fn handle_list_appointments(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<PhoneQuery>,
) -> Result<Json<Vec<AppointmentResponse>>, HttpError> {
    info!("Handling list_appointments request");
    let appointments: Vec<Appointment> =
        upcoming_appointments(&app_state.store, &query.phone, Utc::now()).await?;
    Ok(Json(
        appointments
            .iter()
            .map(|appointment| appointment_to_response(&app_state.hours, appointment))
            .collect(),
    ))
}

/// Handler for GET /appointments/next endpoint.
async fn handle_next_appointment(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<PhoneQuery>,
) -> Result<Json<AppointmentResponse>, HttpError> {
    info!("Handling next_appointment request");
    next_confirmed_appointment(&app_state.store, &query.phone, Utc::now())
        .await?
        .map(|appointment| Json(appointment_to_response(&app_state.hours, &appointment)))
        .ok_or_else(|| HttpError::not_found(String::from("No upcoming confirmed appointment")))
}

/// Handler for POST /appointments/{id}/cancel endpoint.
async fn handle_cancel_appointment(
    AxumState(app_state): AxumState<AppState>,
    Path(appointment_id): Path<i64>,
) -> Result<Json<CancelResponse>, HttpError> {
    info!(appointment_id, "Handling cancel_appointment request");
    let outcome: CancelOutcome = cancel_appointment(&app_state.store, appointment_id).await?;
    Ok(Json(CancelResponse {
        appointment_id,
        outcome,
    }))
}

/// Handler for POST /appointments/{id}/complete endpoint.
async fn handle_complete_appointment(
    AxumState(app_state): AxumState<AppState>,
    Path(appointment_id): Path<i64>,
) -> Result<Json<StatusResponse>, HttpError> {
    info!(appointment_id, "Handling complete_appointment request");
    complete_appointment(&app_state.store, appointment_id).await?;
    Ok(Json(StatusResponse {
        appointment_id,
        status: AppointmentStatus::Completed,
    }))
}

/// Handler for POST /appointments/{id}/no_show endpoint.
async fn handle_mark_no_show(
    AxumState(app_state): AxumState<AppState>,
    Path(appointment_id): Path<i64>,
) -> Result<Json<StatusResponse>, HttpError> {
    info!(appointment_id, "Handling mark_no_show request");
    mark_no_show(&app_state.store, appointment_id).await?;
    Ok(Json(StatusResponse {
        appointment_id,
        status: AppointmentStatus::NoShow,
    }))
}

/// Builds the application router.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/services", get(handle_list_services))
        .route("/technicians", get(handle_list_technicians))
        .route("/availability", get(handle_availability))
        .route("/bookings", post(handle_create_booking))
        .route("/appointments", get(handle_list_appointments))
        .route("/appointments/next", get(handle_next_appointment))
        .route(
            "/appointments/{appointment_id}/cancel",
            post(handle_cancel_appointment),
        )
        .route(
            "/appointments/{appointment_id}/complete",
            post(handle_complete_appointment),
        )
        .route(
            "/appointments/{appointment_id}/no_show",
            post(handle_mark_no_show),
        )
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Garage Booking Server");

    let hours: BusinessHours = args.business_hours()?;
    info!(
        timezone = %hours.timezone(),
        open = %hours.open(),
        close = %hours.close(),
        "Business hours configured"
    );

    let mut persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    if args.seed_catalog {
        seed::seed_catalog(&mut persistence)?;
    }

    let notifier: Arc<dyn Notifier> = if let Some(url) = &args.notify_webhook {
        info!("Booking notifications go to: {}", url);
        Arc::new(WebhookNotifier::new(url)?)
    } else {
        Arc::new(NoopNotifier)
    };

    let app: Router = build_router(AppState::new(persistence, hours, notifier));

    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
