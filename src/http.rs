use crate::backend::AppointmentBackend;
use crate::error::SchedulingError;
use crate::scheduler::Scheduler;
use crate::types::{Appointment, SlotKey};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::routing::delete;
use axum::{extract::State, http::StatusCode, Json};
use axum::{routing::get, Router};
use chrono::NaiveDate;
use futures::{Stream, StreamExt};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tokio_stream::wrappers::WatchStream;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use validator::Validate;

lazy_static! {
    static ref TIME_PATTERN: Regex =
        Regex::new(r"^\d{4}-\d{2}-\d{2} \d{1,2}:00$").expect("time pattern is a valid regex");
}

#[derive(Clone)]
pub struct AppState<T: AppointmentBackend> {
    scheduler: Scheduler<T>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
struct BookingRequest {
    #[validate(regex(path = *TIME_PATTERN, message = "time must look like 'YYYY-MM-DD H:00'"))]
    time: String,
    #[validate(length(min = 1, message = "name must not be empty"))]
    name: String,
}

#[derive(Debug, Clone, Deserialize)]
struct AvailabilityQuery {
    date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct AvailabilityResponse {
    date: NaiveDate,
    hours: Vec<u8>,
    slots: Vec<String>,
}

pub fn create_app<T: AppointmentBackend>(backend: T) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let state = AppState {
        scheduler: Scheduler::new(backend),
    };

    Router::new()
        .route(
            "/api/appointments",
            get(list_appointments::<T>).post(book_appointment::<T>),
        )
        .route("/api/appointments/:time", delete(cancel_appointment::<T>))
        .route("/api/availability", get(available_slots::<T>))
        .route("/api/events", get(appointment_events::<T>))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

async fn list_appointments<T: AppointmentBackend>(
    State(state): State<AppState<T>>,
) -> Result<Json<Vec<Appointment>>, SchedulingError> {
    Ok(Json(state.scheduler.appointments()?))
}

async fn book_appointment<T: AppointmentBackend>(
    State(state): State<AppState<T>>,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Appointment>), SchedulingError> {
    let Json(booking) =
        payload.map_err(|rejection| SchedulingError::InvalidInput(rejection.body_text()))?;
    booking
        .validate()
        .map_err(|err| SchedulingError::InvalidInput(err.to_string()))?;

    let key: SlotKey = booking.time.parse()?;
    let appointment = state
        .scheduler
        .book_appointment(key.date(), key.hour(), &booking.name)?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

async fn cancel_appointment<T: AppointmentBackend>(
    State(state): State<AppState<T>>,
    Path(time): Path<String>,
) -> Result<StatusCode, SchedulingError> {
    let key: SlotKey = time.parse()?;
    state.scheduler.cancel_appointment(key.date(), key.hour())?;
    Ok(StatusCode::NO_CONTENT)
}

async fn available_slots<T: AppointmentBackend>(
    State(state): State<AppState<T>>,
    query: Result<Query<AvailabilityQuery>, QueryRejection>,
) -> Result<Json<AvailabilityResponse>, SchedulingError> {
    let Query(AvailabilityQuery { date }) =
        query.map_err(|rejection| SchedulingError::InvalidInput(rejection.body_text()))?;

    let hours = state.scheduler.available_slots(date)?;
    let slots = hours.iter().map(|hour| format!("{hour}:00")).collect();
    Ok(Json(AvailabilityResponse { date, hours, slots }))
}

/// Streams the full appointment list once on connect and again after every change.
async fn appointment_events<T: AppointmentBackend>(
    State(state): State<AppState<T>>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let scheduler = state.scheduler;
    let stream = WatchStream::new(scheduler.subscribe()).map(move |()| {
        match scheduler.appointments() {
            Ok(appointments) => Event::default()
                .event("appointments")
                .json_data(appointments),
            Err(err) => Ok(Event::default().event("error").data(err.client_message())),
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
