use crate::{
    backend::AppointmentBackend,
    error::{SchedulingError, StoreError},
    types::{Appointment, SlotKey, HOURS_PER_DAY},
};
use chrono::NaiveDate;
use std::{collections::HashSet, sync::Arc};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// Business rules on top of an [`AppointmentBackend`].
///
/// Holds no booking state of its own: every answer is derived from a fresh
/// read of the backend. The watch channel only signals that the backend
/// changed, subscribers are expected to read the current state themselves.
#[derive(Debug, Clone)]
pub struct Scheduler<T: AppointmentBackend> {
    backend: T,
    changes: Arc<watch::Sender<()>>,
}

impl<T: AppointmentBackend> Scheduler<T> {
    pub fn new(backend: T) -> Self {
        let (changes, _) = watch::channel(());
        Self {
            backend,
            changes: Arc::new(changes),
        }
    }

    pub fn appointments(&self) -> Result<Vec<Appointment>, SchedulingError> {
        Ok(self.backend.appointments()?)
    }

    /// Hours of `date` without an appointment, ascending.
    pub fn available_slots(&self, date: NaiveDate) -> Result<Vec<u8>, SchedulingError> {
        let booked: HashSet<u8> = self
            .backend
            .appointments()?
            .iter()
            .filter(|appointment| appointment.key.date() == date)
            .map(|appointment| appointment.key.hour())
            .collect();

        debug!(%date, booked = booked.len(), "Derived available slots");
        Ok((0..HOURS_PER_DAY)
            .filter(|hour| !booked.contains(hour))
            .collect())
    }

    pub fn book_appointment(
        &self,
        date: NaiveDate,
        hour: u8,
        occupant_name: &str,
    ) -> Result<Appointment, SchedulingError> {
        let key = SlotKey::new(date, hour)?;
        let occupant_name = occupant_name.trim();
        if occupant_name.is_empty() {
            warn!(%key, "Rejected booking without occupant name");
            return Err(SchedulingError::InvalidInput(
                "occupant name must not be empty".into(),
            ));
        }

        match self.backend.try_insert(key, occupant_name.to_string()) {
            Ok(appointment) => {
                info!(%key, occupant = occupant_name, "Appointment booked");
                self.notify();
                Ok(appointment)
            }
            Err(err @ StoreError::Conflict(_)) => {
                warn!(%key, "Slot is already booked");
                Err(err.into())
            }
            Err(err) => {
                error!(%key, ?err, "Failed to book appointment");
                Err(err.into())
            }
        }
    }

    /// Returns whether an appointment was removed. Cancelling a free slot is a no-op.
    pub fn cancel_appointment(&self, date: NaiveDate, hour: u8) -> Result<bool, SchedulingError> {
        let key = SlotKey::new(date, hour)?;

        let removed = self.backend.remove(key).map_err(|err| {
            error!(%key, ?err, "Failed to cancel appointment");
            err
        })?;
        if removed {
            info!(%key, "Appointment cancelled");
            self.notify();
        } else {
            debug!(%key, "No appointment to cancel");
        }
        Ok(removed)
    }

    /// Ticks after every successful booking or removing cancellation.
    pub fn subscribe(&self) -> watch::Receiver<()> {
        self.changes.subscribe()
    }

    fn notify(&self) {
        self.changes.send_replace(());
    }
}
