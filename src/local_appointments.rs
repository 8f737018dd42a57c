use crate::{
    backend::AppointmentBackend,
    error::StoreError,
    types::{Appointment, SlotKey},
};
use dashmap::{mapref::entry::Entry, DashMap};
use std::sync::{Arc, RwLock};

/// In-memory appointment store. Not durable: contents are lost on restart.
///
/// Each key lives in one shard of the map, so a check-and-set only locks that
/// shard and bookings for unrelated slots proceed in parallel. Writers share
/// `snapshot_gate`; a listing holds it exclusively so that no write lands while
/// the shards are walked.
#[derive(Debug, Clone, Default)]
pub struct LocalAppointments {
    appointments: Arc<DashMap<SlotKey, Appointment>>,
    snapshot_gate: Arc<RwLock<()>>,
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Unavailable("in-memory store lock poisoned".into())
}

impl LocalAppointments {
    /// Runs `read` while no writer can modify the map.
    fn with_snapshot<R>(
        &self,
        read: impl FnOnce(&DashMap<SlotKey, Appointment>) -> R,
    ) -> Result<R, StoreError> {
        let _snapshot = self.snapshot_gate.write().map_err(poisoned)?;
        Ok(read(&self.appointments))
    }
}

impl AppointmentBackend for LocalAppointments {
    fn appointments(&self) -> Result<Vec<Appointment>, StoreError> {
        let mut appointments: Vec<Appointment> = self.with_snapshot(|appointments| {
            appointments
                .iter()
                .map(|entry| entry.value().clone())
                .collect()
        })?;
        appointments.sort_unstable_by_key(|appointment| appointment.key);
        Ok(appointments)
    }

    fn try_insert(&self, key: SlotKey, occupant_name: String) -> Result<Appointment, StoreError> {
        let _writing = self.snapshot_gate.read().map_err(poisoned)?;
        match self.appointments.entry(key) {
            Entry::Occupied(_) => Err(StoreError::Conflict(key)),
            Entry::Vacant(slot) => {
                let appointment = Appointment { key, occupant_name };
                slot.insert(appointment.clone());
                Ok(appointment)
            }
        }
    }

    fn remove(&self, key: SlotKey) -> Result<bool, StoreError> {
        let _writing = self.snapshot_gate.read().map_err(poisoned)?;
        Ok(self.appointments.remove(&key).is_some())
    }
}
