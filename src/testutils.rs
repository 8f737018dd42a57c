use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc, Mutex,
};

use crate::{
    backend::AppointmentBackend,
    error::StoreError,
    types::{Appointment, SlotKey},
};

pub struct MockAppointmentBackendInner {
    pub success: AtomicBool,
    pub calls_to_appointments: AtomicU64,
    pub calls_to_try_insert: AtomicU64,
    pub calls_to_remove: AtomicU64,
    pub appointments: Mutex<Vec<Appointment>>,
}

#[derive(Clone)]
pub struct MockAppointmentBackend(pub Arc<MockAppointmentBackendInner>);

impl MockAppointmentBackendInner {
    fn new() -> Self {
        Self {
            success: AtomicBool::new(true),
            calls_to_appointments: AtomicU64::default(),
            calls_to_try_insert: AtomicU64::default(),
            calls_to_remove: AtomicU64::default(),
            appointments: Mutex::default(),
        }
    }
}

impl MockAppointmentBackend {
    pub fn new() -> Self {
        Self(Arc::new(MockAppointmentBackendInner::new()))
    }

    fn result(&self) -> Result<(), StoreError> {
        match self.0.success.load(Ordering::SeqCst) {
            true => Ok(()),
            false => Err(StoreError::Unavailable("Supposed to fail".into())),
        }
    }
}

impl AppointmentBackend for MockAppointmentBackend {
    fn appointments(&self) -> Result<Vec<Appointment>, StoreError> {
        self.0.calls_to_appointments.fetch_add(1, Ordering::SeqCst);
        self.result()?;
        Ok(self.0.appointments.lock().unwrap().clone())
    }

    fn try_insert(&self, key: SlotKey, occupant_name: String) -> Result<Appointment, StoreError> {
        self.0.calls_to_try_insert.fetch_add(1, Ordering::SeqCst);
        self.result()?;
        Ok(Appointment { key, occupant_name })
    }

    fn remove(&self, _key: SlotKey) -> Result<bool, StoreError> {
        self.0.calls_to_remove.fetch_add(1, Ordering::SeqCst);
        self.result()?;
        Ok(true)
    }
}
