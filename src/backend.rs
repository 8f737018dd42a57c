use crate::{
    error::StoreError,
    types::{Appointment, SlotKey},
};

/// Authoritative keeper of booked slots. Implementations are the only writers
/// of appointment records.
pub trait AppointmentBackend: Clone + Send + Sync + 'static {
    /// All appointments, ordered by date and then hour.
    fn appointments(&self) -> Result<Vec<Appointment>, StoreError>;

    /// Atomic check-and-set: stores the appointment only if `key` is free,
    /// otherwise fails with [`StoreError::Conflict`].
    fn try_insert(&self, key: SlotKey, occupant_name: String) -> Result<Appointment, StoreError>;

    /// Returns whether an appointment existed for `key`.
    fn remove(&self, key: SlotKey) -> Result<bool, StoreError>;
}
