use crate::schema::appointments;
use crate::{
    backend::AppointmentBackend,
    error::StoreError,
    types::{Appointment, SlotKey},
};
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::result::{ConnectionError, DatabaseErrorKind, Error as DieselError};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::error;

#[derive(Queryable, Selectable, Insertable)]
#[diesel(table_name = appointments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
struct AppointmentRow {
    date: NaiveDate,
    hour: i16,
    name: String,
}

impl TryFrom<AppointmentRow> for Appointment {
    type Error = StoreError;

    fn try_from(row: AppointmentRow) -> Result<Self, Self::Error> {
        let hour = u8::try_from(row.hour)
            .map_err(|_| StoreError::Unavailable(format!("stored hour {} is invalid", row.hour)))?;
        let key = SlotKey::new(row.date, hour)
            .map_err(|err| StoreError::Unavailable(err.to_string()))?;
        Ok(Appointment {
            key,
            occupant_name: row.name,
        })
    }
}

/// Durable appointment store on Postgres. The `(date, hour)` primary key
/// makes a plain `INSERT` the check-and-set.
#[derive(Clone)]
pub struct DatabaseInterface {
    connection: Arc<Mutex<PgConnection>>,
}

impl DatabaseInterface {
    pub fn new(database_url: &str) -> Result<Self, ConnectionError> {
        let connection = Self::establish_connection(database_url)?;
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    fn establish_connection(database_url: &str) -> Result<PgConnection, ConnectionError> {
        PgConnection::establish(database_url)
    }

    fn connection(&self) -> Result<MutexGuard<'_, PgConnection>, StoreError> {
        self.connection
            .lock()
            .map_err(|_| StoreError::Unavailable("database connection lock poisoned".into()))
    }
}

fn unavailable(err: DieselError, context: &str) -> StoreError {
    error!(?err, "{context}");
    StoreError::Unavailable(format!("{context}: {err}"))
}

impl AppointmentBackend for DatabaseInterface {
    fn appointments(&self) -> Result<Vec<Appointment>, StoreError> {
        let mut connection = self.connection()?;

        let rows: Vec<AppointmentRow> = appointments::table
            .order((appointments::date.asc(), appointments::hour.asc()))
            .select(AppointmentRow::as_select())
            .load(&mut *connection)
            .map_err(|err| unavailable(err, "Failed to read appointments from database"))?;

        rows.into_iter().map(Appointment::try_from).collect()
    }

    fn try_insert(&self, key: SlotKey, occupant_name: String) -> Result<Appointment, StoreError> {
        let mut connection = self.connection()?;

        let row = AppointmentRow {
            date: key.date(),
            hour: i16::from(key.hour()),
            name: occupant_name,
        };
        let result = diesel::insert_into(appointments::table)
            .values(&row)
            .execute(&mut *connection);

        match result {
            Ok(_) => Ok(Appointment {
                key,
                occupant_name: row.name,
            }),
            Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                Err(StoreError::Conflict(key))
            }
            Err(err) => Err(unavailable(err, "Appointment can't be inserted")),
        }
    }

    fn remove(&self, key: SlotKey) -> Result<bool, StoreError> {
        let mut connection = self.connection()?;

        diesel::delete(appointments::table.find((key.date(), i16::from(key.hour()))))
            .execute(&mut *connection)
            .map(|deleted| deleted > 0)
            .map_err(|err| unavailable(err, "Deletion of appointment failed"))
    }
}
