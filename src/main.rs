use std::time::Duration;

use crate::{
    configuration::Configuration, configuration_handler::ConfigurationHandler,
    database_interface::DatabaseInterface, http::create_app,
    local_appointments::LocalAppointments,
};
use tokio::time::sleep;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod backend;
mod configuration;
mod configuration_handler;
mod database_interface;
mod error;
mod http;
mod local_appointments;
mod scheduler;
mod schema;
#[cfg(test)]
mod testutils;
mod types;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let configuration = ConfigurationHandler::parse_arguments();

    let address = format!("{}:{}", configuration.host(), configuration.port());
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!(%address, "Appointment scheduler listening");

    let app = if let Some(database_url) = configuration.database_url() {
        let backend = loop {
            match DatabaseInterface::new(&database_url) {
                Ok(backend) => {
                    info!("Successfully connected to database");
                    break backend;
                }
                Err(err) => {
                    error!(?err, "Failed to establish database connection. Retry in 1 sec. Omit the database URL to run with in-memory appointments.");
                    sleep(Duration::from_secs(1)).await;
                }
            }
        };
        create_app(backend)
    } else {
        warn!("No database configured, appointments are kept in memory only");
        create_app(LocalAppointments::default())
    };

    axum::serve(listener, app).await?;
    Ok(())
}
