use crate::configuration::Configuration;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(version, about = "Books one-hour appointment slots")]
pub struct ConfigurationHandler {
    /// Address to listen on
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    #[arg(short, long, env = "PORT", default_value = "3000")]
    port: String,

    /// Postgres connection URL. Appointments are kept in memory when omitted
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,
}

impl ConfigurationHandler {
    pub fn parse_arguments() -> Self {
        dotenvy::dotenv().ok();
        Self::parse()
    }
}

impl Configuration for ConfigurationHandler {
    fn host(&self) -> String {
        self.host.clone()
    }

    fn port(&self) -> String {
        self.port.clone()
    }

    fn database_url(&self) -> Option<String> {
        self.database_url.clone()
    }
}
