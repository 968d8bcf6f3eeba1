use std::path::PathBuf;

use crate::error::Result;
pub use clap::Parser;

#[derive(Debug, Clone, clap::Parser)]
pub struct ServerConfig {
    #[arg(
        short,
        long,
        default_value_t = 3000,
        env = "STAYRATE_LISTEN_PORT",
        help = "Port to listen on"
    )]
    pub port: u16,

    #[arg(
        short,
        long,
        default_value = "127.0.0.1",
        env = "STAYRATE_LISTEN_ADDRESS",
        help = "Address to listen on"
    )]
    pub listen_address: String,

    #[arg(
        long,
        env = "STAYRATE_DATABASE_URL",
        help = "Database URL e.g. sqlite://file.db, default is sqlite://[data-dir]/stayrate.db, where data-dir is set by --data-dir"
    )]
    database_url: Option<String>,

    #[arg(
        long,
        env = "STAYRATE_DATA_DIR",
        default_value = "data",
        help = "Data directory for the database file"
    )]
    data_dir: String,

    #[arg(
        long,
        env = "STAYRATE_DEFAULT_PAGE_SIZE",
        default_value = "100",
        help = "Default page size"
    )]
    pub default_page_size: u32,

    #[arg(long, env = "STAYRATE_CORS", help = "Enable permissive CORS")]
    pub cors: bool,
}

impl ServerConfig {
    pub fn load() -> Result<Self> {
        ServerConfig::try_parse().map_err(|e| e.into())
    }

    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    pub fn database_url(&self) -> String {
        self.database_url
            .clone()
            .unwrap_or_else(|| format!("sqlite://{}/stayrate.db", self.data_dir))
    }
}
