use std::net::SocketAddr;

use anyhow::Result;
use clap::Parser;
use common::config::LoggingConfig;

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
/// The API is the backend for the Photogram app
pub struct AppConfig {
    /// The path to the config file
    pub config_file: Option<String>,

    /// Name of this instance
    pub name: String,

    /// If we should export the GraphQL schema, if set to true, the schema will be exported to the stdout, and the program will exit.
    pub export_gql: bool,

    ///  The logging config
    pub logging: LoggingConfig,

    /// API Config
    pub api: ApiConfig,

    /// Database Config
    pub database: DatabaseConfig,

    /// JWT Config
    pub jwt: JwtConfig,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Bind address for the API
    pub bind_address: SocketAddr,

    /// Maximum complexity of a single GraphQL query
    pub max_complexity: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0, 0, 0, 0, 0], 4000)),
            max_complexity: 200,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    Postgres,
    /// Keeps everything in process memory, nothing survives a restart.
    Memory,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// The database URL to use
    pub uri: String,

    /// Which store implementation to run against
    pub backend: DatabaseBackend,

    /// Run the embedded migrations on startup
    pub migrate: bool,

    /// Maximum number of pooled connections
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            uri: "postgres://root@localhost:5432/photogram_dev".to_string(),
            backend: DatabaseBackend::Postgres,
            migrate: true,
            max_connections: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct JwtConfig {
    /// JWT secret
    pub secret: String,

    /// JWT issuer
    pub issuer: String,

    /// How long an issued token stays valid, in seconds
    pub session_duration: u64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            issuer: "photogram".to_string(),
            secret: "photogram".to_string(),
            session_duration: 60 * 60 * 24 * 7,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_file: Some("config".to_string()),
            name: "photogram-api".to_string(),
            export_gql: false,
            logging: LoggingConfig::default(),
            api: ApiConfig::default(),
            database: DatabaseConfig::default(),
            jwt: JwtConfig::default(),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "photogram-api", version, about = "Photogram GraphQL API server")]
struct Cli {
    /// The path to the config file
    #[arg(long, env = "PHOTOGRAM_CONFIG_FILE")]
    config_file: Option<String>,

    /// Print the GraphQL schema and exit
    #[arg(long)]
    export_gql: bool,
}

impl AppConfig {
    pub fn parse() -> Result<Self> {
        let cli = Cli::parse();

        // An explicitly passed file must exist, the default one is optional.
        let required = cli.config_file.is_some();
        let config_file = cli.config_file.or(Self::default().config_file);

        let (mut config, config_file) =
            common::config::parse::<Self>("PHOTOGRAM", config_file.as_deref(), required)?;

        config.config_file = config_file;
        config.export_gql |= cli.export_gql;

        Ok(config)
    }
}
