use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::catalog::{ProgrammeFamily, DEFAULT_TTL_HOURS};

const DEFAULT_REFRESH_CHECK_SECS: u64 = 300;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub catalog: CatalogConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            catalog: CatalogConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where the programme catalog lives and how long a loaded snapshot stays fresh.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub root: PathBuf,
    pub degree_db: String,
    pub diploma_db: String,
    pub certificate_db: String,
    pub medical_training_db: String,
    pub ttl_hours: u32,
    pub refresh_check_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./catalog"),
            degree_db: "courses_2".to_string(),
            diploma_db: "dp_courses".to_string(),
            certificate_db: "cert_courses".to_string(),
            medical_training_db: "kmtc".to_string(),
            ttl_hours: DEFAULT_TTL_HOURS,
            refresh_check_secs: DEFAULT_REFRESH_CHECK_SECS,
        }
    }
}

impl CatalogConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let ttl_hours = match env::var("CACHE_TTL_HOURS") {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|hours| *hours > 0)
                .ok_or(ConfigError::InvalidCacheTtl)?,
            Err(_) => defaults.ttl_hours,
        };

        let refresh_check_secs = match env::var("CATALOG_REFRESH_CHECK_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidRefreshInterval)?,
            Err(_) => defaults.refresh_check_secs,
        };

        Ok(Self {
            root: env::var("CATALOG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.root),
            degree_db: env::var("CATALOG_DEGREE_DB").unwrap_or(defaults.degree_db),
            diploma_db: env::var("CATALOG_DIPLOMA_DB").unwrap_or(defaults.diploma_db),
            certificate_db: env::var("CATALOG_CERT_DB").unwrap_or(defaults.certificate_db),
            medical_training_db: env::var("CATALOG_KMTC_DB")
                .unwrap_or(defaults.medical_training_db),
            ttl_hours,
            refresh_check_secs,
        })
    }

    pub fn database_for(&self, family: ProgrammeFamily) -> &str {
        match family {
            ProgrammeFamily::Degree => &self.degree_db,
            ProgrammeFamily::Diploma => &self.diploma_db,
            ProgrammeFamily::Certificate => &self.certificate_db,
            ProgrammeFamily::MedicalTraining => &self.medical_training_db,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidCacheTtl,
    InvalidRefreshInterval,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidCacheTtl => {
                write!(f, "CACHE_TTL_HOURS must be a positive whole number")
            }
            ConfigError::InvalidRefreshInterval => {
                write!(f, "CATALOG_REFRESH_CHECK_SECS must be a positive whole number")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidCacheTtl
            | ConfigError::InvalidRefreshInterval => None,
        }
    }
}
