use crate::workflows::diagnosis::{AcceleratorPolicy, Domain};
use crate::workflows::EngineOptions;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

const DEFAULT_STATE_PATH: &str = ".longevity/state.json";

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
    pub engine: EngineConfig,
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

        let state_path = env::var("APP_STATE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_STATE_PATH));
        let user_id = env::var("APP_USER_ID")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        let accelerator_domains = match env::var("APP_ACCELERATOR_DOMAINS") {
            Ok(raw) => parse_domains(&raw)?,
            Err(_) => Domain::ordered().to_vec(),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            engine: EngineConfig {
                state_path,
                user_id,
                accelerator_domains,
            },
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

/// Where state lives and how the engine selects accelerators.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub state_path: PathBuf,
    pub user_id: Option<String>,
    /// Domains eligible as accelerator, in tie-break order.
    pub accelerator_domains: Vec<Domain>,
}

impl EngineConfig {
    pub fn options(&self) -> EngineOptions {
        EngineOptions {
            accelerator: AcceleratorPolicy::new(self.accelerator_domains.clone()),
            user_id: self.user_id.clone(),
        }
    }
}

fn parse_domains(raw: &str) -> Result<Vec<Domain>, ConfigError> {
    let domains = raw
        .split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| {
            Domain::from_key(value).ok_or_else(|| ConfigError::UnknownDomain(value.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if domains.is_empty() {
        return Ok(Domain::ordered().to_vec());
    }

    Ok(domains)
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    UnknownDomain(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::UnknownDomain(value) => write!(
                f,
                "APP_ACCELERATOR_DOMAINS contains unknown domain '{}'",
                value
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::UnknownDomain(_) => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_HOST");
        env::remove_var("APP_PORT");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("APP_STATE_PATH");
        env::remove_var("APP_USER_ID");
        env::remove_var("APP_ACCELERATOR_DOMAINS");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.engine.state_path, PathBuf::from(DEFAULT_STATE_PATH));
        assert!(config.engine.user_id.is_none());
        assert_eq!(config.engine.accelerator_domains, Domain::ordered().to_vec());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
    }

    #[test]
    fn accelerator_domains_narrow_the_policy() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ACCELERATOR_DOMAINS", "energia, attention,temps");
        env::set_var("APP_USER_ID", "  user-42 ");
        let config = AppConfig::load().expect("config loads");
        let options = config.engine.options();
        assert_eq!(
            options.accelerator.domains(),
            &[Domain::Energy, Domain::Attention, Domain::PerceivedTime]
        );
        assert_eq!(options.user_id.as_deref(), Some("user-42"));
        reset_env();
    }

    #[test]
    fn unknown_accelerator_domain_is_rejected() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ACCELERATOR_DOMAINS", "energia,mindset");
        match AppConfig::load() {
            Err(ConfigError::UnknownDomain(value)) => assert_eq!(value, "mindset"),
            other => panic!("expected unknown domain error, got {other:?}"),
        }
        reset_env();
    }
}
