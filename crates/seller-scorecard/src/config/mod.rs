use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::scoring::bonus::{MultiplierSchedule, MultiplierTier};
use crate::scoring::scorecard::DEFAULT_BASE_SALARY;

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
    pub scoring: ScoringConfig,
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

        let multiplier_schedule = match env::var("APP_BONUS_TIERS") {
            Ok(raw) => parse_bonus_tiers(&raw)?,
            Err(_) => MultiplierSchedule::standard(),
        };

        let default_base_salary = match env::var("APP_DEFAULT_BASE_SALARY") {
            Ok(raw) => parse_base_salary(&raw)?,
            Err(_) => DEFAULT_BASE_SALARY,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            scoring: ScoringConfig {
                multiplier_schedule,
                default_base_salary,
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

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Payout policy applied by the scorecard engine.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    pub multiplier_schedule: MultiplierSchedule,
    /// Used when a stored seller snapshot carries no salary.
    pub default_base_salary: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            multiplier_schedule: MultiplierSchedule::standard(),
            default_base_salary: DEFAULT_BASE_SALARY,
        }
    }
}

/// Parses `80:0.8,100:1.0` into a multiplier schedule.
fn parse_bonus_tiers(raw: &str) -> Result<MultiplierSchedule, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidBonusTiers {
        value: raw.to_string(),
        reason,
    };

    let mut tiers = Vec::new();
    for entry in raw.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
        let (threshold, multiplier) = entry
            .split_once(':')
            .ok_or_else(|| invalid(format!("'{}' is not of the form percent:multiplier", entry)))?;

        let min_attainment_percent = threshold
            .trim()
            .parse::<f64>()
            .map_err(|_| invalid(format!("'{}' is not a number", threshold.trim())))?;
        let multiplier = multiplier
            .trim()
            .parse::<f64>()
            .map_err(|_| invalid(format!("'{}' is not a number", multiplier.trim())))?;

        tiers.push(MultiplierTier {
            min_attainment_percent,
            multiplier,
        });
    }

    if tiers.is_empty() {
        return Err(invalid("no tiers declared".to_string()));
    }

    MultiplierSchedule::new(tiers).map_err(|err| invalid(err.to_string()))
}

fn parse_base_salary(raw: &str) -> Result<f64, ConfigError> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(value),
        _ => Err(ConfigError::InvalidBaseSalary {
            value: raw.to_string(),
        }),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidBonusTiers { value: String, reason: String },
    InvalidBaseSalary { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidBonusTiers { value, reason } => {
                write!(f, "APP_BONUS_TIERS '{}' is invalid: {}", value, reason)
            }
            ConfigError::InvalidBaseSalary { value } => {
                write!(
                    f,
                    "APP_DEFAULT_BASE_SALARY '{}' must be a positive number",
                    value
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidBonusTiers { .. }
            | ConfigError::InvalidBaseSalary { .. } => None,
        }
    }
}
