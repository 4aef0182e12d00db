use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::workflows::ftpr::{IntakePolicy, Money};

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
    pub intake: IntakePolicy,
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
            intake: load_intake_policy()?,
        })
    }
}

/// Ten years; longer lead times are treated as a misconfiguration.
const MAX_LEAD_DAYS: i64 = 3_650;

fn load_intake_policy() -> Result<IntakePolicy, ConfigError> {
    let defaults = IntakePolicy::default();

    let referral_discount = env_number(
        "INTAKE_REFERRAL_DISCOUNT_CENTS",
        defaults.referral_discount.cents(),
    )?;
    if referral_discount < 0 {
        return Err(ConfigError::InvalidIntakeSetting {
            key: "INTAKE_REFERRAL_DISCOUNT_CENTS",
            value: referral_discount.to_string(),
        });
    }

    let minimum_lead_days = env_number("INTAKE_MINIMUM_LEAD_DAYS", defaults.minimum_lead_days)?;
    if !(0..=MAX_LEAD_DAYS).contains(&minimum_lead_days) {
        return Err(ConfigError::InvalidIntakeSetting {
            key: "INTAKE_MINIMUM_LEAD_DAYS",
            value: minimum_lead_days.to_string(),
        });
    }
    let redemption_cap_months = env_number(
        "INTAKE_REDEMPTION_CAP_MONTHS",
        defaults.redemption_cap_months,
    )?;

    let utc_offset_minutes = env_number("INTAKE_UTC_OFFSET_MINUTES", defaults.utc_offset_minutes)?;
    // chrono::FixedOffset accepts strictly less than a day in either direction.
    if utc_offset_minutes.unsigned_abs() >= 24 * 60 {
        return Err(ConfigError::InvalidIntakeSetting {
            key: "INTAKE_UTC_OFFSET_MINUTES",
            value: utc_offset_minutes.to_string(),
        });
    }

    Ok(IntakePolicy {
        referral_discount: Money::from_cents(referral_discount),
        minimum_lead_days,
        redemption_cap_months,
        utc_offset_minutes,
    })
}

fn env_number<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidIntakeSetting { key, value: raw }),
        _ => Ok(default),
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

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidIntakeSetting { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidIntakeSetting { key, value } => {
                write!(f, "{key} has an invalid value '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidIntakeSetting { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
