//! Runtime configuration loaded via OrthoConfig.
//!
//! Values layer as defaults < config file < `ECOWASTE_*` environment < CLI
//! flags. [`Settings`] holds the raw values; [`Settings::resolve`] validates
//! them into [`RuntimeSettings`] for the server.

use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use chrono::TimeDelta;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::warn;
use zeroize::Zeroizing;

use crate::domain::FallbackPolicy;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
/// Thirty days.
pub const DEFAULT_TOKEN_TTL_HOURS: u32 = 720;
pub const JWT_SECRET_MIN_LEN: usize = 32;
const DEV_JWT_SECRET: &str = "ecowaste-development-only-signing-secret";
const FINGERPRINT_BYTES: usize = 8;

const BIND_ADDR_ENV: &str = "ECOWASTE_BIND_ADDR";
const TOKEN_TTL_ENV: &str = "ECOWASTE_TOKEN_TTL_HOURS";
const ENVIRONMENT_ENV: &str = "ECOWASTE_ENVIRONMENT";
const FALLBACK_ENV: &str = "ECOWASTE_FALLBACK";

/// Build mode used to decide how strict secret handling is.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds fall back to a development secret with a warning.
    Debug,
    /// Release builds require an explicit secret of adequate length.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    /// ```
    /// use ecowaste::settings::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// assert_eq!(mode == BuildMode::Debug, cfg!(debug_assertions));
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }
}

/// Deployment environment. Only `development` exposes error stacks.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Environment {
    #[default]
    Production,
    Development,
}

impl Environment {
    pub fn exposes_stack(self) -> bool {
        matches!(self, Self::Development)
    }
}

impl FromStr for Environment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" => Ok(Self::Production),
            "development" => Ok(Self::Development),
            _ => Err(()),
        }
    }
}

/// Errors raised while validating configuration.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum SettingsError {
    #[error("ECOWASTE_JWT_SECRET is required in release builds")]
    MissingSecret,
    #[error("ECOWASTE_JWT_SECRET too short: need >= {min_len} bytes, got {length}")]
    SecretTooShort { length: usize, min_len: usize },
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    Invalid {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

fn invalid(name: &'static str, value: &str, expected: &'static str) -> SettingsError {
    SettingsError::Invalid {
        name,
        value: value.to_owned(),
        expected,
    }
}

/// Raw configuration values.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ECOWASTE")]
pub struct Settings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// Shared HS256 signing secret.
    pub jwt_secret: Option<String>,
    /// Bearer token lifetime in hours.
    pub token_ttl_hours: Option<u32>,
    /// `production` or `development`.
    pub environment: Option<String>,
    /// Classification fallback: `unclassified` or `random`.
    pub fallback: Option<String>,
    /// Seed the demo household on startup.
    #[ortho_config(default = false)]
    pub seed_demo_principal: bool,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("bind_addr", &self.bind_addr)
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "<redacted>"))
            .field("token_ttl_hours", &self.token_ttl_hours)
            .field("environment", &self.environment)
            .field("fallback", &self.fallback)
            .field("seed_demo_principal", &self.seed_demo_principal)
            .finish()
    }
}

/// Validated configuration ready for server construction.
pub struct RuntimeSettings {
    pub bind_addr: SocketAddr,
    pub jwt_secret: Zeroizing<Vec<u8>>,
    pub token_ttl: TimeDelta,
    pub environment: Environment,
    pub fallback: FallbackPolicy,
    pub seed_demo_principal: bool,
}

impl fmt::Debug for RuntimeSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeSettings")
            .field("bind_addr", &self.bind_addr)
            .field("jwt_secret", &secret_fingerprint(&self.jwt_secret))
            .field("token_ttl", &self.token_ttl)
            .field("environment", &self.environment)
            .field("fallback", &self.fallback)
            .field("seed_demo_principal", &self.seed_demo_principal)
            .finish()
    }
}

impl Settings {
    /// Validate every value, applying defaults where unset.
    pub fn resolve(&self, mode: BuildMode) -> Result<RuntimeSettings, SettingsError> {
        Ok(RuntimeSettings {
            bind_addr: self.bind_addr()?,
            jwt_secret: self.jwt_secret(mode)?,
            token_ttl: self.token_ttl()?,
            environment: self.environment()?,
            fallback: self.fallback()?,
            seed_demo_principal: self.seed_demo_principal,
        })
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.trim()
            .parse()
            .map_err(|_| invalid(BIND_ADDR_ENV, raw, "host:port"))
    }

    pub fn token_ttl(&self) -> Result<TimeDelta, SettingsError> {
        match self.token_ttl_hours.unwrap_or(DEFAULT_TOKEN_TTL_HOURS) {
            0 => Err(invalid(TOKEN_TTL_ENV, "0", "a positive number of hours")),
            hours => Ok(TimeDelta::hours(i64::from(hours))),
        }
    }

    pub fn environment(&self) -> Result<Environment, SettingsError> {
        match self.environment.as_deref() {
            None => Ok(Environment::default()),
            Some(raw) => raw
                .parse()
                .map_err(|()| invalid(ENVIRONMENT_ENV, raw, "production|development")),
        }
    }

    pub fn fallback(&self) -> Result<FallbackPolicy, SettingsError> {
        match self.fallback.as_deref() {
            None => Ok(FallbackPolicy::default()),
            Some(raw) => raw
                .parse()
                .map_err(|_| invalid(FALLBACK_ENV, raw, "unclassified|random")),
        }
    }

    /// The signing secret. Debug builds substitute a development secret
    /// when none is configured and only warn about short secrets.
    pub fn jwt_secret(&self, mode: BuildMode) -> Result<Zeroizing<Vec<u8>>, SettingsError> {
        let Some(secret) = self.jwt_secret.as_deref().filter(|s| !s.is_empty()) else {
            return match mode {
                BuildMode::Release => Err(SettingsError::MissingSecret),
                BuildMode::Debug => {
                    warn!("ECOWASTE_JWT_SECRET not set; using development secret");
                    Ok(Zeroizing::new(DEV_JWT_SECRET.as_bytes().to_vec()))
                }
            };
        };
        let length = secret.len();
        if length < JWT_SECRET_MIN_LEN {
            if mode == BuildMode::Release {
                return Err(SettingsError::SecretTooShort {
                    length,
                    min_len: JWT_SECRET_MIN_LEN,
                });
            }
            warn!(length, min_len = JWT_SECRET_MIN_LEN, "ECOWASTE_JWT_SECRET is short");
        }
        Ok(Zeroizing::new(secret.as_bytes().to_vec()))
    }
}

/// Truncated SHA-256 fingerprint of a secret, safe to log.
///
/// # Examples
/// ```
/// use ecowaste::settings::secret_fingerprint;
///
/// let fp = secret_fingerprint(b"correct horse battery staple");
/// assert_eq!(fp.len(), 16);
/// assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
/// ```
#[must_use]
pub fn secret_fingerprint(secret: &[u8]) -> String {
    let digest = Sha256::digest(secret);
    hex::encode(&digest[..FINGERPRINT_BYTES])
}
