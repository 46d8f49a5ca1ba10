// crates/mock-gate-config/src/config.rs
// ============================================================================
// Module: Mock Gate Configuration
// Description: Configuration loading and validation for the mock server.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: mock-gate-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! The path comes from the caller, then `MOCK_GATE_CONFIG`, then
//! `mock-gate.toml` in the working directory. Missing or invalid
//! configuration fails closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;

use mock_gate_core::AdjudicatorConfig;
use mock_gate_core::EndpointMode;
use mock_gate_core::JwtVerification;
use mock_gate_core::SuppressionPolicy;
use mock_gate_core::builtin_validation_ids;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "mock-gate.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "MOCK_GATE_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Upper bound for `logging.body_max_length`.
const MAX_BODY_MAX_LENGTH: usize = 1024 * 1024;

// ============================================================================
// SECTION: Configuration Model
// ============================================================================

/// Mock Gate configuration loaded from `mock-gate.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MockGateConfig {
    /// Test mode.
    #[serde(default)]
    pub mode: RunMode,
    /// Listener configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Endpoint resolution configuration.
    #[serde(default)]
    pub endpoints: EndpointsConfig,
    /// Check configuration.
    #[serde(default)]
    pub validation: ValidationConfig,
    /// Request log configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl MockGateConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.endpoints.validate()?;
        self.validation.validate()?;
        self.logging.validate()
    }

    /// Returns the adjudication settings derived from this configuration.
    #[must_use]
    pub fn adjudicator_config(&self) -> AdjudicatorConfig {
        AdjudicatorConfig {
            endpoint_mode: self.endpoints.format,
            secure_transport: self.server.secure_transport,
            suppression: self.validation.suppression_policy(),
        }
    }
}

/// Test mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Serves the guided test plan at `/`.
    Guided,
    /// Serves mapped endpoints only.
    #[default]
    Exploratory,
}

// ============================================================================
// SECTION: Server
// ============================================================================

/// Listener configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address for the listener.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Run the transport identity check on every request.
    #[serde(default)]
    pub secure_transport: bool,
    /// Optional TLS listener configuration.
    #[serde(default)]
    pub tls: Option<ServerTlsConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            secure_transport: false,
            tls: None,
        }
    }
}

impl ServerConfig {
    /// Returns the parsed bind address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the bind address is invalid.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("invalid bind address: {}", self.bind)))
    }

    /// Validates listener configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        self.bind_addr()?;
        if let Some(tls) = &self.tls {
            tls.validate()?;
        }
        Ok(())
    }
}

/// TLS configuration for the HTTPS listener.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerTlsConfig {
    /// Server certificate chain (PEM).
    pub cert_path: String,
    /// Server private key (PEM).
    pub key_path: String,
}

impl ServerTlsConfig {
    /// Validates TLS configuration paths.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_path_string("server.tls.cert_path", &self.cert_path)?;
        validate_path_string("server.tls.key_path", &self.key_path)
    }
}

// ============================================================================
// SECTION: Endpoints
// ============================================================================

/// Endpoint resolution configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EndpointsConfig {
    /// How request targets map onto endpoint keys.
    #[serde(default)]
    pub format: EndpointMode,
    /// Endpoint-to-file mapping table (TSV).
    #[serde(default = "default_mapping_path")]
    pub mapping_path: String,
    /// Directory holding response files.
    #[serde(default = "default_responses_dir")]
    pub responses_dir: String,
    /// Serve JSON and XML with FHIR media types.
    #[serde(default)]
    pub use_fhir_mime_types: bool,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            format: EndpointMode::default(),
            mapping_path: default_mapping_path(),
            responses_dir: default_responses_dir(),
            use_fhir_mime_types: false,
        }
    }
}

impl EndpointsConfig {
    /// Validates endpoint paths.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_path_string("endpoints.mapping_path", &self.mapping_path)?;
        validate_path_string("endpoints.responses_dir", &self.responses_dir)
    }
}

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Check configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ValidationConfig {
    /// Suppressed checks: `true`, `false`, or a list of check ids.
    #[serde(default)]
    pub suppressed: SuppressionSetting,
    /// Token verification settings.
    #[serde(default)]
    pub jwt: JwtConfig,
}

impl ValidationConfig {
    /// Returns the registry suppression policy.
    #[must_use]
    pub fn suppression_policy(&self) -> SuppressionPolicy {
        match &self.suppressed {
            SuppressionSetting::All(false) => SuppressionPolicy::None,
            SuppressionSetting::All(true) => SuppressionPolicy::All,
            SuppressionSetting::Ids(ids) => SuppressionPolicy::ids(ids.iter().cloned()),
        }
    }

    /// Validates suppression ids and token settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if let SuppressionSetting::Ids(ids) = &self.suppressed {
            let known = builtin_validation_ids();
            for id in ids {
                if !known.contains(&id.as_str()) {
                    return Err(ConfigError::Invalid(format!(
                        "validation.suppressed contains unknown check id: {id}"
                    )));
                }
            }
        }
        self.jwt.validate()
    }
}

/// Suppression setting as written in TOML.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SuppressionSetting {
    /// Suppress everything (`true`) or nothing (`false`).
    All(bool),
    /// Suppress the listed check ids.
    Ids(Vec<String>),
}

impl Default for SuppressionSetting {
    fn default() -> Self {
        Self::All(false)
    }
}

/// Token verification settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JwtConfig {
    /// Signature verification mode.
    #[serde(default)]
    pub verification: JwtVerificationMode,
    /// Shared secret for `hs256`.
    #[serde(default)]
    pub secret: Option<String>,
}

impl JwtConfig {
    /// Returns the validator verification mode.
    #[must_use]
    pub fn verification(&self) -> JwtVerification {
        match self.verification {
            JwtVerificationMode::Unsigned => JwtVerification::Unsigned,
            JwtVerificationMode::Hs256 => JwtVerification::Hs256 {
                secret: self.secret.clone().unwrap_or_default(),
            },
        }
    }

    /// Validates that `hs256` carries a secret.
    fn validate(&self) -> Result<(), ConfigError> {
        let has_secret = self.secret.as_deref().is_some_and(|secret| !secret.trim().is_empty());
        if self.verification == JwtVerificationMode::Hs256 && !has_secret {
            return Err(ConfigError::Invalid(
                "validation.jwt.secret is required for hs256 verification".to_string(),
            ));
        }
        Ok(())
    }
}

/// Token signature verification modes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JwtVerificationMode {
    /// Unsecured tokens (`alg: none`).
    #[default]
    Unsigned,
    /// HMAC-SHA256 with a shared secret.
    Hs256,
}

// ============================================================================
// SECTION: Logging
// ============================================================================

/// Request log configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Write request entries to stdout.
    #[serde(default = "default_log_stdout")]
    pub stdout: bool,
    /// Directory for the JSON-lines request log.
    #[serde(default)]
    pub reports_dir: Option<String>,
    /// Maximum logged response body length in characters.
    #[serde(default = "default_body_max_length")]
    pub body_max_length: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            stdout: default_log_stdout(),
            reports_dir: None,
            body_max_length: default_body_max_length(),
        }
    }
}

impl LoggingConfig {
    /// Validates log settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.body_max_length == 0 || self.body_max_length > MAX_BODY_MAX_LENGTH {
            return Err(ConfigError::Invalid(format!(
                "logging.body_max_length must be between 1 and {MAX_BODY_MAX_LENGTH}"
            )));
        }
        if let Some(dir) = &self.reports_dir {
            validate_path_string("logging.reports_dir", dir)?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Default listener address.
fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

/// Default mapping table path.
fn default_mapping_path() -> String {
    "config/file-endpoint-mapping.tsv".to_string()
}

/// Default responses directory.
fn default_responses_dir() -> String {
    "responses".to_string()
}

/// Request entries go to stdout unless disabled.
const fn default_log_stdout() -> bool {
    true
}

/// Default logged body length.
const fn default_body_max_length() -> usize {
    2048
}

// ============================================================================
// SECTION: Tests
// ============================================================================
