//! Configuration management for Picrelay
//!
//! All settings come from the process environment. The Microsoft
//! credentials have no defaults and are checked by [`Config::validate`]
//! before the server starts; the listener settings fall back to values
//! that work for a local deployment.

use std::fmt;
use std::path::PathBuf;

// ============================================================================
// Defaults
// ============================================================================

/// Default listen address
const DEFAULT_HOST: &str = "0.0.0.0";

/// Default listen port
const DEFAULT_PORT: u16 = 9000;

/// Default directory for spooling uploads before they are relayed
const DEFAULT_UPLOAD_TMP_DIR: &str = "uploads";

// ============================================================================
// Configuration types
// ============================================================================

/// Complete service configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Microsoft tenant, app credentials and target drive
    pub graph: GraphConfig,
    /// HTTP listener settings
    pub server: ServerConfig,
}

/// Credentials and drive selection for the Microsoft Graph API
#[derive(Debug, Clone, Default)]
pub struct GraphConfig {
    /// Azure AD application (client) id
    pub client_id: String,
    /// Azure AD application client secret
    pub client_secret: String,
    /// Azure AD tenant id
    pub tenant_id: String,
    /// OneDrive drive id all uploads and listings target
    pub drive_id: String,
}

/// HTTP listener settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind
    pub host: String,
    /// Port to bind
    pub port: u16,
    /// Directory where multipart uploads are spooled before transfer
    pub upload_tmp_dir: PathBuf,
    /// CORS origin allowlist; empty means any origin is accepted
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            upload_tmp_dir: PathBuf::from(DEFAULT_UPLOAD_TMP_DIR),
            cors_origins: Vec::new(),
        }
    }
}

// ============================================================================
// Validation
// ============================================================================

/// A single configuration problem found during validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Environment variable the problem refers to
    pub field: String,
    /// Human-readable description of the problem
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl Config {
    /// Loads the configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads the configuration through an arbitrary variable lookup.
    ///
    /// The indirection keeps the parsing testable without touching the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ServerConfig::default();

        Self {
            graph: GraphConfig {
                client_id: lookup("MICROSOFT_CLIENT_ID").unwrap_or_default(),
                client_secret: lookup("MICROSOFT_CLIENT_SECRET").unwrap_or_default(),
                tenant_id: lookup("MICROSOFT_TENANT_ID").unwrap_or_default(),
                drive_id: lookup("MICROSOFT_DRIVE_ID").unwrap_or_default(),
            },
            server: ServerConfig {
                host: lookup("HOST").unwrap_or(defaults.host),
                port: lookup("PORT")
                    .and_then(|value| value.parse().ok())
                    .unwrap_or(defaults.port),
                upload_tmp_dir: lookup("UPLOAD_TMP_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.upload_tmp_dir),
                cors_origins: lookup("CORS_ORIGINS")
                    .map(|value| parse_origins(&value))
                    .unwrap_or_default(),
            },
        }
    }

    /// Validates the configuration and returns all problems found
    ///
    /// # Returns
    /// An empty vector when the configuration is usable
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        let required = [
            ("MICROSOFT_CLIENT_ID", &self.graph.client_id),
            ("MICROSOFT_CLIENT_SECRET", &self.graph.client_secret),
            ("MICROSOFT_TENANT_ID", &self.graph.tenant_id),
            ("MICROSOFT_DRIVE_ID", &self.graph.drive_id),
        ];

        for (field, value) in required {
            if value.trim().is_empty() {
                errors.push(ValidationError {
                    field: field.to_string(),
                    message: "must be set".to_string(),
                });
            }
        }

        if self.server.port == 0 {
            errors.push(ValidationError {
                field: "PORT".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }

        if self.server.upload_tmp_dir.as_os_str().is_empty() {
            errors.push(ValidationError {
                field: "UPLOAD_TMP_DIR".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        errors
    }
}

/// Splits a comma-separated origin list, dropping empty entries
fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
