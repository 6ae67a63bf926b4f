//! Error handling module

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Fatal startup error: the configuration file is missing or malformed.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error(
        "Configuration file {0} not found. Copy config.example.json to {0} and fill in your SwitchBot credentials."
    )]
    NotFound(String),

    #[error("Invalid JSON in {path}: {detail}")]
    InvalidJson { path: String, detail: String },

    #[error("Missing '{0}' in configuration file")]
    MissingKey(&'static str),

    #[error("'devices' must be a list of device definitions")]
    DevicesNotList,

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Failure of a single SwitchBot API call. Terminal for that call.
#[derive(Error, Debug)]
pub enum CommandError {
    /// The server answered with a non-2xx status
    #[error("{0}")]
    Http(String),

    /// No response was obtained (connect failure, timeout, ...)
    #[error("{0}")]
    Network(String),

    /// The response body was not the expected JSON shape
    #[error("{0}")]
    Protocol(String),

    /// Well-formed response carrying a non-success `statusCode`
    #[error("API returned statusCode {status_code} - {message}")]
    Rejected { status_code: i64, message: String },
}

impl CommandError {
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_status() {
            CommandError::Http(err.to_string())
        } else if err.is_decode() {
            CommandError::Protocol(err.to_string())
        } else {
            CommandError::Network(err.to_string())
        }
    }
}

/// Per-action outcome errors. The `Display` text is what the status sink shows.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("No '{action}' command configured for {name}")]
    CommandNotConfigured { action: String, name: String },

    #[error("Missing deviceId for {name}")]
    MissingDeviceId { name: String },

    #[error("HTTP error for {name}: {source}")]
    Http { name: String, source: CommandError },

    #[error("Network error for {name}: {source}")]
    Network { name: String, source: CommandError },

    #[error("{name}: API returned statusCode {status_code} - {message}")]
    RemoteRejection {
        name: String,
        status_code: i64,
        message: String,
    },
}

impl DispatchError {
    /// Attach the device name to a failed API call
    pub fn command(name: &str, source: CommandError) -> Self {
        match source {
            CommandError::Http(_) => DispatchError::Http {
                name: name.to_string(),
                source,
            },
            CommandError::Network(_) | CommandError::Protocol(_) => DispatchError::Network {
                name: name.to_string(),
                source,
            },
            CommandError::Rejected {
                status_code,
                message,
            } => DispatchError::RemoteRejection {
                name: name.to_string(),
                status_code,
                message,
            },
        }
    }
}

/// Errors returned by the panel HTTP API
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        };

        let body = Json(serde_json::json!({
            "error": message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_messages() {
        let err = DispatchError::CommandNotConfigured {
            action: "on".to_string(),
            name: "X".to_string(),
        };
        assert_eq!(err.to_string(), "No 'on' command configured for X");

        let err = DispatchError::MissingDeviceId {
            name: "X".to_string(),
        };
        assert_eq!(err.to_string(), "Missing deviceId for X");

        let err = DispatchError::RemoteRejection {
            name: "X".to_string(),
            status_code: 190,
            message: "device offline".to_string(),
        };
        assert_eq!(err.to_string(), "X: API returned statusCode 190 - device offline");
    }

    #[test]
    fn test_command_error_classification() {
        let err = DispatchError::command("Lamp", CommandError::Http("500 boom".to_string()));
        assert_eq!(err.to_string(), "HTTP error for Lamp: 500 boom");

        let err = DispatchError::command("Lamp", CommandError::Network("refused".to_string()));
        assert_eq!(err.to_string(), "Network error for Lamp: refused");

        // Unparseable bodies are reported like transport failures
        let err = DispatchError::command("Lamp", CommandError::Protocol("bad json".to_string()));
        assert_eq!(err.to_string(), "Network error for Lamp: bad json");
    }

    #[test]
    fn test_config_messages() {
        assert_eq!(
            ConfigurationError::MissingKey("token").to_string(),
            "Missing 'token' in configuration file"
        );
        assert!(ConfigurationError::NotFound("config.json".to_string())
            .to_string()
            .starts_with("Configuration file config.json not found."));
    }
}
