//! Configuration module
//!
//! Loads `config.json` (or the path given on the command line) and applies
//! `SWITCHBOT__*` environment overrides on top of it.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigurationError;
use crate::switchbot::Credentials;

pub const DEFAULT_CONFIG_PATH: &str = "config.json";

const REQUIRED_KEYS: [&str; 3] = ["token", "secret", "devices"];

#[derive(Clone, Deserialize)]
pub struct Config {
    pub token: String,
    pub secret: String,
    pub devices: Vec<DeviceConfig>,
    #[serde(
        rename = "apiBaseUrl",
        alias = "apibaseurl",
        default = "default_api_base_url"
    )]
    pub api_base_url: String,
    #[serde(default)]
    pub server: ServerConfig,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("token", &self.token)
            .field("secret", &"********")
            .field("devices", &self.devices)
            .field("api_base_url", &self.api_base_url)
            .field("server", &self.server)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// One controllable device as listed in the configuration file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeviceConfig {
    #[serde(rename = "deviceId", alias = "deviceid", default)]
    pub device_id: Option<String>,
    #[serde(default = "default_device_name")]
    pub name: String,
    /// action name ("on" / "off") -> command
    #[serde(default)]
    pub commands: BTreeMap<String, CommandSpec>,
}

/// Command payload fields; anything left out falls back to a per-action default
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CommandSpec {
    #[serde(rename = "commandType", alias = "commandtype", default)]
    pub command_type: Option<String>,
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub parameter: Option<String>,
}

impl CommandSpec {
    pub fn is_empty(&self) -> bool {
        self.command_type.is_none() && self.command.is_none() && self.parameter.is_none()
    }
}

fn default_api_base_url() -> String {
    crate::switchbot::API_BASE_URL.to_string()
}

fn default_device_name() -> String {
    "Unnamed Device".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8765
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigurationError> {
        let path_str = path.display().to_string();

        if !path.exists() {
            return Err(ConfigurationError::NotFound(path_str));
        }

        let settings = config::Config::builder()
            .add_source(config::File::from(path).format(config::FileFormat::Json))
            .add_source(config::Environment::with_prefix("SWITCHBOT").separator("__"))
            .build()
            .map_err(|e| ConfigurationError::InvalidJson {
                path: path_str.clone(),
                detail: e.to_string(),
            })?;

        for key in REQUIRED_KEYS {
            if settings.get::<serde_json::Value>(key).is_err() {
                return Err(ConfigurationError::MissingKey(key));
            }
        }

        if settings.get_array("devices").is_err() {
            return Err(ConfigurationError::DevicesNotList);
        }

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| ConfigurationError::Invalid(e.to_string()))?;

        tracing::debug!(
            "Loaded {} device(s) from {}",
            config.devices.len(),
            path_str
        );

        Ok(config)
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.token.clone(), self.secret.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Mutex, MutexGuard};

    // Environment overrides are process-wide; loads must not interleave with them
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn env_lock() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".json")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let _guard = env_lock();
        let file = write_config(
            r#"{
                "token": "tok",
                "secret": "sec",
                "devices": [
                    {
                        "name": "Living Room Light",
                        "deviceId": "ABC123",
                        "commands": {
                            "on": {"commandType": "command", "command": "turnOn"},
                            "off": {"command": "turnOff", "parameter": "default"}
                        }
                    },
                    {"deviceId": "DEF456"}
                ]
            }"#,
        );

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.token, "tok");
        assert_eq!(config.secret, "sec");
        assert_eq!(config.devices.len(), 2);
        assert_eq!(config.api_base_url, "https://api.switch-bot.com");
        assert_eq!(config.server.port, 8765);

        let light = &config.devices[0];
        assert_eq!(light.name, "Living Room Light");
        assert_eq!(light.device_id.as_deref(), Some("ABC123"));
        assert_eq!(
            light.commands.get("on").and_then(|c| c.command.as_deref()),
            Some("turnOn")
        );
        assert_eq!(
            light.commands.get("on").and_then(|c| c.command_type.as_deref()),
            Some("command")
        );
        assert_eq!(
            light.commands.get("off").and_then(|c| c.parameter.as_deref()),
            Some("default")
        );

        let unnamed = &config.devices[1];
        assert_eq!(unnamed.name, "Unnamed Device");
        assert!(unnamed.commands.is_empty());
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load(Path::new("/nonexistent/switchbot/config.json")).unwrap_err();
        assert!(matches!(err, ConfigurationError::NotFound(_)));
    }

    #[test]
    fn test_missing_required_key() {
        let _guard = env_lock();
        let file = write_config(r#"{"token": "tok", "devices": []}"#);
        let err = Config::load(file.path()).unwrap_err();
        assert_eq!(err.to_string(), "Missing 'secret' in configuration file");
    }

    #[test]
    fn test_devices_must_be_list() {
        let _guard = env_lock();
        let file = write_config(r#"{"token": "tok", "secret": "sec", "devices": {"a": {}}}"#);
        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigurationError::DevicesNotList));
    }

    #[test]
    fn test_invalid_json() {
        let _guard = env_lock();
        let file = write_config(r#"{"token": "tok", "#);
        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidJson { .. }));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let _guard = env_lock();
        let file = write_config(r#"{"token": "tok", "secret": "hunter2", "devices": []}"#);
        let config = Config::load(file.path()).unwrap();
        assert!(!format!("{:?}", config).contains("hunter2"));
    }

    #[test]
    fn test_environment_overrides_file() {
        let _guard = env_lock();
        let file = write_config(
            r#"{"token": "file-token", "secret": "sec", "devices": [{"deviceId": "ABC"}]}"#,
        );

        std::env::set_var("SWITCHBOT__TOKEN", "env-token");
        std::env::set_var("SWITCHBOT__APIBASEURL", "http://127.0.0.1:9999");
        let result = Config::load(file.path());
        std::env::remove_var("SWITCHBOT__TOKEN");
        std::env::remove_var("SWITCHBOT__APIBASEURL");

        let config = result.unwrap();
        assert_eq!(config.token, "env-token");
        assert_eq!(config.secret, "sec");
        assert_eq!(config.api_base_url, "http://127.0.0.1:9999");
        assert_eq!(config.devices.len(), 1);
    }

    #[test]
    fn test_empty_command_spec() {
        assert!(CommandSpec::default().is_empty());
        let spec = CommandSpec {
            parameter: Some("default".to_string()),
            ..Default::default()
        };
        assert!(!spec.is_empty());
    }
}
