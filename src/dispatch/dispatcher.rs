//! Per-device dispatcher

use std::sync::Arc;

use tokio::task::JoinHandle;

use super::{Action, StatusBoard, StatusSink};
use crate::config::DeviceConfig;
use crate::error::DispatchError;
use crate::switchbot::{CommandRequest, CommandTransport};

const DEFAULT_COMMAND_TYPE: &str = "command";
const DEFAULT_PARAMETER: &str = "default";

/// Turns button presses for one configured device into API calls.
///
/// Cheap to clone; every clone shares the device config, transport and sink.
#[derive(Clone)]
pub struct Dispatcher {
    device: Arc<DeviceConfig>,
    transport: Arc<dyn CommandTransport>,
    sink: Arc<dyn StatusSink>,
}

impl Dispatcher {
    pub fn new(
        device: DeviceConfig,
        transport: Arc<dyn CommandTransport>,
        sink: Arc<dyn StatusSink>,
    ) -> Self {
        Self {
            device: Arc::new(device),
            transport,
            sink,
        }
    }

    pub fn device(&self) -> &DeviceConfig {
        &self.device
    }

    /// Build the request for `action`, or explain why nothing can be sent
    pub fn resolve(&self, action: Action) -> Result<(&str, CommandRequest), DispatchError> {
        let name = &self.device.name;

        let spec = self
            .device
            .commands
            .get(action.as_str())
            .filter(|spec| !spec.is_empty())
            .ok_or_else(|| DispatchError::CommandNotConfigured {
                action: action.to_string(),
                name: name.clone(),
            })?;

        let device_id = self
            .device
            .device_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| DispatchError::MissingDeviceId { name: name.clone() })?;

        let request = CommandRequest {
            command_type: spec
                .command_type
                .clone()
                .unwrap_or_else(|| DEFAULT_COMMAND_TYPE.to_string()),
            command: spec
                .command
                .clone()
                .unwrap_or_else(|| action.default_command().to_string()),
            parameter: spec
                .parameter
                .clone()
                .unwrap_or_else(|| DEFAULT_PARAMETER.to_string()),
        };

        Ok((device_id, request))
    }

    /// Run `action` to completion. Both arms render as the status message.
    pub async fn execute(&self, action: Action) -> Result<String, DispatchError> {
        let outcome = self.run(action).await;
        match &outcome {
            Ok(message) => tracing::info!("{}", message),
            Err(e) => tracing::warn!("{}", e),
        }
        outcome
    }

    /// Fire-and-forget: run `action` on its own task and publish the outcome.
    /// Dropping the handle detaches the task.
    pub fn trigger(&self, action: Action) -> JoinHandle<()> {
        let this = self.clone();
        tokio::spawn(async move {
            let outcome = match this.execute(action).await {
                Ok(message) => message,
                Err(e) => e.to_string(),
            };
            this.sink.publish(outcome);
        })
    }

    async fn run(&self, action: Action) -> Result<String, DispatchError> {
        let (device_id, request) = self.resolve(action)?;
        let name = &self.device.name;

        let result = self
            .transport
            .send_command(device_id, &request)
            .await
            .map_err(|e| DispatchError::command(name, e))?;

        if result.is_success() {
            Ok(format!(
                "{}: {} command sent successfully",
                name,
                action.as_str().to_uppercase()
            ))
        } else {
            Err(DispatchError::RemoteRejection {
                name: name.clone(),
                status_code: result.status_code,
                message: result.message,
            })
        }
    }
}

/// All device dispatchers plus the status line they report to
pub struct Panel {
    dispatchers: Vec<Dispatcher>,
    status: StatusBoard,
}

impl Panel {
    pub fn new(devices: &[DeviceConfig], transport: Arc<dyn CommandTransport>) -> Self {
        let status = StatusBoard::new();
        let sink: Arc<dyn StatusSink> = Arc::new(status.clone());

        let dispatchers = devices
            .iter()
            .cloned()
            .map(|device| Dispatcher::new(device, transport.clone(), sink.clone()))
            .collect();

        Self {
            dispatchers,
            status,
        }
    }

    pub fn dispatchers(&self) -> &[Dispatcher] {
        &self.dispatchers
    }

    pub fn get(&self, index: usize) -> Option<&Dispatcher> {
        self.dispatchers.get(index)
    }

    /// Look a device up by configured name (case-insensitive) or deviceId
    pub fn find(&self, key: &str) -> Option<&Dispatcher> {
        self.dispatchers.iter().find(|d| {
            let device = d.device();
            device.name.eq_ignore_ascii_case(key) || device.device_id.as_deref() == Some(key)
        })
    }

    pub fn status(&self) -> &StatusBoard {
        &self.status
    }
}
