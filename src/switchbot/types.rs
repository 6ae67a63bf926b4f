//! SwitchBot API payloads

use serde::{Deserialize, Serialize};

/// Body of `POST /v1.1/devices/{deviceId}/commands`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRequest {
    #[serde(rename = "commandType")]
    pub command_type: String,
    pub command: String,
    pub parameter: String,
}

/// Response envelope shared by every v1.1 endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResult {
    #[serde(rename = "statusCode")]
    pub status_code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
}

impl CommandResult {
    pub fn is_success(&self) -> bool {
        self.status_code == super::STATUS_SUCCESS
    }
}

/// `body` of `GET /v1.1/devices`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceListing {
    #[serde(rename = "deviceList", default)]
    pub device_list: Vec<PhysicalDevice>,
    #[serde(rename = "infraredRemoteList", default)]
    pub infrared_remote_list: Vec<InfraredRemote>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicalDevice {
    #[serde(rename = "deviceId")]
    pub device_id: String,
    #[serde(rename = "deviceName", default)]
    pub device_name: String,
    #[serde(rename = "deviceType")]
    pub device_type: Option<String>,
    #[serde(rename = "hubDeviceId")]
    pub hub_device_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfraredRemote {
    #[serde(rename = "deviceId")]
    pub device_id: String,
    #[serde(rename = "deviceName", default)]
    pub device_name: String,
    #[serde(rename = "remoteType")]
    pub remote_type: Option<String>,
    #[serde(rename = "hubDeviceId")]
    pub hub_device_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_request_wire_names() {
        let req = CommandRequest {
            command_type: "command".to_string(),
            command: "turnOn".to_string(),
            parameter: "default".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            serde_json::json!({
                "commandType": "command",
                "command": "turnOn",
                "parameter": "default"
            })
        );
    }

    #[test]
    fn test_result_requires_status_code() {
        let ok: CommandResult =
            serde_json::from_str(r#"{"statusCode": 100, "body": {}, "message": "success"}"#)
                .unwrap();
        assert!(ok.is_success());

        let no_message: CommandResult = serde_json::from_str(r#"{"statusCode": 190}"#).unwrap();
        assert!(!no_message.is_success());
        assert_eq!(no_message.message, "");

        assert!(serde_json::from_str::<CommandResult>(r#"{"message": "success"}"#).is_err());
    }

    #[test]
    fn test_device_listing() {
        let listing: DeviceListing = serde_json::from_str(
            r#"{
                "deviceList": [
                    {"deviceId": "C271111EC0AB", "deviceName": "Bot 74", "deviceType": "Bot",
                     "enableCloudService": true, "hubDeviceId": "FA7310762361"}
                ],
                "infraredRemoteList": [
                    {"deviceId": "02-202008110034-13", "deviceName": "Air Conditioner",
                     "remoteType": "Air Conditioner", "hubDeviceId": "FA7310762361"}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(listing.device_list[0].device_type.as_deref(), Some("Bot"));
        assert_eq!(listing.infrared_remote_list[0].device_name, "Air Conditioner");
    }
}
