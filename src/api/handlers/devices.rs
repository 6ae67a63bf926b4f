//! Device and status handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;

use crate::api::PanelState;
use crate::dispatch::Action;
use crate::error::AppError;

use super::SuccessResponse;

/// Configured device as shown to the panel (no credentials)
#[derive(Serialize)]
pub struct DeviceSummary {
    pub index: usize,
    pub name: String,
    pub has_device_id: bool,
    pub actions: Vec<String>,
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub message: String,
}

/// GET /api/devices - List configured devices
pub async fn list_devices(State(state): State<PanelState>) -> impl IntoResponse {
    let devices: Vec<_> = state
        .panel
        .dispatchers()
        .iter()
        .enumerate()
        .map(|(index, d)| {
            let device = d.device();
            DeviceSummary {
                index,
                name: device.name.clone(),
                has_device_id: device.device_id.as_deref().is_some_and(|id| !id.is_empty()),
                actions: device
                    .commands
                    .iter()
                    .filter(|(_, spec)| !spec.is_empty())
                    .map(|(action, _)| action.clone())
                    .collect(),
            }
        })
        .collect();

    Json(devices)
}

/// POST /api/devices/:index/:action - Send ON/OFF in the background
pub async fn trigger_action(
    State(state): State<PanelState>,
    Path((index, action)): Path<(usize, String)>,
) -> Result<impl IntoResponse, AppError> {
    let action: Action = action.parse().map_err(AppError::BadRequest)?;

    let dispatcher = state
        .panel
        .get(index)
        .ok_or_else(|| AppError::NotFound(format!("Device {} not found", index)))?;

    tracing::debug!(
        "Triggering {} for {}",
        action,
        dispatcher.device().name
    );

    // Detached; the outcome lands on the status board
    drop(dispatcher.trigger(action));

    Ok((
        StatusCode::ACCEPTED,
        Json(SuccessResponse::new(format!(
            "{} command queued for {}",
            action.as_str().to_uppercase(),
            dispatcher.device().name
        ))),
    ))
}

/// GET /api/status - Latest status message
pub async fn get_status(State(state): State<PanelState>) -> impl IntoResponse {
    Json(StatusResponse {
        message: state.panel.status().current(),
    })
}
