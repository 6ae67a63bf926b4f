//! Panel page handlers

use std::fmt::Write;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
};
use html_escape::encode_text;

use crate::api::PanelState;

const PAGE_SCRIPT: &str = r#"
async function trigger(index, action) {
  await fetch(`/api/devices/${index}/${action}`, { method: "POST" });
}
async function refresh() {
  try {
    const res = await fetch("/api/status");
    const data = await res.json();
    document.getElementById("status").textContent = data.message;
  } catch (e) {}
}
setInterval(refresh, 1000);
"#;

/// GET / - One ON/OFF pair per device plus the status line
pub async fn index_page(State(state): State<PanelState>) -> impl IntoResponse {
    let mut panels = String::new();
    for (index, dispatcher) in state.panel.dispatchers().iter().enumerate() {
        let _ = write!(
            panels,
            concat!(
                "<section class=\"device\"><h2>{name}</h2>",
                "<button onclick=\"trigger({index}, 'on')\">ON</button> ",
                "<button onclick=\"trigger({index}, 'off')\">OFF</button></section>\n"
            ),
            name = encode_text(&dispatcher.device().name),
            index = index,
        );
    }

    Html(format!(
        concat!(
            "<!DOCTYPE html><html><head><meta charset=\"utf-8\">",
            "<title>SwitchBot Controller</title></head><body>\n",
            "{panels}",
            "<p id=\"status\">{status}</p>\n",
            "<script>{script}</script></body></html>"
        ),
        panels = panels,
        status = encode_text(&state.panel.status().current()),
        script = PAGE_SCRIPT,
    ))
}

/// Fallback page when startup failed on a bad configuration
pub async fn config_error_page(State(message): State<Arc<String>>) -> impl IntoResponse {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Html(format!(
            concat!(
                "<!DOCTYPE html><html><head><meta charset=\"utf-8\">",
                "<title>SwitchBot Controller - Configuration Error</title></head>",
                "<body><p>{}</p></body></html>"
            ),
            encode_text(message.as_str())
        )),
    )
}
