//! Lokal Jobs RPC server: JSON-RPC over stdin/stdout for the mobile UI shell.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"bookmark.toggle", "params":{"id":"123"}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}

use serde_json::{json, Value};
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};

use lokaljobs::app::App;
use lokaljobs::logging;
use lokaljobs::rpc_handler::handle_method;
use lokaljobs::services::settings_engine::{SettingsEngine, SettingsEngineTrait};

async fn send(stdout: &mut io::Stdout, message: &Value) -> io::Result<()> {
    let mut line = message.to_string();
    line.push('\n');
    stdout.write_all(line.as_bytes()).await?;
    stdout.flush().await
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut settings = SettingsEngine::new(None);
    let loaded = settings.load();
    settings.apply_env_overrides();
    logging::init(&settings.get_settings().logging.level);
    if let Err(e) = loaded {
        tracing::warn!(error = %e, "settings unreadable; using defaults");
    }

    let app = App::from_settings(&settings)?;
    // Not fatal: store calls initialize lazily.
    let _ = app.startup().await;

    let mut stdout = io::stdout();
    send(&mut stdout, &json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")})).await?;

    let mut lines = BufReader::new(io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let req: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                send(&mut stdout, &json!({"id": null, "error": format!("parse error: {}", e)})).await?;
                continue;
            }
        };

        let id = req.get("id").cloned().unwrap_or(Value::Null);
        let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("");
        let params = req.get("params").cloned().unwrap_or(json!({}));

        let response = match handle_method(&app, method, &params).await {
            Ok(val) => json!({"id": id, "result": val}),
            Err(err) => {
                tracing::debug!(method, error = %err, "rpc call failed");
                json!({"id": id, "error": err})
            }
        };
        send(&mut stdout, &response).await?;
    }

    tracing::info!("stdin closed; shutting down");
    Ok(())
}
