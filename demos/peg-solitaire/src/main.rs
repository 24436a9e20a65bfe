use pegforge::prelude::*;
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Table name that always plays on the European board.
const EUROPEAN_TABLE: &str = "european";

/// Board config for a `PEGFORGE_LAYOUT` value.
fn layout_config(name: &str) -> Result<BoardConfig, String> {
    match name.trim().to_ascii_lowercase().as_str() {
        "english" => Ok(BoardConfig::default()),
        // The centre-hole European start can't be solved, so let the
        // player pick the opening hole.
        "european" => Ok(BoardConfig::full(Shape::European)),
        other => Err(format!("unknown layout {other:?} (expected english or european)")),
    }
}

/// Builds the server config from an optional JSON file plus the
/// `PEGFORGE_BIND` and `PEGFORGE_LAYOUT` overrides.
fn server_config(
    file: Option<&str>,
    bind: Option<&str>,
    layout: Option<&str>,
) -> Result<ServerConfig, Box<dyn std::error::Error>> {
    let mut config: ServerConfig = match file {
        Some(text) => serde_json::from_str(text)?,
        None => ServerConfig::default(),
    };

    if let Some(bind) = bind {
        config.bind = bind.to_string();
    }
    if let Some(layout) = layout {
        config.table.board = layout_config(layout)?;
    }
    config
        .tables
        .entry(EUROPEAN_TABLE.to_string())
        .or_insert_with(|| TableConfig {
            board: BoardConfig::full(Shape::European),
            ..TableConfig::default()
        });

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let file = match std::env::var("PEGFORGE_CONFIG") {
        Ok(path) => Some(std::fs::read_to_string(path)?),
        Err(_) => None,
    };
    let bind = std::env::var("PEGFORGE_BIND").ok();
    let layout = std::env::var("PEGFORGE_LAYOUT").ok();

    let config = server_config(file.as_deref(), bind.as_deref(), layout.as_deref())?;
    tracing::info!(bind = %config.bind, "starting peg solitaire server");

    let server = PegforgeServerBuilder::from_config(config).build().await?;

    tokio::select! {
        result = server.run() => result?,
        _ = tokio::signal::ctrl_c() => tracing::info!("shutting down"),
    }
    Ok(())
}
