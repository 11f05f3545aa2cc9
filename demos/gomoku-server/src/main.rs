use gomoku::prelude::*;
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

const DEFAULT_ADDR: &str = "0.0.0.0:8080";

/// Builds the room policies from optional `GOMOKU_DISCONNECT_POLICY` and
/// `GOMOKU_RESET_POLICY` values. Unset means the default.
fn room_config(disconnect: Option<&str>, reset: Option<&str>) -> Result<RoomConfig, String> {
    let mut config = RoomConfig::default();
    if let Some(value) = disconnect {
        config.disconnect_policy = value.parse()?;
    }
    if let Some(value) = reset {
        config.reset_policy = value.parse()?;
    }
    Ok(config)
}

// ---------------------------------------------------------------------------
// Server bootstrap
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let addr = std::env::var("GOMOKU_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let disconnect = std::env::var("GOMOKU_DISCONNECT_POLICY").ok();
    let reset = std::env::var("GOMOKU_RESET_POLICY").ok();
    let config = room_config(disconnect.as_deref(), reset.as_deref())?;

    tracing::info!(
        %addr,
        disconnect_policy = ?config.disconnect_policy,
        reset_policy = ?config.reset_policy,
        "starting gomoku server"
    );

    let server = GomokuServerBuilder::new()
        .bind(&addr)
        .room_config(config)
        .build(TrustedAuthenticator)
        .await?;

    server.run().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_config_defaults_when_unset() {
        assert_eq!(room_config(None, None), Ok(RoomConfig::default()));
    }

    #[test]
    fn test_room_config_from_env_values() {
        let config = room_config(Some("abandon"), Some("owner")).unwrap();
        assert_eq!(config.disconnect_policy, DisconnectPolicy::Abandon);
        assert_eq!(config.reset_policy, ResetPolicy::OwnerOnly);
    }

    #[test]
    fn test_room_config_rejects_unknown_policy() {
        assert!(room_config(Some("explode"), None).is_err());
    }
}
