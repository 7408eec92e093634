use crate::infrastructure::{CliError, Result};
use peerlink_core::SessionConfig;
use std::path::Path;

/// Load session tuning from a JSON file, or defaults when no path is given
pub fn load_session_config(path: Option<&Path>) -> Result<SessionConfig> {
    let Some(path) = path else {
        return Ok(SessionConfig::default());
    };

    if !path.exists() {
        return Err(CliError::config_not_found(path.to_path_buf()));
    }

    let raw = std::fs::read_to_string(path)?;
    let config: SessionConfig = serde_json::from_str(&raw)?;

    check_range("history_limit", config.history_limit, SessionConfig::MAX_HISTORY_LIMIT)?;
    check_range("queue_capacity", config.queue_capacity, SessionConfig::MAX_QUEUE_CAPACITY)?;
    check_range("batch_size", config.batch_size, usize::MAX)?;
    if config.poll_interval_ms == 0 {
        return Err(CliError::InvalidConfig(
            "poll_interval_ms must be at least 1".to_string(),
        ));
    }

    tracing::debug!("Loaded session config from {}", path.display());
    Ok(config)
}

fn check_range(field: &str, value: usize, max: usize) -> Result<()> {
    if value == 0 || value > max {
        return Err(CliError::InvalidConfig(format!(
            "{field} must be between 1 and {max}, got {value}"
        )));
    }
    Ok(())
}
