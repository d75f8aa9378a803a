use crate::use_cases::WorkerSettings;
use std::{env, path::PathBuf, time::Duration};

// Runtime knobs read from the environment (server rules live in the config file).

pub fn config_path() -> PathBuf {
    env::var("CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./config.toml"))
}

pub fn rcon_request_timeout() -> Duration {
    millis_from_env("RCON_REQUEST_TIMEOUT_MS", 3000)
}

pub fn worker_settings() -> WorkerSettings {
    let defaults = WorkerSettings::default();
    WorkerSettings {
        session_interval: millis_from_env(
            "SESSION_POLL_INTERVAL_MS",
            defaults.session_interval.as_millis() as u64,
        ),
        player_interval: millis_from_env(
            "PLAYER_POLL_INTERVAL_MS",
            defaults.player_interval.as_millis() as u64,
        ),
        punish_interval: millis_from_env(
            "PUNISH_SCAN_INTERVAL_MS",
            defaults.punish_interval.as_millis() as u64,
        ),
        punish_cooldown: millis_from_env(
            "PUNISH_COOLDOWN_MS",
            defaults.punish_cooldown.as_millis() as u64,
        ),
    }
}

fn millis_from_env(key: &str, default: u64) -> Duration {
    let millis = env::var(key)
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(default);
    Duration::from_millis(millis)
}
