use std::env;
use std::path::PathBuf;

/// Base URL used when `TODO_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "http://localhost:3001";

/// Environment-driven configuration for the session layer.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the remote API (`TODO_API_URL`).
    pub api_url: String,
    /// Location of the persistent session file (`TODO_SESSION_FILE`).
    pub session_file: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            api_url: env::var("TODO_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            session_file: env::var("TODO_SESSION_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_session_file()),
        }
    }
}

fn default_session_file() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("todo-session").join("session.json"))
        .unwrap_or_else(|| PathBuf::from(".todo-session.json"))
}
