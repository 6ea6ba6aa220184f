//! Server configuration from environment variables

use std::net::SocketAddr;
use std::path::PathBuf;

use tracing::warn;

const DEFAULT_DATA_DIR: &str = ".taskapp-data";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8081";
const DEFAULT_REMINDER_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub data_dir: PathBuf,
    pub bind_addr: SocketAddr,
    pub reminder_capacity: usize,
    pub log_reminders: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            bind_addr: default_bind_addr(),
            reminder_capacity: DEFAULT_REMINDER_CAPACITY,
            log_reminders: true,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let data_dir = lookup("TASKAPP_DATA_DIR")
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let bind_addr = match lookup("TASKAPP_BIND_ADDR") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!("Invalid TASKAPP_BIND_ADDR {:?}, using {}", raw, DEFAULT_BIND_ADDR);
                defaults.bind_addr
            }),
            None => defaults.bind_addr,
        };

        let reminder_capacity = match lookup("TASKAPP_REMINDER_CAPACITY") {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    warn!(
                        "Invalid TASKAPP_REMINDER_CAPACITY {:?}, using {}",
                        raw, DEFAULT_REMINDER_CAPACITY
                    );
                    defaults.reminder_capacity
                }
            },
            None => defaults.reminder_capacity,
        };

        let log_reminders = flag(lookup("TASKAPP_LOG_REMINDERS"), defaults.log_reminders);

        Self {
            data_dir,
            bind_addr,
            reminder_capacity,
            log_reminders,
        }
    }

    pub fn tasks_path(&self) -> PathBuf {
        self.data_dir.join("tasks.json")
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8081))
}

fn flag(raw: Option<String>, default: bool) -> bool {
    match raw {
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        None => default,
    }
}
