use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::util::errors::{ReplogError, Result};

/// Which half of the replication pair this process runs as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// Accepts client writes and fans them out to secondaries
    Master,
    /// Buffers replicated messages and heartbeats back to the master
    Secondary,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Master => write!(f, "master"),
            Role::Secondary => write!(f, "secondary"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = ReplogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "master" => Ok(Role::Master),
            "secondary" => Ok(Role::Secondary),
            other => Err(ReplogError::InvalidConfig(format!(
                "unknown role '{}', expected 'master' or 'secondary'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Role of this process
    pub role: Role,

    /// Heartbeat interval in seconds. Drives the secondary's heartbeat
    /// period, the master's staleness thresholds, the retry backoff step
    /// and the catch-up call timeout.
    pub heartbeat_secs: f64,

    /// Address the HTTP server binds to
    pub bind_addr: String,

    /// Ip this node reports in heartbeats (secondary only)
    pub node_ip: String,

    /// Base URL of the master (secondary only)
    pub master_url: String,

    /// Port used when dialing secondaries by the ip they heartbeated from
    /// (master only)
    pub replica_port: u16,
}

impl Config {
    /// Build a configuration from the process environment, with the role
    /// taken from `--role=` when present and the `ROLE` variable otherwise.
    pub fn from_env(args: &[String]) -> Result<Self> {
        let role = parse_role_arg(args)?;

        let mut config = Config {
            role,
            ..Config::default()
        };

        if let Ok(v) = std::env::var("HEARTBEATS") {
            config.heartbeat_secs = v
                .parse::<f64>()
                .map_err(|_| ReplogError::InvalidConfig(format!("HEARTBEATS must be a number, got '{}'", v)))?;
        }
        if let Ok(v) = std::env::var("BIND_ADDR") {
            config.bind_addr = v;
        }
        if let Ok(v) = std::env::var("NODE_IP") {
            config.node_ip = v;
        }
        if let Ok(v) = std::env::var("MASTER_URL") {
            config.master_url = v;
        }
        if let Ok(v) = std::env::var("REPLICA_PORT") {
            config.replica_port = v
                .parse::<u16>()
                .map_err(|_| ReplogError::InvalidConfig(format!("REPLICA_PORT must be a port, got '{}'", v)))?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs_f64(self.heartbeat_secs)
    }

    /// Timeout for one heartbeat-triggered catch-up call, slightly under a
    /// full heartbeat period so the call cannot outlive the next heartbeat.
    pub fn catchup_timeout(&self) -> Duration {
        Duration::from_secs_f64((self.heartbeat_secs - 0.01).max(0.0))
    }

    pub fn validate(&self) -> Result<()> {
        if self.heartbeat_secs <= 0.0 {
            return Err(ReplogError::InvalidConfig(
                "heartbeat interval must be positive".to_string(),
            ));
        }

        if self.node_ip.is_empty() {
            return Err(ReplogError::InvalidConfig("node_ip cannot be empty".to_string()));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            role: Role::Master,
            heartbeat_secs: 3.0,
            bind_addr: "0.0.0.0:8000".to_string(),
            node_ip: "127.0.0.1".to_string(),
            master_url: "http://master:8000".to_string(),
            replica_port: 8000,
        }
    }
}

fn parse_role_arg(args: &[String]) -> Result<Role> {
    for arg in args.iter().skip(1) {
        if let Some(role) = arg.strip_prefix("--role=") {
            return role.parse();
        }
    }

    // Fall back to the environment
    if let Ok(role) = std::env::var("ROLE") {
        return role.parse();
    }

    Err(ReplogError::InvalidConfig(
        "role not provided. Use: cargo run -- --role=master|secondary\nOr set the ROLE environment variable".to_string(),
    ))
}
