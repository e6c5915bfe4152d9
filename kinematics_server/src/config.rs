//! Server configuration, read from the environment with sane defaults —
//! no config file, matching the daemon's original env-driven setup.

use std::net::{SocketAddr, ToSocketAddrs};
use std::time::Duration;

pub struct Config {
    pub bind_addr: SocketAddr,
    /// Wall-clock cap applied to every request via `TimeoutLayer`.
    pub request_timeout: Duration,
}

const DEFAULT_ADDR: &str = "0.0.0.0:8081";

impl Config {
    pub fn from_env() -> Self {
        let bind_addr = std::env::var("KINEMATICS_ADDR")
            .ok()
            .and_then(|v| v.to_socket_addrs().ok().and_then(|mut it| it.next()))
            .unwrap_or_else(|| DEFAULT_ADDR.to_socket_addrs().unwrap().next().unwrap());

        let timeout_secs: u64 = std::env::var("KINEMATICS_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5);

        Config {
            bind_addr,
            request_timeout: Duration::from_secs(timeout_secs),
        }
    }
}
