use std::time::Duration;

use bridal_core::rental::window::DEFAULT_RESERVATION_WINDOW_MINUTES;
use bridal_core::rental::ReservationWindow;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Time allowed for background tasks to stop after the listener closes
    /// (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// How long a checkout hold stays valid (default: `15`).
    pub reservation_window_minutes: i64,
    /// Interval between expired-reservation sweeps (default: `30`).
    pub reservation_sweep_interval_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                           | Default                 |
    /// |-----------------------------------|-------------------------|
    /// | `HOST`                            | `0.0.0.0`               |
    /// | `PORT`                            | `3000`                  |
    /// | `CORS_ORIGINS`                    | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`            | `30`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS`           | `30`                    |
    /// | `RESERVATION_WINDOW_MINUTES`      | `15`                    |
    /// | `RESERVATION_SWEEP_INTERVAL_SECS` | `30`                    |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let reservation_window_minutes: i64 = std::env::var("RESERVATION_WINDOW_MINUTES")
            .map(|v| v.parse().expect("RESERVATION_WINDOW_MINUTES must be a valid i64"))
            .unwrap_or(DEFAULT_RESERVATION_WINDOW_MINUTES);
        assert!(
            reservation_window_minutes > 0,
            "RESERVATION_WINDOW_MINUTES must be positive"
        );

        let reservation_sweep_interval_secs: u64 =
            std::env::var("RESERVATION_SWEEP_INTERVAL_SECS")
                .unwrap_or_else(|_| "30".into())
                .parse()
                .expect("RESERVATION_SWEEP_INTERVAL_SECS must be a valid u64");
        assert!(
            reservation_sweep_interval_secs > 0,
            "RESERVATION_SWEEP_INTERVAL_SECS must be positive"
        );

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            reservation_window_minutes,
            reservation_sweep_interval_secs,
        }
    }

    pub fn reservation_window(&self) -> ReservationWindow {
        ReservationWindow::from_minutes(self.reservation_window_minutes)
    }

    pub fn reservation_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.reservation_sweep_interval_secs)
    }
}
