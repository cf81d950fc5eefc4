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
    /// Graceful shutdown timeout in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Heartbeat age after which an Online node reads as Offline
    /// (default: `50`).
    pub node_timeout_secs: i64,
    /// Interval between progress reconciliation sweeps (default: `30`).
    pub sweep_interval_secs: u64,
    /// Concurrent queue pushes during a dispatch fan-out (default: `8`).
    pub dispatch_concurrency: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                       | Default                 |
    /// |-------------------------------|-------------------------|
    /// | `HOST`                        | `0.0.0.0`               |
    /// | `PORT`                        | `3000`                  |
    /// | `CORS_ORIGINS`                | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`        | `30`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS`       | `30`                    |
    /// | `NODE_TIMEOUT_SECS`           | `50`                    |
    /// | `PROGRESS_SWEEP_INTERVAL_SECS`| `30`                    |
    /// | `DISPATCH_CONCURRENCY`        | `8`                     |
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

        let node_timeout_secs: i64 = std::env::var("NODE_TIMEOUT_SECS")
            .unwrap_or_else(|_| "50".into())
            .parse()
            .expect("NODE_TIMEOUT_SECS must be a valid i64");

        let sweep_interval_secs: u64 = std::env::var("PROGRESS_SWEEP_INTERVAL_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("PROGRESS_SWEEP_INTERVAL_SECS must be a valid u64");

        let dispatch_concurrency: usize = std::env::var("DISPATCH_CONCURRENCY")
            .unwrap_or_else(|_| "8".into())
            .parse()
            .expect("DISPATCH_CONCURRENCY must be a valid usize");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            node_timeout_secs,
            sweep_interval_secs,
            dispatch_concurrency,
        }
    }
}
