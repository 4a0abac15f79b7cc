use std::time::Duration;

pub const DEFAULT_COLLECT_INTERVAL_SECS: u64 = 60;

/// How the process spends its life
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// HTTP API with the collector running in the background
    Server,
    /// Collector loop only
    Local,
}

impl RunMode {
    /// `RUN_MODE=server|local`; when unset, hosted deployments (`VERCEL=1`) run as a server.
    pub fn from_env() -> Result<Self, String> {
        match std::env::var("RUN_MODE") {
            Ok(mode) => Self::parse(&mode),
            Err(_) if std::env::var("VERCEL").as_deref() == Ok("1") => Ok(RunMode::Server),
            Err(_) => Ok(RunMode::Local),
        }
    }

    fn parse(mode: &str) -> Result<Self, String> {
        match mode.trim().to_lowercase().as_str() {
            "server" => Ok(RunMode::Server),
            "local" => Ok(RunMode::Local),
            other => Err(format!(
                "Unknown RUN_MODE '{}'. Supported modes: server, local",
                other
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub mode: RunMode,
    pub collect_interval: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            mode: RunMode::Local,
            collect_interval: Duration::from_secs(DEFAULT_COLLECT_INTERVAL_SECS),
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, String> {
        let mut config = Self::default();

        if let Ok(host) = std::env::var("API_HOST") {
            config.host = host;
        }
        if let Some(port) = std::env::var("API_PORT").ok().and_then(|p| p.parse().ok()) {
            config.port = port;
        }
        if let Some(secs) = std::env::var("COLLECT_INTERVAL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|secs: &u64| *secs > 0)
        {
            config.collect_interval = Duration::from_secs(secs);
        }
        config.mode = RunMode::from_env()?;

        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
