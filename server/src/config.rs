use std::env;
use std::str::FromStr;

use chatvault_core::ExtractorConfig;

use crate::jobs::worker::WorkerPoolConfig;

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub extractor: ExtractorConfig,
    pub worker_pool: WorkerPoolConfig,
}

impl ServerConfig {
    /// Environment variables:
    /// - `DATABASE_URL` (required)
    /// - `BIND_ADDR` (default `0.0.0.0:3000`)
    /// - `CHATVAULT_TARGET_HOST` (default `chatgpt.com`, overridden in tests)
    /// - `CHATVAULT_WORKERS` / `CHATVAULT_JOBS_PER_WORKER`
    pub fn from_env() -> Self {
        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let mut extractor = ExtractorConfig::default();
        if let Ok(host) = env::var("CHATVAULT_TARGET_HOST") {
            extractor.target_host = host;
        }

        let mut worker_pool = WorkerPoolConfig::default();
        if let Some(workers) = env_parse("CHATVAULT_WORKERS") {
            worker_pool.workers = workers;
        }
        if let Some(per_worker) = env_parse("CHATVAULT_JOBS_PER_WORKER") {
            worker_pool.max_jobs_per_worker = per_worker;
        }

        Self {
            database_url,
            bind_addr,
            extractor,
            worker_pool,
        }
    }
}

fn env_parse<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}
