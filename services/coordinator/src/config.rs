use anyhow::Result;

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub workers: usize,
    pub tasks: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let log_level = std::env::var("ROOST_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let workers = std::env::var("ROOST_WORKERS")
            .unwrap_or_else(|_| "3".to_string())
            .parse()?;

        let tasks = std::env::var("ROOST_TASKS")
            .unwrap_or_else(|_| "5".to_string())
            .parse()?;

        Ok(Self {
            log_level,
            workers,
            tasks,
        })
    }
}
