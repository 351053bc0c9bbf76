use chrono::{Duration, NaiveDate, Utc};
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,

    // Day whose api metrics are moved into their own partition
    pub partition_date: NaiveDate,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            db_max_connections: 2,
            // The job runs shortly after midnight for the day that just ended
            partition_date: (Utc::now() - Duration::days(1)).date_naive(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();

        let mut config = Config::default();

        config.database_url = env::var("DATABASE_URL")
            .map_err(|_| "Missing required environment variable DATABASE_URL".to_string())?;

        if let Ok(max_connections) = env::var("DB_MAX_CONNECTIONS") {
            config.db_max_connections = max_connections
                .parse()
                .map_err(|e| format!("Invalid DB_MAX_CONNECTIONS: {}", e))?;
        }

        if let Ok(date) = env::var("PARTITION_DATE") {
            config.partition_date = parse_partition_date(&date)?;
        }

        Ok(config)
    }
}

pub fn parse_partition_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|e| format!("Invalid PARTITION_DATE {:?}: {}", value, e))
}
