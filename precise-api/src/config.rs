use std::env;
use std::path::PathBuf;

use crate::services::StagingConfig;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub db_max_connections: u32,

    // Token validation
    pub jwt_access_secret: String,

    // Audio file staging
    pub data_dir: PathBuf,
    pub precise_server: String,
    pub precise_ssh_port: u16,
    pub local_user: String,

    // Tagging
    pub tag_cooldown_seconds: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_url: String::new(),
            db_max_connections: 10,

            jwt_access_secret: String::new(),

            data_dir: PathBuf::new(),
            precise_server: String::new(),
            precise_ssh_port: 22,
            local_user: "precise".to_string(),

            // One hour between two taggings of the same file
            tag_cooldown_seconds: 3600,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();

        let mut config = Config::default();

        if let Ok(host) = env::var("HOST") {
            config.host = host;
        }

        if let Ok(port) = env::var("PORT") {
            config.port = port.parse().map_err(|e| format!("Invalid PORT: {}", e))?;
        }

        config.database_url = required("DATABASE_URL")?;

        if let Ok(max_connections) = env::var("DB_MAX_CONNECTIONS") {
            config.db_max_connections = max_connections
                .parse()
                .map_err(|e| format!("Invalid DB_MAX_CONNECTIONS: {}", e))?;
        }

        config.jwt_access_secret = required("JWT_ACCESS_SECRET")?;

        config.data_dir = PathBuf::from(required("SELENE_DATA_DIR")?);
        config.precise_server = required("PRECISE_SERVER")?;

        if let Ok(ssh_port) = env::var("PRECISE_SSH_PORT") {
            config.precise_ssh_port = ssh_port
                .parse()
                .map_err(|e| format!("Invalid PRECISE_SSH_PORT: {}", e))?;
        }

        if let Ok(user) = env::var("USER") {
            config.local_user = user;
        }

        if let Ok(cooldown) = env::var("TAG_COOLDOWN_SECONDS") {
            config.tag_cooldown_seconds = cooldown
                .parse()
                .map_err(|e| format!("Invalid TAG_COOLDOWN_SECONDS: {}", e))?;
        }

        Ok(config)
    }

    pub fn staging(&self) -> StagingConfig {
        StagingConfig {
            data_dir: self.data_dir.clone(),
            precise_server: self.precise_server.clone(),
            precise_ssh_port: self.precise_ssh_port,
            local_user: self.local_user.clone(),
        }
    }
}

fn required(name: &str) -> Result<String, String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(format!("Missing required environment variable {}", name)),
    }
}
