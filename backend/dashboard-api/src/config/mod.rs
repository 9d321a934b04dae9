use serde::Deserialize;

pub const MEMORY_DATABASE_URL: &str = "memory://";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Dashboard origin allowed to send credentialed requests
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL URL, or `memory://` for the in-process store
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

/// Signing secret for phone bearer tokens
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub secret: String,
    #[serde(default = "default_expiry_hours")]
    pub expiry_hours: i64,
    /// Mark the session cookie `Secure` (serve over HTTPS)
    #[serde(default)]
    pub secure_cookie: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "http://localhost:3000".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_expiry_hours() -> i64 {
    24
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::Environment::default().separator("__"))
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("server.cors_origin", "http://localhost:3000")?
            .set_default("database.url", "postgres://localhost/post_desk")?
            .set_default("database.max_connections", 10)?
            .set_default("jwt.secret", "development-phone-secret-change-in-production")?
            .set_default("session.secret", "development-session-secret-change-in-production")?
            .set_default("session.expiry_hours", 24)?
            .set_default("session.secure_cookie", false)?
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Default settings backed by the in-memory store.
    pub fn in_memory() -> Self {
        Self {
            server: ServerConfig {
                host: default_host(),
                port: default_port(),
                cors_origin: default_cors_origin(),
            },
            database: DatabaseConfig {
                url: MEMORY_DATABASE_URL.to_string(),
                max_connections: default_max_connections(),
            },
            jwt: JwtConfig {
                secret: "development-phone-secret-change-in-production".to_string(),
            },
            session: SessionConfig {
                secret: "development-session-secret-change-in-production".to_string(),
                expiry_hours: default_expiry_hours(),
                secure_cookie: false,
            },
        }
    }

    pub fn uses_memory_store(&self) -> bool {
        self.database.url.starts_with(MEMORY_DATABASE_URL)
    }
}
