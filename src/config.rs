use std::env;
use std::net::{IpAddr, SocketAddr};

use config_crate::{Config as RawConfig, ConfigError, Environment, File};

enum Env {
    Development,
    Test,
    Production,
}

impl Env {
    fn new() -> Self {
        match env::var("RUN_MODE") {
            Ok(ref s) if s == "test" => Env::Test,
            Ok(ref s) if s == "production" => Env::Production,
            _ => Env::Development,
        }
    }

    fn to_string(&self) -> &'static str {
        match self {
            &Env::Development => "development",
            &Env::Production => "production",
            &Env::Test => "test",
        }
    }
}

/// Service configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Listen {
    pub host: IpAddr,
    pub port: u16,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Database {
    pub dsn: String,
    pub pool_size: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Server {
    /// Threads of the pool that runs blocking database work
    pub thread_count: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WhatsApp {
    /// Used when no admin settings row exists yet
    pub default_business_number: String,
    pub country_code: String,
    /// Offset of the business-hours timezone from UTC
    pub utc_offset_seconds: i32,
}

impl Default for WhatsApp {
    fn default() -> Self {
        Self {
            default_business_number: "2348012345678".to_string(),
            country_code: "234".to_string(),
            utc_offset_seconds: 3600,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Server listen address
    pub listen: Listen,
    /// Database settings
    pub db: Database,
    pub server: Server,
    pub whatsapp: WhatsApp,
}

impl Config {
    /// Creates config from base.toml, which are overwritten by <env>.toml, where
    /// env is one of development, test, production. After that it could be overwritten
    /// by env variables like JERSEYS_LISTEN (this will override `listen` field in config)
    pub fn new() -> Result<Self, ConfigError> {
        let env = Env::new();
        let mut s = RawConfig::new();

        s.merge(File::with_name("config/base"))?;
        // Optional file specific for environment
        s.merge(File::with_name(&format!("config/{}", env.to_string())).required(false))?;

        s.merge(Environment::with_prefix("JERSEYS"))?;

        s.try_into()
    }

    pub fn listen_address(&self) -> SocketAddr {
        SocketAddr::new(self.listen.host, self.listen.port)
    }
}
