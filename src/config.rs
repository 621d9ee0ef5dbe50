use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub database_url: String,
    pub admin_api_key: String,
    pub payment_base_url: String,
    pub payment_key_id: String,
    pub payment_key_secret: String,
    pub payment_currency: String,
    pub admin_rps: u32,
    pub public_rps: u32,
    pub uploads_dir: String,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_address: get_env("SERVER_ADDRESS")?,
            database_url: get_env("DATABASE_URL")?,
            admin_api_key: get_env("ADMIN_API_KEY")?,
            payment_base_url: get_env("PAYMENT_BASE_URL")?,
            payment_key_id: get_env("PAYMENT_KEY_ID")?,
            payment_key_secret: get_env("PAYMENT_KEY_SECRET")?,
            payment_currency: env::var("PAYMENT_CURRENCY").unwrap_or_else(|_| "INR".to_string()),
            admin_rps: get_env_parse("ADMIN_RPS")?,
            public_rps: get_env_parse("PUBLIC_RPS")?,
            uploads_dir: env::var("UPLOADS_DIR").unwrap_or_else(|_| "./uploads".to_string()),
        })
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_parse<T>(name: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = get_env(name)?;
    raw.parse()
        .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e)))
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}
