use serde::Deserialize;
use std::env;

use porta_core::models::{Address, CartItem, StoreInfo};

use crate::gateway::DeviceProfile;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub device: DeviceProfile,
    pub profile: ProfileConfig,
    #[serde(default)]
    pub flow: FlowConfig,
    #[serde(default)]
    pub order: OrderConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    5000
}

/// Session credentials; acquisition lives outside this agent.
#[derive(Debug, Deserialize, Clone)]
pub struct ProfileConfig {
    pub auth_token: String,
    pub uid: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FlowConfig {
    /// Extra days of capacity to request beyond today.
    pub lookahead_days: i64,
    /// Attempt budget per stage, including the first call.
    pub max_attempts: u32,
    pub backoff_ms: u64,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            lookahead_days: 1,
            max_attempts: 3,
            backoff_ms: 500,
        }
    }
}

/// Seed data for the session: what to buy, where to deliver it.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct OrderConfig {
    pub floor_id: i64,
    pub address: Option<Address>,
    pub store: Option<StoreInfo>,
    pub cart: Vec<CartItem>,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(config::File::with_name("config/default"))
            // Add in the current environment file
            // Default to 'development' env
            // Note that this file is _optional_
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add in a local configuration file
            // This file shouldn't be checked in to git
            .add_source(config::File::with_name("config/local").required(false))
            // Add in settings from the environment (with a prefix of PORTA)
            .add_source(config::Environment::with_prefix("PORTA").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
