pub mod app_config;
pub mod gateway;

pub use app_config::Config;
pub use gateway::{DeviceProfile, HttpGateway};
