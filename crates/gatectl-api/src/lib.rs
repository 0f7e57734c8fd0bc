// gatectl-api: Async Rust client for the gateway device HTTP API

pub mod auth;
pub mod device;
pub mod error;
pub mod models;
pub mod transport;

pub use auth::{Credentials, TokenPolicy};
pub use device::{DeviceClient, Payload, RequestBody};
pub use error::Error;
pub use reqwest::Method;
pub use models::{
    Ack, CommandInvocation, CommandResponse, CommandResult, ConnectionMode, DeviceStatus,
    DeviceTuningConfig, FirmwareImage, Flag, GeneralConfig, LoginResult, NetworkConfig,
    PasswordChange, ServerConfig, TelnetSettings,
};
pub use transport::{TlsMode, TransportConfig};
