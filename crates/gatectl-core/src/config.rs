// ── Runtime connection configuration ──
//
// Describes *how* to reach a device. Front ends build a `GatewayConfig`
// from profiles and flags and hand it in; core never reads config files.

use std::time::Duration;

use gatectl_api::transport::{TlsMode, TransportConfig};
use gatectl_api::{DeviceClient, TokenPolicy};
use url::Url;

use crate::error::CoreError;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification. Default: device firmware ships self-signed certs.
    #[default]
    DangerAcceptInvalid,
}

/// Configuration for talking to a single device.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Device base URL (e.g., `http://192.168.4.1:8008`).
    pub url: Url,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout. `None` leaves requests unbounded.
    pub timeout: Option<Duration>,
    /// Whether the login token is attached to later requests.
    pub token_policy: TokenPolicy,
}

impl GatewayConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            tls: TlsVerification::default(),
            timeout: None,
            token_policy: TokenPolicy::default(),
        }
    }

    /// Build the device client this configuration describes.
    pub fn connect(&self) -> Result<DeviceClient, CoreError> {
        Ok(DeviceClient::new(
            self.url.clone(),
            self.token_policy,
            &self.transport(),
        )?)
    }

    fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
            cookie_jar: None,
        }
        .with_cookie_jar()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn connect_keeps_policy_and_url() {
        let mut config = GatewayConfig::new(Url::parse("http://192.168.4.1:8008").unwrap());
        config.token_policy = TokenPolicy::Bearer;
        config.timeout = Some(Duration::from_secs(5));

        let client = config.connect().unwrap();
        assert_eq!(client.base_url().as_str(), "http://192.168.4.1:8008/");
        assert_eq!(client.token_policy(), TokenPolicy::Bearer);
    }

    #[test]
    fn transport_always_has_cookie_jar() {
        let config = GatewayConfig::new(Url::parse("http://192.168.4.1").unwrap());
        let transport = config.transport();
        assert!(transport.cookie_jar.is_some());
        assert!(transport.timeout.is_none());
    }
}
