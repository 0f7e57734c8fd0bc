// Configuration resources
//
// Each resource is read-modify-write: the getter returns the complete
// record, the setter always posts the complete record back.

use tracing::debug;

use crate::device::client::DeviceClient;
use crate::error::Error;
use crate::models::{Ack, DeviceTuningConfig, GeneralConfig, NetworkConfig, ServerConfig};

impl DeviceClient {
    /// `GET /api/general`
    pub async fn get_general_config(&self) -> Result<GeneralConfig, Error> {
        debug!("fetching general config");
        self.get("/api/general").await
    }

    /// `POST /api/general`
    pub async fn set_general_config(&self, config: &GeneralConfig) -> Result<Ack, Error> {
        debug!("saving general config");
        self.post_ack("/api/general", config).await
    }

    /// `GET /api/getserverset`
    pub async fn get_server_config(&self) -> Result<ServerConfig, Error> {
        debug!("fetching server config");
        self.get("/api/getserverset").await
    }

    /// `POST /api/setserverset`
    pub async fn set_server_config(&self, config: &ServerConfig) -> Result<Ack, Error> {
        debug!("saving server config");
        self.post_ack("/api/setserverset", config).await
    }

    /// `GET /api/getdevconf`
    pub async fn get_device_config(&self) -> Result<DeviceTuningConfig, Error> {
        debug!("fetching device tuning config");
        self.get("/api/getdevconf").await
    }

    /// `POST /api/setdevconf`
    pub async fn set_device_config(&self, config: &DeviceTuningConfig) -> Result<Ack, Error> {
        debug!("saving device tuning config");
        self.post_ack("/api/setdevconf", config).await
    }

    /// `GET /api/getconnectivity`
    pub async fn get_network_config(&self) -> Result<NetworkConfig, Error> {
        debug!("fetching network config");
        self.get("/api/getconnectivity").await
    }

    /// `POST /api/setconnectivity`
    pub async fn set_network_config(&self, config: &NetworkConfig) -> Result<Ack, Error> {
        debug!("saving network config");
        self.post_ack("/api/setconnectivity", config).await
    }
}
