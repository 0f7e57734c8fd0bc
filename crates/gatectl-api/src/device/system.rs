// Status, serial command channel, and administration endpoints.

use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use crate::device::client::{DeviceClient, RequestBody};
use crate::error::Error;
use crate::models::{
    Ack, CommandInvocation, CommandResponse, DeviceStatus, FirmwareImage, PasswordChange,
    TelnetSettings,
};

impl DeviceClient {
    /// Device identity and status.
    ///
    /// `GET /api/status`
    pub async fn get_status(&self) -> Result<DeviceStatus, Error> {
        debug!("fetching device status");
        self.get("/api/status").await
    }

    /// Run a command on the device's serial console.
    ///
    /// `POST /serial/cmd` with `{"cmd": "..."}`
    pub async fn send_command(&self, invocation: &CommandInvocation) -> Result<CommandResponse, Error> {
        debug!(cmd = %invocation.cmd, "sending serial command");
        let body = RequestBody::json(invocation)?;
        let payload = self.request(Method::POST, "/serial/cmd", body).await?;
        Ok(CommandResponse::from_payload(payload))
    }

    /// `POST /api/changeP`
    pub async fn change_admin_password(&self, change: &PasswordChange) -> Result<Ack, Error> {
        debug!("changing admin password");
        self.post_ack("/api/changeP", change).await
    }

    /// `POST /api/settelnet`
    pub async fn enable_telnet(&self, settings: &TelnetSettings) -> Result<Ack, Error> {
        debug!(enabled = settings.enabled, port = ?settings.port, "updating telnet");
        self.post_ack("/api/settelnet", settings).await
    }

    /// Current telnet state.
    ///
    /// `GET /api/gettelnet` -- loosely typed; firmware builds disagree on
    /// the shape.
    pub async fn get_telnet(&self) -> Result<Value, Error> {
        debug!("fetching telnet state");
        self.get("/api/gettelnet").await
    }

    /// `GET /api/getbackup`
    pub async fn get_backup(&self) -> Result<Value, Error> {
        debug!("fetching backup record");
        self.get("/api/getbackup").await
    }

    /// `POST /api/setbackup`
    pub async fn set_backup(&self, record: &Value) -> Result<Ack, Error> {
        debug!("writing backup record");
        self.post_ack("/api/setbackup", record).await
    }

    /// `POST /api/factroryReset` (the firmware's spelling).
    pub async fn factory_reset(&self, record: &Value) -> Result<Ack, Error> {
        debug!("requesting factory reset");
        self.post_ack("/api/factroryReset", record).await
    }

    /// `POST /api/restore`
    pub async fn restore(&self, record: &Value) -> Result<Ack, Error> {
        debug!("requesting restore");
        self.post_ack("/api/restore", record).await
    }

    /// Upload a firmware image as a multipart form.
    ///
    /// `POST /api/update`
    pub async fn firmware_update(&self, image: FirmwareImage) -> Result<Ack, Error> {
        debug!(file = %image.file_name, size = image.bytes.len(), "uploading firmware");
        let body = RequestBody::Form(image.into_form());
        let payload = self.request(Method::POST, "/api/update", body).await?;
        Ok(Ack::from_payload(payload))
    }
}
