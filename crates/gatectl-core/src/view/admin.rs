// ── Administration panel ──
//
// Password change, telnet, backup/restore, factory reset, and firmware
// upgrade. Local checks (matching passwords, a selected file, an explicit
// confirmation) run before anything is sent to the device.

use std::future::Future;

use gatectl_api::{Ack, DeviceClient, FirmwareImage, PasswordChange, TelnetSettings};
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::error::CoreError;
use crate::view::lifecycle::ViewLifecycle;

const PASSWORD_MISMATCH: &str = "Passwords do not match!";
const NO_FIRMWARE: &str = "Please select a firmware file to upgrade.";
const RESET_UNCONFIRMED: &str = "Factory reset was not confirmed.";

#[derive(Debug, Default)]
pub struct AdminPanel {
    busy: bool,
    error: Option<String>,
    notice: Option<String>,
    lifecycle: ViewLifecycle,
}

impl AdminPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn cancel_handle(&self) -> CancellationToken {
        self.lifecycle.cancel_token()
    }

    pub fn unmount(&mut self) {
        self.lifecycle.unmount();
        self.busy = false;
    }

    // ── Password ─────────────────────────────────────────────────────

    /// Change the admin password. `new_password` must be non-empty and
    /// equal to `confirmation`.
    pub async fn change_password(
        &mut self,
        client: &DeviceClient,
        old_password: Option<&str>,
        new_password: &str,
        confirmation: &str,
    ) -> Result<(), CoreError> {
        if new_password.is_empty() {
            return Err(self.refuse("password", "must not be empty", "Password must not be empty."));
        }
        if new_password != confirmation {
            return Err(self.refuse("password", "confirmation does not match", PASSWORD_MISMATCH));
        }
        let change = PasswordChange {
            old_password: old_password.map(str::to_owned),
            new_password: new_password.to_owned(),
        };
        let ack = self.run("Password change", client.change_admin_password(&change)).await?;
        self.settle(ack, "Admin password changed successfully!")
    }

    // ── Telnet ───────────────────────────────────────────────────────

    pub async fn set_telnet(
        &mut self,
        client: &DeviceClient,
        enabled: bool,
        port: Option<u16>,
    ) -> Result<(), CoreError> {
        let settings = TelnetSettings { enabled, port };
        let ack = self.run("Telnet update", client.enable_telnet(&settings)).await?;
        let state = if enabled { "enabled" } else { "disabled" };
        self.settle(ack, &format!("Telnet {state}."))
    }

    /// Current telnet state, as the device reports it.
    pub async fn telnet_state(&mut self, client: &DeviceClient) -> Result<Value, CoreError> {
        self.run("Telnet query", client.get_telnet()).await
    }

    // ── Backup / restore ─────────────────────────────────────────────

    /// Fetch the device's backup record.
    pub async fn backup(&mut self, client: &DeviceClient) -> Result<Value, CoreError> {
        let record = self.run("Backup", client.get_backup()).await?;
        self.notice = Some("Backup downloaded.".to_owned());
        Ok(record)
    }

    /// Write a backup record back to the device verbatim.
    pub async fn upload_backup(
        &mut self,
        client: &DeviceClient,
        record: &Value,
    ) -> Result<(), CoreError> {
        let ack = self.run("Backup upload", client.set_backup(record)).await?;
        self.settle(ack, "Backup uploaded.")
    }

    /// Ask the device to restore from its stored backup.
    pub async fn restore(&mut self, client: &DeviceClient, record: &Value) -> Result<(), CoreError> {
        let ack = self.run("Restore", client.restore(record)).await?;
        self.settle(ack, "Restore initiated!")
    }

    /// Factory reset. Nothing is sent unless `confirmed` is true.
    pub async fn factory_reset(
        &mut self,
        client: &DeviceClient,
        confirmed: bool,
        record: Option<&Value>,
    ) -> Result<(), CoreError> {
        if !confirmed {
            return Err(self.refuse("confirmation", "factory reset requires confirmation", RESET_UNCONFIRMED));
        }
        let empty = Value::Object(Map::new());
        let record = record.unwrap_or(&empty);
        warn!("requesting factory reset");
        let ack = self.run("Factory reset", client.factory_reset(record)).await?;
        self.settle(ack, "Factory Reset initiated!")
    }

    // ── Firmware ─────────────────────────────────────────────────────

    /// Upload a firmware image. A missing file is refused locally.
    pub async fn upgrade_firmware(
        &mut self,
        client: &DeviceClient,
        image: Option<FirmwareImage>,
    ) -> Result<(), CoreError> {
        let Some(image) = image else {
            return Err(self.refuse("firmware", "no file selected", NO_FIRMWARE));
        };
        info!(file = %image.file_name, bytes = image.bytes.len(), "initiating firmware upgrade");
        let name = image.file_name.clone();
        let ack = self.run("Firmware upgrade", client.firmware_update(image)).await?;
        self.settle(ack, &format!("Firmware upgrade started with file: {name}"))
    }

    // ── Plumbing ─────────────────────────────────────────────────────

    fn refuse(&mut self, field: &str, reason: &str, shown: &str) -> CoreError {
        self.notice = None;
        self.error = Some(shown.to_owned());
        CoreError::validation(field, reason)
    }

    /// Run one device call with the busy gate and the unmount token.
    async fn run<T>(
        &mut self,
        operation: &'static str,
        call: impl Future<Output = Result<T, gatectl_api::Error>>,
    ) -> Result<T, CoreError> {
        if !self.lifecycle.is_mounted() {
            return Err(CoreError::Cancelled);
        }
        if self.busy {
            return Err(CoreError::Busy { operation });
        }
        self.busy = true;
        self.error = None;
        self.notice = None;

        let ticket = self.lifecycle.start_save();
        let cancel = self.lifecycle.cancel_token();
        let result = tokio::select! {
            () = cancel.cancelled() => {
                self.unmount();
                return Err(CoreError::Cancelled);
            }
            result = call => result,
        };
        if !self.lifecycle.is_current(ticket) {
            return Err(CoreError::Cancelled);
        }
        self.busy = false;

        result.map_err(|e| {
            error!(operation, error = %e, "admin action failed");
            self.error = Some(format!("{operation} failed: {e}"));
            e.into()
        })
    }

    fn settle(&mut self, ack: Ack, success: &str) -> Result<(), CoreError> {
        if ack.success {
            info!("{success}");
            self.notice = Some(success.to_owned());
            return Ok(());
        }
        let message = ack
            .message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| "Device rejected the request.".to_owned());
        error!(%message, "admin action rejected");
        self.error = Some(message.clone());
        Err(CoreError::Rejected { message })
    }
}
