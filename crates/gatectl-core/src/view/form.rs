// ── Fetch-on-open / submit-on-save form state ──
//
// One `FormView<R>` per open view. The record is replaced wholesale by a
// fetch, edited in place, and sent back in full on save. While a request
// is in flight the inputs are disabled; results carrying a stale ticket
// are dropped without touching the form.

use std::future::Future;

use gatectl_api::{
    Ack, DeviceClient, DeviceStatus, DeviceTuningConfig, GeneralConfig, NetworkConfig,
    ServerConfig,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::error::CoreError;
use crate::view::lifecycle::{Ticket, ViewLifecycle};

const SAVE_REJECTED: &str = "Failed to save settings: API returned an error.";

/// A record a view fetches from the device when it opens.
pub trait Resource: Clone + Default {
    /// Human-readable name used in operator messages ("General", ...).
    const LABEL: &'static str;

    fn fetch(client: &DeviceClient) -> impl Future<Output = Result<Self, gatectl_api::Error>>;
}

/// A resource the operator can edit and submit back as a full record.
pub trait ConfigResource: Resource {
    fn submit(&self, client: &DeviceClient) -> impl Future<Output = Result<Ack, gatectl_api::Error>>;
}

impl Resource for DeviceStatus {
    const LABEL: &'static str = "Status";

    fn fetch(client: &DeviceClient) -> impl Future<Output = Result<Self, gatectl_api::Error>> {
        client.get_status()
    }
}

impl Resource for GeneralConfig {
    const LABEL: &'static str = "General";

    fn fetch(client: &DeviceClient) -> impl Future<Output = Result<Self, gatectl_api::Error>> {
        client.get_general_config()
    }
}

impl ConfigResource for GeneralConfig {
    fn submit(&self, client: &DeviceClient) -> impl Future<Output = Result<Ack, gatectl_api::Error>> {
        client.set_general_config(self)
    }
}

impl Resource for NetworkConfig {
    const LABEL: &'static str = "Network";

    fn fetch(client: &DeviceClient) -> impl Future<Output = Result<Self, gatectl_api::Error>> {
        client.get_network_config()
    }
}

impl ConfigResource for NetworkConfig {
    fn submit(&self, client: &DeviceClient) -> impl Future<Output = Result<Ack, gatectl_api::Error>> {
        client.set_network_config(self)
    }
}

impl Resource for ServerConfig {
    const LABEL: &'static str = "Server";

    fn fetch(client: &DeviceClient) -> impl Future<Output = Result<Self, gatectl_api::Error>> {
        client.get_server_config()
    }
}

impl ConfigResource for ServerConfig {
    fn submit(&self, client: &DeviceClient) -> impl Future<Output = Result<Ack, gatectl_api::Error>> {
        client.set_server_config(self)
    }
}

impl Resource for DeviceTuningConfig {
    const LABEL: &'static str = "Device";

    fn fetch(client: &DeviceClient) -> impl Future<Output = Result<Self, gatectl_api::Error>> {
        client.get_device_config()
    }
}

impl ConfigResource for DeviceTuningConfig {
    fn submit(&self, client: &DeviceClient) -> impl Future<Output = Result<Ack, gatectl_api::Error>> {
        client.set_device_config(self)
    }
}

/// Form state for one open view.
#[derive(Debug)]
pub struct FormView<R> {
    record: R,
    loading: bool,
    saving: bool,
    error: Option<String>,
    notice: Option<String>,
    lifecycle: ViewLifecycle,
}

impl<R: Resource> Default for FormView<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Resource> FormView<R> {
    /// A freshly mounted view holding default values.
    pub fn new() -> Self {
        Self {
            record: R::default(),
            loading: false,
            saving: false,
            error: None,
            notice: None,
            lifecycle: ViewLifecycle::default(),
        }
    }

    pub fn record(&self) -> &R {
        &self.record
    }

    /// Mutable access to the record, refused while a request is in flight.
    pub fn edit(&mut self) -> Result<&mut R, CoreError> {
        if self.loading {
            return Err(CoreError::Busy { operation: "Load" });
        }
        if self.saving {
            return Err(CoreError::Busy { operation: "Save" });
        }
        if !self.lifecycle.is_mounted() {
            return Err(CoreError::Cancelled);
        }
        Ok(&mut self.record)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn is_mounted(&self) -> bool {
        self.lifecycle.is_mounted()
    }

    /// Inputs and the submit control are enabled only when idle.
    pub fn inputs_enabled(&self) -> bool {
        self.lifecycle.is_mounted() && !self.loading && !self.saving
    }

    /// Last failure shown to the operator.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Last success message shown to the operator.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Token fired when the view unmounts. Clone it to close the view from
    /// another task while a request is pending.
    pub fn cancel_handle(&self) -> CancellationToken {
        self.lifecycle.cancel_token()
    }

    /// Close the view. Pending results are discarded from here on.
    pub fn unmount(&mut self) {
        self.lifecycle.unmount();
        self.loading = false;
        self.saving = false;
        debug!(view = R::LABEL, "view unmounted");
    }

    // ── Fetch ────────────────────────────────────────────────────────

    pub fn begin_load(&mut self) -> Result<Ticket, CoreError> {
        if !self.lifecycle.is_mounted() {
            return Err(CoreError::Cancelled);
        }
        if self.saving {
            return Err(CoreError::Busy { operation: "Save" });
        }
        if self.loading {
            return Err(CoreError::Busy { operation: "Load" });
        }
        self.loading = true;
        self.error = None;
        Ok(self.lifecycle.start_fetch())
    }

    /// Apply a fetch result. A stale ticket is dropped with
    /// [`CoreError::Cancelled`] and leaves the form untouched; a failure
    /// keeps the previous values.
    pub fn finish_load(
        &mut self,
        ticket: Ticket,
        result: Result<R, gatectl_api::Error>,
    ) -> Result<(), CoreError> {
        if !self.lifecycle.is_current(ticket) {
            debug!(view = R::LABEL, "discarding superseded fetch result");
            return Err(CoreError::Cancelled);
        }
        self.loading = false;
        match result {
            Ok(record) => {
                self.record = record;
                self.error = None;
                Ok(())
            }
            Err(e) => {
                error!(view = R::LABEL, error = %e, "failed to load settings");
                self.error = Some(format!("Failed to load settings: {e}"));
                Err(e.into())
            }
        }
    }

    /// Fetch the record, racing the view's cancellation token.
    pub async fn load(&mut self, client: &DeviceClient) -> Result<(), CoreError> {
        let ticket = self.begin_load()?;
        let cancel = self.lifecycle.cancel_token();
        let result = tokio::select! {
            () = cancel.cancelled() => {
                self.unmount();
                return Err(CoreError::Cancelled);
            }
            result = R::fetch(client) => result,
        };
        self.finish_load(ticket, result)
    }

    fn saved_message() -> String {
        format!("{} settings saved successfully!", R::LABEL)
    }
}

impl<R: ConfigResource> FormView<R> {
    /// Start a save. Allowed while a fetch is pending; the fetch result
    /// will then be discarded.
    pub fn begin_save(&mut self) -> Result<Ticket, CoreError> {
        if !self.lifecycle.is_mounted() {
            return Err(CoreError::Cancelled);
        }
        if self.saving {
            return Err(CoreError::Busy { operation: "Save" });
        }
        self.loading = false;
        self.saving = true;
        self.notice = None;
        Ok(self.lifecycle.start_save())
    }

    /// Apply a save result. Form data is never cleared.
    pub fn finish_save(
        &mut self,
        ticket: Ticket,
        result: Result<Ack, gatectl_api::Error>,
    ) -> Result<(), CoreError> {
        if !self.lifecycle.is_current(ticket) {
            debug!(view = R::LABEL, "discarding superseded save result");
            return Err(CoreError::Cancelled);
        }
        self.saving = false;
        match result {
            Ok(ack) if ack.success => {
                let message = Self::saved_message();
                info!(view = R::LABEL, "{message}");
                self.error = None;
                self.notice = Some(message);
                Ok(())
            }
            Ok(ack) => {
                let message = ack
                    .message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| SAVE_REJECTED.to_owned());
                error!(view = R::LABEL, %message, "device rejected settings");
                self.error = Some(message.clone());
                Err(CoreError::Rejected { message })
            }
            Err(e) => {
                error!(view = R::LABEL, error = %e, "failed to save settings");
                self.error = Some(format!("Failed to save settings: {e}"));
                Err(e.into())
            }
        }
    }

    /// Submit the full record as currently edited.
    pub async fn save(&mut self, client: &DeviceClient) -> Result<(), CoreError> {
        let record = self.record.clone();
        let ticket = self.begin_save()?;
        let cancel = self.lifecycle.cancel_token();
        let result = tokio::select! {
            () = cancel.cancelled() => {
                self.unmount();
                return Err(CoreError::Cancelled);
            }
            result = record.submit(client) => result,
        };
        self.finish_save(ticket, result)
    }
}
