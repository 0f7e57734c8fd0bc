// Serial command console state.

use std::collections::VecDeque;

use gatectl_api::{CommandInvocation, CommandResponse, DeviceClient};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::error::CoreError;
use crate::view::lifecycle::ViewLifecycle;

const DEFAULT_HISTORY: usize = 50;
const FALSE_STATUS: &str = "API returned false status.";

/// One command and what came back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsoleEntry {
    pub command: String,
    pub output: String,
    pub success: bool,
}

#[derive(Debug)]
pub struct CommandConsole {
    output: String,
    sending: bool,
    error: Option<String>,
    notice: Option<String>,
    history: VecDeque<ConsoleEntry>,
    history_limit: usize,
    lifecycle: ViewLifecycle,
}

impl Default for CommandConsole {
    fn default() -> Self {
        Self::with_history_limit(DEFAULT_HISTORY)
    }
}

impl CommandConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history_limit(limit: usize) -> Self {
        Self {
            output: String::new(),
            sending: false,
            error: None,
            notice: None,
            history: VecDeque::with_capacity(limit.min(DEFAULT_HISTORY)),
            history_limit: limit.max(1),
            lifecycle: ViewLifecycle::default(),
        }
    }

    /// Text of the last response, flattened for display.
    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn is_sending(&self) -> bool {
        self.sending
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Oldest first.
    pub fn history(&self) -> impl Iterator<Item = &ConsoleEntry> {
        self.history.iter()
    }

    pub fn cancel_handle(&self) -> CancellationToken {
        self.lifecycle.cancel_token()
    }

    pub fn unmount(&mut self) {
        self.lifecycle.unmount();
        self.sending = false;
    }

    /// Send one command to the serial console.
    ///
    /// The previous output is cleared first. A response with
    /// `sts == false` still shows its result, and also returns
    /// [`CoreError::Rejected`] carrying the device message.
    pub async fn send(
        &mut self,
        client: &DeviceClient,
        command: &str,
    ) -> Result<CommandResponse, CoreError> {
        if command.trim().is_empty() {
            return Err(CoreError::validation("command", "must not be empty"));
        }
        if self.sending {
            return Err(CoreError::Busy {
                operation: "Command",
            });
        }
        if !self.lifecycle.is_mounted() {
            return Err(CoreError::Cancelled);
        }

        self.output.clear();
        self.error = None;
        self.notice = None;
        self.sending = true;

        let ticket = self.lifecycle.start_save();
        let cancel = self.lifecycle.cancel_token();
        let invocation = CommandInvocation::new(command);
        let result = tokio::select! {
            () = cancel.cancelled() => {
                self.unmount();
                return Err(CoreError::Cancelled);
            }
            result = client.send_command(&invocation) => result,
        };
        if !self.lifecycle.is_current(ticket) {
            return Err(CoreError::Cancelled);
        }
        self.sending = false;

        match result {
            Ok(response) => {
                self.output = response.result.to_string();
                self.record(command, response.status);
                if response.status {
                    info!(cmd = command, "command sent");
                    self.notice = Some("Command sent successfully!".to_owned());
                    Ok(response)
                } else {
                    let message = response
                        .message
                        .clone()
                        .filter(|m| !m.is_empty())
                        .unwrap_or_else(|| FALSE_STATUS.to_owned());
                    error!(cmd = command, %message, "device rejected command");
                    self.error = Some(format!("Failed to send command: {message}"));
                    Err(CoreError::Rejected { message })
                }
            }
            Err(e) => {
                error!(cmd = command, error = %e, "failed to send command");
                self.output = format!("Error: {e}");
                self.error = Some(format!("Failed to send command: {e}"));
                self.record(command, false);
                Err(e.into())
            }
        }
    }

    fn record(&mut self, command: &str, success: bool) {
        if self.history.len() == self.history_limit {
            self.history.pop_front();
        }
        self.history.push_back(ConsoleEntry {
            command: command.to_owned(),
            output: self.output.clone(),
            success,
        });
        debug!(entries = self.history.len(), "console history updated");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use gatectl_api::TokenPolicy;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use url::Url;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    async fn console_device(response: serde_json::Value) -> (MockServer, DeviceClient) {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/serial/cmd"))
            .respond_with(ResponseTemplate::new(200).set_body_json(response))
            .mount(&server)
            .await;
        let client = DeviceClient::with_client(
            reqwest::Client::new(),
            Url::parse(&server.uri()).unwrap(),
            TokenPolicy::Ignore,
        );
        (server, client)
    }

    #[tokio::test]
    async fn mapping_result_is_flattened() {
        let (server, client) =
            console_device(json!({ "sts": true, "res": { "temp": "42", "uptime": "3d" } })).await;
        let mut console = CommandConsole::new();

        console.send(&client, "stats").await.unwrap();
        assert_eq!(console.output(), "temp: 42\nuptime: 3d");
        assert_eq!(console.notice(), Some("Command sent successfully!"));

        let requests = server.received_requests().await.unwrap();
        assert_eq!(
            requests[0].body_json::<serde_json::Value>().unwrap(),
            json!({ "cmd": "stats" })
        );
    }

    #[tokio::test]
    async fn false_status_still_shows_result() {
        let (_server, client) = console_device(json!({ "sts": false, "res": "ERR 12" })).await;
        let mut console = CommandConsole::new();

        let err = console.send(&client, "bad").await.unwrap_err();
        assert_eq!(
            err,
            CoreError::Rejected {
                message: FALSE_STATUS.into()
            }
        );
        assert_eq!(console.output(), "ERR 12");
        assert_eq!(
            console.error(),
            Some("Failed to send command: API returned false status.")
        );
    }

    #[tokio::test]
    async fn empty_command_is_not_sent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/serial/cmd"))
            .and(body_json(json!({ "cmd": "" })))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let client = DeviceClient::with_client(
            reqwest::Client::new(),
            Url::parse(&server.uri()).unwrap(),
            TokenPolicy::Ignore,
        );

        let mut console = CommandConsole::new();
        let err = console.send(&client, "   ").await.unwrap_err();
        assert!(matches!(err, CoreError::Validation { .. }));
    }

    #[tokio::test]
    async fn transport_failure_is_shown_in_output() {
        let client = DeviceClient::with_client(
            reqwest::Client::new(),
            Url::parse("http://127.0.0.1:9").unwrap(),
            TokenPolicy::Ignore,
        );
        let mut console = CommandConsole::new();

        let err = console.send(&client, "ver").await.unwrap_err();
        assert!(matches!(err, CoreError::Api { status: None, .. }));
        assert!(console.output().starts_with("Error: "));
        assert!(!console.is_sending());
    }

    #[tokio::test]
    async fn history_is_bounded() {
        let (_server, client) = console_device(json!({ "sts": true, "res": "ok" })).await;
        let mut console = CommandConsole::with_history_limit(2);

        for cmd in ["a", "b", "c"] {
            console.send(&client, cmd).await.unwrap();
        }
        let commands: Vec<_> = console.history().map(|e| e.command.as_str()).collect();
        assert_eq!(commands, ["b", "c"]);
    }
}
