// ── Session controller ──
//
// Authentication flag plus the active view, persisted through an injected
// `SessionStore` so a restart resumes where the operator left off.
//
//   LoggedOut ──login ok──▶ LoggedIn(stored view | command)
//   LoggedIn(v) ──select(v')──▶ LoggedIn(v')      (persisted immediately)
//   LoggedIn(v) ──logout──▶ LoggedOut             (flags cleared)

use gatectl_api::{Credentials, DeviceClient};
use secrecy::SecretString;
use serde::Serialize;
use strum::{Display, EnumIter, EnumString};
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::store::SessionStore;

/// Storage key for the JSON-encoded authenticated flag.
pub const AUTH_KEY: &str = "authenticated";
/// Storage key for the active view identifier.
pub const VIEW_KEY: &str = "active_view";
/// Storage key for a bearer token (only written when tokens are attached).
pub const TOKEN_KEY: &str = "token";

const DEFAULT_LOGIN_FAILURE: &str = "Login failed. Please check your credentials.";

/// One of the seven top-level screens.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter, Serialize,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "camelCase")]
pub enum View {
    /// Serial command console.
    #[default]
    #[strum(to_string = "command", serialize = "cmd")]
    Command,
    #[strum(to_string = "status")]
    Status,
    #[strum(to_string = "general")]
    General,
    #[strum(to_string = "network")]
    Network,
    #[strum(to_string = "server")]
    Server,
    /// Device tuning parameters.
    #[strum(to_string = "deviceConfig", serialize = "dev", serialize = "device")]
    DeviceConfig,
    #[strum(to_string = "admin")]
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "view", rename_all = "camelCase")]
pub enum SessionState {
    LoggedOut,
    LoggedIn(View),
}

/// Owns the session state machine and its persistence.
#[derive(Debug)]
pub struct SessionController<S> {
    store: S,
    state: SessionState,
}

impl<S: SessionStore> SessionController<S> {
    /// Rebuild the session from storage.
    ///
    /// `LoggedOut` unless the stored flag is JSON `true`; a logged-in
    /// session resumes on the stored view, and an unknown view falls back
    /// to [`View::Command`] with storage corrected.
    pub fn restore(store: S) -> Result<Self, CoreError> {
        let authenticated = match store.get(AUTH_KEY)? {
            Some(raw) => serde_json::from_str::<bool>(&raw).unwrap_or_else(|_| {
                warn!(value = %raw, "ignoring malformed authenticated flag");
                false
            }),
            None => false,
        };

        let mut controller = Self {
            store,
            state: SessionState::LoggedOut,
        };
        if authenticated {
            let view = controller.resolve_stored_view()?;
            controller.state = SessionState::LoggedIn(view);
        }
        debug!(state = ?controller.state, "session restored");
        Ok(controller)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::LoggedIn(_))
    }

    /// The active view, or [`CoreError::NotLoggedIn`].
    pub fn active_view(&self) -> Result<View, CoreError> {
        match self.state {
            SessionState::LoggedIn(view) => Ok(view),
            SessionState::LoggedOut => Err(CoreError::NotLoggedIn),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Bearer token saved by an earlier login, if any.
    pub fn stored_token(&self) -> Result<Option<SecretString>, CoreError> {
        Ok(self.store.get(TOKEN_KEY)?.map(SecretString::from))
    }

    /// Submit credentials to the device.
    ///
    /// `sts == true` moves to `LoggedIn(stored view | command)`. A rejected
    /// login or a failed request leaves the session `LoggedOut` and
    /// returns the message to show.
    pub async fn login(
        &mut self,
        client: &DeviceClient,
        credentials: &Credentials,
    ) -> Result<View, CoreError> {
        let result = match client.login(credentials).await {
            Ok(result) => result,
            Err(e) => {
                self.mark_logged_out()?;
                return Err(e.into());
            }
        };

        if !result.success {
            self.mark_logged_out()?;
            let message = result
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| DEFAULT_LOGIN_FAILURE.to_owned());
            return Err(CoreError::LoginRejected { message });
        }

        self.store.set(AUTH_KEY, "true")?;
        match result.token {
            Some(token) if client.token_policy().attaches_token() => {
                self.store.set(TOKEN_KEY, &token)?;
            }
            _ => self.store.clear(TOKEN_KEY)?,
        }

        let view = self.resolve_stored_view()?;
        self.state = SessionState::LoggedIn(view);
        info!(%view, "logged in");
        Ok(view)
    }

    /// Switch views; the choice is persisted before returning.
    pub fn select_view(&mut self, view: View) -> Result<(), CoreError> {
        self.active_view()?;
        self.store.set(VIEW_KEY, &view.to_string())?;
        self.state = SessionState::LoggedIn(view);
        debug!(%view, "view selected");
        Ok(())
    }

    /// Clear the session. The next login lands on [`View::Command`]
    /// unless a view is selected again first.
    pub fn logout(&mut self) -> Result<(), CoreError> {
        self.store.clear(AUTH_KEY)?;
        self.store.clear(VIEW_KEY)?;
        self.store.clear(TOKEN_KEY)?;
        self.state = SessionState::LoggedOut;
        info!("logged out");
        Ok(())
    }

    fn mark_logged_out(&mut self) -> Result<(), CoreError> {
        self.state = SessionState::LoggedOut;
        self.store.set(AUTH_KEY, "false")
    }

    /// Stored view, defaulting to `command`; storage always ends up valid.
    fn resolve_stored_view(&self) -> Result<View, CoreError> {
        let view = match self.store.get(VIEW_KEY)? {
            Some(raw) => raw.parse::<View>().unwrap_or_else(|_| {
                warn!(value = %raw, "unknown stored view; falling back to command");
                View::Command
            }),
            None => View::Command,
        };
        self.store.set(VIEW_KEY, &view.to_string())?;
        Ok(view)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use strum::IntoEnumIterator;
    use url::Url;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use gatectl_api::TokenPolicy;

    use super::*;
    use crate::store::MemoryStore;

    fn logged_in_store(view: &str) -> MemoryStore {
        MemoryStore::with_entries([(AUTH_KEY, "true"), (VIEW_KEY, view)])
    }

    async fn device(login_body: serde_json::Value, status: u16) -> (MockServer, DeviceClient) {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/login"))
            .respond_with(ResponseTemplate::new(status).set_body_json(login_body))
            .mount(&server)
            .await;
        let client = DeviceClient::with_client(
            reqwest::Client::new(),
            Url::parse(&server.uri()).unwrap(),
            TokenPolicy::Bearer,
        );
        (server, client)
    }

    fn creds() -> Credentials {
        Credentials::new("admin", SecretString::from("pw".to_string()))
    }

    #[test]
    fn view_identifiers_round_trip() {
        for view in View::iter() {
            assert_eq!(view.to_string().parse::<View>().unwrap(), view);
        }
        assert_eq!("cmd".parse::<View>().unwrap(), View::Command);
        assert_eq!("dev".parse::<View>().unwrap(), View::DeviceConfig);
        assert_eq!(View::DeviceConfig.to_string(), "deviceConfig");
    }

    #[test]
    fn empty_store_starts_logged_out() {
        let session = SessionController::restore(MemoryStore::new()).unwrap();
        assert_eq!(session.state(), SessionState::LoggedOut);
        assert_eq!(session.active_view(), Err(CoreError::NotLoggedIn));
    }

    #[test]
    fn selected_view_survives_reload() {
        let store = logged_in_store("command");
        let mut session = SessionController::restore(store.clone()).unwrap();
        session.select_view(View::Admin).unwrap();

        let reloaded = SessionController::restore(store).unwrap();
        assert_eq!(reloaded.state(), SessionState::LoggedIn(View::Admin));
    }

    #[test]
    fn unknown_stored_view_self_heals() {
        let store = logged_in_store("bogus");
        let session = SessionController::restore(store.clone()).unwrap();
        assert_eq!(session.state(), SessionState::LoggedIn(View::Command));
        assert_eq!(store.get(VIEW_KEY).unwrap().as_deref(), Some("command"));
    }

    #[test]
    fn malformed_auth_flag_means_logged_out() {
        let store = MemoryStore::with_entries([(AUTH_KEY, "yes please")]);
        let session = SessionController::restore(store).unwrap();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn select_view_requires_login() {
        let mut session = SessionController::restore(MemoryStore::new()).unwrap();
        assert_eq!(session.select_view(View::Status), Err(CoreError::NotLoggedIn));
    }

    #[tokio::test]
    async fn login_lands_on_stored_view() {
        let (_server, client) = device(json!({ "sts": true }), 200).await;
        let store = MemoryStore::with_entries([(VIEW_KEY, "network")]);
        let mut session = SessionController::restore(store.clone()).unwrap();

        let view = session.login(&client, &creds()).await.unwrap();
        assert_eq!(view, View::Network);
        assert_eq!(store.get(AUTH_KEY).unwrap().as_deref(), Some("true"));
    }

    #[tokio::test]
    async fn logout_then_login_lands_on_command() {
        let (_server, client) = device(json!({ "sts": true }), 200).await;
        let store = logged_in_store("server");
        let mut session = SessionController::restore(store.clone()).unwrap();
        assert_eq!(session.state(), SessionState::LoggedIn(View::Server));

        session.logout().unwrap();
        assert_eq!(session.state(), SessionState::LoggedOut);
        assert!(store.snapshot().is_empty());

        let view = session.login(&client, &creds()).await.unwrap();
        assert_eq!(view, View::Command);
    }

    #[tokio::test]
    async fn http_401_keeps_session_logged_out() {
        let (_server, client) =
            device(json!({ "message": "Invalid credentials" }), 401).await;
        let store = MemoryStore::new();
        let mut session = SessionController::restore(store.clone()).unwrap();

        let err = session.login(&client, &creds()).await.unwrap_err();
        assert!(err.to_string().contains("Invalid credentials"), "{err}");
        assert_eq!(err.status(), Some(401));
        assert!(!session.is_authenticated());
        assert_eq!(store.get(AUTH_KEY).unwrap().as_deref(), Some("false"));
    }

    #[tokio::test]
    async fn rejected_login_uses_default_message() {
        let (_server, client) = device(json!({ "sts": false }), 200).await;
        let mut session = SessionController::restore(MemoryStore::new()).unwrap();

        let err = session.login(&client, &creds()).await.unwrap_err();
        assert_eq!(
            err,
            CoreError::LoginRejected {
                message: DEFAULT_LOGIN_FAILURE.into()
            }
        );
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn bearer_token_is_stored_and_cleared() {
        let (_server, client) = device(json!({ "sts": true, "token": "abc" }), 200).await;
        let store = MemoryStore::new();
        let mut session = SessionController::restore(store.clone()).unwrap();

        session.login(&client, &creds()).await.unwrap();
        assert_eq!(store.get(TOKEN_KEY).unwrap().as_deref(), Some("abc"));
        assert!(session.stored_token().unwrap().is_some());

        session.logout().unwrap();
        assert!(session.stored_token().unwrap().is_none());
    }
}
