use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

/// What to do with the `token` a successful login may return.
///
/// Some firmware builds are cookie-based or stateless and never look at the
/// token; others expect it back as a bearer header. Neither is assumed:
/// the choice is a per-profile setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenPolicy {
    /// Keep the token out of later requests (cookie or stateless device).
    #[default]
    Ignore,
    /// Attach `Authorization: Bearer <token>` to every later request.
    Bearer,
}

impl TokenPolicy {
    pub fn from_attach_flag(attach: bool) -> Self {
        if attach { Self::Bearer } else { Self::Ignore }
    }

    pub fn attaches_token(self) -> bool {
        matches!(self, Self::Bearer)
    }
}

/// Username and password for a single login attempt. Never persisted.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }

    /// The `{username, password}` body posted to `/api/login`.
    pub(crate) fn wire_body(&self) -> LoginBody<'_> {
        LoginBody {
            username: &self.username,
            password: self.password.expose_secret(),
        }
    }
}

#[derive(Serialize)]
pub(crate) struct LoginBody<'a> {
    username: &'a str,
    password: &'a str,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn login_body_shape() {
        let creds = Credentials::new("admin", SecretString::from("hunter2".to_string()));
        let body = serde_json::to_value(creds.wire_body()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "username": "admin", "password": "hunter2" })
        );
    }

    #[test]
    fn token_policy_from_flag() {
        assert_eq!(TokenPolicy::from_attach_flag(true), TokenPolicy::Bearer);
        assert!(!TokenPolicy::from_attach_flag(false).attaches_token());
    }
}
