// Device login
//
// `POST /api/login` with `{username, password}`. The device answers 200
// with `{sts, message?, token?}` for both good and bad credentials on
// most firmware; some builds answer 401 instead, which surfaces as an
// `Error` like any other non-2xx status.

use reqwest::Method;
use secrecy::SecretString;
use tracing::debug;

use crate::auth::Credentials;
use crate::device::client::{DeviceClient, RequestBody};
use crate::error::Error;
use crate::models::LoginResult;

const LOGIN_PATH: &str = "/api/login";

impl DeviceClient {
    /// Submit credentials once.
    ///
    /// On `sts == true` with a token, the token is kept for later requests
    /// when the client's policy is [`TokenPolicy::Bearer`](crate::TokenPolicy::Bearer).
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResult, Error> {
        debug!(username = %credentials.username, "logging in");
        let body = RequestBody::json(&credentials.wire_body())?;
        let result: LoginResult = self.request_typed(Method::POST, LOGIN_PATH, body).await?;

        if result.success {
            if let Some(ref token) = result.token {
                self.set_token(SecretString::from(token.clone()));
            }
            debug!("login accepted");
        } else {
            debug!(message = ?result.message, "login rejected");
        }
        Ok(result)
    }
}
