// Device API HTTP client
//
// Wraps `reqwest::Client` with base-URL joining, the JSON/multipart body
// policy, and the single error-translation rule every endpoint shares.
// Endpoint groups (auth, config, system) are inherent methods in sibling
// files so this module stays about transport mechanics.

use std::sync::{PoisonError, RwLock};

use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, trace};
use url::Url;

use crate::auth::TokenPolicy;
use crate::error::Error;
use crate::transport::TransportConfig;

/// Body of an outgoing request.
#[derive(Debug, Default)]
pub enum RequestBody {
    /// No body at all.
    #[default]
    Empty,
    /// JSON-encoded with `Content-Type: application/json`.
    Json(Value),
    /// Multipart payload passed through untouched. No content-type is set
    /// here so reqwest can write the boundary itself.
    Form(reqwest::multipart::Form),
}

impl RequestBody {
    /// Encode any serializable record as a JSON body.
    pub fn json(record: &impl Serialize) -> Result<Self, Error> {
        serde_json::to_value(record)
            .map(Self::Json)
            .map_err(|e| Error::setup(format!("failed to encode request body: {e}")))
    }
}

/// A decoded 2xx response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// The response declared a JSON content type.
    Json(Value),
    /// Anything else, as raw text.
    Text(String),
}

impl Payload {
    /// Decode into a typed record.
    ///
    /// Text bodies are still tried as JSON: some firmware answers with
    /// `text/plain` while sending a JSON document.
    pub fn decode<T: DeserializeOwned>(self, path: &str) -> Result<T, Error> {
        match self {
            Self::Json(value) => serde_json::from_value(value).map_err(|e| Error::decode(path, e)),
            Self::Text(text) => serde_json::from_str(&text).map_err(|e| Error::decode(path, e)),
        }
    }
}

/// HTTP client for one gateway device.
///
/// The single point of contact with the device: every endpoint goes through
/// [`request`](Self::request), so headers, body encoding and error
/// translation are identical everywhere.
pub struct DeviceClient {
    http: reqwest::Client,
    base_url: Url,
    token_policy: TokenPolicy,
    /// Login token, only populated under [`TokenPolicy::Bearer`].
    token: RwLock<Option<SecretString>>,
}

impl DeviceClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// A cookie jar is added when the config has none, so cookie-session
    /// firmware keeps working for the lifetime of the client.
    pub fn new(
        base_url: Url,
        token_policy: TokenPolicy,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let config = if transport.cookie_jar.is_some() {
            transport.clone()
        } else {
            transport.clone().with_cookie_jar()
        };
        let http = config.build_client()?;
        Ok(Self::with_client(http, base_url, token_policy))
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url, token_policy: TokenPolicy) -> Self {
        Self {
            http,
            base_url,
            token_policy,
            token: RwLock::new(None),
        }
    }

    /// The device base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn token_policy(&self) -> TokenPolicy {
        self.token_policy
    }

    // ── Token management ────────────────────────────────────────────

    /// Install a token (from a login, or restored from a saved session).
    /// Ignored unless the policy attaches tokens.
    pub fn set_token(&self, token: SecretString) {
        if !self.token_policy.attaches_token() {
            trace!("token policy is Ignore; dropping login token");
            return;
        }
        debug!("storing bearer token");
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    pub fn clear_token(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn has_token(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn apply_token(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let guard = self.token.read().unwrap_or_else(PoisonError::into_inner);
        match guard.as_ref() {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    // ── URL builder ─────────────────────────────────────────────────

    /// `{base}{path}`, keeping any path prefix the base URL carries.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Url::parse(&format!("{base}/{path}")).map_err(|e| Error::invalid_url(path, e))
    }

    // ── Core primitive ──────────────────────────────────────────────

    /// Send one request and translate the outcome.
    ///
    /// - JSON bodies are encoded with `Content-Type: application/json`;
    ///   bodiless requests carry the same header, multipart bodies none.
    /// - Non-2xx: the body's `message` (or the whole JSON error body, or
    ///   the status text) becomes `HTTP error! Status: <code> - <detail>`.
    /// - 2xx: JSON content types decode to [`Payload::Json`], everything
    ///   else is returned as [`Payload::Text`].
    ///
    /// Every failure is logged before it is returned.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
    ) -> Result<Payload, Error> {
        let result = self.send(method.clone(), path, body).await;
        if let Err(ref e) = result {
            error!("Error during {method} {path}: {}", e.message);
        }
        result
    }

    async fn send(&self, method: Method, path: &str, body: RequestBody) -> Result<Payload, Error> {
        let url = self.url(path)?;
        debug!("{method} {url}");

        let builder = self.apply_token(self.http.request(method, url));
        let builder = match body {
            RequestBody::Empty => {
                builder.header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            }
            RequestBody::Json(value) => builder
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .body(value.to_string()),
            RequestBody::Form(form) => builder.multipart(form),
        };

        let resp = builder.send().await.map_err(|e| Error::transport(&e))?;
        let status = resp.status();

        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(Error::http(status.as_u16(), &error_detail(status, &text)));
        }

        let is_json = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("application/json"));

        let text = resp.text().await.map_err(|e| Error::transport(&e))?;
        if is_json {
            serde_json::from_str(&text)
                .map(Payload::Json)
                .map_err(|e| Error::decode(path, e))
        } else {
            Ok(Payload::Text(text))
        }
    }

    // ── Typed helpers ───────────────────────────────────────────────

    /// Send a request and decode the body as `T`.
    pub(crate) async fn request_typed<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
    ) -> Result<T, Error> {
        let payload = self.request(method.clone(), path, body).await?;
        payload.decode(path).inspect_err(|e| {
            error!("Error during {method} {path}: {}", e.message);
        })
    }

    /// `GET` a record.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        self.request_typed(Method::GET, path, RequestBody::Empty)
            .await
    }

    /// `POST` a full record as JSON and read back the acknowledgement.
    pub(crate) async fn post_ack(
        &self,
        path: &str,
        record: &impl Serialize,
    ) -> Result<crate::models::Ack, Error> {
        let body = RequestBody::json(record)?;
        let payload = self.request(Method::POST, path, body).await?;
        Ok(crate::models::Ack::from_payload(payload))
    }
}

/// Pick the human-readable detail for a failed response.
fn error_detail(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(obj)) => match obj.get("message") {
            Some(Value::String(msg)) if !msg.is_empty() => msg.clone(),
            _ => Value::Object(obj).to_string(),
        },
        Ok(other) if !other.is_null() => other.to_string(),
        _ => status_text(status),
    }
}

fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map_or_else(|| status.as_str().to_owned(), str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_prefers_message_field() {
        let detail = error_detail(StatusCode::UNAUTHORIZED, r#"{"message":"Invalid credentials"}"#);
        assert_eq!(detail, "Invalid credentials");
    }

    #[test]
    fn detail_falls_back_to_json_then_status_text() {
        let json = error_detail(StatusCode::BAD_REQUEST, r#"{"code":"E42"}"#);
        assert_eq!(json, r#"{"code":"E42"}"#);

        let html = error_detail(StatusCode::NOT_FOUND, "<html>nope</html>");
        assert_eq!(html, "Not Found");

        let empty = error_detail(StatusCode::INTERNAL_SERVER_ERROR, "");
        assert_eq!(empty, "Internal Server Error");
    }

    #[test]
    fn url_keeps_base_prefix() {
        let client = DeviceClient::with_client(
            reqwest::Client::new(),
            Url::parse("http://10.0.0.1:8008/device/").expect("static URL"),
            TokenPolicy::Ignore,
        );
        let url = client.url("/api/status").expect("joinable path");
        assert_eq!(url.as_str(), "http://10.0.0.1:8008/device/api/status");
    }

    #[test]
    fn ignore_policy_drops_tokens() {
        let client = DeviceClient::with_client(
            reqwest::Client::new(),
            Url::parse("http://10.0.0.1").expect("static URL"),
            TokenPolicy::Ignore,
        );
        client.set_token(SecretString::from("abc".to_string()));
        assert!(!client.has_token());
    }
}
