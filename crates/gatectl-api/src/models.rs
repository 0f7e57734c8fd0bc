// Wire models for the gateway device API
//
// Field names follow the firmware's JSON exactly (including its spellings),
// mapped onto Rust names with serde renames. Config records carry an
// `extra` map so fields this crate does not know about survive a
// fetch-edit-save cycle untouched.

use std::fmt;

use indexmap::IndexMap;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::device::Payload;

// ── 0/1 flags ───────────────────────────────────────────────────────

/// A boolean the firmware encodes as the integer `0` or `1`.
///
/// Always serializes to `0` or `1`, never `true`/`false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Flag {
    #[default]
    Off,
    On,
}

impl Flag {
    pub fn is_on(self) -> bool {
        matches!(self, Self::On)
    }

    pub fn as_u8(self) -> u8 {
        match self {
            Self::Off => 0,
            Self::On => 1,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Off => Self::On,
            Self::On => Self::Off,
        }
    }
}

impl From<bool> for Flag {
    fn from(value: bool) -> Self {
        if value { Self::On } else { Self::Off }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.is_on() { "on" } else { "off" })
    }
}

impl Serialize for Flag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_u8())
    }
}

impl<'de> Deserialize<'de> for Flag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bit = deserializer.deserialize_any(BitVisitor("a 0/1 flag"))?;
        Ok(Self::from(bit))
    }
}

/// Accepts `0`, `1`, `true`, `false`, `"0"` and `"1"`; rejects anything else.
struct BitVisitor(&'static str);

impl Visitor<'_> for BitVisitor {
    type Value = bool;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<bool, E> {
        Ok(v)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<bool, E> {
        match v {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(E::invalid_value(de::Unexpected::Unsigned(other), &self)),
        }
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<bool, E> {
        match v {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(E::invalid_value(de::Unexpected::Signed(other), &self)),
        }
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<bool, E> {
        match v.trim() {
            "0" => Ok(false),
            "1" => Ok(true),
            other => Err(E::invalid_value(de::Unexpected::Str(other), &self)),
        }
    }
}

// ── Connection mode ─────────────────────────────────────────────────

/// Uplink selection, encoded as `conn: 0` (WiFi) or `conn: 1` (cellular).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConnectionMode {
    #[default]
    Wifi,
    Cellular,
}

impl ConnectionMode {
    pub fn as_u8(self) -> u8 {
        match self {
            Self::Wifi => 0,
            Self::Cellular => 1,
        }
    }
}

impl fmt::Display for ConnectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Wifi => "wifi",
            Self::Cellular => "4g",
        })
    }
}

impl Serialize for ConnectionMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_u8())
    }
}

impl<'de> Deserialize<'de> for ConnectionMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let cellular =
            deserializer.deserialize_any(BitVisitor("0 (WiFi) or 1 (cellular)"))?;
        Ok(if cellular { Self::Cellular } else { Self::Wifi })
    }
}

// ── Lenient status booleans ─────────────────────────────────────────

/// `sts` arrives as a bool on current firmware; older builds send `1` or `"ok"`.
fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(status_from_value(&Value::deserialize(deserializer)?))
}

fn status_from_value(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "ok" | "1" | "success"
        ),
        _ => false,
    }
}

// ── Authentication ──────────────────────────────────────────────────

/// Response of `POST /api/login`: `{sts, message?, token?}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoginResult {
    #[serde(rename = "sts", deserialize_with = "lenient_bool", default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

// ── Generic acknowledgement ─────────────────────────────────────────

/// Success/failure envelope returned by every "set"-style call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ack {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Ack {
    /// Interpret whatever a 2xx response carried.
    ///
    /// A JSON object's `sts` decides success when present; an object without
    /// `sts`, or a plain-text body, counts as success since the HTTP status
    /// already did.
    pub fn from_payload(payload: Payload) -> Self {
        match payload {
            Payload::Json(Value::Object(obj)) => {
                let message = obj.get("message").and_then(message_text);
                let success = obj.get("sts").is_none_or(status_from_value);
                Self { success, message }
            }
            Payload::Json(other) => Self {
                success: true,
                message: message_text(&other),
            },
            Payload::Text(text) => {
                let text = text.trim();
                Self {
                    success: true,
                    message: (!text.is_empty()).then(|| text.to_owned()),
                }
            }
        }
    }
}

fn message_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// ── Device status ───────────────────────────────────────────────────

/// Read-only identity and status block from `GET /api/status`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DeviceStatus {
    #[serde(rename = "Manufacturer")]
    pub manufacturer: String,
    #[serde(rename = "Device")]
    pub device_model: String,
    #[serde(rename = "DeviceID")]
    pub device_id: String,
    #[serde(rename = "IMEI")]
    pub imei: String,
    #[serde(rename = "WiFiMac")]
    pub wifi_mac: String,
    #[serde(rename = "SDKVersion")]
    pub sdk_version: String,
    #[serde(rename = "FirmwareName")]
    pub firmware_name: String,
    #[serde(rename = "FirmwareVersion")]
    pub firmware_version: String,
    #[serde(rename = "FirmwareBuildDate")]
    pub firmware_build_date: String,
    #[serde(rename = "Network")]
    pub network_ssid: String,
    #[serde(rename = "WiFiIP")]
    pub wifi_ip: String,
}

// ── Config records ──────────────────────────────────────────────────

/// `GET|POST /api/general`
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub hostname: String,
    #[serde(rename = "lattitude")]
    pub latitude: String,
    pub longitude: String,
    #[serde(rename = "sitename")]
    pub site_name: String,
    #[serde(rename = "clientname")]
    pub client_name: String,
    #[serde(rename = "logstorage")]
    pub log_storage: Flag,
    #[serde(rename = "logsend")]
    pub log_send: Flag,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `GET /api/getconnectivity`, `POST /api/setconnectivity`
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct NetworkConfig {
    #[serde(rename = "conn")]
    pub connection_mode: ConnectionMode,
    pub ssid: String,
    pub password: String,
    pub dhcp: Flag,
    #[serde(rename = "staticIP")]
    pub static_ip: String,
    #[serde(rename = "gatewayIP")]
    pub gateway_ip: String,
    #[serde(rename = "subnetMask")]
    pub subnet_mask: String,
    #[serde(rename = "pdns")]
    pub primary_dns: String,
    #[serde(rename = "sdns")]
    pub secondary_dns: String,
    #[serde(rename = "autoApn")]
    pub auto_apn: Flag,
    #[serde(rename = "sim1Apn")]
    pub sim1_apn: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `GET /api/getserverset`, `POST /api/setserverset`
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(rename = "serverIP")]
    pub server_ip: String,
    pub port: u16,
    #[serde(rename = "serverURL")]
    pub server_url: String,
    pub token: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `GET /api/getdevconf`, `POST /api/setdevconf`
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct DeviceTuningConfig {
    #[serde(rename = "urate")]
    pub update_rate: u32,
    #[serde(rename = "modaddr")]
    pub modbus_address: u32,
    #[serde(rename = "stinterval")]
    pub log_interval: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── Serial command channel ──────────────────────────────────────────

/// Body of `POST /serial/cmd`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandInvocation {
    pub cmd: String,
}

impl CommandInvocation {
    pub fn new(cmd: impl Into<String>) -> Self {
        Self { cmd: cmd.into() }
    }
}

/// The `res` field of a command response, resolved once at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CommandResult {
    Text(String),
    Fields(IndexMap<String, String>),
}

impl fmt::Display for CommandResult {
    /// Text as-is; fields as `key: value` lines joined by newline.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Fields(fields) => {
                let mut first = true;
                for (key, value) in fields {
                    if !first {
                        f.write_str("\n")?;
                    }
                    first = false;
                    write!(f, "{key}: {value}")?;
                }
                Ok(())
            }
        }
    }
}

/// Response of `POST /serial/cmd`: `{sts, res, message?}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandResponse {
    pub status: bool,
    pub result: CommandResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CommandResponse {
    pub fn from_payload(payload: Payload) -> Self {
        match payload {
            Payload::Json(value) => Self::from_value(&value),
            Payload::Text(text) => Self {
                status: true,
                result: CommandResult::Text(text),
                message: None,
            },
        }
    }

    /// Resolve `res` into text or fields. Anything else (missing, array,
    /// number) is shown as the pretty-printed response.
    pub fn from_value(value: &Value) -> Self {
        let status = value.get("sts").is_some_and(status_from_value);
        let message = value.get("message").and_then(message_text);
        let result = match value.get("res") {
            Some(Value::String(text)) => CommandResult::Text(text.clone()),
            Some(Value::Object(fields)) => CommandResult::Fields(
                fields
                    .iter()
                    .map(|(k, v)| {
                        let v = match v {
                            Value::String(s) => s.clone(),
                            other => other.to_string(),
                        };
                        (k.clone(), v)
                    })
                    .collect(),
            ),
            _ => CommandResult::Text(
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string()),
            ),
        };
        Self {
            status,
            result,
            message,
        }
    }
}

// ── Administration ──────────────────────────────────────────────────

/// Body of `POST /api/changeP`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_password: Option<String>,
    pub new_password: String,
}

/// Body of `POST /api/settelnet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelnetSettings {
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

/// A firmware file to upload through `POST /api/update`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirmwareImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl FirmwareImage {
    /// Multipart field name the firmware reads the image from.
    pub const FORM_FIELD: &'static str = "file";

    pub fn into_form(self) -> reqwest::multipart::Form {
        let part = reqwest::multipart::Part::bytes(self.bytes).file_name(self.file_name);
        reqwest::multipart::Form::new().part(Self::FORM_FIELD, part)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn flag_serializes_as_integer() {
        assert_eq!(serde_json::to_value(Flag::On).unwrap(), json!(1));
        assert_eq!(serde_json::to_value(Flag::Off).unwrap(), json!(0));
        assert_eq!(serde_json::to_value(Flag::from(true)).unwrap(), json!(1));
    }

    #[test]
    fn flag_rejects_out_of_range() {
        assert!(serde_json::from_value::<Flag>(json!(2)).is_err());
        assert_eq!(serde_json::from_value::<Flag>(json!("1")).unwrap(), Flag::On);
        assert_eq!(serde_json::from_value::<Flag>(json!(false)).unwrap(), Flag::Off);
    }

    #[test]
    fn general_config_toggles_stay_numeric() {
        let mut config: GeneralConfig = serde_json::from_value(json!({
            "hostname": "gw-01",
            "lattitude": "12.97",
            "longitude": "77.59",
            "sitename": "plant",
            "clientname": "acme",
            "logstorage": 0,
            "logsend": 1
        }))
        .unwrap();
        config.log_storage = config.log_storage.toggled();
        config.log_send = Flag::from(false);

        let wire = serde_json::to_value(&config).unwrap();
        assert_eq!(wire["logstorage"], json!(1));
        assert_eq!(wire["logsend"], json!(0));
        assert_eq!(wire["lattitude"], json!("12.97"));
    }

    #[test]
    fn unknown_fields_survive_round_trip() {
        let original = json!({
            "urate": 5,
            "modaddr": 17,
            "stinterval": 60,
            "baud": 9600
        });
        let config: DeviceTuningConfig = serde_json::from_value(original.clone()).unwrap();
        assert_eq!(config.modbus_address, 17);
        assert_eq!(serde_json::to_value(&config).unwrap(), original);
    }

    #[test]
    fn network_config_wire_names() {
        let config = NetworkConfig {
            connection_mode: ConnectionMode::Cellular,
            dhcp: Flag::On,
            primary_dns: "8.8.8.8".into(),
            ..NetworkConfig::default()
        };
        let wire = serde_json::to_value(&config).unwrap();
        assert_eq!(wire["conn"], json!(1));
        assert_eq!(wire["dhcp"], json!(1));
        assert_eq!(wire["pdns"], json!("8.8.8.8"));
        assert_eq!(wire["autoApn"], json!(0));
        assert!(wire.get("connection_mode").is_none());
    }

    #[test]
    fn command_fields_flatten_in_order() {
        let resp = CommandResponse::from_value(&json!({
            "sts": true,
            "res": { "temp": "42", "uptime": "3d" }
        }));
        assert!(resp.status);
        assert_eq!(resp.result.to_string(), "temp: 42\nuptime: 3d");
    }

    #[test]
    fn command_text_and_fallback() {
        let text = CommandResponse::from_value(&json!({ "sts": true, "res": "OK" }));
        assert_eq!(text.result, CommandResult::Text("OK".into()));

        let odd = CommandResponse::from_value(&json!({ "sts": false, "res": [1, 2] }));
        assert!(!odd.status);
        assert!(odd.result.to_string().contains("\"res\""));

        let numeric = CommandResponse::from_value(&json!({ "sts": 1, "res": { "rssi": -71 } }));
        assert!(numeric.status);
        assert_eq!(numeric.result.to_string(), "rssi: -71");
    }

    #[test]
    fn ack_interpretation() {
        let ok = Ack::from_payload(Payload::Json(json!({ "sts": true })));
        assert!(ok.success);

        let rejected =
            Ack::from_payload(Payload::Json(json!({ "sts": false, "message": "busy" })));
        assert!(!rejected.success);
        assert_eq!(rejected.message.as_deref(), Some("busy"));

        let legacy = Ack::from_payload(Payload::Json(json!({ "sts": "ok" })));
        assert!(legacy.success);

        let text = Ack::from_payload(Payload::Text("saved\n".into()));
        assert!(text.success);
        assert_eq!(text.message.as_deref(), Some("saved"));

        let bare = Ack::from_payload(Payload::Json(json!({ "message": "done" })));
        assert!(bare.success);
    }

    #[test]
    fn password_change_omits_missing_old_password() {
        let body = PasswordChange {
            old_password: None,
            new_password: "s3cret".into(),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({ "newPassword": "s3cret" })
        );
    }

    #[test]
    fn login_result_status_variants() {
        let ok: LoginResult =
            serde_json::from_value(json!({ "sts": true, "token": "abc" })).unwrap();
        assert!(ok.success);
        assert_eq!(ok.token.as_deref(), Some("abc"));

        let missing: LoginResult = serde_json::from_value(json!({ "message": "nope" })).unwrap();
        assert!(!missing.success);
    }
}
