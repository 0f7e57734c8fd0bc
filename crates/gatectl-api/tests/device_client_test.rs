#![allow(clippy::unwrap_used)]
// Integration tests for `DeviceClient` using wiremock.

use pretty_assertions::assert_eq;
use reqwest::Method;
use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use gatectl_api::{
    CommandInvocation, CommandResult, ConnectionMode, Credentials, DeviceClient, FirmwareImage,
    Flag, Payload, RequestBody, TelnetSettings, TokenPolicy,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup_with(policy: TokenPolicy) -> (MockServer, DeviceClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = DeviceClient::with_client(reqwest::Client::new(), base_url, policy);
    (server, client)
}

async fn setup() -> (MockServer, DeviceClient) {
    setup_with(TokenPolicy::Ignore).await
}

fn creds(password: &str) -> Credentials {
    Credentials::new("admin", SecretString::from(password.to_string()))
}

fn status_body() -> serde_json::Value {
    json!({
        "Manufacturer": "Acme Instruments",
        "Device": "GW-400",
        "DeviceID": "GW400-0017",
        "IMEI": "356938035643809",
        "WiFiMac": "24:6f:28:aa:bb:cc",
        "SDKVersion": "v4.4.2",
        "FirmwareName": "gw-fw",
        "FirmwareVersion": "2.3.1",
        "FirmwareBuildDate": "2024-11-02",
        "Network": "plant-floor",
        "WiFiIP": "192.168.4.20"
    })
}

// ── Authentication ──────────────────────────────────────────────────

#[tokio::test]
async fn test_login_success_posts_credentials() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({ "username": "admin", "password": "pw" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "sts": true })))
        .expect(1)
        .mount(&server)
        .await;

    let result = client.login(&creds("pw")).await.unwrap();
    assert!(result.success);
    assert!(result.token.is_none());
}

#[tokio::test]
async fn test_login_rejected_in_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "sts": false, "message": "Wrong password" })),
        )
        .mount(&server)
        .await;

    let result = client.login(&creds("bad")).await.unwrap();
    assert!(!result.success);
    assert_eq!(result.message.as_deref(), Some("Wrong password"));
}

#[tokio::test]
async fn test_login_http_401_surfaces_message() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid credentials" })),
        )
        .mount(&server)
        .await;

    let err = client.login(&creds("bad")).await.unwrap_err();
    assert_eq!(err.status, Some(401));
    assert_eq!(err.message, "HTTP error! Status: 401 - Invalid credentials");
}

#[tokio::test]
async fn test_bearer_policy_attaches_login_token() {
    let (server, client) = setup_with(TokenPolicy::Bearer).await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "sts": true, "token": "t0k3n" })),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/status"))
        .and(header("authorization", "Bearer t0k3n"))
        .respond_with(ResponseTemplate::new(200).set_body_json(status_body()))
        .expect(1)
        .mount(&server)
        .await;

    client.login(&creds("pw")).await.unwrap();
    assert!(client.has_token());
    let status = client.get_status().await.unwrap();
    assert_eq!(status.device_id, "GW400-0017");
}

#[tokio::test]
async fn test_ignore_policy_sends_no_authorization() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "sts": true, "token": "t0k3n" })),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/status"))
        .and(|req: &Request| !req.headers.contains_key("authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(status_body()))
        .expect(1)
        .mount(&server)
        .await;

    client.login(&creds("pw")).await.unwrap();
    assert!(!client.has_token());
    client.get_status().await.unwrap();
}

// ── Status ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_status_maps_all_fields() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(status_body()))
        .mount(&server)
        .await;

    let status = client.get_status().await.unwrap();
    assert_eq!(status.manufacturer, "Acme Instruments");
    assert_eq!(status.device_model, "GW-400");
    assert_eq!(status.imei, "356938035643809");
    assert_eq!(status.wifi_mac, "24:6f:28:aa:bb:cc");
    assert_eq!(status.sdk_version, "v4.4.2");
    assert_eq!(status.firmware_name, "gw-fw");
    assert_eq!(status.firmware_version, "2.3.1");
    assert_eq!(status.firmware_build_date, "2024-11-02");
    assert_eq!(status.network_ssid, "plant-floor");
    assert_eq!(status.wifi_ip, "192.168.4.20");
}

// ── Config round trips ──────────────────────────────────────────────

#[tokio::test]
async fn test_general_config_round_trip() {
    let (server, client) = setup().await;
    let record = json!({
        "hostname": "gw-01",
        "lattitude": "12.9716",
        "longitude": "77.5946",
        "sitename": "North Plant",
        "clientname": "Acme",
        "logstorage": 1,
        "logsend": 0
    });

    Mock::given(method("GET"))
        .and(path("/api/general"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&record))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/general"))
        .and(body_json(&record))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "sts": true })))
        .expect(1)
        .mount(&server)
        .await;

    let fetched = client.get_general_config().await.unwrap();
    let ack = client.set_general_config(&fetched).await.unwrap();
    assert!(ack.success);
    let again = client.get_general_config().await.unwrap();
    assert_eq!(again, fetched);
}

#[tokio::test]
async fn test_network_config_round_trip_keeps_unknown_fields() {
    let (server, client) = setup().await;
    let record = json!({
        "conn": 1,
        "ssid": "plant-floor",
        "password": "wpa-secret",
        "dhcp": 0,
        "staticIP": "192.168.4.20",
        "gatewayIP": "192.168.4.1",
        "subnetMask": "255.255.255.0",
        "pdns": "1.1.1.1",
        "sdns": "8.8.8.8",
        "autoApn": 1,
        "sim1Apn": "iot.carrier",
        "band": "LTE-B3"
    });

    Mock::given(method("GET"))
        .and(path("/api/getconnectivity"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&record))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/setconnectivity"))
        .and(body_json(&record))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "sts": true })))
        .expect(1)
        .mount(&server)
        .await;

    let fetched = client.get_network_config().await.unwrap();
    assert_eq!(fetched.connection_mode, ConnectionMode::Cellular);
    assert_eq!(fetched.dhcp, Flag::Off);
    assert_eq!(fetched.extra.get("band"), Some(&json!("LTE-B3")));
    assert!(client.set_network_config(&fetched).await.unwrap().success);
}

#[tokio::test]
async fn test_server_and_device_config_paths() {
    let (server, client) = setup().await;
    let server_record = json!({
        "serverIP": "203.0.113.10",
        "port": 1883,
        "serverURL": "mqtt://broker.example",
        "token": "ingest-key"
    });
    let dev_record = json!({ "urate": 10, "modaddr": 3, "stinterval": 300 });

    Mock::given(method("GET"))
        .and(path("/api/getserverset"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&server_record))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/setserverset"))
        .and(body_json(&server_record))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "sts": true })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/getdevconf"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&dev_record))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/setdevconf"))
        .and(body_json(json!({ "urate": 15, "modaddr": 3, "stinterval": 300 })))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .expect(1)
        .mount(&server)
        .await;

    let srv = client.get_server_config().await.unwrap();
    assert_eq!(srv.port, 1883);
    assert!(client.set_server_config(&srv).await.unwrap().success);

    let mut dev = client.get_device_config().await.unwrap();
    dev.update_rate = 15;
    let ack = client.set_device_config(&dev).await.unwrap();
    assert!(ack.success);
    assert_eq!(ack.message.as_deref(), Some("OK"));
}

// ── Error translation ───────────────────────────────────────────────

#[tokio::test]
async fn test_non_json_error_uses_status_text() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/getdevconf"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<h1>oops</h1>"))
        .mount(&server)
        .await;

    let err = client.get_device_config().await.unwrap_err();
    assert_eq!(err.status, Some(500));
    assert_eq!(
        err.message,
        "HTTP error! Status: 500 - Internal Server Error"
    );
}

#[tokio::test]
async fn test_malformed_success_body_is_an_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/getserverset"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("{not json", "application/json"),
        )
        .mount(&server)
        .await;

    let err = client.get_server_config().await.unwrap_err();
    assert!(err.status.is_none());
    assert!(err.message.contains("/api/getserverset"), "{}", err.message);
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let client = DeviceClient::with_client(
        reqwest::Client::new(),
        Url::parse("http://127.0.0.1:9").unwrap(),
        TokenPolicy::Ignore,
    );
    let err = client.get_status().await.unwrap_err();
    assert!(err.status.is_none());
    assert!(!err.message.is_empty());
}

// ── Raw request ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_raw_request_returns_text_for_non_json() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/reboot"))
        .and(body_json(json!({ "delay": 0 })))
        .respond_with(ResponseTemplate::new(200).set_body_string("rebooting"))
        .mount(&server)
        .await;

    let payload = client
        .request(Method::POST, "/reboot", RequestBody::Json(json!({ "delay": 0 })))
        .await
        .unwrap();
    assert_eq!(payload, Payload::Text("rebooting".into()));
}

// ── Serial command ──────────────────────────────────────────────────

#[tokio::test]
async fn test_send_command_flattens_mapping() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/serial/cmd"))
        .and(body_json(json!({ "cmd": "AT+STAT" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sts": true,
            "res": { "temp": "42", "uptime": "3d" }
        })))
        .mount(&server)
        .await;

    let resp = client
        .send_command(&CommandInvocation::new("AT+STAT"))
        .await
        .unwrap();
    assert!(resp.status);
    assert!(matches!(resp.result, CommandResult::Fields(_)));
    assert_eq!(resp.result.to_string(), "temp: 42\nuptime: 3d");
}

// ── Administration ──────────────────────────────────────────────────

#[tokio::test]
async fn test_firmware_upload_is_multipart_without_json_header() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/update"))
        .and(|req: &Request| {
            req.headers
                .get("content-type")
                .and_then(|v| v.to_str().ok())
                .is_some_and(|ct| ct.starts_with("multipart/form-data; boundary="))
        })
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "sts": true })))
        .expect(1)
        .mount(&server)
        .await;

    let image = FirmwareImage {
        file_name: "gw-fw-2.3.2.bin".into(),
        bytes: vec![0xde, 0xad, 0xbe, 0xef],
    };
    assert!(client.firmware_update(image).await.unwrap().success);
}

#[tokio::test]
async fn test_admin_endpoints_use_firmware_paths() {
    let (server, client) = setup().await;

    for p in ["/api/changeP", "/api/settelnet", "/api/factroryReset", "/api/restore", "/api/setbackup"] {
        Mock::given(method("POST"))
            .and(path(p))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "sts": true })))
            .expect(1)
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/api/gettelnet"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "enabled": true, "port": 23 })))
        .mount(&server)
        .await;

    let change = gatectl_api::PasswordChange {
        old_password: Some("old".into()),
        new_password: "new".into(),
    };
    assert!(client.change_admin_password(&change).await.unwrap().success);
    let telnet = TelnetSettings { enabled: true, port: Some(23) };
    assert!(client.enable_telnet(&telnet).await.unwrap().success);
    assert!(client.factory_reset(&json!({})).await.unwrap().success);
    assert!(client.restore(&json!({})).await.unwrap().success);
    assert!(client.set_backup(&json!({ "slot": 1 })).await.unwrap().success);
    assert_eq!(client.get_telnet().await.unwrap()["port"], json!(23));
}
