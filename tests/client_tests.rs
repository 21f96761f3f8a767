//! Integration tests for keenetic-rs.
//!
//! The device is simulated by an in-memory [`Connector`] that answers the
//! `/auth` and `/rci` endpoints from a script and records every request.
//!
//! Run with: cargo test --test client_tests

use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

use keenetic_rs::prelude::*;

static INIT: Once = Once::new();

/// Initialize logging for tests
fn init_logging() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init()
            .ok();
    });
}

const BASE_URL: &str = "http://keenetic-router.test";
const USERNAME: &str = "testuser";
const PASSWORD: &str = "testpassword";

/// Digest of testuser / "mocked Keenetic" / testpassword / "ABCDEF12345".
const EXPECTED_DIGEST: &str = "b588e507acab442166d77a14b1ffc5f6fd715f9aa444a493bc13a85d993af0a9";

// ============================================================================
// SIMULATED DEVICE
// ============================================================================

struct DeviceScript {
    challenge_headers: Vec<(&'static str, String)>,
    auth_post_status: u16,
    confirm_status: u16,
    logout_status: u16,
    rci_status: u16,
    rci_body: Value,
    fail_connect: bool,
}

impl Default for DeviceScript {
    fn default() -> Self {
        Self {
            challenge_headers: vec![
                ("www-authenticate", "x-ndw2-interactive ololo=atata".to_string()),
                ("x-ndm-realm", "mocked Keenetic".to_string()),
                ("x-ndm-challenge", "ABCDEF12345".to_string()),
            ],
            auth_post_status: 200,
            confirm_status: 200,
            logout_status: 200,
            rci_status: 200,
            rci_body: json!({}),
            fail_connect: false,
        }
    }
}

#[derive(Default)]
struct DeviceLog {
    requests: Vec<Request>,
    connects: usize,
    closes: usize,
    posted_auth: bool,
}

#[derive(Clone, Default)]
struct MockDevice {
    script: Arc<Mutex<DeviceScript>>,
    log: Arc<Mutex<DeviceLog>>,
}

impl MockDevice {
    fn with_script(script: DeviceScript) -> Self {
        Self {
            script: Arc::new(Mutex::new(script)),
            log: Arc::default(),
        }
    }

    fn client(&self) -> KeeneticClient<MockDevice> {
        init_logging();
        KeeneticClient::with_connector(BASE_URL, USERNAME, PASSWORD, self.clone())
            .expect("Failed to create client")
    }

    fn script(&self) -> std::sync::MutexGuard<'_, DeviceScript> {
        self.script.lock().unwrap()
    }

    fn requests(&self) -> Vec<Request> {
        self.log.lock().unwrap().requests.clone()
    }

    fn calls(&self) -> Vec<(Method, String)> {
        self.requests()
            .into_iter()
            .map(|r| (r.method, r.url.path().to_string()))
            .collect()
    }

    fn count(&self, method: Method, path: &str) -> usize {
        self.calls()
            .into_iter()
            .filter(|(m, p)| *m == method && p == path)
            .count()
    }

    fn connects(&self) -> usize {
        self.log.lock().unwrap().connects
    }

    fn closes(&self) -> usize {
        self.log.lock().unwrap().closes
    }

    fn last_body(&self) -> Value {
        let body = self
            .requests()
            .last()
            .and_then(|r| r.body.clone())
            .expect("last request should have a body");
        serde_json::from_str(&body).unwrap()
    }

    fn respond(&self, request: &Request) -> Response {
        let script = self.script.lock().unwrap();
        let mut log = self.log.lock().unwrap();
        log.requests.push(request.clone());

        let path = request.url.path();
        let method = &request.method;
        let (status, headers, body) = if path == "/auth" && *method == Method::GET {
            if log.posted_auth {
                (script.confirm_status, HeaderMap::new(), String::new())
            } else {
                let mut headers = HeaderMap::new();
                for (name, value) in &script.challenge_headers {
                    headers.insert(*name, HeaderValue::from_str(value).unwrap());
                }
                (401, headers, String::new())
            }
        } else if path == "/auth" && *method == Method::POST {
            log.posted_auth = script.auth_post_status < 300;
            (script.auth_post_status, HeaderMap::new(), String::new())
        } else if path == "/auth" && *method == Method::DELETE {
            if script.logout_status < 300 {
                log.posted_auth = false;
            }
            (script.logout_status, HeaderMap::new(), String::new())
        } else if path == "/rci/interface" || (path == "/rci/" && *method == Method::POST) {
            (script.rci_status, HeaderMap::new(), script.rci_body.to_string())
        } else {
            (404, HeaderMap::new(), "{}".to_string())
        };

        Response::new(StatusCode::from_u16(status).unwrap(), headers, body)
    }
}

struct MockTransport {
    device: MockDevice,
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: Request) -> keenetic_rs::Result<Response> {
        Ok(self.device.respond(&request))
    }

    async fn close(&mut self) -> keenetic_rs::Result<()> {
        self.device.log.lock().unwrap().closes += 1;
        Ok(())
    }
}

#[async_trait]
impl Connector for MockDevice {
    type Transport = MockTransport;

    async fn connect(&self) -> keenetic_rs::Result<MockTransport> {
        if self.script().fail_connect {
            return Err(Error::Transport("connection refused".to_string()));
        }
        self.log.lock().unwrap().connects += 1;
        Ok(MockTransport {
            device: self.clone(),
        })
    }
}

fn interface_table() -> Value {
    json!({
        "show": {
            "interface": {
                "GigabitEthernet0": {"type": "GigabitEthernet", "traits": ["Ethernet"]},
                "UsbQmi0": {"type": "UsbQmi", "traits": ["Ip", "Mobile", "Sms"]},
                "UsbLte0": {"type": "UsbLte", "traits": ["Mobile"]},
                "Bridge0": {"type": "Bridge"},
                "Wireguard0": {"type": "Wireguard", "traits": []}
            }
        }
    })
}

// ============================================================================
// AUTHENTICATION TESTS
// ============================================================================

mod auth_tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_performs_handshake() {
        let device = MockDevice::default();
        let mut client = device.client();

        client.connect().await.expect("Login should succeed");

        assert!(client.is_authenticated());
        assert_eq!(client.state(), SessionState::Authenticated);
        assert_eq!(
            device.calls(),
            vec![
                (Method::GET, "/auth".to_string()),
                (Method::POST, "/auth".to_string()),
                (Method::GET, "/auth".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_auth_post_carries_digest() {
        let device = MockDevice::default();
        let mut client = device.client();
        client.connect().await.unwrap();

        let post = device
            .requests()
            .into_iter()
            .find(|r| r.method == Method::POST)
            .unwrap();
        let body: Value = serde_json::from_str(post.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"login": USERNAME, "password": EXPECTED_DIGEST}));
    }

    #[tokio::test]
    async fn test_every_request_is_json() {
        let device = MockDevice::default();
        let mut client = device.client();
        client.connect().await.unwrap();
        client.close().await.unwrap();

        for request in device.requests() {
            assert_eq!(request.headers[CONTENT_TYPE], "application/json");
        }
    }

    #[tokio::test]
    async fn test_unsupported_auth_method() {
        let device = MockDevice::default();
        device.script().challenge_headers[0].1 = "unsupported-method ".to_string();
        let mut client = device.client();

        let err = client.connect().await.unwrap_err();

        assert!(matches!(err, Error::UnsupportedAuthMethod(_)));
        assert!(err.to_string().contains("unsupported-method"));
        assert!(!client.is_authenticated());
        assert_eq!(device.count(Method::POST, "/auth"), 0);
    }

    #[tokio::test]
    async fn test_missing_www_authenticate() {
        let device = MockDevice::default();
        device.script().challenge_headers.remove(0);
        let mut client = device.client();

        let err = client.connect().await.unwrap_err();

        assert!(matches!(err, Error::Protocol(_)));
        assert!(err.is_auth_error());
        assert_eq!(device.calls(), vec![(Method::GET, "/auth".to_string())]);
    }

    #[tokio::test]
    async fn test_rejected_credentials() {
        let device = MockDevice::default();
        device.script().auth_post_status = 401;
        let mut client = device.client();

        let err = client.connect().await.unwrap_err();

        assert_eq!(err.status(), Some(401));
        assert!(!client.is_authenticated());
        assert_eq!(client.state(), SessionState::Disconnected);
        // No confirmation probe after a rejected POST
        assert_eq!(device.count(Method::GET, "/auth"), 1);
    }

    #[tokio::test]
    async fn test_failed_confirmation() {
        let device = MockDevice::default();
        device.script().confirm_status = 403;
        let mut client = device.client();

        let err = client.connect().await.unwrap_err();

        assert_eq!(err.status(), Some(403));
        assert!(!client.is_authenticated());
    }

    #[tokio::test]
    async fn test_missing_realm_and_challenge_are_tolerated() {
        let device = MockDevice::default();
        device.script().challenge_headers.truncate(1);
        let mut client = device.client();

        client.connect().await.expect("Login should still be attempted");

        let post = device
            .requests()
            .into_iter()
            .find(|r| r.method == Method::POST)
            .unwrap();
        let body: Value = serde_json::from_str(post.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["password"], keenetic_rs::auth::digest(USERNAME, "", PASSWORD, ""));
    }

    #[tokio::test]
    async fn test_explicit_login_with_other_credentials() {
        let device = MockDevice::default();
        let mut client = device.client();
        client.connect().await.unwrap();
        client.logout().await.unwrap();

        client.login("other", "secret").await.unwrap();

        let body = device
            .requests()
            .into_iter()
            .filter(|r| r.method == Method::POST)
            .last()
            .and_then(|r| r.body)
            .unwrap();
        let body: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body["login"], "other");
        assert!(client.is_authenticated());
    }
}

// ============================================================================
// LIFECYCLE TESTS
// ============================================================================

mod lifecycle_tests {
    use super::*;

    #[tokio::test]
    async fn test_scoped_logs_in_and_out_once() {
        let device = MockDevice::default();
        let mut client = device.client();

        client
            .scoped(|_client| Box::pin(async move { Ok::<_, Error>(()) }))
            .await
            .expect("Scoped session should succeed");

        assert_eq!(device.connects(), 1);
        assert_eq!(device.count(Method::POST, "/auth"), 1);
        assert_eq!(device.count(Method::DELETE, "/auth"), 1);
        assert_eq!(device.closes(), 1);
        assert!(!client.is_authenticated());
        assert!(!client.is_connected());
    }

    #[tokio::test]
    async fn test_scoped_returns_body_value() {
        let device = MockDevice::default();
        device.script().rci_body = json!({"id": "Bridge0"});
        let mut client = device.client();

        let value = client
            .scoped(|client| Box::pin(async move { client.rci_interface().await }))
            .await
            .unwrap();

        assert_eq!(value, json!({"id": "Bridge0"}));
        assert_eq!(device.calls().last().unwrap().0, Method::DELETE);
    }

    #[tokio::test]
    async fn test_scoped_releases_transport_after_failed_login() {
        let device = MockDevice::default();
        device.script().challenge_headers[0].1 = "basic realm=x".to_string();
        let mut client = device.client();

        let err = client
            .scoped(|_client| Box::pin(async move { Ok::<_, Error>(()) }))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::UnsupportedAuthMethod(_)));
        assert_eq!(device.count(Method::DELETE, "/auth"), 0);
        assert_eq!(device.closes(), 1);
    }

    #[tokio::test]
    async fn test_scoped_body_error_wins_over_close_error() {
        let device = MockDevice::default();
        device.script().logout_status = 500;
        let mut client = device.client();

        let err = client
            .scoped(|_client| {
                Box::pin(async move { Err::<(), _>(Error::UnexpectedResponse("body".into())) })
            })
            .await
            .unwrap_err();

        assert!(matches!(err, Error::UnexpectedResponse(_)));
    }

    #[tokio::test]
    async fn test_scoped_surfaces_close_error() {
        let device = MockDevice::default();
        device.script().logout_status = 500;
        let mut client = device.client();

        let err = client
            .scoped(|_client| Box::pin(async move { Ok::<_, Error>(()) }))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(500));
    }

    #[tokio::test]
    async fn test_failed_login_leaves_transport_open() {
        let device = MockDevice::default();
        device.script().auth_post_status = 401;
        let mut client = device.client();

        assert!(client.connect().await.is_err());
        assert!(client.is_connected());
        assert_eq!(device.closes(), 0);

        client.close().await.unwrap();
        assert_eq!(device.count(Method::DELETE, "/auth"), 0);
        assert_eq!(device.closes(), 1);
        assert!(!client.is_connected());
    }

    #[tokio::test]
    async fn test_failed_logout_keeps_session_and_transport() {
        let device = MockDevice::default();
        device.script().logout_status = 500;
        let mut client = device.client();
        client.connect().await.unwrap();

        let err = client.close().await.unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert!(client.is_authenticated());
        assert!(client.is_connected());
        assert_eq!(device.closes(), 0);

        device.script().logout_status = 200;
        client.close().await.expect("Retrying close should succeed");
        assert!(!client.is_authenticated());
        assert_eq!(device.closes(), 1);
    }

    #[tokio::test]
    async fn test_logout_then_close_skips_delete() {
        let device = MockDevice::default();
        let mut client = device.client();
        client.connect().await.unwrap();

        client.logout().await.unwrap();
        client.close().await.unwrap();

        assert_eq!(device.count(Method::DELETE, "/auth"), 1);
        assert_eq!(device.closes(), 1);
    }

    #[tokio::test]
    async fn test_connect_failure_is_transport_error() {
        let device = MockDevice::default();
        device.script().fail_connect = true;
        let mut client = device.client();

        let err = client.connect().await.unwrap_err();

        assert!(err.is_transport_error());
        assert!(!client.is_connected());
        assert!(device.calls().is_empty());
    }

    #[tokio::test]
    async fn test_requests_after_close_fail() {
        let device = MockDevice::default();
        let mut client = device.client();
        client.connect().await.unwrap();
        client.close().await.unwrap();

        let err = client.get_interfaces().await.unwrap_err();
        assert!(matches!(err, Error::NotConnected));
    }
}

// ============================================================================
// REQUEST HELPER TESTS
// ============================================================================

mod helper_tests {
    use super::*;

    #[tokio::test]
    async fn test_get_does_not_check_status() {
        let device = MockDevice::default();
        let mut client = device.client();
        client.connect().await.unwrap();

        let response = client.get("/missing", None).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_post_empty_data_sends_no_body() {
        let device = MockDevice::default();
        let mut client = device.client();
        client.connect().await.unwrap();

        client.post("/rci/", &json!({}), None).await.unwrap();

        assert!(device.requests().last().unwrap().body.is_none());
    }

    #[tokio::test]
    async fn test_extra_headers_override_content_type() {
        let device = MockDevice::default();
        let mut client = device.client();
        client.connect().await.unwrap();

        let mut extra = HeaderMap::new();
        extra.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        extra.insert("x-trace", HeaderValue::from_static("abc"));
        client.get("/rci/interface", Some(&extra)).await.unwrap();

        let request = device.requests().pop().unwrap();
        assert_eq!(request.headers[CONTENT_TYPE], "text/plain");
        assert_eq!(request.headers["x-trace"], "abc");
    }
}

// ============================================================================
// RCI TESTS
// ============================================================================

mod rci_tests {
    use super::*;

    async fn connected(device: &MockDevice) -> KeeneticClient<MockDevice> {
        let mut client = device.client();
        client.connect().await.expect("Login should succeed");
        client
    }

    #[tokio::test]
    async fn test_rci_interface() {
        let device = MockDevice::default();
        device.script().rci_body = json!([{"id": "GigabitEthernet0"}]);
        let client = connected(&device).await;

        let body = client.rci_interface().await.unwrap();

        assert_eq!(body, json!([{"id": "GigabitEthernet0"}]));
        assert_eq!(device.calls().last().unwrap(), &(Method::GET, "/rci/interface".to_string()));
    }

    #[tokio::test]
    async fn test_rci_interface_enforces_status() {
        let device = MockDevice::default();
        let client = connected(&device).await;
        device.script().rci_status = 401;

        let err = client.rci_interface().await.unwrap_err();
        assert_eq!(err.status(), Some(401));
    }

    #[tokio::test]
    async fn test_get_interfaces_request() {
        let device = MockDevice::default();
        device.script().rci_body = interface_table();
        let client = connected(&device).await;

        let body = client.get_interfaces().await.unwrap();

        assert_eq!(body, interface_table());
        assert_eq!(device.last_body(), json!({"show": {"interface": {}}}));
    }

    #[tokio::test]
    async fn test_get_interfaces_enforces_status() {
        let device = MockDevice::default();
        let client = connected(&device).await;
        device.script().rci_status = 500;

        let err = client.get_interfaces().await.unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    #[tokio::test]
    async fn test_get_mobile_interfaces_filters_by_trait() {
        let device = MockDevice::default();
        device.script().rci_body = interface_table();
        let client = connected(&device).await;

        let mobile = client.get_mobile_interfaces().await.unwrap();

        let mut names: Vec<_> = mobile.keys().cloned().collect();
        names.sort();
        assert_eq!(names, vec!["UsbLte0", "UsbQmi0"]);
        assert_eq!(mobile["UsbQmi0"]["type"], "UsbQmi");
    }

    #[tokio::test]
    async fn test_get_mobile_interfaces_without_table() {
        let device = MockDevice::default();
        device.script().rci_body = json!({"show": {}});
        let client = connected(&device).await;

        let err = client.get_mobile_interfaces().await.unwrap_err();
        assert!(matches!(err, Error::UnexpectedResponse(_)));
    }

    #[tokio::test]
    async fn test_get_sms_by_interface() {
        let device = MockDevice::default();
        device.script().rci_body = json!({"sms": {"list": {"messages": {}}}});
        let client = connected(&device).await;

        let body = client.get_sms_by_interface("UsbQmi0").await.unwrap();

        assert_eq!(body, json!({"sms": {"list": {"messages": {}}}}));
        assert_eq!(
            device.last_body(),
            json!({"sms": {"interface": "UsbQmi0", "list": {}}})
        );
    }

    #[tokio::test]
    async fn test_mark_sms_as_read() {
        let device = MockDevice::default();
        let client = connected(&device).await;

        client.mark_sms_as_read("Interface0", ["1", "2"]).await.unwrap();

        assert_eq!(
            device.last_body(),
            json!({"sms": {"interface": "Interface0", "read": [{"id": "1"}, {"id": "2"}]}})
        );
    }

    #[tokio::test]
    async fn test_delete_sms() {
        let device = MockDevice::default();
        let client = connected(&device).await;

        client
            .delete_sms("Interface0", vec![MessageId::new("3")])
            .await
            .unwrap();

        assert_eq!(
            device.last_body(),
            json!({"sms": {"interface": "Interface0", "delete": [{"id": "3"}]}})
        );
    }

    #[tokio::test]
    async fn test_sms_calls_ignore_status() {
        let device = MockDevice::default();
        let client = connected(&device).await;
        {
            let mut script = device.script();
            script.rci_status = 500;
            script.rci_body = json!({"status": [{"status": "error", "message": "no such interface"}]});
        }

        let listed = client.get_sms_by_interface("Nope0").await.unwrap();
        let read = client.mark_sms_as_read("Nope0", ["1"]).await.unwrap();
        let deleted = client.delete_sms("Nope0", ["1"]).await.unwrap();

        for body in [listed, read, deleted] {
            assert_eq!(body["status"][0]["status"], "error");
        }
    }

    #[tokio::test]
    async fn test_services_match_client_methods() {
        let device = MockDevice::default();
        device.script().rci_body = interface_table();
        let client = connected(&device).await;

        let via_service = client.interfaces().mobile().await.unwrap();
        let via_client = client.get_mobile_interfaces().await.unwrap();
        assert_eq!(via_service, via_client);

        client.sms().list(InterfaceName::new("UsbQmi0")).await.unwrap();
        assert_eq!(device.last_body()["sms"]["interface"], "UsbQmi0");
    }

    #[tokio::test]
    async fn test_calls_while_unauthenticated_are_not_blocked() {
        let device = MockDevice::default();
        device.script().auth_post_status = 401;
        let mut client = device.client();
        let _ = client.connect().await;
        device.script().rci_body = json!({"error": "unauthorized"});

        let body = client.get_sms_by_interface("UsbQmi0").await.unwrap();
        assert_eq!(body["error"], "unauthorized");
    }
}
