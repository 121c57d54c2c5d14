//! Shared test utilities for integration tests.
//!
//! `FakeKismet` is a small hyper server that speaks enough of the Kismet
//! REST protocol to exercise the client: basic-auth login through
//! `session/check_session`, a `KISMET` session cookie, `.cmd` endpoints that
//! require the cookie, and tagged msgpack responses.

#![allow(dead_code)]

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use base64::Engine;
use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use rmpv::Value;
use tokio::net::TcpListener;

use kismet_api::KismetClient;
use kismet_core::config::ServerConfig;

pub const USER: &str = "kismet";
pub const PASSWORD: &str = "secret";
pub const SESSION: &str = "sess-1";

/// Tracker type codes used to build fixtures.
pub mod tag {
    pub const STRING: u8 = 0;
    pub const INT32: u8 = 5;
    pub const UINT64: u8 = 8;
    pub const DOUBLE: u8 = 10;
    pub const MAC: u8 = 11;
    pub const UUID: u8 = 12;
    pub const VECTOR: u8 = 13;
    pub const MAP: u8 = 14;
    pub const MACMAP: u8 = 16;
}

/// A request as seen by the fake server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub cookie: Option<String>,
    pub authorization: Option<String>,
    /// Decoded `msgpack` form field, for command posts.
    pub command: Option<Value>,
}

#[derive(Debug, Default)]
pub struct ServerState {
    pub requests: Vec<RecordedRequest>,
}

impl ServerState {
    pub fn count(&self, path: &str) -> usize {
        self.requests.iter().filter(|r| r.path == path).count()
    }

    pub fn last(&self, path: &str) -> Option<&RecordedRequest> {
        self.requests.iter().rev().find(|r| r.path == path)
    }
}

pub struct FakeKismet {
    pub addr: SocketAddr,
    pub state: Arc<Mutex<ServerState>>,
}

impl FakeKismet {
    /// Bind on an ephemeral port and serve until the test runtime exits.
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind fake server");
        let addr = listener.local_addr().expect("no local addr");
        let state = Arc::new(Mutex::new(ServerState::default()));

        let server_state = state.clone();
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let state = server_state.clone();
                tokio::spawn(async move {
                    let svc = service_fn(move |req| {
                        let state = state.clone();
                        async move { handle_request(req, state).await }
                    });
                    let _ = http1::Builder::new()
                        .serve_connection(TokioIo::new(stream), svc)
                        .await;
                });
            }
        });

        Self { addr, state }
    }

    pub fn uri(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// A client with no credentials and no session cache.
    pub fn client(&self) -> KismetClient {
        self.client_with_timeout(5_000)
    }

    pub fn client_with_timeout(&self, timeout_ms: u64) -> KismetClient {
        let config = ServerConfig {
            address: self.uri(),
            timeout_ms,
            ..ServerConfig::default()
        };
        KismetClient::new(&config).expect("failed to build client")
    }

    /// A client logging in with the given credentials.
    pub fn client_with_login(&self, user: &str, password: &str) -> KismetClient {
        let mut client = self.client();
        client.set_login(user, password);
        client
    }

    pub fn count(&self, path: &str) -> usize {
        self.state.lock().unwrap().count(path)
    }

    pub fn last(&self, path: &str) -> RecordedRequest {
        self.state
            .lock()
            .unwrap()
            .last(path)
            .cloned()
            .unwrap_or_else(|| panic!("no request to {path}"))
    }
}

// ---- Fixture builders ----

pub fn tagged(tag: u8, payload: Value) -> Value {
    Value::Array(vec![Value::from(tag), payload])
}

pub fn string(s: &str) -> Value {
    tagged(tag::STRING, Value::from(s))
}

pub fn mac(addr: &str) -> Value {
    tagged(
        tag::MAC,
        Value::Array(vec![Value::from(addr), Value::from("FF:FF:FF:FF:FF:FF")]),
    )
}

/// A STRING tag whose payload is raw bytes, valid utf-8 or not.
pub fn raw_string(bytes: &[u8]) -> Value {
    assert!(bytes.len() < 32, "fixstr only");
    let mut packed = vec![0xa0 | bytes.len() as u8];
    packed.extend_from_slice(bytes);
    let payload = rmpv::decode::read_value(&mut packed.as_slice()).expect("bad fixstr");
    tagged(tag::STRING, payload)
}

pub fn map(entries: Vec<(&str, Value)>) -> Value {
    tagged(
        tag::MAP,
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (Value::from(k), v))
                .collect(),
        ),
    )
}

pub fn vector(items: Vec<Value>) -> Value {
    tagged(tag::VECTOR, Value::Array(items))
}

pub fn pack(value: &Value) -> Vec<u8> {
    let mut buf = Vec::new();
    rmpv::encode::write_value(&mut buf, value).expect("failed to pack fixture");
    buf
}

/// Minimal device record.
pub fn device(key: &str, macaddr: &str, name: &str) -> Value {
    map(vec![
        ("kismet.device.base.key", string(key)),
        ("kismet.device.base.macaddr", mac(macaddr)),
        ("kismet.device.base.name", string(name)),
        ("kismet.device.base.channel", string("6")),
    ])
}

/// Raw SSID bytes that are not valid utf-8.
pub const JUNK_SSID: &[u8] = &[0xff, 0xfe, b'A'];

/// Device beaconing an SSID that is not valid utf-8.
pub fn junk_ssid_device() -> Value {
    map(vec![
        ("kismet.device.base.key", string("KEY_J")),
        ("kismet.device.base.macaddr", mac("AA:AA:AA:AA:AA:0C")),
        (
            "dot11.device",
            map(vec![("dot11.device.last_beaconed_ssid", raw_string(JUNK_SSID))]),
        ),
    ])
}

/// Dot11 access point with three associated clients, one of which the
/// server no longer tracks.
pub fn access_point() -> Value {
    map(vec![
        ("kismet.device.base.key", string("AP_KEY")),
        ("kismet.device.base.macaddr", mac("00:11:22:33:44:55")),
        (
            "dot11.device",
            map(vec![(
                "dot11.device.associated_client_map",
                tagged(
                    tag::MACMAP,
                    Value::Map(vec![
                        (Value::from("AA:AA:AA:AA:AA:01"), string("CLIENT_1")),
                        (Value::from("AA:AA:AA:AA:AA:02"), string("CLIENT_2")),
                        (Value::from("AA:AA:AA:AA:AA:03"), string("CLIENT_GONE")),
                    ]),
                ),
            )]),
        ),
    ])
}

pub fn system_status() -> Value {
    map(vec![
        ("kismet.system.version", string("2017.0.0")),
        ("kismet.system.devices.count", tagged(tag::UINT64, Value::from(3u64))),
        ("kismet.system.battery.percentage", tagged(tag::INT32, Value::from(-1))),
    ])
}

pub fn sources() -> Value {
    vector(vec![map(vec![
        (
            "kismet.datasource.uuid",
            tagged(tag::UUID, Value::from("5fe308bd-0000-0000-0000-00c0ca8f1b6a")),
        ),
        ("kismet.datasource.name", string("wlan0")),
        (
            "kismet.datasource.hop_rate",
            tagged(tag::DOUBLE, Value::F64(5.0)),
        ),
    ])])
}

// ---- Server ----

fn basic_auth_header() -> String {
    let token =
        base64::engine::general_purpose::STANDARD.encode(format!("{USER}:{PASSWORD}"));
    format!("Basic {token}")
}

fn has_session(cookie: Option<&str>) -> bool {
    cookie
        .map(|c| {
            c.split(';')
                .any(|pair| pair.trim() == format!("KISMET={SESSION}"))
        })
        .unwrap_or(false)
}

fn decode_command(body: &[u8]) -> Option<Value> {
    let (_, encoded) = url::form_urlencoded::parse(body).find(|(k, _)| k == "msgpack")?;
    let raw = base64::engine::general_purpose::STANDARD
        .decode(encoded.as_bytes())
        .ok()?;
    rmpv::decode::read_value(&mut raw.as_slice()).ok()
}

fn respond(status: StatusCode, body: Vec<u8>) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .body(Full::new(Bytes::from(body)))
        .unwrap()
}

fn msgpack(value: &Value) -> Response<Full<Bytes>> {
    respond(StatusCode::OK, pack(value))
}

fn unauthorized() -> Response<Full<Bytes>> {
    respond(StatusCode::UNAUTHORIZED, b"Login required".to_vec())
}

async fn handle_request(
    req: Request<Incoming>,
    state: Arc<Mutex<ServerState>>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().trim_start_matches('/').to_string();
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let cookie = header("cookie");
    let authorization = header("authorization");

    let body = req
        .into_body()
        .collect()
        .await
        .map(|c| c.to_bytes())
        .unwrap_or_default();
    let command = decode_command(&body);

    state.lock().unwrap().requests.push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        cookie: cookie.clone(),
        authorization: authorization.clone(),
        command,
    });

    let authed = has_session(cookie.as_deref());

    let response = match (method.as_str(), path.as_str()) {
        ("GET", "session/check_session") => {
            if authorization.as_deref() == Some(basic_auth_header().as_str()) {
                Response::builder()
                    .status(StatusCode::OK)
                    .header("set-cookie", format!("KISMET={SESSION}; Path=/"))
                    .body(Full::new(Bytes::from_static(b"Login valid")))
                    .unwrap()
            } else {
                unauthorized()
            }
        }
        (_, "always_denied.cmd") => unauthorized(),
        ("POST", p) if !authed && p.ends_with(".cmd") => unauthorized(),
        ("GET", "secure/status.msgpack") if !authed => unauthorized(),
        ("GET", "secure/status.msgpack") => msgpack(&system_status()),
        ("GET", "system/status.msgpack") => msgpack(&system_status()),
        ("GET", "devices/all_devices.msgpack") => msgpack(&vector(vec![
            device("KEY_A", "AA:AA:AA:AA:AA:0A", "first"),
            device("KEY_B", "AA:AA:AA:AA:AA:0B", "second"),
            junk_ssid_device(),
        ])),
        ("GET", "datasource/all_sources.msgpack") => msgpack(&sources()),
        ("GET", "devices/by-key/AP_KEY/device.msgpack") => msgpack(&access_point()),
        ("GET", "devices/by-key/KEY_A/device.msgpack/kismet.device.base.channel") => {
            msgpack(&string("6"))
        }
        ("GET", "devices/by-key/CLIENT_GONE/device.msgpack") => {
            respond(StatusCode::NOT_FOUND, b"No such device".to_vec())
        }
        ("GET", p) if p.starts_with("devices/by-key/") && p.ends_with("/device.msgpack") => {
            let key = p
                .trim_start_matches("devices/by-key/")
                .trim_end_matches("/device.msgpack");
            msgpack(&device(key, "AA:AA:AA:AA:AA:FF", key))
        }
        ("GET", p) if p.starts_with("devices/by-mac/") => {
            msgpack(&vector(vec![device("KEY_A", "AA:AA:AA:AA:AA:0A", "first")]))
        }
        (_, p) if p.starts_with("devices/last-time/") => msgpack(&vector(vec![device(
            "KEY_B",
            "AA:AA:AA:AA:AA:0B",
            "second",
        )])),
        ("POST", "phy/phy80211/ssid_regex.cmd")
        | ("POST", "phy/phy80211/probe_regex.cmd") => {
            msgpack(&vector(vec![device("KEY_A", "AA:AA:AA:AA:AA:0A", "Example")]))
        }
        ("POST", p) if p.ends_with(".cmd") => respond(StatusCode::OK, b"OK".to_vec()),
        ("GET", "slow.msgpack") => {
            tokio::time::sleep(std::time::Duration::from_secs(3)).await;
            msgpack(&system_status())
        }
        ("GET", "garbage.msgpack") => respond(StatusCode::OK, vec![0xc1, 0x00, 0x13]),
        _ => respond(StatusCode::NOT_FOUND, b"Not found".to_vec()),
    };

    Ok(response)
}
