// Shared test helpers: a scripted loopback HTTP server and a fake
// connectivity provider.
//
// This module is included by the other test files with `mod helpers;`.

#![allow(dead_code)] // Not every test file uses every helper

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use cellular_check::error_handling::ProviderError;
use cellular_check::network::{
    ConnectivityProvider, NetworkCallback, NetworkHandle, NetworkInfo, NetworkRequest, RequestId,
    Transport,
};
use cellular_check::trace::TraceCollector;
use cellular_check::user_agent::{fixed_emulator_predicate, DeviceInfo};
use cellular_check::{CellularCheck, CheckConfig};

/// Handler producing the raw response for the n-th request (0-based).
pub type Handler = dyn Fn(usize, &RecordedRequest, u16) -> String + Send + Sync;

/// One request as received by the mock server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub raw: String,
    pub request_line: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn path(&self) -> &str {
        self.request_line.split(' ').nth(1).unwrap_or("")
    }

    pub fn method(&self) -> &str {
        self.request_line.split(' ').next().unwrap_or("")
    }
}

/// Loopback HTTP server answering each connection through a handler.
pub struct MockServer {
    pub port: u16,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockServer {
    /// Starts a server; `handler(index, request, port)` builds each response.
    pub fn start<F>(handler: F) -> Self
    where
        F: Fn(usize, &RecordedRequest, u16) -> String + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind mock server");
        let port = listener.local_addr().expect("local addr").port();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = requests.clone();
        let handler: Arc<Handler> = Arc::new(handler);

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { continue };
                let Some(request) = read_request(&mut stream) else { continue };
                let index = {
                    let mut all = recorded.lock().expect("requests lock");
                    all.push(request.clone());
                    all.len() - 1
                };
                let response = handler(index, &request, port);
                let _ = stream.write_all(response.as_bytes());
                let _ = stream.flush();
            }
        });

        Self { port, requests }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{}", self.port, path)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("requests lock").clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().expect("requests lock").len()
    }
}

fn read_request(stream: &mut TcpStream) -> Option<RecordedRequest> {
    stream
        .set_read_timeout(Some(Duration::from_secs(5)))
        .ok()?;
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    let head_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
    let mut lines = head.split("\r\n");
    let request_line = lines.next().unwrap_or_default().to_string();
    let headers: Vec<(String, String)> = lines
        .filter(|l| !l.is_empty())
        .filter_map(|l| l.split_once(':'))
        .map(|(n, v)| (n.trim().to_string(), v.trim().to_string()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);
    while buf.len() < head_end + content_length {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body = String::from_utf8_lossy(&buf[head_end..]).to_string();

    Some(RecordedRequest {
        raw: String::from_utf8_lossy(&buf).to_string(),
        request_line,
        headers,
        body,
    })
}

/// Builds a JSON response.
pub fn json_response(status: u16, body: &str) -> String {
    format!(
        "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    )
}

/// Builds a redirect response with optional extra header lines.
pub fn redirect_response(location: &str, extra: &[&str]) -> String {
    let mut out = format!("HTTP/1.1 302 Found\r\nLocation: {}\r\n", location);
    for line in extra {
        out.push_str(line);
        out.push_str("\r\n");
    }
    out.push_str("Content-Length: 0\r\nConnection: close\r\n\r\n");
    out
}

/// How the fake provider answers a network request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behaviour {
    Available,
    Unavailable,
    Silent,
}

/// Scripted connectivity provider that records every call.
pub struct FakeProvider {
    pub behaviour: Behaviour,
    pub data_enabled: bool,
    pub requests: AtomicUsize,
    pub unregisters: AtomicUsize,
    pub binds: AtomicUsize,
    pub unbinds: AtomicUsize,
    pub bound: AtomicBool,
    /// Makes the next `request_network` call panic
    pub panic_on_request: AtomicBool,
    pub networks_calls: AtomicUsize,
    /// Makes the n-th `networks` call (1-based) panic; 0 never panics
    pub panic_on_networks_call: AtomicUsize,
}

impl FakeProvider {
    pub fn new(behaviour: Behaviour) -> Arc<Self> {
        Arc::new(Self::with_data(behaviour, true))
    }

    pub fn with_data(behaviour: Behaviour, data_enabled: bool) -> Self {
        Self {
            behaviour,
            data_enabled,
            requests: AtomicUsize::new(0),
            unregisters: AtomicUsize::new(0),
            binds: AtomicUsize::new(0),
            unbinds: AtomicUsize::new(0),
            bound: AtomicBool::new(false),
            panic_on_request: AtomicBool::new(false),
            networks_calls: AtomicUsize::new(0),
            panic_on_networks_call: AtomicUsize::new(0),
        }
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

impl ConnectivityProvider for FakeProvider {
    fn is_mobile_data_enabled(&self) -> bool {
        self.data_enabled
    }

    fn supports_request_timeout(&self) -> bool {
        false
    }

    fn request_network(
        &self,
        _request: &NetworkRequest,
        callback: Arc<dyn NetworkCallback>,
        _timeout: Option<Duration>,
    ) -> Result<RequestId, ProviderError> {
        let id = self.requests.fetch_add(1, Ordering::SeqCst) as RequestId + 1;
        if self.panic_on_request.swap(false, Ordering::SeqCst) {
            panic!("connectivity service crashed");
        }
        match self.behaviour {
            Behaviour::Available => {
                thread::spawn(move || {
                    callback.on_available(NetworkHandle {
                        id,
                        interface: None,
                    })
                });
            }
            Behaviour::Unavailable => {
                thread::spawn(move || callback.on_unavailable());
            }
            Behaviour::Silent => {}
        }
        Ok(id)
    }

    fn unregister_network_callback(&self, _id: RequestId) {
        self.unregisters.fetch_add(1, Ordering::SeqCst);
    }

    fn bind_process_to_network(
        &self,
        network: Option<&NetworkHandle>,
    ) -> Result<(), ProviderError> {
        if network.is_some() {
            self.binds.fetch_add(1, Ordering::SeqCst);
            self.bound.store(true, Ordering::SeqCst);
        } else {
            self.unbinds.fetch_add(1, Ordering::SeqCst);
            self.bound.store(false, Ordering::SeqCst);
        }
        Ok(())
    }

    fn networks(&self) -> Vec<NetworkInfo> {
        let call = self.networks_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call == self.panic_on_networks_call.load(Ordering::SeqCst) {
            panic!("network listing crashed");
        }
        vec![NetworkInfo {
            name: "fake0".to_string(),
            transports: vec![Transport::Cellular],
            capabilities: Vec::new(),
            state: "up".to_string(),
            addresses: Vec::new(),
        }]
    }
}

/// Deterministic device identity for tests.
pub fn test_device() -> DeviceInfo {
    DeviceInfo {
        product: "tru-sdk-rust".to_string(),
        sdk_version: "0.1.0".to_string(),
        platform: "linux".to_string(),
        os_version: "6.1.0".to_string(),
        manufacturer: "Acme".to_string(),
        model: "Test".to_string(),
    }
}

/// Builds a `CellularCheck` over `provider` with quiet tracing and no
/// sandbox header.
pub fn test_check(provider: Arc<FakeProvider>, config: CheckConfig) -> CellularCheck {
    let tracer = Arc::new(TraceCollector::default());
    tracer.set_console_logging(false);
    CellularCheck::new(provider, config)
        .expect("Failed to build CellularCheck")
        .with_tracer(tracer)
        .with_device_info(test_device())
        .with_emulator_predicate(fixed_emulator_predicate(false))
}

/// Short timeouts for failure-path tests.
pub fn fast_config() -> CheckConfig {
    CheckConfig {
        acquisition_timeout: Duration::from_millis(200),
        connect_timeout: Duration::from_secs(2),
        read_timeout: Duration::from_secs(2),
        ..Default::default()
    }
}
