//! Cellular check orchestration.
//!
//! `CellularCheck` ties the pieces together for one invocation:
//! 1. start a trace (debug only) and snapshot the provider's networks
//! 2. acquire the cellular network
//! 3. run the HTTP exchange over it
//! 4. release the network, always
//! 5. fold everything into a `CheckResult`
//!
//! Invocations are serialised because binding can be process-wide.

mod redirects;
mod types;

use std::any::Any;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex};

use log::Level;
use rustls::ClientConfig;
use url::Url;

use crate::config::CheckConfig;
use crate::error_handling::{CheckErrorCode, InitializationError};
use crate::http::{CheckHeaders, Connector, CookieJar, ResponseRecord, SocketClient};
use crate::initialization::init_tls_config;
use crate::network::{diagnostics, ConnectivityProvider, NetworkCoordinator};
use crate::trace::TraceCollector;
use crate::user_agent::{default_emulator_predicate, DeviceInfo, EmulatorPredicate};

pub use redirects::{follow_redirects, ChainOutcome};
pub use types::{CheckRequest, CheckResult};

const TAG: &str = "CellularCheck";

/// Runs checks and JSON requests over the cellular network.
pub struct CellularCheck {
    provider: Arc<dyn ConnectivityProvider>,
    coordinator: NetworkCoordinator,
    tracer: Arc<TraceCollector>,
    config: CheckConfig,
    device: DeviceInfo,
    tls: Arc<ClientConfig>,
    emulator: EmulatorPredicate,
    serial: Mutex<()>,
}

impl CellularCheck {
    /// Creates a check runner on top of `provider`.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::TlsConfigError` if the TLS client
    /// configuration cannot be built.
    pub fn new(
        provider: Arc<dyn ConnectivityProvider>,
        config: CheckConfig,
    ) -> Result<Self, InitializationError> {
        let tracer = Arc::new(TraceCollector::default());
        Ok(Self {
            coordinator: NetworkCoordinator::new(provider.clone(), tracer.clone()),
            provider,
            tracer,
            device: DeviceInfo::detect(&config),
            config,
            tls: init_tls_config()?,
            emulator: default_emulator_predicate(),
            serial: Mutex::new(()),
        })
    }

    /// Replaces the trace collector.
    pub fn with_tracer(mut self, tracer: Arc<TraceCollector>) -> Self {
        self.coordinator = NetworkCoordinator::new(self.provider.clone(), tracer.clone());
        self.tracer = tracer;
        self
    }

    /// Replaces the emulator predicate that decides sandbox mode.
    pub fn with_emulator_predicate(mut self, predicate: EmulatorPredicate) -> Self {
        self.emulator = predicate;
        self
    }

    /// Replaces the detected device identity.
    pub fn with_device_info(mut self, device: DeviceInfo) -> Self {
        self.device = device;
        self
    }

    /// Replaces the TLS client configuration.
    pub fn with_tls_config(mut self, tls: Arc<ClientConfig>) -> Self {
        self.tls = tls;
        self
    }

    pub fn tracer(&self) -> &Arc<TraceCollector> {
        &self.tracer
    }

    pub fn device(&self) -> &DeviceInfo {
        &self.device
    }

    pub fn config(&self) -> &CheckConfig {
        &self.config
    }

    /// Opens `url` over cellular and follows its redirect chain.
    pub fn run_check(&self, url: &str, access_token: Option<&str>, debug: bool) -> CheckResult {
        let mut request = CheckRequest::new(url).with_debug(debug);
        request.access_token = access_token.map(str::to_string);
        self.run(&request)
    }

    /// Runs a check.
    ///
    /// Never fails: every outcome, including a panic during the exchange, is
    /// reported through the result's `error` field.
    pub fn run(&self, request: &CheckRequest) -> CheckResult {
        self.with_cellular(request.debug, "check", || self.exchange(request))
    }

    /// Fetches a JSON document over cellular with a single GET.
    ///
    /// Redirects are not followed; the response status and body are returned
    /// as they are.
    pub fn get_json(&self, url: &str, debug: bool) -> CheckResult {
        self.with_cellular(debug, "get", || {
            let url = match parse_url(url) {
                Ok(url) => url,
                Err(result) => return result,
            };
            let mut cookies = CookieJar::new();
            match self
                .socket_client()
                .get(&url, &mut cookies, &CheckHeaders::default())
            {
                Ok(response) => self.success(&response),
                Err(e) => CheckResult::failure(e.error_code(), e.to_string()),
            }
        })
    }

    /// Sends one POST over cellular.
    pub fn post_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: Option<&str>,
        debug: bool,
    ) -> CheckResult {
        self.with_cellular(debug, "post", || {
            let url = match parse_url(url) {
                Ok(url) => url,
                Err(result) => return result,
            };
            let mut cookies = CookieJar::new();
            match self.socket_client().post(&url, headers, body, &mut cookies) {
                Ok(response) => self.success(&response),
                Err(e) => CheckResult::failure(e.error_code(), e.to_string()),
            }
        })
    }

    /// Acquires the network, runs `exchange`, releases the network.
    ///
    /// A panic anywhere in the session, including inside the connectivity
    /// provider, is reported as `sdk_error`. The network is released and the
    /// trace stopped on that path too.
    fn with_cellular<F>(&self, debug: bool, label: &str, exchange: F) -> CheckResult
    where
        F: FnOnce() -> CheckResult,
    {
        let _guard = self.serial.lock().unwrap_or_else(|p| p.into_inner());
        let acquired = Cell::new(false);

        let session = panic::catch_unwind(AssertUnwindSafe(|| {
            self.cellular_session(debug, label, &acquired, exchange)
        }));
        match session {
            Ok(result) => result,
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                self.tracer
                    .add_debug(Level::Error, TAG, &format!("Session panicked: {}", message));
                if panic::catch_unwind(AssertUnwindSafe(|| self.coordinator.release())).is_err() {
                    log::error!("Releasing the cellular network panicked");
                }

                let mut result = CheckResult::failure(CheckErrorCode::Generic, message);
                result.used_cellular = acquired.get();
                if debug {
                    result.trace = Some(self.tracer.snapshot(acquired.get()));
                }
                self.tracer.stop_trace();
                result
            }
        }
    }

    fn cellular_session<F>(
        &self,
        debug: bool,
        label: &str,
        acquired: &Cell<bool>,
        exchange: F,
    ) -> CheckResult
    where
        F: FnOnce() -> CheckResult,
    {
        if debug {
            self.tracer.start_trace(&self.device.summary());
            diagnostics::log_networks(self.provider.as_ref(), &self.tracer, "before");
        }
        self.tracer
            .add_debug(Level::Debug, TAG, &format!("Triggering {} over cellular", label));

        acquired.set(self.coordinator.acquire(self.config.acquisition_timeout));
        let mut result = if acquired.get() {
            let outcome = panic::catch_unwind(AssertUnwindSafe(exchange));
            match outcome {
                Ok(mut result) => {
                    result.used_cellular = true;
                    result
                }
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    self.tracer
                        .add_debug(Level::Error, TAG, &format!("Exchange panicked: {}", message));
                    let mut result = CheckResult::failure(CheckErrorCode::Generic, message);
                    result.used_cellular = true;
                    result
                }
            }
        } else {
            self.tracer
                .add_debug(Level::Debug, TAG, "We do not have a cellular path");
            CheckResult::failure(
                CheckErrorCode::NoDataConnectivity,
                "Data connectivity not available",
            )
        };
        self.coordinator.release();

        if debug {
            diagnostics::log_networks(self.provider.as_ref(), &self.tracer, "after");
            result.trace = Some(self.tracer.snapshot(acquired.get()));
            self.tracer.stop_trace();
        }
        result
    }

    fn exchange(&self, request: &CheckRequest) -> CheckResult {
        let url = match parse_url(&request.url) {
            Ok(url) => url,
            Err(result) => return result,
        };
        let headers = CheckHeaders {
            access_token: request.access_token.clone(),
            operator: request.operator.clone(),
            request_id: request.request_id.clone(),
            sandbox: (self.emulator)(),
        };
        let client = self.socket_client();

        match follow_redirects(&client, &url, &headers, self.config.max_redirects) {
            Ok(outcome) => {
                if request.patch_result {
                    if let Some(body) = &outcome.response.body {
                        self.patch_back(&client, &url, body);
                    }
                }
                self.success(&outcome.response)
            }
            Err(e) => {
                self.tracer
                    .add_debug(Level::Error, TAG, &format!("Check failed: {}", e));
                CheckResult::failure(e.error_code(), e.to_string())
            }
        }
    }

    /// Sends the final body back to the check URL. Failures are only logged.
    fn patch_back(&self, client: &SocketClient, url: &Url, body: &str) {
        let mut cookies = CookieJar::new();
        match client.patch(url, body, &mut cookies) {
            Ok(response) => self.tracer.add_debug(
                Level::Debug,
                TAG,
                &format!("Patched result, status {}", response.status),
            ),
            Err(e) => {
                self.tracer
                    .add_debug(Level::Warn, TAG, &format!("Patching result failed: {}", e))
            }
        }
    }

    fn success(&self, response: &ResponseRecord) -> CheckResult {
        let body = response.body.as_deref().and_then(|raw| {
            serde_json::from_str::<serde_json::Value>(raw)
                .map_err(|e| {
                    self.tracer
                        .add_debug(Level::Warn, TAG, &format!("Body is not valid JSON: {}", e))
                })
                .ok()
        });
        CheckResult::success(response.status, body)
    }

    fn socket_client(&self) -> SocketClient {
        let interface = self.coordinator.network().and_then(|n| n.interface);
        let connector = Connector::new(self.tls.clone(), &self.config, interface);
        SocketClient::new(connector, self.tracer.clone(), self.device.user_agent())
    }
}

fn parse_url(raw: &str) -> Result<Url, CheckResult> {
    Url::parse(raw).map_err(|e| {
        CheckResult::failure(CheckErrorCode::Generic, format!("Invalid URL {}: {}", raw, e))
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unexpected internal failure".to_string()
    }
}
