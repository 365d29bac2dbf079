//! Cellular network acquisition.
//!
//! `NetworkCoordinator` turns the provider's asynchronous callbacks into a
//! blocking `acquire(timeout) -> bool`:
//!
//! ```text
//! Idle --acquire--> Requesting --available--> Bound --release--> Idle
//!                        |
//!                        +--unavailable/timeout--> Failed --release--> Idle
//! ```
//!
//! Whichever of {available, unavailable, timeout} fires first writes the
//! single-shot completion; later events are ignored. Callbacks and the timeout
//! path both decide under the state lock, so a network is never bound after
//! the acquiring thread has given up on it.

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use log::Level;

use crate::config::NATIVE_TIMEOUT_GRACE;
use crate::network::completion::Completion;
use crate::network::provider::{ConnectivityProvider, NetworkCallback};
use crate::network::types::{AcquisitionState, NetworkHandle, NetworkRequest, RequestId};
use crate::trace::TraceCollector;

const TAG: &str = "NetworkCoordinator";

#[derive(Debug)]
struct CoordinatorState {
    phase: AcquisitionState,
    network: Option<NetworkHandle>,
    registration: Option<RequestId>,
}

struct Shared {
    provider: Arc<dyn ConnectivityProvider>,
    tracer: Arc<TraceCollector>,
    state: Mutex<CoordinatorState>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, CoordinatorState> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn debug(&self, level: Level, message: &str) {
        self.tracer.add_debug(level, TAG, message);
    }
}

/// Callback registered for one acquisition attempt.
struct AcquisitionCallback {
    shared: Arc<Shared>,
    completion: Arc<Completion>,
}

impl NetworkCallback for AcquisitionCallback {
    fn on_available(&self, network: NetworkHandle) {
        let mut state = self.shared.lock();
        if self.completion.is_complete() {
            self.shared.debug(
                Level::Debug,
                &format!("Ignoring late availability of network {}", network.id),
            );
            return;
        }

        self.shared
            .debug(Level::Debug, &format!("Cellular available: {:?}", network));
        match self.shared.provider.bind_process_to_network(Some(&network)) {
            Ok(()) => {
                state.phase = AcquisitionState::Bound;
                state.network = Some(network);
                self.completion.complete(true);
            }
            Err(e) => {
                self.shared
                    .debug(Level::Error, &format!("Binding to cellular failed: {}", e));
                state.phase = AcquisitionState::Failed;
                self.completion.complete(false);
            }
        }
    }

    fn on_unavailable(&self) {
        let mut state = self.shared.lock();
        if self.completion.is_complete() {
            return;
        }
        self.shared.debug(Level::Debug, "Cellular unavailable");
        state.phase = AcquisitionState::Failed;
        self.completion.complete(false);
    }

    fn on_lost(&self, network: NetworkHandle) {
        self.shared
            .debug(Level::Warn, &format!("Cellular network lost: {:?}", network));
    }
}

/// Acquires and releases the cellular network for one exchange at a time.
pub struct NetworkCoordinator {
    shared: Arc<Shared>,
}

impl NetworkCoordinator {
    pub fn new(provider: Arc<dyn ConnectivityProvider>, tracer: Arc<TraceCollector>) -> Self {
        Self {
            shared: Arc::new(Shared {
                provider,
                tracer,
                state: Mutex::new(CoordinatorState {
                    phase: AcquisitionState::Idle,
                    network: None,
                    registration: None,
                }),
            }),
        }
    }

    pub fn state(&self) -> AcquisitionState {
        self.shared.lock().phase
    }

    /// The bound network, if any.
    pub fn network(&self) -> Option<NetworkHandle> {
        self.shared.lock().network.clone()
    }

    /// Requests the cellular network and blocks until it is bound, refused,
    /// or `timeout` elapses.
    ///
    /// Returns `true` when the network is bound. A call made while another
    /// acquisition is in flight returns `false` without issuing a second
    /// request; a call made while bound reuses the bound network. On failure
    /// the request is unregistered before this returns.
    pub fn acquire(&self, timeout: Duration) -> bool {
        let shared = &self.shared;
        let provider = &shared.provider;

        {
            let mut state = shared.lock();
            match state.phase {
                AcquisitionState::Requesting => {
                    shared.debug(
                        Level::Warn,
                        "A cellular request is already in flight, not requesting again",
                    );
                    return false;
                }
                AcquisitionState::Bound => {
                    shared.debug(Level::Debug, "Reusing bound cellular network");
                    return true;
                }
                AcquisitionState::Idle | AcquisitionState::Failed => {}
            }

            if !provider.is_mobile_data_enabled() {
                shared.debug(
                    Level::Info,
                    "Mobile data is not enabled, cannot force cellular",
                );
                state.phase = AcquisitionState::Failed;
                return false;
            }
            shared.debug(Level::Debug, "Mobile data is enabled, requesting cellular");
            state.phase = AcquisitionState::Requesting;
        }

        let completion = Arc::new(Completion::new());
        let callback = Arc::new(AcquisitionCallback {
            shared: shared.clone(),
            completion: completion.clone(),
        });
        let native = provider.supports_request_timeout();
        let request = NetworkRequest::cellular_internet();

        // The provider may call back synchronously, so no lock is held here
        let requested = panic::catch_unwind(AssertUnwindSafe(|| {
            provider.request_network(&request, callback, native.then_some(timeout))
        }));
        let registration = match requested {
            Ok(Ok(id)) => id,
            Ok(Err(e)) => {
                shared.debug(Level::Error, &format!("Cellular request failed: {}", e));
                let mut state = shared.lock();
                completion.complete(false);
                state.phase = AcquisitionState::Failed;
                return false;
            }
            Err(payload) => {
                shared.debug(Level::Error, "Cellular request panicked");
                {
                    let mut state = shared.lock();
                    completion.complete(false);
                    state.phase = AcquisitionState::Failed;
                }
                panic::resume_unwind(payload);
            }
        };
        shared.lock().registration = Some(registration);

        let wait = if native {
            timeout.saturating_add(NATIVE_TIMEOUT_GRACE)
        } else {
            timeout
        };
        completion.wait_timeout(wait);

        let acquired = {
            let mut state = shared.lock();
            if completion.complete(false) {
                shared.debug(
                    Level::Debug,
                    &format!("Cellular request timed out after {:?}", wait),
                );
                state.phase = AcquisitionState::Failed;
                false
            } else {
                completion.outcome().unwrap_or(false)
            }
        };

        if !acquired {
            let registration = shared.lock().registration.take();
            if let Some(id) = registration {
                provider.unregister_network_callback(id);
            }
        }
        acquired
    }

    /// Unregisters the request, unbinds the process, and returns to `Idle`.
    pub fn release(&self) {
        let (registration, network) = {
            let mut state = self.shared.lock();
            state.phase = AcquisitionState::Idle;
            (state.registration.take(), state.network.take())
        };

        if let Some(id) = registration {
            self.shared
                .debug(Level::Debug, "Unregistering cellular request");
            self.shared.provider.unregister_network_callback(id);
        }
        if network.is_some() {
            if let Err(e) = self.shared.provider.bind_process_to_network(None) {
                self.shared
                    .debug(Level::Error, &format!("Unbinding failed: {}", e));
            }
        }
    }
}

impl Drop for NetworkCoordinator {
    fn drop(&mut self) {
        if self.state() != AcquisitionState::Idle {
            self.release();
        }
    }
}
