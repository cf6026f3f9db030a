//! List Flow: the `getFaxes` query container.
//!
//! # Design
//! `ListFlow` never performs I/O. `mount` and `refetch` return the
//! `PendingRequest` the host must execute; the host then reports back through
//! `resolve` (an HTTP response arrived) or `fail` (the round-trip itself
//! failed). Each call to `mount`/`refetch` supersedes whatever was in flight.

use tracing::{debug, warn};

use crate::client::{CacheGeneration, ClientHandle};
use crate::error::ApiError;
use crate::fetch::{FetchMachine, FetchState, RequestToken, Resolution, SubscriptionId};
use crate::http::{HttpRequest, HttpResponse};
use crate::types::FaxRecord;

const LOADING: &FetchState<Vec<FaxRecord>> = &FetchState::Loading;

/// A request the host must execute, tagged with the token the flow expects
/// back.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    pub token: RequestToken,
    pub request: HttpRequest,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefetchOptions {
    /// Go to the network even if a cached result exists.
    pub skip_cache: bool,
}

pub struct ListFlow<'c> {
    client: &'c ClientHandle,
    machine: FetchMachine<Vec<FaxRecord>>,
    in_flight: Option<InFlight>,
}

/// What the flow needs to cache the result of its outstanding query.
struct InFlight {
    request: HttpRequest,
    issued_at: CacheGeneration,
}

impl<'c> ListFlow<'c> {
    pub fn new(client: &'c ClientHandle) -> Self {
        Self {
            client,
            machine: FetchMachine::new(),
            in_flight: None,
        }
    }

    /// First load. Answers from the cache when possible, in which case no
    /// request is returned.
    pub fn mount(&mut self) -> Result<Option<PendingRequest>, ApiError> {
        self.start(false)
    }

    /// Re-enter `Loading`, dropping whatever was loaded before.
    pub fn refetch(&mut self, options: RefetchOptions) -> Result<Option<PendingRequest>, ApiError> {
        self.start(options.skip_cache)
    }

    /// The current state. `Loading` until the first `mount`.
    pub fn current_state(&self) -> &FetchState<Vec<FaxRecord>> {
        self.machine.state().unwrap_or(LOADING)
    }

    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&FetchState<Vec<FaxRecord>>) + 'static,
    ) -> SubscriptionId {
        self.machine.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.machine.unsubscribe(id)
    }

    /// Apply the response to the request identified by `token`.
    pub fn resolve(&mut self, token: RequestToken, response: HttpResponse) -> Resolution {
        let outcome = self.client.parse_get_faxes(&response);
        if self.machine.is_latest(token) {
            match (&outcome, self.in_flight.take()) {
                (Ok(faxes), Some(in_flight)) => {
                    self.client.remember(&in_flight.request, in_flight.issued_at, faxes);
                    debug!(%token, count = faxes.len(), "fax list loaded");
                }
                (Ok(_), None) => {}
                (Err(err), _) => warn!(%token, error = %err, "fax list query failed"),
            }
        }
        self.machine.settle(token, outcome)
    }

    /// Report that the request identified by `token` never got a response.
    pub fn fail(&mut self, token: RequestToken, reason: impl Into<String>) -> Resolution {
        let err = ApiError::Transport(reason.into());
        if self.machine.is_latest(token) {
            warn!(%token, error = %err, "fax list query failed");
            self.in_flight = None;
        }
        self.machine.settle(token, Err(err))
    }

    fn start(&mut self, skip_cache: bool) -> Result<Option<PendingRequest>, ApiError> {
        let request = self.client.build_get_faxes()?;
        let token = self.machine.begin();

        if !skip_cache {
            if let Some(faxes) = self.client.cached::<Vec<FaxRecord>>(&request) {
                debug!(%token, count = faxes.len(), "fax list served from cache");
                self.in_flight = None;
                self.machine.settle_now(faxes);
                return Ok(None);
            }
        }

        debug!(%token, skip_cache, "issuing getFaxes");
        self.in_flight = Some(InFlight {
            request: request.clone(),
            issued_at: self.client.cache_generation(),
        });
        Ok(Some(PendingRequest { token, request }))
    }
}
