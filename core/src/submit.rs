//! Submit Flow: the `sendFax` mutation container.
//!
//! # Design
//! Same host-does-IO contract as the List Flow. The flow has no state until
//! the first submission; after that it carries a `FetchState<FaxRecord>`.
//! Success drops every cached query result but never refetches the list.

use tracing::{info, warn};

use crate::client::ClientHandle;
use crate::error::ApiError;
use crate::fetch::{FetchMachine, FetchState, RequestToken, Resolution, SubscriptionId};
use crate::http::HttpResponse;
use crate::list::PendingRequest;
use crate::types::{FaxDraft, FaxRecord};

pub struct SubmitFlow<'c> {
    client: &'c ClientHandle,
    machine: FetchMachine<FaxRecord>,
}

impl<'c> SubmitFlow<'c> {
    pub fn new(client: &'c ClientHandle) -> Self {
        Self {
            client,
            machine: FetchMachine::new(),
        }
    }

    /// `None` until something has been submitted.
    pub fn current_state(&self) -> Option<&FetchState<FaxRecord>> {
        self.machine.state()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&FetchState<FaxRecord>) + 'static) -> SubscriptionId {
        self.machine.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.machine.unsubscribe(id)
    }

    /// Build the mutation for `draft` and enter `Loading`.
    ///
    /// The draft is sent as-is; run it through `form::validate` first.
    pub fn submit(&mut self, draft: FaxDraft) -> Result<PendingRequest, ApiError> {
        let request = self.client.build_send_fax(&draft)?;
        let token = self.machine.begin();
        Ok(PendingRequest { token, request })
    }

    pub fn resolve(&mut self, token: RequestToken, response: HttpResponse) -> Resolution {
        let outcome = self.client.parse_send_fax(&response);
        let resolution = self.machine.settle(token, outcome.clone());
        if resolution == Resolution::Applied {
            match &outcome {
                Ok(fax) => {
                    info!(%token, sid = %fax.sid, "fax submitted");
                }
                Err(err) => warn!(%token, error = %err, "sendFax failed"),
            }
        }
        if outcome.is_ok() {
            self.client.invalidate_cache();
        }
        resolution
    }

    pub fn fail(&mut self, token: RequestToken, reason: impl Into<String>) -> Resolution {
        let err = ApiError::Transport(reason.into());
        if self.machine.is_latest(token) {
            warn!(%token, error = %err, "sendFax did not complete");
        }
        self.machine.settle(token, Err(err))
    }
}
