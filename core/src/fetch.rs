//! The three-state fetch lifecycle shared by both flows.
//!
//! # Design
//! `FetchMachine` owns one `FetchState`, the id of the latest request it
//! issued, and the listeners to notify after each transition. Responses are
//! matched against the latest token: anything older is discarded, so the
//! last *issued* request wins regardless of arrival order.

use std::fmt;

use tracing::debug;

use crate::error::ApiError;

/// Lifecycle of one asynchronous read. Exactly one variant is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchState<T> {
    Loading,
    Errored(ApiError),
    Loaded(T),
}

impl<T> FetchState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            FetchState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ApiError> {
        match self {
            FetchState::Errored(err) => Some(err),
            _ => None,
        }
    }
}

/// Identifies one request issued by a flow. Strictly increasing per flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Whether a response was applied to the flow's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    /// A newer request was issued after this one; the response was dropped.
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener<T> = Box<dyn FnMut(&FetchState<T>)>;

pub(crate) struct FetchMachine<T> {
    state: Option<FetchState<T>>,
    latest: Option<RequestToken>,
    next_token: u64,
    listeners: Vec<(SubscriptionId, Listener<T>)>,
    next_subscription: u64,
}

impl<T> FetchMachine<T> {
    pub(crate) fn new() -> Self {
        Self {
            state: None,
            latest: None,
            next_token: 0,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    pub(crate) fn state(&self) -> Option<&FetchState<T>> {
        self.state.as_ref()
    }

    /// Enter `Loading` and hand out a fresh token, superseding any request
    /// still in flight.
    pub(crate) fn begin(&mut self) -> RequestToken {
        self.next_token += 1;
        let token = RequestToken(self.next_token);
        self.latest = Some(token);
        self.transition(FetchState::Loading);
        token
    }

    /// Apply the outcome of `token` if it is still the latest request.
    pub(crate) fn settle(&mut self, token: RequestToken, outcome: Result<T, ApiError>) -> Resolution {
        if self.latest != Some(token) {
            debug!(%token, latest = ?self.latest, "discarding stale response");
            return Resolution::Stale;
        }
        self.latest = None;
        self.transition(match outcome {
            Ok(data) => FetchState::Loaded(data),
            Err(err) => FetchState::Errored(err),
        });
        Resolution::Applied
    }

    /// Resolve immediately without a network round-trip.
    pub(crate) fn settle_now(&mut self, data: T) {
        self.latest = None;
        self.transition(FetchState::Loaded(data));
    }

    /// True while `token` is the request the machine is waiting on.
    pub(crate) fn is_latest(&self, token: RequestToken) -> bool {
        self.latest == Some(token)
    }

    pub(crate) fn subscribe(&mut self, listener: impl FnMut(&FetchState<T>) + 'static) -> SubscriptionId {
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    fn transition(&mut self, next: FetchState<T>) {
        let state = &*self.state.insert(next);
        for (_, listener) in &mut self.listeners {
            listener(state);
        }
    }
}
