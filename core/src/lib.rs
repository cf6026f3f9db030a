//! Client core for the "just the fax" page.
//!
//! # Overview
//! Lists fax transmissions and submits new ones through a remote GraphQL
//! endpoint. The crate builds `HttpRequest` values and parses `HttpResponse`
//! values without touching the network (host-does-IO pattern); the host runs
//! the round-trip and feeds the result back into the flow that asked for it.
//!
//! # Design
//! - `ClientHandle` is built once from a `ClientConfig` and borrowed by every
//!   flow. It also owns the query response cache.
//! - `ListFlow` and `SubmitFlow` are explicit state machines over
//!   `FetchState`, exposing `current_state()` and `subscribe()`.
//! - Every request carries a `RequestToken`; responses to superseded requests
//!   are dropped, so a late reply can never overwrite a newer one.
//! - `form::validate` is a pure check; presenting the failure is up to the
//!   caller (`render::VALIDATION_PROMPT`).
//! - `render` turns state into HTML and never shows error details.

pub mod client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod form;
pub mod graphql;
pub mod http;
pub mod list;
pub mod render;
pub mod submit;
pub mod types;

pub use client::{init_client, CacheGeneration, ClientHandle};
pub use config::ClientConfig;
pub use error::{ApiError, ValidationError};
pub use fetch::{FetchState, RequestToken, Resolution, SubscriptionId};
pub use form::{validate, FaxForm};
pub use http::{HttpRequest, HttpResponse};
pub use list::{ListFlow, PendingRequest, RefetchOptions};
pub use submit::SubmitFlow;
pub use types::{DraftField, FaxDraft, FaxRecord};
