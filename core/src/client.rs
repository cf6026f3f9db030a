//! The shared connection to the fax GraphQL endpoint.
//!
//! # Design
//! `ClientHandle` is built once from a `ClientConfig` and passed by reference
//! to every flow. It never touches the network: each operation is split into
//! a `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes an `HttpResponse`. The host executes the round-trip between
//! the two.
//!
//! The handle also owns the query response cache. Entries are keyed by the
//! exact request body (document plus variables), hold the decoded `data`
//! payload, and are dropped wholesale whenever a mutation succeeds. Each
//! invalidation bumps a generation; a result fetched under an older
//! generation is never stored.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::graphql::{self, GraphQlRequest, GET_FAXES, SEND_FAX};
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{FaxDraft, FaxRecord, GetFaxesData, SendFaxData};

/// Construct the process-wide handle. Call once at process entry.
pub fn init_client(config: ClientConfig) -> ClientHandle {
    ClientHandle::new(config)
}

#[derive(Debug)]
pub struct ClientHandle {
    base_url: String,
    auth_token: Option<String>,
    cache: Mutex<QueryCache>,
}

#[derive(Debug, Default)]
struct QueryCache {
    generation: u64,
    entries: HashMap<String, serde_json::Value>,
}

/// Cache generation observed when a query was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheGeneration(u64);

impl ClientHandle {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth_token: config.auth_token,
            cache: Mutex::new(QueryCache::default()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_get_faxes(&self) -> Result<HttpRequest, ApiError> {
        self.build_operation::<()>(GET_FAXES, None)
    }

    pub fn build_send_fax(&self, draft: &FaxDraft) -> Result<HttpRequest, ApiError> {
        self.build_operation(SEND_FAX, Some(draft))
    }

    pub fn parse_get_faxes(&self, response: &HttpResponse) -> Result<Vec<FaxRecord>, ApiError> {
        graphql::parse_data::<GetFaxesData>(response).map(|data| data.get_faxes)
    }

    pub fn parse_send_fax(&self, response: &HttpResponse) -> Result<FaxRecord, ApiError> {
        graphql::parse_data::<SendFaxData>(response).map(|data| data.send_fax)
    }

    fn build_operation<V: Serialize>(
        &self,
        query: &str,
        variables: Option<&V>,
    ) -> Result<HttpRequest, ApiError> {
        let payload = GraphQlRequest {
            query: query.to_string(),
            variables,
        };
        let body =
            serde_json::to_string(&payload).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            url: self.base_url.clone(),
            headers: self.headers(),
            body,
        })
    }

    fn headers(&self) -> Vec<(String, String)> {
        let mut headers = Vec::with_capacity(2);
        if let Some(token) = &self.auth_token {
            headers.push(("authorization".to_string(), format!("Bearer {token}")));
        }
        headers.push(("content-type".to_string(), "application/json".to_string()));
        headers
    }

    /// Previously stored result for this exact request, if any.
    pub fn cached<D: DeserializeOwned>(&self, request: &HttpRequest) -> Option<D> {
        let cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        let value = cache.entries.get(&request.body)?.clone();
        serde_json::from_value(value).ok()
    }

    /// Capture before issuing a query; hand back to `remember`.
    pub fn cache_generation(&self) -> CacheGeneration {
        CacheGeneration(self.cache.lock().unwrap_or_else(PoisonError::into_inner).generation)
    }

    /// Store `data` for `request` unless the cache was invalidated since
    /// `issued_at`. Returns whether it was stored.
    pub fn remember<D: Serialize>(
        &self,
        request: &HttpRequest,
        issued_at: CacheGeneration,
        data: &D,
    ) -> bool {
        let Ok(value) = serde_json::to_value(data) else {
            return false;
        };
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if cache.generation != issued_at.0 {
            debug!("not caching result fetched before the last invalidation");
            return false;
        }
        cache.entries.insert(request.body.clone(), value);
        true
    }

    pub fn invalidate_cache(&self) {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        cache.generation += 1;
        if !cache.entries.is_empty() {
            debug!(entries = cache.entries.len(), "invalidating query cache");
            cache.entries.clear();
        }
    }
}
