//! In-memory stand-in for the fax GraphQL service.
//!
//! Understands exactly the two operations the page uses, `getFaxes` and
//! `sendFax`, picked by the root field named in the query document. Records
//! are kept in insertion order and vanish with the process.

use std::{env, sync::Arc};

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fax {
    pub sid: String,
    pub from: String,
    pub to: String,
    pub media_url: String,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlRequest {
    pub query: String,
    #[serde(default)]
    pub variables: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct SendFaxVariables {
    from: Option<String>,
    to: Option<String>,
    media_url: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct ServerConfig {
    pub port: u16,
    /// When set, every request must carry `authorization: Bearer <api_key>`.
    pub api_key: Option<String>,
}

impl ServerConfig {
    /// Reads `PORT` (default 4000) and `API_KEY`.
    pub fn from_env() -> Result<Self, std::num::ParseIntError> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "4000".to_string())
            .parse()?;
        let api_key = env::var("API_KEY").ok().filter(|k| !k.trim().is_empty());
        Ok(Self { port, api_key })
    }
}

pub type Db = Arc<RwLock<Vec<Fax>>>;

#[derive(Clone)]
struct AppState {
    db: Db,
    api_key: Option<Arc<str>>,
}

/// Router without authentication.
pub fn app() -> Router {
    app_with(&ServerConfig::default())
}

pub fn app_with(config: &ServerConfig) -> Router {
    let state = AppState {
        db: Arc::new(RwLock::new(Vec::new())),
        api_key: config.api_key.as_deref().map(Arc::from),
    };
    Router::new()
        .route("/graphql", post(graphql))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with(listener, &ServerConfig::default()).await
}

pub async fn run_with(listener: TcpListener, config: &ServerConfig) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(config)).await
}

fn errors(message: &str) -> Json<Value> {
    Json(json!({ "data": null, "errors": [{ "message": message }] }))
}

fn authorized(expected: Option<&str>, headers: &HeaderMap) -> bool {
    let Some(key) = expected else {
        return true;
    };
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .is_some_and(|token| token == key)
}

async fn graphql(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<GraphQlRequest>,
) -> (StatusCode, Json<Value>) {
    if !authorized(state.api_key.as_deref(), &headers) {
        warn!("rejecting request with missing or wrong bearer token");
        return (StatusCode::UNAUTHORIZED, errors("unauthorized"));
    }

    let op = operation(&request.query);
    match op.as_ref().map(|(kind, field)| (*kind, field.as_str())) {
        Some((Kind::Mutation, "sendFax")) => send_fax(&state.db, request.variables).await,
        Some((Kind::Query, "getFaxes")) => {
            let faxes = state.db.read().await;
            debug!(count = faxes.len(), "getFaxes");
            (StatusCode::OK, Json(json!({ "data": { "getFaxes": *faxes } })))
        }
        _ => (StatusCode::OK, errors("unknown operation")),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Query,
    Mutation,
}

/// Operation type and first root field of a single-operation document.
///
/// Handles `#` comments, the `{ ... }` query shorthand, and aliased root
/// fields (`latest: getFaxes`). Not a GraphQL parser.
fn operation(document: &str) -> Option<(Kind, String)> {
    let stripped: String = document
        .lines()
        .map(|line| line.split('#').next().unwrap_or(""))
        .collect::<Vec<_>>()
        .join("\n");
    let head = stripped.trim_start();
    let kind = if head.starts_with("mutation") {
        Kind::Mutation
    } else if head.starts_with("query") || head.starts_with('{') {
        Kind::Query
    } else {
        return None;
    };

    let selection = &stripped[stripped.find('{')? + 1..];
    let mut idents = identifiers(selection);
    let (first, after_first) = idents.next()?;
    let field = if selection[after_first..].trim_start().starts_with(':') {
        idents.next()?.0
    } else {
        first
    };
    Some((kind, field.to_string()))
}

/// Identifiers in `text` with the byte offset just past each one.
fn identifiers(text: &str) -> impl Iterator<Item = (&str, usize)> {
    let mut rest = 0;
    std::iter::from_fn(move || {
        let tail = &text[rest..];
        let start = rest + tail.find(|c: char| c.is_alphanumeric() || c == '_')?;
        let len = text[start..]
            .find(|c: char| !(c.is_alphanumeric() || c == '_'))
            .unwrap_or(text.len() - start);
        rest = start + len;
        Some((&text[start..rest], rest))
    })
}

async fn send_fax(db: &Db, variables: Option<Value>) -> (StatusCode, Json<Value>) {
    let vars: SendFaxVariables = match variables.map(serde_json::from_value) {
        Some(Ok(vars)) => vars,
        Some(Err(e)) => return (StatusCode::OK, errors(&format!("invalid variables: {e}"))),
        None => return (StatusCode::OK, errors("sendFax requires variables")),
    };
    let (Some(from), Some(to), Some(media_url)) = (vars.from, vars.to, vars.media_url) else {
        return (
            StatusCode::OK,
            errors("sendFax requires `from`, `to` and `media_url`"),
        );
    };

    let fax = Fax {
        sid: format!("FX{}", Uuid::new_v4().simple()),
        from,
        to,
        media_url,
    };
    info!(sid = %fax.sid, to = %fax.to, "fax queued");
    db.write().await.push(fax.clone());
    (StatusCode::OK, Json(json!({ "data": { "sendFax": fax } })))
}
