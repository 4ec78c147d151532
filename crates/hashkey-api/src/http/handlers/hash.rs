//! Digest endpoints.
//!
//! POST /v1/hash                - digest the password after the processing delay
//! POST /v2/hash                - issue a retrieval key, digest in the background
//! GET  /v3/hash/{key}          - poll for a digest (empty body while pending)
//! GET  /v3/hash/               - empty key, always an empty body
//! GET  /v3/hash/{key}/status   - unknown / pending / ready

use axum::extract::rejection::{FormRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::{Form, Json};
use serde::{Deserialize, Serialize};

use hashkey_types::digest::{DigestStatus, EncodedDigest, RetrievalKey};

use crate::http::error::AppError;
use crate::state::AppState;

/// `password` field of the hashing endpoints, read from the urlencoded body
/// or the query string.
#[derive(Debug, Default, Deserialize)]
pub struct PasswordForm {
    #[serde(default)]
    pub password: Option<String>,
}

/// Resolve the submitted password.
///
/// The body field wins over the query string. A missing content type, an
/// unparsable body or query, or no field at all never rejects the request;
/// the password is then the empty string.
fn resolve_password(
    query: Result<Query<PasswordForm>, QueryRejection>,
    form: Result<Form<PasswordForm>, FormRejection>,
) -> String {
    let from_body = form.ok().and_then(|Form(form)| form.password);
    from_body
        .or_else(|| query.ok().and_then(|Query(query)| query.password))
        .unwrap_or_default()
}

/// Body of `GET /v3/hash/{key}/status`.
#[derive(Debug, Serialize, Deserialize)]
pub struct KeyStatusResponse {
    pub key: RetrievalKey,
    pub status: DigestStatus,
}

/// POST /v1/hash - respond with the digest once the processing delay elapses.
pub async fn hash_now(
    State(state): State<AppState>,
    query: Result<Query<PasswordForm>, QueryRejection>,
    form: Result<Form<PasswordForm>, FormRejection>,
) -> String {
    let password = resolve_password(query, form);
    state
        .digest_service
        .encode_delayed(password.as_bytes())
        .await
        .into_string()
}

/// POST /v2/hash - respond immediately with a retrieval key.
pub async fn submit_hash(
    State(state): State<AppState>,
    query: Result<Query<PasswordForm>, QueryRejection>,
    form: Result<Form<PasswordForm>, FormRejection>,
) -> Result<String, AppError> {
    let password = resolve_password(query, form);
    let key = state.digest_service.submit(password.into_bytes())?;
    Ok(key.to_string())
}

/// GET /v3/hash/{key} - the digest, or an empty body if it is not ready or
/// the key was never issued. Clients retry on empty.
pub async fn get_hash(State(state): State<AppState>, Path(key): Path<String>) -> String {
    state
        .digest_service
        .lookup(&RetrievalKey::from(key))
        .map(EncodedDigest::into_string)
        .unwrap_or_default()
}

/// GET /v3/hash/ - no key was given, so there is nothing to return.
pub async fn get_hash_without_key(State(state): State<AppState>) -> String {
    state
        .digest_service
        .lookup(&RetrievalKey::from(String::new()))
        .map(EncodedDigest::into_string)
        .unwrap_or_default()
}

/// GET /v3/hash/{key}/status
pub async fn get_hash_status(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<KeyStatusResponse> {
    let key = RetrievalKey::from(key);
    let status = state.digest_service.status(&key);
    Json(KeyStatusResponse { key, status })
}
