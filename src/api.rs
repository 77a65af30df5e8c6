use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::error::ErrorCode;

/// Request body for both `v1/auth/login` and `v1/auth/register`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LoginRes {
    pub user_id: i64,
    pub username: String,
    pub jwt: String,
    pub session_token: String,
    pub valid_until: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisterRes {
    pub username: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthInfoRes {
    pub id: i64,
    pub username: String,
}

#[derive(Deserialize)]
struct SuccessEnvelope<T> {
    error: Option<bool>,
    err: Option<bool>,
    data: T,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: Option<bool>,
    err: Option<bool>,
    errors: Vec<String>,
}

/// The envelope flag may be spelt `error` or `err`. If both are present they
/// have to agree.
fn envelope_flag(error: Option<bool>, err: Option<bool>) -> anyhow::Result<Option<bool>> {
    match (error, err) {
        (Some(a), Some(b)) if a != b => Err(anyhow!(
            "Response envelope carries conflicting `error` and `err` flags"
        )),
        _ => Ok(error.or(err)),
    }
}

/// Decode the payload of a response that came back with status 200.
pub fn decode_success<T: DeserializeOwned>(body: &[u8]) -> anyhow::Result<T> {
    let envelope: SuccessEnvelope<T> =
        serde_json::from_slice(body).context("Failed to parse response envelope")?;
    if envelope_flag(envelope.error, envelope.err)? == Some(true) {
        Err(anyhow!(
            "Response envelope reports an error despite a successful status"
        ))?;
    }
    Ok(envelope.data)
}

/// Decode the list of error codes of a response with any status other than 200.
/// Order is preserved.
pub fn decode_errors(body: &[u8]) -> anyhow::Result<Vec<ErrorCode>> {
    let envelope: ErrorEnvelope =
        serde_json::from_slice(body).context("Failed to parse error envelope")?;
    if envelope_flag(envelope.error, envelope.err)? == Some(false) {
        Err(anyhow!(
            "Error envelope reports success despite an unsuccessful status"
        ))?;
    }
    Ok(envelope.errors.into_iter().map(ErrorCode::from).collect())
}
