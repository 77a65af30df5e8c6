use anyhow::anyhow;
use reqwest::Method;

use crate::{
    api::{self, AuthInfoRes, Credentials, LoginRes, RegisterRes},
    client::{ApiClient, Reply},
    error::{ErrorCode, Failure},
};

const LOGIN_PATH: &str = "v1/auth/login";
const REGISTER_PATH: &str = "v1/auth/register";
const AUTH_INFO_PATH: &str = "v1/auth/info";

const LOGIN_ERRORS: &[(ErrorCode, &str)] = &[
    (ErrorCode::NotFound, "User not found"),
    (ErrorCode::Forbidden, "Login disallowed. Wrong password?"),
];

const REGISTER_ERRORS: &[(ErrorCode, &str)] = &[
    (
        ErrorCode::Internal,
        "Internal server error. Maybe this has something to do with https://github.com/Cardsity/issue-tracker/issues/3",
    ),
    (ErrorCode::PasswordRequirementsNotMet, "Password too weak"),
    (
        ErrorCode::DuplicateUsername,
        "A user with that username already exists",
    ),
];

const AUTH_INFO_ERRORS: &[(ErrorCode, &str)] = &[(
    ErrorCode::Forbidden,
    "Forbidden. Maybe the login is expired? Try to log in again",
)];

/// Turn a list of error codes into a failure. The first entry of `known`
/// present anywhere in `errors` wins; otherwise the first reported code is
/// fatal.
pub fn dispatch(errors: &[ErrorCode], known: &[(ErrorCode, &str)]) -> Failure {
    if let Some((_, message)) = known.iter().find(|(code, _)| errors.contains(code)) {
        return Failure::rejected(*message);
    }
    match errors.first() {
        Some(code) => Failure::Fatal(anyhow!("{code}")),
        None => Failure::Fatal(anyhow!("request rejected without error codes")),
    }
}

fn call<T: serde::de::DeserializeOwned>(
    client: &ApiClient,
    path: &str,
    body: Option<&Credentials>,
    method: Method,
    token: Option<&str>,
    known: &[(ErrorCode, &str)],
) -> Result<T, Failure> {
    match client.send(path, body, method, token)? {
        Reply::Success(body) => Ok(api::decode_success(&body)?),
        Reply::Rejected(errors) => Err(dispatch(&errors, known)),
    }
}

pub fn login(client: &ApiClient, credentials: &Credentials) -> Result<LoginRes, Failure> {
    tracing::info!("Logging in as {}...", credentials.username);
    call(
        client,
        LOGIN_PATH,
        Some(credentials),
        Method::POST,
        None,
        LOGIN_ERRORS,
    )
}

/// Returns the name of the created user.
pub fn register(client: &ApiClient, credentials: &Credentials) -> Result<String, Failure> {
    tracing::info!("Registering {}...", credentials.username);
    let RegisterRes { username } = call(
        client,
        REGISTER_PATH,
        Some(credentials),
        Method::POST,
        None,
        REGISTER_ERRORS,
    )?;
    Ok(username)
}

pub fn auth_info(client: &ApiClient, token: &str) -> Result<AuthInfoRes, Failure> {
    tracing::info!("Fetching identity info...");
    call(
        client,
        AUTH_INFO_PATH,
        None,
        Method::GET,
        Some(token),
        AUTH_INFO_ERRORS,
    )
}
