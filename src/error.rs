use derive_more::Display;

/// Error identifiers the API reports in its error envelope, plus the
/// synthetic code produced when the server cannot be reached at all.
#[derive(Clone, Display, Debug, PartialEq, Eq)]
pub enum ErrorCode {
    #[display("ERR_NOT_FOUND")]
    NotFound,
    #[display("ERR_FORBIDDEN")]
    Forbidden,
    #[display("ERR_INTERNAL")]
    Internal,
    #[display("ERR_PASSWORD_REQUIREMENTS_NOT_MET")]
    PasswordRequirementsNotMet,
    #[display("ERR_DUPLICATE_USERNAME")]
    DuplicateUsername,
    #[display("Connection failed")]
    ConnectionFailed,
    #[display("{_0}")]
    Unrecognized(String),
}

impl From<String> for ErrorCode {
    fn from(code: String) -> Self {
        match code.as_str() {
            "ERR_NOT_FOUND" => Self::NotFound,
            "ERR_FORBIDDEN" => Self::Forbidden,
            "ERR_INTERNAL" => Self::Internal,
            "ERR_PASSWORD_REQUIREMENTS_NOT_MET" => Self::PasswordRequirementsNotMet,
            "ERR_DUPLICATE_USERNAME" => Self::DuplicateUsername,
            _ => Self::Unrecognized(code),
        }
    }
}

/// Why a command did not complete.
///
/// `Rejected` carries a message for an expected condition (wrong password,
/// expired login, bad arguments) and is reported as-is. `Fatal` is anything
/// else: malformed responses, unreachable servers, unknown error codes or
/// local I/O trouble.
#[derive(Display, Debug)]
pub enum Failure {
    #[display("{_0}")]
    Rejected(String),
    #[display("{_0:#}")]
    Fatal(anyhow::Error),
}

impl Failure {
    pub fn rejected<S: Into<String>>(message: S) -> Self {
        Self::Rejected(message.into())
    }
}

impl From<anyhow::Error> for Failure {
    fn from(err: anyhow::Error) -> Self {
        Self::Fatal(err)
    }
}
