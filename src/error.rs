use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;
pub type AuthResult<T> = std::result::Result<T, AuthError>;
pub type ApiResult<T> = std::result::Result<T, ApiError>;
pub type TokenReaderResult<T> = std::result::Result<T, TokenReaderError>;

/// Coarse classification of a failure, used by the binary to pick
/// the exit status and the wording of the final message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Missing or invalid settings. Nothing was sent.
    Configuration,
    /// The remote service refused or failed the request.
    Remote,
    /// Local environment failure (terminal, file system).
    Environment,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid configuration : {0}")]
    Config(#[from] ConfigError),
    #[error("authorization failed : {0}")]
    Authorization(#[from] AuthError),
    #[error("could not read authorization PIN from input : {0}")]
    OperatorInput(#[source] io::Error),
    #[error("{action} failed : {source}")]
    Api {
        action: &'static str,
        #[source]
        source: ApiError,
    },
}

impl Error {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_) => ErrorCategory::Configuration,
            Error::Authorization(AuthError::Transport(_)) => ErrorCategory::Environment,
            Error::Authorization(_) => ErrorCategory::Remote,
            Error::OperatorInput(_) => ErrorCategory::Environment,
            Error::Api {
                source: ApiError::Transport(_),
                ..
            } => ErrorCategory::Environment,
            Error::Api { .. } => ErrorCategory::Remote,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required credentials : {0}")]
    MissingCredentials(&'static str),
    #[error("a recipient screen name is required to send a direct message")]
    MissingRecipient,
    #[error("no message given and no project artifact id and version to announce")]
    MissingMessage,
    #[error("invalid endpoint {0} : {1}")]
    InvalidEndpoint(String, #[source] url::ParseError),
    #[error("could not read settings file {0} : {1}")]
    ReadSettings(String, #[source] io::Error),
    #[error("malformed settings file {0} : {1}")]
    ParseSettings(String, #[source] serde_json::Error),
    #[error("could not build HTTP client : {0}")]
    HttpClient(#[source] reqwest::Error),
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("token endpoint rejected the request with status {status} : {message}")]
    Rejected { status: u16, message: String },
    #[error("token acquisition failed : {0}")]
    TokenReader(#[from] TokenReaderError),
    #[error("request failed : {0}")]
    Transport(#[from] reqwest::Error),
}

impl AuthError {
    /// HTTP status of a rejected token request.
    pub fn code(&self) -> Option<u16> {
        match self {
            AuthError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// `true` when the service refused the credentials outright (HTTP 401).
    pub fn is_unauthorized(&self) -> bool {
        self.code() == Some(401)
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("service responded with status {status}{} : {message}", code_suffix(.code))]
    Rejected {
        status: u16,
        code: Option<i64>,
        message: String,
    },
    #[error("response could not be decoded : {0}")]
    Decode(#[from] serde_json::Error),
    #[error("request failed : {0}")]
    Transport(#[from] reqwest::Error),
}

fn code_suffix(code: &Option<i64>) -> String {
    code.map(|c| format!(" (error {})", c)).unwrap_or_default()
}

#[derive(Error, Debug, Clone)]
pub enum TokenReaderError {
    #[error("response has malformed format: not found {0} in {1}")]
    TokenKeyNotFound(&'static str, String),
}
