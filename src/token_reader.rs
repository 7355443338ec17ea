use std::collections::HashMap;

use reqwest::blocking::Response;
use serde::Deserialize;

use crate::{AuthError, AuthResult, TokenReaderError, TokenReaderResult};

const OAUTH_TOKEN_KEY: &str = "oauth_token";

const OAUTH_TOKEN_SECRET_KEY: &str = "oauth_token_secret";

/// Represents response of token acquisition.
#[derive(Deserialize, Debug)]
pub struct TokenResponse {
    /// OAuth Token
    pub oauth_token: String,
    /// OAuth Token Secret
    pub oauth_token_secret: String,
    /// Other contents
    #[serde(flatten)]
    pub remain: HashMap<String, String>,
}

/// Add parse_oauth_token feature to reqwest::blocking::Response.
pub trait TokenReader: private::Sealed {
    fn parse_oauth_token(self) -> AuthResult<TokenResponse>;
}

impl TokenReader for Response {
    fn parse_oauth_token(self) -> AuthResult<TokenResponse> {
        let status = self.status();
        let text = self.text()?;
        if !status.is_success() {
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                message: text.trim().to_string(),
            });
        }
        Ok(read_oauth_token(text)?)
    }
}

/// Lets `client.post(..).send().parse_oauth_token()` chain without an
/// intermediate `?`.
pub trait TokenReaderResultExt: private::SealedWrapper {
    fn parse_oauth_token(self) -> AuthResult<TokenResponse>;
}

impl<E> TokenReaderResultExt for std::result::Result<Response, E>
where
    E: Into<AuthError>,
{
    fn parse_oauth_token(self) -> AuthResult<TokenResponse> {
        match self {
            Ok(resp) => resp.parse_oauth_token(),
            Err(err) => Err(err.into()),
        }
    }
}

fn read_oauth_token(text: String) -> TokenReaderResult<TokenResponse> {
    let mut destructured = text
        .split('&')
        .map(|e| e.splitn(2, '='))
        .map(|mut iter| {
            (
                iter.next().unwrap_or_default().to_string(),
                iter.next().unwrap_or_default().to_string(),
            )
        })
        .collect::<HashMap<String, String>>();
    let oauth_token = destructured.remove(OAUTH_TOKEN_KEY);
    let oauth_token_secret = destructured.remove(OAUTH_TOKEN_SECRET_KEY);
    match (oauth_token, oauth_token_secret) {
        (Some(t), Some(s)) => Ok(TokenResponse {
            oauth_token: t,
            oauth_token_secret: s,
            remain: destructured,
        }),
        (None, _) => Err(TokenReaderError::TokenKeyNotFound(OAUTH_TOKEN_KEY, text)),
        (_, _) => Err(TokenReaderError::TokenKeyNotFound(
            OAUTH_TOKEN_SECRET_KEY,
            text,
        )),
    }
}

mod private {
    use reqwest::blocking::Response;

    use crate::AuthError;

    pub trait Sealed {}
    impl Sealed for Response {}
    pub trait SealedWrapper {}
    impl<E> SealedWrapper for std::result::Result<Response, E> where E: Into<AuthError> {}
}
