//! The remote service: token endpoints plus the two calls the herald makes.

use chrono::{DateTime, FixedOffset, Utc};
use reqwest::blocking::{Client as ReqwestClient, Response};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::token_reader::TokenReaderResultExt;
use crate::{
    ApiError, ApiResult, AuthResult, BorrowedSecrets, ConfigError, ConsumerPair, Credential,
    OAuthClientProvider, OAuthParameters, RequestToken, TokenPair,
};

const DEFAULT_API_BASE: &str = "https://api.twitter.com/";
const CREATED_AT_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";
/// `oauth_callback` value that selects the PIN-based flow.
const OUT_OF_BAND: &str = "oob";

/// The operations the herald needs from the service.
pub trait SocialApi {
    /// Obtains a request token and the URL where the operator grants access.
    fn request_token(&self) -> AuthResult<RequestToken>;

    /// Exchanges a request token for an access token. `verifier` is the PIN
    /// shown to the operator; `None` relies on a grant made out of band.
    fn access_token(&self, request: &RequestToken, verifier: Option<&str>)
        -> AuthResult<TokenPair>;

    fn post_status(&self, access: &TokenPair, text: &str) -> ApiResult<StatusResult>;

    fn send_direct_message(
        &self,
        access: &TokenPair,
        recipient: &str,
        text: &str,
    ) -> ApiResult<MessageResult>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusResult {
    pub id: String,
    pub text: String,
    pub created_at: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageResult {
    pub id: String,
    pub recipient_screen_name: String,
    pub text: String,
    pub created_at: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub request_token: Url,
    pub authorize: Url,
    pub access_token: Url,
    pub update_status: Url,
    pub direct_message: Url,
}

impl Endpoints {
    /// Derives every endpoint from one base URL, e.g. `https://api.twitter.com/`.
    pub fn with_base(base: &str) -> Result<Self, ConfigError> {
        let mut base_url =
            Url::parse(base).map_err(|e| ConfigError::InvalidEndpoint(base.to_string(), e))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let join = |path: &str| {
            base_url
                .join(path)
                .map_err(|e| ConfigError::InvalidEndpoint(path.to_string(), e))
        };
        Ok(Endpoints {
            request_token: join("oauth/request_token")?,
            authorize: join("oauth/authorize")?,
            access_token: join("oauth/access_token")?,
            update_status: join("1.1/statuses/update.json")?,
            direct_message: join("1.1/direct_messages/new.json")?,
        })
    }

    fn authorization_url(&self, request_token: &str) -> String {
        let mut url = self.authorize.clone();
        url.query_pairs_mut()
            .append_pair("oauth_token", request_token);
        url.into()
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Endpoints::with_base(DEFAULT_API_BASE).expect("default endpoints are valid URLs")
    }
}

/// `SocialApi` over HTTP, signing every call with OAuth 1.0a.
#[derive(Debug)]
pub struct HttpApi {
    client: ReqwestClient,
    consumer: ConsumerPair,
    endpoints: Endpoints,
}

impl HttpApi {
    pub fn new(consumer: ConsumerPair, endpoints: Endpoints) -> Result<Self, ConfigError> {
        let client = ReqwestClient::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ConfigError::HttpClient)?;
        Ok(Self::with_client(client, consumer, endpoints))
    }

    pub fn with_client(client: ReqwestClient, consumer: ConsumerPair, endpoints: Endpoints) -> Self {
        HttpApi {
            client,
            consumer,
            endpoints,
        }
    }

    fn credential(&self, access: &TokenPair) -> Credential {
        self.consumer.clone().token(access.clone())
    }
}

impl SocialApi for HttpApi {
    fn request_token(&self) -> AuthResult<RequestToken> {
        debug!(endpoint = %self.endpoints.request_token, "requesting request token");
        let params = OAuthParameters::new().callback(OUT_OF_BAND);
        let resp = self
            .client
            .oauth1_with_params(&self.consumer, params)
            .post(self.endpoints.request_token.clone())
            .send()
            .parse_oauth_token()?;
        Ok(RequestToken {
            authorization_url: self.endpoints.authorization_url(&resp.oauth_token),
            token: resp.oauth_token,
            secret: resp.oauth_token_secret,
        })
    }

    fn access_token(
        &self,
        request: &RequestToken,
        verifier: Option<&str>,
    ) -> AuthResult<TokenPair> {
        debug!(
            endpoint = %self.endpoints.access_token,
            with_verifier = verifier.is_some(),
            "exchanging request token"
        );
        let secrets = BorrowedSecrets::new(&self.consumer, &request.token, &request.secret);
        let params = match verifier {
            Some(pin) => OAuthParameters::new().verifier(pin),
            None => OAuthParameters::new(),
        };
        let resp = self
            .client
            .oauth1_with_params(&secrets, params)
            .post(self.endpoints.access_token.clone())
            .send()
            .parse_oauth_token()?;
        Ok(TokenPair::new(resp.oauth_token, resp.oauth_token_secret))
    }

    fn post_status(&self, access: &TokenPair, text: &str) -> ApiResult<StatusResult> {
        let credential = self.credential(access);
        let resp = self
            .client
            .oauth1(&credential)
            .post(self.endpoints.update_status.clone())
            .form(&[("status", text)])
            .send()?;
        let body: StatusBody = read_json(resp)?;
        Ok(StatusResult {
            id: body.id_str,
            text: body.text,
            created_at: parse_created_at(body.created_at.as_deref()),
        })
    }

    fn send_direct_message(
        &self,
        access: &TokenPair,
        recipient: &str,
        text: &str,
    ) -> ApiResult<MessageResult> {
        let credential = self.credential(access);
        let resp = self
            .client
            .oauth1(&credential)
            .post(self.endpoints.direct_message.clone())
            .form(&[("screen_name", recipient), ("text", text)])
            .send()?;
        let body: MessageBody = read_json(resp)?;
        Ok(MessageResult {
            id: body.id_str,
            recipient_screen_name: body
                .recipient_screen_name
                .unwrap_or_else(|| recipient.to_string()),
            text: body.text,
            created_at: parse_created_at(body.created_at.as_deref()),
        })
    }
}

#[derive(Deserialize)]
struct StatusBody {
    id_str: String,
    text: String,
    created_at: Option<String>,
}

#[derive(Deserialize)]
struct MessageBody {
    id_str: String,
    text: String,
    recipient_screen_name: Option<String>,
    created_at: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<ErrorEntry>,
}

#[derive(Deserialize)]
struct ErrorEntry {
    code: Option<i64>,
    message: String,
}

fn read_json<T>(resp: Response) -> ApiResult<T>
where
    T: for<'de> Deserialize<'de>,
{
    let status = resp.status();
    let text = resp.text()?;
    if !status.is_success() {
        let first = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|body| body.errors.into_iter().next());
        return Err(match first {
            Some(entry) => ApiError::Rejected {
                status: status.as_u16(),
                code: entry.code,
                message: entry.message,
            },
            None => ApiError::Rejected {
                status: status.as_u16(),
                code: None,
                message: text.trim().to_string(),
            },
        });
    }
    Ok(serde_json::from_str(&text)?)
}

fn parse_created_at(raw: Option<&str>) -> DateTime<FixedOffset> {
    raw.and_then(|s| DateTime::parse_from_str(s, CREATED_AT_FORMAT).ok())
        .unwrap_or_else(|| Utc::now().fixed_offset())
}
