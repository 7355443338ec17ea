use std::borrow::Cow;

use crate::SecretsProvider;
use http::Method;
use oauth1_request::signer::Signer as OAuthSigner;
use oauth1_request::{HmacSha1, Options};
use url::Url;

const OAUTH_IDENTIFIER: &str = "oauth_";

/// Produces the `Authorization: OAuth ...` header value for one request.
#[derive(Debug, Clone)]
pub struct Signer<'a, TSecretsProvider>
where
    TSecretsProvider: SecretsProvider,
{
    secrets: &'a TSecretsProvider,
    parameters: OAuthParameters<'a>,
}

impl<'a, TSecretsProvider> Signer<'a, TSecretsProvider>
where
    TSecretsProvider: SecretsProvider,
{
    pub fn new(secrets: &'a TSecretsProvider, parameters: OAuthParameters<'a>) -> Self {
        Signer {
            secrets,
            parameters,
        }
    }

    /// Signs a request whose parameters travel in a urlencoded body.
    pub fn generate_signature(self, method: &Method, url: Url, payload: &str) -> String {
        let (consumer_key, consumer_secret) = self.secrets.get_consumer_key_pair();
        let (token, token_secret) = self.secrets.get_token_option_pair();
        let options = self.parameters.build_options(token);

        // oauth1-request wants parameters in sorted order, so the body pairs
        // are split around the position where the oauth_* block belongs
        let parsed_payload: Vec<(Cow<str>, Cow<str>)> =
            url::form_urlencoded::parse(payload.as_bytes()).collect();
        let oauth_identifier = vec![(Cow::from(OAUTH_IDENTIFIER), Cow::from(""))];
        let mut sorted_query = [parsed_payload, oauth_identifier].concat();
        sorted_query.sort();

        let mut divided = sorted_query.splitn(2, |(k, _)| k == &OAUTH_IDENTIFIER);
        let query_before_oauth = divided.next().unwrap_or_default();
        let query_after_oauth = divided.next().unwrap_or_default();

        let mut signer = OAuthSigner::form_with_signature_method(
            HmacSha1,
            method.as_str(),
            url,
            consumer_secret,
            token_secret,
        );
        for (key, value) in query_before_oauth {
            if !key.starts_with(OAUTH_IDENTIFIER) {
                signer.parameter(key, value);
            }
        }
        let mut signer = signer.oauth_parameters(consumer_key, &options);
        for (key, value) in query_after_oauth {
            if !key.starts_with(OAUTH_IDENTIFIER) {
                signer.parameter(key, value);
            }
        }

        signer.finish().authorization
    }
}

/// Protocol parameters beyond the consumer key and token.
///
/// Nonce and timestamp are generated per request unless pinned here.
#[derive(Debug, Clone, Default)]
pub struct OAuthParameters<'a> {
    callback: Option<Cow<'a, str>>,
    nonce: Option<Cow<'a, str>>,
    timestamp: Option<u64>,
    verifier: Option<Cow<'a, str>>,
    version: bool,
}

impl<'a> OAuthParameters<'a> {
    pub fn new() -> Self {
        Default::default()
    }

    /// set the oauth_callback value ("oob" for the PIN flow)
    pub fn callback<T>(self, callback: T) -> Self
    where
        T: Into<Cow<'a, str>>,
    {
        OAuthParameters {
            callback: Some(callback.into()),
            ..self
        }
    }

    /// set the oauth_nonce value
    pub fn nonce<T>(self, nonce: T) -> Self
    where
        T: Into<Cow<'a, str>>,
    {
        OAuthParameters {
            nonce: Some(nonce.into()),
            ..self
        }
    }

    /// set the oauth_timestamp value
    pub fn timestamp<T>(self, timestamp: T) -> Self
    where
        T: Into<u64>,
    {
        OAuthParameters {
            timestamp: Some(timestamp.into()),
            ..self
        }
    }

    /// set the oauth_verifier value
    pub fn verifier<T>(self, verifier: T) -> Self
    where
        T: Into<Cow<'a, str>>,
    {
        OAuthParameters {
            verifier: Some(verifier.into()),
            ..self
        }
    }

    /// Include `oauth_version="1.0"` when `true`.
    pub fn version(self, version: bool) -> Self {
        OAuthParameters { version, ..self }
    }

    fn build_options(&'a self, token: Option<&'a str>) -> Options<'a> {
        let mut opt = Options::new();

        // NOTE: items must be added by alphabetical order
        if let Some(ref callback) = self.callback {
            opt.callback(callback.as_ref());
        }
        if let Some(ref nonce) = self.nonce {
            opt.nonce(nonce.as_ref());
        }
        if let Some(timestamp) = self.timestamp {
            opt.timestamp(timestamp);
        }
        if let Some(token) = token {
            opt.token(token);
        }
        if let Some(ref verifier) = self.verifier {
            opt.verifier(verifier.as_ref());
        }
        opt.version(self.version);

        opt
    }
}
