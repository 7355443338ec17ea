// ----------------------------------------------------------------------------
// This source code contains derived artifacts from seanmonstar's `reqwest`.
// for further information(including license information),
// please visit their repository: https://github.com/seanmonstar/reqwest .
// ----------------------------------------------------------------------------
use reqwest::blocking::Client as ReqwestClient;
use reqwest::{IntoUrl, Method};

use crate::{OAuthParameters, SecretsProvider, Signer};

use super::request::RequestBuilder;

/// Adds OAuth 1.0a signing to a blocking `reqwest` client.
pub trait OAuthClientProvider {
    fn oauth1<'a, T>(&self, secrets: &'a T) -> Client<'_, Signer<'a, T>>
    where
        T: SecretsProvider,
    {
        self.oauth1_with_params(secrets, OAuthParameters::new())
    }

    fn oauth1_with_params<'a, T>(
        &self,
        secrets: &'a T,
        params: OAuthParameters<'a>,
    ) -> Client<'_, Signer<'a, T>>
    where
        T: SecretsProvider;
}

#[derive(Debug)]
pub struct Client<'c, TSigner> {
    inner: &'c ReqwestClient,
    signer: TSigner,
}

impl OAuthClientProvider for ReqwestClient {
    fn oauth1_with_params<'a, T>(
        &self,
        secrets: &'a T,
        parameters: OAuthParameters<'a>,
    ) -> Client<'_, Signer<'a, T>>
    where
        T: SecretsProvider,
    {
        Client {
            inner: self,
            signer: Signer::new(secrets, parameters),
        }
    }
}

impl<'c, 'a, T> Client<'c, Signer<'a, T>>
where
    T: SecretsProvider,
{
    /// Convenience method to make a `POST` request to a URL.
    pub fn post<U: IntoUrl + Clone>(self, url: U) -> RequestBuilder<'a, T> {
        self.request(Method::POST, url)
    }

    /// Start building a `Request` with the `Method` and `Url`.
    ///
    /// A URL that cannot be parsed is left for `reqwest` to report when
    /// the request is sent; no signature is attached in that case.
    pub fn request<U: IntoUrl + Clone>(self, method: Method, url: U) -> RequestBuilder<'a, T> {
        let cloned_url = url.clone().into_url().ok();
        RequestBuilder::new(
            self.inner.request(method.clone(), url),
            method,
            cloned_url,
            self.signer,
        )
    }
}
