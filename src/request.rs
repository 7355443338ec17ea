// ----------------------------------------------------------------------------
// This source code contains derived artifacts from seanmonstar's `reqwest`.
// for further information(including license information),
// please visit their repository: https://github.com/seanmonstar/reqwest .
// ----------------------------------------------------------------------------
use http::{header::AUTHORIZATION, Method};
use reqwest::blocking::{RequestBuilder as ReqwestRequestBuilder, Response};
use reqwest::{Error, Url};
use serde::Serialize;

use crate::{SecretsProvider, Signer};

/// A blocking request that is signed right before it is sent.
pub struct RequestBuilder<'a, T>
where
    T: SecretsProvider,
{
    method: Method,
    inner: ReqwestRequestBuilder,
    signer: Signer<'a, T>,
    url: Option<Url>,
    body: String,
}

impl<'a, T> RequestBuilder<'a, T>
where
    T: SecretsProvider,
{
    pub(crate) fn new(
        builder: ReqwestRequestBuilder,
        method: Method,
        url: Option<Url>,
        signer: Signer<'a, T>,
    ) -> Self {
        RequestBuilder {
            inner: builder,
            method,
            url,
            body: String::new(),
            signer,
        }
    }

    /// Send a form body.
    ///
    /// The encoded body is kept so its pairs become part of the signature
    /// base string.
    pub fn form<F: Serialize + ?Sized>(mut self, form: &F) -> Self {
        if let Ok(body) = serde_urlencoded::to_string(form) {
            self.body = body;
        }
        self.inner = self.inner.form(form);
        self
    }

    /// Constructs the Request and sends it to the target URL.
    ///
    /// # Errors
    ///
    /// This method fails if there was an error while sending request,
    /// redirect loop was detected or redirect limit was exhausted.
    pub fn send(self) -> Result<Response, Error> {
        self.generate_signature().send()
    }

    /// Generate an OAuth signature and return the reqwest's `RequestBuilder`.
    pub fn generate_signature(self) -> ReqwestRequestBuilder {
        match self.url {
            Some(url) => {
                let signature = self
                    .signer
                    .generate_signature(&self.method, url, &self.body);
                self.inner.header(AUTHORIZATION, signature)
            }
            None => self.inner,
        }
    }
}
