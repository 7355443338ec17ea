//! Obtains the access token a post or message is signed with.
//!
//! Sources are tried in order: a pair supplied in the settings, the pair
//! cached in the work directory, and finally the out-of-band PIN grant.
//! A cached pair is trusted as-is; a revoked token shows up as a rejection
//! of the first real API call.

use tracing::{debug, error, info, warn};

use crate::{
    AuthError, ConsumerPair, Credential, Error, OperatorPort, RequestToken, Result, SocialApi,
    TokenPair, TokenStore,
};

const GRANT_INSTRUCTIONS: &str = "Open the following URL and grant access to your account:";
const PIN_PROMPT: &str = "Enter the PIN (if available) or just hit enter. [PIN]: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    NoToken,
    RequestingToken,
    AwaitingOperatorInput,
    ExchangingToken,
    Authorized,
    Failed,
}

/// Where the access token of an [`Authorization`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Configured,
    Cached,
    Granted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authorization {
    pub credential: Credential,
    pub source: TokenSource,
}

impl Authorization {
    /// `true` when the token was just granted and should be persisted.
    pub fn is_new(&self) -> bool {
        self.source == TokenSource::Granted
    }
}

pub struct AuthorizationFlow<'f, A: ?Sized, P: ?Sized> {
    api: &'f A,
    port: &'f mut P,
    state: FlowState,
}

impl<'f, A, P> AuthorizationFlow<'f, A, P>
where
    A: SocialApi + ?Sized,
    P: OperatorPort + ?Sized,
{
    pub fn new(api: &'f A, port: &'f mut P) -> Self {
        AuthorizationFlow {
            api,
            port,
            state: FlowState::NoToken,
        }
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn authorize(
        &mut self,
        consumer: &ConsumerPair,
        configured: Option<TokenPair>,
        store: &TokenStore,
    ) -> Result<Authorization> {
        let (access, source) = if let Some(access) = configured {
            debug!("using access token from settings");
            (access, TokenSource::Configured)
        } else if let Some(access) = store.load() {
            info!(path = %store.path().display(), "using cached access token");
            (access, TokenSource::Cached)
        } else {
            (self.grant()?, TokenSource::Granted)
        };
        self.state = FlowState::Authorized;
        Ok(Authorization {
            credential: consumer.clone().token(access),
            source,
        })
    }

    fn grant(&mut self) -> Result<TokenPair> {
        self.transition(FlowState::RequestingToken);
        let request = match self.api.request_token() {
            Ok(request) => request,
            Err(e) => return Err(self.fail(e)),
        };
        loop {
            self.transition(FlowState::AwaitingOperatorInput);
            let line = self.ask_for_pin(&request).map_err(|e| {
                error!("could not read authorization PIN from input");
                self.state = FlowState::Failed;
                Error::OperatorInput(e)
            })?;
            let verifier = if line.is_empty() {
                None
            } else {
                Some(line.as_str())
            };

            self.transition(FlowState::ExchangingToken);
            match self.api.access_token(&request, verifier) {
                Ok(access) => {
                    info!("access token granted");
                    return Ok(access);
                }
                Err(AuthError::TokenReader(e)) => {
                    warn!(error = %e, "access has not been granted yet");
                    self.port.show("Access has not been granted yet.");
                }
                Err(e) => return Err(self.fail(e)),
            }
        }
    }

    fn ask_for_pin(&mut self, request: &RequestToken) -> std::io::Result<String> {
        self.port.show(GRANT_INSTRUCTIONS);
        self.port.show(&request.authorization_url);
        self.port.prompt_line(PIN_PROMPT)
    }

    fn fail(&mut self, e: AuthError) -> Error {
        if e.is_unauthorized() {
            error!("could not acquire access token");
        }
        self.state = FlowState::Failed;
        e.into()
    }

    fn transition(&mut self, next: FlowState) {
        debug!(from = ?self.state, to = ?next, "authorization flow");
        self.state = next;
    }
}
